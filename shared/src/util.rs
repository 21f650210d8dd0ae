/// Current UTC wall clock in whole microseconds.
pub fn now_micros() -> i64 {
    chrono::Utc::now().timestamp_micros()
}

/// Current UTC time as an RFC 3339 string, used to stamp test-case files.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

//! Test-case files for offline replay
//!
//! A fetched problem can be saved to a JSON file and replayed later without
//! contacting the server again. Unknown fields are ignored on read so older
//! files keep loading as the format grows.

use crate::{ClientResult, ProblemResult};
use serde::{Deserialize, Serialize};
use shared::Order;
use std::path::Path;

/// A saved test case: the problem plus the timing parameters it ran with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestData {
    #[serde(rename = "testId")]
    pub test_id: String,

    pub orders: Vec<Order>,

    #[serde(rename = "rateMicros")]
    pub rate_micros: i64,

    #[serde(rename = "minPickupMicros")]
    pub min_pickup_micros: i64,

    #[serde(rename = "maxPickupMicros")]
    pub max_pickup_micros: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Grading result of the last submitted run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,

    /// When the test case was saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// When the test case was last replayed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rerun_timestamp: Option<String>,
}

impl TestData {
    /// Build a test case from a freshly fetched problem.
    pub fn from_problem(
        problem: &ProblemResult,
        rate_micros: i64,
        min_pickup_micros: i64,
        max_pickup_micros: i64,
        seed: Option<u64>,
    ) -> Self {
        Self {
            test_id: problem.test_id.clone(),
            orders: problem.orders.clone(),
            rate_micros,
            min_pickup_micros,
            max_pickup_micros,
            seed,
            result: None,
            timestamp: Some(shared::util::now_rfc3339()),
            rerun_timestamp: None,
        }
    }

    /// Load a test case from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> ClientResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Save the test case as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> ClientResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        tracing::info!(path = %path.as_ref().display(), "Test data saved");
        Ok(())
    }

    /// Rewrite a saved test case with the result of a replayed run.
    pub fn update_result(path: impl AsRef<Path>, result: &str) -> ClientResult<()> {
        let mut data = Self::load(&path)?;
        data.result = Some(result.to_string());
        data.rerun_timestamp = Some(shared::util::now_rfc3339());
        data.save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Temperature;

    fn sample() -> TestData {
        TestData {
            test_id: "test-123".into(),
            orders: vec![Order::new(
                "o1",
                "Pad Thai",
                Temperature::Hot,
                "11.25".parse().unwrap(),
                90,
            )],
            rate_micros: 500_000,
            min_pickup_micros: 4_000_000,
            max_pickup_micros: 8_000_000,
            seed: Some(7),
            result: None,
            timestamp: None,
            rerun_timestamp: None,
        }
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("challenge-client-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_save_load_roundtrip() {
        let path = temp_path("roundtrip.json");
        let data = sample();
        data.save(&path).unwrap();

        let loaded = TestData::load(&path).unwrap();
        assert_eq!(loaded.test_id, "test-123");
        assert_eq!(loaded.orders.len(), 1);
        assert_eq!(loaded.orders[0].temperature, Temperature::Hot);
        assert_eq!(loaded.rate_micros, 500_000);
        assert_eq!(loaded.seed, Some(7));
        assert_eq!(loaded.result, None);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let json = r#"{
            "testId": "t",
            "orders": [],
            "rateMicros": 1,
            "minPickupMicros": 2,
            "maxPickupMicros": 3,
            "some_future_field": {"nested": true}
        }"#;
        let data: TestData = serde_json::from_str(json).unwrap();
        assert_eq!(data.test_id, "t");
        assert_eq!(data.seed, None);
    }

    #[test]
    fn test_update_result_stamps_rerun() {
        let path = temp_path("update.json");
        sample().save(&path).unwrap();

        TestData::update_result(&path, "pass").unwrap();

        let loaded = TestData::load(&path).unwrap();
        assert_eq!(loaded.result.as_deref(), Some("pass"));
        assert!(loaded.rerun_timestamp.is_some());

        std::fs::remove_file(&path).ok();
    }
}

//! Client configuration

/// Default challenge server endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.cloudkitchens.com/interview/challenge";

/// Configuration for connecting to the challenge server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "https://api.cloudkitchens.com/interview/challenge")
    pub base_url: String,

    /// Auth token, carried as the `auth` query parameter
    pub auth_token: String,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new configuration for the given auth token.
    ///
    /// The base URL defaults to the public challenge endpoint and can be
    /// overridden with the `CHALLENGE_BASE_URL` environment variable.
    pub fn new(auth_token: impl Into<String>) -> Self {
        Self {
            base_url: std::env::var("CHALLENGE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            auth_token: auth_token.into(),
            timeout: 30,
        }
    }

    /// Override the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }
}

//! HTTP client for the challenge server

use crate::{ChallengeOptions, ChallengeRequest, ClientConfig, ClientError, ClientResult,
            ProblemResult};
use reqwest::{Client, StatusCode};
use shared::{Action, Order};

/// How much of an error body is echoed into error messages.
const BODY_EXCERPT_LEN: usize = 200;

/// Client for communicating with the challenge server.
#[derive(Debug, Clone)]
pub struct ChallengeClient {
    client: Client,
    config: ClientConfig,
}

impl ChallengeClient {
    /// Create a new client from configuration.
    pub fn new(config: ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self { client, config }
    }

    /// Fetch a new problem from the challenge server.
    ///
    /// Returns the test ID (from the `x-test-id` header) and the orders to
    /// fulfill. A `seed` makes the server hand out a reproducible problem.
    pub async fn fetch_new_problem(&self, seed: Option<u64>) -> ClientResult<ProblemResult> {
        let mut url = format!(
            "{}/new?auth={}",
            self.config.base_url.trim_end_matches('/'),
            self.config.auth_token
        );
        if let Some(seed) = seed {
            url.push_str(&format!("&seed={}", seed));
        }

        tracing::info!("Fetching new problem from challenge server");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status != StatusCode::OK {
            if status == StatusCode::UNAUTHORIZED {
                return Err(ClientError::Unauthorized);
            }
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Protocol {
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }

        let test_id = response
            .headers()
            .get("x-test-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .filter(|id| !id.is_empty())
            .ok_or(ClientError::MissingTestId)?;

        let orders: Vec<Order> = response.json().await?;
        tracing::info!(test_id = %test_id, count = orders.len(), "Fetched problem");

        Ok(ProblemResult { test_id, orders })
    }

    /// Submit a solved ledger to the challenge server.
    ///
    /// Returns the grading result string from the response body.
    pub async fn submit_solution(
        &self,
        test_id: &str,
        options: ChallengeOptions,
        actions: &[Action],
    ) -> ClientResult<String> {
        let url = format!(
            "{}/solve?auth={}",
            self.config.base_url.trim_end_matches('/'),
            self.config.auth_token
        );

        tracing::info!(test_id = %test_id, actions = actions.len(), "Submitting solution");

        let request = ChallengeRequest {
            options,
            actions: actions.to_vec(),
        };

        let response = self
            .client
            .post(&url)
            .header("x-test-id", test_id)
            .json(&request)
            .send()
            .await?;
        let status = response.status();

        if status != StatusCode::OK {
            if status == StatusCode::CONFLICT {
                return Err(ClientError::AlreadySubmitted);
            }
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Protocol {
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }

        let result = response.text().await?;
        tracing::info!(result = %result, "Solution graded");
        Ok(result)
    }
}

/// Trim a response body down to a short, single-line excerpt.
fn excerpt(body: &str) -> String {
    let flat = body.replace(['\n', '\r'], " ");
    let trimmed = flat.trim();
    if trimmed.len() <= BODY_EXCERPT_LEN {
        trimmed.to_string()
    } else {
        let mut end = BODY_EXCERPT_LEN;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &trimmed[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_short_body_passes_through() {
        assert_eq!(excerpt("  bad request \n"), "bad request");
    }

    #[test]
    fn test_excerpt_truncates_long_body() {
        let long = "x".repeat(500);
        let result = excerpt(&long);
        assert_eq!(result.len(), BODY_EXCERPT_LEN + 3);
        assert!(result.ends_with("..."));
    }
}

//! Shared HTTP client construction

use std::time::Duration;

use crate::domain::DomainError;

/// Build a reqwest client with a total request timeout
pub fn build_client(timeout: Duration, user_agent: Option<&str>) -> Result<reqwest::Client, DomainError> {
    let mut builder = reqwest::Client::builder().timeout(timeout);

    if let Some(agent) = user_agent {
        builder = builder.user_agent(agent);
    }

    builder
        .build()
        .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))
}

/// Truncate an error body for inclusion in messages
pub fn truncate_body(body: &str, max_len: usize) -> String {
    if body.len() <= max_len {
        return body.to_string();
    }

    let mut end = max_len;
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_client() {
        assert!(build_client(Duration::from_secs(5), Some("test-agent/1.0")).is_ok());
        assert!(build_client(Duration::from_secs(5), None).is_ok());
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(truncate_body("short", 10), "short");
        assert_eq!(truncate_body("a longer error body", 8), "a longer...");
    }

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        assert_eq!(truncate_body("ééé", 3), "é...");
    }
}

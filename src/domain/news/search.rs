use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Status value the news-search API uses for success
pub const STATUS_OK: &str = "ok";

/// Response of a news-search query
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub articles: Vec<SearchArticle>,
}

impl SearchResponse {
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Article metadata as returned by the news-search API
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

/// Trait for news-search backends
#[async_trait]
pub trait NewsSearch: Send + Sync + std::fmt::Debug {
    /// Recent articles for a source, optionally filtered by free-text query
    async fn everything(
        &self,
        source_id: &str,
        query: Option<&str>,
    ) -> Result<SearchResponse, DomainError>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_success_response() {
        let json = r#"{
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {"source": {"id": "bbc-news", "name": "BBC News"}, "title": "One", "url": "https://bbc.co.uk/1", "publishedAt": "2025-01-05T10:00:00Z"},
                {"title": null, "url": null}
            ]
        }"#;

        let response: SearchResponse = serde_json::from_str(json).unwrap();

        assert!(response.is_ok());
        assert_eq!(response.total_results, Some(2));
        assert_eq!(response.articles.len(), 2);
        assert_eq!(response.articles[0].title.as_deref(), Some("One"));
        assert!(response.articles[1].url.is_none());
    }

    #[test]
    fn test_deserialize_error_response() {
        let json = r#"{"status": "error", "code": "apiKeyInvalid", "message": "Your API key is invalid."}"#;

        let response: SearchResponse = serde_json::from_str(json).unwrap();

        assert!(!response.is_ok());
        assert_eq!(response.code.as_deref(), Some("apiKeyInvalid"));
        assert!(response.articles.is_empty());
    }
}

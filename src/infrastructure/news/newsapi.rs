//! News-search API client (NewsAPI `/v2/everything` compatible)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, warn};

use crate::config::NewsConfig;
use crate::domain::{DomainError, NewsSearch, SearchResponse};
use crate::infrastructure::http_client::{build_client, truncate_body};

const SERVICE: &str = "newsapi";
const API_KEY_HEADER: &str = "X-Api-Key";

/// HTTP client for the news-search API
#[derive(Debug, Clone)]
pub struct NewsApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl NewsApiClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn from_config(config: &NewsConfig) -> Result<Self, DomainError> {
        if config.api_key.is_none() {
            warn!("News API key is not configured; outlet queries will be rejected upstream");
        }

        let client = build_client(Duration::from_secs(config.timeout_secs), None)?;
        Ok(Self::new(client, &config.base_url, config.api_key.clone()))
    }

    fn everything_url(&self, source_id: &str, query: Option<&str>) -> Result<Url, DomainError> {
        let mut url = Url::parse(&format!("{}/v2/everything", self.base_url))
            .map_err(|e| DomainError::configuration(format!("Invalid news API base URL: {}", e)))?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("sources", source_id);

            if let Some(q) = query.map(str::trim).filter(|q| !q.is_empty()) {
                pairs.append_pair("q", q);
            }
        }

        Ok(url)
    }
}

#[async_trait]
impl NewsSearch for NewsApiClient {
    async fn everything(
        &self,
        source_id: &str,
        query: Option<&str>,
    ) -> Result<SearchResponse, DomainError> {
        let url = self.everything_url(source_id, query)?;
        debug!(source_id = %source_id, query = ?query, "Querying news API");

        let mut request = self.client.get(url);
        if let Some(ref key) = self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::external_api(SERVICE, format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DomainError::external_api(SERVICE, format!("Failed to read response: {}", e)))?;

        // Error payloads carry `status: "error"` alongside a 4xx/5xx code
        match serde_json::from_str::<SearchResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => Err(DomainError::external_api(
                SERVICE,
                format!("HTTP {}: {}", status, truncate_body(&body, 200)),
            )),
            Err(e) => Err(DomainError::external_api(
                SERVICE,
                format!("Failed to parse response: {}", e),
            )),
        }
    }
}

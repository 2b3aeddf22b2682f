//! Tavily search adapter implementation.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    error::SearchError,
    traits::{SearchAdapter, SearchHit},
};

const TAVILY_API_URL: &str = "https://api.tavily.com/search";

/// Tavily adapter for market research queries.
pub struct TavilySearch {
    client: Client,
    api_key: String,
    max_results: u8,
}

impl TavilySearch {
    /// Create a new Tavily adapter.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Tavily API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            max_results: 3,
        }
    }

    /// Set the maximum number of results to request.
    #[must_use]
    pub fn with_max_results(mut self, max_results: u8) -> Self {
        self.max_results = max_results;
        self
    }

    async fn request(&self, query: &str, max_results: u8) -> Result<Vec<SearchHit>, SearchError> {
        let request = TavilyRequest {
            api_key: &self.api_key,
            query,
            max_results,
        };

        let response = self
            .client
            .post(TAVILY_API_URL)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout
                } else {
                    SearchError::Connection(e.to_string())
                }
            })?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(SearchError::Authentication(response.status().to_string()));
            }
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(SearchError::RateLimited(response.status().to_string()));
            }
            status if !status.is_success() => {
                return Err(SearchError::Api(status.to_string()));
            }
            _ => {}
        }

        let body: TavilyResponse = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

        Ok(body
            .results
            .into_iter()
            .map(|r| SearchHit {
                title: r.title,
                url: r.url,
                snippet: r.content,
                score: r.score,
            })
            .collect())
    }
}

#[derive(Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: u8,
}

#[derive(Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    score: Option<f64>,
}

#[async_trait]
impl SearchAdapter for TavilySearch {
    fn provider(&self) -> &str {
        "tavily"
    }

    #[instrument(skip(self), fields(provider = "tavily"))]
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        debug!("Searching with max_results={}", self.max_results);
        self.request(query, self.max_results).await
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        self.request("connectivity check", 1).await?;
        Ok(true)
    }
}

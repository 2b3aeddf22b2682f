//! Core trait and types for search adapters.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// A single ranked search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Result title
    pub title: String,
    /// Result URL
    pub url: String,
    /// Short content snippet
    pub snippet: String,
    /// Provider relevance score, when reported
    pub score: Option<f64>,
}

/// Trait for search service adapters.
#[async_trait]
pub trait SearchAdapter: Send + Sync {
    /// Get the provider name (e.g., "tavily").
    fn provider(&self) -> &str;

    /// Run a free-text query, returning a small ranked result list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError>;

    /// Check if the search service is accessible.
    ///
    /// # Errors
    ///
    /// Returns an error if the health check fails.
    async fn health_check(&self) -> Result<bool, SearchError>;
}

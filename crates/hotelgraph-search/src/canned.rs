//! Canned search adapter for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::{
    error::SearchError,
    traits::{SearchAdapter, SearchHit},
};

/// In-memory adapter that returns the same fixed hits for every query.
pub struct CannedSearch {
    hits: Vec<SearchHit>,
    calls: AtomicUsize,
}

impl CannedSearch {
    /// Create an adapter returning the given hits for every query.
    #[must_use]
    pub fn new(hits: Vec<SearchHit>) -> Self {
        Self {
            hits,
            calls: AtomicUsize::new(0),
        }
    }

    /// Create an adapter returning a single snippet.
    #[must_use]
    pub fn with_snippet(snippet: impl Into<String>) -> Self {
        Self::new(vec![SearchHit {
            title: "canned".to_string(),
            url: "https://example.com".to_string(),
            snippet: snippet.into(),
            score: Some(1.0),
        }])
    }

    /// Number of `search` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchAdapter for CannedSearch {
    fn provider(&self) -> &str {
        "canned"
    }

    async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.hits.clone())
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_fixed_hits_and_counts_calls() {
        let adapter = CannedSearch::with_snippet("beachfront resort, strong reviews");

        let hits = adapter.search("anything").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].snippet, "beachfront resort, strong reviews");

        adapter.search("anything else").await.unwrap();
        assert_eq!(adapter.call_count(), 2);
    }
}

//! Search service error types.

use thiserror::Error;

/// Errors that can occur when talking to a search service.
///
/// Like completion errors, every variant is fatal to the workflow run that
/// triggered the call.
#[derive(Error, Debug)]
pub enum SearchError {
    /// API error from the provider
    #[error("API error: {0}")]
    Api(String),

    /// Network/connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Response arrived but could not be read as search results
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,
}

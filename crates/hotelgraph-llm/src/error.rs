//! Completion service error types.

use thiserror::Error;

/// Errors that can occur when talking to a completion service.
///
/// Every variant is in the "adapter failure" class: fatal to the workflow
/// run that triggered the call. Malformed-but-delivered model text is not an
/// error at this layer; the engine's schema parser handles that locally.
#[derive(Error, Debug)]
pub enum CompletionError {
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

    /// Empty response from provider
    #[error("Empty response from completion service")]
    EmptyResponse,

    /// Response arrived but could not be read as completion text
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

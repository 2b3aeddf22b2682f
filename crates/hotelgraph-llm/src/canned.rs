//! Canned completion adapter for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    error::CompletionError,
    traits::{Completion, CompletionAdapter, FinishReason, Message, TokenUsage},
};

/// In-memory adapter that replays scripted responses in order.
///
/// Each `complete` call consumes the next scripted response; calling past
/// the end of the script is an API error so tests fail loudly instead of
/// silently reusing stale text. The call counter lets tests assert which
/// nodes actually reached the completion service.
pub struct CannedCompletions {
    responses: Mutex<VecDeque<String>>,
    calls: AtomicUsize,
}

impl CannedCompletions {
    /// Create an adapter that replays the given responses in order.
    #[must_use]
    pub fn new(responses: Vec<impl Into<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Create an adapter with an empty script (any call is an error).
    #[must_use]
    pub fn unreachable() -> Self {
        Self::new(Vec::<String>::new())
    }

    /// Append another scripted response.
    pub fn push(&self, response: impl Into<String>) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push_back(response.into());
        }
    }

    /// Number of `complete` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionAdapter for CannedCompletions {
    fn provider(&self) -> &str {
        "canned"
    }

    fn model(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, _messages: &[Message]) -> Result<Completion, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let next = self
            .responses
            .lock()
            .map_err(|e| CompletionError::Api(e.to_string()))?
            .pop_front();

        match next {
            Some(content) => Ok(Completion {
                content,
                tokens_used: TokenUsage::default(),
                finish_reason: FinishReason::Stop,
                model: "scripted".to_string(),
            }),
            None => Err(CompletionError::Api("canned script exhausted".to_string())),
        }
    }

    async fn health_check(&self) -> Result<bool, CompletionError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_in_order_then_errors() {
        let adapter = CannedCompletions::new(vec!["first", "second"]);

        let a = adapter.complete(&[Message::user("x")]).await.unwrap();
        let b = adapter.complete(&[Message::user("x")]).await.unwrap();
        assert_eq!(a.content, "first");
        assert_eq!(b.content, "second");
        assert_eq!(adapter.call_count(), 2);

        let exhausted = adapter.complete(&[Message::user("x")]).await;
        assert!(exhausted.is_err());
    }

    #[tokio::test]
    async fn unreachable_errors_on_first_call() {
        let adapter = CannedCompletions::unreachable();
        assert!(adapter.complete(&[]).await.is_err());
        assert_eq!(adapter.call_count(), 1);
    }
}

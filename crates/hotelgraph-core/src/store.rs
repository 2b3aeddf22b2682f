//! Workflow state store - keyed checkpoints for run state.
//!
//! Every completed node's full post-merge state is checkpointed under the
//! run's identifier, so a caller (or a resumed run) can read the last-known
//! state for that run. The store is an explicit key-value abstraction
//! injected into the engine, never a process-wide singleton: tests inject
//! [`InMemoryStateStore`] and assert checkpoint contents after each node.
//!
//! Runs are isolated by key. Concurrent runs with distinct identifiers may
//! read and write freely; no cross-key coordination exists or is needed.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::graph::NodeName;
use crate::state::CampaignState;

// ============================================================================
// RUN IDENTIFIER
// ============================================================================

/// Identifier of one workflow run.
///
/// Free-form, caller-chosen, unique per logical campaign attempt. Two runs
/// sharing an identifier would interleave checkpoints in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(String);

impl RunId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("run-{}", uuid::Uuid::new_v4()))
    }

    /// Derive an identifier from the current time and a normalized campaign
    /// name (lowercased, whitespace collapsed to dashes), the scheme outer
    /// callers use to keep attempts from colliding.
    #[must_use]
    pub fn for_campaign(name: &str) -> Self {
        let normalized = name
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("-");
        Self(format!(
            "campaign-{}-{normalized}",
            Utc::now().timestamp_millis()
        ))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RunId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ============================================================================
// CHECKPOINT
// ============================================================================

/// A full state snapshot taken after one node completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunCheckpoint {
    /// Run this snapshot belongs to.
    pub run_id: RunId,
    /// Node that had just completed when the snapshot was taken.
    pub node: NodeName,
    /// Full post-merge campaign state.
    pub state: CampaignState,
    /// When the snapshot was taken.
    pub created_at: DateTime<Utc>,
}

impl RunCheckpoint {
    #[must_use]
    pub fn new(run_id: RunId, node: NodeName, state: CampaignState) -> Self {
        Self {
            run_id,
            node,
            state,
            created_at: Utc::now(),
        }
    }
}

// ============================================================================
// STORE ERROR
// ============================================================================

/// Errors from a checkpoint store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Storage backend error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Snapshot (de)serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

// ============================================================================
// STATE STORE TRAIT
// ============================================================================

/// Trait for checkpoint store backends.
///
/// Implementations can use various backends; the in-memory one below is the
/// reference used by tests and single-process deployments.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Append a checkpoint under its run id.
    async fn save(&self, checkpoint: &RunCheckpoint) -> Result<(), StoreError>;

    /// Load the most recent checkpoint for a run.
    async fn load_latest(&self, run_id: &RunId) -> Result<Option<RunCheckpoint>, StoreError>;

    /// Load every checkpoint for a run, oldest first.
    async fn history(&self, run_id: &RunId) -> Result<Vec<RunCheckpoint>, StoreError>;

    /// Drop all checkpoints for a run.
    async fn delete(&self, run_id: &RunId) -> Result<(), StoreError>;
}

// ============================================================================
// IN-MEMORY STATE STORE
// ============================================================================

/// In-memory checkpoint store keyed by run id.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    runs: RwLock<HashMap<String, Vec<RunCheckpoint>>>,
}

impl InMemoryStateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn save(&self, checkpoint: &RunCheckpoint) -> Result<(), StoreError> {
        let mut runs = self.runs.write().await;
        runs.entry(checkpoint.run_id.as_str().to_string())
            .or_default()
            .push(checkpoint.clone());
        Ok(())
    }

    async fn load_latest(&self, run_id: &RunId) -> Result<Option<RunCheckpoint>, StoreError> {
        let runs = self.runs.read().await;
        Ok(runs
            .get(run_id.as_str())
            .and_then(|history| history.last().cloned()))
    }

    async fn history(&self, run_id: &RunId) -> Result<Vec<RunCheckpoint>, StoreError> {
        let runs = self.runs.read().await;
        Ok(runs.get(run_id.as_str()).cloned().unwrap_or_default())
    }

    async fn delete(&self, run_id: &RunId) -> Result<(), StoreError> {
        let mut runs = self.runs.write().await;
        runs.remove(run_id.as_str());
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(run_id: &RunId, node: NodeName, keywords: &[&str]) -> RunCheckpoint {
        let mut state = CampaignState::default();
        state.keywords = keywords.iter().map(ToString::to_string).collect();
        RunCheckpoint::new(run_id.clone(), node, state)
    }

    #[tokio::test]
    async fn latest_is_the_last_saved() {
        let store = InMemoryStateStore::new();
        let run_id = RunId::new("run-a");

        store
            .save(&snapshot(&run_id, NodeName::Supervisor, &[]))
            .await
            .unwrap();
        store
            .save(&snapshot(&run_id, NodeName::Research, &["kw"]))
            .await
            .unwrap();

        let latest = store.load_latest(&run_id).await.unwrap().unwrap();
        assert_eq!(latest.node, NodeName::Research);
        assert_eq!(latest.state.keywords, vec!["kw".to_string()]);
    }

    #[tokio::test]
    async fn history_is_ordered_oldest_first() {
        let store = InMemoryStateStore::new();
        let run_id = RunId::new("run-a");

        for node in [NodeName::Supervisor, NodeName::Research, NodeName::Geo] {
            store.save(&snapshot(&run_id, node, &[])).await.unwrap();
        }

        let history = store.history(&run_id).await.unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].node, NodeName::Supervisor);
        assert_eq!(history[2].node, NodeName::Geo);
    }

    #[tokio::test]
    async fn runs_are_isolated_by_key() {
        let store = InMemoryStateStore::new();
        let a = RunId::new("run-a");
        let b = RunId::new("run-b");

        store
            .save(&snapshot(&a, NodeName::Research, &["a-kw"]))
            .await
            .unwrap();

        assert!(store.load_latest(&b).await.unwrap().is_none());
        assert!(store.history(&b).await.unwrap().is_empty());

        store.delete(&a).await.unwrap();
        assert!(store.load_latest(&a).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn concurrent_runs_do_not_interfere() {
        use std::sync::Arc;

        let store = Arc::new(InMemoryStateStore::new());
        let mut handles = Vec::new();

        for i in 0..8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let run_id = RunId::new(format!("run-{i}"));
                for node in [NodeName::Supervisor, NodeName::Research] {
                    store.save(&snapshot(&run_id, node, &[])).await.unwrap();
                }
                store.history(&run_id).await.unwrap().len()
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), 2);
        }
    }

    #[test]
    fn campaign_run_ids_embed_normalized_names() {
        let run_id = RunId::for_campaign("Ocean View Resort");
        assert!(run_id.as_str().starts_with("campaign-"));
        assert!(run_id.as_str().ends_with("ocean-view-resort"));
    }
}

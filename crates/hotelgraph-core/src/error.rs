//! Workflow error types.
//!
//! Two layers, mirroring the two failure classes:
//!
//! - [`NodeError`] - an adapter failure inside one node. Always the fatal
//!   "transport/auth" class; malformed model text never becomes a
//!   `NodeError` (nodes recover from that locally via their fallback
//!   policies).
//! - [`WorkflowError`] - what the engine surfaces to its caller: a node's
//!   adapter failure tagged with the node, a per-node timeout, a store
//!   failure, or an engine-level guard tripping.

use thiserror::Error;

use hotelgraph_llm::CompletionError;
use hotelgraph_search::SearchError;

use crate::graph::NodeName;
use crate::store::StoreError;

/// An unrecoverable failure inside a single node.
#[derive(Debug, Error)]
pub enum NodeError {
    /// Completion service failure.
    #[error(transparent)]
    Completion(#[from] CompletionError),

    /// Search service failure.
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// A failed workflow run, as surfaced to the caller.
///
/// No partial campaign accompanies any of these; the run's last checkpoint
/// remains readable through the state store for diagnosis.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A node's adapter call failed.
    #[error("node '{node}' failed: {source}")]
    NodeFailed {
        node: NodeName,
        #[source]
        source: NodeError,
    },

    /// A node exceeded the per-node timeout. Same class as a transport
    /// failure: the run aborts and the caller may retry with a new run id.
    #[error("node '{node}' timed out after {timeout_ms}ms")]
    NodeTimeout { node: NodeName, timeout_ms: u64 },

    /// The checkpoint store failed.
    #[error("checkpoint store failure: {0}")]
    Store(#[from] StoreError),

    /// The routing loop exceeded its step budget (routing bug guard).
    #[error("step budget exhausted after {0} steps")]
    StepBudgetExhausted(u32),

    /// `resume` was asked for a run the store has never seen.
    #[error("no checkpoint found for run '{0}'")]
    UnknownRun(String),

    /// An adapter failed its preflight health check.
    #[error("adapter preflight failed: {0}")]
    Preflight(String),
}

//! Workflow nodes.
//!
//! A node reads committed state and returns a partial [`StateUpdate`]; it
//! never mutates state directly and never sees a sibling's uncommitted
//! result. The generation-path nodes (research, geo, copywriter) are strict
//! pass-throughs whenever the computed phase is optimization, so an
//! optimize-only run can never clobber previously generated campaign
//! fields.

mod copywriter;
mod geo;
mod optimizer;
mod research;
mod supervisor;

pub use copywriter::CopywriterNode;
pub use geo::GeoNode;
pub use optimizer::{
    optimize, parse_budget, OptimizerNode, BID_REDUCTION_FACTOR, BUDGET_INCREASE_FACTOR,
    DEFAULT_DAILY_BUDGET, HIGH_ROAS_THRESHOLD, LOW_CTR_THRESHOLD,
};
pub use research::ResearchNode;
pub use supervisor::SupervisorNode;

use async_trait::async_trait;

use crate::error::NodeError;
use crate::graph::NodeName;
use crate::state::{CampaignState, StateUpdate};

/// A single step in the campaign workflow.
#[async_trait]
pub trait CampaignNode: Send + Sync {
    /// The node's name in the graph.
    fn name(&self) -> NodeName;

    /// Read state, do the node's work, return a partial update.
    ///
    /// # Errors
    ///
    /// Returns an error only for unrecoverable adapter failures. Malformed
    /// model responses are absorbed by the node's own fallback policy.
    async fn run(&self, state: &CampaignState) -> Result<StateUpdate, NodeError>;
}

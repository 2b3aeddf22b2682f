//! Supervisor node - phase stamping and (via the routing table) branching.

use async_trait::async_trait;
use tracing::debug;

use crate::error::NodeError;
use crate::graph::NodeName;
use crate::nodes::CampaignNode;
use crate::state::{CampaignState, StateUpdate};

/// Entry node. Computes the phase from state content and stamps it, so
/// checkpoints record which branch the run took. Performs no I/O; the
/// actual branching is the routing table's job.
#[derive(Debug, Default)]
pub struct SupervisorNode;

impl SupervisorNode {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CampaignNode for SupervisorNode {
    fn name(&self) -> NodeName {
        NodeName::Supervisor
    }

    async fn run(&self, state: &CampaignState) -> Result<StateUpdate, NodeError> {
        let phase = state.computed_phase();
        debug!(?phase, "Supervisor resolved phase");

        Ok(StateUpdate {
            phase: Some(phase),
            ..StateUpdate::default()
        })
    }
}

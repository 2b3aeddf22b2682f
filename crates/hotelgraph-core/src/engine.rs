//! Campaign workflow engine - the routing loop.
//!
//! One run executes its nodes strictly sequentially: each node awaits the
//! previous node's merged state. The only suspension points are the adapter
//! calls inside nodes. After every node the full merged state is
//! checkpointed under the run id, so the last-known state of any run stays
//! readable and a run can be resumed from its latest checkpoint.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument};

use hotelgraph_llm::CompletionAdapter;
use hotelgraph_search::SearchAdapter;

use crate::config::EngineConfig;
use crate::error::WorkflowError;
use crate::graph::{next_node, NodeName};
use crate::nodes::{
    CampaignNode, CopywriterNode, GeoNode, OptimizerNode, ResearchNode, SupervisorNode,
};
use crate::state::CampaignState;
use crate::store::{RunCheckpoint, RunId, StateStore};

/// The campaign workflow engine.
///
/// Holds the five nodes, the injected checkpoint store, and the adapters
/// needed for preflight checks. Cheap to share behind an `Arc`; distinct
/// runs may execute concurrently (the store isolates them by run id).
pub struct CampaignEngine {
    supervisor: SupervisorNode,
    research: ResearchNode,
    geo: GeoNode,
    copywriter: CopywriterNode,
    optimizer: OptimizerNode,
    completion: Arc<dyn CompletionAdapter>,
    search: Option<Arc<dyn SearchAdapter>>,
    store: Arc<dyn StateStore>,
    config: EngineConfig,
}

impl CampaignEngine {
    /// Create an engine over the given adapters and checkpoint store.
    #[must_use]
    pub fn new(
        completion: Arc<dyn CompletionAdapter>,
        search: Option<Arc<dyn SearchAdapter>>,
        store: Arc<dyn StateStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            supervisor: SupervisorNode::new(),
            research: ResearchNode::new(Arc::clone(&completion), search.clone()),
            geo: GeoNode::new(Arc::clone(&completion)),
            copywriter: CopywriterNode::new(Arc::clone(&completion), config.copy_variations),
            optimizer: OptimizerNode::new(Arc::clone(&completion)),
            completion,
            search,
            store,
            config,
        }
    }

    /// Verify both adapters are usable before accepting work.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Preflight`] when an adapter's health check
    /// fails.
    pub async fn preflight(&self) -> Result<(), WorkflowError> {
        self.completion
            .health_check()
            .await
            .map_err(|e| WorkflowError::Preflight(e.to_string()))?;

        if let Some(search) = &self.search {
            search
                .health_check()
                .await
                .map_err(|e| WorkflowError::Preflight(e.to_string()))?;
        }

        Ok(())
    }

    /// Run the workflow from a caller-built initial state.
    ///
    /// # Errors
    ///
    /// Fails only for unrecoverable adapter/store failures, a per-node
    /// timeout, or an exhausted step budget - never for a malformed model
    /// response.
    #[instrument(skip(self, initial), fields(run_id = %run_id))]
    pub async fn run(
        &self,
        initial: CampaignState,
        run_id: &RunId,
    ) -> Result<CampaignState, WorkflowError> {
        info!("Starting campaign run");
        self.drive(initial, NodeName::Supervisor, run_id).await
    }

    /// Continue a run from its latest checkpoint.
    ///
    /// A run whose terminal node already completed returns its terminal
    /// state without executing anything.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::UnknownRun`] when the store has no
    /// checkpoint for the id.
    #[instrument(skip(self), fields(run_id = %run_id))]
    pub async fn resume(&self, run_id: &RunId) -> Result<CampaignState, WorkflowError> {
        let checkpoint = self
            .store
            .load_latest(run_id)
            .await?
            .ok_or_else(|| WorkflowError::UnknownRun(run_id.to_string()))?;

        let start = next_node(checkpoint.node, checkpoint.state.computed_phase());
        info!(from = %checkpoint.node, next = %start, "Resuming campaign run");
        self.drive(checkpoint.state, start, run_id).await
    }

    /// The routing loop shared by `run` and `resume`.
    async fn drive(
        &self,
        mut state: CampaignState,
        mut current: NodeName,
        run_id: &RunId,
    ) -> Result<CampaignState, WorkflowError> {
        let timeout = Duration::from_millis(self.config.node_timeout_ms);

        for _ in 0..self.config.max_steps {
            let node: &dyn CampaignNode = match current {
                NodeName::Done => {
                    info!("Campaign run complete");
                    return Ok(state);
                }
                NodeName::Supervisor => &self.supervisor,
                NodeName::Research => &self.research,
                NodeName::Geo => &self.geo,
                NodeName::Copywriter => &self.copywriter,
                NodeName::Optimizer => &self.optimizer,
            };

            debug!(node = %current, "Running node");
            let update = tokio::time::timeout(timeout, node.run(&state))
                .await
                .map_err(|_| WorkflowError::NodeTimeout {
                    node: current,
                    timeout_ms: self.config.node_timeout_ms,
                })?
                .map_err(|source| WorkflowError::NodeFailed {
                    node: current,
                    source,
                })?;

            state.apply(update);
            self.store
                .save(&RunCheckpoint::new(run_id.clone(), current, state.clone()))
                .await?;

            current = next_node(current, state.computed_phase());
        }

        Err(WorkflowError::StepBudgetExhausted(self.config.max_steps))
    }
}

//! Node graph - names and conditional routing.
//!
//! The workflow is a small directed graph:
//!
//! ```text
//!                  ┌──────────────┐
//!                  │  SUPERVISOR  │  (phase computed from state)
//!                  └──────┬───────┘
//!        RESEARCH         │ COPYWRITING        OPTIMIZATION
//!      ┌──────────────────┼─────────────────────────┐
//!      ▼                  ▼                         ▼
//!  RESEARCH ──▶ GEO ──▶ COPYWRITER ──▶ OPTIMIZER ──▶ DONE
//! ```
//!
//! Routing is a pure function over (current node, computed phase), so it
//! can be tested exhaustively without executing any node.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::state::CampaignPhase;

/// A node in the campaign workflow graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeName {
    /// Entry node: stamps the computed phase and branches.
    Supervisor,
    /// Keyword and audience-location research.
    Research,
    /// Feeder-market city refinement.
    Geo,
    /// Ad copy generation.
    Copywriter,
    /// Budget estimation or rule-based optimization.
    Optimizer,
    /// Terminal marker; never executed.
    Done,
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeName::Supervisor => "supervisor",
            NodeName::Research => "research",
            NodeName::Geo => "geo",
            NodeName::Copywriter => "copywriter",
            NodeName::Optimizer => "optimizer",
            NodeName::Done => "done",
        };
        write!(f, "{name}")
    }
}

/// The transition table: which node runs after `current`, given the phase
/// computed from the post-node state.
///
/// Only the supervisor branches. The generation path is sequential, and the
/// optimization path jumps straight to the optimizer, short-circuiting
/// research, geo, and copywriting entirely.
#[must_use]
pub fn next_node(current: NodeName, phase: CampaignPhase) -> NodeName {
    match current {
        NodeName::Supervisor => match phase {
            CampaignPhase::Research => NodeName::Research,
            CampaignPhase::Copywriting => NodeName::Copywriter,
            CampaignPhase::Optimization => NodeName::Optimizer,
        },
        NodeName::Research => NodeName::Geo,
        NodeName::Geo => NodeName::Copywriter,
        NodeName::Copywriter => NodeName::Optimizer,
        NodeName::Optimizer | NodeName::Done => NodeName::Done,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_NODES: [NodeName; 6] = [
        NodeName::Supervisor,
        NodeName::Research,
        NodeName::Geo,
        NodeName::Copywriter,
        NodeName::Optimizer,
        NodeName::Done,
    ];

    const ALL_PHASES: [CampaignPhase; 3] = [
        CampaignPhase::Research,
        CampaignPhase::Copywriting,
        CampaignPhase::Optimization,
    ];

    #[test]
    fn supervisor_branches_by_phase() {
        assert_eq!(
            next_node(NodeName::Supervisor, CampaignPhase::Research),
            NodeName::Research
        );
        assert_eq!(
            next_node(NodeName::Supervisor, CampaignPhase::Copywriting),
            NodeName::Copywriter
        );
        assert_eq!(
            next_node(NodeName::Supervisor, CampaignPhase::Optimization),
            NodeName::Optimizer
        );
    }

    #[test]
    fn generation_path_is_sequential_regardless_of_phase() {
        for phase in ALL_PHASES {
            assert_eq!(next_node(NodeName::Research, phase), NodeName::Geo);
            assert_eq!(next_node(NodeName::Geo, phase), NodeName::Copywriter);
            assert_eq!(next_node(NodeName::Copywriter, phase), NodeName::Optimizer);
            assert_eq!(next_node(NodeName::Optimizer, phase), NodeName::Done);
        }
    }

    #[test]
    fn done_is_absorbing() {
        for phase in ALL_PHASES {
            assert_eq!(next_node(NodeName::Done, phase), NodeName::Done);
        }
    }

    #[test]
    fn routing_is_total() {
        // Every (node, phase) pair resolves without panicking.
        for node in ALL_NODES {
            for phase in ALL_PHASES {
                let _ = next_node(node, phase);
            }
        }
    }
}

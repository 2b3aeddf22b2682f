//! # hotelgraph-core
//!
//! Campaign workflow engine for LLM-driven hotel advertising.
//!
//! The engine threads one mutable [`CampaignState`] through a small
//! directed graph of nodes, merging each node's partial result through
//! per-field reducers and checkpointing after every step:
//!
//! ```text
//!                  ┌──────────────┐
//!                  │  SUPERVISOR  │
//!                  └──────┬───────┘
//!        RESEARCH         │ COPYWRITING        OPTIMIZATION
//!      ┌──────────────────┼─────────────────────────┐
//!      ▼                  ▼                         ▼
//!  RESEARCH ──▶ GEO ──▶ COPYWRITER ──▶ OPTIMIZER ──▶ DONE
//! ```
//!
//! Phase is computed from state content alone: metrics present means an
//! optimize-only pass (research, geo, and copywriting are skipped
//! entirely); otherwise keywords decide between the research and
//! copywriting entry points.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use hotelgraph_core::{CampaignEngine, CampaignState, EngineConfig, InMemoryStateStore, RunId};
//! use hotelgraph_llm::OpenAiCompletions;
//! use hotelgraph_search::TavilySearch;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = CampaignEngine::new(
//!         Arc::new(OpenAiCompletions::new("sk-...", "gpt-4o")),
//!         Some(Arc::new(TavilySearch::new("tvly-..."))),
//!         Arc::new(InMemoryStateStore::new()),
//!         EngineConfig::default(),
//!     );
//!
//!     let initial = CampaignState::seeded(serde_json::json!({
//!         "name": "Ocean View Resort",
//!         "location": "Maui, Hawaii",
//!     }));
//!     let run_id = RunId::for_campaign("Ocean View Resort");
//!
//!     let terminal = engine.run(initial, &run_id).await?;
//!     println!("{:?}", terminal.generation_report());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod nodes;
pub mod report;
pub mod schema;
pub mod state;
pub mod store;

pub use config::EngineConfig;
pub use engine::CampaignEngine;
pub use error::{NodeError, WorkflowError};
pub use graph::{next_node, NodeName};
pub use report::{GenerationReport, OptimizationReport};
pub use schema::{FieldKind, ParseError, ResponseSchema, SchemaField};
pub use state::{
    AdCopy, CampaignPhase, CampaignState, ChatMessage, MetricMap, MetricValue, Recommendation,
    RecommendedAction, StateUpdate,
};
pub use store::{InMemoryStateStore, RunCheckpoint, RunId, StateStore, StoreError};

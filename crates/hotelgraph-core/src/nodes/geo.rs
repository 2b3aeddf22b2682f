//! Geo node - feeder-market city refinement.
//!
//! The one node with additive semantics: discovered cities extend the
//! existing audience list instead of replacing it. On schema-validation
//! failure the audiences pass through untouched - no fallback substitution
//! here, unlike research.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use hotelgraph_llm::{CompletionAdapter, Message};

use crate::error::NodeError;
use crate::graph::NodeName;
use crate::nodes::CampaignNode;
use crate::schema::{FieldKind, ResponseSchema, SchemaField};
use crate::state::{CampaignPhase, CampaignState, StateUpdate};

const SYSTEM_PROMPT: &str = "You are a travel market analyst. Given a hotel and the audience locations \
already targeted, identify additional feeder-market cities: places whose residents are likely to \
travel to and book this hotel. Prefer cities with direct flights, high travel spending, and no \
overlap with the locations already listed.";

/// Extends `audiences` with additional feeder-market cities.
pub struct GeoNode {
    completion: Arc<dyn CompletionAdapter>,
    schema: ResponseSchema,
}

impl GeoNode {
    #[must_use]
    pub fn new(completion: Arc<dyn CompletionAdapter>) -> Self {
        Self {
            completion,
            schema: ResponseSchema::new(
                "geo",
                vec![SchemaField::new(
                    "cities",
                    FieldKind::StringList,
                    "List of 3-5 additional feeder-market cities to target",
                )],
            ),
        }
    }

    /// Existing audiences extended with `cities`, order-preserving and
    /// deduplicated, so replaying the same response is a no-op.
    fn extend_audiences(current: &[String], cities: Vec<String>) -> Vec<String> {
        let mut combined: Vec<String> = current.to_vec();
        for city in cities {
            if !combined.contains(&city) {
                combined.push(city);
            }
        }
        combined
    }
}

#[derive(serde::Deserialize)]
struct GeoOutput {
    cities: Vec<String>,
}

#[async_trait]
impl CampaignNode for GeoNode {
    fn name(&self) -> NodeName {
        NodeName::Geo
    }

    async fn run(&self, state: &CampaignState) -> Result<StateUpdate, NodeError> {
        if state.computed_phase() == CampaignPhase::Optimization {
            return Ok(StateUpdate::none());
        }

        let user = format!(
            "Hotel information: {}\n\
             Locations already targeted: {}\n\n\
             Suggest additional feeder-market cities.\n\n\
             {}",
            state.seed_description(),
            state.audiences.join(", "),
            self.schema.format_instructions()
        );

        let messages = vec![Message::system(SYSTEM_PROMPT), Message::user(user)];
        let completion = self.completion.complete(&messages).await?;

        match self.schema.parse::<GeoOutput>(&completion.content) {
            Ok(output) => Ok(StateUpdate {
                audiences: Some(Self::extend_audiences(&state.audiences, output.cities)),
                ..StateUpdate::default()
            }),
            Err(error) => {
                warn!(%error, schema = self.schema.name(), "Keeping audiences unchanged");
                Ok(StateUpdate::none())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotelgraph_llm::CannedCompletions;
    use crate::state::MetricMap;

    fn state_with_audiences(audiences: &[&str]) -> CampaignState {
        let mut state = CampaignState::seeded(serde_json::json!({"name": "Harbor Inn"}));
        state.keywords = vec!["harbor boutique hotel".into()];
        state.audiences = audiences.iter().map(ToString::to_string).collect();
        state
    }

    #[tokio::test]
    async fn appends_new_cities_to_existing_audiences() {
        let completion = Arc::new(CannedCompletions::new(vec![
            r#"{"cities": ["Toronto", "Dublin"]}"#,
        ]));
        let node = GeoNode::new(completion);
        let state = state_with_audiences(&["Boston"]);

        let update = node.run(&state).await.unwrap();
        assert_eq!(
            update.audiences,
            Some(vec!["Boston".into(), "Toronto".into(), "Dublin".into()])
        );
    }

    #[tokio::test]
    async fn replaying_the_same_response_is_idempotent() {
        let response = r#"{"cities": ["Toronto", "Dublin"]}"#;
        let completion = Arc::new(CannedCompletions::new(vec![response, response]));
        let node = GeoNode::new(completion);

        let mut state = state_with_audiences(&["Boston"]);
        let first = node.run(&state).await.unwrap();
        state.apply(first);

        let second = node.run(&state).await.unwrap();
        let audiences = second.audiences.unwrap();
        assert_eq!(audiences, state.audiences);
        assert_eq!(audiences.len(), 3);
    }

    #[tokio::test]
    async fn parse_failure_leaves_audiences_untouched() {
        let completion = Arc::new(CannedCompletions::new(vec!["try Toronto and Dublin"]));
        let node = GeoNode::new(completion);
        let mut state = state_with_audiences(&["Boston"]);

        let update = node.run(&state).await.unwrap();
        assert!(update.audiences.is_none());

        state.apply(update);
        assert_eq!(state.audiences, vec!["Boston".to_string()]);
    }

    #[tokio::test]
    async fn is_a_no_op_during_optimization() {
        let completion = Arc::new(CannedCompletions::unreachable());
        let node = GeoNode::new(completion.clone());
        let metrics: MetricMap = [("ROAS", 400.0)].into_iter().collect();
        let state = CampaignState::for_optimization(metrics);

        let update = node.run(&state).await.unwrap();
        assert!(update.audiences.is_none());
        assert_eq!(completion.call_count(), 0);
    }
}

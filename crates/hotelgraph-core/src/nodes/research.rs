//! Research node - keyword and audience-location generation.
//!
//! Optionally gathers market context through the search adapter, then asks
//! the completion service for targeted keywords and feeder-market
//! locations under a two-field schema. A response that fails schema
//! validation is replaced by deterministic, content-safe defaults; the run
//! continues either way.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use hotelgraph_llm::{CompletionAdapter, Message};
use hotelgraph_search::SearchAdapter;

use crate::error::NodeError;
use crate::graph::NodeName;
use crate::nodes::CampaignNode;
use crate::schema::{FieldKind, ResponseSchema, SchemaField};
use crate::state::{CampaignPhase, CampaignState, StateUpdate};

const SYSTEM_PROMPT: &str = "You are a Google SEM expert specializing in luxury hotel marketing. Your task is to:\n\
1. Generate 5-10 highly specific, long-tail keywords that will maximize ROAS\n\
2. Identify 3-5 specific geographic locations (feeder markets) to target\n\n\
Guidelines:\n\
- Keywords should focus on luxury travel, unique experiences, and high-value amenities\n\
- Target locations should be wealthy areas or cities with high travel spending\n\
- Consider both domestic and international markets where relevant\n\
- Focus on locations with direct flights or easy access to the hotel";

/// Deterministic keyword fallback used when the model response fails
/// schema validation. Never empty.
const FALLBACK_KEYWORDS: [&str; 5] = [
    "luxury hotel experience",
    "5-star hotel accommodation",
    "premium city hotel",
    "luxury weekend getaway",
    "exclusive hotel suite",
];

/// Generates `keywords` and `audiences` from the seed hotel description.
pub struct ResearchNode {
    completion: Arc<dyn CompletionAdapter>,
    search: Option<Arc<dyn SearchAdapter>>,
    schema: ResponseSchema,
}

impl ResearchNode {
    #[must_use]
    pub fn new(
        completion: Arc<dyn CompletionAdapter>,
        search: Option<Arc<dyn SearchAdapter>>,
    ) -> Self {
        Self {
            completion,
            search,
            schema: ResponseSchema::new(
                "research",
                vec![
                    SchemaField::new(
                        "keywords",
                        FieldKind::StringList,
                        "List of 5-10 targeted keywords for the campaign",
                    ),
                    SchemaField::new(
                        "audienceLocations",
                        FieldKind::StringList,
                        "List of specific locations to target",
                    ),
                ],
            ),
        }
    }

    /// Fetch market context for the hotel, when a search adapter is
    /// configured. Search failures are adapter failures: fatal to the run.
    async fn market_context(&self, hotel_name: &str) -> Result<Option<String>, NodeError> {
        let Some(search) = &self.search else {
            return Ok(None);
        };

        let query = format!("{hotel_name} hotel reviews location amenities luxury market analysis");
        let hits = search.search(&query).await?;
        debug!(hits = hits.len(), "Market research returned");

        let context = hits
            .iter()
            .map(|hit| format!("- {}: {}", hit.title, hit.snippet))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(Some(context))
    }

    fn build_prompts(&self, state: &CampaignState, context: Option<&str>) -> Vec<Message> {
        let mut system = SYSTEM_PROMPT.to_string();
        if let Some(context) = context {
            system.push_str("\n\nUse this market research data to inform your decisions:\n");
            system.push_str(context);
        }

        let user = format!(
            "Based on this hotel information: {}\n\
             generate targeted keywords and identify specific audience locations.\n\n\
             Requirements:\n\
             - Keywords should be specific and focused on high ROAS\n\
             - Locations should be specific cities or regions that are likely to be profitable feeder markets\n\n\
             {}",
            state.seed_description(),
            self.schema.format_instructions()
        );

        vec![Message::system(system), Message::user(user)]
    }
}

/// Location fallback: seeded off the hotel's own location so New-York-area
/// properties target their real feeder markets, everything else gets the
/// largest origin cities.
fn fallback_locations(hotel_location: &str) -> Vec<String> {
    let cities: [&str; 5] = if hotel_location.contains("New York") {
        ["Boston", "Philadelphia", "Washington DC", "Toronto", "London"]
    } else {
        ["New York City", "Los Angeles", "Chicago", "Miami", "London"]
    };
    cities.iter().map(ToString::to_string).collect()
}

#[derive(serde::Deserialize)]
struct ResearchOutput {
    keywords: Vec<String>,
    #[serde(rename = "audienceLocations")]
    audiences: Vec<String>,
}

#[async_trait]
impl CampaignNode for ResearchNode {
    fn name(&self) -> NodeName {
        NodeName::Research
    }

    async fn run(&self, state: &CampaignState) -> Result<StateUpdate, NodeError> {
        if state.computed_phase() == CampaignPhase::Optimization {
            return Ok(StateUpdate::none());
        }

        let info = state.seed_info();
        let hotel_name = info
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or("the hotel")
            .to_string();

        let context = self.market_context(&hotel_name).await?;
        let messages = self.build_prompts(state, context.as_deref());
        let completion = self.completion.complete(&messages).await?;

        match self.schema.parse::<ResearchOutput>(&completion.content) {
            Ok(output) => Ok(StateUpdate {
                keywords: Some(output.keywords),
                audiences: Some(output.audiences),
                ..StateUpdate::default()
            }),
            Err(error) => {
                warn!(%error, schema = self.schema.name(), "Falling back to default keywords and locations");
                let hotel_location = info.get("location").and_then(|v| v.as_str()).unwrap_or("");
                Ok(StateUpdate {
                    keywords: Some(FALLBACK_KEYWORDS.iter().map(ToString::to_string).collect()),
                    audiences: Some(fallback_locations(hotel_location)),
                    ..StateUpdate::default()
                })
            }
        }
    }
}

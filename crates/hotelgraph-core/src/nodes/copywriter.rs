//! Copywriter node - ad copy generation.
//!
//! Requests a configurable number of ad variations under explicit length
//! constraints (headline 30 characters, body 90), enforced by prompt
//! instruction rather than re-validated programmatically. On
//! schema-validation failure two hand-authored ads templated on the hotel
//! name are substituted, so a generation run always yields usable copy.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use hotelgraph_llm::{CompletionAdapter, Message};

use crate::error::NodeError;
use crate::graph::NodeName;
use crate::nodes::CampaignNode;
use crate::schema::{FieldKind, ResponseSchema, SchemaField};
use crate::state::{AdCopy, CampaignPhase, CampaignState, StateUpdate};

const SYSTEM_PROMPT: &str = "You are an expert ad copywriter specializing in Google Ads for luxury hotels. \
Your task is to create compelling ad copies that:\n\
1. Match the search intent of the targeted keywords\n\
2. Highlight unique selling points and luxury amenities\n\
3. Include emotional triggers and create a sense of exclusivity\n\
4. Follow Google Ads best practices and character limits\n\n\
Each ad copy must have:\n\
- A compelling headline (max 30 characters)\n\
- Engaging body text (max 90 characters)\n\
- Clear call to action\n\
- Focus on luxury and unique experiences";

/// Generates `ad_copies` from keywords, audiences, and the seed description.
pub struct CopywriterNode {
    completion: Arc<dyn CompletionAdapter>,
    variations: u8,
    schema: ResponseSchema,
}

impl CopywriterNode {
    #[must_use]
    pub fn new(completion: Arc<dyn CompletionAdapter>, variations: u8) -> Self {
        Self {
            completion,
            variations,
            schema: ResponseSchema::new(
                "copywriter",
                vec![SchemaField::new(
                    "adCopies",
                    FieldKind::AdCopyList,
                    "List of ad copy variations, each with headline and body",
                )],
            ),
        }
    }
}

/// Hand-authored substitutes used when the model response fails schema
/// validation.
fn fallback_copies(hotel_name: &str) -> Vec<AdCopy> {
    vec![
        AdCopy {
            headline: format!("Luxury Stay at {hotel_name}"),
            body: "Experience timeless elegance and world-class service. Book your stay today."
                .to_string(),
        },
        AdCopy {
            headline: format!("{hotel_name}: Book Direct"),
            body: "Exclusive rates and premium perks for direct bookings. Reserve now.".to_string(),
        },
    ]
}

#[derive(serde::Deserialize)]
struct CopywriterOutput {
    #[serde(rename = "adCopies")]
    ad_copies: Vec<AdCopy>,
}

#[async_trait]
impl CampaignNode for CopywriterNode {
    fn name(&self) -> NodeName {
        NodeName::Copywriter
    }

    async fn run(&self, state: &CampaignState) -> Result<StateUpdate, NodeError> {
        if state.computed_phase() == CampaignPhase::Optimization {
            return Ok(StateUpdate::none());
        }

        let user = format!(
            "Create luxury hotel ad copies for: {}\n\n\
             Using these keywords: {}\n\
             Targeting these locations: {}\n\n\
             Requirements:\n\
             - Create {} unique ad variations\n\
             - Each ad should be tailored to luxury travelers\n\
             - Include unique selling points and amenities\n\
             - Strictly follow character limits:\n\
               * Headlines: 30 characters max\n\
               * Body: 90 characters max\n\n\
             {}",
            state.seed_description(),
            state.keywords.join(", "),
            state.audiences.join(", "),
            self.variations,
            self.schema.format_instructions()
        );

        let messages = vec![Message::system(SYSTEM_PROMPT), Message::user(user)];
        let completion = self.completion.complete(&messages).await?;

        match self.schema.parse::<CopywriterOutput>(&completion.content) {
            Ok(output) => Ok(StateUpdate {
                ad_copies: Some(output.ad_copies),
                ..StateUpdate::default()
            }),
            Err(error) => {
                warn!(%error, schema = self.schema.name(), "Substituting fallback ad copies");
                let info = state.seed_info();
                let hotel_name = info
                    .get("name")
                    .and_then(|v| v.as_str())
                    .unwrap_or("Your Hotel");
                Ok(StateUpdate {
                    ad_copies: Some(fallback_copies(hotel_name)),
                    ..StateUpdate::default()
                })
            }
        }
    }
}

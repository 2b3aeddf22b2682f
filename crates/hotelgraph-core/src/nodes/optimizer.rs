//! Optimizer node - budget estimation and rule-based optimization.
//!
//! Two policies, keyed by the computed phase:
//!
//! - **Generation path**: ask the completion service for a recommended
//!   daily budget and take the first numeric token of the response,
//!   falling back to [`DEFAULT_DAILY_BUDGET`] when no number appears.
//! - **Optimization path**: no LLM call at all - [`optimize`] is a pure
//!   function of the metrics, applying fixed-threshold rules in declared
//!   order (the low-CTR check takes precedence over the high-ROAS check).

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use hotelgraph_llm::{CompletionAdapter, Message};

use crate::error::NodeError;
use crate::graph::NodeName;
use crate::nodes::CampaignNode;
use crate::state::{
    CampaignPhase, CampaignState, MetricMap, Recommendation, RecommendedAction, StateUpdate,
};

/// CTR below this is underperforming: reduce the bid.
pub const LOW_CTR_THRESHOLD: f64 = 2.0;
/// ROAS above this has headroom: increase the budget.
pub const HIGH_ROAS_THRESHOLD: f64 = 300.0;
/// Bid multiplier applied by the reduce-bid rule.
pub const BID_REDUCTION_FACTOR: f64 = 0.9;
/// Budget multiplier applied by the increase-budget rule.
pub const BUDGET_INCREASE_FACTOR: f64 = 1.1;
/// Daily budget used when the model response yields no parseable number.
pub const DEFAULT_DAILY_BUDGET: f64 = 500.0;

const SYSTEM_PROMPT: &str = "You are a Google Ads budget optimization expert for luxury hotels. \
Analyze the hotel information and campaign targeting to recommend an initial daily budget that will:\n\
1. Maximize ROAS for a luxury hotel audience\n\
2. Ensure sufficient impression share in competitive markets\n\
3. Account for high-value keyword competition and costs\n\
4. Consider the target locations and their typical CPCs\n\n\
For luxury hotels, consider:\n\
- Higher average CPCs for luxury travel keywords\n\
- Higher conversion value due to room rates\n\
- Competitive bidding in prime locations\n\
- Seasonal variations in demand";

/// Sets `daily_budget` (generation) or produces a [`Recommendation`]
/// (optimization).
pub struct OptimizerNode {
    completion: Arc<dyn CompletionAdapter>,
}

impl OptimizerNode {
    #[must_use]
    pub fn new(completion: Arc<dyn CompletionAdapter>) -> Self {
        Self { completion }
    }

    async fn estimate_budget(&self, state: &CampaignState) -> Result<StateUpdate, NodeError> {
        let user = format!(
            "Based on:\n\
             - Hotel: {}\n\
             - Keywords: {}\n\
             - Target Locations: {}\n\n\
             Recommend a daily budget for this luxury hotel campaign.\n\
             Consider the competitive landscape and high-value nature of luxury hotel keywords.\n\
             Return only the number (e.g., \"500\" for $500/day).",
            state.seed_description(),
            state.keywords.join(", "),
            state.audiences.join(", ")
        );

        let messages = vec![Message::system(SYSTEM_PROMPT), Message::user(user)];
        let completion = self.completion.complete(&messages).await?;

        let daily_budget = match parse_budget(&completion.content) {
            Some(budget) => budget,
            None => {
                warn!(
                    response = %completion.content,
                    "No numeric budget in response, using default"
                );
                DEFAULT_DAILY_BUDGET
            }
        };

        Ok(StateUpdate {
            daily_budget: Some(daily_budget),
            ..StateUpdate::default()
        })
    }
}

/// Extract the first numeric token (digits with an optional decimal point)
/// from free-form model text.
#[must_use]
pub fn parse_budget(text: &str) -> Option<f64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let token: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    token.trim_end_matches('.').parse().ok()
}

/// Rule-based optimization: a pure function of the metrics.
///
/// Rules fire first-match in declared order; thresholds and multipliers are
/// fixed constants. Absent `currentBid`/`currentBudget` values scale to 0.
#[must_use]
pub fn optimize(metrics: &MetricMap) -> Recommendation {
    if let Some(ctr) = metrics.number("CTR") {
        if ctr < LOW_CTR_THRESHOLD {
            let new_bid = metrics.number("currentBid").unwrap_or(0.0) * BID_REDUCTION_FACTOR;
            return Recommendation {
                action: RecommendedAction::ReduceBid,
                new_bid: Some(new_bid),
                new_budget: None,
                message: format!("CTR {ctr} is below {LOW_CTR_THRESHOLD}; reduce bid to {new_bid:.2}"),
            };
        }
    }

    if let Some(roas) = metrics.number("ROAS") {
        if roas > HIGH_ROAS_THRESHOLD {
            let new_budget =
                metrics.number("currentBudget").unwrap_or(0.0) * BUDGET_INCREASE_FACTOR;
            return Recommendation {
                action: RecommendedAction::IncreaseBudget,
                new_bid: None,
                new_budget: Some(new_budget),
                message: format!(
                    "ROAS {roas} is above {HIGH_ROAS_THRESHOLD}; increase budget to {new_budget:.2}"
                ),
            };
        }
    }

    Recommendation {
        action: RecommendedAction::Maintain,
        new_bid: None,
        new_budget: None,
        message: "Campaign performance is within acceptable range".to_string(),
    }
}

#[async_trait]
impl CampaignNode for OptimizerNode {
    fn name(&self) -> NodeName {
        NodeName::Optimizer
    }

    async fn run(&self, state: &CampaignState) -> Result<StateUpdate, NodeError> {
        if state.computed_phase() != CampaignPhase::Optimization {
            return self.estimate_budget(state).await;
        }

        let recommendation = optimize(&state.metrics);
        debug!(action = ?recommendation.action, "Optimizer decision");

        // Mirror the advice into the metric map (shallow-merged, so the
        // caller's input metrics survive untouched alongside it).
        let mut delta = MetricMap::new();
        if let Some(new_bid) = recommendation.new_bid {
            delta.insert("newBid", new_bid);
        }
        if let Some(new_budget) = recommendation.new_budget {
            delta.insert("newBudget", new_budget);
        }

        Ok(StateUpdate {
            metrics: Some(delta),
            recommendation: Some(recommendation),
            ..StateUpdate::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotelgraph_llm::CannedCompletions;

    fn metrics(pairs: &[(&str, f64)]) -> MetricMap {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn low_ctr_takes_precedence_over_high_roas() {
        let rec = optimize(&metrics(&[
            ("CTR", 1.0),
            ("ROAS", 400.0),
            ("currentBid", 10.0),
            ("currentBudget", 100.0),
        ]));

        assert_eq!(rec.action, RecommendedAction::ReduceBid);
        assert_eq!(rec.new_bid, Some(9.0));
        assert_eq!(rec.new_budget, None);
    }

    #[test]
    fn high_roas_increases_budget_when_ctr_is_healthy() {
        let rec = optimize(&metrics(&[("ROAS", 400.0), ("currentBudget", 100.0)]));

        assert_eq!(rec.action, RecommendedAction::IncreaseBudget);
        let new_budget = rec.new_budget.unwrap();
        assert!((new_budget - 110.0).abs() < 1e-9);
    }

    #[test]
    fn in_range_metrics_maintain() {
        let rec = optimize(&metrics(&[("CTR", 5.0), ("ROAS", 100.0)]));

        assert_eq!(rec.action, RecommendedAction::Maintain);
        assert_eq!(rec.new_bid, None);
        assert_eq!(rec.new_budget, None);
        assert!(rec.message.contains("acceptable range"));
    }

    #[test]
    fn absent_bid_scales_to_zero() {
        let rec = optimize(&metrics(&[("CTR", 1.5)]));
        assert_eq!(rec.action, RecommendedAction::ReduceBid);
        assert_eq!(rec.new_bid, Some(0.0));
    }

    #[test]
    fn budget_parsing_takes_first_numeric_token() {
        assert_eq!(parse_budget("500"), Some(500.0));
        assert_eq!(parse_budget("I recommend $750 per day."), Some(750.0));
        assert_eq!(parse_budget("Spend 425.50 daily"), Some(425.5));
        assert_eq!(parse_budget("I recommend increasing spend"), None);
    }

    #[tokio::test]
    async fn generation_path_sets_parsed_budget() {
        let completion = Arc::new(CannedCompletions::new(vec!["650"]));
        let node = OptimizerNode::new(completion);
        let mut state = CampaignState::seeded(serde_json::json!({"name": "Harbor Inn"}));
        state.keywords = vec!["harbor suite".into()];

        let update = node.run(&state).await.unwrap();
        assert_eq!(update.daily_budget, Some(650.0));
    }

    #[tokio::test]
    async fn generation_path_defaults_when_unparseable() {
        let completion = Arc::new(CannedCompletions::new(vec!["I recommend increasing spend"]));
        let node = OptimizerNode::new(completion);
        let mut state = CampaignState::seeded(serde_json::json!({"name": "Harbor Inn"}));
        state.keywords = vec!["harbor suite".into()];

        let update = node.run(&state).await.unwrap();
        assert_eq!(update.daily_budget, Some(DEFAULT_DAILY_BUDGET));
    }

    #[tokio::test]
    async fn optimization_path_is_pure_and_merges_advice_into_metrics() {
        let completion = Arc::new(CannedCompletions::unreachable());
        let node = OptimizerNode::new(completion.clone());
        let mut state =
            CampaignState::for_optimization(metrics(&[("CTR", 1.0), ("currentBid", 10.0)]));

        let update = node.run(&state).await.unwrap();
        assert_eq!(completion.call_count(), 0);

        state.apply(update);
        assert_eq!(state.metrics.number("newBid"), Some(9.0));
        assert_eq!(state.metrics.number("CTR"), Some(1.0));
        assert_eq!(
            state.recommendation.as_ref().map(|r| r.action),
            Some(RecommendedAction::ReduceBid)
        );
    }

    #[tokio::test]
    async fn maintain_passes_metrics_through_unchanged() {
        let completion = Arc::new(CannedCompletions::unreachable());
        let node = OptimizerNode::new(completion);
        let input = metrics(&[("CTR", 5.0), ("ROAS", 100.0)]);
        let mut state = CampaignState::for_optimization(input.clone());

        let update = node.run(&state).await.unwrap();
        state.apply(update);

        assert_eq!(state.metrics, input);
        assert_eq!(
            state.recommendation.map(|r| r.action),
            Some(RecommendedAction::Maintain)
        );
    }
}

//! Result shapes consumed by the outer HTTP layer.
//!
//! The engine's caller serializes one of these two records, depending on
//! which kind of run it started. Serialized field names match the public
//! API's camelCase wire format.

use serde::{Deserialize, Serialize};

use crate::state::{AdCopy, CampaignState, MetricMap, Recommendation};

/// Terminal result of a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    pub keywords: Vec<String>,
    pub ad_copies: Vec<AdCopy>,
    pub audience_locations: Vec<String>,
    pub daily_budget: f64,
}

/// Terminal result of an optimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationReport {
    pub metrics: MetricMap,
    pub recommendations: Option<Recommendation>,
}

impl CampaignState {
    /// Extract the generation result from terminal state.
    #[must_use]
    pub fn generation_report(&self) -> GenerationReport {
        GenerationReport {
            keywords: self.keywords.clone(),
            ad_copies: self.ad_copies.clone(),
            audience_locations: self.audiences.clone(),
            daily_budget: self.daily_budget,
        }
    }

    /// Extract the optimization result from terminal state.
    #[must_use]
    pub fn optimization_report(&self) -> OptimizationReport {
        OptimizationReport {
            metrics: self.metrics.clone(),
            recommendations: self.recommendation.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_report_serializes_camel_case() {
        let mut state = CampaignState::default();
        state.keywords = vec!["kw".into()];
        state.ad_copies = vec![AdCopy {
            headline: "H".into(),
            body: "B".into(),
        }];
        state.audiences = vec!["Boston".into()];
        state.daily_budget = 500.0;

        let json = serde_json::to_value(state.generation_report()).unwrap();
        assert_eq!(json["keywords"][0], "kw");
        assert_eq!(json["adCopies"][0]["headline"], "H");
        assert_eq!(json["audienceLocations"][0], "Boston");
        assert_eq!(json["dailyBudget"], 500.0);
    }

    #[test]
    fn optimization_report_carries_metrics_and_advice() {
        use crate::nodes::optimize;
        use crate::state::{MetricMap, StateUpdate};

        let metrics: MetricMap = [("ROAS", 400.0), ("currentBudget", 100.0)]
            .into_iter()
            .collect();
        let mut state = CampaignState::for_optimization(metrics);
        let recommendation = optimize(&state.metrics);
        state.apply(StateUpdate {
            recommendation: Some(recommendation),
            ..StateUpdate::default()
        });

        let report = state.optimization_report();
        assert!(report.recommendations.is_some());
        assert_eq!(report.metrics.number("ROAS"), Some(400.0));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["recommendations"]["action"], "increaseBudget");
    }
}

//! Campaign state - the single mutable record threaded through a run.
//!
//! Nodes never mutate state directly. Each node returns a [`StateUpdate`]
//! (a partial record) and [`CampaignState::apply`] merges it through the
//! field's declared reducer:
//!
//! | Field | Reducer |
//! |-------|---------|
//! | `messages` | append, deduplicated by message id |
//! | `keywords` | replace |
//! | `audiences` | replace (the geo node returns prev ∪ new itself) |
//! | `ad_copies` | replace |
//! | `daily_budget` | replace |
//! | `metrics` | shallow-merge (new keys overwrite, others preserved) |
//! | `recommendation` | replace |
//! | `phase` | replace |
//!
//! Fields an update does not carry are left untouched, so adding a node
//! never requires engine changes - only a new `StateUpdate` producer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use hotelgraph_llm::{Message, Role};

// ============================================================================
// CHAT MESSAGES
// ============================================================================

/// A role-tagged text block in the campaign's message history.
///
/// The id is the message's identity for the append reducer: replaying a
/// message that is already in history is a no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Stable identity used by the append reducer.
    pub id: Uuid,
    /// Role of the message sender.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Convert to the completion adapter's message type.
    #[must_use]
    pub fn to_completion(&self) -> Message {
        Message {
            role: self.role,
            content: self.content.clone(),
        }
    }
}

// ============================================================================
// AD COPY
// ============================================================================

/// One generated ad variation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdCopy {
    /// Ad headline text (prompt-constrained to 30 characters).
    pub headline: String,
    /// Ad body text (prompt-constrained to 90 characters).
    pub body: String,
}

// ============================================================================
// METRICS
// ============================================================================

/// A single named metric value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// Numeric metric (CTR, ROAS, bids, budgets).
    Number(f64),
    /// Free-text metric.
    Text(String),
}

impl From<f64> for MetricValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for MetricValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Ordered mapping of named campaign metrics.
///
/// Well-known keys: `CTR`, `ROAS`, `currentBid`, `currentBudget`, and -
/// written by the optimizer - `newBid` and `newBudget`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricMap(BTreeMap<String, MetricValue>);

impl MetricMap {
    /// Create an empty metric map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether the map holds no metrics.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of metrics present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Insert or overwrite a metric.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetricValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up a metric by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MetricValue> {
        self.0.get(key)
    }

    /// Look up a numeric metric by name.
    #[must_use]
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.0.get(key) {
            Some(MetricValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Shallow-merge: keys from `incoming` overwrite matching keys here,
    /// all other keys are preserved.
    pub fn merge(&mut self, incoming: MetricMap) {
        for (key, value) in incoming.0 {
            self.0.insert(key, value);
        }
    }

    /// Iterate over metrics in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &MetricValue)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<MetricValue>> FromIterator<(K, V)> for MetricMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// ============================================================================
// OPTIMIZER RECOMMENDATION
// ============================================================================

/// Action recommended by the rule-based optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecommendedAction {
    /// Click-through rate is below threshold; lower the bid.
    ReduceBid,
    /// Return on ad spend is above threshold; raise the budget.
    IncreaseBudget,
    /// Performance is within acceptable range; change nothing.
    Maintain,
}

/// Structured advice produced by the optimization path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// What the caller should do.
    pub action: RecommendedAction,
    /// New bid, when the action is a bid change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_bid: Option<f64>,
    /// New daily budget, when the action is a budget change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_budget: Option<f64>,
    /// Human-readable summary of the decision.
    pub message: String,
}

// ============================================================================
// CAMPAIGN PHASE
// ============================================================================

/// The workflow's current stage, derived from state content alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignPhase {
    /// No keywords yet: the run still needs market research.
    Research,
    /// Keywords present, no metrics: the run needs ad copy and a budget.
    Copywriting,
    /// Metrics present: the run is an optimize-only pass.
    Optimization,
}

// ============================================================================
// CAMPAIGN STATE
// ============================================================================

/// The single mutable record threaded through a workflow run.
///
/// Owned by exactly one run: created from caller seed data, merged after
/// every node, and no longer mutated once the terminal node returns.
/// Checkpointed snapshots keyed by run id may still be read afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CampaignState {
    /// Ordered message history (seed description first).
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    /// Targeted campaign keywords.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Feeder-market locations / audience segments.
    #[serde(default, alias = "audienceLocations")]
    pub audiences: Vec<String>,
    /// Generated ad variations.
    #[serde(default, alias = "adCopies")]
    pub ad_copies: Vec<AdCopy>,
    /// Recommended daily budget.
    #[serde(default, alias = "dailyBudget")]
    pub daily_budget: f64,
    /// Named campaign performance metrics.
    #[serde(default)]
    pub metrics: MetricMap,
    /// Optimizer advice, present after an optimization pass.
    #[serde(default)]
    pub recommendation: Option<Recommendation>,
    /// Phase last stamped by the supervisor (routing re-derives it).
    #[serde(default, alias = "campaignPhase")]
    pub phase: Option<CampaignPhase>,
}

impl CampaignState {
    /// Build the initial state for a generation run: one user message
    /// carrying the hotel description, everything else empty.
    #[must_use]
    pub fn seeded(hotel_info: serde_json::Value) -> Self {
        Self {
            messages: vec![ChatMessage::user(hotel_info.to_string())],
            ..Self::default()
        }
    }

    /// Build the initial state for an optimize-only run.
    #[must_use]
    pub fn for_optimization(metrics: MetricMap) -> Self {
        Self {
            metrics,
            ..Self::default()
        }
    }

    /// The seed hotel description (content of the first message).
    #[must_use]
    pub fn seed_description(&self) -> &str {
        self.messages.first().map_or("", |m| m.content.as_str())
    }

    /// The seed hotel description parsed as JSON, when it is JSON.
    #[must_use]
    pub fn seed_info(&self) -> serde_json::Value {
        serde_json::from_str(self.seed_description()).unwrap_or(serde_json::Value::Null)
    }

    /// Resolve the phase from state content alone: optimization whenever
    /// metrics are present, else research until keywords exist, else
    /// copywriting.
    #[must_use]
    pub fn computed_phase(&self) -> CampaignPhase {
        if !self.metrics.is_empty() {
            CampaignPhase::Optimization
        } else if self.keywords.is_empty() {
            CampaignPhase::Research
        } else {
            CampaignPhase::Copywriting
        }
    }

    /// Merge a node's partial update through the per-field reducers.
    pub fn apply(&mut self, update: StateUpdate) {
        if let Some(messages) = update.messages {
            reducers::append_by_id(&mut self.messages, messages);
        }
        if let Some(keywords) = update.keywords {
            reducers::replace(&mut self.keywords, keywords);
        }
        if let Some(audiences) = update.audiences {
            reducers::replace(&mut self.audiences, audiences);
        }
        if let Some(ad_copies) = update.ad_copies {
            reducers::replace(&mut self.ad_copies, ad_copies);
        }
        if let Some(daily_budget) = update.daily_budget {
            reducers::replace(&mut self.daily_budget, daily_budget);
        }
        if let Some(metrics) = update.metrics {
            reducers::shallow_merge(&mut self.metrics, metrics);
        }
        if let Some(recommendation) = update.recommendation {
            reducers::replace(&mut self.recommendation, Some(recommendation));
        }
        if let Some(phase) = update.phase {
            reducers::replace(&mut self.phase, Some(phase));
        }
    }
}

// ============================================================================
// STATE UPDATE
// ============================================================================

/// Partial state returned by a node; absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct StateUpdate {
    pub messages: Option<Vec<ChatMessage>>,
    pub keywords: Option<Vec<String>>,
    pub audiences: Option<Vec<String>>,
    pub ad_copies: Option<Vec<AdCopy>>,
    pub daily_budget: Option<f64>,
    pub metrics: Option<MetricMap>,
    pub recommendation: Option<Recommendation>,
    pub phase: Option<CampaignPhase>,
}

impl StateUpdate {
    /// An update that changes nothing (pass-through node result).
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }
}

// ============================================================================
// REDUCERS
// ============================================================================

mod reducers {
    use super::{ChatMessage, MetricMap};

    /// Latest value wins.
    pub fn replace<T>(slot: &mut T, next: T) {
        *slot = next;
    }

    /// Append incoming messages, skipping ids already in history. History
    /// is never truncated or reordered.
    pub fn append_by_id(history: &mut Vec<ChatMessage>, incoming: Vec<ChatMessage>) {
        for message in incoming {
            if !history.iter().any(|m| m.id == message.id) {
                history.push(message);
            }
        }
    }

    /// Shallow-merge: incoming keys overwrite, other keys are preserved.
    pub fn shallow_merge(current: &mut MetricMap, incoming: MetricMap) {
        current.merge(incoming);
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_is_research_while_keywords_empty() {
        let state = CampaignState::seeded(serde_json::json!({"name": "Harbor Inn"}));
        assert_eq!(state.computed_phase(), CampaignPhase::Research);
    }

    #[test]
    fn phase_is_copywriting_once_keywords_exist() {
        let mut state = CampaignState::seeded(serde_json::json!({"name": "Harbor Inn"}));
        state.apply(StateUpdate {
            keywords: Some(vec!["boutique harbor hotel".into()]),
            ..StateUpdate::default()
        });
        assert_eq!(state.computed_phase(), CampaignPhase::Copywriting);
    }

    #[test]
    fn phase_is_optimization_whenever_metrics_present() {
        let mut state = CampaignState::for_optimization(
            [("CTR", 1.5)].into_iter().collect::<MetricMap>(),
        );
        // Other fields do not matter once metrics exist.
        state.keywords = vec!["ignored".into()];
        assert_eq!(state.computed_phase(), CampaignPhase::Optimization);
    }

    #[test]
    fn message_reducer_appends_and_dedups_by_id() {
        let mut state = CampaignState::default();
        let first = ChatMessage::user("seed");
        let second = ChatMessage::assistant("reply");

        state.apply(StateUpdate {
            messages: Some(vec![first.clone()]),
            ..StateUpdate::default()
        });
        state.apply(StateUpdate {
            messages: Some(vec![first.clone(), second.clone()]),
            ..StateUpdate::default()
        });

        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[0].id, first.id);
        assert_eq!(state.messages[1].id, second.id);
    }

    #[test]
    fn replace_reducer_drops_previous_value() {
        let mut state = CampaignState::default();
        state.apply(StateUpdate {
            keywords: Some(vec!["old".into()]),
            ..StateUpdate::default()
        });
        state.apply(StateUpdate {
            keywords: Some(vec!["new".into()]),
            ..StateUpdate::default()
        });
        assert_eq!(state.keywords, vec!["new".to_string()]);
    }

    #[test]
    fn metrics_shallow_merge_preserves_unrelated_keys() {
        let mut state =
            CampaignState::for_optimization([("CTR", 1.0), ("ROAS", 400.0)].into_iter().collect());

        state.apply(StateUpdate {
            metrics: Some([("newBid", 9.0), ("CTR", 1.2)].into_iter().collect()),
            ..StateUpdate::default()
        });

        assert_eq!(state.metrics.number("CTR"), Some(1.2));
        assert_eq!(state.metrics.number("ROAS"), Some(400.0));
        assert_eq!(state.metrics.number("newBid"), Some(9.0));
    }

    #[test]
    fn absent_fields_are_untouched() {
        let mut state = CampaignState::default();
        state.keywords = vec!["kept".into()];
        state.daily_budget = 250.0;

        state.apply(StateUpdate {
            audiences: Some(vec!["Boston".into()]),
            ..StateUpdate::default()
        });

        assert_eq!(state.keywords, vec!["kept".to_string()]);
        assert_eq!(state.daily_budget, 250.0);
        assert_eq!(state.audiences, vec!["Boston".to_string()]);
    }

    #[test]
    fn seed_info_parses_json_seed() {
        let state = CampaignState::seeded(serde_json::json!({
            "name": "Ocean View Resort",
            "location": "Maui, Hawaii"
        }));
        assert_eq!(state.seed_info()["name"], "Ocean View Resort");
        assert!(state.seed_description().contains("Maui"));
    }

    #[test]
    fn metric_value_deserializes_untagged() {
        let map: MetricMap =
            serde_json::from_str(r#"{"CTR": 1.5, "note": "holiday spike"}"#).unwrap();
        assert_eq!(map.number("CTR"), Some(1.5));
        assert_eq!(map.get("note"), Some(&MetricValue::Text("holiday spike".into())));
    }
}

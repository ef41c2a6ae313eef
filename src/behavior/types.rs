//! Types for behavioral patterns, predictions, and suggestions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recurrence cadence of a behavior pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternCadence {
    Daily,
    Weekly,
    Monthly,
    Seasonal,
}

/// One recurring time slot inside a behavior pattern
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour_of_day: Option<u32>,
    pub activity: String,
    pub probability: f64,
}

/// One candidate pattern emitted by a miner
///
/// Fully recomputed on every trigger, never incrementally merged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorPattern {
    pub cadence: PatternCadence,
    pub time_slots: Vec<TimeSlot>,
    pub frequency: usize,
    pub confidence: f64,
}

/// One (hour, weekday) activity slot with its occurrence count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitySlot {
    pub hour: u32,
    pub day_of_week: u32,
    pub frequency: usize,
}

/// When a user performs one kind of action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityPattern {
    #[serde(rename = "type")]
    pub kind: String,
    pub time_slots: Vec<ActivitySlot>,
    /// Hours with at least 80% of the busiest hour's activity
    pub peak_hours: Vec<u32>,
    /// 1 / (1 + variance of slot frequencies)
    pub consistency: f64,
}

/// One dated occurrence of an interest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestPoint {
    pub date: DateTime<Utc>,
    pub score: f64,
}

/// Movement of an interest over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterestTrend {
    Growing,
    Stable,
    Declining,
}

/// How a user's interest in one category evolves
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestPattern {
    pub category: String,
    pub evolution: Vec<InterestPoint>,
    pub trending: InterestTrend,
    /// Interests co-occurring within one hour, top 5 by count
    pub related_interests: Vec<String>,
}

/// Social connectivity and interaction metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialPattern {
    /// Net new connections per day
    pub connection_rate: f64,
    /// Interactions per day
    pub interaction_frequency: f64,
    pub network_growth: f64,
    pub influence_score: f64,
    pub communities: Vec<String>,
}

impl SocialPattern {
    pub fn empty() -> Self {
        Self {
            connection_rate: 0.0,
            interaction_frequency: 0.0,
            network_growth: 0.0,
            influence_score: 0.0,
            communities: Vec::new(),
        }
    }
}

/// Per-interaction-type tally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionCount {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: usize,
}

/// Engagement metrics for one content type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementPattern {
    pub content_type: String,
    pub engagement_rate: f64,
    pub average_time: f64,
    pub interactions: Vec<InteractionCount>,
}

/// One derived, human-readable insight about a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInsight {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub confidence: f64,
    pub actionable: bool,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// The full behavioral profile of one user, replaced wholesale on recompute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPattern {
    pub user_id: u64,
    pub activity: Vec<ActivityPattern>,
    pub interest: Vec<InterestPattern>,
    pub social: Vec<SocialPattern>,
    pub engagement: Vec<EngagementPattern>,
    pub insights: Vec<UserInsight>,
}

/// Horizon bucket attached to a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    Now,
    Today,
    ThisWeek,
    Soon,
    Later,
    Anytime,
}

/// One typed, explained prediction; ephemeral, generated per request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(rename = "type")]
    pub kind: String,
    pub confidence: f64,
    pub suggestion: String,
    pub reasoning: String,
    pub timeframe: Timeframe,
}

/// Category of a smart suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Event,
    Post,
    Friend,
    Content,
    Action,
}

impl SuggestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionKind::Event => "event",
            SuggestionKind::Post => "post",
            SuggestionKind::Friend => "friend",
            SuggestionKind::Content => "content",
            SuggestionKind::Action => "action",
        }
    }
}

/// Urgency bucket of a smart suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timing {
    Immediate,
    Soon,
    Later,
}

/// Action a consumer can bind to a suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SuggestedAction {
    OpenRoute { route: String },
    ComposePost,
}

/// One ranked, timing-bucketed suggestion derived from predictions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartSuggestion {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub title: String,
    pub description: String,
    pub confidence: f64,
    pub relevance: f64,
    pub timing: Timing,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<SuggestedAction>,
}

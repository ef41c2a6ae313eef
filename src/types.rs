//! Core data types for the Pulso analytics engine
//!
//! Shared types for the text-content, time-series, and community-mood
//! analyses. Behavioral pattern types live in `behavior::types`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Dominant emotion classification for a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Positive,
    Negative,
    Neutral,
    Mixed,
}

/// Sentiment attributed to a specific aspect of the text (music, venue, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectSentiment {
    pub aspect: String,
    pub sentiment: f64,
}

/// Result of sentiment analysis over a single text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    /// Mean lexicon score, in [-1, 1]
    pub score: f64,
    /// min(|score|, 1)
    pub magnitude: f64,
    pub emotion: Emotion,
    /// Tokens whose lexicon score exceeded 0.5 in magnitude
    pub keywords: Vec<String>,
    pub aspects: Vec<AspectSentiment>,
}

/// One matched topic with its relevance and the keywords that matched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicMatch {
    pub name: String,
    /// Matched keywords / total keywords for the topic
    pub relevance: f64,
    pub keywords: Vec<String>,
}

/// One extracted named entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    /// Entity class: PERSON, LOCATION, DATE, or TIME
    #[serde(rename = "type")]
    pub kind: String,
    /// Match length over text length
    pub salience: f64,
}

/// Result of topic and entity extraction over a single text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicExtraction {
    /// Top 5 topics by relevance, descending
    pub topics: Vec<TopicMatch>,
    /// Union of matched topic categories, insertion-ordered
    pub categories: Vec<String>,
    /// Top 10 entities by salience, descending
    pub entities: Vec<Entity>,
    pub language: String,
}

/// One point of a numeric time series for trend detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    /// Open key-value map; `tags` (string array) and `category` (string)
    /// feed the related-trends output
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Predicted direction of a trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

/// Direction forecast attached to a trend detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPrediction {
    pub direction: TrendDirection,
    pub confidence: f64,
}

/// Result of trend detection over a time series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendDetection {
    pub trending: bool,
    /// min(|velocity| * 10, 1)
    pub trend_score: f64,
    /// Relative change of the recent window mean vs the previous window mean
    pub velocity: f64,
    pub time_window: String,
    /// Metadata tags/categories seen across the series, first 5
    pub related_trends: Vec<String>,
    pub prediction: TrendPrediction,
}

impl TrendDetection {
    /// Neutral result for series too short to analyze
    pub fn not_trending(window: usize) -> Self {
        Self {
            trending: false,
            trend_score: 0.0,
            velocity: 0.0,
            time_window: format!("{} days", window),
            related_trends: Vec::new(),
            prediction: TrendPrediction {
                direction: TrendDirection::Stable,
                confidence: 0.0,
            },
        }
    }
}

/// One point of a typed series for anomaly detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    /// Series kind: activity, content, social, security, ...
    #[serde(rename = "type")]
    pub kind: String,
}

/// Severity ladder for detected anomalies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Optional context that enriches anomaly recommendations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnomalyContext {
    pub user_id: Option<u64>,
    pub location: Option<String>,
}

/// Result of anomaly detection over a time series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyDetection {
    pub is_anomaly: bool,
    /// min(z-score / 5, 1)
    pub anomaly_score: f64,
    /// Anomaly class: statistical, spike, drop, pattern_break,
    /// periodicity_break, or insufficient_data
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub severity: Severity,
    pub recommendations: Vec<String>,
}

impl AnomalyDetection {
    /// Neutral result for series too short to analyze
    pub fn insufficient_data() -> Self {
        Self {
            is_anomaly: false,
            anomaly_score: 0.0,
            kind: "insufficient_data".to_string(),
            description: "Not enough data for anomaly detection".to_string(),
            severity: Severity::Low,
            recommendations: Vec::new(),
        }
    }
}

/// Geographic coordinate attached to an action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// One raw, timestamped user action
///
/// Immutable once recorded. The metadata map is open; well-known keys are
/// `categories` and `tags` (string arrays), `content_type`, `interaction`,
/// `community`, `pathname`, `event_type` (strings), `target_user_id`
/// (integer), `engagement` and `duration` (numbers), `received` (bool),
/// and `hashtags` (string array).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAction {
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl UserAction {
    /// Convenience constructor for an action with no metadata
    pub fn new(kind: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind: kind.into(),
            timestamp,
            metadata: HashMap::new(),
            location: None,
            device_type: None,
            duration: None,
        }
    }

    /// Read a string array out of the metadata map, empty when absent
    pub fn metadata_strings(&self, key: &str) -> Vec<String> {
        self.metadata
            .get(key)
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Read a string out of the metadata map
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }

    /// Read a number out of the metadata map
    pub fn metadata_f64(&self, key: &str) -> Option<f64> {
        self.metadata.get(key).and_then(|v| v.as_f64())
    }
}

/// One community post for mood aggregation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: u64,
}

/// Aggregate mood label for a batch of posts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodLabel {
    Positive,
    Negative,
    Optimistic,
    Concerned,
    Neutral,
}

/// Mood movement label; multiple labels can co-occur
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodTrend {
    Improving,
    Declining,
    Stable,
}

/// Result of community mood aggregation over a post batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityMood {
    pub mood: MoodLabel,
    /// Mean sentiment score over the batch
    pub score: f64,
    pub trends: Vec<MoodTrend>,
    /// Top 10 sentiment keywords by occurrence count
    pub keywords: Vec<String>,
}

/// Kind of a cached content-level pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentPatternKind {
    Sentiment,
    Topic,
    Trend,
    Anomaly,
}

/// One entry of the process-wide pattern cache, last-write-wins per key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPattern {
    #[serde(rename = "type")]
    pub kind: ContentPatternKind,
    pub confidence: f64,
    pub data: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_action_metadata_accessors() {
        let mut action = UserAction::new("post_create", Utc::now());
        action.metadata.insert(
            "tags".to_string(),
            serde_json::json!(["tango", "milonga"]),
        );
        action
            .metadata
            .insert("engagement".to_string(), serde_json::json!(2.5));
        action
            .metadata
            .insert("pathname".to_string(), serde_json::json!("/events"));

        assert_eq!(action.metadata_strings("tags"), vec!["tango", "milonga"]);
        assert_eq!(action.metadata_f64("engagement"), Some(2.5));
        assert_eq!(action.metadata_str("pathname"), Some("/events"));
        assert!(action.metadata_strings("categories").is_empty());
    }

    #[test]
    fn test_serde_type_field_rename() {
        let point = AnomalyPoint {
            timestamp: Utc::now(),
            value: 1.0,
            kind: "activity".to_string(),
        };
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["type"], "activity");
    }

    #[test]
    fn test_insufficient_data_defaults() {
        let result = AnomalyDetection::insufficient_data();
        assert!(!result.is_anomaly);
        assert_eq!(result.kind, "insufficient_data");
        assert_eq!(result.severity, Severity::Low);

        let trend = TrendDetection::not_trending(7);
        assert!(!trend.trending);
        assert_eq!(trend.time_window, "7 days");
        assert_eq!(trend.prediction.direction, TrendDirection::Stable);
    }
}

//! Engine facade and process-wide caches
//!
//! `InsightEngine` owns the lexicon store, the per-user action logs and
//! combined patterns, the user-pattern cache, and the global content
//! pattern cache. All analytic entry points of the crate route through it.
//!
//! Per-user recomputes replace cache entries wholesale; the global
//! recompute iterates an immutable snapshot so it never holds a lock over
//! the whole cache.

use chrono::Utc;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::behavior::miners::{combine_patterns, detect_patterns};
use crate::behavior::store::ActionLog;
use crate::behavior::suggest::SuggestionContext;
use crate::behavior::types::{
    BehaviorPattern, InterestTrend, Prediction, SmartSuggestion, UserPattern,
};
use crate::behavior::{generate_predictions, generate_smart_suggestions};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::lexicon::LexiconStore;
use crate::types::{
    AnomalyContext, AnomalyDetection, AnomalyPoint, CommunityMood, ContentPattern,
    ContentPatternKind, Post, SentimentAnalysis, TopicExtraction, TrendDetection, TrendPoint,
    UserAction,
};

/// Per-user mutable state: the action log and the latest combined patterns
#[derive(Debug, Clone)]
struct UserState {
    log: ActionLog,
    combined: Vec<BehaviorPattern>,
}

/// The analytics engine facade
///
/// Cheap to share behind an `Arc`; all methods take `&self`. Concurrent
/// writers to different users never contend; writes to the same user are
/// serialized by the underlying shard locks.
pub struct InsightEngine {
    lexicons: Arc<LexiconStore>,
    config: EngineConfig,
    users: DashMap<u64, UserState>,
    user_patterns: DashMap<u64, UserPattern>,
    global_patterns: DashMap<String, ContentPattern>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl InsightEngine {
    /// Create an engine with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        Self {
            lexicons: Arc::new(LexiconStore::new()),
            config,
            users: DashMap::new(),
            user_patterns: DashMap::new(),
            global_patterns: DashMap::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Adjust the combiner's minimum confidence, clamped to [0.3, 0.9]
    pub fn set_min_confidence(&mut self, threshold: f64) {
        self.config.set_min_confidence(threshold);
    }

    // Text-content analysis

    pub fn analyze_sentiment(&self, text: &str, language: &str) -> SentimentAnalysis {
        crate::sentiment::analyze_sentiment(&self.lexicons, text, language)
    }

    pub fn extract_topics(&self, text: &str, language: &str) -> TopicExtraction {
        crate::topics::extract_topics(&self.lexicons, text, language)
    }

    // Time-series analysis

    /// Detect a trend using the configured window
    pub fn detect_trend(&self, series: &[TrendPoint]) -> TrendDetection {
        crate::trend::detect_trend(series, self.config.trend_window)
    }

    /// Detect a trend with an explicit window
    pub fn detect_trend_with_window(&self, series: &[TrendPoint], window: usize) -> TrendDetection {
        crate::trend::detect_trend(series, window)
    }

    pub fn detect_anomaly(
        &self,
        series: &[AnomalyPoint],
        context: Option<&AnomalyContext>,
    ) -> AnomalyDetection {
        crate::anomaly::detect_anomaly(series, context)
    }

    // Behavioral pipeline

    /// Record one action and synchronously recompute the user's combined
    /// patterns
    pub fn record_action(&self, user_id: u64, action: UserAction) {
        let mut entry = self.users.entry(user_id).or_insert_with(|| UserState {
            log: ActionLog::new(self.config.action_buffer_cap),
            combined: Vec::new(),
        });
        entry.log.push(action);

        let actions = entry.log.snapshot();
        let mined = detect_patterns(&actions, self.config.cluster_radius_deg);
        entry.combined = combine_patterns(&mined, self.config.min_confidence);
        log::trace!(
            "user {}: {} actions, {} combined patterns",
            user_id,
            actions.len(),
            entry.combined.len()
        );
    }

    /// Number of buffered actions for a user
    pub fn action_count(&self, user_id: u64) -> usize {
        self.users.get(&user_id).map(|s| s.log.len()).unwrap_or(0)
    }

    /// Latest combined patterns for a user
    pub fn combined_patterns(&self, user_id: u64) -> Vec<BehaviorPattern> {
        self.users
            .get(&user_id)
            .map(|s| s.combined.clone())
            .unwrap_or_default()
    }

    /// Build and cache a user's behavioral profile from the given actions
    pub fn analyze_user_patterns(&self, user_id: u64, actions: &[UserAction]) -> UserPattern {
        let pattern = crate::behavior::analyze_user_patterns(user_id, actions);
        self.user_patterns.insert(user_id, pattern.clone());
        pattern
    }

    /// Cached behavioral profile, if one has been computed
    pub fn user_pattern(&self, user_id: u64) -> Option<UserPattern> {
        self.user_patterns.get(&user_id).map(|p| p.clone())
    }

    /// Predictions from the user's buffered history; empty for unknown users
    pub fn generate_predictions(&self, user_id: u64) -> Vec<Prediction> {
        self.generate_predictions_at(user_id, &SuggestionContext::default())
    }

    /// Predictions under an explicit context
    pub fn generate_predictions_at(
        &self,
        user_id: u64,
        ctx: &SuggestionContext,
    ) -> Vec<Prediction> {
        let actions = match self.users.get(&user_id) {
            Some(state) => state.log.snapshot(),
            None => return Vec::new(),
        };
        generate_predictions(&actions, ctx.current_path.as_deref())
    }

    /// Ranked suggestions for a user at the current time
    pub fn generate_smart_suggestions(&self, user_id: u64) -> Vec<SmartSuggestion> {
        self.generate_smart_suggestions_at(user_id, &SuggestionContext::default())
    }

    /// Ranked suggestions under an explicit context; deterministic in tests
    pub fn generate_smart_suggestions_at(
        &self,
        user_id: u64,
        ctx: &SuggestionContext,
    ) -> Vec<SmartSuggestion> {
        let actions = match self.users.get(&user_id) {
            Some(state) => state.log.snapshot(),
            None => Vec::new(),
        };
        let predictions = generate_predictions(&actions, ctx.current_path.as_deref());
        generate_smart_suggestions(&predictions, &actions, ctx)
    }

    /// Drop one user's buffered actions and cached patterns
    pub fn clear_user(&self, user_id: u64) {
        self.users.remove(&user_id);
        self.user_patterns.remove(&user_id);
    }

    // Community analysis

    pub fn analyze_community_mood(&self, posts: &[Post]) -> CommunityMood {
        crate::mood::analyze_community_mood(&self.lexicons, posts, &self.config.default_language)
    }

    // Global pattern cache

    /// Aggregate cached user patterns into the global cache
    ///
    /// Iterates a cloned snapshot of the user-pattern cache; each global
    /// entry is written individually, last-write-wins.
    pub fn recompute_global_patterns(&self) {
        let snapshot: Vec<UserPattern> = self
            .user_patterns
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        let mut peak_hours: BTreeMap<u32, usize> = BTreeMap::new();
        let mut growing_interests: BTreeMap<String, usize> = BTreeMap::new();

        for pattern in &snapshot {
            for activity in &pattern.activity {
                for hour in &activity.peak_hours {
                    *peak_hours.entry(*hour).or_insert(0) += 1;
                }
            }
            for interest in &pattern.interest {
                if interest.trending == InterestTrend::Growing {
                    *growing_interests.entry(interest.category.clone()).or_insert(0) += 1;
                }
            }
        }

        let mut top_hours: Vec<(u32, usize)> = peak_hours.into_iter().collect();
        top_hours.sort_by(|a, b| b.1.cmp(&a.1));
        top_hours.truncate(3);

        let mut top_interests: Vec<(String, usize)> = growing_interests.into_iter().collect();
        top_interests.sort_by(|a, b| b.1.cmp(&a.1));
        top_interests.truncate(5);

        let now = Utc::now();
        self.global_patterns.insert(
            "global_activity".to_string(),
            ContentPattern {
                kind: ContentPatternKind::Trend,
                confidence: 0.8,
                data: serde_json::json!({ "peak_hours": top_hours }),
                timestamp: now,
            },
        );
        self.global_patterns.insert(
            "global_interests".to_string(),
            ContentPattern {
                kind: ContentPatternKind::Trend,
                confidence: 0.7,
                data: serde_json::json!({ "trending": top_interests }),
                timestamp: now,
            },
        );
        log::debug!("global patterns recomputed over {} users", snapshot.len());
    }

    /// One cached global pattern by key
    pub fn global_pattern(&self, key: &str) -> Option<ContentPattern> {
        self.global_patterns.get(key).map(|p| p.clone())
    }

    /// Serialize the global pattern cache to a JSON blob
    ///
    /// Persistence itself stays external; callers decide where the blob
    /// lives.
    pub fn snapshot_patterns(&self) -> Result<String, EngineError> {
        let map: BTreeMap<String, ContentPattern> = self
            .global_patterns
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        Ok(serde_json::to_string(&map)?)
    }

    /// Restore the global pattern cache from a JSON blob
    pub fn load_patterns(&self, json: &str) -> Result<(), EngineError> {
        let map: BTreeMap<String, ContentPattern> = serde_json::from_str(json)?;
        for (key, pattern) in map {
            self.global_patterns.insert(key, pattern);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn engine() -> InsightEngine {
        InsightEngine::default()
    }

    fn action_at(kind: &str, minutes: i64) -> UserAction {
        let base = Utc.with_ymd_and_hms(2024, 3, 8, 21, 0, 0).unwrap();
        UserAction::new(kind, base + Duration::minutes(minutes))
    }

    #[test]
    fn test_sentiment_through_facade() {
        let result = engine().analyze_sentiment("El tango es excelente y maravilloso", "es");
        assert!(result.score > 0.5);
    }

    #[test]
    fn test_trend_uses_configured_window() {
        let config = EngineConfig {
            trend_window: 3,
            ..Default::default()
        };
        let engine = InsightEngine::new(config);
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let series: Vec<TrendPoint> = [10.0, 12.0, 14.0, 16.0, 18.0, 20.0, 22.0]
            .iter()
            .enumerate()
            .map(|(i, &value)| TrendPoint {
                timestamp: start + Duration::days(i as i64),
                value,
                metadata: Default::default(),
            })
            .collect();
        let result = engine.detect_trend(&series);
        assert_eq!(result.time_window, "3 days");
        assert!(result.trending);
    }

    #[test]
    fn test_action_buffer_respects_cap() {
        let config = EngineConfig {
            action_buffer_cap: 50,
            ..Default::default()
        };
        let engine = InsightEngine::new(config);
        for i in 0..80 {
            engine.record_action(1, action_at("browse", i));
        }
        assert_eq!(engine.action_count(1), 50);
    }

    #[test]
    fn test_record_action_recomputes_combined() {
        let mut config = EngineConfig::default();
        config.set_min_confidence(0.3);
        let engine = InsightEngine::new(config);
        // 12 social actions out of 12: social confidence 1.0 * 0.25 < 0.3,
        // hourly temporal bucket 1.0 * 0.30 >= 0.3
        for i in 0..12 {
            engine.record_action(7, action_at("like", i));
        }
        let combined = engine.combined_patterns(7);
        assert!(!combined.is_empty());
        assert!(combined.len() <= 20);
        for pattern in &combined {
            assert!(pattern.confidence >= 0.3);
        }
    }

    #[test]
    fn test_unknown_user_yields_empty() {
        let engine = engine();
        assert!(engine.generate_predictions(99).is_empty());
        assert!(engine.combined_patterns(99).is_empty());
        assert!(engine.user_pattern(99).is_none());
    }

    #[test]
    fn test_user_pattern_cache_replaced_wholesale() {
        let engine = engine();
        let first = vec![action_at("login", 0)];
        engine.analyze_user_patterns(3, &first);
        assert_eq!(engine.user_pattern(3).unwrap().activity.len(), 1);

        let second = vec![action_at("login", 0), action_at("post", 1)];
        engine.analyze_user_patterns(3, &second);
        assert_eq!(engine.user_pattern(3).unwrap().activity.len(), 2);
    }

    #[test]
    fn test_global_recompute_and_snapshot_roundtrip() {
        let engine = engine();
        let actions: Vec<UserAction> = (0..5).map(|i| action_at("login", i * 60 * 24)).collect();
        engine.analyze_user_patterns(1, &actions);
        engine.recompute_global_patterns();

        let activity = engine.global_pattern("global_activity").unwrap();
        assert_eq!(activity.kind, ContentPatternKind::Trend);

        let blob = engine.snapshot_patterns().unwrap();
        let restored = InsightEngine::default();
        restored.load_patterns(&blob).unwrap();
        assert!(restored.global_pattern("global_activity").is_some());
        assert!(restored.global_pattern("global_interests").is_some());
    }

    #[test]
    fn test_load_patterns_rejects_bad_json() {
        let engine = engine();
        assert!(engine.load_patterns("not json").is_err());
    }

    #[test]
    fn test_suggestions_deterministic_with_context() {
        let engine = engine();
        for i in 0..8 {
            let mut action = action_at("event_view", i * 60 * 24);
            action
                .metadata
                .insert("event_type".to_string(), serde_json::json!("milonga"));
            engine.record_action(5, action);
        }
        let ctx = SuggestionContext {
            now: Utc.with_ymd_and_hms(2024, 3, 9, 20, 0, 0).unwrap(), // Saturday evening
            current_path: None,
        };
        let suggestions = engine.generate_smart_suggestions_at(5, &ctx);
        assert!(!suggestions.is_empty());
        assert!(suggestions.len() <= 5);
        for suggestion in &suggestions {
            assert!(suggestion.relevance >= 0.0 && suggestion.relevance <= 1.0);
            assert!(suggestion.confidence >= 0.0 && suggestion.confidence <= 1.0);
        }
    }

    #[test]
    fn test_clear_user() {
        let engine = engine();
        engine.record_action(2, action_at("browse", 0));
        engine.analyze_user_patterns(2, &[action_at("browse", 0)]);
        engine.clear_user(2);
        assert_eq!(engine.action_count(2), 0);
        assert!(engine.user_pattern(2).is_none());
    }
}

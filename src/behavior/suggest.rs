//! Suggestion conversion and ranking
//!
//! Converts predictions into smart suggestions, adds static contextual
//! rules (time of day, day of week), and ranks by a weighted blend of
//! confidence, base relevance, context alignment, and type diversity.

use chrono::{DateTime, Datelike, Timelike, Utc};
use std::cmp::Ordering;
use uuid::Uuid;

use crate::behavior::types::{
    Prediction, SmartSuggestion, SuggestedAction, SuggestionKind, Timeframe, Timing,
};
use crate::types::UserAction;

/// Final relevance weights: confidence, base relevance, context, diversity
const RANK_WEIGHTS: [f64; 4] = [0.4, 0.3, 0.2, 0.1];

/// Context a suggestion request runs under; explicit so tests can pin time
#[derive(Debug, Clone)]
pub struct SuggestionContext {
    pub now: DateTime<Utc>,
    pub current_path: Option<String>,
}

impl Default for SuggestionContext {
    fn default() -> Self {
        Self {
            now: Utc::now(),
            current_path: None,
        }
    }
}

/// Convert predictions to suggestions, add contextual ones, and rank
///
/// Returns at most 2 immediate, 2 soon, and 1 later suggestion.
pub fn generate_smart_suggestions(
    predictions: &[Prediction],
    recent_actions: &[UserAction],
    ctx: &SuggestionContext,
) -> Vec<SmartSuggestion> {
    let mut suggestions: Vec<SmartSuggestion> =
        predictions.iter().map(convert_to_suggestion).collect();
    suggestions.extend(contextual_suggestions(ctx));
    rank_suggestions(suggestions, recent_actions, ctx)
}

/// Map a prediction to a suggestion with a base relevance and timing bucket
fn convert_to_suggestion(prediction: &Prediction) -> SmartSuggestion {
    let kind = match prediction.kind.as_str() {
        "event_recommendation" => SuggestionKind::Event,
        "posting_time" => SuggestionKind::Action,
        "friend_suggestion" => SuggestionKind::Friend,
        "content_suggestion" => SuggestionKind::Content,
        "next_action" => SuggestionKind::Action,
        _ => SuggestionKind::Action,
    };

    let relevance =
        (time_relevance(prediction.timeframe) + type_relevance(&prediction.kind)) / 2.0;

    SmartSuggestion {
        id: Uuid::new_v4().to_string(),
        kind,
        title: prediction.suggestion.clone(),
        description: prediction.reasoning.clone(),
        confidence: prediction.confidence,
        relevance,
        timing: timing_for(prediction.timeframe),
        action: None,
    }
}

fn time_relevance(timeframe: Timeframe) -> f64 {
    match timeframe {
        Timeframe::Now => 1.0,
        Timeframe::Today => 0.9,
        Timeframe::ThisWeek => 0.7,
        Timeframe::Soon => 0.6,
        Timeframe::Later => 0.4,
        Timeframe::Anytime => 0.5,
    }
}

fn type_relevance(kind: &str) -> f64 {
    match kind {
        "next_action" => 0.9,
        "event_recommendation" => 0.8,
        "posting_time" => 0.7,
        "friend_suggestion" => 0.6,
        "content_suggestion" => 0.7,
        "hashtag_suggestion" => 0.5,
        _ => 0.5,
    }
}

fn timing_for(timeframe: Timeframe) -> Timing {
    match timeframe {
        Timeframe::Now | Timeframe::Today => Timing::Immediate,
        Timeframe::ThisWeek | Timeframe::Soon => Timing::Soon,
        Timeframe::Later | Timeframe::Anytime => Timing::Later,
    }
}

/// Static time-of-day and day-of-week rules
fn contextual_suggestions(ctx: &SuggestionContext) -> Vec<SmartSuggestion> {
    let mut suggestions = Vec::new();
    let hour = ctx.now.hour();

    if (6..12).contains(&hour) {
        suggestions.push(SmartSuggestion {
            id: Uuid::new_v4().to_string(),
            kind: SuggestionKind::Action,
            title: "Good morning! Check today's events".to_string(),
            description: "See what's happening in your community today".to_string(),
            confidence: 0.8,
            relevance: 0.9,
            timing: Timing::Immediate,
            action: Some(SuggestedAction::OpenRoute {
                route: "/events".to_string(),
            }),
        });
    } else if (18..22).contains(&hour) {
        suggestions.push(SmartSuggestion {
            id: Uuid::new_v4().to_string(),
            kind: SuggestionKind::Post,
            title: "Share your day".to_string(),
            description: "Your followers are most active now".to_string(),
            confidence: 0.7,
            relevance: 0.8,
            timing: Timing::Immediate,
            action: Some(SuggestedAction::ComposePost),
        });
    }

    let day = ctx.now.weekday().num_days_from_sunday();
    if day == 5 || day == 6 {
        suggestions.push(SmartSuggestion {
            id: Uuid::new_v4().to_string(),
            kind: SuggestionKind::Event,
            title: "Weekend milongas nearby".to_string(),
            description: "Popular tango events this weekend".to_string(),
            confidence: 0.85,
            relevance: 0.9,
            timing: Timing::Soon,
            action: Some(SuggestedAction::OpenRoute {
                route: "/events?filter=weekend".to_string(),
            }),
        });
    }

    suggestions
}

/// Re-score by the blended weights, sort, and bucket by timing
fn rank_suggestions(
    mut suggestions: Vec<SmartSuggestion>,
    recent_actions: &[UserAction],
    ctx: &SuggestionContext,
) -> Vec<SmartSuggestion> {
    let total = suggestions.len();
    let kind_counts: Vec<usize> = suggestions
        .iter()
        .map(|s| suggestions.iter().filter(|o| o.kind == s.kind).count())
        .collect();

    for (index, suggestion) in suggestions.iter_mut().enumerate() {
        let context_score = context_score(suggestion, recent_actions, ctx);
        let diversity_score = if total > 0 {
            1.0 - (kind_counts[index] as f64 / total as f64) * 0.5
        } else {
            1.0
        };

        suggestion.relevance = suggestion.confidence * RANK_WEIGHTS[0]
            + suggestion.relevance * RANK_WEIGHTS[1]
            + context_score * RANK_WEIGHTS[2]
            + diversity_score * RANK_WEIGHTS[3];
    }

    suggestions.sort_by(|a, b| {
        b.relevance
            .partial_cmp(&a.relevance)
            .unwrap_or(Ordering::Equal)
    });

    let mut result = Vec::new();
    result.extend(
        suggestions
            .iter()
            .filter(|s| s.timing == Timing::Immediate)
            .take(2)
            .cloned(),
    );
    result.extend(
        suggestions
            .iter()
            .filter(|s| s.timing == Timing::Soon)
            .take(2)
            .cloned(),
    );
    result.extend(
        suggestions
            .iter()
            .filter(|s| s.timing == Timing::Later)
            .take(1)
            .cloned(),
    );
    result
}

/// Alignment of a suggestion with the current hour and recent activity
fn context_score(
    suggestion: &SmartSuggestion,
    recent_actions: &[UserAction],
    ctx: &SuggestionContext,
) -> f64 {
    let mut score = 0.5;

    let hour = ctx.now.hour();
    if suggestion.kind == SuggestionKind::Event && (18..=22).contains(&hour) {
        score += 0.1;
    }

    let recent = &recent_actions[recent_actions.len().saturating_sub(10)..];
    let related = recent
        .iter()
        .filter(|a| {
            a.kind.contains(suggestion.kind.as_str())
                || a.metadata_str("category") == Some(suggestion.kind.as_str())
        })
        .count();
    score += (related as f64 / 10.0) * 0.2;

    score.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ctx_at(hour: u32, day: u32) -> SuggestionContext {
        // 2024-03-03 is a Sunday; offset days to pick the weekday
        let now = Utc
            .with_ymd_and_hms(2024, 3, 3 + day, hour, 0, 0)
            .unwrap();
        SuggestionContext {
            now,
            current_path: None,
        }
    }

    fn prediction(kind: &str, confidence: f64, timeframe: Timeframe) -> Prediction {
        Prediction {
            kind: kind.to_string(),
            confidence,
            suggestion: format!("{} suggestion", kind),
            reasoning: "because".to_string(),
            timeframe,
        }
    }

    #[test]
    fn test_conversion_maps_kind_and_timing() {
        let suggestion =
            convert_to_suggestion(&prediction("event_recommendation", 0.8, Timeframe::ThisWeek));
        assert_eq!(suggestion.kind, SuggestionKind::Event);
        assert_eq!(suggestion.timing, Timing::Soon);
        // (0.7 + 0.8) / 2
        assert!((suggestion.relevance - 0.75).abs() < 1e-9);
        assert!(!suggestion.id.is_empty());
    }

    #[test]
    fn test_morning_context_rule() {
        let suggestions = contextual_suggestions(&ctx_at(8, 1)); // Monday 08:00
        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].title.contains("Good morning"));
        assert_eq!(
            suggestions[0].action,
            Some(SuggestedAction::OpenRoute {
                route: "/events".to_string()
            })
        );
    }

    #[test]
    fn test_weekend_context_rule() {
        let suggestions = contextual_suggestions(&ctx_at(14, 5)); // Friday 14:00
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].kind, SuggestionKind::Event);
        assert_eq!(suggestions[0].timing, Timing::Soon);
    }

    #[test]
    fn test_evening_and_weekend_combined() {
        let suggestions = contextual_suggestions(&ctx_at(20, 6)); // Saturday 20:00
        assert_eq!(suggestions.len(), 2);
        assert!(suggestions.iter().any(|s| s.kind == SuggestionKind::Post));
        assert!(suggestions.iter().any(|s| s.kind == SuggestionKind::Event));
    }

    #[test]
    fn test_output_respects_timing_buckets() {
        let predictions: Vec<Prediction> = (0..6)
            .map(|i| prediction("next_action", 0.9 - i as f64 * 0.05, Timeframe::Now))
            .chain((0..4).map(|i| {
                prediction("event_recommendation", 0.8 - i as f64 * 0.05, Timeframe::Soon)
            }))
            .chain(std::iter::once(prediction(
                "friend_suggestion",
                0.7,
                Timeframe::Anytime,
            )))
            .collect();

        let result = generate_smart_suggestions(&predictions, &[], &ctx_at(14, 2));
        let immediate = result.iter().filter(|s| s.timing == Timing::Immediate).count();
        let soon = result.iter().filter(|s| s.timing == Timing::Soon).count();
        let later = result.iter().filter(|s| s.timing == Timing::Later).count();
        assert!(immediate <= 2);
        assert!(soon <= 2);
        assert!(later <= 1);
        assert_eq!(result.len(), immediate + soon + later);
    }

    #[test]
    fn test_relevance_in_unit_range() {
        let predictions = vec![
            prediction("event_recommendation", 1.0, Timeframe::Now),
            prediction("posting_time", 0.2, Timeframe::Later),
        ];
        let result = generate_smart_suggestions(&predictions, &[], &ctx_at(10, 2));
        for suggestion in &result {
            assert!(suggestion.relevance >= 0.0 && suggestion.relevance <= 1.0);
        }
    }
}

//! Prediction generation
//!
//! Turns an action history into typed, explained predictions: preferred
//! event slots, optimal posting times, suggested connections, hashtag
//! suggestions, and next-action transitions mined from short sessions.

use chrono::{Datelike, Timelike};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::behavior::types::{Prediction, Timeframe};
use crate::types::UserAction;

/// Maximum number of predictions returned
const MAX_PREDICTIONS: usize = 10;

/// Session gap threshold in milliseconds
const SESSION_GAP_MS: i64 = 5 * 60 * 1000;

const DAY_NAMES: [&str; 7] = [
    "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
];

/// Generate ranked predictions from one user's action history
///
/// `current_path` scopes the next-action transition mining; without it that
/// family is skipped.
pub fn generate_predictions(actions: &[UserAction], current_path: Option<&str>) -> Vec<Prediction> {
    let mut predictions = Vec::new();

    predictions.extend(predict_events(actions));
    predictions.extend(predict_content(actions));
    predictions.extend(predict_social(actions));
    if let Some(path) = current_path {
        predictions.extend(predict_next_actions(actions, path));
    }

    predictions.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });
    predictions.truncate(MAX_PREDICTIONS);
    predictions
}

/// Preferred event day and type from view/register history
fn predict_events(actions: &[UserAction]) -> Vec<Prediction> {
    let event_actions: Vec<&UserAction> = actions
        .iter()
        .filter(|a| a.kind == "event_view" || a.kind == "event_register")
        .collect();

    if event_actions.len() <= 5 {
        return Vec::new();
    }

    let mut day_counts: BTreeMap<u32, usize> = BTreeMap::new();
    let mut type_counts: BTreeMap<String, usize> = BTreeMap::new();
    for action in &event_actions {
        *day_counts
            .entry(action.timestamp.weekday().num_days_from_sunday())
            .or_insert(0) += 1;
        let event_type = action.metadata_str("event_type").unwrap_or("general");
        *type_counts.entry(event_type.to_string()).or_insert(0) += 1;
    }

    let total = event_actions.len() as f64;
    let (preferred_day, day_count) = match day_counts.iter().max_by_key(|(_, count)| **count) {
        Some((day, count)) => (*day, *count),
        None => return Vec::new(),
    };
    let (preferred_type, type_count) = match type_counts.iter().max_by_key(|(_, count)| **count) {
        Some((kind, count)) => (kind.clone(), *count),
        None => return Vec::new(),
    };

    let day_confidence = day_count as f64 / total;
    let type_confidence = type_count as f64 / total;

    vec![Prediction {
        kind: "event_recommendation".to_string(),
        confidence: (day_confidence + type_confidence) / 2.0,
        suggestion: format!(
            "You usually attend {} events on {}s",
            preferred_type, DAY_NAMES[preferred_day as usize]
        ),
        reasoning: format!(
            "Based on your attendance of {} similar events",
            event_actions.len()
        ),
        timeframe: Timeframe::ThisWeek,
    }]
}

/// Optimal posting hour by mean engagement, plus hashtag suggestions
fn predict_content(actions: &[UserAction]) -> Vec<Prediction> {
    let mut predictions = Vec::new();

    let post_actions: Vec<&UserAction> =
        actions.iter().filter(|a| a.kind == "post_create").collect();

    if post_actions.len() > 3 {
        let mut by_hour: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
        for action in &post_actions {
            let engagement = action.metadata_f64("engagement").unwrap_or(1.0);
            let entry = by_hour.entry(action.timestamp.hour()).or_insert((0.0, 0));
            entry.0 += engagement;
            entry.1 += 1;
        }

        let best = by_hour
            .iter()
            .map(|(hour, (total, count))| (*hour, total / *count as f64, *count))
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

        if let Some((hour, engagement, count)) = best {
            predictions.push(Prediction {
                kind: "posting_time".to_string(),
                confidence: (count as f64 / 10.0).min(1.0),
                suggestion: format!("Best time to post: {:02}:00", hour),
                reasoning: format!(
                    "Your posts at this time get {}% more engagement",
                    (engagement * 100.0).round() as i64
                ),
                timeframe: Timeframe::Today,
            });
        }
    }

    predictions.extend(suggest_hashtags(actions));
    predictions
}

/// Hashtag suggestion from the user's own frequent tags plus trending ones
fn suggest_hashtags(actions: &[UserAction]) -> Vec<Prediction> {
    let tagged: Vec<&UserAction> = actions
        .iter()
        .filter(|a| !a.metadata_strings("hashtags").is_empty())
        .collect();

    if tagged.is_empty() {
        return Vec::new();
    }

    let mut order: Vec<String> = Vec::new();
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for action in &tagged {
        for tag in action.metadata_strings("hashtags") {
            if !counts.contains_key(&tag) {
                order.push(tag.clone());
            }
            *counts.entry(tag).or_insert(0) += 1;
        }
    }
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));

    // Frequent tags first, padded with community-wide staples
    let trending = ["#TangoToday", "#MilongaMonday", "#TangoLife"];
    let mut suggested: Vec<String> = order.into_iter().take(3).collect();
    for tag in trending.iter().take(2) {
        if !suggested.iter().any(|t| t == tag) {
            suggested.push(tag.to_string());
        }
    }

    vec![Prediction {
        kind: "hashtag_suggestion".to_string(),
        confidence: 0.8,
        suggestion: format!(
            "Suggested hashtags: {}",
            suggested.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
        ),
        reasoning: "Based on your usage and current trends".to_string(),
        timeframe: Timeframe::Now,
    }]
}

/// Frequent interaction partners the user does not follow yet
fn predict_social(actions: &[UserAction]) -> Vec<Prediction> {
    let mut partner_counts: BTreeMap<u64, usize> = BTreeMap::new();
    let mut followed: Vec<u64> = Vec::new();

    for action in actions {
        let target = action.metadata_f64("target_user_id").map(|v| v as u64);
        match action.kind.as_str() {
            "message" | "like" | "comment" => {
                if let Some(target) = target {
                    *partner_counts.entry(target).or_insert(0) += 1;
                }
            }
            "follow" => {
                if let Some(target) = target {
                    followed.push(target);
                    *partner_counts.entry(target).or_insert(0) += 1;
                }
            }
            _ => {}
        }
    }

    let suggested: Vec<u64> = partner_counts
        .iter()
        .filter(|(user, count)| **count > 3 && !followed.contains(user))
        .map(|(user, _)| *user)
        .collect();

    if suggested.is_empty() {
        return Vec::new();
    }

    vec![Prediction {
        kind: "friend_suggestion".to_string(),
        confidence: 0.7,
        suggestion: format!("{} people share your interests", suggested.len()),
        reasoning: "Based on mutual connections and shared event attendance".to_string(),
        timeframe: Timeframe::Anytime,
    }]
}

/// Next-action transitions mined from sessions touching the current path
fn predict_next_actions(actions: &[UserAction], current_path: &str) -> Vec<Prediction> {
    let sequences = find_action_sequences(actions);
    let relevant: Vec<&[UserAction]> = sequences
        .iter()
        .filter(|seq| {
            seq.iter()
                .any(|a| a.metadata_str("pathname") == Some(current_path))
        })
        .map(|seq| seq.as_slice())
        .collect();

    if relevant.is_empty() {
        return Vec::new();
    }

    let mut next_order: Vec<(String, String)> = Vec::new();
    let mut next_counts: BTreeMap<(String, String), usize> = BTreeMap::new();
    for sequence in &relevant {
        let position = sequence
            .iter()
            .position(|a| a.metadata_str("pathname") == Some(current_path));
        if let Some(index) = position {
            if let Some(next) = sequence.get(index + 1) {
                let key = (
                    next.kind.clone(),
                    next.metadata_str("pathname").unwrap_or("").to_string(),
                );
                if !next_counts.contains_key(&key) {
                    next_order.push(key.clone());
                }
                *next_counts.entry(key).or_insert(0) += 1;
            }
        }
    }

    next_order.sort_by(|a, b| next_counts[b].cmp(&next_counts[a]));

    next_order
        .into_iter()
        .take(3)
        .map(|(kind, path)| {
            let count = next_counts[&(kind.clone(), path.clone())];
            Prediction {
                kind: "next_action".to_string(),
                confidence: count as f64 / relevant.len() as f64,
                suggestion: action_description(&kind, &path),
                reasoning: format!("Users typically {} after viewing this page", kind),
                timeframe: Timeframe::Now,
            }
        })
        .collect()
}

/// Split actions into sessions at gaps over 5 minutes; keep multi-action
/// sessions only
pub(crate) fn find_action_sequences(actions: &[UserAction]) -> Vec<Vec<UserAction>> {
    let mut sequences = Vec::new();
    let mut current: Vec<UserAction> = Vec::new();

    for (index, action) in actions.iter().enumerate() {
        if index == 0 {
            current.push(action.clone());
            continue;
        }
        let gap = (action.timestamp - actions[index - 1].timestamp).num_milliseconds();
        if gap < SESSION_GAP_MS {
            current.push(action.clone());
        } else {
            if current.len() > 1 {
                sequences.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
            current.push(action.clone());
        }
    }
    if current.len() > 1 {
        sequences.push(current);
    }

    sequences
}

fn action_description(kind: &str, path: &str) -> String {
    match (kind, path) {
        ("navigation", "/events") => "browse events".to_string(),
        ("navigation", "/profile") => "view profile".to_string(),
        ("navigation", "/friends") => "check friends".to_string(),
        ("post_create", _) => "create a post".to_string(),
        ("event_register", _) => "register for event".to_string(),
        _ => kind.replace('_', " "),
    }
}

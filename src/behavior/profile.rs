//! User pattern profiling
//!
//! Builds the full behavioral profile of one user from their action log:
//! activity time slots, interest evolution, social metrics, engagement per
//! content type, and derived human-readable insights.

use chrono::{Datelike, Timelike};
use std::collections::BTreeMap;

use crate::behavior::types::{
    ActivityPattern, ActivitySlot, EngagementPattern, InteractionCount, InterestPattern,
    InterestPoint, InterestTrend, SocialPattern, UserInsight, UserPattern,
};
use crate::types::UserAction;

const SOCIAL_ACTION_KINDS: &[&str] = &["follow", "unfollow", "message", "like", "comment", "share"];
const INTERACTION_KINDS: &[&str] = &["message", "like", "comment"];

/// Analyze one user's actions into a full behavioral profile
pub fn analyze_user_patterns(user_id: u64, actions: &[UserAction]) -> UserPattern {
    let activity = extract_activity_patterns(actions);
    let interest = extract_interest_patterns(actions);
    let social = extract_social_patterns(actions);
    let engagement = extract_engagement_patterns(actions);
    let insights = generate_user_insights(&activity, &interest, &social, &engagement);

    UserPattern {
        user_id,
        activity,
        interest,
        social,
        engagement,
        insights,
    }
}

/// One ActivityPattern per distinct action kind present
fn extract_activity_patterns(actions: &[UserAction]) -> Vec<ActivityPattern> {
    let mut grouped: BTreeMap<&str, Vec<&UserAction>> = BTreeMap::new();
    for action in actions {
        grouped.entry(action.kind.as_str()).or_default().push(action);
    }

    let mut patterns = Vec::new();
    for (kind, type_actions) in grouped {
        let mut slots: BTreeMap<(u32, u32), ActivitySlot> = BTreeMap::new();
        let mut hour_counts = [0usize; 24];

        for action in &type_actions {
            let hour = action.timestamp.hour();
            let day = action.timestamp.weekday().num_days_from_sunday();
            slots
                .entry((hour, day))
                .or_insert(ActivitySlot {
                    hour,
                    day_of_week: day,
                    frequency: 0,
                })
                .frequency += 1;
            hour_counts[hour as usize] += 1;
        }

        let max_count = hour_counts.iter().copied().max().unwrap_or(0);
        let peak_hours: Vec<u32> = hour_counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count as f64 >= max_count as f64 * 0.8 && count > 0)
            .map(|(hour, _)| hour as u32)
            .collect();

        let avg_frequency = type_actions.len() as f64 / slots.len() as f64;
        let variance = slots
            .values()
            .map(|slot| (slot.frequency as f64 - avg_frequency).powi(2))
            .sum::<f64>()
            / slots.len() as f64;
        let consistency = 1.0 / (1.0 + variance);

        patterns.push(ActivityPattern {
            kind: kind.to_string(),
            time_slots: slots.into_values().collect(),
            peak_hours,
            consistency,
        });
    }

    patterns
}

/// Interest evolution from metadata categories and tags
fn extract_interest_patterns(actions: &[UserAction]) -> Vec<InterestPattern> {
    let mut interests: BTreeMap<String, Vec<InterestPoint>> = BTreeMap::new();

    for action in actions {
        let mut topics = action.metadata_strings("categories");
        topics.extend(action.metadata_strings("tags"));
        for topic in topics {
            interests.entry(topic).or_default().push(InterestPoint {
                date: action.timestamp,
                score: 1.0,
            });
        }
    }

    let mut patterns = Vec::new();
    for (category, mut evolution) in interests {
        evolution.sort_by_key(|p| p.date);

        // Growing/declining from the last 5 occurrences vs the 5 before
        let mut trending = InterestTrend::Stable;
        if evolution.len() > 5 {
            let recent = evolution.len().min(5);
            let older = evolution[evolution.len().saturating_sub(10)
                ..evolution.len().saturating_sub(5)]
                .len();
            if recent as f64 > older as f64 * 1.2 {
                trending = InterestTrend::Growing;
            } else if (recent as f64) < older as f64 * 0.8 {
                trending = InterestTrend::Declining;
            }
        }

        // Interests co-occurring within one hour of any occurrence
        let mut co_order: Vec<String> = Vec::new();
        let mut co_counts: BTreeMap<String, usize> = BTreeMap::new();
        for point in &evolution {
            for action in actions {
                if (action.timestamp - point.date).num_milliseconds().abs() < 3_600_000 {
                    let mut topics = action.metadata_strings("categories");
                    topics.extend(action.metadata_strings("tags"));
                    for topic in topics {
                        if topic != category {
                            if !co_counts.contains_key(&topic) {
                                co_order.push(topic.clone());
                            }
                            *co_counts.entry(topic).or_insert(0) += 1;
                        }
                    }
                }
            }
        }
        co_order.sort_by(|a, b| co_counts[b].cmp(&co_counts[a]));
        co_order.truncate(5);

        patterns.push(InterestPattern {
            category,
            evolution,
            trending,
            related_interests: co_order,
        });
    }

    patterns
}

/// Connection and interaction rates; always returns exactly one pattern
fn extract_social_patterns(actions: &[UserAction]) -> Vec<SocialPattern> {
    let social: Vec<&UserAction> = actions
        .iter()
        .filter(|a| SOCIAL_ACTION_KINDS.contains(&a.kind.as_str()))
        .collect();

    if social.is_empty() {
        return vec![SocialPattern::empty()];
    }

    let connections = social.iter().filter(|a| a.kind == "follow").count() as f64;
    let disconnections = social.iter().filter(|a| a.kind == "unfollow").count() as f64;
    let interactions = social
        .iter()
        .filter(|a| INTERACTION_KINDS.contains(&a.kind.as_str()))
        .count() as f64;

    let span_ms = (social[social.len() - 1].timestamp - social[0].timestamp).num_milliseconds();
    let mut days = span_ms as f64 / (1000.0 * 60.0 * 60.0 * 24.0);
    if days == 0.0 {
        days = 1.0;
    }

    let connection_rate = (connections - disconnections) / days;
    let interaction_frequency = interactions / days;
    let network_growth = if connections > 0.0 {
        (connections - disconnections) / connections
    } else {
        0.0
    };

    let shares = social.iter().filter(|a| a.kind == "share").count() as f64;
    let received = social
        .iter()
        .filter(|a| {
            a.metadata
                .get("received")
                .and_then(|v| v.as_bool())
                .unwrap_or(false)
        })
        .count() as f64;
    let influence_score = ((shares + received * 0.5) / social.len() as f64).min(1.0);

    let mut communities: Vec<String> = Vec::new();
    for action in &social {
        if let Some(community) = action.metadata_str("community") {
            if !communities.iter().any(|c| c == community) {
                communities.push(community.to_string());
            }
        }
    }

    vec![SocialPattern {
        connection_rate,
        interaction_frequency,
        network_growth,
        influence_score,
        communities,
    }]
}

/// Engagement metrics grouped by metadata content type
fn extract_engagement_patterns(actions: &[UserAction]) -> Vec<EngagementPattern> {
    let mut grouped: BTreeMap<String, Vec<&UserAction>> = BTreeMap::new();
    for action in actions {
        if let Some(content_type) = action.metadata_str("content_type") {
            grouped.entry(content_type.to_string()).or_default().push(action);
        }
    }

    let mut patterns = Vec::new();
    for (content_type, type_actions) in grouped {
        let mut interaction_order: Vec<String> = Vec::new();
        let mut interaction_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut total_time = 0.0;
        let mut engagements = 0usize;

        for action in &type_actions {
            if let Some(interaction) = action.metadata_str("interaction") {
                if !interaction_counts.contains_key(interaction) {
                    interaction_order.push(interaction.to_string());
                }
                *interaction_counts.entry(interaction.to_string()).or_insert(0) += 1;
                engagements += 1;
            }
            if let Some(duration) = action.metadata_f64("duration") {
                total_time += duration;
            }
        }

        let engagement_rate = engagements as f64 / type_actions.len() as f64;
        let average_time = total_time / type_actions.len() as f64;

        patterns.push(EngagementPattern {
            content_type,
            engagement_rate,
            average_time,
            interactions: interaction_order
                .into_iter()
                .map(|kind| {
                    let count = interaction_counts[&kind];
                    InteractionCount { kind, count }
                })
                .collect(),
        });
    }

    patterns
}

/// Human-readable insights derived from the mined patterns
fn generate_user_insights(
    activity: &[ActivityPattern],
    interest: &[InterestPattern],
    social: &[SocialPattern],
    engagement: &[EngagementPattern],
) -> Vec<UserInsight> {
    let mut insights = Vec::new();

    for pattern in activity {
        if pattern.consistency > 0.7 {
            let hours: Vec<String> = pattern.peak_hours.iter().map(|h| h.to_string()).collect();
            insights.push(UserInsight {
                kind: "activity_pattern".to_string(),
                message: format!("You're most active during {}:00", hours.join(", ")),
                confidence: pattern.consistency,
                actionable: true,
                recommendations: vec!["Schedule important posts during peak hours".to_string()],
            });
        }
    }

    let growing: Vec<&str> = interest
        .iter()
        .filter(|i| i.trending == InterestTrend::Growing)
        .map(|i| i.category.as_str())
        .collect();
    if !growing.is_empty() {
        insights.push(UserInsight {
            kind: "interest_trend".to_string(),
            message: format!("Growing interests: {}", growing.join(", ")),
            confidence: 0.8,
            actionable: true,
            recommendations: vec![
                "Explore more content in these areas".to_string(),
                "Connect with others sharing these interests".to_string(),
            ],
        });
    }

    if let Some(first) = social.first() {
        if first.network_growth > 0.1 {
            insights.push(UserInsight {
                kind: "social_growth".to_string(),
                message: "Your network is growing rapidly".to_string(),
                confidence: 0.9,
                actionable: true,
                recommendations: vec![
                    "Engage with new connections".to_string(),
                    "Share more content to maintain momentum".to_string(),
                ],
            });
        }
    }

    let high_engagement: Vec<&str> = engagement
        .iter()
        .filter(|e| e.engagement_rate > 0.5)
        .map(|e| e.content_type.as_str())
        .collect();
    if !high_engagement.is_empty() {
        insights.push(UserInsight {
            kind: "engagement_success".to_string(),
            message: format!("High engagement with: {}", high_engagement.join(", ")),
            confidence: 0.85,
            actionable: true,
            recommendations: vec![
                "Create more of this content type".to_string(),
                "Analyze what makes it successful".to_string(),
            ],
        });
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn action_at(kind: &str, hour: u32, day_offset: i64) -> UserAction {
        let base = Utc.with_ymd_and_hms(2024, 3, 3, hour, 0, 0).unwrap();
        UserAction::new(kind, base + Duration::days(day_offset))
    }

    #[test]
    fn test_one_activity_pattern_per_action_kind() {
        let actions = vec![
            action_at("login", 9, 0),
            action_at("login", 9, 1),
            action_at("post", 20, 0),
            action_at("browse", 12, 2),
            action_at("browse", 13, 2),
            action_at("browse", 12, 3),
        ];
        let profile = analyze_user_patterns(1, &actions);
        assert_eq!(profile.user_id, 1);
        assert_eq!(profile.activity.len(), 3);

        // Slot frequencies sum to each kind's occurrence count
        for pattern in &profile.activity {
            let total: usize = pattern.time_slots.iter().map(|s| s.frequency).sum();
            let expected = actions.iter().filter(|a| a.kind == pattern.kind).count();
            assert_eq!(total, expected, "kind {}", pattern.kind);
        }
    }

    #[test]
    fn test_peak_hours_from_busiest_hour() {
        let mut actions: Vec<_> = (0..8).map(|i| action_at("browse", 21, i)).collect();
        actions.push(action_at("browse", 9, 8));
        let profile = analyze_user_patterns(1, &actions);
        let browse = profile.activity.iter().find(|p| p.kind == "browse").unwrap();
        assert_eq!(browse.peak_hours, vec![21]);
    }

    #[test]
    fn test_consistency_bounds() {
        let actions: Vec<_> = (0..10).map(|i| action_at("login", 9, i)).collect();
        let profile = analyze_user_patterns(1, &actions);
        for pattern in &profile.activity {
            assert!(pattern.consistency > 0.0 && pattern.consistency <= 1.0);
        }
    }

    #[test]
    fn test_interest_patterns_from_metadata() {
        let mut actions = Vec::new();
        for i in 0..4 {
            let mut a = action_at("browse", 10, i);
            a.metadata
                .insert("tags".to_string(), serde_json::json!(["tango", "milonga"]));
            actions.push(a);
        }
        let profile = analyze_user_patterns(1, &actions);
        assert_eq!(profile.interest.len(), 2);
        let tango = profile.interest.iter().find(|i| i.category == "tango").unwrap();
        assert_eq!(tango.evolution.len(), 4);
        // milonga co-occurs with every tango occurrence
        assert_eq!(tango.related_interests, vec!["milonga"]);
    }

    #[test]
    fn test_social_pattern_rates() {
        let mut actions = Vec::new();
        // 4 follows, 1 unfollow, 6 likes over 3 days
        for i in 0..4 {
            actions.push(action_at("follow", 10, i % 3));
        }
        actions.push(action_at("unfollow", 11, 1));
        for i in 0..6 {
            actions.push(action_at("like", 12, i % 3));
        }
        let profile = analyze_user_patterns(1, &actions);
        assert_eq!(profile.social.len(), 1);
        let social = &profile.social[0];
        // (4 - 1) / 4 follows
        assert!((social.network_growth - 0.75).abs() < 1e-9);
        assert!(social.connection_rate > 0.0);
        assert!(social.interaction_frequency > 0.0);
    }

    #[test]
    fn test_no_social_actions_yields_empty_pattern() {
        let actions = vec![action_at("browse", 10, 0)];
        let profile = analyze_user_patterns(1, &actions);
        assert_eq!(profile.social.len(), 1);
        assert_eq!(profile.social[0].interaction_frequency, 0.0);
        assert_eq!(profile.social[0].influence_score, 0.0);
    }

    #[test]
    fn test_engagement_patterns() {
        let mut actions = Vec::new();
        for i in 0..4 {
            let mut a = action_at("view", 10, i);
            a.metadata
                .insert("content_type".to_string(), serde_json::json!("video"));
            if i < 3 {
                a.metadata
                    .insert("interaction".to_string(), serde_json::json!("like"));
            }
            a.metadata
                .insert("duration".to_string(), serde_json::json!(40.0));
            actions.push(a);
        }
        let profile = analyze_user_patterns(1, &actions);
        assert_eq!(profile.engagement.len(), 1);
        let video = &profile.engagement[0];
        assert_eq!(video.content_type, "video");
        assert!((video.engagement_rate - 0.75).abs() < 1e-9);
        assert!((video.average_time - 40.0).abs() < 1e-9);
        assert_eq!(video.interactions.len(), 1);
        assert_eq!(video.interactions[0].count, 3);
    }

    #[test]
    fn test_insights_for_consistent_activity() {
        // Same slot every week keeps variance 0 and consistency 1
        let actions: Vec<_> = (0..5).map(|i| action_at("login", 9, i * 7)).collect();
        let profile = analyze_user_patterns(1, &actions);
        assert!(profile
            .insights
            .iter()
            .any(|i| i.kind == "activity_pattern" && i.message.contains("9:00")));
    }
}

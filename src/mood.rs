//! Community mood aggregation
//!
//! Runs the sentiment analyzer over a batch of posts and derives a
//! cohort-level mood label, movement labels, and common keywords. The
//! movement labels are independently thresholded and can co-occur.

use std::collections::HashMap;

use crate::lexicon::LexiconStore;
use crate::sentiment::analyze_sentiment;
use crate::types::{CommunityMood, Emotion, MoodLabel, MoodTrend, Post};

/// Mean-score threshold for the positive/negative mood labels
const SCORE_THRESHOLD: f64 = 0.3;

/// Post-share threshold for the optimistic/concerned mood labels
const SHARE_THRESHOLD: f64 = 0.6;

/// Aggregate the mood of a batch of posts
pub fn analyze_community_mood(
    store: &LexiconStore,
    posts: &[Post],
    language: &str,
) -> CommunityMood {
    if posts.is_empty() {
        return CommunityMood {
            mood: MoodLabel::Neutral,
            score: 0.0,
            trends: Vec::new(),
            keywords: Vec::new(),
        };
    }

    let sentiments: Vec<_> = posts
        .iter()
        .map(|post| analyze_sentiment(store, &post.text, language))
        .collect();

    let avg_score = sentiments.iter().map(|s| s.score).sum::<f64>() / sentiments.len() as f64;
    let positive_count = sentiments
        .iter()
        .filter(|s| s.emotion == Emotion::Positive)
        .count();
    let negative_count = sentiments
        .iter()
        .filter(|s| s.emotion == Emotion::Negative)
        .count();

    let mood = if avg_score > SCORE_THRESHOLD {
        MoodLabel::Positive
    } else if avg_score < -SCORE_THRESHOLD {
        MoodLabel::Negative
    } else if positive_count as f64 > posts.len() as f64 * SHARE_THRESHOLD {
        MoodLabel::Optimistic
    } else if negative_count as f64 > posts.len() as f64 * SHARE_THRESHOLD {
        MoodLabel::Concerned
    } else {
        MoodLabel::Neutral
    };

    // Keyword counts, insertion-ordered so ties keep first-seen order
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for sentiment in &sentiments {
        for keyword in &sentiment.keywords {
            if !counts.contains_key(keyword) {
                order.push(keyword.clone());
            }
            *counts.entry(keyword.clone()).or_insert(0) += 1;
        }
    }
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order.truncate(10);

    // Movement labels over the last 10 posts vs the 10 before; thresholds
    // are independent, so labels can co-occur
    let len = posts.len();
    let recent_mood = mean_sentiment(store, &posts[len.saturating_sub(10)..], language);
    let older_mood = mean_sentiment(
        store,
        &posts[len.saturating_sub(20)..len.saturating_sub(10)],
        language,
    );

    let mut trends = Vec::new();
    if recent_mood > older_mood + 0.1 {
        trends.push(MoodTrend::Improving);
    }
    if recent_mood < older_mood - 0.1 {
        trends.push(MoodTrend::Declining);
    }
    if (recent_mood - older_mood).abs() < 0.05 {
        trends.push(MoodTrend::Stable);
    }

    CommunityMood {
        mood,
        score: avg_score,
        trends,
        keywords: order,
    }
}

fn mean_sentiment(store: &LexiconStore, posts: &[Post], language: &str) -> f64 {
    if posts.is_empty() {
        return 0.0;
    }
    posts
        .iter()
        .map(|post| analyze_sentiment(store, &post.text, language).score)
        .sum::<f64>()
        / posts.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn posts(texts: &[&str]) -> Vec<Post> {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap();
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| Post {
                text: text.to_string(),
                timestamp: start + Duration::minutes(i as i64),
                user_id: i as u64,
            })
            .collect()
    }

    #[test]
    fn test_empty_batch_is_neutral() {
        let result = analyze_community_mood(&LexiconStore::new(), &[], "es");
        assert_eq!(result.mood, MoodLabel::Neutral);
        assert_eq!(result.score, 0.0);
        assert!(result.trends.is_empty());
        assert!(result.keywords.is_empty());
    }

    #[test]
    fn test_positive_batch() {
        let batch = posts(&[
            "la milonga estuvo excelente",
            "noche maravillosa con abrazo genial",
            "todo excelente",
        ]);
        let result = analyze_community_mood(&LexiconStore::new(), &batch, "es");
        assert_eq!(result.mood, MoodLabel::Positive);
        assert!(result.score > 0.3);
        assert!(result.keywords.contains(&"excelente".to_string()));
    }

    #[test]
    fn test_negative_batch() {
        let batch = posts(&["todo horrible", "terrible noche", "servicio horrible"]);
        let result = analyze_community_mood(&LexiconStore::new(), &batch, "es");
        assert_eq!(result.mood, MoodLabel::Negative);
        assert!(result.score < -0.3);
    }

    #[test]
    fn test_keywords_ranked_by_count() {
        let batch = posts(&[
            "todo excelente",
            "fue excelente",
            "noche maravillosa y excelente",
            "abrazo genial",
        ]);
        let result = analyze_community_mood(&LexiconStore::new(), &batch, "es");
        assert_eq!(result.keywords[0], "excelente");
    }

    #[test]
    fn test_improving_trend() {
        let mut texts: Vec<&str> = vec!["todo horrible"; 10];
        texts.extend(vec!["todo excelente"; 10]);
        let batch = posts(&texts);
        let result = analyze_community_mood(&LexiconStore::new(), &batch, "es");
        assert!(result.trends.contains(&MoodTrend::Improving));
        assert!(!result.trends.contains(&MoodTrend::Declining));
    }

    #[test]
    fn test_stable_trend_for_uniform_batch() {
        let batch = posts(&["la milonga estuvo bien"; 20]);
        let result = analyze_community_mood(&LexiconStore::new(), &batch, "es");
        assert!(result.trends.contains(&MoodTrend::Stable));
    }
}

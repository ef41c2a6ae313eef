//! Behavioral pattern miners and combiner
//!
//! Four independent, stateless detectors over one user's action log, plus
//! the weighted combiner that filters and ranks their output.

use chrono::{Datelike, Timelike};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::behavior::types::{BehaviorPattern, PatternCadence, TimeSlot};
use crate::types::{GeoPoint, UserAction};

/// Fixed category weights applied by the combiner
pub const WEIGHT_TEMPORAL: f64 = 0.30;
pub const WEIGHT_SOCIAL: f64 = 0.25;
pub const WEIGHT_CONTENT: f64 = 0.25;
pub const WEIGHT_LOCATION: f64 = 0.20;

/// Activity share a time bucket must exceed to emit a pattern
const BUCKET_SHARE_THRESHOLD: f64 = 0.1;

/// Maximum number of combined patterns retained
const MAX_COMBINED: usize = 20;

/// Action kinds counted as social interactions
const SOCIAL_KINDS: &[&str] = &["message", "like", "comment", "follow"];

/// Action kinds counted as content creation
const CONTENT_KINDS: &[&str] = &["post_create", "event_create", "memory_create"];

/// Miner outputs, one list per category
#[derive(Debug, Clone, Default)]
pub struct MinedPatterns {
    pub temporal: Vec<BehaviorPattern>,
    pub social: Vec<BehaviorPattern>,
    pub content: Vec<BehaviorPattern>,
    pub location: Vec<BehaviorPattern>,
}

/// Run all four miners over one user's action log
pub fn detect_patterns(actions: &[UserAction], cluster_radius_deg: f64) -> MinedPatterns {
    MinedPatterns {
        temporal: detect_temporal(actions),
        social: detect_social(actions),
        content: detect_content(actions),
        location: detect_location(actions, cluster_radius_deg),
    }
}

/// Hour-of-day and day-of-week buckets exceeding 10% of total activity
///
/// Hourly confidence scales by 2, weekly by 3; the asymmetry is intentional
/// since there are more hour buckets than day buckets.
pub fn detect_temporal(actions: &[UserAction]) -> Vec<BehaviorPattern> {
    let mut patterns = Vec::new();
    if actions.is_empty() {
        return patterns;
    }
    let total = actions.len() as f64;

    let mut hourly: BTreeMap<u32, usize> = BTreeMap::new();
    let mut weekly: BTreeMap<u32, usize> = BTreeMap::new();
    for action in actions {
        *hourly.entry(action.timestamp.hour()).or_insert(0) += 1;
        *weekly
            .entry(action.timestamp.weekday().num_days_from_sunday())
            .or_insert(0) += 1;
    }

    for (hour, count) in &hourly {
        let probability = *count as f64 / total;
        if probability > BUCKET_SHARE_THRESHOLD {
            patterns.push(BehaviorPattern {
                cadence: PatternCadence::Daily,
                time_slots: vec![TimeSlot {
                    day_of_week: None,
                    hour_of_day: Some(*hour),
                    activity: "active".to_string(),
                    probability,
                }],
                frequency: *count,
                confidence: (probability * 2.0).min(1.0),
            });
        }
    }

    for (day, count) in &weekly {
        let probability = *count as f64 / total;
        if probability > BUCKET_SHARE_THRESHOLD {
            patterns.push(BehaviorPattern {
                cadence: PatternCadence::Weekly,
                time_slots: vec![TimeSlot {
                    day_of_week: Some(*day),
                    hour_of_day: None,
                    activity: "active".to_string(),
                    probability,
                }],
                frequency: *count,
                confidence: (probability * 3.0).min(1.0),
            });
        }
    }

    patterns
}

/// One pattern when social interactions exceed 10 actions
pub fn detect_social(actions: &[UserAction]) -> Vec<BehaviorPattern> {
    let interactions = actions
        .iter()
        .filter(|a| SOCIAL_KINDS.contains(&a.kind.as_str()))
        .count();

    if interactions > 10 {
        vec![BehaviorPattern {
            cadence: PatternCadence::Daily,
            time_slots: Vec::new(),
            frequency: interactions,
            confidence: (interactions as f64 / actions.len() as f64).min(1.0),
        }]
    } else {
        Vec::new()
    }
}

/// One pattern when content creations exceed 5 actions
pub fn detect_content(actions: &[UserAction]) -> Vec<BehaviorPattern> {
    let creations = actions
        .iter()
        .filter(|a| CONTENT_KINDS.contains(&a.kind.as_str()))
        .count();

    if creations > 5 {
        vec![BehaviorPattern {
            cadence: PatternCadence::Weekly,
            time_slots: Vec::new(),
            frequency: creations,
            confidence: (creations as f64 * 2.0 / actions.len() as f64).min(1.0),
        }]
    } else {
        Vec::new()
    }
}

/// One pattern per location cluster with more than 5 members
pub fn detect_location(actions: &[UserAction], cluster_radius_deg: f64) -> Vec<BehaviorPattern> {
    let mut patterns = Vec::new();

    let located: Vec<GeoPoint> = actions.iter().filter_map(|a| a.location).collect();
    if located.len() <= 10 {
        return patterns;
    }

    for cluster in cluster_locations(&located, cluster_radius_deg) {
        if cluster.count > 5 {
            patterns.push(BehaviorPattern {
                cadence: PatternCadence::Daily,
                time_slots: Vec::new(),
                frequency: cluster.count,
                confidence: cluster.count as f64 / located.len() as f64,
            });
        }
    }

    patterns
}

/// One proximity cluster with a running centroid
#[derive(Debug, Clone)]
pub struct LocationCluster {
    pub center: GeoPoint,
    pub count: usize,
}

/// Incremental centroid clustering by Euclidean degree distance
pub fn cluster_locations(locations: &[GeoPoint], radius_deg: f64) -> Vec<LocationCluster> {
    let mut clusters: Vec<LocationCluster> = Vec::new();

    for loc in locations {
        let mut added = false;
        for cluster in clusters.iter_mut() {
            let dist = ((loc.lat - cluster.center.lat).powi(2)
                + (loc.lng - cluster.center.lng).powi(2))
            .sqrt();
            if dist < radius_deg {
                cluster.count += 1;
                let n = cluster.count as f64;
                cluster.center.lat = (cluster.center.lat * (n - 1.0) + loc.lat) / n;
                cluster.center.lng = (cluster.center.lng * (n - 1.0) + loc.lng) / n;
                added = true;
                break;
            }
        }
        if !added {
            clusters.push(LocationCluster {
                center: *loc,
                count: 1,
            });
        }
    }

    clusters
}

/// Weight, filter, and rank miner output
///
/// Each confidence is multiplied by its category weight; entries below the
/// minimum threshold are dropped, the rest sorted descending, top 20 kept.
pub fn combine_patterns(mined: &MinedPatterns, min_confidence: f64) -> Vec<BehaviorPattern> {
    let mut combined = Vec::new();

    let groups = [
        (&mined.temporal, WEIGHT_TEMPORAL),
        (&mined.social, WEIGHT_SOCIAL),
        (&mined.content, WEIGHT_CONTENT),
        (&mined.location, WEIGHT_LOCATION),
    ];

    for (patterns, weight) in groups {
        for pattern in patterns.iter() {
            let mut weighted = pattern.clone();
            weighted.confidence *= weight;
            if weighted.confidence >= min_confidence {
                combined.push(weighted);
            }
        }
    }

    combined.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });
    combined.truncate(MAX_COMBINED);
    combined
}

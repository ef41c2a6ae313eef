//! Trend detection over numeric time series
//!
//! Computes a trailing moving average, compares the recent window mean to
//! the previous one, and derives velocity, acceleration, and a direction
//! forecast. Works on a sorted copy; the caller's slice is never reordered.

use crate::types::{TrendDetection, TrendDirection, TrendPoint, TrendPrediction};

/// Relative-change threshold above which a series counts as trending
const VELOCITY_THRESHOLD: f64 = 0.1;

/// Detect a trend in a series using the given moving-average window
pub fn detect_trend(points: &[TrendPoint], window: usize) -> TrendDetection {
    if points.len() < 2 {
        return TrendDetection::not_trending(window);
    }

    let mut sorted: Vec<&TrendPoint> = points.iter().collect();
    sorted.sort_by_key(|p| p.timestamp);

    // Trailing moving average at every index
    let mut moving_avg = Vec::with_capacity(sorted.len());
    for i in 0..sorted.len() {
        let start = (i + 1).saturating_sub(window);
        let slice = &sorted[start..=i];
        let avg: f64 = slice.iter().map(|p| p.value).sum::<f64>() / slice.len() as f64;
        moving_avg.push(avg);
    }

    let len = moving_avg.len();
    let recent = &moving_avg[len.saturating_sub(window)..];
    let recent_avg = recent.iter().sum::<f64>() / recent.len() as f64;

    let previous = &moving_avg[len.saturating_sub(window * 2)..len.saturating_sub(window)];
    let previous_avg = if previous.is_empty() {
        recent_avg
    } else {
        previous.iter().sum::<f64>() / previous.len() as f64
    };

    let velocity = if previous_avg != 0.0 {
        (recent_avg - previous_avg) / previous_avg
    } else {
        0.0
    };
    let acceleration = calculate_acceleration(&moving_avg);

    let trending = velocity.abs() > VELOCITY_THRESHOLD;
    let trend_score = (velocity.abs() * 10.0).min(1.0);

    let (direction, mut confidence) = if velocity > VELOCITY_THRESHOLD {
        (TrendDirection::Up, (0.5 + velocity).min(1.0))
    } else if velocity < -VELOCITY_THRESHOLD {
        (TrendDirection::Down, (0.5 + velocity.abs()).min(1.0))
    } else {
        (TrendDirection::Stable, 0.5)
    };

    // A sign-agreeing acceleration strengthens the forecast
    if (acceleration > 0.0 && direction == TrendDirection::Up)
        || (acceleration < 0.0 && direction == TrendDirection::Down)
    {
        confidence = (confidence + 0.1).min(1.0);
    }

    TrendDetection {
        trending,
        trend_score,
        velocity,
        time_window: format!("{} days", window),
        related_trends: find_related_trends(&sorted),
        prediction: TrendPrediction {
            direction,
            confidence,
        },
    }
}

/// Mean of the last 3 moving-average first-differences minus the mean of
/// the 3 before that
fn calculate_acceleration(values: &[f64]) -> f64 {
    if values.len() < 3 {
        return 0.0;
    }

    let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    let len = diffs.len();

    let recent: f64 = diffs[len.saturating_sub(3)..].iter().sum::<f64>() / 3.0;
    let previous: f64 =
        diffs[len.saturating_sub(6)..len.saturating_sub(3)].iter().sum::<f64>() / 3.0;

    recent - previous
}

/// Union of metadata tags and categories, first 5 in insertion order
fn find_related_trends(points: &[&TrendPoint]) -> Vec<String> {
    let mut trends: Vec<String> = Vec::new();

    for point in points {
        if let Some(tags) = point.metadata.get("tags").and_then(|v| v.as_array()) {
            for tag in tags.iter().filter_map(|v| v.as_str()) {
                if !trends.iter().any(|t| t == tag) {
                    trends.push(tag.to_string());
                }
            }
        }
        if let Some(category) = point.metadata.get("category").and_then(|v| v.as_str()) {
            if !trends.iter().any(|t| t == category) {
                trends.push(category.to_string());
            }
        }
    }

    trends.truncate(5);
    trends
}

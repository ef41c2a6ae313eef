//! Statistical and periodicity anomaly detection
//!
//! Primary pass: z-score of the latest value against the population mean,
//! thresholded per series kind. Secondary pass: pattern-break and
//! autocorrelation periodicity checks. The secondary pass refines the
//! anomaly kind and recommendations; it does not change the primary pass's
//! verdict or score.

use crate::types::{AnomalyContext, AnomalyDetection, AnomalyPoint, Severity};

/// Minimum series length for anomaly detection
const MIN_POINTS: usize = 10;

/// Minimum series length for the periodicity check
const MIN_PERIODICITY_POINTS: usize = 20;

/// Relative mean shift that flags a pattern break
const PATTERN_BREAK_THRESHOLD: f64 = 0.5;

/// Z-score threshold per series kind; the first element's kind selects it
fn threshold_for(kind: &str) -> f64 {
    match kind {
        "activity" => 3.0,
        "content" => 2.5,
        "social" => 2.0,
        "security" => 1.5,
        _ => 2.5,
    }
}

/// Detect an anomaly in the latest value of a typed series
pub fn detect_anomaly(points: &[AnomalyPoint], context: Option<&AnomalyContext>) -> AnomalyDetection {
    if points.len() < MIN_POINTS {
        return AnomalyDetection::insufficient_data();
    }

    let values: Vec<f64> = points.iter().map(|p| p.value).collect();
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let std_dev = (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / values.len() as f64)
        .sqrt();

    let latest = values[values.len() - 1];
    let z_score = if std_dev != 0.0 {
        ((latest - mean) / std_dev).abs()
    } else {
        0.0
    };

    let threshold = threshold_for(&points[0].kind);
    let is_anomaly = z_score > threshold;
    let anomaly_score = (z_score / 5.0).min(1.0);

    let severity = if z_score > 4.0 {
        Severity::Critical
    } else if z_score > 3.0 {
        Severity::High
    } else if z_score > 2.0 {
        Severity::Medium
    } else {
        Severity::Low
    };

    let mut description = String::new();
    let mut kind = "statistical".to_string();
    let mut recommendations: Vec<String> = Vec::new();

    if is_anomaly {
        if latest > mean + threshold * std_dev {
            description = format!("Unusually high {} detected", points[0].kind);
            kind = "spike".to_string();
            recommendations.push("Review recent changes".to_string());
            recommendations.push("Check for automated activity".to_string());
        } else if latest < mean - threshold * std_dev {
            description = format!("Unusually low {} detected", points[0].kind);
            kind = "drop".to_string();
            recommendations.push("Investigate potential issues".to_string());
            recommendations.push("Check system connectivity".to_string());
        }

        if let Some(ctx) = context {
            if ctx.user_id.is_some() {
                recommendations.push("Review user activity history".to_string());
            }
            if ctx.location.is_some() {
                recommendations.push("Check location-specific factors".to_string());
            }
        }
    } else {
        description = "No anomalies detected".to_string();
    }

    // Secondary pass refines the kind and appends recommendations only
    if let Some(pattern) = detect_pattern_anomaly(&values) {
        log::debug!("pattern anomaly: {}", pattern.kind);
        kind = pattern.kind;
        recommendations.extend(pattern.recommendations);
    }

    dedup_preserving_order(&mut recommendations);

    AnomalyDetection {
        is_anomaly,
        anomaly_score,
        kind,
        description,
        severity,
        recommendations,
    }
}

fn dedup_preserving_order(items: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    items.retain(|item| seen.insert(item.clone()));
}

struct PatternAnomaly {
    kind: String,
    recommendations: Vec<String>,
}

/// Compare the last 5 values against the preceding 15, then fall back to a
/// periodicity check
fn detect_pattern_anomaly(values: &[f64]) -> Option<PatternAnomaly> {
    let len = values.len();
    let recent = &values[len.saturating_sub(5)..];
    let historical = &values[len.saturating_sub(20)..len.saturating_sub(5)];

    if historical.is_empty() {
        return None;
    }

    let recent_mean = recent.iter().sum::<f64>() / recent.len() as f64;
    let hist_mean = historical.iter().sum::<f64>() / historical.len() as f64;

    let change = ((recent_mean - hist_mean) / hist_mean).abs();
    if change > PATTERN_BREAK_THRESHOLD {
        return Some(PatternAnomaly {
            kind: "pattern_break".to_string(),
            recommendations: vec![
                "Pattern change detected".to_string(),
                "Review recent events".to_string(),
            ],
        });
    }

    let (_, broken) = detect_periodicity(values);
    if broken {
        return Some(PatternAnomaly {
            kind: "periodicity_break".to_string(),
            recommendations: vec![
                "Regular pattern disrupted".to_string(),
                "Check scheduling".to_string(),
            ],
        });
    }

    None
}

/// Raw autocorrelation over lags 1..=min(10, n/2); returns the best lag and
/// whether the latest two periods diverge from the two before
fn detect_periodicity(values: &[f64]) -> (usize, bool) {
    if values.len() < MIN_PERIODICITY_POINTS {
        return (0, false);
    }

    let max_lag = 10.min(values.len() / 2);
    let mut max_corr = 0.0;
    let mut best_period = 0usize;

    for lag in 1..=max_lag {
        let mut correlation = 0.0;
        let mut count = 0usize;
        for i in lag..values.len() {
            correlation += values[i] * values[i - lag];
            count += 1;
        }
        correlation /= count as f64;

        if correlation > max_corr {
            max_corr = correlation;
            best_period = lag;
        }
    }

    if best_period == 0 {
        return (0, false);
    }

    let len = values.len();
    let recent = &values[len.saturating_sub(best_period * 2)..];
    let expected = &values[len.saturating_sub(best_period * 4)..len.saturating_sub(best_period * 2)];

    if recent.len() == expected.len() {
        let difference: f64 = recent
            .iter()
            .zip(expected.iter())
            .map(|(a, b)| (a - b).abs())
            .sum::<f64>()
            / recent.len() as f64;
        return (best_period, difference > max_corr * 0.5);
    }

    (best_period, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn series(kind: &str, values: &[f64]) -> Vec<AnomalyPoint> {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| AnomalyPoint {
                timestamp: start + Duration::hours(i as i64),
                value,
                kind: kind.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_short_series_is_insufficient_data() {
        let points = series("activity", &[1.0; 9]);
        let result = detect_anomaly(&points, None);
        assert!(!result.is_anomaly);
        assert_eq!(result.kind, "insufficient_data");
    }

    #[test]
    fn test_constant_series_never_anomalous() {
        let points = series("security", &[7.0; 30]);
        let result = detect_anomaly(&points, None);
        assert!(!result.is_anomaly);
        assert_eq!(result.anomaly_score, 0.0);
        assert_eq!(result.severity, Severity::Low);
    }

    #[test]
    fn test_spike_detected() {
        let mut values = vec![10.0; 19];
        values.push(100.0);
        let points = series("social", &values);
        let result = detect_anomaly(&points, None);
        assert!(result.is_anomaly);
        // The mean shift also trips the pattern-break refinement
        assert_eq!(result.kind, "pattern_break");
        assert!(result.description.contains("Unusually high"));
        assert!(result.anomaly_score > 0.0);
    }

    #[test]
    fn test_drop_detected() {
        // Enough spread to keep stddev meaningful, then a collapse
        let mut values: Vec<f64> = (0..19).map(|i| 50.0 + (i % 5) as f64).collect();
        values.push(0.0);
        let points = series("security", &values);
        let result = detect_anomaly(&points, None);
        assert!(result.is_anomaly);
        assert!(result.description.contains("Unusually low"));
    }

    #[test]
    fn test_threshold_per_series_kind() {
        // A deviation of ~2.1 sigma trips the social threshold (2.0) but
        // not the activity threshold (3.0)
        let mut values = vec![10.0, 12.0, 10.0, 12.0, 10.0, 12.0, 10.0, 12.0, 10.0];
        values.push(16.0);
        let social = detect_anomaly(&series("social", &values), None);
        let activity = detect_anomaly(&series("activity", &values), None);
        assert!(social.is_anomaly);
        assert!(!activity.is_anomaly);
    }

    #[test]
    fn test_context_recommendations() {
        let mut values = vec![10.0; 19];
        values.push(100.0);
        let ctx = AnomalyContext {
            user_id: Some(42),
            location: Some("Buenos Aires".to_string()),
        };
        let result = detect_anomaly(&series("social", &values), Some(&ctx));
        assert!(result
            .recommendations
            .contains(&"Review user activity history".to_string()));
        assert!(result
            .recommendations
            .contains(&"Check location-specific factors".to_string()));
    }

    #[test]
    fn test_recommendations_deduplicated() {
        let mut values = vec![10.0; 19];
        values.push(100.0);
        let result = detect_anomaly(&series("social", &values), None);
        let mut seen = std::collections::HashSet::new();
        for rec in &result.recommendations {
            assert!(seen.insert(rec.clone()), "duplicate recommendation: {}", rec);
        }
    }

    #[test]
    fn test_periodicity_detection() {
        // Strong period-2 alternation, then a flat tail breaking it
        let mut values = Vec::new();
        for _ in 0..14 {
            values.push(10.0);
            values.push(2.0);
        }
        values.extend_from_slice(&[6.0, 6.0, 6.0, 6.0]);
        let (period, _) = detect_periodicity(&values);
        assert!(period > 0);
    }

    #[test]
    fn test_severity_ladder() {
        let mut values = vec![10.0; 19];
        values.push(200.0);
        let result = detect_anomaly(&series("social", &values), None);
        assert_eq!(result.severity, Severity::Critical);
    }
}

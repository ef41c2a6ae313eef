//! Engine configuration
//!
//! All tunable knobs for the analytic pipeline live here. Values outside
//! their documented range are clamped or rejected at validation time.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Default language for text analysis when the caller does not supply one
pub const DEFAULT_LANGUAGE: &str = "es";

/// Default trend detection window in days
pub const DEFAULT_TREND_WINDOW: usize = 7;

/// Default minimum post-weighting confidence a combined pattern must clear
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.6;

/// Default per-user action buffer capacity
pub const DEFAULT_ACTION_BUFFER_CAP: usize = 1000;

/// Default location cluster radius in degrees (~1 km)
pub const DEFAULT_CLUSTER_RADIUS_DEG: f64 = 0.01;

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fallback language for sentiment/topic analysis
    pub default_language: String,
    /// Moving-average window for trend detection, in days
    pub trend_window: usize,
    /// Minimum combined-pattern confidence, clamped to [0.3, 0.9]
    pub min_confidence: f64,
    /// Per-user action buffer capacity (oldest entries evicted on overflow)
    pub action_buffer_cap: usize,
    /// Proximity threshold for location clustering, in degrees
    pub cluster_radius_deg: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_string(),
            trend_window: DEFAULT_TREND_WINDOW,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            action_buffer_cap: DEFAULT_ACTION_BUFFER_CAP,
            cluster_radius_deg: DEFAULT_CLUSTER_RADIUS_DEG,
        }
    }
}

impl EngineConfig {
    /// Set the minimum confidence threshold, clamped to [0.3, 0.9]
    pub fn set_min_confidence(&mut self, threshold: f64) {
        self.min_confidence = threshold.clamp(0.3, 0.9);
    }

    /// Validate structural constraints that cannot be clamped
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.trend_window == 0 {
            return Err(EngineError::InvalidConfig(
                "trend_window must be at least 1".to_string(),
            ));
        }
        if self.action_buffer_cap == 0 {
            return Err(EngineError::InvalidConfig(
                "action_buffer_cap must be at least 1".to_string(),
            ));
        }
        if self.cluster_radius_deg <= 0.0 {
            return Err(EngineError::InvalidConfig(
                "cluster_radius_deg must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.default_language, "es");
        assert_eq!(config.trend_window, 7);
        assert!((config.min_confidence - 0.6).abs() < f64::EPSILON);
        assert_eq!(config.action_buffer_cap, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_min_confidence_clamped() {
        let mut config = EngineConfig::default();
        config.set_min_confidence(0.1);
        assert!((config.min_confidence - 0.3).abs() < f64::EPSILON);
        config.set_min_confidence(0.95);
        assert!((config.min_confidence - 0.9).abs() < f64::EPSILON);
        config.set_min_confidence(0.7);
        assert!((config.min_confidence - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_rejects_zero_window() {
        let config = EngineConfig {
            trend_window: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}

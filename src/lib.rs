//! pulso: in-process community analytics
//!
//! Analyzes social activity entirely in-process: lexicon-based sentiment
//! and topic extraction for Spanish and English text, moving-average
//! trend detection, z-score anomaly detection over labeled series,
//! behavioral pattern mining from per-user action logs, predictions and
//! ranked smart suggestions derived from those patterns, and aggregate
//! community mood over post batches.
//!
//! `InsightEngine` is the facade: it owns the lexicons, per-user action
//! buffers, and the pattern caches, and is cheap to share behind an
//! `Arc`. The analysis modules underneath are pure functions over their
//! inputs and can be used directly.
//!
//! ```no_run
//! use pulso::{EngineConfig, InsightEngine};
//!
//! let engine = InsightEngine::new(EngineConfig::default());
//! let result = engine.analyze_sentiment("La milonga fue excelente", "es");
//! assert!(result.score > 0.0);
//! ```

pub mod anomaly;
pub mod behavior;
pub mod config;
pub mod engine;
pub mod error;
pub mod lexicon;
pub mod mood;
pub mod scheduler;
pub mod sentiment;
pub mod topics;
pub mod trend;
pub mod types;

pub use behavior::{SuggestionContext, UserPattern};
pub use config::EngineConfig;
pub use engine::InsightEngine;
pub use error::EngineError;
pub use lexicon::LexiconStore;
pub use scheduler::{spawn_global_recompute, Ticker};
pub use types::{
    AnomalyContext, AnomalyDetection, AnomalyPoint, CommunityMood, Post, SentimentAnalysis,
    TopicExtraction, TrendDetection, TrendPoint, UserAction,
};

/// Crate version, for embedding in diagnostics
pub const PULSO_VERSION: &str = env!("CARGO_PKG_VERSION");

//! Behavioral pattern mining
//!
//! Turns one user's action log into category-specific candidate patterns
//! (temporal, social, content, location), combines them with fixed weights,
//! and derives explained predictions and ranked suggestions.
//!
//! ## Pipeline
//!
//! Actions → miners → combiner → prediction generator → suggestion ranker.
//! Every stage is stateless over its input; per-user state lives in the
//! engine's caches.

pub mod miners;
pub mod predict;
pub mod profile;
pub mod store;
pub mod suggest;
pub mod types;

pub use miners::{combine_patterns, detect_patterns};
pub use predict::generate_predictions;
pub use profile::analyze_user_patterns;
pub use store::ActionLog;
pub use suggest::{generate_smart_suggestions, SuggestionContext};
pub use types::{
    ActivityPattern, BehaviorPattern, EngagementPattern, InterestPattern, PatternCadence,
    Prediction, SmartSuggestion, SocialPattern, SuggestionKind, Timeframe, Timing, UserInsight,
    UserPattern,
};

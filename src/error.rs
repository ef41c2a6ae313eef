//! Error types for Pulso

use thiserror::Error;

/// Errors that can occur at the engine boundary
///
/// Analytic functions are total over their domain: sparse or empty input
/// produces a neutral result, never an error. Only malformed outer input
/// (bad JSON, invalid configuration) surfaces here.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

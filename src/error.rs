//! Engine error types.
//!
//! Configuration and classification errors are surfaced to the caller;
//! solver failures and admission rejections are handled locally by the
//! components that produce them and never appear here.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by the simulation and scheduling engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid or incomplete configuration, detected at load time.
    #[error("configuration error: {0}")]
    Config(String),

    /// An arrival-rate expression failed to parse.
    #[error("cannot parse arrival function '{expression}': {message}")]
    ExpressionParse {
        /// The offending expression string.
        expression: String,
        /// Parser diagnostic.
        message: String,
    },

    /// A diagnosis code outside 1..=17 reached a triage classifier.
    #[error("unknown diagnosis code: {0}")]
    UnknownDiagnosis(u8),

    /// The arrival-rate function produced a non-positive multiplier.
    #[error("arrival function '{label}' evaluated to {value} at t={t}; rate must be positive")]
    ArrivalRateNonPositive {
        /// Label of the configured arrival function.
        label: String,
        /// Hour index at which evaluation failed.
        t: i64,
        /// The offending value.
        value: f64,
    },

    /// Underlying I/O failure (config load, CSV flush).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed configuration JSON.
    #[error("configuration parse error: {0}")]
    Json(#[from] serde_json::Error),
}

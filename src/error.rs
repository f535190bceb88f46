//! Rich diagnostic error types for the critical reasoning engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so callers know exactly
//! what went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

use crate::imperative::EvaluatorError;
use crate::principle::{Imperative, Principle};

/// Top-level error type for the engine.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text) through to the caller.
#[derive(Debug, Error, Diagnostic)]
pub enum CarError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Practice(#[from] PracticeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Evaluator(#[from] EvaluatorError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Aggregate(#[from] AggregateError),
}

// ---------------------------------------------------------------------------
// Practice errors
// ---------------------------------------------------------------------------

/// A submitted practice cannot be evaluated at all.
#[derive(Debug, Error, Diagnostic)]
pub enum PracticeError {
    #[error("malformed practice \"{id}\": {field} {reason}")]
    #[diagnostic(
        code(car::practice::malformed),
        help(
            "Every practice needs a non-empty `id` and `description`. Stakeholder \
             effects must name a stakeholder, and numeric parameters must be finite."
        )
    )]
    Malformed {
        id: String,
        field: String,
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Invalid engine configuration. Always fatal at construction time.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("weight for {principle} is {value}, expected a value in [0, 1]")]
    #[diagnostic(
        code(car::config::invalid_weight),
        help("Principle weights express emphasis and must lie between 0.0 and 1.0 inclusive.")
    )]
    InvalidWeight { principle: Principle, value: f64 },

    #[error("confidence threshold {value} is outside [0, 1]")]
    #[diagnostic(
        code(car::config::invalid_threshold),
        help("The threshold below which contested verdicts become indeterminate must lie in [0, 1]. The default is 0.75.")
    )]
    InvalidThreshold { value: f64 },

    #[error("boundary penalty {value} is outside (0, 1]")]
    #[diagnostic(
        code(car::config::invalid_penalty),
        help("In lenient mode each out-of-boundary claim multiplies confidence by this factor. Use a value in (0, 1].")
    )]
    InvalidPenalty { value: f64 },

    #[error("ambiguity decay rate {value} is outside [0, 1)")]
    #[diagnostic(
        code(car::config::invalid_decay),
        help("Each unresolved ambiguity multiplies confidence by (1 - rate). Use a rate in [0, 1).")
    )]
    InvalidDecayRate { value: f64 },

    #[error("indicator \"{name}\" has an invalid pattern: {message}")]
    #[diagnostic(
        code(car::config::invalid_indicator),
        help("Indicator patterns are regular expressions matched against normalized, lower-cased text.")
    )]
    InvalidIndicator { name: String, message: String },

    #[error("failed to read configuration {path}: {source}")]
    #[diagnostic(
        code(car::config::read),
        help("Check that the configuration file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration {path}: {message}")]
    #[diagnostic(
        code(car::config::parse),
        help("The configuration must be TOML. Run `car config` to print a valid default file.")
    )]
    Parse { path: String, message: String },

    #[error("failed to write configuration {path}")]
    #[diagnostic(
        code(car::config::write),
        help("Ensure you have write permissions to the target directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize configuration: {message}")]
    #[diagnostic(code(car::config::serialize))]
    Serialize { message: String },
}

// ---------------------------------------------------------------------------
// Aggregation errors
// ---------------------------------------------------------------------------

/// Misuse of the aggregator state machine.
#[derive(Debug, Error, Diagnostic)]
pub enum AggregateError {
    #[error("aggregator cannot {action} while {state}")]
    #[diagnostic(
        code(car::aggregate::invalid_transition),
        help(
            "The aggregator runs Collecting -> Weighing -> Resolved once per evaluation. \
             Call `reset()` or create a new aggregator for the next evaluation."
        )
    )]
    InvalidTransition { action: String, state: String },

    #[error("no verdict collected for {imperative}")]
    #[diagnostic(
        code(car::aggregate::missing_verdict),
        help("Weighing waits for all three imperative verdicts. Collect the missing one first.")
    )]
    MissingVerdict { imperative: Imperative },

    #[error("verdict for {imperative} was already collected")]
    #[diagnostic(
        code(car::aggregate::duplicate_verdict),
        help("Each imperative contributes exactly one verdict per evaluation.")
    )]
    DuplicateVerdict { imperative: Imperative },
}

/// Convenience result alias for engine operations.
pub type CarResult<T> = std::result::Result<T, CarError>;

/// Result type for practice validation.
pub type PracticeResult<T> = std::result::Result<T, PracticeError>;

/// Result type for configuration handling.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type for aggregation.
pub type AggregateResult<T> = std::result::Result<T, AggregateError>;

//! Error types for the rankkit library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when experiment parameters are invalid
//!   (e.g. zero capacity, validation requested for the wrong algorithm).
//! - [`ValidationError`]: Returned when the ranked structure's ranking
//!   diverges from the baseline oracle during a validated run.
//! - [`RunError`]: Either of the above, as surfaced by a full experiment
//!   run.

use std::fmt;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when experiment parameters are invalid.
///
/// Produced by [`Params::validate`](crate::experiment::Params::validate)
/// and the fallible experiment constructor. Carries a human-readable
/// description of which parameter failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// Error returned when a validated run finds the ranked structure and the
/// baseline oracle disagreeing.
///
/// Carries the 1-based update iteration at which the rankings diverged and
/// both full rankings for diagnosis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    iteration: u64,
    expected: Vec<(u64, usize)>,
    actual: Vec<(u64, usize)>,
}

impl ValidationError {
    /// Creates a new `ValidationError` for a divergence at `iteration`.
    pub fn new(iteration: u64, expected: Vec<(u64, usize)>, actual: Vec<(u64, usize)>) -> Self {
        Self {
            iteration,
            expected,
            actual,
        }
    }

    /// Returns the update iteration at which the rankings diverged.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Returns the baseline's ranking at the point of divergence.
    pub fn expected(&self) -> &[(u64, usize)] {
        &self.expected
    }

    /// Returns the ranked structure's ranking at the point of divergence.
    pub fn actual(&self) -> &[(u64, usize)] {
        &self.actual
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "validation failed at iteration {}: expected {:?}, got {:?}",
            self.iteration, self.expected, self.actual
        )
    }
}

impl std::error::Error for ValidationError {}

// ---------------------------------------------------------------------------
// RunError
// ---------------------------------------------------------------------------

/// Error surfaced by a full experiment run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    /// The parameters were rejected before any run started.
    Config(ConfigError),
    /// A validated run diverged from the oracle.
    Validation(ValidationError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Config(err) => err.fmt(f),
            RunError::Validation(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Config(err) => Some(err),
            RunError::Validation(err) => Some(err),
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(err: ConfigError) -> Self {
        RunError::Config(err)
    }
}

impl From<ValidationError> for RunError {
    fn from(err: ValidationError) -> Self {
        RunError::Validation(err)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

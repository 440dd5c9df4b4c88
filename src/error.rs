//! Error type shared by every fallible operation in the crate.
//!
//! Variants fall into two families: shape errors (a vector of the wrong
//! length was supplied) and usage errors (the caller asked for something
//! the evaluator was not configured to do). Both are terminal for the
//! call that produced them; nothing is retried and no state is mutated
//! before the check fails.

use thiserror::Error;

/// Errors raised by structures, evaluators and ensembles.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RnnError {
    /// A vector did not have the length the topology requires.
    #[error("dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Which argument was malformed
        what: &'static str,
        /// Length required by the topology
        expected: usize,
        /// Length that was supplied
        actual: usize,
    },

    /// The stateless evaluation entry point was called on a model that
    /// can only be evaluated one time step at a time.
    #[error("{model} can not be evaluated without a state object")]
    StateRequired {
        /// Name of the model that refused the call
        model: &'static str,
    },

    /// A gradient was requested from a state created without gradient
    /// tracking.
    #[error("state was created without gradient tracking")]
    GradientNotTracked,

    /// The state was created for a topology with different dimensions.
    #[error("state does not belong to this topology: {reason}")]
    StateMismatch {
        /// First dimension that disagreed
        reason: String,
    },

    /// A synapse could not be added to the structure.
    #[error("invalid synapse {source_unit} -> neuron {neuron}: {reason}")]
    InvalidSynapse {
        /// Source unit index
        source_unit: usize,
        /// Destination neuron index
        neuron: usize,
        /// Why the synapse was rejected
        reason: &'static str,
    },

    /// A structural parameter (sparsity, range, ...) was out of bounds.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// Ensemble weights must be strictly positive.
    #[error("ensemble weight must be positive, got {0}")]
    InvalidWeight(f64),

    /// An ensemble with no members was evaluated.
    #[error("ensemble has no models")]
    EmptyEnsemble,

    /// A structure configuration could not be parsed or applied.
    #[error("configuration error: {0}")]
    Config(String),
}

impl RnnError {
    /// Returns `true` for errors caused by a wrongly shaped argument.
    pub fn is_shape_error(&self) -> bool {
        matches!(self, RnnError::DimensionMismatch { .. })
    }

    /// Returns `true` for errors caused by calling an operation the model
    /// or state was not set up for.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            RnnError::StateRequired { .. }
                | RnnError::GradientNotTracked
                | RnnError::StateMismatch { .. }
        )
    }
}

impl From<serde_json::Error> for RnnError {
    fn from(err: serde_json::Error) -> Self {
        RnnError::Config(err.to_string())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, RnnError>;

/// Fails with [`RnnError::DimensionMismatch`] unless `actual == expected`.
pub(crate) fn ensure_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(RnnError::DimensionMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

use thiserror::Error;
use tonescope_core::Error as PipelineError;

/// Validation errors raised at kernel construction or adapter binding time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required input or configuration field is empty.
    #[error("Input `{arg}` was empty.")]
    EmptyInput {
        /// Name of the argument that is empty.
        arg: &'static str,
    },
    /// A configuration argument value is invalid.
    #[error("Invalid argument `{arg}`: {reason}")]
    InvalidArgument {
        /// Name of the argument.
        arg: &'static str,
        /// Human readable reason.
        reason: &'static str,
    },
    /// A contiguous 1D slice view could not be obtained.
    #[error("Argument `{arg}` is not contiguous in memory.")]
    NonContiguous {
        /// Name of the argument that is non-contiguous.
        arg: &'static str,
    },
    /// Output/input lengths did not match required shape.
    #[error("Length mismatch on `{arg}`. Expected {expected}, got {got}.")]
    LengthMismatch {
        /// Name of the argument.
        arg: &'static str,
        /// Required length.
        expected: usize,
        /// Received length.
        got: usize,
    },
}

/// Runtime execution invariant violations for checked kernel entrypoints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecInvariantViolation {
    /// The input is shorter than the configured kernel needs.
    #[error("Input `{arg}` needs at least {required} samples, got {got}.")]
    InsufficientData {
        /// What the data is needed for.
        arg: &'static str,
        /// Minimum sample count.
        required: usize,
        /// Received sample count.
        got: usize,
    },
    /// An execution precondition was violated.
    #[error("Execution invariant violation: {reason}")]
    InvalidState {
        /// Human readable reason.
        reason: &'static str,
    },
    /// Output length mismatched the expected runtime shape.
    #[error("Execution length mismatch on `{arg}`. Expected {expected}, got {got}.")]
    LengthMismatch {
        /// Name of the argument.
        arg: &'static str,
        /// Required length.
        expected: usize,
        /// Received length.
        got: usize,
    },
    /// Adapter binding/configuration failure.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<ConfigError> for PipelineError {
    fn from(value: ConfigError) -> Self {
        match value {
            ConfigError::EmptyInput { arg } => PipelineError::invalid_config(arg, "must not be empty"),
            ConfigError::InvalidArgument { arg, reason } => PipelineError::invalid_config(arg, reason),
            ConfigError::NonContiguous { arg } => {
                PipelineError::invalid_config(arg, "must be contiguous in memory")
            }
            ConfigError::LengthMismatch { arg, expected, got } => PipelineError::invalid_config(
                arg,
                format!("expected length {expected}, got {got}"),
            ),
        }
    }
}

impl From<ExecInvariantViolation> for PipelineError {
    fn from(value: ExecInvariantViolation) -> Self {
        match value {
            ExecInvariantViolation::InsufficientData { arg, required, got } => {
                PipelineError::insufficient_data(arg, required, got)
            }
            ExecInvariantViolation::InvalidState { reason } => PipelineError::numerical(reason),
            ExecInvariantViolation::LengthMismatch { arg, expected, got } => {
                PipelineError::invalid_config(arg, format!("expected length {expected}, got {got}"))
            }
            ExecInvariantViolation::Config(err) => err.into(),
        }
    }
}

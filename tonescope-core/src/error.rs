use thiserror::Error;

/// Errors raised by the tonescope pipeline stages.
///
/// Callers branch on [`Error::kind`] rather than on message text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A parameter is malformed or outside its legal range.
    #[error("Invalid configuration `{arg}`: {reason}")]
    InvalidConfig {
        /// The offending parameter.
        arg: String,
        /// Why it was rejected.
        reason: String,
    },
    /// The signal is too short for the requested operation.
    #[error("Insufficient data for `{arg}`: need at least {required} samples, got {got}")]
    InsufficientData {
        /// What needed the data (window, filter padding, ...).
        arg: String,
        /// Minimum number of samples.
        required: usize,
        /// Number of samples supplied.
        got: usize,
    },
    /// A numeric routine could not produce a result (singular system, ...).
    #[error("Numerical failure: {reason}")]
    Numerical {
        /// Human readable reason.
        reason: String,
    },
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`Error::InvalidConfig`].
    InvalidConfig,
    /// See [`Error::InsufficientData`].
    InsufficientData,
    /// See [`Error::Numerical`].
    Numerical,
}

impl Error {
    /// Build an [`Error::InvalidConfig`].
    pub fn invalid_config(arg: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidConfig {
            arg: arg.into(),
            reason: reason.into(),
        }
    }

    /// Build an [`Error::InsufficientData`].
    pub fn insufficient_data(arg: impl Into<String>, required: usize, got: usize) -> Self {
        Error::InsufficientData {
            arg: arg.into(),
            required,
            got,
        }
    }

    /// Build an [`Error::Numerical`].
    pub fn numerical(reason: impl Into<String>) -> Self {
        Error::Numerical {
            reason: reason.into(),
        }
    }

    /// Which class of failure this is.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidConfig { .. } => ErrorKind::InvalidConfig,
            Error::InsufficientData { .. } => ErrorKind::InsufficientData,
            Error::Numerical { .. } => ErrorKind::Numerical,
        }
    }
}

/// Result alias used across the tonescope crates.
pub type Result<T> = core::result::Result<T, Error>;

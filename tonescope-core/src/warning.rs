use core::fmt;
use serde::{Deserialize, Serialize};

/// A recoverable degradation reported alongside a successful result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// The requested window name was not recognised and a fallback was used.
    UnknownWindow {
        /// Name as supplied by the caller.
        requested: String,
        /// Window actually used.
        fallback: String,
    },
    /// Group delay was undefined at some frequencies and set to zero there.
    SingularGroupDelay {
        /// Number of affected grid points.
        points: usize,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnknownWindow {
                requested,
                fallback,
            } => write!(
                f,
                "Window type '{requested}' not recognized. Using {fallback} window instead."
            ),
            Warning::SingularGroupDelay { points } => write!(
                f,
                "Group delay is singular at {points} frequencies; those points are set to 0."
            ),
        }
    }
}

//! Shared building blocks for the `tonescope` crates.
//!
//! Holds the error taxonomy every pipeline stage reports through, the
//! [`Warning`] values attached to results that degraded gracefully, and a
//! few numpy-style numeric helpers in [`num_rs`].

#![deny(missing_docs)]

mod error;
pub mod num_rs;
mod warning;

pub use error::*;
pub use warning::*;

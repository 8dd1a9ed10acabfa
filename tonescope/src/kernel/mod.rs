//! Shared trait-first kernel substrate.
//!
//! Every processing stage is a kernel: a struct built from a config through
//! [`KernelLifecycle::try_new`], which validates once, and then run over 1D
//! buffers through the [`Read1D`]/[`Write1D`] adapters.

mod errors;
mod io;
mod lifecycle;

pub use errors::*;
pub use io::*;
pub use lifecycle::*;

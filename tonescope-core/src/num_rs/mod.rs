//! Numpy-style helpers on plain slices.

mod convolve;
mod poly;
mod schur;

pub use convolve::*;
pub use poly::*;
pub use schur::*;

//! Small dense linear-algebra helpers over `nalgebra`.

mod companion;

pub use companion::*;

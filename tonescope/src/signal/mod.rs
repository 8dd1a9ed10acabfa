//! Signal-processing stages of the pipeline.

pub mod filter;
pub mod interference;
pub mod resample;
pub mod response;
pub mod spectral;
pub mod traits;
pub mod windows;

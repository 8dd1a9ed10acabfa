//! Interference detection and low-pass filtering for mono audio segments.
//!
//! A run injects a sinusoidal interferer into a segment, locates it with a
//! Welch power spectral density estimate, designs a low-pass filter from one
//! of five families (Butterworth, Chebyshev I and II, elliptic, Hamming FIR),
//! removes the interferer with zero-phase filtering and scores the design.
//!
//! ```
//! use tonescope::{pipeline, AudioSegment, PipelineConfig};
//!
//! let segment = AudioSegment::new(vec![0.0; 22_050], 44_100.0).unwrap();
//! let report = pipeline::run(&segment, &PipelineConfig::default()).unwrap();
//! assert!((report.estimate.peak_frequency - 15_200.0).abs() < 25.0);
//! assert_eq!(report.filtered.len(), segment.len());
//! ```
//!
//! Each stage is also available on its own: [`signal::spectral::estimate`],
//! [`signal::filter::design::design`], [`signal::filter::apply`] and
//! [`metrics::score`]. Lower-level kernels follow the
//! [`kernel::KernelLifecycle`] pattern: configuration is validated once at
//! construction and execution only reports data-dependent failures.
//!
//! The crate logs through `tracing` and never installs a subscriber.

pub mod config;
pub mod kernel;
pub mod linalg;
pub mod metrics;
pub mod pipeline;
pub mod segment;
pub mod signal;

pub use config::PipelineConfig;
pub use metrics::FilterMetrics;
pub use pipeline::PipelineReport;
pub use segment::{AudioSegment, InterferenceSpec};
pub use tonescope_core::{Error, ErrorKind, Result, Warning};

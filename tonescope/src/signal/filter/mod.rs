//! Low-pass design and zero-phase application.

pub mod design;

mod filtfilt;
mod kernels;
mod lfilter;
mod lfilter_zi;

pub use filtfilt::*;
pub use kernels::*;
pub use lfilter::{lfilter, LFilterResult};
pub use lfilter_zi::*;

use crate::kernel::KernelLifecycle;
use crate::signal::traits::FiltFilt1D;
use design::FilterCoefficients;
use tonescope_core::Error;

/// Filter `signal` forward and backward with `coefficients`.
///
/// Odd extension of `3 * max(len(a), len(b))` samples is applied at both
/// ends; the output has the same length as the input and no phase shift.
///
/// # Errors
/// * [`Error::InsufficientData`] when the signal is not longer than the
///   padding.
/// * [`Error::InvalidConfig`] for empty coefficients or `a[0] == 0`.
/// * [`Error::Numerical`] when the initial-state system is singular.
pub fn apply(coefficients: &FilterCoefficients, signal: &[f64]) -> Result<Vec<f64>, Error> {
    let kernel = FiltFiltKernel::try_new(FiltFiltConfig {
        b: coefficients.b.clone(),
        a: coefficients.a.clone(),
        padding: Some(FiltFiltPad::default()),
    })?;
    tracing::debug!(
        padlen = kernel.padlen(),
        samples = signal.len(),
        "zero-phase filtering"
    );
    Ok(kernel.run_alloc(signal)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonescope_core::ErrorKind;

    #[test]
    fn identity_filter_returns_input() {
        let identity = FilterCoefficients {
            b: vec![1.0],
            a: vec![1.0],
        };
        let x: Vec<f64> = (0..16).map(|i| (i as f64 * 0.7).sin()).collect();
        let y = apply(&identity, &x).unwrap();
        assert_eq!(y.len(), x.len());
        y.iter()
            .zip(x.iter())
            .for_each(|(a, b)| approx::assert_abs_diff_eq!(a, b, epsilon = 1e-12));
    }

    #[test]
    fn short_signal_is_insufficient() {
        let coefficients = FilterCoefficients {
            b: vec![0.25, 0.5, 0.25],
            a: vec![1.0, -0.2, 0.1],
        };
        let err = apply(&coefficients, &[1.0; 9]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientData);
        assert!(apply(&coefficients, &[1.0; 10]).is_ok());
    }

    #[test]
    fn bad_coefficients_are_invalid_config() {
        let coefficients = FilterCoefficients {
            b: vec![1.0],
            a: vec![0.0, 1.0],
        };
        let err = apply(&coefficients, &[0.0; 32]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }
}

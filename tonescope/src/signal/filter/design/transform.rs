//! Analog-to-digital transforms in zero/pole/gain form.

use super::relative_degree::relative_degree;
use super::{FilterCoefficients, Zpk};
use crate::kernel::ExecInvariantViolation;
use nalgebra::Complex;
use tonescope_core::num_rs::poly;

/// Sampling rate of the normalized bilinear transform (Nyquist = 1).
pub(crate) const NORMALIZED_FS: f64 = 2.0;

/// Pre-warp a normalized digital cutoff so the bilinear transform maps it
/// back exactly: `2 fs tan(pi wn / fs)`.
pub(crate) fn prewarp(wn: f64) -> f64 {
    2.0 * NORMALIZED_FS * (core::f64::consts::PI * wn / NORMALIZED_FS).tan()
}

/// Scale a unit-cutoff analog low-pass prototype to cutoff `wo` rad/s.
pub(crate) fn lp2lp(zpk: Zpk, wo: f64) -> Result<Zpk, ExecInvariantViolation> {
    let degree = relative_degree(&zpk.zeros, &zpk.poles)?;
    Ok(Zpk {
        zeros: zpk.zeros.into_iter().map(|z| z * wo).collect(),
        poles: zpk.poles.into_iter().map(|p| p * wo).collect(),
        gain: zpk.gain * wo.powi(degree as i32),
    })
}

/// Bilinear transform `s = 2 fs (z - 1) / (z + 1)`.
///
/// Zeros at infinity map to `z = -1`.
pub(crate) fn bilinear(zpk: Zpk, fs: f64) -> Result<Zpk, ExecInvariantViolation> {
    let degree = relative_degree(&zpk.zeros, &zpk.poles)?;
    let fs2 = Complex::new(2.0 * fs, 0.0);

    let mut zeros: Vec<Complex<f64>> = zpk.zeros.iter().map(|z| (fs2 + z) / (fs2 - z)).collect();
    let poles = zpk.poles.iter().map(|p| (fs2 + p) / (fs2 - p)).collect();
    zeros.extend(core::iter::repeat(Complex::new(-1.0, 0.0)).take(degree));

    let num = zpk
        .zeros
        .iter()
        .fold(Complex::new(1.0, 0.0), |acc, z| acc * (fs2 - z));
    let den = zpk
        .poles
        .iter()
        .fold(Complex::new(1.0, 0.0), |acc, p| acc * (fs2 - p));

    Ok(Zpk {
        zeros,
        poles,
        gain: zpk.gain * (num / den).re,
    })
}

/// Expand zeros and poles into real polynomial coefficients.
///
/// Roots come in conjugate pairs for every design here, so imaginary parts
/// of the expanded coefficients are rounding residue and dropped.
pub(crate) fn zpk2tf(zpk: &Zpk) -> FilterCoefficients {
    let b = poly(&zpk.zeros).iter().map(|c| c.re * zpk.gain).collect();
    let a = poly(&zpk.poles).iter().map(|c| c.re).collect();
    FilterCoefficients { b, a }
}

//! Frequency response and group delay of `b / a` transfer functions.

use crate::kernel::{ConfigError, ExecInvariantViolation, KernelLifecycle, Read1D, Write1D};
use crate::signal::traits::{Freqz1D, GroupDelay1D};
use core::f64::consts::PI;
use nalgebra::Complex;
use serde::Serialize;
use tonescope_core::num_rs::{convolve, polyval, ConvolveMode};
use tonescope_core::{Error, Warning};

/// Grid size used for designed filters.
pub const RESPONSE_POINTS: usize = 8000;

fn omega_grid(wor_n: usize) -> impl Iterator<Item = f64> {
    (0..wor_n).map(move |i| PI * (i as f64) / (wor_n as f64))
}

fn freqz_impl(b: &[f64], a: &[f64], wor_n: usize) -> (Vec<f64>, Vec<Complex<f64>>) {
    let mut w = Vec::with_capacity(wor_n);
    let mut h = Vec::with_capacity(wor_n);
    for omega in omega_grid(wor_n) {
        let z = Complex::from_polar(1.0, -omega);

        let mut num = Complex::new(0.0, 0.0);
        let mut zpow = Complex::new(1.0, 0.0);
        for &coeff in b {
            num += zpow * coeff;
            zpow *= z;
        }

        let mut den = Complex::new(0.0, 0.0);
        zpow = Complex::new(1.0, 0.0);
        for &coeff in a {
            den += zpow * coeff;
            zpow *= z;
        }

        w.push(omega);
        h.push(num / den);
    }
    (w, h)
}

/// Group delay samples on the `freqz` grid together with the number of
/// points where the delay was undefined.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupDelayCurve {
    /// Normalized angular frequencies on `[0, pi)`.
    pub w: Vec<f64>,
    /// Delay in samples; zero where `singular`.
    pub gd: Vec<f64>,
    /// Number of grid points whose denominator vanished.
    pub singular: usize,
}

fn group_delay_impl(b: &[f64], a: &[f64], wor_n: usize) -> Result<GroupDelayCurve, Error> {
    let a_rev: Vec<f64> = a.iter().rev().copied().collect();
    let c = convolve(b, &a_rev, ConvolveMode::Full)?;
    // Both polynomials are evaluated in z^-1, so feed polyval the reversed
    // (lowest power first) coefficient order.
    let c_rev: Vec<Complex<f64>> = c.iter().rev().map(|&v| Complex::new(v, 0.0)).collect();
    let cr_rev: Vec<Complex<f64>> = c
        .iter()
        .enumerate()
        .rev()
        .map(|(n, &v)| Complex::new(v * n as f64, 0.0))
        .collect();
    let offset = (a.len() - 1) as f64;

    let mut w = Vec::with_capacity(wor_n);
    let mut gd = Vec::with_capacity(wor_n);
    let mut singular = 0;
    for omega in omega_grid(wor_n) {
        let z = Complex::from_polar(1.0, -omega);
        let num = polyval(&cr_rev, z);
        let den = polyval(&c_rev, z);
        w.push(omega);
        if den.norm() < 10.0 * f64::EPSILON {
            singular += 1;
            gd.push(0.0);
        } else {
            gd.push((num / den).re - offset);
        }
    }
    Ok(GroupDelayCurve { w, gd, singular })
}

fn check_coefficients(b: &[f64], a: &[f64]) -> Result<(), ExecInvariantViolation> {
    if b.is_empty() {
        return Err(ConfigError::EmptyInput { arg: "b" }.into());
    }
    if a.is_empty() {
        return Err(ConfigError::EmptyInput { arg: "a" }.into());
    }
    Ok(())
}

/// Constructor config for [`FreqzKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreqzConfig {
    /// Number of frequency bins on `[0, pi)`.
    pub wor_n: usize,
}

/// Trait-first frequency response kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreqzKernel {
    wor_n: usize,
}

impl KernelLifecycle for FreqzKernel {
    type Config = FreqzConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if config.wor_n == 0 {
            return Err(ConfigError::InvalidArgument {
                arg: "wor_n",
                reason: "wor_n must be > 0",
            });
        }
        Ok(Self {
            wor_n: config.wor_n,
        })
    }
}

impl Freqz1D for FreqzKernel {
    fn run_into<I1, I2, OW, OH>(
        &self,
        b: &I1,
        a: &I2,
        w: &mut OW,
        h: &mut OH,
    ) -> Result<(), ExecInvariantViolation>
    where
        I1: Read1D<f64> + ?Sized,
        I2: Read1D<f64> + ?Sized,
        OW: Write1D<f64> + ?Sized,
        OH: Write1D<Complex<f64>> + ?Sized,
    {
        let (b, a) = (b.read_slice()?, a.read_slice()?);
        check_coefficients(b, a)?;

        let w_out = w.write_slice_mut()?;
        if w_out.len() != self.wor_n {
            return Err(ExecInvariantViolation::LengthMismatch {
                arg: "w",
                expected: self.wor_n,
                got: w_out.len(),
            });
        }
        let h_out = h.write_slice_mut()?;
        if h_out.len() != self.wor_n {
            return Err(ExecInvariantViolation::LengthMismatch {
                arg: "h",
                expected: self.wor_n,
                got: h_out.len(),
            });
        }

        let (ww, hh) = freqz_impl(b, a, self.wor_n);
        w_out.copy_from_slice(&ww);
        h_out.copy_from_slice(&hh);
        Ok(())
    }

    fn run_alloc<I1, I2>(
        &self,
        b: &I1,
        a: &I2,
    ) -> Result<(Vec<f64>, Vec<Complex<f64>>), ExecInvariantViolation>
    where
        I1: Read1D<f64> + ?Sized,
        I2: Read1D<f64> + ?Sized,
    {
        let (b, a) = (b.read_slice()?, a.read_slice()?);
        check_coefficients(b, a)?;
        Ok(freqz_impl(b, a, self.wor_n))
    }
}

/// Constructor config for [`GroupDelayKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupDelayConfig {
    /// Number of frequency bins on `[0, pi)`.
    pub wor_n: usize,
}

/// Trait-first group delay kernel.
///
/// `tau(w) = Re(sum n c_n z^-n / sum c_n z^-n) - (len(a) - 1)` with
/// `c = b * reverse(a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupDelayKernel {
    wor_n: usize,
}

impl KernelLifecycle for GroupDelayKernel {
    type Config = GroupDelayConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if config.wor_n == 0 {
            return Err(ConfigError::InvalidArgument {
                arg: "wor_n",
                reason: "wor_n must be > 0",
            });
        }
        Ok(Self {
            wor_n: config.wor_n,
        })
    }
}

impl GroupDelay1D for GroupDelayKernel {
    type Output = GroupDelayCurve;

    fn run_alloc<I1, I2>(&self, b: &I1, a: &I2) -> Result<Self::Output, ExecInvariantViolation>
    where
        I1: Read1D<f64> + ?Sized,
        I2: Read1D<f64> + ?Sized,
    {
        let (b, a) = (b.read_slice()?, a.read_slice()?);
        check_coefficients(b, a)?;
        group_delay_impl(b, a, self.wor_n).map_err(|_| ExecInvariantViolation::InvalidState {
            reason: "group delay convolution failed",
        })
    }
}

/// Frequency response of digital filter coefficients on `wor_n` points
/// `w = pi k / wor_n`.
pub fn freqz(b: &[f64], a: &[f64], wor_n: usize) -> Result<(Vec<f64>, Vec<Complex<f64>>), Error> {
    let kernel = FreqzKernel::try_new(FreqzConfig { wor_n })?;
    Ok(kernel.run_alloc(b, a)?)
}

/// Group delay in samples on the same grid as [`freqz`].
pub fn group_delay(b: &[f64], a: &[f64], wor_n: usize) -> Result<GroupDelayCurve, Error> {
    let kernel = GroupDelayKernel::try_new(GroupDelayConfig { wor_n })?;
    Ok(kernel.run_alloc(b, a)?)
}

/// Complex response with its magnitude in dB, indexed by frequency in Hz.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyResponse {
    /// Evaluation frequencies in Hz on `[0, Nyquist)`.
    pub frequencies_hz: Vec<f64>,
    /// `H(e^jw)` at each frequency.
    pub response: Vec<Complex<f64>>,
    /// `20 log10 |H|`, floored at the smallest positive `f64` so the curve
    /// stays finite at exact zeros.
    pub magnitude_db: Vec<f64>,
}

impl FrequencyResponse {
    /// Evaluate `b / a` at `wor_n` points and convert to Hz for `sample_rate`.
    pub fn evaluate(b: &[f64], a: &[f64], sample_rate: f64, wor_n: usize) -> Result<Self, Error> {
        let (w, response) = freqz(b, a, wor_n)?;
        let frequencies_hz = w.iter().map(|w| w * sample_rate / (2.0 * PI)).collect();
        let magnitude_db = response
            .iter()
            .map(|h| 20.0 * h.norm().max(f64::MIN_POSITIVE).log10())
            .collect();
        Ok(Self {
            frequencies_hz,
            response,
            magnitude_db,
        })
    }

    /// Index of the grid point closest to `frequency_hz`.
    pub fn nearest_index(&self, frequency_hz: f64) -> Option<usize> {
        self.frequencies_hz
            .iter()
            .enumerate()
            .min_by(|(_, x), (_, y)| {
                (*x - frequency_hz)
                    .abs()
                    .total_cmp(&(*y - frequency_hz).abs())
            })
            .map(|(i, _)| i)
    }
}

/// Group delay in samples indexed by frequency in Hz.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupDelay {
    /// Evaluation frequencies in Hz.
    pub frequencies_hz: Vec<f64>,
    /// Delay in samples.
    pub samples: Vec<f64>,
}

impl GroupDelay {
    /// Evaluate `b / a` at `wor_n` points. Undefined points are set to zero
    /// and reported through [`Warning::SingularGroupDelay`].
    pub fn evaluate(
        b: &[f64],
        a: &[f64],
        sample_rate: f64,
        wor_n: usize,
    ) -> Result<(Self, Option<Warning>), Error> {
        let curve = group_delay(b, a, wor_n)?;
        let warning = (curve.singular > 0).then(|| {
            tracing::warn!(points = curve.singular, "group delay is singular");
            Warning::SingularGroupDelay {
                points: curve.singular,
            }
        });
        let frequencies_hz = curve
            .w
            .iter()
            .map(|w| w * sample_rate / (2.0 * PI))
            .collect();
        Ok((
            Self {
                frequencies_hz,
                samples: curve.gd,
            },
            warning,
        ))
    }

    /// Arithmetic mean of the delay over the grid.
    pub fn average_samples(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }
}

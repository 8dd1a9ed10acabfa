//! Low-pass filter design.
//!
//! IIR families are built from an analog prototype that is scaled to the
//! pre-warped cutoff and mapped with the bilinear transform; the FIR family
//! is a Hamming-windowed sinc. Every design is returned with its frequency
//! response and group delay on [`RESPONSE_POINTS`] points.

use crate::kernel::KernelLifecycle;
use crate::linalg::poly_roots;
use crate::segment::validate_sample_rate;
use crate::signal::response::{FrequencyResponse, GroupDelay, RESPONSE_POINTS};
use crate::signal::traits::FilterDesign1D;
use core::fmt;
use core::str::FromStr;
use nalgebra::Complex;
use serde::{Deserialize, Serialize};
use tonescope_core::num_rs::is_schur_stable;
use tonescope_core::{Error, Warning};

mod ellip;
mod fir;
mod kernels;
mod prototypes;
mod relative_degree;
mod transform;

pub use kernels::*;

/// Closed set of low-pass design families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterFamily {
    /// Maximally flat passband.
    #[serde(rename = "butter", alias = "butterworth")]
    Butterworth,
    /// Equiripple passband, monotonic stopband.
    #[serde(rename = "cheby1", alias = "chebyshev1")]
    ChebyshevI,
    /// Monotonic passband, equiripple stopband.
    #[serde(rename = "cheby2", alias = "chebyshev2")]
    ChebyshevII,
    /// Equiripple in both bands (Cauer).
    #[serde(rename = "ellip", alias = "elliptic")]
    Elliptic,
    /// Linear-phase Hamming-windowed sinc.
    #[serde(rename = "fir")]
    Fir,
}

impl FilterFamily {
    /// Canonical short name.
    pub fn name(&self) -> &'static str {
        match self {
            FilterFamily::Butterworth => "butter",
            FilterFamily::ChebyshevI => "cheby1",
            FilterFamily::ChebyshevII => "cheby2",
            FilterFamily::Elliptic => "ellip",
            FilterFamily::Fir => "fir",
        }
    }

    /// `true` for every family except [`FilterFamily::Fir`].
    pub fn is_recursive(&self) -> bool {
        !matches!(self, FilterFamily::Fir)
    }

    /// Design coefficients for a low-pass of this family.
    ///
    /// `wn` is the cutoff as a fraction of Nyquist. `ripple_db` is read by
    /// Chebyshev I and elliptic designs, `attenuation_db` by Chebyshev II
    /// and elliptic designs.
    pub fn coefficients(
        self,
        order: usize,
        wn: f64,
        ripple_db: f64,
        attenuation_db: f64,
    ) -> Result<FilterCoefficients, Error> {
        let kernel = FilterDesignKernel::try_new(FilterDesignConfig {
            family: self,
            order,
            wn,
            ripple_db,
            attenuation_db,
        })?;
        Ok(kernel.run_alloc()?.coefficients)
    }
}

impl fmt::Display for FilterFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "butter" | "butterworth" => Ok(FilterFamily::Butterworth),
            "cheby1" | "chebyshev1" => Ok(FilterFamily::ChebyshevI),
            "cheby2" | "chebyshev2" => Ok(FilterFamily::ChebyshevII),
            "ellip" | "elliptic" => Ok(FilterFamily::Elliptic),
            "fir" => Ok(FilterFamily::Fir),
            _ => Err(Error::invalid_config(
                "filter_type",
                format!("unknown filter family `{s}`"),
            )),
        }
    }
}

/// Requested low-pass design.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Design family.
    pub family: FilterFamily,
    /// Filter order (FIR: `order + 1` taps).
    pub order: usize,
    /// Cutoff frequency in Hz.
    pub cutoff_hz: f64,
    /// Passband ripple in dB.
    pub ripple_db: f64,
    /// Stopband attenuation in dB.
    pub attenuation_db: f64,
    /// Sample rate in Hz.
    pub sample_rate: f64,
}

impl FilterSpec {
    /// Cutoff as a fraction of Nyquist.
    pub fn normalized_cutoff(&self) -> f64 {
        self.cutoff_hz / (0.5 * self.sample_rate)
    }

    fn kernel(&self) -> Result<FilterDesignKernel, Error> {
        validate_sample_rate(self.sample_rate)?;
        let wn = self.normalized_cutoff();
        if !(wn > 0.0 && wn < 1.0) {
            return Err(Error::invalid_config(
                "cutoff",
                format!(
                    "cutoff {} Hz must lie strictly between 0 and Nyquist ({} Hz)",
                    self.cutoff_hz,
                    0.5 * self.sample_rate
                ),
            ));
        }
        Ok(FilterDesignKernel::try_new(FilterDesignConfig {
            family: self.family,
            order: self.order,
            wn,
            ripple_db: self.ripple_db,
            attenuation_db: self.attenuation_db,
        })?)
    }

    /// Check every parameter without designing anything.
    pub fn validate(&self) -> Result<(), Error> {
        self.kernel().map(|_| ())
    }
}

/// Transfer function `B(z) / A(z)` in powers of `z^-1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCoefficients {
    /// Numerator.
    pub b: Vec<f64>,
    /// Denominator; `[1.0]` for FIR filters.
    pub a: Vec<f64>,
}

impl FilterCoefficients {
    /// Roots of the denominator.
    pub fn poles(&self) -> Result<Vec<Complex<f64>>, Error> {
        Ok(poly_roots(&self.a)?)
    }

    /// Whether every root of `a` lies strictly inside the unit circle.
    ///
    /// Judged on the stored coefficients with a Schur-Cohn test rather than
    /// on [`poles`](Self::poles), whose eigenvalue estimates blur clusters
    /// near the circle.
    pub fn is_stable(&self) -> bool {
        is_schur_stable(&self.a)
    }

    /// `len(b) + len(a) - 1`.
    pub fn num_coefficients(&self) -> usize {
        self.b.len() + self.a.len() - 1
    }
}

/// Zeros, poles and gain of a transfer function.
#[derive(Debug, Clone, PartialEq)]
pub struct Zpk {
    /// Transfer function zeros.
    pub zeros: Vec<Complex<f64>>,
    /// Transfer function poles.
    pub poles: Vec<Complex<f64>>,
    /// System gain.
    pub gain: f64,
}

/// A designed filter with its evaluated response.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterDesign {
    /// What was asked for.
    pub spec: FilterSpec,
    /// Designed coefficients.
    pub coefficients: FilterCoefficients,
    /// Digital zeros, poles and gain for IIR families.
    pub zpk: Option<Zpk>,
    /// Response on `[0, Nyquist)`.
    pub response: FrequencyResponse,
    /// Group delay on the same grid.
    pub group_delay: GroupDelay,
    /// Degradations met while evaluating the design.
    pub warnings: Vec<Warning>,
}

impl FilterDesign {
    /// Stability of the coefficients that filtering actually runs.
    pub fn is_stable(&self) -> bool {
        self.coefficients.is_stable()
    }
}

/// Design a low-pass filter and evaluate its response.
///
/// # Errors
/// [`Error::InvalidConfig`] when the order is zero, the cutoff is not
/// strictly between 0 and Nyquist, or the family's ripple/attenuation
/// parameters are out of range.
///
/// [`Error::Numerical`] when expanding the poles into `a` leaves a root on
/// or outside the unit circle. High orders with a low normalized cutoff do
/// this even though the zero/pole form is stable.
pub fn design(spec: &FilterSpec) -> Result<FilterDesign, Error> {
    let kernel = spec.kernel()?;
    let filter = kernel.run_alloc()?;
    if !filter.coefficients.is_stable() {
        tracing::warn!(
            family = spec.family.name(),
            order = spec.order,
            wn = spec.normalized_cutoff(),
            "denominator is unstable in transfer-function form"
        );
        return Err(Error::numerical(format!(
            "{} order {} at {} Hz is unstable as b/a; lower the order or raise the cutoff",
            spec.family.name(),
            spec.order,
            spec.cutoff_hz
        )));
    }
    tracing::debug!(
        family = spec.family.name(),
        order = spec.order,
        wn = spec.normalized_cutoff(),
        taps = filter.coefficients.b.len(),
        "designed low-pass filter"
    );

    let FilterCoefficients { b, a } = &filter.coefficients;
    let response = FrequencyResponse::evaluate(b, a, spec.sample_rate, RESPONSE_POINTS)?;
    let (group_delay, warning) = GroupDelay::evaluate(b, a, spec.sample_rate, RESPONSE_POINTS)?;

    Ok(FilterDesign {
        spec: *spec,
        coefficients: filter.coefficients,
        zpk: filter.zpk,
        response,
        group_delay,
        warnings: warning.into_iter().collect(),
    })
}

//! Trait-first kernel for low-pass filter design.

use super::fir::firwin;
use super::prototypes::{buttap, cheb1ap, cheb2ap, ellipap};
use super::transform::{bilinear, lp2lp, prewarp, zpk2tf, NORMALIZED_FS};
use super::{FilterCoefficients, FilterFamily, Zpk};
use crate::kernel::{ConfigError, ExecInvariantViolation, KernelLifecycle};
use crate::signal::traits::FilterDesign1D;

/// Coefficients of a designed filter, with the zero/pole/gain form it was
/// expanded from when the family has one.
#[derive(Debug, Clone, PartialEq)]
pub struct DigitalFilter {
    /// Transfer function numerator and denominator.
    pub coefficients: FilterCoefficients,
    /// Digital zeros, poles and gain (IIR families only).
    pub zpk: Option<Zpk>,
}

/// Constructor config for [`FilterDesignKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterDesignConfig {
    /// Design family.
    pub family: FilterFamily,
    /// Filter order; the FIR family uses `order + 1` taps.
    pub order: usize,
    /// Cutoff as a fraction of Nyquist, strictly inside `(0, 1)`.
    pub wn: f64,
    /// Passband ripple in dB (Chebyshev I, elliptic).
    pub ripple_db: f64,
    /// Stopband attenuation in dB (Chebyshev II, elliptic).
    pub attenuation_db: f64,
}

/// Trait-first low-pass design kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterDesignKernel {
    family: FilterFamily,
    order: usize,
    wn: f64,
    ripple_db: f64,
    attenuation_db: f64,
}

impl KernelLifecycle for FilterDesignKernel {
    type Config = FilterDesignConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if config.order == 0 {
            return Err(ConfigError::InvalidArgument {
                arg: "order",
                reason: "order must be greater than zero",
            });
        }
        if !(config.wn > 0.0 && config.wn < 1.0) {
            return Err(ConfigError::InvalidArgument {
                arg: "cutoff",
                reason: "normalized cutoff must satisfy 0 < wn < 1",
            });
        }

        let needs_ripple = matches!(
            config.family,
            FilterFamily::ChebyshevI | FilterFamily::Elliptic
        );
        let needs_attenuation = matches!(
            config.family,
            FilterFamily::ChebyshevII | FilterFamily::Elliptic
        );
        if needs_ripple && !(config.ripple_db.is_finite() && config.ripple_db > 0.0) {
            return Err(ConfigError::InvalidArgument {
                arg: "ripple",
                reason: "ripple must be a positive number of dB",
            });
        }
        if needs_attenuation && !(config.attenuation_db.is_finite() && config.attenuation_db > 0.0)
        {
            return Err(ConfigError::InvalidArgument {
                arg: "attenuation",
                reason: "attenuation must be a positive number of dB",
            });
        }
        if config.family == FilterFamily::Elliptic && config.attenuation_db <= config.ripple_db {
            return Err(ConfigError::InvalidArgument {
                arg: "attenuation",
                reason: "elliptic attenuation must exceed the passband ripple",
            });
        }

        Ok(Self {
            family: config.family,
            order: config.order,
            wn: config.wn,
            ripple_db: config.ripple_db,
            attenuation_db: config.attenuation_db,
        })
    }
}

impl FilterDesignKernel {
    fn analog_prototype(&self) -> Result<Option<Zpk>, ExecInvariantViolation> {
        let n = self.order;
        Ok(match self.family {
            FilterFamily::Butterworth => Some(buttap(n)),
            FilterFamily::ChebyshevI => Some(cheb1ap(n, self.ripple_db)),
            FilterFamily::ChebyshevII => Some(cheb2ap(n, self.attenuation_db)),
            FilterFamily::Elliptic => Some(ellipap(n, self.ripple_db, self.attenuation_db)?),
            FilterFamily::Fir => None,
        })
    }
}

impl FilterDesign1D for FilterDesignKernel {
    type Output = DigitalFilter;

    fn run_alloc(&self) -> Result<Self::Output, ExecInvariantViolation> {
        match self.analog_prototype()? {
            Some(analog) => {
                let scaled = lp2lp(analog, prewarp(self.wn))?;
                let digital = bilinear(scaled, NORMALIZED_FS)?;
                Ok(DigitalFilter {
                    coefficients: zpk2tf(&digital),
                    zpk: Some(digital),
                })
            }
            None => Ok(DigitalFilter {
                coefficients: FilterCoefficients {
                    b: firwin(self.order + 1, self.wn),
                    a: vec![1.0],
                },
                zpk: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn kernel(family: FilterFamily, order: usize, wn: f64) -> FilterDesignKernel {
        FilterDesignKernel::try_new(FilterDesignConfig {
            family,
            order,
            wn,
            ripple_db: 1.0,
            attenuation_db: 40.0,
        })
        .expect("design kernel should initialize")
    }

    #[test]
    fn butterworth_matches_reference() {
        let first = kernel(FilterFamily::Butterworth, 1, 0.5).run_alloc().unwrap();
        first
            .coefficients
            .b
            .iter()
            .zip([0.5, 0.5].iter())
            .for_each(|(a, b)| assert_abs_diff_eq!(a, b, epsilon = 1e-12));
        first
            .coefficients
            .a
            .iter()
            .zip([1.0, 0.0].iter())
            .for_each(|(a, b)| assert_abs_diff_eq!(a, b, epsilon = 1e-12));

        let second = kernel(FilterFamily::Butterworth, 2, 0.5).run_alloc().unwrap();
        let b = [0.29289322, 0.58578644, 0.29289322];
        let a = [1.0, 0.0, 0.17157288];
        second
            .coefficients
            .b
            .iter()
            .zip(b.iter())
            .for_each(|(x, y)| assert_abs_diff_eq!(x, y, epsilon = 1e-8));
        second
            .coefficients
            .a
            .iter()
            .zip(a.iter())
            .for_each(|(x, y)| assert_abs_diff_eq!(x, y, epsilon = 1e-8));
    }

    #[test]
    fn fir_has_unit_denominator() {
        let fir = kernel(FilterFamily::Fir, 7, 0.2).run_alloc().unwrap();
        assert_eq!(fir.coefficients.a, vec![1.0]);
        assert_eq!(fir.coefficients.b.len(), 8);
        assert!(fir.zpk.is_none());
    }

    #[test]
    fn iir_orders_set_polynomial_lengths() {
        for family in [
            FilterFamily::Butterworth,
            FilterFamily::ChebyshevI,
            FilterFamily::ChebyshevII,
            FilterFamily::Elliptic,
        ] {
            let design = kernel(family, 5, 0.3).run_alloc().unwrap();
            assert_eq!(design.coefficients.a.len(), 6, "{family}");
            assert_eq!(design.coefficients.b.len(), 6, "{family}");
            assert_abs_diff_eq!(design.coefficients.a[0], 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn constructor_rejects_bad_parameters() {
        let base = FilterDesignConfig {
            family: FilterFamily::Butterworth,
            order: 4,
            wn: 0.25,
            ripple_db: 1.0,
            attenuation_db: 40.0,
        };
        let err = FilterDesignKernel::try_new(FilterDesignConfig { order: 0, ..base })
            .expect_err("order 0 should fail");
        assert_eq!(
            err,
            ConfigError::InvalidArgument {
                arg: "order",
                reason: "order must be greater than zero",
            }
        );
        assert!(FilterDesignKernel::try_new(FilterDesignConfig { wn: 1.0, ..base }).is_err());
        assert!(FilterDesignKernel::try_new(FilterDesignConfig { wn: 0.0, ..base }).is_err());
        assert!(FilterDesignKernel::try_new(FilterDesignConfig {
            family: FilterFamily::ChebyshevI,
            ripple_db: 0.0,
            ..base
        })
        .is_err());
        assert!(FilterDesignKernel::try_new(FilterDesignConfig {
            family: FilterFamily::Elliptic,
            ripple_db: 3.0,
            attenuation_db: 2.0,
            ..base
        })
        .is_err());
        // Ripple is unused by Butterworth and not checked.
        assert!(FilterDesignKernel::try_new(FilterDesignConfig {
            ripple_db: -1.0,
            ..base
        })
        .is_ok());
    }
}

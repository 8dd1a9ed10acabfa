use crate::kernel::{ConfigError, ExecInvariantViolation, KernelLifecycle, Read1D};
use nalgebra::{Complex, DMatrix};

/// 1D companion-matrix construction capability.
pub trait CompanionBuild1D<T> {
    /// Output matrix type.
    type Output;

    /// Build companion matrix from polynomial coefficients.
    fn run<I>(&self, input: &I) -> Result<Self::Output, ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized;
}

/// Constructor config for [`CompanionKernel`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompanionConfig {
    /// Optional expected coefficient length.
    pub expected_len: Option<usize>,
}

/// Trait-first companion-matrix kernel.
///
/// For `p(x) = c0 x^n + c1 x^(n-1) + ... + cn` the first row holds
/// `-c[1..] / c0` and the sub-diagonal is ones, so the eigenvalues of the
/// matrix are the roots of `p`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompanionKernel {
    expected_len: Option<usize>,
}

impl KernelLifecycle for CompanionKernel {
    type Config = CompanionConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if let Some(expected_len) = config.expected_len {
            if expected_len < 2 {
                return Err(ConfigError::InvalidArgument {
                    arg: "expected_len",
                    reason: "companion requires at least 2 coefficients",
                });
            }
        }
        Ok(Self {
            expected_len: config.expected_len,
        })
    }
}

impl CompanionBuild1D<f64> for CompanionKernel {
    type Output = DMatrix<f64>;

    fn run<I>(&self, input: &I) -> Result<Self::Output, ExecInvariantViolation>
    where
        I: Read1D<f64> + ?Sized,
    {
        let coeffs = input.read_slice()?;
        if coeffs.len() < 2 {
            return Err(ExecInvariantViolation::InvalidState {
                reason: "companion requires at least 2 coefficients",
            });
        }
        if let Some(expected_len) = self.expected_len {
            if coeffs.len() != expected_len {
                return Err(ExecInvariantViolation::LengthMismatch {
                    arg: "coeffs",
                    expected: expected_len,
                    got: coeffs.len(),
                });
            }
        }
        if coeffs[0] == 0.0 {
            return Err(ExecInvariantViolation::InvalidState {
                reason: "leading coefficient must be non-zero",
            });
        }
        Ok(companion_from_slice(coeffs))
    }
}

fn companion_from_slice(coeffs: &[f64]) -> DMatrix<f64> {
    let n = coeffs.len() - 1;
    let a0 = coeffs[0];
    let mut matrix = DMatrix::zeros(n, n);
    for (i, ai) in coeffs.iter().skip(1).enumerate() {
        matrix[(0, i)] = -ai / a0;
    }
    for i in 0..n.saturating_sub(1) {
        matrix[(i + 1, i)] = 1.0;
    }
    matrix
}

/// Companion matrix of `coeffs` (highest power first).
pub fn companion(coeffs: &[f64]) -> Result<DMatrix<f64>, ExecInvariantViolation> {
    CompanionKernel::default().run(coeffs)
}

/// Roots of a real polynomial given highest power first, computed as the
/// eigenvalues of its companion matrix.
///
/// Leading zeros are stripped first; a constant polynomial has no roots.
pub fn poly_roots(coeffs: &[f64]) -> Result<Vec<Complex<f64>>, ExecInvariantViolation> {
    let first = coeffs
        .iter()
        .position(|c| *c != 0.0)
        .ok_or(ExecInvariantViolation::InvalidState {
            reason: "polynomial is identically zero",
        })?;
    let coeffs = &coeffs[first..];
    if coeffs.len() < 2 {
        return Ok(Vec::new());
    }
    let matrix = companion(coeffs)?;
    Ok(matrix.complex_eigenvalues().iter().copied().collect())
}

//! Trait-first kernel wrappers for filtering primitives.

use super::lfilter::NormalizedBa;
use super::{filtfilt, lfilter, lfilter_zi, FiltFiltPad};
use crate::kernel::{ConfigError, ExecInvariantViolation, KernelLifecycle, Read1D, Write1D};
use crate::signal::traits::{FiltFilt1D, LFilter1D, LFilterZiDesign1D};
use ndarray::ArrayView1;

fn write_exact<O>(values: &[f64], out: &mut O) -> Result<(), ExecInvariantViolation>
where
    O: Write1D<f64> + ?Sized,
{
    let out_slice = out.write_slice_mut()?;
    if out_slice.len() != values.len() {
        return Err(ExecInvariantViolation::LengthMismatch {
            arg: "out",
            expected: values.len(),
            got: out_slice.len(),
        });
    }
    out_slice.copy_from_slice(values);
    Ok(())
}

/// Constructor config for [`LFilterKernel`].
#[derive(Debug, Clone, PartialEq)]
pub struct LFilterConfig {
    /// Numerator coefficients.
    pub b: Vec<f64>,
    /// Denominator coefficients.
    pub a: Vec<f64>,
}

/// 1D `lfilter` kernel starting from rest.
#[derive(Debug, Clone, PartialEq)]
pub struct LFilterKernel {
    b: Vec<f64>,
    a: Vec<f64>,
}

impl KernelLifecycle for LFilterKernel {
    type Config = LFilterConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        NormalizedBa::new(&config.b, &config.a)?;
        Ok(Self {
            b: config.b,
            a: config.a,
        })
    }
}

impl LFilter1D<f64> for LFilterKernel {
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<f64> + ?Sized,
        O: Write1D<f64> + ?Sized,
    {
        let y = self.run_alloc(input)?;
        write_exact(&y, out)
    }

    fn run_alloc<I>(&self, input: &I) -> Result<Vec<f64>, ExecInvariantViolation>
    where
        I: Read1D<f64> + ?Sized,
    {
        let input = input.read_slice()?;
        let (y, _) = lfilter(
            ArrayView1::from(&self.b),
            ArrayView1::from(&self.a),
            ArrayView1::from(input),
            None,
        )?;
        Ok(y.to_vec())
    }
}

/// Constructor config for [`LFilterZiKernel`].
#[derive(Debug, Clone, PartialEq)]
pub struct LFilterZiConfig {
    /// Numerator coefficients.
    pub b: Vec<f64>,
    /// Denominator coefficients.
    pub a: Vec<f64>,
}

/// Steady-state initial condition kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct LFilterZiKernel {
    b: Vec<f64>,
    a: Vec<f64>,
    order: usize,
}

impl KernelLifecycle for LFilterZiKernel {
    type Config = LFilterZiConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        let order = NormalizedBa::new(&config.b, &config.a)?.order();
        Ok(Self {
            b: config.b,
            a: config.a,
            order,
        })
    }
}

impl LFilterZiKernel {
    /// Length of the state vector, `max(len(a), len(b)) - 1`.
    pub fn state_len(&self) -> usize {
        self.order
    }
}

impl LFilterZiDesign1D<f64> for LFilterZiKernel {
    fn run_into<O>(&self, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        O: Write1D<f64> + ?Sized,
    {
        let zi = self.run_alloc()?;
        write_exact(&zi, out)
    }

    fn run_alloc(&self) -> Result<Vec<f64>, ExecInvariantViolation> {
        lfilter_zi(&self.b, &self.a)
    }
}

/// Constructor config for [`FiltFiltKernel`].
#[derive(Debug, Clone, PartialEq)]
pub struct FiltFiltConfig {
    /// Numerator coefficients.
    pub b: Vec<f64>,
    /// Denominator coefficients.
    pub a: Vec<f64>,
    /// Edge padding; `None` filters without extension.
    pub padding: Option<FiltFiltPad>,
}

/// 1D zero-phase filtering kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct FiltFiltKernel {
    b: Vec<f64>,
    a: Vec<f64>,
    padding: Option<FiltFiltPad>,
}

impl KernelLifecycle for FiltFiltKernel {
    type Config = FiltFiltConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        NormalizedBa::new(&config.b, &config.a)?;
        Ok(Self {
            b: config.b,
            a: config.a,
            padding: config.padding,
        })
    }
}

impl FiltFiltKernel {
    /// Samples added at each end before filtering.
    pub fn padlen(&self) -> usize {
        match self.padding {
            None => 0,
            Some(FiltFiltPad { len, .. }) => len.unwrap_or(3 * self.a.len().max(self.b.len())),
        }
    }
}

impl FiltFilt1D<f64> for FiltFiltKernel {
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<f64> + ?Sized,
        O: Write1D<f64> + ?Sized,
    {
        let y = self.run_alloc(input)?;
        write_exact(&y, out)
    }

    fn run_alloc<I>(&self, input: &I) -> Result<Vec<f64>, ExecInvariantViolation>
    where
        I: Read1D<f64> + ?Sized,
    {
        let input = input.read_slice()?;
        let y = filtfilt(
            ArrayView1::from(&self.b),
            ArrayView1::from(&self.a),
            ArrayView1::from(input),
            self.padding,
        )?;
        Ok(y.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::Array1;

    #[test]
    fn lfilter_kernel_matches_lfilter_reference_and_length_checks() {
        let kernel = LFilterKernel::try_new(LFilterConfig {
            b: vec![0.5, 0.25],
            a: vec![1.0, -0.5],
        })
        .expect("kernel should initialize");
        let x = vec![1.0, 0.0, 1.0, 0.0, 1.0];

        let expected = lfilter(
            ArrayView1::from(&[0.5, 0.25]),
            ArrayView1::from(&[1.0, -0.5]),
            ArrayView1::from(&x),
            None,
        )
        .unwrap()
        .0;
        let actual = kernel.run_alloc(&x).expect("kernel should run");
        assert_eq!(actual, expected.to_vec());

        let mut out = Array1::<f64>::zeros(5);
        kernel.run_into(&x, &mut out).expect("run_into should succeed");
        assert_eq!(out.to_vec(), actual);

        let mut too_long = vec![0.0; 6];
        let err = kernel.run_into(&x, &mut too_long).unwrap_err();
        assert!(matches!(
            err,
            ExecInvariantViolation::LengthMismatch { arg: "out", expected: 5, got: 6 }
        ));
    }

    #[test]
    fn filtfilt_kernel_matches_reference_and_validates_lengths() {
        let kernel = FiltFiltKernel::try_new(FiltFiltConfig {
            b: vec![0.5, 0.5],
            a: vec![1.0],
            padding: Some(FiltFiltPad::default()),
        })
        .expect("kernel should initialize");
        assert_eq!(kernel.padlen(), 6);

        let input = vec![
            0.0, 0.6389613, 0.890577, 0.9830277, 0.9992535, 0.9756868, 0.9304659, 0.8734051,
        ];
        let actual = kernel.run_alloc(&input).expect("filtfilt should run");
        let expected = filtfilt(
            ArrayView1::from(&[0.5, 0.5]),
            ArrayView1::from(&[1.0]),
            ArrayView1::from(&input),
            Some(FiltFiltPad::default()),
        )
        .unwrap();
        assert_eq!(actual, expected.to_vec());

        let mut too_short = vec![0.0; input.len() - 1];
        let err = kernel
            .run_into(&input, &mut too_short)
            .expect_err("output size mismatch must fail");
        assert!(matches!(
            err,
            ExecInvariantViolation::LengthMismatch {
                arg: "out",
                expected: 8,
                got: 7
            }
        ));

        let err = kernel.run_alloc(&input[..6]).unwrap_err();
        assert!(matches!(
            err,
            ExecInvariantViolation::InsufficientData { arg: "padlen", required: 7, got: 6 }
        ));
    }

    #[test]
    fn lfilter_zi_kernel_reports_state_len() {
        let kernel = LFilterZiKernel::try_new(LFilterZiConfig {
            b: vec![0.2, 0.3, 0.1],
            a: vec![1.0, -0.6, 0.2],
        })
        .unwrap();
        assert_eq!(kernel.state_len(), 2);
        let mut zi = [0.0; 2];
        kernel.run_into(&mut zi).unwrap();
        let expected = lfilter_zi(&[0.2, 0.3, 0.1], &[1.0, -0.6, 0.2]).unwrap();
        zi.iter()
            .zip(expected.iter())
            .for_each(|(a, b)| assert_abs_diff_eq!(a, b));
    }

    #[test]
    fn constructors_reject_invalid_coefficients() {
        let err = LFilterKernel::try_new(LFilterConfig {
            b: Vec::new(),
            a: vec![1.0],
        })
        .expect_err("empty b must fail");
        assert_eq!(err, ConfigError::EmptyInput { arg: "b" });

        let err = FiltFiltKernel::try_new(FiltFiltConfig {
            b: vec![1.0],
            a: Vec::new(),
            padding: None,
        })
        .expect_err("empty a must fail");
        assert_eq!(err, ConfigError::EmptyInput { arg: "a" });

        let err = LFilterZiKernel::try_new(LFilterZiConfig {
            b: vec![1.0],
            a: vec![0.0, 1.0],
        })
        .expect_err("a[0] == 0 must fail");
        assert!(matches!(err, ConfigError::InvalidArgument { arg: "a", .. }));
    }
}

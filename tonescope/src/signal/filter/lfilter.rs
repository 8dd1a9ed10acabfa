use crate::kernel::{ConfigError, ExecInvariantViolation};
use ndarray::{Array1, ArrayView1};

/// Output of [`lfilter`]: the filtered signal and, when an initial state was
/// supplied, the final state.
pub type LFilterResult = (Array1<f64>, Option<Array1<f64>>);

/// Normalized transfer function with `b` and `a` padded to the same length
/// and `a[0] == 1`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NormalizedBa {
    pub(crate) b: Vec<f64>,
    pub(crate) a: Vec<f64>,
}

impl NormalizedBa {
    pub(crate) fn new(b: &[f64], a: &[f64]) -> Result<Self, ConfigError> {
        if b.is_empty() {
            return Err(ConfigError::EmptyInput { arg: "b" });
        }
        let a0 = *a.first().ok_or(ConfigError::EmptyInput { arg: "a" })?;
        if a0 == 0.0 {
            return Err(ConfigError::InvalidArgument {
                arg: "a",
                reason: "a[0] must be non-zero",
            });
        }
        let n = a.len().max(b.len());
        let mut b: Vec<f64> = b.iter().map(|v| v / a0).collect();
        let mut a: Vec<f64> = a.iter().map(|v| v / a0).collect();
        b.resize(n, 0.0);
        a.resize(n, 0.0);
        Ok(Self { b, a })
    }

    /// Number of delay elements, `max(len(a), len(b)) - 1`.
    pub(crate) fn order(&self) -> usize {
        self.a.len() - 1
    }
}

/// Filter `x` with the rational transfer function `b / a` (direct form II
/// transposed).
///
/// Coefficients are normalized by `a[0]`. `zi` is the initial state of
/// the delays and must hold `max(len(a), len(b)) - 1` values; the final
/// state is returned only when `zi` is given.
///
/// # Errors
/// Empty coefficients or `a[0] == 0` are configuration errors; a `zi` of
/// the wrong length is a length mismatch.
///
/// # Examples
/// ```
/// use ndarray::array;
/// use tonescope::signal::filter::lfilter;
///
/// let b = array![5., 4., 1., 2.];
/// let a = array![1.];
/// let x = array![1., 2., 3., 4., 3., 5., 6.];
/// let (y, _) = lfilter(b.view(), a.view(), x.view(), None).unwrap();
/// assert_eq!(y.to_vec(), vec![5., 14., 24., 36., 38., 47., 61.]);
/// ```
pub fn lfilter(
    b: ArrayView1<f64>,
    a: ArrayView1<f64>,
    x: ArrayView1<f64>,
    zi: Option<ArrayView1<f64>>,
) -> Result<LFilterResult, ExecInvariantViolation> {
    let b = b.to_vec();
    let a = a.to_vec();
    let ba = NormalizedBa::new(&b, &a)?;
    let order = ba.order();
    let keep_state = zi.is_some();

    let mut z = match zi {
        Some(zi) => {
            if zi.len() != order {
                return Err(ExecInvariantViolation::LengthMismatch {
                    arg: "zi",
                    expected: order,
                    got: zi.len(),
                });
            }
            zi.to_vec()
        }
        None => vec![0.0; order],
    };

    let y = x
        .iter()
        .map(|&xn| linear_filter_step(&ba, &mut z, xn))
        .collect::<Array1<f64>>();

    Ok((y, keep_state.then(|| Array1::from_vec(z))))
}

/// One output sample, updating the delay line in place.
#[inline]
fn linear_filter_step(ba: &NormalizedBa, z: &mut [f64], xn: f64) -> f64 {
    let yn = ba.b[0] * xn + z.first().copied().unwrap_or(0.0);
    let order = z.len();
    for i in 0..order {
        let carry = if i + 1 < order { z[i + 1] } else { 0.0 };
        z[i] = ba.b[i + 1] * xn + carry - ba.a[i + 1] * yn;
    }
    yn
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn one_dim_fir_no_zi() {
        {
            // b.sum() > 1.
            let b = array![5., 4., 1., 2.];
            let a = array![1.];
            let x = array![1., 2., 3., 4., 3., 5., 6.];
            let expected = array![5., 14., 24., 36., 38., 47., 61.];

            let Ok((result, None)) = lfilter(b.view(), a.view(), x.view(), None) else {
                panic!("Should not have errored")
            };
            assert_eq!(result, expected);
        }
        {
            // b[i] < 0 for some i, b.sum() = 1.
            let b = array![0.7, -0.3, 0.6];
            let a = array![1.];
            let x = array![1., 2., 3., 4., 3., 5., 6.];
            let expected = array![0.7, 1.1, 2.1, 3.1, 2.7, 5., 4.5];

            let (result, _) = lfilter(b.view(), a.view(), x.view(), None).unwrap();
            result
                .iter()
                .zip(expected.iter())
                .for_each(|(r, e)| assert_relative_eq!(r, e, max_relative = 1e-6));
        }
    }

    #[test]
    fn one_dim_fir_with_zi() {
        let b = array![0.5, 0.4];
        let a = array![1.];
        let x = array![-4., -3., -1., -2., 1., 2., -3., 4., 3., 5., 6., 7., -8., 1.];
        let zi = array![-1.6];
        let expected =
            array![-3.6, -3.1, -1.7, -1.4, -0.3, 1.4, -0.7, 0.8, 3.1, 3.7, 5., 5.9, -1.2, -2.7];

        let Ok((result, Some(zf))) = lfilter(b.view(), a.view(), x.view(), Some(zi.view())) else {
            panic!("Should not have errored")
        };
        result
            .iter()
            .zip(expected.iter())
            .for_each(|(r, e)| assert_relative_eq!(r, e, max_relative = 1e-9, epsilon = 1e-12));
        assert_relative_eq!(zf[0], 0.4, max_relative = 1e-12);
    }

    #[test]
    fn one_pole_recursion() {
        // y[n] = x[n] + 0.5 y[n-1]
        let b = array![1.];
        let a = array![1., -0.5];
        let x = array![1., 0., 0., 0.];
        let (y, _) = lfilter(b.view(), a.view(), x.view(), None).unwrap();
        assert_eq!(y, array![1., 0.5, 0.25, 0.125]);
    }

    #[test]
    fn coefficients_are_normalized_by_a0() {
        let x = array![1., 2., 3., 4.];
        let (scaled, _) = lfilter(array![2., 2.].view(), array![2., -1.].view(), x.view(), None)
            .unwrap();
        let (plain, _) = lfilter(array![1., 1.].view(), array![1., -0.5].view(), x.view(), None)
            .unwrap();
        assert_eq!(scaled, plain);
    }

    #[test]
    fn reversed_views_are_accepted() {
        let b = array![0.5, 0.5];
        let a = array![1.];
        let x = array![1., 2., 3.];
        let (y, _) = lfilter(b.view(), a.view(), x.slice(ndarray::s![..;-1]), None).unwrap();
        assert_eq!(y, array![1.5, 2.5, 1.5]);
    }

    #[test]
    fn invalid_inputs() {
        let x = array![1., 2.];
        let err = lfilter(array![1.].view(), array![0., 1.].view(), x.view(), None).unwrap_err();
        assert_eq!(
            err,
            ExecInvariantViolation::Config(ConfigError::InvalidArgument {
                arg: "a",
                reason: "a[0] must be non-zero",
            })
        );
        let empty = Array1::<f64>::zeros(0);
        assert!(lfilter(empty.view(), array![1.].view(), x.view(), None).is_err());
        let err = lfilter(
            array![1., 1., 1.].view(),
            array![1.].view(),
            x.view(),
            Some(array![0.].view()),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ExecInvariantViolation::LengthMismatch { arg: "zi", expected: 2, got: 1 }
        ));
    }
}

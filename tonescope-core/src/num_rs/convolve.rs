use crate::{Error, Result};
use num_traits::NumAssign;

/// Convolution mode determines behavior near edges and output size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvolveMode {
    /// Full convolution, output size is `in1.len() + in2.len() - 1`
    #[default]
    Full,
    /// Valid convolution, output size is `max(in1.len(), in2.len()) - min(in1.len(), in2.len()) + 1`
    Valid,
    /// Same convolution, output size is `max(in1.len(), in2.len())`
    Same,
}

/// Discrete, linear convolution of two one-dimensional sequences, following
/// `numpy.convolve`.
///
/// Polynomial multiplication is the main use: the coefficients of
/// `p(x) * q(x)` are `convolve(p, q, ConvolveMode::Full)`.
///
/// # Errors
/// Either input being empty is an invalid configuration.
///
/// # Examples
/// ```
/// use tonescope_core::num_rs::{convolve, ConvolveMode};
///
/// let a = [1., 2., 3.];
/// let v = [0., 1., 0.5];
///
/// assert_eq!(convolve(&a, &v, ConvolveMode::Full).unwrap(), vec![0., 1., 2.5, 4., 1.5]);
/// assert_eq!(convolve(&a, &v, ConvolveMode::Same).unwrap(), vec![1., 2.5, 4.]);
/// assert_eq!(convolve(&a, &v, ConvolveMode::Valid).unwrap(), vec![2.5]);
/// ```
pub fn convolve<T>(a: &[T], v: &[T], mode: ConvolveMode) -> Result<Vec<T>>
where
    T: NumAssign + Copy,
{
    if a.is_empty() {
        return Err(Error::invalid_config("a", "cannot convolve an empty sequence"));
    }
    if v.is_empty() {
        return Err(Error::invalid_config("v", "cannot convolve an empty sequence"));
    }

    let full_len = a.len() + v.len() - 1;
    let mut full = vec![T::zero(); full_len];
    for (i, &ai) in a.iter().enumerate() {
        for (j, &vj) in v.iter().enumerate() {
            full[i + j] += ai * vj;
        }
    }

    let (long, short) = (a.len().max(v.len()), a.len().min(v.len()));
    let (start, len) = match mode {
        ConvolveMode::Full => (0, full_len),
        ConvolveMode::Same => ((short - 1) / 2, long),
        ConvolveMode::Valid => (short - 1, long - short + 1),
    };
    Ok(full[start..start + len].to_vec())
}

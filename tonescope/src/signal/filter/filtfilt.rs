use super::lfilter::lfilter;
use super::lfilter_zi::lfilter_zi;
use crate::kernel::ExecInvariantViolation;
use ndarray::{concatenate, s, Array1, ArrayView1, Axis, CowArray, Ix1};

/// Edge extension used by [`filtfilt`] before the forward pass.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum FiltFiltPadType {
    /// Point-symmetric about each end sample.
    #[default]
    Odd,
    /// Mirror image about each end sample.
    Even,
    /// Repeat the end samples.
    Const,
}

impl FiltFiltPadType {
    /// Extend `x` by `n` samples at both ends.
    ///
    /// * odd: `2 x[0] - x[n..0]` on the left, `2 x[-1] - x[-2..-2-n]` on the right.
    /// * even: `x[n..0]` on the left, `x[-2..-2-n]` on the right.
    /// * const: `n` copies of `x[0]` and of `x[-1]`.
    ///
    /// # Errors
    /// The extension must be shorter than `x`.
    pub fn ext(&self, x: ArrayView1<f64>, n: usize) -> Result<Array1<f64>, ExecInvariantViolation> {
        if n < 1 {
            return Ok(x.to_owned());
        }
        let len = x.len();
        if n >= len {
            return Err(ExecInvariantViolation::InsufficientData {
                arg: "padlen",
                required: n + 1,
                got: len,
            });
        }

        let (first, last) = (x[0], x[len - 1]);
        let left_mirror = x.slice(s![1..=n;-1]);
        let right_mirror = x.slice(s![len - 1 - n..len - 1;-1]);
        let (left, right) = match self {
            FiltFiltPadType::Odd => (
                left_mirror.mapv(|v| 2.0 * first - v),
                right_mirror.mapv(|v| 2.0 * last - v),
            ),
            FiltFiltPadType::Even => (left_mirror.to_owned(), right_mirror.to_owned()),
            FiltFiltPadType::Const => (Array1::from_elem(n, first), Array1::from_elem(n, last)),
        };

        concatenate(Axis(0), &[left.view(), x.view(), right.view()]).map_err(|_| {
            ExecInvariantViolation::InvalidState {
                reason: "edge extension produced mismatched shapes",
            }
        })
    }
}

/// Padding arguments for [`filtfilt`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FiltFiltPad {
    /// Padding type.
    pub pad_type: FiltFiltPadType,
    /// Samples added at each end; `None` means `3 * max(len(a), len(b))`.
    pub len: Option<usize>,
}

/// Resolve the pad length and extend `x`.
///
/// `None` is a deliberate absence of padding. The signal must be strictly
/// longer than the pad length.
fn validate_pad(
    pad: Option<FiltFiltPad>,
    x: ArrayView1<f64>,
    ntaps: usize,
) -> Result<(usize, CowArray<f64, Ix1>), ExecInvariantViolation> {
    let edge = match pad {
        None => 0,
        Some(FiltFiltPad { len, .. }) => len.unwrap_or(ntaps * 3),
    };
    if x.len() <= edge {
        return Err(ExecInvariantViolation::InsufficientData {
            arg: "padlen",
            required: edge + 1,
            got: x.len(),
        });
    }

    let ext = match pad {
        Some(FiltFiltPad { pad_type, .. }) => CowArray::from(pad_type.ext(x, edge)?),
        None => CowArray::from(x),
    };
    Ok((edge, ext))
}

/// Apply a digital filter forward and backward to a signal.
///
/// The combined filter has zero phase and a magnitude response equal to
/// the square of the single-pass response. On both passes the initial
/// state comes from [`lfilter_zi`], scaled by the first sample that pass
/// sees, which suppresses start-up transients.
///
/// # Errors
/// * [`ExecInvariantViolation::InsufficientData`] when `x` is not longer
///   than the pad length.
/// * Invalid coefficients (see [`lfilter`]).
/// * [`ExecInvariantViolation::InvalidState`] when `lfilter_zi` is singular.
///
/// # Examples
/// ```
/// use ndarray::array;
/// use tonescope::signal::filter::{filtfilt, FiltFiltPad};
///
/// let b = array![0.5, 0.5];
/// let a = array![1.];
/// let x = array![0., 0.6389613, 0.890577, 0.9830277, 0.9992535, 0.9756868, 0.9304659, 0.8734051];
/// let y = filtfilt(b.view(), a.view(), x.view(), Some(FiltFiltPad::default())).unwrap();
/// assert_eq!(y.len(), x.len());
/// ```
pub fn filtfilt(
    b: ArrayView1<f64>,
    a: ArrayView1<f64>,
    x: ArrayView1<f64>,
    padding: Option<FiltFiltPad>,
) -> Result<Array1<f64>, ExecInvariantViolation> {
    let ntaps = a.len().max(b.len());
    let (edge, ext) = validate_pad(padding, x, ntaps)?;
    let zi = Array1::from_vec(lfilter_zi(&b.to_vec(), &a.to_vec())?);

    let x0 = ext[0];
    let (y, _) = lfilter(b, a, ext.view(), Some((&zi * x0).view()))?;

    let y0 = y[y.len() - 1];
    let (y, _) = lfilter(b, a, y.slice(s![..;-1]), Some((&zi * y0).view()))?;

    let y = y.slice(s![..;-1]);
    Ok(y.slice(s![edge..y.len() - edge]).to_owned())
}

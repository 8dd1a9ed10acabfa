use super::lfilter::NormalizedBa;
use crate::kernel::ExecInvariantViolation;
use crate::linalg::companion;
use nalgebra::{DMatrix, DVector};

/// Steady-state initial conditions of `lfilter` for a unit step input.
///
/// Solves `(I - C^T) zi = b[1:] - a[1:] b[0]` where `C` is the companion
/// matrix of the normalized denominator. Scaling `zi` by the first input
/// sample starts the filter as though that sample had been held forever.
///
/// # Errors
/// Invalid coefficients are configuration errors; a singular system (a
/// pole exactly at `z = 1`) is an invalid state.
pub fn lfilter_zi(b: &[f64], a: &[f64]) -> Result<Vec<f64>, ExecInvariantViolation> {
    let ba = NormalizedBa::new(b, a)?;
    let order = ba.order();
    if order == 0 {
        return Ok(Vec::new());
    }

    let c = companion(&ba.a)?;
    let i_minus_ct = DMatrix::<f64>::identity(order, order) - c.transpose();
    let rhs = DVector::from_iterator(
        order,
        ba.b[1..]
            .iter()
            .zip(ba.a[1..].iter())
            .map(|(bi, ai)| bi - ai * ba.b[0]),
    );

    let zi = i_minus_ct
        .lu()
        .solve(&rhs)
        .ok_or(ExecInvariantViolation::InvalidState {
            reason: "lfilter_zi system is singular",
        })?;
    Ok(zi.iter().copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::filter::lfilter;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array1, ArrayView1};

    #[test]
    fn second_order_reference() {
        // butter(2, 0.5)
        let b = [0.29289322, 0.58578644, 0.29289322];
        let a = [1.0, 0.0, 0.17157288];
        let zi = lfilter_zi(&b, &a).unwrap();
        assert_eq!(zi.len(), 2);
        assert_abs_diff_eq!(zi[0], 0.70710678, epsilon = 1e-7);
        assert_abs_diff_eq!(zi[1], 0.12132034, epsilon = 1e-7);
    }

    #[test]
    fn step_response_is_flat_from_the_first_sample() {
        let b = [0.2, 0.3, 0.1];
        let a = [1.0, -0.6, 0.2];
        let zi = lfilter_zi(&b, &a).unwrap();
        let x = Array1::from_elem(20, 1.0);
        let (y, _) = lfilter(
            ArrayView1::from(&b),
            ArrayView1::from(&a),
            x.view(),
            Some(ArrayView1::from(&zi)),
        )
        .unwrap();
        let dc = b.iter().sum::<f64>() / a.iter().sum::<f64>();
        y.iter().for_each(|v| assert_abs_diff_eq!(*v, dc, epsilon = 1e-12));
    }

    #[test]
    fn fir_state_and_scalar_gain() {
        let zi = lfilter_zi(&[0.5, 0.5], &[1.0]).unwrap();
        assert_eq!(zi, vec![0.5]);
        assert!(lfilter_zi(&[3.0], &[1.0]).unwrap().is_empty());
    }

    #[test]
    fn integrator_is_singular() {
        let err = lfilter_zi(&[1.0], &[1.0, -1.0]).unwrap_err();
        assert_eq!(
            err,
            ExecInvariantViolation::InvalidState {
                reason: "lfilter_zi system is singular"
            }
        );
    }
}

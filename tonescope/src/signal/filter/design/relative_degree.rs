use crate::kernel::ExecInvariantViolation;
use nalgebra::Complex;

/// `len(poles) - len(zeros)`, rejecting improper transfer functions.
pub(crate) fn relative_degree(
    zeros: &[Complex<f64>],
    poles: &[Complex<f64>],
) -> Result<usize, ExecInvariantViolation> {
    poles
        .len()
        .checked_sub(zeros.len())
        .ok_or(ExecInvariantViolation::InvalidState {
            reason: "improper transfer function; poles must be >= zeros",
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degree_counts_excess_poles() {
        let one = Complex::new(1.0, 0.0);
        assert_eq!(relative_degree(&[], &[one, one]), Ok(2));
        assert_eq!(relative_degree(&[one], &[one]), Ok(0));
        assert!(relative_degree(&[one, one], &[one]).is_err());
    }
}

//! Analog low-pass prototypes with a unit cutoff, in zero/pole/gain form.
//!
//! Cutoff conventions follow the usual ones: Butterworth is -3 dB at
//! `1 rad/s`, Chebyshev I and elliptic leave the passband at `-rp` dB and
//! Chebyshev II enters the stopband at `-rs` dB.

use super::ellip::{arc_jac_sc1, ellipdeg, ellipj, ellipk};
use super::Zpk;
use crate::kernel::ExecInvariantViolation;
use core::f64::consts::{LN_10, PI};
use nalgebra::Complex;

/// Threshold below which a prototype zero or pole coordinate counts as zero.
const PROTO_EPS: f64 = 2e-16;

/// `10^x - 1` without cancellation for small `x`.
fn pow10m1(x: f64) -> f64 {
    (x * LN_10).exp_m1()
}

/// Odd integers `-n+1, -n+3, ..., n-1`.
fn symmetric_steps(n: usize) -> impl Iterator<Item = f64> {
    (0..n).map(move |i| (2 * i) as f64 - n as f64 + 1.0)
}

fn product(values: &[Complex<f64>]) -> Complex<f64> {
    values
        .iter()
        .fold(Complex::new(1.0, 0.0), |acc, v| acc * (-v))
}

/// Butterworth: poles evenly spaced on the left half of the unit circle.
pub(crate) fn buttap(n: usize) -> Zpk {
    let poles = symmetric_steps(n)
        .map(|m| -Complex::new(0.0, PI * m / (2.0 * n as f64)).exp())
        .collect();
    Zpk {
        zeros: Vec::new(),
        poles,
        gain: 1.0,
    }
}

/// Chebyshev type I with `rp` dB of passband ripple.
pub(crate) fn cheb1ap(n: usize, rp: f64) -> Zpk {
    let eps = pow10m1(0.1 * rp).sqrt();
    let mu = (1.0 / eps).asinh() / n as f64;
    let poles: Vec<Complex<f64>> = symmetric_steps(n)
        .map(|m| -Complex::new(mu, PI * m / (2.0 * n as f64)).sinh())
        .collect();

    let mut gain = product(&poles).re;
    if n % 2 == 0 {
        gain /= (1.0 + eps * eps).sqrt();
    }
    Zpk {
        zeros: Vec::new(),
        poles,
        gain,
    }
}

/// Chebyshev type II with the stopband `rs` dB down.
pub(crate) fn cheb2ap(n: usize, rs: f64) -> Zpk {
    let de = 1.0 / pow10m1(0.1 * rs).sqrt();
    let mu = (1.0 / de).asinh() / n as f64;
    let nf = n as f64;

    // The middle zero of odd orders sits at infinity and is dropped.
    let zeros: Vec<Complex<f64>> = symmetric_steps(n)
        .filter(|&m| m != 0.0)
        .map(|m| Complex::new(0.0, 1.0 / (m * PI / (2.0 * nf)).sin()))
        .collect();

    let poles: Vec<Complex<f64>> = symmetric_steps(n)
        .map(|m| {
            let p = -Complex::new(0.0, PI * m / (2.0 * nf)).exp();
            Complex::new(mu.sinh() * p.re, mu.cosh() * p.im).inv()
        })
        .collect();

    let gain = (product(&poles) / product(&zeros)).re;
    Zpk { zeros, poles, gain }
}

/// Elliptic (Cauer) with `rp` dB of passband ripple and the stopband `rs`
/// dB down.
pub(crate) fn ellipap(n: usize, rp: f64, rs: f64) -> Result<Zpk, ExecInvariantViolation> {
    if n == 1 {
        let p = -(1.0 / pow10m1(0.1 * rp)).sqrt();
        return Ok(Zpk {
            zeros: Vec::new(),
            poles: vec![Complex::new(p, 0.0)],
            gain: -p,
        });
    }

    let eps_sq = pow10m1(0.1 * rp);
    let eps = eps_sq.sqrt();
    let ck1_sq = eps_sq / pow10m1(0.1 * rs);
    if ck1_sq == 0.0 {
        return Err(ExecInvariantViolation::InvalidState {
            reason: "ripple and attenuation give a degenerate elliptic modulus",
        });
    }

    let m = ellipdeg(n, ck1_sq);
    let capk = ellipk(m);
    let nf = n as f64;

    let sncndn: Vec<(f64, f64, f64)> = (1 - n % 2..n)
        .step_by(2)
        .map(|j| ellipj(j as f64 * capk / nf, m))
        .collect();

    let mut zeros: Vec<Complex<f64>> = sncndn
        .iter()
        .filter(|(s, _, _)| s.abs() > PROTO_EPS)
        .map(|(s, _, _)| Complex::new(0.0, 1.0 / (m.sqrt() * s)))
        .collect();
    let conj_zeros: Vec<Complex<f64>> = zeros.iter().map(|z| z.conj()).collect();
    zeros.extend(conj_zeros);

    let r = arc_jac_sc1(1.0 / eps, ck1_sq).ok_or(ExecInvariantViolation::InvalidState {
        reason: "inverse Jacobi sc did not converge",
    })?;
    let v0 = capk * r / (nf * ellipk(ck1_sq));
    let (sv, cv, dv) = ellipj(v0, 1.0 - m);

    let mut poles: Vec<Complex<f64>> = sncndn
        .iter()
        .map(|&(s, c, d)| {
            -Complex::new(c * d * sv * cv, s * dv) / (1.0 - (d * sv).powi(2))
        })
        .collect();
    let conj_poles: Vec<Complex<f64>> = if n % 2 == 1 {
        let scale = poles.iter().map(|p| p.norm_sqr()).sum::<f64>().sqrt();
        poles
            .iter()
            .filter(|p| p.im.abs() > PROTO_EPS * scale)
            .map(|p| p.conj())
            .collect()
    } else {
        poles.iter().map(|p| p.conj()).collect()
    };
    poles.extend(conj_poles);

    let mut gain = (product(&poles) / product(&zeros)).re;
    if n % 2 == 0 {
        gain /= (1.0 + eps_sq).sqrt();
    }
    Ok(Zpk { zeros, poles, gain })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn analog_gain_db(zpk: &Zpk, w: f64) -> f64 {
        let s = Complex::new(0.0, w);
        let num = zpk.zeros.iter().fold(Complex::new(zpk.gain, 0.0), |acc, z| acc * (s - z));
        let den = zpk.poles.iter().fold(Complex::new(1.0, 0.0), |acc, p| acc * (s - p));
        20.0 * (num / den).norm().log10()
    }

    fn assert_left_half_plane(zpk: &Zpk) {
        zpk.poles.iter().for_each(|p| assert!(p.re < 0.0, "pole {p} is unstable"));
    }

    #[test]
    fn butterworth_second_order_poles() {
        let zpk = buttap(2);
        let h = core::f64::consts::FRAC_1_SQRT_2;
        assert_eq!(zpk.poles.len(), 2);
        assert_abs_diff_eq!(zpk.poles[0].re, -h, epsilon = 1e-15);
        assert_abs_diff_eq!(zpk.poles[0].im, h, epsilon = 1e-15);
        assert_abs_diff_eq!(zpk.poles[1].im, -h, epsilon = 1e-15);
        assert!(zpk.zeros.is_empty());
    }

    #[test]
    fn first_order_prototypes() {
        let eps = pow10m1(0.1).sqrt();
        let cheb1 = cheb1ap(1, 1.0);
        assert_abs_diff_eq!(cheb1.poles[0].re, -1.0 / eps, epsilon = 1e-12);
        assert_abs_diff_eq!(cheb1.gain, 1.0 / eps, epsilon = 1e-12);

        let cheb2 = cheb2ap(1, 40.0);
        assert!(cheb2.zeros.is_empty());
        assert_abs_diff_eq!(cheb2.poles[0].re, -1.0 / 9999f64.sqrt(), epsilon = 1e-12);

        let ellip = ellipap(1, 1.0, 40.0).unwrap();
        assert_abs_diff_eq!(ellip.poles[0].re, -1.0 / eps, epsilon = 1e-12);
        assert_abs_diff_eq!(ellip.gain, 1.0 / eps, epsilon = 1e-12);
    }

    #[test]
    fn band_edges_sit_at_the_requested_levels() {
        for n in 1..=8 {
            let butter = buttap(n);
            assert_left_half_plane(&butter);
            assert_abs_diff_eq!(analog_gain_db(&butter, 1.0), -3.010_299_956_639_812, epsilon = 1e-9);

            let cheb1 = cheb1ap(n, 1.0);
            assert_left_half_plane(&cheb1);
            assert_abs_diff_eq!(analog_gain_db(&cheb1, 1.0), -1.0, epsilon = 1e-9);

            let cheb2 = cheb2ap(n, 40.0);
            assert_left_half_plane(&cheb2);
            assert_abs_diff_eq!(analog_gain_db(&cheb2, 1.0), -40.0, epsilon = 1e-8);
            assert_abs_diff_eq!(analog_gain_db(&cheb2, 0.0), 0.0, epsilon = 1e-9);

            let ellip = ellipap(n, 1.0, 40.0).unwrap();
            assert_left_half_plane(&ellip);
            assert_eq!(ellip.poles.len(), n);
            assert_eq!(ellip.zeros.len(), n - n % 2);
            assert_abs_diff_eq!(analog_gain_db(&ellip, 1.0), -1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn even_order_ripple_starts_at_dc() {
        assert_abs_diff_eq!(analog_gain_db(&cheb1ap(4, 0.5), 0.0), -0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(analog_gain_db(&cheb1ap(5, 0.5), 0.0), 0.0, epsilon = 1e-9);
        let ellip = ellipap(4, 0.5, 60.0).unwrap();
        assert_abs_diff_eq!(analog_gain_db(&ellip, 0.0), -0.5, epsilon = 1e-6);
    }

    #[test]
    fn elliptic_stopband_meets_attenuation() {
        let zpk = ellipap(5, 1.0, 50.0).unwrap();
        // Past the transition band the response never climbs above -rs.
        let worst = (0..400)
            .map(|i| 3.0 + i as f64 * 0.05)
            .map(|w| analog_gain_db(&zpk, w))
            .fold(f64::NEG_INFINITY, f64::max);
        assert!(worst <= -50.0 + 1e-4, "stopband peak {worst} dB");
    }
}

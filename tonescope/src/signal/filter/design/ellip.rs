//! Elliptic integrals and Jacobi elliptic functions used by the Cauer
//! prototype.
//!
//! Parameters follow the `m = k^2` convention throughout.

use core::f64::consts::{FRAC_PI_2, PI};

const AGM_MAX_ITER: usize = 64;
const ELLIPDEG_TERMS: i32 = 7;
const LANDEN_MAX_ITER: usize = 10;

/// Arithmetic-geometric mean of `a` and `b`.
pub(crate) fn agm(mut a: f64, mut b: f64) -> f64 {
    for _ in 0..AGM_MAX_ITER {
        if (a - b).abs() <= f64::EPSILON * a {
            break;
        }
        let next = 0.5 * (a + b);
        b = (a * b).sqrt();
        a = next;
    }
    a
}

/// Complete elliptic integral of the first kind `K(m)`, `0 <= m < 1`.
pub(crate) fn ellipk(m: f64) -> f64 {
    FRAC_PI_2 / agm(1.0, (1.0 - m).sqrt())
}

/// `K(1 - p)` without forming `1 - p`, accurate for small `p`.
pub(crate) fn ellipkm1(p: f64) -> f64 {
    FRAC_PI_2 / agm(1.0, p.sqrt())
}

/// Jacobi elliptic functions `(sn, cn, dn)` of `u` with parameter `m`
/// (descending Landen / AGM scale).
pub(crate) fn ellipj(u: f64, m: f64) -> (f64, f64, f64) {
    if !(0.0..=1.0).contains(&m) {
        return (f64::NAN, f64::NAN, f64::NAN);
    }
    if m < 1e-9 {
        let t = u.sin();
        let b = u.cos();
        let ai = 0.25 * m * (u - t * b);
        return (t - ai * b, b + ai * t, 1.0 - 0.5 * m * t * t);
    }
    if m >= 0.999_999_999_9 {
        let mut ai = 0.25 * (1.0 - m);
        let b = u.cosh();
        let t = u.tanh();
        let phi = 1.0 / b;
        let twon = b * u.sinh();
        let sn = t + ai * (twon - u) / (b * b);
        ai *= t * phi;
        return (sn, phi - ai * (twon - u), phi + ai * (twon + u));
    }

    let mut a = [0.0f64; 9];
    let mut c = [0.0f64; 9];
    a[0] = 1.0;
    c[0] = m.sqrt();
    let mut b = (1.0 - m).sqrt();
    let mut twon = 1.0;
    let mut i = 0;
    while (c[i] / a[i]).abs() > f64::EPSILON / 2.0 {
        if i > 7 {
            break;
        }
        let ai = a[i];
        i += 1;
        c[i] = 0.5 * (ai - b);
        let t = (ai * b).sqrt();
        a[i] = 0.5 * (ai + b);
        b = t;
        twon *= 2.0;
    }

    let mut phi = twon * a[i] * u;
    let mut prev = phi;
    while i > 0 {
        let t = c[i] * phi.sin() / a[i];
        prev = phi;
        phi = 0.5 * (t.asin() + phi);
        i -= 1;
    }
    let cn = phi.cos();
    (phi.sin(), cn, cn / (phi - prev).cos())
}

/// Solve the degree equation: the parameter `m` of an order-`n` elliptic
/// filter whose modulus ratio is `m1` (nome series).
pub(crate) fn ellipdeg(n: usize, m1: f64) -> f64 {
    let k1 = ellipk(m1);
    let k1p = ellipkm1(m1);
    let q1 = (-PI * k1p / k1).exp();
    let q = q1.powf(1.0 / n as f64);

    let num: f64 = (0..=ELLIPDEG_TERMS).map(|m| q.powi(m * (m + 1))).sum();
    let den: f64 = 1.0 + 2.0 * (1..=ELLIPDEG_TERMS + 1).map(|m| q.powi(m * m)).sum::<f64>();
    16.0 * q * (num / den).powi(4)
}

fn complement(kx: f64) -> f64 {
    ((1.0 - kx) * (1.0 + kx)).sqrt()
}

/// Real inverse of the Jacobi `sc` function with complementary parameter:
/// the `u` with `sc(u, 1 - m) = w`.
///
/// Evaluated as `Im(arc_sn(j w, m))` through the descending Landen
/// sequence, so no complex arithmetic is needed.
pub(crate) fn arc_jac_sc1(w: f64, m: f64) -> Option<f64> {
    let k = m.sqrt();
    if !(0.0..1.0).contains(&k) {
        return None;
    }
    let mut ks = vec![k];
    while let Some(&last) = ks.last() {
        if last == 0.0 {
            break;
        }
        if ks.len() > LANDEN_MAX_ITER {
            return None;
        }
        let kp = complement(last);
        ks.push((1.0 - kp) / (1.0 + kp));
    }

    let cap_k = ks[1..].iter().map(|k| 1.0 + k).product::<f64>() * FRAC_PI_2;
    let y = ks.windows(2).fold(w, |y, pair| {
        let (kn, knext) = (pair[0], pair[1]);
        2.0 * y / ((1.0 + knext) * (1.0 + (1.0 + kn * kn * y * y).sqrt()))
    });
    Some(cap_k * 2.0 / PI * y.asinh())
}

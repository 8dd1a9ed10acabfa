use core::ops::{Add, Div, Mul, Neg, Sub};

/// Unevaluated sum `hi + lo` with `|lo| <= ulp(hi) / 2`.
#[derive(Debug, Clone, Copy)]
struct TwoF64 {
    hi: f64,
    lo: f64,
}

impl TwoF64 {
    const ONE: Self = Self { hi: 1.0, lo: 0.0 };

    fn new(hi: f64) -> Self {
        Self { hi, lo: 0.0 }
    }

    fn quick_two_sum(a: f64, b: f64) -> Self {
        let hi = a + b;
        Self {
            hi,
            lo: b - (hi - a),
        }
    }
}

impl Add for TwoF64 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        let s = self.hi + rhs.hi;
        let bb = s - self.hi;
        let err = (self.hi - (s - bb)) + (rhs.hi - bb);
        Self::quick_two_sum(s, err + self.lo + rhs.lo)
    }
}

impl Neg for TwoF64 {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            hi: -self.hi,
            lo: -self.lo,
        }
    }
}

impl Sub for TwoF64 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self + -rhs
    }
}

impl Mul for TwoF64 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let p = self.hi * rhs.hi;
        let err = self.hi.mul_add(rhs.hi, -p) + (self.hi * rhs.lo + self.lo * rhs.hi);
        Self::quick_two_sum(p, err)
    }
}

impl Div for TwoF64 {
    type Output = Self;
    // Long division: three quotient digits, each from the running remainder.
    fn div(self, rhs: Self) -> Self {
        let q1 = self.hi / rhs.hi;
        let r = self - rhs * Self::new(q1);
        let q2 = r.hi / rhs.hi;
        let r = r - rhs * Self::new(q2);
        let q3 = r.hi / rhs.hi;
        Self::quick_two_sum(q1, q2) + Self::new(q3)
    }
}

/// Whether every root of `a` (highest power first, or equivalently a
/// denominator in powers of `z^-1`) lies strictly inside the unit circle.
///
/// Schur-Cohn step-down: the reflection coefficients `k_m = a_m[m] / a_m[0]`
/// of successive reduced polynomials must all satisfy `|k_m| < 1`. The
/// recursion runs in double-double precision so that clustered roots near
/// the circle, as produced by high-order narrow low-pass designs, are judged
/// on the coefficients actually stored rather than on rounding noise.
///
/// An empty slice, a zero leading coefficient and non-finite values are all
/// reported as unstable.
///
/// ```
/// use tonescope_core::num_rs::is_schur_stable;
///
/// // z^2 - 0.9z + 0.2 = (z - 0.5)(z - 0.4)
/// assert!(is_schur_stable(&[1.0, -0.9, 0.2]));
/// // z - 1.5
/// assert!(!is_schur_stable(&[1.0, -1.5]));
/// ```
pub fn is_schur_stable(a: &[f64]) -> bool {
    let Some(&lead) = a.first() else {
        return false;
    };
    if lead == 0.0 || a.iter().any(|v| !v.is_finite()) {
        return false;
    }

    let lead = TwoF64::new(lead);
    let mut poly: Vec<TwoF64> = a.iter().map(|&v| TwoF64::new(v) / lead).collect();
    while poly.len() > 1 {
        let m = poly.len() - 1;
        let k = poly[m];
        let scale = TwoF64::ONE - k * k;
        if scale.hi <= 0.0 || scale.hi.is_nan() {
            return false;
        }
        poly = (0..m)
            .map(|i| (poly[i] - k * poly[m - i]) / scale)
            .collect();
    }
    true
}

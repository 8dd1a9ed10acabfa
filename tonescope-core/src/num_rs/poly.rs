use num_traits::NumAssign;

/// Coefficients of the monic polynomial whose roots are `roots`, highest
/// power first (as `numpy.poly`).
///
/// An empty root set yields the constant polynomial `[1]`.
///
/// ```
/// use tonescope_core::num_rs::poly;
///
/// // (x - 1)(x - 2) = x^2 - 3x + 2
/// assert_eq!(poly(&[1.0, 2.0]), vec![1.0, -3.0, 2.0]);
/// ```
pub fn poly<T>(roots: &[T]) -> Vec<T>
where
    T: NumAssign + Copy,
{
    let mut coeffs = Vec::with_capacity(roots.len() + 1);
    coeffs.push(T::one());
    for &r in roots {
        coeffs.push(T::zero());
        for i in (1..coeffs.len()).rev() {
            let prev = coeffs[i - 1];
            coeffs[i] -= r * prev;
        }
    }
    coeffs
}

/// Evaluate a polynomial given highest power first at `x` (Horner).
///
/// An empty coefficient slice evaluates to zero.
pub fn polyval<T>(coeffs: &[T], x: T) -> T
where
    T: NumAssign + Copy,
{
    coeffs.iter().fold(T::zero(), |acc, &c| acc * x + c)
}

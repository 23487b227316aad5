//! The handful of complex-number helpers the iteration kernels need
//! beyond what `num::Complex` gives us directly.  A 2D point is just a
//! complex number here, the same as everywhere else in this crate.

use num::Complex;

/// The squared distance between two points.  Cheaper than the real
/// distance, and every test in this crate compares against a squared
/// limit anyway.
#[inline]
pub fn dist_sqr(i: Complex<f64>, j: Complex<f64>) -> f64 {
    (i.im - j.im) * (i.im - j.im) + (i.re - j.re) * (i.re - j.re)
}

/// Raise `z` to a non-negative integral power by repeated squaring.
pub fn powu(z: Complex<f64>, exp: u32) -> Complex<f64> {
    let mut result = Complex::new(1.0, 0.0);
    let mut base = z;
    let mut exp = exp;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * base;
        }
        base = base * base;
        exp >>= 1;
    }
    result
}

/// Raise `z` to an arbitrary real power using de Moivre:
/// `|z|^p (cos pθ + i sin pθ)`.  Zero stays zero for positive powers.
pub fn powf(z: Complex<f64>, exp: f64) -> Complex<f64> {
    let r = z.norm();
    if r == 0.0 {
        return Complex::new(0.0, 0.0);
    }
    let theta = z.arg() * exp;
    let rp = r.powf(exp);
    Complex::new(rp * theta.cos(), rp * theta.sin())
}

/// Newton's method divides by the derivative, which vanishes at the
/// origin.  Push a point sitting exactly on the origin to the smallest
/// positive representable real instead.
#[inline]
pub fn nudge_from_origin(z: Complex<f64>) -> Complex<f64> {
    if z.re == 0.0 && z.im == 0.0 {
        Complex::new(f64::from_bits(1), 0.0)
    } else {
        z
    }
}

/// True if either component has gone to infinity or NaN.
#[inline]
pub fn is_degenerate(z: Complex<f64>) -> bool {
    !(z.re.is_finite() && z.im.is_finite())
}

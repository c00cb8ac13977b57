//! Double-width arithmetic and scalar helpers.
//!
//! Single precision coordinates are widened to `f64` before being multiplied so that
//! products of two coordinates are exact, which makes the sign of orientation tests
//! reliable. Every predicate of the path and tessellation crates goes through these
//! functions.

use crate::math::{Point, Vector};

#[cfg(not(feature = "std"))]
use num_traits::Float;

/// Product of two single precision values, computed without rounding.
#[inline]
pub fn mul_wide(a: f32, b: f32) -> f64 {
    a as f64 * b as f64
}

/// Cross product of two vectors computed in double precision.
#[inline]
pub fn cross_wide(a: Vector, b: Vector) -> f64 {
    mul_wide(a.x, b.y) - mul_wide(a.y, b.x)
}

/// Dot product of two vectors computed in double precision.
#[inline]
pub fn dot_wide(a: Vector, b: Vector) -> f64 {
    mul_wide(a.x, b.x) + mul_wide(a.y, b.y)
}

/// Twice the signed area of the triangle `a, b, c`.
///
/// Positive when `c` is on the left of `a -> b` in a y-up coordinate system (clockwise
/// on screen where y points down). The coordinate differences are taken in double
/// precision so the sign is exact for any finite `f32` inputs of comparable magnitude.
#[inline]
pub fn orient2d(a: Point, b: Point, c: Point) -> f64 {
    let abx = b.x as f64 - a.x as f64;
    let aby = b.y as f64 - a.y as f64;
    let acx = c.x as f64 - a.x as f64;
    let acy = c.y as f64 - a.y as f64;

    abx * acy - aby * acx
}

/// Sign of `orient2d` as -1, 0 or 1.
#[inline]
pub fn orientation(a: Point, b: Point, c: Point) -> i32 {
    sign_f64(orient2d(a, b, c))
}

#[inline]
pub fn sign_f64(v: f64) -> i32 {
    (v > 0.0) as i32 - (v < 0.0) as i32
}

/// Computes `a * b / c` with a double precision intermediate.
///
/// Returns `None` if `c` is zero.
#[inline]
pub fn mul_div(a: f32, b: f32, c: f32) -> Option<f32> {
    if c == 0.0 {
        return None;
    }

    Some((mul_wide(a, b) / c as f64) as f32)
}

/// Rounds to the nearest integer, halfway cases away from zero.
///
/// Returns `None` if the value does not fit in an `i32`.
#[inline]
pub fn round_to_i32(v: f32) -> Option<i32> {
    let r = v.round();
    if !(r >= i32::MIN as f32 && r < i32::MAX as f32) {
        return None;
    }

    Some(r as i32)
}

/// Sine of an angle expressed in degrees.
#[inline]
pub fn sin_deg(deg: f32) -> f32 {
    deg.to_radians().sin()
}

/// Cosine of an angle expressed in degrees.
#[inline]
pub fn cos_deg(deg: f32) -> f32 {
    deg.to_radians().cos()
}

/// Arc cosine in degrees, with the input clamped to `[-1, 1]`.
#[inline]
pub fn acos_deg(v: f32) -> f32 {
    v.max(-1.0).min(1.0).acos().to_degrees()
}

/// Cube root.
///
/// Initial guess from a quadratic fit of the mantissa followed by three Newton
/// iterations, evaluated in double precision.
pub fn cbrt(v: f32) -> f32 {
    if v == 0.0 || !v.is_finite() {
        return v;
    }

    let x = v as f64;
    let sign = x.signum();
    let x = x.abs();

    // Bring the exponent to a multiple of three.
    let e = x.log2().floor() as i32;
    let se = e.rem_euclid(3);
    let e3 = (e - se) / 3;
    let m = x / 2f64.powi(e - se);

    let mut r = (-0.01233 * m + 0.2538) * m + 0.7585;
    r *= 2f64.powi(e3);

    for _ in 0..3 {
        r = (2.0 * r + x / (r * r)) / 3.0;
    }

    (sign * r) as f32
}

#[test]
fn orientation_signs() {
    use crate::point;

    let a = point(0.0, 0.0);
    let b = point(10.0, 0.0);
    assert_eq!(orientation(a, b, point(5.0, 1.0)), 1);
    assert_eq!(orientation(a, b, point(5.0, -1.0)), -1);
    assert_eq!(orientation(a, b, point(20.0, 0.0)), 0);

    // Collinear points of very different magnitudes.
    let a = point(0.1, 0.1);
    let b = point(16777216.0, 16777216.0);
    assert_eq!(orientation(a, b, point(1.0, 1.0)), 0);
}

#[test]
fn wide_helpers() {
    assert_eq!(mul_div(3.0, 4.0, 2.0), Some(6.0));
    assert_eq!(mul_div(3.0, 4.0, 0.0), None);
    assert_eq!(mul_wide(16777215.0, 16777215.0), 281474943156225.0);
    assert_eq!(round_to_i32(2.5), Some(3));
    assert_eq!(round_to_i32(-2.5), Some(-3));
    assert_eq!(round_to_i32(1e20), None);
}

#[test]
fn cube_root() {
    for &v in &[1.0f32, 8.0, 27.0, 0.001, 1000.0, -64.0, 3.5] {
        let r = cbrt(v);
        assert!((r * r * r - v).abs() <= v.abs() * 1e-5, "cbrt({}) = {}", v, r);
    }
    assert_eq!(cbrt(0.0), 0.0);
}

#[test]
fn degrees() {
    assert!((sin_deg(90.0) - 1.0).abs() < 1e-6);
    assert!((cos_deg(180.0) + 1.0).abs() < 1e-6);
    assert!((acos_deg(2.0) - 0.0).abs() < 1e-6);
    assert!((acos_deg(0.0) - 90.0).abs() < 1e-4);
}

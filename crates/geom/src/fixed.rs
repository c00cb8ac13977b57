//! Fixed point numbers.
//!
//! `Fp32<F>` and `Fp64<F>` store a signed integer with `F::BITS` fractional bits.
//! Products and quotients are computed in an integer type twice as wide as the
//! storage (`i64` for `Fp32`, `i128` for `Fp64`) and rounded to nearest, so chaining
//! a multiplication and a division through [`Fp32::mul_div`] loses no precision in
//! the intermediate result.
//!
//! The transcendental functions (`sqrt`, `sin`, `cos`, `atan2`, `log2`, `exp2`) are
//! approximations computed with integer arithmetic only. Their absolute error is in
//! the order of `1e-4` which is below the precision needed for sub-pixel geometry.

use core::cmp;
use core::fmt;
use core::hash;
use core::marker::PhantomData;
use core::ops;

pub struct _8;
pub struct _16;
pub struct _24;

pub trait FractionalBits {
    const BITS: u32;
}

impl FractionalBits for _8 {
    const BITS: u32 = 8;
}
impl FractionalBits for _16 {
    const BITS: u32 = 16;
}
impl FractionalBits for _24 {
    const BITS: u32 = 24;
}

/// A 32 bits fixed point number.
/// The size of the fractional part is defined by the type parameter F.
pub struct Fp32<F = _16> {
    bits: i32,
    _fract: PhantomData<F>,
}

/// A 64 bits fixed point number.
/// The size of the fractional part is defined by the type parameter F.
pub struct Fp64<F = _24> {
    bits: i64,
    _fract: PhantomData<F>,
}

// Divides rounding halfway cases away from zero.
macro_rules! rounded_div {
    ($n:expr, $d:expr) => {{
        let n = $n;
        let d = $d;
        let q = (n.abs() + d.abs() / 2) / d.abs();
        if (n < 0) != (d < 0) {
            -q
        } else {
            q
        }
    }};
}

macro_rules! impl_fixed_point {
    ($name:ident: $bits_type:ty, $wide_type:ty, $unsigned_wide:ty) => {
        impl<F: FractionalBits> $name<F> {
            /// Returns the internal representation.
            #[inline]
            pub fn raw(self) -> $bits_type {
                self.bits
            }

            #[inline]
            pub fn from_raw(bits: $bits_type) -> Self {
                $name {
                    bits,
                    _fract: PhantomData,
                }
            }

            #[inline]
            pub fn zero() -> Self {
                Self::from_raw(0)
            }

            #[inline]
            pub fn one() -> Self {
                Self::from_raw(1 << F::BITS)
            }

            #[inline]
            pub fn is_zero(self) -> bool {
                self.bits == 0
            }

            /// Smallest increment that can be represented with this type.
            #[inline]
            pub fn epsilon() -> Self {
                Self::from_raw(1)
            }

            #[inline]
            pub fn min_val() -> Self {
                Self::from_raw(<$bits_type>::MIN)
            }

            #[inline]
            pub fn max_val() -> Self {
                Self::from_raw(<$bits_type>::MAX)
            }

            #[inline]
            fn scale() -> f64 {
                (1u64 << F::BITS) as f64
            }

            /// Converts from a 64 bits floating point value, rounding to the nearest
            /// representable number.
            ///
            /// Returns `None` if the value is not finite or out of range.
            pub fn checked_from_f64(val: f64) -> Option<Self> {
                let v = (val * Self::scale()).round();
                if !(v >= <$bits_type>::MIN as f64 && v <= <$bits_type>::MAX as f64) {
                    return None;
                }

                Some(Self::from_raw(v as $bits_type))
            }

            /// Converts from a 32 bits floating point value.
            ///
            /// Returns `None` if the value is not finite or out of range.
            #[inline]
            pub fn checked_from_f32(val: f32) -> Option<Self> {
                Self::checked_from_f64(val as f64)
            }

            /// Converts from a 64 bits floating point value, saturating out of range
            /// values. NaN maps to zero.
            #[inline]
            pub fn from_f64(val: f64) -> Self {
                Self::from_raw((val * Self::scale()).round() as $bits_type)
            }

            #[inline]
            pub fn from_f32(val: f32) -> Self {
                Self::from_f64(val as f64)
            }

            #[inline]
            pub fn to_f32(self) -> f32 {
                self.to_f64() as f32
            }

            #[inline]
            pub fn to_f64(self) -> f64 {
                self.bits as f64 / Self::scale()
            }

            /// Convert to an integer, truncating toward negative infinity.
            #[inline]
            pub fn floor_to_int(self) -> $bits_type {
                self.bits >> F::BITS
            }

            /// Convert to an integer, rounding toward positive infinity.
            #[inline]
            pub fn ceil_to_int(self) -> $bits_type {
                (self.bits >> F::BITS) + ((self.bits & Self::fract_mask()) != 0) as $bits_type
            }

            /// Convert to an integer, rounding to the nearest integer. Halfway cases
            /// round away from zero.
            #[inline]
            pub fn round_to_int(self) -> $bits_type {
                let half: $bits_type = 1 << (F::BITS - 1);
                if self.bits >= 0 {
                    (self.bits + half) >> F::BITS
                } else {
                    -((-self.bits + half) >> F::BITS)
                }
            }

            /// Fractional part in raw units, always positive.
            #[inline]
            pub fn fract_raw(self) -> $bits_type {
                self.bits & Self::fract_mask()
            }

            #[inline]
            fn fract_mask() -> $bits_type {
                (1 << F::BITS) - 1
            }

            /// Returns 1 if the number is positive, -1 if it is negative and 0 otherwise.
            #[inline]
            pub fn sign(self) -> $bits_type {
                self.bits.signum()
            }

            #[inline]
            pub fn abs(self) -> Self {
                Self::from_raw(self.bits.abs())
            }

            #[inline]
            pub fn min(self, other: Self) -> Self {
                Self::from_raw(cmp::min(self.bits, other.bits))
            }

            #[inline]
            pub fn max(self, other: Self) -> Self {
                Self::from_raw(cmp::max(self.bits, other.bits))
            }

            /// Computes `self * m / d` in one go with a double width intermediate,
            /// avoiding the precision loss from shifting bits back and forth.
            ///
            /// Returns `None` if `d` is zero or the result overflows.
            pub fn mul_div(self, m: Self, d: Self) -> Option<Self> {
                if d.bits == 0 {
                    return None;
                }
                let n = <$wide_type>::from(self.bits) * <$wide_type>::from(m.bits);
                let q: $wide_type = rounded_div!(n, <$wide_type>::from(d.bits));
                Self::narrow(q)
            }

            /// Multiplication reporting overflows instead of wrapping.
            pub fn checked_mul(self, other: Self) -> Option<Self> {
                let n = <$wide_type>::from(self.bits) * <$wide_type>::from(other.bits);
                Self::narrow(Self::shift_round(n))
            }

            /// Division reporting division by zero and overflows.
            pub fn checked_div(self, other: Self) -> Option<Self> {
                if other.bits == 0 {
                    return None;
                }
                let n = <$wide_type>::from(self.bits) << F::BITS;
                let q: $wide_type = rounded_div!(n, <$wide_type>::from(other.bits));
                Self::narrow(q)
            }

            #[inline]
            fn shift_round(n: $wide_type) -> $wide_type {
                let half: $wide_type = 1 << (F::BITS - 1);
                (n + half) >> F::BITS
            }

            #[inline]
            fn narrow(v: $wide_type) -> Option<Self> {
                if v < <$wide_type>::from(<$bits_type>::MIN)
                    || v > <$wide_type>::from(<$bits_type>::MAX)
                {
                    return None;
                }

                Some(Self::from_raw(v as $bits_type))
            }

            /// Square root. Negative numbers return zero.
            pub fn sqrt(self) -> Self {
                if self.bits <= 0 {
                    return Self::zero();
                }
                // sqrt(r / 2^F) * 2^F == sqrt(r * 2^F)
                let widened = (self.bits as $unsigned_wide) << F::BITS;
                let mut root: $unsigned_wide = 0;
                let mut bit: $unsigned_wide = 1 << (<$unsigned_wide>::BITS - 2);
                let mut n = widened;
                while bit > n {
                    bit >>= 2;
                }
                while bit != 0 {
                    if n >= root + bit {
                        n -= root + bit;
                        root = (root >> 1) + bit;
                    } else {
                        root >>= 1;
                    }
                    bit >>= 2;
                }
                // Round to nearest.
                if n > root {
                    root += 1;
                }

                Self::from_raw(root as $bits_type)
            }

            #[inline]
            fn const_f64(v: f64) -> Self {
                Self::from_f64(v)
            }

            #[inline]
            fn mul_sat(self, other: Self) -> Self {
                let n = <$wide_type>::from(self.bits) * <$wide_type>::from(other.bits);
                let v = Self::shift_round(n);
                if v > <$wide_type>::from(<$bits_type>::MAX) {
                    Self::max_val()
                } else if v < <$wide_type>::from(<$bits_type>::MIN) {
                    Self::min_val()
                } else {
                    Self::from_raw(v as $bits_type)
                }
            }

            // Sine on [-pi/2, pi/2] with a Taylor polynomial in Horner form.
            fn sin_reduced(x: Self) -> Self {
                let x2 = x.mul_sat(x);
                let mut r = Self::const_f64(1.0 / 362880.0);
                r = Self::const_f64(-1.0 / 5040.0) + r.mul_sat(x2);
                r = Self::const_f64(1.0 / 120.0) + r.mul_sat(x2);
                r = Self::const_f64(-1.0 / 6.0) + r.mul_sat(x2);
                r = Self::one() + r.mul_sat(x2);
                r.mul_sat(x)
            }

            /// Sine of an angle in radians.
            pub fn sin(self) -> Self {
                let two_pi = <$wide_type>::from(Self::const_f64(core::f64::consts::TAU).bits);
                let pi = Self::const_f64(core::f64::consts::PI);
                let half_pi = Self::const_f64(core::f64::consts::FRAC_PI_2);
                // Reduce to [-pi, pi).
                let mut a = <$wide_type>::from(self.bits) % two_pi;
                if a >= <$wide_type>::from(pi.bits) {
                    a -= two_pi;
                } else if a < -<$wide_type>::from(pi.bits) {
                    a += two_pi;
                }
                let mut a = Self::from_raw(a as $bits_type);
                // Fold into [-pi/2, pi/2] using sin(pi - a) = sin(a).
                if a > half_pi {
                    a = pi - a;
                } else if a < -half_pi {
                    a = -pi - a;
                }

                Self::sin_reduced(a)
            }

            /// Cosine of an angle in radians.
            pub fn cos(self) -> Self {
                let half_pi = Self::const_f64(core::f64::consts::FRAC_PI_2);
                let shifted = <$wide_type>::from(self.bits) + <$wide_type>::from(half_pi.bits);
                let two_pi = <$wide_type>::from(Self::const_f64(core::f64::consts::TAU).bits);
                Self::from_raw((shifted % two_pi) as $bits_type).sin()
            }

            // Arc tangent on [-1, 1].
            fn atan_reduced(t: Self) -> Self {
                let t2 = t.mul_sat(t);
                let mut r = Self::const_f64(0.0208351);
                r = Self::const_f64(-0.0851330) + r.mul_sat(t2);
                r = Self::const_f64(0.1801410) + r.mul_sat(t2);
                r = Self::const_f64(-0.3302995) + r.mul_sat(t2);
                r = Self::const_f64(0.9998660) + r.mul_sat(t2);
                r.mul_sat(t)
            }

            /// Four quadrant arc tangent of `self / x`, in radians.
            pub fn atan2(self, x: Self) -> Self {
                let y = self;
                if x.bits == 0 && y.bits == 0 {
                    return Self::zero();
                }
                let pi = Self::const_f64(core::f64::consts::PI);
                let half_pi = Self::const_f64(core::f64::consts::FRAC_PI_2);
                let ax = x.abs();
                let ay = y.abs();
                let a = if ax >= ay {
                    match y.checked_div(ax) {
                        Some(t) => Self::atan_reduced(t.abs()),
                        None => Self::zero(),
                    }
                } else {
                    match x.checked_div(ay) {
                        Some(t) => half_pi - Self::atan_reduced(t.abs()),
                        None => half_pi,
                    }
                };
                let a = if x.bits < 0 { pi - a } else { a };

                if y.bits < 0 {
                    -a
                } else {
                    a
                }
            }

            /// Base 2 logarithm. Returns `None` for non-positive numbers.
            pub fn log2(self) -> Option<Self> {
                if self.bits <= 0 {
                    return None;
                }
                let msb = (<$bits_type>::BITS - 1 - self.bits.leading_zeros()) as i32;
                let exponent = msb - F::BITS as i32;
                // Mantissa in [1, 2).
                let m = if exponent >= 0 {
                    Self::from_raw(self.bits >> exponent)
                } else {
                    Self::from_raw(self.bits << -exponent)
                };
                let f = m - Self::one();
                // log2(1 + f) on [0, 1).
                let mut r = Self::const_f64(-0.0251903);
                r = Self::const_f64(0.1064373) + r.mul_sat(f);
                r = Self::const_f64(-0.2250487) + r.mul_sat(f);
                r = Self::const_f64(0.3920132) + r.mul_sat(f);
                r = Self::const_f64(-0.7129737) + r.mul_sat(f);
                r = Self::const_f64(1.4425449) + r.mul_sat(f);
                let frac = r.mul_sat(f);

                let int = <$wide_type>::from(exponent as i32) << F::BITS;
                Self::narrow(int + <$wide_type>::from(frac.bits))
            }

            /// Base 2 exponential. Returns `None` if the result does not fit.
            pub fn exp2(self) -> Option<Self> {
                let n = self.floor_to_int();
                let f = Self::from_raw(self.fract_raw());
                // 2^f on [0, 1).
                let mut r = Self::const_f64(0.0013333558);
                r = Self::const_f64(0.0096181291) + r.mul_sat(f);
                r = Self::const_f64(0.0555041087) + r.mul_sat(f);
                r = Self::const_f64(0.2402265070) + r.mul_sat(f);
                r = Self::const_f64(0.6931471806) + r.mul_sat(f);
                r = Self::one() + r.mul_sat(f);

                let v = <$wide_type>::from(r.bits);
                let total_bits = <$bits_type>::BITS as $bits_type;
                if n >= 0 {
                    if n >= total_bits - 1 {
                        return None;
                    }
                    Self::narrow(v << n)
                } else if -n >= total_bits {
                    Some(Self::zero())
                } else {
                    Some(Self::from_raw((v >> -n) as $bits_type))
                }
            }

            /// Returns the same number with a different fractional precision.
            #[inline]
            pub fn to_fixed<NewF: FractionalBits>(self) -> $name<NewF> {
                if F::BITS == NewF::BITS {
                    $name::from_raw(self.bits)
                } else if F::BITS < NewF::BITS {
                    $name::from_raw(self.bits << (NewF::BITS - F::BITS))
                } else {
                    $name::from_raw(self.bits >> (F::BITS - NewF::BITS))
                }
            }
        }

        impl<F> Copy for $name<F> {}

        impl<F> Clone for $name<F> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<F> PartialEq for $name<F> {
            #[inline]
            fn eq(&self, other: &Self) -> bool {
                self.bits == other.bits
            }
        }

        impl<F> Eq for $name<F> {}

        impl<F: FractionalBits> fmt::Debug for $name<F> {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                self.to_f64().fmt(f)
            }
        }

        impl<F: FractionalBits> fmt::Display for $name<F> {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                fmt::Display::fmt(&self.to_f64(), f)
            }
        }

        impl<F> hash::Hash for $name<F> {
            fn hash<H: hash::Hasher>(&self, h: &mut H) {
                self.bits.hash(h);
            }
        }

        impl<F> PartialOrd for $name<F> {
            #[inline]
            fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl<F> Ord for $name<F> {
            #[inline]
            fn cmp(&self, other: &Self) -> cmp::Ordering {
                self.bits.cmp(&other.bits)
            }
        }

        impl<F: FractionalBits> ops::Add<$name<F>> for $name<F> {
            type Output = Self;
            #[inline]
            fn add(self, other: Self) -> Self {
                $name::from_raw(self.bits + other.bits)
            }
        }

        impl<F: FractionalBits> ops::Sub<$name<F>> for $name<F> {
            type Output = Self;
            #[inline]
            fn sub(self, other: Self) -> Self {
                $name::from_raw(self.bits - other.bits)
            }
        }

        impl<F: FractionalBits> ops::Mul<$name<F>> for $name<F> {
            type Output = Self;
            #[inline]
            #[allow(clippy::suspicious_arithmetic_impl)]
            fn mul(self, other: Self) -> Self {
                let n = <$wide_type>::from(self.bits) * <$wide_type>::from(other.bits);
                $name::from_raw(Self::shift_round(n) as $bits_type)
            }
        }

        impl<F: FractionalBits> ops::Div<$name<F>> for $name<F> {
            type Output = Self;
            #[inline]
            #[allow(clippy::suspicious_arithmetic_impl)]
            fn div(self, other: Self) -> Self {
                let n = <$wide_type>::from(self.bits) << F::BITS;
                let q: $wide_type = rounded_div!(n, <$wide_type>::from(other.bits));
                $name::from_raw(q as $bits_type)
            }
        }

        impl<F: FractionalBits> ops::Neg for $name<F> {
            type Output = Self;
            #[inline]
            fn neg(self) -> Self {
                $name::from_raw(-self.bits)
            }
        }

        impl<F: FractionalBits> ops::Mul<$bits_type> for $name<F> {
            type Output = $name<F>;
            #[inline]
            fn mul(self, other: $bits_type) -> Self {
                $name::from_raw(self.bits * other)
            }
        }

        impl<F: FractionalBits> ops::Div<$bits_type> for $name<F> {
            type Output = $name<F>;
            #[inline]
            fn div(self, other: $bits_type) -> Self {
                $name::from_raw(self.bits / other)
            }
        }

        impl<F: FractionalBits> ops::AddAssign<$name<F>> for $name<F> {
            #[inline]
            fn add_assign(&mut self, other: Self) {
                self.bits += other.bits;
            }
        }

        impl<F: FractionalBits> ops::SubAssign<$name<F>> for $name<F> {
            #[inline]
            fn sub_assign(&mut self, other: Self) {
                self.bits -= other.bits;
            }
        }
    };
}

impl_fixed_point!(Fp32: i32, i64, u64);

impl_fixed_point!(Fp64: i64, i128, u128);

impl<F: FractionalBits> Fp32<F> {
    #[inline]
    pub fn from_i32(val: i32) -> Self {
        Fp32::from_raw(val << F::BITS)
    }

    /// Casts into a 64 bits fixed point number.
    #[inline]
    pub fn to_fp64<NewF: FractionalBits>(self) -> Fp64<NewF> {
        let tmp: Fp64<F> = Fp64::from_raw(i64::from(self.bits));
        tmp.to_fixed()
    }
}

impl<F: FractionalBits> Fp64<F> {
    #[inline]
    pub fn from_i64(val: i64) -> Self {
        Fp64::from_raw(val << F::BITS)
    }

    /// Casts into a 32 bits fixed point number, or `None` if it does not fit.
    pub fn to_fp32<NewF: FractionalBits>(self) -> Option<Fp32<NewF>> {
        let tmp = self.to_fixed::<NewF>();
        if tmp.bits < i32::MIN as i64 || tmp.bits > i32::MAX as i64 {
            return None;
        }

        Some(Fp32::from_raw(tmp.bits as i32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Fp = Fp32<_16>;

    fn fixed(v: f64) -> Fp {
        Fp::from_f64(v)
    }

    fn assert_approx(actual: Fp, expected: f64, tolerance: f64) {
        assert!(
            (actual.to_f64() - expected).abs() <= tolerance,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn basic_arithmetic() {
        let zero = fixed(0.0);
        let one = fixed(1.0);
        let minus_one = fixed(-1.0);
        let ten = fixed(10.0);
        let a = fixed(1.5);

        assert_eq!(Fp::from_i32(1), one);
        assert_eq!(Fp::one(), one);
        assert_eq!(Fp::from_i32(-1), minus_one);
        assert_eq!(Fp::from_i32(0), zero);
        assert_eq!(a * ten, fixed(15.0));
        assert_eq!(fixed(0.5) / fixed(2.0), fixed(0.25));
        assert_eq!(fixed(-0.5) / fixed(-2.0), fixed(0.25));
        assert_eq!(fixed(-0.5) / fixed(2.0), fixed(-0.25));
        assert_eq!(fixed(-0.5) * fixed(2.0), minus_one);
        assert_eq!(-one, minus_one);
        assert_eq!(one.sign(), 1);
        assert_eq!(minus_one.sign(), -1);
        assert_eq!(zero.sign(), 0);
        assert_eq!(one.to_fixed::<_8>().floor_to_int(), 1);
    }

    #[test]
    fn rounding() {
        assert_eq!(fixed(2.5).round_to_int(), 3);
        assert_eq!(fixed(-2.5).round_to_int(), -3);
        assert_eq!(fixed(2.49).round_to_int(), 2);
        assert_eq!(fixed(-1.25).floor_to_int(), -2);
        assert_eq!(fixed(-1.25).ceil_to_int(), -1);
        assert_eq!(fixed(1.25).ceil_to_int(), 2);
        assert_eq!(fixed(3.0).ceil_to_int(), 3);
        assert_eq!(fixed(1.25).fract_raw(), 1 << 14);
    }

    #[test]
    fn wide_mul_div() {
        // 30000 * 30000 overflows a 16.16 number but the quotient does not.
        let big = fixed(30000.0);
        assert_eq!(big.checked_mul(big), None);
        assert_eq!(big.mul_div(big, fixed(60000.0 / 4.0)), None);
        assert_eq!(big.mul_div(big, fixed(30000.0)), Some(big));
        assert_eq!(big.mul_div(fixed(3.0), fixed(6.0)), Some(fixed(15000.0)));
        assert_eq!(one_third().mul_div(fixed(3.0), fixed(1.0)).map(|v| v.round_to_int()), Some(1));
        assert_eq!(big.mul_div(big, Fp::zero()), None);
        assert_eq!(Fp::checked_from_f64(1e10), None);
        assert_eq!(Fp::checked_from_f32(f32::NAN), None);

        let a: Fp64<_24> = Fp64::from_f64(4000000.0);
        let b: Fp64<_24> = Fp64::from_f64(3.0);
        assert_eq!(a.mul_div(a, a), Some(a));
        assert_eq!(a.mul_div(b, b), Some(a));
    }

    fn one_third() -> Fp {
        fixed(1.0) / fixed(3.0)
    }

    #[test]
    fn square_root() {
        for &v in &[0.0, 0.25, 1.0, 2.0, 9.0, 1000.0, 30000.0] {
            assert_approx(fixed(v).sqrt(), v.sqrt(), 2.0 / 65536.0);
        }
        assert_eq!(fixed(-4.0).sqrt(), Fp::zero());

        let big: Fp64<_24> = Fp64::from_f64(1.0e9);
        assert!((big.sqrt().to_f64() - 1.0e9f64.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn trigonometry() {
        let mut a = -10.0;
        while a < 10.0 {
            assert_approx(fixed(a).sin(), a.sin(), 2e-4);
            assert_approx(fixed(a).cos(), a.cos(), 2e-4);
            a += 0.37;
        }

        let samples = [(1.0, 1.0), (1.0, -1.0), (-1.0, 1.0), (-1.0, -1.0), (0.5, 3.0), (-3.0, 0.2), (0.0, -2.0), (2.0, 0.0)];
        for &(y, x) in &samples {
            let y: f64 = y;
            assert_approx(fixed(y).atan2(fixed(x)), y.atan2(x), 2e-4);
        }
        assert_eq!(Fp::zero().atan2(Fp::zero()), Fp::zero());
    }

    #[test]
    fn logarithm_and_exponential() {
        for &v in &[0.125, 0.7, 1.0, 1.5, 2.0, 10.0, 1000.0] {
            let v: f64 = v;
            assert_approx(fixed(v).log2().unwrap(), v.log2(), 3e-4);
        }
        assert_eq!(fixed(0.0).log2(), None);
        assert_eq!(fixed(-1.0).log2(), None);

        for &v in &[-3.0, -0.5, 0.0, 0.3, 1.0, 4.75, 10.0] {
            let v: f64 = v;
            let expected = v.exp2();
            assert_approx(fixed(v).exp2().unwrap(), expected, expected * 3e-4 + 2.0 / 65536.0);
        }
        assert_eq!(fixed(20.0).exp2(), None);
    }
}

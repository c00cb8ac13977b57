#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::excessive_precision)]
#![allow(clippy::many_single_char_names)]
#![no_std]

//! Scalar types and 2D geometric primitives on top of euclid.
//!
//! This crate is reexported in [kestrel](../kestrel/index.html).
//!
//! # Overview.
//!
//! This crate implements the maths that the path, tessellation and rasterization
//! crates are built upon:
//!
//! - the [`Scalar`] trait implemented for `f32` and `f64`, and double-width helpers
//!   in [`utils`] used for robust geometric predicates,
//! - fixed point numbers with transcendental approximations in [`fixed`],
//! - lines and line segments with endpoint-aware intersection tests,
//! - quadratic and cubic bézier curves and their flattening,
//! - SVG-style elliptic arcs converted to cubic bézier curves.
//!
//! # Flattening
//!
//! Flattening is the action of approximating a curve with a succession of line segments.
//! The `flatness` threshold taken as input by the flattening algorithms corresponds
//! to the maximum distance between the curve and its linear approximation.
//! The smaller the flatness is, the more precise the approximation and the more segments
//! are generated.
//!
//! Two strategies are provided (see [`FlatteningMode`]): recursive subdivision driven by
//! an explicit worklist of bounded depth, and parametric stepping which computes the
//! number of steps up front.

#[cfg(any(test, feature = "std"))]
extern crate std;

// Reexport dependencies.
pub use arrayvec;
pub use euclid;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod arc;
pub mod cubic_bezier;
pub mod fixed;
mod flatten;
mod line;
pub mod quadratic_bezier;
pub mod utils;

#[doc(inline)]
pub use crate::arc::{Arc, ArcFlags, SvgArc};
#[doc(inline)]
pub use crate::cubic_bezier::CubicBezierSegment;
#[doc(inline)]
pub use crate::flatten::{FlatteningMode, MAX_FLATTENING_DEPTH, MAX_PARAMETRIC_STEPS};
#[doc(inline)]
pub use crate::line::{LineSegment, SegmentIntersection};
#[doc(inline)]
pub use crate::quadratic_bezier::QuadraticBezierSegment;

pub use crate::scalar::Scalar;

mod scalar {
    pub(crate) use num_traits::{Float, FloatConst, NumCast};

    use core::fmt::{Debug, Display};
    use core::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

    pub trait Scalar:
        Float
        + NumCast
        + FloatConst
        + Sized
        + Display
        + Debug
        + AddAssign
        + SubAssign
        + MulAssign
        + DivAssign
    {
        const HALF: Self;
        const ZERO: Self;
        const ONE: Self;
        const TWO: Self;
        const THREE: Self;
        const FOUR: Self;
        const SIX: Self;
        const EIGHT: Self;

        const MIN: Self;
        const MAX: Self;

        /// Tolerance under which two values are considered equal by the path algorithms.
        const EPSILON: Self;

        /// A value larger than any coordinate handled by the algorithms.
        ///
        /// Used to seed bounding boxes and as the "no limit" value for unconstrained
        /// geometry. Unlike `MAX`, it can be added to or subtracted from a coordinate
        /// without overflowing.
        const UNBOUNDED: Self;

        fn value(v: f32) -> Self;
    }

    impl Scalar for f32 {
        const HALF: Self = 0.5;
        const ZERO: Self = 0.0;
        const ONE: Self = 1.0;
        const TWO: Self = 2.0;
        const THREE: Self = 3.0;
        const FOUR: Self = 4.0;
        const SIX: Self = 6.0;
        const EIGHT: Self = 8.0;

        const MIN: Self = f32::MIN;
        const MAX: Self = f32::MAX;

        const EPSILON: Self = 1e-4;
        const UNBOUNDED: Self = 1e30;

        #[inline]
        fn value(v: f32) -> Self {
            v
        }
    }

    impl Scalar for f64 {
        const HALF: Self = 0.5;
        const ZERO: Self = 0.0;
        const ONE: Self = 1.0;
        const TWO: Self = 2.0;
        const THREE: Self = 3.0;
        const FOUR: Self = 4.0;
        const SIX: Self = 6.0;
        const EIGHT: Self = 8.0;

        const MIN: Self = f64::MIN;
        const MAX: Self = f64::MAX;

        const EPSILON: Self = 1e-8;
        const UNBOUNDED: Self = 1e30;

        #[inline]
        fn value(v: f32) -> Self {
            v as f64
        }
    }
}

/// Alias for `euclid::default::Point2D`.
pub use euclid::default::Point2D as Point;

/// Alias for `euclid::default::Vector2D`.
pub use euclid::default::Vector2D as Vector;

/// Alias for `euclid::default::Size2D`.
pub use euclid::default::Size2D as Size;

/// Alias for `euclid::default::Box2D`
pub use euclid::default::Box2D;

/// Alias for `euclid::default::Transform2D`
pub type Transform<S> = euclid::default::Transform2D<S>;

/// An angle in radians.
pub use euclid::Angle;

/// Shorthand for `Vector::new(x, y)`.
#[inline]
pub fn vector<S>(x: S, y: S) -> Vector<S> {
    Vector::new(x, y)
}

/// Shorthand for `Point::new(x, y)`.
#[inline]
pub fn point<S>(x: S, y: S) -> Point<S> {
    Point::new(x, y)
}

/// Shorthand for `Size::new(x, y)`.
#[inline]
pub fn size<S>(w: S, h: S) -> Size<S> {
    Size::new(w, h)
}

/// Single precision aliases used by the path, tessellation and raster crates.
pub mod math {
    pub use crate::{point, size, vector};

    pub type Point = euclid::default::Point2D<f32>;
    pub type Vector = euclid::default::Vector2D<f32>;
    pub type Size = euclid::default::Size2D<f32>;
    pub type Box2D = euclid::default::Box2D<f32>;
    pub type Transform = euclid::default::Transform2D<f32>;
    pub type Angle = euclid::Angle<f32>;
}

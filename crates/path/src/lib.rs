#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::match_like_matches_macro)]
#![allow(clippy::too_many_arguments)]
#![no_std]

//! Flattened 2D paths: storage, stroking, dashing, hit testing and classification.
//!
//! This crate is reexported in [kestrel](../kestrel/index.html).
//!
//! A [`Path`] is a polyline made of line segments sharing their endpoints. Curves and
//! arcs are flattened as they are appended. Each segment carries a few flags: a *warp*
//! repositions the pen between sub-paths, an *invisible* segment takes part in fills
//! but is not stroked, and a *close* segment ends a sub-path.
//!
//! # Examples
//!
//! ```
//! use kestrel_path::Path;
//! use kestrel_path::math::point;
//!
//! let mut path = Path::new();
//! path.move_to(point(0.0, 0.0)).unwrap();
//! path.line_to(point(10.0, 0.0)).unwrap();
//! path.quadratic_bezier_to(point(10.0, 10.0), point(0.0, 10.0), 0.25).unwrap();
//! path.close(true).unwrap();
//!
//! assert!(path.is_closed());
//! assert!(path.is_point_inside(point(5.0, 5.0), kestrel_path::FillRule::NonZero));
//! ```
//!
//! # Stroking and dashing
//!
//! Strokes are not rendered directly: [`Path::create_outline`] builds a new path
//! covering the stroked area, using the [`StrokeStyle`] stored on the source path,
//! and [`Path::create_dash`] splits a path into dashes. Both results can then be
//! filled like any other path.

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub use kestrel_geom as geom;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

mod category;
mod constrain;
mod dash;
mod error;
mod hit_test;
mod outline;
mod path;
pub mod self_intersect;
mod style;
pub mod sweep;

#[cfg(test)]
mod path_tests;

#[doc(inline)]
pub use crate::category::Category;
#[doc(inline)]
pub use crate::error::{PathError, PathResult};
pub use crate::geom::{ArcFlags, FlatteningMode};
#[doc(inline)]
pub use crate::outline::line_intersection;
#[doc(inline)]
pub use crate::path::{LineFlags, Path, Primitive, SubPaths};
#[doc(inline)]
pub use crate::self_intersect::SelfIntersect;
#[doc(inline)]
pub use crate::style::{FillRule, LineCap, LineJoin, StrokeStyle};

pub use crate::geom::math;

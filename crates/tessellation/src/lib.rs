#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::float_cmp)]
#![allow(clippy::too_many_arguments)]
#![no_std]

//! Triangulation of flattened 2D paths.
//!
//! This crate is reexported in [kestrel](../kestrel/index.html).
//!
//! ## Overview
//!
//! The [`Triangulator`] turns the fill of a [`Path`](path::Path) into a list of
//! triangles indexing a list of vertices. It accepts:
//!
//! * convex paths, triangulated as a fan from their first vertex,
//! * simple polygons, decomposed into x-monotone pieces and triangulated piece by piece,
//! * paths made of several non-overlapping sub-paths, including holes, which are first
//!   connected into a single polygon with
//!   [`try_to_make_multiple_sub_paths_simple`].
//!
//! Self-intersecting paths are rejected with [`TriangulationError::InvalidInput`].
//!
//! Triangles are counter-clockwise with y pointing up, which is clockwise on screen
//! when y points down.
//!
//! ## Examples
//!
//! ```
//! use kestrel_tessellation::{Triangulator, TriangulatorOptions};
//! use kestrel_tessellation::path::Path;
//! use kestrel_tessellation::math::point;
//!
//! let mut path = Path::new();
//! path.move_to(point(0.0, 0.0)).unwrap();
//! path.line_to(point(100.0, 0.0)).unwrap();
//! path.line_to(point(100.0, 100.0)).unwrap();
//! path.line_to(point(0.0, 100.0)).unwrap();
//! path.close(true).unwrap();
//!
//! let mut triangulator = Triangulator::with_options(TriangulatorOptions::DEFAULT);
//! let triangulation = triangulator.triangulate(&path).unwrap();
//!
//! assert_eq!(triangulation.vertices.len(), 4);
//! assert_eq!(triangulation.indices.len(), 6);
//! ```

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub use kestrel_path as path;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

mod error;
mod merge;
mod monotone;
mod triangulator;

#[cfg(test)]
mod triangulator_tests;

pub use crate::path::geom;
pub use crate::path::math;

#[doc(inline)]
pub use crate::error::*;

#[doc(inline)]
pub use crate::merge::try_to_make_multiple_sub_paths_simple;

#[doc(inline)]
pub use crate::triangulator::{Triangulation, Triangulator, TriangulatorOptions};

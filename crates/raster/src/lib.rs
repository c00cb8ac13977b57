#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::too_many_arguments)]
#![no_std]

//! Anti-aliased scanline rasterization of flattened paths.
//!
//! This crate is reexported in [kestrel](../kestrel/index.html).
//!
//! The [`Rasterizer`] sweeps a [`Path`](path::Path) from top to bottom and produces,
//! row by row, [`Span`]s of coverage: either a run of pixels sharing one alpha value or
//! a run with a per-pixel mask. Spans are handed to a [`SpanSink`] in batches.
//!
//! Each pixel row is sampled on `quality` evenly spaced sub-rows. Horizontally, the
//! coverage is exact up to 1/256th of a pixel.
//!
//! # Examples
//!
//! ```
//! use kestrel_raster::{Coverage, Rasterizer, SpanBuffer};
//! use kestrel_raster::path::Path;
//! use kestrel_raster::math::point;
//!
//! let mut path = Path::new();
//! path.move_to(point(2.0, 2.0)).unwrap();
//! path.line_to(point(8.0, 2.0)).unwrap();
//! path.line_to(point(8.0, 8.0)).unwrap();
//! path.line_to(point(2.0, 8.0)).unwrap();
//! path.close(true).unwrap();
//!
//! let mut rasterizer = Rasterizer::new(16, 16).unwrap();
//! let mut spans = SpanBuffer::new();
//! rasterizer.rasterize(&path, &mut spans).unwrap();
//!
//! assert_eq!(spans.len(), 6);
//! assert_eq!(spans.coverage_at(4, 4), 255);
//! ```

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub use kestrel_path as path;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

mod error;
mod rasterizer;
mod span;

#[cfg(test)]
mod rasterizer_tests;

pub use crate::path::math;

#[doc(inline)]
pub use crate::error::{RasterError, RasterResult};
#[doc(inline)]
pub use crate::rasterizer::{RasterOptions, Rasterizer, MAX_COORDINATE, MAX_QUALITY};
#[doc(inline)]
pub use crate::span::{Coverage, OwnedCoverage, OwnedSpan, Span, SpanBuffer, SpanSink, MAX_SPAN_BATCH};
pub use crate::path::FillRule;

#![deny(bare_trait_objects)]
#![no_std]

//! 2D vector path geometry and rasterization.
//!
//! # Crates
//!
//! This meta-crate (`kestrel`) reexports the following sub-crates for convenience:
//!
//! * `kestrel_geom` as [`geom`]: scalars, fixed point numbers, segments and curve flattening.
//! * `kestrel_path` as [`path`]: path storage, stroking, dashing, hit testing, classification
//!   and self-intersection tests.
//! * `kestrel_tessellation` as [`tessellation`]: triangulation of simple paths.
//! * `kestrel_raster` as [`raster`]: anti-aliased coverage spans.
//!
//! # Feature flags
//!
//! serialization using serde can be enabled on each crate using the
//! `serialization` feature flag (disabled by default).
//!
//! The crates are `no_std` compatible when the default `std` feature is disabled.
//!
//! # Examples
//!
//! ```
//! use kestrel::math::point;
//! use kestrel::path::{Path, SelfIntersect};
//! use kestrel::raster::{Rasterizer, SpanBuffer};
//! use kestrel::tessellation::Triangulator;
//!
//! let mut path = Path::new();
//! path.move_to(point(10.0, 10.0)).unwrap();
//! path.line_to(point(50.0, 10.0)).unwrap();
//! path.cubic_bezier_to(point(60.0, 20.0), point(60.0, 40.0), point(50.0, 50.0), 0.25).unwrap();
//! path.line_to(point(10.0, 50.0)).unwrap();
//! path.close(true).unwrap();
//!
//! assert!(!SelfIntersect::new(&path).unwrap().is_self_intersecting().unwrap());
//!
//! let triangulation = Triangulator::new().triangulate(&path).unwrap();
//! assert_eq!(triangulation.num_triangles(), triangulation.vertices.len() - 2);
//!
//! let mut rasterizer = Rasterizer::new(64, 64).unwrap();
//! let mut spans = SpanBuffer::new();
//! rasterizer.rasterize(&path, &mut spans).unwrap();
//! assert_eq!(spans.coverage_at(30, 30), 255);
//! ```
//!
//! ## Strokes
//!
//! Strokes are filled like any other path once their outline is built:
//!
//! ```
//! use kestrel::math::point;
//! use kestrel::path::{LineCap, Path, StrokeStyle};
//! use kestrel::raster::{Rasterizer, SpanBuffer};
//!
//! let mut path = Path::new();
//! path.set_style(StrokeStyle::DEFAULT.with_line_width(4.0).with_line_cap(LineCap::Square));
//! path.move_to(point(8.0, 16.0)).unwrap();
//! path.line_to(point(24.0, 16.0)).unwrap();
//!
//! let mut outline = Path::new();
//! path.create_outline(&mut outline, 0.25, 0).unwrap();
//!
//! let mut rasterizer = Rasterizer::new(32, 32).unwrap();
//! let mut spans = SpanBuffer::new();
//! rasterizer.rasterize(&outline, &mut spans).unwrap();
//! assert_eq!(spans.coverage_at(16, 15), 255);
//! assert_eq!(spans.coverage_at(16, 20), 0);
//! ```

pub extern crate kestrel_raster;
pub extern crate kestrel_tessellation;

pub use kestrel_raster as raster;
pub use kestrel_tessellation as tessellation;
pub use tessellation::geom;
pub use tessellation::path;

pub use path::math;

//! Scanline rasterizer.
//!
//! Every non-horizontal segment of the path becomes an edge. Edges wait in a sleeping
//! list indexed by the first sub-row they cross and join the active list when the sweep
//! reaches it. On each sub-row, every active edge adds its signed contribution to the
//! pixel column it crosses:
//!
//! * `cover` receives the full contribution and affects every pixel on its right,
//! * `area` removes the part of the contribution that falls on the left of the edge,
//!   inside the crossed pixel.
//!
//! Once all the sub-rows of a pixel row are done, the prefix sum of `cover` plus `area`
//! gives the signed coverage of each pixel, which the fill rule turns into alpha.
//!
//! Horizontal positions are in 24.8 fixed point, like the cells of AGG-style
//! rasterizers.

use crate::error::{RasterError, RasterResult};
use crate::path::geom::arrayvec::ArrayVec;
use crate::path::geom::fixed::{Fp64, _24};
use crate::path::geom::Box2D;
use crate::path::math::Point;
use crate::path::{FillRule, Path};
use crate::span::{Coverage, Span, SpanSink, MAX_SPAN_BATCH};

use alloc::vec::Vec;

macro_rules! raster_log {
    ($obj:ident, $fmt:expr) => (
        if $obj.log {
            log::trace!($fmt);
        }
    );
    ($obj:ident, $fmt:expr, $($arg:tt)*) => (
        if $obj.log {
            log::trace!($fmt, $($arg)*);
        }
    );
}

/// Path coordinates must be within `[-MAX_COORDINATE, MAX_COORDINATE]`.
pub const MAX_COORDINATE: f32 = (1 << 22) as f32;

/// Highest number of sub-rows per pixel row.
pub const MAX_QUALITY: u32 = 16;

const SUBPIXEL_SHIFT: u32 = 8;
const SUBPIXEL_SCALE: i32 = 1 << SUBPIXEL_SHIFT;
const SUBPIXEL_MASK: i32 = SUBPIXEL_SCALE - 1;

// Runs of identical alpha at least this long become uniform spans.
const MIN_UNIFORM_RUN: usize = 4;

const NONE: u32 = u32::MAX;

/// Parameters for the rasterizer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct RasterOptions {
    /// Number of sub-rows sampled per pixel row. A power of two between 1 and
    /// [`MAX_QUALITY`].
    ///
    /// Default value: `RasterOptions::DEFAULT_QUALITY`.
    pub quality: u32,

    /// Default value: `FillRule::NonZero`.
    pub fill_rule: FillRule,
}

impl RasterOptions {
    pub const DEFAULT_QUALITY: u32 = 4;
    pub const DEFAULT_FILL_RULE: FillRule = FillRule::NonZero;

    pub const DEFAULT: Self = RasterOptions {
        quality: Self::DEFAULT_QUALITY,
        fill_rule: Self::DEFAULT_FILL_RULE,
    };

    #[inline]
    pub const fn with_quality(mut self, quality: u32) -> Self {
        self.quality = quality;
        self
    }

    #[inline]
    pub const fn with_fill_rule(mut self, fill_rule: FillRule) -> Self {
        self.fill_rule = fill_rule;
        self
    }

    #[inline]
    pub const fn even_odd() -> Self {
        Self::DEFAULT.with_fill_rule(FillRule::EvenOdd)
    }

    #[inline]
    pub const fn non_zero() -> Self {
        Self::DEFAULT.with_fill_rule(FillRule::NonZero)
    }

    fn validate(&self) -> RasterResult<()> {
        if !self.quality.is_power_of_two() || self.quality > MAX_QUALITY {
            return Err(RasterError::InvalidArgument("quality must be a power of two between 1 and 16"));
        }

        Ok(())
    }
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Copy, Clone, Debug)]
struct Edge {
    // Horizontal position at the current sub-row.
    x: Fp64<_24>,
    // Horizontal increment from one sub-row to the next.
    step: Fp64<_24>,
    // Number of sub-rows left.
    remaining: u32,
    winding: i32,
    next: u32,
}

/// Rasterizes paths into coverage spans within a `width` x `height` pixel area.
pub struct Rasterizer {
    width: u32,
    height: u32,
    options: RasterOptions,
    region: Box2D<i32>,
    log: bool,

    edges: Vec<Edge>,
    // First sleeping edge of each sub-row of the region.
    sleeping: Vec<u32>,
    active: Vec<u32>,
    cover: Vec<i32>,
    area: Vec<i32>,
    alpha: Vec<u8>,
}

impl Rasterizer {
    /// Creates a rasterizer and allocates its accumulation buffers.
    pub fn new(width: u32, height: u32) -> RasterResult<Self> {
        if width as f32 > MAX_COORDINATE || height as f32 > MAX_COORDINATE {
            return Err(RasterError::LimitExceeded);
        }

        #[cfg(all(debug_assertions, feature = "std"))]
        let log = std::env::var("KESTREL_FORCE_LOGGING").is_ok();
        #[cfg(not(all(debug_assertions, feature = "std")))]
        let log = false;

        let columns = width as usize + 1;
        let mut cover = Vec::new();
        cover.try_reserve_exact(columns)?;
        cover.resize(columns, 0);
        let mut area = Vec::new();
        area.try_reserve_exact(columns)?;
        area.resize(columns, 0);
        let mut alpha = Vec::new();
        alpha.try_reserve_exact(columns)?;
        alpha.resize(columns, 0);
        let mut sleeping = Vec::new();
        sleeping.try_reserve_exact(height as usize * MAX_QUALITY as usize)?;

        Ok(Rasterizer {
            width,
            height,
            options: RasterOptions::DEFAULT,
            region: Box2D::new((0, 0).into(), (width as i32, height as i32).into()),
            log,
            edges: Vec::new(),
            sleeping,
            active: Vec::new(),
            cover,
            area,
            alpha,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn options(&self) -> &RasterOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: RasterOptions) -> RasterResult<()> {
        options.validate()?;
        self.options = options;

        Ok(())
    }

    /// Sets the number of sub-rows sampled per pixel row.
    ///
    /// Fails with `InvalidArgument` unless `quality` is a power of two between 1 and
    /// [`MAX_QUALITY`].
    pub fn set_quality(&mut self, quality: u32) -> RasterResult<()> {
        self.set_options(self.options.with_quality(quality))
    }

    pub fn set_fill_rule(&mut self, fill_rule: FillRule) {
        self.options.fill_rule = fill_rule;
    }

    /// Restricts the output to the pixels within `region`.
    ///
    /// The region is clipped to the size of the rasterizer.
    pub fn set_region(&mut self, region: Box2D<i32>) {
        let bounds = Box2D::new((0, 0).into(), (self.width as i32, self.height as i32).into());
        self.region = region.intersection_unchecked(&bounds);
    }

    pub fn region(&self) -> Box2D<i32> {
        self.region
    }

    /// Enable/disable some verbose logging during rasterization.
    pub fn set_logging(&mut self, is_enabled: bool) {
        self.log = is_enabled;
    }

    /// Rasterizes the fill of a path.
    ///
    /// Every sub-path is implicitly closed. Spans are delivered to `sink` row by row,
    /// from top to bottom.
    pub fn rasterize(&mut self, path: &Path, sink: &mut dyn SpanSink) -> RasterResult<()> {
        if self.region.is_empty() {
            return Ok(());
        }

        let quality = self.options.quality;
        let top = self.region.min.y;
        let rows = (self.region.max.y - top) as usize;
        let samples = rows * quality as usize;

        self.sleeping.clear();
        self.sleeping.resize(samples, NONE);
        self.edges.clear();
        self.active.clear();

        for range in path.sub_paths() {
            let first = path.line(range.start).from;
            let last = path.line(range.end - 1).to;
            for i in range {
                let line = path.line(i);
                self.add_edge(line.from, line.to)?;
            }
            if first != last {
                self.add_edge(last, first)?;
            }
        }

        raster_log!(self, "{} edges, quality {}, region {:?}", self.edges.len(), quality, self.region);

        if self.edges.is_empty() {
            return Ok(());
        }

        let weight = SUBPIXEL_SCALE / quality as i32;
        let columns = (self.region.max.x - self.region.min.x) as usize;
        for row in 0..rows {
            let mut touched = Touched::new();
            for s in 0..quality as usize {
                let mut e = self.sleeping[row * quality as usize + s];
                while e != NONE {
                    self.active.try_reserve(1)?;
                    self.active.push(e);
                    e = self.edges[e as usize].next;
                }

                if self.active.is_empty() {
                    continue;
                }

                let left = self.region.min.x;
                let edges = &mut self.edges;
                let cover = &mut self.cover;
                let area = &mut self.area;
                self.active.retain(|&e| {
                    let edge = &mut edges[e as usize];
                    accumulate(cover, area, &mut touched, edge.x, edge.winding * weight, left, columns);
                    edge.x = edge.x + edge.step;
                    edge.remaining -= 1;

                    edge.remaining > 0
                });
            }

            if let Some((first, last)) = touched.range() {
                self.emit_row(top as u32 + row as u32, first, last, columns, sink);
            }
        }

        Ok(())
    }

    fn add_edge(&mut self, from: Point, to: Point) -> RasterResult<()> {
        for v in &[from.x, from.y, to.x, to.y] {
            if !(*v >= -MAX_COORDINATE && *v <= MAX_COORDINATE) {
                return Err(RasterError::LimitExceeded);
            }
        }

        if from.y == to.y {
            return Ok(());
        }

        let (upper, lower, winding) = if from.y < to.y { (from, to, 1) } else { (to, from, -1) };

        // Sub-row k of pixel row r is sampled at y = r + (k + 0.5) / quality, and the
        // edge covers the samples in [upper.y, lower.y).
        let q = self.options.quality as f64;
        let region_start = self.region.min.y as i64 * q as i64;
        let region_end = self.region.max.y as i64 * q as i64;
        let mut start = ceil(upper.y as f64 * q - 0.5);
        let end = ceil(lower.y as f64 * q - 0.5).min(region_end);
        start = start.max(region_start);
        if start >= end {
            return Ok(());
        }

        let dx = lower.x as f64 - upper.x as f64;
        let dy = lower.y as f64 - upper.y as f64;
        let remaining = (end - start) as u32;

        // Nearly horizontal edges have a slope far outside of the fixed point range,
        // but they only cover a sub-row or two and never move by more than `dx`.
        let sample_y = (start as f64 + 0.5) / q;
        let t = ((sample_y - upper.y as f64) / dy).clamp(0.0, 1.0);
        let x = Fp64::<_24>::from_f64(upper.x as f64 + t * dx);
        let step = if remaining > 1 {
            let bound = if dx < 0.0 { -dx } else { dx };
            Fp64::<_24>::from_f64((dx / (dy * q)).clamp(-bound, bound))
        } else {
            Fp64::<_24>::zero()
        };

        let bucket = (start - region_start) as usize;
        let id = self.edges.len() as u32;
        self.edges.try_reserve(1)?;
        self.edges.push(Edge {
            x,
            step,
            remaining,
            winding,
            next: self.sleeping[bucket],
        });
        self.sleeping[bucket] = id;

        Ok(())
    }

    fn emit_row(&mut self, row: u32, first: usize, last: usize, columns: usize, sink: &mut dyn SpanSink) {
        let fill_rule = self.options.fill_rule;

        let mut acc = 0i32;
        for ix in first..=last {
            acc += self.cover[ix];
            self.alpha[ix] = to_alpha(acc + self.area[ix], fill_rule);
            self.cover[ix] = 0;
            self.area[ix] = 0;
        }

        // Past the last touched column the coverage stays constant, non-zero when the
        // path extends beyond the right side of the region.
        let mut end = last + 1;
        let tail = to_alpha(acc, fill_rule);
        if tail != 0 {
            for a in &mut self.alpha[end..columns] {
                *a = tail;
            }
            end = columns;
        }

        let left = self.region.min.x as u32;
        let alpha = &self.alpha[..end];
        let mut batch: ArrayVec<Span, MAX_SPAN_BATCH> = ArrayVec::new();
        let mut i = first;
        while i < end {
            let a = alpha[i];
            let run_end = run_end_from(alpha, i);
            if a == 0 {
                i = run_end;
                continue;
            }

            let span = if is_uniform(a, run_end - i) {
                let span = Span {
                    row,
                    x: left + i as u32,
                    len: (run_end - i) as u32,
                    coverage: Coverage::Opaque(a),
                };
                i = run_end;
                span
            } else {
                // Gather the following short runs into a mask.
                let start = i;
                while i < end && alpha[i] != 0 {
                    let next = run_end_from(alpha, i);
                    if is_uniform(alpha[i], next - i) && i != start {
                        break;
                    }
                    i = next;
                }
                Span {
                    row,
                    x: left + start as u32,
                    len: (i - start) as u32,
                    coverage: Coverage::Mask(&alpha[start..i]),
                }
            };

            if batch.is_full() {
                sink.spans(&batch);
                batch.clear();
            }
            batch.push(span);
        }

        if !batch.is_empty() {
            sink.spans(&batch);
        }
    }
}

#[inline]
fn run_end_from(alpha: &[u8], start: usize) -> usize {
    let a = alpha[start];
    let mut i = start + 1;
    while i < alpha.len() && alpha[i] == a {
        i += 1;
    }

    i
}

#[inline]
fn is_uniform(alpha: u8, len: usize) -> bool {
    alpha == 255 || len >= MIN_UNIFORM_RUN
}

// Range of pixel columns modified during a row.
struct Touched {
    first: usize,
    last: usize,
}

impl Touched {
    fn new() -> Self {
        Touched {
            first: usize::MAX,
            last: 0,
        }
    }

    #[inline]
    fn add(&mut self, ix: usize) {
        self.first = self.first.min(ix);
        self.last = self.last.max(ix);
    }

    fn range(&self) -> Option<(usize, usize)> {
        if self.first > self.last {
            return None;
        }

        Some((self.first, self.last))
    }
}

#[inline]
fn accumulate(
    cover: &mut [i32],
    area: &mut [i32],
    touched: &mut Touched,
    x: Fp64<_24>,
    weight: i32,
    left: i32,
    columns: usize,
) {
    // 24.8 relative to the left side of the region.
    let px = (x.raw() >> (24 - SUBPIXEL_SHIFT)) - ((left as i64) << SUBPIXEL_SHIFT);
    let (ix, fx) = if px < 0 {
        (0, 0)
    } else {
        ((px >> SUBPIXEL_SHIFT) as usize, (px as i32) & SUBPIXEL_MASK)
    };
    if ix >= columns {
        return;
    }

    cover[ix] += weight * SUBPIXEL_SCALE;
    area[ix] -= weight * fx;
    touched.add(ix);
}

// Coverage is 256 * 256 per unit of winding over a whole pixel.
#[inline]
fn to_alpha(coverage: i32, fill_rule: FillRule) -> u8 {
    let c = coverage.unsigned_abs() >> SUBPIXEL_SHIFT;
    let c = match fill_rule {
        FillRule::NonZero => c,
        FillRule::EvenOdd => {
            let c = c & 511;
            if c > 256 {
                512 - c
            } else {
                c
            }
        }
    };

    c.min(255) as u8
}

#[inline]
fn ceil(v: f64) -> i64 {
    let t = v as i64;
    if (t as f64) < v {
        t + 1
    } else {
        t
    }
}

#[test]
fn alpha_from_coverage() {
    let full = 256 * 256;
    assert_eq!(to_alpha(0, FillRule::NonZero), 0);
    assert_eq!(to_alpha(full, FillRule::NonZero), 255);
    assert_eq!(to_alpha(-full, FillRule::NonZero), 255);
    assert_eq!(to_alpha(2 * full, FillRule::NonZero), 255);
    assert_eq!(to_alpha(full / 2, FillRule::NonZero), 128);

    assert_eq!(to_alpha(full, FillRule::EvenOdd), 255);
    assert_eq!(to_alpha(2 * full, FillRule::EvenOdd), 0);
    assert_eq!(to_alpha(3 * full, FillRule::EvenOdd), 255);
    assert_eq!(to_alpha(full + full / 4, FillRule::EvenOdd), 192);
}

#[test]
fn fixed_point_ceil() {
    assert_eq!(ceil(1.0), 1);
    assert_eq!(ceil(1.5), 2);
    assert_eq!(ceil(-0.5), 0);
    assert_eq!(ceil(-1.5), -1);
}

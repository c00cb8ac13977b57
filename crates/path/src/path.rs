//! The `Path` data structure and the operations that append to it.

use crate::category::Category;
use crate::error::{PathError, PathResult};
use crate::geom::{ArcFlags, CubicBezierSegment, FlatteningMode, LineSegment, QuadraticBezierSegment, Scalar, SvgArc};
use crate::math::{point, Angle, Box2D, Point, Transform, Vector};
use crate::style::StrokeStyle;

use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::ops::{BitOr, BitOrAssign, Range};

#[cfg(not(feature = "std"))]
use num_traits::Float;

/// Per-segment attributes.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct LineFlags(u8);

impl LineFlags {
    pub const NONE: Self = LineFlags(0);
    /// The segment moves the pen to the start of another sub-path.
    pub const WARP: Self = LineFlags(1);
    /// The segment is part of the filled area but is not stroked.
    pub const NOT_VISIBLE: Self = LineFlags(2);
    /// The segment ends a sub-path.
    pub const CLOSE: Self = LineFlags(4);

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for LineFlags {
    type Output = Self;
    fn bitor(self, other: Self) -> Self {
        LineFlags(self.0 | other.0)
    }
}

impl BitOrAssign for LineFlags {
    fn bitor_assign(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl core::fmt::Debug for LineFlags {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut list = f.debug_set();
        if self.contains(LineFlags::WARP) {
            list.entry(&"WARP");
        }
        if self.contains(LineFlags::NOT_VISIBLE) {
            list.entry(&"NOT_VISIBLE");
        }
        if self.contains(LineFlags::CLOSE) {
            list.entry(&"CLOSE");
        }
        list.finish()
    }
}

/// Shapes that can be appended in one call with `Path::append_primitive`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Primitive {
    Rect(Box2D),
    /// A rectangle with elliptic corners, each approximated with two quadratic
    /// bézier curves.
    RoundedRect {
        rect: Box2D,
        radii: Vector,
        flatness: f32,
    },
}

/// A flattened path.
///
/// Segment `i` goes from point `i` to point `i + 1`, so consecutive segments always
/// share their endpoint. The bounding box, the segment lengths and the category are
/// computed lazily and cached until the next mutation.
#[derive(Clone, Debug)]
pub struct Path {
    points: Vec<Point>,
    flags: Vec<LineFlags>,
    started: bool,
    last_sub_path_start: usize,
    multiple_sub_paths: bool,
    style: StrokeStyle,
    flattening_mode: FlatteningMode,

    bbox: Cell<Option<Box2D>>,
    lengths: RefCell<Vec<f32>>,
    pub(crate) category: Cell<Option<Category>>,
    merge_failed: Cell<bool>,
}

impl Path {
    pub fn new() -> Self {
        Path {
            points: Vec::new(),
            flags: Vec::new(),
            started: false,
            last_sub_path_start: 0,
            multiple_sub_paths: false,
            style: StrokeStyle::DEFAULT,
            flattening_mode: FlatteningMode::DEFAULT,
            bbox: Cell::new(None),
            lengths: RefCell::new(Vec::new()),
            category: Cell::new(None),
            merge_failed: Cell::new(false),
        }
    }

    /// Creates an empty path with room for `num_lines` segments.
    pub fn with_capacity(num_lines: usize) -> PathResult<Self> {
        let mut path = Path::new();
        path.prepare(num_lines)?;

        Ok(path)
    }

    /// Removes all segments and reserves room for `num_lines` of them.
    ///
    /// The stroke style and flattening mode are kept.
    pub fn prepare(&mut self, num_lines: usize) -> PathResult<()> {
        self.clear();
        self.points.try_reserve(num_lines + 1)?;
        self.flags.try_reserve(num_lines)?;

        Ok(())
    }

    /// Removes all segments.
    pub fn clear(&mut self) {
        self.points.clear();
        self.flags.clear();
        self.started = false;
        self.last_sub_path_start = 0;
        self.multiple_sub_paths = false;
        self.invalidate();
    }

    /// Replaces the content of this path with a copy of `other`, including its style
    /// and cached data.
    pub fn copy_from(&mut self, other: &Path) -> PathResult<()> {
        let mut points = Vec::new();
        points.try_reserve(other.points.len())?;
        points.extend_from_slice(&other.points);
        let mut flags = Vec::new();
        flags.try_reserve(other.flags.len())?;
        flags.extend_from_slice(&other.flags);

        self.points = points;
        self.flags = flags;
        self.started = other.started;
        self.last_sub_path_start = other.last_sub_path_start;
        self.multiple_sub_paths = other.multiple_sub_paths;
        self.style = other.style;
        self.flattening_mode = other.flattening_mode;
        self.bbox.set(other.bbox.get());
        self.lengths.borrow_mut().clear();
        self.category.set(other.category.get());
        self.merge_failed.set(other.merge_failed.get());

        Ok(())
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: StrokeStyle) {
        self.style = style;
    }

    pub fn flattening_mode(&self) -> FlatteningMode {
        self.flattening_mode
    }

    pub fn set_flattening_mode(&mut self, mode: FlatteningMode) {
        self.flattening_mode = mode;
    }

    pub(crate) fn invalidate(&self) {
        self.bbox.set(None);
        self.lengths.borrow_mut().clear();
        self.category.set(None);
        self.merge_failed.set(false);
    }

    fn check_started(&self) -> PathResult<()> {
        if self.started {
            Ok(())
        } else {
            Err(PathError::InvalidState)
        }
    }

    fn push_line(&mut self, to: Point, flags: LineFlags) -> PathResult<()> {
        self.points.try_reserve(1)?;
        self.flags.try_reserve(1)?;
        self.points.push(to);
        self.flags.push(flags);
        self.invalidate();

        Ok(())
    }

    // Drops the segments appended after `num_lines`, used to undo a failed operation.
    fn truncate(&mut self, num_lines: usize) {
        self.points.truncate(num_lines + 1);
        self.flags.truncate(num_lines);
        self.invalidate();
    }

    /// Starts a new sub-path at `to`.
    ///
    /// The first call starts the path. Later calls close the current sub-path with an
    /// invisible segment and warp to `to`, which makes the path a multi sub-path one.
    /// Moving to the current position does nothing.
    pub fn move_to(&mut self, to: Point) -> PathResult<()> {
        if !self.started {
            self.points.try_reserve(1)?;
            self.points.push(to);
            self.started = true;
            self.invalidate();
            return Ok(());
        }

        if self.current_position() == Some(to) {
            return Ok(());
        }

        if self.flags.is_empty() {
            self.points[0] = to;
            self.invalidate();
            return Ok(());
        }

        let n = self.num_lines();
        if let Err(e) = self.close(false).and_then(|_| self.warp_to(to)) {
            self.truncate(n);
            return Err(e);
        }
        self.last_sub_path_start = self.num_lines();
        self.multiple_sub_paths = true;

        Ok(())
    }

    /// Appends a visible segment from the current position to `to`.
    pub fn line_to(&mut self, to: Point) -> PathResult<()> {
        self.check_started()?;
        if self.current_position() == Some(to) {
            return Ok(());
        }

        self.push_line(to, LineFlags::NONE)
    }

    /// Moves the pen to `to` with an invisible segment.
    ///
    /// Consecutive warps are merged into one.
    pub fn warp_to(&mut self, to: Point) -> PathResult<()> {
        self.check_started()?;
        if self.current_position() == Some(to) {
            return Ok(());
        }

        if let Some(last) = self.flags.last() {
            if last.contains(LineFlags::WARP) {
                if let Some(p) = self.points.last_mut() {
                    *p = to;
                }
                self.invalidate();
                return Ok(());
            }
        }

        self.push_line(to, LineFlags::WARP | LineFlags::NOT_VISIBLE)
    }

    /// Approximates a quadratic bézier curve from the current position with segments
    /// within `flatness` of the curve.
    pub fn quadratic_bezier_to(&mut self, ctrl: Point, to: Point, flatness: f32) -> PathResult<()> {
        let from = self.started_position()?;
        let curve = QuadraticBezierSegment { from, ctrl, to };
        let mode = self.flattening_mode;

        let n = self.num_lines();
        let result = curve.try_for_each_flattened(flatness, mode, &mut |segment| self.line_to(segment.to));
        if result.is_err() {
            self.truncate(n);
        }

        result
    }

    /// Approximates a cubic bézier curve from the current position with segments
    /// within `flatness` of the curve.
    pub fn cubic_bezier_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point, flatness: f32) -> PathResult<()> {
        let from = self.started_position()?;
        let curve = CubicBezierSegment { from, ctrl1, ctrl2, to };
        let mode = self.flattening_mode;

        let n = self.num_lines();
        let result = curve.try_for_each_flattened(flatness, mode, &mut |segment| self.line_to(segment.to));
        if result.is_err() {
            self.truncate(n);
        }

        result
    }

    /// Appends an SVG-style elliptic arc from the current position to `to`.
    ///
    /// `x_rotation` is in degrees. An arc with a zero radius is a straight line.
    pub fn arc_to(
        &mut self,
        to: Point,
        radii: Vector,
        x_rotation: f32,
        large_arc: bool,
        sweep: bool,
        flatness: f32,
    ) -> PathResult<()> {
        let from = self.started_position()?;
        if from == to {
            return Ok(());
        }

        let arc = SvgArc {
            from,
            to,
            radii,
            x_rotation: Angle::degrees(x_rotation),
            flags: ArcFlags { large_arc, sweep },
        };
        if arc.is_straight_line() {
            return self.line_to(to);
        }

        let mode = self.flattening_mode;
        let n = self.num_lines();
        let mut result = arc.try_for_each_flattened(flatness, mode, &mut |segment| self.line_to(segment.to));
        if result.is_ok() {
            result = self.line_to(to);
        }
        if result.is_err() {
            self.truncate(n);
        }

        result
    }

    /// Ends the current sub-path.
    ///
    /// If the pen is not back at the start of the sub-path, a closing segment is
    /// appended, invisible if `visible` is false. Otherwise the last segment is marked
    /// as closing; an invisible close then first appends an invisible zero-length
    /// segment so that the caps at both ends of the sub-path are not joined.
    pub fn close(&mut self, visible: bool) -> PathResult<()> {
        self.check_started()?;
        let n = self.num_lines();
        if n == self.last_sub_path_start {
            return Ok(());
        }

        let first = self.points[self.last_sub_path_start];
        let last = self.points[n];
        if first == last {
            if !visible && !self.flags[n - 1].contains(LineFlags::CLOSE) {
                self.push_line(first, LineFlags::NOT_VISIBLE)?;
            }
            let last_flags = self.flags.len() - 1;
            self.flags[last_flags].insert(LineFlags::CLOSE);
            self.invalidate();
            return Ok(());
        }

        let flags = if visible {
            LineFlags::CLOSE
        } else {
            LineFlags::CLOSE | LineFlags::NOT_VISIBLE
        };

        self.push_line(first, flags)
    }

    /// Returns true if the current sub-path ends where it starts.
    ///
    /// An empty sub-path is closed.
    pub fn is_closed(&self) -> bool {
        let n = self.num_lines();
        if n == self.last_sub_path_start {
            return true;
        }

        self.points[self.last_sub_path_start] == self.points[n]
    }

    /// Removes the last segment if it belongs to the current sub-path.
    pub fn remove_last_line(&mut self) -> bool {
        if self.num_lines() > self.last_sub_path_start {
            self.points.pop();
            self.flags.pop();
            self.invalidate();
            return true;
        }

        false
    }

    /// Appends a closed primitive shape as a new sub-path.
    pub fn append_primitive(&mut self, primitive: &Primitive) -> PathResult<()> {
        let n = self.num_lines();
        let result = match *primitive {
            Primitive::Rect(rect) => self.append_rect(&rect),
            Primitive::RoundedRect { rect, radii, flatness } => self.append_rounded_rect(&rect, radii, flatness),
        };
        if result.is_err() {
            self.truncate(n);
        }

        result
    }

    fn append_rect(&mut self, rect: &Box2D) -> PathResult<()> {
        self.move_to(rect.min)?;
        self.line_to(point(rect.max.x, rect.min.y))?;
        self.line_to(rect.max)?;
        self.line_to(point(rect.min.x, rect.max.y))?;
        self.close(true)
    }

    fn append_rounded_rect(&mut self, rect: &Box2D, radii: Vector, flatness: f32) -> PathResult<()> {
        let (x, y) = (rect.min.x, rect.min.y);
        let (w, h) = (rect.width(), rect.height());
        let rx = radii.x.abs().min(w * 0.5);
        let ry = radii.y.abs().min(h * 0.5);

        // Each quarter ellipse is split at 45 degrees. The control points of the two
        // halves sit at tan(22.5°) = 2 cos(45°) - 1 of the radius from the corner's
        // tangent points.
        let cos45 = core::f32::consts::FRAC_1_SQRT_2;
        let rxf1 = rx * cos45;
        let rxf2 = rx * (2.0 * cos45 - 1.0);
        let ryf1 = ry * cos45;
        let ryf2 = ry * (2.0 * cos45 - 1.0);

        self.move_to(point(x + rx, y))?;

        let (cx, cy) = (x + w - rx, y);
        self.line_to(point(cx, cy))?;
        self.corner(
            [
                point(cx + rxf2, cy),
                point(cx + rxf1, cy + ry - ryf1),
                point(cx + rx, cy + ry - ryf2),
                point(cx + rx, cy + ry),
            ],
            flatness,
        )?;

        let (cx, cy) = (x + w, y + h - ry);
        self.line_to(point(cx, cy))?;
        self.corner(
            [
                point(cx, cy + ryf2),
                point(cx - rx + rxf1, cy + ryf1),
                point(cx - rx + rxf2, cy + ry),
                point(cx - rx, cy + ry),
            ],
            flatness,
        )?;

        let (cx, cy) = (x + rx, y + h);
        self.line_to(point(cx, cy))?;
        self.corner(
            [
                point(cx - rxf2, cy),
                point(cx - rxf1, cy - ry + ryf1),
                point(cx - rx, cy - ry + ryf2),
                point(cx - rx, cy - ry),
            ],
            flatness,
        )?;

        let (cx, cy) = (x, y + ry);
        self.line_to(point(cx, cy))?;
        self.corner(
            [
                point(cx, cy - ryf2),
                point(cx + rx - rxf1, cy - ryf1),
                point(cx + rx - rxf2, cy - ry),
                point(cx + rx, cy - ry),
            ],
            flatness,
        )?;

        self.close(true)
    }

    // Control point, midpoint, control point, end point.
    fn corner(&mut self, pts: [Point; 4], flatness: f32) -> PathResult<()> {
        self.quadratic_bezier_to(pts[0], pts[1], flatness)?;
        self.quadratic_bezier_to(pts[2], pts[3], flatness)
    }

    /// Applies the transform to every point of the path.
    pub fn transform(&mut self, transform: &Transform) {
        for p in &mut self.points {
            *p = transform.transform_point(*p);
        }
        self.invalidate();
    }

    // Moves a point without touching the flags, used to patch the start of a contour.
    pub(crate) fn set_point(&mut self, index: usize, p: Point) {
        self.points[index] = p;
        self.invalidate();
    }

    fn started_position(&self) -> PathResult<Point> {
        self.current_position().ok_or(PathError::InvalidState)
    }

    /// The end of the last segment, or the start point if there is no segment yet.
    pub fn current_position(&self) -> Option<Point> {
        self.points.last().cloned()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn num_lines(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// The points of the path. Segment `i` goes from `points()[i]` to `points()[i + 1]`.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn line(&self, index: usize) -> LineSegment<f32> {
        LineSegment {
            from: self.points[index],
            to: self.points[index + 1],
        }
    }

    /// Same as `line` but returns `None` for warps.
    #[inline]
    pub fn non_warp_line(&self, index: usize) -> Option<LineSegment<f32>> {
        if self.is_line_warp(index) {
            return None;
        }

        Some(self.line(index))
    }

    #[inline]
    pub fn line_flags(&self, index: usize) -> LineFlags {
        self.flags[index]
    }

    #[inline]
    pub fn is_line_visible(&self, index: usize) -> bool {
        !self.flags[index].contains(LineFlags::NOT_VISIBLE)
    }

    #[inline]
    pub fn is_line_warp(&self, index: usize) -> bool {
        self.flags[index].contains(LineFlags::WARP)
    }

    #[inline]
    pub fn is_line_close(&self, index: usize) -> bool {
        self.flags[index].contains(LineFlags::CLOSE)
    }

    /// Length of a segment, cached.
    pub fn line_length(&self, index: usize) -> f32 {
        let mut lengths = self.lengths.borrow_mut();
        if index < lengths.len() {
            return lengths[index];
        }

        let len = lengths.len();
        if lengths.try_reserve(index + 1 - len).is_err() {
            return self.line(index).length();
        }
        for i in lengths.len()..=index {
            lengths.push(self.line(i).length());
        }

        lengths[index]
    }

    /// Bounding box of the non-warp segments, cached.
    ///
    /// A path without any such segment has an empty box spanning from `UNBOUNDED` to
    /// `-UNBOUNDED`.
    pub fn bounding_box(&self) -> Box2D {
        if let Some(bbox) = self.bbox.get() {
            return bbox;
        }

        let mut min = point(f32::UNBOUNDED, f32::UNBOUNDED);
        let mut max = point(-f32::UNBOUNDED, -f32::UNBOUNDED);
        for i in 0..self.num_lines() {
            if self.is_line_warp(i) {
                continue;
            }
            for p in &[self.points[i], self.points[i + 1]] {
                min = min.min(*p);
                max = max.max(*p);
            }
        }

        let bbox = Box2D { min, max };
        self.bbox.set(Some(bbox));

        bbox
    }

    pub fn has_multiple_sub_paths(&self) -> bool {
        self.multiple_sub_paths
    }

    /// Index of the first segment of the current sub-path.
    pub fn last_sub_path_start(&self) -> usize {
        self.last_sub_path_start
    }

    /// Iterates over the ranges of consecutive non-warp segments.
    pub fn sub_paths(&self) -> SubPaths {
        SubPaths { path: self, index: 0 }
    }

    /// True if merging the sub-paths of this path into a single one already failed.
    ///
    /// Reset on any mutation.
    pub fn merge_failed(&self) -> bool {
        self.merge_failed.get()
    }

    pub fn set_merge_failed(&self) {
        self.merge_failed.set(true);
    }
}

impl Default for Path {
    fn default() -> Self {
        Path::new()
    }
}

/// Iterator over the sub-paths of a path as ranges of segment indices.
///
/// Warps separate sub-paths and are never part of a range.
pub struct SubPaths<'l> {
    path: &'l Path,
    index: usize,
}

impl<'l> Iterator for SubPaths<'l> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Range<usize>> {
        let n = self.path.num_lines();
        while self.index < n && self.path.is_line_warp(self.index) {
            self.index += 1;
        }
        if self.index >= n {
            return None;
        }

        let start = self.index;
        while self.index < n && !self.path.is_line_warp(self.index) {
            self.index += 1;
        }

        Some(start..self.index)
    }
}

#[test]
fn line_flags() {
    let mut flags = LineFlags::WARP | LineFlags::NOT_VISIBLE;
    assert!(flags.contains(LineFlags::WARP));
    assert!(!flags.contains(LineFlags::CLOSE));
    flags.insert(LineFlags::CLOSE);
    assert!(flags.contains(LineFlags::CLOSE | LineFlags::WARP));
    assert_eq!(flags.bits(), 7);
}

#[test]
fn sub_path_ranges() {
    let mut path = Path::new();
    path.move_to(point(0.0, 0.0)).unwrap();
    path.line_to(point(1.0, 0.0)).unwrap();
    path.line_to(point(1.0, 1.0)).unwrap();
    path.move_to(point(5.0, 5.0)).unwrap();
    path.line_to(point(6.0, 5.0)).unwrap();

    let ranges: Vec<Range<usize>> = path.sub_paths().collect();
    // The first sub-path is closed by an invisible segment before the warp.
    assert_eq!(ranges, alloc::vec![0..3, 4..5]);
    assert!(path.has_multiple_sub_paths());
    assert_eq!(path.last_sub_path_start(), 4);
}

#[test]
fn bounding_box_skips_warps() {
    let mut path = Path::new();
    assert_eq!(path.bounding_box().min.x, f32::UNBOUNDED);

    path.move_to(point(1.0, 2.0)).unwrap();
    path.line_to(point(3.0, -1.0)).unwrap();
    path.warp_to(point(100.0, 100.0)).unwrap();

    let bbox = path.bounding_box();
    assert_eq!(bbox.min, point(1.0, -1.0));
    assert_eq!(bbox.max, point(3.0, 2.0));

    path.line_to(point(101.0, 100.0)).unwrap();
    assert_eq!(path.bounding_box().max, point(101.0, 100.0));
}

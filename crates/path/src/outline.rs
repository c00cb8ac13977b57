//! Stroking: builds the path covering the area of a stroke.

use crate::error::{PathError, PathResult};
use crate::geom::LineSegment;
use crate::math::{point, vector, Point, Vector};
use crate::path::Path;
use crate::style::{LineCap, LineJoin, StrokeStyle};

#[cfg(not(feature = "std"))]
use num_traits::Float;

/// Intersection of the segments `a0 a1` and `b0 b1`, or of the infinite lines going
/// through them if `infinite` is true.
///
/// Evaluated in double precision. Segments sharing an endpoint never intersect and
/// parallel lines have no intersection.
pub fn line_intersection(a0: Point, a1: Point, b0: Point, b1: Point, infinite: bool) -> Option<Point> {
    if a1 == b0 || a0 == b1 || a0 == b0 || a1 == b1 {
        return None;
    }

    let (x1, y1) = (a0.x as f64, a0.y as f64);
    let (x2, y2) = (a1.x as f64, a1.y as f64);
    let (x3, y3) = (b0.x as f64, b0.y as f64);
    let (x4, y4) = (b1.x as f64, b1.y as f64);

    let mut div = (y4 - y3) * (x2 - x1) - (x4 - x3) * (y2 - y1);
    if div == 0.0 {
        return None;
    }

    let mut t1 = (x4 - x3) * (y1 - y3) - (y4 - y3) * (x1 - x3);
    let mut t2 = (x2 - x1) * (y1 - y3) - (y2 - y1) * (x1 - x3);
    if !infinite {
        if div < 0.0 {
            t1 = -t1;
            t2 = -t2;
            div = -div;
        }
        if t1 < 0.0 || t1 > div || t2 < 0.0 || t2 > div {
            return None;
        }
    }

    let t = t1 / div;

    Some(point((x1 + t * (x2 - x1)) as f32, (y1 + t * (y2 - y1)) as f32))
}

// Normal of the segment scaled to half the line width.
fn scaled_normal(line: &LineSegment<f32>, length: f32, width: f32) -> Option<Vector> {
    if length == 0.0 {
        return None;
    }
    let s = width / (2.0 * length);

    Some(vector(line.to.y - line.from.y, line.from.x - line.to.x) * s)
}

// Direction of the segment scaled to half the line width.
fn scaled_direction(line: &LineSegment<f32>, length: f32, width: f32) -> Vector {
    if length == 0.0 {
        return vector(0.0, 0.0);
    }

    line.to_vector() * (width / (2.0 * length))
}

fn translated(line: &LineSegment<f32>, v: Vector) -> LineSegment<f32> {
    LineSegment {
        from: line.from + v,
        to: line.to + v,
    }
}

// True if the previous segment starts on the outer side of the turn into `next`.
fn needs_join_on_outside(next: &LineSegment<f32>, prev: &LineSegment<f32>) -> bool {
    let n = vector(next.to.y - next.from.y, next.from.x - next.to.x);
    n.dot(prev.from - next.from) <= 0.0
}

fn miter_join(
    outline: &mut Path,
    style: &StrokeStyle,
    first: &LineSegment<f32>,
    second: &LineSegment<f32>,
    corner: Point,
) -> PathResult<bool> {
    if let Some(p) = line_intersection(first.from, first.to, second.from, second.to, true) {
        let limit = style.miter_limit * style.line_width * 0.5;
        if (p - corner).square_length() <= limit * limit {
            outline.line_to(p)?;
            return Ok(true);
        }
    }

    Ok(false)
}

impl Path {
    /// Builds the outline of the stroke of this path into `outline`, using the stroke
    /// style of this path.
    ///
    /// Each contour of the outline is made of the offset of the sub-path on one side,
    /// a warp to the other side and the offset on the other side in the opposite
    /// direction, so the outline should be filled with the non-zero rule.
    ///
    /// If `first_line` is zero the outline is reset and takes the style of this path,
    /// otherwise the segments starting at `first_line` are appended. A path with more
    /// than one segment is closed with an invisible segment first.
    pub fn create_outline(&mut self, outline: &mut Path, flatness: f32, first_line: usize) -> PathResult<()> {
        if self.num_lines() <= first_line {
            return Err(PathError::InvalidArgument("first_line is out of range"));
        }

        if self.num_lines() > 1 {
            self.close(false)?;
        }

        if first_line == 0 {
            outline.prepare(self.num_lines() * 2)?;
            outline.set_style(*self.style());
        }

        let style = *outline.style();
        let num_lines = self.num_lines();
        let mut first_line = first_line;

        while first_line < num_lines {
            while first_line < num_lines && self.is_line_warp(first_line) {
                first_line += 1;
            }
            if first_line >= num_lines {
                return Ok(());
            }

            let mut last_line = num_lines;
            if self.has_multiple_sub_paths() {
                last_line = first_line;
                while last_line < num_lines && !self.is_line_warp(last_line) {
                    last_line += 1;
                }
            }

            if last_line == first_line + 1 {
                if self.is_line_visible(first_line) {
                    self.outline_single_line(outline, &style, first_line, flatness)?;
                }
            } else {
                self.outline_sub_path(outline, &style, first_line, last_line, flatness)?;
            }

            // The line after the sub-path is the warp to the next one.
            first_line = last_line + 1;
        }

        Ok(())
    }

    fn outline_single_line(
        &self,
        outline: &mut Path,
        style: &StrokeStyle,
        index: usize,
        flatness: f32,
    ) -> PathResult<()> {
        let line = self.line(index);
        let length = self.line_length(index);
        let d = match scaled_normal(&line, length, style.line_width) {
            Some(d) => d,
            None => return Ok(()),
        };
        let dir = if style.line_cap == LineCap::Square {
            scaled_direction(&line, length, style.line_width)
        } else {
            vector(0.0, 0.0)
        };
        let r = style.line_width * 0.5;

        outline.move_to(line.from - dir + d)?;
        outline.line_to(line.to + dir + d)?;
        if style.line_cap == LineCap::Round {
            outline.arc_to(line.to - d, vector(r, r), 0.0, true, true, flatness)?;
        } else {
            outline.line_to(line.to + dir - d)?;
        }
        outline.line_to(line.from - dir - d)?;
        if style.line_cap == LineCap::Round {
            outline.arc_to(line.from + d, vector(r, r), 0.0, true, true, flatness)
        } else {
            outline.close(true)
        }
    }

    fn outline_sub_path(
        &self,
        outline: &mut Path,
        style: &StrokeStyle,
        first_line: usize,
        last_line: usize,
        flatness: f32,
    ) -> PathResult<()> {
        let width = style.line_width;
        let first = self.line(first_line);
        let d = scaled_normal(&first, self.line_length(first_line), width).unwrap_or(vector(0.0, 0.0));
        outline.move_to(first.from + d)?;
        let internal_start = outline.num_lines();

        self.stroke_side(outline, style, first_line, last_line, false, flatness)?;

        let closed_loop = self.is_line_visible(last_line - 1) && self.is_line_visible(first_line);
        let mut internal_end = None;
        if self.is_line_visible(last_line - 1) {
            // Without a join between the last and first segments, the contour starts
            // where the pass ended.
            if closed_loop && outline.num_lines() > internal_start {
                if let Some(p) = outline.current_position() {
                    outline.set_point(internal_start, p);
                }
            }

            let last = self.line(last_line - 1);
            let d = scaled_normal(&last, self.line_length(last_line - 1), width).unwrap_or(vector(0.0, 0.0));
            outline.warp_to(last.to - d)?;
            internal_end = Some(outline.num_lines());
        }

        self.stroke_side(outline, style, first_line, last_line, true, flatness)?;

        if let Some(internal_end) = internal_end {
            if closed_loop && outline.num_lines() > internal_start {
                if let Some(p) = outline.current_position() {
                    outline.set_point(internal_end, p);
                }
            }
        }

        // Warp back to the start so that the contour is not closed implicitly.
        let start = outline.points()[internal_start];

        outline.warp_to(start)
    }

    // Offsets the visible segments of a sub-path on one side. The backward pass walks
    // the segments in reverse order with flipped directions, which puts the offset on
    // the other side.
    fn stroke_side(
        &self,
        outline: &mut Path,
        style: &StrokeStyle,
        first_line: usize,
        last_line: usize,
        backward: bool,
        flatness: f32,
    ) -> PathResult<()> {
        let width = style.line_width;
        let oriented = |index: usize| {
            let line = self.line(index);
            if backward {
                line.flip()
            } else {
                line
            }
        };
        let wrap_prev = |index: usize| if index == first_line { last_line - 1 } else { index - 1 };
        let wrap_next = |index: usize| if index + 1 >= last_line { first_line } else { index + 1 };

        for step in 0..(last_line - first_line) {
            let index = if backward { last_line - 1 - step } else { first_line + step };
            if !self.is_line_visible(index) {
                continue;
            }

            let (prev, next) = if backward {
                (wrap_next(index), wrap_prev(index))
            } else {
                (wrap_prev(index), wrap_next(index))
            };

            let line = oriented(index);
            let length = self.line_length(index);
            let d = scaled_normal(&line, length, width).unwrap_or(vector(0.0, 0.0));

            if !self.is_line_visible(prev) {
                outline.warp_to(line.from + d)?;
            }

            if !self.is_line_visible(next) {
                cap(outline, style, &line, length, d, flatness)?;
                continue;
            }

            let next_line = oriented(next);
            let nd = scaled_normal(&next_line, self.line_length(next), width).unwrap_or(vector(0.0, 0.0));
            if needs_join_on_outside(&next_line, &line) {
                outside_join(outline, style, &line, &next_line, d, nd, flatness)?;
            } else {
                inside_turn(outline, &line, &next_line, d, nd)?;
            }
        }

        Ok(())
    }
}

fn outside_join(
    outline: &mut Path,
    style: &StrokeStyle,
    line: &LineSegment<f32>,
    next: &LineSegment<f32>,
    d: Vector,
    nd: Vector,
    flatness: f32,
) -> PathResult<()> {
    let a = line.to + d;
    let b = next.from + nd;
    match style.line_join {
        LineJoin::Miter => {
            if !miter_join(outline, style, &translated(line, d), &translated(next, nd), line.to)? {
                outline.line_to(a)?;
                outline.line_to(b)?;
            }
        }
        LineJoin::Round => {
            let r = style.line_width * 0.5;
            outline.line_to(a)?;
            outline.arc_to(b, vector(r, r), 0.0, false, true, flatness)?;
        }
        LineJoin::Bevel => {
            outline.line_to(a)?;
            outline.line_to(b)?;
        }
    }

    Ok(())
}

// On the inner side of a turn the offset segments overlap: move to their intersection
// when there is one.
fn inside_turn(
    outline: &mut Path,
    line: &LineSegment<f32>,
    next: &LineSegment<f32>,
    d: Vector,
    nd: Vector,
) -> PathResult<()> {
    let a = line.to + d;
    let b = next.from + nd;
    let offset_line = translated(line, d);
    let offset_next = translated(next, nd);

    if let Some(p) = line_intersection(offset_line.from, offset_line.to, offset_next.from, offset_next.to, false) {
        return outline.line_to(p);
    }

    let collinear = d.dot(next.to_vector()).abs() <= 100.0 * <f32 as crate::geom::Scalar>::EPSILON;
    if !collinear {
        // Short segments: clip against the ends of the offset segments instead.
        if let Some(p) = line_intersection(line.from + d, line.from - d, offset_next.from, offset_next.to, false) {
            outline.line_to(p)?;
            return outline.line_to(b);
        }
        if let Some(p) = line_intersection(offset_line.from, offset_line.to, next.to + nd, next.to - nd, false) {
            outline.line_to(a)?;
            return outline.line_to(p);
        }
    }

    outline.line_to(a)?;
    outline.line_to(b)
}

fn cap(
    outline: &mut Path,
    style: &StrokeStyle,
    line: &LineSegment<f32>,
    length: f32,
    d: Vector,
    flatness: f32,
) -> PathResult<()> {
    match style.line_cap {
        LineCap::Square => {
            let dir = scaled_direction(line, length, style.line_width);
            outline.line_to(line.to + dir + d)?;
            outline.line_to(line.to + dir - d)?;
            outline.line_to(line.to - d)
        }
        LineCap::Round => {
            let r = style.line_width * 0.5;
            outline.line_to(line.to + d)?;
            outline.arc_to(line.to - d, vector(r, r), 0.0, true, true, flatness)
        }
        LineCap::Butt => {
            outline.line_to(line.to + d)?;
            outline.line_to(line.to - d)
        }
    }
}

#[test]
fn segment_intersection() {
    let p = line_intersection(point(0.0, 0.0), point(10.0, 10.0), point(0.0, 10.0), point(10.0, 0.0), false);
    assert_eq!(p, Some(point(5.0, 5.0)));

    // Shared endpoints never intersect.
    let p = line_intersection(point(0.0, 0.0), point(10.0, 10.0), point(10.0, 10.0), point(20.0, 0.0), false);
    assert_eq!(p, None);

    // Parallel.
    let p = line_intersection(point(0.0, 0.0), point(10.0, 0.0), point(0.0, 1.0), point(10.0, 1.0), true);
    assert_eq!(p, None);

    // Only the infinite lines intersect.
    let a = (point(0.0, 0.0), point(1.0, 0.0));
    let b = (point(5.0, -1.0), point(5.0, 1.0));
    assert_eq!(line_intersection(a.0, a.1, b.0, b.1, false), None);
    assert_eq!(line_intersection(a.0, a.1, b.0, b.1, true), Some(point(5.0, 0.0)));
}

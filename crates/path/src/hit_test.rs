//! Point and rectangle hit tests.

use crate::geom::utils::orient2d;
use crate::math::{Box2D, Point};
use crate::path::Path;
use crate::style::FillRule;

// Cohen-Sutherland region codes.
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const TOP: u8 = 4;
const BOTTOM: u8 = 8;

fn region(p: Point, rect: &Box2D) -> u8 {
    let mut code = 0;
    if p.x < rect.min.x {
        code |= LEFT;
    } else if p.x > rect.max.x {
        code |= RIGHT;
    }
    if p.y < rect.min.y {
        code |= TOP;
    } else if p.y > rect.max.y {
        code |= BOTTOM;
    }

    code
}

// Strict crossing test between the segment and the vertical line `x` of the rectangle.
fn crosses_vertical_edge(from: Point, to: Point, x: f32, rect: &Box2D) -> bool {
    let (x1, y1) = (from.x as f64, from.y as f64);
    let (x2, y2) = (to.x as f64, to.y as f64);
    let (min_y, max_y) = (rect.min.y as f64, rect.max.y as f64);
    let x = x as f64;

    let mut div = (max_y - min_y) * (x2 - x1);
    if div == 0.0 {
        return false;
    }
    let mut t1 = (min_y - max_y) * (x1 - x);
    let mut t2 = (x2 - x1) * (y1 - min_y) - (y2 - y1) * (x1 - x);
    if div < 0.0 {
        t1 = -t1;
        t2 = -t2;
        div = -div;
    }

    t1 > 0.0 && t1 < div && t2 > 0.0 && t2 < div
}

// Strict crossing test between the segment and the horizontal line `y` of the rectangle.
fn crosses_horizontal_edge(from: Point, to: Point, y: f32, rect: &Box2D) -> bool {
    let (x1, y1) = (from.x as f64, from.y as f64);
    let (x2, y2) = (to.x as f64, to.y as f64);
    let (min_x, max_x) = (rect.min.x as f64, rect.max.x as f64);
    let y = y as f64;

    let mut div = (min_x - max_x) * (y2 - y1);
    if div == 0.0 {
        return false;
    }
    let mut t1 = (max_x - min_x) * (y1 - y);
    let mut t2 = (x2 - x1) * (y1 - y) - (y2 - y1) * (x1 - min_x);
    if div < 0.0 {
        t1 = -t1;
        t2 = -t2;
        div = -div;
    }

    t1 > 0.0 && t1 < div && t2 > 0.0 && t2 < div
}

impl Path {
    /// Tests whether a point is inside the filled area of the path.
    ///
    /// Every sub-path is implicitly closed. Points on the boundary are inside.
    pub fn is_point_inside(&self, p: Point, fill_rule: FillRule) -> bool {
        let mut up = 0;
        let mut down = 0;

        for i in 0..self.num_lines() {
            if self.is_line_warp(i) {
                continue;
            }

            let line = self.line(i);
            let (s, e) = (line.from, line.to);

            // Half-open: a segment ending exactly at the point's height is only counted
            // on one side, which avoids double counting at vertices.
            if (s.y < p.y && e.y >= p.y) || (s.y >= p.y && e.y < p.y) {
                let is_up = s.y > e.y;
                let (bottom, top) = if is_up { (e, s) } else { (s, e) };

                let sign = orient2d(bottom, top, p);
                if sign == 0.0 {
                    return true;
                }

                if sign > 0.0 {
                    if is_up {
                        up += 1;
                    } else {
                        down += 1;
                    }
                }
            } else if s.y == p.y && e.y == p.y {
                let (min_x, max_x) = if s.x < e.x { (s.x, e.x) } else { (e.x, s.x) };
                if p.x >= min_x && p.x <= max_x {
                    return true;
                }
            }
        }

        // Implicit closing segments of the sub-paths that are not closed.
        for range in self.sub_paths() {
            let start = self.line(range.start).from;
            let end = self.line(range.end - 1).to;
            if start == end {
                continue;
            }
            if (end.y < p.y && start.y >= p.y) || (end.y >= p.y && start.y < p.y) {
                let is_up = end.y > start.y;
                let (bottom, top) = if is_up { (start, end) } else { (end, start) };
                let sign = orient2d(bottom, top, p);
                if sign == 0.0 {
                    return true;
                }
                if sign > 0.0 {
                    if is_up {
                        up += 1;
                    } else {
                        down += 1;
                    }
                }
            }
        }

        match fill_rule {
            FillRule::EvenOdd => (up + down) % 2 != 0,
            FillRule::NonZero => up != down,
        }
    }

    /// Tests whether the filled area of the path intersects the rectangle.
    pub fn intersects(&self, rect: &Box2D, fill_rule: FillRule) -> bool {
        for i in 0..self.num_lines() {
            if self.is_line_warp(i) {
                continue;
            }

            let line = self.line(i);
            let r1 = region(line.from, rect);
            let r2 = region(line.to, rect);

            // Both endpoints on the outer side of the same edge.
            if r1 & r2 != 0 {
                continue;
            }

            if r1 == 0 || r2 == 0 {
                return true;
            }

            let codes = r1 | r2;
            if codes & LEFT != 0 && crosses_vertical_edge(line.from, line.to, rect.min.x, rect) {
                return true;
            }
            if codes & RIGHT != 0 && crosses_vertical_edge(line.from, line.to, rect.max.x, rect) {
                return true;
            }
            if codes & TOP != 0 && crosses_horizontal_edge(line.from, line.to, rect.min.y, rect) {
                return true;
            }
            if codes & BOTTOM != 0 && crosses_horizontal_edge(line.from, line.to, rect.max.y, rect) {
                return true;
            }
        }

        // No edge crosses the rectangle, it is either fully inside or fully outside.
        self.is_point_inside(rect.min, fill_rule)
    }

    /// Tests whether all the non-warp segments are within the rectangle.
    pub fn is_enclosed(&self, rect: &Box2D) -> bool {
        let inside = |p: Point| p.x >= rect.min.x && p.x <= rect.max.x && p.y >= rect.min.y && p.y <= rect.max.y;

        for i in 0..self.num_lines() {
            if self.is_line_warp(i) {
                continue;
            }
            let line = self.line(i);
            if !inside(line.from) || !inside(line.to) {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
use crate::math::point;

#[cfg(test)]
fn square(min: f32, max: f32) -> Path {
    let mut path = Path::new();
    path.move_to(point(min, min)).unwrap();
    path.line_to(point(max, min)).unwrap();
    path.line_to(point(max, max)).unwrap();
    path.line_to(point(min, max)).unwrap();
    path.close(true).unwrap();

    path
}

#[test]
fn point_inside_square() {
    let path = square(0.0, 10.0);
    for &rule in &[FillRule::EvenOdd, FillRule::NonZero] {
        assert!(path.is_point_inside(point(5.0, 5.0), rule));
        assert!(path.is_point_inside(point(0.0, 5.0), rule));
        assert!(path.is_point_inside(point(5.0, 0.0), rule));
        assert!(path.is_point_inside(point(10.0, 10.0), rule));
        assert!(!path.is_point_inside(point(-1.0, 5.0), rule));
        assert!(!path.is_point_inside(point(11.0, 5.0), rule));
        assert!(!path.is_point_inside(point(5.0, 10.5), rule));
    }
}

#[test]
fn fill_rules_differ_on_overlap() {
    // Two overlapping squares with the same orientation.
    let mut path = square(0.0, 10.0);
    path.move_to(point(5.0, 5.0)).unwrap();
    path.line_to(point(15.0, 5.0)).unwrap();
    path.line_to(point(15.0, 15.0)).unwrap();
    path.line_to(point(5.0, 15.0)).unwrap();
    path.close(true).unwrap();

    let p = point(7.0, 7.0);
    assert!(path.is_point_inside(p, FillRule::NonZero));
    assert!(!path.is_point_inside(p, FillRule::EvenOdd));
    assert!(path.is_point_inside(point(12.0, 12.0), FillRule::EvenOdd));
}

#[test]
fn open_sub_path_is_implicitly_closed() {
    let mut path = Path::new();
    path.move_to(point(0.0, 0.0)).unwrap();
    path.line_to(point(10.0, 0.0)).unwrap();
    path.line_to(point(10.0, 10.0)).unwrap();

    assert!(path.is_point_inside(point(8.0, 2.0), FillRule::NonZero));
    assert!(!path.is_point_inside(point(2.0, 8.0), FillRule::NonZero));
}

#[test]
fn rectangle_tests() {
    let path = square(0.0, 10.0);

    // Overlapping.
    assert!(path.intersects(&Box2D::new(point(5.0, 5.0), point(20.0, 20.0)), FillRule::NonZero));
    // Segment crossing the rectangle without any endpoint inside.
    assert!(path.intersects(&Box2D::new(point(-5.0, 4.0), point(15.0, 6.0)), FillRule::NonZero));
    // Enclosed by the path.
    assert!(path.intersects(&Box2D::new(point(2.0, 2.0), point(3.0, 3.0)), FillRule::NonZero));
    // Disjoint.
    assert!(!path.intersects(&Box2D::new(point(20.0, 20.0), point(30.0, 30.0)), FillRule::NonZero));

    assert!(path.is_enclosed(&Box2D::new(point(0.0, 0.0), point(10.0, 10.0))));
    assert!(!path.is_enclosed(&Box2D::new(point(0.0, 0.0), point(9.0, 10.0))));
}

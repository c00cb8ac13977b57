//! Merging of several sub-paths into a single simple polygon.
//!
//! Sub-paths are processed from left to right. Each one is connected to the polygon
//! built so far by a pair of coincident edges (a corridor) going from its leftmost
//! vertex to a visible vertex further left. Sub-paths nested an odd number of times
//! are holes and are turned clockwise, the others counter-clockwise, so that the
//! filled area is always on the left of the merged outline.

use crate::error::{TriangulationError, TriangulationResult};
use crate::math::{Point, Vector};

use kestrel_path::geom::utils::{cross_wide, orient2d, orientation};
use kestrel_path::geom::{LineSegment, SegmentIntersection};
use kestrel_path::sweep::{compare_positions, simplify_ring};
use kestrel_path::{Path, SelfIntersect};

use alloc::vec::Vec;
use core::cmp::Ordering;

/// Connects the sub-paths of `path` into a single closed sub-path that can be
/// triangulated as a simple polygon.
///
/// Fails if no corridor can be found for a sub-path or if the sub-paths overlap each
/// other. The failure is remembered on `path` so that later attempts fail right away.
pub fn try_to_make_multiple_sub_paths_simple(path: &Path) -> TriangulationResult<Path> {
    if path.merge_failed() {
        return Err(TriangulationError::InvalidInput("the sub-paths overlap"));
    }

    let mut rings: Vec<Vec<Point>> = Vec::new();
    for range in path.sub_paths() {
        let mut ring = Vec::new();
        ring.try_reserve(range.len() + 1)?;
        ring.push(path.line(range.start).from);
        for i in range {
            ring.push(path.line(i).to);
        }
        simplify_ring(&mut ring);
        if ring.len() >= 3 {
            rings.try_reserve(1)?;
            rings.push(ring);
        }
    }

    let mut leftmost: Vec<usize> = Vec::new();
    leftmost.try_reserve(rings.len())?;
    leftmost.extend(rings.iter().map(|ring| leftmost_index(ring)));
    let mut order: Vec<usize> = (0..rings.len()).collect();
    order.sort_by(|&a, &b| compare_positions(rings[a][leftmost[a]], rings[b][leftmost[b]]));

    let mut merged: Vec<Point> = Vec::new();
    for (k, &r) in order.iter().enumerate() {
        let ring = &rings[r];
        let h = ring[leftmost[r]];

        let depth = order[..k]
            .iter()
            .filter(|&&other| ring_contains(&rings[other], h))
            .count();
        let hole = depth % 2 == 1;

        let mut ring = oriented(ring, !hole)?;
        let start = leftmost_index(&ring);
        ring.rotate_left(start);

        if k == 0 {
            merged = ring;
            continue;
        }

        let pending: Vec<&[Point]> = order[k + 1..].iter().map(|&other| rings[other].as_slice()).collect();
        let anchor = match find_anchor(&merged, &ring, &pending, hole) {
            Some(anchor) => anchor,
            None => {
                path.set_merge_failed();
                log::debug!("no corridor found for the sub-path starting at {:?}", h);
                return Err(TriangulationError::InvalidInput("the sub-paths cannot be merged"));
            }
        };

        merged.try_reserve(ring.len() + 2)?;
        let a = merged[anchor];
        let tail: Vec<Point> = merged.split_off(anchor + 1);
        merged.extend_from_slice(&ring);
        merged.push(h);
        merged.push(a);
        merged.extend_from_slice(&tail);
    }

    let mut result = Path::new();
    result.set_style(*path.style());
    if merged.is_empty() {
        return Ok(result);
    }

    result.prepare(merged.len())?;
    result.move_to(merged[0])?;
    for &p in &merged[1..] {
        result.line_to(p)?;
    }
    result.close(true)?;

    if SelfIntersect::new(&result)?.is_self_intersecting()? {
        path.set_merge_failed();
        log::debug!("merged path of {} points intersects itself", merged.len());
        return Err(TriangulationError::InvalidInput("the sub-paths overlap"));
    }

    Ok(result)
}

fn leftmost_index(ring: &[Point]) -> usize {
    let mut best = 0;
    for i in 1..ring.len() {
        if compare_positions(ring[i], ring[best]) == Ordering::Less {
            best = i;
        }
    }

    best
}

fn signed_area(ring: &[Point]) -> f64 {
    let mut area = 0.0;
    for i in 1..ring.len() - 1 {
        area += orient2d(ring[0], ring[i], ring[i + 1]);
    }

    area
}

fn oriented(ring: &[Point], counter_clockwise: bool) -> TriangulationResult<Vec<Point>> {
    let mut result = Vec::new();
    result.try_reserve(ring.len())?;
    result.extend_from_slice(ring);
    if (signed_area(ring) > 0.0) != counter_clockwise {
        result.reverse();
    }

    Ok(result)
}

// Even-odd test against the implicitly closed ring.
fn ring_contains(ring: &[Point], p: Point) -> bool {
    let mut inside = false;
    let mut prev = ring[ring.len() - 1];
    for &current in ring {
        if (current.y > p.y) != (prev.y > p.y) {
            let t = (p.y - prev.y) / (current.y - prev.y);
            let x = prev.x + t * (current.x - prev.x);
            if p.x < x {
                inside = !inside;
            }
        }
        prev = current;
    }

    inside
}

// Finds the vertex of `merged` to connect the leftmost vertex of `ring` to: the
// closest vertex on its left that can see it without crossing any edge.
fn find_anchor(merged: &[Point], ring: &[Point], pending: &[&[Point]], hole: bool) -> Option<usize> {
    let h = ring[0];

    let mut candidates: Vec<(f32, usize)> = merged
        .iter()
        .enumerate()
        .filter(|(_, &p)| compare_positions(p, h) == Ordering::Less)
        .map(|(i, &p)| ((p - h).square_length(), i))
        .collect();
    candidates.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal).then(a.1.cmp(&b.1)));

    for &(_, i) in &candidates {
        let a = merged[i];
        let corridor = LineSegment::new(a, h);

        let visible = !blocks(merged, &corridor)
            && !blocks(ring, &corridor)
            && pending.iter().all(|other| !blocks(other, &corridor));
        if !visible {
            continue;
        }

        // A vertex can appear several times once corridors were added. Pick the
        // occurrence whose corner contains the corridor.
        let n = merged.len();
        let prev = merged[(i + n - 1) % n];
        let next = merged[(i + 1) % n];
        if in_corner(next - a, prev - a, h - a) == hole {
            return Some(i);
        }
    }

    None
}

fn blocks(ring: &[Point], corridor: &LineSegment<f32>) -> bool {
    let n = ring.len();
    for k in 0..n {
        let edge = LineSegment::new(ring[k], ring[(k + 1) % n]);
        match corridor.classify_intersection(&edge) {
            SegmentIntersection::None => {}
            SegmentIntersection::Touching { .. } => {
                let shares_endpoint = edge.from == corridor.from
                    || edge.from == corridor.to
                    || edge.to == corridor.from
                    || edge.to == corridor.to;
                // A corridor running along an edge would be simplified away.
                let along = orientation(corridor.from, corridor.to, edge.from) == 0
                    && orientation(corridor.from, corridor.to, edge.to) == 0;
                if !shares_endpoint || along {
                    return true;
                }
            }
            SegmentIntersection::Crossing | SegmentIntersection::Collinear => return true,
        }
    }

    false
}

// Whether `d` points into the corner going counter-clockwise from `out` to `back`,
// which is the filled side of a counter-clockwise outline.
fn in_corner(out: Vector, back: Vector, d: Vector) -> bool {
    if cross_wide(out, back) > 0.0 {
        cross_wide(out, d) > 0.0 && cross_wide(d, back) > 0.0
    } else {
        !(cross_wide(back, d) >= 0.0 && cross_wide(d, out) >= 0.0)
    }
}

#[cfg(test)]
use crate::math::point;

#[cfg(test)]
fn square(path: &mut Path, x: f32, y: f32, size: f32) {
    path.move_to(point(x, y)).unwrap();
    path.line_to(point(x + size, y)).unwrap();
    path.line_to(point(x + size, y + size)).unwrap();
    path.line_to(point(x, y + size)).unwrap();
    path.close(true).unwrap();
}

#[test]
fn merge_square_with_hole() {
    let mut path = Path::new();
    square(&mut path, 0.0, 0.0, 10.0);
    square(&mut path, 3.0, 3.0, 4.0);

    let merged = try_to_make_multiple_sub_paths_simple(&path).unwrap();
    assert!(!merged.has_multiple_sub_paths());
    // Four points per ring plus the two ends of the corridor.
    assert_eq!(merged.num_lines(), 10);
    assert!(!merged.is_point_inside(point(5.0, 5.0), kestrel_path::FillRule::NonZero));
    assert!(merged.is_point_inside(point(1.0, 5.0), kestrel_path::FillRule::NonZero));
}

#[test]
fn merge_disjoint_squares() {
    let mut path = Path::new();
    square(&mut path, 20.0, 0.0, 10.0);
    square(&mut path, 0.0, 0.0, 10.0);

    let merged = try_to_make_multiple_sub_paths_simple(&path).unwrap();
    assert!(!merged.has_multiple_sub_paths());
    assert!(merged.is_point_inside(point(5.0, 5.0), kestrel_path::FillRule::NonZero));
    assert!(merged.is_point_inside(point(25.0, 5.0), kestrel_path::FillRule::NonZero));
    assert!(!merged.is_point_inside(point(15.0, 8.0), kestrel_path::FillRule::NonZero));
}

#[test]
fn merge_overlapping_squares() {
    let mut path = Path::new();
    square(&mut path, 0.0, 0.0, 10.0);
    square(&mut path, 5.0, 5.0, 10.0);

    assert!(try_to_make_multiple_sub_paths_simple(&path).is_err());
    assert!(path.merge_failed());
    // The failure is remembered.
    assert!(matches!(
        try_to_make_multiple_sub_paths_simple(&path),
        Err(TriangulationError::InvalidInput("the sub-paths overlap"))
    ));
}

//! Detection of self-intersecting paths.
//!
//! A left to right sweep over the vertices of a [`SweepGraph`] keeps the edges spanning
//! the sweep line sorted from bottom to top. Two edges can only intersect after they
//! become neighbours in that list, so only neighbours are ever compared (Shamos and
//! Hoey).
//!
//! Edges meeting at a shared vertex are allowed. Pairs of edges connecting the same two
//! vertices are skipped as well, since they are the corridors produced when merging
//! sub-paths.

use crate::error::PathResult;
use crate::geom::utils::orientation;
use crate::geom::{LineSegment, SegmentIntersection};
use crate::path::Path;
use crate::sweep::{EdgeId, SweepGraph, VertexId};

use alloc::vec::Vec;
use core::cmp::Ordering;

macro_rules! sweep_log {
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

/// Tests whether the segments of a path cross or overlap each other.
///
/// # Examples
///
/// ```
/// use kestrel_path::{Path, SelfIntersect};
/// use kestrel_path::math::point;
///
/// // A bow tie.
/// let mut path = Path::new();
/// path.move_to(point(0.0, 0.0)).unwrap();
/// path.line_to(point(10.0, 10.0)).unwrap();
/// path.line_to(point(10.0, 0.0)).unwrap();
/// path.line_to(point(0.0, 10.0)).unwrap();
/// path.close(true).unwrap();
///
/// let mut test = SelfIntersect::new(&path).unwrap();
/// assert!(test.is_self_intersecting().unwrap());
/// ```
pub struct SelfIntersect<'l> {
    path: &'l Path,
    graph: SweepGraph,
    active: Vec<EdgeId>,
    starting: Vec<EdgeId>,
    log: bool,
}

impl<'l> SelfIntersect<'l> {
    pub fn new(path: &'l Path) -> PathResult<Self> {
        #[cfg(all(debug_assertions, feature = "std"))]
        let log = std::env::var("KESTREL_FORCE_LOGGING").is_ok();
        #[cfg(not(all(debug_assertions, feature = "std")))]
        let log = false;

        Ok(SelfIntersect {
            path,
            graph: SweepGraph::from_path(path)?,
            active: Vec::new(),
            starting: Vec::new(),
            log,
        })
    }

    /// Enable/disable some verbose logging during the sweep.
    pub fn set_logging(&mut self, is_enabled: bool) {
        self.log = is_enabled;
    }

    pub fn graph(&self) -> &SweepGraph {
        &self.graph
    }

    /// Runs the sweep. Returns true at the first pair of intersecting edges.
    pub fn is_self_intersecting(&mut self) -> PathResult<bool> {
        if self.path.num_lines() < 3 || self.graph.is_empty() {
            return Ok(false);
        }

        self.active.clear();
        self.active.try_reserve(self.graph.edges().len())?;

        // Edges sorted by their left endpoint in sweep order.
        let mut starting = core::mem::take(&mut self.starting);
        starting.clear();
        starting.try_reserve(self.graph.edges().len())?;
        starting.extend(0..self.graph.edges().len());
        let graph = &self.graph;
        starting.sort_by_key(|&e| graph.rank(graph.edge(e).left));

        let mut next_start = 0;
        let mut result = false;
        for k in 0..self.graph.order().len() {
            let v = self.graph.order()[k];
            sweep_log!(self, "vertex {} at {:?}", v, self.graph.position(v));

            if self.remove_ending_edges(v) {
                result = true;
                break;
            }

            while next_start < starting.len() && self.graph.edge(starting[next_start]).left == v {
                let e = starting[next_start];
                next_start += 1;
                if self.insert_edge(e, v) {
                    result = true;
                    break;
                }
            }
            if result {
                break;
            }
        }

        self.starting = starting;

        Ok(result)
    }

    // Removes the edges ending at `v` and tests the edges that become neighbours.
    fn remove_ending_edges(&mut self, v: VertexId) -> bool {
        let graph = &self.graph;
        let mut first_removed = None;
        let mut i = 0;
        while i < self.active.len() {
            if graph.edge(self.active[i]).right == v {
                self.active.remove(i);
                if first_removed.is_none() {
                    first_removed = Some(i);
                }
            } else {
                i += 1;
            }
        }

        if let Some(i) = first_removed {
            if i > 0 && i < self.active.len() {
                let (below, above) = (self.active[i - 1], self.active[i]);
                if self.intersect(below, above) {
                    sweep_log!(self, "edges {} and {} intersect after removal at {}", below, above, v);
                    return true;
                }
            }
        }

        false
    }

    fn insert_edge(&mut self, e: EdgeId, v: VertexId) -> bool {
        let graph = &self.graph;
        let pos = self
            .active
            .partition_point(|&other| is_below(graph, other, e, v));
        self.active.insert(pos, e);
        sweep_log!(self, "insert edge {} at {}", e, pos);

        let edge = *graph.edge(e);

        // Skip the chains of identical edges on both sides.
        let mut below = pos;
        while below > 0 && graph.edge(self.active[below - 1]).is_identical(&edge) {
            below -= 1;
        }
        if below > 0 && self.intersect(self.active[below - 1], e) {
            sweep_log!(self, "edge {} intersects {} below it", e, self.active[below - 1]);
            return true;
        }

        let mut above = pos + 1;
        while above < self.active.len() && graph.edge(self.active[above]).is_identical(&edge) {
            above += 1;
        }
        if above < self.active.len() && self.intersect(e, self.active[above]) {
            sweep_log!(self, "edge {} intersects {} above it", e, self.active[above]);
            return true;
        }

        false
    }

    fn intersect(&self, a: EdgeId, b: EdgeId) -> bool {
        let ea = self.graph.edge(a);
        let eb = self.graph.edge(b);
        if ea.is_identical(eb) {
            return false;
        }

        let sa = LineSegment::new(self.graph.position(ea.left), self.graph.position(ea.right));
        let sb = LineSegment::new(self.graph.position(eb.left), self.graph.position(eb.right));
        let shared = ea.left == eb.left || ea.left == eb.right || ea.right == eb.left || ea.right == eb.right;

        match sa.classify_intersection(&sb) {
            SegmentIntersection::None => false,
            SegmentIntersection::Touching {
                a_endpoint_on_b,
                b_endpoint_on_a,
            } => !(shared && a_endpoint_on_b && b_endpoint_on_a),
            SegmentIntersection::Crossing | SegmentIntersection::Collinear => true,
        }
    }
}

// True if the active edge `a` is below the edge `e` starting at `v`.
fn is_below(graph: &SweepGraph, a: EdgeId, e: EdgeId, v: VertexId) -> bool {
    let ea = graph.edge(a);
    let (l, r) = (graph.position(ea.left), graph.position(ea.right));

    let mut o = orientation(l, r, graph.position(v));
    if o == 0 {
        let ee = graph.edge(e);
        let other = if ee.left == v { ee.right } else { ee.left };
        o = orientation(l, r, graph.position(other));
    }
    if o == 0 {
        return graph.edge_is_above(e, a, v) == Ordering::Greater;
    }

    o > 0
}

#[cfg(test)]
use crate::math::point;

#[cfg(test)]
fn polygon(points: &[(f32, f32)]) -> Path {
    let mut path = Path::new();
    path.move_to(point(points[0].0, points[0].1)).unwrap();
    for &(x, y) in &points[1..] {
        path.line_to(point(x, y)).unwrap();
    }
    path.close(true).unwrap();

    path
}

#[cfg(test)]
fn self_intersecting(path: &Path) -> bool {
    SelfIntersect::new(path).unwrap().is_self_intersecting().unwrap()
}

#[test]
fn simple_polygons() {
    assert!(!self_intersecting(&polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])));
    // Concave arrow.
    assert!(!self_intersecting(&polygon(&[
        (0.0, 0.0),
        (10.0, 5.0),
        (0.0, 10.0),
        (4.0, 5.0),
    ])));
    // Vertical edges and several vertices on the same vertical line.
    assert!(!self_intersecting(&polygon(&[
        (0.0, 0.0),
        (5.0, 0.0),
        (5.0, 4.0),
        (2.0, 4.0),
        (2.0, 6.0),
        (5.0, 6.0),
        (5.0, 10.0),
        (0.0, 10.0),
    ])));
}

#[test]
fn crossing_polygons() {
    assert!(self_intersecting(&polygon(&[(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0)])));
    // Pentagram.
    assert!(self_intersecting(&polygon(&[
        (50.0, 0.0),
        (79.0, 90.0),
        (2.0, 35.0),
        (98.0, 35.0),
        (21.0, 90.0),
    ])));
}

#[test]
fn touching_polygons() {
    // A vertex lying on another edge.
    assert!(self_intersecting(&polygon(&[
        (0.0, 0.0),
        (10.0, 0.0),
        (10.0, 10.0),
        (5.0, 0.0),
        (0.0, 10.0),
    ])));
    // Overlapping collinear edges.
    assert!(self_intersecting(&polygon(&[
        (0.0, 0.0),
        (10.0, 0.0),
        (10.0, 10.0),
        (8.0, 10.0),
        (8.0, 0.0),
        (4.0, 0.0),
        (0.0, 10.0),
    ])));
}

#[test]
fn too_few_lines() {
    let mut path = Path::new();
    path.move_to(point(0.0, 0.0)).unwrap();
    path.line_to(point(10.0, 0.0)).unwrap();
    assert!(!self_intersecting(&path));
}

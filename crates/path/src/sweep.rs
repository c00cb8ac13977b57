//! Vertex and edge graph swept from left to right by the self-intersection test and
//! the triangulator.
//!
//! Every sub-path becomes a ring of edges, implicitly closed. Points that are at the
//! same position share a single vertex, so rings touching each other are connected
//! through their common vertices. Vertices are numbered in order of first appearance
//! in the path, and `SweepGraph::order` lists them sorted by x and then y.

use crate::error::{PathError, PathResult};
use crate::geom::utils::{orient2d, orientation};
use crate::math::Point;
use crate::path::Path;

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::ops::Range;

/// Index of a vertex in a `SweepGraph`.
pub type VertexId = usize;
/// Index of an edge in a `SweepGraph`.
pub type EdgeId = usize;

const NONE: usize = usize::MAX;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SweepVertex {
    pub position: Point,
    /// One of the edges starting at this vertex.
    pub start_of: EdgeId,
    /// One of the edges ending at this vertex.
    pub end_of: EdgeId,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SweepEdge {
    pub from: VertexId,
    pub to: VertexId,
    /// The endpoint that comes first in sweep order.
    pub left: VertexId,
    /// The endpoint that comes last in sweep order.
    pub right: VertexId,
    /// Next edge along the ring.
    pub next: EdgeId,
    /// Previous edge along the ring.
    pub prev: EdgeId,
    pub ring: usize,
}

impl SweepEdge {
    /// Returns true if both edges connect the same two vertices, in any direction.
    #[inline]
    pub fn is_identical(&self, other: &SweepEdge) -> bool {
        self.left == other.left && self.right == other.right
    }
}

/// Lexicographic order on positions: by x and then by y.
#[inline]
pub fn compare_positions(a: Point, b: Point) -> Ordering {
    a.x.partial_cmp(&b.x)
        .unwrap_or(Ordering::Equal)
        .then(a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal))
}

#[derive(Clone, Debug, Default)]
pub struct SweepGraph {
    vertices: Vec<SweepVertex>,
    edges: Vec<SweepEdge>,
    order: Vec<VertexId>,
    rank: Vec<usize>,
    rings: Vec<Range<EdgeId>>,
}

impl SweepGraph {
    /// Builds the graph of the non-warp segments of a path.
    ///
    /// Repeated points and vertices that lie on the line joining their neighbours are
    /// removed first. Rings left with fewer than three vertices enclose nothing and
    /// are skipped.
    pub fn from_path(path: &Path) -> PathResult<Self> {
        let mut points: Vec<Point> = Vec::new();
        points.try_reserve(path.num_lines())?;
        let mut ring_ranges: Vec<Range<usize>> = Vec::new();

        let mut ring = Vec::new();
        for range in path.sub_paths() {
            ring.clear();
            ring.try_reserve(range.len() + 1)?;
            ring.push(path.line(range.start).from);
            for i in range {
                ring.push(path.line(i).to);
            }

            simplify_ring(&mut ring);
            if ring.len() < 3 {
                continue;
            }

            let start = points.len();
            points.try_reserve(ring.len())?;
            points.extend_from_slice(&ring);
            ring_ranges.push(start..points.len());
        }

        SweepGraph::from_rings(&points, &ring_ranges)
    }

    fn from_rings(points: &[Point], ring_ranges: &[Range<usize>]) -> PathResult<Self> {
        let n = points.len();
        // Vertices are addressed with 32 bit indices downstream.
        if n > u32::MAX as usize {
            return Err(PathError::Limit);
        }

        // Group equal positions. Ties are broken by index so that the first point of
        // each group is its first appearance in the path.
        let mut sorted: Vec<usize> = Vec::new();
        sorted.try_reserve(n)?;
        sorted.extend(0..n);
        sorted.sort_by(|&a, &b| compare_positions(points[a], points[b]).then(a.cmp(&b)));

        let mut representative: Vec<usize> = Vec::new();
        representative.try_reserve(n)?;
        representative.resize(n, 0);
        let mut group_start = 0;
        for k in 0..n {
            if k > 0 && points[sorted[k]] != points[sorted[group_start]] {
                group_start = k;
            }
            representative[sorted[k]] = sorted[group_start];
        }

        let mut vertex_of: Vec<VertexId> = Vec::new();
        vertex_of.try_reserve(n)?;
        vertex_of.resize(n, NONE);
        let mut vertices: Vec<SweepVertex> = Vec::new();
        for i in 0..n {
            if representative[i] == i {
                vertex_of[i] = vertices.len();
                vertices.try_reserve(1)?;
                vertices.push(SweepVertex {
                    position: points[i],
                    start_of: NONE,
                    end_of: NONE,
                });
            }
        }
        for i in 0..n {
            vertex_of[i] = vertex_of[representative[i]];
        }

        let mut order: Vec<VertexId> = Vec::new();
        order.try_reserve(vertices.len())?;
        let mut rank: Vec<usize> = Vec::new();
        rank.try_reserve(vertices.len())?;
        rank.resize(vertices.len(), 0);
        for k in 0..n {
            let i = sorted[k];
            if representative[i] == i {
                rank[vertex_of[i]] = order.len();
                order.push(vertex_of[i]);
            }
        }

        let mut edges: Vec<SweepEdge> = Vec::new();
        edges.try_reserve(n)?;
        let mut rings = Vec::new();
        rings.try_reserve(ring_ranges.len())?;
        for (ring_index, range) in ring_ranges.iter().enumerate() {
            let first_edge = edges.len();
            let m = range.len();
            for k in 0..m {
                let from = vertex_of[range.start + k];
                let to = vertex_of[range.start + (k + 1) % m];
                let (left, right) = if rank[from] < rank[to] { (from, to) } else { (to, from) };
                let id = edges.len();
                edges.push(SweepEdge {
                    from,
                    to,
                    left,
                    right,
                    next: first_edge + (k + 1) % m,
                    prev: first_edge + (k + m - 1) % m,
                    ring: ring_index,
                });
                if vertices[from].start_of == NONE {
                    vertices[from].start_of = id;
                }
                if vertices[to].end_of == NONE {
                    vertices[to].end_of = id;
                }
            }
            rings.push(first_edge..edges.len());
        }

        Ok(SweepGraph {
            vertices,
            edges,
            order,
            rank,
            rings,
        })
    }

    #[inline]
    pub fn vertices(&self) -> &[SweepVertex] {
        &self.vertices
    }

    #[inline]
    pub fn edges(&self) -> &[SweepEdge] {
        &self.edges
    }

    #[inline]
    pub fn vertex(&self, id: VertexId) -> &SweepVertex {
        &self.vertices[id]
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> &SweepEdge {
        &self.edges[id]
    }

    #[inline]
    pub fn position(&self, id: VertexId) -> Point {
        self.vertices[id].position
    }

    /// Vertices sorted by x and then y.
    #[inline]
    pub fn order(&self) -> &[VertexId] {
        &self.order
    }

    /// Position of a vertex in the sweep order.
    #[inline]
    pub fn rank(&self, id: VertexId) -> usize {
        self.rank[id]
    }

    /// Edge ranges of the rings, in path order.
    #[inline]
    pub fn rings(&self) -> &[Range<EdgeId>] {
        &self.rings
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    // The vertex reached by walking from `e` beyond `at`, and the edge used.
    fn continue_beyond(&self, e: EdgeId, at: VertexId) -> (EdgeId, VertexId) {
        let edge = &self.edges[e];
        if edge.to == at {
            let next = edge.next;
            (next, self.edges[next].to)
        } else {
            let prev = edge.prev;
            (prev, self.edges[prev].from)
        }
    }

    /// Compares the heights of two edges that both span the sweep position of `at`.
    ///
    /// Returns `Greater` if `a` is above `b`, y pointing up. Edges lying on the same
    /// line are ordered by walking along both chains beyond their right endpoints
    /// until they diverge. Edges that never diverge compare equal.
    pub fn edge_is_above(&self, a: EdgeId, b: EdgeId, at: VertexId) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }

        let ea = &self.edges[a];
        let eb = &self.edges[b];
        let (al, ar) = (self.position(ea.left), self.position(ea.right));
        let (bl, br) = (self.position(eb.left), self.position(eb.right));

        let s1 = orientation(al, ar, bl);
        let s2 = orientation(al, ar, br);
        if s1 != 0 || s2 != 0 {
            if s1 >= 0 && s2 >= 0 {
                return Ordering::Less;
            }
            if s1 <= 0 && s2 <= 0 {
                return Ordering::Greater;
            }

            let t1 = orientation(bl, br, al);
            let t2 = orientation(bl, br, ar);
            if t1 >= 0 && t2 >= 0 {
                return Ordering::Greater;
            }
            if t1 <= 0 && t2 <= 0 {
                return Ordering::Less;
            }

            // Crossing edges: compare them at the sweep position.
            let p = self.position(at);
            let ya = y_at(al, ar, p.x as f64);
            let yb = y_at(bl, br, p.x as f64);
            return ya.partial_cmp(&yb).unwrap_or(Ordering::Equal);
        }

        // Collinear. Walk along both chains until they take different directions.
        let (mut edge_a, mut edge_b) = (a, b);
        let (mut va, mut vb) = (ea.right, eb.right);
        let (mut from_a, mut from_b) = (ea.left, eb.left);
        for _ in 0..self.edges.len() {
            if va != vb {
                // Chains of different lengths along the same line.
                return Ordering::Equal;
            }
            let (next_a, qa) = self.continue_beyond(edge_a, va);
            let (next_b, qb) = self.continue_beyond(edge_b, vb);
            if next_a == a || next_b == b {
                break;
            }

            let r = self.position(va);
            let pa = self.position(qa);
            let pb = self.position(qb);
            if pa != pb {
                let base_a = self.position(from_a);
                let base_b = self.position(from_b);
                let oa = orientation(base_a, r, pa);
                let ob = orientation(base_b, r, pb);
                if oa != ob {
                    return oa.cmp(&ob);
                }
                return match orientation(r, pb, pa) {
                    1 => Ordering::Greater,
                    -1 => Ordering::Less,
                    _ => Ordering::Equal,
                };
            }

            from_a = va;
            from_b = vb;
            va = qa;
            vb = qb;
            edge_a = next_a;
            edge_b = next_b;
        }

        Ordering::Equal
    }
}

fn y_at(a: Point, b: Point, x: f64) -> f64 {
    let (ax, ay, bx, by) = (a.x as f64, a.y as f64, b.x as f64, b.y as f64);
    if bx == ax {
        return ay;
    }

    ay + (by - ay) * (x - ax) / (bx - ax)
}

/// Removes repeated points and vertices on the line joining their neighbours, until
/// none are left. The ring is implicitly closed.
pub fn simplify_ring(ring: &mut Vec<Point>) {
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }

    // Single pass with a stack, then fix the wrap around.
    let mut len = 0;
    for i in 0..ring.len() {
        let p = ring[i];
        if len > 0 && ring[len - 1] == p {
            continue;
        }
        while len >= 2 && orient2d(ring[len - 2], ring[len - 1], p) == 0.0 {
            len -= 1;
        }
        ring[len] = p;
        len += 1;
    }
    ring.truncate(len);

    loop {
        let n = ring.len();
        if n < 3 {
            return;
        }
        if ring[0] == ring[n - 1] || orient2d(ring[n - 2], ring[n - 1], ring[0]) == 0.0 {
            ring.pop();
            continue;
        }
        if orient2d(ring[n - 1], ring[0], ring[1]) == 0.0 {
            ring.remove(0);
            continue;
        }
        break;
    }
}

#[cfg(test)]
use crate::math::point;

#[test]
fn simplify_collinear_and_spikes() {
    let mut ring = alloc::vec![
        point(0.0, 0.0),
        point(5.0, 0.0),
        point(10.0, 0.0),
        point(10.0, 0.0),
        point(10.0, 10.0),
        point(10.0, 15.0),
        point(10.0, 10.0),
        point(0.0, 10.0),
        point(0.0, 0.0),
    ];
    simplify_ring(&mut ring);
    assert_eq!(
        ring,
        alloc::vec![point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0), point(0.0, 10.0)]
    );

    let mut flat = alloc::vec![point(0.0, 0.0), point(1.0, 1.0), point(2.0, 2.0)];
    simplify_ring(&mut flat);
    assert!(flat.len() < 3);
}

#[test]
fn shared_vertices() {
    // Two squares sharing a corner.
    let mut path = Path::new();
    path.move_to(point(0.0, 0.0)).unwrap();
    path.line_to(point(1.0, 0.0)).unwrap();
    path.line_to(point(1.0, 1.0)).unwrap();
    path.line_to(point(0.0, 1.0)).unwrap();
    path.close(false).unwrap();
    path.move_to(point(1.0, 1.0)).unwrap();
    path.line_to(point(2.0, 1.0)).unwrap();
    path.line_to(point(2.0, 2.0)).unwrap();
    path.line_to(point(1.0, 2.0)).unwrap();
    path.close(false).unwrap();

    let graph = SweepGraph::from_path(&path).unwrap();
    assert_eq!(graph.rings().len(), 2);
    assert_eq!(graph.edges().len(), 8);
    assert_eq!(graph.vertices().len(), 7);
    assert_eq!(graph.position(graph.order()[0]), point(0.0, 0.0));
    assert_eq!(graph.position(graph.order()[6]), point(2.0, 2.0));

    for e in graph.edges() {
        assert_eq!(graph.edge(e.next).from, e.to);
        assert_eq!(graph.edge(e.prev).to, e.from);
        assert!(graph.rank(e.left) < graph.rank(e.right));
    }
}

#[test]
fn edges_above_and_below() {
    let mut path = Path::new();
    path.move_to(point(0.0, 0.0)).unwrap();
    path.line_to(point(10.0, 0.0)).unwrap();
    path.line_to(point(10.0, 10.0)).unwrap();
    path.line_to(point(0.0, 10.0)).unwrap();
    path.close(false).unwrap();

    let graph = SweepGraph::from_path(&path).unwrap();
    // Bottom edge (0, 0) -> (10, 0) and top edge (10, 10) -> (0, 10).
    let origin = graph.order()[0];
    assert_eq!(graph.edge_is_above(2, 0, origin), Ordering::Greater);
    assert_eq!(graph.edge_is_above(0, 2, origin), Ordering::Less);
    assert_eq!(graph.edge_is_above(0, 0, origin), Ordering::Equal);
}

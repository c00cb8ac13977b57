//! Triangulation of simple polygons.
//!
//! The polygon is first decomposed into x-monotone pieces with a left to right sweep
//! that adds diagonals at the reflex vertices: a vertex with nothing on its left inside
//! the polygon is connected to the last vertex seen in the region it splits, and a
//! vertex with nothing on its right is recorded as the pending helper of its region
//! and connected to the next vertex that reaches that region. Each piece is then
//! walked and handed to the monotone triangulator.
//!
//! The edges are oriented so that the filled area is on their left, y pointing up.
//! Holes are therefore handled like any other boundary, which is what makes the
//! corridors produced when merging sub-paths harmless: both sides of a corridor cancel
//! out before the sweep.

use crate::error::{InternalError, TriangulationError, TriangulationResult};
use crate::math::Point;
use crate::merge::try_to_make_multiple_sub_paths_simple;
use crate::monotone::{MonotoneTriangulator, Side};

use kestrel_path::geom::utils::{orient2d, orientation};
use kestrel_path::sweep::{simplify_ring, SweepGraph, VertexId};
use kestrel_path::{Category, Path};

use alloc::vec::Vec;
use core::cmp::Ordering;

macro_rules! tri_log {
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

/// Parameters for the triangulator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct TriangulatorOptions {
    /// Whether paths made of several sub-paths are merged into a single polygon
    /// before being triangulated. They are rejected otherwise.
    ///
    /// Default value: `true`.
    pub merge_sub_paths: bool,

    /// Enables verbose logging of the sweep.
    ///
    /// Default value: `false`.
    pub log: bool,
}

impl TriangulatorOptions {
    pub const DEFAULT: Self = TriangulatorOptions {
        merge_sub_paths: true,
        log: false,
    };

    #[inline]
    pub const fn with_merge_sub_paths(mut self, merge: bool) -> Self {
        self.merge_sub_paths = merge;
        self
    }

    #[inline]
    pub const fn with_logging(mut self, log: bool) -> Self {
        self.log = log;
        self
    }
}

impl Default for TriangulatorOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Output of the triangulator.
///
/// `indices` holds three indices into `vertices` per triangle. Triangles are
/// counter-clockwise with y pointing up, which is clockwise on a y-down screen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Triangulation {
    pub vertices: Vec<Point>,
    pub indices: Vec<u32>,
}

impl Triangulation {
    pub fn new() -> Self {
        Triangulation::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterates over the triangles as triplets of positions.
    pub fn triangles(&self) -> impl Iterator<Item = [Point; 3]> + '_ {
        self.indices.chunks(3).map(move |t| {
            [
                self.vertices[t[0] as usize],
                self.vertices[t[1] as usize],
                self.vertices[t[2] as usize],
            ]
        })
    }
}

#[derive(Copy, Clone, Debug)]
struct Edge {
    from: VertexId,
    to: VertexId,
    left: VertexId,
    right: VertexId,
}

impl Edge {
    // The filled area is on the left of the edge, so above it when going right.
    #[inline]
    fn interior_above(&self) -> bool {
        self.from == self.left
    }
}

#[derive(Copy, Clone, Debug)]
struct Helper {
    vertex: VertexId,
    // The vertex has nothing on its right and waits for a diagonal.
    merge: bool,
}

#[derive(Copy, Clone, Debug)]
struct HalfEdge {
    from: VertexId,
    to: VertexId,
    // Has the filled area on its left.
    inner: bool,
    visited: bool,
}

/// A triangulator for paths made of simple, non overlapping polygons.
///
/// # Examples
///
/// ```
/// use kestrel_tessellation::Triangulator;
/// use kestrel_tessellation::path::Path;
/// use kestrel_tessellation::math::point;
///
/// let mut path = Path::new();
/// path.move_to(point(0.0, 0.0)).unwrap();
/// path.line_to(point(10.0, 0.0)).unwrap();
/// path.line_to(point(5.0, 5.0)).unwrap();
/// path.line_to(point(10.0, 10.0)).unwrap();
/// path.line_to(point(0.0, 10.0)).unwrap();
/// path.close(true).unwrap();
///
/// let mut triangulator = Triangulator::new();
/// let triangulation = triangulator.triangulate(&path).unwrap();
///
/// assert_eq!(triangulation.num_triangles(), 3);
/// ```
pub struct Triangulator {
    options: TriangulatorOptions,
    log: bool,

    edges: Vec<Edge>,
    status: Vec<usize>,
    helpers: Vec<Helper>,
    starting: Vec<usize>,
    diagonals: Vec<(VertexId, VertexId)>,
    half_edges: Vec<HalfEdge>,
    offsets: Vec<usize>,
    face: Vec<VertexId>,
    monotone: MonotoneTriangulator,
}

impl Default for Triangulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Triangulator {
    pub fn new() -> Self {
        Self::with_options(TriangulatorOptions::DEFAULT)
    }

    pub fn with_options(options: TriangulatorOptions) -> Self {
        #[cfg(all(debug_assertions, feature = "std"))]
        let log = options.log || std::env::var("KESTREL_FORCE_LOGGING").is_ok();
        #[cfg(not(all(debug_assertions, feature = "std")))]
        let log = options.log;

        Triangulator {
            options,
            log,
            edges: Vec::new(),
            status: Vec::new(),
            helpers: Vec::new(),
            starting: Vec::new(),
            diagonals: Vec::new(),
            half_edges: Vec::new(),
            offsets: Vec::new(),
            face: Vec::new(),
            monotone: MonotoneTriangulator::new(),
        }
    }

    pub fn options(&self) -> &TriangulatorOptions {
        &self.options
    }

    /// Enable/disable some verbose logging during the triangulation.
    pub fn set_logging(&mut self, is_enabled: bool) {
        self.log = is_enabled;
    }

    pub fn triangulate(&mut self, path: &Path) -> TriangulationResult<Triangulation> {
        let mut output = Triangulation::new();
        self.triangulate_into(path, &mut output)?;

        Ok(output)
    }

    /// Triangulates a path, replacing the content of `output`.
    ///
    /// Convex paths are triangulated as a fan. Paths with several sub-paths are merged
    /// into a single polygon first if the options allow it. Self-intersecting paths are
    /// rejected.
    pub fn triangulate_into(&mut self, path: &Path, output: &mut Triangulation) -> TriangulationResult<()> {
        output.clear();

        let n = path.num_lines();
        if path.has_multiple_sub_paths() || (0..n).any(|i| path.is_line_warp(i)) {
            if !self.options.merge_sub_paths {
                return Err(TriangulationError::InvalidInput("the path has several sub-paths"));
            }

            let merged = try_to_make_multiple_sub_paths_simple(path)?;
            tri_log!(self, "merged {} sub-paths into {} lines", path.sub_paths().count(), merged.num_lines());

            return self.triangulate_polygon(&merged, output);
        }

        match path.category()? {
            Category::Convex => self.triangulate_convex(path, output),
            Category::Simple => self.triangulate_polygon(path, output),
            Category::Complex => Err(TriangulationError::InvalidInput("the path intersects itself")),
        }
    }

    fn triangulate_convex(&mut self, path: &Path, output: &mut Triangulation) -> TriangulationResult<()> {
        if path.num_lines() == 0 {
            return Ok(());
        }

        let ring = &mut output.vertices;
        ring.try_reserve(path.num_lines() + 1)?;
        ring.push(path.line(0).from);
        for i in 0..path.num_lines() {
            ring.push(path.line(i).to);
        }
        simplify_ring(ring);
        if ring.len() < 3 {
            ring.clear();
            return Ok(());
        }

        let mut area = 0.0;
        for i in 1..ring.len() - 1 {
            area += orient2d(ring[0], ring[i], ring[i + 1]);
        }

        let count = ring.len() as u32;
        output.indices.try_reserve(3 * (ring.len() - 2))?;
        for i in 1..count - 1 {
            if area > 0.0 {
                output.indices.extend_from_slice(&[0, i, i + 1]);
            } else {
                output.indices.extend_from_slice(&[0, i + 1, i]);
            }
        }
        tri_log!(self, "fan of {} triangles", output.num_triangles());

        Ok(())
    }

    fn triangulate_polygon(&mut self, path: &Path, output: &mut Triangulation) -> TriangulationResult<()> {
        let graph = SweepGraph::from_path(path)?;

        output.vertices.try_reserve(graph.vertices().len())?;
        output.vertices.extend(graph.vertices().iter().map(|v| v.position));

        self.build_edges(&graph)?;
        if self.edges.is_empty() {
            output.clear();
            return Ok(());
        }

        let result = self
            .decompose(&graph)
            .and_then(|_| self.build_half_edges(&graph))
            .and_then(|_| self.triangulate_faces(&graph, &mut output.indices));
        if let Err(TriangulationError::Internal(internal)) = result {
            log::error!("triangulation failed: {:?}", internal);
            debug_assert!(false, "{:?}", internal);
        }
        result?;

        tri_log!(
            self,
            "{} vertices, {} diagonals, {} triangles",
            graph.vertices().len(),
            self.diagonals.len(),
            output.num_triangles()
        );

        Ok(())
    }

    // Copies the edges of the graph, removes the pairs of coincident edges going in
    // opposite directions and orients the rest so that the area is positive.
    fn build_edges(&mut self, graph: &SweepGraph) -> TriangulationResult<()> {
        let mut edges = core::mem::take(&mut self.edges);
        edges.clear();
        edges.try_reserve(graph.edges().len())?;
        let mut sorted: Vec<Edge> = Vec::new();
        sorted.try_reserve(graph.edges().len())?;
        sorted.extend(graph.edges().iter().map(|e| Edge {
            from: e.from,
            to: e.to,
            left: e.left,
            right: e.right,
        }));
        sorted.sort_by_key(|e| (e.left, e.right));

        let mut i = 0;
        while i < sorted.len() {
            let mut j = i;
            let mut forward = 0i32;
            while j < sorted.len() && sorted[j].left == sorted[i].left && sorted[j].right == sorted[i].right {
                if sorted[j].from == sorted[j].left {
                    forward += 1;
                } else {
                    forward -= 1;
                }
                j += 1;
            }

            match forward {
                0 => {
                    tri_log!(self, "cancel {} edges between {} and {}", j - i, sorted[i].left, sorted[i].right);
                }
                1 | -1 => {
                    let mut edge = sorted[i];
                    if (forward > 0) != (edge.from == edge.left) {
                        core::mem::swap(&mut edge.from, &mut edge.to);
                    }
                    edges.push(edge);
                }
                _ => {
                    self.edges = edges;
                    return Err(TriangulationError::InvalidInput("the path has overlapping edges"));
                }
            }
            i = j;
        }

        if edges.is_empty() {
            self.edges = edges;
            return Ok(());
        }

        let origin = graph.position(0);
        let mut area = 0.0;
        for e in &edges {
            area += orient2d(origin, graph.position(e.from), graph.position(e.to));
        }
        if area == 0.0 {
            edges.clear();
        } else if area < 0.0 {
            for e in &mut edges {
                core::mem::swap(&mut e.from, &mut e.to);
            }
        }

        self.edges = edges;

        Ok(())
    }

    // Sweeps the vertices from left to right and records the diagonals that split the
    // polygon into x-monotone pieces.
    fn decompose(&mut self, graph: &SweepGraph) -> TriangulationResult<()> {
        let edges = &self.edges;

        self.diagonals.clear();
        self.status.clear();
        self.status.try_reserve(edges.len())?;
        self.helpers.clear();
        self.helpers.try_reserve(edges.len())?;
        self.helpers.resize(edges.len(), Helper { vertex: 0, merge: false });

        self.starting.clear();
        self.starting.try_reserve(edges.len())?;
        self.starting.extend(0..edges.len());
        self.starting.sort_by_key(|&e| graph.rank(edges[e].left));

        let mut next_start = 0;
        for k in 0..graph.order().len() {
            let v = graph.order()[k];
            let p = graph.position(v);

            // Edges ending here.
            let mut has_left = false;
            let mut i = 0;
            while i < self.status.len() {
                let e = self.status[i];
                if edges[e].right != v {
                    i += 1;
                    continue;
                }

                has_left = true;
                let helper = self.helpers[e];
                if edges[e].interior_above() && helper.merge {
                    self.diagonals.try_reserve(1)?;
                    self.diagonals.push((v, helper.vertex));
                }
                self.status.remove(i);
            }

            // Edges starting here, sorted from bottom to top.
            let group_start = next_start;
            while next_start < self.starting.len() && edges[self.starting[next_start]].left == v {
                next_start += 1;
            }
            let group = &mut self.starting[group_start..next_start];
            group.sort_by(|&a, &b| {
                let ta = graph.position(other_end(&edges[a], v));
                let tb = graph.position(other_end(&edges[b], v));
                match orientation(p, ta, tb) {
                    1 => Ordering::Less,
                    -1 => Ordering::Greater,
                    _ => Ordering::Equal,
                }
            });
            let has_right = !group.is_empty();

            if !has_left && !has_right {
                continue;
            }

            let pos = self.status.partition_point(|&e| {
                let edge = &edges[e];
                orientation(graph.position(edge.left), graph.position(edge.right), p) > 0
            });

            if pos > 0 {
                let below = self.status[pos - 1];
                if edges[below].interior_above() {
                    let helper = self.helpers[below];
                    if helper.merge || !has_left {
                        tri_log!(self, "diagonal {} - {}", v, helper.vertex);
                        self.diagonals.try_reserve(1)?;
                        self.diagonals.push((v, helper.vertex));
                    }
                    self.helpers[below] = Helper {
                        vertex: v,
                        merge: !has_right,
                    };
                }
            }

            for (offset, &e) in self.starting[group_start..next_start].iter().enumerate() {
                self.status.insert(pos + offset, e);
                self.helpers[e] = Helper { vertex: v, merge: false };
            }

            // Active edges pair up into trapezoids, each made of a lower edge with the
            // area above it and the upper edge that follows it.
            if self.status.len() % 2 != 0 {
                tri_log!(self, "{} active edges after vertex {}", self.status.len(), v);
                return Err(InternalError::UnpairedActiveEdge.into());
            }
        }

        Ok(())
    }

    // Half-edges around each vertex, sorted counter-clockwise.
    fn build_half_edges(&mut self, graph: &SweepGraph) -> TriangulationResult<()> {
        for d in &mut self.diagonals {
            if d.0 > d.1 {
                *d = (d.1, d.0);
            }
        }
        self.diagonals.sort_unstable();
        self.diagonals.dedup();

        let half_edges = &mut self.half_edges;
        half_edges.clear();
        half_edges.try_reserve(2 * (self.edges.len() + self.diagonals.len()))?;
        for e in &self.edges {
            half_edges.push(HalfEdge {
                from: e.from,
                to: e.to,
                inner: true,
                visited: false,
            });
            half_edges.push(HalfEdge {
                from: e.to,
                to: e.from,
                inner: false,
                visited: false,
            });
        }
        for &(a, b) in &self.diagonals {
            half_edges.push(HalfEdge {
                from: a,
                to: b,
                inner: true,
                visited: false,
            });
            half_edges.push(HalfEdge {
                from: b,
                to: a,
                inner: true,
                visited: false,
            });
        }

        half_edges.sort_by(|a, b| {
            a.from.cmp(&b.from).then_with(|| {
                let center = graph.position(a.from);
                compare_angles(center, graph.position(a.to), graph.position(b.to))
            })
        });

        let offsets = &mut self.offsets;
        offsets.clear();
        offsets.try_reserve(graph.vertices().len() + 1)?;
        let mut k = 0;
        for v in 0..=graph.vertices().len() {
            while k < half_edges.len() && half_edges[k].from < v {
                k += 1;
            }
            offsets.push(k);
        }

        Ok(())
    }

    // Walks the faces on the left of the inner half-edges and triangulates them.
    fn triangulate_faces(&mut self, graph: &SweepGraph, output: &mut Vec<u32>) -> TriangulationResult<()> {
        let mut face = core::mem::take(&mut self.face);
        let mut result = Ok(());

        for start in 0..self.half_edges.len() {
            if !self.half_edges[start].inner || self.half_edges[start].visited {
                continue;
            }

            face.clear();
            if let Err(e) = self.walk_face(start, &mut face) {
                result = Err(e);
                break;
            }
            if let Err(e) = self.triangulate_face(graph, &face, output) {
                result = Err(e);
                break;
            }
        }

        self.face = face;

        result
    }

    fn walk_face(&mut self, start: usize, face: &mut Vec<VertexId>) -> TriangulationResult<()> {
        let mut current = start;
        loop {
            self.half_edges[current].visited = true;
            face.try_reserve(1)?;
            face.push(self.half_edges[current].from);
            if face.len() > self.half_edges.len() {
                return Err(InternalError::InvalidFace.into());
            }

            let a = self.half_edges[current].from;
            let b = self.half_edges[current].to;
            let range = self.offsets[b]..self.offsets[b + 1];
            let back = match range.clone().find(|&k| self.half_edges[k].to == a) {
                Some(back) => back,
                None => return Err(InternalError::InvalidFace.into()),
            };

            // The next edge clockwise from the one we came from.
            let next = if back == range.start { range.end - 1 } else { back - 1 };
            if next == start {
                return Ok(());
            }
            if !self.half_edges[next].inner || self.half_edges[next].visited {
                tri_log!(self, "invalid face at vertex {}", b);
                return Err(InternalError::InvalidFace.into());
            }

            current = next;
        }
    }

    fn triangulate_face(&mut self, graph: &SweepGraph, face: &[VertexId], output: &mut Vec<u32>) -> TriangulationResult<()> {
        let n = face.len();
        if n < 3 {
            return Err(InternalError::InvalidFace.into());
        }
        if n == 3 {
            output.try_reserve(3)?;
            output.extend(face.iter().map(|&v| v as u32));
            return Ok(());
        }

        let mut lo = 0;
        let mut hi = 0;
        for i in 1..n {
            if graph.rank(face[i]) < graph.rank(face[lo]) {
                lo = i;
            }
            if graph.rank(face[i]) > graph.rank(face[hi]) {
                hi = i;
            }
        }

        // The lower chain goes forward from the leftmost vertex, the upper chain
        // backward.
        let mut lower = (lo + 1) % n;
        let mut upper = (lo + n - 1) % n;
        let mut last_lower = graph.rank(face[lo]);
        let mut last_upper = last_lower;

        self.monotone.begin(graph.position(face[lo]), face[lo] as u32)?;
        while lower != hi || upper != hi {
            let take_lower = if lower == hi {
                false
            } else if upper == hi {
                true
            } else {
                graph.rank(face[lower]) < graph.rank(face[upper])
            };

            let (index, side) = if take_lower {
                let index = lower;
                if graph.rank(face[index]) < last_lower {
                    return Err(InternalError::NonMonotoneFace.into());
                }
                last_lower = graph.rank(face[index]);
                lower = (lower + 1) % n;
                (index, Side::Lower)
            } else {
                let index = upper;
                if graph.rank(face[index]) < last_upper {
                    return Err(InternalError::NonMonotoneFace.into());
                }
                last_upper = graph.rank(face[index]);
                upper = (upper + n - 1) % n;
                (index, Side::Upper)
            };

            let v = face[index];
            self.monotone.vertex(graph.position(v), v as u32, side, output)?;
        }
        self.monotone.end(graph.position(face[hi]), face[hi] as u32, output)
    }
}

#[inline]
fn other_end(edge: &Edge, v: VertexId) -> VertexId {
    if edge.from == v {
        edge.to
    } else {
        edge.from
    }
}

// Counter-clockwise order of the directions from `center` to `a` and `b`, starting
// from the positive x axis.
fn compare_angles(center: Point, a: Point, b: Point) -> Ordering {
    let (ax, ay) = (a.x as f64 - center.x as f64, a.y as f64 - center.y as f64);
    let (bx, by) = (b.x as f64 - center.x as f64, b.y as f64 - center.y as f64);
    let half = |x: f64, y: f64| if y > 0.0 || (y == 0.0 && x > 0.0) { 0 } else { 1 };

    half(ax, ay).cmp(&half(bx, by)).then_with(|| {
        let cross = ax * by - ay * bx;
        if cross > 0.0 {
            Ordering::Less
        } else if cross < 0.0 {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    })
}

#[test]
fn unpaired_active_edge() {
    use crate::math::point;

    let mut path = Path::new();
    path.move_to(point(0.0, 0.0)).unwrap();
    path.line_to(point(10.0, 0.0)).unwrap();
    path.line_to(point(10.0, 10.0)).unwrap();
    path.line_to(point(0.0, 10.0)).unwrap();
    path.close(true).unwrap();

    let graph = SweepGraph::from_path(&path).unwrap();
    let mut triangulator = Triangulator::new();
    triangulator.build_edges(&graph).unwrap();
    assert_eq!(triangulator.edges.len(), 4);
    triangulator.decompose(&graph).unwrap();

    // Without the bottom side, the left side starts alone.
    let origin = graph.order()[0];
    triangulator.edges.retain(|e| !(e.left == origin && graph.position(e.right).y == 0.0));
    assert_eq!(triangulator.edges.len(), 3);
    assert_eq!(
        triangulator.decompose(&graph),
        Err(TriangulationError::Internal(InternalError::UnpairedActiveEdge))
    );
}

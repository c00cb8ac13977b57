use crate::error::TriangulationResult;
use crate::math::{point, Point};
use kestrel_path::geom::utils::orient2d;

use alloc::vec::Vec;

/// The chain of a monotone polygon a vertex belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Lower,
    Upper,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Lower => Side::Upper,
            Side::Upper => Side::Lower,
        }
    }
}

#[derive(Copy, Clone, Debug)]
struct MonotoneVertex {
    pos: Point,
    id: u32,
    side: Side,
}

/// Generates the triangles of an x-monotone polygon from its vertices, given in sweep
/// order and tagged with their chain.
///
/// Triangles are written counter-clockwise, y pointing up.
pub(crate) struct MonotoneTriangulator {
    stack: Vec<MonotoneVertex>,
    previous: MonotoneVertex,
}

impl MonotoneTriangulator {
    pub fn new() -> Self {
        MonotoneTriangulator {
            stack: Vec::new(),
            // Some placeholder value that will be replaced right away.
            previous: MonotoneVertex {
                pos: point(0.0, 0.0),
                id: 0,
                side: Side::Lower,
            },
        }
    }

    pub fn begin(&mut self, pos: Point, id: u32) -> TriangulationResult<()> {
        let first = MonotoneVertex {
            pos,
            id,
            side: Side::Lower,
        };
        self.previous = first;

        self.stack.clear();
        self.stack.try_reserve(16)?;
        self.stack.push(first);

        Ok(())
    }

    pub fn vertex(&mut self, pos: Point, id: u32, side: Side, output: &mut Vec<u32>) -> TriangulationResult<()> {
        self.monotone_vertex(MonotoneVertex { pos, id, side }, output)
    }

    fn monotone_vertex(&mut self, current: MonotoneVertex, output: &mut Vec<u32>) -> TriangulationResult<()> {
        debug_assert!(!self.stack.is_empty());

        if current.side != self.previous.side {
            // Fan the whole stack from the current vertex.
            for i in 0..(self.stack.len() - 1) {
                let mut a = self.stack[i];
                let mut b = self.stack[i + 1];
                if orient2d(a.pos, b.pos, current.pos) < 0.0 {
                    core::mem::swap(&mut a, &mut b);
                }

                push_triangle(output, a.id, b.id, current.id)?;
            }
            self.stack.clear();
            self.stack.push(self.previous);
        } else {
            let mut last_popped = self.stack.pop();
            while let Some(a) = last_popped {
                let b = match self.stack.last() {
                    Some(b) => *b,
                    None => break,
                };
                let turn = orient2d(b.pos, a.pos, current.pos);
                let convex = match current.side {
                    Side::Lower => turn > 0.0,
                    Side::Upper => turn < 0.0,
                };
                if !convex {
                    break;
                }

                match current.side {
                    Side::Lower => push_triangle(output, b.id, a.id, current.id)?,
                    Side::Upper => push_triangle(output, b.id, current.id, a.id)?,
                }
                last_popped = self.stack.pop();
            }
            if let Some(item) = last_popped {
                self.stack.push(item);
            }
        }

        self.stack.try_reserve(1)?;
        self.stack.push(current);
        self.previous = current;

        Ok(())
    }

    pub fn end(&mut self, pos: Point, id: u32, output: &mut Vec<u32>) -> TriangulationResult<()> {
        let side = self.previous.side.opposite();
        self.vertex(pos, id, side, output)?;
        self.stack.clear();

        Ok(())
    }
}

fn push_triangle(output: &mut Vec<u32>, a: u32, b: u32, c: u32) -> TriangulationResult<()> {
    debug_assert!(a != b);
    debug_assert!(b != c);
    debug_assert!(a != c);

    output.try_reserve(3)?;
    output.push(a);
    output.push(b);
    output.push(c);

    Ok(())
}

#[cfg(test)]
fn positions(output: &[u32], points: &[Point]) -> Vec<[Point; 3]> {
    output
        .chunks(3)
        .map(|t| [points[t[0] as usize], points[t[1] as usize], points[t[2] as usize]])
        .collect()
}

#[test]
fn test_monotone_triangulation() {
    {
        // Square.
        let points = [point(0.0, 0.0), point(0.0, 1.0), point(1.0, 0.0), point(1.0, 1.0)];
        let mut output = Vec::new();
        let mut tess = MonotoneTriangulator::new();
        tess.begin(points[0], 0).unwrap();
        tess.vertex(points[1], 1, Side::Upper, &mut output).unwrap();
        tess.vertex(points[2], 2, Side::Lower, &mut output).unwrap();
        tess.end(points[3], 3, &mut output).unwrap();
        assert_eq!(output.len(), 6);
        for t in positions(&output, &points) {
            assert!(orient2d(t[0], t[1], t[2]) > 0.0);
        }
    }
    {
        // Reflex vertices along the lower chain.
        let points = [
            point(0.0, 0.0),
            point(1.0, -1.0),
            point(2.0, 1.0),
            point(3.0, -1.0),
            point(4.0, 1.0),
            point(5.0, 5.0),
            point(6.0, 0.0),
        ];
        let mut output = Vec::new();
        let mut tess = MonotoneTriangulator::new();
        tess.begin(points[0], 0).unwrap();
        tess.vertex(points[1], 1, Side::Lower, &mut output).unwrap();
        tess.vertex(points[2], 2, Side::Lower, &mut output).unwrap();
        tess.vertex(points[3], 3, Side::Lower, &mut output).unwrap();
        tess.vertex(points[4], 4, Side::Lower, &mut output).unwrap();
        tess.vertex(points[5], 5, Side::Upper, &mut output).unwrap();
        tess.end(points[6], 6, &mut output).unwrap();
        assert_eq!(output.len(), 15);
        for t in positions(&output, &points) {
            assert!(orient2d(t[0], t[1], t[2]) > 0.0);
        }
    }
    {
        // Reflex vertices along the upper chain.
        let points = [
            point(0.0, 0.0),
            point(1.0, 3.0),
            point(2.0, 1.0),
            point(3.0, 3.0),
            point(4.0, 1.0),
            point(5.0, -3.0),
            point(6.0, 0.0),
        ];
        let mut output = Vec::new();
        let mut tess = MonotoneTriangulator::new();
        tess.begin(points[0], 0).unwrap();
        tess.vertex(points[1], 1, Side::Upper, &mut output).unwrap();
        tess.vertex(points[2], 2, Side::Upper, &mut output).unwrap();
        tess.vertex(points[3], 3, Side::Upper, &mut output).unwrap();
        tess.vertex(points[4], 4, Side::Upper, &mut output).unwrap();
        tess.vertex(points[5], 5, Side::Lower, &mut output).unwrap();
        tess.end(points[6], 6, &mut output).unwrap();
        assert_eq!(output.len(), 15);
        for t in positions(&output, &points) {
            assert!(orient2d(t[0], t[1], t[2]) > 0.0);
        }
    }
}

use crate::error::PathResult;
use crate::geom::utils::{cross_wide, dot_wide};
use crate::math::Vector;
use crate::path::Path;
use crate::self_intersect::SelfIntersect;

use alloc::vec::Vec;

/// Classification of the filled shape of a path.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Category {
    /// A single convex polygon.
    Convex,
    /// A single polygon without self-intersections.
    Simple,
    /// Self-intersecting, or made of several sub-paths.
    Complex,
}

// Counts the direction reversals along the x axis (or the y axis for vertical
// vectors). A closed polygon that reverses more than twice winds more than once.
#[derive(Default)]
struct DirectionCounter {
    last: i32,
    changes: usize,
}

impl DirectionCounter {
    fn add(&mut self, v: Vector) {
        let dir = if v.x > 0.0 {
            -1
        } else if v.x < 0.0 {
            1
        } else if v.y > 0.0 {
            -1
        } else if v.y < 0.0 {
            1
        } else {
            0
        };
        if dir == -self.last && dir != 0 {
            self.changes += 1;
        }
        self.last = dir;
    }
}

impl Path {
    /// Returns the category of the path, computing it if needed.
    ///
    /// Paths made of several sub-paths are always complex.
    pub fn category(&self) -> PathResult<Category> {
        if let Some(category) = self.category.get() {
            return Ok(category);
        }

        let category = self.determine_category()?;
        self.category.set(Some(category));

        Ok(category)
    }

    /// Marks the path as convex without checking it, until the next mutation.
    pub fn force_convex(&self) {
        self.category.set(Some(Category::Convex));
    }

    fn determine_category(&self) -> PathResult<Category> {
        let n = self.num_lines();
        if self.has_multiple_sub_paths() || (0..n).any(|i| self.is_line_warp(i)) {
            return Ok(Category::Complex);
        }

        if self.is_convex()? {
            return Ok(Category::Convex);
        }

        if SelfIntersect::new(self)?.is_self_intersecting()? {
            Ok(Category::Complex)
        } else {
            Ok(Category::Simple)
        }
    }

    // Single pass over the directions of the segments, including the implicit closing
    // segment: every turn must have the same sign.
    fn is_convex(&self) -> PathResult<bool> {
        let n = self.num_lines();
        let mut directions = Vec::new();
        directions.try_reserve(n + 1)?;
        for i in 0..n {
            let v = self.line(i).to_vector();
            if v.x != 0.0 || v.y != 0.0 {
                directions.push(v);
            }
        }
        if let (Some(first), Some(last)) = (self.points().first(), self.points().last()) {
            let v = *first - *last;
            if v.x != 0.0 || v.y != 0.0 {
                directions.push(v);
            }
        }

        if directions.len() < 3 {
            return Ok(true);
        }

        let mut counter = DirectionCounter::default();
        let mut expected = 0.0;
        for i in 0..directions.len() {
            let a = directions[i];
            let b = directions[(i + 1) % directions.len()];
            counter.add(a);

            let turn = cross_wide(a, b);
            if turn == 0.0 {
                // Going back along the same line.
                if dot_wide(a, b) < 0.0 {
                    return Ok(false);
                }
                continue;
            }
            if expected == 0.0 {
                expected = turn.signum();
            } else if turn.signum() != expected {
                return Ok(false);
            }
        }
        counter.add(directions[0]);

        Ok(counter.changes <= 2)
    }
}

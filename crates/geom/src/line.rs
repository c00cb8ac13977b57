use crate::scalar::Scalar;
use crate::utils::orientation;
use crate::{point, Box2D, Point, Vector};

#[cfg(not(feature = "std"))]
use num_traits::Float;

/// A linear segment.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct LineSegment<S> {
    pub from: Point<S>,
    pub to: Point<S>,
}

/// How two line segments relate to each other.
///
/// Produced by [`LineSegment::classify_intersection`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SegmentIntersection {
    /// The segments don't have any point in common.
    None,
    /// The segments cross at a single point that is not an endpoint of either.
    Crossing,
    /// The segments meet at a single point which is an endpoint of at least one of them.
    Touching {
        /// An endpoint of the first segment lies on the second one.
        a_endpoint_on_b: bool,
        /// An endpoint of the second segment lies on the first one.
        b_endpoint_on_a: bool,
    },
    /// The segments are collinear and share more than one point.
    Collinear,
}

impl SegmentIntersection {
    /// Returns false for `SegmentIntersection::None`.
    #[inline]
    pub fn is_some(&self) -> bool {
        *self != SegmentIntersection::None
    }
}

impl<S: Scalar> LineSegment<S> {
    #[inline]
    pub fn new(from: Point<S>, to: Point<S>) -> Self {
        LineSegment { from, to }
    }

    /// Sample the segment at t (expecting t between 0 and 1).
    #[inline]
    pub fn sample(&self, t: S) -> Point<S> {
        self.from.lerp(self.to, t)
    }

    /// Returns an inverted version of this segment where the beginning and the end
    /// points are swapped.
    #[inline]
    pub fn flip(&self) -> Self {
        LineSegment {
            from: self.to,
            to: self.from,
        }
    }

    /// Return the smallest rectangle containing this segment.
    #[inline]
    pub fn bounding_box(&self) -> Box2D<S> {
        Box2D {
            min: point(
                S::min(self.from.x, self.to.x),
                S::min(self.from.y, self.to.y),
            ),
            max: point(
                S::max(self.from.x, self.to.x),
                S::max(self.from.y, self.to.y),
            ),
        }
    }

    /// Returns the vector between this segment's `from` and `to` points.
    #[inline]
    pub fn to_vector(&self) -> Vector<S> {
        self.to - self.from
    }

    /// Computes the length of this segment.
    #[inline]
    pub fn length(&self) -> S {
        self.to_vector().length()
    }

    /// Computes the squared length of this segment.
    #[inline]
    pub fn square_length(&self) -> S {
        self.to_vector().square_length()
    }

    /// Computes the distance between this segment and a point.
    #[inline]
    pub fn distance_to_point(&self, p: Point<S>) -> S {
        self.square_distance_to_point(p).sqrt()
    }

    /// Computes the squared distance between this segment and a point.
    #[inline]
    pub fn square_distance_to_point(&self, p: Point<S>) -> S {
        (self.closest_point(p) - p).square_length()
    }

    /// Computes the closest point on this segment to `p`.
    #[inline]
    pub fn closest_point(&self, p: Point<S>) -> Point<S> {
        let v1 = self.to - self.from;
        let v2 = p - self.from;
        let len2 = v1.dot(v1);
        if len2 == S::ZERO {
            return self.from;
        }
        let t = S::min(S::max(v2.dot(v1) / len2, S::ZERO), S::ONE);

        self.from + v1 * t
    }
}

impl LineSegment<f32> {
    /// Classifies how this segment meets another one.
    ///
    /// All decisions are taken from the signs of double precision orientation tests,
    /// which are exact for single precision inputs, so the classification is
    /// consistent: a segment touching another one at an endpoint is never reported
    /// as crossing it.
    pub fn classify_intersection(&self, other: &Self) -> SegmentIntersection {
        let (a0, a1) = (self.from, self.to);
        let (b0, b1) = (other.from, other.to);

        let o1 = orientation(a0, a1, b0);
        let o2 = orientation(a0, a1, b1);
        let o3 = orientation(b0, b1, a0);
        let o4 = orientation(b0, b1, a1);

        if o1 == 0 && o2 == 0 && o3 == 0 && o4 == 0 {
            return collinear_overlap(self, other);
        }

        if o1 * o2 > 0 || o3 * o4 > 0 {
            return SegmentIntersection::None;
        }

        let a_endpoint_on_b = o3 == 0 || o4 == 0;
        let b_endpoint_on_a = o1 == 0 || o2 == 0;

        if !a_endpoint_on_b && !b_endpoint_on_a {
            return SegmentIntersection::Crossing;
        }

        SegmentIntersection::Touching {
            a_endpoint_on_b,
            b_endpoint_on_a,
        }
    }
}

// Both segments are on the same line. Compare their extents along the dominant axis.
fn collinear_overlap(a: &LineSegment<f32>, b: &LineSegment<f32>) -> SegmentIntersection {
    let d = a.to_vector() + b.to_vector();
    let key = |p: Point<f32>| -> f64 {
        if d.x.abs() >= d.y.abs() {
            p.x as f64
        } else {
            p.y as f64
        }
    };

    let (a_min, a_max) = min_max(key(a.from), key(a.to));
    let (b_min, b_max) = min_max(key(b.from), key(b.to));

    let lo = if a_min > b_min { a_min } else { b_min };
    let hi = if a_max < b_max { a_max } else { b_max };

    if lo > hi {
        return SegmentIntersection::None;
    }

    if lo < hi {
        return SegmentIntersection::Collinear;
    }

    // Single shared point.
    let a_endpoint_on_b = key(a.from) == lo || key(a.to) == lo;
    let b_endpoint_on_a = key(b.from) == lo || key(b.to) == lo;
    SegmentIntersection::Touching {
        a_endpoint_on_b,
        b_endpoint_on_a,
    }
}

#[inline]
fn min_max(a: f64, b: f64) -> (f64, f64) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

#[test]
fn crossing_rotated_segments() {
    use core::f32::consts::PI;
    let count: u32 = 100;

    for i in 0..count {
        for j in 0..count {
            if i % (count / 2) == j % (count / 2) {
                // avoid the colinear case.
                continue;
            }

            let angle1 = i as f32 / (count as f32) * 2.0 * PI;
            let angle2 = j as f32 / (count as f32) * 2.0 * PI;

            let l1 = LineSegment {
                from: point(10.0 * angle1.cos(), 10.0 * angle1.sin()),
                to: point(-10.0 * angle1.cos(), -10.0 * angle1.sin()),
            };

            let l2 = LineSegment {
                from: point(10.0 * angle2.cos(), 10.0 * angle2.sin()),
                to: point(-10.0 * angle2.cos(), -10.0 * angle2.sin()),
            };

            assert_eq!(l1.classify_intersection(&l2), SegmentIntersection::Crossing);
        }
    }
}

#[test]
fn intersection_touching() {
    let l1 = LineSegment {
        from: point(0.0, 0.0),
        to: point(10.0, 10.0),
    };

    let l2 = LineSegment {
        from: point(10.0, 10.0),
        to: point(10.0, 0.0),
    };

    assert_eq!(
        l1.classify_intersection(&l2),
        SegmentIntersection::Touching {
            a_endpoint_on_b: true,
            b_endpoint_on_a: true
        }
    );

    // T junction: the end of l3 lies in the middle of l4.
    let l3 = LineSegment {
        from: point(5.0, -5.0),
        to: point(5.0, 0.0),
    };
    let l4 = LineSegment {
        from: point(0.0, 0.0),
        to: point(10.0, 0.0),
    };
    assert_eq!(
        l3.classify_intersection(&l4),
        SegmentIntersection::Touching {
            a_endpoint_on_b: true,
            b_endpoint_on_a: false
        }
    );
    assert_eq!(
        l4.classify_intersection(&l3),
        SegmentIntersection::Touching {
            a_endpoint_on_b: false,
            b_endpoint_on_a: true
        }
    );
}

#[test]
fn intersection_overlap() {
    let l1 = LineSegment {
        from: point(0.0, 0.0),
        to: point(10.0, 0.0),
    };

    let l2 = LineSegment {
        from: point(5.0, 0.0),
        to: point(15.0, 0.0),
    };

    assert_eq!(l1.classify_intersection(&l2), SegmentIntersection::Collinear);

    let l3 = LineSegment {
        from: point(10.0, 0.0),
        to: point(20.0, 0.0),
    };
    assert_eq!(
        l1.classify_intersection(&l3),
        SegmentIntersection::Touching {
            a_endpoint_on_b: true,
            b_endpoint_on_a: true
        }
    );

    let l4 = LineSegment {
        from: point(11.0, 0.0),
        to: point(20.0, 0.0),
    };
    assert_eq!(l1.classify_intersection(&l4), SegmentIntersection::None);

    let l5 = LineSegment {
        from: point(0.0, 1.0),
        to: point(10.0, 1.0),
    };
    assert_eq!(l1.classify_intersection(&l5), SegmentIntersection::None);
}

#[test]
fn distance_to_point() {
    let l = LineSegment {
        from: point(0.0f32, 0.0),
        to: point(10.0, 0.0),
    };
    assert_eq!(l.distance_to_point(point(5.0, 3.0)), 3.0);
    assert_eq!(l.distance_to_point(point(-3.0, 4.0)), 5.0);
    assert_eq!(l.distance_to_point(point(13.0, 4.0)), 5.0);

    let degenerate = LineSegment {
        from: point(1.0f32, 1.0),
        to: point(1.0, 1.0),
    };
    assert_eq!(degenerate.distance_to_point(point(4.0, 5.0)), 5.0);
}

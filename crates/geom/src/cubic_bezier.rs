use crate::flatten::{try_flatten, Flatten};
use crate::scalar::Scalar;
use crate::{FlatteningMode, LineSegment, Point, Transform, Vector};

/// A 2d curve segment defined by four points: the beginning of the segment, two control
/// points and the end of the segment.
///
/// The curve is defined by equation:
/// ```∀ t ∈ [0..1],  P(t) = (1 - t)³ * from + 3 * (1 - t)² * t * ctrl1 + 3 * t² * (1 - t) * ctrl2 + t³ * to```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct CubicBezierSegment<S> {
    pub from: Point<S>,
    pub ctrl1: Point<S>,
    pub ctrl2: Point<S>,
    pub to: Point<S>,
}

impl<S: Scalar> CubicBezierSegment<S> {
    /// Sample the curve at t (expecting t between 0 and 1).
    pub fn sample(&self, t: S) -> Point<S> {
        let t2 = t * t;
        let t3 = t2 * t;
        let one_t = S::ONE - t;
        let one_t2 = one_t * one_t;
        let one_t3 = one_t2 * one_t;

        self.from * one_t3
            + self.ctrl1.to_vector() * S::THREE * one_t2 * t
            + self.ctrl2.to_vector() * S::THREE * one_t * t2
            + self.to.to_vector() * t3
    }

    /// Split this curve into two sub-curves at its midpoint (de Casteljau).
    pub fn split_in_half(&self) -> (Self, Self) {
        let ctrl1a = self.from.lerp(self.ctrl1, S::HALF);
        let ctrl2a = self.ctrl1.lerp(self.ctrl2, S::HALF);
        let ctrl1aa = ctrl1a.lerp(ctrl2a, S::HALF);
        let ctrl3a = self.ctrl2.lerp(self.to, S::HALF);
        let ctrl2aa = ctrl2a.lerp(ctrl3a, S::HALF);
        let ctrl1aaa = ctrl1aa.lerp(ctrl2aa, S::HALF);

        (
            CubicBezierSegment {
                from: self.from,
                ctrl1: ctrl1a,
                ctrl2: ctrl1aa,
                to: ctrl1aaa,
            },
            CubicBezierSegment {
                from: ctrl1aaa,
                ctrl1: ctrl2aa,
                ctrl2: ctrl3a,
                to: self.to,
            },
        )
    }

    #[inline]
    pub fn baseline(&self) -> LineSegment<S> {
        LineSegment {
            from: self.from,
            to: self.to,
        }
    }

    /// Returns true if both control points are on the baseline, between its endpoints.
    pub fn is_linear(&self) -> bool {
        let baseline = self.to - self.from;
        let len2 = baseline.square_length();
        let on_baseline = |p: Point<S>| {
            let v = p - self.from;
            let d = v.dot(baseline);
            baseline.cross(v) == S::ZERO && d >= S::ZERO && d <= len2
        };

        on_baseline(self.ctrl1) && on_baseline(self.ctrl2)
    }

    /// Upper bound of the distance between the curve and its baseline.
    ///
    /// The deviation at `t` is `t (1 - t) ((1 - t) u + t v)` with
    /// `u = 3 ctrl1 - 2 from - to` and `v = 3 ctrl2 - from - 2 to`, so each axis is
    /// bounded by a quarter of the largest of `|u|` and `|v|` on that axis.
    pub fn baseline_deviation(&self) -> S {
        let u = self.ctrl1.to_vector() * S::THREE - self.from.to_vector() * S::TWO - self.to.to_vector();
        let v = self.ctrl2.to_vector() * S::THREE - self.to.to_vector() * S::TWO - self.from.to_vector();

        let ux = S::max(u.x.abs(), v.x.abs());
        let uy = S::max(u.y.abs(), v.y.abs());

        (ux + uy) / S::FOUR
    }

    /// Applies the transform to this curve and returns the results.
    #[inline]
    pub fn transformed(&self, transform: &Transform<S>) -> Self {
        CubicBezierSegment {
            from: transform.transform_point(self.from),
            ctrl1: transform.transform_point(self.ctrl1),
            ctrl2: transform.transform_point(self.ctrl2),
            to: transform.transform_point(self.to),
        }
    }

    /// Approximates the curve with a sequence of line segments.
    ///
    /// The `tolerance` parameter defines the maximum distance between the curve and
    /// its approximation.
    pub fn for_each_flattened<F>(&self, tolerance: S, mode: FlatteningMode, callback: &mut F)
    where
        F: FnMut(&LineSegment<S>),
    {
        let _: Result<(), ()> = self.try_for_each_flattened(tolerance, mode, &mut |segment| {
            callback(segment);
            Ok(())
        });
    }

    /// Same as `for_each_flattened`, stopping at the first error returned by the
    /// callback.
    pub fn try_for_each_flattened<E, F>(
        &self,
        tolerance: S,
        mode: FlatteningMode,
        callback: &mut F,
    ) -> Result<(), E>
    where
        F: FnMut(&LineSegment<S>) -> Result<(), E>,
    {
        if self.is_linear() {
            return callback(&self.baseline());
        }

        try_flatten(self, self.from, tolerance, mode, callback)
    }
}

impl<S: Scalar> Flatten<S> for CubicBezierSegment<S> {
    fn end(&self) -> Point<S> {
        self.to
    }

    fn sample(&self, t: S) -> Point<S> {
        self.sample(t)
    }

    fn split_in_half(&self) -> (Self, Self) {
        self.split_in_half()
    }

    fn baseline_deviation(&self) -> S {
        self.baseline_deviation()
    }

    fn parametric_step_count(&self, tolerance: S) -> S {
        // The second derivative is bounded by 6 M, and a chord of parameter length h
        // deviates by at most h² 6 M / 8 from the curve.
        let d1: Vector<S> = self.from.to_vector() - self.ctrl1.to_vector() * S::TWO + self.ctrl2.to_vector();
        let d2: Vector<S> = self.ctrl1.to_vector() - self.ctrl2.to_vector() * S::TWO + self.to.to_vector();
        let m = S::max(d1.length(), d2.length());

        (S::THREE * m / (S::FOUR * tolerance)).sqrt().ceil()
    }
}

#[cfg(test)]
use crate::point;

#[cfg(test)]
fn max_distance_to_polyline(curve: &CubicBezierSegment<f32>, segments: &[LineSegment<f32>]) -> f32 {
    let n = 1000;
    let mut max = 0.0f32;
    for i in 0..=n {
        let p = curve.sample(i as f32 / n as f32);
        let d = segments
            .iter()
            .map(|s| s.distance_to_point(p))
            .fold(f32::MAX, f32::min);
        max = max.max(d);
    }

    max
}

#[test]
fn flattening_bound_random_curves() {
    use rand::{Rng, SeedableRng};

    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let mut p = || point(rng.gen_range(-500.0..500.0), rng.gen_range(-500.0..500.0));
        let curve = CubicBezierSegment {
            from: p(),
            ctrl1: p(),
            ctrl2: p(),
            to: p(),
        };
        let tolerance: f32 = [0.05, 0.25, 1.0][rng.gen_range(0..3)];

        for &mode in &[FlatteningMode::Recursive, FlatteningMode::Parametric] {
            let mut segments = std::vec::Vec::new();
            curve.for_each_flattened(tolerance, mode, &mut |s| segments.push(*s));

            assert_eq!(segments[0].from, curve.from);
            assert_eq!(segments.last().unwrap().to, curve.to);

            let d = max_distance_to_polyline(&curve, &segments);
            assert!(
                d <= tolerance * 1.01 + 1e-3,
                "{:?} {:?}: deviation {} > {}",
                mode,
                curve,
                d,
                tolerance
            );
        }
    }
}

#[test]
fn flattening_degenerate_curves() {
    let p = point(3.0, 4.0);
    let curve = CubicBezierSegment {
        from: p,
        ctrl1: p,
        ctrl2: p,
        to: p,
    };
    let mut count = 0;
    curve.for_each_flattened(0.1, FlatteningMode::Recursive, &mut |_| count += 1);
    assert_eq!(count, 1);

    let line = CubicBezierSegment {
        from: point(0.0, 0.0),
        ctrl1: point(1.0, 2.0),
        ctrl2: point(2.0, 4.0),
        to: point(3.0, 6.0),
    };
    let mut segments = std::vec::Vec::new();
    line.for_each_flattened(0.001, FlatteningMode::Parametric, &mut |s| segments.push(*s));
    assert_eq!(segments.as_slice(), &[line.baseline()]);
}

#[test]
fn flattening_zero_tolerance_stops() {
    let curve = CubicBezierSegment {
        from: point(0.0, 0.0),
        ctrl1: point(0.0, 100.0),
        ctrl2: point(100.0, 100.0),
        to: point(100.0, 0.0),
    };
    let mut count = 0;
    curve.for_each_flattened(0.0, FlatteningMode::Recursive, &mut |_| count += 1);
    assert_eq!(count, 1);

    let mut count = 0;
    curve.for_each_flattened(1e-3, FlatteningMode::Recursive, &mut |_| count += 1);
    assert!(count > 1);
    assert!(count <= 1 << crate::MAX_FLATTENING_DEPTH);
}

use crate::flatten::{try_flatten, Flatten};
use crate::scalar::Scalar;
use crate::{CubicBezierSegment, FlatteningMode, LineSegment, Point, Transform};

/// A 2d curve segment defined by three points: the beginning of the segment, a control
/// point and the end of the segment.
///
/// The curve is defined by equation:
/// ```∀ t ∈ [0..1],  P(t) = (1 - t)² * from + 2 * (1 - t) * t * ctrl + t² * to```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct QuadraticBezierSegment<S> {
    pub from: Point<S>,
    pub ctrl: Point<S>,
    pub to: Point<S>,
}

impl<S: Scalar> QuadraticBezierSegment<S> {
    /// Sample the curve at t (expecting t between 0 and 1).
    pub fn sample(&self, t: S) -> Point<S> {
        let t2 = t * t;
        let one_t = S::ONE - t;
        let one_t2 = one_t * one_t;

        self.from * one_t2 + self.ctrl.to_vector() * S::TWO * one_t * t + self.to.to_vector() * t2
    }

    /// Split this curve into two sub-curves at its midpoint.
    pub fn split_in_half(&self) -> (Self, Self) {
        let ctrl1a = self.from.lerp(self.ctrl, S::HALF);
        let ctrl2a = self.ctrl.lerp(self.to, S::HALF);
        let split_point = ctrl1a.lerp(ctrl2a, S::HALF);

        (
            QuadraticBezierSegment {
                from: self.from,
                ctrl: ctrl1a,
                to: split_point,
            },
            QuadraticBezierSegment {
                from: split_point,
                ctrl: ctrl2a,
                to: self.to,
            },
        )
    }

    /// Elevate this curve to a third order bézier.
    pub fn to_cubic(&self) -> CubicBezierSegment<S> {
        CubicBezierSegment {
            from: self.from,
            ctrl1: (self.from + self.ctrl.to_vector() * S::TWO) / S::THREE,
            ctrl2: (self.to + self.ctrl.to_vector() * S::TWO) / S::THREE,
            to: self.to,
        }
    }

    #[inline]
    pub fn baseline(&self) -> LineSegment<S> {
        LineSegment {
            from: self.from,
            to: self.to,
        }
    }

    /// Returns true if the control point is on the baseline, between its endpoints.
    ///
    /// Such a curve is exactly represented by its baseline.
    pub fn is_linear(&self) -> bool {
        let baseline = self.to - self.from;
        let v = self.ctrl - self.from;
        if baseline.cross(v) != S::ZERO {
            return false;
        }

        let d = v.dot(baseline);
        d >= S::ZERO && d <= baseline.square_length()
    }

    /// Maximum distance between the curve and its baseline.
    ///
    /// The deviation is `t (1 - t) |2 ctrl - from - to|`, maximal at `t = 0.5`.
    pub fn baseline_deviation(&self) -> S {
        let v = self.ctrl.to_vector() * S::TWO - self.from.to_vector() - self.to.to_vector();
        v.length() / S::FOUR
    }

    /// Applies the transform to this curve and returns the results.
    #[inline]
    pub fn transformed(&self, transform: &Transform<S>) -> Self {
        QuadraticBezierSegment {
            from: transform.transform_point(self.from),
            ctrl: transform.transform_point(self.ctrl),
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

impl<S: Scalar> Flatten<S> for QuadraticBezierSegment<S> {
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
        // Each of the n pieces deviates from its chord by |from - 2 ctrl + to| / (4 n²).
        let dd = self.from.to_vector() - self.ctrl.to_vector() * S::TWO + self.to.to_vector();
        (dd.length() / (S::FOUR * tolerance)).sqrt().ceil()
    }
}

#[cfg(test)]
use crate::point;

#[cfg(test)]
fn assert_polyline_within(
    curve: &QuadraticBezierSegment<f32>,
    tolerance: f32,
    mode: FlatteningMode,
) -> usize {
    let mut segments = std::vec::Vec::new();
    curve.for_each_flattened(tolerance, mode, &mut |s| segments.push(*s));

    assert_eq!(segments[0].from, curve.from);
    assert_eq!(segments.last().unwrap().to, curve.to);
    for pair in segments.windows(2) {
        assert_eq!(pair[0].to, pair[1].from);
    }

    let n = 1000;
    for i in 0..=n {
        let p = curve.sample(i as f32 / n as f32);
        let d = segments
            .iter()
            .map(|s| s.distance_to_point(p))
            .fold(f32::MAX, f32::min);
        assert!(d <= tolerance * 1.01 + 1e-4, "distance {} > {}", d, tolerance);
    }

    segments.len()
}

#[test]
fn flattening_within_tolerance() {
    let curve = QuadraticBezierSegment {
        from: point(0.0, 0.0),
        ctrl: point(100.0, 200.0),
        to: point(200.0, 0.0),
    };

    for &tolerance in &[0.01, 0.1, 0.25, 1.0, 5.0] {
        let a = assert_polyline_within(&curve, tolerance, FlatteningMode::Recursive);
        let b = assert_polyline_within(&curve, tolerance, FlatteningMode::Parametric);
        assert!(a > 1);
        assert!(b > 1);
    }
}

#[test]
fn flattening_linear_curve() {
    let curve = QuadraticBezierSegment {
        from: point(0.0, 0.0),
        ctrl: point(5.0, 5.0),
        to: point(10.0, 10.0),
    };

    for &mode in &[FlatteningMode::Recursive, FlatteningMode::Parametric] {
        let mut count = 0;
        curve.for_each_flattened(0.01, mode, &mut |s| {
            assert_eq!(*s, curve.baseline());
            count += 1;
        });
        assert_eq!(count, 1);
    }

    // Control point on the line but past the end: the curve folds back.
    let overshoot = QuadraticBezierSegment {
        from: point(0.0, 0.0),
        ctrl: point(20.0, 0.0),
        to: point(10.0, 0.0),
    };
    assert!(!overshoot.is_linear());
    assert_polyline_within(&overshoot, 0.1, FlatteningMode::Recursive);
}

#[test]
fn split_in_half() {
    let curve = QuadraticBezierSegment {
        from: point(0.0, 0.0),
        ctrl: point(10.0, 20.0),
        to: point(20.0, 0.0),
    };
    let (a, b) = curve.split_in_half();
    assert_eq!(a.to, curve.sample(0.5));
    assert_eq!(b.from, curve.sample(0.5));
    assert!((a.sample(0.5) - curve.sample(0.25)).length() < 1e-5);
    assert!((b.sample(0.5) - curve.sample(0.75)).length() < 1e-5);

    let cubic = curve.to_cubic();
    for i in 0..10 {
        let t = i as f32 / 10.0;
        assert!((cubic.sample(t) - curve.sample(t)).length() < 1e-4);
    }
}

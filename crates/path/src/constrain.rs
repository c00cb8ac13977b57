use crate::error::PathResult;
use crate::math::{Point, Transform};
use crate::path::Path;

impl Path {
    /// Clips this convex closed path to the area where the transformed coordinates are
    /// within `[0, 1]`.
    ///
    /// Only the x coordinate is constrained if `on_x` is set, the y coordinate if `on_y`
    /// is set, or both. The result is convex and marked as such.
    pub fn build_constrained_path(
        &self,
        constrained: &mut Path,
        transform: &Transform,
        on_x: bool,
        on_y: bool,
    ) -> PathResult<()> {
        let mut t1 = Path::new();
        if on_x && on_y {
            let mut t2 = Path::new();
            let mut t3 = Path::new();
            self.constrain(&mut t1, transform, true, 0.0, false)?;
            t1.constrain(&mut t2, transform, true, 1.0, true)?;
            t2.constrain(&mut t3, transform, false, 0.0, false)?;
            return t3.constrain(constrained, transform, false, 1.0, true);
        }

        self.constrain(&mut t1, transform, on_x, 0.0, false)?;
        t1.constrain(constrained, transform, on_x, 1.0, true)
    }

    /// Clips this convex closed path against a single boundary.
    ///
    /// The kept side is where the transformed coordinate (x if `on_x`, y otherwise) is
    /// at most `boundary` if `upper` is set, at least `boundary` otherwise. Crossing
    /// points are interpolated on the untransformed segments.
    pub fn constrain(
        &self,
        constrained: &mut Path,
        transform: &Transform,
        on_x: bool,
        boundary: f32,
        upper: bool,
    ) -> PathResult<()> {
        constrained.prepare(self.num_lines() * 2)?;
        let n = self.num_lines();
        if n == 0 {
            return Ok(());
        }

        let coordinate = |p: Point| {
            let t = transform.transform_point(p);
            if on_x {
                t.x
            } else {
                t.y
            }
        };
        let is_inside = |v: f32| if upper { v <= boundary } else { v >= boundary };

        let mut started = false;
        let mut emit = |constrained: &mut Path, p: Point| -> PathResult<()> {
            if started {
                constrained.line_to(p)
            } else {
                started = true;
                constrained.move_to(p)
            }
        };

        let mut prev = self.line(0).from;
        let mut prev_value = coordinate(prev);
        let mut inside = is_inside(prev_value);
        if inside {
            emit(constrained, prev)?;
        }

        for i in 1..=n {
            // The last iteration goes back to the start of the first segment.
            let p = if i < n { self.line(i).from } else { self.line(0).from };
            let value = coordinate(p);
            if is_inside(value) != inside {
                inside = !inside;
                let k = (boundary - prev_value) / (value - prev_value);
                emit(constrained, prev.lerp(p, k))?;
            }

            if inside && i < n {
                emit(constrained, p)?;
            }

            prev = p;
            prev_value = value;
        }

        if constrained.num_lines() == 0 {
            constrained.clear();
            return Ok(());
        }

        constrained.close(true)?;
        constrained.force_convex();

        Ok(())
    }
}

#[cfg(test)]
use crate::category::Category;
#[cfg(test)]
use crate::math::point;

#[test]
fn constrain_square_to_unit_range() {
    let mut path = Path::new();
    path.move_to(point(-5.0, -5.0)).unwrap();
    path.line_to(point(15.0, -5.0)).unwrap();
    path.line_to(point(15.0, 15.0)).unwrap();
    path.line_to(point(-5.0, 15.0)).unwrap();
    path.close(true).unwrap();

    // Maps [0, 10] to [0, 1] on both axes.
    let transform = Transform::scale(0.1, 0.1);
    let mut constrained = Path::new();
    path.build_constrained_path(&mut constrained, &transform, true, true)
        .unwrap();

    let bbox = constrained.bounding_box();
    assert!((bbox.min.x - 0.0).abs() < 1e-4);
    assert!((bbox.min.y - 0.0).abs() < 1e-4);
    assert!((bbox.max.x - 10.0).abs() < 1e-4);
    assert!((bbox.max.y - 10.0).abs() < 1e-4);
    assert!(constrained.is_closed());
    assert_eq!(constrained.category(), Ok(Category::Convex));
}

#[test]
fn constrain_single_axis() {
    let mut path = Path::new();
    path.move_to(point(-5.0, 2.0)).unwrap();
    path.line_to(point(5.0, 2.0)).unwrap();
    path.line_to(point(5.0, 4.0)).unwrap();
    path.line_to(point(-5.0, 4.0)).unwrap();
    path.close(true).unwrap();

    let mut constrained = Path::new();
    path.build_constrained_path(&mut constrained, &Transform::identity(), true, false)
        .unwrap();

    let bbox = constrained.bounding_box();
    assert!((bbox.min - point(0.0, 2.0)).length() < 1e-5);
    assert!((bbox.max - point(1.0, 4.0)).length() < 1e-5);
}

#[test]
fn constrain_outside() {
    let mut path = Path::new();
    path.move_to(point(5.0, 5.0)).unwrap();
    path.line_to(point(6.0, 5.0)).unwrap();
    path.line_to(point(6.0, 6.0)).unwrap();
    path.close(true).unwrap();

    let mut constrained = Path::new();
    path.build_constrained_path(&mut constrained, &Transform::identity(), true, true)
        .unwrap();
    assert_eq!(constrained.num_lines(), 0);
}

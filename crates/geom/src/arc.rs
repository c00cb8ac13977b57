//! Elliptic arc related maths and tools.

use crate::scalar::{NumCast, Scalar};
use crate::{point, vector, Angle, CubicBezierSegment, FlatteningMode, LineSegment, Point, Vector};

#[cfg(not(feature = "std"))]
use num_traits::Float;

/// An elliptic arc described with the endpoint parameterization of SVG paths.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct SvgArc<S> {
    pub from: Point<S>,
    pub to: Point<S>,
    pub radii: Vector<S>,
    pub x_rotation: Angle<S>,
    pub flags: ArcFlags,
}

/// Flag parameters for arcs as described by the SVG specification.
///
/// For most situations using the SVG arc notation, there are four different arcs
/// (two different ellipses, each with two different arc sweeps) that satisfy the
/// arc parameters. The `large_arc` and `sweep` flags indicate which one of the
/// four arcs are drawn.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct ArcFlags {
    /// Of the four candidate arc sweeps, two will represent an arc sweep of greater
    /// than or equal to 180 degrees (the "large-arc"), and two will represent an arc
    /// sweep of less than or equal to 180 degrees (the "small arc"). If `large_arc`
    /// is `true`, then one of the two larger arc sweeps will be chosen; otherwise, if
    /// `large_arc` is `false`, one of the smaller arc sweeps will be chosen.
    pub large_arc: bool,
    /// If `sweep` is `true`, then the arc will be drawn in a "positive-angle" direction
    /// (the angle increases as the arc is drawn).
    pub sweep: bool,
}

/// An elliptic arc described by its center.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Arc<S> {
    pub center: Point<S>,
    pub radii: Vector<S>,
    pub start_angle: Angle<S>,
    pub sweep_angle: Angle<S>,
    pub x_rotation: Angle<S>,
}

/// Pieces of the arc with a smaller sweep than this are not emitted and
/// are left to the line that joins the end point.
fn min_piece_angle() -> f64 {
    1.0f64.to_radians()
}

#[inline]
fn wide<S: Scalar>(v: S) -> f64 {
    v.to_f64().unwrap_or(0.0)
}

#[inline]
fn narrow<S: Scalar>(v: f64) -> S {
    <S as NumCast>::from(v).unwrap_or(S::ZERO)
}

impl<S: Scalar> SvgArc<S> {
    /// Returns true if the arc degenerates to a straight line, which is the case
    /// when one of the radii is zero.
    pub fn is_straight_line(&self) -> bool {
        self.radii.x.abs() <= S::EPSILON || self.radii.y.abs() <= S::EPSILON
    }

    /// Solves the center of the ellipse.
    ///
    /// Returns `None` if the arc is a straight line or if both endpoints are equal.
    /// Radii that are too small to join the endpoints are scaled up uniformly. The
    /// center is solved in double precision.
    pub fn to_arc(&self) -> Option<Arc<S>> {
        if self.is_straight_line() || self.from == self.to {
            return None;
        }

        let mut rx = wide(self.radii.x).abs();
        let mut ry = wide(self.radii.y).abs();
        let phi = wide(self.x_rotation.radians);
        let (sin_phi, cos_phi) = phi.sin_cos();

        let (x0, y0) = (wide(self.from.x), wide(self.from.y));
        let (x1, y1) = (wide(self.to.x), wide(self.to.y));

        let hx = (x0 - x1) * 0.5;
        let hy = (y0 - y1) * 0.5;
        let xp = cos_phi * hx + sin_phi * hy;
        let yp = -sin_phi * hx + cos_phi * hy;

        let lambda = (xp * xp) / (rx * rx) + (yp * yp) / (ry * ry);
        if lambda > 1.0 {
            let s = lambda.sqrt();
            rx *= s;
            ry *= s;
        }

        let rx2 = rx * rx;
        let ry2 = ry * ry;
        let den = rx2 * yp * yp + ry2 * xp * xp;
        if den == 0.0 {
            return None;
        }
        let num = rx2 * ry2 - den;
        let mut clen = (num / den).abs().sqrt();
        if self.flags.large_arc == self.flags.sweep {
            clen = -clen;
        }

        let cxp = clen * rx * yp / ry;
        let cyp = -clen * ry * xp / rx;

        let cx = cos_phi * cxp - sin_phi * cyp + (x0 + x1) * 0.5;
        let cy = sin_phi * cxp + cos_phi * cyp + (y0 + y1) * 0.5;

        let ux = (xp - cxp) / rx;
        let uy = (yp - cyp) / ry;
        let vx = (-xp - cxp) / rx;
        let vy = (-yp - cyp) / ry;

        let start = uy.atan2(ux);
        let mut delta = (ux * vy - uy * vx).atan2(ux * vx + uy * vy);
        let tau = core::f64::consts::TAU;
        if self.flags.sweep && delta < 0.0 {
            delta += tau;
        } else if !self.flags.sweep && delta > 0.0 {
            delta -= tau;
        }

        Some(Arc {
            center: point(narrow(cx), narrow(cy)),
            radii: vector(narrow(rx), narrow(ry)),
            start_angle: Angle::radians(narrow(start)),
            sweep_angle: Angle::radians(narrow(delta)),
            x_rotation: self.x_rotation,
        })
    }

    /// Approximates the arc with cubic bézier curves of at most 90 degrees each.
    ///
    /// The last curve ends exactly at `self.to`. Arcs sweeping less than one degree
    /// produce no curve.
    pub fn for_each_cubic_bezier<F>(&self, callback: &mut F)
    where
        F: FnMut(&CubicBezierSegment<S>),
    {
        let arc = match self.to_arc() {
            Some(arc) => arc,
            None => return,
        };

        let quarter = core::f64::consts::FRAC_PI_2;
        let total = wide(arc.sweep_angle.radians);
        let sign = if total < 0.0 { -1.0 } else { 1.0 };
        let mut remaining = total.abs();
        let mut angle = wide(arc.start_angle.radians);
        let mut from = self.from;

        while remaining > min_piece_angle() {
            let piece = if remaining - quarter <= min_piece_angle() {
                remaining
            } else {
                quarter
            };
            remaining -= piece;

            let end_angle = angle + sign * piece;
            let mut curve = arc.cubic_piece(angle, end_angle);
            curve.from = from;
            if remaining <= min_piece_angle() {
                curve.to = self.to;
            }
            from = curve.to;
            callback(&curve);

            angle = end_angle;
        }
    }

    /// Approximates the arc with line segments within `tolerance` of the cubic
    /// approximation.
    pub fn try_for_each_flattened<E, F>(
        &self,
        tolerance: S,
        mode: FlatteningMode,
        callback: &mut F,
    ) -> Result<(), E>
    where
        F: FnMut(&LineSegment<S>) -> Result<(), E>,
    {
        let mut result = Ok(());
        self.for_each_cubic_bezier(&mut |curve| {
            if result.is_ok() {
                result = curve.try_for_each_flattened(tolerance, mode, callback);
            }
        });

        result
    }
}

impl<S: Scalar> Arc<S> {
    /// Sample the curve at t (expecting t between 0 and 1).
    pub fn sample(&self, t: S) -> Point<S> {
        let angle = wide(self.start_angle.radians) + wide(self.sweep_angle.radians) * wide(t);
        self.point_at_angle(angle)
    }

    fn point_at_angle(&self, angle: f64) -> Point<S> {
        let (sin, cos) = angle.sin_cos();
        self.map_unit(cos, sin)
    }

    // Maps a point of the unit circle to the ellipse.
    fn map_unit(&self, x: f64, y: f64) -> Point<S> {
        let (sin_phi, cos_phi) = wide(self.x_rotation.radians).sin_cos();
        let ex = x * wide(self.radii.x);
        let ey = y * wide(self.radii.y);

        point(
            narrow(wide(self.center.x) + cos_phi * ex - sin_phi * ey),
            narrow(wide(self.center.y) + sin_phi * ex + cos_phi * ey),
        )
    }

    // Cubic bézier approximation of the unit circle between two angles, mapped to the
    // ellipse.
    fn cubic_piece(&self, a0: f64, a1: f64) -> CubicBezierSegment<S> {
        let k = 4.0 / 3.0 * ((a1 - a0) / 4.0).tan();
        let (s0, c0) = a0.sin_cos();
        let (s1, c1) = a1.sin_cos();

        CubicBezierSegment {
            from: self.map_unit(c0, s0),
            ctrl1: self.map_unit(c0 - k * s0, s0 + k * c0),
            ctrl2: self.map_unit(c1 + k * s1, s1 - k * c1),
            to: self.map_unit(c1, s1),
        }
    }
}

#[cfg(test)]
fn arc(from: Point<f32>, to: Point<f32>, r: f32, large_arc: bool, sweep: bool) -> SvgArc<f32> {
    SvgArc {
        from,
        to,
        radii: vector(r, r),
        x_rotation: Angle::radians(0.0),
        flags: ArcFlags { large_arc, sweep },
    }
}

#[test]
fn half_circle_center() {
    let a = arc(point(0.0, 0.0), point(20.0, 0.0), 10.0, false, true).to_arc().unwrap();
    assert!((a.center - point(10.0, 0.0)).length() < 1e-4);
    assert!((a.sweep_angle.radians.abs() - core::f32::consts::PI).abs() < 1e-4);
    assert!(a.sweep_angle.radians > 0.0);

    let b = arc(point(0.0, 0.0), point(20.0, 0.0), 10.0, false, false).to_arc().unwrap();
    assert!(b.sweep_angle.radians < 0.0);
}

#[test]
fn radii_scaled_up() {
    // The radius is too small to join the endpoints.
    let a = arc(point(0.0, 0.0), point(100.0, 0.0), 1.0, false, true).to_arc().unwrap();
    assert!((a.radii.x - 50.0).abs() < 1e-3);
    assert!((a.center - point(50.0, 0.0)).length() < 1e-3);
}

#[test]
fn flags_select_the_arc() {
    let from = point(0.0, 0.0);
    let to = point(10.0, 10.0);
    for &large_arc in &[false, true] {
        for &sweep in &[false, true] {
            let a = arc(from, to, 10.0, large_arc, sweep).to_arc().unwrap();
            let sweep_angle = a.sweep_angle.radians;
            assert_eq!(sweep_angle > 0.0, sweep);
            assert_eq!(sweep_angle.abs() > core::f32::consts::PI, large_arc);
            assert!((a.sample(0.0) - from).length() < 1e-3);
            assert!((a.sample(1.0) - to).length() < 1e-3);
        }
    }
}

#[test]
fn cubic_pieces() {
    let svg = arc(point(0.0, 0.0), point(0.0, 20.0), 10.0, true, true);
    let a = svg.to_arc().unwrap();
    let mut count = 0;
    let mut last = svg.from;
    svg.for_each_cubic_bezier(&mut |curve| {
        assert_eq!(curve.from, last);
        last = curve.to;
        count += 1;
        // Points on the approximation stay close to the circle.
        for i in 0..=10 {
            let p = curve.sample(i as f32 / 10.0);
            assert!(((p - a.center).length() - 10.0).abs() < 0.01);
        }
    });
    assert_eq!(count, 2);
    assert_eq!(last, svg.to);

    let mut count = 0;
    arc(point(0.0, 0.0), point(0.0, 0.0), 10.0, true, true).for_each_cubic_bezier(&mut |_| count += 1);
    arc(point(0.0, 0.0), point(10.0, 0.0), 0.0, true, true).for_each_cubic_bezier(&mut |_| count += 1);
    assert_eq!(count, 0);
}

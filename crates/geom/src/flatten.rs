//! Flattening strategies shared by the quadratic and cubic bézier segments.

use crate::scalar::Scalar;
use crate::{LineSegment, Point};
use arrayvec::ArrayVec;

/// Maximum number of times a curve is split in half by the recursive flattener.
///
/// A piece that is still not flat enough at this depth is emitted as is. With a
/// depth of 16 this only happens for curves spanning tens of thousands of units
/// flattened with a very small tolerance.
pub const MAX_FLATTENING_DEPTH: usize = 16;

/// Upper bound on the number of line segments the parametric flattener emits
/// for a single curve.
pub const MAX_PARAMETRIC_STEPS: u32 = 1 << 14;

/// Strategy used to approximate curves with line segments.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum FlatteningMode {
    /// Subdivide the curve at its midpoint until each piece is flat enough.
    ///
    /// Produces fewer segments on curves with uneven curvature.
    Recursive,
    /// Sample the curve at uniform parameter steps. The number of steps is computed
    /// up front from a bound of the second derivative.
    Parametric,
}

impl FlatteningMode {
    pub const DEFAULT: Self = FlatteningMode::Recursive;
}

impl Default for FlatteningMode {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Operations the flatteners need from a curve.
pub(crate) trait Flatten<S: Scalar>: Copy {
    fn end(&self) -> Point<S>;
    fn sample(&self, t: S) -> Point<S>;
    fn split_in_half(&self) -> (Self, Self);
    /// Upper bound of the distance between the curve and its baseline.
    fn baseline_deviation(&self) -> S;
    /// Number of uniform steps keeping the chord error within the tolerance.
    fn parametric_step_count(&self, tolerance: S) -> S;
}

/// Calls `callback` with each line segment approximating the curve, stopping at the
/// first error.
///
/// The last segment always ends exactly at the end of the curve.
pub(crate) fn try_flatten<S, C, E, F>(
    curve: &C,
    start: Point<S>,
    tolerance: S,
    mode: FlatteningMode,
    callback: &mut F,
) -> Result<(), E>
where
    S: Scalar,
    C: Flatten<S>,
    F: FnMut(&LineSegment<S>) -> Result<(), E>,
{
    match mode {
        FlatteningMode::Recursive => recursive(curve, start, tolerance, callback),
        FlatteningMode::Parametric => parametric(curve, start, tolerance, callback),
    }
}

fn recursive<S, C, E, F>(curve: &C, start: Point<S>, tolerance: S, callback: &mut F) -> Result<(), E>
where
    S: Scalar,
    C: Flatten<S>,
    F: FnMut(&LineSegment<S>) -> Result<(), E>,
{
    // Depth first traversal: the stack never holds more than one pending piece
    // per level.
    let mut stack: ArrayVec<(C, usize), { MAX_FLATTENING_DEPTH + 1 }> = ArrayVec::new();
    stack.push((*curve, 0));

    let mut from = start;
    while let Some((piece, depth)) = stack.pop() {
        let flat = tolerance < S::EPSILON
            || depth >= MAX_FLATTENING_DEPTH
            || piece.baseline_deviation() <= tolerance;

        if flat {
            let to = piece.end();
            callback(&LineSegment { from, to })?;
            from = to;
            continue;
        }

        let (first, second) = piece.split_in_half();
        stack.push((second, depth + 1));
        stack.push((first, depth + 1));
    }

    Ok(())
}

fn parametric<S, C, E, F>(curve: &C, start: Point<S>, tolerance: S, callback: &mut F) -> Result<(), E>
where
    S: Scalar,
    C: Flatten<S>,
    F: FnMut(&LineSegment<S>) -> Result<(), E>,
{
    let count = if tolerance < S::EPSILON {
        S::ONE
    } else {
        curve.parametric_step_count(tolerance)
    };
    let count = count
        .to_u32()
        .unwrap_or(MAX_PARAMETRIC_STEPS)
        .max(1)
        .min(MAX_PARAMETRIC_STEPS);

    let step = S::ONE / S::value(count as f32);
    let mut from = start;
    for i in 1..count {
        let to = curve.sample(step * S::value(i as f32));
        callback(&LineSegment { from, to })?;
        from = to;
    }

    callback(&LineSegment {
        from,
        to: curve.end(),
    })
}

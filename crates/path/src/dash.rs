use crate::error::{PathError, PathResult};
use crate::geom::Scalar;
use crate::path::Path;

use alloc::vec::Vec;

// Position in the dash pattern.
#[derive(Copy, Clone, Debug)]
struct DashState {
    index: usize,
    drawing: bool,
    left: f32,
}

impl DashState {
    fn advance(&mut self, pattern: &[f32]) {
        self.index += 1;
        if self.index >= pattern.len() {
            self.index = 0;
        }
        self.drawing = !self.drawing;
        self.left = pattern[self.index];
    }
}

impl Path {
    /// Splits this path into dashes, written into `dashed`.
    ///
    /// Dashes are drawn with visible segments and gaps are skipped with warps. The
    /// pattern starts `dash_offset` units into `dash_array` and restarts after each
    /// invisible segment of the source.
    ///
    /// A positive `precomp_path_length` is the length the author assumed for the path:
    /// the offset and pattern are scaled by the ratio between the actual visible length
    /// and this value. A negative value means no length was provided.
    pub fn create_dash(
        &self,
        dashed: &mut Path,
        dash_offset: f32,
        dash_array: &[f32],
        precomp_path_length: f32,
    ) -> PathResult<()> {
        if precomp_path_length == 0.0 {
            return Err(PathError::InvalidArgument("the precomputed path length is zero"));
        }
        if dash_array.iter().any(|v| *v < 0.0 || !v.is_finite()) || !dash_offset.is_finite() {
            return Err(PathError::InvalidArgument("invalid dash pattern"));
        }

        dashed.prepare(self.num_lines())?;
        dashed.set_style(*self.style());
        if self.num_lines() == 0 {
            return Ok(());
        }

        let mut pattern = Vec::new();
        pattern.try_reserve(dash_array.len().max(2))?;
        pattern.extend_from_slice(dash_array);

        let mut length = 0.0;
        for i in 0..self.num_lines() {
            if self.is_line_visible(i) {
                length += self.line_length(i);
            }
        }

        let mut offset = dash_offset;
        if precomp_path_length > 0.0 {
            let scale = length / precomp_path_length;
            offset *= scale;
            for v in &mut pattern {
                *v *= scale;
            }
        }

        // The pattern must make progress, in steps that stay representable next to
        // the path length.
        let mut total: f32 = pattern.iter().sum();
        if total <= 0.0 {
            pattern.clear();
            let eps = <f32 as Scalar>::EPSILON.max(length * <f32 as Scalar>::EPSILON);
            pattern.push(eps);
            pattern.push(eps);
            total = 2.0 * eps;
        }

        // With an odd number of entries the pattern repeats after two rounds, with
        // the dashes and gaps swapped in the second one.
        let period = if pattern.len() % 2 == 1 { total * 2.0 } else { total };
        let mut offset = offset % period;
        if offset < 0.0 {
            offset += period;
        }

        let mut initial = DashState {
            index: 0,
            drawing: true,
            left: pattern[0],
        };
        while offset > 0.0 {
            if offset < initial.left {
                initial.left -= offset;
                offset = 0.0;
            } else {
                offset -= initial.left;
                initial.advance(&pattern);
            }
        }

        let result = self.walk_dashes(dashed, &pattern, initial);
        if result.is_err() {
            dashed.clear();
        }

        result
    }

    fn walk_dashes(&self, dashed: &mut Path, pattern: &[f32], initial: DashState) -> PathResult<()> {
        dashed.move_to(self.line(0).from)?;

        let mut state = initial;
        for i in 0..self.num_lines() {
            let line = self.line(i);
            if !self.is_line_visible(i) {
                state = initial;
                dashed.warp_to(line.to)?;
                continue;
            }

            // Positions along the segment are accumulated in double precision so that
            // short dashes still advance on long segments.
            let length = self.line_length(i) as f64;
            let mut passed = 0.0f64;
            loop {
                let remaining = length - passed;
                let next = passed + state.left as f64;
                let done = state.left as f64 >= remaining || (state.left > 0.0 && next <= passed);
                let end = if done {
                    state.left = (state.left as f64 - remaining).max(0.0) as f32;
                    line.to
                } else {
                    passed = next;
                    state.left = 0.0;
                    line.sample((passed / length) as f32)
                };

                if state.drawing {
                    dashed.line_to(end)?;
                } else {
                    dashed.warp_to(end)?;
                }

                if state.left <= 0.0 {
                    state.advance(pattern);
                }
                if done {
                    break;
                }
            }
        }

        // Keep the joins of a closed source. An invisible first segment is not
        // stroked, so the close is invisible too.
        if self.is_closed() {
            dashed.close(dashed.num_lines() > 0 && dashed.is_line_visible(0))?;
        }

        Ok(())
    }
}

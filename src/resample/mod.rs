// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Shared-state resampler: caches the last-built x-axis mapping so many
y-arrays over the same source grid can be interpolated onto the same
destination grid without recomputing indices. Grounded on
`pu/src/sampling.c`'s `resample()`/`resamplex()`/`resampley()` pair, which
the original keeps as static/global state for exactly this reason (see
`SPEC_FULL.md` §4.D and §9's note on the resampler's cached mapping being
process-wide state with an explicit teardown hook).
 */

pub mod error;
pub mod spline;

pub use error::ResampleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpMode {
    Linear,
    Spline,
}

struct XMapping {
    mode: InterpMode,
    src_x: Vec<f64>,
    indices: Vec<usize>,
    t: Vec<f64>,
}

/// A resampler instance. The teacher's equivalent keeps this as process
/// wide static state (see `crate::logging::WarnCounter` for the same
/// pattern used elsewhere); callers here own an instance explicitly so
/// that a parallel wavenumber loop (§5) can give each worker its own.
#[derive(Default)]
pub struct Resampler {
    mapping: Option<XMapping>,
}

impl Resampler {
    pub fn new() -> Self {
        Self { mapping: None }
    }

    /// Build (and cache) the index/fraction mapping from `src_x` to
    /// `dst_x`. Fails if any destination value would require
    /// extrapolation.
    pub fn set_x(
        &mut self,
        mode: InterpMode,
        src_x: &[f64],
        dst_x: &[f64],
    ) -> Result<(), ResampleError> {
        if src_x.is_empty() {
            return Err(ResampleError::EmptySource);
        }
        if dst_x.is_empty() {
            return Err(ResampleError::EmptyDestination);
        }

        if src_x.len() == 1 {
            if dst_x.len() > 1 {
                log::warn!(
                    "resampling onto {} points from a singleton source grid; output will be constant",
                    dst_x.len()
                );
            }
            self.mapping = Some(XMapping {
                mode,
                src_x: src_x.to_vec(),
                indices: vec![0; dst_x.len()],
                t: vec![0.0; dst_x.len()],
            });
            return Ok(());
        }

        let lo = src_x[0].min(src_x[src_x.len() - 1]);
        let hi = src_x[0].max(src_x[src_x.len() - 1]);
        let ascending = src_x[1] > src_x[0];

        let mut indices = vec![0usize; dst_x.len()];
        let mut t = vec![0.0f64; dst_x.len()];
        let mut i = 0usize;
        for (k, &v) in dst_x.iter().enumerate() {
            if v < lo || v > hi {
                return Err(ResampleError::OutOfRange { value: v, lo, hi });
            }
            // Restart from zero on wrap-around (destination not
            // monotonic, or this value precedes the previous search
            // position).
            let behind = if ascending {
                i > 0 && v < src_x[i]
            } else {
                i > 0 && v > src_x[i]
            };
            if behind {
                i = 0;
            }
            while i + 2 < src_x.len()
                && ((ascending && v > src_x[i + 1]) || (!ascending && v < src_x[i + 1]))
            {
                i += 1;
            }
            indices[k] = i;
            let denom = src_x[i + 1] - src_x[i];
            t[k] = if denom != 0.0 {
                (v - src_x[i]) / denom
            } else {
                0.0
            };
        }

        self.mapping = Some(XMapping {
            mode,
            src_x: src_x.to_vec(),
            indices,
            t,
        });
        Ok(())
    }

    /// Interpolate `src_y` (defined on the `src_x` given to the last
    /// `set_x` call) onto the cached destination grid.
    pub fn interp_y(&self, mode: InterpMode, src_y: &[f64]) -> Result<Vec<f64>, ResampleError> {
        let mapping = self.mapping.as_ref().ok_or(ResampleError::NoMapping)?;
        if src_y.len() != mapping.src_x.len() {
            return Err(ResampleError::SourceLengthMismatch {
                got: src_y.len(),
                expected: mapping.src_x.len(),
            });
        }

        if mapping.src_x.len() == 1 {
            return Ok(vec![src_y[0]; mapping.indices.len()]);
        }

        match mode {
            InterpMode::Linear => Ok(mapping
                .indices
                .iter()
                .zip(&mapping.t)
                .map(|(&i, &t)| {
                    if i + 1 < src_y.len() {
                        src_y[i] * (1.0 - t) + src_y[i + 1] * t
                    } else {
                        src_y[i]
                    }
                })
                .collect()),
            InterpMode::Spline => {
                let second_deriv = spline::second_derivatives(&mapping.src_x, src_y);
                Ok(mapping
                    .indices
                    .iter()
                    .zip(&mapping.t)
                    .map(|(&i, &t)| spline::evaluate(&mapping.src_x, src_y, &second_deriv, i, t))
                    .collect())
            }
        }
    }

    /// Release the cached mapping, per §4.D `free_state`.
    pub fn free_state(&mut self) {
        self.mapping = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn linear_interpolation_matches_hand_computation() {
        let mut rs = Resampler::new();
        let src_x = [0.0, 1.0, 2.0, 3.0];
        let dst_x = [0.5, 1.5, 2.5];
        rs.set_x(InterpMode::Linear, &src_x, &dst_x).unwrap();
        let src_y = [0.0, 10.0, 20.0, 30.0];
        let out = rs.interp_y(InterpMode::Linear, &src_y).unwrap();
        assert_relative_eq!(out[0], 5.0);
        assert_relative_eq!(out[1], 15.0);
        assert_relative_eq!(out[2], 25.0);
    }

    #[test]
    fn out_of_range_destination_is_rejected() {
        let mut rs = Resampler::new();
        let err = rs
            .set_x(InterpMode::Linear, &[0.0, 1.0], &[0.5, 1.5])
            .unwrap_err();
        assert!(matches!(err, ResampleError::OutOfRange { .. }));
    }

    #[test]
    fn singleton_source_yields_constant_output() {
        let mut rs = Resampler::new();
        rs.set_x(InterpMode::Linear, &[5.0], &[5.0, 5.0, 5.0]).unwrap();
        let out = rs.interp_y(InterpMode::Linear, &[42.0]).unwrap();
        assert_eq!(out, vec![42.0, 42.0, 42.0]);
    }

    #[test]
    fn free_state_clears_the_cache() {
        let mut rs = Resampler::new();
        rs.set_x(InterpMode::Linear, &[0.0, 1.0], &[0.5]).unwrap();
        rs.free_state();
        let err = rs.interp_y(InterpMode::Linear, &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, ResampleError::NoMapping));
    }
}

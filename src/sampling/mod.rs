// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Construction of the radius, wavelength, wavenumber, and impact-parameter
grids used everywhere downstream.

Grounded on `prg/transit/src/makesample.c` and `pu/src/sampling.c` of the
original `transit` program: a requested ("hint") axis is resolved against a
reference axis (typically database- or atmosphere-imposed limits), with
optional margins and oversampling. See `SPEC_FULL.md` §4.A.
 */

pub mod error;

pub use error::SamplingError;

use crate::constants::SAMPLE_COUNT_EPS;

/// A one-dimensional sampling grid: radius, wavelength, wavenumber, or
/// impact parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleAxis {
    /// Multiplicative factor converting stored values to centimetres (or
    /// cm^-1 for wavenumber grids).
    pub fct: f64,
    pub initial: f64,
    pub final_value: f64,
    /// Spacing between consecutive oversampled points. Meaningless (and set
    /// to `0.0`) when `fixed` is true.
    pub spacing: f64,
    pub oversample: usize,
    pub values: Vec<f64>,
    /// True when the grid was given as an explicit set of values rather
    /// than generated from endpoints and a spacing.
    pub fixed: bool,
}

impl SampleAxis {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Pre-oversampled point count (the count before the `oversample`
    /// multiplier was applied).
    pub fn pre_oversample_count(&self) -> usize {
        if self.fixed || self.oversample <= 1 {
            self.values.len()
        } else {
            (self.values.len() - 1) / self.oversample + 1
        }
    }
}

/// User-requested endpoints/spacing/oversampling/unit-factor for a
/// [`SampleAxis`], any of which may be left unset.
#[derive(Debug, Clone, Default)]
pub struct SampleHint {
    pub fct: Option<f64>,
    pub initial: Option<f64>,
    pub final_value: Option<f64>,
    pub spacing: Option<f64>,
    pub oversample: Option<usize>,
    /// An explicit array of values, equivalent to the original's "count
    /// hinted" case: the hint itself carries a ready-made fixed grid.
    pub explicit_values: Option<Vec<f64>>,
}

/// Database- or atmosphere-imposed limits that a [`SampleHint`] is resolved
/// against.
#[derive(Debug, Clone)]
pub struct SampleReference {
    pub fct: f64,
    pub initial: f64,
    pub final_value: f64,
    /// Spacing of a uniform reference grid, if it has one.
    pub spacing: Option<f64>,
    /// Explicit values of a fixed reference grid, if it has one (mutually
    /// exclusive with `spacing` in practice, though not enforced here).
    pub values: Option<Vec<f64>>,
}

/// Warnings accumulated while building an axis; the caller decides how to
/// surface these (typically via `log::warn!` plus the process-wide warning
/// counter, see `crate::logging`).
#[derive(Debug, Clone, Default)]
pub struct SamplingWarnings {
    pub messages: Vec<String>,
}

impl SamplingWarnings {
    fn push(&mut self, msg: impl Into<String>) {
        self.messages.push(msg.into());
    }
}

/// Whether oversampling is meaningful for this axis (radius and impact
/// parameter grids generally are not oversampled; wavelength/wavenumber
/// grids are).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Oversampling {
    Meaningful,
    Irrelevant,
}

/// Build a [`SampleAxis`] from a hint and a reference, per §4.A.
pub fn build_sample(
    hint: &SampleHint,
    reference: &SampleReference,
    oversampling: Oversampling,
    margin_lo: f64,
    margin_hi: f64,
) -> Result<(SampleAxis, SamplingWarnings), SamplingError> {
    let mut warn = SamplingWarnings::default();

    // 1. Unit factor.
    let fct = match hint.fct {
        Some(f) if f > 0.0 => f,
        Some(f) => return Err(SamplingError::NonPositiveUnitFactor(f)),
        None => reference.fct,
    };
    if fct <= 0.0 {
        return Err(SamplingError::NonPositiveUnitFactor(fct));
    }

    // 2. Initial/final endpoints.
    let lo_bound = reference.initial + margin_lo;
    let hi_bound = reference.final_value - margin_hi;

    let initial = match hint.initial {
        None => lo_bound,
        Some(v) => {
            if v < lo_bound || v > hi_bound {
                return Err(SamplingError::InitialOutOfRange {
                    requested: v,
                    lo: lo_bound,
                    hi: hi_bound,
                });
            }
            v
        }
    };
    let final_value = match hint.final_value {
        None => hi_bound,
        Some(v) => {
            if v < lo_bound || v > hi_bound {
                return Err(SamplingError::FinalOutOfRange {
                    requested: v,
                    lo: lo_bound,
                    hi: hi_bound,
                });
            }
            v
        }
    };

    // 3. Spacing and count are mutually exclusive hints.
    if hint.spacing.is_some() && hint.explicit_values.is_some() {
        return Err(SamplingError::SpacingAndCountBothHinted);
    }

    // 5. Count (explicit values) was hinted.
    if let Some(values) = &hint.explicit_values {
        if hint.oversample.is_some() {
            warn.push("oversampling was hinted alongside an explicit value array; ignoring it");
        }
        return Ok((
            SampleAxis {
                fct,
                initial: *values.first().unwrap_or(&initial),
                final_value: *values.last().unwrap_or(&final_value),
                spacing: 0.0,
                oversample: 1,
                values: values.clone(),
                fixed: true,
            },
            warn,
        ));
    }

    // 4. Neither spacing nor count hinted: copy from the reference.
    let spacing = match hint.spacing {
        Some(s) => s,
        None => match reference.spacing {
            Some(s) => s,
            None => match &reference.values {
                Some(values) => {
                    if hint.initial.is_some() || hint.final_value.is_some() {
                        warn.push(
                            "endpoints were hinted but the reference grid is fixed; \
                             the explicit reference values are used verbatim",
                        );
                    }
                    return Ok((
                        SampleAxis {
                            fct,
                            initial: *values.first().unwrap_or(&initial),
                            final_value: *values.last().unwrap_or(&final_value),
                            spacing: 0.0,
                            oversample: 1,
                            values: values.clone(),
                            fixed: true,
                        },
                        warn,
                    ));
                }
                None => return Err(SamplingError::NoReferenceSpacingOrValues),
            },
        },
    };

    // 6. Generate a uniform, possibly oversampled grid.
    let oversample = match oversampling {
        Oversampling::Meaningful => hint.oversample.unwrap_or(1).max(1),
        Oversampling::Irrelevant => {
            if hint.oversample.is_some() {
                warn.push("oversampling is not meaningful for this axis; ignoring it");
            }
            1
        }
    };

    let span = final_value - initial;
    let n_pre = ((1.0 + SAMPLE_COUNT_EPS) * span / spacing).floor() as i64 + 1;
    if n_pre < 1 {
        return Err(SamplingError::NoReferenceSpacingOrValues);
    }
    let n_pre = n_pre as usize;
    let n = (n_pre - 1) * oversample + 1;
    let step = spacing / oversample as f64;

    let mut values = vec![0.0_f64; n];
    for i in (0..n).rev() {
        values[i] = initial + i as f64 * step;
    }

    Ok((
        SampleAxis {
            fct,
            initial: values[0],
            final_value: values[n - 1],
            spacing: step,
            oversample,
            values,
            fixed: false,
        },
        warn,
    ))
}

/// Build the wavenumber reference grid implied by a wavelength grid, per
/// §4.A: `wn.initial = 1/(wl.final*wl.fct)`, `wn.final = 1/(wl.initial*wl.fct)`,
/// unit factor 1 (cm^-1), spacing chosen so the oversampled count matches.
pub fn wavenumber_reference_from_wavelength(wl: &SampleAxis) -> SampleReference {
    let initial = 1.0 / (wl.final_value * wl.fct);
    let final_value = 1.0 / (wl.initial * wl.fct);
    let count = wl.pre_oversample_count();
    let spacing = if count > 1 {
        Some((final_value - initial) / (count as f64 - 1.0))
    } else {
        None
    };
    SampleReference {
        fct: 1.0,
        initial,
        final_value,
        spacing,
        values: None,
    }
}

/// Wavenumber margins implied by a wavelength margin, per §4.A: the
/// square-of-endpoint rule used when the user did not give explicit
/// wavenumber margins.
pub fn implied_wavenumber_margins(wl: &SampleAxis, wl_margin: f64) -> (f64, f64) {
    let margin_lo = wl_margin * wl.initial * wl.initial * wl.fct * wl.fct;
    let margin_hi = wl_margin * wl.final_value * wl.final_value * wl.fct * wl.fct;
    (margin_lo, margin_hi)
}

/// Build the wavenumber grid from a wavelength grid and hint, validating
/// the hard invariant that the resulting wavenumber window lies within the
/// inverse of the wavelength window.
pub fn build_wavenumber_from_wavelength(
    hint: &SampleHint,
    wl: &SampleAxis,
    wl_margin: f64,
    wn_margin_lo: Option<f64>,
    wn_margin_hi: Option<f64>,
) -> Result<(SampleAxis, SamplingWarnings), SamplingError> {
    let reference = wavenumber_reference_from_wavelength(wl);
    let (implied_lo, implied_hi) = implied_wavenumber_margins(wl, wl_margin);
    let margin_lo = wn_margin_lo.unwrap_or(implied_lo);
    let margin_hi = wn_margin_hi.unwrap_or(implied_hi);

    let (axis, warn) = build_sample(hint, &reference, Oversampling::Meaningful, margin_lo, margin_hi)?;

    let wl_lo = wl.initial * wl.fct;
    let wl_hi = wl.final_value * wl.fct;
    let implied_wl_lo = 1.0 / (axis.final_value * axis.fct);
    let implied_wl_hi = 1.0 / (axis.initial * axis.fct);
    if implied_wl_hi < wl_lo || implied_wl_lo > wl_hi {
        return Err(SamplingError::WavenumberOutsideWavelength {
            wn_initial: axis.initial,
            wn_final: axis.final_value,
            wl_initial: wl.initial,
            wl_final: wl.final_value,
        });
    }

    Ok((axis, warn))
}

/// Build the radius grid from the atmosphere's own radius limits. When the
/// atmosphere file has exactly one layer, the grid degenerates to that
/// single point (oversampling and margins do not apply).
pub fn build_radius_from_atmosphere(
    hint: &SampleHint,
    atm_radii: &[f64],
    atm_fct: f64,
) -> Result<(SampleAxis, SamplingWarnings), SamplingError> {
    if atm_radii.is_empty() {
        return Err(SamplingError::EmptyAtmosphere);
    }
    if atm_radii.len() == 1 {
        return Ok((
            SampleAxis {
                fct: hint.fct.unwrap_or(atm_fct),
                initial: atm_radii[0],
                final_value: atm_radii[0],
                spacing: 0.0,
                oversample: 1,
                values: vec![atm_radii[0]],
                fixed: true,
            },
            SamplingWarnings::default(),
        ));
    }

    let reference = SampleReference {
        fct: atm_fct,
        initial: atm_radii[0],
        final_value: *atm_radii.last().unwrap(),
        spacing: hint
            .spacing
            .or_else(|| estimate_uniform_spacing(atm_radii)),
        values: Some(atm_radii.to_vec()),
    };
    build_sample(hint, &reference, Oversampling::Irrelevant, 0.0, 0.0)
}

/// Build the impact-parameter grid used by the transmission solver (§4.G),
/// which walks it outer to inner. In the common case the impact parameter
/// grid shares the radius grid's span; a hint may request a different
/// spacing or explicit values (e.g. a coarser grid for a quick look).
pub fn build_impact_parameter_from_radius(
    hint: &SampleHint,
    radius: &SampleAxis,
) -> Result<(SampleAxis, SamplingWarnings), SamplingError> {
    let reference = SampleReference {
        fct: radius.fct,
        initial: radius.initial,
        final_value: radius.final_value,
        spacing: if radius.fixed {
            None
        } else {
            Some(radius.spacing * radius.oversample as f64)
        },
        values: if radius.fixed {
            Some(radius.values.clone())
        } else {
            None
        },
    };
    build_sample(hint, &reference, Oversampling::Irrelevant, 0.0, 0.0)
}

fn estimate_uniform_spacing(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    Some((values[values.len() - 1] - values[0]) / (values.len() as f64 - 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference(initial: f64, final_value: f64, spacing: f64) -> SampleReference {
        SampleReference {
            fct: 1e-4,
            initial,
            final_value,
            spacing: Some(spacing),
            values: None,
        }
    }

    #[test]
    fn default_hint_copies_reference_endpoints() {
        let hint = SampleHint::default();
        let refr = reference(2.0, 2.5, 2e-5);
        let (axis, _) = build_sample(&hint, &refr, Oversampling::Meaningful, 0.0, 0.0).unwrap();
        assert_relative_eq!(axis.values[0], 2.0);
        assert_relative_eq!(*axis.values.last().unwrap(), 2.5, epsilon = 2e-5);
        assert!(axis.values.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn oversampling_multiplies_point_count() {
        let hint = SampleHint {
            oversample: Some(100),
            ..Default::default()
        };
        let refr = reference(2.0, 2.5, 2e-5);
        let (axis, _) = build_sample(&hint, &refr, Oversampling::Meaningful, 0.0, 0.0).unwrap();
        let (baseline, _) =
            build_sample(&SampleHint::default(), &refr, Oversampling::Meaningful, 0.0, 0.0)
                .unwrap();
        assert_eq!(axis.len() - 1, (baseline.len() - 1) * 100);
    }

    #[test]
    fn out_of_range_hint_is_rejected() {
        let hint = SampleHint {
            initial: Some(1.0),
            ..Default::default()
        };
        let refr = reference(2.0, 2.5, 2e-5);
        let err = build_sample(&hint, &refr, Oversampling::Meaningful, 0.0, 0.0).unwrap_err();
        assert!(matches!(err, SamplingError::InitialOutOfRange { .. }));
    }

    #[test]
    fn spacing_and_explicit_values_conflict() {
        let hint = SampleHint {
            spacing: Some(1.0),
            explicit_values: Some(vec![1.0, 2.0, 3.0]),
            ..Default::default()
        };
        let refr = reference(0.0, 10.0, 1.0);
        let err = build_sample(&hint, &refr, Oversampling::Meaningful, 0.0, 0.0).unwrap_err();
        assert!(matches!(err, SamplingError::SpacingAndCountBothHinted));
    }

    #[test]
    fn wavenumber_from_wavelength_round_trips() {
        let hint = SampleHint::default();
        let wl_ref = reference(2.0, 2.5, 2e-5);
        let (wl, _) =
            build_sample(&hint, &wl_ref, Oversampling::Meaningful, 0.0, 0.0).unwrap();
        let (wn, _) =
            build_wavenumber_from_wavelength(&SampleHint::default(), &wl, 0.0, None, None)
                .unwrap();
        let implied_wl_lo = 1.0 / (wn.final_value * wn.fct);
        let implied_wl_hi = 1.0 / (wn.initial * wn.fct);
        assert!(implied_wl_lo <= wl.initial * wl.fct + 1e-9);
        assert!(implied_wl_hi >= wl.final_value * wl.fct - 1e-9);
    }

    #[test]
    fn impact_parameter_defaults_to_radius_span() {
        let hint = SampleHint::default();
        let radius_ref = reference(1.0e8, 2.0e8, 1e6);
        let (radius, _) = build_sample(&hint, &radius_ref, Oversampling::Irrelevant, 0.0, 0.0).unwrap();
        let (b, _) = build_impact_parameter_from_radius(&SampleHint::default(), &radius).unwrap();
        assert_relative_eq!(b.values[0], radius.values[0]);
        assert_relative_eq!(*b.values.last().unwrap(), *radius.values.last().unwrap());
    }

    #[test]
    fn single_layer_atmosphere_degenerates_radius_grid() {
        let hint = SampleHint::default();
        let (axis, _) = build_radius_from_atmosphere(&hint, &[6.4e8], 1.0).unwrap();
        assert_eq!(axis.len(), 1);
        assert!(axis.fixed);
    }
}

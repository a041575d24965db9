// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Line-shape engine: the dominant hot loop. Builds per-isotope Voigt profile
buffers lazily as the wavenumber scan descends through a line list, and
accumulates each transition's contribution into an extinction plane.
Grounded on `transit/src/extinction.c` and `pu/src/voigt.c`, see §4.E.
 */

pub mod error;
pub mod voigt;

pub use error::LineShapeError;

use crate::constants::{AMU, K_BOLTZMANN, LIGHT_SPEED, PLANCK, SIGMA0, SQRT_LN2};
use crate::linedb::LineTransitions;

/// `propto_D = sqrt(2 k_B T / amu) * sqrt(ln 2) / c`, the Doppler-width
/// coefficient shared by every isotope at a given layer temperature.
pub fn propto_doppler(temperature: f64) -> f64 {
    (2.0 * K_BOLTZMANN * temperature / AMU).sqrt() * SQRT_LN2 / LIGHT_SPEED
}

/// `propto_L = sqrt(2 k_B T / (pi amu)) / (amu c)`, the Lorentz-width
/// coefficient shared by every isotope pair at a given layer temperature.
pub fn propto_lorentz(temperature: f64) -> f64 {
    (2.0 * K_BOLTZMANN * temperature / (std::f64::consts::PI * AMU)).sqrt() / (AMU * LIGHT_SPEED)
}

/// `alpha_D,i`, the Doppler-width coefficient for one isotope (actual width
/// at wavenumber `nu` is `alpha_d_coeff * nu`).
pub fn doppler_width_coeff(propto_d: f64, mass: f64) -> f64 {
    propto_d / mass.sqrt()
}

/// One collision partner's contribution to isotope `i`'s Lorentz width:
/// `propto_L * n_j/mass_j * (r_i + r_j)^2 * sqrt(1/mass_i + 1/mass_j)`.
pub fn lorentz_width_term(
    propto_l: f64,
    density_j: f64,
    mass_j: f64,
    mass_i: f64,
    combined_radius_cm: f64,
) -> f64 {
    propto_l * (density_j / mass_j) * combined_radius_cm.powi(2)
        * (1.0 / mass_i + 1.0 / mass_j).sqrt()
}

/// A rectangular [fine_bin, n] buffer of Voigt profile samples, each row a
/// copy of the profile shifted by a fraction of one wavenumber bin.
pub struct ProfileBuffer {
    fine_bin: usize,
    half_width: usize,
    rows: Vec<Vec<f64>>,
}

impl ProfileBuffer {
    /// Number of wavenumber-bin offsets spanned by the profile (always
    /// odd, centred on the line).
    pub fn width(&self) -> usize {
        2 * self.half_width + 1
    }

    pub fn half_width(&self) -> usize {
        self.half_width
    }

    pub fn row(&self, sub_bin: usize) -> &[f64] {
        &self.rows[sub_bin]
    }
}

/// Build the Voigt profile buffer for one isotope at one (temporary) line
/// position, per §4.E: half-width `w = max(alpha_D, alpha_L) * times_alpha`,
/// point count `n = 2*round(w/delta_nu) + 1`, `fine_bin` sub-bin-shifted
/// copies.
pub fn build_voigt_profile(
    alpha_d: f64,
    alpha_l: f64,
    delta_nu: f64,
    fine_bin: usize,
    times_alpha: f64,
) -> ProfileBuffer {
    let half_width_nu = alpha_d.max(alpha_l) * times_alpha;
    let half_width = (half_width_nu / delta_nu).round() as usize;
    let n = 2 * half_width + 1;

    let mut rows = Vec::with_capacity(fine_bin);
    for sub in 0..fine_bin {
        let sub_offset = sub as f64 / fine_bin as f64 * delta_nu;
        let mut row = Vec::with_capacity(n);
        for j in 0..n {
            let offset = (j as f64 - half_width as f64) * delta_nu - sub_offset;
            let x = SQRT_LN2 * offset.abs() / alpha_d;
            let y = SQRT_LN2 * alpha_l / alpha_d;
            row.push(voigt::voigt_value(x, y, alpha_d));
        }
        rows.push(row);
    }
    ProfileBuffer {
        fine_bin,
        half_width,
        rows,
    }
}

/// Per-isotope recalculation bookkeeping: the wavenumber bin the profile
/// was last built at, and the bin at which it must be rebuilt.
#[derive(Debug, Clone, Copy)]
pub struct RecalcState {
    pub built_at: usize,
    pub rebuild_before: usize,
}

impl RecalcState {
    /// Recalc index for a profile just built at bin `w_built` with centre
    /// wavenumber `nu`, per §4.E: `w - ceil(maxratio * nu/delta_nu)`,
    /// clipped to at least 1.
    pub fn next_threshold(w_built: usize, nu: f64, delta_nu: f64, maxratio: f64) -> usize {
        let step = (maxratio * nu / delta_nu).ceil() as usize;
        w_built.saturating_sub(step).max(1)
    }
}

/// Find the bin `w` such that `wavenumber[w] <= nu < wavenumber[w+1]`
/// (ascending axis), plus the fine-bin sub-index for `nu`'s fractional
/// offset within that bin.
fn locate_bin(wavenumber: &[f64], nu: f64, fine_bin: usize) -> Option<(usize, usize)> {
    if wavenumber.len() < 2 || nu < wavenumber[0] || nu > wavenumber[wavenumber.len() - 1] {
        return None;
    }
    let w = match wavenumber.binary_search_by(|probe| probe.partial_cmp(&nu).unwrap()) {
        Ok(i) => i.min(wavenumber.len() - 2),
        Err(i) => (i - 1).min(wavenumber.len() - 2),
    };
    let span = wavenumber[w + 1] - wavenumber[w];
    let frac = if span > 0.0 {
        (nu - wavenumber[w]) / span
    } else {
        0.0
    };
    let subw = ((frac * fine_bin as f64) as usize).min(fine_bin - 1);
    Some((w, subw))
}

/// Interpolate a partition function (or any small temperature-indexed
/// table) at `t`, clamping to the end values outside the grid rather than
/// failing (occasional layer temperatures straddle a database's nominal
/// range by round-off).
pub fn interpolate_table(temperatures: &[f64], values: &[f64], t: f64) -> f64 {
    if temperatures.is_empty() {
        return 0.0;
    }
    if temperatures.len() == 1 || t <= temperatures[0] {
        return values[0];
    }
    if t >= temperatures[temperatures.len() - 1] {
        return values[values.len() - 1];
    }
    let i = match temperatures.binary_search_by(|probe| probe.partial_cmp(&t).unwrap()) {
        Ok(i) => i.min(temperatures.len() - 2),
        Err(i) => (i - 1).min(temperatures.len() - 2),
    };
    let span = temperatures[i + 1] - temperatures[i];
    let frac = if span > 0.0 {
        (t - temperatures[i]) / span
    } else {
        0.0
    };
    values[i] * (1.0 - frac) + values[i + 1] * frac
}

/// Per-layer, per-isotope inputs to `compute_layer`.
pub struct LayerIsotope<'a> {
    /// Index into `planes`; identical for every isotope when per-isotope
    /// tracking is off.
    pub plane_index: usize,
    /// Number density including isotopic ratio, molecules/cm^3.
    pub density: f64,
    pub mass: f64,
    /// Pre-windowed transitions, ascending in wavelength (so descending in
    /// wavenumber).
    pub transitions: &'a LineTransitions,
    pub partition_temperatures: &'a [f64],
    pub partition_values: &'a [f64],
    /// Summed Lorentz width for this isotope at this layer (§4.E's
    /// collision-partner sum), already computed by the caller.
    pub alpha_l: f64,
}

/// Inputs shared by every isotope at one layer.
pub struct LayerContext<'a> {
    pub wavenumber: &'a [f64],
    pub delta_nu: f64,
    pub temperature: f64,
    pub fine_bin: usize,
    pub times_alpha: f64,
    pub maxratio: f64,
    /// Skip transitions with `elow` below this cutoff, if set.
    pub min_elow: Option<f64>,
}

/// Accumulate one layer's extinction contribution from every isotope's
/// line list into `planes[plane_index][wavenumber_bin]`, per §4.E.
pub fn compute_layer(
    ctx: &LayerContext,
    isotopes: &mut [LayerIsotope],
    planes: &mut [Vec<f64>],
) -> Result<(), LineShapeError> {
    if ctx.wavenumber.len() < 2 {
        return Err(LineShapeError::DegenerateAxis);
    }
    let w_count = ctx.wavenumber.len();
    let propto_d = propto_doppler(ctx.temperature);

    for (iso_idx, iso) in isotopes.iter_mut().enumerate() {
        if iso.partition_values.is_empty() {
            return Err(LineShapeError::EmptyPartition { isotope: iso_idx });
        }
        let alpha_d_coeff = doppler_width_coeff(propto_d, iso.mass);
        let z_at_t = interpolate_table(iso.partition_temperatures, iso.partition_values, ctx.temperature);

        let w_top = w_count - 1;
        let nu_top = ctx.wavenumber[w_top];
        let mut recalc = RecalcState {
            built_at: w_top,
            rebuild_before: RecalcState::next_threshold(w_top, nu_top, ctx.delta_nu, ctx.maxratio),
        };
        let mut profile = build_voigt_profile(
            alpha_d_coeff * nu_top,
            iso.alpha_l,
            ctx.delta_nu,
            ctx.fine_bin,
            ctx.times_alpha,
        );

        let mut last_w: Option<usize> = None;
        for t in 0..iso.transitions.len() {
            let elow = iso.transitions.elow[t];
            if let Some(cutoff) = ctx.min_elow {
                if elow < cutoff {
                    continue;
                }
            }
            let wavelength_cm = crate::linedb::microns_to_cm(iso.transitions.wavelength_um[t]);
            let nu = 1.0 / wavelength_cm;
            let (w, subw) = match locate_bin(ctx.wavenumber, nu, ctx.fine_bin) {
                Some(v) => v,
                None => continue,
            };

            if let Some(prev) = last_w {
                if w > prev {
                    return Err(LineShapeError::NotMonotonic {
                        isotope: iso_idx,
                        previous: prev,
                        current: w,
                    });
                }
            }
            last_w = Some(w);

            if w <= recalc.rebuild_before {
                let nu_w = ctx.wavenumber[w];
                profile = build_voigt_profile(
                    alpha_d_coeff * nu_w,
                    iso.alpha_l,
                    ctx.delta_nu,
                    ctx.fine_bin,
                    ctx.times_alpha,
                );
                recalc.built_at = w;
                recalc.rebuild_before =
                    RecalcState::next_threshold(w, nu_w, ctx.delta_nu, ctx.maxratio);
            }

            let photon_energy_over_kt = PLANCK * LIGHT_SPEED / (K_BOLTZMANN * ctx.temperature);
            let boltzmann_factor = (-elow * photon_energy_over_kt).exp();
            let stim_factor = 1.0 - (-nu * photon_energy_over_kt).exp();
            let gf = 10f64.powf(iso.transitions.log_gf[t]);
            let k0 = iso.density * SIGMA0 * gf * boltzmann_factor * stim_factor / iso.mass / z_at_t;

            let half_width = profile.half_width();
            let base = w.saturating_sub(half_width);
            let end = (w + half_width + 1).min(w_count);
            let row = profile.row(subw);
            let plane = &mut planes[iso.plane_index];
            for j in base..end {
                plane[j] += k0 * row[j - base];
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linedb::LineTransitions;

    fn uniform_wavenumber(n: usize, lo: f64, hi: f64) -> Vec<f64> {
        let step = (hi - lo) / (n - 1) as f64;
        (0..n).map(|i| lo + i as f64 * step).collect()
    }

    #[test]
    fn profile_buffer_has_odd_width_centred_on_the_line() {
        let profile = build_voigt_profile(0.02, 0.01, 0.01, 5, 50.0);
        assert_eq!(profile.width() % 2, 1);
        assert_eq!(profile.width(), 2 * profile.half_width() + 1);
    }

    #[test]
    fn recalc_threshold_is_below_the_build_point() {
        let w = RecalcState::next_threshold(1000, 2000.0, 0.01, 0.001);
        assert!(w < 1000);
        assert!(w >= 1);
    }

    #[test]
    fn recalc_threshold_never_drops_below_one() {
        let w = RecalcState::next_threshold(1, 0.5, 1.0, 0.5);
        assert_eq!(w, 1);
    }

    #[test]
    fn compute_layer_rejects_non_monotonic_transitions() {
        let wavenumber = uniform_wavenumber(200, 2000.0, 2200.0);
        let mut transitions = LineTransitions::default();
        // Wavelengths out of ascending order -> wavenumbers out of
        // descending order -> bin index violates the non-increasing
        // invariant.
        transitions.wavelength_um.push(1.0 / 2100.0 * 1e4);
        transitions.wavelength_um.push(1.0 / 2190.0 * 1e4);
        transitions.isotope_id.push(0);
        transitions.isotope_id.push(0);
        transitions.elow.push(100.0);
        transitions.elow.push(100.0);
        transitions.log_gf.push(-3.0);
        transitions.log_gf.push(-3.0);

        let ctx = LayerContext {
            wavenumber: &wavenumber,
            delta_nu: wavenumber[1] - wavenumber[0],
            temperature: 300.0,
            fine_bin: 5,
            times_alpha: 50.0,
            maxratio: 0.001,
            min_elow: None,
        };
        let mut isotopes = vec![LayerIsotope {
            plane_index: 0,
            density: 1e18,
            mass: 18.0,
            transitions: &transitions,
            partition_temperatures: &[100.0, 300.0, 500.0],
            partition_values: &[50.0, 120.0, 210.0],
            alpha_l: 0.005,
        }];
        let mut planes = vec![vec![0.0; wavenumber.len()]];
        let err = compute_layer(&ctx, &mut isotopes, &mut planes).unwrap_err();
        assert!(matches!(err, LineShapeError::NotMonotonic { .. }));
    }

    #[test]
    fn compute_layer_accumulates_positive_extinction_near_the_line() {
        let wavenumber = uniform_wavenumber(400, 2000.0, 2400.0);
        let line_wn = 2200.0;
        let mut transitions = LineTransitions::default();
        transitions.wavelength_um.push(1.0 / line_wn * 1e4);
        transitions.isotope_id.push(0);
        transitions.elow.push(50.0);
        transitions.log_gf.push(-2.0);

        let ctx = LayerContext {
            wavenumber: &wavenumber,
            delta_nu: wavenumber[1] - wavenumber[0],
            temperature: 300.0,
            fine_bin: 5,
            times_alpha: 50.0,
            maxratio: 0.001,
            min_elow: None,
        };
        let mut isotopes = vec![LayerIsotope {
            plane_index: 0,
            density: 1e18,
            mass: 18.0,
            transitions: &transitions,
            partition_temperatures: &[100.0, 300.0, 500.0],
            partition_values: &[50.0, 120.0, 210.0],
            alpha_l: 0.01,
        }];
        let mut planes = vec![vec![0.0; wavenumber.len()]];
        compute_layer(&ctx, &mut isotopes, &mut planes).unwrap();

        let peak_bin = wavenumber
            .iter()
            .position(|&nu| nu >= line_wn)
            .unwrap();
        assert!(planes[0][peak_bin] > 0.0);
        assert!(planes[0].iter().sum::<f64>() > 0.0);
    }
}

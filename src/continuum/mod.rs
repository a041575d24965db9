// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Continuum opacity: collision-induced absorption tables, a pluggable
Rayleigh/scattering hook, and a grey cloud ramp. Grounded on
`transit/src/cia.c` (table layout and interpolation order) and
`transit/src/extinction.c` (cloud ramp); see §4.F.
 */

pub mod error;

pub use error::ContinuumError;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::resample::spline;

/// A 2-D collision-induced-absorption table (temperature x wavenumber) for
/// one pair of molecules.
#[derive(Debug, Clone)]
pub struct CiaTable {
    pub molecule_a: String,
    pub molecule_b: String,
    pub temperatures: Vec<f64>,
    pub wavenumber: Vec<f64>,
    /// `values[w][t]`: absorption coefficient at table wavenumber `w` and
    /// table temperature `t`, cm^5/molecule^2 (Amagat^-2 cm^-1 in the
    /// original's units).
    pub values: Vec<Vec<f64>>,
}

/// Parse a CIA text table: comment lines start with `#`; the first
/// non-comment line lists temperatures; subsequent lines are `(wavenumber,
/// value_at_each_temperature)`.
pub fn load_cia_table(
    path: impl AsRef<Path>,
    molecule_a: &str,
    molecule_b: &str,
) -> Result<CiaTable, ContinuumError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ContinuumError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let mut temperatures: Option<Vec<f64>> = None;
    let mut wavenumber = Vec::new();
    let mut values = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| ContinuumError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let t = line.trim();
        if t.is_empty() || t.starts_with('#') {
            continue;
        }
        let tokens: Vec<f64> = t
            .split_whitespace()
            .map(|s| s.parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|_| ContinuumError::Format {
                path: path.to_path_buf(),
                line: line_no,
                detail: "expected numeric row".to_string(),
            })?;

        if temperatures.is_none() {
            temperatures = Some(tokens);
            continue;
        }
        let n_t = temperatures.as_ref().unwrap().len();
        if tokens.len() != n_t + 1 {
            return Err(ContinuumError::Format {
                path: path.to_path_buf(),
                line: line_no,
                detail: format!("expected 1 + {n_t} columns, got {}", tokens.len()),
            });
        }
        wavenumber.push(tokens[0]);
        values.push(tokens[1..].to_vec());
    }

    Ok(CiaTable {
        molecule_a: molecule_a.to_string(),
        molecule_b: molecule_b.to_string(),
        temperatures: temperatures.unwrap_or_default(),
        wavenumber,
        values,
    })
}

impl CiaTable {
    /// Interpolate this table onto the solver's wavenumber grid at a
    /// single layer temperature, per §4.F: spline in temperature at each
    /// table wavenumber first, then spline in wavenumber onto the solver
    /// grid. Out-of-range table wavenumbers/temperatures contribute zero
    /// (the caller's solver grid point falls outside this table's span).
    pub fn interpolate(&self, temperature: f64, solver_wavenumber: &[f64]) -> Vec<f64> {
        if self.wavenumber.is_empty() || self.temperatures.is_empty() {
            return vec![0.0; solver_wavenumber.len()];
        }

        let at_temperature: Vec<f64> = if self.temperatures.len() == 1 {
            self.values.iter().map(|row| row[0]).collect()
        } else {
            self.values
                .iter()
                .map(|row| {
                    let second_deriv = spline::second_derivatives(&self.temperatures, row);
                    spline_eval_clamped(&self.temperatures, row, &second_deriv, temperature)
                })
                .collect()
        };

        let lo = self.wavenumber[0];
        let hi = self.wavenumber[self.wavenumber.len() - 1];
        let second_deriv = spline::second_derivatives(&self.wavenumber, &at_temperature);
        solver_wavenumber
            .iter()
            .map(|&wn| {
                if wn < lo || wn > hi {
                    0.0
                } else {
                    spline_eval_clamped(&self.wavenumber, &at_temperature, &second_deriv, wn)
                }
            })
            .collect()
    }
}

/// Evaluate a natural cubic spline at an arbitrary abscissa, clamping the
/// endpoint value outside the table's domain rather than extrapolating.
fn spline_eval_clamped(x: &[f64], y: &[f64], second_deriv: &[f64], v: f64) -> f64 {
    if x.len() == 1 {
        return y[0];
    }
    let ascending = x[1] > x[0];
    let lo = x[0].min(x[x.len() - 1]);
    let hi = x[0].max(x[x.len() - 1]);
    if v <= lo {
        return if ascending { y[0] } else { y[y.len() - 1] };
    }
    if v >= hi {
        return if ascending { y[y.len() - 1] } else { y[0] };
    }
    let mut i = 0;
    while i + 2 < x.len() && ((ascending && v > x[i + 1]) || (!ascending && v < x[i + 1])) {
        i += 1;
    }
    let span = x[i + 1] - x[i];
    let t = if span != 0.0 { (v - x[i]) / span } else { 0.0 };
    spline::evaluate(x, y, second_deriv, i, t)
}

/// Combine densities of the two participating molecules (in Amagat) and
/// the table value into an extinction contribution, cm^-1. 1 Amagat =
/// 2.6867811e19 molecules/cm^3 (Loschmidt's number).
pub const AMAGAT: f64 = 2.6867811e19;

pub fn cia_extinction(table_value: f64, density_a: f64, density_b: f64) -> f64 {
    table_value * (density_a / AMAGAT) * (density_b / AMAGAT)
}

/// Pluggable Rayleigh/scattering contribution, seeing full layer state.
pub trait ScatteringHook {
    fn extinction(&self, radius_cm: f64, temperature: f64, density: f64, wavenumber: f64) -> f64;
}

/// Standard Rayleigh scattering cross section, `sigma = A * wavenumber^4`,
/// scaled by number density.
pub struct RayleighScattering {
    pub cross_section_coeff: f64,
}

impl ScatteringHook for RayleighScattering {
    fn extinction(&self, _radius_cm: f64, _temperature: f64, density: f64, wavenumber: f64) -> f64 {
        self.cross_section_coeff * wavenumber.powi(4) * density
    }
}

/// Linear-ramp grey cloud: zero extinction above `r_upper_cm`, `k_max` at
/// and below `r_lower_cm`, linear in between.
#[derive(Debug, Clone, Copy)]
pub struct GreyCloud {
    pub r_upper_cm: f64,
    pub r_lower_cm: f64,
    pub k_max: f64,
}

impl GreyCloud {
    pub fn new(r_upper_cm: f64, r_lower_cm: f64, k_max: f64) -> Result<Self, ContinuumError> {
        if r_upper_cm < r_lower_cm || r_upper_cm <= 0.0 || r_lower_cm <= 0.0 {
            return Err(ContinuumError::InvalidCloudGeometry {
                upper: r_upper_cm,
                lower: r_lower_cm,
            });
        }
        Ok(Self {
            r_upper_cm,
            r_lower_cm,
            k_max,
        })
    }

    pub fn extinction(&self, radius_cm: f64) -> f64 {
        if radius_cm >= self.r_upper_cm {
            0.0
        } else if radius_cm <= self.r_lower_cm {
            self.k_max
        } else {
            let frac = (self.r_upper_cm - radius_cm) / (self.r_upper_cm - self.r_lower_cm);
            self.k_max * frac
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grey_cloud_ramps_linearly_between_bounds() {
        let cloud = GreyCloud::new(10.0, 5.0, 2.0).unwrap();
        assert_eq!(cloud.extinction(11.0), 0.0);
        assert_eq!(cloud.extinction(4.0), 2.0);
        assert!((cloud.extinction(7.5) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn grey_cloud_rejects_inverted_bounds() {
        let err = GreyCloud::new(5.0, 10.0, 1.0).unwrap_err();
        assert!(matches!(err, ContinuumError::InvalidCloudGeometry { .. }));
    }

    #[test]
    fn rayleigh_scales_with_wavenumber_to_the_fourth() {
        let hook = RayleighScattering {
            cross_section_coeff: 1e-30,
        };
        let low = hook.extinction(0.0, 0.0, 1e18, 1000.0);
        let high = hook.extinction(0.0, 0.0, 1e18, 2000.0);
        assert!((high / low - 16.0).abs() < 1e-6);
    }

    #[test]
    fn cia_table_interpolates_and_zeros_outside_range() {
        let table = CiaTable {
            molecule_a: "H2".to_string(),
            molecule_b: "He".to_string(),
            temperatures: vec![100.0, 300.0],
            wavenumber: vec![1000.0, 2000.0, 3000.0],
            values: vec![vec![1.0, 2.0], vec![2.0, 4.0], vec![3.0, 6.0]],
        };
        let out = table.interpolate(300.0, &[500.0, 2000.0, 4000.0]);
        assert_eq!(out[0], 0.0);
        assert!((out[1] - 4.0).abs() < 1e-9);
        assert_eq!(out[2], 0.0);
    }
}

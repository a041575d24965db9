// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Atmosphere binder: maps atmosphere-file molecules onto number densities at
every solver radius, and binds line-database isotopes to those molecules.
Grounded on the original's `at_file.c`/`iomisc.c` molecule bookkeeping; see
§4.C.
 */

pub mod atm_file;
pub mod error;
pub mod metadata;

pub use atm_file::{AbundanceBasis, AtmosphereFile};
pub use error::AtmosphereError;
pub use metadata::MoleculeMetadata;

use crate::constants::K_BOLTZMANN;
use crate::linedb::Isotope;
use crate::resample::{InterpMode, Resampler};

/// A chemical species carrying a per-radius abundance and number density.
#[derive(Debug, Clone)]
pub struct Molecule {
    pub name: String,
    pub mass: f64,
    pub radius_cm: f64,
    /// Mass or number fraction at each solver radius.
    pub q: Vec<f64>,
    /// Number density at each solver radius, molecules/cm^3.
    pub density: Vec<f64>,
}

/// The bound atmosphere: molecules resampled onto the solver's radius
/// grid, with temperature and pressure likewise resampled.
#[derive(Debug, Clone)]
pub struct BoundAtmosphere {
    pub molecules: Vec<Molecule>,
    pub pressure: Vec<f64>,
    pub temperature: Vec<f64>,
}

impl BoundAtmosphere {
    pub fn molecule_index(&self, name: &str) -> Option<usize> {
        self.molecules.iter().position(|m| m.name == name)
    }
}

/// Decompose a chemical formula like `H2O` or `CO2` into (element, count)
/// pairs. Element symbols are one uppercase letter optionally followed by
/// one lowercase letter; counts default to 1 when absent.
pub fn parse_formula(formula: &str) -> Vec<(String, u32)> {
    let chars: Vec<char> = formula.chars().collect();
    let mut out = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if !chars[i].is_ascii_uppercase() {
            i += 1;
            continue;
        }
        let mut symbol = chars[i].to_string();
        i += 1;
        if i < chars.len() && chars[i].is_ascii_lowercase() {
            symbol.push(chars[i]);
            i += 1;
        }
        let mut digits = String::new();
        while i < chars.len() && chars[i].is_ascii_digit() {
            digits.push(chars[i]);
            i += 1;
        }
        let count = if digits.is_empty() {
            1
        } else {
            digits.parse().unwrap_or(1)
        };
        out.push((symbol, count));
    }
    out
}

fn molar_mass(name: &str, metadata: &MoleculeMetadata) -> Result<f64, AtmosphereError> {
    let resolved = metadata.resolve(name);
    let mut mass = 0.0;
    for (element, count) in parse_formula(resolved) {
        let m = metadata
            .atomic_mass
            .get(&element)
            .ok_or_else(|| AtmosphereError::UnknownElement {
                element: element.clone(),
                molecule: name.to_string(),
            })?;
        mass += m * count as f64;
    }
    if mass <= 0.0 {
        return Err(AtmosphereError::UnknownMolecule {
            name: name.to_string(),
        });
    }
    Ok(mass)
}

/// Bind a parsed atmosphere file onto the solver's radius grid, per §4.C.
///
/// `solver_radius_cm` is the final radius axis (already built by the
/// sampling stage); `file_radius_cm` is the atmosphere file's own radius
/// column, both in centimetres.
pub fn bind(
    file: &AtmosphereFile,
    file_radius_cm: &[f64],
    solver_radius_cm: &[f64],
    metadata: &MoleculeMetadata,
    allowq: f64,
) -> Result<BoundAtmosphere, AtmosphereError> {
    let n_file = file.layers.len();
    let n_explicit = file.explicit_molecules.len();

    // Remainder shares must sum to ~1.
    let remainder_sum: f64 = file.remainder_molecules.iter().map(|r| r.share).sum();
    if !file.remainder_molecules.is_empty() && (remainder_sum - 1.0).abs() > 1e-5 {
        return Err(AtmosphereError::RemainderShareTolerance { sum: remainder_sum });
    }

    // Per-layer explicit-molecule sums, to derive remainder abundances.
    let mut explicit_sum = vec![0.0; n_file];
    for (l, layer) in file.layers.iter().enumerate() {
        explicit_sum[l] = layer.q_explicit.iter().sum();
    }

    let mut file_q: Vec<Vec<f64>> = Vec::with_capacity(n_explicit + file.remainder_molecules.len());
    let mut names: Vec<String> = file.explicit_molecules.clone();
    for i in 0..n_explicit {
        file_q.push((0..n_file).map(|l| file.layers[l].q_explicit[i]).collect());
    }
    for remainder in &file.remainder_molecules {
        names.push(remainder.name.clone());
        file_q.push(
            (0..n_file)
                .map(|l| remainder.share * (1.0 - explicit_sum[l]))
                .collect(),
        );
    }

    // Tolerance check: sum of all molecule fractions per layer must be ~1.
    for l in 0..n_file {
        let sum: f64 = file_q.iter().map(|q| q[l]).sum();
        if (sum - 1.0).abs() > allowq {
            return Err(AtmosphereError::AbundanceTolerance {
                layer: l,
                sum,
                tolerance: allowq,
            });
        }
    }

    let mut resampler = Resampler::new();
    resampler.set_x(InterpMode::Linear, file_radius_cm, solver_radius_cm)?;
    let pressure: Vec<f64> = {
        let file_p: Vec<f64> = file.layers.iter().map(|l| l.pressure * file.pressure_fct).collect();
        resampler.interp_y(InterpMode::Linear, &file_p)?
    };
    let temperature: Vec<f64> = {
        let file_t: Vec<f64> = file.layers.iter().map(|l| l.temperature * file.temperature_fct).collect();
        resampler.interp_y(InterpMode::Linear, &file_t)?
    };

    let mean_mass_file: Vec<f64> = (0..n_file)
        .map(|l| {
            let masses: Vec<f64> = names
                .iter()
                .map(|n| molar_mass(n, metadata))
                .collect::<Result<_, _>>()
                .unwrap_or_default();
            match file.basis {
                AbundanceBasis::Number => {
                    masses.iter().zip(file_q.iter()).map(|(m, q)| m * q[l]).sum()
                }
                AbundanceBasis::Mass => {
                    let denom: f64 = names
                        .iter()
                        .zip(file_q.iter())
                        .map(|(n, q)| {
                            let m = molar_mass(n, metadata).unwrap_or(1.0);
                            q[l] / m
                        })
                        .sum();
                    if denom > 0.0 { 1.0 / denom } else { 0.0 }
                }
            }
        })
        .collect();

    let mean_mass_solver = resampler.interp_y(InterpMode::Linear, &mean_mass_file)?;

    let mut molecules = Vec::with_capacity(names.len());
    for (i, name) in names.iter().enumerate() {
        let mass = molar_mass(name, metadata)?;
        let radius_cm = metadata.radius_cm(name).unwrap_or(0.0);

        let q_resampled = resampler.interp_y(InterpMode::Linear, &file_q[i])?;

        let mut density = vec![0.0; solver_radius_cm.len()];
        let p_solver = &pressure;
        let t_solver = &temperature;
        for r in 0..solver_radius_cm.len() {
            let q_r = match file.basis {
                AbundanceBasis::Number => q_resampled[r],
                AbundanceBasis::Mass => {
                    if mean_mass_solver[r] > 0.0 {
                        q_resampled[r] * mean_mass_solver[r] / mass
                    } else {
                        0.0
                    }
                }
            };
            density[r] = q_r * p_solver[r] / (K_BOLTZMANN * t_solver[r]);
        }

        molecules.push(Molecule {
            name: name.clone(),
            mass,
            radius_cm,
            q: q_resampled,
            density,
        });
    }

    Ok(BoundAtmosphere {
        molecules,
        pressure,
        temperature,
    })
}

/// Bind each isotope to its parent molecule by matching its database name
/// against the known-database table (§4.B `known_molecule_for_database`),
/// and derive its isotopic ratio from the metadata aliases (falls back to
/// 1.0 when the metadata file carries no explicit ratio table, matching
/// §9's molecule<->isotope design note).
pub fn bind_isotopes(
    isotopes: &mut [Isotope],
    database_names: &[String],
    atmosphere: &BoundAtmosphere,
) -> Result<(), AtmosphereError> {
    for iso in isotopes.iter_mut() {
        let database_name = &database_names[iso.db_index];
        let molecule_name = crate::linedb::known_molecule_for_database(database_name)
            .ok_or_else(|| AtmosphereError::UnboundIsotope {
                database: database_name.clone(),
            })?;
        let idx = atmosphere
            .molecule_index(molecule_name)
            .ok_or_else(|| AtmosphereError::UnboundIsotope {
                database: database_name.clone(),
            })?;
        iso.molecule = Some(idx);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formula_parser_splits_elements_and_counts() {
        assert_eq!(
            parse_formula("H2O"),
            vec![("H".to_string(), 2), ("O".to_string(), 1)]
        );
        assert_eq!(parse_formula("CO2"), vec![("C".to_string(), 1), ("O".to_string(), 2)]);
        assert_eq!(parse_formula("He"), vec![("He".to_string(), 1)]);
    }

    fn sample_metadata() -> MoleculeMetadata {
        let mut m = MoleculeMetadata::default();
        m.atomic_mass.insert("H".to_string(), 1.00794);
        m.atomic_mass.insert("O".to_string(), 15.9994);
        m.radii_cm.insert("H2O".to_string(), 1.3e-8);
        m
    }

    #[test]
    fn bind_computes_number_density_from_ideal_gas_law() {
        let file = AtmosphereFile {
            basis: AbundanceBasis::Number,
            zero_radius_offset: 0.0,
            radius_fct: 1.0,
            pressure_fct: 1.0,
            temperature_fct: 1.0,
            comment: String::new(),
            explicit_molecules: vec!["H2O".to_string()],
            remainder_molecules: vec![],
            layers: vec![
                atm_file::LayerRow {
                    radius: 1.0e8,
                    pressure: 1e6,
                    temperature: 300.0,
                    q_explicit: vec![1.0],
                },
                atm_file::LayerRow {
                    radius: 2.0e8,
                    pressure: 1e6,
                    temperature: 300.0,
                    q_explicit: vec![1.0],
                },
            ],
        };
        let metadata = sample_metadata();
        let radius = vec![1.0e8, 1.5e8, 2.0e8];
        let bound = bind(&file, &[1.0e8, 2.0e8], &radius, &metadata, 0.01).unwrap();
        assert_eq!(bound.molecules.len(), 1);
        let expected = 1e6 / (K_BOLTZMANN * 300.0);
        assert!((bound.molecules[0].density[0] - expected).abs() / expected < 1e-6);
    }

    #[test]
    fn bind_rejects_abundance_sum_outside_tolerance() {
        let file = AtmosphereFile {
            basis: AbundanceBasis::Number,
            zero_radius_offset: 0.0,
            radius_fct: 1.0,
            pressure_fct: 1.0,
            temperature_fct: 1.0,
            comment: String::new(),
            explicit_molecules: vec!["H2O".to_string()],
            remainder_molecules: vec![],
            layers: vec![atm_file::LayerRow {
                radius: 1.0e8,
                pressure: 1e6,
                temperature: 300.0,
                q_explicit: vec![0.5],
            }],
        };
        let metadata = sample_metadata();
        let err = bind(&file, &[1.0e8], &[1.0e8], &metadata, 0.01).unwrap_err();
        assert!(matches!(err, AtmosphereError::AbundanceTolerance { .. }));
    }
}

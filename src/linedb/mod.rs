// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Line-transition database (TLI) reading.

Two dialects (binary and ASCII) share one logical header and one logical
transitions stream; see `SPEC_FULL.md` §4.B. Grounded on
`transit/src/readlineinfo.c` and `lineread/src/dbread_pands.c` of the
original `transit`/`lineread` programs.
 */

pub mod ascii;
pub mod binary;
pub mod error;

use std::path::{Path, PathBuf};

use itertools::Itertools;

pub use error::LineDbError;

use crate::constants::TLI_WAVELENGTH_UNIT_CM;

/// A line transition loaded into memory: four parallel arrays rather than
/// an array-of-structs, matching the access pattern of the line-shape
/// engine (§4.E iterates the four arrays in lockstep).
#[derive(Debug, Clone, Default)]
pub struct LineTransitions {
    /// Wavelength in microns (TLI's native storage unit).
    pub wavelength_um: Vec<f64>,
    pub isotope_id: Vec<i16>,
    pub elow: Vec<f64>,
    pub log_gf: Vec<f64>,
}

impl LineTransitions {
    pub fn len(&self) -> usize {
        self.wavelength_um.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelength_um.is_empty()
    }

    /// Checks the §4.E invariant that wavelengths are non-decreasing.
    pub fn assert_monotonic(&self, path: &Path) -> Result<(), LineDbError> {
        for (i, (prev, next)) in self.wavelength_um.iter().tuple_windows().enumerate() {
            if next < prev {
                return Err(LineDbError::NotMonotonic {
                    path: path.to_path_buf(),
                    index: i + 1,
                });
            }
        }
        Ok(())
    }
}

/// An isotope identified by (database index, local index within that
/// database).
#[derive(Debug, Clone)]
pub struct Isotope {
    pub db_index: usize,
    pub local_index: usize,
    pub name: String,
    /// Molar mass, g/mol.
    pub mass: f64,
    /// Index into the atmosphere binder's molecule table; `None` until
    /// bound (§4.C).
    pub molecule: Option<usize>,
    /// Isotopic abundance ratio within its parent molecule.
    pub isotopic_ratio: f64,
    /// Partition function Z(T) sampled at the database's temperature grid.
    pub partition: Vec<f64>,
    /// Internal cross section C(T) sampled at the database's temperature
    /// grid.
    pub cross_section: Vec<f64>,
}

/// A named group of isotopes sharing one temperature grid.
#[derive(Debug, Clone)]
pub struct Database {
    pub name: String,
    pub temperatures: Vec<f64>,
    /// Starting index into the global (concatenated) isotope table.
    pub isotope_start: usize,
    pub isotope_count: usize,
}

impl Database {
    pub fn isotope_range(&self) -> std::ops::Range<usize> {
        self.isotope_start..self.isotope_start + self.isotope_count
    }
}

/// Everything read from a TLI file up to, but not including, the line
/// transitions, plus the byte offset at which transitions begin.
#[derive(Debug, Clone)]
pub struct LineDbHeader {
    pub path: PathBuf,
    pub dialect: Dialect,
    pub version: u16,
    pub producer_version: u16,
    pub producer_revision: u16,
    /// Database wavelength span, in microns.
    pub initial_wavelength_um: f64,
    pub final_wavelength_um: f64,
    pub comment: String,
    pub databases: Vec<Database>,
    pub isotopes: Vec<Isotope>,
    pub transitions_offset: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Binary,
    Ascii,
}

/// Load everything up to the transitions stream, auto-detecting the
/// dialect by magic bytes / leading comment marker.
pub fn load_info(path: impl AsRef<Path>) -> Result<LineDbHeader, LineDbError> {
    let path = path.as_ref();
    if binary::looks_like_binary(path)? {
        binary::load_info(path)
    } else {
        ascii::load_info(path)
    }
}

/// Load only transitions with `wl_lo <= wl <= wl_hi` (microns).
pub fn load_range(
    header: &LineDbHeader,
    wl_lo: f64,
    wl_hi: f64,
) -> Result<LineTransitions, LineDbError> {
    match header.dialect {
        Dialect::Binary => binary::load_range(header, wl_lo, wl_hi),
        Dialect::Ascii => ascii::load_range(header, wl_lo, wl_hi),
    }
}

/// Result of window validation against the database's own span, per §4.B
/// `check_range`.
#[derive(Debug, Clone, Copy)]
pub struct EffectiveWindow {
    pub lo: f64,
    pub hi: f64,
    pub warn_outside_margin: bool,
}

/// Validate a requested wavelength window against the database span and a
/// margin, returning the effective (clipped) extraction window.
pub fn check_range(
    requested_lo: f64,
    requested_hi: f64,
    db_lo: f64,
    db_hi: f64,
    margin: f64,
) -> Result<EffectiveWindow, LineDbError> {
    if 2.0 * margin > (db_hi - db_lo) {
        return Err(LineDbError::MarginExceedsSpan {
            lo: requested_lo,
            hi: requested_hi,
            margin,
            db_lo,
            db_hi,
        });
    }
    if requested_lo > db_hi - margin {
        return Err(LineDbError::RequestedRangeOutOfSpan {
            lo: requested_lo,
            db_hi,
            margin,
        });
    }
    if requested_hi < db_lo + margin {
        return Err(LineDbError::RequestedRangeOutOfSpan {
            lo: requested_hi,
            db_hi: db_lo,
            margin,
        });
    }

    let warn_outside_margin =
        requested_lo < db_lo + margin || requested_hi > db_hi - margin;

    let lo = (requested_lo - margin).max(db_lo);
    let hi = (requested_hi + margin).min(db_hi);
    Ok(EffectiveWindow {
        lo,
        hi,
        warn_outside_margin,
    })
}

lazy_static::lazy_static! {
    /// Database-name substrings to the molecule they are known to belong
    /// to, used by the atmosphere binder (§4.C) to resolve
    /// isotope-to-molecule links without a full chemistry parser.
    ///
    /// Grounded on the original's per-database isotope tables in
    /// `lineread/src/dbread_pands.c` (the Partridge & Schwenke water
    /// database binds its four isotopes to H2O).
    static ref KNOWN_DATABASES: Vec<(&'static str, &'static str)> = vec![
        ("partridge", "H2O"),
        ("p&s", "H2O"),
        ("pands", "H2O"),
        ("hitran_co2", "CO2"),
        ("carbon dioxide", "CO2"),
        ("hitran_ch4", "CH4"),
        ("methane", "CH4"),
        ("hitran_co", "CO"),
    ];
}

pub fn known_molecule_for_database(database_name: &str) -> Option<&'static str> {
    let name = database_name.to_ascii_lowercase();
    if name.contains("hitran_co") && !name.contains("hitran_co2") && !name.contains("hitran_ch4") {
        return Some("CO");
    }
    KNOWN_DATABASES
        .iter()
        .find(|(substr, _)| *substr != "hitran_co" && name.contains(substr))
        .map(|(_, molecule)| *molecule)
}

pub(crate) fn microns_to_cm(wavelength_um: f64) -> f64 {
    wavelength_um * TLI_WAVELENGTH_UNIT_CM
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_range_rejects_margin_wider_than_span() {
        let err = check_range(1.0, 2.0, 0.5, 1.5, 1.0).unwrap_err();
        assert!(matches!(err, LineDbError::MarginExceedsSpan { .. }));
    }

    #[test]
    fn check_range_clips_to_database_span() {
        let window = check_range(0.4, 10.0, 0.5, 5.0, 0.1).unwrap();
        assert_eq!(window.lo, 0.5);
        assert_eq!(window.hi, 5.0);
        assert!(window.warn_outside_margin);
    }

    #[test]
    fn known_database_maps_to_water() {
        assert_eq!(
            known_molecule_for_database("Partridge & Schwenke (1997)"),
            Some("H2O")
        );
        assert_eq!(known_molecule_for_database("unknown"), None);
    }
}

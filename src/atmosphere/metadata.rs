// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Three-block molecule-metadata reader, per §4.C/M: atomic masses, name
//! aliases, and hard-sphere diameters, each block terminated by a blank or
//! all-`#` line.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::error::MetadataError;

/// Diameter-to-radius conversion: stored diameters are in angstrom.
const ANGSTROM_TO_CM: f64 = 1e-8;

#[derive(Debug, Clone, Default)]
pub struct MoleculeMetadata {
    /// Atomic mass by element symbol, g/mol.
    pub atomic_mass: HashMap<String, f64>,
    /// Molecule name aliases, for disambiguating isotopologue/database
    /// naming.
    pub aliases: HashMap<String, String>,
    /// Hard-sphere radius by molecule name, cm (half the metadata file's
    /// diameter, converted from angstrom).
    pub radii_cm: HashMap<String, f64>,
}

impl MoleculeMetadata {
    /// Resolve a molecule name through the alias table.
    pub fn resolve(&self, name: &str) -> &str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }

    pub fn radius_cm(&self, name: &str) -> Option<f64> {
        self.radii_cm.get(self.resolve(name)).copied()
    }
}

fn is_block_terminator(line: &str) -> bool {
    let t = line.trim();
    t.is_empty() || t.chars().all(|c| c == '#' || c.is_whitespace())
}

pub fn parse(path: impl AsRef<Path>) -> Result<MoleculeMetadata, MetadataError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| MetadataError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let mut lines = Vec::new();
    for line in reader.lines() {
        lines.push(line.map_err(|source| MetadataError::Io {
            path: path.to_path_buf(),
            source,
        })?);
    }

    let mut metadata = MoleculeMetadata::default();
    let mut block = 0usize;
    for (line_no, raw) in lines.iter().enumerate() {
        let trimmed = raw.trim();
        if trimmed.starts_with('#') {
            continue;
        }
        if is_block_terminator(raw) {
            if !trimmed.is_empty() {
                continue;
            }
            if block < 2 {
                block += 1;
            }
            continue;
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        match block {
            0 => {
                if tokens.len() != 2 {
                    return Err(fmt_err(path, line_no, "expected `element mass`"));
                }
                let mass: f64 = tokens[1]
                    .parse()
                    .map_err(|_| fmt_err(path, line_no, "bad atomic mass"))?;
                metadata.atomic_mass.insert(tokens[0].to_string(), mass);
            }
            1 => {
                if tokens.len() != 2 {
                    return Err(fmt_err(path, line_no, "expected `name alias`"));
                }
                metadata
                    .aliases
                    .insert(tokens[0].to_string(), tokens[1].to_string());
            }
            _ => {
                if tokens.len() != 2 {
                    return Err(fmt_err(path, line_no, "expected `name diameter_angstrom`"));
                }
                let diameter: f64 = tokens[1]
                    .parse()
                    .map_err(|_| fmt_err(path, line_no, "bad diameter"))?;
                metadata
                    .radii_cm
                    .insert(tokens[0].to_string(), diameter / 2.0 * ANGSTROM_TO_CM);
            }
        }
    }

    Ok(metadata)
}

fn fmt_err(path: &Path, line: usize, detail: impl Into<String>) -> MetadataError {
    MetadataError::Format {
        path: path.to_path_buf(),
        line,
        detail: detail.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_three_blocks() {
        let contents = "\
# atomic masses
H 1.00794
O 15.9994
C 12.0107

# aliases
H2O_PS H2O
#

H2O 2.6
CO2 3.3
";
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        let m = parse(f.path()).unwrap();
        assert_eq!(m.atomic_mass.get("H"), Some(&1.00794));
        assert_eq!(m.resolve("H2O_PS"), "H2O");
        assert!((m.radius_cm("H2O").unwrap() - 1.3e-8).abs() < 1e-12);
    }
}

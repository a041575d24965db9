// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Line-oriented tokenizer for the atmosphere text format, §6 / §4.C/M.
//! Keyword lines begin with a single letter; the first non-keyword,
//! non-comment line starts the per-layer data block.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::error::AtmFileError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbundanceBasis {
    Mass,
    Number,
}

#[derive(Debug, Clone)]
pub struct RemainderMolecule {
    pub name: String,
    pub share: f64,
    pub alias: String,
}

#[derive(Debug, Clone)]
pub struct LayerRow {
    pub radius: f64,
    pub pressure: f64,
    pub temperature: f64,
    /// Abundance of each molecule named by `explicit_molecules`, in order.
    pub q_explicit: Vec<f64>,
}

/// The parsed, pre-bind representation of the atmosphere text format.
#[derive(Debug, Clone)]
pub struct AtmosphereFile {
    pub basis: AbundanceBasis,
    pub zero_radius_offset: f64,
    pub radius_fct: f64,
    pub pressure_fct: f64,
    pub temperature_fct: f64,
    pub comment: String,
    pub explicit_molecules: Vec<String>,
    pub remainder_molecules: Vec<RemainderMolecule>,
    pub layers: Vec<LayerRow>,
}

fn fmt_err(path: &Path, line: usize, detail: impl Into<String>) -> AtmFileError {
    AtmFileError::Format {
        path: path.to_path_buf(),
        line,
        detail: detail.into(),
    }
}

/// Parse an atmosphere file, per §6's keyword-line grammar.
pub fn parse(path: impl AsRef<Path>) -> Result<AtmosphereFile, AtmFileError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| AtmFileError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let mut basis = AbundanceBasis::Number;
    let mut zero_radius_offset = 0.0;
    let mut radius_fct = 1.0;
    let mut pressure_fct = 1.0;
    let mut temperature_fct = 1.0;
    let mut comment = String::new();
    let mut explicit_molecules = Vec::new();
    let mut remainder_molecules = Vec::new();
    let mut layers = Vec::new();

    for (line_no, raw_line) in reader.lines().enumerate() {
        let raw_line = raw_line.map_err(|source| AtmFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let keyword = tokens.next().unwrap_or("");

        match keyword {
            "q" => {
                let mode = tokens
                    .next()
                    .ok_or_else(|| fmt_err(path, line_no, "`q` requires m or n"))?;
                basis = match mode {
                    "m" => AbundanceBasis::Mass,
                    "n" => AbundanceBasis::Number,
                    other => {
                        return Err(fmt_err(
                            path,
                            line_no,
                            format!("`q` expects m or n, got `{other}`"),
                        ))
                    }
                };
            }
            "z" => {
                zero_radius_offset = parse_f64(&mut tokens, path, line_no, "z")?;
            }
            "ur" => radius_fct = parse_f64(&mut tokens, path, line_no, "ur")?,
            "up" => pressure_fct = parse_f64(&mut tokens, path, line_no, "up")?,
            "ut" => temperature_fct = parse_f64(&mut tokens, path, line_no, "ut")?,
            "n" => {
                comment = tokens.collect::<Vec<_>>().join(" ");
            }
            "i" => {
                explicit_molecules = tokens.map(str::to_string).collect();
                if explicit_molecules.is_empty() {
                    return Err(fmt_err(path, line_no, "`i` requires at least one molecule name"));
                }
            }
            "f" => {
                let name = tokens
                    .next()
                    .ok_or_else(|| fmt_err(path, line_no, "`f` requires a molecule name"))?
                    .to_string();
                let eq = tokens.next();
                if eq != Some("=") {
                    return Err(fmt_err(path, line_no, "`f <name> = <share> <alias>` expected"));
                }
                let share = parse_f64(&mut tokens, path, line_no, "f")?;
                let alias = tokens.next().unwrap_or(&name).to_string();
                remainder_molecules.push(RemainderMolecule { name, share, alias });
            }
            _ => {
                // Not a recognized keyword: this is the start of the data
                // block. Re-tokenize the full line as a layer row.
                if explicit_molecules.is_empty() {
                    return Err(AtmFileError::NoMolecules {
                        path: path.to_path_buf(),
                    });
                }
                let values: Vec<f64> = line
                    .split_whitespace()
                    .map(|s| s.parse::<f64>())
                    .collect::<Result<_, _>>()
                    .map_err(|_| fmt_err(path, line_no, "expected numeric data row"))?;
                let expected = 3 + explicit_molecules.len();
                if values.len() != expected {
                    return Err(fmt_err(
                        path,
                        line_no,
                        format!("expected {expected} columns, got {}", values.len()),
                    ));
                }
                layers.push(LayerRow {
                    radius: values[0],
                    pressure: values[1],
                    temperature: values[2],
                    q_explicit: values[3..].to_vec(),
                });
            }
        }
    }

    if explicit_molecules.is_empty() {
        return Err(AtmFileError::NoMolecules {
            path: path.to_path_buf(),
        });
    }
    if layers.is_empty() {
        return Err(AtmFileError::NoLayers {
            path: path.to_path_buf(),
        });
    }

    Ok(AtmosphereFile {
        basis,
        zero_radius_offset,
        radius_fct,
        pressure_fct,
        temperature_fct,
        comment,
        explicit_molecules,
        remainder_molecules,
        layers,
    })
}

fn parse_f64<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    path: &Path,
    line_no: usize,
    keyword: &str,
) -> Result<f64, AtmFileError> {
    tokens
        .next()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| fmt_err(path, line_no, format!("`{keyword}` requires a numeric argument")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn parses_keywords_and_layers() {
        let contents = "\
# a comment
q n
z 0.0
ur 1e5
up 1e6
ut 1.0
n test atmosphere
i H2O CO2
f He = 0.5 helium
f H2 = 0.5 hydrogen
1000.0 1.0 1350.0 0.001 0.0005
2000.0 0.5 1300.0 0.0012 0.0004
";
        let f = write_temp(contents);
        let atm = parse(f.path()).unwrap();
        assert_eq!(atm.basis, AbundanceBasis::Number);
        assert_eq!(atm.explicit_molecules, vec!["H2O", "CO2"]);
        assert_eq!(atm.remainder_molecules.len(), 2);
        assert_eq!(atm.layers.len(), 2);
        assert_eq!(atm.layers[0].q_explicit, vec![0.001, 0.0005]);
    }

    #[test]
    fn rejects_data_before_molecule_list() {
        let contents = "q n\n1000.0 1.0 1350.0\n";
        let f = write_temp(contents);
        let err = parse(f.path()).unwrap_err();
        assert!(matches!(err, AtmFileError::NoMolecules { .. }));
    }
}

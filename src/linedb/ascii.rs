// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! ASCII TLI dialect, per §4.B. Comment lines start with `#`, blank lines
//! are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::{Database, Dialect, Isotope, LineDbError, LineDbHeader, LineTransitions};

struct Lines {
    raw: Vec<String>,
    /// Byte offset of each raw line's first character, for seeking back to
    /// the transitions block without re-parsing the header.
    offsets: Vec<u64>,
}

fn read_all_lines(path: &Path) -> Result<Lines, LineDbError> {
    let file = File::open(path).map_err(|source| LineDbError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let mut raw = Vec::new();
    let mut offsets = Vec::new();
    let mut offset = 0u64;
    for line in reader.lines() {
        let line = line.map_err(|source| LineDbError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        offsets.push(offset);
        offset += line.len() as u64 + 1;
        raw.push(line);
    }
    Ok(Lines { raw, offsets })
}

/// Iterator index over non-blank, non-comment lines.
fn significant_indices(lines: &[String]) -> Vec<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, l)| {
            let t = l.trim();
            !t.is_empty() && !t.starts_with('#')
        })
        .map(|(i, _)| i)
        .collect()
}

fn fmt_err(path: &Path, line: usize, detail: impl Into<String>) -> LineDbError {
    LineDbError::AsciiFormat {
        path: path.to_path_buf(),
        line,
        detail: detail.into(),
    }
}

pub fn load_info(path: &Path) -> Result<LineDbHeader, LineDbError> {
    let Lines { raw, offsets } = read_all_lines(path)?;
    let sig = significant_indices(&raw);
    let mut cursor = 0usize;

    let mut next = |cursor: &mut usize| -> Result<usize, LineDbError> {
        if *cursor >= sig.len() {
            return Err(fmt_err(path, raw.len(), "unexpected end of file"));
        }
        let idx = sig[*cursor];
        *cursor += 1;
        Ok(idx)
    };

    let db_count_line = next(&mut cursor)?;
    let db_count: usize = raw[db_count_line]
        .trim()
        .parse()
        .map_err(|_| fmt_err(path, db_count_line, "expected database count"))?;

    let mut databases = Vec::with_capacity(db_count);
    let mut isotopes = Vec::new();
    let mut isotope_start = 0usize;

    for db_idx in 0..db_count {
        let name_line = next(&mut cursor)?;
        let name = raw[name_line].trim().to_string();

        let counts_line = next(&mut cursor)?;
        let mut counts = raw[counts_line].split_whitespace();
        let n_iso: usize = counts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| fmt_err(path, counts_line, "expected n_iso n_T"))?;
        let n_t: usize = counts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| fmt_err(path, counts_line, "expected n_iso n_T"))?;

        let iso_info_line = next(&mut cursor)?;
        let tokens: Vec<&str> = raw[iso_info_line].split_whitespace().collect();
        if tokens.len() != n_iso * 2 {
            return Err(fmt_err(
                path,
                iso_info_line,
                format!("expected {} name/mass pairs", n_iso),
            ));
        }
        let mut iso_names = Vec::with_capacity(n_iso);
        let mut iso_masses = Vec::with_capacity(n_iso);
        for i in 0..n_iso {
            let name = tokens[2 * i].replace('_', " ");
            let mass: f64 = tokens[2 * i + 1]
                .parse()
                .map_err(|_| fmt_err(path, iso_info_line, "bad isotope mass"))?;
            iso_names.push(name);
            iso_masses.push(mass);
        }

        let mut temperatures = Vec::with_capacity(n_t);
        let mut partitions: Vec<Vec<f64>> = vec![Vec::with_capacity(n_t); n_iso];
        let mut cross_sections: Vec<Vec<f64>> = vec![Vec::with_capacity(n_t); n_iso];

        for _ in 0..n_t {
            let row_line = next(&mut cursor)?;
            let values: Vec<f64> = raw[row_line]
                .split_whitespace()
                .map(|s| s.parse::<f64>())
                .collect::<Result<_, _>>()
                .map_err(|_| fmt_err(path, row_line, "expected numeric T Z.. C.. row"))?;
            if values.len() != 1 + 2 * n_iso {
                return Err(fmt_err(
                    path,
                    row_line,
                    format!("expected 1 + 2*{} columns, got {}", n_iso, values.len()),
                ));
            }
            temperatures.push(values[0]);
            for i in 0..n_iso {
                partitions[i].push(values[1 + i]);
                cross_sections[i].push(values[1 + n_iso + i]);
            }
        }

        for (local_index, name) in iso_names.into_iter().enumerate() {
            isotopes.push(Isotope {
                db_index: db_idx,
                local_index,
                name,
                mass: iso_masses[local_index],
                molecule: None,
                isotopic_ratio: 1.0,
                partition: std::mem::take(&mut partitions[local_index]),
                cross_section: std::mem::take(&mut cross_sections[local_index]),
            });
        }

        databases.push(Database {
            name,
            temperatures,
            isotope_start,
            isotope_count: n_iso,
        });
        isotope_start += n_iso;
    }

    // Transitions begin at the next significant line.
    let transitions_offset = if cursor < sig.len() {
        offsets[sig[cursor]]
    } else {
        offsets.last().copied().unwrap_or(0) + raw.last().map(|l| l.len() as u64 + 1).unwrap_or(0)
    };

    let (initial_wavelength_um, final_wavelength_um) =
        scan_wavelength_span(&raw, &sig[cursor..])?;

    Ok(LineDbHeader {
        path: path.to_path_buf(),
        dialect: Dialect::Ascii,
        version: 0,
        producer_version: 0,
        producer_revision: 0,
        initial_wavelength_um,
        final_wavelength_um,
        comment: String::new(),
        databases,
        isotopes,
        transitions_offset,
    })
}

fn scan_wavelength_span(raw: &[String], transition_indices: &[usize]) -> Result<(f64, f64), LineDbError> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &idx in transition_indices {
        if let Some(first) = raw[idx].split_whitespace().next() {
            if let Ok(wl) = first.parse::<f64>() {
                lo = lo.min(wl);
                hi = hi.max(wl);
            }
        }
    }
    if !lo.is_finite() {
        lo = 0.0;
        hi = 0.0;
    }
    Ok((lo, hi))
}

/// Linear scan of the transitions block, per §4.B (ASCII files have no
/// index to binary-search on).
pub fn load_range(
    header: &LineDbHeader,
    wl_lo: f64,
    wl_hi: f64,
) -> Result<LineTransitions, LineDbError> {
    let path = &header.path;
    let Lines { raw, offsets } = read_all_lines(path)?;

    let start_line = offsets
        .iter()
        .position(|&o| o >= header.transitions_offset)
        .unwrap_or(raw.len());

    let mut out = LineTransitions::default();
    for idx in start_line..raw.len() {
        let t = raw[idx].trim();
        if t.is_empty() || t.starts_with('#') {
            continue;
        }
        let tokens: Vec<&str> = t.split_whitespace().collect();
        if tokens.len() < 4 {
            return Err(fmt_err(path, idx, "expected wl iso_id elow log_gf"));
        }
        let wl: f64 = tokens[0]
            .parse()
            .map_err(|_| fmt_err(path, idx, "bad wavelength"))?;
        if wl < wl_lo {
            continue;
        }
        if wl > wl_hi {
            break;
        }
        let iso: i16 = tokens[1]
            .parse()
            .map_err(|_| fmt_err(path, idx, "bad isotope id"))?;
        let elow: f64 = tokens[2]
            .parse()
            .map_err(|_| fmt_err(path, idx, "bad lower energy"))?;
        let log_gf: f64 = tokens[3]
            .parse()
            .map_err(|_| fmt_err(path, idx, "bad log(gf)"))?;
        out.wavelength_um.push(wl);
        out.isotope_id.push(iso);
        out.elow.push(elow);
        out.log_gf.push(log_gf);
    }

    Ok(out)
}

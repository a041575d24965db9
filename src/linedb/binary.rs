// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Binary TLI dialect, per §4.B. All multibyte fields are native byte
//! order; the magic-byte integer doubles as an endianness check.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use byteorder::{NativeEndian, ReadBytesExt};

use super::{Database, Dialect, Isotope, LineDbError, LineDbHeader, LineTransitions};

/// Size in bytes of one packed line-transition record: wavelength (f64),
/// isotope id (i16), lower energy (f64), log(gf) (f64).
const RECORD_SIZE: u64 = 8 + 2 + 8 + 8;

fn native_magic() -> i32 {
    (((0xff - b'T') as i32) << 24)
        | (((0xff - b'L') as i32) << 16)
        | (((0xff - b'I') as i32) << 8)
        | (0xff_i32)
}

pub(crate) fn looks_like_binary(path: &Path) -> Result<bool, LineDbError> {
    let mut f = File::open(path).map_err(|source| LineDbError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut buf = [0u8; 4];
    match f.read_exact(&mut buf) {
        Ok(()) => Ok(buf[3] == 0xff && buf != *b"#TLI"),
        Err(_) => Ok(false),
    }
}

pub fn load_info(path: &Path) -> Result<LineDbHeader, LineDbError> {
    let file = File::open(path).map_err(|source| LineDbError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut r = BufReader::new(file);
    let io = |source: std::io::Error| LineDbError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file_magic = r.read_i32::<NativeEndian>().map_err(io)?;
    let native = native_magic();
    if file_magic != native {
        return Err(LineDbError::Endianness {
            path: path.to_path_buf(),
            file: file_magic,
            native,
        });
    }

    let version = r.read_u16::<NativeEndian>().map_err(io)?;
    let producer_version = r.read_u16::<NativeEndian>().map_err(io)?;
    let producer_revision = r.read_u16::<NativeEndian>().map_err(io)?;
    let initial_wavelength_um = r.read_f64::<NativeEndian>().map_err(io)?;
    let final_wavelength_um = r.read_f64::<NativeEndian>().map_err(io)?;

    let comment_len = r.read_u16::<NativeEndian>().map_err(io)?;
    let mut comment_bytes = vec![0u8; comment_len as usize];
    r.read_exact(&mut comment_bytes).map_err(io)?;
    let comment = String::from_utf8_lossy(&comment_bytes).into_owned();

    let db_count = r.read_u16::<NativeEndian>().map_err(io)?;

    let mut databases = Vec::with_capacity(db_count as usize);
    let mut isotopes = Vec::new();
    let mut isotope_start = 0usize;

    for db_idx in 0..db_count {
        let name_len = r.read_u16::<NativeEndian>().map_err(io)?;
        let mut name_bytes = vec![0u8; name_len as usize];
        r.read_exact(&mut name_bytes).map_err(io)?;
        let name = String::from_utf8_lossy(&name_bytes).into_owned();

        let n_t = r.read_u16::<NativeEndian>().map_err(io)? as usize;
        let n_iso = r.read_u16::<NativeEndian>().map_err(io)? as usize;

        let mut temperatures = Vec::with_capacity(n_t);
        for _ in 0..n_t {
            temperatures.push(r.read_f64::<NativeEndian>().map_err(io)?);
        }

        for local_index in 0..n_iso {
            let iso_name_len = r.read_u16::<NativeEndian>().map_err(io)?;
            let mut iso_name_bytes = vec![0u8; iso_name_len as usize];
            r.read_exact(&mut iso_name_bytes).map_err(io)?;
            let iso_name = String::from_utf8_lossy(&iso_name_bytes).into_owned();

            let mass = r.read_f64::<NativeEndian>().map_err(io)?;

            let mut partition = Vec::with_capacity(n_t);
            for _ in 0..n_t {
                partition.push(r.read_f64::<NativeEndian>().map_err(io)?);
            }
            let mut cross_section = Vec::with_capacity(n_t);
            for _ in 0..n_t {
                cross_section.push(r.read_f64::<NativeEndian>().map_err(io)?);
            }

            isotopes.push(Isotope {
                db_index: db_idx as usize,
                local_index,
                name: iso_name,
                mass,
                molecule: None,
                isotopic_ratio: 1.0,
                partition,
                cross_section,
            });
        }

        let correlative = r.read_u16::<NativeEndian>().map_err(io)?;
        if correlative != db_idx {
            return Err(LineDbError::BadCorrelativeIndex {
                path: path.to_path_buf(),
                got: correlative,
                expected: db_idx,
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

    let total_isotopes = r.read_u16::<NativeEndian>().map_err(io)?;
    if total_isotopes as usize != isotope_start {
        return Err(LineDbError::IsotopeCountMismatch {
            path: path.to_path_buf(),
            got: total_isotopes,
            expected: isotope_start as u16,
        });
    }

    let transitions_offset = r.stream_position().map_err(io)?;

    Ok(LineDbHeader {
        path: path.to_path_buf(),
        dialect: Dialect::Binary,
        version,
        producer_version,
        producer_revision,
        initial_wavelength_um,
        final_wavelength_um,
        comment,
        databases,
        isotopes,
        transitions_offset,
    })
}

fn record_count(file_len: u64, transitions_offset: u64) -> u64 {
    (file_len - transitions_offset) / RECORD_SIZE
}

fn read_record(
    r: &mut BufReader<File>,
    path: &Path,
    transitions_offset: u64,
    index: u64,
) -> Result<(f64, i16, f64, f64), LineDbError> {
    let io = |source: std::io::Error| LineDbError::Io {
        path: path.to_path_buf(),
        source,
    };
    r.seek(SeekFrom::Start(transitions_offset + index * RECORD_SIZE))
        .map_err(io)?;
    let wl = r.read_f64::<NativeEndian>().map_err(io)?;
    let iso = r.read_i16::<NativeEndian>().map_err(io)?;
    let elow = r.read_f64::<NativeEndian>().map_err(io)?;
    let log_gf = r.read_f64::<NativeEndian>().map_err(io)?;
    Ok((wl, iso, elow, log_gf))
}

/// Binary search for the first record with wavelength >= `wl_lo`, then
/// walk back over equal-wavelength neighbours, per §4.B.
pub fn load_range(
    header: &LineDbHeader,
    wl_lo: f64,
    wl_hi: f64,
) -> Result<LineTransitions, LineDbError> {
    let path = &header.path;
    let file = File::open(path).map_err(|source| LineDbError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let file_len = file
        .metadata()
        .map_err(|source| LineDbError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .len();
    let mut r = BufReader::new(file);
    let n = record_count(file_len, header.transitions_offset);
    if n == 0 {
        return Ok(LineTransitions::default());
    }

    // Binary search on the wavelength field for the first index whose
    // wavelength is >= wl_lo.
    let mut lo = 0u64;
    let mut hi = n;
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let (wl, ..) = read_record(&mut r, path, header.transitions_offset, mid)?;
        if wl < wl_lo {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    // Walk back over exactly-equal neighbours (defensive; binary search
    // already lands on the first >= wl_lo record for a sorted file).
    let mut start = lo;
    while start > 0 {
        let (wl, ..) = read_record(&mut r, path, header.transitions_offset, start - 1)?;
        if wl < wl_lo {
            break;
        }
        start -= 1;
    }

    let mut out = LineTransitions::default();
    let mut idx = start;
    while idx < n {
        let (wl, iso, elow, log_gf) = read_record(&mut r, path, header.transitions_offset, idx)?;
        if wl > wl_hi {
            break;
        }
        out.wavelength_um.push(wl);
        out.isotope_id.push(iso);
        out.elow.push(elow);
        out.log_gf.push(log_gf);
        idx += 1;
    }

    Ok(out)
}

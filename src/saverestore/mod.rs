// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Extinction-cube save/restore, per §4.I. Binary file: five-byte magic
`@E@S@`, then `n_planes * n_radius * n_wavenumber` doubles (plane-major),
then `n_radius` computed-flag booleans. Corrupt or size-mismatched files
are ignored with a warning rather than treated as fatal, matching the
original's "just recompute" behaviour.
 */

pub mod error;

pub use error::SaveRestoreError;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use byteorder::{NativeEndian, ReadBytesExt, WriteBytesExt};

use crate::constants::SAVE_MAGIC;

pub fn save(
    path: impl AsRef<Path>,
    planes: &[Vec<f64>],
    computed: &[bool],
) -> Result<(), SaveRestoreError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| SaveRestoreError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    let result: std::io::Result<()> = (|| {
        writer.write_all(&SAVE_MAGIC)?;
        for plane in planes {
            for &v in plane {
                writer.write_f64::<NativeEndian>(v)?;
            }
        }
        for &flag in computed {
            writer.write_u8(flag as u8)?;
        }
        Ok(())
    })();
    result.map_err(|source| SaveRestoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Attempt to restore a save file matching the expected dimensions.
/// Returns `Ok(None)` (with a logged warning) rather than an error when
/// the file is missing its magic bytes or its size does not match the
/// expected `n_planes`/`n_radius`/`n_wavenumber`.
pub fn restore(
    path: impl AsRef<Path>,
    n_planes: usize,
    n_radius: usize,
    n_wavenumber: usize,
) -> Result<Option<(Vec<Vec<f64>>, Vec<bool>)>, SaveRestoreError> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(f) => f,
        Err(source) => {
            log::warn!("could not open extinction save file {}: {source}", path.display());
            return Ok(None);
        }
    };
    let mut reader = BufReader::new(file);

    let mut magic = [0u8; 5];
    if reader.read_exact(&mut magic).is_err() || magic != SAVE_MAGIC {
        log::warn!(
            "extinction save file {} is missing its magic header; recomputing",
            path.display()
        );
        return Ok(None);
    }

    let mut planes = Vec::with_capacity(n_planes);
    for _ in 0..n_planes {
        let mut plane = Vec::with_capacity(n_radius * n_wavenumber);
        let mut ok = true;
        for _ in 0..n_radius * n_wavenumber {
            match reader.read_f64::<NativeEndian>() {
                Ok(v) => plane.push(v),
                Err(_) => {
                    ok = false;
                    break;
                }
            }
        }
        if !ok {
            log::warn!(
                "extinction save file {} has fewer samples than expected; recomputing",
                path.display()
            );
            return Ok(None);
        }
        planes.push(plane);
    }

    let mut computed = Vec::with_capacity(n_radius);
    for _ in 0..n_radius {
        match reader.read_u8() {
            Ok(v) => computed.push(v != 0),
            Err(source) => {
                return Err(SaveRestoreError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    Ok(Some((planes, computed)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_bit_identically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ext.save");
        let planes = vec![vec![1.0, 2.5, -3.25, 0.0, 7.0, 8.0]];
        let computed = vec![true, true, false];
        save(&path, &planes, &computed).unwrap();

        let (restored_planes, restored_computed) = restore(&path, 1, 3, 2).unwrap().unwrap();
        assert_eq!(restored_planes, planes);
        assert_eq!(restored_computed, computed);
    }

    #[test]
    fn mismatched_dimensions_are_ignored_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ext.save");
        let planes = vec![vec![1.0, 2.0]];
        let computed = vec![true];
        save(&path, &planes, &computed).unwrap();

        let result = restore(&path, 1, 10, 10).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn missing_file_is_ignored_not_fatal() {
        let result = restore("/nonexistent/path/to/ext.save", 1, 4, 4).unwrap();
        assert!(result.is_none());
    }
}

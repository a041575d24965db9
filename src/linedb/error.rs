// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading a TLI line-transition database.
#[derive(Error, Debug)]
pub enum LineDbError {
    #[error("could not open line database {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error reading line database {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "line database {path} is not in a recognised TLI dialect (bad magic bytes or header)"
    )]
    BadMagic { path: PathBuf },

    #[error(
        "line database {path}: endianness of this file ({file:#x}) does not match this \
         machine's ({native:#x})"
    )]
    Endianness {
        path: PathBuf,
        file: i32,
        native: i32,
    },

    #[error(
        "line database {path}: database correlative index {got} did not match the expected \
         loop index {expected}"
    )]
    BadCorrelativeIndex {
        path: PathBuf,
        got: u16,
        expected: u16,
    },

    #[error(
        "line database {path}: total isotope count {got} does not match the sum of \
         per-database counts {expected}"
    )]
    IsotopeCountMismatch {
        path: PathBuf,
        got: u16,
        expected: u16,
    },

    #[error("line database {path}: malformed ASCII record at line {line}: {detail}")]
    AsciiFormat {
        path: PathBuf,
        line: usize,
        detail: String,
    },

    #[error(
        "requested wavelength window ({lo} - {hi}) plus a margin of {margin} exceeds the \
         database span ({db_lo} - {db_hi})"
    )]
    MarginExceedsSpan {
        lo: f64,
        hi: f64,
        margin: f64,
        db_lo: f64,
        db_hi: f64,
    },

    #[error(
        "requested initial wavelength {lo} is beyond the database's final wavelength {db_hi} \
         minus the margin {margin}"
    )]
    RequestedRangeOutOfSpan { lo: f64, db_hi: f64, margin: f64 },

    #[error("transitions in line database {path} are not non-decreasing in wavelength at record {index}")]
    NotMonotonic { path: PathBuf, index: usize },
}

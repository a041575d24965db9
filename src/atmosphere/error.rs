// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtmFileError {
    #[error("could not open atmosphere file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error reading atmosphere file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: {detail}")]
    Format {
        path: PathBuf,
        line: usize,
        detail: String,
    },

    #[error("atmosphere file {path} declares no molecules (missing `i` line)")]
    NoMolecules { path: PathBuf },

    #[error("atmosphere file {path} has no data rows")]
    NoLayers { path: PathBuf },
}

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("could not open molecule metadata file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error reading molecule metadata file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: {detail}")]
    Format {
        path: PathBuf,
        line: usize,
        detail: String,
    },
}

#[derive(Error, Debug)]
pub enum AtmosphereError {
    #[error(transparent)]
    File(#[from] AtmFileError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Resample(#[from] crate::resample::ResampleError),

    #[error(
        "layer {layer}: abundance fractions sum to {sum}, more than {tolerance} away from 1.0"
    )]
    AbundanceTolerance {
        layer: usize,
        sum: f64,
        tolerance: f64,
    },

    #[error("remainder-molecule shares sum to {sum}, more than 1e-5 away from 1.0")]
    RemainderShareTolerance { sum: f64 },

    #[error("molecule `{name}` has no entry in the metadata file's atomic-mass/formula tables")]
    UnknownMolecule { name: String },

    #[error("element `{element}` in molecule `{molecule}` has no atomic mass in the metadata file")]
    UnknownElement { element: String, molecule: String },

    #[error("database `{database}` could not be matched to any known molecule")]
    UnboundIsotope { database: String },
}

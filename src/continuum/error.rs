// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContinuumError {
    #[error("could not open CIA file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error reading CIA file {path}: {source}")]
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

    #[error("grey cloud requires r_upper ({upper}) >= r_lower ({lower}), both positive")]
    InvalidCloudGeometry { upper: f64, lower: f64 },

    #[error(transparent)]
    Resample(#[from] crate::resample::ResampleError),
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetailError {
    #[error("requested wavenumber {requested} lies outside the solver grid ({lo} - {hi})")]
    WavenumberOutOfRange { requested: f64, lo: f64, hi: f64 },

    #[error("could not write detail file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

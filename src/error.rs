// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The *only* publicly visible error type, per `SPEC_FULL.md` §4.L.
//! Every library module keeps its own small `thiserror` enum (one per
//! component, as the teacher's `calibrate::params` does); `CoreError`
//! funnels each of those in via `#[from]` so that `main` has exactly one
//! type to match on when deciding an exit code.

use thiserror::Error;

use crate::atmosphere::AtmosphereError;
use crate::continuum::ContinuumError;
use crate::detail::DetailError;
use crate::geometry::GeometryError;
use crate::linedb::LineDbError;
use crate::lineshape::LineShapeError;
use crate::observable::ObservableError;
use crate::pipeline::PipelineError;
use crate::resample::ResampleError;
use crate::sampling::SamplingError;
use crate::saverestore::SaveRestoreError;
use crate::solver::SolverError;
use crate::writer::WriterError;

/// The *only* publicly visible error from this crate.
#[derive(Error, Debug)]
pub enum CoreError {
    /// §7's "Input format" kind: malformed TLI or atmosphere file.
    #[error(transparent)]
    LineDb(#[from] LineDbError),

    #[error(transparent)]
    Atmosphere(#[from] AtmosphereError),

    /// §7's "Range" kind additionally surfaces through sampling and
    /// resampling failures.
    #[error(transparent)]
    Sampling(#[from] SamplingError),

    #[error(transparent)]
    Resample(#[from] ResampleError),

    #[error(transparent)]
    Continuum(#[from] ContinuumError),

    /// §7's "Invariant" kind: non-monotonic transitions, empty partition
    /// tables.
    #[error(transparent)]
    LineShape(#[from] LineShapeError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Observable(#[from] ObservableError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// §7's "Resource" kind: allocation failure for the extinction cube
    /// or optical-depth array.
    #[error("failed to allocate a {what} of size {size}")]
    Allocation { what: &'static str, size: usize },

    #[error(transparent)]
    SaveRestore(#[from] SaveRestoreError),

    #[error(transparent)]
    Detail(#[from] DetailError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Writer(#[from] WriterError),

    #[error("invalid command-line arguments: {0}")]
    InvalidArgs(String),

    #[error("error reading configuration file {path}: {source}")]
    Config {
        path: std::path::PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Exit code per §6: 0 success, 1 any runtime error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

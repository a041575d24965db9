// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
A transiting-exoplanet transmission/emission spectrum solver.

The binary entry point (`src/main.rs`) is a thin wrapper around
[`pipeline::run`]; everything else lives here so it can be exercised by
the integration tests under `tests/`.
*/

pub mod atmosphere;
pub mod cli;
pub mod constants;
pub mod continuum;
pub mod detail;
pub mod error;
pub mod geometry;
pub mod linedb;
pub mod lineshape;
pub mod logging;
pub mod observable;
pub mod pipeline;
pub mod resample;
pub mod sampling;
pub mod saverestore;
pub mod solver;
pub mod writer;

pub use error::CoreError;

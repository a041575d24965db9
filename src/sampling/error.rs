// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Errors raised while constructing or validating a [`super::SampleAxis`].
#[derive(Error, Debug)]
pub enum SamplingError {
    #[error("unit factor must be positive, got {0}")]
    NonPositiveUnitFactor(f64),

    #[error(
        "requested initial value {requested} is outside the allowed range \
         ({lo} - {hi}) given the reference grid and margins"
    )]
    InitialOutOfRange { requested: f64, lo: f64, hi: f64 },

    #[error(
        "requested final value {requested} is outside the allowed range \
         ({lo} - {hi}) given the reference grid and margins"
    )]
    FinalOutOfRange { requested: f64, lo: f64, hi: f64 },

    #[error("both a spacing and an explicit point count were hinted; only one may be given")]
    SpacingAndCountBothHinted,

    #[error("reference grid has neither a spacing nor explicit values to copy")]
    NoReferenceSpacingOrValues,

    #[error(
        "wavenumber window (1/{wn_final} - 1/{wn_initial}) cm does not lie within the \
         wavelength window ({wl_initial} - {wl_final}) cm"
    )]
    WavenumberOutsideWavelength {
        wn_initial: f64,
        wn_final: f64,
        wl_initial: f64,
        wl_final: f64,
    },

    #[error("atmosphere file has zero radius layers")]
    EmptyAtmosphere,
}

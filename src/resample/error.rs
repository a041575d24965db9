// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResampleError {
    #[error("source x-axis has zero points")]
    EmptySource,

    #[error("destination x-axis has zero points")]
    EmptyDestination,

    #[error(
        "destination value {value} lies outside the source x-axis range ({lo} - {hi}); \
         extrapolation is prohibited"
    )]
    OutOfRange { value: f64, lo: f64, hi: f64 },

    #[error("interp_y called before set_x established an x-axis mapping")]
    NoMapping,

    #[error("source y-array length {got} does not match the cached source x-axis length {expected}")]
    SourceLengthMismatch { got: usize, expected: usize },
}

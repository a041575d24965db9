// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LineShapeError {
    #[error("wavenumber axis has fewer than two points; a profile needs bin spacing")]
    DegenerateAxis,

    #[error(
        "line transitions are not non-decreasing in wavenumber within isotope {isotope}: \
         bin {previous} followed by bin {current}"
    )]
    NotMonotonic {
        isotope: usize,
        previous: usize,
        current: usize,
    },

    #[error("isotope {isotope} has no partition-function samples to interpolate against")]
    EmptyPartition { isotope: usize },
}

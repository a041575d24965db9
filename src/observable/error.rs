// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObservableError {
    #[error("transmission modulation needs at least 3 impact-parameter samples inside the window, got {count}")]
    InsufficientSamples { count: usize },

    #[error("critical-radius modulation requested but optical depth never reached tau_max = {tau_max}")]
    CriticalRadiusNotReached { tau_max: f64 },

    #[error("stellar radius must be positive, got {value}")]
    InvalidStarRadius { value: f64 },
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("impact-parameter window requires at least 3 samples inside the radius grid, got {count}")]
    InsufficientSamples { count: usize },

    #[error("radius grid must have at least 2 points, got {count}")]
    DegenerateRadiusGrid { count: usize },

    #[error("critical radius was requested but optical depth never reached tau_max = {tau_max}")]
    CriticalRadiusNotReached { tau_max: f64 },

    #[error("layer-extinction source failed while computing radius index {radius_index}: {source}")]
    LayerSource {
        radius_index: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

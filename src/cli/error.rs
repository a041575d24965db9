// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("`{flag}` expects `{expected}`, got `{got}`")]
    BadListFormat {
        flag: &'static str,
        expected: &'static str,
        got: String,
    },

    #[error("`--solution` must be `slant path` or `eclipse`, got `{0}`")]
    BadSolution(String),

    #[error("`--modlevel` must be 1 or -1, got {0}")]
    BadModLevel(i32),

    #[error("`--taulevel` must be 1 or 2, got {0}")]
    BadTauLevel(u8),
}

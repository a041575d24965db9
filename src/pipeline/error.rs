// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("`--{flag}` is required")]
    MissingArgument { flag: &'static str },

    #[error("`--solution` must be given (`slant path` or `eclipse`)")]
    MissingSolution,
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use clap::{ErrorKind, Parser};

use transit_spectrum::cli::Cli;
use transit_spectrum::pipeline;

/// Per §6: exit 0 on success, 1 on any runtime error, and 0 (not clap's
/// usual 2) from `--help`/`--version`; any other argument-parsing failure
/// (unknown flag, bad value) also exits 1 rather than clap's default.
fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            e.print().ok();
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            std::process::exit(code);
        }
    };
    if let Err(e) = pipeline::run(&cli) {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}

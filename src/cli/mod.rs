// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Argument parsing and configuration, per `SPEC_FULL.md` §4.K. `args::Cli` is
the `clap`-derived command line; `config::AppConfig` is its TOML mirror.
[`resolve`] folds the two together and hands the rest of the program the
typed hints each stage actually wants.
*/

pub mod args;
pub mod config;
pub mod error;

pub use args::{Cli, CloudRadius, DetailSpec, Solution};
pub use config::AppConfig;
pub use error::CliError;

use crate::error::CoreError;
use crate::sampling::SampleHint;

/// Load the config file named by `--config`, if any, merge the CLI over it,
/// and return the resolved configuration.
pub fn resolve(cli: &Cli) -> Result<AppConfig, CoreError> {
    let base = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    Ok(base.merge(cli))
}

/// Build a wavelength-axis [`SampleHint`] from the resolved configuration.
pub fn wavelength_hint(config: &AppConfig) -> SampleHint {
    SampleHint {
        fct: config.wl_fct,
        initial: config.wl_low,
        final_value: config.wl_high,
        spacing: config.wl_delt,
        oversample: config.wl_osamp.map(|o| o as usize),
        explicit_values: None,
    }
}

/// Build a wavenumber-axis [`SampleHint`] from the resolved configuration.
pub fn wavenumber_hint(config: &AppConfig) -> SampleHint {
    SampleHint {
        fct: config.wn_fct,
        initial: config.wn_low,
        final_value: config.wn_high,
        spacing: config.wn_delt,
        oversample: config.wn_osamp.map(|o| o as usize),
        explicit_values: None,
    }
}

/// Build an impact-parameter-axis [`SampleHint`] from the resolved
/// configuration.
pub fn radius_hint(config: &AppConfig) -> SampleHint {
    SampleHint {
        fct: config.rad_fct,
        initial: config.rad_low,
        final_value: config.rad_high,
        spacing: config.rad_delt,
        oversample: None,
        explicit_values: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_without_config_file_just_reflects_cli() {
        let mut cli = Cli::default();
        cli.wl_low = Some(0.5);
        let config = resolve(&cli).unwrap();
        assert_eq!(config.wl_low, Some(0.5));
    }

    #[test]
    fn wavelength_hint_carries_margin_free_fields() {
        let config = AppConfig {
            wl_fct: Some(1e-4),
            wl_low: Some(1.0),
            wl_high: Some(2.0),
            wl_osamp: Some(4),
            ..Default::default()
        };
        let hint = wavelength_hint(&config);
        assert_eq!(hint.fct, Some(1e-4));
        assert_eq!(hint.oversample, Some(4));
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`AppConfig`: a `serde`/`toml` mirror of [`super::args::Cli`], per
`SPEC_FULL.md` §4.K. A config file supplies defaults; CLI flags present on
the command line always win. Grounded on the teacher's layered
config-then-CLI pattern in `mwa_hyperdrive::calibrate::params`.
*/

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::args::{Cli, CloudRadius, DetailSpec, Solution};
use super::error::CliError;
use crate::error::CoreError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub linedb: Option<PathBuf>,
    pub atm: Option<PathBuf>,
    pub molfile: Option<PathBuf>,
    pub output: Option<String>,

    pub wl_low: Option<f64>,
    pub wl_high: Option<f64>,
    pub wl_delt: Option<f64>,
    pub wl_osamp: Option<u32>,
    pub wl_marg: Option<f64>,
    pub wl_fct: Option<f64>,

    pub wn_low: Option<f64>,
    pub wn_high: Option<f64>,
    pub wn_delt: Option<f64>,
    pub wn_osamp: Option<u32>,
    pub wn_marg: Option<f64>,
    pub wn_fct: Option<f64>,

    pub rad_low: Option<f64>,
    pub rad_high: Option<f64>,
    pub rad_delt: Option<f64>,
    pub rad_fct: Option<f64>,

    pub finebin: Option<u32>,
    pub nwidth: Option<f64>,
    pub maxratio: Option<f64>,
    pub per_iso: Option<bool>,

    pub solution: Option<Solution>,
    pub toomuch: Option<f64>,
    pub taulevel: Option<u8>,
    pub modlevel: Option<i32>,

    pub cloudrad: Option<CloudRadius>,
    pub cloudext: Option<f64>,
    pub cia: Option<Vec<PathBuf>>,

    pub saveext: Option<PathBuf>,
    pub detailtau: Option<Vec<String>>,
    pub detailext: Option<Vec<String>>,
    pub detailcia: Option<Vec<String>>,

    pub starrad: Option<f64>,
    pub transparent: Option<bool>,

    pub allowq: Option<f64>,
    pub blowex: Option<f64>,
    pub minelow: Option<f64>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<AppConfig, CoreError> {
        let text = std::fs::read_to_string(path).map_err(|e| CoreError::Config {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        toml::from_str(&text).map_err(|e| CoreError::Config {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
    }

    /// Fold CLI flags on top of this config, CLI taking precedence field by
    /// field, per §4.K.
    pub fn merge(mut self, cli: &Cli) -> AppConfig {
        macro_rules! over {
            ($field:ident) => {
                if cli.$field.is_some() {
                    self.$field = cli.$field.clone();
                }
            };
        }
        over!(linedb);
        over!(atm);
        over!(molfile);
        over!(output);
        over!(wl_low);
        over!(wl_high);
        over!(wl_delt);
        over!(wl_osamp);
        over!(wl_marg);
        over!(wl_fct);
        over!(wn_low);
        over!(wn_high);
        over!(wn_delt);
        over!(wn_osamp);
        over!(wn_marg);
        over!(wn_fct);
        over!(rad_low);
        over!(rad_high);
        over!(rad_delt);
        over!(rad_fct);
        over!(finebin);
        over!(nwidth);
        over!(maxratio);
        over!(solution);
        over!(toomuch);
        over!(taulevel);
        over!(modlevel);
        over!(cloudrad);
        over!(cloudext);
        over!(cia);
        over!(saveext);
        over!(starrad);
        over!(allowq);
        over!(blowex);
        over!(minelow);

        if let Some(p) = cli.per_iso_override() {
            self.per_iso = Some(p);
        }
        if cli.transparent {
            self.transparent = Some(true);
        }
        if cli.detailtau.is_some() {
            self.detailtau = cli.detailtau.clone();
        }
        if cli.detailext.is_some() {
            self.detailext = cli.detailext.clone();
        }
        if cli.detailcia.is_some() {
            self.detailcia = cli.detailcia.clone();
        }
        self
    }

    /// Parse each raw `file:wn,wn,…` string for one of the three detail
    /// flags, per §4.J.
    pub fn parse_detail_specs(raw: &Option<Vec<String>>) -> Result<Vec<DetailSpec>, CliError> {
        raw.as_deref()
            .unwrap_or(&[])
            .iter()
            .map(|s| s.parse::<DetailSpec>())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_config_field_by_field() {
        let config = AppConfig {
            wl_low: Some(1.0),
            wl_high: Some(2.0),
            ..Default::default()
        };
        let mut cli = Cli::default();
        cli.wl_low = Some(5.0);
        let merged = config.merge(&cli);
        assert_eq!(merged.wl_low, Some(5.0));
        assert_eq!(merged.wl_high, Some(2.0));
    }

    #[test]
    fn per_iso_and_no_per_iso_resolve_to_explicit_override() {
        let mut cli = Cli::default();
        cli.no_per_iso = true;
        let merged = AppConfig::default().merge(&cli);
        assert_eq!(merged.per_iso, Some(false));
    }

    #[test]
    fn detail_specs_parse_from_raw_strings() {
        let raw = Some(vec!["out.txt:1000,1010,1020".to_string()]);
        let specs = AppConfig::parse_detail_specs(&raw).unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].wavenumbers, vec![1000.0, 1010.0, 1020.0]);
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
The `clap`-derived argument struct, per `SPEC_FULL.md` §4.K. Grounded on
`mwa_hyperdrive::vis_utils::simulate::VisSimulateArgs`: one flat
`#[derive(Parser)]` struct, fields grouped by `help_heading`, every field
an `Option<T>` so an [`crate::cli::config::AppConfig`] loaded from TOML
can supply a default that the command line then overrides.
*/

use std::path::PathBuf;
use std::str::FromStr;

use clap::{ArgEnum, Parser};

use super::error::CliError;

/// `--solution`: which optical-depth/observable pairing to run, per §4.G/§4.H.
#[derive(ArgEnum, Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Solution {
    #[clap(name = "slant path")]
    SlantPath,
    #[clap(name = "eclipse")]
    Eclipse,
}

impl FromStr for Solution {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "slant path" | "slant_path" | "transmission" => Ok(Solution::SlantPath),
            "eclipse" | "emission" => Ok(Solution::Eclipse),
            other => Err(CliError::BadSolution(other.to_string())),
        }
    }
}

/// `rup,rdn`: the cloud's outer and inner radius, per §4.F.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CloudRadius {
    pub rup: f64,
    pub rdn: f64,
}

impl FromStr for CloudRadius {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',');
        let bad = || CliError::BadListFormat {
            flag: "--cloudrad",
            expected: "rup,rdn",
            got: s.to_string(),
        };
        let rup: f64 = parts.next().ok_or_else(bad)?.trim().parse().map_err(|_| bad())?;
        let rdn: f64 = parts.next().ok_or_else(bad)?.trim().parse().map_err(|_| bad())?;
        if parts.next().is_some() {
            return Err(bad());
        }
        Ok(CloudRadius { rup, rdn })
    }
}

/// `file:wn,wn,…`: one `--detailtau`/`--detailext`/`--detailcia` request,
/// per §4.J.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DetailSpec {
    pub path: PathBuf,
    pub wavenumbers: Vec<f64>,
}

impl FromStr for DetailSpec {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || CliError::BadListFormat {
            flag: "--detailtau/--detailext/--detailcia",
            expected: "file:wn,wn,…",
            got: s.to_string(),
        };
        let (path, list) = s.split_once(':').ok_or_else(bad)?;
        let wavenumbers = list
            .split(',')
            .map(|tok| tok.trim().parse::<f64>().map_err(|_| bad()))
            .collect::<Result<Vec<f64>, CliError>>()?;
        if wavenumbers.is_empty() {
            return Err(bad());
        }
        Ok(DetailSpec {
            path: PathBuf::from(path),
            wavenumbers,
        })
    }
}

#[derive(Parser, Debug, Default)]
#[clap(name = "transit-spectrum", about = "Transiting-exoplanet transmission/emission spectrum solver")]
pub struct Cli {
    /// Optional TOML configuration file; CLI flags override its values.
    #[clap(long, help_heading = "INPUT AND OUTPUT")]
    pub config: Option<PathBuf>,

    /// TLI line-transition database (binary or ASCII), per §4.B.
    #[clap(long, help_heading = "INPUT AND OUTPUT")]
    pub linedb: Option<PathBuf>,

    /// Atmosphere file, per §6.
    #[clap(long, help_heading = "INPUT AND OUTPUT")]
    pub atm: Option<PathBuf>,

    /// Molecule-metadata file (atomic masses, aliases, diameters), per §4.M.
    #[clap(long, help_heading = "INPUT AND OUTPUT")]
    pub molfile: Option<PathBuf>,

    /// Output spectrum path, or `-` for stdout, per §4.N.
    #[clap(long, help_heading = "INPUT AND OUTPUT")]
    pub output: Option<String>,

    /// Wavelength axis lower bound.
    #[clap(long, help_heading = "SAMPLING")]
    pub wl_low: Option<f64>,
    /// Wavelength axis upper bound.
    #[clap(long, help_heading = "SAMPLING")]
    pub wl_high: Option<f64>,
    /// Wavelength axis fixed step.
    #[clap(long, help_heading = "SAMPLING")]
    pub wl_delt: Option<f64>,
    /// Wavelength axis oversampling factor.
    #[clap(long, help_heading = "SAMPLING")]
    pub wl_osamp: Option<u32>,
    /// Wavelength axis margin fraction.
    #[clap(long, help_heading = "SAMPLING")]
    pub wl_marg: Option<f64>,
    /// Wavelength axis unit factor (relative to micron), per §4.A.
    #[clap(long, help_heading = "SAMPLING")]
    pub wl_fct: Option<f64>,

    /// Wavenumber axis lower bound.
    #[clap(long, help_heading = "SAMPLING")]
    pub wn_low: Option<f64>,
    /// Wavenumber axis upper bound.
    #[clap(long, help_heading = "SAMPLING")]
    pub wn_high: Option<f64>,
    /// Wavenumber axis fixed step.
    #[clap(long, help_heading = "SAMPLING")]
    pub wn_delt: Option<f64>,
    /// Wavenumber axis oversampling factor.
    #[clap(long, help_heading = "SAMPLING")]
    pub wn_osamp: Option<u32>,
    /// Wavenumber axis margin fraction.
    #[clap(long, help_heading = "SAMPLING")]
    pub wn_marg: Option<f64>,
    /// Wavenumber axis unit factor (relative to cm⁻¹).
    #[clap(long, help_heading = "SAMPLING")]
    pub wn_fct: Option<f64>,

    /// Impact-parameter (radius) axis lower bound.
    #[clap(long, help_heading = "SAMPLING")]
    pub rad_low: Option<f64>,
    /// Impact-parameter axis upper bound.
    #[clap(long, help_heading = "SAMPLING")]
    pub rad_high: Option<f64>,
    /// Impact-parameter axis fixed step.
    #[clap(long, help_heading = "SAMPLING")]
    pub rad_delt: Option<f64>,
    /// Impact-parameter axis unit factor (relative to cm).
    #[clap(long, help_heading = "SAMPLING")]
    pub rad_fct: Option<f64>,

    /// Fine-bin subdivision count for the Voigt profile table, per §4.E.
    #[clap(long, help_heading = "LINE SHAPE")]
    pub finebin: Option<u32>,
    /// Number of Doppler/Lorentz widths the line profile extends over.
    #[clap(long, help_heading = "LINE SHAPE")]
    pub nwidth: Option<f64>,
    /// Voigt-rebuild threshold ratio, per §4.E.
    #[clap(long, help_heading = "LINE SHAPE")]
    pub maxratio: Option<f64>,
    /// Track per-isotope extinction separately.
    #[clap(long, help_heading = "LINE SHAPE")]
    pub per_iso: bool,
    /// Disable per-isotope tracking (overrides `--per-iso`/config).
    #[clap(long, help_heading = "LINE SHAPE")]
    pub no_per_iso: bool,

    /// Which observable to compute: `slant path` (transmission) or `eclipse`
    /// (emission), per §4.G/§4.H.
    #[clap(long, arg_enum, help_heading = "SOLVER")]
    pub solution: Option<Solution>,
    /// Optical depth past which a ray is considered fully opaque.
    #[clap(long, help_heading = "SOLVER")]
    pub toomuch: Option<f64>,
    /// Tangent-path integrator level: 1 (constant n) or 2 (variable n).
    #[clap(long, help_heading = "SOLVER")]
    pub taulevel: Option<u8>,
    /// Modulation level: 1 (transmission) or -1 (critical radius).
    #[clap(long, help_heading = "SOLVER")]
    pub modlevel: Option<i32>,

    /// Grey-cloud outer/inner radius, `rup,rdn`, per §4.F.
    #[clap(long, help_heading = "CONTINUUM")]
    pub cloudrad: Option<CloudRadius>,
    /// Grey-cloud extinction coefficient.
    #[clap(long, help_heading = "CONTINUUM")]
    pub cloudext: Option<f64>,
    /// Comma-separated CIA table files.
    #[clap(long, use_value_delimiter = true, value_delimiter = ',', help_heading = "CONTINUUM")]
    pub cia: Option<Vec<PathBuf>>,

    /// Extinction-cube save file, written after a solve and read back on a
    /// later run with a matching grid, per §4.I.
    #[clap(long, help_heading = "INPUT AND OUTPUT")]
    pub saveext: Option<PathBuf>,

    /// One or more `file:wn,wn,…` optical-depth dumps, per §4.J. May be
    /// repeated; parsed into [`DetailSpec`] during config resolution.
    #[clap(long, multiple_occurrences = true, help_heading = "DIAGNOSTICS")]
    pub detailtau: Option<Vec<String>>,
    /// One or more `file:wn,wn,…` extinction dumps, per §4.J.
    #[clap(long, multiple_occurrences = true, help_heading = "DIAGNOSTICS")]
    pub detailext: Option<Vec<String>>,
    /// One or more `file:wn,wn,…` CIA dumps, per §4.J.
    #[clap(long, multiple_occurrences = true, help_heading = "DIAGNOSTICS")]
    pub detailcia: Option<Vec<String>>,

    /// Stellar radius in solar radii, per §3.
    #[clap(long, help_heading = "GEOMETRY")]
    pub starrad: Option<f64>,
    /// Treat the planet as fully transparent (no opaque core), per §3.
    #[clap(long, help_heading = "GEOMETRY")]
    pub transparent: bool,

    /// Abundance-sum tolerance for the atmosphere binder, per §4.C.
    #[clap(long, help_heading = "ATMOSPHERE")]
    pub allowq: Option<f64>,
    /// Extinction blow-up factor past the database window, per §4.B.
    #[clap(long, help_heading = "ATMOSPHERE")]
    pub blowex: Option<f64>,
    /// Minimum lower-state energy for a transition to be kept, per §4.B.
    #[clap(long, help_heading = "ATMOSPHERE")]
    pub minelow: Option<f64>,

    /// Increase log verbosity; may be repeated.
    #[clap(short, long, parse(from_occurrences), help_heading = "USER INTERFACE")]
    pub verbose: u8,
    /// Silence everything but warnings and errors.
    #[clap(short, long, help_heading = "USER INTERFACE")]
    pub quiet: bool,
}

impl Cli {
    /// Resolve the `--per-iso`/`--no-per-iso` pair into a single override,
    /// or `None` if neither flag was given (letting config/defaults decide).
    pub fn per_iso_override(&self) -> Option<bool> {
        match (self.per_iso, self.no_per_iso) {
            (true, true) => Some(true), // explicit --per-iso wins over --no-per-iso
            (true, false) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        }
    }
}

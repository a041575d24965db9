// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
The driver that ties stages A-N together, per `SPEC_FULL.md` §2/§4.G and
§5's warm-up-then-fan-out concurrency model. Grounded on
`mwa_hyperdrive::calibrate::params`'s role as the one place that turns
resolved configuration into constructed solver state, and on
`transit/src/transit.c`'s top-level `main` sequence (read line database,
read atmosphere, make samples, compute extinction, integrate, write
output).
*/

pub mod error;

pub use error::PipelineError;

use std::fs::File;
use std::io::Write as _;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use rayon::prelude::*;

use crate::atmosphere::{self, atm_file, metadata, AtmosphereError, BoundAtmosphere};
use crate::cli::{AppConfig, Cli, DetailSpec, Solution};
use crate::constants::{
    DEFAULT_ALLOWQ, DEFAULT_BLOWEX, DEFAULT_COLLISION_RADIUS_CM, DEFAULT_FINE_BIN,
    DEFAULT_MAXRATIO, DEFAULT_RAYLEIGH_COEFF, DEFAULT_TIMES_ALPHA, DEFAULT_TOOMUCH_EMISSION,
    DEFAULT_TOOMUCH_TRANSMISSION,
};
use crate::continuum::{self, CiaTable, GreyCloud, RayleighScattering, ScatteringHook};
use crate::detail::{self, DetailKind};
use crate::error::CoreError;
use crate::geometry::Geometry;
use crate::lineshape::{self, LayerContext, LayerIsotope};
use crate::linedb::{self, LineDbHeader, LineTransitions};
use crate::logging;
use crate::observable;
use crate::sampling::{self, Oversampling, SampleHint};
use crate::solver::{self, ExtinctionCube};
use crate::writer;

/// Everything the solve loop needs that doesn't change per wavenumber.
struct Solved {
    wavenumber_cm1: Vec<f64>,
    radius_cm: Vec<f64>,
    impact_parameter_cm: Vec<f64>,
    cube: ExtinctionCube,
    continuum: Vec<Vec<f64>>,
    cia_only: Vec<Vec<f64>>,
    cloud: Vec<f64>,
    bound: BoundAtmosphere,
    geometry: Geometry,
    solution: Solution,
    tau_max: f64,
    blowex: f64,
    mod_level: i32,
    quiet: bool,
}

/// Run the whole pipeline, from parsed CLI arguments to written output.
pub fn run(cli: &Cli) -> Result<(), CoreError> {
    let config = crate::cli::resolve(cli)?;
    logging::init(cli.verbose, cli.quiet).ok();

    let linedb_path = config
        .linedb
        .clone()
        .ok_or(PipelineError::MissingArgument { flag: "linedb" })?;
    let atm_path = config
        .atm
        .clone()
        .ok_or(PipelineError::MissingArgument { flag: "atm" })?;
    let molfile_path = config
        .molfile
        .clone()
        .ok_or(PipelineError::MissingArgument { flag: "molfile" })?;
    let solution = config.solution.ok_or(PipelineError::MissingSolution)?;

    log::info!("loading line database {}", linedb_path.display());
    let header = linedb::load_info(&linedb_path)?;

    log::info!("loading atmosphere file {}", atm_path.display());
    let atm_file = atm_file::parse(&atm_path).map_err(AtmosphereError::from)?;
    let metadata = metadata::parse(&molfile_path).map_err(AtmosphereError::from)?;

    let solved = build(&config, solution, &header, &atm_file, &metadata, cli.quiet)?;

    log::info!(
        "solving {} wavenumbers over {} radii ({} line-extinction planes)",
        solved.wavenumber_cm1.len(),
        solved.radius_cm.len(),
        solved.cube.plane_data().len()
    );

    let spectrum = solve(&solved)?;

    if let Some(path) = &config.saveext {
        crate::saverestore::save(path, solved.cube.plane_data(), solved.cube.computed_flags())?;
        log::info!("saved extinction cube to {}", path.display());
    }

    write_details(&config, &solved)?;

    let output = config.output.as_deref().unwrap_or("-");
    writer::write_spectrum(output, solution, &spectrum)?;

    logging::report_suppressed_warnings();
    Ok(())
}

/// Per-wavenumber solved observable, paired with its wavenumber.
pub struct SpectrumPoint {
    pub wavenumber_cm1: f64,
    pub value: f64,
}

fn hint_for(
    fct: Option<f64>,
    initial: Option<f64>,
    final_value: Option<f64>,
    spacing: Option<f64>,
    oversample: Option<usize>,
) -> SampleHint {
    SampleHint {
        fct,
        initial,
        final_value,
        spacing,
        oversample,
        explicit_values: None,
    }
}

fn build(
    config: &AppConfig,
    solution: Solution,
    header: &LineDbHeader,
    atm_file: &atm_file::AtmosphereFile,
    metadata: &metadata::MoleculeMetadata,
    quiet: bool,
) -> Result<Solved, CoreError> {
    // 1. Wavelength axis, resolved against the database's own span (§4.A).
    let wl_hint = hint_for(
        config.wl_fct,
        config.wl_low,
        config.wl_high,
        config.wl_delt,
        config.wl_osamp.map(|o| o as usize),
    );
    let wl_reference = sampling::SampleReference {
        fct: crate::constants::TLI_WAVELENGTH_UNIT_CM,
        initial: header.initial_wavelength_um,
        final_value: header.final_wavelength_um,
        spacing: None,
        values: None,
    };
    let wl_marg = config.wl_marg.unwrap_or(0.0);
    let (wl_axis, wl_warn) =
        sampling::build_sample(&wl_hint, &wl_reference, Oversampling::Meaningful, wl_marg, wl_marg)?;
    for msg in wl_warn.messages {
        log::warn!("{msg}");
        logging::note_suppressed_warning();
    }

    // 2. Wavenumber axis, derived from the wavelength axis.
    let wn_hint = hint_for(
        config.wn_fct,
        config.wn_low,
        config.wn_high,
        config.wn_delt,
        config.wn_osamp.map(|o| o as usize),
    );
    let wn_marg = config.wn_marg;
    let (wn_axis, wn_warn) = sampling::build_wavenumber_from_wavelength(
        &wn_hint, &wl_axis, wl_marg, wn_marg, wn_marg,
    )?;
    for msg in wn_warn.messages {
        log::warn!("{msg}");
        logging::note_suppressed_warning();
    }
    let wavenumber_cm1 = wn_axis.values.clone();

    // 3. Radius and impact-parameter axes, from the atmosphere file's span.
    let atm_radii: Vec<f64> = atm_file.layers.iter().map(|l| l.radius).collect();
    let rad_hint = hint_for(config.rad_fct, config.rad_low, config.rad_high, config.rad_delt, None);
    let (radius_axis, rad_warn) =
        sampling::build_radius_from_atmosphere(&rad_hint, &atm_radii, atm_file.radius_fct)?;
    for msg in rad_warn.messages {
        log::warn!("{msg}");
        logging::note_suppressed_warning();
    }
    let (ip_axis, ip_warn) =
        sampling::build_impact_parameter_from_radius(&SampleHint::default(), &radius_axis)?;
    for msg in ip_warn.messages {
        log::warn!("{msg}");
        logging::note_suppressed_warning();
    }

    let radius_cm: Vec<f64> = radius_axis.values.iter().map(|v| v * radius_axis.fct).collect();
    let impact_parameter_cm: Vec<f64> = ip_axis.values.iter().map(|v| v * ip_axis.fct).collect();
    let file_radius_cm: Vec<f64> = atm_radii.iter().map(|v| v * atm_file.radius_fct).collect();

    // 4. Window the line database and load transitions.
    let window = linedb::check_range(
        wl_axis.initial,
        wl_axis.final_value,
        header.initial_wavelength_um,
        header.final_wavelength_um,
        wl_marg,
    )?;
    if window.warn_outside_margin {
        log::warn!("requested wavelength window extends past the database's comfortable margin");
        logging::note_suppressed_warning();
    }
    let transitions = linedb::load_range(header, window.lo, window.hi)?;
    transitions.assert_monotonic(&header.path)?;

    // 5. Bind the atmosphere and its isotopes onto the radius grid.
    let allowq = config.allowq.unwrap_or(DEFAULT_ALLOWQ);
    let bound = atmosphere::bind(atm_file, &file_radius_cm, &radius_cm, metadata, allowq)?;

    let database_names: Vec<String> = header.databases.iter().map(|d| d.name.clone()).collect();
    let mut isotopes = header.isotopes.clone();
    atmosphere::bind_isotopes(&mut isotopes, &database_names, &bound)?;

    // 6. Continuum opacity, precomputed over the full [radius][wavenumber]
    // grid once (it does not depend on the line-shape engine).
    let (continuum, cia_only) = build_continuum(config, &bound, &radius_cm, &wavenumber_cm1)?;
    let cloud = build_cloud(config, &radius_cm)?;

    // 7. Extinction cube: one plane per isotope (`--per-iso`) or one shared
    // plane, filled lazily (but warmed up eagerly here, per §5).
    let per_iso = config.per_iso.unwrap_or(false);
    let n_planes = if per_iso { isotopes.len().max(1) } else { 1 };
    let mut cube = ExtinctionCube::new(n_planes, radius_cm.len(), wavenumber_cm1.len());

    if let Some(path) = &config.saveext {
        if let Some((planes, computed)) =
            crate::saverestore::restore(path, n_planes, radius_cm.len(), wavenumber_cm1.len())?
        {
            cube.restore(planes, computed);
            log::info!("restored extinction cube from {}", path.display());
        }
    }

    let filtered: Vec<LineTransitions> = (0..isotopes.len())
        .map(|i| transitions_for_isotope(&transitions, i as i16))
        .collect();

    let finebin = config.finebin.unwrap_or(DEFAULT_FINE_BIN as u32) as usize;
    let times_alpha = config.nwidth.unwrap_or(DEFAULT_TIMES_ALPHA);
    let maxratio = config.maxratio.unwrap_or(DEFAULT_MAXRATIO);
    let min_elow = config.minelow;
    let delta_nu = if wavenumber_cm1.len() > 1 {
        (wavenumber_cm1[wavenumber_cm1.len() - 1] - wavenumber_cm1[0])
            / (wavenumber_cm1.len() as f64 - 1.0)
    } else {
        1.0
    };

    for r in 0..radius_cm.len() {
        cube.get_or_compute(r, |scratch| -> Result<(), CoreError> {
            let temperature = bound.temperature[r];
            let propto_l = lineshape::propto_lorentz(temperature);
            let mut layer_isotopes: Vec<LayerIsotope> = Vec::with_capacity(isotopes.len());
            for (i, iso) in isotopes.iter().enumerate() {
                let molecule_idx = iso.molecule.expect("bound by atmosphere::bind_isotopes");
                let molecule = &bound.molecules[molecule_idx];
                let density = molecule.density[r] * iso.isotopic_ratio;
                let alpha_l = layer_alpha_l(&bound, r, propto_l, iso.mass, molecule.radius_cm);
                let db = &header.databases[iso.db_index];
                layer_isotopes.push(LayerIsotope {
                    plane_index: if per_iso { i } else { 0 },
                    density,
                    mass: iso.mass,
                    transitions: &filtered[i],
                    partition_temperatures: &db.temperatures,
                    partition_values: &iso.partition,
                    alpha_l,
                });
            }
            let ctx = LayerContext {
                wavenumber: &wavenumber_cm1,
                delta_nu,
                temperature,
                fine_bin: finebin,
                times_alpha,
                maxratio,
                min_elow,
            };
            lineshape::compute_layer(&ctx, &mut layer_isotopes, scratch)?;
            Ok(())
        })?;
    }

    let geometry = Geometry {
        star_radius_solar: config.starrad.unwrap_or(1.0),
        transparent_planet: config.transparent.unwrap_or(false),
        ..Geometry::default()
    };
    geometry.validate()?;

    let tau_max = config.toomuch.unwrap_or(match solution {
        Solution::SlantPath => DEFAULT_TOOMUCH_TRANSMISSION,
        Solution::Eclipse => DEFAULT_TOOMUCH_EMISSION,
    });
    let blowex = config.blowex.unwrap_or(DEFAULT_BLOWEX);
    let mod_level = config.modlevel.unwrap_or(1);
    if config.taulevel == Some(2) {
        log::warn!(
            "--taulevel 2 (variable refractive index) requires a bound refractive-index \
             profile this atmosphere binder does not produce; using the constant-n tangent \
             path instead"
        );
        logging::note_suppressed_warning();
    }

    Ok(Solved {
        wavenumber_cm1,
        radius_cm,
        impact_parameter_cm,
        cube,
        continuum,
        cia_only,
        cloud,
        bound,
        geometry,
        solution,
        tau_max,
        blowex,
        mod_level,
        quiet,
    })
}

/// Filter the full transition stream down to one isotope's lines, per
/// §4.B's `isotope_id` field.
fn transitions_for_isotope(all: &LineTransitions, isotope_id: i16) -> LineTransitions {
    let mut out = LineTransitions::default();
    for t in 0..all.len() {
        if all.isotope_id[t] == isotope_id {
            out.wavelength_um.push(all.wavelength_um[t]);
            out.isotope_id.push(all.isotope_id[t]);
            out.elow.push(all.elow[t]);
            out.log_gf.push(all.log_gf[t]);
        }
    }
    out
}

/// Sum of one isotope's Lorentz-width contributions from every molecule in
/// the bound atmosphere acting as a collision partner, per §4.E.
fn layer_alpha_l(
    bound: &BoundAtmosphere,
    radius_index: usize,
    propto_l: f64,
    mass_i: f64,
    radius_i_cm: f64,
) -> f64 {
    let own_radius = if radius_i_cm > 0.0 {
        radius_i_cm
    } else {
        DEFAULT_COLLISION_RADIUS_CM
    };
    bound
        .molecules
        .iter()
        .map(|m| {
            let radius_j = if m.radius_cm > 0.0 {
                m.radius_cm
            } else {
                DEFAULT_COLLISION_RADIUS_CM
            };
            if m.mass <= 0.0 {
                return 0.0;
            }
            lineshape::lorentz_width_term(
                propto_l,
                m.density[radius_index],
                m.mass,
                mass_i,
                own_radius + radius_j,
            )
        })
        .sum()
}

/// Precompute CIA and Rayleigh continuum opacity over the full
/// `[radius][wavenumber]` grid, per §4.F. Returns `(total, cia_only)` so
/// detail dumps of `--detailcia` can isolate the CIA-only contribution.
fn build_continuum(
    config: &AppConfig,
    bound: &BoundAtmosphere,
    radius_cm: &[f64],
    wavenumber_cm1: &[f64],
) -> Result<(Vec<Vec<f64>>, Vec<Vec<f64>>), CoreError> {
    let n_r = radius_cm.len();
    let n_w = wavenumber_cm1.len();
    let mut total = vec![vec![0.0; n_w]; n_r];
    let mut cia_only = vec![vec![0.0; n_w]; n_r];

    if let Some(paths) = &config.cia {
        let tables: Vec<CiaTable> = paths
            .iter()
            .map(|p| {
                let (a, b) = molecule_pair_from_stem(p);
                continuum::load_cia_table(p, &a, &b)
            })
            .collect::<Result<_, _>>()?;

        for table in &tables {
            let idx_a = bound.molecule_index(&table.molecule_a);
            let idx_b = bound.molecule_index(&table.molecule_b);
            let (ia, ib) = match (idx_a, idx_b) {
                (Some(ia), Some(ib)) => (ia, ib),
                _ => {
                    log::warn!(
                        "CIA table for {}-{} names a molecule not present in the atmosphere; skipping",
                        table.molecule_a,
                        table.molecule_b
                    );
                    logging::note_suppressed_warning();
                    continue;
                }
            };
            for r in 0..n_r {
                let values = table.interpolate(bound.temperature[r], wavenumber_cm1);
                for w in 0..n_w {
                    let contribution = continuum::cia_extinction(
                        values[w],
                        bound.molecules[ia].density[r],
                        bound.molecules[ib].density[r],
                    );
                    cia_only[r][w] += contribution;
                    total[r][w] += contribution;
                }
            }
        }
    }

    let rayleigh = RayleighScattering {
        cross_section_coeff: DEFAULT_RAYLEIGH_COEFF,
    };
    let density_total: Vec<f64> = (0..n_r)
        .map(|r| bound.molecules.iter().map(|m| m.density[r]).sum())
        .collect();
    for r in 0..n_r {
        for (w, &wn) in wavenumber_cm1.iter().enumerate() {
            total[r][w] += rayleigh.extinction(radius_cm[r], bound.temperature[r], density_total[r], wn);
        }
    }

    Ok((total, cia_only))
}

/// Derive the two molecule names a CIA file names, per §4.F/§6. The
/// distilled spec does not fix a filename convention; this follows the
/// commonest `<molA>-<molB>` stem used by the original transit program's
/// CIA tables, falling back to the H2-He pair (its most frequent case) when
/// the stem does not split cleanly. See `DESIGN.md`.
fn molecule_pair_from_stem(path: &std::path::Path) -> (String, String) {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let parts: Vec<&str> = stem.splitn(2, |c: char| c == '-' || c == '_').collect();
    if parts.len() == 2 && !parts[0].is_empty() && !parts[1].is_empty() {
        (parts[0].to_string(), parts[1].to_string())
    } else {
        ("H2".to_string(), "He".to_string())
    }
}

fn build_cloud(config: &AppConfig, radius_cm: &[f64]) -> Result<Vec<f64>, CoreError> {
    match (config.cloudrad, config.cloudext) {
        (Some(rad), Some(k)) => {
            let cloud = GreyCloud::new(rad.rup, rad.rdn, k)?;
            Ok(radius_cm.iter().map(|&r| cloud.extinction(r)).collect())
        }
        _ => Ok(vec![0.0; radius_cm.len()]),
    }
}

fn solve(solved: &Solved) -> Result<Vec<SpectrumPoint>, CoreError> {
    let n_w = solved.wavenumber_cm1.len();
    let star_radius_cm = solved.geometry.star_radius_cm();

    let progress = ProgressBar::new(n_w as u64).with_style(
        ProgressStyle::default_bar()
            .template("{msg}: [{wide_bar:.blue}] {pos}/{len} wavenumbers ({elapsed_precise}<{eta_precise})")
            .progress_chars("=> "),
    );
    progress.set_draw_target(if solved.quiet {
        ProgressDrawTarget::hidden()
    } else {
        ProgressDrawTarget::stderr()
    });
    progress.set_message("solving");

    let results: Vec<Result<(f64, bool), CoreError>> = (0..n_w)
        .into_par_iter()
        .map(|w| {
            let e_w = extinction_column(solved, w);
            let result = match solved.solution {
                Solution::SlantPath => {
                    solve_transmission(solved, &e_w, star_radius_cm)
                }
                Solution::Eclipse => solve_emission(solved, &e_w, w),
            };
            progress.inc(1);
            result
        })
        .collect();
    progress.finish_with_message("solved");

    let mut out = Vec::with_capacity(n_w);
    let mut unsaturated = 0u64;
    for (w, value) in results.into_iter().enumerate() {
        let (value, saturated) = value?;
        if !saturated {
            unsaturated += 1;
        }
        out.push(SpectrumPoint {
            wavenumber_cm1: solved.wavenumber_cm1[w],
            value,
        });
    }
    // §7/§8: one aggregated warning for the whole run, not one per
    // wavenumber, when tau never reached tau_max before the innermost
    // sample.
    if unsaturated > 0 {
        log::warn!(
            "tau never reached tau_max for {unsaturated} of {n_w} wavenumber(s); using the \
             innermost sample"
        );
        for _ in 0..unsaturated {
            logging::note_suppressed_warning();
        }
    }
    Ok(out)
}

/// Total extinction at every radius for one wavenumber index, per §4.G
/// operation 1: line extinction (scaled by `blowex`) plus continuum plus
/// cloud.
fn extinction_column(solved: &Solved, w: usize) -> Vec<f64> {
    (0..solved.radius_cm.len())
        .map(|r| {
            solved.cube.total_line_extinction(r, w) * solved.blowex
                + solved.continuum[r][w]
                + solved.cloud[r]
        })
        .collect()
}

fn solve_transmission(
    solved: &Solved,
    e_w: &[f64],
    star_radius_cm: f64,
) -> Result<(f64, bool), CoreError> {
    let mut tau = Vec::with_capacity(solved.impact_parameter_cm.len());
    let mut last = 0usize;
    let mut saturated = false;
    for (i, &b) in solved.impact_parameter_cm.iter().rev().enumerate() {
        let t = solver::tangent_path_constant_n(&solved.radius_cm, e_w, b, 1.0)?;
        tau.push(t);
        last = i;
        if t > solved.tau_max {
            saturated = true;
            break;
        }
    }

    let b_desc: Vec<f64> = solved.impact_parameter_cm.iter().rev().take(tau.len()).copied().collect();

    let value = if solved.mod_level >= 0 {
        observable::transmission_modulation(
            &b_desc,
            &tau,
            last,
            1.0,
            star_radius_cm,
            solved.geometry.transparent_planet,
            solved.tau_max,
        )
        .map_err(CoreError::from)?
    } else {
        let radius_asc: Vec<f64> = b_desc.iter().rev().copied().collect();
        let tau_asc: Vec<f64> = tau.iter().rev().copied().collect();
        observable::critical_radius_modulation(&radius_asc, &tau_asc, solved.tau_max, star_radius_cm)
            .map_err(CoreError::from)?
    };
    Ok((value, saturated))
}

fn solve_emission(solved: &Solved, e_w: &[f64], w: usize) -> Result<(f64, bool), CoreError> {
    // Vertical column, top of atmosphere downward.
    let n = solved.radius_cm.len();
    let mut tau = vec![0.0; n];
    let mut planck = vec![0.0; n];
    let nu = solved.wavenumber_cm1[w];
    let mut last = n - 1;
    let mut saturated = false;

    for k in (0..n).rev() {
        let idx_from_top = n - 1 - k;
        planck[idx_from_top] = observable::planck_function(solved.bound.temperature[k], nu);
        if idx_from_top == 0 {
            tau[0] = 0.0;
        } else {
            let prev_k = k + 1;
            let dr = (solved.radius_cm[prev_k] - solved.radius_cm[k]).max(0.0);
            tau[idx_from_top] = tau[idx_from_top - 1] + 0.5 * (e_w[k] + e_w[prev_k]) * dr;
        }
        last = idx_from_top;
        if tau[idx_from_top] > solved.tau_max {
            saturated = true;
            break;
        }
    }

    let value = observable::emission_intensity(&tau[..=last], &planck[..=last], solved.tau_max);
    Ok((value, saturated))
}

fn write_details(config: &AppConfig, solved: &Solved) -> Result<(), CoreError> {
    write_detail_group(config.detailtau.as_deref(), DetailKind::OpticalDepth, solved)?;
    write_detail_group(config.detailext.as_deref(), DetailKind::Extinction, solved)?;
    write_detail_group(config.detailcia.as_deref(), DetailKind::Cia, solved)?;
    Ok(())
}

fn write_detail_group(
    raw: Option<&[String]>,
    kind: DetailKind,
    solved: &Solved,
) -> Result<(), CoreError> {
    let raw = match raw {
        Some(raw) => raw,
        None => return Ok(()),
    };
    for entry in raw {
        let spec: DetailSpec = entry
            .parse()
            .map_err(|e: crate::cli::CliError| CoreError::InvalidArgs(e.to_string()))?;
        let indices = detail::resolve_indices(&solved.wavenumber_cm1, &spec.wavenumbers)?;
        let file = File::create(&spec.path).map_err(CoreError::Io)?;
        let mut sink = std::io::BufWriter::new(file);

        match kind {
            DetailKind::Extinction => {
                detail::write_table(&mut sink, kind, &solved.radius_cm, &solved.wavenumber_cm1, &indices, |r, w| {
                    solved.cube.total_line_extinction(r, w) * solved.blowex + solved.continuum[r][w] + solved.cloud[r]
                })?;
            }
            DetailKind::Cia => {
                detail::write_table(&mut sink, kind, &solved.radius_cm, &solved.wavenumber_cm1, &indices, |r, w| {
                    solved.cia_only[r][w]
                })?;
            }
            DetailKind::OpticalDepth => {
                detail::write_table(&mut sink, kind, &solved.radius_cm, &solved.wavenumber_cm1, &indices, |r, w| {
                    let e_w = extinction_column(solved, w);
                    let b = solved.radius_cm[r];
                    solver::tangent_path_constant_n(&solved.radius_cm, &e_w, b, 1.0).unwrap_or(0.0)
                })?;
            }
        }
        sink.flush().map_err(CoreError::Io)?;
    }
    Ok(())
}

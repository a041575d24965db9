// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! End-to-end tests driving the `transit-spectrum` binary as a subprocess,
//! per `SPEC_FULL.md` §6's CLI contract and §7/§8's exit-code and
//! aggregated-warning properties. The fixtures under `tests/fixtures/` are
//! deliberately tiny: a handful of atmosphere layers and two line
//! transitions placed far outside the requested window, so the run
//! exercises the full pipeline without needing a real line database.

use std::path::{Path, PathBuf};

use assert_cmd::Command;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

/// A `transit-spectrum` invocation pre-loaded with the three required
/// input files; callers append whatever else the test needs.
fn base_cmd() -> Command {
    let mut cmd = Command::cargo_bin("transit-spectrum").expect("binary built");
    cmd.arg("--linedb")
        .arg(fixture("lines.tli"))
        .arg("--atm")
        .arg(fixture("atmosphere.atm"))
        .arg("--molfile")
        .arg(fixture("molecules.dat"))
        .arg("--output")
        .arg("-");
    cmd
}

#[test]
fn help_exits_success() {
    Command::cargo_bin("transit-spectrum")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("transit-spectrum"));
}

#[test]
fn unknown_flag_exits_with_code_one() {
    Command::cargo_bin("transit-spectrum")
        .unwrap()
        .arg("--this-flag-does-not-exist")
        .assert()
        .code(1);
}

#[test]
fn missing_required_flags_exits_with_code_one() {
    Command::cargo_bin("transit-spectrum")
        .unwrap()
        .assert()
        .code(1)
        .stderr(predicates::str::contains("error:"));
}

#[test]
fn transmission_spectrum_end_to_end_well_formed() {
    let assert = base_cmd()
        .arg("--solution")
        .arg("eclipse")
        .arg("--wl-low")
        .arg("1.5")
        .arg("--wl-high")
        .arg("2.5")
        .arg("--wl-delt")
        .arg("0.1")
        .assert()
        .success();

    let output = assert.get_output();
    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut lines = stdout.lines();

    let header = lines.next().expect("a header line");
    assert_eq!(header, "# wavelength[um]  emergent_intensity[erg/s/cm/sr]");

    let mut row_count = 0;
    let mut last_wavelength_um = f64::INFINITY;
    for line in lines {
        let cols: Vec<f64> = line
            .split_whitespace()
            .map(|s| s.parse().expect("numeric column"))
            .collect();
        assert_eq!(cols.len(), 2, "expected wavelength + intensity columns");
        let (wavelength_um, intensity) = (cols[0], cols[1]);
        assert!(wavelength_um.is_finite() && wavelength_um > 0.0);
        assert!(intensity.is_finite() && intensity >= 0.0);
        // Wavenumber increases monotonically in the solver, so wavelength
        // (its reciprocal) decreases monotonically row to row.
        assert!(wavelength_um < last_wavelength_um);
        last_wavelength_um = wavelength_um;
        row_count += 1;
    }
    assert_eq!(row_count, 11, "expected one row per wavelength sample");
}

#[test]
fn save_restore_round_trip_byte_identical_output() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let save_path = dir.path().join("extinction.cube");

    let common_args = [
        "--solution",
        "eclipse",
        "--wl-low",
        "1.5",
        "--wl-high",
        "2.5",
        "--wl-delt",
        "0.1",
    ];

    let first = base_cmd()
        .args(common_args)
        .arg("--saveext")
        .arg(&save_path)
        .assert()
        .success();
    let first_stdout = first.get_output().stdout.clone();
    assert!(save_path.exists(), "extinction cube was not written");

    let second = base_cmd()
        .args(common_args)
        .arg("--saveext")
        .arg(&save_path)
        .assert()
        .success();
    let second_stdout = second.get_output().stdout.clone();

    assert_eq!(
        first_stdout, second_stdout,
        "a run that restores a saved extinction cube must reproduce the original spectrum exactly"
    );
}

#[test]
fn saturation_with_unreachable_toomuch_emits_one_aggregated_warning() {
    let assert = base_cmd()
        .arg("--solution")
        .arg("eclipse")
        .arg("--wl-low")
        .arg("1.5")
        .arg("--wl-high")
        .arg("2.5")
        .arg("--wl-delt")
        .arg("0.1")
        // With zero contributing line opacity in this fixture, optical
        // depth can never climb past an astronomically large --toomuch, so
        // every one of the 11 wavenumbers is unsaturated.
        .arg("--toomuch")
        .arg("1e30")
        .assert()
        .success();

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    let warning_lines: Vec<&str> = stderr
        .lines()
        .filter(|l| l.contains("tau never reached tau_max"))
        .collect();
    assert_eq!(
        warning_lines.len(),
        1,
        "expected exactly one aggregated saturation warning, not one per wavenumber: {stderr}"
    );
    assert!(warning_lines[0].contains("11 of 11 wavenumber"));
}

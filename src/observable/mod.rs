// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Observable quantities: transmission modulation, critical-radius
modulation, and emergent emission intensity. Grounded on
`transit/src/observable.c`; see §4.H.
 */

pub mod error;

pub use error::ObservableError;

use crate::solver::{spline_integral, vertical_emission_integral};

/// Transmission modulation at one wavenumber, per §4.H. `b_cm` runs outer
/// to inner (descending); `tau` is aligned with it; `last_index` is the
/// path index at which the saturation threshold was reached (or the
/// final index if it never was).
pub fn transmission_modulation(
    b_cm: &[f64],
    tau: &[f64],
    last_index: usize,
    rad_fct: f64,
    star_radius_cm: f64,
    transparent_planet: bool,
    tau_max: f64,
) -> Result<f64, ObservableError> {
    if star_radius_cm <= 0.0 {
        return Err(ObservableError::InvalidStarRadius {
            value: star_radius_cm,
        });
    }
    let count = last_index + 1;
    if count < 3 {
        return Err(ObservableError::InsufficientSamples { count });
    }

    let mut x: Vec<f64> = Vec::with_capacity(count + 2);
    let mut y: Vec<f64> = Vec::with_capacity(count + 2);
    for i in (0..count).rev() {
        let b = b_cm[i] * rad_fct;
        x.push(b);
        y.push((-tau[i]).exp() * b);
    }

    let step = if x.len() >= 2 {
        (x[x.len() - 1] - x[x.len() - 2]).abs().max(1.0)
    } else {
        1.0
    };
    x.push(x[x.len() - 1] + step);
    y.push(0.0);
    x.push(x[x.len() - 1] + step);
    y.push(0.0);

    let integral = spline_integral(&x, &y);
    let b_top = b_cm[0] * rad_fct;
    let mut numerator = b_top * b_top - 2.0 * integral;
    if transparent_planet {
        let b_last = b_cm[last_index] * rad_fct;
        numerator -= (-tau_max).exp() * b_last * b_last;
    }
    Ok(numerator / (star_radius_cm * star_radius_cm))
}

/// Critical-radius modulation (modulation level -1): linear interpolation
/// on tau to find the radius where tau = tau_max.
pub fn critical_radius_modulation(
    radius_cm: &[f64],
    tau: &[f64],
    tau_max: f64,
    star_radius_cm: f64,
) -> Result<f64, ObservableError> {
    if star_radius_cm <= 0.0 {
        return Err(ObservableError::InvalidStarRadius {
            value: star_radius_cm,
        });
    }
    for i in 1..tau.len() {
        let (lo, hi) = (tau[i - 1], tau[i]);
        if (lo < tau_max && hi >= tau_max) || (lo > tau_max && hi <= tau_max) {
            let frac = if (hi - lo).abs() > 0.0 {
                (tau_max - lo) / (hi - lo)
            } else {
                0.0
            };
            let r_crit = radius_cm[i - 1] + frac * (radius_cm[i] - radius_cm[i - 1]);
            return Ok(r_crit * r_crit / (star_radius_cm * star_radius_cm));
        }
    }
    Err(ObservableError::CriticalRadiusNotReached { tau_max })
}

/// Emergent intensity at one wavenumber, per §4.H: delegates the
/// Planck-weighted quadrature to the optical-depth core's vertical
/// integrator.
pub fn emission_intensity(tau: &[f64], planck: &[f64], tau_max: f64) -> f64 {
    vertical_emission_integral(tau, planck, tau_max)
}

/// Planck function `B_nu(T)` in erg/s/cm^2/sr/cm^-1 (per unit wavenumber),
/// using wavenumber `nu` in cm^-1.
pub fn planck_function(temperature: f64, wavenumber_cm1: f64) -> f64 {
    use crate::constants::{K_BOLTZMANN, LIGHT_SPEED, PLANCK};
    let two_hc2 = 2.0 * PLANCK * LIGHT_SPEED * LIGHT_SPEED;
    let exponent = PLANCK * LIGHT_SPEED * wavenumber_cm1 / (K_BOLTZMANN * temperature);
    two_hc2 * wavenumber_cm1.powi(3) / (exponent.exp() - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heavier_constant_opacity_blocks_more_light() {
        let n = 50;
        let b_top = 1.0e9;
        let b_last = 0.2e9;
        let b: Vec<f64> = (0..n)
            .map(|i| b_top - i as f64 / (n - 1) as f64 * (b_top - b_last))
            .collect();
        let star_radius = 7.0e10;
        let thin = transmission_modulation(&b, &vec![0.1; n], n - 1, 1.0, star_radius, false, 50.0)
            .unwrap();
        let thick = transmission_modulation(&b, &vec![5.0; n], n - 1, 1.0, star_radius, false, 50.0)
            .unwrap();
        assert!(thick > thin);
    }

    #[test]
    fn transparent_planet_reduces_modulation_relative_to_opaque() {
        let n = 50;
        let b_top = 1.0e9;
        let b_last = 0.2e9;
        let b: Vec<f64> = (0..n)
            .map(|i| b_top - i as f64 / (n - 1) as f64 * (b_top - b_last))
            .collect();
        let tau = vec![0.5; n];
        let star_radius = 7.0e10;
        let opaque = transmission_modulation(&b, &tau, n - 1, 1.0, star_radius, false, 50.0).unwrap();
        let transparent = transmission_modulation(&b, &tau, n - 1, 1.0, star_radius, true, 50.0).unwrap();
        assert!(transparent < opaque);
    }

    #[test]
    fn critical_radius_interpolates_linearly() {
        let radius = vec![1.0e8, 2.0e8, 3.0e8, 4.0e8];
        let tau = vec![100.0, 60.0, 20.0, 5.0];
        let r = critical_radius_modulation(&radius, &tau, 50.0, 1.0e9).unwrap();
        // tau crosses 50 between index 1 (60) and 2 (20): frac = 10/40 = 0.25
        let expected_r = 2.0e8 + 0.25 * 1.0e8;
        assert!((r - (expected_r * expected_r) / 1.0e18).abs() < 1e-6);
    }

    #[test]
    fn critical_radius_fails_when_never_reached() {
        let radius = vec![1.0e8, 2.0e8];
        let tau = vec![1.0, 2.0];
        let err = critical_radius_modulation(&radius, &tau, 50.0, 1.0e9).unwrap_err();
        assert!(matches!(err, ObservableError::CriticalRadiusNotReached { .. }));
    }

    #[test]
    fn planck_function_increases_with_temperature() {
        let cold = planck_function(300.0, 3000.0);
        let hot = planck_function(1500.0, 3000.0);
        assert!(hot > cold);
        assert!(cold > 0.0);
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Read-only geometry shared by the solver and the observable stage, per
`SPEC_FULL.md` §3's `Geometry` data model entry. The orbital elements
beyond stellar radius and the transparent-planet flag are carried for
completeness (and for a future phase-dependent driver, out of scope per
§1's "no time-dependent radiative transfer" non-goal) but are not read by
anything in this crate's solve path today.
*/

use thiserror::Error;

/// Stellar/orbital geometry, read-only for the duration of a solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// Stellar radius, solar radii.
    pub star_radius_solar: f64,
    /// Stellar radius unit factor, converting `star_radius_solar` to cm.
    pub star_radius_fct: f64,
    /// Orbital semi-major axis and its unit factor (cm).
    pub semi_major_axis: f64,
    pub semi_major_axis_fct: f64,
    pub eccentricity: f64,
    /// Inclination, degrees.
    pub inclination_deg: f64,
    /// Longitude of ascending node, degrees.
    pub longitude_ascending_node_deg: f64,
    /// Argument of periastron, degrees.
    pub argument_periastron_deg: f64,
    /// Time offset, seconds.
    pub time_offset_s: f64,
    /// When true, the planet does not fully block starlight even along
    /// its innermost sampled impact parameter (§4.H transmission
    /// modulation subtracts an extra term).
    pub transparent_planet: bool,
}

#[derive(Error, Debug)]
pub enum GeometryError {
    #[error("stellar radius must be positive, got {0} (in its own units)")]
    NonPositiveStarRadius(f64),

    #[error("eccentricity must lie in [0, 1), got {0}")]
    InvalidEccentricity(f64),
}

impl Geometry {
    /// Stellar radius in centimetres.
    pub fn star_radius_cm(&self) -> f64 {
        self.star_radius_solar * self.star_radius_fct
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.star_radius_solar <= 0.0 || self.star_radius_fct <= 0.0 {
            return Err(GeometryError::NonPositiveStarRadius(
                self.star_radius_solar,
            ));
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(GeometryError::InvalidEccentricity(self.eccentricity));
        }
        Ok(())
    }
}

/// Solar radius, cm: the default `star_radius_fct`.
pub const SOLAR_RADIUS_CM: f64 = 6.957e10;

impl Default for Geometry {
    fn default() -> Self {
        Self {
            star_radius_solar: 1.0,
            star_radius_fct: SOLAR_RADIUS_CM,
            semi_major_axis: 0.0,
            semi_major_axis_fct: SOLAR_RADIUS_CM,
            eccentricity: 0.0,
            inclination_deg: 90.0,
            longitude_ascending_node_deg: 0.0,
            argument_periastron_deg: 0.0,
            time_offset_s: 0.0,
            transparent_planet: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_radius_cm_applies_unit_factor() {
        let g = Geometry {
            star_radius_solar: 1.2,
            ..Geometry::default()
        };
        assert!((g.star_radius_cm() - 1.2 * SOLAR_RADIUS_CM).abs() < 1.0);
    }

    #[test]
    fn validate_rejects_non_positive_radius() {
        let g = Geometry {
            star_radius_solar: 0.0,
            ..Geometry::default()
        };
        assert!(matches!(
            g.validate(),
            Err(GeometryError::NonPositiveStarRadius(_))
        ));
    }

    #[test]
    fn validate_rejects_bad_eccentricity() {
        let g = Geometry {
            eccentricity: 1.2,
            ..Geometry::default()
        };
        assert!(matches!(
            g.validate(),
            Err(GeometryError::InvalidEccentricity(_))
        ));
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful physical and numerical constants.

All constants *must* be double precision; this crate performs the entirety
of its numerics in `f64` before any output formatting.
 */

pub use std::f64::consts::PI;

/// Boltzmann constant, erg/K.
pub const K_BOLTZMANN: f64 = 1.380649e-16;

/// Speed of light, cm/s.
pub const LIGHT_SPEED: f64 = 2.99792458e10;

/// Atomic mass unit, g.
pub const AMU: f64 = 1.66053906660e-24;

/// Planck constant, erg*s.
pub const PLANCK: f64 = 6.62607015e-27;

/// Electron charge squared over electron mass times speed of light, the
/// line-strength prefactor sigma0 = pi * e^2 / (m_e * c), in cgs units
/// (cm^2 * cm^-1, i.e. cm).
pub const SIGMA0: f64 = 8.85988e-13;

/// sqrt(ln 2), used throughout the Voigt-profile evaluation.
pub const SQRT_LN2: f64 = 0.832_554_611_157_697_76;

/// Default oversampling factor for the Voigt fine-bin profile buffer.
pub const DEFAULT_FINE_BIN: usize = 5;

/// Default profile half-width in units of max(alpha_D, alpha_L).
pub const DEFAULT_TIMES_ALPHA: f64 = 50.0;

/// Default maximum allowed fractional change in Doppler width between
/// profile rebuilds.
pub const DEFAULT_MAXRATIO: f64 = 0.001;

/// Default saturation optical depth for transmission geometry.
pub const DEFAULT_TOOMUCH_TRANSMISSION: f64 = 50.0;

/// Default saturation optical depth for emission geometry.
pub const DEFAULT_TOOMUCH_EMISSION: f64 = 10.0;

/// Default tolerance for |sum(q) - 1| in the atmosphere binder.
pub const DEFAULT_ALLOWQ: f64 = 0.01;

/// Epsilon used to absorb the final bin boundary when computing sample
/// counts from a requested spacing.
pub const SAMPLE_COUNT_EPS: f64 = 1e-8;

/// Tolerance used when comparing floating point optical depths for
/// monotonicity (round-off only).
pub const TAU_MONOTONE_EPS: f64 = 1e-12;

/// TLI wavelength storage unit, in centimetres (1 micron).
pub const TLI_WAVELENGTH_UNIT_CM: f64 = 1e-4;

/// Five-byte magic header of an extinction save file.
pub const SAVE_MAGIC: [u8; 5] = *b"@E@S@";

/// Default line-extinction blow-up factor past the loaded database window.
pub const DEFAULT_BLOWEX: f64 = 1.0;

/// Default Rayleigh cross-section coefficient, cm^2 * cm^4 (scales
/// wavenumber^4 * density into an extinction coefficient). Order-of-magnitude
/// placeholder for air-like scattering; real runs should override it with a
/// species-specific value.
pub const DEFAULT_RAYLEIGH_COEFF: f64 = 1e-30;

/// 1 Angstrom to cm, used when deriving a default collision radius for
/// molecules missing from the metadata file's diameter block.
pub const DEFAULT_COLLISION_RADIUS_CM: f64 = 1.5e-8;

// ─────────────────────────────────────────────────────────────────────
// Aeronomy — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Physical constants in SI units.

/// Planck constant (J s)
pub const PLANCK: f64 = 6.626_070_15e-34;

/// Speed of light (m/s)
pub const SPEED_OF_LIGHT: f64 = 2.997_924_58e8;

/// Boltzmann constant (J/K)
pub const K_BOLTZMANN: f64 = 1.380_649e-23;

/// Electron volt (J)
pub const EV: f64 = 1.602_176_634e-19;

/// Rydberg energy (J) - hydrogen ground-state ionization energy.
pub const RYDBERG_ENERGY: f64 = 2.179_872_361_1e-18;

/// Hydrogen photoionization cross-section at threshold (m^2).
pub const HYDROGEN_A0: f64 = 6.304_318_12e-22;

/// Electron mass (kg)
pub const M_ELECTRON: f64 = 9.109_383_701_5e-31;

/// Hydrogen atom mass (kg)
pub const M_HYDROGEN: f64 = 1.673_532_8e-27;

/// Helium-4 atom mass (kg)
pub const M_HELIUM: f64 = 6.646_477_3e-27;

/// 1 megabarn in m^2.
pub const MEGABARN: f64 = 1.0e-22;

/// Helium 1s2s 3S metastable excitation energy above the ground state (J).
pub const HE_TRIPLET_ENERGY: f64 = 19.819_6 * EV;

/// Helium first ionization energy (J).
pub const HE_IONIZATION_ENERGY: f64 = 24.587_4 * EV;

/// Seconds per day, used for orbital periods given in days.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Astronomical unit (m)
pub const AU: f64 = 1.495_978_707e11;

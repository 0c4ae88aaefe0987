// ─────────────────────────────────────────────────────────────────────
// Aeronomy — Hydrostatic Profile
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Polytropic reference atmosphere used for initialization and replenishment.
//!
//! Between the core radius r₀ and the surface radius r_e:
//!   ρ(r) = [ (γ−1)/γ · G Mp / K · (1/r − 1/Rp) + ρ_p^(γ−1) ]^(1/(γ−1))
//!   P    = K ρ^γ,   K = ρ_p^(1−γ) c_s²
//! Inside r₀ the state is frozen at (ρ(r₀), P(r₀)); outside r_e it drops to
//! a tenuous background (ρ(r_e)·space_density_factor, P(r_e)). Every
//! segment is held at or above `hydro.dfloor` and `hydro.pfloor`.

use aeronomy_types::config::AeronomyConfig;
use aeronomy_types::error::{AeronomyError, AeronomyResult};
use aeronomy_types::species::{Species, SpeciesSet};

/// Density and pressure of the reference atmosphere at one radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HydroState {
    pub density: f64,
    pub pressure: f64,
}

#[derive(Debug, Clone)]
pub struct HydrostaticProfile {
    gamma: f64,
    gm_planet: f64,
    rp: f64,
    rho_p: f64,
    k_poly: f64,
    r_core: f64,
    r_surface: f64,
    core: HydroState,
    surface: HydroState,
    space_density_factor: f64,
    dfloor: f64,
    pfloor: f64,
}

impl HydrostaticProfile {
    pub fn new(config: &AeronomyConfig) -> AeronomyResult<Self> {
        let gamma = config.hydro.gamma;
        let chem = &config.chemistry;
        let rp = config.problem.rp;
        let mut profile = HydrostaticProfile {
            gamma,
            gm_planet: config.problem.g * config.problem.mp,
            rp,
            rho_p: chem.rho_p,
            k_poly: chem.rho_p.powf(1.0 - gamma) * chem.cs * chem.cs,
            r_core: chem.r_core_rp * rp,
            r_surface: chem.r_surface_rp * rp,
            core: HydroState { density: 0.0, pressure: 0.0 },
            surface: HydroState { density: 0.0, pressure: 0.0 },
            space_density_factor: chem.space_density_factor,
            dfloor: config.hydro.dfloor,
            pfloor: config.hydro.pfloor,
        };

        // The bracket decreases with radius, so the surface is the worst case.
        let bracket = profile.bracket(profile.r_surface);
        if !bracket.is_finite() || bracket <= 0.0 {
            return Err(AeronomyError::ConfigError(format!(
                "polytrope vanishes below r_surface ({:.3e} m); raise chemistry.cs or lower r_surface_Rp",
                profile.r_surface
            )));
        }

        profile.core = profile.polytrope(profile.r_core);
        profile.surface = profile.polytrope(profile.r_surface);
        Ok(profile)
    }

    fn bracket(&self, r: f64) -> f64 {
        let g = self.gamma;
        (g - 1.0) / g * self.gm_planet / self.k_poly * (1.0 / r - 1.0 / self.rp)
            + self.rho_p.powf(g - 1.0)
    }

    fn polytrope(&self, r: f64) -> HydroState {
        let density = self.bracket(r).powf(1.0 / (self.gamma - 1.0));
        HydroState {
            density,
            pressure: self.pressure_of(density),
        }
    }

    /// Polytropic pressure `K ρ^γ`.
    pub fn pressure_of(&self, density: f64) -> f64 {
        self.k_poly * density.powf(self.gamma)
    }

    /// Reference state at radius `r` (m).
    pub fn state(&self, r: f64) -> HydroState {
        let raw = if r <= self.r_core {
            self.core
        } else if r <= self.r_surface {
            self.polytrope(r)
        } else {
            HydroState {
                density: self.surface.density * self.space_density_factor,
                pressure: self.surface.pressure,
            }
        };
        HydroState {
            density: raw.density.max(self.dfloor),
            pressure: raw.pressure.max(self.pfloor),
        }
    }

    pub fn density(&self, r: f64) -> f64 {
        self.state(r).density
    }

    pub fn pressure(&self, r: f64) -> f64 {
        self.state(r).pressure
    }

    pub fn core_radius(&self) -> f64 {
        self.r_core
    }

    pub fn surface_radius(&self) -> f64 {
        self.r_surface
    }
}

/// Initial species mass densities as a function of total density and
/// hydrogen/helium ionization state.
///
/// The atmosphere is neutral (ion fraction `sfloor`) inside the surface
/// radius and ionized (ion fraction `1 − sfloor`) outside. Ion and electron
/// masses are scaled so that the species always sum to the total density.
#[derive(Debug, Clone)]
pub struct InitialAbundances {
    nspecies: usize,
    electron: usize,
    hydrogen: usize,
    hydrogen_ion: usize,
    helium: Option<(usize, usize)>,
    masses: Vec<f64>,
    helium_fraction: f64,
    sfloor: f64,
    r_surface: f64,
}

impl InitialAbundances {
    pub fn new(config: &AeronomyConfig, species: &SpeciesSet) -> AeronomyResult<Self> {
        let context = "initial abundances";
        let helium_fraction = config.chemistry.helium_mass_fraction;
        let helium = if helium_fraction > 0.0 {
            Some((
                species.require(Species::HeliumSinglet, context)?,
                species.require(Species::HeliumIon, context)?,
            ))
        } else {
            None
        };
        Ok(InitialAbundances {
            nspecies: species.len(),
            electron: species.require(Species::Electron, context)?,
            hydrogen: species.require(Species::Hydrogen, context)?,
            hydrogen_ion: species.require(Species::HydrogenIon, context)?,
            helium,
            masses: species.masses(),
            helium_fraction,
            sfloor: config.hydro.sfloor,
            r_surface: config.chemistry.r_surface_rp * config.problem.rp,
        })
    }

    /// Number ion fraction at radius `r`.
    pub fn ion_fraction(&self, r: f64) -> f64 {
        if r <= self.r_surface {
            self.sfloor
        } else {
            1.0 - self.sfloor
        }
    }

    /// Mass densities per species index for a cell of total density `rho`
    /// at radius `r`.
    pub fn mass_densities(&self, r: f64, rho: f64) -> Vec<f64> {
        let x = self.ion_fraction(r);
        let m = &self.masses;
        let m_h = m[self.hydrogen];
        let mut s = vec![0.0; self.nspecies];

        let rho_h = rho * (1.0 - self.helium_fraction);
        s[self.hydrogen] = rho_h * (1.0 - x);
        s[self.hydrogen_ion] = rho_h * x * m[self.hydrogen_ion] / m_h;
        s[self.electron] = rho_h * x * m[self.electron] / m_h;

        if let Some((singlet, ion)) = self.helium {
            let m_he = m[singlet];
            let rho_he = rho * self.helium_fraction;
            s[singlet] = rho_he * (1.0 - x);
            s[ion] = rho_he * x * m[ion] / m_he;
            s[self.electron] += rho_he * x * m[self.electron] / m_he;
        }
        s
    }
}

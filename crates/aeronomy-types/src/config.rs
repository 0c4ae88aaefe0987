// ─────────────────────────────────────────────────────────────────────
// Aeronomy — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::constants::{K_BOLTZMANN, M_HYDROGEN, SECONDS_PER_DAY};
use crate::error::{AeronomyError, AeronomyResult};
use crate::species::{Species, SpeciesSet};
use serde::{Deserialize, Serialize};

/// Top-level problem configuration, built once at setup and shared by
/// reference with every component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AeronomyConfig {
    pub problem: ProblemParams,
    pub hydro: HydroParams,
    pub radiation: RadiationParams,
    pub chemistry: ChemistryParams,
    #[serde(default = "default_species")]
    pub species: Vec<Species>,
}

/// Planet/star system. Lengths and masses in SI, period in days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemParams {
    #[serde(rename = "G")]
    pub g: f64,
    #[serde(rename = "Mp")]
    pub mp: f64,
    #[serde(rename = "Ms")]
    pub ms: f64,
    #[serde(rename = "Rp")]
    pub rp: f64,
    pub period: f64,
    /// Gravity softening radius in units of Rp.
    #[serde(default = "default_softening_rp")]
    pub softening_rp: f64,
    /// Multiplier on the stellar tidal + centrifugal term. The sign
    /// convention of that term has not been validated, hence configurable.
    #[serde(default = "default_one")]
    pub tidal_sign: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HydroParams {
    pub gamma: f64,
    #[serde(default)]
    pub dfloor: f64,
    #[serde(default)]
    pub pfloor: f64,
    #[serde(default)]
    pub sfloor: f64,
    /// Specific gas constant of the neutral gas (J kg⁻¹ K⁻¹).
    #[serde(default = "default_gas_constant")]
    pub gas_constant: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadiationParams {
    /// Star distance (AU) in static mode.
    #[serde(default = "default_one")]
    pub distance: f64,
    /// Distance (AU) at which band spectra are specified.
    #[serde(default = "default_one")]
    pub reference_distance: f64,
    #[serde(default = "default_wave_to_meters")]
    pub wave_to_meters: f64,
    /// Incoming beam directions, `"(mu_deg,phi_deg) ..."`.
    #[serde(default = "default_direction")]
    pub indir: String,
    /// Outgoing directions for radiance diagnostics.
    #[serde(default = "default_direction")]
    pub outdir: String,
    #[serde(default)]
    pub dynamic: bool,
    #[serde(default = "default_one")]
    pub radiation_scaling: f64,
    #[serde(default)]
    pub schedule: IrradiationSchedule,
    #[serde(default)]
    pub orbit: OrbitParams,
    #[serde(default)]
    pub bands: Vec<BandConfig>,
}

/// Time dependence of the incident stellar flux.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IrradiationSchedule {
    #[default]
    Constant,
    /// `amplitude * erf(t / time_scale - offset) + base`
    ErfRamp {
        amplitude: f64,
        time_scale: f64,
        offset: f64,
        base: f64,
    },
    /// `(tanh(t / time_scale - offset) + 1) / 2`
    TanhRamp { time_scale: f64, offset: f64 },
}

/// Orbital elements for dynamic irradiation geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbitParams {
    #[serde(default)]
    pub eccentricity: f64,
    #[serde(default)]
    pub obliquity_deg: f64,
    /// Planet rotation period in days; `None` means tidally locked.
    #[serde(default)]
    pub rotation_period: Option<f64>,
    /// Time of periastron passage (s).
    #[serde(default)]
    pub periastron_time: f64,
}

impl Default for OrbitParams {
    fn default() -> Self {
        OrbitParams {
            eccentricity: 0.0,
            obliquity_deg: 0.0,
            rotation_period: None,
            periastron_time: 0.0,
        }
    }
}

/// One spectral band: a shared wavelength grid plus its absorbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandConfig {
    pub name: String,
    /// Whitespace table with columns `wave weight flux`.
    #[serde(default)]
    pub spectrum_file: Option<String>,
    /// Inline `[wave, weight, flux]` samples, used when no file is given.
    #[serde(default)]
    pub spectrum: Vec<[f64; 3]>,
    #[serde(default)]
    pub absorbers: Vec<AbsorberConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbsorberConfig {
    pub name: String,
    #[serde(default)]
    pub cross_section: CrossSectionModel,
    #[serde(default)]
    pub partition: EnergyPartition,
    /// Cross-section table `energy_eV sigma_Mb` for tabulated absorbers.
    #[serde(default)]
    pub table: Option<String>,
}

/// Above-threshold hydrogenic cross-section model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossSectionModel {
    /// Constant threshold value A0 at all ionizing frequencies.
    #[default]
    Empirical,
    /// Full hydrogenic photoionization cross-section.
    Hydrogenic,
}

/// How absorbed ionizing energy is split between heat and ionization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnergyPartition {
    /// Ionization share h = λ/λ₀, heat share q = 1 − h.
    Threshold,
    /// Fixed heat fraction, the remainder goes to ionization.
    Fixed { heat_fraction: f64 },
}

impl Default for EnergyPartition {
    fn default() -> Self {
        EnergyPartition::Fixed {
            heat_fraction: DEFAULT_HEAT_FRACTION,
        }
    }
}

/// Provisional empirical heat fraction for hydrogen photoionization.
pub const DEFAULT_HEAT_FRACTION: f64 = 0.15;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChemistryParams {
    /// Reference density (kg/m³) at Rp for the polytropic profile.
    #[serde(default = "default_rho_p")]
    pub rho_p: f64,
    /// Reference sound speed (m/s).
    #[serde(default = "default_cs")]
    pub cs: f64,
    #[serde(default = "default_space_density_factor")]
    pub space_density_factor: f64,
    #[serde(rename = "r_replenish_Rp", default = "default_r_replenish")]
    pub r_replenish_rp: f64,
    #[serde(rename = "r_core_Rp", default = "default_r_core")]
    pub r_core_rp: f64,
    #[serde(rename = "r_surface_Rp", default = "default_r_surface")]
    pub r_surface_rp: f64,
    #[serde(default)]
    pub helium_mass_fraction: f64,
    #[serde(default = "default_reactions")]
    pub reactions: Vec<ReactionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionConfig {
    pub name: String,
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub alpha_column: Option<usize>,
    #[serde(default)]
    pub beta_column: Option<usize>,
}

impl ReactionConfig {
    pub fn named(name: &str) -> Self {
        ReactionConfig {
            name: name.to_string(),
            table: None,
            alpha_column: None,
            beta_column: None,
        }
    }
}

fn default_species() -> Vec<Species> {
    vec![Species::Electron, Species::Hydrogen, Species::HydrogenIon]
}
fn default_one() -> f64 {
    1.0
}
fn default_softening_rp() -> f64 {
    0.5
}
fn default_gas_constant() -> f64 {
    K_BOLTZMANN / M_HYDROGEN
}
fn default_wave_to_meters() -> f64 {
    1.0e-9
}
fn default_direction() -> String {
    "(0.,0.)".to_string()
}
fn default_rho_p() -> f64 {
    1.0e-15
}
fn default_cs() -> f64 {
    3.0e5
}
fn default_space_density_factor() -> f64 {
    1.0e-4
}
fn default_r_replenish() -> f64 {
    0.75
}
fn default_r_core() -> f64 {
    0.5
}
fn default_r_surface() -> f64 {
    1.02
}
fn default_reactions() -> Vec<ReactionConfig> {
    vec![
        ReactionConfig::named("H_RECOMBINATION"),
        ReactionConfig::named("LYA_COOLING"),
    ]
}

/// Beam direction: `mu` is the direction cosine, `phi` the azimuth (rad).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction {
    pub mu: f64,
    pub phi: f64,
}

impl Direction {
    pub fn from_degrees(zenith_deg: f64, phi_deg: f64) -> Self {
        Direction {
            mu: zenith_deg.to_radians().cos(),
            phi: phi_deg.to_radians(),
        }
    }
}

/// Parse `"(mu_deg,phi_deg) (mu_deg,phi_deg) ..."`. A missing azimuth is 0.
pub fn parse_directions(text: &str) -> AeronomyResult<Vec<Direction>> {
    let mut directions = Vec::new();
    let mut rest = text.trim();
    while !rest.is_empty() {
        let open = rest.find('(').ok_or_else(|| {
            AeronomyError::ConfigError(format!("direction list '{text}' expects '(mu,phi)'"))
        })?;
        let close = rest[open..].find(')').map(|c| c + open).ok_or_else(|| {
            AeronomyError::ConfigError(format!("unterminated direction in '{text}'"))
        })?;
        let body = &rest[open + 1..close];
        let values: Vec<f64> = body
            .split(',')
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(|v| {
                v.parse::<f64>().map_err(|_| {
                    AeronomyError::ConfigError(format!("invalid direction value '{v}' in '{text}'"))
                })
            })
            .collect::<AeronomyResult<_>>()?;
        let direction = match values.as_slice() {
            [mu] => Direction::from_degrees(*mu, 0.0),
            [mu, phi] => Direction::from_degrees(*mu, *phi),
            _ => {
                return Err(AeronomyError::ConfigError(format!(
                    "direction '({body})' must have one or two values"
                )))
            }
        };
        directions.push(direction);
        rest = rest[close + 1..].trim();
    }
    if directions.is_empty() {
        return Err(AeronomyError::ConfigError(
            "direction list must not be empty".to_string(),
        ));
    }
    Ok(directions)
}

impl ProblemParams {
    /// Orbital semi-major axis from Kepler's third law (m).
    pub fn semi_major_axis(&self) -> f64 {
        let period_s = self.period * SECONDS_PER_DAY;
        let x = 4.0 * std::f64::consts::PI.powi(2) / (self.g * self.ms);
        (period_s * period_s / x).powf(1.0 / 3.0)
    }
}

fn require_positive(name: &str, value: f64) -> AeronomyResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AeronomyError::ConfigError(format!(
            "{name} must be finite and > 0, got {value}"
        )));
    }
    Ok(())
}

fn require_non_negative(name: &str, value: f64) -> AeronomyResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(AeronomyError::ConfigError(format!(
            "{name} must be finite and >= 0, got {value}"
        )));
    }
    Ok(())
}

impl AeronomyConfig {
    pub fn from_file(path: &str) -> AeronomyResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> AeronomyResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AeronomyResult<()> {
        let p = &self.problem;
        require_positive("problem.G", p.g)?;
        require_positive("problem.Mp", p.mp)?;
        require_positive("problem.Ms", p.ms)?;
        require_positive("problem.Rp", p.rp)?;
        require_positive("problem.period", p.period)?;
        require_positive("problem.softening_rp", p.softening_rp)?;
        if !p.tidal_sign.is_finite() {
            return Err(AeronomyError::ConfigError(
                "problem.tidal_sign must be finite".to_string(),
            ));
        }

        let h = &self.hydro;
        if !h.gamma.is_finite() || h.gamma <= 1.0 {
            return Err(AeronomyError::ConfigError(format!(
                "hydro.gamma must be finite and > 1, got {}",
                h.gamma
            )));
        }
        require_non_negative("hydro.dfloor", h.dfloor)?;
        require_non_negative("hydro.pfloor", h.pfloor)?;
        require_non_negative("hydro.sfloor", h.sfloor)?;
        if h.sfloor >= 0.5 {
            return Err(AeronomyError::ConfigError(format!(
                "hydro.sfloor must be < 0.5, got {}",
                h.sfloor
            )));
        }
        require_positive("hydro.gas_constant", h.gas_constant)?;

        let r = &self.radiation;
        require_positive("radiation.distance", r.distance)?;
        require_positive("radiation.reference_distance", r.reference_distance)?;
        require_positive("radiation.wave_to_meters", r.wave_to_meters)?;
        require_non_negative("radiation.radiation_scaling", r.radiation_scaling)?;
        parse_directions(&r.indir)?;
        parse_directions(&r.outdir)?;
        if !(0.0..1.0).contains(&r.orbit.eccentricity) {
            return Err(AeronomyError::ConfigError(format!(
                "radiation.orbit.eccentricity must be in [0, 1), got {}",
                r.orbit.eccentricity
            )));
        }
        if let Some(rot) = r.orbit.rotation_period {
            require_positive("radiation.orbit.rotation_period", rot)?;
        }
        for band in &r.bands {
            if band.spectrum_file.is_none() && band.spectrum.is_empty() {
                return Err(AeronomyError::ConfigError(format!(
                    "band '{}' needs a spectrum_file or inline spectrum",
                    band.name
                )));
            }
            for absorber in &band.absorbers {
                if let EnergyPartition::Fixed { heat_fraction } = absorber.partition {
                    if !(0.0..=1.0).contains(&heat_fraction) {
                        return Err(AeronomyError::ConfigError(format!(
                            "absorber '{}' heat_fraction must be in [0, 1], got {heat_fraction}",
                            absorber.name
                        )));
                    }
                }
            }
        }

        let c = &self.chemistry;
        require_positive("chemistry.rho_p", c.rho_p)?;
        require_positive("chemistry.cs", c.cs)?;
        require_positive("chemistry.space_density_factor", c.space_density_factor)?;
        require_positive("chemistry.r_replenish_Rp", c.r_replenish_rp)?;
        require_positive("chemistry.r_core_Rp", c.r_core_rp)?;
        if c.r_surface_rp <= c.r_core_rp {
            return Err(AeronomyError::ConfigError(format!(
                "chemistry.r_surface_Rp ({}) must exceed r_core_Rp ({})",
                c.r_surface_rp, c.r_core_rp
            )));
        }
        if !(0.0..1.0).contains(&c.helium_mass_fraction) {
            return Err(AeronomyError::ConfigError(format!(
                "chemistry.helium_mass_fraction must be in [0, 1), got {}",
                c.helium_mass_fraction
            )));
        }

        self.species_set()?;
        Ok(())
    }

    pub fn species_set(&self) -> AeronomyResult<SpeciesSet> {
        SpeciesSet::from_species(&self.species)
    }
}

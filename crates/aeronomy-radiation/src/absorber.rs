// ─────────────────────────────────────────────────────────────────────
// Aeronomy — Absorber
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Ionizing absorbers.
//!
//! An absorber removes photons above the ionization threshold of one
//! neutral species. Cross-sections depend only on wavelength, so they are
//! evaluated once per spectral point at construction; the per-cell
//! coefficient is that cross-section times the neutral number density.
//! Absorbed energy is split into a heat share `q` and an ionization share
//! `h` with `h + q = 1`.

use crate::spectrum::Spectrum;
use aeronomy_math::interp::MonotoneSpline;
use aeronomy_math::table::DataTable;
use aeronomy_types::config::{AbsorberConfig, CrossSectionModel, EnergyPartition};
use aeronomy_types::constants::{EV, HYDROGEN_A0, MEGABARN, PLANCK, SPEED_OF_LIGHT};
use aeronomy_types::error::{AeronomyError, AeronomyResult};
use aeronomy_types::species::{Species, SpeciesSet};
use aeronomy_types::state::IonizationChannel;
use std::path::Path;

/// Relative slack on the threshold wavelength comparison, so a spectral
/// point placed exactly at λ₀ is treated as at-threshold.
const THRESHOLD_TOLERANCE: f64 = 1.0e-12;

/// Cross-section source of an absorber.
#[derive(Debug, Clone)]
pub enum AbsorberKind {
    /// Hydrogen-like threshold cross-section `A0` with the chosen
    /// above-threshold model.
    Hydrogenic(CrossSectionModel),
    /// Cross-section interpolated from an (energy eV, σ Mb) table.
    Tabulated(MonotoneSpline),
}

/// Result of attenuating one spectral bin through one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergySplit {
    pub transmitted: f64,
    pub heat: f64,
    pub ionization: f64,
}

#[derive(Debug, Clone)]
pub struct Absorber {
    name: String,
    kind: AbsorberKind,
    neutral: usize,
    ion: usize,
    neutral_mass: f64,
    ionization_energy: f64,
    lambda_0: f64,
    partition: EnergyPartition,
    channel: usize,
    sigma: Vec<f64>,
    h: Vec<f64>,
    q: Vec<f64>,
}

/// Hydrogenic photoionization cross-section (m²) at `nu` above threshold `nu_0`.
pub fn hydrogenic_cross_section(nu: f64, nu_0: f64) -> f64 {
    if nu <= nu_0 {
        return HYDROGEN_A0;
    }
    let eps = (nu / nu_0 - 1.0).sqrt();
    let ratio = nu_0 / nu;
    HYDROGEN_A0 * ratio.powi(4) * (4.0 - 4.0 * eps.atan() / eps).exp()
        / (1.0 - (-2.0 * std::f64::consts::PI / eps).exp())
}

impl Absorber {
    /// Build an absorber for `spectrum`.
    ///
    /// `neutral` and `ion` are species indices; the ionization energy is the
    /// difference of their reference energies.
    pub fn new(
        name: &str,
        kind: AbsorberKind,
        species: &SpeciesSet,
        neutral: usize,
        ion: usize,
        partition: EnergyPartition,
        channel: usize,
        spectrum: &Spectrum,
    ) -> AeronomyResult<Self> {
        let ionization_energy = species.energy(ion) - species.energy(neutral);
        if !ionization_energy.is_finite() || ionization_energy <= 0.0 {
            return Err(AeronomyError::ConfigError(format!(
                "absorber {name}: ionization energy must be > 0, got {ionization_energy}"
            )));
        }
        if let EnergyPartition::Fixed { heat_fraction } = partition {
            if !(0.0..=1.0).contains(&heat_fraction) {
                return Err(AeronomyError::ConfigError(format!(
                    "absorber {name}: heat_fraction must be in [0, 1], got {heat_fraction}"
                )));
            }
        }
        let lambda_0 = PLANCK * SPEED_OF_LIGHT / ionization_energy;

        let mut absorber = Absorber {
            name: name.to_string(),
            kind,
            neutral,
            ion,
            neutral_mass: species.mass(neutral),
            ionization_energy,
            lambda_0,
            partition,
            channel,
            sigma: Vec::new(),
            h: Vec::new(),
            q: Vec::new(),
        };
        absorber.calculate_cross_sections(spectrum)?;
        absorber.calculate_energy_functions(spectrum);
        Ok(absorber)
    }

    /// Look up an absorber by its configuration name.
    pub fn from_config(
        cfg: &AbsorberConfig,
        species: &SpeciesSet,
        spectrum: &Spectrum,
        channel: usize,
        data_dir: &Path,
    ) -> AeronomyResult<Self> {
        match cfg.name.as_str() {
            "HYDROGEN_IONIZATION" => {
                let neutral = species.require(Species::Hydrogen, &cfg.name)?;
                let ion = species.require(Species::HydrogenIon, &cfg.name)?;
                Self::new(
                    &cfg.name,
                    AbsorberKind::Hydrogenic(cfg.cross_section),
                    species,
                    neutral,
                    ion,
                    cfg.partition,
                    channel,
                    spectrum,
                )
            }
            "HELIUM_TRIPLET_IONIZATION" => {
                let neutral = species.require(Species::HeliumTriplet, &cfg.name)?;
                let ion = species.require(Species::HeliumIon, &cfg.name)?;
                let file = cfg.table.as_ref().ok_or_else(|| {
                    AeronomyError::ConfigError(format!(
                        "absorber {} requires a cross-section table",
                        cfg.name
                    ))
                })?;
                let table = DataTable::from_file(data_dir.join(file))?;
                Self::new(
                    &cfg.name,
                    AbsorberKind::Tabulated(table.spline(0, 1)?),
                    species,
                    neutral,
                    ion,
                    cfg.partition,
                    channel,
                    spectrum,
                )
            }
            other => Err(AeronomyError::ConfigError(format!(
                "unknown absorber '{other}'"
            ))),
        }
    }

    fn calculate_cross_sections(&mut self, spectrum: &Spectrum) -> AeronomyResult<()> {
        let nu_0 = self.ionization_energy / PLANCK;
        let mut sigma = Vec::with_capacity(spectrum.len());
        for n in 0..spectrum.len() {
            if self.below_threshold(spectrum.wavelength_m(n)) {
                sigma.push(0.0);
                continue;
            }
            let value = match &self.kind {
                AbsorberKind::Hydrogenic(CrossSectionModel::Empirical) => HYDROGEN_A0,
                AbsorberKind::Hydrogenic(CrossSectionModel::Hydrogenic) => {
                    hydrogenic_cross_section(spectrum.frequency(n), nu_0)
                }
                AbsorberKind::Tabulated(spline) => {
                    let energy_ev = spectrum.photon_energy(n) / EV;
                    if energy_ev < spline.x_min() {
                        0.0
                    } else {
                        spline.eval(energy_ev)?.max(0.0) * MEGABARN
                    }
                }
            };
            sigma.push(value);
        }
        self.sigma = sigma;
        Ok(())
    }

    fn calculate_energy_functions(&mut self, spectrum: &Spectrum) {
        let n = spectrum.len();
        self.h = Vec::with_capacity(n);
        self.q = Vec::with_capacity(n);
        for i in 0..n {
            let wave = spectrum.wavelength_m(i);
            let h = if self.below_threshold(wave) {
                0.0
            } else {
                match self.partition {
                    EnergyPartition::Threshold => (wave / self.lambda_0).min(1.0),
                    EnergyPartition::Fixed { heat_fraction } => 1.0 - heat_fraction,
                }
            };
            self.h.push(h);
            self.q.push(1.0 - h);
        }
    }

    fn below_threshold(&self, wave: f64) -> bool {
        wave > self.lambda_0 * (1.0 + THRESHOLD_TOLERANCE)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &AbsorberKind {
        &self.kind
    }

    pub fn neutral(&self) -> usize {
        self.neutral
    }

    pub fn ion(&self) -> usize {
        self.ion
    }

    pub fn channel(&self) -> usize {
        self.channel
    }

    pub fn ionization_energy(&self) -> f64 {
        self.ionization_energy
    }

    /// Threshold wavelength λ₀ = h c / E_ion (m).
    pub fn threshold_wavelength(&self) -> f64 {
        self.lambda_0
    }

    pub fn ionization_channel(&self) -> IonizationChannel {
        IonizationChannel {
            neutral: self.neutral,
            ion: self.ion,
            ionization_energy: self.ionization_energy,
        }
    }

    pub fn cross_section(&self, n: usize) -> f64 {
        self.sigma[n]
    }

    pub fn h(&self, n: usize) -> f64 {
        self.h[n]
    }

    pub fn q(&self, n: usize) -> f64 {
        self.q[n]
    }

    pub fn is_ionizing(&self, n: usize) -> bool {
        self.sigma[n] > 0.0
    }

    /// Absorption coefficient κ (1/m) at spectral point `n` for a neutral
    /// mass density `s_neutral` (kg/m³).
    pub fn absorption_coefficient(&self, n: usize, s_neutral: f64) -> f64 {
        let number_density = s_neutral.max(0.0) / self.neutral_mass;
        self.sigma[n] * number_density
    }

    /// Attenuate `incident` flux in bin `n` through optical depth `dtau`.
    ///
    /// Non-ionizing bins pass through unchanged. The three parts always
    /// sum to `incident`.
    pub fn energy_absorption(&self, n: usize, incident: f64, dtau: f64) -> EnergySplit {
        if !self.is_ionizing(n) || dtau <= 0.0 {
            return EnergySplit {
                transmitted: incident,
                heat: 0.0,
                ionization: 0.0,
            };
        }
        let absorbed = incident * (-(-dtau).exp_m1());
        let heat = absorbed * self.q[n];
        EnergySplit {
            transmitted: incident - absorbed,
            heat,
            ionization: absorbed - heat,
        }
    }
}

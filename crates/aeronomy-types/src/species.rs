// ─────────────────────────────────────────────────────────────────────
// Aeronomy — Species
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Tracked chemical species and their scalar-array indices.
//!
//! The set is fixed at problem setup. Index `n` of a `SpeciesSet` is the
//! index into every per-cell scalar array (`s[n, k, j, i]`).

use crate::constants::{
    HE_IONIZATION_ENERGY, HE_TRIPLET_ENERGY, M_ELECTRON, M_HELIUM, M_HYDROGEN, RYDBERG_ENERGY,
};
use crate::error::{AeronomyError, AeronomyResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Electron,
    Hydrogen,
    HydrogenIon,
    HeliumSinglet,
    HeliumTriplet,
    HeliumIon,
}

impl Species {
    pub fn name(self) -> &'static str {
        match self {
            Species::Electron => "electron",
            Species::Hydrogen => "hydrogen",
            Species::HydrogenIon => "hydrogen_ion",
            Species::HeliumSinglet => "helium_singlet",
            Species::HeliumTriplet => "helium_triplet",
            Species::HeliumIon => "helium_ion",
        }
    }

    /// Particle mass (kg). Ions are the neutral mass minus one electron so
    /// that ionization conserves mass exactly.
    pub fn default_mass(self) -> f64 {
        match self {
            Species::Electron => M_ELECTRON,
            Species::Hydrogen => M_HYDROGEN,
            Species::HydrogenIon => M_HYDROGEN - M_ELECTRON,
            Species::HeliumSinglet | Species::HeliumTriplet => M_HELIUM,
            Species::HeliumIon => M_HELIUM - M_ELECTRON,
        }
    }

    /// Reference energy (J) relative to the neutral ground state.
    pub fn default_energy(self) -> f64 {
        match self {
            Species::Electron | Species::Hydrogen | Species::HeliumSinglet => 0.0,
            Species::HydrogenIon => RYDBERG_ENERGY,
            Species::HeliumTriplet => HE_TRIPLET_ENERGY,
            Species::HeliumIon => HE_IONIZATION_ENERGY,
        }
    }
}

/// Mass and reference energy of one registered species.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeciesInfo {
    pub species: Species,
    pub mass: f64,
    pub energy: f64,
}

impl From<Species> for SpeciesInfo {
    fn from(species: Species) -> Self {
        SpeciesInfo {
            species,
            mass: species.default_mass(),
            energy: species.default_energy(),
        }
    }
}

/// Ordered, immutable set of tracked species.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesSet {
    entries: Vec<SpeciesInfo>,
}

impl SpeciesSet {
    pub fn new(entries: Vec<SpeciesInfo>) -> AeronomyResult<Self> {
        if entries.is_empty() {
            return Err(AeronomyError::ConfigError(
                "species set must contain at least one species".to_string(),
            ));
        }
        for (n, info) in entries.iter().enumerate() {
            if !info.mass.is_finite() || info.mass <= 0.0 {
                return Err(AeronomyError::ConfigError(format!(
                    "species {} mass must be finite and > 0, got {}",
                    info.species.name(),
                    info.mass
                )));
            }
            if !info.energy.is_finite() {
                return Err(AeronomyError::ConfigError(format!(
                    "species {} energy must be finite",
                    info.species.name()
                )));
            }
            if entries[..n].iter().any(|e| e.species == info.species) {
                return Err(AeronomyError::ConfigError(format!(
                    "species {} registered twice",
                    info.species.name()
                )));
            }
        }
        Ok(SpeciesSet { entries })
    }

    pub fn from_species(species: &[Species]) -> AeronomyResult<Self> {
        Self::new(species.iter().copied().map(SpeciesInfo::from).collect())
    }

    /// Electron, neutral hydrogen, ionized hydrogen.
    pub fn hydrogen() -> Self {
        SpeciesSet {
            entries: vec![
                Species::Electron.into(),
                Species::Hydrogen.into(),
                Species::HydrogenIon.into(),
            ],
        }
    }

    /// Hydrogen set plus helium singlet, triplet and ion.
    pub fn hydrogen_helium() -> Self {
        SpeciesSet {
            entries: vec![
                Species::Electron.into(),
                Species::Hydrogen.into(),
                Species::HydrogenIon.into(),
                Species::HeliumSinglet.into(),
                Species::HeliumTriplet.into(),
                Species::HeliumIon.into(),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self, species: Species) -> Option<usize> {
        self.entries.iter().position(|e| e.species == species)
    }

    /// Index of `species`, or a configuration error naming the caller.
    pub fn require(&self, species: Species, context: &str) -> AeronomyResult<usize> {
        self.index(species).ok_or_else(|| {
            AeronomyError::ConfigError(format!(
                "{context} requires species '{}' which is not registered",
                species.name()
            ))
        })
    }

    pub fn info(&self, n: usize) -> &SpeciesInfo {
        &self.entries[n]
    }

    pub fn mass(&self, n: usize) -> f64 {
        self.entries[n].mass
    }

    pub fn energy(&self, n: usize) -> f64 {
        self.entries[n].energy
    }

    pub fn masses(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.mass).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpeciesInfo> {
        self.entries.iter()
    }

    pub fn electron(&self) -> Option<usize> {
        self.index(Species::Electron)
    }
}

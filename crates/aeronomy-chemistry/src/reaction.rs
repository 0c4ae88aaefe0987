// ─────────────────────────────────────────────────────────────────────
// Aeronomy — Reactions
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Reaction variants and the per-cell update each one contributes.
//!
//! Every reaction reads one `CellContext` and adds mass-density changes
//! `stoich · rate · dt · m_s` into a shared `ds` buffer. Energy terms are
//! returned as a rate (W/m³); the network integrates them over `dt`.

use crate::rate::RateLaw;
use aeronomy_math::table::DataTable;
use aeronomy_types::config::ReactionConfig;
use aeronomy_types::constants::K_BOLTZMANN;
use aeronomy_types::error::{AeronomyError, AeronomyResult};
use aeronomy_types::species::{Species, SpeciesSet};
use aeronomy_types::state::IonizationChannel;
use log::error;
use std::path::Path;

/// Local state of one cell handed to every reaction.
#[derive(Debug, Clone, Copy)]
pub struct CellContext<'a> {
    pub temperature: f64,
    pub dt: f64,
    pub volume: f64,
    /// Number density (m⁻³) per species index.
    pub number_density: &'a [f64],
    /// Captured photoionization power (W) per accumulator channel.
    pub ionizing_power: &'a [f64],
    pub k: usize,
    pub j: usize,
    pub i: usize,
    pub time: f64,
    pub cycle: u64,
}

/// Diagnostic output of one reaction in one cell.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReactionOutput {
    /// Net event rate (m⁻³ s⁻¹).
    pub rate: f64,
    /// Heating (> 0) or cooling (< 0) rate (W/m³).
    pub energy_rate: f64,
}

/// Photon-driven ionization fed by the ionizing-energy accumulator.
#[derive(Debug, Clone)]
pub struct Photoionization {
    pub neutral: usize,
    pub ion: usize,
    pub electron: usize,
    pub channels: Vec<usize>,
    pub ionization_energy: f64,
}

/// Two-body reaction with an optional reverse channel:
/// `reactants → products` at α(T), `products → reactants` at β(T).
#[derive(Debug, Clone)]
pub struct Collisional {
    pub reactants: Vec<usize>,
    pub products: Vec<usize>,
    pub forward: RateLaw,
    pub reverse: Option<RateLaw>,
    /// Energy released to the gas per forward event (J); negative for
    /// endothermic excitation.
    pub heat_per_event: f64,
}

/// Radiative cooling proportional to `n_a · n_b`.
#[derive(Debug, Clone)]
pub struct Cooling {
    pub partners: [usize; 2],
    pub law: RateLaw,
    /// Multiply the coefficient by kT (recombination cooling).
    pub thermal: bool,
}

#[derive(Debug, Clone)]
pub enum ReactionKind {
    Photoionization(Photoionization),
    Collisional(Collisional),
    Cooling(Cooling),
}

#[derive(Debug, Clone)]
pub struct Reaction {
    name: String,
    kind: ReactionKind,
}

fn load_rate_table(cfg: &ReactionConfig, data_dir: &Path) -> AeronomyResult<DataTable> {
    let file = cfg.table.as_ref().ok_or_else(|| {
        AeronomyError::ConfigError(format!("reaction {} requires a rate table", cfg.name))
    })?;
    DataTable::from_file(data_dir.join(file))
}

impl Reaction {
    pub fn new(name: &str, kind: ReactionKind) -> Self {
        Reaction {
            name: name.to_string(),
            kind,
        }
    }

    /// Build a named reaction, resolving species and photoionization
    /// channels. Unknown names and missing species are configuration errors.
    pub fn from_config(
        cfg: &ReactionConfig,
        species: &SpeciesSet,
        channels: &[IonizationChannel],
        data_dir: &Path,
    ) -> AeronomyResult<Self> {
        let name = cfg.name.as_str();
        let need = |s: Species| species.require(s, name);

        let kind = match name {
            "PHOTOIONIZATION" => photoionization(
                name,
                need(Species::Hydrogen)?,
                need(Species::HydrogenIon)?,
                need(Species::Electron)?,
                species,
                channels,
            )?,
            "HE_TRIPLET_PHOTOIONIZATION" => photoionization(
                name,
                need(Species::HeliumTriplet)?,
                need(Species::HeliumIon)?,
                need(Species::Electron)?,
                species,
                channels,
            )?,
            "H_RECOMBINATION" => ReactionKind::Collisional(Collisional {
                reactants: vec![need(Species::HydrogenIon)?, need(Species::Electron)?],
                products: vec![need(Species::Hydrogen)?],
                forward: RateLaw::case_b_recombination(),
                reverse: None,
                heat_per_event: 0.0,
            }),
            "RECOMBINATION_COOLING" => ReactionKind::Cooling(Cooling {
                partners: [need(Species::Electron)?, need(Species::HydrogenIon)?],
                law: RateLaw::recombination_cooling(),
                thermal: true,
            }),
            "LYA_COOLING" => ReactionKind::Cooling(Cooling {
                partners: [need(Species::Electron)?, need(Species::Hydrogen)?],
                law: RateLaw::lyman_alpha_cooling(),
                thermal: false,
            }),
            "HE_E_COLLISIONS" => {
                let singlet = need(Species::HeliumSinglet)?;
                let triplet = need(Species::HeliumTriplet)?;
                let electron = need(Species::Electron)?;
                let table = load_rate_table(cfg, data_dir)?;
                let forward = RateLaw::Table(table.spline(0, cfg.alpha_column.unwrap_or(1))?);
                let reverse = match cfg.beta_column {
                    Some(col) => Some(RateLaw::Table(table.spline(0, col)?)),
                    None => None,
                };
                ReactionKind::Collisional(Collisional {
                    reactants: vec![singlet, electron],
                    products: vec![triplet, electron],
                    forward,
                    reverse,
                    heat_per_event: species.energy(singlet) - species.energy(triplet),
                })
            }
            "HE_H_CHARGE_EXCHANGE" => ReactionKind::Collisional(Collisional {
                reactants: vec![need(Species::HeliumIon)?, need(Species::Hydrogen)?],
                products: vec![need(Species::HeliumSinglet)?, need(Species::HydrogenIon)?],
                forward: RateLaw::he_h_charge_exchange(),
                reverse: None,
                heat_per_event: 0.0,
            }),
            "H_HE_TRIPLET_CHARGE_EXCHANGE" => ReactionKind::Collisional(Collisional {
                reactants: vec![need(Species::HydrogenIon)?, need(Species::HeliumTriplet)?],
                products: vec![need(Species::Hydrogen)?, need(Species::HeliumIon)?],
                forward: RateLaw::h_he_triplet_charge_exchange(),
                reverse: None,
                heat_per_event: 0.0,
            }),
            "HE_TRIPLET_H_QUENCHING" => ReactionKind::Collisional(Collisional {
                reactants: vec![need(Species::HeliumTriplet)?, need(Species::Hydrogen)?],
                products: vec![need(Species::HeliumSinglet)?, need(Species::Hydrogen)?],
                forward: RateLaw::he_triplet_h_quenching(),
                reverse: None,
                heat_per_event: 0.0,
            }),
            other => {
                return Err(AeronomyError::ConfigError(format!(
                    "unknown reaction '{other}'"
                )))
            }
        };
        Ok(Reaction::new(name, kind))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ReactionKind {
        &self.kind
    }

    /// Every species index this reaction touches.
    pub fn species_indices(&self) -> Vec<usize> {
        match &self.kind {
            ReactionKind::Photoionization(p) => vec![p.neutral, p.ion, p.electron],
            ReactionKind::Collisional(c) => {
                c.reactants.iter().chain(c.products.iter()).copied().collect()
            }
            ReactionKind::Cooling(c) => c.partners.to_vec(),
        }
    }

    /// Channels read from the ionizing-energy accumulator.
    pub fn channels(&self) -> &[usize] {
        match &self.kind {
            ReactionKind::Photoionization(p) => &p.channels,
            _ => &[],
        }
    }

    /// Add this reaction's mass-density change over `ctx.dt` to `ds`.
    pub fn react(
        &self,
        ctx: &CellContext<'_>,
        masses: &[f64],
        ds: &mut [f64],
    ) -> AeronomyResult<ReactionOutput> {
        match &self.kind {
            ReactionKind::Photoionization(p) => {
                let power: f64 = p.channels.iter().map(|&c| ctx.ionizing_power[c]).sum();
                if power <= 0.0 {
                    return Ok(ReactionOutput::default());
                }
                let gain = ctx.dt * power / p.ionization_energy / ctx.volume;
                let available = ctx.number_density[p.neutral];
                if gain > available {
                    error!(
                        "{}: ionization gain {gain:.3e} m^-3 exceeds neutral density {available:.3e} m^-3 at ({}, {}, {})",
                        self.name, ctx.k, ctx.j, ctx.i
                    );
                    return Err(AeronomyError::OverIonization {
                        gain,
                        available,
                        k: ctx.k,
                        j: ctx.j,
                        i: ctx.i,
                        time: ctx.time,
                        cycle: ctx.cycle,
                    });
                }
                ds[p.neutral] -= gain * masses[p.neutral];
                ds[p.ion] += gain * masses[p.ion];
                ds[p.electron] += gain * masses[p.electron];
                Ok(ReactionOutput {
                    rate: gain / ctx.dt,
                    energy_rate: 0.0,
                })
            }
            ReactionKind::Collisional(c) => {
                let t = ctx.temperature;
                let n = ctx.number_density;
                let mut net = c.forward.eval(t)? * c.reactants.iter().map(|&s| n[s]).product::<f64>();
                if let Some(reverse) = &c.reverse {
                    net -= reverse.eval(t)? * c.products.iter().map(|&s| n[s]).product::<f64>();
                }
                let events = net * ctx.dt;
                for &s in &c.reactants {
                    ds[s] -= events * masses[s];
                }
                for &s in &c.products {
                    ds[s] += events * masses[s];
                }
                Ok(ReactionOutput {
                    rate: net,
                    energy_rate: net * c.heat_per_event,
                })
            }
            ReactionKind::Cooling(c) => {
                let t = ctx.temperature;
                let mut coeff = c.law.eval(t)?;
                if c.thermal {
                    coeff *= K_BOLTZMANN * t;
                }
                let rate = coeff * ctx.number_density[c.partners[0]] * ctx.number_density[c.partners[1]];
                Ok(ReactionOutput {
                    rate,
                    energy_rate: -rate,
                })
            }
        }
    }
}

fn photoionization(
    name: &str,
    neutral: usize,
    ion: usize,
    electron: usize,
    species: &SpeciesSet,
    channels: &[IonizationChannel],
) -> AeronomyResult<ReactionKind> {
    let bound: Vec<usize> = channels
        .iter()
        .enumerate()
        .filter(|(_, ch)| ch.neutral == neutral && ch.ion == ion)
        .map(|(c, _)| c)
        .collect();
    if bound.is_empty() {
        return Err(AeronomyError::ConfigError(format!(
            "{name} requires an absorber ionizing '{}'",
            species.info(neutral).species.name()
        )));
    }
    Ok(ReactionKind::Photoionization(Photoionization {
        neutral,
        ion,
        electron,
        channels: bound,
        ionization_energy: species.energy(ion) - species.energy(neutral),
    }))
}

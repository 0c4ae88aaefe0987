// ─────────────────────────────────────────────────────────────────────
// Aeronomy — Reaction Network
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Ordered reaction list applied explicitly to every cell.
//!
//! All reactions read the same start-of-stage state; their contributions
//! are summed in registration order.

use crate::reaction::{CellContext, Reaction, ReactionOutput};
use aeronomy_types::config::ChemistryParams;
use aeronomy_types::error::{AeronomyError, AeronomyResult};
use aeronomy_types::species::SpeciesSet;
use aeronomy_types::state::IonizationChannel;
use log::info;
use std::path::Path;

/// Combined result of every reaction in one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkUpdate {
    /// Mass-density change per species over `dt` (kg/m³).
    pub ds: Vec<f64>,
    /// Energy-density change over `dt` (J/m³).
    pub de: f64,
    /// Per-reaction diagnostics, in registration order.
    pub outputs: Vec<ReactionOutput>,
}

#[derive(Debug, Clone)]
pub struct ReactionNetwork {
    reactions: Vec<Reaction>,
    masses: Vec<f64>,
    nchannels: usize,
}

impl ReactionNetwork {
    pub fn new(species: &SpeciesSet, nchannels: usize) -> Self {
        ReactionNetwork {
            reactions: Vec::new(),
            masses: species.masses(),
            nchannels,
        }
    }

    /// Build every reaction listed in `chemistry.reactions`.
    pub fn from_config(
        chemistry: &ChemistryParams,
        species: &SpeciesSet,
        channels: &[IonizationChannel],
        data_dir: &Path,
    ) -> AeronomyResult<Self> {
        let mut network = Self::new(species, channels.len());
        for cfg in &chemistry.reactions {
            network.register(Reaction::from_config(cfg, species, channels, data_dir)?)?;
        }
        info!(
            "reaction network: {} reactions [{}]",
            network.len(),
            network.names().join(", ")
        );
        Ok(network)
    }

    /// Validate indices and append. Registration order is application order.
    pub fn register(&mut self, reaction: Reaction) -> AeronomyResult<()> {
        let nspecies = self.masses.len();
        if let Some(&bad) = reaction.species_indices().iter().find(|&&s| s >= nspecies) {
            return Err(AeronomyError::ConfigError(format!(
                "reaction {} references species index {bad} but only {nspecies} are registered",
                reaction.name()
            )));
        }
        if let Some(&bad) = reaction.channels().iter().find(|&&c| c >= self.nchannels) {
            return Err(AeronomyError::ConfigError(format!(
                "reaction {} references accumulator channel {bad} but only {} exist",
                reaction.name(),
                self.nchannels
            )));
        }
        if self.reactions.iter().any(|r| r.name() == reaction.name()) {
            return Err(AeronomyError::ConfigError(format!(
                "reaction {} registered twice",
                reaction.name()
            )));
        }
        self.reactions.push(reaction);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.reactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reactions.is_empty()
    }

    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    pub fn names(&self) -> Vec<&str> {
        self.reactions.iter().map(|r| r.name()).collect()
    }

    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    /// Run every reaction on one cell.
    pub fn react(&self, ctx: &CellContext<'_>) -> AeronomyResult<NetworkUpdate> {
        let mut ds = vec![0.0; self.masses.len()];
        let mut outputs = Vec::with_capacity(self.reactions.len());
        let mut energy_rate = 0.0;
        for reaction in &self.reactions {
            let out = reaction.react(ctx, &self.masses, &mut ds)?;
            energy_rate += out.energy_rate;
            outputs.push(out);
        }
        Ok(NetworkUpdate {
            ds,
            de: energy_rate * ctx.dt,
            outputs,
        })
    }
}

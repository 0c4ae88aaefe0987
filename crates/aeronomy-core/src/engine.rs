// ─────────────────────────────────────────────────────────────────────
// Aeronomy — Atmosphere Engine
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! AtmosphereEngine: the host-facing facade for one mesh block.
//!
//! Owns the radiation manager, reaction network, accumulator, reference
//! profile and diagnostics of a block. The host fluid integrator calls, per
//! timestep:
//!
//! ```text
//! for each sub-stage:
//!     calculate_transfer(scalars, time)
//!     source_terms(step, prim, scalars, du, ds)
//! finish_step(prim, cons, scalars, step)
//! ```
//!
//! Out-of-order calls return `AeronomyError::PhaseViolation`.

use crate::diagnostics::Diagnostics;
use crate::gravity::GravityField;
use crate::hydrostatic::{HydrostaticProfile, InitialAbundances};
use crate::phase::{PhaseToken, StepPhase};
use crate::replenish::{check_finite, replenish, reset_cell};
use crate::source::SourceCoupler;
use aeronomy_chemistry::network::ReactionNetwork;
use aeronomy_radiation::manager::RadiationManager;
use aeronomy_types::config::AeronomyConfig;
use aeronomy_types::error::{AeronomyError, AeronomyResult};
use aeronomy_types::species::SpeciesSet;
use aeronomy_types::state::{
    BlockGeometry, Conserved, IonizingEnergy, Primitives, ScalarField, StepInfo,
};
use log::{debug, info, warn};
use ndarray::{Array3, Array4};
use std::path::Path;

pub struct AtmosphereEngine {
    config: AeronomyConfig,
    geometry: BlockGeometry,
    species: SpeciesSet,
    profile: HydrostaticProfile,
    abundances: InitialAbundances,
    gravity: GravityField,
    radiation: RadiationManager,
    network: ReactionNetwork,
    coupler: SourceCoupler,
    accumulator: IonizingEnergy,
    diagnostics: Diagnostics,
    phase: PhaseToken,
}

fn check_shape(
    name: &str,
    actual: (usize, usize, usize),
    expected: (usize, usize, usize),
) -> AeronomyResult<()> {
    if actual != expected {
        return Err(AeronomyError::ConfigError(format!(
            "{name} has shape {actual:?}, block expects {expected:?}"
        )));
    }
    Ok(())
}

impl AtmosphereEngine {
    /// Build every component of the block. Relative table paths in the
    /// configuration resolve against `data_dir`.
    pub fn new(
        config: AeronomyConfig,
        geometry: BlockGeometry,
        data_dir: &Path,
    ) -> AeronomyResult<Self> {
        config.validate()?;
        let species = config.species_set()?;
        let profile = HydrostaticProfile::new(&config)?;
        let abundances = InitialAbundances::new(&config, &species)?;
        let gravity = GravityField::new(&config.problem);
        let radiation = RadiationManager::new(&config, &species, &geometry, data_dir)?;
        let network = ReactionNetwork::from_config(
            &config.chemistry,
            &species,
            radiation.channels(),
            data_dir,
        )?;
        let coupler = SourceCoupler::new(&species, config.hydro.gas_constant)?;

        for (c, channel) in radiation.channels().iter().enumerate() {
            if !network.reactions().iter().any(|r| r.channels().contains(&c)) {
                warn!(
                    "ionizing channel {c} ({} -> {}) has no photoionization reaction; captured energy is discarded",
                    species.info(channel.neutral).species.name(),
                    species.info(channel.ion).species.name()
                );
            }
        }

        let accumulator = IonizingEnergy::new(radiation.nchannels(), &geometry);
        let diagnostics = Diagnostics::new(network.len(), &geometry);
        info!(
            "atmosphere engine: {} species, {} bands, {} reactions, block {:?}, a = {:.4e} m",
            species.len(),
            radiation.bands().len(),
            network.len(),
            geometry.nx,
            gravity.semi_major_axis()
        );

        Ok(AtmosphereEngine {
            config,
            geometry,
            species,
            profile,
            abundances,
            gravity,
            radiation,
            network,
            coupler,
            accumulator,
            diagnostics,
            phase: PhaseToken::new(),
        })
    }

    /// Load the configuration from `path` and resolve tables next to it.
    pub fn from_file(path: &str, geometry: BlockGeometry) -> AeronomyResult<Self> {
        let config = AeronomyConfig::from_file(path)?;
        let data_dir = Path::new(path).parent().unwrap_or_else(|| Path::new("."));
        Self::new(config, geometry, data_dir)
    }

    fn check_block(
        &self,
        prim: Option<&Primitives>,
        cons: Option<&Conserved>,
        scalars: &ScalarField,
    ) -> AeronomyResult<()> {
        let shape = self.geometry.shape();
        if let Some(prim) = prim {
            check_shape("primitive state", prim.density.dim(), shape)?;
        }
        if let Some(cons) = cons {
            check_shape("conserved state", cons.density.dim(), shape)?;
        }
        let (ns, n3, n2, n1) = scalars.s.dim();
        check_shape("scalar field", (n3, n2, n1), shape)?;
        if ns != self.species.len() {
            return Err(AeronomyError::ConfigError(format!(
                "scalar field carries {ns} species, {} are registered",
                self.species.len()
            )));
        }
        Ok(())
    }

    /// Fill every cell with the hydrostatic profile at rest and the
    /// initial abundances.
    pub fn initialize_block(
        &self,
        prim: &mut Primitives,
        cons: &mut Conserved,
        scalars: &mut ScalarField,
    ) -> AeronomyResult<()> {
        self.check_block(Some(&*prim), Some(&*cons), scalars)?;
        let geom = &self.geometry;
        for k in geom.all3() {
            for j in geom.all2() {
                for i in geom.all1() {
                    let r = geom.radius(k, j, i);
                    reset_cell(
                        &self.profile,
                        &self.abundances,
                        self.config.hydro.gamma,
                        r,
                        k,
                        j,
                        i,
                        prim,
                        cons,
                        scalars,
                    );
                }
            }
        }
        Ok(())
    }

    /// Gravitational acceleration `[g1, g2, g3]` on every cell.
    pub fn gravity_field(&self) -> [Array3<f64>; 3] {
        self.gravity.field(&self.geometry)
    }

    /// Radiative transfer along every active row; fills the ionizing
    /// energy accumulator and the band heating.
    pub fn calculate_transfer(&mut self, scalars: &ScalarField, time: f64) -> AeronomyResult<()> {
        self.check_block(None, None, scalars)?;
        self.phase.begin_transfer()?;
        for k in self.geometry.active3() {
            for j in self.geometry.active2() {
                self.radiation.calculate_fluxes(
                    scalars,
                    &self.geometry,
                    time,
                    k,
                    j,
                    &mut self.accumulator,
                );
            }
        }
        debug!(
            "transfer at t = {time:.3e} s, flux scale {:.3e}",
            self.radiation.flux_scale(time)
        );
        Ok(())
    }

    /// Band radiances along the outgoing directions; does not touch the
    /// step accumulators.
    pub fn calculate_radiances(&mut self, scalars: &ScalarField, time: f64) -> AeronomyResult<()> {
        self.check_block(None, None, scalars)?;
        for k in self.geometry.active3() {
            for j in self.geometry.active2() {
                self.radiation
                    .calculate_radiances(scalars, &self.geometry, time, k, j);
            }
        }
        Ok(())
    }

    /// Explicit chemistry and radiative source terms for one sub-stage.
    /// A failed stage abandons the step: the accumulator is cleared and
    /// the phase returns to idle.
    pub fn source_terms(
        &mut self,
        step: &StepInfo,
        prim: &Primitives,
        scalars: &ScalarField,
        du: &mut Conserved,
        ds: &mut Array4<f64>,
    ) -> AeronomyResult<()> {
        self.check_block(Some(prim), Some(&*du), scalars)?;
        if ds.dim() != scalars.s.dim() {
            return Err(AeronomyError::ConfigError(format!(
                "scalar update has shape {:?}, expected {:?}",
                ds.dim(),
                scalars.s.dim()
            )));
        }
        self.phase.begin_source()?;
        let result = self.coupler.apply(
            &self.network,
            &self.radiation,
            &mut self.accumulator,
            &self.geometry,
            step,
            prim,
            scalars,
            du,
            ds,
            &mut self.diagnostics,
        );
        if result.is_err() {
            self.accumulator.clear();
            self.phase.reset();
        }
        result
    }

    /// End of a full timestep: clear the flux accumulators and replenish
    /// the inner region.
    pub fn finish_step(
        &mut self,
        prim: &mut Primitives,
        cons: &mut Conserved,
        scalars: &mut ScalarField,
        step: &StepInfo,
    ) -> AeronomyResult<()> {
        self.phase.finish()?;
        self.radiation.clear_flux();
        self.replenish(prim, cons, scalars, step)
    }

    /// Check the primitive state for non-finite values, then reset every
    /// cell within the replenish radius to the reference state.
    pub fn replenish(
        &self,
        prim: &mut Primitives,
        cons: &mut Conserved,
        scalars: &mut ScalarField,
        step: &StepInfo,
    ) -> AeronomyResult<()> {
        self.check_block(Some(&*prim), Some(&*cons), scalars)?;
        check_finite(prim, &self.geometry, step)?;
        let count = replenish(
            &self.profile,
            &self.abundances,
            self.config.hydro.gamma,
            self.replenish_radius(),
            &self.geometry,
            prim,
            cons,
            scalars,
        );
        debug!("replenished {count} cells at cycle {}", step.cycle);
        Ok(())
    }

    pub fn replenish_radius(&self) -> f64 {
        self.config.chemistry.r_replenish_rp * self.config.problem.rp
    }

    pub fn config(&self) -> &AeronomyConfig {
        &self.config
    }

    pub fn geometry(&self) -> &BlockGeometry {
        &self.geometry
    }

    pub fn species(&self) -> &SpeciesSet {
        &self.species
    }

    pub fn profile(&self) -> &HydrostaticProfile {
        &self.profile
    }

    pub fn radiation(&self) -> &RadiationManager {
        &self.radiation
    }

    pub fn network(&self) -> &ReactionNetwork {
        &self.network
    }

    pub fn accumulator(&self) -> &IonizingEnergy {
        &self.accumulator
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn phase(&self) -> StepPhase {
        self.phase.phase()
    }
}

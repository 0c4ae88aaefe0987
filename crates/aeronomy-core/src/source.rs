// ─────────────────────────────────────────────────────────────────────
// Aeronomy — Source-Term Coupler
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Explicit source terms for one integrator sub-stage.
//!
//! Per active cell:
//! 1. read the ionizing energy captured by transfer,
//! 2. temperature T = P / (R m_H Σ n_s) over every species, electrons
//!    included, which reduces to P / (R ρ (1 + x)) for pure hydrogen,
//! 3. run the reaction network on the start-of-stage state,
//! 4. add scalar mass and energy changes to `ds` and `du`.
//!
//! The direct radiative heating of every band is then added to `du`, and
//! the accumulator is cleared.

use crate::diagnostics::Diagnostics;
use aeronomy_chemistry::network::ReactionNetwork;
use aeronomy_chemistry::reaction::CellContext;
use aeronomy_radiation::manager::RadiationManager;
use aeronomy_types::error::AeronomyResult;
use aeronomy_types::species::{Species, SpeciesSet};
use aeronomy_types::state::{
    BlockGeometry, Conserved, IonizingEnergy, Primitives, ScalarField, StepInfo,
};
use log::debug;
use ndarray::Array4;

#[derive(Debug, Clone)]
pub struct SourceCoupler {
    hydrogen_mass: f64,
    masses: Vec<f64>,
    gas_constant: f64,
}

impl SourceCoupler {
    pub fn new(species: &SpeciesSet, gas_constant: f64) -> AeronomyResult<Self> {
        let hydrogen = species.require(Species::Hydrogen, "temperature")?;
        species.require(Species::HydrogenIon, "temperature")?;
        let masses = species.masses();
        Ok(SourceCoupler {
            hydrogen_mass: masses[hydrogen],
            masses,
            gas_constant,
        })
    }

    /// Total particle number density (m⁻³) of one cell.
    pub fn particle_density(&self, scalars: &ScalarField, k: usize, j: usize, i: usize) -> f64 {
        self.masses
            .iter()
            .enumerate()
            .map(|(s, m)| scalars.s[[s, k, j, i]] / m)
            .sum()
    }

    /// Gas temperature from the species mix. A cell without scalars is
    /// treated as neutral atomic hydrogen.
    pub fn temperature(
        &self,
        prim: &Primitives,
        scalars: &ScalarField,
        k: usize,
        j: usize,
        i: usize,
    ) -> f64 {
        self.temperature_of(
            prim.pressure[[k, j, i]],
            prim.density[[k, j, i]],
            self.particle_density(scalars, k, j, i),
        )
    }

    fn temperature_of(&self, pressure: f64, density: f64, particles: f64) -> f64 {
        let n = if particles > 0.0 {
            particles
        } else {
            density / self.hydrogen_mass
        };
        pressure / (self.gas_constant * self.hydrogen_mass * n)
    }

    /// Apply chemistry and radiative heating for one sub-stage of length
    /// `step.dt`, then clear `accumulator`.
    #[allow(clippy::too_many_arguments)]
    pub fn apply(
        &self,
        network: &ReactionNetwork,
        radiation: &RadiationManager,
        accumulator: &mut IonizingEnergy,
        geometry: &BlockGeometry,
        step: &StepInfo,
        prim: &Primitives,
        scalars: &ScalarField,
        du: &mut Conserved,
        ds: &mut Array4<f64>,
        diagnostics: &mut Diagnostics,
    ) -> AeronomyResult<()> {
        let nspecies = self.masses.len();
        let mut number_density = vec![0.0; nspecies];
        let mut power = vec![0.0; accumulator.nchannels()];
        let mut chemistry_energy = 0.0;

        for k in geometry.active3() {
            for j in geometry.active2() {
                for i in geometry.active1() {
                    for (s, n) in number_density.iter_mut().enumerate() {
                        *n = scalars.s[[s, k, j, i]] / self.masses[s];
                    }
                    let temperature = self.temperature_of(
                        prim.pressure[[k, j, i]],
                        prim.density[[k, j, i]],
                        number_density.iter().sum(),
                    );
                    diagnostics.temperature[[k, j, i]] = temperature;
                    for (c, p) in power.iter_mut().enumerate() {
                        *p = accumulator.get(c, k, j, i);
                    }

                    let ctx = CellContext {
                        temperature,
                        dt: step.dt,
                        volume: geometry.cell_volume(k, j, i),
                        number_density: &number_density,
                        ionizing_power: &power,
                        k,
                        j,
                        i,
                        time: step.time,
                        cycle: step.cycle,
                    };
                    let update = network.react(&ctx)?;

                    for (s, delta) in update.ds.iter().enumerate() {
                        ds[[s, k, j, i]] += delta;
                    }
                    du.energy[[k, j, i]] += update.de;
                    diagnostics.net_energy[[k, j, i]] = update.de;
                    chemistry_energy += update.de * ctx.volume;

                    for (r, out) in update.outputs.iter().enumerate() {
                        diagnostics.reaction_rate[[r, k, j, i]] = out.rate;
                        diagnostics.reaction_energy_rate[[r, k, j, i]] = out.energy_rate;
                    }
                }
            }
        }

        radiation.add_radiation_source_term(step.dt, &mut du.energy, geometry);
        diagnostics.radiative_heating = radiation.radiative_heating(geometry);
        diagnostics
            .net_energy
            .scaled_add(step.dt, &diagnostics.radiative_heating);
        accumulator.clear();

        debug!(
            "source terms at t = {:.3e} s (cycle {}): chemistry {:.3e} J, radiation {:.3e} J",
            step.time,
            step.cycle,
            chemistry_energy,
            step.dt * diagnostics.total_radiative_power(geometry)
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aeronomy_types::constants::{K_BOLTZMANN, M_HYDROGEN};
    use aeronomy_types::state::NGHOST;

    #[test]
    fn test_temperature_neutral_and_ionized() {
        let geom = BlockGeometry::radial(2, 1.0e8, 2.0e8).unwrap();
        let set = SpeciesSet::hydrogen();
        let r = K_BOLTZMANN / M_HYDROGEN;
        let coupler = SourceCoupler::new(&set, r).unwrap();
        let mut prim = Primitives::zeros(&geom);
        let mut scalars = ScalarField::zeros(3, &geom);
        let (i0, i1) = (NGHOST, NGHOST + 1);
        for i in [i0, i1] {
            prim.density[[0, 0, i]] = 1.0e-12;
            prim.pressure[[0, 0, i]] = 1.0e-12 * r * 5.0e3;
        }
        let m = set.masses();
        scalars.s[[1, 0, 0, i0]] = 1.0e-12;
        scalars.s[[0, 0, 0, i1]] = 1.0e-12 * m[0] / M_HYDROGEN;
        scalars.s[[2, 0, 0, i1]] = 1.0e-12 * m[2] / M_HYDROGEN;

        let t_neutral = coupler.temperature(&prim, &scalars, 0, 0, i0);
        let t_ionized = coupler.temperature(&prim, &scalars, 0, 0, i1);
        assert!((t_neutral - 5.0e3).abs() < 1e-9);
        assert!((t_ionized - 2.5e3).abs() < 1e-9);
    }

    #[test]
    fn test_helium_raises_mean_mass() {
        let geom = BlockGeometry::radial(1, 1.0e8, 2.0e8).unwrap();
        let set = SpeciesSet::hydrogen_helium();
        let r = K_BOLTZMANN / M_HYDROGEN;
        let coupler = SourceCoupler::new(&set, r).unwrap();
        let m = set.masses();
        let mut prim = Primitives::zeros(&geom);
        let mut scalars = ScalarField::zeros(set.len(), &geom);
        let (rho, y) = (1.0e-12, 0.25);
        prim.density[[0, 0, NGHOST]] = rho;
        prim.pressure[[0, 0, NGHOST]] = rho * r * 5.0e3;
        scalars.s[[1, 0, 0, NGHOST]] = rho * (1.0 - y);
        scalars.s[[3, 0, 0, NGHOST]] = rho * y;

        let n = rho * (1.0 - y) / m[1] + rho * y / m[3];
        assert!((coupler.particle_density(&scalars, 0, 0, NGHOST) - n).abs() < 1e-12 * n);
        let t = coupler.temperature(&prim, &scalars, 0, 0, NGHOST);
        let mu = rho / (n * M_HYDROGEN);
        assert!(mu > 1.2 && mu < 1.3, "mu = {mu}");
        assert!((t - 5.0e3 * mu).abs() < 1e-9 * t);
    }

    #[test]
    fn test_empty_cell_is_neutral_hydrogen() {
        let geom = BlockGeometry::radial(2, 1.0e8, 2.0e8).unwrap();
        let coupler = SourceCoupler::new(&SpeciesSet::hydrogen(), 2.0).unwrap();
        let scalars = ScalarField::zeros(3, &geom);
        let mut prim = Primitives::zeros(&geom);
        prim.density[[0, 0, NGHOST]] = 1.0e-12;
        prim.pressure[[0, 0, NGHOST]] = 3.0e-12;
        assert_eq!(coupler.particle_density(&scalars, 0, 0, NGHOST), 0.0);
        assert!((coupler.temperature(&prim, &scalars, 0, 0, NGHOST) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_requires_hydrogen() {
        let set = SpeciesSet::from_species(&[Species::Electron, Species::HeliumSinglet]).unwrap();
        assert!(SourceCoupler::new(&set, 1.0).is_err());
    }
}

// ─────────────────────────────────────────────────────────────────────
// Aeronomy — Radiation Band
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Spectral band: absorbers on one shared grid plus single-ray transfer.
//!
//! The beam enters through the outer x1 face of the active block and is
//! attenuated cell by cell inward. Opacity is the sum of the absorbers'
//! coefficients; each absorber takes its κ-weighted share of the absorbed
//! energy and splits it into heat and ionization. There is no emission or
//! scattering, so the upward flux stays zero.

use crate::absorber::Absorber;
use crate::spectrum::Spectrum;
use aeronomy_types::config::{BandConfig, Direction};
use aeronomy_types::error::{AeronomyError, AeronomyResult};
use aeronomy_types::species::SpeciesSet;
use aeronomy_types::state::{BlockGeometry, IonizingEnergy, ScalarField};
use ndarray::{s, Array3};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct RadiationBand {
    name: String,
    spectrum: Spectrum,
    absorbers: Vec<Absorber>,
    /// Absorption coefficient of the current row, `[absorber, wave, i]`.
    kappa: Array3<f64>,
    /// Upward flux on x1 faces, `[k, j, ncells1 + 1]`.
    pub bflxup: Array3<f64>,
    /// Downward flux on x1 faces, `[k, j, ncells1 + 1]`.
    pub bflxdn: Array3<f64>,
    /// Net radiative power leaving each cell (W); negative where heat is
    /// deposited.
    pub dflx: Array3<f64>,
    /// Slant-path transmitted flux per outgoing direction, `[dir, k, j]`.
    pub radiance: Array3<f64>,
}

impl RadiationBand {
    pub fn new(
        name: &str,
        spectrum: Spectrum,
        absorbers: Vec<Absorber>,
        geometry: &BlockGeometry,
        noutdir: usize,
    ) -> Self {
        let (n3, n2, n1) = geometry.shape();
        RadiationBand {
            name: name.to_string(),
            kappa: Array3::zeros((absorbers.len(), spectrum.len(), n1)),
            spectrum,
            absorbers,
            bflxup: Array3::zeros((n3, n2, n1 + 1)),
            bflxdn: Array3::zeros((n3, n2, n1 + 1)),
            dflx: Array3::zeros((n3, n2, n1)),
            radiance: Array3::zeros((noutdir, n3, n2)),
        }
    }

    /// Build from configuration. Absorbers take accumulator channels
    /// `first_channel..first_channel + absorbers.len()` in order.
    pub fn from_config(
        cfg: &BandConfig,
        species: &SpeciesSet,
        geometry: &BlockGeometry,
        data_dir: &Path,
        wave_to_meters: f64,
        first_channel: usize,
        noutdir: usize,
    ) -> AeronomyResult<Self> {
        let spectrum = Spectrum::from_band_config(cfg, data_dir, wave_to_meters)?;
        let absorbers = cfg
            .absorbers
            .iter()
            .enumerate()
            .map(|(a, abs)| {
                Absorber::from_config(abs, species, &spectrum, first_channel + a, data_dir)
            })
            .collect::<AeronomyResult<Vec<_>>>()
            .map_err(|e| match e {
                AeronomyError::ConfigError(msg) => {
                    AeronomyError::ConfigError(format!("band {}: {msg}", cfg.name))
                }
                other => other,
            })?;
        Ok(Self::new(&cfg.name, spectrum, absorbers, geometry, noutdir))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spectrum(&self) -> &Spectrum {
        &self.spectrum
    }

    pub fn absorbers(&self) -> &[Absorber] {
        &self.absorbers
    }

    /// Absorption coefficient of absorber `a` at wave `n`, cell `i` of the
    /// last row passed to `set_spectral_properties`.
    pub fn kappa(&self, a: usize, n: usize, i: usize) -> f64 {
        self.kappa[[a, n, i]]
    }

    /// Evaluate every absorber's coefficient along row `(k, j)`.
    pub fn set_spectral_properties(&mut self, scalars: &ScalarField, k: usize, j: usize) {
        let n1 = self.kappa.dim().2;
        for (a, absorber) in self.absorbers.iter().enumerate() {
            let neutral = absorber.neutral();
            for n in 0..self.spectrum.len() {
                for i in 0..n1 {
                    self.kappa[[a, n, i]] =
                        absorber.absorption_coefficient(n, scalars.s[[neutral, k, j, i]]);
                }
            }
        }
    }

    fn total_kappa(&self, n: usize, i: usize) -> f64 {
        (0..self.absorbers.len()).map(|a| self.kappa[[a, n, i]]).sum()
    }

    /// Attenuate the stellar beam along row `(k, j)`.
    ///
    /// `flux_scale` multiplies the reference spectrum (distance and time
    /// dependence). Directions at or below the horizon carry no flux;
    /// the remaining ones share the beam equally. Ionization power (W) is
    /// added to `accumulator` on each absorber's channel.
    pub fn radtran_flux(
        &mut self,
        directions: &[Direction],
        flux_scale: f64,
        k: usize,
        j: usize,
        geometry: &BlockGeometry,
        accumulator: &mut IonizingEnergy,
    ) {
        self.bflxup.slice_mut(s![k, j, ..]).fill(0.0);
        self.bflxdn.slice_mut(s![k, j, ..]).fill(0.0);
        self.dflx.slice_mut(s![k, j, ..]).fill(0.0);
        if directions.is_empty() {
            return;
        }

        let nfaces = self.bflxdn.dim().2;
        let active = geometry.active1();
        let weight = 1.0 / directions.len() as f64;

        for dir in directions.iter().filter(|d| d.mu > 0.0) {
            for n in 0..self.spectrum.len() {
                let mut flux = self.spectrum.bin_flux(n) * flux_scale * dir.mu * weight;
                for face in active.end..nfaces {
                    self.bflxdn[[k, j, face]] += flux;
                }
                for i in active.clone().rev() {
                    let dx = geometry.dx1(i);
                    let kappa_tot = self.total_kappa(n, i);
                    if kappa_tot > 0.0 && flux > 0.0 {
                        let dtau = kappa_tot * dx / dir.mu;
                        let area = geometry.cell_volume(k, j, i) / dx;
                        let mut transmitted = 0.0;
                        for (a, absorber) in self.absorbers.iter().enumerate() {
                            let share = flux * self.kappa[[a, n, i]] / kappa_tot;
                            let split = absorber.energy_absorption(n, share, dtau);
                            transmitted += split.transmitted;
                            self.dflx[[k, j, i]] -= split.heat * area;
                            if split.ionization > 0.0 {
                                accumulator.add(absorber.channel(), k, j, i, split.ionization * area);
                            }
                        }
                        flux = transmitted;
                    }
                    self.bflxdn[[k, j, i]] += flux;
                }
                for face in 0..active.start {
                    self.bflxdn[[k, j, face]] += flux;
                }
            }
        }
    }

    /// Band flux transmitted along the slant path through the active
    /// column for each outgoing direction.
    pub fn radtran_radiance(
        &mut self,
        directions: &[Direction],
        flux_scale: f64,
        k: usize,
        j: usize,
        geometry: &BlockGeometry,
    ) {
        for (o, dir) in directions.iter().enumerate() {
            if dir.mu <= 0.0 {
                self.radiance[[o, k, j]] = 0.0;
                continue;
            }
            let mut total = 0.0;
            for n in 0..self.spectrum.len() {
                let tau: f64 = geometry
                    .active1()
                    .map(|i| self.total_kappa(n, i) * geometry.dx1(i))
                    .sum::<f64>()
                    / dir.mu;
                total += self.spectrum.bin_flux(n) * flux_scale * (-tau).exp();
            }
            self.radiance[[o, k, j]] = total;
        }
    }

    /// Heat deposited (W) in cell `(k, j, i)` by the last transfer.
    pub fn heating_power(&self, k: usize, j: usize, i: usize) -> f64 {
        -self.dflx[[k, j, i]]
    }
}

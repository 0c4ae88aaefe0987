// ─────────────────────────────────────────────────────────────────────
// Aeronomy — Radiation Manager
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Owns the bands of one block and drives per-row transfer.

use crate::band::RadiationBand;
use crate::orbit::OrbitalGeometry;
use crate::schedule::flux_scale;
use aeronomy_types::config::{parse_directions, AeronomyConfig, Direction, IrradiationSchedule};
use aeronomy_types::error::{AeronomyError, AeronomyResult};
use aeronomy_types::species::SpeciesSet;
use aeronomy_types::state::{
    BlockGeometry, CoordinateSystem, IonizationChannel, IonizingEnergy, ScalarField,
};
use log::{debug, info, warn};
use ndarray::{s, Array3};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct RadiationManager {
    bands: Vec<RadiationBand>,
    indir: Vec<Direction>,
    outdir: Vec<Direction>,
    distance: f64,
    reference_distance: f64,
    radiation_scaling: f64,
    schedule: IrradiationSchedule,
    orbit: Option<OrbitalGeometry>,
    channels: Vec<IonizationChannel>,
    /// Net (up − down) flux accumulated over the step on faces of each
    /// axis: x1 `[n3, n2, n1 + 1]`, x2 `[n3, n2 + 1, n1]`, x3 `[n3 + 1, n2, n1]`.
    net_flux: [Array3<f64>; 3],
}

impl RadiationManager {
    pub fn new(
        config: &AeronomyConfig,
        species: &SpeciesSet,
        geometry: &BlockGeometry,
        data_dir: &Path,
    ) -> AeronomyResult<Self> {
        let rad = &config.radiation;
        let indir = parse_directions(&rad.indir)?;
        let outdir = parse_directions(&rad.outdir)?;

        let orbit = if rad.dynamic {
            if geometry.coord != CoordinateSystem::SphericalPolar {
                return Err(AeronomyError::ConfigError(
                    "dynamic irradiation requires spherical-polar geometry".to_string(),
                ));
            }
            Some(OrbitalGeometry::from_config(&config.problem, &rad.orbit)?)
        } else {
            None
        };

        let mut bands = Vec::with_capacity(rad.bands.len());
        let mut channels = Vec::new();
        for band_cfg in &rad.bands {
            let band = RadiationBand::from_config(
                band_cfg,
                species,
                geometry,
                data_dir,
                rad.wave_to_meters,
                channels.len(),
                outdir.len(),
            )?;
            channels.extend(band.absorbers().iter().map(|a| a.ionization_channel()));
            info!(
                "radiation band '{}': {} spectral points, {} absorbers, {:.3e} W/m2 at reference distance",
                band.name(),
                band.spectrum().len(),
                band.absorbers().len(),
                band.spectrum().integrated_flux()
            );
            bands.push(band);
        }

        let (n3, n2, n1) = geometry.shape();
        Ok(RadiationManager {
            bands,
            indir,
            outdir,
            distance: rad.distance,
            reference_distance: rad.reference_distance,
            radiation_scaling: rad.radiation_scaling,
            schedule: rad.schedule,
            orbit,
            channels,
            net_flux: [
                Array3::zeros((n3, n2, n1 + 1)),
                Array3::zeros((n3, n2 + 1, n1)),
                Array3::zeros((n3 + 1, n2, n1)),
            ],
        })
    }

    pub fn bands(&self) -> &[RadiationBand] {
        &self.bands
    }

    pub fn band(&self, name: &str) -> Option<&RadiationBand> {
        self.bands.iter().find(|b| b.name() == name)
    }

    /// One accumulator channel per ionizing absorber, in band order.
    pub fn channels(&self) -> &[IonizationChannel] {
        &self.channels
    }

    pub fn nchannels(&self) -> usize {
        self.channels.len()
    }

    pub fn incoming_directions(&self) -> &[Direction] {
        &self.indir
    }

    /// Current star distance (AU).
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Incident flux multiplier at `time` for the current distance.
    pub fn flux_scale(&self, time: f64) -> f64 {
        flux_scale(
            &self.schedule,
            self.radiation_scaling,
            self.reference_distance,
            self.distance,
            time,
        )
    }

    fn update_geometry(&mut self, geometry: &BlockGeometry, time: f64, k: usize, j: usize) {
        if let Some(orbit) = &self.orbit {
            let pos = orbit.star_position(time, geometry.x2v[j], geometry.x3v[k]);
            self.indir = vec![Direction {
                mu: pos.mu,
                phi: pos.phi,
            }];
            self.distance = pos.distance;
        }
    }

    /// Transfer along row `(k, j)` for every band and add the band net
    /// flux to the x1 accumulator.
    pub fn calculate_fluxes(
        &mut self,
        scalars: &ScalarField,
        geometry: &BlockGeometry,
        time: f64,
        k: usize,
        j: usize,
        accumulator: &mut IonizingEnergy,
    ) {
        if self.bands.is_empty() {
            return;
        }
        self.update_geometry(geometry, time, k, j);
        if self.indir.iter().all(|d| d.mu <= 0.0) && self.orbit.is_none() {
            warn!("all incoming directions are at or below the horizon, no stellar flux");
        }
        let scale = self.flux_scale(time);

        for band in &mut self.bands {
            band.set_spectral_properties(scalars, k, j);
            band.radtran_flux(&self.indir, scale, k, j, geometry, accumulator);
        }
        self.calculate_net_flux(k, j);
    }

    /// Slant-path transmitted band flux for every outgoing direction.
    pub fn calculate_radiances(
        &mut self,
        scalars: &ScalarField,
        geometry: &BlockGeometry,
        time: f64,
        k: usize,
        j: usize,
    ) {
        self.update_geometry(geometry, time, k, j);
        let scale = self.flux_scale(time);
        for band in &mut self.bands {
            band.set_spectral_properties(scalars, k, j);
            band.radtran_radiance(&self.outdir, scale, k, j, geometry);
        }
    }

    fn calculate_net_flux(&mut self, k: usize, j: usize) {
        let mut row = self.net_flux[0].slice_mut(s![k, j, ..]);
        for band in &self.bands {
            let up = band.bflxup.slice(s![k, j, ..]);
            let dn = band.bflxdn.slice(s![k, j, ..]);
            row += &(&up - &dn);
        }
    }

    /// Net flux accumulator for `axis` (0, 1 or 2).
    pub fn net_flux(&self, axis: usize) -> &Array3<f64> {
        &self.net_flux[axis]
    }

    /// Zero all net flux accumulators; once per full timestep.
    pub fn clear_flux(&mut self) {
        for flux in &mut self.net_flux {
            flux.fill(0.0);
        }
    }

    /// Apply the radiative heating of every band to the energy update:
    /// `energy -= dt * dflx / vol` over the active cells.
    pub fn add_radiation_source_term(
        &self,
        dt: f64,
        energy: &mut Array3<f64>,
        geometry: &BlockGeometry,
    ) {
        for band in &self.bands {
            for k in geometry.active3() {
                for j in geometry.active2() {
                    for i in geometry.active1() {
                        energy[[k, j, i]] -= dt * band.dflx[[k, j, i]] / geometry.cell_volume(k, j, i);
                    }
                }
            }
        }
        debug!("radiation source term applied for dt = {dt:.3e} s");
    }

    /// Radiative heating rate (W/m³) summed over bands.
    pub fn radiative_heating(&self, geometry: &BlockGeometry) -> Array3<f64> {
        let mut heating = Array3::zeros(geometry.shape());
        for band in &self.bands {
            for k in geometry.active3() {
                for j in geometry.active2() {
                    for i in geometry.active1() {
                        heating[[k, j, i]] +=
                            band.heating_power(k, j, i) / geometry.cell_volume(k, j, i);
                    }
                }
            }
        }
        heating
    }
}

// ─────────────────────────────────────────────────────────────────────
// Aeronomy — Spectrum
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Spectral grid shared by all absorbers of a band.

use aeronomy_math::table::DataTable;
use aeronomy_types::config::BandConfig;
use aeronomy_types::constants::{PLANCK, SPEED_OF_LIGHT};
use aeronomy_types::error::{AeronomyError, AeronomyResult};
use std::path::Path;

/// One spectral sample. `wave` is in configured units, `weight` is the
/// bin width in the same units and `flux` the spectral flux density at the
/// reference distance (W m⁻² per wave unit).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumPoint {
    pub wave: f64,
    pub weight: f64,
    pub flux: f64,
}

#[derive(Debug, Clone)]
pub struct Spectrum {
    points: Vec<SpectrumPoint>,
    wave_to_meters: f64,
}

impl Spectrum {
    pub fn new(points: Vec<SpectrumPoint>, wave_to_meters: f64) -> AeronomyResult<Self> {
        if points.is_empty() {
            return Err(AeronomyError::ConfigError(
                "spectrum must contain at least one point".to_string(),
            ));
        }
        if !wave_to_meters.is_finite() || wave_to_meters <= 0.0 {
            return Err(AeronomyError::ConfigError(format!(
                "wave_to_meters must be finite and > 0, got {wave_to_meters}"
            )));
        }
        for (n, p) in points.iter().enumerate() {
            if !p.wave.is_finite() || p.wave <= 0.0 {
                return Err(AeronomyError::ConfigError(format!(
                    "spectrum point {n}: wave must be finite and > 0, got {}",
                    p.wave
                )));
            }
            if !p.weight.is_finite() || p.weight < 0.0 || !p.flux.is_finite() || p.flux < 0.0 {
                return Err(AeronomyError::ConfigError(format!(
                    "spectrum point {n}: weight and flux must be finite and >= 0"
                )));
            }
        }
        Ok(Spectrum {
            points,
            wave_to_meters,
        })
    }

    /// Columns `wave weight flux`.
    pub fn from_table(table: &DataTable, wave_to_meters: f64) -> AeronomyResult<Self> {
        let (wave, weight, flux) = (table.column(0)?, table.column(1)?, table.column(2)?);
        let points = (0..table.nrows())
            .map(|n| SpectrumPoint {
                wave: wave[n],
                weight: weight[n],
                flux: flux[n],
            })
            .collect();
        Self::new(points, wave_to_meters)
    }

    /// A `spectrum_file` takes precedence over inline samples and is
    /// resolved against `data_dir` when relative.
    pub fn from_band_config(
        band: &BandConfig,
        data_dir: &Path,
        wave_to_meters: f64,
    ) -> AeronomyResult<Self> {
        match &band.spectrum_file {
            Some(file) => {
                let table = DataTable::from_file(data_dir.join(file))?;
                Self::from_table(&table, wave_to_meters)
            }
            None => {
                let points = band
                    .spectrum
                    .iter()
                    .map(|&[wave, weight, flux]| SpectrumPoint { wave, weight, flux })
                    .collect();
                Self::new(points, wave_to_meters)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[SpectrumPoint] {
        &self.points
    }

    pub fn point(&self, n: usize) -> &SpectrumPoint {
        &self.points[n]
    }

    pub fn wave_to_meters(&self) -> f64 {
        self.wave_to_meters
    }

    /// Wavelength of point `n` in metres.
    pub fn wavelength_m(&self, n: usize) -> f64 {
        self.points[n].wave * self.wave_to_meters
    }

    pub fn frequency(&self, n: usize) -> f64 {
        SPEED_OF_LIGHT / self.wavelength_m(n)
    }

    /// Photon energy (J) at point `n`.
    pub fn photon_energy(&self, n: usize) -> f64 {
        PLANCK * self.frequency(n)
    }

    /// Energy flux (W/m²) carried by bin `n` at the reference distance.
    pub fn bin_flux(&self, n: usize) -> f64 {
        self.points[n].flux * self.points[n].weight
    }

    /// Band-integrated flux at the reference distance.
    pub fn integrated_flux(&self) -> f64 {
        (0..self.len()).map(|n| self.bin_flux(n)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrated_flux() {
        let s = Spectrum::new(
            vec![
                SpectrumPoint { wave: 50.0, weight: 2.0, flux: 1.0 },
                SpectrumPoint { wave: 60.0, weight: 3.0, flux: 0.5 },
            ],
            1.0e-9,
        )
        .unwrap();
        assert!((s.integrated_flux() - 3.5).abs() < 1e-12);
        assert!((s.wavelength_m(1) - 6.0e-8).abs() < 1e-20);
    }

    #[test]
    fn test_photon_energy_at_lyman_limit() {
        let s = Spectrum::new(
            vec![SpectrumPoint { wave: 91.1267, weight: 1.0, flux: 1.0 }],
            1.0e-9,
        )
        .unwrap();
        let e = s.photon_energy(0);
        let rydberg = aeronomy_types::constants::RYDBERG_ENERGY;
        assert!((e - rydberg).abs() / rydberg < 1e-3, "E = {e}");
    }

    #[test]
    fn test_rejects_invalid_points() {
        assert!(Spectrum::new(Vec::new(), 1.0).is_err());
        let bad = vec![SpectrumPoint { wave: -1.0, weight: 1.0, flux: 1.0 }];
        assert!(Spectrum::new(bad, 1.0).is_err());
        let neg_flux = vec![SpectrumPoint { wave: 1.0, weight: 1.0, flux: -1.0 }];
        assert!(Spectrum::new(neg_flux, 1.0).is_err());
    }
}

// ─────────────────────────────────────────────────────────────────────
// Aeronomy — Diagnostics
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use aeronomy_types::state::BlockGeometry;
use ndarray::{Array3, Array4};

/// Per-cell fields refreshed by every source-term pass.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    /// Gas temperature (K).
    pub temperature: Array3<f64>,
    /// Event rate per reaction `[nreactions, n3, n2, n1]` (m⁻³ s⁻¹).
    pub reaction_rate: Array4<f64>,
    /// Heating (> 0) or cooling (< 0) per reaction (W/m³).
    pub reaction_energy_rate: Array4<f64>,
    /// Direct photon heating summed over bands (W/m³).
    pub radiative_heating: Array3<f64>,
    /// Total energy-density change of the last pass (J/m³).
    pub net_energy: Array3<f64>,
}

impl Diagnostics {
    pub fn new(nreactions: usize, geometry: &BlockGeometry) -> Self {
        let (n3, n2, n1) = geometry.shape();
        Diagnostics {
            temperature: Array3::zeros((n3, n2, n1)),
            reaction_rate: Array4::zeros((nreactions, n3, n2, n1)),
            reaction_energy_rate: Array4::zeros((nreactions, n3, n2, n1)),
            radiative_heating: Array3::zeros((n3, n2, n1)),
            net_energy: Array3::zeros((n3, n2, n1)),
        }
    }

    pub fn nreactions(&self) -> usize {
        self.reaction_rate.dim().0
    }

    /// Domain-integrated heating (W) over the active cells.
    pub fn total_radiative_power(&self, geometry: &BlockGeometry) -> f64 {
        let mut total = 0.0;
        for k in geometry.active3() {
            for j in geometry.active2() {
                for i in geometry.active1() {
                    total += self.radiative_heating[[k, j, i]] * geometry.cell_volume(k, j, i);
                }
            }
        }
        total
    }
}

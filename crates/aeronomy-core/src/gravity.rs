// ─────────────────────────────────────────────────────────────────────
// Aeronomy — Gravity
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Planet + star + centrifugal acceleration in the planet frame.
//!
//! Planet at the origin, star at (a, 0, 0):
//!   g = −G Mp / r³ · r⃗ + s · (G Ms / r_s³ − G Ms / a³) · (a⃗ − r⃗)
//! with `s` the configurable tidal sign. The planet term is softened by
//! clamping r to the softening radius.

use aeronomy_types::config::ProblemParams;
use aeronomy_types::state::{BlockGeometry, CoordinateSystem};
use ndarray::Array3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityField {
    gm_planet: f64,
    gm_star: f64,
    semi_major_axis: f64,
    softening: f64,
    tidal_sign: f64,
}

impl GravityField {
    pub fn new(problem: &ProblemParams) -> Self {
        GravityField {
            gm_planet: problem.g * problem.mp,
            gm_star: problem.g * problem.ms,
            semi_major_axis: problem.semi_major_axis(),
            softening: problem.softening_rp * problem.rp,
            tidal_sign: problem.tidal_sign,
        }
    }

    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    /// Acceleration (m/s²) at cartesian position (x, y, z).
    pub fn at(&self, x: f64, y: f64, z: f64) -> [f64; 3] {
        let a = self.semi_major_axis;
        let r = (x * x + y * y + z * z).sqrt().max(self.softening);
        let rs = ((a - x) * (a - x) + y * y + z * z).sqrt();

        let gp = self.gm_planet / r.powi(3);
        let tidal = self.tidal_sign * (self.gm_star / rs.powi(3) - self.gm_star / a.powi(3));
        [
            gp * (-x) + tidal * (a - x),
            gp * (-y) + tidal * (-y),
            gp * (-z) + tidal * (-z),
        ]
    }

    /// Acceleration along the substellar line at radius `r`; the radial
    /// component used for spherical-polar blocks.
    pub fn radial(&self, r: f64) -> f64 {
        self.at(r, 0.0, 0.0)[0]
    }

    /// Field components `[g1, g2, g3]` on every cell of the block.
    pub fn field(&self, geometry: &BlockGeometry) -> [Array3<f64>; 3] {
        let shape = geometry.shape();
        let mut g = [
            Array3::zeros(shape),
            Array3::zeros(shape),
            Array3::zeros(shape),
        ];
        for k in geometry.all3() {
            for j in geometry.all2() {
                for i in geometry.all1() {
                    match geometry.coord {
                        CoordinateSystem::Cartesian => {
                            let acc =
                                self.at(geometry.x1v[i], geometry.x2v[j], geometry.x3v[k]);
                            for (axis, value) in acc.into_iter().enumerate() {
                                g[axis][[k, j, i]] = value;
                            }
                        }
                        CoordinateSystem::SphericalPolar => {
                            g[0][[k, j, i]] = self.radial(geometry.x1v[i]);
                        }
                    }
                }
            }
        }
        g
    }
}

// ─────────────────────────────────────────────────────────────────────
// Aeronomy — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::error::{AeronomyError, AeronomyResult};
use ndarray::{Array1, Array3, Array4};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Default ghost-cell margin on each side of an active axis.
pub const NGHOST: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSystem {
    Cartesian,
    /// x1 = r, x2 = polar angle θ, x3 = azimuth φ.
    SphericalPolar,
}

/// Uniform mesh block with ghost margin.
///
/// Arrays are indexed `[k, j, i]` (x3, x2, x1). Axes with a single active
/// cell carry no ghost margin, so a 1D radial block is `[1, 1, nx1 + 2g]`.
#[derive(Debug, Clone)]
pub struct BlockGeometry {
    pub coord: CoordinateSystem,
    pub nx: [usize; 3],
    pub nghost: usize,
    pub ncells: [usize; 3],
    pub x1f: Array1<f64>, // faces [ncells1 + 1]
    pub x2f: Array1<f64>,
    pub x3f: Array1<f64>,
    pub x1v: Array1<f64>, // centres [ncells1]
    pub x2v: Array1<f64>,
    pub x3v: Array1<f64>,
}

fn axis_faces(n_active: usize, ghost: usize, min: f64, max: f64) -> Array1<f64> {
    let dx = (max - min) / n_active as f64;
    let n = n_active + 2 * ghost;
    Array1::from_shape_fn(n + 1, |f| min + (f as f64 - ghost as f64) * dx)
}

fn axis_centres(faces: &Array1<f64>) -> Array1<f64> {
    Array1::from_shape_fn(faces.len() - 1, |i| 0.5 * (faces[i] + faces[i + 1]))
}

impl BlockGeometry {
    /// Build a uniform block from active cell counts and axis bounds.
    pub fn new(
        coord: CoordinateSystem,
        nx: [usize; 3],
        bounds: [(f64, f64); 3],
        nghost: usize,
    ) -> AeronomyResult<Self> {
        for (axis, (&n, &(lo, hi))) in nx.iter().zip(bounds.iter()).enumerate() {
            if n == 0 {
                return Err(AeronomyError::ConfigError(format!(
                    "axis x{} must have at least one cell",
                    axis + 1
                )));
            }
            if !lo.is_finite() || !hi.is_finite() || hi <= lo {
                return Err(AeronomyError::ConfigError(format!(
                    "axis x{} bounds must be finite with max > min, got ({lo}, {hi})",
                    axis + 1
                )));
            }
        }
        let ghost = |n: usize| if n > 1 { nghost } else { 0 };
        let g1 = nghost;
        let dx1 = (bounds[0].1 - bounds[0].0) / nx[0] as f64;
        if coord == CoordinateSystem::SphericalPolar && bounds[0].0 - g1 as f64 * dx1 <= 0.0 {
            return Err(AeronomyError::ConfigError(format!(
                "spherical x1 ghost faces must stay at r > 0, inner face {}",
                bounds[0].0 - g1 as f64 * dx1
            )));
        }

        let x1f = axis_faces(nx[0], g1, bounds[0].0, bounds[0].1);
        let x2f = axis_faces(nx[1], ghost(nx[1]), bounds[1].0, bounds[1].1);
        let x3f = axis_faces(nx[2], ghost(nx[2]), bounds[2].0, bounds[2].1);
        let ncells = [x1f.len() - 1, x2f.len() - 1, x3f.len() - 1];

        Ok(BlockGeometry {
            coord,
            nx,
            nghost,
            ncells,
            x1v: axis_centres(&x1f),
            x2v: axis_centres(&x2f),
            x3v: axis_centres(&x3f),
            x1f,
            x2f,
            x3f,
        })
    }

    /// One-dimensional spherical block spanning `[r_min, r_max]`.
    pub fn radial(nx1: usize, r_min: f64, r_max: f64) -> AeronomyResult<Self> {
        Self::new(
            CoordinateSystem::SphericalPolar,
            [nx1, 1, 1],
            [
                (r_min, r_max),
                (0.0, std::f64::consts::PI),
                (0.0, 2.0 * std::f64::consts::PI),
            ],
            NGHOST,
        )
    }

    /// Array shape `(ncells3, ncells2, ncells1)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.ncells[2], self.ncells[1], self.ncells[0])
    }

    fn active(&self, axis: usize) -> Range<usize> {
        if self.nx[axis] > 1 || axis == 0 {
            self.nghost..self.nghost + self.nx[axis]
        } else {
            0..1
        }
    }

    pub fn active1(&self) -> Range<usize> {
        self.active(0)
    }

    pub fn active2(&self) -> Range<usize> {
        self.active(1)
    }

    pub fn active3(&self) -> Range<usize> {
        self.active(2)
    }

    /// All x1 cells including ghosts.
    pub fn all1(&self) -> Range<usize> {
        0..self.ncells[0]
    }

    pub fn all2(&self) -> Range<usize> {
        0..self.ncells[1]
    }

    pub fn all3(&self) -> Range<usize> {
        0..self.ncells[2]
    }

    pub fn dx1(&self, i: usize) -> f64 {
        self.x1f[i + 1] - self.x1f[i]
    }

    pub fn cell_volume(&self, k: usize, j: usize, i: usize) -> f64 {
        match self.coord {
            CoordinateSystem::Cartesian => {
                self.dx1(i) * (self.x2f[j + 1] - self.x2f[j]) * (self.x3f[k + 1] - self.x3f[k])
            }
            CoordinateSystem::SphericalPolar => {
                let (r0, r1) = (self.x1f[i], self.x1f[i + 1]);
                (r1.powi(3) - r0.powi(3)) / 3.0
                    * (self.x2f[j].cos() - self.x2f[j + 1].cos())
                    * (self.x3f[k + 1] - self.x3f[k])
            }
        }
    }

    /// Distance of the cell centre from the planet centre.
    pub fn radius(&self, k: usize, j: usize, i: usize) -> f64 {
        match self.coord {
            CoordinateSystem::Cartesian => {
                let (x, y, z) = (self.x1v[i], self.x2v[j], self.x3v[k]);
                (x * x + y * y + z * z).sqrt()
            }
            CoordinateSystem::SphericalPolar => self.x1v[i],
        }
    }
}

/// Primitive hydrodynamic variables, each `[ncells3, ncells2, ncells1]`.
#[derive(Debug, Clone)]
pub struct Primitives {
    pub density: Array3<f64>,
    pub pressure: Array3<f64>,
    pub v1: Array3<f64>,
    pub v2: Array3<f64>,
    pub v3: Array3<f64>,
}

impl Primitives {
    pub fn zeros(geometry: &BlockGeometry) -> Self {
        let shape = geometry.shape();
        Primitives {
            density: Array3::zeros(shape),
            pressure: Array3::zeros(shape),
            v1: Array3::zeros(shape),
            v2: Array3::zeros(shape),
            v3: Array3::zeros(shape),
        }
    }
}

/// Conserved hydrodynamic variables (or their per-stage deltas).
#[derive(Debug, Clone)]
pub struct Conserved {
    pub density: Array3<f64>,
    pub mom1: Array3<f64>,
    pub mom2: Array3<f64>,
    pub mom3: Array3<f64>,
    pub energy: Array3<f64>,
}

impl Conserved {
    pub fn zeros(geometry: &BlockGeometry) -> Self {
        let shape = geometry.shape();
        Conserved {
            density: Array3::zeros(shape),
            mom1: Array3::zeros(shape),
            mom2: Array3::zeros(shape),
            mom3: Array3::zeros(shape),
            energy: Array3::zeros(shape),
        }
    }
}

/// Passive scalars: mass densities `s` and mass fractions `r`,
/// each `[nspecies, ncells3, ncells2, ncells1]`.
#[derive(Debug, Clone)]
pub struct ScalarField {
    pub s: Array4<f64>,
    pub r: Array4<f64>,
}

impl ScalarField {
    pub fn zeros(nspecies: usize, geometry: &BlockGeometry) -> Self {
        let (n3, n2, n1) = geometry.shape();
        ScalarField {
            s: Array4::zeros((nspecies, n3, n2, n1)),
            r: Array4::zeros((nspecies, n3, n2, n1)),
        }
    }

    pub fn nspecies(&self) -> usize {
        self.s.dim().0
    }
}

/// Ionizing-energy accumulator: power (W) captured per photoionization
/// channel and cell since the last clear. Written by transfer, drained by
/// the source-term coupler.
#[derive(Debug, Clone)]
pub struct IonizingEnergy {
    data: Array4<f64>,
}

impl IonizingEnergy {
    pub fn new(nchannels: usize, geometry: &BlockGeometry) -> Self {
        let (n3, n2, n1) = geometry.shape();
        IonizingEnergy {
            data: Array4::zeros((nchannels, n3, n2, n1)),
        }
    }

    pub fn nchannels(&self) -> usize {
        self.data.dim().0
    }

    pub fn add(&mut self, channel: usize, k: usize, j: usize, i: usize, power: f64) {
        self.data[[channel, k, j, i]] += power;
    }

    pub fn get(&self, channel: usize, k: usize, j: usize, i: usize) -> f64 {
        self.data[[channel, k, j, i]]
    }

    pub fn clear(&mut self) {
        self.data.fill(0.0);
    }

    pub fn is_clear(&self) -> bool {
        self.data.iter().all(|&v| v == 0.0)
    }
}

/// Photoionization channel of the accumulator: which neutral species the
/// captured power ionizes, into which ion, at what energy per event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IonizationChannel {
    pub neutral: usize,
    pub ion: usize,
    /// J per ionization event.
    pub ionization_energy: f64,
}

/// Simulation clock handed to every per-step operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepInfo {
    pub time: f64,
    pub dt: f64,
    pub cycle: u64,
}

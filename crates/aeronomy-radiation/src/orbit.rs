// ─────────────────────────────────────────────────────────────────────
// Aeronomy — Orbital Geometry
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Star distance and zenith angle from a Keplerian orbit.
//!
//! Used in dynamic irradiation mode. The sub-stellar latitude follows the
//! obliquity over the orbit; the sub-stellar longitude is the true anomaly
//! minus the planet's rotation angle, so a tidally locked planet keeps the
//! star fixed at longitude 0.

use aeronomy_types::config::{OrbitParams, ProblemParams};
use aeronomy_types::constants::{AU, SECONDS_PER_DAY};
use aeronomy_types::error::{AeronomyError, AeronomyResult};
use std::f64::consts::PI;

const KEPLER_TOL: f64 = 1e-12;
const KEPLER_MAX_ITER: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalGeometry {
    /// Semi-major axis (AU).
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    /// Orbital period (s).
    pub period: f64,
    /// Rotation period (s).
    pub rotation_period: f64,
    pub obliquity: f64,
    pub periastron_time: f64,
}

/// Position of the star as seen from one point on the planet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarPosition {
    /// Cosine of the stellar zenith angle.
    pub mu: f64,
    /// Azimuth of the star (rad), measured from local north towards east.
    pub phi: f64,
    /// Star distance (AU).
    pub distance: f64,
}

impl OrbitalGeometry {
    pub fn from_config(problem: &ProblemParams, orbit: &OrbitParams) -> AeronomyResult<Self> {
        if !(0.0..1.0).contains(&orbit.eccentricity) {
            return Err(AeronomyError::ConfigError(format!(
                "eccentricity must be in [0, 1), got {}",
                orbit.eccentricity
            )));
        }
        let period = problem.period * SECONDS_PER_DAY;
        let rotation_period = orbit
            .rotation_period
            .map_or(period, |days| days * SECONDS_PER_DAY);
        Ok(OrbitalGeometry {
            semi_major_axis: problem.semi_major_axis() / AU,
            eccentricity: orbit.eccentricity,
            period,
            rotation_period,
            obliquity: orbit.obliquity_deg.to_radians(),
            periastron_time: orbit.periastron_time,
        })
    }

    /// Eccentric anomaly at `time` (Newton iteration on Kepler's equation).
    pub fn eccentric_anomaly(&self, time: f64) -> f64 {
        let e = self.eccentricity;
        let mean = (2.0 * PI * (time - self.periastron_time) / self.period).rem_euclid(2.0 * PI);
        let mut ecc = if e > 0.8 { PI } else { mean };
        for _ in 0..KEPLER_MAX_ITER {
            let f = ecc - e * ecc.sin() - mean;
            let step = f / (1.0 - e * ecc.cos());
            ecc -= step;
            if step.abs() < KEPLER_TOL {
                break;
            }
        }
        ecc
    }

    pub fn true_anomaly(&self, time: f64) -> f64 {
        let e = self.eccentricity;
        let ecc = self.eccentric_anomaly(time);
        2.0 * ((1.0 + e).sqrt() * (0.5 * ecc).sin()).atan2((1.0 - e).sqrt() * (0.5 * ecc).cos())
    }

    /// Star distance (AU) at `time`.
    pub fn distance_au(&self, time: f64) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity * self.eccentric_anomaly(time).cos())
    }

    /// Star position seen from colatitude `theta` and longitude `lon` (rad).
    pub fn star_position(&self, time: f64, theta: f64, lon: f64) -> StarPosition {
        let nu = self.true_anomaly(time);
        let decl = (self.obliquity.sin() * nu.sin()).asin();
        let rotation = 2.0 * PI * (time - self.periastron_time) / self.rotation_period;
        let sub_lon = nu - rotation;

        let lat = 0.5 * PI - theta;
        let hour = lon - sub_lon;
        let mu = lat.sin() * decl.sin() + lat.cos() * decl.cos() * hour.cos();
        let east = -decl.cos() * hour.sin();
        let north = decl.sin() * lat.cos() - decl.cos() * lat.sin() * hour.cos();
        StarPosition {
            mu: mu.clamp(-1.0, 1.0),
            phi: east.atan2(north),
            distance: self.distance_au(time),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// Aeronomy — Interp
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Monotone piecewise-cubic Hermite interpolation (Fritsch–Carlson).
//!
//! Node slopes are the weighted harmonic mean of adjacent secants and are
//! zero at local extrema, so the interpolant never overshoots the data and
//! is monotone on every interval where the table is monotone. Queries
//! outside the table return `TableRange`; there is no extrapolation.

use aeronomy_types::error::{AeronomyError, AeronomyResult};
use ndarray::Array1;

#[derive(Debug, Clone)]
pub struct MonotoneSpline {
    x: Array1<f64>,
    y: Array1<f64>,
    slope: Array1<f64>,
}

/// Index of the interval `[x[i], x[i+1]]` containing `xq`.
///
/// `x` must be strictly ascending with at least two entries and `xq`
/// inside `[x[0], x[n-1]]`.
pub fn locate(x: &[f64], xq: f64) -> usize {
    let n = x.len();
    let upper = x.partition_point(|&v| v <= xq);
    upper.saturating_sub(1).min(n - 2)
}

impl MonotoneSpline {
    /// Build from strictly ascending abscissae.
    ///
    /// `source_name` identifies the table in error messages.
    pub fn new(x: Vec<f64>, y: Vec<f64>, source_name: &str) -> AeronomyResult<Self> {
        if x.len() != y.len() {
            return Err(AeronomyError::ConfigError(format!(
                "{source_name}: abscissa and ordinate lengths differ ({} vs {})",
                x.len(),
                y.len()
            )));
        }
        if x.len() < 2 {
            return Err(AeronomyError::ConfigError(format!(
                "{source_name}: interpolation needs at least 2 points, got {}",
                x.len()
            )));
        }
        if let Some(bad) = x.iter().chain(y.iter()).find(|v| !v.is_finite()) {
            return Err(AeronomyError::ConfigError(format!(
                "{source_name}: table contains non-finite value {bad}"
            )));
        }
        if let Some(index) = (1..x.len()).find(|&i| x[i] <= x[i - 1]) {
            return Err(AeronomyError::TableOrder {
                source_name: source_name.to_string(),
                index,
            });
        }

        let n = x.len();
        let h: Vec<f64> = (0..n - 1).map(|k| x[k + 1] - x[k]).collect();
        let delta: Vec<f64> = (0..n - 1).map(|k| (y[k + 1] - y[k]) / h[k]).collect();

        let mut slope = Array1::zeros(n);
        slope[0] = delta[0];
        slope[n - 1] = delta[n - 2];
        for k in 1..n - 1 {
            let (d0, d1) = (delta[k - 1], delta[k]);
            if d0 * d1 <= 0.0 {
                slope[k] = 0.0;
            } else {
                let w1 = 2.0 * h[k] + h[k - 1];
                let w2 = h[k] + 2.0 * h[k - 1];
                slope[k] = (w1 + w2) / (w1 / d0 + w2 / d1);
            }
        }

        Ok(MonotoneSpline {
            x: Array1::from(x),
            y: Array1::from(y),
            slope,
        })
    }

    pub fn x_min(&self) -> f64 {
        self.x[0]
    }

    pub fn x_max(&self) -> f64 {
        self.x[self.x.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn contains(&self, xq: f64) -> bool {
        xq >= self.x_min() && xq <= self.x_max()
    }

    /// Interpolated value at `xq`, or `TableRange` outside the table.
    pub fn eval(&self, xq: f64) -> AeronomyResult<f64> {
        if !self.contains(xq) {
            return Err(AeronomyError::TableRange {
                value: xq,
                min: self.x_min(),
                max: self.x_max(),
            });
        }
        let xs = self
            .x
            .as_slice()
            .ok_or_else(|| AeronomyError::PhysicsViolation("non-contiguous table".to_string()))?;
        let k = locate(xs, xq);
        let h = self.x[k + 1] - self.x[k];
        let t = (xq - self.x[k]) / h;
        let t2 = t * t;
        let t3 = t2 * t;

        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;

        Ok(h00 * self.y[k]
            + h10 * h * self.slope[k]
            + h01 * self.y[k + 1]
            + h11 * h * self.slope[k + 1])
    }
}

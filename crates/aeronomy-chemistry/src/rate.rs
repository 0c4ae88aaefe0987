// ─────────────────────────────────────────────────────────────────────
// Aeronomy — Rate Laws
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Temperature-dependent rate coefficients.
//!
//! Published fits are power laws with an optional Arrhenius factor:
//!   k(T) = C · (T / T_ref)^n · exp(−T_act / T)
//! Tabulated rates use the monotone spline with no extrapolation.

use aeronomy_math::interp::MonotoneSpline;
use aeronomy_types::error::{AeronomyError, AeronomyResult};

/// Case-B hydrogen recombination coefficient at 10⁴ K (m³/s).
pub const CASE_B_COEFF: f64 = 2.59e-19;

/// Temperature exponent of the case-B fit.
pub const CASE_B_EXPONENT: f64 = -0.7;

/// Recombination cooling coefficient (m³/s, multiplied by kT).
pub const RECOMBINATION_COOLING_COEFF: f64 = 6.11e-16;

/// Temperature exponent of recombination cooling.
pub const RECOMBINATION_COOLING_EXPONENT: f64 = -0.89;

/// Lyman-α collisional excitation cooling coefficient (W m³).
pub const LYA_COOLING_COEFF: f64 = 7.5e-32;

/// Lyman-α excitation temperature (K).
pub const LYA_COOLING_TEMPERATURE: f64 = 118_348.0;

/// He⁺ + H → He + H⁺ charge exchange at 300 K (m³/s).
pub const HE_H_CX_COEFF: f64 = 1.25e-21;

/// H⁺ + He(2³S) → H + He⁺ charge exchange at 300 K (m³/s).
pub const H_HE3_CX_COEFF: f64 = 1.75e-17;

/// Activation temperature of H⁺ + He(2³S) charge exchange (K).
pub const H_HE3_CX_ACTIVATION: f64 = 128_000.0;

/// He(2³S) + H collisional quenching (m³/s).
pub const HE3_H_QUENCH_COEFF: f64 = 5.0e-16;

#[derive(Debug, Clone)]
pub enum RateLaw {
    PowerLaw {
        coeff: f64,
        t_ref: f64,
        exponent: f64,
        activation: f64,
    },
    Table(MonotoneSpline),
}

impl RateLaw {
    pub fn power_law(coeff: f64, t_ref: f64, exponent: f64) -> Self {
        RateLaw::PowerLaw {
            coeff,
            t_ref,
            exponent,
            activation: 0.0,
        }
    }

    pub fn constant(coeff: f64) -> Self {
        Self::power_law(coeff, 1.0, 0.0)
    }

    /// α = 2.59e-19 (T/10⁴)^-0.7 m³/s
    pub fn case_b_recombination() -> Self {
        Self::power_law(CASE_B_COEFF, 1.0e4, CASE_B_EXPONENT)
    }

    pub fn recombination_cooling() -> Self {
        Self::power_law(RECOMBINATION_COOLING_COEFF, 1.0, RECOMBINATION_COOLING_EXPONENT)
    }

    pub fn lyman_alpha_cooling() -> Self {
        RateLaw::PowerLaw {
            coeff: LYA_COOLING_COEFF,
            t_ref: 1.0,
            exponent: 0.0,
            activation: LYA_COOLING_TEMPERATURE,
        }
    }

    pub fn he_h_charge_exchange() -> Self {
        Self::power_law(HE_H_CX_COEFF, 300.0, 0.25)
    }

    pub fn h_he_triplet_charge_exchange() -> Self {
        RateLaw::PowerLaw {
            coeff: H_HE3_CX_COEFF,
            t_ref: 300.0,
            exponent: 0.75,
            activation: H_HE3_CX_ACTIVATION,
        }
    }

    pub fn he_triplet_h_quenching() -> Self {
        Self::constant(HE3_H_QUENCH_COEFF)
    }

    /// Rate coefficient at temperature `t` (K).
    pub fn eval(&self, t: f64) -> AeronomyResult<f64> {
        if !t.is_finite() || t <= 0.0 {
            return Err(AeronomyError::PhysicsViolation(format!(
                "rate law evaluated at non-physical temperature {t}"
            )));
        }
        match self {
            RateLaw::PowerLaw {
                coeff,
                t_ref,
                exponent,
                activation,
            } => {
                let mut k = coeff * (t / t_ref).powf(*exponent);
                if *activation > 0.0 {
                    k *= (-activation / t).exp();
                }
                Ok(k)
            }
            RateLaw::Table(spline) => Ok(spline.eval(t)?.max(0.0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_b_reference_point() {
        let alpha = RateLaw::case_b_recombination();
        assert!((alpha.eval(1.0e4).unwrap() - 2.59e-19).abs() < 1e-30);
        let cold = alpha.eval(5.0e3).unwrap();
        let expected = 2.59e-19 * 0.5f64.powf(-0.7);
        assert!((cold - expected).abs() / expected < 1e-12);
    }

    #[test]
    fn test_lya_cooling_suppressed_when_cold() {
        let law = RateLaw::lyman_alpha_cooling();
        let cold = law.eval(1.0e3).unwrap();
        let warm = law.eval(1.0e4).unwrap();
        assert!(cold < 1e-80);
        let expected = 7.5e-32 * (-11.8348f64).exp();
        assert!((warm - expected).abs() / expected < 1e-12);
    }

    #[test]
    fn test_charge_exchange_at_300k() {
        assert!((RateLaw::he_h_charge_exchange().eval(300.0).unwrap() - 1.25e-21).abs() < 1e-33);
        let h_he3 = RateLaw::h_he_triplet_charge_exchange().eval(300.0).unwrap();
        assert!(h_he3 < 1e-100);
    }

    #[test]
    fn test_table_rate_out_of_range() {
        let spline =
            MonotoneSpline::new(vec![1.0e3, 1.0e4], vec![1.0e-20, 2.0e-20], "rates").unwrap();
        let law = RateLaw::Table(spline);
        assert!(law.eval(5.0e3).is_ok());
        assert!(matches!(law.eval(2.0e4), Err(AeronomyError::TableRange { .. })));
    }

    #[test]
    fn test_non_physical_temperature() {
        assert!(RateLaw::constant(1.0).eval(0.0).is_err());
        assert!(RateLaw::constant(1.0).eval(f64::NAN).is_err());
    }
}

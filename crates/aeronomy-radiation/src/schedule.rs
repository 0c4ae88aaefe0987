// ─────────────────────────────────────────────────────────────────────
// Aeronomy — Irradiation Schedule
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use aeronomy_math::special::erf;
use aeronomy_types::config::IrradiationSchedule;

/// Multiplicative time dependence of the stellar flux.
pub fn time_factor(schedule: &IrradiationSchedule, time: f64) -> f64 {
    match *schedule {
        IrradiationSchedule::Constant => 1.0,
        IrradiationSchedule::ErfRamp {
            amplitude,
            time_scale,
            offset,
            base,
        } => amplitude * erf(time / time_scale - offset) + base,
        IrradiationSchedule::TanhRamp { time_scale, offset } => {
            0.5 * ((time / time_scale - offset).tanh() + 1.0)
        }
    }
}

/// Incident flux scale: `scaling · (reference / distance)² · time factor`.
pub fn flux_scale(
    schedule: &IrradiationSchedule,
    radiation_scaling: f64,
    reference_distance: f64,
    distance: f64,
    time: f64,
) -> f64 {
    let geometric = (reference_distance / distance).powi(2);
    radiation_scaling * geometric * time_factor(schedule, time)
}

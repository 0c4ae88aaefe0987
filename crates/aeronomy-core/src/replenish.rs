// ─────────────────────────────────────────────────────────────────────
// Aeronomy — Replenishment
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Per-step state check and inner-boundary reset.
//!
//! Cells with radius ≤ r_replenish are overwritten with the hydrostatic
//! reference state at rest, keeping the planet interior a fixed reservoir.

use crate::hydrostatic::{HydrostaticProfile, InitialAbundances};
use aeronomy_types::error::{AeronomyError, AeronomyResult};
use aeronomy_types::state::{BlockGeometry, Conserved, Primitives, ScalarField, StepInfo};
use log::error;
use ndarray::Array3;

/// Fail on the first non-finite primitive value, scanning every cell.
pub fn check_finite(
    prim: &Primitives,
    geometry: &BlockGeometry,
    step: &StepInfo,
) -> AeronomyResult<()> {
    let fields: [(&'static str, &Array3<f64>); 5] = [
        ("density", &prim.density),
        ("pressure", &prim.pressure),
        ("v1", &prim.v1),
        ("v2", &prim.v2),
        ("v3", &prim.v3),
    ];
    for k in geometry.all3() {
        for j in geometry.all2() {
            for i in geometry.all1() {
                for (field, values) in &fields {
                    if !values[[k, j, i]].is_finite() {
                        error!(
                            "non-finite {field} = {} at ({k}, {j}, {i}), t = {:.6e} s, cycle {}",
                            values[[k, j, i]],
                            step.time,
                            step.cycle
                        );
                        return Err(AeronomyError::NonFiniteState {
                            field,
                            k,
                            j,
                            i,
                            time: step.time,
                            cycle: step.cycle,
                        });
                    }
                }
            }
        }
    }
    Ok(())
}

/// Write the reference state into one cell.
#[allow(clippy::too_many_arguments)]
pub fn reset_cell(
    profile: &HydrostaticProfile,
    abundances: &InitialAbundances,
    gamma: f64,
    r: f64,
    k: usize,
    j: usize,
    i: usize,
    prim: &mut Primitives,
    cons: &mut Conserved,
    scalars: &mut ScalarField,
) {
    let state = profile.state(r);
    prim.density[[k, j, i]] = state.density;
    prim.pressure[[k, j, i]] = state.pressure;
    prim.v1[[k, j, i]] = 0.0;
    prim.v2[[k, j, i]] = 0.0;
    prim.v3[[k, j, i]] = 0.0;

    cons.density[[k, j, i]] = state.density;
    cons.mom1[[k, j, i]] = 0.0;
    cons.mom2[[k, j, i]] = 0.0;
    cons.mom3[[k, j, i]] = 0.0;
    cons.energy[[k, j, i]] = state.pressure / (gamma - 1.0);

    for (n, s) in abundances.mass_densities(r, state.density).into_iter().enumerate() {
        scalars.s[[n, k, j, i]] = s;
        scalars.r[[n, k, j, i]] = s / state.density;
    }
}

/// Reset every cell within `r_replenish`. Returns the number of cells reset.
#[allow(clippy::too_many_arguments)]
pub fn replenish(
    profile: &HydrostaticProfile,
    abundances: &InitialAbundances,
    gamma: f64,
    r_replenish: f64,
    geometry: &BlockGeometry,
    prim: &mut Primitives,
    cons: &mut Conserved,
    scalars: &mut ScalarField,
) -> usize {
    let mut count = 0;
    for k in geometry.all3() {
        for j in geometry.all2() {
            for i in geometry.all1() {
                let r = geometry.radius(k, j, i);
                if r <= r_replenish {
                    reset_cell(profile, abundances, gamma, r, k, j, i, prim, cons, scalars);
                    count += 1;
                }
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use aeronomy_types::config::AeronomyConfig;
    use std::path::PathBuf;

    fn setup() -> (AeronomyConfig, HydrostaticProfile, InitialAbundances, BlockGeometry) {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/hot_jupiter.json");
        let cfg = AeronomyConfig::from_file(&path.to_string_lossy()).unwrap();
        let profile = HydrostaticProfile::new(&cfg).unwrap();
        let ab = InitialAbundances::new(&cfg, &cfg.species_set().unwrap()).unwrap();
        let rp = cfg.problem.rp;
        let geom = BlockGeometry::radial(20, 0.6 * rp, 2.0 * rp).unwrap();
        (cfg, profile, ab, geom)
    }

    #[test]
    fn test_check_finite_reports_cell() {
        let (_, _, _, geom) = setup();
        let mut prim = Primitives::zeros(&geom);
        let step = StepInfo { time: 12.5, dt: 0.1, cycle: 7 };
        assert!(check_finite(&prim, &geom, &step).is_ok());
        prim.v2[[0, 0, 5]] = f64::NAN;
        match check_finite(&prim, &geom, &step) {
            Err(AeronomyError::NonFiniteState { field, i, cycle, time, .. }) => {
                assert_eq!(field, "v2");
                assert_eq!(i, 5);
                assert_eq!(cycle, 7);
                assert_eq!(time, 12.5);
            }
            other => panic!("expected NonFiniteState, got {other:?}"),
        }
    }

    #[test]
    fn test_only_inner_cells_reset() {
        let (cfg, profile, ab, geom) = setup();
        let mut prim = Primitives::zeros(&geom);
        let mut cons = Conserved::zeros(&geom);
        let mut scalars = ScalarField::zeros(3, &geom);
        prim.density.fill(-1.0);
        let r_rep = cfg.chemistry.r_replenish_rp * cfg.problem.rp;
        let count = replenish(
            &profile,
            &ab,
            cfg.hydro.gamma,
            r_rep,
            &geom,
            &mut prim,
            &mut cons,
            &mut scalars,
        );
        let inner = geom.all1().filter(|&i| geom.x1v[i] <= r_rep).count();
        assert_eq!(count, inner);
        assert!(inner > 0);
        for i in geom.all1() {
            if geom.x1v[i] <= r_rep {
                assert_eq!(prim.density[[0, 0, i]], profile.density(geom.x1v[i]));
                assert_eq!(cons.energy[[0, 0, i]], prim.pressure[[0, 0, i]] / (cfg.hydro.gamma - 1.0));
            } else {
                assert_eq!(prim.density[[0, 0, i]], -1.0);
            }
        }
    }

    #[test]
    fn test_reset_respects_floors() {
        let (mut cfg, _, _, geom) = setup();
        cfg.hydro.dfloor = 1.0e-13;
        cfg.hydro.pfloor = 1.0e-3;
        let profile = HydrostaticProfile::new(&cfg).unwrap();
        let ab = InitialAbundances::new(&cfg, &cfg.species_set().unwrap()).unwrap();
        let mut prim = Primitives::zeros(&geom);
        let mut cons = Conserved::zeros(&geom);
        let mut scalars = ScalarField::zeros(3, &geom);
        let count = replenish(
            &profile,
            &ab,
            cfg.hydro.gamma,
            3.0 * cfg.problem.rp,
            &geom,
            &mut prim,
            &mut cons,
            &mut scalars,
        );
        assert_eq!(count, geom.all1().count());
        assert!(prim.density.iter().all(|&d| d >= cfg.hydro.dfloor));
        assert!(prim.pressure.iter().all(|&p| p >= cfg.hydro.pfloor));
        let outer = geom.all1().last().unwrap();
        assert_eq!(prim.density[[0, 0, outer]], cfg.hydro.dfloor);
    }
}

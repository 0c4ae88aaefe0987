// ─────────────────────────────────────────────────────────────────────
// Aeronomy — End-to-End Step Tests
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Full transfer → source → finish cycles through `AtmosphereEngine`.

use aeronomy_core::engine::AtmosphereEngine;
use aeronomy_core::phase::StepPhase;
use aeronomy_types::config::AeronomyConfig;
use aeronomy_types::constants::{M_ELECTRON, M_HYDROGEN, RYDBERG_ENERGY};
use aeronomy_types::error::AeronomyError;
use aeronomy_types::state::{
    BlockGeometry, Conserved, CoordinateSystem, Primitives, ScalarField, StepInfo, NGHOST,
};
use ndarray::Array4;
use std::path::{Path, PathBuf};

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("data")
}

const DX: f64 = 1.0e5;
const RHO: f64 = 1.0e-12;
const T_GAS: f64 = 1.0e3;

fn single_cell_config(wave_nm: f64, flux: f64) -> AeronomyConfig {
    let json = format!(
        r#"{{
        "problem": {{"G": 6.674e-11, "Mp": 1.3e27, "Ms": 2.2e30, "Rp": 9.4e7, "period": 3.52}},
        "hydro": {{"gamma": 1.6666667}},
        "radiation": {{
            "bands": [{{
                "name": "line",
                "spectrum": [[{wave_nm}, 1.0, {flux}]],
                "absorbers": [{{"name": "HYDROGEN_IONIZATION", "cross_section": "hydrogenic",
                                "partition": {{"kind": "fixed", "heat_fraction": 0.15}}}}]
            }}]
        }},
        "chemistry": {{
            "rho_p": 1.0e-10,
            "cs": 3.0e3,
            "reactions": [
                {{"name": "PHOTOIONIZATION"}},
                {{"name": "H_RECOMBINATION"}},
                {{"name": "RECOMBINATION_COOLING"}},
                {{"name": "LYA_COOLING"}}
            ]
        }}
    }}"#
    );
    AeronomyConfig::from_json_str(&json).unwrap()
}

fn single_cell() -> BlockGeometry {
    BlockGeometry::new(
        CoordinateSystem::Cartesian,
        [1, 1, 1],
        [(0.0, DX), (0.0, 1.0), (0.0, 1.0)],
        NGHOST,
    )
    .unwrap()
}

struct Block {
    prim: Primitives,
    cons: Conserved,
    scalars: ScalarField,
    du: Conserved,
    ds: Array4<f64>,
}

fn neutral_block(engine: &AtmosphereEngine) -> Block {
    let geom = engine.geometry();
    let r_gas = engine.config().hydro.gas_constant;
    let mut prim = Primitives::zeros(geom);
    let mut scalars = ScalarField::zeros(engine.species().len(), geom);
    prim.density.fill(RHO);
    prim.pressure.fill(RHO * r_gas * T_GAS);
    scalars.s.index_axis_mut(ndarray::Axis(0), 1).fill(RHO);
    scalars.r.index_axis_mut(ndarray::Axis(0), 1).fill(1.0);
    let ds = Array4::zeros(scalars.s.dim());
    Block {
        prim,
        cons: Conserved::zeros(geom),
        scalars,
        du: Conserved::zeros(geom),
        ds,
    }
}

#[test]
fn single_neutral_cell_ionizes_by_captured_energy() {
    let flux = 1.0e-3;
    let dt = 10.0;
    let mut engine = AtmosphereEngine::new(single_cell_config(50.0, flux), single_cell(), &data_dir())
        .unwrap();
    let mut b = neutral_block(&engine);
    let step = StepInfo { time: 0.0, dt, cycle: 0 };

    engine.calculate_transfer(&b.scalars, 0.0).unwrap();
    engine
        .source_terms(&step, &b.prim, &b.scalars, &mut b.du, &mut b.ds)
        .unwrap();

    let i = NGHOST;
    let absorber = &engine.radiation().bands()[0].absorbers()[0];
    let kappa = absorber.cross_section(0) * RHO / M_HYDROGEN;
    let absorbed = flux * (1.0 - (-kappa * DX).exp());
    let volume = engine.geometry().cell_volume(0, 0, i);
    let area = volume / DX;

    let gain = dt * 0.85 * absorbed * area / RYDBERG_ENERGY / volume;
    let ds_ion = b.ds[[2, 0, 0, i]];
    let expected_ion = gain * (M_HYDROGEN - M_ELECTRON);
    assert!(expected_ion > 0.0);
    assert!(
        (ds_ion - expected_ion).abs() <= 1e-9 * expected_ion,
        "ds_ion {ds_ion:e} vs {expected_ion:e}"
    );
    let ds_h = b.ds[[1, 0, 0, i]];
    let ds_e = b.ds[[0, 0, 0, i]];
    assert!((ds_h + ds_ion + ds_e).abs() <= 1e-12 * ds_ion.abs());
    assert!((ds_h + gain * M_HYDROGEN).abs() <= 1e-9 * ds_h.abs());

    // Chemistry contributes no energy; all of it is the 15 % heat share.
    let diag = engine.diagnostics();
    for r in 0..engine.network().len() {
        if r != 0 {
            assert_eq!(diag.reaction_rate[[r, 0, 0, i]], 0.0);
        }
        assert_eq!(diag.reaction_energy_rate[[r, 0, 0, i]], 0.0);
    }
    let heating = diag.radiative_heating[[0, 0, i]];
    let expected_heating = 0.15 * absorbed * area / volume;
    assert!((heating - expected_heating).abs() <= 1e-9 * expected_heating);
    assert!((b.du.energy[[0, 0, i]] - dt * expected_heating).abs() <= 1e-9 * dt * expected_heating);
    assert!((diag.net_energy[[0, 0, i]] - b.du.energy[[0, 0, i]]).abs() <= 1e-12 * b.du.energy[[0, 0, i]]);
    assert!((diag.temperature[[0, 0, i]] - T_GAS).abs() < 1e-9);

    assert!(engine.accumulator().is_clear());
    engine
        .finish_step(&mut b.prim, &mut b.cons, &mut b.scalars, &step)
        .unwrap();
    assert_eq!(engine.phase(), StepPhase::Idle);
}

#[test]
fn sub_threshold_light_leaves_gas_untouched() {
    let mut engine =
        AtmosphereEngine::new(single_cell_config(150.0, 1.0), single_cell(), &data_dir()).unwrap();
    let mut b = neutral_block(&engine);
    let step = StepInfo { time: 0.0, dt: 1.0, cycle: 0 };

    engine.calculate_transfer(&b.scalars, 0.0).unwrap();
    assert!(engine.accumulator().is_clear());
    assert_eq!(engine.radiation().bands()[0].kappa(0, 0, NGHOST), 0.0);

    engine
        .source_terms(&step, &b.prim, &b.scalars, &mut b.du, &mut b.ds)
        .unwrap();
    assert!(b.ds.iter().all(|&v| v == 0.0));
    assert!(b.du.energy.iter().all(|&v| v == 0.0));
}

#[test]
fn over_ionization_is_reported_not_clamped() {
    let mut engine =
        AtmosphereEngine::new(single_cell_config(50.0, 1.0e9), single_cell(), &data_dir()).unwrap();
    let mut b = neutral_block(&engine);
    let step = StepInfo { time: 3.0, dt: 1.0e3, cycle: 42 };
    engine.calculate_transfer(&b.scalars, 3.0).unwrap();
    let err = engine
        .source_terms(&step, &b.prim, &b.scalars, &mut b.du, &mut b.ds)
        .unwrap_err();
    match err {
        AeronomyError::OverIonization { i, cycle, time, .. } => {
            assert_eq!(i, NGHOST);
            assert_eq!(cycle, 42);
            assert_eq!(time, 3.0);
        }
        other => panic!("expected OverIonization, got {other:?}"),
    }
    assert!(engine.accumulator().is_clear());
    assert_eq!(engine.phase(), StepPhase::Idle);
    engine.calculate_transfer(&b.scalars, 3.0).unwrap();
}

#[test]
fn out_of_order_calls_are_rejected() {
    let mut engine =
        AtmosphereEngine::new(single_cell_config(50.0, 1.0e-3), single_cell(), &data_dir()).unwrap();
    let mut b = neutral_block(&engine);
    let step = StepInfo { time: 0.0, dt: 1.0, cycle: 0 };

    let err = engine
        .source_terms(&step, &b.prim, &b.scalars, &mut b.du, &mut b.ds)
        .unwrap_err();
    assert!(matches!(err, AeronomyError::PhaseViolation { operation: "source_terms", .. }));

    let err = engine
        .finish_step(&mut b.prim, &mut b.cons, &mut b.scalars, &step)
        .unwrap_err();
    assert!(matches!(err, AeronomyError::PhaseViolation { operation: "finish_step", .. }));

    engine.calculate_transfer(&b.scalars, 0.0).unwrap();
    let err = engine.calculate_transfer(&b.scalars, 0.0).unwrap_err();
    assert!(matches!(err, AeronomyError::PhaseViolation { phase: "transferred", .. }));
}

#[test]
fn descending_cross_section_table_fails_setup() {
    let dir = std::env::temp_dir().join("aeronomy-core-desc");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("desc.dat"), "# eV Mb\n20.0 1.0\n10.0 2.0\n5.0 3.0\n").unwrap();
    let json = r#"{
        "problem": {"G": 6.674e-11, "Mp": 1.3e27, "Ms": 2.2e30, "Rp": 9.4e7, "period": 3.52},
        "hydro": {"gamma": 1.6666667},
        "radiation": {"bands": [{
            "name": "nuv",
            "spectrum": [[200.0, 1.0, 1.0]],
            "absorbers": [{"name": "HELIUM_TRIPLET_IONIZATION", "table": "desc.dat"}]
        }]},
        "chemistry": {"reactions": []},
        "species": ["electron", "hydrogen", "hydrogen_ion", "helium_singlet", "helium_triplet", "helium_ion"]
    }"#;
    let cfg = AeronomyConfig::from_json_str(json).unwrap();
    let err = AtmosphereEngine::new(cfg, single_cell(), Path::new(&dir))
        .err()
        .unwrap();
    assert!(matches!(err, AeronomyError::TableOrder { index: 1, .. }), "{err:?}");
}

fn hot_jupiter_engine() -> AtmosphereEngine {
    let cfg =
        AeronomyConfig::from_file(&data_dir().join("hot_jupiter.json").to_string_lossy()).unwrap();
    let rp = cfg.problem.rp;
    let geom = BlockGeometry::radial(48, 0.6 * rp, 4.0 * rp).unwrap();
    AtmosphereEngine::new(cfg, geom, &data_dir()).unwrap()
}

fn initialized(engine: &AtmosphereEngine) -> (Primitives, Conserved, ScalarField) {
    let geom = engine.geometry();
    let mut prim = Primitives::zeros(geom);
    let mut cons = Conserved::zeros(geom);
    let mut scalars = ScalarField::zeros(engine.species().len(), geom);
    engine
        .initialize_block(&mut prim, &mut cons, &mut scalars)
        .unwrap();
    (prim, cons, scalars)
}

#[test]
fn replenish_restores_profile_and_is_idempotent() {
    let engine = hot_jupiter_engine();
    let (reference_prim, reference_cons, reference_scalars) = initialized(&engine);
    let (mut prim, mut cons, mut scalars) = initialized(&engine);

    prim.density.mapv_inplace(|v| 3.0 * v);
    prim.v1.fill(1.0e3);
    cons.energy.fill(7.0);
    scalars.s.mapv_inplace(|v| 0.5 * v);

    let step = StepInfo { time: 100.0, dt: 1.0, cycle: 3 };
    engine.replenish(&mut prim, &mut cons, &mut scalars, &step).unwrap();

    let geom = engine.geometry();
    let r_rep = engine.replenish_radius();
    for i in geom.all1() {
        let inner = geom.x1v[i] <= r_rep;
        let matches = prim.density[[0, 0, i]] == reference_prim.density[[0, 0, i]]
            && prim.v1[[0, 0, i]] == 0.0
            && cons.energy[[0, 0, i]] == reference_cons.energy[[0, 0, i]]
            && scalars.s[[1, 0, 0, i]] == reference_scalars.s[[1, 0, 0, i]];
        assert_eq!(matches, inner, "cell {i} at r = {}", geom.x1v[i]);
    }

    let (p1, c1, s1) = (prim.clone(), cons.clone(), scalars.clone());
    engine.replenish(&mut prim, &mut cons, &mut scalars, &step).unwrap();
    assert_eq!(prim.density, p1.density);
    assert_eq!(prim.pressure, p1.pressure);
    assert_eq!(cons.energy, c1.energy);
    assert_eq!(scalars.s, s1.s);
    assert_eq!(scalars.r, s1.r);
}

#[test]
fn replenish_reports_non_finite_state() {
    let engine = hot_jupiter_engine();
    let (mut prim, mut cons, mut scalars) = initialized(&engine);
    prim.pressure[[0, 0, 30]] = f64::INFINITY;
    let step = StepInfo { time: 5.0, dt: 1.0, cycle: 9 };
    let err = engine
        .replenish(&mut prim, &mut cons, &mut scalars, &step)
        .unwrap_err();
    assert!(matches!(
        err,
        AeronomyError::NonFiniteState { field: "pressure", i: 30, cycle: 9, .. }
    ));
}

#[test]
fn hot_jupiter_step_conserves_mass() {
    let mut engine = hot_jupiter_engine();
    let (mut prim, mut cons, mut scalars) = initialized(&engine);
    let geom = engine.geometry().clone();
    let mut du = Conserved::zeros(&geom);
    let mut ds = Array4::zeros(scalars.s.dim());

    for cycle in 0..2u64 {
        let step = StepInfo { time: cycle as f64, dt: 1.0, cycle };
        du.energy.fill(0.0);
        ds.fill(0.0);
        engine.calculate_transfer(&scalars, step.time).unwrap();
        engine
            .source_terms(&step, &prim, &scalars, &mut du, &mut ds)
            .unwrap();
        engine
            .finish_step(&mut prim, &mut cons, &mut scalars, &step)
            .unwrap();
    }

    let diag = engine.diagnostics();
    for i in geom.active1() {
        let t = diag.temperature[[0, 0, i]];
        assert!(t.is_finite() && t > 0.0, "T = {t} at cell {i}");
        assert!(du.energy[[0, 0, i]].is_finite());
        let net: f64 = (0..engine.species().len()).map(|n| ds[[n, 0, 0, i]]).sum();
        let scale: f64 = (0..engine.species().len())
            .map(|n| ds[[n, 0, 0, i]].abs())
            .sum::<f64>()
            .max(1e-300);
        assert!(net.abs() <= 1e-10 * scale, "cell {i}: net {net:e}, scale {scale:e}");
    }
    assert!(diag.total_radiative_power(&geom) > 0.0);
    assert!(engine.radiation().net_flux(0).iter().all(|&v| v == 0.0));
}

#[test]
fn helium_atmosphere_completes_a_step() {
    let cfg = AeronomyConfig::from_file(
        &data_dir().join("hot_jupiter_helium.json").to_string_lossy(),
    )
    .unwrap();
    let rp = cfg.problem.rp;
    let geom = BlockGeometry::radial(48, 0.6 * rp, 4.0 * rp).unwrap();
    let mut engine = AtmosphereEngine::new(cfg, geom.clone(), &data_dir()).unwrap();
    let (mut prim, mut cons, mut scalars) = initialized(&engine);
    let mut du = Conserved::zeros(&geom);
    let mut ds = Array4::zeros(scalars.s.dim());
    let step = StepInfo { time: 0.0, dt: 1.0, cycle: 0 };

    engine.calculate_transfer(&scalars, step.time).unwrap();
    engine
        .source_terms(&step, &prim, &scalars, &mut du, &mut ds)
        .unwrap();

    let diag = engine.diagnostics();
    let t_max = geom
        .active1()
        .map(|i| diag.temperature[[0, 0, i]])
        .fold(0.0, f64::max);
    assert!(t_max > 1.0e6, "background above r_e is coronal, T_max = {t_max:e}");

    let collisions = engine
        .network()
        .names()
        .iter()
        .position(|&n| n == "HE_E_COLLISIONS")
        .unwrap();
    let outer = geom.active1().last().unwrap();
    assert!(diag.reaction_rate[[collisions, 0, 0, outer]] > 0.0);

    for i in geom.active1() {
        assert!(du.energy[[0, 0, i]].is_finite(), "energy at cell {i}");
        let net: f64 = (0..engine.species().len()).map(|n| ds[[n, 0, 0, i]]).sum();
        let scale: f64 = (0..engine.species().len())
            .map(|n| ds[[n, 0, 0, i]].abs())
            .sum::<f64>()
            .max(1e-300);
        assert!(net.abs() <= 1e-10 * scale, "cell {i}: net {net:e}, scale {scale:e}");
    }

    engine
        .finish_step(&mut prim, &mut cons, &mut scalars, &step)
        .unwrap();
    assert_eq!(engine.phase(), StepPhase::Idle);
    assert!(engine.accumulator().is_clear());
}

#[test]
fn gravity_points_inward_near_planet() {
    let engine = hot_jupiter_engine();
    let [g1, g2, _] = engine.gravity_field();
    let geom = engine.geometry();
    let rp = engine.config().problem.rp;
    // Well inside the Hill sphere (~4.3 Rp for this system)
    for i in geom.active1().filter(|&i| geom.x1v[i] <= 3.0 * rp) {
        assert!(g1[[0, 0, i]] < 0.0, "g1 = {} at r = {}", g1[[0, 0, i]], geom.x1v[i]);
    }
    assert!(g2.iter().all(|&v| v == 0.0));
}

#[test]
fn engine_can_move_between_threads() {
    fn assert_send<T: Send>() {}
    assert_send::<AtmosphereEngine>();
}

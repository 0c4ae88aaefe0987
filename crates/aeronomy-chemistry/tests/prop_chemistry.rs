// ─────────────────────────────────────────────────────────────────────
// Aeronomy — Property-Based Tests (proptest) for aeronomy-chemistry
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for aeronomy-chemistry using proptest.
//!
//! Covers: mass conservation of the full H/He network, inert neutral
//! cells, photoionization linearity.

use aeronomy_chemistry::network::ReactionNetwork;
use aeronomy_chemistry::reaction::CellContext;
use aeronomy_types::config::{AeronomyConfig, ReactionConfig};
use aeronomy_types::species::SpeciesSet;
use aeronomy_types::state::IonizationChannel;
use proptest::prelude::*;
use std::path::PathBuf;

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("data")
}

fn helium_network() -> ReactionNetwork {
    let cfg = AeronomyConfig::from_file(&data_dir().join("hot_jupiter_helium.json").to_string_lossy())
        .unwrap();
    let set = SpeciesSet::hydrogen_helium();
    let channels = [
        IonizationChannel { neutral: 1, ion: 2, ionization_energy: set.energy(2) - set.energy(1) },
        IonizationChannel { neutral: 4, ion: 5, ionization_energy: set.energy(5) - set.energy(4) },
    ];
    ReactionNetwork::from_config(&cfg.chemistry, &set, &channels, &data_dir()).unwrap()
}

fn hydrogen_network() -> ReactionNetwork {
    let set = SpeciesSet::hydrogen();
    let channels = [IonizationChannel {
        neutral: 1,
        ion: 2,
        ionization_energy: set.energy(2) - set.energy(1),
    }];
    let mut chemistry = AeronomyConfig::from_file(
        &data_dir().join("hot_jupiter.json").to_string_lossy(),
    )
    .unwrap()
    .chemistry;
    chemistry.reactions = ["PHOTOIONIZATION", "H_RECOMBINATION", "RECOMBINATION_COOLING", "LYA_COOLING"]
        .iter()
        .map(|n| ReactionConfig::named(n))
        .collect();
    ReactionNetwork::from_config(&chemistry, &set, &channels, &data_dir()).unwrap()
}

fn context<'a>(t: f64, n: &'a [f64], power: &'a [f64]) -> CellContext<'a> {
    CellContext {
        temperature: t,
        dt: 1.0,
        volume: 1.0e18,
        number_density: n,
        ionizing_power: power,
        k: 0,
        j: 0,
        i: 0,
        time: 0.0,
        cycle: 0,
    }
}

// ── Conservation ─────────────────────────────────────────────────────

proptest! {
    /// Total mass density change of the full H/He network is zero.
    #[test]
    fn network_conserves_mass(
        t in 2.0e3f64..4.0e4,
        n in prop::collection::vec(1.0e6f64..1.0e14, 6),
        p_h in 0.0f64..1.0e-6,
        p_he in 0.0f64..1.0e-9,
    ) {
        let net = helium_network();
        let power = [p_h, p_he];
        let update = net.react(&context(t, &n, &power)).unwrap();
        let total: f64 = update.ds.iter().sum();
        let scale: f64 = update.ds.iter().map(|v| v.abs()).sum::<f64>().max(1e-300);
        prop_assert!(total.abs() <= 1e-10 * scale, "net mass change {} (scale {})", total, scale);
        prop_assert_eq!(update.outputs.len(), net.len());
    }

    /// No radiation and no ions or electrons: nothing changes.
    #[test]
    fn neutral_dark_cell_is_inert(
        t in 100.0f64..3.0e4,
        n_h in 1.0e6f64..1.0e18,
    ) {
        let net = hydrogen_network();
        let n = [0.0, n_h, 0.0];
        let update = net.react(&context(t, &n, &[0.0])).unwrap();
        prop_assert!(update.ds.iter().all(|&v| v == 0.0));
        prop_assert_eq!(update.de, 0.0);
    }

    /// Photoionized mass scales linearly with captured power.
    #[test]
    fn photoionization_linear_in_power(
        power in 1.0e-12f64..1.0e-6,
        factor in 1.0f64..10.0,
    ) {
        let net = hydrogen_network();
        let n = [0.0, 1.0e20, 0.0];
        let a = net.react(&context(1.0e3, &n, &[power])).unwrap();
        let b = net.react(&context(1.0e3, &n, &[power * factor])).unwrap();
        prop_assert!(a.ds[2] > 0.0);
        prop_assert!((b.ds[2] - factor * a.ds[2]).abs() <= 1e-12 * b.ds[2]);
    }
}

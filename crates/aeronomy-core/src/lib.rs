// ─────────────────────────────────────────────────────────────────────
// Aeronomy — Core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Block-level coupling of radiative transfer and photochemistry to a host
//! fluid integrator.

pub mod diagnostics;
pub mod engine;
pub mod gravity;
pub mod hydrostatic;
pub mod phase;
pub mod replenish;
pub mod source;

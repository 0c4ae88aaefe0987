// ─────────────────────────────────────────────────────────────────────
// Aeronomy — Radiation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Spectral absorbers, radiation bands and single-ray beam transfer.

pub mod absorber;
pub mod band;
pub mod manager;
pub mod orbit;
pub mod schedule;
pub mod spectrum;

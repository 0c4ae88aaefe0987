// ─────────────────────────────────────────────────────────────────────
// Aeronomy — Step Phase
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Ordering guard for transfer → source → finish within one timestep.
//!
//! Each explicit sub-stage runs transfer then source; several sub-stages
//! may precede `finish`, which clears the step accumulators.

use aeronomy_types::error::{AeronomyError, AeronomyResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepPhase {
    #[default]
    Idle,
    Transferred,
    Sourced,
}

impl StepPhase {
    pub fn name(self) -> &'static str {
        match self {
            StepPhase::Idle => "idle",
            StepPhase::Transferred => "transferred",
            StepPhase::Sourced => "sourced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhaseToken {
    phase: StepPhase,
}

impl PhaseToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> StepPhase {
        self.phase
    }

    fn violation(&self, operation: &'static str) -> AeronomyError {
        AeronomyError::PhaseViolation {
            operation,
            phase: self.phase.name(),
        }
    }

    /// Transfer opens a sub-stage: allowed when idle or after a source pass.
    pub fn begin_transfer(&mut self) -> AeronomyResult<()> {
        match self.phase {
            StepPhase::Idle | StepPhase::Sourced => {
                self.phase = StepPhase::Transferred;
                Ok(())
            }
            StepPhase::Transferred => Err(self.violation("calculate_transfer")),
        }
    }

    pub fn begin_source(&mut self) -> AeronomyResult<()> {
        match self.phase {
            StepPhase::Transferred => {
                self.phase = StepPhase::Sourced;
                Ok(())
            }
            _ => Err(self.violation("source_terms")),
        }
    }

    pub fn finish(&mut self) -> AeronomyResult<()> {
        match self.phase {
            StepPhase::Sourced => {
                self.phase = StepPhase::Idle;
                Ok(())
            }
            _ => Err(self.violation("finish_step")),
        }
    }

    /// Abandon the current step after a failed stage.
    pub fn reset(&mut self) {
        self.phase = StepPhase::Idle;
    }
}

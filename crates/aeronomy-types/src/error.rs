use thiserror::Error;

#[derive(Error, Debug)]
pub enum AeronomyError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Table {source_name} must be in ascending order (row {index})")]
    TableOrder { source_name: String, index: usize },

    #[error("Table query {value} outside tabulated range [{min}, {max}]")]
    TableRange { value: f64, min: f64, max: f64 },

    #[error("Non-finite {field} at (k={k}, j={j}, i={i}), time={time}, cycle={cycle}")]
    NonFiniteState {
        field: &'static str,
        k: usize,
        j: usize,
        i: usize,
        time: f64,
        cycle: u64,
    },

    #[error(
        "Ionization gain {gain} exceeds neutral number density {available} at \
         (k={k}, j={j}, i={i}), time={time}, cycle={cycle}; re-run with a lower timestep"
    )]
    OverIonization {
        gain: f64,
        available: f64,
        k: usize,
        j: usize,
        i: usize,
        time: f64,
        cycle: u64,
    },

    #[error("Step phase violation: {operation} called during {phase}")]
    PhaseViolation {
        operation: &'static str,
        phase: &'static str,
    },

    #[error("Physics constraint violated: {0}")]
    PhysicsViolation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type AeronomyResult<T> = Result<T, AeronomyError>;

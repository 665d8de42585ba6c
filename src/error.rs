use thiserror::Error;

/// Failure of a single adaptive quadrature
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrationError {
    #[error("quadrature over [{lower}, {upper}] did not converge after {subdivisions} subdivisions (error estimate {error_estimate:e})")]
    NotConverged {
        lower: f64,
        upper: f64,
        subdivisions: usize,
        error_estimate: f64,
    },

    #[error("integrand returned a non-finite value at t = {at}")]
    NonFinite { at: f64 },

    #[error("invalid integration interval [{lower}, {upper}]")]
    InvalidInterval { lower: f64, upper: f64 },
}

/// Errors surfaced by the monitor pipeline and its front ends
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("volume integration failed at grid index {index} (t = {time:.4}): {source}")]
    Integration {
        index: usize,
        time: f64,
        #[source]
        source: IntegrationError,
    },

    #[error("series is empty")]
    EmptySeries,

    #[error("series length mismatch: expected {expected} values, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("time grid needs at least 2 samples, got {0}")]
    InvalidGrid(usize),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MonitorError>;

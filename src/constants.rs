//! Fixed constants of the flow model and the alert policy.
//!
//! These are build-time values. Nothing in the crate reads them from
//! configuration or the environment.

/// Flow amplitude `A` in `f(t) = A · e^(k·t) · sin(ω·t)` (L/min)
pub const FLOW_AMPLITUDE: f64 = 600.0;

/// Exponential growth rate `k` (1/min)
pub const FLOW_GROWTH_RATE: f64 = 0.15;

/// Angular frequency `ω` (rad/min)
pub const FLOW_FREQUENCY: f64 = 0.7;

/// Constant outflow subtracted from accumulated volume (L/min)
pub const DRAIN_RATE: f64 = 50.0;

/// Critical net-volume ceiling (L)
pub const VOLUME_LIMIT: f64 = 8000.0;

/// Derivative magnitude above which the flow is "increasing very fast" (L/min²)
pub const DERIVATIVE_ALERT_THRESHOLD: f64 = 1000.0;

/// Time at which the derivative report is evaluated (min)
pub const DERIVATIVE_EVAL_TIME: f64 = 10.0;

/// Start of the time grid (min)
pub const TIME_START: f64 = 0.0;

/// End of the time grid, inclusive (min)
pub const TIME_END: f64 = 20.0;

/// Number of samples in the time grid
pub const SAMPLE_COUNT: usize = 1000;

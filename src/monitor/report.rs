use crate::risk::{AlertSeverity, FlowTrend, VolumeStatus};
use serde::Serialize;

/// Flow derivative at the fixed evaluation time, with its classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivativeReport {
    /// Evaluation time (min)
    pub time: f64,

    /// `f'(time)` (L/min²)
    pub value: f64,

    pub trend: FlowTrend,
}

impl DerivativeReport {
    /// `(value, label)` pair handed to front ends
    pub fn as_pair(&self) -> (f64, &'static str) {
        (self.value, self.trend.label())
    }

    pub fn severity(&self) -> AlertSeverity {
        self.trend.severity()
    }

    pub fn title(&self) -> String {
        format!("Derivative at t={}", self.time)
    }

    pub fn body(&self) -> String {
        format!(
            "f'({}) ≈ {:.2} L/min²\n\n{}",
            self.time,
            self.value,
            self.trend.message()
        )
    }
}

/// Net volume at the final grid point, with its classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VolumeReport {
    /// Final grid time (min)
    pub time: f64,

    /// Net volume `N(time)` (L)
    pub value: f64,

    /// Inflow volume before drain (L)
    pub accumulated: f64,

    /// Critical ceiling the value was compared against (L)
    pub limit: f64,

    pub status: VolumeStatus,
}

impl VolumeReport {
    pub fn as_pair(&self) -> (f64, &'static str) {
        (self.value, self.status.label())
    }

    pub fn severity(&self) -> AlertSeverity {
        self.status.severity()
    }

    /// Signed distance to the limit; positive means above
    pub fn margin(&self) -> f64 {
        self.value - self.limit
    }

    pub fn title(&self) -> &'static str {
        "Accumulated volume"
    }

    pub fn body(&self) -> String {
        format!("Final net volume: {:.2} L\n\n{}", self.value, self.status.message())
    }
}

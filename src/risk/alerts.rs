//! Threshold classification of the derivative and net-volume reports.
//!
//! Both rules are pure functions of an already computed value. They keep no
//! state, so classifying the same value twice always yields the same alert.

use crate::constants::{DERIVATIVE_ALERT_THRESHOLD, VOLUME_LIMIT};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertSeverity {
    Info,     // Display only
    Critical, // Flood risk, highlight to operator
}

/// Direction of the flow rate at the evaluation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowTrend {
    IncreasingVeryFast,
    Increasing,
    Decreasing,
    Stable,
}

impl FlowTrend {
    pub fn label(&self) -> &'static str {
        match self {
            FlowTrend::IncreasingVeryFast => "increasing very fast",
            FlowTrend::Increasing => "increasing",
            FlowTrend::Decreasing => "decreasing",
            FlowTrend::Stable => "stable",
        }
    }

    pub fn severity(&self) -> AlertSeverity {
        match self {
            FlowTrend::IncreasingVeryFast => AlertSeverity::Critical,
            _ => AlertSeverity::Info,
        }
    }

    /// Operator-facing alert text
    pub fn message(&self) -> &'static str {
        match self {
            FlowTrend::IncreasingVeryFast => "Alert: flow rate increasing very fast!",
            FlowTrend::Increasing => "Flow rate increasing.",
            FlowTrend::Decreasing => "Flow rate decreasing.",
            FlowTrend::Stable => "Flow rate stable.",
        }
    }
}

impl fmt::Display for FlowTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Position of the final net volume relative to the limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeStatus {
    AboveLimit,
    WithinLimit,
}

impl VolumeStatus {
    pub fn label(&self) -> &'static str {
        match self {
            VolumeStatus::AboveLimit => "above limit",
            VolumeStatus::WithinLimit => "within limit",
        }
    }

    pub fn severity(&self) -> AlertSeverity {
        match self {
            VolumeStatus::AboveLimit => AlertSeverity::Critical,
            VolumeStatus::WithinLimit => AlertSeverity::Info,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            VolumeStatus::AboveLimit => "Alert: volume above limit!",
            VolumeStatus::WithinLimit => "Volume within limit.",
        }
    }
}

impl fmt::Display for VolumeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Alert thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Derivative above which the flow counts as increasing very fast (L/min²)
    pub derivative: f64,

    /// Critical net-volume ceiling (L)
    pub volume_limit: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            derivative: DERIVATIVE_ALERT_THRESHOLD,
            volume_limit: VOLUME_LIMIT,
        }
    }
}

impl AlertThresholds {
    /// Four-way classification of a derivative value
    ///
    /// A value that compares neither above nor below zero (zero itself, or
    /// NaN) is reported as stable.
    pub fn classify_derivative(&self, derivative: f64) -> FlowTrend {
        if derivative > self.derivative {
            FlowTrend::IncreasingVeryFast
        } else if derivative > 0.0 {
            FlowTrend::Increasing
        } else if derivative < 0.0 {
            FlowTrend::Decreasing
        } else {
            FlowTrend::Stable
        }
    }

    /// Net volume strictly above the limit is critical; equality is within
    pub fn classify_volume(&self, net_volume: f64) -> VolumeStatus {
        if net_volume > self.volume_limit {
            VolumeStatus::AboveLimit
        } else {
            VolumeStatus::WithinLimit
        }
    }
}

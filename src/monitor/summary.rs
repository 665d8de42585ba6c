use crate::error::{MonitorError, Result};
use serde::Serialize;
use statrs::statistics::Statistics;

/// Headline figures of the charted series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub peak_flow: f64,
    pub peak_flow_time: f64,
    pub mean_flow: f64,
    pub max_derivative: f64,
    pub min_net_volume: f64,
    pub max_net_volume: f64,
    pub final_net_volume: f64,
}

impl SeriesSummary {
    /// Summarize aligned series
    ///
    /// All slices must have the same, non-zero length.
    pub fn from_series(times: &[f64], flow: &[f64], derivative: &[f64], net_volume: &[f64]) -> Result<Self> {
        let n = times.len();
        if n == 0 {
            return Err(MonitorError::EmptySeries);
        }
        for got in [flow.len(), derivative.len(), net_volume.len()] {
            if got != n {
                return Err(MonitorError::LengthMismatch { expected: n, got });
            }
        }

        let (peak_index, peak_flow) = flow
            .iter()
            .copied()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .ok_or(MonitorError::EmptySeries)?;

        Ok(Self {
            peak_flow,
            peak_flow_time: times[peak_index],
            mean_flow: Statistics::mean(flow),
            max_derivative: Statistics::max(derivative),
            min_net_volume: Statistics::min(net_volume),
            max_net_volume: Statistics::max(net_volume),
            final_net_volume: net_volume[n - 1],
        })
    }
}

use crate::constants::DERIVATIVE_EVAL_TIME;
use crate::error::Result;
use crate::model::{FlowModel, TimeGrid};
use crate::monitor::{DerivativeReport, SeriesSummary, VolumeReport};
use crate::risk::AlertThresholds;
use crate::volume::{ExceedanceInterval, VolumeAggregator, VolumeSeries};
use serde::Serialize;
use tracing::{debug, info};

/// Everything the front ends read, computed once at startup
///
/// Construction evaluates the flow model and its derivatives over the grid
/// and integrates the volume series. After that the context is read-only:
/// reports classify stored or closed-form values and never recompute the
/// series.
#[derive(Debug, Clone)]
pub struct MonitorContext {
    model: FlowModel,
    grid: TimeGrid,
    flow: Vec<f64>,
    derivative: Vec<f64>,
    second_derivative: Vec<f64>,
    volume: VolumeSeries,
    thresholds: AlertThresholds,
    eval_time: f64,
}

/// Aligned series for charting, borrowed from the context
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ChartSeries<'a> {
    pub times: &'a [f64],
    pub flow: &'a [f64],
    pub derivative: &'a [f64],
    pub net_volume: &'a [f64],
    pub volume_limit: f64,
}

impl MonitorContext {
    /// Build the context for an arbitrary model and grid
    ///
    /// # Arguments
    /// * `model` - Flow model to evaluate
    /// * `grid` - Sample times
    /// * `aggregator` - Integration settings
    /// * `thresholds` - Alert policy
    pub fn build(
        model: FlowModel,
        grid: TimeGrid,
        aggregator: &VolumeAggregator,
        thresholds: AlertThresholds,
    ) -> Result<Self> {
        info!(params = ?model.params(), samples = grid.len(), "Building monitor context");

        let flow = model.rate_series(&grid);
        let derivative = model.derivative_series(&grid);
        let second_derivative = model.second_derivative_series(&grid);
        debug!("Flow and derivative series evaluated");

        let volume = aggregator.aggregate(&model, &grid)?;

        Ok(Self {
            model,
            grid,
            flow,
            derivative,
            second_derivative,
            volume,
            thresholds,
            eval_time: DERIVATIVE_EVAL_TIME,
        })
    }

    /// The fixed monitoring setup: default model, 1000-point grid over [0, 20]
    pub fn standard(aggregator: &VolumeAggregator) -> Result<Self> {
        Self::build(
            FlowModel::default(),
            TimeGrid::standard(),
            aggregator,
            AlertThresholds::default(),
        )
    }

    /// Derivative at t = 10 and its trend
    pub fn report_derivative(&self) -> DerivativeReport {
        let value = self.model.derivative(self.eval_time);
        let trend = self.thresholds.classify_derivative(value);
        debug!(time = self.eval_time, value, %trend, "Derivative report");

        DerivativeReport {
            time: self.eval_time,
            value,
            trend,
        }
    }

    /// Final net volume against the limit
    pub fn report_volume(&self) -> VolumeReport {
        let value = self.volume.final_net();
        let status = self.thresholds.classify_volume(value);
        debug!(value, %status, "Volume report");

        VolumeReport {
            time: self.grid.last(),
            value,
            accumulated: self.volume.final_accumulated(),
            limit: self.thresholds.volume_limit,
            status,
        }
    }

    pub fn get_series(&self) -> ChartSeries<'_> {
        ChartSeries {
            times: self.grid.points(),
            flow: &self.flow,
            derivative: &self.derivative,
            net_volume: self.volume.net(),
            volume_limit: self.thresholds.volume_limit,
        }
    }

    pub fn second_derivative(&self) -> &[f64] {
        &self.second_derivative
    }

    /// Where the net volume rises above the limit
    pub fn exceedance_intervals(&self) -> Vec<ExceedanceInterval> {
        self.volume.exceedance_intervals(self.thresholds.volume_limit)
    }

    pub fn summary(&self) -> Result<SeriesSummary> {
        SeriesSummary::from_series(
            self.grid.points(),
            &self.flow,
            &self.derivative,
            self.volume.net(),
        )
    }

    pub fn model(&self) -> &FlowModel {
        &self.model
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn volume(&self) -> &VolumeSeries {
        &self.volume
    }

    pub fn thresholds(&self) -> &AlertThresholds {
        &self.thresholds
    }
}

use crate::error::Result;
use crate::monitor::{ChartSeries, DerivativeReport, MonitorContext, SeriesSummary, VolumeReport};
use crate::volume::{AccumulationStrategy, ExceedanceInterval};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Snapshot of everything the chart shows, for external plotting tools
#[derive(Debug, Clone, Serialize)]
pub struct SeriesExport<'a> {
    pub generated_at: DateTime<Utc>,
    pub strategy: AccumulationStrategy,
    #[serde(rename = "derivative_report")]
    pub derivative: DerivativeReport,
    #[serde(rename = "volume_report")]
    pub volume: VolumeReport,
    pub summary: SeriesSummary,
    pub exceedance: Vec<ExceedanceInterval>,
    #[serde(flatten)]
    pub series: ChartSeries<'a>,
    pub second_derivative: &'a [f64],
}

impl<'a> SeriesExport<'a> {
    pub fn from_context(ctx: &'a MonitorContext, strategy: AccumulationStrategy) -> Result<Self> {
        Ok(Self {
            generated_at: Utc::now(),
            strategy,
            derivative: ctx.report_derivative(),
            volume: ctx.report_volume(),
            summary: ctx.summary()?,
            exceedance: ctx.exceedance_intervals(),
            series: ctx.get_series(),
            second_derivative: ctx.second_derivative(),
        })
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

use crate::constants::DRAIN_RATE;
use crate::error::{MonitorError, Result};
use crate::model::{FlowModel, TimeGrid};
use crate::volume::Quadrature;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

/// How accumulated volume is built over the grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccumulationStrategy {
    /// Independent definite integral from the grid origin to every point
    #[default]
    Direct,

    /// Running sum of per-segment integrals
    Segmented,
}

/// Time interval during which net volume stays above a limit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExceedanceInterval {
    /// Interpolated upward crossing (or first grid time if already above)
    pub start: f64,

    /// Interpolated downward crossing (or last grid time if still above)
    pub end: f64,

    /// Highest sampled net volume inside the interval
    pub peak: f64,
}

impl ExceedanceInterval {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Accumulated and net volume over a time grid
///
/// Immutable once built; every accessor reads the stored sequences.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeSeries {
    times: Vec<f64>,
    accumulated: Vec<f64>,
    net: Vec<f64>,
    drain_rate: f64,
}

impl VolumeSeries {
    /// Build from precomputed accumulated volumes
    ///
    /// Net volume is `accumulated[i] − drain_rate · times[i]`.
    pub fn from_accumulated(times: Vec<f64>, accumulated: Vec<f64>, drain_rate: f64) -> Result<Self> {
        if times.is_empty() {
            return Err(MonitorError::EmptySeries);
        }
        if times.len() != accumulated.len() {
            return Err(MonitorError::LengthMismatch {
                expected: times.len(),
                got: accumulated.len(),
            });
        }

        let net = times
            .iter()
            .zip(&accumulated)
            .map(|(&t, &v)| v - drain_rate * t)
            .collect();

        Ok(Self {
            times,
            accumulated,
            net,
            drain_rate,
        })
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn accumulated(&self) -> &[f64] {
        &self.accumulated
    }

    pub fn net(&self) -> &[f64] {
        &self.net
    }

    pub fn drain_rate(&self) -> f64 {
        self.drain_rate
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Net volume at the last grid point
    pub fn final_net(&self) -> f64 {
        self.net[self.net.len() - 1]
    }

    /// Accumulated volume at the last grid point
    pub fn final_accumulated(&self) -> f64 {
        self.accumulated[self.accumulated.len() - 1]
    }

    /// Intervals where net volume is strictly above `limit`
    ///
    /// Crossings are located by linear interpolation between neighbouring
    /// samples.
    pub fn exceedance_intervals(&self, limit: f64) -> Vec<ExceedanceInterval> {
        let mut intervals = Vec::new();
        let mut open: Option<(f64, f64)> = None; // (start, peak)

        for i in 0..self.net.len() {
            let (t, v) = (self.times[i], self.net[i]);
            let above = v > limit;

            match (open, above) {
                (None, true) => {
                    let start = if i == 0 {
                        t
                    } else {
                        self.crossing(i - 1, i, limit)
                    };
                    open = Some((start, v));
                }
                (Some((start, peak)), true) => {
                    open = Some((start, peak.max(v)));
                }
                (Some((start, peak)), false) => {
                    intervals.push(ExceedanceInterval {
                        start,
                        end: self.crossing(i - 1, i, limit),
                        peak,
                    });
                    open = None;
                }
                (None, false) => {}
            }
        }

        if let Some((start, peak)) = open {
            intervals.push(ExceedanceInterval {
                start,
                end: self.times[self.times.len() - 1],
                peak,
            });
        }

        intervals
    }

    fn crossing(&self, i: usize, j: usize, limit: f64) -> f64 {
        let (t0, t1) = (self.times[i], self.times[j]);
        let (v0, v1) = (self.net[i], self.net[j]);
        if v1 == v0 {
            return t1;
        }
        t0 + (limit - v0) / (v1 - v0) * (t1 - t0)
    }
}

/// Integrates the flow model over a time grid
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeAggregator {
    quadrature: Quadrature,
    strategy: AccumulationStrategy,
    drain_rate: f64,
}

impl Default for VolumeAggregator {
    fn default() -> Self {
        Self::new(Quadrature::default(), AccumulationStrategy::default())
    }
}

impl VolumeAggregator {
    pub fn new(quadrature: Quadrature, strategy: AccumulationStrategy) -> Self {
        Self {
            quadrature,
            strategy,
            drain_rate: DRAIN_RATE,
        }
    }

    /// Override the outflow rate (L/min)
    pub fn with_drain_rate(mut self, drain_rate: f64) -> Self {
        self.drain_rate = drain_rate;
        self
    }

    pub fn strategy(&self) -> AccumulationStrategy {
        self.strategy
    }

    /// Accumulated and net volume at every grid point
    pub fn aggregate(&self, model: &FlowModel, grid: &TimeGrid) -> Result<VolumeSeries> {
        let started = Instant::now();
        info!(
            strategy = ?self.strategy,
            samples = grid.len(),
            drain_rate = self.drain_rate,
            "Integrating flow over time grid"
        );

        let accumulated = self.accumulate(model, grid)?;
        let series = VolumeSeries::from_accumulated(grid.points().to_vec(), accumulated, self.drain_rate)?;

        info!(
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            final_accumulated = series.final_accumulated(),
            final_net = series.final_net(),
            "Volume series ready"
        );

        Ok(series)
    }

    /// `∫₀^{t_i} f(s) ds` for every grid point, measured from the grid origin
    pub fn accumulate(&self, model: &FlowModel, grid: &TimeGrid) -> Result<Vec<f64>> {
        let origin = grid.first();
        let integrand = |s: f64| model.rate(s);

        match self.strategy {
            AccumulationStrategy::Direct => grid
                .points()
                .iter()
                .enumerate()
                .map(|(index, &t)| {
                    self.quadrature
                        .integrate(integrand, origin, t)
                        .map(|r| r.value)
                        .map_err(|source| MonitorError::Integration { index, time: t, source })
                })
                .collect(),

            AccumulationStrategy::Segmented => {
                let mut accumulated = Vec::with_capacity(grid.len());
                let mut running = 0.0;
                accumulated.push(running);

                for (offset, (lower, upper)) in grid.segments().enumerate() {
                    let segment = self
                        .quadrature
                        .integrate(integrand, lower, upper)
                        .map_err(|source| MonitorError::Integration {
                            index: offset + 1,
                            time: upper,
                            source,
                        })?;
                    running += segment.value;
                    accumulated.push(running);
                }

                debug!(segments = grid.len() - 1, "Segmented accumulation complete");
                Ok(accumulated)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IntegrationError;
    use crate::model::FlowParams;
    use proptest::prelude::*;

    /// Antiderivative of A·e^(k·t)·sin(ω·t) with V(0) = 0
    fn exact_volume(t: f64) -> f64 {
        let (a, k, w) = (600.0, 0.15, 0.7);
        a * ((k * t).exp() * (k * (w * t).sin() - w * (w * t).cos()) + w) / (k * k + w * w)
    }

    fn agrees_to_4_digits(value: f64, reference: f64) -> bool {
        (value - reference).abs() <= 5e-5 * reference.abs().max(1.0)
    }

    #[test]
    fn test_volume_at_origin_is_zero() {
        let series = VolumeAggregator::default()
            .aggregate(&FlowModel::default(), &TimeGrid::standard())
            .unwrap();

        assert_eq!(series.accumulated()[0], 0.0);
        assert_eq!(series.net()[0], 0.0);
    }

    #[test]
    fn test_direct_matches_antiderivative() {
        let grid = TimeGrid::standard();
        let series = VolumeAggregator::default()
            .aggregate(&FlowModel::default(), &grid)
            .unwrap();

        for (i, &t) in grid.points().iter().enumerate() {
            assert!(
                agrees_to_4_digits(series.accumulated()[i], exact_volume(t)),
                "t = {t}: {} vs {}",
                series.accumulated()[i],
                exact_volume(t)
            );
        }
    }

    #[test]
    fn test_segmented_matches_direct() {
        let grid = TimeGrid::standard();
        let model = FlowModel::default();

        let direct = VolumeAggregator::default().aggregate(&model, &grid).unwrap();
        let segmented = VolumeAggregator::new(Quadrature::default(), AccumulationStrategy::Segmented)
            .aggregate(&model, &grid)
            .unwrap();

        for (d, s) in direct.accumulated().iter().zip(segmented.accumulated()) {
            assert!(agrees_to_4_digits(*s, *d));
        }
    }

    #[test]
    fn test_final_net_volume() {
        let series = VolumeAggregator::default()
            .aggregate(&FlowModel::default(), &TimeGrid::standard())
            .unwrap();

        let reference = exact_volume(20.0) - 50.0 * 20.0;
        assert!(agrees_to_4_digits(series.final_net(), reference));
        assert!((series.final_net() - 1062.857).abs() < 0.01);
        assert_eq!(series.final_net(), *series.net().last().unwrap());
    }

    #[test]
    fn test_net_subtracts_drain() {
        let series = VolumeSeries::from_accumulated(
            vec![0.0, 1.0, 2.0],
            vec![0.0, 100.0, 150.0],
            50.0,
        )
        .unwrap();

        assert_eq!(series.net(), &[0.0, 50.0, 50.0]);
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let result = VolumeSeries::from_accumulated(vec![0.0, 1.0], vec![0.0], 50.0);
        assert!(matches!(
            result,
            Err(MonitorError::LengthMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn test_empty_series_rejected() {
        let result = VolumeSeries::from_accumulated(vec![], vec![], 50.0);
        assert!(matches!(result, Err(MonitorError::EmptySeries)));
    }

    #[test]
    fn test_integration_failure_propagates() {
        let grid = TimeGrid::linspace(0.0, 20.0, 3).unwrap();
        let quadrature = Quadrature::new(1e-15, 1);
        let result = VolumeAggregator::new(quadrature, AccumulationStrategy::Direct)
            .aggregate(&FlowModel::default(), &grid);

        match result {
            Err(MonitorError::Integration { index, source, .. }) => {
                assert_eq!(index, 1);
                assert!(matches!(source, IntegrationError::NotConverged { .. }));
            }
            other => panic!("expected integration failure, got {other:?}"),
        }
    }

    #[test]
    fn test_no_exceedance_for_standard_model() {
        let series = VolumeAggregator::default()
            .aggregate(&FlowModel::default(), &TimeGrid::standard())
            .unwrap();

        assert!(series.exceedance_intervals(8000.0).is_empty());
    }

    #[test]
    fn test_exceedance_interval_interpolated() {
        let series = VolumeSeries::from_accumulated(
            vec![0.0, 1.0, 2.0, 3.0, 4.0],
            vec![0.0, 100.0, 300.0, 100.0, 0.0],
            0.0,
        )
        .unwrap();

        let intervals = series.exceedance_intervals(200.0);
        assert_eq!(intervals.len(), 1);
        assert!((intervals[0].start - 1.5).abs() < 1e-12);
        assert!((intervals[0].end - 2.5).abs() < 1e-12);
        assert_eq!(intervals[0].peak, 300.0);
        assert!((intervals[0].duration() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_exceedance_open_at_edges() {
        let series = VolumeSeries::from_accumulated(
            vec![0.0, 1.0, 2.0, 3.0],
            vec![500.0, 100.0, 100.0, 500.0],
            0.0,
        )
        .unwrap();

        let intervals = series.exceedance_intervals(200.0);
        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[0].start, 0.0);
        assert_eq!(intervals[1].end, 3.0);
    }

    #[test]
    fn test_amplified_model_exceeds_limit() {
        let model = FlowModel::new(FlowParams { amplitude: 6000.0, ..FlowParams::default() });
        let series = VolumeAggregator::default()
            .aggregate(&model, &TimeGrid::standard())
            .unwrap();

        assert!(series.final_net() > 8000.0);
        let intervals = series.exceedance_intervals(8000.0);
        assert!(!intervals.is_empty());
        assert_eq!(intervals.last().unwrap().end, 20.0);
    }

    proptest! {
        #[test]
        fn prop_net_non_increasing_in_drain(
            accumulated in proptest::collection::vec(-1e4f64..1e4, 1..50),
            low in 0.0f64..100.0,
            extra in 0.0f64..100.0,
        ) {
            let times: Vec<f64> = (0..accumulated.len()).map(|i| i as f64 * 0.5).collect();
            let slow = VolumeSeries::from_accumulated(times.clone(), accumulated.clone(), low).unwrap();
            let fast = VolumeSeries::from_accumulated(times, accumulated, low + extra).unwrap();

            for (s, f) in slow.net().iter().zip(fast.net()) {
                prop_assert!(f <= s);
            }
        }
    }
}

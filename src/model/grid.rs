use crate::constants::{SAMPLE_COUNT, TIME_END, TIME_START};
use crate::error::{MonitorError, Result};
use serde::Serialize;

/// Evenly spaced sample times over a closed interval
///
/// Built once and never mutated. The last sample is pinned to `end` so the
/// final grid point is exact regardless of floating-point accumulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeGrid {
    points: Vec<f64>,
    step: f64,
}

impl TimeGrid {
    /// Create a grid of `samples` points over `[start, end]`, endpoints included
    ///
    /// # Arguments
    /// * `start` - First sample time
    /// * `end` - Last sample time
    /// * `samples` - Number of points (at least 2)
    pub fn linspace(start: f64, end: f64, samples: usize) -> Result<Self> {
        if samples < 2 {
            return Err(MonitorError::InvalidGrid(samples));
        }

        Ok(Self::spaced(start, end, samples))
    }

    /// The fixed monitoring grid: 1000 samples over [0, 20]
    pub fn standard() -> Self {
        // SAMPLE_COUNT >= 2, so the validation in linspace cannot fail here
        Self::spaced(TIME_START, TIME_END, SAMPLE_COUNT)
    }

    // Caller guarantees samples >= 2
    fn spaced(start: f64, end: f64, samples: usize) -> Self {
        let step = (end - start) / (samples - 1) as f64;
        let mut points: Vec<f64> = (0..samples)
            .map(|i| start + i as f64 * step)
            .collect();
        points[samples - 1] = end;

        Self { points, step }
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> f64 {
        self.points[0]
    }

    pub fn last(&self) -> f64 {
        self.points[self.points.len() - 1]
    }

    /// Iterate over consecutive `(t_{i-1}, t_i)` pairs
    pub fn segments(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_grid_shape() {
        let grid = TimeGrid::standard();

        assert_eq!(grid.len(), 1000);
        assert_eq!(grid.first(), 0.0);
        assert_eq!(grid.last(), 20.0);
        assert!((grid.step() - 20.0 / 999.0).abs() < 1e-15);
    }

    #[test]
    fn test_grid_is_strictly_increasing() {
        let grid = TimeGrid::standard();

        assert!(grid.points().windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_linspace_matches_standard() {
        let grid = TimeGrid::linspace(0.0, 20.0, 1000).unwrap();
        assert_eq!(grid, TimeGrid::standard());
    }

    #[test]
    fn test_linspace_two_samples_is_endpoints() {
        let grid = TimeGrid::linspace(2.0, 5.0, 2).unwrap();
        assert_eq!(grid.points(), &[2.0, 5.0]);
        assert_eq!(grid.step(), 3.0);
    }

    #[test]
    fn test_linspace_small() {
        let grid = TimeGrid::linspace(0.0, 1.0, 5).unwrap();
        assert_eq!(grid.points(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(grid.segments().count(), 4);
    }

    #[test]
    fn test_linspace_rejects_single_sample() {
        let result = TimeGrid::linspace(0.0, 1.0, 1);
        assert!(matches!(result, Err(MonitorError::InvalidGrid(1))));
    }
}

use crate::constants::{FLOW_AMPLITUDE, FLOW_FREQUENCY, FLOW_GROWTH_RATE};
use crate::model::TimeGrid;
use serde::{Deserialize, Serialize};

/// Coefficients of the flow-rate curve `f(t) = A · e^(k·t) · sin(ω·t)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowParams {
    /// Amplitude `A` (L/min)
    pub amplitude: f64,

    /// Exponential growth rate `k` (1/min)
    pub growth_rate: f64,

    /// Angular frequency `ω` (rad/min)
    pub frequency: f64,
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            amplitude: FLOW_AMPLITUDE,
            growth_rate: FLOW_GROWTH_RATE,
            frequency: FLOW_FREQUENCY,
        }
    }
}

/// Closed-form flow model
///
/// The derivatives are the analytic results of differentiating
/// `A · e^(k·t) · sin(ω·t)`:
///
/// ```text
/// f'(t)  = A · e^(k·t) · (k·sin(ω·t) + ω·cos(ω·t))
/// f''(t) = A · e^(k·t) · ((k² − ω²)·sin(ω·t) + 2kω·cos(ω·t))
/// ```
///
/// Each is reduced once at construction to the form
/// `A · e^(k·t) · (s·sin(ω·t) + c·cos(ω·t))`, so evaluation never
/// approximates by finite differences.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowModel {
    params: FlowParams,
    first: Harmonic,
    second: Harmonic,
}

/// `s·sin(ω·t) + c·cos(ω·t)` coefficients of a derivative
#[derive(Debug, Clone, Copy, PartialEq)]
struct Harmonic {
    sin: f64,
    cos: f64,
}

impl Harmonic {
    /// Differentiate `e^(k·t) · (s·sin(ω·t) + c·cos(ω·t))` once
    fn differentiate(self, k: f64, w: f64) -> Self {
        Self {
            sin: k * self.sin - w * self.cos,
            cos: k * self.cos + w * self.sin,
        }
    }
}

impl FlowModel {
    pub fn new(params: FlowParams) -> Self {
        let k = params.growth_rate;
        let w = params.frequency;

        // f itself is e^(k·t) · (1·sin + 0·cos)
        let base = Harmonic { sin: 1.0, cos: 0.0 };
        let first = base.differentiate(k, w);
        let second = first.differentiate(k, w);

        Self { params, first, second }
    }

    pub fn params(&self) -> &FlowParams {
        &self.params
    }

    /// Flow rate `f(t)` (L/min)
    pub fn rate(&self, t: f64) -> f64 {
        self.envelope(t) * (self.params.frequency * t).sin()
    }

    /// Rate of change `f'(t)` (L/min²)
    pub fn derivative(&self, t: f64) -> f64 {
        self.eval(self.first, t)
    }

    /// Curvature `f''(t)` (L/min³)
    pub fn second_derivative(&self, t: f64) -> f64 {
        self.eval(self.second, t)
    }

    /// `f(t)` at every grid point
    pub fn rate_series(&self, grid: &TimeGrid) -> Vec<f64> {
        grid.points().iter().map(|&t| self.rate(t)).collect()
    }

    /// `f'(t)` at every grid point
    pub fn derivative_series(&self, grid: &TimeGrid) -> Vec<f64> {
        grid.points().iter().map(|&t| self.derivative(t)).collect()
    }

    /// `f''(t)` at every grid point
    pub fn second_derivative_series(&self, grid: &TimeGrid) -> Vec<f64> {
        grid.points().iter().map(|&t| self.second_derivative(t)).collect()
    }

    fn envelope(&self, t: f64) -> f64 {
        self.params.amplitude * (self.params.growth_rate * t).exp()
    }

    fn eval(&self, h: Harmonic, t: f64) -> f64 {
        let (sin, cos) = (self.params.frequency * t).sin_cos();
        self.envelope(t) * (h.sin * sin + h.cos * cos)
    }
}

impl Default for FlowModel {
    fn default() -> Self {
        Self::new(FlowParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const H: f64 = 1e-5;

    fn central_difference(f: impl Fn(f64) -> f64, t: f64) -> f64 {
        (f(t + H) - f(t - H)) / (2.0 * H)
    }

    #[test]
    fn test_rate_at_origin_is_zero() {
        let model = FlowModel::default();
        assert_eq!(model.rate(0.0), 0.0);
    }

    #[test]
    fn test_derivative_at_origin() {
        // f'(0) = A·ω
        let model = FlowModel::default();
        assert!((model.derivative(0.0) - 600.0 * 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_derivative_matches_written_closed_form() {
        let model = FlowModel::default();
        for &t in &[0.5_f64, 3.0, 10.0, 17.25] {
            let expected = 600.0 * (0.15 * t).exp()
                * (0.15 * (0.7 * t).sin() + 0.7 * (0.7 * t).cos());
            assert!((model.derivative(t) - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_derivative_at_ten() {
        let model = FlowModel::default();
        assert!((model.derivative(10.0) - 1684.0742).abs() < 1e-3);
    }

    #[test]
    fn test_derivative_matches_finite_difference_on_grid() {
        let model = FlowModel::default();
        let grid = TimeGrid::standard();

        for &t in grid.points() {
            let estimate = central_difference(|s| model.rate(s), t);
            let exact = model.derivative(t);
            assert!(
                (exact - estimate).abs() < 1e-3,
                "t = {t}: closed form {exact}, finite difference {estimate}"
            );
        }
    }

    #[test]
    fn test_second_derivative_matches_finite_difference_on_grid() {
        let model = FlowModel::default();
        let grid = TimeGrid::standard();

        for &t in grid.points() {
            let estimate = central_difference(|s| model.derivative(s), t);
            let exact = model.second_derivative(t);
            assert!((exact - estimate).abs() < 1e-3, "t = {t}");
        }
    }

    #[test]
    fn test_series_align_with_grid() {
        let model = FlowModel::default();
        let grid = TimeGrid::standard();

        let rates = model.rate_series(&grid);
        let derivs = model.derivative_series(&grid);
        assert_eq!(rates.len(), grid.len());
        assert_eq!(derivs.len(), grid.len());
        assert_eq!(derivs[500], model.derivative(grid.points()[500]));
    }

    #[test]
    fn test_zero_amplitude_is_flat() {
        let model = FlowModel::new(FlowParams { amplitude: 0.0, ..FlowParams::default() });
        assert_eq!(model.rate(7.0), 0.0);
        assert_eq!(model.derivative(10.0), 0.0);
    }

    proptest! {
        #[test]
        fn prop_derivative_matches_finite_difference(t in 0.0f64..20.0) {
            let model = FlowModel::default();
            let estimate = central_difference(|s| model.rate(s), t);
            prop_assert!((model.derivative(t) - estimate).abs() < 1e-3);
        }

        #[test]
        fn prop_derivative_scales_with_amplitude(t in 0.0f64..20.0, scale in -5.0f64..5.0) {
            let base = FlowModel::default();
            let scaled = FlowModel::new(FlowParams {
                amplitude: FLOW_AMPLITUDE * scale,
                ..FlowParams::default()
            });
            prop_assert!((scaled.derivative(t) - scale * base.derivative(t)).abs() < 1e-6);
        }
    }
}

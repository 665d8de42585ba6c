use crate::error::IntegrationError;
use serde::{Deserialize, Serialize};

/// Default absolute and relative error tolerance
pub const DEFAULT_TOLERANCE: f64 = 1.49e-8;

/// Default cap on the number of subintervals
pub const DEFAULT_SUBDIVISION_LIMIT: usize = 50;

// 15-point Kronrod abscissae on [0, 1]; odd indices are the 7-point Gauss nodes
const XGK: [f64; 8] = [
    0.991_455_371_120_812_639_206_854_697_526_329,
    0.949_107_912_342_758_524_526_189_684_047_851,
    0.864_864_423_359_769_072_789_712_788_640_926,
    0.741_531_185_599_394_439_863_864_773_280_788,
    0.586_087_235_467_691_130_294_144_845_693_013,
    0.405_845_151_377_397_166_906_606_412_076_961,
    0.207_784_955_007_898_467_600_689_403_773_245,
    0.0,
];

const WGK: [f64; 8] = [
    0.022_935_322_010_529_224_963_732_008_058_970,
    0.063_092_092_629_978_553_290_700_663_189_204,
    0.104_790_010_322_250_183_839_876_322_541_518,
    0.140_653_259_715_525_918_745_189_590_510_238,
    0.169_004_726_639_267_902_826_583_426_598_550,
    0.190_350_578_064_785_409_913_256_402_421_014,
    0.204_432_940_075_298_892_414_161_999_234_649,
    0.209_482_141_084_727_828_012_999_174_891_714,
];

const WG: [f64; 4] = [
    0.129_484_966_168_869_693_270_611_432_679_082,
    0.279_705_391_489_276_667_901_467_771_423_780,
    0.381_830_050_505_118_944_950_369_775_488_975,
    0.417_959_183_673_469_387_755_102_040_816_327,
];

/// Tolerances for adaptive Gauss–Kronrod quadrature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quadrature {
    /// Absolute error target
    pub abs_tolerance: f64,

    /// Relative error target
    pub rel_tolerance: f64,

    /// Maximum number of subintervals before giving up
    pub subdivision_limit: usize,
}

impl Default for Quadrature {
    fn default() -> Self {
        Self {
            abs_tolerance: DEFAULT_TOLERANCE,
            rel_tolerance: DEFAULT_TOLERANCE,
            subdivision_limit: DEFAULT_SUBDIVISION_LIMIT,
        }
    }
}

/// Outcome of a converged quadrature
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureResult {
    pub value: f64,
    pub error_estimate: f64,
    pub subintervals: usize,
    pub evaluations: usize,
}

/// One subinterval with its Kronrod estimate and error bound
#[derive(Debug, Clone, Copy)]
struct Panel {
    lower: f64,
    upper: f64,
    value: f64,
    error: f64,
}

impl Quadrature {
    pub fn new(tolerance: f64, subdivision_limit: usize) -> Self {
        Self {
            abs_tolerance: tolerance,
            rel_tolerance: tolerance,
            subdivision_limit,
        }
    }

    /// Integrate `f` over `[lower, upper]`
    ///
    /// Globally adaptive: the panel with the largest error estimate is
    /// bisected until the summed error is within
    /// `max(abs_tolerance, rel_tolerance · |integral|)`.
    /// An empty interval integrates to exactly zero without evaluating `f`.
    pub fn integrate<F>(&self, f: F, lower: f64, upper: f64) -> Result<QuadratureResult, IntegrationError>
    where
        F: Fn(f64) -> f64,
    {
        if !lower.is_finite() || !upper.is_finite() || upper < lower {
            return Err(IntegrationError::InvalidInterval { lower, upper });
        }

        if lower == upper {
            return Ok(QuadratureResult {
                value: 0.0,
                error_estimate: 0.0,
                subintervals: 0,
                evaluations: 0,
            });
        }

        let mut panels = vec![kronrod_panel(&f, lower, upper)?];
        let mut evaluations = 15;

        loop {
            let value: f64 = panels.iter().map(|p| p.value).sum();
            let error: f64 = panels.iter().map(|p| p.error).sum();
            let target = self.abs_tolerance.max(self.rel_tolerance * value.abs());

            if error <= target {
                return Ok(QuadratureResult {
                    value,
                    error_estimate: error,
                    subintervals: panels.len(),
                    evaluations,
                });
            }

            if panels.len() >= self.subdivision_limit {
                return Err(IntegrationError::NotConverged {
                    lower,
                    upper,
                    subdivisions: panels.len(),
                    error_estimate: error,
                });
            }

            // Bisect the worst panel
            let worst = panels
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.error.total_cmp(&b.error))
                .map(|(i, _)| i)
                .unwrap_or(0);
            let panel = panels.swap_remove(worst);
            let mid = 0.5 * (panel.lower + panel.upper);

            panels.push(kronrod_panel(&f, panel.lower, mid)?);
            panels.push(kronrod_panel(&f, mid, panel.upper)?);
            evaluations += 30;
        }
    }
}

/// 15-point Kronrod estimate with the embedded 7-point Gauss rule as error gauge
fn kronrod_panel<F>(f: &F, lower: f64, upper: f64) -> Result<Panel, IntegrationError>
where
    F: Fn(f64) -> f64,
{
    let eval = |t: f64| {
        let y = f(t);
        if y.is_finite() {
            Ok(y)
        } else {
            Err(IntegrationError::NonFinite { at: t })
        }
    };

    let center = 0.5 * (lower + upper);
    let half = 0.5 * (upper - lower);

    let fc = eval(center)?;
    let mut res_gauss = fc * WG[3];
    let mut res_kronrod = fc * WGK[7];
    let mut res_abs = res_kronrod.abs();

    let mut left = [0.0; 7];
    let mut right = [0.0; 7];

    for j in 0..7 {
        let offset = half * XGK[j];
        let f1 = eval(center - offset)?;
        let f2 = eval(center + offset)?;
        left[j] = f1;
        right[j] = f2;

        let sum = f1 + f2;
        res_kronrod += WGK[j] * sum;
        res_abs += WGK[j] * (f1.abs() + f2.abs());
        if j % 2 == 1 {
            res_gauss += WG[j / 2] * sum;
        }
    }

    let mean = 0.5 * res_kronrod;
    let mut res_asc = WGK[7] * (fc - mean).abs();
    for j in 0..7 {
        res_asc += WGK[j] * ((left[j] - mean).abs() + (right[j] - mean).abs());
    }

    let value = res_kronrod * half;
    let res_abs = res_abs * half.abs();
    let res_asc = res_asc * half.abs();
    let mut error = ((res_kronrod - res_gauss) * half).abs();

    if res_asc != 0.0 && error != 0.0 {
        error = res_asc * (200.0 * error / res_asc).powf(1.5).min(1.0);
    }
    if res_abs > f64::MIN_POSITIVE / (50.0 * f64::EPSILON) {
        error = error.max(50.0 * f64::EPSILON * res_abs);
    }

    Ok(Panel { lower, upper, value, error })
}

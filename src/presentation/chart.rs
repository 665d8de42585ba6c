use crate::monitor::ChartSeries;
use crate::volume::ExceedanceInterval;
use std::fmt::Write;

const POINT: char = '*';
const LIMIT: char = '-';
const SHADE: char = '#';

/// Terminal line charts for the three monitoring panels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextChart {
    /// Plot columns (excluding the axis gutter), at least 8
    width: usize,

    /// Plot rows per panel, at least 4
    height: usize,
}

impl Default for TextChart {
    fn default() -> Self {
        Self { width: 72, height: 12 }
    }
}

// Smallest canvas the axis labels fit on
const MIN_WIDTH: usize = 8;
const MIN_HEIGHT: usize = 4;

impl TextChart {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width.max(MIN_WIDTH),
            height: height.max(MIN_HEIGHT),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Flow, derivative and net-volume panels stacked vertically
    ///
    /// The net-volume panel draws the limit as a dashed row and shades the
    /// columns where the volume sits above it.
    pub fn render(&self, series: &ChartSeries<'_>, exceedance: &[ExceedanceInterval]) -> String {
        let mut out = String::new();

        out.push_str("=== Flood risk monitoring ===\n\n");
        out.push_str(&self.panel("Water flow rate", "L/min", series.times, series.flow, None));
        out.push('\n');
        out.push_str(&self.panel("Flow rate derivative", "L/min²", series.times, series.derivative, None));
        out.push('\n');
        out.push_str(&self.panel(
            "Accumulated water volume",
            "L",
            series.times,
            series.net_volume,
            Some(series.volume_limit),
        ));

        if exceedance.is_empty() {
            let _ = writeln!(out, "Net volume stays below the critical limit ({:.0} L).", series.volume_limit);
        } else {
            for interval in exceedance {
                let _ = writeln!(
                    out,
                    "Above limit from t={:.2} to t={:.2} min (peak {:.2} L)",
                    interval.start, interval.end, interval.peak
                );
            }
        }

        out
    }

    /// Render a single panel
    pub fn panel(&self, title: &str, unit: &str, times: &[f64], values: &[f64], limit: Option<f64>) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{title} ({unit})");

        if values.is_empty() || times.len() != values.len() {
            out.push_str("  (no data)\n");
            return out;
        }

        // 1. Resample to one value per column
        let columns: Vec<f64> = (0..self.width)
            .map(|c| {
                let idx = c * (values.len() - 1) / (self.width - 1).max(1);
                values[idx.min(values.len() - 1)]
            })
            .collect();

        // 2. Vertical range covers the data and the limit line
        let mut lo = columns.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = columns.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if let Some(limit) = limit {
            lo = lo.min(limit);
            hi = hi.max(limit);
        }
        if hi - lo < f64::EPSILON {
            hi = lo + 1.0;
        }

        let row_of = |v: f64| -> usize {
            let frac = (hi - v) / (hi - lo);
            ((frac * (self.height - 1) as f64).round() as usize).min(self.height - 1)
        };

        // 3. Paint the grid
        let mut canvas = vec![vec![' '; self.width]; self.height];
        let limit_row = limit.map(row_of);

        if let Some(row) = limit_row {
            for cell in canvas[row].iter_mut() {
                *cell = LIMIT;
            }
        }

        for (c, &v) in columns.iter().enumerate() {
            let row = row_of(v);
            if let (Some(limit), Some(lrow)) = (limit, limit_row) {
                if v > limit {
                    for line in canvas.iter_mut().take(lrow).skip(row + 1) {
                        line[c] = SHADE;
                    }
                }
            }
            canvas[row][c] = POINT;
        }

        // 4. Emit with a value gutter on the first and last rows
        for (r, line) in canvas.iter().enumerate() {
            let label = if r == 0 {
                format!("{hi:>10.1}")
            } else if r == self.height - 1 {
                format!("{lo:>10.1}")
            } else if Some(r) == limit_row {
                format!("{:>10.1}", limit.unwrap_or_default())
            } else {
                " ".repeat(10)
            };
            let _ = writeln!(out, "{label} |{}", line.iter().collect::<String>());
        }

        let _ = writeln!(
            out,
            "{} +{}",
            " ".repeat(10),
            "-".repeat(self.width)
        );
        let first = times[0];
        let last = times[times.len() - 1];
        let _ = writeln!(
            out,
            "{}  {:<w$}{:>8}",
            " ".repeat(10),
            format!("{first:.0}"),
            format!("{last:.0} min"),
            w = self.width.saturating_sub(8)
        );

        out
    }
}

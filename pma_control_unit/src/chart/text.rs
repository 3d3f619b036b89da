//! Terminal preview: a character grid per panel with min/max labels.

use std::fmt;

use pma_common::consts::{DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH};

use super::{Trace, control_traces, finite_range, output_traces};
use crate::cycle::SimulationResult;

/// Width of the y-axis label column.
const LABEL_WIDTH: usize = 11;

/// Preview size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOptions {
    /// Plot columns (>= 2).
    pub width: usize,
    /// Rows per panel (>= 2).
    pub height: usize,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_CHART_WIDTH,
            height: DEFAULT_CHART_HEIGHT,
        }
    }
}

/// Both panels, ready to print.
pub struct TextChart<'a> {
    result: &'a SimulationResult,
    width: usize,
    height: usize,
}

impl<'a> TextChart<'a> {
    pub fn new(result: &'a SimulationResult, options: &ChartOptions) -> Self {
        Self {
            result,
            width: options.width.max(2),
            height: options.height.max(2),
        }
    }

    fn panel(&self, f: &mut fmt::Formatter<'_>, title: &str, traces: &[Trace<'_>]) -> fmt::Result {
        let (width, height) = (self.width, self.height);
        let legend: Vec<String> = traces
            .iter()
            .map(|t| format!("{} {}", t.glyph, t.label))
            .collect();
        writeln!(f, "{title}  [{}]", legend.join("  "))?;

        let Some((lo, hi)) = finite_range(traces) else {
            return writeln!(f, "{:>LABEL_WIDTH$} (no finite samples)", "");
        };
        // Flat series sit in the middle row.
        let (lo, hi) = if hi > lo { (lo, hi) } else { (lo - 1.0, hi + 1.0) };

        let mut grid = vec![vec![' '; width]; height];
        // Later traces are drawn on top.
        for trace in traces {
            let len = trace.samples.len();
            for (i, &v) in trace.samples.iter().enumerate() {
                if v.is_finite() {
                    grid[row(v, lo, hi, height)][column(i, len, width)] = trace.glyph;
                }
            }
        }

        for (r, cells) in grid.iter().enumerate() {
            let label = if r == 0 {
                format!("{hi:.4e}")
            } else if r == height - 1 {
                format!("{lo:.4e}")
            } else {
                String::new()
            };
            let line: String = cells.iter().collect();
            writeln!(f, "{label:>LABEL_WIDTH$} |{}", line.trim_end())?;
        }
        let t_end = self.result.time.last().copied().unwrap_or(0.0);
        writeln!(f, "{:>LABEL_WIDTH$} +{}", "", "-".repeat(width))?;
        writeln!(
            f,
            "{:>LABEL_WIDTH$}  0{:>pad$}",
            "",
            format!("{t_end:.3e} s"),
            pad = width.saturating_sub(1)
        )
    }
}

impl fmt::Display for TextChart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.panel(f, "output", &output_traces(self.result))?;
        writeln!(f)?;
        self.panel(f, "control", &control_traces(self.result))
    }
}

/// Render both panels and their legends as a string.
pub fn render_chart(result: &SimulationResult, options: &ChartOptions) -> String {
    TextChart::new(result, options).to_string()
}

#[inline]
fn column(i: usize, len: usize, width: usize) -> usize {
    if len <= 1 {
        0
    } else {
        i * (width - 1) / (len - 1)
    }
}

#[inline]
fn row(v: f64, lo: f64, hi: f64, height: usize) -> usize {
    let frac = (hi - v) / (hi - lo);
    let r = (frac * (height - 1) as f64).round() as usize;
    r.min(height - 1)
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::RunStatus;

    fn result(output: Vec<f64>, control: Vec<f64>) -> SimulationResult {
        let n = output.len();
        SimulationResult {
            time: (0..n).map(|k| k as f64 * 1e-5).collect(),
            reference: vec![1.0; n],
            measured: vec![0.0; n],
            output,
            control,
            internal_reference: vec![0.0; n],
            tracking_error: vec![0.0; n],
            accumulator: vec![0.0; n],
            integrated_error: vec![0.0; n],
            trapezoid: vec![0.0; n],
            state: vec![0.0; n],
            status: RunStatus::Completed,
            divergence: None,
        }
    }

    fn opts() -> ChartOptions {
        ChartOptions {
            width: 20,
            height: 5,
        }
    }

    #[test]
    fn panel_layout() {
        let r = result(vec![0.0, 0.5, 1.0], vec![0.0, 1.0, 2.0]);
        let chart = render_chart(&r, &opts());
        let lines: Vec<&str> = chart.lines().collect();
        // Per panel: title + rows + axis + time labels; one blank separator.
        assert_eq!(lines.len(), 2 * (1 + 5 + 2) + 1);
        assert!(lines[0].starts_with("output"));
        assert!(lines[9].starts_with("control"));
    }

    #[test]
    fn min_max_labels() {
        let r = result(vec![0.0, 2.0], vec![-3.0, 4.0]);
        let chart = render_chart(&r, &opts());
        assert!(chart.contains("2.0000e0"));
        assert!(chart.contains("-3.0000e0"));
        assert!(chart.contains("4.0000e0"));
    }

    #[test]
    fn non_finite_samples_skipped() {
        let r = result(vec![0.0, f64::NAN, 1.0], vec![f64::INFINITY; 3]);
        let chart = render_chart(&r, &opts());
        assert!(!chart.contains("NaN"));
        assert!(chart.contains("(no finite samples)"));
    }

    #[test]
    fn tiny_options_clamped() {
        let r = result(vec![0.0, 1.0], vec![0.0, 1.0]);
        let chart = render_chart(
            &r,
            &ChartOptions {
                width: 0,
                height: 0,
            },
        );
        assert!(chart.contains('*'));
    }
}

//! Image rendering with `plotters`.
//!
//! SVG is always available. PNG needs the `png` feature, which pulls in
//! the bitmap encoder and TrueType font rendering.

use std::fmt;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use pma_common::consts::{DEFAULT_PLOT_HEIGHT, DEFAULT_PLOT_WIDTH};
use thiserror::Error;
use tracing::debug;

use super::{Trace, control_traces, finite_range, output_traces};
use crate::cycle::SimulationResult;

/// Smallest accepted image edge in pixels.
const MIN_PLOT_SIZE: u32 = 200;

/// Vertical headroom above and below the data, as a fraction of its span.
const Y_PAD: f64 = 0.05;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlotError {
    #[error("Unsupported plot format: {0}")]
    UnsupportedFormat(String),
    #[error("Plot drawing failed: {0}")]
    Drawing(String),
}

fn drawing_error<E: fmt::Display>(e: E) -> PlotError {
    PlotError::Drawing(e.to_string())
}

/// Image size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_PLOT_WIDTH,
            height: DEFAULT_PLOT_HEIGHT,
        }
    }
}

impl PlotOptions {
    #[inline]
    fn size(&self) -> (u32, u32) {
        (
            self.width.max(MIN_PLOT_SIZE),
            self.height.max(MIN_PLOT_SIZE),
        )
    }
}

/// Output encoding, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotFormat {
    Svg,
    #[cfg(feature = "png")]
    Png,
}

impl PlotFormat {
    pub fn from_path(path: &Path) -> Result<Self, PlotError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "svg" => Ok(Self::Svg),
            #[cfg(feature = "png")]
            "png" => Ok(Self::Png),
            _ => Err(PlotError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Draw both panels into `path`. The format follows the extension.
pub fn save_plot(
    result: &SimulationResult,
    path: &Path,
    options: &PlotOptions,
) -> Result<(), PlotError> {
    let format = PlotFormat::from_path(path)?;
    let size = options.size();
    match format {
        PlotFormat::Svg => draw(SVGBackend::new(path, size).into_drawing_area(), result)?,
        #[cfg(feature = "png")]
        PlotFormat::Png => draw(BitMapBackend::new(path, size).into_drawing_area(), result)?,
    }
    debug!(path = %path.display(), ?format, width = size.0, height = size.1, "plot written");
    Ok(())
}

fn draw<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    result: &SimulationResult,
) -> Result<(), PlotError> {
    root.fill(&WHITE).map_err(drawing_error)?;
    let panels = root.split_evenly((2, 1));
    let t_end = result
        .time
        .last()
        .copied()
        .filter(|t| t.is_finite() && *t > 0.0)
        .unwrap_or(1.0);

    if let [top, bottom] = panels.as_slice() {
        draw_panel(top, "output", &result.time, t_end, &output_traces(result))?;
        draw_panel(bottom, "control", &result.time, t_end, &control_traces(result))?;
    }
    root.present().map_err(drawing_error)
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    time: &[f64],
    t_end: f64,
    traces: &[Trace<'_>],
) -> Result<(), PlotError> {
    let (lo, hi) = finite_range(traces).unwrap_or((-1.0, 1.0));
    let (lo, hi) = if hi > lo { (lo, hi) } else { (lo - 1.0, hi + 1.0) };
    let pad = (hi - lo) * Y_PAD;

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..t_end, (lo - pad)..(hi + pad))
        .map_err(drawing_error)?;

    chart
        .configure_mesh()
        .x_desc("time [s]")
        .x_label_formatter(&|t| format!("{t:.1e}"))
        .y_label_formatter(&|v| format!("{v:.3e}"))
        .draw()
        .map_err(drawing_error)?;

    for trace in traces {
        let color = trace.color;
        let points = time
            .iter()
            .zip(trace.samples)
            .filter(|(t, v)| t.is_finite() && v.is_finite())
            .map(|(&t, &v)| (t, v));
        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))
            .map_err(drawing_error)?
            .label(trace.label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(drawing_error)
}

// ─── Tests ──────────────────────────────────────────────────────────

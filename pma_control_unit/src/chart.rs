//! Rendering of a finished run.
//!
//! Two stacked panels over the time axis:
//!
//! - **top**: reference, true output and measured output
//! - **bottom**: control signal
//!
//! [`plot`] draws them with `plotters` into an image file; [`text`] prints
//! a coarse terminal preview. Both skip non-finite samples and only read
//! the [`SimulationResult`].

pub mod plot;
pub mod text;

pub use plot::{PlotError, PlotFormat, PlotOptions, save_plot};
pub use text::{ChartOptions, render_chart};

use plotters::style::RGBColor;

use crate::cycle::SimulationResult;

/// One plotted series.
pub(crate) struct Trace<'a> {
    pub label: &'static str,
    /// Terminal marker.
    pub glyph: char,
    /// Image line color.
    pub color: RGBColor,
    pub samples: &'a [f64],
}

/// Top panel: reference, measured and true output (drawn in that order).
pub(crate) fn output_traces(result: &SimulationResult) -> [Trace<'_>; 3] {
    [
        Trace {
            label: "reference",
            glyph: '-',
            color: RGBColor(120, 120, 120),
            samples: &result.reference,
        },
        Trace {
            label: "measured",
            glyph: '.',
            color: RGBColor(230, 120, 20),
            samples: &result.measured,
        },
        Trace {
            label: "output",
            glyph: '*',
            color: RGBColor(30, 90, 200),
            samples: &result.output,
        },
    ]
}

/// Bottom panel: control signal.
pub(crate) fn control_traces(result: &SimulationResult) -> [Trace<'_>; 1] {
    [Trace {
        label: "control",
        glyph: '#',
        color: RGBColor(200, 40, 40),
        samples: &result.control,
    }]
}

/// Min/max over every finite sample of every trace.
pub(crate) fn finite_range(traces: &[Trace<'_>]) -> Option<(f64, f64)> {
    traces
        .iter()
        .flat_map(|t| t.samples.iter().copied())
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

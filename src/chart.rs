//! Chart spec assembly: align → transform → plan the axis → attach render hints.
//!
//! The result is an immutable [`ChartSpec`] that any renderer can consume. A new spec is built
//! whenever an input changes (series, mode, container size); nothing is patched in place.
//!
//! ```
//! use chainplot::chart::{Formatters, assemble};
//! use chainplot::models::{DisplayMode, Series, SeriesColor, SeriesKind};
//!
//! let eth = Series::new("Ethereum", SeriesKind::Area, SeriesColor::solid("#4472C4"))
//!     .with_points([(0, Some(10.0)), (1, Some(20.0))]);
//! let arb = Series::new("Arbitrum", SeriesKind::Area, SeriesColor::solid("#ED7D31"))
//!     .with_points([(1, Some(5.0))]);
//!
//! let spec = assemble(&[eth, arb], DisplayMode::Stacked, 440.0, Formatters::default());
//! assert_eq!(spec.timestamps, vec![0, 1]);
//! assert_eq!(spec.axis.min, 0.0);
//! assert!(spec.axis.max >= 25.0);
//! ```

use crate::align::{AlignedSeries, AlignedSeriesSet, align};
use crate::axis::{AxisPlan, plan_with, requested_tick_count};
use crate::config::ChartConfig;
use crate::format::{ValueFormatter, axis_label_formatter, format_timestamp, tooltip_formatter};
use crate::models::{AxisOverride, DisplayMode, Sample, Series, SeriesKind, Timestamp};
use crate::style::StyleDescriptor;
use crate::transform::transform;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Stack group shared by every series when stacking is active.
pub const STACK_GROUP: &str = "total";

/// Caller-supplied formatters. Missing ones fall back to the locale defaults in
/// [`crate::format`].
#[derive(Clone, Default)]
pub struct Formatters {
    pub axis_label: Option<ValueFormatter>,
    pub tooltip: Option<ValueFormatter>,
}

impl Formatters {
    pub fn with_axis_label<F>(mut self, f: F) -> Self
    where
        F: Fn(f64) -> String + Send + Sync + 'static,
    {
        self.axis_label = Some(Arc::new(f));
        self
    }

    pub fn with_tooltip<F>(mut self, f: F) -> Self
    where
        F: Fn(f64) -> String + Send + Sync + 'static,
    {
        self.tooltip = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for Formatters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatters")
            .field("axis_label", &self.axis_label.is_some())
            .field("tooltip", &self.tooltip.is_some())
            .finish()
    }
}

/// Inputs other than the series themselves.
#[derive(Debug, Clone, Default)]
pub struct ChartOptions {
    pub mode: DisplayMode,
    pub container_height_px: f64,
    pub axis_override: AxisOverride,
    pub config: ChartConfig,
}

impl ChartOptions {
    pub fn new(mode: DisplayMode, container_height_px: f64) -> Self {
        Self {
            mode,
            container_height_px,
            ..Default::default()
        }
    }

    pub fn with_override(mut self, axis_override: AxisOverride) -> Self {
        self.axis_override = axis_override;
        self
    }

    pub fn with_config(mut self, config: ChartConfig) -> Self {
        self.config = config;
        self
    }

    /// Whether series are drawn on top of each other.
    pub fn is_stacked(&self) -> bool {
        match self.mode {
            DisplayMode::Absolute => false,
            DisplayMode::Stacked => true,
            DisplayMode::Percentage => self.config.stack_percentage,
        }
    }
}

/// Per-series instructions for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderHints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_group: Option<String>,
    pub style: StyleDescriptor,
    /// Color for values below zero. `None` means "use the primary color".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_color: Option<String>,
}

impl RenderHints {
    /// Color to paint `value` with.
    pub fn color_for(&self, value: f64) -> &str {
        match &self.negative_color {
            Some(c) if value < 0.0 => c,
            _ => &self.style.primary_color,
        }
    }
}

/// One series as it should be drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlottedSeries {
    pub name: String,
    pub kind: SeriesKind,
    pub values: Vec<Sample>,
    pub hints: RenderHints,
}

/// A tooltip for one timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tooltip {
    pub title: String,
    pub rows: Vec<(String, String)>,
}

/// Everything a renderer needs for one frame.
#[derive(Clone, Serialize)]
pub struct ChartSpec {
    pub mode: DisplayMode,
    pub stacked: bool,
    pub timestamps: Vec<Timestamp>,
    pub series: Vec<PlottedSeries>,
    pub axis: AxisPlan,
    pub tick_labels: Vec<String>,
    #[serde(skip)]
    axis_label: ValueFormatter,
    #[serde(skip)]
    tooltip: ValueFormatter,
}

impl fmt::Debug for ChartSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartSpec")
            .field("mode", &self.mode)
            .field("stacked", &self.stacked)
            .field("timestamps", &self.timestamps)
            .field("series", &self.series)
            .field("axis", &self.axis)
            .field("tick_labels", &self.tick_labels)
            .finish_non_exhaustive()
    }
}

impl ChartSpec {
    /// Axis label text for `v`, via the resolved axis formatter.
    pub fn format_axis(&self, v: f64) -> String {
        (self.axis_label)(v)
    }

    /// Tooltip text for `v`, via the resolved tooltip formatter.
    pub fn format_tooltip(&self, v: f64) -> String {
        (self.tooltip)(v)
    }

    /// Tooltip at axis index `k`. Series without a value there are left out.
    pub fn tooltip_at(&self, k: usize) -> Option<Tooltip> {
        let ts = *self.timestamps.get(k)?;
        let rows = self
            .series
            .iter()
            .filter_map(|s| {
                s.values
                    .get(k)
                    .and_then(|v| v.value())
                    .map(|v| (s.name.clone(), self.format_tooltip(v)))
            })
            .collect();
        Some(Tooltip {
            title: format_timestamp(ts),
            rows,
        })
    }

    pub fn series_by_name(&self, name: &str) -> Option<&PlottedSeries> {
        self.series.iter().find(|s| s.name == name)
    }
}

/// Assemble with default configuration and no manual axis bounds.
pub fn assemble(
    series: &[Series],
    mode: DisplayMode,
    container_height_px: f64,
    formatters: Formatters,
) -> ChartSpec {
    assemble_with(
        series,
        &ChartOptions::new(mode, container_height_px),
        formatters,
    )
}

pub fn assemble_with(series: &[Series], options: &ChartOptions, formatters: Formatters) -> ChartSpec {
    let config = &options.config;
    let mode = options.mode;
    let stacked = options.is_stacked();

    let aligned = align(series);
    let values = transform(&aligned, mode);
    let requested = requested_tick_count(options.container_height_px, config);
    let axis = plan_with(
        config,
        &values,
        mode,
        stacked,
        requested,
        options.axis_override,
    );

    // Largest share last so it renders on top.
    let ordered: AlignedSeriesSet = if mode == DisplayMode::Percentage && !stacked {
        values.sorted_by(|a, b| last_or_min(a).total_cmp(&last_or_min(b)))
    } else {
        values
    };

    let plotted: Vec<PlottedSeries> = ordered
        .series()
        .iter()
        .map(|s| PlottedSeries {
            name: s.name.clone(),
            kind: s.kind,
            values: s.values.clone(),
            hints: render_hints(s, stacked),
        })
        .collect();

    let axis_label = formatters
        .axis_label
        .unwrap_or_else(|| axis_label_formatter(&config.locale, mode));
    let tooltip = formatters
        .tooltip
        .unwrap_or_else(|| tooltip_formatter(&config.locale, mode));
    let tick_labels = axis.ticks().into_iter().map(|t| axis_label(t)).collect();

    log::debug!(
        "assembled {} series, {} timestamps, mode {mode}, stacked {stacked}",
        plotted.len(),
        ordered.len()
    );

    ChartSpec {
        mode,
        stacked,
        timestamps: ordered.timestamps().to_vec(),
        series: plotted,
        axis,
        tick_labels,
        axis_label,
        tooltip,
    }
}

fn last_or_min(s: &AlignedSeries) -> f64 {
    s.last_value().unwrap_or(f64::NEG_INFINITY)
}

fn render_hints(s: &AlignedSeries, stacked: bool) -> RenderHints {
    let has_negative = s.finite_values().any(|v| v < 0.0);
    let negative_color = match s.kind {
        SeriesKind::Bar if has_negative => s.negative_color.clone(),
        _ => None,
    };
    RenderHints {
        stack_group: stacked.then(|| STACK_GROUP.to_string()),
        style: StyleDescriptor::for_series(s.kind, &s.color),
        negative_color,
    }
}

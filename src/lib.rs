//! chainplot
//!
//! Turns independently sampled chain-metric time series (TVL, fees, transaction counts, …)
//! into a renderer-agnostic chart specification. Pairs with the `chainplot` CLI.
//!
//! ### Features
//! - Align series onto one shared timestamp axis, keeping gaps as explicit `NoValue`
//! - Absolute, stacked, and percentage-share display modes
//! - "Nice" value-axis planning sized to the container height
//! - Locale-aware axis and tooltip formatting, renderer-neutral style hints
//! - Load series from JSON/CSV, export specs and aligned tables, render SVG/PNG previews
//!
//! ### Example
//! ```
//! use chainplot::{DisplayMode, Formatters, Series, SeriesColor, SeriesKind, assemble};
//!
//! let fees = Series::new("fees", SeriesKind::Line, SeriesColor::solid("#4472C4"))
//!     .with_points([(0, Some(50.0))]);
//! let spec = assemble(&[fees], DisplayMode::Absolute, 440.0, Formatters::default());
//! assert_eq!((spec.axis.min, spec.axis.max, spec.axis.step), (0.0, 60.0, 10.0));
//! ```

pub mod align;
pub mod axis;
pub mod chart;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod stats;
pub mod storage;
pub mod style;
pub mod transform;
pub mod viz;

pub use align::{AlignedSeriesSet, align};
pub use axis::{AxisPlan, plan};
pub use chart::{ChartOptions, ChartSpec, Formatters, assemble, assemble_with};
pub use config::ChartConfig;
pub use models::{AxisOverride, DisplayMode, Sample, Series, SeriesColor, SeriesKind, TimePoint};
pub use transform::transform;

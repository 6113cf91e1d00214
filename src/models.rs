use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

/// One observation slot: either a finite number or an explicit "no observation" marker.
///
/// `NoValue` is never zero. It keeps its slot on a shared axis (so gaps render as breaks)
/// but is excluded from every sum and extremum.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum Sample {
    Value(f64),
    #[default]
    NoValue,
}

impl Sample {
    /// The finite value, if any.
    #[inline]
    pub fn value(self) -> Option<f64> {
        match self {
            Sample::Value(v) if v.is_finite() => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn is_no_value(self) -> bool {
        self.value().is_none()
    }
}

/// Non-finite numbers are treated as missing.
impl From<f64> for Sample {
    fn from(v: f64) -> Self {
        if v.is_finite() {
            Sample::Value(v)
        } else {
            Sample::NoValue
        }
    }
}

impl From<Option<f64>> for Sample {
    fn from(v: Option<f64>) -> Self {
        v.map(Sample::from).unwrap_or(Sample::NoValue)
    }
}

impl From<Sample> for Option<f64> {
    fn from(s: Sample) -> Self {
        s.value()
    }
}

/// A `(timestamp, value)` pair. Serialized as `[timestamp, value|null]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(Timestamp, Option<f64>)", into = "(Timestamp, Option<f64>)")]
pub struct TimePoint {
    pub timestamp: Timestamp,
    pub value: Sample,
}

impl TimePoint {
    pub fn new(timestamp: Timestamp, value: impl Into<Sample>) -> Self {
        Self {
            timestamp,
            value: value.into(),
        }
    }

    pub fn missing(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            value: Sample::NoValue,
        }
    }
}

impl From<(Timestamp, Option<f64>)> for TimePoint {
    fn from((timestamp, value): (Timestamp, Option<f64>)) -> Self {
        Self::new(timestamp, value)
    }
}

impl From<TimePoint> for (Timestamp, Option<f64>) {
    fn from(p: TimePoint) -> Self {
        (p.timestamp, p.value.value())
    }
}

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    #[default]
    Line,
    Area,
    Bar,
}

impl SeriesKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesKind::Line => "line",
            SeriesKind::Area => "area",
            SeriesKind::Bar => "bar",
        }
    }
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeriesKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "line" => Ok(SeriesKind::Line),
            "area" => Ok(SeriesKind::Area),
            "bar" => Ok(SeriesKind::Bar),
            _ => Err(ParseError::UnknownSeriesKind(s.to_string())),
        }
    }
}

/// Series color: a primary `#RRGGBB` plus an optional secondary (gradient end).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesColor {
    pub primary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
}

impl SeriesColor {
    pub fn solid(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: None,
        }
    }

    pub fn gradient(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: Some(secondary.into()),
        }
    }
}

/// A named, independently sampled time series.
///
/// Contract: `points` is sorted ascending by timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    #[serde(default)]
    pub kind: SeriesKind,
    pub color: SeriesColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_color: Option<String>,
    pub points: Vec<TimePoint>,
}

impl Series {
    pub fn new(name: impl Into<String>, kind: SeriesKind, color: SeriesColor) -> Self {
        Self {
            name: name.into(),
            kind,
            color,
            negative_color: None,
            points: Vec::new(),
        }
    }

    /// Builder: attach points from `(timestamp, value)` pairs (`None` = no observation).
    pub fn with_points<I>(mut self, points: I) -> Self
    where
        I: IntoIterator<Item = (Timestamp, Option<f64>)>,
    {
        self.points = points.into_iter().map(TimePoint::from).collect();
        self
    }

    pub fn with_negative_color(mut self, color: impl Into<String>) -> Self {
        self.negative_color = Some(color.into());
        self
    }

    /// True when timestamps are strictly ascending.
    pub fn is_sorted(&self) -> bool {
        self.points.windows(2).all(|w| w[0].timestamp < w[1].timestamp)
    }
}

/// Which values are plotted and how they relate across series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Absolute,
    Stacked,
    Percentage,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Absolute => "absolute",
            DisplayMode::Stacked => "stacked",
            DisplayMode::Percentage => "percentage",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "absolute" => Ok(DisplayMode::Absolute),
            "stacked" => Ok(DisplayMode::Stacked),
            "percentage" | "percent" => Ok(DisplayMode::Percentage),
            _ => Err(ParseError::UnknownDisplayMode(s.to_string())),
        }
    }
}

/// Manual axis bounds. Any bound present replaces the computed one.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisOverride {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AxisOverride {
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

//! Reading raw series from disk and writing prepared output.
//!
//! Input formats:
//! - **JSON**: an array of series objects
//!   `{"name": "...", "kind": "area", "color": {"primary": "#4472C4"}, "points": [[ts, value|null], ...]}`
//!   (`kind` and `color` optional).
//! - **CSV**: tidy rows `series,timestamp,value[,kind]`; an empty `value` means no observation.
//!
//! Loaded series are sorted by timestamp and get palette colors when none is given.

use crate::align::AlignedSeriesSet;
use crate::chart::ChartSpec;
use crate::models::{Series, SeriesColor, SeriesKind, TimePoint, Timestamp};
use crate::style::{palette_color, parse_hex};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

/// A series as found in an input file.
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesInput {
    pub name: String,
    #[serde(default)]
    pub kind: SeriesKind,
    #[serde(default)]
    pub color: Option<SeriesColor>,
    #[serde(default)]
    pub negative_color: Option<String>,
    #[serde(default)]
    pub points: Vec<TimePoint>,
}

impl SeriesInput {
    /// Validate colors, fill defaults, sort points and drop repeated timestamps (last wins).
    /// `idx` picks the palette color.
    pub fn into_series(self, idx: usize) -> Result<Series> {
        let color = self.color.unwrap_or_else(|| palette_color(idx));
        parse_hex(&color.primary).with_context(|| format!("series `{}`", self.name))?;
        if let Some(c) = color.secondary.as_deref() {
            parse_hex(c).with_context(|| format!("series `{}`", self.name))?;
        }
        if let Some(c) = self.negative_color.as_deref() {
            parse_hex(c).with_context(|| format!("series `{}`", self.name))?;
        }
        let mut points = self.points;
        points.sort_by_key(|p| p.timestamp);
        // repeated timestamps: keep the last point in input order
        points.dedup_by(|later, kept| {
            if later.timestamp == kept.timestamp {
                *kept = *later;
                true
            } else {
                false
            }
        });
        Ok(Series {
            name: self.name,
            kind: self.kind,
            color,
            negative_color: self.negative_color,
            points,
        })
    }
}

fn finish(inputs: Vec<SeriesInput>) -> Result<Vec<Series>> {
    inputs
        .into_iter()
        .enumerate()
        .map(|(i, s)| s.into_series(i))
        .collect()
}

/// Parse series from JSON text.
pub fn parse_series_json(text: &str) -> Result<Vec<Series>> {
    let inputs: Vec<SeriesInput> = serde_json::from_str(text).context("parse series json")?;
    finish(inputs)
}

/// Load series from a JSON file.
pub fn load_series_json<P: AsRef<Path>>(path: P) -> Result<Vec<Series>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let inputs: Vec<SeriesInput> = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse series json {}", path.display()))?;
    finish(inputs)
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    series: String,
    timestamp: Timestamp,
    value: Option<f64>,
    #[serde(default)]
    kind: Option<SeriesKind>,
}

/// Load tidy CSV rows, grouping them per series in first-seen order.
///
/// Rows that fail to parse are skipped with a warning.
pub fn load_series_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Series>> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("open {}", path.display()))?;

    let mut order: HashMap<String, usize> = HashMap::new();
    let mut inputs: Vec<SeriesInput> = Vec::new();
    for (line, row) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = match row {
            Ok(r) => r,
            Err(e) => {
                // +2: header line and 1-based numbering
                log::warn!("{}:{}: skipping row: {}", path.display(), line + 2, e);
                continue;
            }
        };
        let idx = *order.entry(row.series.clone()).or_insert_with(|| {
            inputs.push(SeriesInput {
                name: row.series.clone(),
                kind: row.kind.unwrap_or_default(),
                color: None,
                negative_color: None,
                points: Vec::new(),
            });
            inputs.len() - 1
        });
        inputs[idx]
            .points
            .push(TimePoint::new(row.timestamp, row.value));
    }
    finish(inputs)
}

/// Load by extension: `.csv` is CSV, anything else JSON.
pub fn load_series<P: AsRef<Path>>(path: P) -> Result<Vec<Series>> {
    let path = path.as_ref();
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => load_series_csv(path),
        _ => load_series_json(path),
    }
}

/// Save an aligned set as a wide CSV table: `timestamp,<series...>`, empty cell = no value.
pub fn save_aligned_csv<P: AsRef<Path>>(set: &AlignedSeriesSet, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    let mut header = vec!["timestamp".to_string()];
    header.extend(set.series().iter().map(|s| s.name.clone()));
    wtr.write_record(&header)?;
    for (k, ts) in set.timestamps().iter().enumerate() {
        let mut rec = vec![ts.to_string()];
        rec.extend(
            set.column(k)
                .map(|v| v.value().map(|x| x.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&rec)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save a chart spec as pretty JSON (formatters are not serialized).
pub fn save_spec_json<P: AsRef<Path>>(spec: &ChartSpec, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(spec)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sample;

    #[test]
    fn json_points_are_sorted_and_colored() {
        let series = parse_series_json(
            r##"[{"name": "eth", "points": [[2, 1.0], [1, null]]},
                {"name": "sol", "kind": "bar", "color": {"primary": "#112233"}, "points": []}]"##,
        )
        .unwrap();
        assert_eq!(series[0].points[0], TimePoint::missing(1));
        assert_eq!(series[0].points[1].value, Sample::Value(1.0));
        assert_eq!(series[0].color.primary, "#4472C4");
        assert_eq!(series[1].kind, SeriesKind::Bar);
        assert_eq!(series[1].color.primary, "#112233");
    }

    #[test]
    fn bad_color_is_error() {
        let err = parse_series_json(r##"[{"name": "x", "color": {"primary": "red"}}]"##)
            .unwrap_err();
        assert!(format!("{err:#}").contains("invalid color"));
    }
}

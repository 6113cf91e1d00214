//! Series alignment: merge independently sampled series onto one timestamp axis.

use crate::models::{Sample, Series, SeriesColor, SeriesKind, TimePoint, Timestamp};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Series metadata plus values laid out on the owning set's timestamp axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedSeries {
    pub name: String,
    pub kind: SeriesKind,
    pub color: SeriesColor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_color: Option<String>,
    pub values: Vec<Sample>,
}

impl AlignedSeries {
    /// Last finite value, scanning from the end.
    pub fn last_value(&self) -> Option<f64> {
        self.values.iter().rev().find_map(|s| s.value())
    }

    /// Finite values in axis order.
    pub fn finite_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().filter_map(|s| s.value())
    }

    fn from_series_meta(s: &Series, values: Vec<Sample>) -> Self {
        Self {
            name: s.name.clone(),
            kind: s.kind,
            color: s.color.clone(),
            negative_color: s.negative_color.clone(),
            values,
        }
    }
}

/// A set of series sharing one ascending timestamp axis.
///
/// Invariant: every series holds exactly `timestamps.len()` values. Fields are private so the
/// invariant cannot be broken from outside; use [`align`] or [`AlignedSeriesSet::map_columns`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AlignedSeriesSet {
    timestamps: Vec<Timestamp>,
    series: Vec<AlignedSeries>,
}

impl AlignedSeriesSet {
    pub fn timestamps(&self) -> &[Timestamp] {
        &self.timestamps
    }

    pub fn series(&self) -> &[AlignedSeries] {
        &self.series
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// Points of the series at `idx`, paired with the shared timestamps.
    pub fn points(&self, idx: usize) -> impl Iterator<Item = TimePoint> + '_ {
        let values = self.series.get(idx).map(|s| s.values.as_slice()).unwrap_or(&[]);
        self.timestamps
            .iter()
            .zip(values.iter())
            .map(|(t, v)| TimePoint {
                timestamp: *t,
                value: *v,
            })
    }

    /// Values of every series at axis index `k`.
    pub fn column(&self, k: usize) -> impl Iterator<Item = Sample> + '_ {
        self.series
            .iter()
            .map(move |s| s.values.get(k).copied().unwrap_or_default())
    }

    /// Every finite value across all series.
    pub fn finite_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.series.iter().flat_map(|s| s.finite_values())
    }

    /// Build a new set on the same axis by rewriting each column.
    ///
    /// `f` receives the column at index `k` and must return one sample per series.
    pub fn map_columns<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&[Sample]) -> Vec<Sample>,
    {
        let n = self.series.len();
        let mut out: Vec<Vec<Sample>> = vec![Vec::with_capacity(self.len()); n];
        let mut col: Vec<Sample> = Vec::with_capacity(n);
        for k in 0..self.len() {
            col.clear();
            col.extend(self.column(k));
            let mapped = f(&col);
            debug_assert_eq!(mapped.len(), n, "column mapper must keep series count");
            for (i, v) in mapped.into_iter().enumerate().take(n) {
                out[i].push(v);
            }
        }
        let series = self
            .series
            .iter()
            .zip(out)
            .map(|(s, values)| AlignedSeries {
                values,
                ..s.clone()
            })
            .collect();
        Self {
            timestamps: self.timestamps.clone(),
            series,
        }
    }

    /// Same values, series reordered with a stable sort.
    pub fn sorted_by<F>(&self, mut cmp: F) -> Self
    where
        F: FnMut(&AlignedSeries, &AlignedSeries) -> std::cmp::Ordering,
    {
        let mut series = self.series.clone();
        series.sort_by(|a, b| cmp(a, b));
        Self {
            timestamps: self.timestamps.clone(),
            series,
        }
    }
}

/// Align series onto the sorted, deduplicated union of their timestamps.
///
/// Slots a series has no observation for hold `Sample::NoValue`. A single series with strictly
/// ascending timestamps is wrapped as-is. Each input's points must already be sorted ascending;
/// when a timestamp repeats inside one series, its last point wins.
pub fn align(series: &[Series]) -> AlignedSeriesSet {
    for s in series {
        debug_assert!(
            s.points
                .windows(2)
                .all(|w| w[0].timestamp <= w[1].timestamp),
            "series `{}` points must be sorted by timestamp",
            s.name
        );
    }

    if let [only] = series
        && only.is_sorted()
    {
        return AlignedSeriesSet {
            timestamps: only.points.iter().map(|p| p.timestamp).collect(),
            series: vec![AlignedSeries::from_series_meta(
                only,
                only.points.iter().map(|p| p.value).collect(),
            )],
        };
    }

    let axis: BTreeSet<Timestamp> = series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.timestamp))
        .collect();
    let timestamps: Vec<Timestamp> = axis.into_iter().collect();

    let aligned = series
        .iter()
        .map(|s| {
            let lookup: HashMap<Timestamp, Sample> =
                s.points.iter().map(|p| (p.timestamp, p.value)).collect();
            let values = timestamps
                .iter()
                .map(|t| lookup.get(t).copied().unwrap_or(Sample::NoValue))
                .collect();
            AlignedSeries::from_series_meta(s, values)
        })
        .collect();

    let set = AlignedSeriesSet {
        timestamps,
        series: aligned,
    };
    log::debug!(
        "aligned {} series onto {} timestamps",
        set.series_count(),
        set.len()
    );
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeriesColor;

    fn s(name: &str, pts: &[(i64, Option<f64>)]) -> Series {
        Series::new(name, SeriesKind::Line, SeriesColor::solid("#000000"))
            .with_points(pts.iter().copied())
    }

    #[test]
    fn empty_input_gives_empty_axis() {
        let set = align(&[]);
        assert!(set.is_empty());
        assert_eq!(set.series_count(), 0);

        let set = align(&[s("a", &[]), s("b", &[])]);
        assert!(set.is_empty());
        assert_eq!(set.series_count(), 2);
        assert!(set.series().iter().all(|x| x.values.is_empty()));
    }

    #[test]
    fn single_series_passes_through() {
        let one = s("a", &[(1, Some(1.0)), (3, None), (7, Some(2.0))]);
        let set = align(std::slice::from_ref(&one));
        assert_eq!(set.timestamps(), &[1, 3, 7]);
        let pts: Vec<TimePoint> = set.points(0).collect();
        assert_eq!(pts, one.points);
    }

    #[test]
    fn map_columns_keeps_axis() {
        let set = align(&[s("a", &[(1, Some(1.0))]), s("b", &[(2, Some(2.0))])]);
        let doubled = set.map_columns(|col| {
            col.iter()
                .map(|v| v.value().map(|x| Sample::Value(x * 2.0)).unwrap_or_default())
                .collect()
        });
        assert_eq!(doubled.timestamps(), set.timestamps());
        assert_eq!(doubled.series()[1].values, vec![Sample::NoValue, Sample::Value(4.0)]);
    }
}

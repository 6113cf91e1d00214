//! Display-mode transforms over an aligned set.

use crate::align::AlignedSeriesSet;
use crate::models::{DisplayMode, Sample};

/// Derive the values to plot for `mode`.
///
/// - `Absolute` and `Stacked` return the set unchanged; stacking is applied by the renderer
///   through a shared stack group, and an `AlignedSeriesSet` is aligned by construction.
/// - `Percentage` replaces each value by its share of the column total.
pub fn transform(aligned: &AlignedSeriesSet, mode: DisplayMode) -> AlignedSeriesSet {
    match mode {
        DisplayMode::Absolute | DisplayMode::Stacked => aligned.clone(),
        DisplayMode::Percentage => percentage_shares(aligned),
    }
}

/// Percentage-of-total per timestamp.
///
/// A slot stays `NoValue` when its own value is missing, or when the column total is not
/// positive (a zero total has no defined shares).
pub fn percentage_shares(aligned: &AlignedSeriesSet) -> AlignedSeriesSet {
    aligned.map_columns(|col| {
        let total: f64 = col.iter().filter_map(|s| s.value()).sum();
        col.iter()
            .map(|s| match s.value() {
                Some(v) if total > 0.0 => Sample::from(v / total * 100.0),
                _ => Sample::NoValue,
            })
            .collect()
    })
}

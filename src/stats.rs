use crate::align::AlignedSeriesSet;
use serde::{Deserialize, Serialize};

/// Summary statistics for one aligned series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub name: String,
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub last: Option<f64>,
}

/// Per-series statistics over the shared axis. `missing` counts `NoValue` slots.
pub fn summarize(set: &AlignedSeriesSet) -> Vec<Summary> {
    set.series()
        .iter()
        .map(|s| {
            let mut vals: Vec<f64> = s.finite_values().collect();
            let missing = s.values.len() - vals.len();
            let last = vals.last().copied();
            vals.sort_by(|a, b| a.total_cmp(b));
            let count = vals.len();
            let min = vals.first().copied();
            let max = vals.last().copied();
            let mean = if count > 0 {
                Some(vals.iter().sum::<f64>() / count as f64)
            } else {
                None
            };
            let median = if count == 0 {
                None
            } else if count % 2 == 1 {
                Some(vals[count / 2])
            } else {
                Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
            };
            Summary {
                name: s.name.clone(),
                count,
                missing,
                min,
                max,
                mean,
                median,
                last,
            }
        })
        .collect()
}

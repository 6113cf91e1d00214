//! Value-axis planning: "nice" min/max/step for the plotted values.
//!
//! Steps are drawn from `{1, 2, 5, 10} × 10^n`. All-non-negative data gets a `0..max` range
//! with headroom above the highest point; data with negative values gets a range symmetric
//! around zero. Percentage mode is fixed at `0..100`.

use crate::align::AlignedSeriesSet;
use crate::config::ChartConfig;
use crate::models::{AxisOverride, DisplayMode};
use serde::{Deserialize, Serialize};

const EPS: f64 = 1e-9;
/// Upper bound on generated tick positions.
const TICK_LIMIT: usize = 1_000;

/// Value-axis bounds and tick spacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisPlan {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// Tick count the plan was built for, after clamping.
    pub tick_count: u32,
}

impl AxisPlan {
    /// Tick positions from `min` to `max` inclusive, never past `max`.
    pub fn ticks(&self) -> Vec<f64> {
        if !(self.step > 0.0) || !(self.max > self.min) {
            return vec![self.min];
        }
        if !self.step.is_finite() {
            return vec![self.min, self.max];
        }
        let n = ((self.max - self.min) / self.step)
            .round()
            .min(TICK_LIMIT as f64) as usize;
        let mut out = Vec::with_capacity(n + 1);
        for i in 0..=n {
            let v = (self.min + i as f64 * self.step).min(self.max);
            // snap accumulated error so labels read "0", not "-0.0000000001"
            out.push(if v.abs() < self.step * EPS { 0.0 } else { v });
            if v >= self.max {
                break;
            }
        }
        out
    }
}

/// Lowest and highest value the axis has to show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    pub fn has_negative(&self) -> bool {
        self.min < 0.0
    }

    /// Extent over plain values; non-finite values are skipped. Empty input gives `0..0`.
    pub fn of_values<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if min > max {
            Self { min: 0.0, max: 0.0 }
        } else {
            Self { min, max }
        }
    }

    /// Extent of an aligned set. When `stacked`, the bounds are the stacked ceiling (largest
    /// per-timestamp sum of positive values) and floor (smallest sum of negative values).
    pub fn of_set(set: &AlignedSeriesSet, stacked: bool) -> Self {
        if !stacked {
            return Self::of_values(set.finite_values());
        }
        let mut out = Self { min: 0.0, max: 0.0 };
        for k in 0..set.len() {
            let (mut pos, mut neg) = (0.0f64, 0.0f64);
            // sums saturate at the largest finite float
            for v in set.column(k).filter_map(|s| s.value()) {
                if v >= 0.0 {
                    pos = (pos + v).min(f64::MAX);
                } else {
                    neg = (neg + v).max(f64::MIN);
                }
            }
            out.max = out.max.max(pos);
            out.min = out.min.min(neg);
        }
        out
    }
}

/// Requested tick count for a container height, clamped into the configured range.
pub fn requested_tick_count(container_height_px: f64, config: &ChartConfig) -> u32 {
    let h = if container_height_px.is_finite() {
        container_height_px.max(0.0)
    } else {
        0.0
    };
    config.clamp_ticks((h / config.px_per_tick).round() as i64)
}

/// Snap a raw step to the nearest nice number at or above it.
///
/// Normalized to `[1, 10)`: `>5 → 10`, `>2 → 5`, `>1 → 2`, else `1`. Saturates at `f64::MAX`.
pub fn nice_step(raw: f64) -> f64 {
    if !(raw.is_finite() && raw > 0.0) {
        return 1.0;
    }
    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    let normalized = raw / magnitude;
    let multiplier = if normalized > 5.0 + EPS {
        10.0
    } else if normalized > 2.0 + EPS {
        5.0
    } else if normalized > 1.0 + EPS {
        2.0
    } else {
        1.0
    };
    (multiplier * magnitude).min(f64::MAX)
}

/// Plan with default configuration and no manual bounds.
pub fn plan(
    set: &AlignedSeriesSet,
    mode: DisplayMode,
    stacked: bool,
    requested_ticks: u32,
) -> AxisPlan {
    plan_with(
        &ChartConfig::default(),
        set,
        mode,
        stacked,
        requested_ticks,
        AxisOverride::default(),
    )
}

/// Plan for plain (unstacked) values.
pub fn plan_values(values: &[f64], mode: DisplayMode, requested_ticks: u32) -> AxisPlan {
    plan_extent(
        &ChartConfig::default(),
        Extent::of_values(values.iter().copied()),
        mode,
        requested_ticks,
        AxisOverride::default(),
    )
}

/// Plan for an aligned set.
pub fn plan_with(
    config: &ChartConfig,
    set: &AlignedSeriesSet,
    mode: DisplayMode,
    stacked: bool,
    requested_ticks: u32,
    overrides: AxisOverride,
) -> AxisPlan {
    plan_extent(
        config,
        Extent::of_set(set, stacked),
        mode,
        requested_ticks,
        overrides,
    )
}

/// Plan for a precomputed extent. Deterministic in all inputs.
pub fn plan_extent(
    config: &ChartConfig,
    extent: Extent,
    mode: DisplayMode,
    requested_ticks: u32,
    overrides: AxisOverride,
) -> AxisPlan {
    let ticks = config.clamp_ticks(requested_ticks as i64);

    let computed = if mode == DisplayMode::Percentage {
        AxisPlan {
            min: 0.0,
            max: 100.0,
            step: 100.0 / (ticks.max(2) - 1) as f64,
            tick_count: ticks,
        }
    } else if !extent.has_negative() {
        positive_plan(extent.max.max(0.0), ticks, config.headroom)
    } else if overrides.is_empty() {
        symmetric_plan(extent, ticks, config.headroom)
    } else {
        spanning_plan(extent, ticks, config.headroom)
    };

    let planned = apply_override(computed, overrides);
    log::debug!(
        "axis plan ({mode}, ticks {requested_ticks}->{ticks}): min={} max={} step={}",
        planned.min,
        planned.max,
        planned.step
    );
    planned
}

fn positive_plan(max_value: f64, ticks: u32, headroom: f64) -> AxisPlan {
    let step = nice_step(max_value.max(1.0) / ticks as f64);
    let max = step.max(headroom_ceil(max_value, step, headroom));
    AxisPlan {
        min: 0.0,
        max,
        step,
        tick_count: ticks,
    }
}

fn symmetric_plan(extent: Extent, ticks: u32, headroom: f64) -> AxisPlan {
    let max_abs = extent.min.abs().max(extent.max.abs()).max(1.0);
    let per_side = (ticks / 2).max(1);
    let step = nice_step(max_abs / per_side as f64);
    let rounded = step.max(headroom_ceil(max_abs, step, headroom));
    AxisPlan {
        min: -rounded,
        max: rounded,
        step,
        tick_count: ticks,
    }
}

/// Signed data with manual bounds: a plain nice range over the span, later overridden.
fn spanning_plan(extent: Extent, ticks: u32, headroom: f64) -> AxisPlan {
    let span = (extent.max - extent.min).clamp(1.0, f64::MAX);
    let step = nice_step(span / ticks as f64);
    let min = -headroom_ceil(-extent.min, step, headroom);
    let max = step.max(headroom_ceil(extent.max, step, headroom));
    AxisPlan {
        min,
        max,
        step,
        tick_count: ticks,
    }
}

/// `ceil(value * headroom / step) * step`, saturating at `±f64::MAX`.
fn headroom_ceil(value: f64, step: f64, headroom: f64) -> f64 {
    let v = (value / step * headroom).ceil() * step;
    if v.is_finite() { v } else { f64::MAX.copysign(value) }
}

/// Manual bounds win. When they change the range, the step is re-derived so that the
/// range divides into exactly `tick_count` ticks.
fn apply_override(plan: AxisPlan, overrides: AxisOverride) -> AxisPlan {
    if overrides.is_empty() {
        return plan;
    }
    let min = overrides.min.filter(|v| v.is_finite()).unwrap_or(plan.min);
    let max = overrides.max.filter(|v| v.is_finite()).unwrap_or(plan.max);
    if !(max > min) {
        log::warn!("ignoring axis override {min}..{max}: empty range");
        return plan;
    }
    if min == plan.min && max == plan.max {
        return plan;
    }
    // divide before subtracting so a range spanning the whole float line stays finite
    let intervals = (plan.tick_count.max(2) - 1) as f64;
    AxisPlan {
        min,
        max,
        step: max / intervals - min / intervals,
        tick_count: plan.tick_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_step_thresholds() {
        assert_eq!(nice_step(1.0), 1.0);
        assert_eq!(nice_step(1.5), 2.0);
        assert_eq!(nice_step(2.0), 2.0);
        assert_eq!(nice_step(2.1), 5.0);
        assert_eq!(nice_step(5.0), 5.0);
        assert_eq!(nice_step(5.1), 10.0);
        assert_eq!(nice_step(10.0), 10.0);
        assert_eq!(nice_step(300.0), 500.0);
        assert!((nice_step(0.03) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn nice_step_degenerate_input() {
        assert_eq!(nice_step(0.0), 1.0);
        assert_eq!(nice_step(f64::NAN), 1.0);
        assert_eq!(nice_step(-4.0), 1.0);
    }

    #[test]
    fn all_zero_data_gets_minimal_step() {
        let p = plan_values(&[0.0, 0.0], DisplayMode::Absolute, 5);
        // max(0, 1) / 5 = 0.2
        assert!((p.step - 0.2).abs() < 1e-12);
        assert!((p.max - 0.2).abs() < 1e-12);
        assert_eq!(p.min, 0.0);
    }

    #[test]
    fn ticks_cover_range() {
        let p = AxisPlan {
            min: -60.0,
            max: 60.0,
            step: 20.0,
            tick_count: 5,
        };
        assert_eq!(p.ticks(), vec![-60.0, -40.0, -20.0, 0.0, 20.0, 40.0, 60.0]);
    }

    #[test]
    fn ticks_stop_at_max() {
        let p = AxisPlan {
            min: 0.0,
            max: f64::MAX,
            step: 5.0e307,
            tick_count: 5,
        };
        let ticks = p.ticks();
        assert_eq!(ticks.len(), 5);
        assert_eq!(ticks.last().copied(), Some(f64::MAX));
        assert!(ticks.iter().all(|t| t.is_finite()));
    }

    #[test]
    fn huge_step_saturates() {
        assert_eq!(nice_step(f64::MAX), f64::MAX);
        assert!(nice_step(1.0e308).is_finite());
    }

    #[test]
    fn stacked_extent_separates_signs() {
        let e = Extent::of_values([3.0, f64::NAN, -2.0]);
        assert_eq!(e, Extent { min: -2.0, max: 3.0 });
        assert_eq!(Extent::of_values(std::iter::empty()), Extent { min: 0.0, max: 0.0 });
    }

    #[test]
    fn override_rederives_step() {
        let p = plan_extent(
            &ChartConfig::default(),
            Extent { min: 0.0, max: 50.0 },
            DisplayMode::Absolute,
            5,
            AxisOverride {
                min: None,
                max: Some(200.0),
            },
        );
        assert_eq!(p.min, 0.0);
        assert_eq!(p.max, 200.0);
        assert_eq!(p.step, 50.0);
    }

    #[test]
    fn inverted_override_is_ignored() {
        let p = plan_extent(
            &ChartConfig::default(),
            Extent { min: 0.0, max: 50.0 },
            DisplayMode::Absolute,
            5,
            AxisOverride {
                min: Some(80.0),
                max: Some(10.0),
            },
        );
        assert_eq!((p.min, p.max, p.step), (0.0, 60.0, 10.0));
    }
}

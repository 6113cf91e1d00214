use chainplot::align::align;
use chainplot::axis::{Extent, plan, plan_extent, plan_values, requested_tick_count};
use chainplot::config::ChartConfig;
use chainplot::models::{AxisOverride, DisplayMode, Series, SeriesColor, SeriesKind, Timestamp};

fn series(name: &str, pts: &[(Timestamp, Option<f64>)]) -> Series {
    Series::new(name, SeriesKind::Area, SeriesColor::solid("#4472C4")).with_points(pts.iter().copied())
}

#[test]
fn single_value_gets_headroom_and_round_max() {
    let set = align(&[series("a", &[(0, Some(50.0))])]);
    let p = plan(&set, DisplayMode::Absolute, false, 5);
    assert_eq!(p.min, 0.0);
    assert_eq!(p.step, 10.0);
    assert_eq!(p.max, 60.0);
    assert_eq!(p.ticks(), vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);
}

#[test]
fn headroom_and_divisibility_hold_across_ranges() {
    for v in [0.3, 7.0, 53.0, 999.0, 12_345.0, 4.2e9] {
        for ticks in 3..=7 {
            let p = plan_values(&[v, v / 3.0], DisplayMode::Absolute, ticks);
            assert_eq!(p.min, 0.0);
            assert!(p.max >= v * 1.06 - 1e-9, "v={v} ticks={ticks} max={}", p.max);
            let n = p.max / p.step;
            assert!((n - n.round()).abs() < 1e-6, "v={v} ticks={ticks}: {} / {}", p.max, p.step);
        }
    }
}

#[test]
fn signed_data_is_symmetric_around_zero() {
    let p = plan_values(&[-40.0, 30.0], DisplayMode::Absolute, 5);
    assert_eq!((p.min, p.max, p.step), (-60.0, 60.0, 20.0));
    assert_eq!(p.ticks().iter().filter(|t| **t == 0.0).count(), 1);
}

#[test]
fn tick_request_is_clamped() {
    let cfg = ChartConfig::default();
    assert_eq!(requested_tick_count(50.0, &cfg), 3);
    assert_eq!(requested_tick_count(440.0, &cfg), 5);
    assert_eq!(requested_tick_count(5_000.0, &cfg), 7);
    assert_eq!(requested_tick_count(f64::NAN, &cfg), 3);
    assert_eq!(cfg.clamp_ticks(0), 3);
    assert_eq!(cfg.clamp_ticks(100), 7);
}

#[test]
fn stacked_plan_uses_stacked_ceiling() {
    let set = align(&[
        series("a", &[(0, Some(5.0))]),
        series("b", &[(0, Some(5.0))]),
        series("c", &[(0, Some(5.0))]),
    ]);
    assert_eq!(Extent::of_set(&set, true).max, 15.0);
    assert_eq!(Extent::of_set(&set, false).max, 5.0);

    let stacked = plan(&set, DisplayMode::Stacked, true, 5);
    assert!(stacked.max >= 15.0 * 1.06);
    let flat = plan(&set, DisplayMode::Absolute, false, 5);
    assert!(flat.max < 15.0);
}

#[test]
fn stacked_floor_sums_negatives() {
    let set = align(&[
        series("in", &[(0, Some(10.0)), (1, Some(4.0))]),
        series("out", &[(0, Some(-3.0)), (1, Some(-6.0))]),
        series("fees", &[(0, Some(-1.0)), (1, None)]),
    ]);
    let e = Extent::of_set(&set, true);
    assert_eq!(e.max, 10.0);
    assert_eq!(e.min, -6.0);
}

#[test]
fn percentage_axis_is_fixed() {
    let set = align(&[series("a", &[(0, Some(3.0))])]);
    let p = plan(&set, DisplayMode::Percentage, false, 5);
    assert_eq!((p.min, p.max, p.step), (0.0, 100.0, 25.0));

    let p = plan(&set, DisplayMode::Percentage, false, 3);
    assert_eq!(p.step, 50.0);
}

#[test]
fn overrides_replace_computed_bounds() {
    let cfg = ChartConfig::default();
    let p = plan_extent(
        &cfg,
        Extent { min: 0.0, max: 50.0 },
        DisplayMode::Absolute,
        5,
        AxisOverride {
            min: Some(-10.0),
            max: None,
        },
    );
    assert_eq!((p.min, p.max), (-10.0, 60.0));
    assert_eq!(p.step, 17.5);
}

#[test]
fn planning_is_deterministic() {
    let values = [12.5, -3.25, 99.0];
    let a = plan_values(&values, DisplayMode::Absolute, 6);
    let b = plan_values(&values, DisplayMode::Absolute, 6);
    assert_eq!(a, b);
}

#[test]
fn near_max_float_values_keep_a_finite_axis() {
    let set = align(&[series("a", &[(0, Some(1e308))]), series("b", &[(0, Some(1e308))])]);
    let stacked = plan(&set, DisplayMode::Stacked, true, 5);
    assert!(stacked.max.is_finite());
    assert!(stacked.max >= 1e308);
    let ticks = stacked.ticks();
    assert!(ticks.len() <= 8, "{} ticks", ticks.len());
    assert!(ticks.iter().all(|t| t.is_finite()));

    let single = plan_values(&[1.7e308], DisplayMode::Absolute, 5);
    assert!(single.max.is_finite() && single.max >= 1.7e308);
    assert!(single.step.is_finite());

    let signed = plan_values(&[-1.7e308, 1.7e308], DisplayMode::Absolute, 3);
    assert_eq!((signed.min, signed.max), (-f64::MAX, f64::MAX));
    assert!(signed.ticks().iter().all(|t| t.is_finite()));
}

#[test]
fn override_across_the_float_range_has_finite_step() {
    let p = plan_extent(
        &ChartConfig::default(),
        Extent { min: -1.0, max: 1.0 },
        DisplayMode::Absolute,
        5,
        AxisOverride {
            min: Some(-1e308),
            max: Some(1e308),
        },
    );
    assert_eq!(p.step, 5e307);
    assert_eq!(p.ticks().len(), 5);
}

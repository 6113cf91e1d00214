use chainplot::align::align;
use chainplot::models::{DisplayMode, Sample, Series, SeriesColor, SeriesKind, Timestamp};
use chainplot::transform::{percentage_shares, transform};

fn series(name: &str, pts: &[(Timestamp, Option<f64>)]) -> Series {
    Series::new(name, SeriesKind::Area, SeriesColor::solid("#4472C4")).with_points(pts.iter().copied())
}

fn approx(a: Sample, b: f64) -> bool {
    matches!(a.value(), Some(v) if (v - b).abs() < 1e-9)
}

#[test]
fn shares_that_already_sum_to_100_are_kept() {
    let set = align(&[series("a", &[(0, Some(40.0))]), series("b", &[(0, Some(60.0))])]);
    let pct = transform(&set, DisplayMode::Percentage);
    assert!(approx(pct.series()[0].values[0], 40.0));
    assert!(approx(pct.series()[1].values[0], 60.0));
}

#[test]
fn present_shares_sum_to_100() {
    let set = align(&[
        series("a", &[(0, Some(1.0)), (1, Some(7.5)), (2, Some(3.0))]),
        series("b", &[(0, Some(2.0)), (1, Some(0.5))]),
        series("c", &[(0, Some(4.0)), (1, Some(2.0)), (2, Some(1.0))]),
    ]);
    let pct = percentage_shares(&set);
    for k in 0..pct.len() {
        let total: f64 = pct.column(k).filter_map(|s| s.value()).sum();
        assert!((total - 100.0).abs() < 1e-9, "column {k} sums to {total}");
    }
    assert!(pct.series()[1].values[2].is_no_value());
    assert!(approx(pct.series()[0].values[2], 75.0));
}

#[test]
fn zero_total_has_no_shares() {
    let set = align(&[
        series("a", &[(0, Some(0.0)), (1, Some(5.0))]),
        series("b", &[(0, Some(0.0)), (1, Some(-5.0))]),
    ]);
    let pct = percentage_shares(&set);
    for s in pct.series() {
        assert!(s.values.iter().all(|v| v.is_no_value()), "series {}", s.name);
    }
}

#[test]
fn non_percentage_modes_do_not_touch_values() {
    let set = align(&[series("a", &[(0, Some(-3.0))]), series("b", &[(1, Some(9.0))])]);
    assert_eq!(transform(&set, DisplayMode::Absolute), set);
    assert_eq!(transform(&set, DisplayMode::Stacked), set);
}

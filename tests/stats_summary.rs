use chainplot::align::align;
use chainplot::models::{Series, SeriesColor, SeriesKind, Timestamp};
use chainplot::stats::summarize;

fn series(name: &str, pts: &[(Timestamp, Option<f64>)]) -> Series {
    Series::new(name, SeriesKind::Line, SeriesColor::solid("#4472C4")).with_points(pts.iter().copied())
}

#[test]
fn summaries_handle_missing_and_median_even_odd() {
    // a: [1, 2, 3, 4] -> median (2+3)/2
    // b: [10, -, 30] on a shared axis of 4 slots -> 2 missing, median 20
    let set = align(&[
        series("a", &[(1, Some(1.0)), (2, Some(2.0)), (3, Some(3.0)), (4, Some(4.0))]),
        series("b", &[(1, Some(10.0)), (2, None), (3, Some(30.0))]),
    ]);
    let got = summarize(&set);

    let a = &got[0];
    assert_eq!(a.name, "a");
    assert_eq!((a.count, a.missing), (4, 0));
    assert_eq!(a.median, Some(2.5));
    assert_eq!(a.mean, Some(2.5));
    assert_eq!(a.last, Some(4.0));

    let b = &got[1];
    assert_eq!((b.count, b.missing), (2, 2));
    assert_eq!((b.min, b.max), (Some(10.0), Some(30.0)));
    assert_eq!(b.median, Some(20.0));
    assert_eq!(b.last, Some(30.0));
}

#[test]
fn series_without_values_has_no_statistics() {
    let set = align(&[series("empty", &[(1, None)]), series("one", &[(1, Some(7.0))])]);
    let got = summarize(&set);
    assert_eq!(got[0].count, 0);
    assert_eq!(got[0].missing, 1);
    assert_eq!(got[0].mean, None);
    assert_eq!(got[0].median, None);
    assert_eq!(got[1].median, Some(7.0));
}

//! Preview renderer: draw a [`ChartSpec`] to **SVG** or **PNG** with plotters.
//!
//! This is one adapter over the renderer-neutral chart spec, not part of the data pipeline. It draws
//! geometry only (grid lines at the planned ticks, a zero line, and the series); tick and
//! tooltip text stay with the consumer, which has the formatted labels in the `ChartSpec`.
//!
//! - Lines break at missing values instead of dropping to zero
//! - Areas and bars in a stack group sit on the running sum of earlier series
//! - Bars below zero use the series' negative color when one is set

use crate::chart::{ChartSpec, PlottedSeries};
use crate::models::SeriesKind;
use crate::style::{Rgb8, palette_rgb, parse_hex};
use anyhow::{Result, anyhow, bail};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::path::Path;

const MARGIN: u32 = 16;
const GRID: RGBColor = RGBColor(225, 225, 225);
const ZERO_LINE: RGBColor = RGBColor(140, 140, 140);
/// Share of a timestamp slot covered by bars.
const BAR_FILL: f64 = 0.8;

/// Render to `out_path`; `.svg` selects the SVG backend, anything else the bitmap backend.
pub fn render_chart<P: AsRef<Path>>(
    spec: &ChartSpec,
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    if spec.timestamps.is_empty() {
        bail!("no data to plot");
    }
    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(root, spec)?;
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(root, spec)?;
    }
    Ok(())
}

/// Vertical extent of one drawn slot: `(base, top)`.
type Slot = Option<(f64, f64)>;

fn draw_chart<DB>(root: DrawingArea<DB, Shift>, spec: &ChartSpec) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let xs: Vec<f64> = spec.timestamps.iter().map(|t| *t as f64).collect();
    let slot_w = slot_width(&xs);
    let (x_min, x_max) = (xs[0] - slot_w / 2.0, xs[xs.len() - 1] + slot_w / 2.0);
    let (y_min, y_max) = (spec.axis.min, spec.axis.max);

    let mut chart = ChartBuilder::on(&root)
        .margin(MARGIN)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| anyhow!("{:?}", e))?;

    // Grid at the planned ticks, then the zero line when the range is signed.
    for t in spec.axis.ticks() {
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(x_min, t), (x_max, t)],
                GRID.stroke_width(1),
            )))
            .map_err(|e| anyhow!("{:?}", e))?;
    }
    if y_min < 0.0 && y_max > 0.0 {
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(x_min, 0.0), (x_max, 0.0)],
                ZERO_LINE.stroke_width(1),
            )))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    let n = xs.len();
    let mut pos_base = vec![0.0f64; n];
    let mut neg_base = vec![0.0f64; n];

    let bar_series: Vec<usize> = spec
        .series
        .iter()
        .enumerate()
        .filter(|(_, s)| s.kind == SeriesKind::Bar)
        .map(|(i, _)| i)
        .collect();

    for (idx, series) in spec.series.iter().enumerate() {
        let color = to_plotters(series_rgb(&series.hints.style.primary_color, idx));
        let stacked = series.hints.stack_group.is_some();

        let slots: Vec<Slot> = (0..n)
            .map(|k| {
                let v = series.values[k].value()?;
                if !stacked {
                    return Some((0.0, v));
                }
                let base = if v >= 0.0 { &mut pos_base[k] } else { &mut neg_base[k] };
                let lower = *base;
                *base += v;
                Some((lower, *base))
            })
            .collect();

        match series.kind {
            SeriesKind::Line => {
                for run in runs(&slots) {
                    let line: Vec<(f64, f64)> = run
                        .iter()
                        .filter_map(|&k| slots[k].map(|(_, top)| (xs[k], top)))
                        .collect();
                    chart
                        .draw_series(LineSeries::new(line, color.stroke_width(2)))
                        .map_err(|e| anyhow!("{:?}", e))?;
                }
            }
            SeriesKind::Area => {
                let fill = color.mix(series.hints.style.opacity).filled();
                for run in runs(&slots) {
                    let lower: Vec<(f64, f64)> = run
                        .iter()
                        .filter_map(|&k| slots[k].map(|(base, _)| (xs[k], base)))
                        .collect();
                    let upper: Vec<(f64, f64)> = run
                        .iter()
                        .filter_map(|&k| slots[k].map(|(_, top)| (xs[k], top)))
                        .collect();
                    let mut poly = lower;
                    poly.extend(upper.iter().rev().copied());
                    chart
                        .draw_series(std::iter::once(Polygon::new(poly, fill)))
                        .map_err(|e| anyhow!("{:?}", e))?;
                    chart
                        .draw_series(std::iter::once(PathElement::new(
                            upper,
                            color.stroke_width(1),
                        )))
                        .map_err(|e| anyhow!("{:?}", e))?;
                }
            }
            SeriesKind::Bar => {
                let (offset, width) = bar_geometry(series, idx, &bar_series, slot_w);
                let rects: Vec<Rectangle<(f64, f64)>> = slots
                    .iter()
                    .enumerate()
                    .filter_map(|(k, slot)| {
                        let (base, top) = (*slot)?;
                        let value = top - base;
                        let fill = to_plotters(series_rgb(series.hints.color_for(value), idx))
                            .mix(series.hints.style.opacity)
                            .filled();
                        let x0 = xs[k] + offset;
                        Some(Rectangle::new([(x0, base), (x0 + width, top)], fill))
                    })
                    .collect();
                chart
                    .draw_series(rects)
                    .map_err(|e| anyhow!("{:?}", e))?;
            }
        }
    }

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

/// Smallest gap between consecutive timestamps; `1.0` for a single point.
fn slot_width(xs: &[f64]) -> f64 {
    let gap = xs
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|d| *d > 0.0)
        .fold(f64::INFINITY, f64::min);
    if gap.is_finite() { gap } else { 1.0 }
}

/// Left offset (relative to the timestamp) and width of one bar.
///
/// Stacked bars share the full slot; unstacked bars are grouped side by side.
fn bar_geometry(series: &PlottedSeries, idx: usize, bar_series: &[usize], slot_w: f64) -> (f64, f64) {
    let group = slot_w * BAR_FILL;
    if series.hints.stack_group.is_some() || bar_series.len() <= 1 {
        return (-group / 2.0, group);
    }
    let pos = bar_series.iter().position(|&i| i == idx).unwrap_or(0);
    let w = group / bar_series.len() as f64;
    (-group / 2.0 + pos as f64 * w, w)
}

/// Index runs of consecutive present slots.
fn runs(slots: &[Slot]) -> Vec<Vec<usize>> {
    let mut out: Vec<Vec<usize>> = Vec::new();
    let mut cur: Vec<usize> = Vec::new();
    for (k, s) in slots.iter().enumerate() {
        if s.is_some() {
            cur.push(k);
        } else if !cur.is_empty() {
            out.push(std::mem::take(&mut cur));
        }
    }
    if !cur.is_empty() {
        out.push(cur);
    }
    out
}

fn series_rgb(hex: &str, idx: usize) -> Rgb8 {
    parse_hex(hex).unwrap_or_else(|_| palette_rgb(idx))
}

fn to_plotters(c: Rgb8) -> RGBColor {
    RGBColor(c.r, c.g, c.b)
}

//! Default label formatters: locale-aware numbers, compact magnitudes, and dates.
//!
//! Callers may replace any of these with their own `Fn(f64) -> String`.

use crate::models::{DisplayMode, Timestamp};
use chrono::DateTime;
use num_format::{Locale, ToFormattedString};
use std::sync::Arc;

/// A pure value-to-text function, shareable across threads.
pub type ValueFormatter = Arc<dyn Fn(f64) -> String + Send + Sync>;

/// Map a user-provided locale tag to a `num_format::Locale` and its decimal separator char.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'), // default
    }
}

/// Pick a magnitude divisor and suffix, e.g. `(1e6, "M")`.
pub fn choose_magnitude(max_abs: f64) -> (f64, &'static str) {
    if max_abs >= 1.0e12 {
        (1.0e12, "T")
    } else if max_abs >= 1.0e9 {
        (1.0e9, "B")
    } else if max_abs >= 1.0e6 {
        (1.0e6, "M")
    } else if max_abs >= 1.0e3 {
        (1.0e3, "K")
    } else {
        (1.0, "")
    }
}

/// Fewer decimals for bigger numbers: `>=100 → 0`, `>=10 → 1`, else `2`.
pub fn label_precision(v: f64) -> usize {
    let a = v.abs();
    if a >= 100.0 {
        0
    } else if a >= 10.0 {
        1
    } else {
        2
    }
}

/// Format with grouped thousands and a fixed number of decimals.
pub fn group_number(v: f64, precision: usize, locale: &Locale, dec_sep: char) -> String {
    if !v.is_finite() {
        return "NA".to_string();
    }
    let raw = format!("{:.*}", precision, v.abs());
    let (int_part, frac_part) = raw.split_once('.').unwrap_or((raw.as_str(), ""));
    let grouped = match int_part.parse::<u64>() {
        Ok(n) => n.to_formatted_string(locale),
        Err(_) => int_part.to_string(),
    };
    let mut out = grouped;
    if !frac_part.is_empty() {
        out.push(dec_sep);
        out.push_str(frac_part);
    }
    let is_zero = out.chars().all(|c| !c.is_ascii_digit() || c == '0');
    if v < 0.0 && !is_zero {
        out.insert(0, '-');
    }
    out
}

fn trim_fraction(s: String, dec_sep: char) -> String {
    if !s.contains(dec_sep) {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches(dec_sep).to_string()
}

/// Compact label like `1.5M`, `-2.5K`, `42`, `7.12`.
pub fn compact_number(v: f64, locale: &Locale, dec_sep: char) -> String {
    let (div, suffix) = choose_magnitude(v.abs());
    let scaled = v / div;
    let body = trim_fraction(
        group_number(scaled, label_precision(scaled), locale, dec_sep),
        dec_sep,
    );
    format!("{body}{suffix}")
}

/// Default axis label formatter for a mode.
pub fn axis_label_formatter(locale_tag: &str, mode: DisplayMode) -> ValueFormatter {
    let (locale, dec_sep) = map_locale(locale_tag);
    match mode {
        DisplayMode::Percentage => Arc::new(move |v: f64| {
            let body = trim_fraction(group_number(v, label_precision(v), locale, dec_sep), dec_sep);
            format!("{body}%")
        }),
        DisplayMode::Absolute | DisplayMode::Stacked => {
            Arc::new(move |v: f64| compact_number(v, locale, dec_sep))
        }
    }
}

/// Default tooltip formatter: full value with two decimals, `%` suffix for shares.
pub fn tooltip_formatter(locale_tag: &str, mode: DisplayMode) -> ValueFormatter {
    let (locale, dec_sep) = map_locale(locale_tag);
    match mode {
        DisplayMode::Percentage => {
            Arc::new(move |v: f64| format!("{}%", group_number(v, 2, locale, dec_sep)))
        }
        DisplayMode::Absolute | DisplayMode::Stacked => {
            Arc::new(move |v: f64| group_number(v, 2, locale, dec_sep))
        }
    }
}

/// `YYYY-MM-DD` (UTC) for a millisecond timestamp; raw number when out of range.
pub fn format_timestamp(ms: Timestamp) -> String {
    match DateTime::from_timestamp_millis(ms) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => ms.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_by_locale() {
        let (en_loc, en_sep) = map_locale("en");
        let (de_loc, de_sep) = map_locale("DE");
        assert_eq!(group_number(1234567.891, 2, en_loc, en_sep), "1,234,567.89");
        assert_eq!(group_number(1234567.891, 2, de_loc, de_sep), "1.234.567,89");
        assert_eq!(group_number(-0.001, 2, en_loc, en_sep), "0.00");
        assert_eq!(group_number(f64::NAN, 2, en_loc, en_sep), "NA");
    }

    #[test]
    fn compact_labels() {
        let (en_loc, sep) = map_locale("en");
        assert_eq!(compact_number(1_500_000.0, en_loc, sep), "1.5M");
        assert_eq!(compact_number(-2_500.0, en_loc, sep), "-2.5K");
        assert_eq!(compact_number(42.0, en_loc, sep), "42");
        assert_eq!(compact_number(7.12345, en_loc, sep), "7.12");
        assert_eq!(compact_number(0.0, en_loc, sep), "0");
        assert_eq!(compact_number(2.0e12, en_loc, sep), "2T");
    }

    #[test]
    fn percentage_axis_labels() {
        let f = axis_label_formatter("en", DisplayMode::Percentage);
        assert_eq!(f(25.0), "25%");
        assert_eq!(f(100.0 / 3.0), "33.3%");
        assert_eq!(f(0.0), "0%");
    }

    #[test]
    fn tooltips_match_axis_unit() {
        let pct = tooltip_formatter("en", DisplayMode::Percentage);
        assert_eq!(pct(40.0), "40.00%");
        let abs = tooltip_formatter("de", DisplayMode::Stacked);
        assert_eq!(abs(1234.5), "1.234,50");
    }

    #[test]
    fn timestamps_render_as_dates() {
        assert_eq!(format_timestamp(0), "1970-01-01");
        assert_eq!(format_timestamp(1_700_000_000_000), "2023-11-14");
    }
}

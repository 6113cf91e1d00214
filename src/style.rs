//! Renderer-neutral series styling: palette, hex colors, and style descriptors.
//!
//! Nothing here knows about a drawing library. Adapters (see [`crate::viz`]) turn a
//! [`StyleDescriptor`] into whatever gradient or fill object their backend wants.

use crate::error::ParseError;
use crate::models::{SeriesColor, SeriesKind};
use serde::{Deserialize, Serialize};

/// 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#RRGGBB`, upper-case.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Scale each channel by `factor`, saturating at 0 and 255.
    pub fn scaled(self, factor: f64) -> Self {
        let ch = |c: u8| (c as f64 * factor).round().clamp(0.0, 255.0) as u8;
        Self::new(ch(self.r), ch(self.g), ch(self.b))
    }
}

/// Parse `#RRGGBB` (leading `#` optional, case-insensitive).
pub fn parse_hex(s: &str) -> Result<Rgb8, ParseError> {
    let t = s.trim();
    let hex = t.strip_prefix('#').unwrap_or(t);
    let bad = || ParseError::InvalidColor(s.to_string());
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(bad());
    }
    let ch = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
    Ok(Rgb8::new(ch(0)?, ch(2)?, ch(4)?))
}

/// Microsoft Office (2013+) chart series palette.
/// Order: Blue, Orange, Gray, Gold, Light Blue, Green, Dark Blue, Dark Orange, Dark Gray, Brownish Gold.
pub const OFFICE10: [Rgb8; 10] = [
    Rgb8::new(68, 114, 196),  // blue      (#4472C4)
    Rgb8::new(237, 125, 49),  // orange    (#ED7D31)
    Rgb8::new(165, 165, 165), // gray      (#A5A5A5)
    Rgb8::new(255, 192, 0),   // gold      (#FFC000)
    Rgb8::new(91, 155, 213),  // light blue(#5B9BD5)
    Rgb8::new(112, 173, 71),  // green     (#70AD47)
    Rgb8::new(38, 68, 120),   // dark blue (#264478)
    Rgb8::new(158, 72, 14),   // dark org. (#9E480E)
    Rgb8::new(99, 99, 99),    // dark gray (#636363)
    Rgb8::new(153, 115, 0),   // brownish  (#997300)
];

/// Palette color for the series at `idx` (wraps around).
#[inline]
pub fn palette_rgb(idx: usize) -> Rgb8 {
    OFFICE10[idx % OFFICE10.len()]
}

/// Default color for the series at `idx`: palette primary, lighter shade as gradient end.
pub fn palette_color(idx: usize) -> SeriesColor {
    let base = palette_rgb(idx);
    SeriesColor::gradient(base.to_hex(), base.scaled(1.3).to_hex())
}

/// Fill opacity a renderer should use for a kind when the caller gives none.
pub fn default_opacity(kind: SeriesKind) -> f64 {
    match kind {
        SeriesKind::Line => 1.0,
        SeriesKind::Area => 0.3,
        SeriesKind::Bar => 0.9,
    }
}

/// What a renderer needs to paint one series, free of any library's object model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleDescriptor {
    pub primary_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<String>,
    pub opacity: f64,
}

impl StyleDescriptor {
    pub fn for_series(kind: SeriesKind, color: &SeriesColor) -> Self {
        Self {
            primary_color: color.primary.clone(),
            secondary_color: color.secondary.clone(),
            opacity: default_opacity(kind),
        }
    }
}

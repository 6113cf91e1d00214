//! Chart configuration: tick range, pixel density, headroom, and formatter locale.
//!
//! ```
//! use chainplot::config::ChartConfig;
//!
//! let cfg = ChartConfig::from_toml_str("max_ticks = 6\nlocale = \"de\"")?;
//! assert_eq!(cfg.max_ticks, 6);
//! assert_eq!(cfg.min_ticks, 3); // unspecified keys keep their defaults
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_MIN_TICKS: u32 = 3;
pub const DEFAULT_MAX_TICKS: u32 = 7;
/// Vertical pixels budgeted per axis label.
pub const DEFAULT_PX_PER_TICK: f64 = 88.0;
/// Headroom factor above the highest data point.
pub const DEFAULT_HEADROOM: f64 = 1.06;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub min_ticks: u32,
    pub max_ticks: u32,
    pub px_per_tick: f64,
    pub headroom: f64,
    /// Locale tag for the default formatters (`en`, `de`, `fr`, …).
    pub locale: String,
    /// Draw percentage mode as a stacked chart.
    pub stack_percentage: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            min_ticks: DEFAULT_MIN_TICKS,
            max_ticks: DEFAULT_MAX_TICKS,
            px_per_tick: DEFAULT_PX_PER_TICK,
            headroom: DEFAULT_HEADROOM,
            locale: "en".into(),
            stack_percentage: false,
        }
    }
}

impl ChartConfig {
    /// Parse from TOML text; missing keys take defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: ChartConfig = toml::from_str(s).context("parse chart config")?;
        cfg.validated()
    }

    /// Read a TOML file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Clamp a tick request into `[min_ticks, max_ticks]`. Inverted bounds are swapped.
    pub fn clamp_ticks(&self, requested: i64) -> u32 {
        let lo = self.min_ticks.min(self.max_ticks);
        let hi = self.min_ticks.max(self.max_ticks);
        requested.clamp(lo as i64, hi as i64) as u32
    }

    fn validated(self) -> Result<Self> {
        if self.min_ticks < 2 {
            bail!("min_ticks must be at least 2 (got {})", self.min_ticks);
        }
        if self.min_ticks > self.max_ticks {
            bail!(
                "min_ticks ({}) exceeds max_ticks ({})",
                self.min_ticks,
                self.max_ticks
            );
        }
        if !(self.px_per_tick.is_finite() && self.px_per_tick > 0.0) {
            bail!("px_per_tick must be a positive number");
        }
        if !(self.headroom.is_finite() && self.headroom >= 1.0) {
            bail!("headroom must be a number >= 1.0");
        }
        Ok(self)
    }
}

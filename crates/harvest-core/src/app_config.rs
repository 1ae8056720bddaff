use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Mobile user agent the Kaspi listing serves its card markup for.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Linux; Android 10; Mobile; rv:89.0) Gecko/89.0 Firefox/89.0";

/// Which price node of a product card feeds the `price` field.
///
/// Kaspi cards carry two price nodes when an item is discounted: the
/// struck-through pre-discount price and the visible current price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceField {
    /// The pre-discount ("origin") price node.
    Origin,
    /// The visible, possibly discounted, price node.
    Current,
}

impl std::fmt::Display for PriceField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceField::Origin => write!(f, "origin"),
            PriceField::Current => write!(f, "current"),
        }
    }
}

#[derive(Debug, Error)]
#[error("price field must be `origin` or `current`, got {0:?}")]
pub struct InvalidPriceField(String);

impl FromStr for PriceField {
    type Err = InvalidPriceField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "origin" => Ok(PriceField::Origin),
            "current" => Ok(PriceField::Current),
            other => Err(InvalidPriceField(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    /// Pause between scroll cycles, letting lazily-loaded cards settle.
    pub scroll_pause_ms: u64,
    /// How long to wait for the first product card before giving up.
    pub initial_load_timeout_secs: u64,
    /// Consecutive no-new-item cycles that end the crawl.
    pub max_empty_scrolls: u32,
    /// Hard cap on total cycles; 0 means unlimited.
    pub max_cycles: u64,
    pub price_field: PriceField,
    pub user_agent: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub headless: bool,
    /// Explicit Chrome/Chromium binary; autodetected when unset.
    pub chrome_executable: Option<PathBuf>,
    pub output_dir: PathBuf,
}

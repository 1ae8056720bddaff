//! The structured record produced for each accepted listing card.

use serde::Serialize;

/// One harvested product listing.
///
/// Serialized field names match the columns of the CSV export
/// (`Title,SKU,Price,Link,Reviews`).
///
/// Records are immutable once constructed: the extractor either returns a
/// fully-populated record satisfying the invariants below, or nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRecord {
    /// Display name from the card header. Cards occasionally render without
    /// one; absence is tolerated.
    #[serde(rename = "Title")]
    pub title: Option<String>,

    /// The catalog's numeric item identifier, derived from the card link.
    /// Always non-empty and all-digits; this is the deduplication key.
    #[serde(rename = "SKU")]
    pub sku: String,

    /// Price in whole tenge, parsed digits-only from the localized price
    /// label (`"12 990 ₸"` → `12990`). Absent when the card shows no price
    /// in the configured price node.
    #[serde(rename = "Price")]
    pub price: Option<u64>,

    /// Absolute product URL; also the source the SKU was derived from.
    #[serde(rename = "Link")]
    pub link: String,

    /// Review count from the parenthesized rating label; `0` when the card
    /// has no review widget.
    #[serde(rename = "Reviews")]
    pub reviews: u32,
}

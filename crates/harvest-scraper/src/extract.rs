//! Per-card record extraction.
//!
//! Field lookups are gathered into a [`RawCardFields`] snapshot first, then
//! combined into a record in one place. Each field fails independently: a
//! missing title, price, or review label defaults; only an unresolvable SKU
//! rejects the whole card. The parse helpers use plain string scanning
//! rather than `regex` to stay dependency-light.

use harvest_core::PriceField;
use tracing::{debug, warn};

use crate::selectors;
use crate::session::ListingCard;
use crate::types::ProductRecord;

/// Raw per-field lookups from one card, before any interpretation.
#[derive(Debug, Default)]
struct RawCardFields {
    title: Option<String>,
    price_text: Option<String>,
    link: Option<String>,
    reviews_text: Option<String>,
}

/// Extracts a [`ProductRecord`] from one card, or `None` when the card has
/// no derivable SKU.
///
/// `price_field` selects which price node of the card feeds the `price`
/// field.
pub async fn extract_record<C: ListingCard>(
    card: &C,
    price_field: PriceField,
) -> Option<ProductRecord> {
    let raw = RawCardFields {
        title: card.find_text(selectors::CARD_TITLE).await,
        price_text: card.find_text(selectors::price_selector(price_field)).await,
        link: card.attribute(selectors::CARD_LINK_ATTR).await,
        reviews_text: card.find_text(selectors::REVIEWS_QUANTITY).await,
    };
    build_record(raw)
}

/// Combines the per-field outcomes into a record.
///
/// The SKU is the only mandatory field; everything else defaults.
fn build_record(raw: RawCardFields) -> Option<ProductRecord> {
    let Some(link) = raw.link else {
        warn!("card has no link attribute; skipping");
        return None;
    };
    let Some(sku) = sku_from_link(&link) else {
        warn!(link = %link, "could not derive a numeric sku from link; skipping");
        return None;
    };

    if raw.title.is_none() {
        debug!(sku = %sku, "card has no title element");
    }
    let price = raw.price_text.as_deref().and_then(parse_price);
    if price.is_none() {
        debug!(sku = %sku, "card has no parseable price");
    }
    let reviews = raw
        .reviews_text
        .as_deref()
        .and_then(parse_review_count)
        .unwrap_or(0);

    Some(ProductRecord {
        title: raw.title,
        sku,
        price,
        link,
        reviews,
    })
}

/// Parses a localized price label into whole currency units by keeping only
/// its digits: `"12 990 ₸"` → `12990`.
///
/// Returns `None` when the text contains no digits (or overflows `u64`).
#[must_use]
pub(crate) fn parse_price(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Parses the leading integer token of a parenthesized review label:
/// `"(47 отзывов)"` → `47`.
#[must_use]
pub(crate) fn parse_review_count(text: &str) -> Option<u32> {
    let inner = text.trim().trim_matches(|c| c == '(' || c == ')');
    inner.split_whitespace().next()?.parse().ok()
}

/// Derives the SKU from a product URL: the trailing token after the last
/// `-`, cut at the next `/`. `".../some-product-123456/"` → `"123456"`.
///
/// Returns `None` when the token is empty or not all-digits, including
/// links with no `-` separator at all, where the scan lands on the scheme.
#[must_use]
pub(crate) fn sku_from_link(link: &str) -> Option<String> {
    let tail = link.rsplit('-').next()?;
    let token = tail.split('/').next()?;
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(token.to_owned())
}

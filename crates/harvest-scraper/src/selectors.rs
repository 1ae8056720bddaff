//! CSS selectors for the Kaspi mobile listing markup.

use harvest_core::PriceField;

/// One listing card in the lazily-loaded feed.
pub const PRODUCT_CARD: &str = ".list-product-card";

/// Display-name node inside a card.
pub const CARD_TITLE: &str = ".product-card-header__title";

/// Pre-discount (struck-through) price node.
pub const PRICE_ORIGIN: &str = ".product-card-price__origin";

/// Visible current-price node.
pub const PRICE_CURRENT: &str = ".product-card-price";

/// Parenthesized review-count label, e.g. `"(47 отзывов)"`.
pub const REVIEWS_QUANTITY: &str = ".product-card-rating__reviews-quantity";

/// Attribute on the card anchor carrying the absolute product URL.
pub const CARD_LINK_ATTR: &str = "href";

/// Maps the configured price preference to its card selector.
#[must_use]
pub fn price_selector(field: PriceField) -> &'static str {
    match field {
        PriceField::Origin => PRICE_ORIGIN,
        PriceField::Current => PRICE_CURRENT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_maps_to_origin_node() {
        assert_eq!(price_selector(PriceField::Origin), PRICE_ORIGIN);
    }

    #[test]
    fn current_maps_to_current_node() {
        assert_eq!(price_selector(PriceField::Current), PRICE_CURRENT);
    }
}

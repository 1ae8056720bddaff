//! In-memory fakes for exercising the engine without a browser.

use std::collections::HashMap;

use crate::selectors;
use crate::session::ListingCard;

/// A card backed by plain selector→text and attribute→value maps.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeCard {
    texts: HashMap<String, String>,
    attrs: HashMap<String, String>,
}

impl FakeCard {
    pub(crate) fn with_link(link: &str) -> Self {
        let mut card = Self::default();
        card.attrs
            .insert(selectors::CARD_LINK_ATTR.to_owned(), link.to_owned());
        card
    }

    /// A complete, well-formed card whose link ends in the given SKU.
    pub(crate) fn product(sku: &str) -> Self {
        Self::with_link(&format!("https://kaspi.kz/shop/p/test-product-{sku}/"))
            .title(&format!("Test Product {sku}"))
            .price_origin("1 000 ₸")
            .reviews("(2 отзыва)")
    }

    pub(crate) fn title(mut self, text: &str) -> Self {
        self.texts
            .insert(selectors::CARD_TITLE.to_owned(), text.to_owned());
        self
    }

    pub(crate) fn price_origin(mut self, text: &str) -> Self {
        self.texts
            .insert(selectors::PRICE_ORIGIN.to_owned(), text.to_owned());
        self
    }

    pub(crate) fn price_current(mut self, text: &str) -> Self {
        self.texts
            .insert(selectors::PRICE_CURRENT.to_owned(), text.to_owned());
        self
    }

    pub(crate) fn reviews(mut self, text: &str) -> Self {
        self.texts
            .insert(selectors::REVIEWS_QUANTITY.to_owned(), text.to_owned());
        self
    }
}

impl ListingCard for FakeCard {
    async fn find_text(&self, selector: &str) -> Option<String> {
        self.texts.get(selector).cloned()
    }

    async fn attribute(&self, name: &str) -> Option<String> {
        self.attrs.get(name).cloned()
    }
}

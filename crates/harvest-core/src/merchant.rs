use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Kaspi merchant identifier: the numeric id shown in a seller's shop URL.
///
/// Validated at construction so every downstream consumer (listing URL,
/// export filename) can rely on it being a non-empty digit string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MerchantId(String);

#[derive(Debug, Error)]
#[error("merchant id must be a non-empty string of digits, got {0:?}")]
pub struct InvalidMerchantId(String);

impl FromStr for MerchantId {
    type Err = InvalidMerchantId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(InvalidMerchantId(s.to_owned()));
        }
        Ok(MerchantId(s.to_owned()))
    }
}

impl fmt::Display for MerchantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl MerchantId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The merchant's all-products listing URL, in the exact query encoding
    /// the mobile storefront uses.
    #[must_use]
    pub fn listing_url(&self) -> String {
        format!(
            "https://kaspi.kz/shop/search?redirect=listing&q=%3AallMerchants%{}",
            self.0
        )
    }
}

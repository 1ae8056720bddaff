pub mod crawl;
pub mod dedup;
pub mod extract;
pub mod selectors;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod testutil;

pub use crawl::{crawl_listing, CrawlConfig, CrawlOutcome, CrawlReport};
pub use dedup::SeenSkus;
pub use extract::extract_record;
pub use session::{ListingCard, ListingSession, SessionError};
pub use types::ProductRecord;

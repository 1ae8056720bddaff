//! The scroll-crawl controller.
//!
//! Drives repeated load cycles against a [`ListingSession`] until the feed
//! is exhausted: pause, enumerate every currently-visible card, extract,
//! dedup-accept, then decide whether to scroll again.
//!
//! Every cycle re-scans cards that were already visible in earlier cycles.
//! The feed can reorder or re-render between loads, so correctness rests
//! entirely on the SKU dedup store, not on visiting each DOM node exactly
//! once.

use std::time::Duration;

use harvest_core::{AppConfig, PriceField};
use tracing::{error, info, warn};

use crate::dedup::SeenSkus;
use crate::extract::extract_record;
use crate::selectors;
use crate::session::{ListingSession, SessionError};
use crate::types::ProductRecord;

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Pause before each card scan, letting lazily-loaded content settle.
    pub scroll_pause: Duration,
    /// Bound on the wait for the first card after navigation.
    pub initial_load_timeout: Duration,
    /// Consecutive zero-new-item cycles that end the crawl.
    pub max_empty_scrolls: u32,
    /// Hard cap on total cycles; 0 means unlimited.
    pub max_cycles: u64,
    /// Which price node of a card feeds the record's price.
    pub price_field: PriceField,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            scroll_pause: Duration::from_millis(1500),
            initial_load_timeout: Duration::from_secs(10),
            max_empty_scrolls: 3,
            max_cycles: 0,
            price_field: PriceField::Origin,
        }
    }
}

impl From<&AppConfig> for CrawlConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            scroll_pause: Duration::from_millis(config.scroll_pause_ms),
            initial_load_timeout: Duration::from_secs(config.initial_load_timeout_secs),
            max_empty_scrolls: config.max_empty_scrolls,
            max_cycles: config.max_cycles,
            price_field: config.price_field,
        }
    }
}

/// How a crawl run reached its terminal state.
#[derive(Debug)]
pub enum CrawlOutcome {
    /// The empty-cycle threshold was reached: the feed is exhausted.
    FeedExhausted,
    /// The configured cycle cap stopped the run before exhaustion.
    CycleLimit,
    /// No card ever appeared within the initial-load wait.
    InitialLoadTimeout,
    /// The session failed mid-run; whatever was accumulated is preserved.
    SessionFailed(SessionError),
}

impl CrawlOutcome {
    /// True for the terminal states a caller should surface as a run failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            CrawlOutcome::InitialLoadTimeout | CrawlOutcome::SessionFailed(_)
        )
    }
}

/// Everything a crawl run produced, on every terminal path.
#[derive(Debug)]
pub struct CrawlReport {
    /// Accepted records in discovery order.
    pub records: Vec<ProductRecord>,
    /// Scroll cycles executed (0 when the page never loaded).
    pub cycles: u64,
    pub outcome: CrawlOutcome,
}

/// Runs one full crawl of `url` over the given session.
///
/// Takes the session by value and releases it on every terminal path
/// (normal exhaustion, initial-load timeout, or mid-run failure) before
/// returning. Close failures are logged, not propagated: by that point the
/// report is already complete.
pub async fn crawl_listing<S: ListingSession>(
    mut session: S,
    url: &str,
    config: &CrawlConfig,
) -> CrawlReport {
    let mut records = Vec::new();
    let mut cycles = 0u64;
    let outcome = run(&mut session, url, config, &mut records, &mut cycles).await;
    if let Err(e) = session.close().await {
        warn!(error = %e, "failed to close listing session");
    }
    info!(
        cycles,
        unique = records.len(),
        outcome = ?outcome,
        "crawl finished"
    );
    CrawlReport {
        records,
        cycles,
        outcome,
    }
}

async fn run<S: ListingSession>(
    session: &mut S,
    url: &str,
    config: &CrawlConfig,
    records: &mut Vec<ProductRecord>,
    cycles: &mut u64,
) -> CrawlOutcome {
    info!(url, "opening listing page");
    if let Err(e) = session.navigate(url).await {
        error!(error = %e, "navigation failed");
        return CrawlOutcome::SessionFailed(e);
    }

    info!("waiting for the first product card");
    match session
        .wait_for_selector(selectors::PRODUCT_CARD, config.initial_load_timeout)
        .await
    {
        Ok(()) => {}
        Err(e @ SessionError::WaitTimeout { .. }) => {
            error!(error = %e, "listing never showed a product card");
            return CrawlOutcome::InitialLoadTimeout;
        }
        Err(e) => {
            error!(error = %e, "session failed while waiting for initial content");
            return CrawlOutcome::SessionFailed(e);
        }
    }
    info!("initial content loaded; starting scroll cycles");

    let mut seen = SeenSkus::new();
    let mut empty_cycles = 0u32;

    loop {
        *cycles += 1;
        tokio::time::sleep(config.scroll_pause).await;

        // Zero cards present is a zero-new-items cycle, not an error; it
        // feeds the same termination counter below.
        let cards = match session.find_cards(selectors::PRODUCT_CARD).await {
            Ok(cards) => cards,
            Err(e) => {
                error!(cycle = *cycles, error = %e, "card enumeration failed");
                return CrawlOutcome::SessionFailed(e);
            }
        };

        let mut new_this_cycle = 0u32;
        for card in &cards {
            let Some(record) = extract_record(card, config.price_field).await else {
                continue;
            };
            if seen.insert(&record.sku) {
                new_this_cycle += 1;
                info!(
                    n = records.len() + 1,
                    sku = %record.sku,
                    title = record.title.as_deref().unwrap_or("<untitled>"),
                    price = ?record.price,
                    reviews = record.reviews,
                    "accepted"
                );
                records.push(record);
            }
        }
        info!(
            cycle = *cycles,
            cards = cards.len(),
            new = new_this_cycle,
            "cycle complete"
        );

        if new_this_cycle == 0 {
            empty_cycles += 1;
            if empty_cycles >= config.max_empty_scrolls {
                info!(empty_cycles, "no new products after consecutive scrolls; stopping");
                return CrawlOutcome::FeedExhausted;
            }
        } else {
            empty_cycles = 0;
        }

        if config.max_cycles != 0 && *cycles >= config.max_cycles {
            warn!(cycles = *cycles, "cycle cap reached before the feed was exhausted");
            return CrawlOutcome::CycleLimit;
        }

        if let Err(e) = session.trigger_more_content().await {
            error!(cycle = *cycles, error = %e, "scroll trigger failed");
            return CrawlOutcome::SessionFailed(e);
        }
    }
}

#[cfg(test)]
#[path = "crawl_test.rs"]
mod tests;

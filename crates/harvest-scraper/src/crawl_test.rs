use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::testutil::FakeCard;

const LISTING_URL: &str = "https://kaspi.kz/shop/search?redirect=listing&q=%3AallMerchants%42";

/// Observation points that outlive the session (the controller consumes it).
#[derive(Clone)]
struct Probe {
    closed: Arc<AtomicBool>,
    scrolls: Arc<AtomicU32>,
}

/// A scripted session: `batches[n]` is the set of cards visible during
/// cycle `n`; once the script runs out, the last batch repeats, matching
/// a feed that has stopped producing new content.
struct FakeSession {
    batches: Vec<Vec<FakeCard>>,
    cycle: usize,
    fail_initial_wait: bool,
    fail_find_on_cycle: Option<usize>,
    probe: Probe,
}

impl FakeSession {
    fn new(batches: Vec<Vec<FakeCard>>) -> (Self, Probe) {
        let probe = Probe {
            closed: Arc::new(AtomicBool::new(false)),
            scrolls: Arc::new(AtomicU32::new(0)),
        };
        let session = Self {
            batches,
            cycle: 0,
            fail_initial_wait: false,
            fail_find_on_cycle: None,
            probe: probe.clone(),
        };
        (session, probe)
    }
}

impl ListingSession for FakeSession {
    type Card = FakeCard;

    async fn navigate(&mut self, _url: &str) -> Result<(), SessionError> {
        Ok(())
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), SessionError> {
        if self.fail_initial_wait {
            return Err(SessionError::WaitTimeout {
                selector: selector.to_owned(),
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            });
        }
        Ok(())
    }

    async fn find_cards(&mut self, _selector: &str) -> Result<Vec<FakeCard>, SessionError> {
        if self.fail_find_on_cycle == Some(self.cycle) {
            return Err(SessionError::backend(std::io::Error::other(
                "devtools connection lost",
            )));
        }
        let batch = self
            .batches
            .get(self.cycle)
            .or_else(|| self.batches.last())
            .cloned()
            .unwrap_or_default();
        self.cycle += 1;
        Ok(batch)
    }

    async fn trigger_more_content(&mut self) -> Result<(), SessionError> {
        self.probe.scrolls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn close(self) -> Result<(), SessionError> {
        self.probe.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Default crawl knobs with the inter-cycle pause zeroed out for tests.
fn fast_config() -> CrawlConfig {
    CrawlConfig {
        scroll_pause: Duration::ZERO,
        initial_load_timeout: Duration::from_millis(10),
        ..CrawlConfig::default()
    }
}

fn skus(report: &CrawlReport) -> Vec<&str> {
    report.records.iter().map(|r| r.sku.as_str()).collect()
}

#[tokio::test]
async fn stops_after_threshold_consecutive_empty_cycles() {
    // New items in cycles 1-2, nothing new from cycle 3 on: the counter
    // reaches 3 at cycle 5 and the run stops with only the early items.
    let growing = vec![FakeCard::product("1"), FakeCard::product("2")];
    let full = vec![
        FakeCard::product("1"),
        FakeCard::product("2"),
        FakeCard::product("3"),
    ];
    let (session, probe) = FakeSession::new(vec![growing, full]);

    let report = crawl_listing(session, LISTING_URL, &fast_config()).await;

    assert!(matches!(report.outcome, CrawlOutcome::FeedExhausted));
    assert_eq!(report.cycles, 5);
    assert_eq!(skus(&report), vec!["1", "2", "3"]);
    assert!(probe.closed.load(Ordering::SeqCst));
    // A scroll is triggered after every cycle except the terminal one.
    assert_eq!(probe.scrolls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn re_presented_sku_keeps_first_accepted_record() {
    let first = FakeCard::with_link("https://kaspi.kz/shop/p/test-product-1/").title("First Seen");
    let re_rendered =
        FakeCard::with_link("https://kaspi.kz/shop/p/test-product-1/").title("Re-Rendered");
    let (session, _probe) = FakeSession::new(vec![
        vec![first],
        vec![re_rendered, FakeCard::product("2")],
    ]);

    let report = crawl_listing(session, LISTING_URL, &fast_config()).await;

    assert_eq!(skus(&report), vec!["1", "2"]);
    assert_eq!(report.records[0].title.as_deref(), Some("First Seen"));
}

#[tokio::test]
async fn discovery_order_matches_first_appearance() {
    // The feed re-orders between cycles; acceptance order must not.
    let (session, _probe) = FakeSession::new(vec![
        vec![FakeCard::product("10"), FakeCard::product("11")],
        vec![FakeCard::product("12"), FakeCard::product("10")],
    ]);

    let report = crawl_listing(session, LISTING_URL, &fast_config()).await;

    assert_eq!(skus(&report), vec!["10", "11", "12"]);
}

#[tokio::test]
async fn empty_feed_terminates_with_no_records() {
    let (session, probe) = FakeSession::new(vec![vec![]]);

    let report = crawl_listing(session, LISTING_URL, &fast_config()).await;

    assert!(matches!(report.outcome, CrawlOutcome::FeedExhausted));
    assert!(!report.outcome.is_failure());
    assert_eq!(report.cycles, 3);
    assert!(report.records.is_empty());
    assert!(probe.closed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn initial_timeout_reports_failure_with_empty_results() {
    let (mut session, probe) = FakeSession::new(vec![vec![FakeCard::product("1")]]);
    session.fail_initial_wait = true;

    let report = crawl_listing(session, LISTING_URL, &fast_config()).await;

    assert!(matches!(report.outcome, CrawlOutcome::InitialLoadTimeout));
    assert!(report.outcome.is_failure());
    assert_eq!(report.cycles, 0);
    assert!(report.records.is_empty());
    assert!(probe.closed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn mid_run_session_failure_preserves_partial_results() {
    let (mut session, probe) = FakeSession::new(vec![vec![
        FakeCard::product("1"),
        FakeCard::product("2"),
    ]]);
    session.fail_find_on_cycle = Some(1);

    let report = crawl_listing(session, LISTING_URL, &fast_config()).await;

    assert!(matches!(report.outcome, CrawlOutcome::SessionFailed(_)));
    assert!(report.outcome.is_failure());
    assert_eq!(skus(&report), vec!["1", "2"]);
    assert!(probe.closed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn cycle_cap_stops_an_endless_feed() {
    // Every cycle brings a fresh item, so only the cap can stop the run.
    let batches: Vec<Vec<FakeCard>> = (1..=10)
        .map(|n| vec![FakeCard::product(&n.to_string())])
        .collect();
    let (session, _probe) = FakeSession::new(batches);
    let config = CrawlConfig {
        max_cycles: 4,
        ..fast_config()
    };

    let report = crawl_listing(session, LISTING_URL, &config).await;

    assert!(matches!(report.outcome, CrawlOutcome::CycleLimit));
    assert!(!report.outcome.is_failure());
    assert_eq!(report.cycles, 4);
    assert_eq!(report.records.len(), 4);
}

#[tokio::test]
async fn rejected_cards_contribute_nothing() {
    let batch = vec![
        FakeCard::default(), // no link at all
        FakeCard::with_link("https://kaspi.kz/shop/p/test-product-xyz/"),
        FakeCard::product("5"),
    ];
    let (session, _probe) = FakeSession::new(vec![batch]);

    let report = crawl_listing(session, LISTING_URL, &fast_config()).await;

    assert_eq!(skus(&report), vec!["5"]);
    // Rejected cards are re-rejected every cycle without affecting
    // termination: one productive cycle, then three empty ones.
    assert_eq!(report.cycles, 4);
}

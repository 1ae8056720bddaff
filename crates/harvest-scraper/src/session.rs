//! The seam between the crawl engine and whatever drives the actual page.
//!
//! The engine never touches a browser directly: it is written against these
//! traits, so tests run it against scripted in-memory sessions and production
//! runs it against a CDP-backed implementation.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The selector never appeared within the allotted wait.
    #[error("timed out after {timeout_ms} ms waiting for `{selector}`")]
    WaitTimeout { selector: String, timeout_ms: u64 },

    /// Any other failure of the underlying page driver.
    #[error("page session failure: {0}")]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl SessionError {
    /// Wraps a driver-specific error as a [`SessionError::Backend`].
    pub fn backend<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        SessionError::Backend(Box::new(source))
    }
}

/// A live page on the target listing, exclusively owned by one crawl run.
///
/// `close` consumes the session; the controller guarantees it is called on
/// every terminal path, so implementations can release their process or
/// connection there.
#[allow(async_fn_in_trait)]
pub trait ListingSession {
    type Card: ListingCard;

    /// Requests navigation to the given URL.
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError>;

    /// Blocks until at least one element matching `selector` is present,
    /// or fails with [`SessionError::WaitTimeout`] after `timeout`.
    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), SessionError>;

    /// Enumerates every element currently matching `selector`. An empty
    /// result is not an error.
    async fn find_cards(&mut self, selector: &str) -> Result<Vec<Self::Card>, SessionError>;

    /// Triggers the next content load (scroll-to-bottom equivalent).
    async fn trigger_more_content(&mut self) -> Result<(), SessionError>;

    /// Releases the underlying page resource.
    async fn close(self) -> Result<(), SessionError>;
}

/// One card element handle. Lookups are best-effort: a missing sub-element
/// or attribute is `None`, never an error.
#[allow(async_fn_in_trait)]
pub trait ListingCard {
    /// Text content of the first descendant matching `selector`.
    async fn find_text(&self, selector: &str) -> Option<String>;

    /// Value of the named attribute on the card element itself.
    async fn attribute(&self, name: &str) -> Option<String>;
}

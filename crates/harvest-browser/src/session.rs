//! A chromiumoxide-backed [`ListingSession`].
//!
//! One launched Chrome, one page, owned for the lifetime of a single crawl
//! run. The CDP event handler runs on its own task and is reaped on close.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::element::Element;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use harvest_scraper::{ListingCard, ListingSession, SessionError};

use crate::profile::DeviceProfile;

const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(250);
const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight);";

#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// Show a browser window instead of running headless.
    pub headful: bool,
    /// Explicit Chrome/Chromium binary; autodetected when unset.
    pub chrome_executable: Option<PathBuf>,
    pub profile: DeviceProfile,
}

/// A launched browser with one open page, driving the target listing.
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl BrowserSession {
    /// Launches Chrome and opens a blank page with the device profile
    /// applied, ready to navigate.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Backend`] when Chrome cannot be launched or
    /// the initial page cannot be configured.
    pub async fn launch(options: &LaunchOptions) -> Result<Self, SessionError> {
        let mut builder = BrowserConfig::builder()
            .window_size(options.profile.width, options.profile.height)
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--no-first-run")
            .arg("--no-default-browser-check");
        if options.headful {
            builder = builder.with_head();
        }
        if let Some(path) = &options.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder
            .build()
            .map_err(|e| SessionError::Backend(e.into()))?;

        info!(
            headful = options.headful,
            profile = %options.profile.name,
            "launching browser"
        );
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(SessionError::backend)?;
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(SessionError::backend)?;
        apply_profile(&page, &options.profile).await?;

        Ok(Self {
            browser,
            page,
            handler_task,
        })
    }
}

async fn apply_profile(page: &Page, profile: &DeviceProfile) -> Result<(), SessionError> {
    page.execute(SetUserAgentOverrideParams::new(profile.user_agent.clone()))
        .await
        .map_err(SessionError::backend)?;

    let metrics = SetDeviceMetricsOverrideParams::builder()
        .width(i64::from(profile.width))
        .height(i64::from(profile.height))
        .device_scale_factor(profile.scale_factor)
        .mobile(profile.mobile)
        .build()
        .map_err(|e| SessionError::Backend(e.into()))?;
    page.execute(metrics).await.map_err(SessionError::backend)?;
    Ok(())
}

impl ListingSession for BrowserSession {
    type Card = BrowserCard;

    async fn navigate(&mut self, url: &str) -> Result<(), SessionError> {
        debug!(url, "navigating");
        self.page.goto(url).await.map_err(SessionError::backend)?;
        Ok(())
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), SessionError> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(SessionError::WaitTimeout {
                    selector: selector.to_owned(),
                    timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                });
            }
            tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
        }
    }

    async fn find_cards(&mut self, selector: &str) -> Result<Vec<BrowserCard>, SessionError> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .map_err(SessionError::backend)?;
        Ok(elements.into_iter().map(BrowserCard).collect())
    }

    async fn trigger_more_content(&mut self) -> Result<(), SessionError> {
        self.page
            .evaluate(SCROLL_TO_BOTTOM.to_string())
            .await
            .map_err(SessionError::backend)?;
        Ok(())
    }

    async fn close(self) -> Result<(), SessionError> {
        let Self {
            page,
            mut browser,
            handler_task,
        } = self;
        if let Err(e) = page.close().await {
            debug!(error = %e, "page close failed");
        }
        if let Err(e) = browser.close().await {
            warn!(error = %e, "browser close failed");
        }
        let _ = browser.wait().await;
        handler_task.abort();
        info!("browser session released");
        Ok(())
    }
}

/// One visible listing card, as a CDP element handle.
pub struct BrowserCard(Element);

impl ListingCard for BrowserCard {
    async fn find_text(&self, selector: &str) -> Option<String> {
        let child = self.0.find_element(selector).await.ok()?;
        child.inner_text().await.ok().flatten()
    }

    async fn attribute(&self, name: &str) -> Option<String> {
        self.0.attribute(name).await.ok().flatten()
    }
}

//! The browser capability the crawl pipeline runs against.
//!
//! The pipeline never touches a browser engine directly; it drives a
//! [`Page`] — navigate, wait for a selector, read texts/attributes, click.
//! Production uses the Chromium-backed implementation in [`crate::chrome`];
//! tests script the trait directly. Keeping the seam at "selector in,
//! strings out" (rather than element handles) keeps the trait object-safe
//! and trivial to fake.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("timed out after {timeout_ms}ms waiting for \"{selector}\"")]
    Timeout { selector: String, timeout_ms: u64 },

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("browser error: {0}")]
    Browser(String),
}

/// One exclusively-owned browser page (tab).
///
/// All methods take `&mut self`: the crawl is strictly sequential and a page
/// is leased to exactly one operation at a time.
#[async_trait]
pub trait Page: Send {
    /// Navigates to `url` and waits for the load to complete, bounded by
    /// the implementation's navigation timeout.
    async fn goto(&mut self, url: &str) -> Result<(), PageError>;

    /// Waits until at least one element matches `selector`.
    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), PageError>;

    /// Inner text of every element matching `selector`, in DOM order.
    /// No matches is an empty `Vec`, not an error.
    async fn text_contents(&mut self, selector: &str) -> Result<Vec<String>, PageError>;

    /// The named attribute of every element matching `selector`, in DOM
    /// order. `None` entries are elements lacking the attribute.
    async fn attribute_values(
        &mut self,
        selector: &str,
        attribute: &str,
    ) -> Result<Vec<Option<String>>, PageError>;

    /// Clicks the first element matching `selector`.
    async fn click(&mut self, selector: &str) -> Result<(), PageError>;

    /// Fixed settle delay. Scripted pages override this to a no-op.
    async fn settle(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Wait bounds applied while driving a [`Page`], derived from
/// [`budfeed_core::AppConfig`].
#[derive(Debug, Clone, Copy)]
pub struct Waits {
    /// Bound on an expected element appearing.
    pub selector: Duration,
    /// Post-navigation settle delay on detail pages.
    pub settle: Duration,
}

impl Waits {
    #[must_use]
    pub fn from_config(config: &budfeed_core::AppConfig) -> Self {
        Self {
            selector: Duration::from_secs(config.selector_timeout_secs),
            settle: Duration::from_millis(config.settle_ms),
        }
    }

    /// Short bounds for scripted-page tests.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            selector: Duration::from_millis(50),
            settle: Duration::ZERO,
        }
    }
}

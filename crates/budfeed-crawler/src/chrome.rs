//! Chromium-backed implementation of the [`Page`] capability.
//!
//! The menu frontends are client-rendered React apps, so plain HTTP fetches
//! return an empty shell; a real browser engine has to execute them. One
//! headless Chromium instance is launched per run and one tab drives the
//! whole crawl.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use budfeed_core::AppConfig;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page as CdpPage;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::page::{Page, PageError};

/// Poll interval while waiting for a selector to appear.
const SELECTOR_POLL_MS: u64 = 100;

/// Locates the Chromium binary: explicit config path first, then `PATH`.
fn find_chromium(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = configured {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }
    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }
    None
}

/// A launched headless Chromium instance plus its CDP event pump.
pub struct ChromeSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl ChromeSession {
    /// Launches headless Chromium using the binary from
    /// `config.chrome_path` or the system `PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Browser`] when no Chromium binary can be found
    /// or the launch fails.
    pub async fn launch(config: &AppConfig) -> Result<Self, PageError> {
        let chrome_path = find_chromium(config.chrome_path.as_deref()).ok_or_else(|| {
            PageError::Browser(
                "Chromium not found; install it or set BUDFEED_CHROME_PATH".to_owned(),
            )
        })?;

        let browser_config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .build()
            .map_err(PageError::Browser)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| PageError::Browser(format!("failed to launch Chromium: {e}")))?;

        // Pump CDP events for the lifetime of the session.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        Ok(Self {
            browser,
            handler_task,
        })
    }

    /// Opens a fresh tab configured with the crawl's user agent and
    /// navigation timeout.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Browser`] if the tab cannot be created.
    pub async fn new_page(&self, config: &AppConfig) -> Result<ChromePage, PageError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| PageError::Browser(format!("failed to open page: {e}")))?;
        page.set_user_agent(&config.user_agent)
            .await
            .map_err(|e| PageError::Browser(format!("failed to set user agent: {e}")))?;
        Ok(ChromePage {
            page,
            nav_timeout: Duration::from_secs(config.nav_timeout_secs),
        })
    }

    /// Shuts the browser down and stops the event pump.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::warn!(error = %e, "browser did not close cleanly");
        }
        self.handler_task.abort();
    }
}

/// One Chromium tab implementing the [`Page`] capability.
pub struct ChromePage {
    page: CdpPage,
    nav_timeout: Duration,
}

fn browser_err(e: impl std::fmt::Display) -> PageError {
    PageError::Browser(e.to_string())
}

#[async_trait]
impl Page for ChromePage {
    async fn goto(&mut self, url: &str) -> Result<(), PageError> {
        let navigated = tokio::time::timeout(self.nav_timeout, self.page.goto(url)).await;
        match navigated {
            Ok(Ok(_)) => {
                // Settle redirects and the initial document load; selector
                // waits handle client-side rendering afterwards.
                let _ = self.page.wait_for_navigation().await;
                Ok(())
            }
            Ok(Err(e)) => Err(PageError::Navigation {
                url: url.to_owned(),
                reason: e.to_string(),
            }),
            Err(_) => Err(PageError::Navigation {
                url: url.to_owned(),
                reason: format!("timed out after {}ms", self.nav_timeout.as_millis()),
            }),
        }
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), PageError> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(PageError::Timeout {
                    selector: selector.to_owned(),
                    timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                });
            }
            tokio::time::sleep(Duration::from_millis(SELECTOR_POLL_MS)).await;
        }
    }

    async fn text_contents(&mut self, selector: &str) -> Result<Vec<String>, PageError> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .map_err(browser_err)?;
        let mut texts = Vec::with_capacity(elements.len());
        for element in elements {
            let text = element
                .inner_text()
                .await
                .map_err(browser_err)?
                .unwrap_or_default();
            texts.push(text);
        }
        Ok(texts)
    }

    async fn attribute_values(
        &mut self,
        selector: &str,
        attribute: &str,
    ) -> Result<Vec<Option<String>>, PageError> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .map_err(browser_err)?;
        let mut values = Vec::with_capacity(elements.len());
        for element in elements {
            values.push(element.attribute(attribute).await.map_err(browser_err)?);
        }
        Ok(values)
    }

    async fn click(&mut self, selector: &str) -> Result<(), PageError> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| PageError::Browser(format!("\"{selector}\" not found for click")))?;
        element.click().await.map_err(browser_err)?;
        Ok(())
    }
}

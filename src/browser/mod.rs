//! Browser session wrapper
//!
//! The watch never talks to Chrome directly; everything goes through the
//! [`BrowserSession`] trait so the loop and the acquisition flow can be
//! exercised against a fake session. [`ChromeSession`] is the real
//! implementation over `headless_chrome`, launched visible with a persistent
//! profile so the operator's manual login survives across runs.

use anyhow::{Context, Result};
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Keep the browser alive for the whole unattended watch; the crate default
/// idle timeout (30s) would kill Chrome between polls.
const IDLE_TIMEOUT_SECS: u64 = 365 * 24 * 3600;

/// The external browser session collaborator.
pub trait BrowserSession {
    fn navigate(&mut self, url: &str) -> Result<()>;
    fn current_url(&mut self) -> Result<String>;
    fn page_content(&mut self) -> Result<String>;
    fn close(&mut self);
}

/// Real Chrome session. The window is visible: the operator has to log in and
/// solve the CAPTCHA in it.
pub struct ChromeSession {
    browser: Option<Browser>,
    tab: Option<Arc<Tab>>,
}

impl ChromeSession {
    pub fn launch(profile_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(profile_dir)
            .with_context(|| format!("create profile dir {}", profile_dir.display()))?;

        let options = LaunchOptions::default_builder()
            .headless(false)
            .user_data_dir(Some(profile_dir.to_path_buf()))
            .idle_browser_timeout(Duration::from_secs(IDLE_TIMEOUT_SECS))
            .args(vec![OsStr::new("--start-maximized")])
            .build()
            .map_err(|e| anyhow::anyhow!("assemble chrome launch options: {}", e))?;

        let browser = Browser::new(options).context("launch chrome")?;
        let tab = browser.new_tab().context("open browser tab")?;
        info!("Browser launched with profile {}", profile_dir.display());

        Ok(Self {
            browser: Some(browser),
            tab: Some(tab),
        })
    }

    fn tab(&self) -> Result<&Arc<Tab>> {
        self.tab
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("browser session already closed"))
    }
}

impl BrowserSession for ChromeSession {
    fn navigate(&mut self, url: &str) -> Result<()> {
        debug!("Browser: navigating to {}", url);
        let tab = self.tab()?;
        tab.navigate_to(url)
            .with_context(|| format!("navigate to {}", url))?
            .wait_until_navigated()
            .context("wait for navigation")?;
        Ok(())
    }

    fn current_url(&mut self) -> Result<String> {
        Ok(self.tab()?.get_url())
    }

    fn page_content(&mut self) -> Result<String> {
        self.tab()?.get_content().context("read page content")
    }

    fn close(&mut self) {
        // Dropping the Browser handle ends the Chrome process.
        self.tab.take();
        if self.browser.take().is_some() {
            info!("Browser session closed");
        }
    }
}

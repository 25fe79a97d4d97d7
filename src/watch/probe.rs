//! Page probing: fetch the rendered text of the target URL.
//!
//! Every session failure is absorbed into [`ProbeResult::FetchError`] — the
//! monitor loop must stay alive across transient network and browser
//! failures, so nothing here propagates.

use crate::browser::BrowserSession;
use std::time::Duration;
use tracing::debug;

/// Exactly one of these is produced per poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    /// Rendered page text, treated as opaque.
    Content(String),
    /// Fetch failed; retried on the next cycle.
    FetchError(String),
}

/// Seam between the loop and the page fetch, so tests can script sequences.
pub trait Probe {
    fn probe(&mut self) -> ProbeResult;
}

/// Real probe: navigate the browser session to the captured registration URL,
/// wait a fixed settle delay for dynamic content, read the rendered text.
pub struct PageProbe<'a, S: BrowserSession> {
    session: &'a mut S,
    target_url: String,
    settle_delay: Duration,
}

impl<'a, S: BrowserSession> PageProbe<'a, S> {
    pub fn new(session: &'a mut S, target_url: impl Into<String>, settle_delay: Duration) -> Self {
        Self {
            session,
            target_url: target_url.into(),
            settle_delay,
        }
    }
}

impl<S: BrowserSession> Probe for PageProbe<'_, S> {
    fn probe(&mut self) -> ProbeResult {
        if let Err(e) = self.session.navigate(&self.target_url) {
            return ProbeResult::FetchError(format!("navigate failed: {:#}", e));
        }

        // Let dynamically rendered content settle before reading.
        std::thread::sleep(self.settle_delay);

        match self.session.page_content() {
            Ok(text) => {
                debug!("Probe: fetched {} chars from {}", text.chars().count(), self.target_url);
                ProbeResult::Content(text)
            }
            Err(e) => ProbeResult::FetchError(format!("read content failed: {:#}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    struct FlakySession {
        fail_navigate: bool,
        fail_content: bool,
    }

    impl BrowserSession for FlakySession {
        fn navigate(&mut self, _url: &str) -> anyhow::Result<()> {
            if self.fail_navigate {
                Err(anyhow!("connection refused"))
            } else {
                Ok(())
            }
        }

        fn current_url(&mut self) -> anyhow::Result<String> {
            Ok("https://example.edu".to_string())
        }

        fn page_content(&mut self) -> anyhow::Result<String> {
            if self.fail_content {
                Err(anyhow!("tab crashed"))
            } else {
                Ok("page body".to_string())
            }
        }

        fn close(&mut self) {}
    }

    #[test]
    fn test_navigate_failure_becomes_fetch_error() {
        let mut session = FlakySession {
            fail_navigate: true,
            fail_content: false,
        };
        let mut probe = PageProbe::new(&mut session, "https://example.edu", Duration::ZERO);
        match probe.probe() {
            ProbeResult::FetchError(cause) => assert!(cause.contains("connection refused")),
            other => panic!("expected FetchError, got {:?}", other),
        }
    }

    #[test]
    fn test_content_failure_becomes_fetch_error() {
        let mut session = FlakySession {
            fail_navigate: false,
            fail_content: true,
        };
        let mut probe = PageProbe::new(&mut session, "https://example.edu", Duration::ZERO);
        assert!(matches!(probe.probe(), ProbeResult::FetchError(_)));
    }

    #[test]
    fn test_successful_probe_returns_content() {
        let mut session = FlakySession {
            fail_navigate: false,
            fail_content: false,
        };
        let mut probe = PageProbe::new(&mut session, "https://example.edu", Duration::ZERO);
        assert_eq!(
            probe.probe(),
            ProbeResult::Content("page body".to_string())
        );
    }
}

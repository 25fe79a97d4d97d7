//! Acquisition flow: capture the dynamic registration URL.
//!
//! Runs once before the loop. Opens the login page, suspends until the
//! operator confirms they logged in and navigated to the registration page,
//! then validates and captures the current URL.

use crate::browser::BrowserSession;
use crate::error::WatchError;
use anyhow::{Context, Result};
use tracing::{error, info};

/// Blocking human-interaction point. Not polled, not timed; resumes only when
/// the operator signals readiness.
pub trait OperatorPrompt {
    fn wait_for_confirmation(&mut self, message: &str);
}

/// Production prompt: print the message and block on a stdin line.
pub struct StdinPrompt;

impl OperatorPrompt for StdinPrompt {
    fn wait_for_confirmation(&mut self, message: &str) {
        println!("{}", message);
        let mut line = String::new();
        let _ = std::io::stdin().read_line(&mut line);
    }
}

/// Capture the registration URL after the manual login step.
///
/// Fails with [`WatchError::InvalidNavigation`] when the URL the operator
/// ended up on lacks the marker token — that is operator error, not a
/// transient condition, so the run aborts.
pub fn acquire(
    session: &mut dyn BrowserSession,
    prompt: &mut dyn OperatorPrompt,
    login_url: &str,
    marker: &str,
) -> Result<String> {
    info!("Opening login page {}", login_url);
    session.navigate(login_url).context("open login page")?;

    prompt.wait_for_confirmation(
        "\nPlease log in manually, solve the CAPTCHA, and navigate to the registration page.\n\
         Once the URL contains the marker token, press Enter to continue...",
    );

    let current_url = session.current_url().context("read current URL")?;
    if !current_url.contains(marker) {
        error!("URL does not contain expected {:?} token", marker);
        return Err(WatchError::InvalidNavigation {
            url: current_url,
            marker: marker.to_string(),
        }
        .into());
    }

    info!("Captured dynamic registration URL: {}", current_url);
    Ok(current_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeSession {
        current_url: String,
        navigated: Vec<String>,
    }

    impl BrowserSession for FakeSession {
        fn navigate(&mut self, url: &str) -> Result<()> {
            self.navigated.push(url.to_string());
            Ok(())
        }

        fn current_url(&mut self) -> Result<String> {
            Ok(self.current_url.clone())
        }

        fn page_content(&mut self) -> Result<String> {
            Ok(String::new())
        }

        fn close(&mut self) {}
    }

    struct InstantPrompt;

    impl OperatorPrompt for InstantPrompt {
        fn wait_for_confirmation(&mut self, _message: &str) {}
    }

    #[test]
    fn test_captures_url_with_marker() {
        let mut session = FakeSession {
            current_url: "https://example.edu/Registration?dump=a1b2c3".to_string(),
            navigated: Vec::new(),
        };
        let url = acquire(
            &mut session,
            &mut InstantPrompt,
            "https://example.edu/Login",
            "dump=",
        )
        .unwrap();
        assert_eq!(url, "https://example.edu/Registration?dump=a1b2c3");
        assert_eq!(session.navigated, vec!["https://example.edu/Login"]);
    }

    #[test]
    fn test_missing_marker_is_invalid_navigation() {
        let mut session = FakeSession {
            current_url: "https://example.edu/Home".to_string(),
            navigated: Vec::new(),
        };
        let err = acquire(
            &mut session,
            &mut InstantPrompt,
            "https://example.edu/Login",
            "dump=",
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WatchError>(),
            Some(WatchError::InvalidNavigation { .. })
        ));
    }
}

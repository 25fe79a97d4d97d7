//! Watcher configuration
//!
//! One immutable [`WatchConfig`] is loaded from a TOML file at startup and
//! passed by reference into the acquisition flow and the monitor loop. Path
//! helpers keep everything under `$HOME/.regiwatch/` with a temp-dir
//! fallback.

use crate::error::WatchError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// How the loop behaves once an alert has fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    /// Alert once, then stop the loop.
    StopOnFirstAlert,
    /// Keep watching forever; repeat alerts are gated by the cooldown.
    ContinuousWithCooldown,
}

/// SMTP settings for the email channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub enabled: bool,
    pub smtp_server: String,
    pub smtp_port: u16,
    pub sender: String,
    pub password: String,
    pub recipients: Vec<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_server: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            sender: String::new(),
            password: String::new(),
            recipients: Vec::new(),
        }
    }
}

/// Watch configuration, read-only for the lifetime of the loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Login page opened for the manual authentication step.
    pub login_url: String,
    /// Text that indicates registration is open (case-insensitive).
    pub keyword: String,
    /// Substring the captured URL must contain once the operator reached the
    /// registration page.
    pub url_marker: String,
    /// Seconds between checks.
    pub check_interval_secs: u64,
    /// Minimum seconds between two alert dispatches.
    pub alert_cooldown_secs: u64,
    /// Pause after navigation so dynamically rendered content can load.
    pub settle_delay_secs: u64,
    pub run_mode: RunMode,
    /// Chrome profile directory; persistent so manual login state survives
    /// across runs.
    pub profile_dir: PathBuf,
    pub sound_path: PathBuf,
    pub log_file: Option<PathBuf>,
    pub email: EmailConfig,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            login_url: String::new(),
            keyword: "credit".to_string(),
            url_marker: "dump=".to_string(),
            check_interval_secs: 30,
            alert_cooldown_secs: 60,
            settle_delay_secs: 3,
            run_mode: RunMode::StopOnFirstAlert,
            profile_dir: default_profile_dir(),
            sound_path: PathBuf::from("alert-sound.mp3"),
            log_file: Some(default_log_file_path()),
            email: EmailConfig::default(),
        }
    }
}

impl WatchConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let config: WatchConfig = toml::from_str(&raw)
            .with_context(|| format!("parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the loop cannot run with.
    pub fn validate(&self) -> Result<(), WatchError> {
        let parsed = Url::parse(&self.login_url)
            .map_err(|e| WatchError::Config(format!("invalid login_url: {}", e)))?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(WatchError::Config(format!(
                    "login_url must use http or https, got {:?}",
                    other
                )))
            }
        }
        if self.keyword.trim().is_empty() {
            return Err(WatchError::Config("keyword must not be empty".to_string()));
        }
        if self.url_marker.is_empty() {
            return Err(WatchError::Config("url_marker must not be empty".to_string()));
        }
        if self.check_interval_secs == 0 {
            return Err(WatchError::Config(
                "check_interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.email.enabled {
            if self.email.sender.trim().is_empty() {
                return Err(WatchError::Config(
                    "email.sender must be set when email is enabled".to_string(),
                ));
            }
            if self.email.recipients.is_empty() {
                return Err(WatchError::Config(
                    "email.recipients must not be empty when email is enabled".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    pub fn alert_cooldown(&self) -> Duration {
        Duration::from_secs(self.alert_cooldown_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }
}

/// App directory: `$HOME/.regiwatch/`, temp dir when HOME is not available.
pub fn app_dir() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".regiwatch");
    }
    std::env::temp_dir().join("regiwatch")
}

/// Ensure the app directory exists.
pub fn ensure_app_dir() -> std::io::Result<()> {
    std::fs::create_dir_all(app_dir())
}

pub fn default_config_path() -> PathBuf {
    app_dir().join("config.toml")
}

pub fn default_log_file_path() -> PathBuf {
    app_dir().join("regiwatch.log")
}

pub fn default_profile_dir() -> PathBuf {
    app_dir().join("chrome-profile")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn valid_config() -> WatchConfig {
        WatchConfig {
            login_url: "https://flexstudent.example.edu/Login".to_string(),
            ..WatchConfig::default()
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_default_config_needs_login_url() {
        assert!(WatchConfig::default().validate().is_err());
    }

    #[test]
    fn test_rejects_empty_keyword() {
        let config = WatchConfig {
            keyword: "   ".to_string(),
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_interval() {
        let config = WatchConfig {
            check_interval_secs: 0,
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let config = WatchConfig {
            login_url: "ftp://example.edu/Login".to_string(),
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_enabled_email_needs_sender_and_recipients() {
        let mut config = valid_config();
        config.email.enabled = true;
        assert!(config.validate().is_err());

        config.email.sender = "me@example.com".to_string();
        assert!(config.validate().is_err());

        config.email.recipients = vec!["you@example.com".to_string()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
login_url = "https://flexstudent.example.edu/Login"
keyword = "credit"
check_interval_secs = 10
alert_cooldown_secs = 120
run_mode = "continuous-with-cooldown"

[email]
enabled = true
sender = "me@example.com"
password = "app-password"
recipients = ["you@example.com", "other@example.com"]
"#
        )
        .unwrap();

        let config = WatchConfig::load(file.path()).unwrap();
        assert_eq!(config.keyword, "credit");
        assert_eq!(config.check_interval(), Duration::from_secs(10));
        assert_eq!(config.alert_cooldown(), Duration::from_secs(120));
        assert_eq!(config.run_mode, RunMode::ContinuousWithCooldown);
        assert_eq!(config.url_marker, "dump=");
        assert!(config.email.enabled);
        assert_eq!(config.email.recipients.len(), 2);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "login_url = \"https://example.edu\"\ncheck_interval_secs = 0").unwrap();
        assert!(WatchConfig::load(file.path()).is_err());
    }
}

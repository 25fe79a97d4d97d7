//! Alert channel implementations: desktop popup, sound playback, email.

use anyhow::{Context, Result};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use notify_rust::{Notification, Timeout};
use rodio::{OutputStreamBuilder, Sink};
use std::path::PathBuf;
use tracing::{info, warn};

/// What a channel did with one alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// Nothing was attempted (e.g. missing sound file); distinct from failure.
    Skipped,
}

/// One notification channel. Channels fail independently; the notifier
/// records each result and carries on.
pub trait AlertChannel {
    fn name(&self) -> &str;

    fn enabled(&self) -> bool {
        true
    }

    fn send(&mut self, title: &str, message: &str) -> Result<Delivery>;
}

/// Desktop popup notification.
pub struct DesktopChannel {
    timeout_secs: u32,
}

impl DesktopChannel {
    pub fn new(timeout_secs: u32) -> Self {
        Self { timeout_secs }
    }
}

impl AlertChannel for DesktopChannel {
    fn name(&self) -> &str {
        "desktop"
    }

    fn send(&mut self, title: &str, message: &str) -> Result<Delivery> {
        let _handle = Notification::new()
            .summary(title)
            .body(message)
            .timeout(Timeout::Milliseconds(self.timeout_secs * 1000))
            .show()
            .context("show desktop notification")?;
        Ok(Delivery::Delivered)
    }
}

/// Audible alert: plays a sound file to completion. A missing file degrades
/// the channel with a warning instead of failing it.
pub struct SoundChannel {
    path: PathBuf,
}

impl SoundChannel {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl AlertChannel for SoundChannel {
    fn name(&self) -> &str {
        "sound"
    }

    fn send(&mut self, _title: &str, _message: &str) -> Result<Delivery> {
        if !self.path.exists() {
            warn!("Sound file {} not found. Skipping.", self.path.display());
            return Ok(Delivery::Skipped);
        }

        let mut stream =
            OutputStreamBuilder::open_default_stream().context("open audio output")?;
        stream.log_on_drop(false);
        let sink = Sink::connect_new(stream.mixer());
        let file = std::fs::File::open(&self.path)
            .with_context(|| format!("open sound file {}", self.path.display()))?;
        let source = rodio::Decoder::try_from(file)
            .with_context(|| format!("decode sound file {}", self.path.display()))?;
        sink.append(source);
        sink.sleep_until_end();
        Ok(Delivery::Delivered)
    }
}

/// Email over blocking SMTP with STARTTLS. Best-effort: delivery failures are
/// recorded by the notifier, never crash the loop.
pub struct EmailChannel {
    config: crate::config::EmailConfig,
}

impl EmailChannel {
    pub fn new(config: crate::config::EmailConfig) -> Self {
        Self { config }
    }
}

impl AlertChannel for EmailChannel {
    fn name(&self) -> &str {
        "email"
    }

    fn enabled(&self) -> bool {
        self.config.enabled
    }

    fn send(&mut self, title: &str, message: &str) -> Result<Delivery> {
        let mut builder = Message::builder()
            .from(self.config.sender.parse().context("parse sender address")?)
            .subject(title);
        for recipient in &self.config.recipients {
            builder = builder.to(recipient
                .parse()
                .with_context(|| format!("parse recipient address {:?}", recipient))?);
        }
        let email = builder
            .body(message.to_string())
            .context("build email message")?;

        let credentials =
            Credentials::new(self.config.sender.clone(), self.config.password.clone());
        let mailer = SmtpTransport::starttls_relay(&self.config.smtp_server)
            .with_context(|| format!("SMTP relay {}", self.config.smtp_server))?
            .port(self.config.smtp_port)
            .credentials(credentials)
            .build();

        mailer.send(&email).context("send email")?;
        info!(
            "Email notification sent to: {}",
            self.config.recipients.join(", ")
        );
        Ok(Delivery::Delivered)
    }
}

//! Alert dispatch
//!
//! Fans one message out to independently-failing channels. A single channel's
//! failure is caught and recorded, never escalated — partial delivery is a
//! normal outcome for an unattended watch.

pub mod channels;

use channels::{AlertChannel, Delivery};
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

/// Per-channel result of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelStatus {
    Sent,
    Failed(String),
    /// Channel disabled or its asset missing; neither sent nor failed.
    Skipped,
}

/// What one dispatch did, channel by channel. The dispatch itself never fails
/// as a unit.
#[derive(Debug, Clone)]
pub struct NotificationOutcome {
    pub dispatched_at: DateTime<Utc>,
    pub channels: Vec<(String, ChannelStatus)>,
}

impl NotificationOutcome {
    pub fn status(&self, name: &str) -> Option<&ChannelStatus> {
        self.channels
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, status)| status)
    }

    pub fn any_sent(&self) -> bool {
        self.channels
            .iter()
            .any(|(_, status)| *status == ChannelStatus::Sent)
    }
}

/// Owns the configured channels and delivers alerts through each of them.
pub struct Notifier {
    channels: Vec<Box<dyn AlertChannel>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
        }
    }

    pub fn register(&mut self, channel: Box<dyn AlertChannel>) {
        self.channels.push(channel);
    }

    /// Invoke every enabled channel; record each result independently.
    pub fn dispatch(&mut self, title: &str, message: &str) -> NotificationOutcome {
        let mut results = Vec::with_capacity(self.channels.len());

        for channel in &mut self.channels {
            let name = channel.name().to_string();

            if !channel.enabled() {
                info!("Alert channel {} disabled, skipping", name);
                results.push((name, ChannelStatus::Skipped));
                continue;
            }

            match channel.send(title, message) {
                Ok(Delivery::Delivered) => {
                    info!("Alert sent via {}", name);
                    results.push((name, ChannelStatus::Sent));
                }
                Ok(Delivery::Skipped) => {
                    warn!("Alert channel {} skipped", name);
                    results.push((name, ChannelStatus::Skipped));
                }
                Err(e) => {
                    error!("Failed to send alert via {}: {:#}", name, e);
                    results.push((name, ChannelStatus::Failed(format!("{:#}", e))));
                }
            }
        }

        NotificationOutcome {
            dispatched_at: Utc::now(),
            channels: results,
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    struct StubChannel {
        name: &'static str,
        enabled: bool,
        delivery: Option<Delivery>, // None = fail
    }

    impl AlertChannel for StubChannel {
        fn name(&self) -> &str {
            self.name
        }

        fn enabled(&self) -> bool {
            self.enabled
        }

        fn send(&mut self, _title: &str, _message: &str) -> anyhow::Result<Delivery> {
            match self.delivery {
                Some(delivery) => Ok(delivery),
                None => bail!("channel down"),
            }
        }
    }

    #[test]
    fn test_one_failing_channel_does_not_block_the_rest() {
        let mut notifier = Notifier::new();
        notifier.register(Box::new(StubChannel {
            name: "desktop",
            enabled: true,
            delivery: Some(Delivery::Delivered),
        }));
        notifier.register(Box::new(StubChannel {
            name: "sound",
            enabled: true,
            delivery: None,
        }));
        notifier.register(Box::new(StubChannel {
            name: "email",
            enabled: true,
            delivery: Some(Delivery::Delivered),
        }));

        let outcome = notifier.dispatch("title", "message");
        assert_eq!(outcome.status("desktop"), Some(&ChannelStatus::Sent));
        assert!(matches!(
            outcome.status("sound"),
            Some(ChannelStatus::Failed(_))
        ));
        assert_eq!(outcome.status("email"), Some(&ChannelStatus::Sent));
        assert!(outcome.any_sent());
    }

    #[test]
    fn test_disabled_channel_is_skipped_not_failed() {
        let mut notifier = Notifier::new();
        notifier.register(Box::new(StubChannel {
            name: "email",
            enabled: false,
            delivery: Some(Delivery::Delivered),
        }));

        let outcome = notifier.dispatch("title", "message");
        assert_eq!(outcome.status("email"), Some(&ChannelStatus::Skipped));
        assert!(!outcome.any_sent());
    }

    #[test]
    fn test_channel_reported_skip_is_recorded_as_skipped() {
        let mut notifier = Notifier::new();
        notifier.register(Box::new(StubChannel {
            name: "sound",
            enabled: true,
            delivery: Some(Delivery::Skipped),
        }));

        let outcome = notifier.dispatch("title", "message");
        assert_eq!(outcome.status("sound"), Some(&ChannelStatus::Skipped));
    }

    #[test]
    fn test_dispatch_with_no_channels_is_empty_outcome() {
        let mut notifier = Notifier::new();
        let outcome = notifier.dispatch("title", "message");
        assert!(outcome.channels.is_empty());
        assert!(!outcome.any_sent());
    }
}

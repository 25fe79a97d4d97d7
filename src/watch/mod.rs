//! The monitoring loop
//!
//! Per cycle: probe the page, detect the keyword, consult the cooldown gate,
//! dispatch alerts. Fetch failures are never fatal — the watch is unattended
//! and retries forever at the poll interval.

pub mod acquire;
pub mod cooldown;
pub mod detect;
pub mod probe;

use crate::alerts::Notifier;
use crate::config::{RunMode, WatchConfig};
use cooldown::CooldownGate;
use detect::keyword_present;
use probe::{Probe, ProbeResult};
use std::time::{Duration, Instant};
use tracing::{error, info};

pub const ALERT_TITLE: &str = "Course Registration";
pub const ALERT_MESSAGE: &str = "Registration is now OPEN!";

/// Where one poll cycle ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Keyword absent; keep polling.
    StillClosed,
    /// Probe failed; logged and retried next cycle.
    FetchFailed,
    /// Keyword present but the cooldown is still running.
    Suppressed,
    /// Alert dispatched; keep polling (continuous mode).
    Alerted,
    /// Alert dispatched and the loop is done (stop-on-first-alert mode).
    Terminated,
}

pub struct MonitorLoop<'a, P: Probe> {
    probe: P,
    notifier: &'a mut Notifier,
    gate: CooldownGate,
    keyword: String,
    run_mode: RunMode,
    poll_interval: Duration,
}

impl<'a, P: Probe> MonitorLoop<'a, P> {
    pub fn new(config: &WatchConfig, probe: P, notifier: &'a mut Notifier) -> Self {
        Self {
            probe,
            notifier,
            gate: CooldownGate::new(config.alert_cooldown()),
            keyword: config.keyword.clone(),
            run_mode: config.run_mode,
            poll_interval: config.check_interval(),
        }
    }

    /// Run until terminated: stop-on-first-alert mode exits after the first
    /// dispatched alert, continuous mode runs until the process is killed.
    pub fn run(&mut self) {
        info!(
            "Starting watch loop, checking every {}s",
            self.poll_interval.as_secs()
        );
        loop {
            if self.run_cycle() == CycleOutcome::Terminated {
                info!("First alert dispatched, stopping watch loop");
                return;
            }
            std::thread::sleep(self.poll_interval);
        }
    }

    /// One poll cycle: probe, detect, gate, dispatch. No sleeping here; the
    /// poll-interval wait lives in [`run`](Self::run).
    pub fn run_cycle(&mut self) -> CycleOutcome {
        match self.probe.probe() {
            ProbeResult::FetchError(cause) => {
                error!("Error during check: {}", cause);
                CycleOutcome::FetchFailed
            }
            ProbeResult::Content(text) => self.evaluate(&text),
        }
    }

    fn evaluate(&mut self, text: &str) -> CycleOutcome {
        if !keyword_present(text, &self.keyword) {
            info!("Registration still closed");
            return CycleOutcome::StillClosed;
        }

        // The gate compares against the detecting cycle's timestamp, recorded
        // only when an alert actually fires.
        let now = Instant::now();
        if !self.gate.may_fire(now) {
            info!("Registration open, alert suppressed (cooldown)");
            return CycleOutcome::Suppressed;
        }

        info!("{}", ALERT_MESSAGE);
        self.notifier.dispatch(ALERT_TITLE, ALERT_MESSAGE);
        self.gate.record_fired(now);

        match self.run_mode {
            RunMode::StopOnFirstAlert => CycleOutcome::Terminated,
            RunMode::ContinuousWithCooldown => CycleOutcome::Alerted,
        }
    }
}

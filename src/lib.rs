//! Core library for the regiwatch binary.
//!
//! The watch pipeline: [`watch::acquire`] captures the dynamic registration
//! URL after the operator logs in manually, then [`watch::MonitorLoop`] polls
//! it through the browser session and dispatches alerts via [`alerts`].

pub mod alerts;
pub mod browser;
pub mod config;
pub mod error;
pub mod logging;
pub mod watch;

pub use logging::init_tracing;

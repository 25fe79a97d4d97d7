//! Error taxonomy for the watcher.
//!
//! Only `InvalidNavigation` ends a run from inside the core; transient
//! conditions (fetch failures, channel failures, missing sound asset) are
//! modeled as values and absorbed by the loop.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatchError {
    /// The operator confirmed readiness while on the wrong page. Fatal and
    /// not retried: the URL is expected to carry the marker token only after
    /// the operator reached the registration page.
    #[error("not on the registration page: current URL {url:?} does not contain {marker:?}")]
    InvalidNavigation { url: String, marker: String },

    /// Startup configuration rejected before the run begins.
    #[error("invalid configuration: {0}")]
    Config(String),
}

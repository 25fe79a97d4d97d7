//! Structured logging using tracing
//!
//! Console output on stderr plus an optional append-only log file so every
//! state transition of the watch survives for later inspection.

use std::path::Path;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing with console and optional file output.
///
/// Verbosity comes from the command line (`-v` count), not RUST_LOG: the log
/// file is part of the tool's contract and must not go quiet because of an
/// inherited environment variable. Default level is `info` so every poll
/// cycle leaves a record.
pub fn init_tracing(verbosity: u8, log_file: Option<&Path>) {
    let filter_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::new(filter_level);

    let registry = tracing_subscriber::registry().with(filter);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    if let Some(log_path) = log_file {
        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .ok();

        if let Some(file) = file {
            let file_layer = fmt::layer()
                .with_writer(file)
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_ansi(false); // No ANSI in files

            registry.with(console_layer).with(file_layer).init();
            return;
        }
        // Fall through to console only if the file cannot be opened.
    }

    registry.with(console_layer).init();
}

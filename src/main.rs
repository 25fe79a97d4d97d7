use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use regiwatch::alerts::channels::{DesktopChannel, EmailChannel, SoundChannel};
use regiwatch::alerts::Notifier;
use regiwatch::browser::{BrowserSession, ChromeSession};
use regiwatch::config::{self, WatchConfig};
use regiwatch::watch::acquire::{acquire, OperatorPrompt, StdinPrompt};
use regiwatch::watch::probe::PageProbe;
use regiwatch::watch::MonitorLoop;

/// Desktop popup display time (seconds).
const DESKTOP_TIMEOUT_SECS: u32 = 10;

#[derive(Parser, Debug)]
#[command(name = "regiwatch")]
#[command(about = "Watches a registration page and alerts when the window opens", long_about = None)]
struct Args {
    /// Verbose output (-v, -vv)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to the TOML config file (default: ~/.regiwatch/config.toml)
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Send a test email with the configured SMTP settings and exit
    #[arg(long = "send-test-email")]
    send_test_email: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config_path = args.config.unwrap_or_else(config::default_config_path);
    let config = WatchConfig::load(&config_path)
        .with_context(|| format!("load config from {}", config_path.display()))?;

    config::ensure_app_dir().ok();
    regiwatch::init_tracing(args.verbose, config.log_file.as_deref());
    info!("regiwatch started (config {})", config_path.display());

    if args.send_test_email {
        return send_test_email(&config);
    }

    let mut session = ChromeSession::launch(&config.profile_dir).context("launch browser")?;
    let result = run(&config, &mut session);

    // Cleanup runs on every exit path. The operator confirms first so a
    // failed run can still be inspected in the open window.
    StdinPrompt.wait_for_confirmation("Press Enter to close the browser...");
    session.close();
    info!("regiwatch ended");
    result
}

fn run(config: &WatchConfig, session: &mut ChromeSession) -> anyhow::Result<()> {
    let mut prompt = StdinPrompt;
    let target_url = acquire(session, &mut prompt, &config.login_url, &config.url_marker)?;

    let mut notifier = build_notifier(config);
    let probe = PageProbe::new(session, target_url, config.settle_delay());
    MonitorLoop::new(config, probe, &mut notifier).run();
    Ok(())
}

fn build_notifier(config: &WatchConfig) -> Notifier {
    let mut notifier = Notifier::new();
    notifier.register(Box::new(DesktopChannel::new(DESKTOP_TIMEOUT_SECS)));
    notifier.register(Box::new(SoundChannel::new(config.sound_path.clone())));
    notifier.register(Box::new(EmailChannel::new(config.email.clone())));
    notifier
}

/// One-shot SMTP check, separate from the watch itself.
fn send_test_email(config: &WatchConfig) -> anyhow::Result<()> {
    use regiwatch::alerts::channels::{AlertChannel, Delivery};

    if !config.email.enabled {
        anyhow::bail!("email is disabled in the config; enable [email] first");
    }

    let mut channel = EmailChannel::new(config.email.clone());
    match channel.send(
        "Test email from regiwatch",
        "Hello! This is a test email to verify SMTP settings.",
    )? {
        Delivery::Delivered => {
            println!("Test email sent to: {}", config.email.recipients.join(", "));
            Ok(())
        }
        Delivery::Skipped => anyhow::bail!("email channel skipped the test message"),
    }
}

use anyhow::Context;
use clap::Parser;
use coupon_select::app::{CheckoutApp, CheckoutFlags};
use coupon_select::cli::Cli;
use coupon_select::load::{load_coupons, sample_coupons};
use coupon_select::{log_to_file, run_with, KeyboardSignals, OutputTarget, ProgramOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let coupons = match &cli.coupons {
        Some(path) => load_coupons(path)?,
        None => sample_coupons(),
    };

    let options = ProgramOptions {
        focus_reporting: true,
        output: if cli.stderr {
            OutputTarget::Stderr
        } else {
            OutputTarget::Stdout
        },
        ..ProgramOptions::default()
    };
    let flags = CheckoutFlags {
        coupons,
        options: cli.picker_options(),
        signals: KeyboardSignals::new(),
    };

    let app = run_with::<CheckoutApp>(flags, options)
        .await
        .context("terminal session failed")?;

    if let Some(coupon) = app.applied() {
        println!("{}", coupon.value);
    }
    Ok(())
}

/// Route `tracing` output to `path`; the terminal belongs to the UI.
fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = log_to_file(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

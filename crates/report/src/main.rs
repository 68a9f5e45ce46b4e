//! `cadence-report` -- prints the DORA and Flow dashboard for a snapshot.
//!
//! Reads a JSON snapshot of weekly metric series, computes forecasts,
//! blended current-week values, trends and tiers, and writes the dashboard
//! payload to stdout as JSON. See [`cadence_report::config::ReportConfig`]
//! for the environment variables it reads.

use cadence_core::blend::current_weekday;
use cadence_report::config::{LogFormat, ReportConfig};
use cadence_report::dashboard::build_dashboard;
use cadence_report::snapshot::Snapshot;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    dotenvy::dotenv().ok();

    let config = ReportConfig::from_env();

    let log_format = config
        .as_ref()
        .map(|c| c.log_format)
        .unwrap_or_default();
    init_tracing(log_format);

    let config = config.unwrap_or_else(|err| {
        tracing::error!(error = %err, "Invalid configuration");
        std::process::exit(1);
    });

    let weekday = config.weekday.unwrap_or_else(current_weekday);

    tracing::info!(
        snapshot = %config.snapshot_path.display(),
        blend_curve = config.options.blend_curve.as_str(),
        weekday = %weekday,
        "Starting cadence-report",
    );

    let snapshot = Snapshot::load(&config.snapshot_path).unwrap_or_else(|err| {
        tracing::error!(error = %err, "Failed to load snapshot");
        std::process::exit(1);
    });

    let dashboard = build_dashboard(&snapshot, &config.options, weekday);

    match serde_json::to_string_pretty(&dashboard) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            tracing::error!(error = %err, "Failed to serialize dashboard");
            std::process::exit(1);
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cadence_report=info".into());

    // Logs go to stderr so stdout carries only the dashboard JSON.
    match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

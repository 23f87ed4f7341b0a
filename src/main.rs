//! Claude Code Usage Monitor binary entry point.
//!
//! Logs go to stderr; stdout carries only the report.

// Enable the coverage attribute when running with nightly for llvm-cov exclusions
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::sync::Arc;

use usage_monitor::backend::datadog::DatadogClient;
use usage_monitor::backend::prometheus::PrometheusClient;
use usage_monitor::backend::{BackendKind, MetricsBackend};
use usage_monitor::cli::{CliArgs, USAGE};
use usage_monitor::collector::MetricsCollector;
use usage_monitor::config::{BackendConfig, Config};
use usage_monitor::error::{AppError, ConfigError};
use usage_monitor::monitor::UsageMonitor;
use usage_monitor::poller::Poller;
use usage_monitor::report::{ConsoleRenderer, ReportRenderer};

const DATADOG_APP_KEY_HINT: &str =
    "Get your application key from: https://app.datadoghq.com/organization-settings/application-keys";

#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = match CliArgs::parse(&argv) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}\n\n{USAGE}");
            std::process::exit(2);
        }
    };
    if args.help {
        print!("{USAGE}");
        return;
    }

    let config = match Config::from_env(args.backend) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            if matches!(&e, ConfigError::MissingRequired { var } if var == "DD_APPLICATION_KEY") {
                eprintln!("{DATADOG_APP_KEY_HINT}");
            }
            std::process::exit(1);
        }
    };

    // Logging goes to stderr only (stdout is for the report). LOG_LEVEL may
    // come from .env, which is only read by Config::from_env.
    tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!(
        backend = %config.backend_kind(),
        timeout_ms = config.request_timeout_ms,
        lookback_secs = config.lookback.as_secs(),
        "Configuration loaded"
    );

    let result = match config.backend.clone() {
        BackendConfig::Prometheus(prometheus) => match PrometheusClient::new(prometheus) {
            Ok(client) => run(client, &config, &args).await,
            Err(e) => Err(e),
        },
        BackendConfig::Datadog(datadog) => match DatadogClient::new(datadog) {
            Ok(client) => run(client, &config, &args).await,
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        if matches!(e, AppError::ConnectionFailed { backend: BackendKind::Datadog }) {
            eprintln!(
                "❌ Failed to connect to Datadog. Please check DD_API_KEY and DD_APPLICATION_KEY."
            );
        }
        std::process::exit(1);
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
async fn run<B>(backend: B, config: &Config, args: &CliArgs) -> Result<(), AppError>
where
    B: MetricsBackend + 'static,
{
    let kind = backend.kind();
    let collector = MetricsCollector::new(backend);

    if kind == BackendKind::Datadog {
        tracing::info!("Testing Datadog connection");
        if !collector.check_connection().await {
            return Err(AppError::ConnectionFailed { backend: kind });
        }
        tracing::info!("Connected to Datadog");
    }

    let interval = args.poll_interval.unwrap_or(config.poll_interval);
    let renderer: Arc<dyn ReportRenderer> = if args.is_polling() {
        Arc::new(ConsoleRenderer::polling(interval))
    } else {
        Arc::new(ConsoleRenderer::new())
    };
    let monitor = UsageMonitor::new(collector, renderer).with_lookback(config.lookback);

    if !args.is_polling() {
        monitor.run_once().await?;
        return Ok(());
    }

    let mut poller = Poller::new(monitor, interval);
    poller.start();

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
    }
    tracing::info!("Shutting down monitor");
    poller.stop();
    poller.wait().await;
    Ok(())
}

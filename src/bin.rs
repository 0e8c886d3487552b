//! Binary entry point for `jira-relay`.
//!
//! This module provides the command-line interface for jira-relay with options
//! for configuration file paths and logging verbosity. It reads one Jira webhook
//! payload, prints the resulting chat message (or error record) as JSON, and can
//! optionally post the message to Rocket.Chat.

use std::io::Read;

use clap::Parser;
use jira_relay::base::{config::Config, types::Void};
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, WithExportConfig};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};

/// Jira-relay: turns Jira webhook events into Rocket.Chat messages.
///
/// Configuration can come from `config.toml` or environment variables
/// prefixed with `JIRA_RELAY_`. The result is printed to stdout; nothing is
/// printed when the event is filtered out.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the webhook payload; reads stdin when omitted.
    input: Option<std::path::PathBuf>,
    /// Override the config file path (optional).
    ///
    /// By default, the relay will look for a config file at `.hidden/config.toml`
    /// in the current directory.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
    /// Post the produced message to the configured `chat_webhook_url`.
    #[arg(short, long)]
    post: bool,
    /// Export spans over OTLP/HTTP.
    #[arg(long)]
    otlp: bool,
    /// Increase log verbosity (-v, -vv, etc.).
    ///
    /// Use multiple times to increase verbosity:
    /// - No flag: INFO level
    /// - -v: DEBUG level
    /// - -vv or more: TRACE level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Main entry point for the jira-relay binary.
///
/// Sets up logging based on verbosity, loads configuration, and relays the payload.
#[tokio::main]
async fn main() -> Void {
    let args = Args::parse();

    // Construct the level filter.

    let level = match args.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let level_filter = tracing_subscriber::filter::LevelFilter::from_level(level);

    // Prepare the log layer; stdout is reserved for the result.

    let stderr = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_ansi(true)
        .with_level(true)
        .with_file(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);

    // Prepare the otlp layer.

    let otel = if args.otlp {
        let exporter = opentelemetry_otlp::SpanExporter::builder().with_http().with_protocol(Protocol::HttpBinary).build()?;
        let tracer = opentelemetry_sdk::trace::SdkTracerProvider::builder().with_simple_exporter(exporter).build().tracer("jira-relay");
        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    tracing_subscriber::registry().with(otel).with(level_filter).with(stderr).init();

    let config = Config::load(args.config.as_deref())?;

    // Read the payload.

    let payload = match &args.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    if let Some(response) = jira_relay::start(config, &payload, args.post).await? {
        println!("{}", serde_json::to_string_pretty(&response)?);
    }

    Ok(())
}

//! learnd entry point.
//!
//! Loads the controller configuration, then replays switch events from a
//! file or stdin and writes the resulting switch requests to stdout.

use anyhow::Context;
use clap::Parser;
use ofctl_learnd::replay::{replay, JsonLinesSwitch};
use ofctl_learnd::{Controller, ControllerConfig};
use ofctl_switch::SwitchConnection;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use tokio::fs::File;
use tokio::io::{AsyncBufRead, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Learning switch controller
#[derive(Parser, Debug)]
#[command(name = "learnd")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (TOML); defaults are used when omitted
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Switch event stream (JSON lines); reads stdin when omitted
    #[arg(short = 'e', long)]
    events: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,
}

fn init_logging(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("invalid log level {level:?}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to set logger: {e}"))
}

type EventSource = Box<dyn AsyncBufRead + Unpin + Send>;

async fn open_events(path: Option<&PathBuf>) -> anyhow::Result<EventSource> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .await
                .with_context(|| format!("failed to open {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(tokio::io::stdin()))),
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = ControllerConfig::load_or_default(args.config.as_deref())
        .context("failed to load configuration")?;
    info!(
        host1 = %config.hosts.host1.mac,
        host2 = %config.hosts.host2.ip,
        host3 = %config.hosts.host3.ip,
        poll_interval_secs = config.timers.poll_interval_secs,
        "configuration loaded"
    );

    let events = open_events(args.events.as_ref()).await?;
    let mut controller = Controller::new(&config);

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received shutdown signal");
            on_signal.cancel();
        }
    });

    let sink = Arc::new(Mutex::new(std::io::stdout()));
    let stats = replay(
        &mut controller,
        events,
        |dpid| -> Arc<dyn SwitchConnection> { Arc::new(JsonLinesSwitch::new(dpid, sink.clone())) },
        cancel,
    )
    .await?;

    controller.shutdown().await;
    info!(
        dispatched = stats.dispatched,
        invalid = stats.invalid,
        failed = stats.failed,
        "learnd exiting"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(&args.log_level) {
        eprintln!("learnd: {e:#}");
        return ExitCode::FAILURE;
    }

    info!("starting learnd");
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("learnd failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

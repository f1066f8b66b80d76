//! Hotlink - headless driver
//!
//! Runs the shell's reconnect flow without a window: probes the adapter,
//! reconciles the target address on the configured tick and prints where
//! the shell ends up.

mod headless;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use headless::HeadlessSurface;
use hotlink_core::{
    AdapterQuery, CommandQuery, Config, Page, PlatformOpener, Shell, StaticQuery, TargetAddress,
};

#[derive(Parser, Debug)]
#[command(name = "hotlink", version, about = "Find and open a phone's hotspot file server")]
struct Args {
    /// Config file (defaults to the per-user config path)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Parse saved adapter status output instead of running the command
    #[arg(long = "status-file")]
    status_file: Option<PathBuf>,

    /// Directory holding the bundled pages
    #[arg(long = "resources")]
    resources: Option<PathBuf>,

    /// Port of the phone's web server
    #[arg(short = 'p', long = "port")]
    port: Option<u16>,

    /// Give up waiting for a probe result after this many seconds
    #[arg(long = "timeout", default_value_t = 15)]
    timeout_secs: u64,
}

#[derive(Debug, Serialize)]
struct Summary {
    target: TargetAddress,
    displayed: String,
    page: Option<Page>,
    reconnect_available: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hotlink_core::init_logging();

    let args = Args::parse();
    let config_path = args.config.clone().unwrap_or_else(Config::config_path);
    let mut config = Config::load(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    if let Some(dir) = args.resources {
        config.resources_dir = dir;
    }
    if let Some(port) = args.port {
        config.gateway_port = port;
    }

    let query: Arc<dyn AdapterQuery> = match &args.status_file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading adapter status from {}", path.display()))?;
            Arc::new(StaticQuery::new(text))
        }
        None => Arc::new(CommandQuery::from_argv(&config.adapter_command)?),
    };

    let tick_interval = config.tick_interval();
    let surface = HeadlessSurface::new();
    let mut shell = Shell::with_query(
        config,
        Box::new(surface.clone()),
        Box::new(PlatformOpener),
        query,
    )?;

    shell.reconnect();

    let deadline = tokio::time::Instant::now() + Duration::from_secs(args.timeout_secs);
    let mut ticker = tokio::time::interval(tick_interval);
    loop {
        ticker.tick().await;
        surface.deliver(&mut shell);
        shell.tick(std::time::Instant::now());
        surface.deliver(&mut shell);

        let page = Page::from_address(shell.navigation().displayed());
        if page != Some(Page::Connecting) {
            break;
        }
        if tokio::time::Instant::now() >= deadline {
            tracing::warn!(timeout_secs = args.timeout_secs, "Probe did not finish in time");
            break;
        }
    }

    let displayed = shell.navigation().displayed().to_string();
    let summary = Summary {
        target: shell.navigation().target().clone(),
        page: Page::from_address(&displayed),
        displayed,
        reconnect_available: shell.affordances_enabled(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

//! Blog API proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                 BLOG PROXY                   │
//!   Client Request     │  ┌─────────┐   ┌──────────┐   ┌──────────┐   │
//!   ───────────────────┼─▶│  http   │──▶│  blogs   │──▶│ upstream │───┼──▶ Document
//!                      │  │ server  │   │ handlers │   │  client  │   │    Store
//!   Client Response    │  └─────────┘   └──────────┘   └──────────┘   │
//!   ◀──────────────────┼── envelope / error envelope ◀──────────────────┼───
//!                      │                                              │
//!                      │  config · observability · lifecycle          │
//!                      └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use blog_proxy::config::{load_config, ProxyConfig};
use blog_proxy::lifecycle::{self, signals, Shutdown};
use blog_proxy::observability::logging;

#[derive(Parser)]
#[command(name = "blog-proxy")]
#[command(about = "REST proxy for blogs in front of a JSON document store", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Built-in defaults apply without one.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };

    logging::init_logging(&config.observability);

    tracing::info!("blog-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_file = ?args.config,
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        upstream_timeout_secs = config.upstream.timeout_secs,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    lifecycle::start(config, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

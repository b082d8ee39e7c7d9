//! Campus Server - serves the campus map frontend, its models, and the location API

mod api;
mod config;
mod server;
mod state;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "campus-server")]
#[command(about = "Static host and location API for the 3D campus map")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "campus.toml")]
    config: PathBuf,

    /// Bind address for web server
    #[arg(short, long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Validate the configuration and manifest, then exit
    #[arg(long)]
    check: bool,

    /// Write a default configuration file and exit
    #[arg(long)]
    write_default: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Campus Server v{}", env!("CARGO_PKG_VERSION"));

    if args.write_default {
        config::save_default_config(&args.config)?;
        info!(path = %args.config.display(), "Wrote default configuration");
        return Ok(());
    }

    let mut config = config::load_config(&args.config)?;

    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    // Fails on an invalid manifest
    let state = state::AppState::new(config)?;

    if args.check {
        let missing = config::missing_models(&state.config, &state.manifest);
        println!("{}: {} locations", state.manifest.title, state.manifest.location.len());
        for location in &state.manifest.location {
            let marker = if missing.contains(&location.label) { "missing" } else { "ok" };
            let home = if location.default { " (home)" } else { "" };
            println!("  - {}{} -> {} [{}]", location.label, home, location.model, marker);
        }
        if !missing.is_empty() {
            anyhow::bail!("{} model file(s) missing", missing.len());
        }
        return Ok(());
    }

    server::run(state).await
}

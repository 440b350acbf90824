//! kiln CLI - pluggable machine-image provisioning
//!
//! # Configuration
//!
//! Configuration is loaded from multiple sources with priority:
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`KILN_*`)
//! 3. User config (`~/.kiln/config.toml`, or the `--config` override)
//! 4. Built-in defaults (lowest priority)
//!
//! # Environment Variables
//!
//! - `KILN_LOG`: emit diagnostics to stderr (any non-falsey value)
//! - `KILN_JOBS`: worker thread count for the async runtime
//! - `KILN_CACHE_DIR`: enable the artifact cache at this directory
//! - `KILN_CONFIG`: configuration file path (must exist when set)

use anyhow::{Context, Result};
use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser};
use kiln_app::{BootstrapConfig, KilnApp};
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// kiln - pluggable machine-image provisioning
#[derive(Parser, Debug)]
#[command(name = "kiln")]
#[command(version, about, long_about = None)]
struct Args {
    /// Emit diagnostics to stderr (also: KILN_LOG)
    #[arg(long, env = "KILN_LOG", action = ArgAction::SetTrue, value_parser = FalseyValueParser::new())]
    log: bool,

    /// Worker thread count (also: KILN_JOBS, default: processor count)
    #[arg(long, value_name = "N", env = "KILN_JOBS", value_parser = clap::value_parser!(u16).range(1..))]
    jobs: Option<u16>,

    /// Artifact cache directory; caching is disabled when unset
    /// (also: KILN_CACHE_DIR)
    #[arg(long, value_name = "DIR", env = "KILN_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Configuration file, must exist when given
    /// (also: KILN_CONFIG, default: ~/.kiln/config.toml)
    #[arg(long, value_name = "FILE", env = "KILN_CONFIG")]
    config: Option<PathBuf>,

    /// Command to execute, followed by its arguments
    #[arg(trailing_var_arg = true)]
    command: Vec<String>,
}

impl Args {
    fn into_bootstrap(self) -> (BootstrapConfig, Vec<String>) {
        let bootstrap = BootstrapConfig {
            log: self.log,
            jobs: self.jobs.map(usize::from),
            cache_dir: self.cache_dir,
            config_path: self.config,
        };
        (bootstrap, self.command)
    }
}

/// Stderr-only subscriber, default directive `debug`, `RUST_LOG`
/// overridable. Not installed at all without `--log` — unset means every
/// diagnostic is discarded.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter);

    tracing_subscriber::registry().with(layer).init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    let (bootstrap, command) = args.into_bootstrap();

    if bootstrap.log {
        init_tracing();
    }

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(jobs) = bootstrap.jobs {
        builder.worker_threads(jobs);
    }
    let runtime = builder.build().context("failed to build async runtime")?;

    let code = runtime.block_on(run(&bootstrap, &command));
    std::process::exit(code);
}

async fn run(bootstrap: &BootstrapConfig, command: &[String]) -> i32 {
    let app = match KilnApp::bootstrap(bootstrap).await {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {e}");
            return 1;
        }
    };

    match app.run(command).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}

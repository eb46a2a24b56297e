//! wifi-selector: scenario replay binary.
//!
//! ```text
//! wifi-selector <scenario.json> [--state <profiles.bin>]
//! ```
//!
//! Replays a JSON scenario through the selection engine and prints one
//! JSON report per step on stdout.  With `--state`, the profile table
//! (connect choices, seen flags, last selection) is loaded from and saved
//! back to a postcard snapshot, so user choices carry over between runs.
//!
//! Logging goes through `env_logger`; set `RUST_LOG=debug` to see every
//! filter drop and score.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use wifi_selector::adapters::log_sink::LogEventSink;
use wifi_selector::adapters::memory_repository::MemoryRepository;
use wifi_selector::scenario::{self, Scenario};

#[derive(Debug, Parser)]
#[command(name = "wifi-selector")]
#[command(about = "Replay a Wi-Fi selection scenario")]
struct Args {
    /// Scenario file (JSON).
    scenario: PathBuf,
    /// Profile table snapshot, loaded before and saved after the replay.
    #[arg(long)]
    state: Option<PathBuf>,
}

fn load_repository(path: Option<&Path>) -> Result<MemoryRepository> {
    let Some(path) = path else {
        return Ok(MemoryRepository::new());
    };
    if !path.exists() {
        warn!("state file {} not found, starting empty", path.display());
        return Ok(MemoryRepository::new());
    }
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    MemoryRepository::from_bytes(&bytes).with_context(|| format!("decoding {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let text = std::fs::read_to_string(&args.scenario)
        .with_context(|| format!("reading {}", args.scenario.display()))?;
    let scenario: Scenario = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", args.scenario.display()))?;
    scenario
        .config
        .validate()
        .context("invalid selector configuration")?;

    let mut repo = load_repository(args.state.as_deref())?;
    let mut sink = LogEventSink::new();
    let reports = scenario::replay(&scenario, &mut repo, &mut sink).context("replay failed")?;

    for report in &reports {
        println!("{}", serde_json::to_string(report)?);
    }

    if let Some(path) = &args.state {
        let bytes = repo.to_bytes().context("encoding profile table")?;
        std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
        info!("saved profile table to {}", path.display());
    }

    Ok(())
}

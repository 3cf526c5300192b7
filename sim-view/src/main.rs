//! Application entry point for the 3-D DLA snowflake viewer.
//!
//! This binary parses the command line, loads the engine config, and
//! hands a [`Viewer`] to eframe. All interactive logic and rendering live
//! in the `viewer` module.

mod camera;
mod viewer;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use sim_core::Config;
use viewer::Viewer;

#[derive(Parser, Debug)]
#[command(about = "Grow a mirror-symmetric snowflake by diffusion-limited aggregation")]
struct Args {
    /// TOML file overriding the engine constants.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the random walk; random if omitted.
    #[arg(short, long)]
    seed: Option<u64>,
}

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the window closes normally.
/// - `Err` if the config cannot be loaded or eframe fails to start.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let cfg = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("starting with seed {seed}, {cfg:?}");

    let viewer = Viewer::new(cfg, seed).context("failed to build simulation")?;
    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "DLA Snowflake",
        options,
        Box::new(move |_cc| Ok(Box::new(viewer))),
    )
    .map_err(|e| anyhow::anyhow!("viewer exited with error: {e}"))
}

// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/lodestone-rs

//! Lodestone - Magnetometer and Compass Sensing Engine
//!
//! Demo binary: runs the engine over the null platform, so everything it
//! prints comes from the deterministic simulation path.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use lodestone::sensing::{FaultSink, HeadingSink, ReadingSink};
use lodestone::{Config, MagnetometerEngine, NullPlatform, VERSION};

/// Lodestone - Magnetometer and Compass Sensing Engine
#[derive(Parser, Debug)]
#[command(name = "lodestone")]
#[command(author = "Lodestone Project")]
#[command(version = VERSION)]
#[command(about = "Magnetic-field and compass-heading sensing with simulation fallback")]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable trace-level logging
    #[arg(long)]
    trace: bool,

    /// Watch the compass heading instead of the magnetic field
    #[arg(long)]
    heading: bool,

    /// Emission cadence in milliseconds
    #[arg(long)]
    frequency: Option<u64>,

    /// Print a single reading plus the sensor info snapshot and exit
    #[arg(long)]
    once: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.trace {
        Level::TRACE
    } else if args.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_ansi(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Lodestone v{VERSION} - Magnetometer and Compass Sensing Engine");

    let config_path = args.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load_or_create(&config_path)?;
    info!("Configuration loaded from {:?}", config_path);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(args, config))
}

async fn run(args: Args, config: Config) -> Result<()> {
    // No hardware driver ships with the crate; the null platform forces the
    // deterministic simulation path.
    let engine = Arc::new(MagnetometerEngine::new(config, Arc::new(NullPlatform)));

    if args.once {
        let reading = engine.reading().await;
        info!(
            "field: x={:.2} y={:.2} z={:.2} |B|={:.2} µT",
            reading.x, reading.y, reading.z, reading.magnitude
        );
        let heading = engine.heading().await;
        info!("heading: {:.1}°", heading.magnetic_heading);
        info!("info: {:?}", engine.info().await);
        return Ok(());
    }

    let on_fault: FaultSink = Arc::new(|message| {
        tracing::error!("sensor fault: {message}");
    });

    if args.heading {
        let on_heading: HeadingSink = Arc::new(|h| {
            info!("heading: {:.1}° (accuracy {})", h.magnetic_heading, h.heading_accuracy);
        });
        engine
            .watch_heading(on_heading, on_fault, args.frequency, None)
            .await;
    } else {
        let on_reading: ReadingSink = Arc::new(|r| {
            info!(
                "field: x={:.2} y={:.2} z={:.2} |B|={:.2} µT",
                r.x, r.y, r.z, r.magnitude
            );
        });
        engine
            .watch_readings(on_reading, on_fault, args.frequency)
            .await;
    }

    info!("Watching... press Ctrl+C to stop");
    tokio::signal::ctrl_c().await?;

    engine.stop_watch().await;
    engine.stop_watch_heading().await;
    info!("Lodestone shutdown complete");

    Ok(())
}

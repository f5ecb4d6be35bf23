// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use sentry_cam::cli;
use sentry_cam::config::PipelineConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sentry-cam")]
#[command(about = "Edge camera sentry: capture, detect, alert")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Optional JSON config file; CLI flags override its values
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a capture session, then detect and alert per saved frame (default)
    Watch {
        /// Camera device index (/dev/video<N>)
        #[arg(short, long)]
        device: Option<usize>,

        /// Detector weights file
        #[arg(short, long)]
        weights: Option<PathBuf>,

        /// BCM pin driving the buzzer
        #[arg(long)]
        buzzer_pin: Option<u8>,

        /// Buzzer pulse duration in milliseconds
        #[arg(long)]
        alert_duration_ms: Option<u64>,

        /// Directory for saved frames
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List available cameras
    List,

    /// Run detection and alerting on an existing image
    Scan {
        /// Image file to hand to the detector
        image: PathBuf,

        /// Detector weights file
        #[arg(short, long)]
        weights: Option<PathBuf>,

        /// BCM pin driving the buzzer
        #[arg(long)]
        buzzer_pin: Option<u8>,

        /// Buzzer pulse duration in milliseconds
        #[arg(long)]
        alert_duration_ms: Option<u64>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=sentry_cam=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let args = Cli::parse();

    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };

    match args.command {
        None => cli::watch(&config)?,
        Some(Commands::Watch {
            device,
            weights,
            buzzer_pin,
            alert_duration_ms,
            output,
        }) => {
            if let Some(device) = device {
                config.capture.device_index = device;
            }
            if let Some(output) = output {
                config.capture.output_dir = output;
            }
            apply_overrides(&mut config, weights, buzzer_pin, alert_duration_ms);
            cli::watch(&config)?;
        }
        Some(Commands::List) => cli::list()?,
        Some(Commands::Scan {
            image,
            weights,
            buzzer_pin,
            alert_duration_ms,
        }) => {
            apply_overrides(&mut config, weights, buzzer_pin, alert_duration_ms);
            cli::scan(&config, &image)?;
        }
    }

    Ok(())
}

fn apply_overrides(
    config: &mut PipelineConfig,
    weights: Option<PathBuf>,
    buzzer_pin: Option<u8>,
    alert_duration_ms: Option<u64>,
) {
    if let Some(weights) = weights {
        config.detector.weights = weights;
    }
    if let Some(pin) = buzzer_pin {
        config.alert.pin = pin;
    }
    if let Some(ms) = alert_duration_ms {
        config.alert.duration_ms = ms;
    }
}

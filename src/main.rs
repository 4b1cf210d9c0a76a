// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use photobooth::CaptureMode;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "photobooth")]
#[command(about = "Photo booth with countdown, filters, captions and photo strips")]
#[command(version = env!("GIT_VERSION"))]
#[command(subcommand_required = false)]
struct Cli {
    /// Configuration file (default: ~/.config/photobooth/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available filters
    Filters,

    /// Take photos and save them to the gallery directory
    Shoot {
        /// Number of shutter presses (default: 1, or 4 in strip mode)
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Capture mode: single or strip
        #[arg(short, long)]
        mode: Option<CaptureMode>,

        /// Filter preset name or filter expression
        #[arg(short, long)]
        filter: Option<String>,

        /// Caption printed under each photo
        #[arg(short, long)]
        caption: Option<String>,

        /// Image file used as the camera feed (default: color bars)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Output directory (default: ~/Pictures/photobooth)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Capture immediately, without the countdown
        #[arg(long)]
        no_countdown: bool,
    },

    /// Drive the booth from the terminal
    Interactive {
        /// Image file used as the camera feed (default: color bars)
        #[arg(short, long)]
        source: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=photobooth=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let config = cli::load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Filters) => cli::list_filters(),
        Some(Commands::Shoot {
            count,
            mode,
            filter,
            caption,
            source,
            output,
            no_countdown,
        }) => cli::shoot(
            config,
            cli::ShootOptions {
                count,
                mode,
                filter,
                caption,
                source,
                output,
                countdown: !no_countdown,
            },
        ),
        Some(Commands::Interactive { source }) => cli::interactive(config, source),
        None => cli::interactive(config, None),
    }
}

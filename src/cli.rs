// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for the photo booth
//!
//! This module provides command-line functionality for:
//! - Listing available filters
//! - Taking photos and strips in one go
//! - Driving the booth interactively from the terminal

use photobooth::app::{CountdownDisplay, CountdownTick};
use photobooth::backends::camera::CameraBackend;
use photobooth::backends::virtual_camera::VirtualCamera;
use photobooth::constants::strip::FRAME_COUNT;
use photobooth::constants::virtual_camera::{PATTERN_HEIGHT, PATTERN_WIDTH};
use photobooth::gallery::{DirectoryGallery, GallerySink};
use photobooth::{Booth, CaptureMode, CaptureOutcome, Config, FilterKind};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Runtime;

type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Options of the `shoot` command
pub struct ShootOptions {
    pub count: Option<usize>,
    pub mode: Option<CaptureMode>,
    pub filter: Option<String>,
    pub caption: Option<String>,
    pub source: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub countdown: bool,
}

/// Countdown display that prints each step on its own line
struct ConsoleCountdown;

impl CountdownDisplay for ConsoleCountdown {
    fn show(&mut self, tick: &CountdownTick) {
        if let Some(label) = tick.label() {
            println!("  {}", label);
        }
    }
}

/// Load the configuration from `path`, or from the default location
pub fn load_config(path: Option<&Path>) -> CliResult<Config> {
    let config = match path {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    Ok(config)
}

/// List the filter presets
pub fn list_filters() -> CliResult {
    println!("Available filters:");
    println!();
    for kind in FilterKind::ALL {
        println!(
            "  {:<10} {:<10} {}",
            kind.name(),
            kind.display_name(),
            kind.expression()
        );
    }
    println!();
    println!("Any CSS filter expression is accepted as well, e.g. \"blur(2px) hue-rotate(90deg)\".");
    Ok(())
}

/// Take `count` shots and save the results
pub fn shoot(mut config: Config, options: ShootOptions) -> CliResult {
    if options.output.is_some() {
        config.output_dir = options.output.clone();
    }
    let camera = open_camera(options.source.as_deref())?;
    let gallery = DirectoryGallery::new(config.photo_dir());
    let mut booth = Booth::new(camera, Box::new(gallery), &config);

    if let Some(mode) = options.mode {
        booth.set_mode(mode);
    }
    if let Some(filter) = options.filter.as_deref() {
        booth.select_filter(filter);
    }
    if let Some(caption) = options.caption {
        booth.set_caption(caption);
    }

    let count = options.count.unwrap_or(match booth.mode() {
        CaptureMode::Single => 1,
        CaptureMode::Strip => FRAME_COUNT,
    });

    let with_countdown = options.countdown;

    let rt = runtime()?;
    rt.block_on(async {
        booth.start_camera().await?;

        for shot in 1..=count {
            println!("Shot {}/{}", shot, count);
            let result = if with_countdown {
                booth.capture_with_countdown(&mut ConsoleCountdown).await
            } else {
                booth.capture().await
            };
            match result {
                Ok(outcome) => report(&booth, outcome),
                Err(e) => println!("Capture failed: {}", e),
            }
        }

        if !booth.strip().is_empty() {
            println!(
                "{} frame(s) left without a complete strip, discarded",
                booth.strip().len()
            );
        }
        booth.stop_camera();
        Ok::<(), Box<dyn std::error::Error>>(())
    })?;

    Ok(())
}

/// Drive the booth with typed commands until `quit` or end of input
///
/// Commands keep working while a countdown runs, so the camera can be
/// turned off or the filter changed before the shutter fires.
pub fn interactive(config: Config, source: Option<PathBuf>) -> CliResult {
    let camera = open_camera(source.as_deref())?;
    let gallery = DirectoryGallery::new(config.photo_dir());
    let mut booth = Booth::new(camera, Box::new(gallery), &config);

    print_help();
    prompt()?;

    let rt = runtime()?;
    rt.block_on(async {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while let Some(line) = lines.next_line().await? {
            let command = Command::parse(&line);
            if command == Command::Capture {
                let countdown = booth.countdown_handle();
                let mut display = ConsoleCountdown;
                let run = countdown.run(&mut display);
                tokio::pin!(run);

                let finished = loop {
                    tokio::select! {
                        result = &mut run => break Some(result),
                        line = lines.next_line() => match line? {
                            Some(line) => {
                                if !apply(&mut booth, Command::parse(&line)).await {
                                    break None;
                                }
                            }
                            None => break None,
                        },
                    }
                };

                match finished {
                    Some(Ok(())) => match booth.capture().await {
                        Ok(outcome) => report(&booth, outcome),
                        Err(e) => println!("Capture failed: {}", e),
                    },
                    Some(Err(e)) => println!("Capture failed: {}", e),
                    None => break,
                }
            } else if !apply(&mut booth, command).await {
                break;
            }
            prompt()?;
        }

        booth.stop_camera();
        Ok::<(), Box<dyn std::error::Error>>(())
    })?;

    Ok(())
}

/// One line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Empty,
    Camera,
    Filter(String),
    Mode(String),
    Caption(String),
    Capture,
    Reset,
    Gallery,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };

        match name {
            "" => Command::Empty,
            "camera" => Command::Camera,
            "filter" => Command::Filter(arg.to_string()),
            "mode" => Command::Mode(arg.to_string()),
            "caption" => Command::Caption(arg.to_string()),
            "capture" | "c" => Command::Capture,
            "reset" => Command::Reset,
            "gallery" | "ls" => Command::Gallery,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

/// Run one command; `false` means the session should end
async fn apply(booth: &mut Booth, command: Command) -> bool {
    match command {
        Command::Empty => {}
        Command::Camera => match booth.toggle_camera().await {
            Ok(()) => println!("[{}]", booth.session().toggle_label()),
            Err(e) => println!("Error accessing camera: {}", e),
        },
        Command::Filter(name) => {
            booth.select_filter(&name);
            println!("Preview filter: {}", booth.session().preview().filter);
        }
        Command::Mode(mode) => match mode.parse::<CaptureMode>() {
            Ok(mode) => {
                booth.set_mode(mode);
                println!("Mode: {}", mode);
            }
            Err(e) => println!("{}", e),
        },
        Command::Caption(text) => {
            booth.set_caption(text);
            println!("Caption: \"{}\"", booth.caption().trim());
        }
        // Only reached while a countdown is already running
        Command::Capture => match booth.capture_with_countdown(&mut ConsoleCountdown).await {
            Ok(outcome) => report(booth, outcome),
            Err(e) => println!("Capture failed: {}", e),
        },
        Command::Reset => {
            booth.reset();
            println!("Gallery cleared");
        }
        Command::Gallery => print_gallery(booth.gallery()),
        Command::Help => print_help(),
        Command::Quit => return false,
        Command::Unknown(other) => println!("Unknown command '{}', type 'help'", other),
    }
    true
}

fn open_camera(source: Option<&Path>) -> CliResult<Arc<dyn CameraBackend>> {
    let camera = match source {
        Some(path) => VirtualCamera::from_file(path)?,
        None => VirtualCamera::test_pattern(PATTERN_WIDTH, PATTERN_HEIGHT),
    };
    Ok(Arc::new(camera))
}

fn runtime() -> std::io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

fn report(booth: &Booth, outcome: CaptureOutcome) {
    match outcome {
        CaptureOutcome::CameraOff => println!("Camera is off, turn it on first"),
        CaptureOutcome::StripPending { frames } => {
            println!("Strip frame {}/{}", frames, FRAME_COUNT)
        }
        CaptureOutcome::Photo | CaptureOutcome::Strip => {
            if let Some(entry) = booth.gallery().entries().last() {
                let location = entry
                    .saved_to
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| entry.download.filename.clone());
                println!(
                    "Saved {}x{} {}: {}",
                    entry.image.width,
                    entry.image.height,
                    if outcome == CaptureOutcome::Strip {
                        "strip"
                    } else {
                        "photo"
                    },
                    location
                );
            }
        }
    }
}

fn print_gallery(gallery: &dyn GallerySink) {
    if gallery.is_empty() {
        println!("Gallery is empty");
        return;
    }
    for (index, entry) in gallery.entries().iter().enumerate() {
        println!(
            "  [{}] {} {}x{} {}{}",
            index,
            entry.created_at.format("%H:%M:%S"),
            entry.image.width,
            entry.image.height,
            entry
                .saved_to
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            entry
                .caption
                .as_deref()
                .map(|c| format!(" \"{}\"", c))
                .unwrap_or_default()
        );
    }
}

fn print_help() {
    println!("Commands:");
    println!("  camera            turn the camera on or off");
    println!("  filter <name>     select a filter (see 'photobooth filters')");
    println!("  mode <single|strip>");
    println!("  caption <text>    caption for the next photos, empty to clear");
    println!("  capture           count down and take a photo");
    println!("  gallery           list gallery entries");
    println!("  reset             clear the gallery");
    println!("  quit");
}

fn prompt() -> std::io::Result<()> {
    print!("> ");
    std::io::stdout().flush()
}

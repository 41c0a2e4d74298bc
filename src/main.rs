//! VPT - Video Processing Tool
//!
//! Command-line front end: toggles options in the order given, then renders each input.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};

use vpt::formats::is_supported_path;
use vpt::{AppConfig, OptionState, OptionTag, RenderRequest, Supervisor};

/// Rotate, flip and adjust the audio of video files with FFmpeg.
#[derive(Parser, Debug)]
#[command(name = "vpt", version, about)]
struct Cli {
    /// Input video files, rendered one after another
    #[arg(required_unless_present = "list_options")]
    inputs: Vec<PathBuf>,

    /// Toggle an option (repeatable, applied in order), e.g. rotate90, volumeUp25, mute
    #[arg(short = 'o', long = "option", value_name = "TAG")]
    options: Vec<String>,

    /// Arm custom rotation with this angle in degrees
    #[arg(short = 'r', long, value_name = "DEG", allow_hyphen_values = true)]
    custom_angle: Option<String>,

    /// Config file (default: <config dir>/VPT/config.json)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Print the compiled command lines without running anything
    #[arg(long, action = ArgAction::SetTrue)]
    dry_run: bool,

    /// List option tags and exit
    #[arg(long, action = ArgAction::SetTrue)]
    list_options: bool,

    /// Debug logging
    #[arg(short = 'v', long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();

    log::info!("Starting VPT v{}", env!("CARGO_PKG_VERSION"));

    if cli.list_options {
        for tag in OptionTag::all() {
            println!("{:<16} {:<18} ({:?})", tag.as_str(), tag.display_name(), tag.group());
        }
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AppConfig::load_default(),
    };

    let mut state = OptionState::new();
    for tag in &cli.options {
        if tag.parse::<OptionTag>().is_err() {
            log::warn!("Ignoring unknown option '{}'", tag);
        }
        state.toggle(tag);
    }
    if let Some(angle) = &cli.custom_angle {
        state.arm_custom_rotation(angle)?;
        log::info!("{}", state.custom_rotation_label());
    }

    let snapshot = state.snapshot();
    let active: Vec<&str> = snapshot.active.iter().map(|t| t.as_str()).collect();
    log::info!("Active options: [{}]", active.join(", "));

    for input in &cli.inputs {
        if !is_supported_path(input) {
            log::warn!("{} does not look like a supported video file", input.display());
        }
    }

    let supervisor = Supervisor::new(&config);

    if cli.dry_run {
        for input in &cli.inputs {
            let plan = supervisor.plan(&RenderRequest::new(input.clone(), snapshot.clone()));
            for decision in &plan.decisions {
                println!("# {}", decision);
            }
            println!("ffmpeg {}", plan.command_line());
        }
        return Ok(());
    }

    let results = supervisor.render_all(&snapshot, &cli.inputs).await;
    for (input, result) in cli.inputs.iter().zip(&results) {
        println!("{}: {}", input.display(), result.summary());
    }

    let failed = results.iter().filter(|r| !r.success).count();
    if failed > 0 {
        bail!("{} of {} renders failed", failed, results.len());
    }
    Ok(())
}

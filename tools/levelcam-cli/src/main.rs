//! LevelCam CLI — level tilted frame sequences.
//!
//! Usage:
//!   levelcam run --input <DIR> --output <DIR>   Level every frame of a sequence
//!   levelcam estimate <IMAGE>                   Estimate the tilt of one image
//!   levelcam calibrate <IMAGE>                  Sweep known rotations and report error
//!   levelcam config                             Show the effective configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use levelcam_common::config::{AppConfig, TiltConfig};
use levelcam_common::logging::{init_logging, level_for_verbosity};
use levelcam_frame_model::{SearchRange, ViewMode};

mod commands;

#[derive(Parser)]
#[command(
    name = "levelcam",
    about = "Estimate and correct the horizontal tilt of camera frames",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging (prints the candidate table per frame)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to $XDG_CONFIG_HOME/levelcam/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Estimator overrides shared by the frame-processing commands.
#[derive(Args, Debug, Clone, Default)]
struct TiltArgs {
    /// Columns excluded at each side of the frame
    #[arg(long)]
    margin: Option<u32>,

    /// Smallest row shift tested
    #[arg(long, allow_hyphen_values = true)]
    search_min: Option<i32>,

    /// Row shift bound (exclusive)
    #[arg(long, allow_hyphen_values = true)]
    search_max: Option<i32>,
}

impl TiltArgs {
    fn apply(&self, tilt: &mut TiltConfig) -> anyhow::Result<()> {
        if let Some(margin) = self.margin {
            tilt.margin_width = margin;
        }
        if self.search_min.is_some() || self.search_max.is_some() {
            tilt.search_range = SearchRange::new(
                self.search_min.unwrap_or(tilt.search_range.start()),
                self.search_max.unwrap_or(tilt.search_range.end()),
            )?;
        }
        Ok(())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Level every frame of an image sequence
    Run {
        /// Directory of input frames (png/jpg/bmp, processed in name order)
        #[arg(short, long)]
        input: PathBuf,

        /// Directory to write displayed frames to
        #[arg(short, long)]
        output: PathBuf,

        /// What to write per frame: corrected|comparison
        #[arg(long)]
        view: Option<ViewMode>,

        /// Write per-frame estimates as JSON lines
        #[arg(long)]
        report: Option<PathBuf>,

        #[command(flatten)]
        tilt: TiltArgs,
    },

    /// Estimate the tilt of a single image
    Estimate {
        /// Image file
        image: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Also write the corrected view to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        tilt: TiltArgs,
    },

    /// Rotate an image by a sweep of known angles and measure estimate error
    Calibrate {
        /// Level reference image
        image: PathBuf,

        /// Number of sweep steps
        #[arg(long, default_value = "40")]
        frames: usize,

        /// Print samples and summary as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        tilt: TiltArgs,
    },

    /// Show the effective configuration
    Config {
        /// Save it to the configuration file
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load(),
    };
    if cli.verbose {
        config.logging.level = level_for_verbosity(true).to_string();
    }
    init_logging(&config.logging);

    match cli.command {
        Commands::Run {
            input,
            output,
            view,
            report,
            tilt,
        } => {
            tilt.apply(&mut config.tilt)?;
            if let Some(view) = view {
                config.display.view = view;
            }
            commands::run::run(config, input, output, report).await
        }
        Commands::Estimate {
            image,
            json,
            output,
            tilt,
        } => {
            tilt.apply(&mut config.tilt)?;
            commands::estimate::run(&config, image, json, output)
        }
        Commands::Calibrate {
            image,
            frames,
            json,
            tilt,
        } => {
            tilt.apply(&mut config.tilt)?;
            commands::calibrate::run(&config, image, frames, json)
        }
        Commands::Config { write } => commands::config::run(&config, cli.config, write),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tilt_args_override_only_given_values() {
        let mut tilt = TiltConfig::default();
        TiltArgs {
            search_max: Some(6),
            ..Default::default()
        }
        .apply(&mut tilt)
        .unwrap();
        assert_eq!(tilt.margin_width, 100);
        assert_eq!(tilt.search_range, SearchRange::new(-10, 6).unwrap());
    }

    #[test]
    fn test_tilt_args_reject_empty_range() {
        let mut tilt = TiltConfig::default();
        let args = TiltArgs {
            search_min: Some(4),
            search_max: Some(4),
            ..Default::default()
        };
        assert!(args.apply(&mut tilt).is_err());
    }

    #[test]
    fn test_cli_parses_negative_search_bounds() {
        let cli = Cli::try_parse_from([
            "levelcam",
            "estimate",
            "frame.png",
            "--search-min",
            "-4",
            "--search-max",
            "4",
        ])
        .unwrap();
        match cli.command {
            Commands::Estimate { tilt, .. } => {
                assert_eq!(tilt.search_min, Some(-4));
                assert_eq!(tilt.search_max, Some(4));
            }
            _ => panic!("expected estimate command"),
        }
    }
}

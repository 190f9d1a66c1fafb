//! CLI interface for the metronome controller

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Slider controller for a Pure Data metronome patch
#[derive(Parser)]
#[command(name = "metronome")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the terminal controls
    Run {
        /// Configuration file path (built-in defaults when absent)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Address of the patch's [netreceive], overrides the config
        #[arg(long, value_name = "HOST:PORT")]
        connect: Option<String>,

        /// Write logs to this file (the terminal is taken by the UI)
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Read control commands from stdin, one per line
    Script {
        /// Configuration file path (built-in defaults when absent)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Address of the patch's [netreceive]; FUDI goes to stdout without one
        #[arg(long, value_name = "HOST:PORT")]
        connect: Option<String>,
    },

    /// Convert between a slider step and a value
    Map {
        /// Value at step 0
        #[arg(long, allow_negative_numbers = true)]
        min: f64,

        /// Value at the top step
        #[arg(long, allow_negative_numbers = true)]
        max: f64,

        /// Use a linear instead of a logarithmic curve
        #[arg(long)]
        linear: bool,

        /// Step to convert to a value
        #[arg(long, allow_negative_numbers = true, conflicts_with = "value", required_unless_present = "value")]
        step: Option<i32>,

        /// Value to convert to a step
        #[arg(long, allow_negative_numbers = true)]
        value: Option<f64>,
    },

    /// Validate a configuration file
    Check {
        /// Configuration file path
        #[arg(short, long, default_value = "metronome.json")]
        config: PathBuf,
    },

    /// Generate an example configuration file
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_map_requires_step_or_value() {
        assert!(Cli::try_parse_from(["metronome", "map", "--min", "1", "--max", "2"]).is_err());
        assert!(Cli::try_parse_from([
            "metronome", "map", "--min", "1", "--max", "2", "--step", "5", "--value", "1.5"
        ])
        .is_err());
    }

    #[test]
    fn test_map_accepts_negative_bounds() {
        let cli = Cli::try_parse_from([
            "metronome", "map", "--min", "-20", "--max", "40", "--linear", "--step", "1024",
        ])
        .unwrap();
        match cli.command {
            Commands::Map { min, max, linear, step, value } => {
                assert_eq!((min, max), (-20.0, 40.0));
                assert!(linear);
                assert_eq!(step, Some(1024));
                assert_eq!(value, None);
            }
            _ => panic!("expected map"),
        }
    }

    #[test]
    fn test_check_default_path() {
        let cli = Cli::try_parse_from(["metronome", "check"]).unwrap();
        match cli.command {
            Commands::Check { config } => assert_eq!(config, PathBuf::from("metronome.json")),
            _ => panic!("expected check"),
        }
    }
}

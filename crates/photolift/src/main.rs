//! Photolift command line
//!
//! - `photolift init` writes a starter config
//! - `photolift plan` scans every configured folder and lists what would be uploaded

use anyhow::Result;
use clap::{Parser, Subcommand};
use photolift_logging::LogConfig;
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;

#[derive(Parser, Debug)]
#[command(name = "photolift", version, about = "Upload local photo folders to a remote photo library")]
struct Cli {
    /// Enable verbose logging (info/debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a starter config file
    Init {
        /// Config file to create (default: ~/.photolift/config.toml)
        #[arg(short, long, env = "PHOTOLIFT_CONFIG")]
        config: Option<PathBuf>,

        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Scan configured folders and list the uploads they would produce
    Plan {
        /// Config file to read (default: ~/.photolift/config.toml)
        #[arg(short, long, env = "PHOTOLIFT_CONFIG")]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn run_command(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { config, force } => cli::init::run(cli::init::InitArgs { config, force }),
        Commands::Plan { config, json } => cli::plan::run(cli::plan::PlanArgs { config, json }),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = photolift_logging::init_logging(LogConfig::new("photolift").verbose(cli.verbose)) {
        eprintln!("Warning: failed to initialize logging: {:#}", err);
    }

    let json_mode = matches!(cli.command, Commands::Plan { json: true, .. });
    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if json_mode {
                cli::error::print_json_error(&err);
            } else {
                eprintln!("{:?}", err);
            }
            ExitCode::from(1)
        }
    }
}

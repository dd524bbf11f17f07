#![forbid(unsafe_code)]

mod arguments;
mod commands;
mod config;
mod constants;
mod discovery;
mod display;
mod edid;
mod error;
mod matching;
mod runner;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use config::{default_config_path, default_post_set_path, Profiles, ProfileStore};
use constants::config::{CONFIG_ENV, LOG_LEVEL_ENV, POST_SET_ENV};
use runner::Runner;

/// XRandR Profile Manager
#[derive(Parser, Debug)]
#[command(name = "xrpm", version, about, long_about = None)]
struct Cli {
    /// Do not run any XRandR commands, only print them
    #[arg(short = 'n', long, global = true)]
    dry_run: bool,

    /// Load saved profiles from file
    #[arg(short, long, global = true, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Script to run after setting a profile
    #[arg(short, long, global = true, env = POST_SET_ENV)]
    post_set: Option<PathBuf>,

    /// Debug logging and full error chains
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List profiles, marking the detected one
    Status {
        /// Show every argument of each profile
        #[arg(short, long)]
        verbose: bool,
    },

    /// Save the current outputs with the given XRandR arguments
    Save {
        /// Name of the profile
        name: String,

        /// Match by serial number, not name of the monitor
        #[arg(short, long)]
        serial: bool,

        /// Also match same outputs as current ones
        #[arg(short = 'o', long)]
        match_outputs: bool,

        /// XRandR arguments
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        xrandr_args: Vec<String>,
    },

    /// Apply a profile, or the detected one when no name is given
    Set {
        /// Name of the profile
        name: Option<String>,
    },

    /// Delete a profile
    Delete {
        /// Name of the profile
        name: String,
    },

    /// List the outputs reported by XRandR
    Outputs,
}

fn init_logging(debug: bool) -> Result<()> {
    // Parse log level from environment variable
    let log_level = if debug {
        TraceLevel::DEBUG
    } else {
        match std::env::var(LOG_LEVEL_ENV)
            .unwrap_or_else(|_| "warn".to_string())
            .to_lowercase()
            .as_str()
        {
            "trace" => TraceLevel::TRACE,
            "debug" => TraceLevel::DEBUG,
            "info" => TraceLevel::INFO,
            "error" => TraceLevel::ERROR,
            _ => TraceLevel::WARN,
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let store = ProfileStore::new(cli.config.unwrap_or_else(default_config_path));
    let post_set = cli.post_set.unwrap_or_else(default_post_set_path);
    let runner = Runner::new(cli.dry_run);

    let mut profiles: Profiles = store.load()?;
    let outputs = discovery::load_outputs()?;
    debug!(?outputs, "discovered outputs");

    match cli.command.unwrap_or(Commands::Status { verbose: false }) {
        Commands::Status { verbose } => commands::status(&profiles, &outputs, verbose),
        Commands::Save {
            name,
            serial,
            match_outputs,
            xrandr_args,
        } => commands::save(&mut profiles, &outputs, &name, serial, match_outputs, &xrandr_args),
        Commands::Set { name } => {
            commands::set(&profiles, &outputs, name.as_deref(), &runner, &post_set)?
        }
        Commands::Delete { name } => {
            commands::delete(&mut profiles, &name)?;
        }
        Commands::Outputs => commands::list_outputs(&outputs),
    }

    if cli.dry_run {
        debug!(path = %store.path().display(), "dry run, profiles not saved");
        return Ok(());
    }
    store.save(&profiles)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let debug = cli.debug;

    if let Err(err) = init_logging(debug) {
        eprintln!("Failed to initialize logging: {err}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if debug {
                eprintln!("{err:?}");
            } else {
                eprintln!("{err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

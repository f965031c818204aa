//! fpctl - operator tool for the forbidden products policy.
//!
//! Works on the same files the host-side layer reads, so an operator can
//! prepare and check them without starting the host.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use config::Settings;

/// fpctl - inspect and prepare the forbidden products configuration.
#[derive(Parser, Debug)]
#[command(
    name = "fpctl",
    author,
    version,
    about = "Inspect and prepare the forbidden products configuration",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// User data directory (the config lives in its ForbiddenProducts folder).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Show where the config, debug flag and debug filter live.
    Paths,

    /// Write the default config file.
    Init {
        /// Overwrite an existing config file.
        #[arg(long)]
        force: bool,
    },

    /// Load the config and report problems. Exits with 1 if it cannot be used.
    Validate,

    /// Show a customer's forbidden categories and annotation preview.
    Show {
        /// Customer id (case-insensitive).
        customer: String,

        /// Affinity for the preview, as CATEGORY=SCORE (repeatable).
        #[arg(short, long, value_parser = commands::show::parse_affinity)]
        affinity: Vec<forbidden_products_core::AffinityEntry>,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Tell whether diagnostics would be traced for a customer.
    Debug {
        /// Customer id.
        customer: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing based on verbosity; RUST_LOG wins when set
    let level = if cli.quiet {
        LevelFilter::ERROR
    } else if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::load(cli.data_dir);

    match cli.command {
        Commands::Paths => commands::paths::execute(&settings),
        Commands::Init { force } => commands::init::execute(&settings, force),
        Commands::Validate => {
            let valid = commands::validate::execute(&settings)?;
            if !valid {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Show {
            customer,
            affinity,
            json,
        } => commands::show::execute(&settings, &customer, &affinity, json),
        Commands::Debug { customer } => commands::debug::execute(&settings, &customer),
    }
}

//! ds18b20ctl - read DS18B20 thermometers from the command line.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ds18b20ctl")]
#[command(about = "Read DS18B20 one-wire thermometers", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to $DS18B20_CONFIG, ~/.config/ds18b20/config.toml, /etc/ds18b20/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the one-wire devices directory
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List sensor ids attached to the bus master
    List {
        /// List bus masters instead of sensors
        #[arg(long)]
        masters: bool,
    },

    /// Read temperatures
    Read {
        /// Sensor ids or aliases (default: every discovered sensor)
        sensors: Vec<String>,

        /// Extra attempts after a failed read
        #[arg(long, allow_negative_numbers = true)]
        retry: Option<i64>,

        /// Print JSON lines instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration
    Config,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = commands::load_config(cli.config.as_deref(), cli.root)?;

    match cli.command {
        Commands::List { masters } => commands::list(&config, masters),
        Commands::Read {
            sensors,
            retry,
            json,
        } => commands::read(&config, &sensors, retry, json),
        Commands::Config => commands::show_config(&config),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

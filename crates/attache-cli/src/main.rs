//! Attache CLI
//!
//! Generates RBI declarations for attached files from a snapshot of the
//! host application's model classes.

mod commands;
mod output;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "attache")]
#[command(about = "Type declarations for attached files", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Color output: auto, always, never
    #[arg(long, global = true)]
    color: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate declaration files
    Generate {
        /// Class snapshot (JSON) dumped from the application
        #[arg(short, long)]
        snapshot: PathBuf,
        /// Output directory
        #[arg(short, long, default_value = "sorbet/rbi/dsl")]
        out: PathBuf,
        /// Config file (defaults to ./attache.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Only generate these classes
        #[arg(long)]
        only: Vec<String>,
        /// Skip these classes
        #[arg(long)]
        exclude: Vec<String>,
        /// Worker threads
        #[arg(short, long)]
        jobs: Option<usize>,
        /// Verify files on disk are up to date instead of writing them
        #[arg(long)]
        check: bool,
    },

    /// List the classes each decorator would visit
    List {
        /// Class snapshot (JSON) dumped from the application
        #[arg(short, long)]
        snapshot: PathBuf,
        /// Config file (defaults to ./attache.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List registered decorators
    Decorators {
        /// Config file (defaults to ./attache.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let color = cli.color.as_deref();

    match cli.command {
        Commands::Generate {
            snapshot,
            out,
            config,
            only,
            exclude,
            jobs,
            check,
        } => commands::generate::execute(
            commands::generate::GenerateOptions {
                snapshot,
                out_dir: out,
                config,
                only,
                exclude,
                jobs,
                check,
            },
            color,
        ),

        Commands::List { snapshot, config } => {
            commands::list::execute(&snapshot, config.as_deref(), color)
        }

        Commands::Decorators { config } => commands::decorators::execute(config.as_deref(), color),
    }
}

//! Filehead CLI
//!
//! Browse, change and lock a directory tree served as a content repository.

mod cli;
mod commands;
mod context;
mod error;

use std::io::{self, Write};

use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands, GlobalArgs};
use commands::ListFilter;
use error::Result;

/// Log filter used when `--verbose` is not given
const LOG_ENV: &str = "FILEHEAD_LOG";

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    match cli.command {
        Some(cmd) => execute_command(&cli.global, cmd),
        None => {
            println!("{} filehead content repository CLI", "filehead".green().bold());
            println!();
            println!("Run {} for available commands.", "filehead --help".cyan());
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let result = if verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    };
    if let Err(e) = result {
        eprintln!("{}: failed to set tracing subscriber: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!("Verbose mode enabled");
}

fn execute_command(global: &GlobalArgs, cmd: Commands) -> Result<()> {
    if let Commands::Completions { shell } = cmd {
        clap_complete::generate(shell, &mut Cli::command(), "filehead", &mut io::stdout());
        return Ok(());
    }

    let backend = context::open_backend(global)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cmd {
        Commands::Stat { path, json } => commands::run_stat(&backend, &path, json, &mut out),
        Commands::Ls {
            path,
            files,
            folders,
            json,
        } => commands::run_ls(
            &backend,
            &path,
            ListFilter::from_flags(files, folders),
            json,
            &mut out,
        ),
        Commands::Tree { path, json } => commands::run_tree(&backend, &path, json, &mut out),
        Commands::Cat { path } => commands::run_cat(&backend, &path, &mut out),
        Commands::Apply { manifest, json } => commands::run_apply(&backend, &manifest, json, &mut out),
        Commands::Lock { paths, message } => commands::run_lock(&backend, &paths, &message, &mut out),
        Commands::Unlock { paths } => commands::run_unlock(&backend, &paths, &mut out),
        Commands::Locks { json } => commands::run_locks(&backend, json, &mut out),
        Commands::Completions { .. } => Ok(()),
    }?;
    out.flush()?;
    Ok(())
}

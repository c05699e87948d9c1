use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use packwright_lib::config::CoreConfig;
use sysexits::ExitCode;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod classify;
mod document;
mod sync;

#[derive(Parser, Debug)]
#[command(name = "packwright")]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Print machine readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Classify every resource of a modpack against its target
    Classify(classify::Args),
    /// Compare a modpack with an instance and report what differs
    Status {
        modpack: PathBuf,
        instance: PathBuf,
    },
    /// Show what a sync in the given mode would do
    Plan(sync::PlanArgs),
    /// Extract the bare loader version from a loader build name
    LoaderVersion { raw: String },
}

fn main() -> ExitCode {
    // Human friendly panicking in release mode
    human_panic::setup_panic!();

    // Logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set up logging: {err}");
    }

    let cli = Cli::parse();

    let cfg = match CoreConfig::load() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            return ExitCode::Config;
        }
    };

    match &cli.command {
        Command::Classify(args) => classify::handle(args, &cfg, cli.json),
        Command::Status { modpack, instance } => sync::status(modpack, instance, cli.json),
        Command::Plan(args) => sync::plan(args, &cfg, cli.json),
        Command::LoaderVersion { raw } => {
            println!("{}", packwright_lib::sync::extract_loader_version(raw));
            ExitCode::Ok
        }
    }
}

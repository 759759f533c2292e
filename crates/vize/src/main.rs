//! # vize
//!
//! Vize - Migrates legacy Vue components to `<script setup>`.
//!
//! ## Name Origin
//!
//! **Vize** (/viːz/) is named after Vizier + Visor + Advisor, a wise tool
//! that sees through your code. This crate is the command-line gateway that
//! walks a project and repaints class components and Options API objects as
//! Composition API code.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive
const LOG_ENV: &str = "VIZE_LOG";

#[derive(Parser)]
#[command(name = "vize")]
#[command(about = "Migrates legacy Vue components to <script setup>", long_about = None)]
#[command(version, disable_version_flag = true)]
struct Cli {
    /// Print version
    #[arg(short = 'v', short_alias = 'V', long, action = clap::ArgAction::Version)]
    version: (),
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate Vue SFC files to <script setup> (default command)
    #[command(visible_alias = "pentimento")]
    Migrate(commands::migrate::MigrateArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Migrate(args)) => commands::migrate::run(args),
        None => {
            // Default to migrate command with default args
            commands::migrate::run(commands::migrate::MigrateArgs::default());
        }
    }
}

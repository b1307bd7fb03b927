//! CLI module for errlens
//!
//! Provides commands:
//! - `serve`: Run the analyzer server
//! - `analyze`: Diagnose one error message and print the result

use clap::{Parser, Subcommand};

pub mod analyze;

/// React Native error analyzer
#[derive(Parser, Debug)]
#[command(name = "errlens")]
#[command(about = "Diagnose React Native error messages")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the analyzer server
    Serve,
    /// Diagnose a single error message
    Analyze(analyze::AnalyzeArgs),
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Serve) => crate::server::run().await,
        Some(Commands::Analyze(args)) => analyze::run(args).await,
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}

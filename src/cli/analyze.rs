//! One-shot analysis command

use anyhow::{bail, Context, Result};
use clap::Args;
use errlens_core::{AnalysisObserver, AnalysisRequest, Diagnosis};
use std::io::Read;
use std::sync::Arc;
use tracing::info;

use crate::server::{build_pipeline, load_config};

/// Arguments for `errlens analyze`
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Error message to diagnose
    #[arg(conflicts_with = "stdin", required_unless_present = "stdin")]
    pub text: Option<String>,

    /// Read the error message from standard input
    #[arg(long)]
    pub stdin: bool,

    /// Print the diagnosis as JSON
    #[arg(long)]
    pub json: bool,

    /// Skip the remote service and use local rules only
    #[arg(long)]
    pub no_ai: bool,
}

/// Observer that logs trace lines and prints alerts to stderr
struct ConsoleObserver;

impl AnalysisObserver for ConsoleObserver {
    fn trace(&self, line: &str) {
        info!(target: "errlens::analysis", "{}", line);
    }

    fn alert(&self, message: &str) {
        eprintln!("warning: {message}");
    }
}

/// Run the analyze command
pub async fn run(args: AnalyzeArgs) -> Result<()> {
    let raw = match args.text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read standard input")?;
            buf
        }
    };

    let request = match AnalysisRequest::new(&raw) {
        Ok(request) => request,
        Err(_) => bail!("Please enter an error message"),
    };

    let config = load_config().context("Failed to load configuration")?;
    let mut mode = config.to_mode();
    if args.no_ai {
        mode.ai_enabled = false;
    }

    let pipeline = build_pipeline(&config, Arc::new(ConsoleObserver));
    let diagnosis = pipeline.analyze(request.error_text(), &mode).await;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&diagnosis).context("Failed to serialize diagnosis")?
        );
    } else {
        print!("{}", render(&diagnosis));
    }
    Ok(())
}

fn render(diagnosis: &Diagnosis) -> String {
    format!(
        "Error Type\n  {}\n\nCause\n  {}\n\nSolution\n  {}\n\nPrevention\n  {}\n",
        diagnosis.kind,
        indent(&diagnosis.cause),
        indent(&diagnosis.solution),
        indent(&diagnosis.prevention),
    )
}

fn indent(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join("\n  ")
}

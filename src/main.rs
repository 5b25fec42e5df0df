//! `metalens` - command-line front end for the analysis client.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use metalens::{AnalysisClient, LogFormat, MediaKind, Settings, telemetry};

#[derive(Debug, Parser)]
#[command(name = "metalens", version, about = "Submit media to the Metalens analyzer")]
struct Cli {
    /// Backend base address (overrides metalens.toml and METALENS__API_URL).
    #[arg(long, global = true, env = "METALENS_API_URL")]
    api_url: Option<String>,

    /// Log filter directive, e.g. `debug` or `analysis=debug`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    /// Settings file to use instead of ./metalens.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Upload a file and print the analysis result as JSON.
    Analyze {
        /// image, video or document
        kind: MediaKind,
        path: PathBuf,
    },
    /// Resolve a report reference to its absolute address, or download it.
    Report {
        reference: String,
        /// Write the report to this file instead of printing the address.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print the backend health probe.
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let settings = Settings::load_from(cli.config.as_deref())?;
    telemetry::init(
        cli.log_level.as_deref().unwrap_or(&settings.log_level),
        cli.log_format.unwrap_or(settings.log_format),
    )?;

    let config = settings.client_config(cli.api_url.as_deref());
    tracing::debug!(base_address = %config.base_address, "resolved backend");
    let client = AnalysisClient::new(config)?;

    match cli.command {
        Command::Analyze { kind, path } => {
            let result = client
                .analyze_path(kind, &path)
                .await
                .with_context(|| format!("{kind} analysis of {} failed", path.display()))?;
            println!("{}", serde_json::to_string_pretty(result.as_value())?);
            if let Some(reference) = result.report_reference() {
                tracing::info!(report = %client.report_url(reference), "report ready");
            }
        }
        Command::Report { reference, output } => match output {
            Some(output) => {
                let bytes = client
                    .download_report(&reference)
                    .await
                    .with_context(|| format!("downloading {reference} failed"))?;
                tokio::fs::write(&output, &bytes)
                    .await
                    .with_context(|| format!("writing {} failed", output.display()))?;
                tracing::info!(path = %output.display(), bytes = bytes.len(), "report saved");
            }
            None => println!("{}", client.report_url(&reference)),
        },
        Command::Health => {
            let body = client.health().await.context("health probe failed")?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    Ok(())
}

mod export;
mod input;
mod lookup;
mod query;
mod render;
mod timeline;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use renspa_export::ExportFormat;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "renspa")]
#[command(about = "Resolve SENASA RENSPA registrations to property polygons")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Look up every property registered under one or more CUITs
    Cuit {
        /// Taxpayer ids, with or without hyphens
        ids: Vec<String>,
        /// Read additional ids from a file, one per line
        #[arg(long)]
        file: Option<PathBuf>,
        /// Also process deregistered properties
        #[arg(long)]
        include_historical: bool,
        /// Write the mapped properties to this path
        #[arg(long)]
        export: Option<PathBuf>,
        /// Export format; inferred from the export path when omitted
        #[arg(long, requires = "export")]
        format: Option<ExportFormat>,
    },
    /// Look up properties directly by RENSPA number
    Renspa {
        /// RENSPA numbers, canonical or as 13 digits
        ids: Vec<String>,
        /// Read additional numbers from a file, one per line
        #[arg(long)]
        file: Option<PathBuf>,
        /// Write the mapped properties to this path
        #[arg(long)]
        export: Option<PathBuf>,
        /// Export format; inferred from the export path when omitted
        #[arg(long, requires = "export")]
        format: Option<ExportFormat>,
    },
    /// Show active properties and hectares over time for one or more CUITs
    Timeline {
        /// Taxpayer ids, with or without hyphens
        ids: Vec<String>,
        /// Read additional ids from a file, one per line
        #[arg(long)]
        file: Option<PathBuf>,
        /// Write the series as CSV instead of printing it
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = renspa_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Cuit {
            ids,
            file,
            include_historical,
            export,
            format,
        }) => {
            let inputs = input::collect_inputs(ids, file.as_deref())?;
            let target = export::resolve_target(export, format)?;
            query::run_cuit(&config, &inputs, include_historical, target.as_ref()).await?;
        }
        Some(Commands::Renspa {
            ids,
            file,
            export,
            format,
        }) => {
            let inputs = input::collect_inputs(ids, file.as_deref())?;
            let target = export::resolve_target(export, format)?;
            lookup::run_renspa(&config, &inputs, target.as_ref()).await?;
        }
        Some(Commands::Timeline { ids, file, output }) => {
            let inputs = input::collect_inputs(ids, file.as_deref())?;
            timeline::run_timeline(&config, &inputs, output.as_deref()).await?;
        }
        None => println!("no command given; run `renspa --help` for usage"),
    }

    Ok(())
}

/// Builds the registry client from the loaded configuration.
pub(crate) fn build_client(
    config: &renspa_core::AppConfig,
) -> anyhow::Result<renspa_registry::RegistryClient> {
    let client_config = renspa_registry::RegistryClientConfig::from_app_config(config);
    Ok(renspa_registry::RegistryClient::new(client_config)?)
}

#[cfg(test)]
mod tests;

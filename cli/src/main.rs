//! QAbot command line
//!
//! Pick a market, hand over a document, get one report per ruleset.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use compliance_service::{document, ComplianceChecker, ComplianceReports, Config};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "qabot", version, about = "Check documents against market compliance rules")]
struct Cli {
    /// TOML configuration file; environment variables override it
    #[arg(long, short, env = "QABOT_CONFIG")]
    config: Option<PathBuf>,

    /// Client tab to use instead of the configured one
    #[arg(long, global = true)]
    client: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the tabs of the rule store
    Tabs,
    /// List the markets available for the client
    Markets,
    /// Check a document against the client's rules for a market
    Check {
        /// Market to check against
        #[arg(long, short)]
        market: String,

        /// Document to check (.docx, .txt or .md)
        document: PathBuf,

        /// Print the assembled reports as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    config.apply_env()?;
    Ok(config)
}

fn render(reports: &ComplianceReports) {
    for report in reports {
        println!();
        println!("{}", format!("{} Report", report.ruleset()).bold());
        if report.is_error() {
            println!("{}", report.text().red());
        } else {
            println!("{}", report.text());
        }
    }

    println!();
    let summary = format!(
        "{} rulesets checked for {} / {}, {} failed",
        reports.len(),
        reports.client,
        reports.market,
        reports.error_count()
    );
    if reports.has_errors() {
        println!("{}", summary.yellow());
    } else {
        println!("{}", summary.green());
    }
}

async fn check(
    checker: &ComplianceChecker,
    client: &str,
    market: &str,
    path: &Path,
    json: bool,
) -> Result<()> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let extractor = document::extractor_for_extension(extension)?;
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let reports = checker
        .check_document(&bytes, extractor.as_ref(), client, market)
        .await?;

    if reports.is_empty() {
        tracing::warn!("No rules apply to client {} in market {}", client, market);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        render(&reports);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(client) = cli.client {
        config.client = client;
    }
    tracing::info!("Starting {} for client {}", config.service_name, config.client);

    let checker = ComplianceChecker::from_config(&config)?;
    let tabs = checker
        .connect()
        .await
        .context("Error connecting to the rule store. Please check your credentials.")?;

    match cli.command {
        Command::Tabs => {
            for tab in tabs {
                println!("{}", tab);
            }
        }
        Command::Markets => {
            for market in checker.available_markets(&config.client).await? {
                println!("{}", market);
            }
        }
        Command::Check {
            market,
            document,
            json,
        } => {
            let markets = checker.available_markets(&config.client).await?;
            if !markets.contains(&market) {
                bail!(
                    "Market {} is not listed for client {} (available: {})",
                    market,
                    config.client,
                    markets.join(", ")
                );
            }
            check(&checker, &config.client, &market, &document, json).await?;
        }
    }

    Ok(())
}

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::application::{Report, ReportConfig, ReportService};
use crate::io::CsvLedgerSink;
use crate::upapi::{DEFAULT_HOST, DEFAULT_PAGE_SIZE, UpClient};

/// fbar - FBAR report for Up bank accounts
#[derive(Parser, Debug)]
#[command(name = "fbar")]
#[command(about = "Compute the yearly high water mark and closing balance of every Up account")]
#[command(version)]
pub struct Cli {
    /// Up personal access token
    #[arg(long, env = "UP_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Calendar year to report on (e.g. 2024)
    #[arg(long, env = "YEAR")]
    pub year: i32,

    /// IANA timezone that decides which year a transaction belongs to
    #[arg(long, env = "FBAR_TIMEZONE", default_value = "Australia/Sydney")]
    pub timezone: String,

    /// Directory receiving one ledger CSV per account
    #[arg(short, long, env = "FBAR_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Base URL of the Up API
    #[arg(long, env = "UP_API_HOST", default_value = DEFAULT_HOST)]
    pub host: Url,

    /// Records requested per page
    #[arg(long, env = "UP_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Output format: table, json
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Install the global subscriber. `RUST_LOG` wins over `--verbose`.
pub fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "fbar=debug" } else { "fbar=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = ReportConfig::new(self.year, &self.timezone)
            .context("Invalid report configuration")?;

        let client = UpClient::new(self.token)?
            .with_host(self.host)
            .with_page_size(self.page_size);
        let sink = CsvLedgerSink::new(self.output_dir);
        let service =
            ReportService::new(Arc::new(client), Arc::new(sink)).with_calendar(config.calendar);

        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, cancelling report");
                on_interrupt.cancel();
            }
        });

        let generated = service
            .generate_report(config.year, &cancel)
            .await
            .with_context(|| format!("Failed to generate report for {}", config.year))?;

        let report = generated
            .into_result()
            .context("Some accounts could not be reported")?;

        print_report(&report, self.format)
    }
}

fn print_report(report: &Report, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => print!("{}", report),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }
    Ok(())
}

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::domain::{LedgerEntry, file_stem, format_cents};

pub const LEDGER_FILE_EXTENSION: &str = "csv";

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to flush CSV: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ledger writer task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Destination for the year's ledger entries of each account.
#[async_trait]
pub trait LedgerSink: Send + Sync {
    async fn persist(&self, account_name: &str, entries: &[LedgerEntry]) -> Result<(), SinkError>;
}

/// Writes one CSV file per account into a directory.
#[derive(Debug, Clone)]
pub struct CsvLedgerSink {
    dir: PathBuf,
}

impl CsvLedgerSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file written for `account_name`.
    /// Example: "Rainy Day" -> "<dir>/Rainy-Day.csv"
    pub fn path_for(&self, account_name: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", file_stem(account_name), LEDGER_FILE_EXTENSION))
    }
}

#[async_trait]
impl LedgerSink for CsvLedgerSink {
    async fn persist(&self, account_name: &str, entries: &[LedgerEntry]) -> Result<(), SinkError> {
        let path = self.path_for(account_name);
        let entries = entries.to_vec();

        let written = tokio::task::spawn_blocking(move || write_ledger_file(&path, &entries))
            .await??;

        debug!(account = account_name, entries = written, "wrote ledger CSV");
        Ok(())
    }
}

fn write_ledger_file(path: &Path, entries: &[LedgerEntry]) -> Result<usize, SinkError> {
    let file = File::create(path).map_err(|source| SinkError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    write_ledger_csv(file, entries)
}

/// Write ledger entries as CSV with a header row. Amounts are two-decimal text.
pub fn write_ledger_csv<W: Write>(writer: W, entries: &[LedgerEntry]) -> Result<usize, SinkError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record([
        "id",
        "created_at",
        "settled_at",
        "description",
        "message",
        "amount",
        "balance_after",
    ])?;

    let mut count = 0;
    for entry in entries {
        csv_writer.write_record([
            entry.id.clone(),
            entry.created_at.to_rfc3339(),
            entry
                .settled_at
                .map(|dt| dt.to_rfc3339())
                .unwrap_or_default(),
            entry.description.clone().unwrap_or_default(),
            entry.message.clone().unwrap_or_default(),
            format_cents(entry.amount),
            format_cents(entry.balance_after),
        ])?;
        count += 1;
    }

    csv_writer.flush()?;
    Ok(count)
}

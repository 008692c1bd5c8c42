// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use fbar::application::{BankSource, ReportService};
use fbar::domain::{Account, LedgerEntry, TransactionRecord};
use fbar::io::{LedgerSink, SinkError};
use fbar::upapi::{ApiError, ApiErrorResponse, SourceError};
use tokio_util::sync::CancellationToken;

/// Helper to build a timestamp at 02:00 UTC (midday in Sydney) on the given day
pub fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 2, 0, 0).unwrap()
}

pub fn tx(id: &str, created_at: DateTime<Utc>, amount: i64) -> TransactionRecord {
    TransactionRecord::new(id, created_at, amount)
}

pub fn server_error(detail: &str) -> SourceError {
    SourceError::Api(ApiErrorResponse {
        errors: vec![ApiError {
            status: "500".into(),
            title: "Internal Server Error".into(),
            detail: detail.into(),
            source: None,
        }],
    })
}

/// In-memory bank. Transactions are given oldest first and served newest
/// first, filtered by `until`, like the real API.
#[derive(Default)]
pub struct FakeBank {
    accounts: Vec<Account>,
    transactions: HashMap<String, Vec<TransactionRecord>>,
    failing: HashSet<String>,
    self_cancelling: HashSet<String>,
    fail_listing: bool,
    requests: Mutex<Vec<(String, DateTime<Utc>)>>,
}

impl FakeBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, account: Account, chronological: Vec<TransactionRecord>) -> Self {
        self.transactions.insert(account.id.clone(), chronological);
        self.accounts.push(account);
        self
    }

    /// Fetching this account's transactions fails with a server error.
    pub fn with_failing_account(mut self, account: Account) -> Self {
        self.failing.insert(account.id.clone());
        self.accounts.push(account);
        self
    }

    /// Fetching this account's transactions reports `Cancelled` although
    /// nobody cancelled the run.
    pub fn with_self_cancelling_account(mut self, account: Account) -> Self {
        self.self_cancelling.insert(account.id.clone());
        self.accounts.push(account);
        self
    }

    pub fn with_failing_account_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn accounts(&self) -> Vec<Account> {
        self.accounts.clone()
    }

    /// (account id, until) of every transaction request made so far
    pub fn requests(&self) -> Vec<(String, DateTime<Utc>)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl BankSource for FakeBank {
    async fn list_accounts(&self, _cancel: &CancellationToken) -> Result<Vec<Account>, SourceError> {
        if self.fail_listing {
            return Err(server_error("accounts unavailable"));
        }
        Ok(self.accounts.clone())
    }

    async fn list_transactions_for_account(
        &self,
        account_id: &str,
        until: DateTime<Utc>,
        _cancel: &CancellationToken,
    ) -> Result<Vec<TransactionRecord>, SourceError> {
        self.requests
            .lock()
            .unwrap()
            .push((account_id.to_string(), until));

        if self.failing.contains(account_id) {
            return Err(server_error("transactions unavailable"));
        }
        if self.self_cancelling.contains(account_id) {
            return Err(SourceError::Cancelled);
        }

        let mut transactions: Vec<TransactionRecord> = self
            .transactions
            .get(account_id)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|t| t.created_at < until)
            .collect();
        transactions.reverse();
        Ok(transactions)
    }
}

/// A bank whose transaction requests never complete.
pub struct StalledBank {
    pub accounts: Vec<Account>,
}

#[async_trait]
impl BankSource for StalledBank {
    async fn list_accounts(&self, _cancel: &CancellationToken) -> Result<Vec<Account>, SourceError> {
        Ok(self.accounts.clone())
    }

    async fn list_transactions_for_account(
        &self,
        _account_id: &str,
        _until: DateTime<Utc>,
        _cancel: &CancellationToken,
    ) -> Result<Vec<TransactionRecord>, SourceError> {
        std::future::pending().await
    }
}

/// Sink keeping persisted entries in memory; can be told to fail for a name.
#[derive(Default)]
pub struct MemorySink {
    written: Mutex<HashMap<String, Vec<LedgerEntry>>>,
    failing: HashSet<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(mut self, account_name: &str) -> Self {
        self.failing.insert(account_name.to_string());
        self
    }

    pub fn written(&self, account_name: &str) -> Option<Vec<LedgerEntry>> {
        self.written.lock().unwrap().get(account_name).cloned()
    }
}

#[async_trait]
impl LedgerSink for MemorySink {
    async fn persist(&self, account_name: &str, entries: &[LedgerEntry]) -> Result<(), SinkError> {
        if self.failing.contains(account_name) {
            return Err(SinkError::Io(std::io::Error::other("disk full")));
        }
        self.written
            .lock()
            .unwrap()
            .insert(account_name.to_string(), entries.to_vec());
        Ok(())
    }
}

/// A sink whose writes never complete.
pub struct StalledSink;

#[async_trait]
impl LedgerSink for StalledSink {
    async fn persist(&self, _account_name: &str, _entries: &[LedgerEntry]) -> Result<(), SinkError> {
        std::future::pending().await
    }
}

/// Service over the given fakes, keeping handles to inspect them afterwards
pub fn test_service(bank: FakeBank, sink: MemorySink) -> (ReportService, Arc<FakeBank>, Arc<MemorySink>) {
    let bank = Arc::new(bank);
    let sink = Arc::new(sink);
    let service = ReportService::new(bank.clone(), sink.clone());
    (service, bank, sink)
}

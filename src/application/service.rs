use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::{Account, Ledger, LedgerError, ReportCalendar};
use crate::io::LedgerSink;
use crate::upapi::SourceError;

use super::{
    AccountFailure, AppError, BankSource, FailureCause, GeneratedReport, Report, ReportEntry,
};

/// Builds yearly FBAR reports from a bank source.
/// This is the primary interface for any client (CLI, tests, ...).
pub struct ReportService {
    source: Arc<dyn BankSource>,
    sink: Arc<dyn LedgerSink>,
    calendar: ReportCalendar,
}

/// What became of one account's task.
enum AccountOutcome {
    Reported(ReportEntry),
    Failed(AccountFailure),
    Invariant(LedgerError),
    Cancelled,
}

/// Everything one account task owns while it runs.
struct AccountJob {
    account: Account,
    year: i32,
    until: DateTime<Utc>,
    calendar: ReportCalendar,
    source: Arc<dyn BankSource>,
    sink: Arc<dyn LedgerSink>,
    cancel: CancellationToken,
}

impl ReportService {
    /// Create a service using the default (Australian Eastern) calendar.
    pub fn new(source: Arc<dyn BankSource>, sink: Arc<dyn LedgerSink>) -> Self {
        Self {
            source,
            sink,
            calendar: ReportCalendar::default(),
        }
    }

    pub fn with_calendar(mut self, calendar: ReportCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    pub fn calendar(&self) -> &ReportCalendar {
        &self.calendar
    }

    /// List every account, then report on them for `year`.
    pub async fn generate_report(
        &self,
        year: i32,
        cancel: &CancellationToken,
    ) -> Result<GeneratedReport, AppError> {
        let accounts = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AppError::Cancelled),
            result = self.source.list_accounts(cancel) => match result {
                Ok(accounts) => accounts,
                Err(SourceError::Cancelled) if cancel.is_cancelled() => {
                    return Err(AppError::Cancelled);
                }
                Err(e) => return Err(AppError::ListAccounts(e)),
            },
        };

        info!(accounts = accounts.len(), year, "listed accounts");
        self.generate_report_for_accounts(accounts, year, cancel).await
    }

    /// Report on the given accounts for `year`, one concurrent task each.
    ///
    /// Per-account failures leave the account out of the report and are
    /// returned alongside it. A source reporting `Cancelled` while this run's
    /// token is still live counts as such a failure. A ledger invariant
    /// violation stops the whole run.
    /// Returns only after every task has finished.
    pub async fn generate_report_for_accounts(
        &self,
        accounts: Vec<Account>,
        year: i32,
        cancel: &CancellationToken,
    ) -> Result<GeneratedReport, AppError> {
        let until = self.calendar.year_end(year)?;
        let cancel = cancel.child_token();

        let mut tasks = JoinSet::new();
        for account in accounts {
            if account.created_at > until {
                debug!(account = %account.display_name, "opened after {}, skipping", year);
                continue;
            }

            let job = AccountJob {
                account,
                year,
                until,
                calendar: self.calendar,
                source: Arc::clone(&self.source),
                sink: Arc::clone(&self.sink),
                cancel: cancel.clone(),
            };
            tasks.spawn(job.run());
        }

        let mut report = Report::new(year);
        let mut failures = Vec::new();
        let mut fatal = None;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(AccountOutcome::Reported(entry)) => {
                    report.insert(entry);
                }
                Ok(AccountOutcome::Failed(failure)) => {
                    warn!(error = %failure, "account left out of report");
                    failures.push(failure);
                }
                Ok(AccountOutcome::Invariant(err)) => {
                    error!(error = %err, "aborting report");
                    cancel.cancel();
                    fatal.get_or_insert(AppError::LedgerInvariant(err));
                }
                Ok(AccountOutcome::Cancelled) => {}
                Err(join_error) => {
                    error!(error = %join_error, "account task died");
                    cancel.cancel();
                    fatal.get_or_insert(AppError::Task(join_error));
                }
            }
        }

        if let Some(err) = fatal {
            return Err(err);
        }
        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        info!(
            reported = report.len(),
            failed = failures.len(),
            year,
            "report complete"
        );
        Ok(GeneratedReport { report, failures })
    }
}

impl AccountJob {
    #[instrument(skip_all, fields(account = %self.account.display_name, year = self.year))]
    async fn run(self) -> AccountOutcome {
        let fetched = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return AccountOutcome::Cancelled,
            result = self.source.list_transactions_for_account(&self.account.id, self.until, &self.cancel) => result,
        };

        let transactions = match fetched {
            Ok(transactions) => transactions,
            Err(SourceError::Cancelled) if self.cancel.is_cancelled() => {
                return AccountOutcome::Cancelled;
            }
            Err(e) => {
                return AccountOutcome::Failed(AccountFailure::new(
                    &self.account,
                    FailureCause::Fetch(e),
                ));
            }
        };
        debug!(transactions = transactions.len(), "fetched transactions");

        let ledger = match Ledger::from_transactions(&self.account.display_name, transactions) {
            Ok(ledger) => ledger,
            Err(e) => {
                return AccountOutcome::Failed(AccountFailure::new(
                    &self.account,
                    FailureCause::Ledger(e),
                ));
            }
        };
        let summary = match ledger.summarize_year(&self.calendar, self.year) {
            Ok(summary) => summary,
            Err(err) => return AccountOutcome::Invariant(err),
        };

        let persisted = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return AccountOutcome::Cancelled,
            result = self.sink.persist(
                ledger.account_name(),
                ledger.entries_for_year(&self.calendar, self.year),
            ) => result,
        };

        if let Err(e) = persisted {
            return AccountOutcome::Failed(AccountFailure::new(
                &self.account,
                FailureCause::Persist(e),
            ));
        }

        AccountOutcome::Reported(ReportEntry::new(&self.account, summary))
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Cents, ReportCalendar, TransactionId, TransactionRecord};

/// A transaction applied to the running balance of its account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: TransactionId,
    pub created_at: DateTime<Utc>,
    pub settled_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub message: Option<String>,
    /// Base amount with round-up and cashback folded in
    pub amount: Cents,
    /// Account balance immediately after this entry
    pub balance_after: Cents,
}

/// Chronological running-balance reconstruction of one account.
///
/// Entries are always oldest-first and `balance_after` of entry `i` is the sum
/// of amounts of entries `0..=i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    account_name: String,
    current_balance: Cents,
    entries: Vec<LedgerEntry>,
}

/// Figures reported for one account and year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSummary {
    pub transaction_count: usize,
    /// Highest running balance reached during the year
    pub high_water_mark: Cents,
    /// Balance carried into the year
    pub opening_balance: Cents,
    /// Balance after the last applied entry
    pub closing_balance: Cents,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error(
        "Ledger for account '{account}' has {total_entries} entries but none in {year}; refusing to report a high water mark"
    )]
    NoEntriesInYear {
        account: String,
        year: i32,
        total_entries: usize,
    },

    #[error("Balance of account '{account}' overflows at transaction {transaction}")]
    BalanceOverflow { account: String, transaction: TransactionId },
}

impl Ledger {
    /// Build a ledger from transactions in API order (newest first).
    ///
    /// The sequence is reversed and then stably sorted by `created_at`, so
    /// already-chronological or shuffled input is handled too. Ties keep
    /// their reversed API order.
    pub fn from_transactions(
        account_name: impl Into<String>,
        transactions: impl IntoIterator<Item = TransactionRecord>,
    ) -> Result<Self, LedgerError> {
        let mut transactions: Vec<TransactionRecord> = transactions.into_iter().collect();
        transactions.reverse();
        transactions.sort_by_key(|t| t.created_at);

        let mut ledger = Ledger {
            account_name: account_name.into(),
            current_balance: 0,
            entries: Vec::with_capacity(transactions.len()),
        };

        for transaction in transactions {
            ledger.apply(transaction)?;
        }

        Ok(ledger)
    }

    fn apply(&mut self, transaction: TransactionRecord) -> Result<(), LedgerError> {
        let amount = transaction
            .effective_amount()
            .ok_or_else(|| self.overflow(&transaction))?;
        self.current_balance = self
            .current_balance
            .checked_add(amount)
            .ok_or_else(|| self.overflow(&transaction))?;

        self.entries.push(LedgerEntry {
            id: transaction.id,
            created_at: transaction.created_at,
            settled_at: transaction.settled_at,
            description: transaction.description,
            message: transaction.message,
            amount,
            balance_after: self.current_balance,
        });
        Ok(())
    }

    fn overflow(&self, transaction: &TransactionRecord) -> LedgerError {
        LedgerError::BalanceOverflow {
            account: self.account_name.clone(),
            transaction: transaction.id.clone(),
        }
    }

    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    pub fn current_balance(&self) -> Cents {
        self.current_balance
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose `created_at` falls in `year` on the given calendar,
    /// oldest first. Entries are chronological, so the year is one
    /// contiguous run.
    pub fn entries_for_year(&self, calendar: &ReportCalendar, year: i32) -> &[LedgerEntry] {
        let start = self
            .entries
            .partition_point(|e| calendar.year_of(e.created_at) < year);
        let end = self
            .entries
            .partition_point(|e| calendar.year_of(e.created_at) <= year);
        &self.entries[start..end]
    }

    /// Balance carried into `year`: the balance after the last entry dated
    /// before the year starts.
    pub fn opening_balance(&self, calendar: &ReportCalendar, year: i32) -> Cents {
        let before = self
            .entries
            .partition_point(|e| calendar.year_of(e.created_at) < year);
        before
            .checked_sub(1)
            .map(|i| self.entries[i].balance_after)
            .unwrap_or(0)
    }

    /// High water mark and closing balance for `year`.
    ///
    /// The closing balance is the ledger's current balance, which is the
    /// year-end balance when the ledger was fetched up to the end of the year.
    /// A ledger with history but nothing in `year` is rejected rather than
    /// reported with a zero high water mark.
    pub fn summarize_year(
        &self,
        calendar: &ReportCalendar,
        year: i32,
    ) -> Result<YearSummary, LedgerError> {
        let in_year = self.entries_for_year(calendar, year);

        if in_year.is_empty() && !self.entries.is_empty() {
            return Err(LedgerError::NoEntriesInYear {
                account: self.account_name.clone(),
                year,
                total_entries: self.entries.len(),
            });
        }

        let high_water_mark = in_year.iter().map(|e| e.balance_after).max().unwrap_or(0);

        Ok(YearSummary {
            transaction_count: in_year.len(),
            high_water_mark,
            opening_balance: self.opening_balance(calendar, year),
            closing_balance: self.current_balance,
        })
    }
}

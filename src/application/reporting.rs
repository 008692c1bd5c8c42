use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{
    Account, AccountId, AccountType, Cents, OwnershipType, YearSummary, format_money,
};

use super::{AccountFailure, AccountFailures};

/// Figures for one account in the report year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub account_id: AccountId,
    pub account_name: String,
    pub account_type: AccountType,
    pub ownership_type: OwnershipType,
    pub transaction_count: usize,
    pub opening_balance: Cents,
    pub high_water_mark: Cents,
    pub closing_balance: Cents,
}

impl ReportEntry {
    pub fn new(account: &Account, summary: YearSummary) -> Self {
        Self {
            account_id: account.id.clone(),
            account_name: account.display_name.clone(),
            account_type: account.account_type,
            ownership_type: account.ownership_type,
            transaction_count: summary.transaction_count,
            opening_balance: summary.opening_balance,
            high_water_mark: summary.high_water_mark,
            closing_balance: summary.closing_balance,
        }
    }
}

/// FBAR report for one calendar year, keyed by account display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub financial_year: i32,
    pub entries: HashMap<String, ReportEntry>,
}

#[derive(Serialize)]
struct SortedReport<'a> {
    financial_year: i32,
    accounts: Vec<&'a ReportEntry>,
}

impl Report {
    pub fn new(financial_year: i32) -> Self {
        Self {
            financial_year,
            entries: HashMap::new(),
        }
    }

    /// Insert an entry, replacing any previous entry with the same name.
    pub fn insert(&mut self, entry: ReportEntry) -> Option<ReportEntry> {
        self.entries.insert(entry.account_name.clone(), entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, account_name: &str) -> Option<&ReportEntry> {
        self.entries.get(account_name)
    }

    /// Entries in display order: by name with emoji and other non-ASCII
    /// decoration removed.
    pub fn sorted_entries(&self) -> Vec<&ReportEntry> {
        let mut entries: Vec<&ReportEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| {
            sort_key(&a.account_name)
                .cmp(&sort_key(&b.account_name))
                .then_with(|| a.account_name.cmp(&b.account_name))
        });
        entries
    }

    /// Pretty-printed JSON with accounts in display order.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&SortedReport {
            financial_year: self.financial_year,
            accounts: self.sorted_entries(),
        })
    }
}

/// Account name with non-ASCII characters dropped and whitespace trimmed.
pub fn sort_key(account_name: &str) -> String {
    let ascii: String = account_name.chars().filter(char::is_ascii).collect();
    ascii.trim().to_string()
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.sorted_entries();

        writeln!(f, "FBAR Report for Upbank, CY{}", self.financial_year)?;
        writeln!(f)?;
        writeln!(
            f,
            "{} accounts held in {}:",
            entries.len(),
            self.financial_year
        )?;
        for entry in &entries {
            writeln!(f, "\t{}", entry.account_name)?;
        }
        writeln!(f)?;

        for entry in &entries {
            writeln!(f, "Account: {}", entry.account_name)?;
            writeln!(f, "\tTransaction count: {}", entry.transaction_count)?;
            writeln!(f, "\tOpening balance: {}", format_money(entry.opening_balance))?;
            writeln!(f, "\tHigh water mark: {}", format_money(entry.high_water_mark))?;
            writeln!(f, "\tClosing balance: {}", format_money(entry.closing_balance))?;
            writeln!(f)?;
        }

        Ok(())
    }
}

/// A report plus the accounts that could not be included in it.
#[derive(Debug)]
pub struct GeneratedReport {
    pub report: Report,
    pub failures: Vec<AccountFailure>,
}

impl GeneratedReport {
    /// True when no account failed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// The report if every account succeeded, otherwise the joined failures.
    pub fn into_result(self) -> Result<Report, AccountFailures> {
        if self.failures.is_empty() {
            Ok(self.report)
        } else {
            Err(AccountFailures(self.failures))
        }
    }
}

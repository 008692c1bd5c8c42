use std::fmt;

use thiserror::Error;

use crate::domain::{Account, AccountId, CalendarError, LedgerError};
use crate::io::SinkError;
use crate::upapi::SourceError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to list accounts: {0}")]
    ListAccounts(SourceError),

    #[error(transparent)]
    Calendar(#[from] CalendarError),

    #[error("Ledger invariant violated: {0}")]
    LedgerInvariant(#[from] LedgerError),

    #[error("Report generation cancelled")]
    Cancelled,

    #[error("Account task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Why a single account dropped out of the report.
#[derive(Error, Debug)]
pub enum FailureCause {
    #[error("failed to list transactions: {0}")]
    Fetch(SourceError),

    #[error("failed to build ledger: {0}")]
    Ledger(LedgerError),

    #[error("failed to write ledger: {0}")]
    Persist(SinkError),
}

/// A recoverable failure of one account. Sibling accounts are unaffected.
#[derive(Error, Debug)]
#[error("account '{account_name}' ({account_id}): {cause}")]
pub struct AccountFailure {
    pub account_id: AccountId,
    pub account_name: String,
    pub cause: FailureCause,
}

impl AccountFailure {
    pub fn new(account: &Account, cause: FailureCause) -> Self {
        Self {
            account_id: account.id.clone(),
            account_name: account.display_name.clone(),
            cause,
        }
    }
}

/// Every per-account failure of one report run, joined into one error.
#[derive(Debug)]
pub struct AccountFailures(pub Vec<AccountFailure>);

impl AccountFailures {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccountFailure> {
        self.0.iter()
    }
}

impl fmt::Display for AccountFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [only] => write!(f, "{}", only),
            failures => {
                write!(f, "{} accounts failed:", failures.len())?;
                for failure in failures {
                    write!(f, "\n\t{}", failure)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for AccountFailures {}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn failure(name: &str) -> AccountFailure {
        AccountFailure::new(
            &Account::new(format!("id-{}", name), name, Utc::now()),
            FailureCause::Fetch(SourceError::Cancelled),
        )
    }

    #[test]
    fn test_single_failure_display() {
        let failures = AccountFailures(vec![failure("Spending")]);
        assert_eq!(
            failures.to_string(),
            "account 'Spending' (id-Spending): failed to list transactions: Request cancelled"
        );
    }

    #[test]
    fn test_many_failures_display() {
        let failures = AccountFailures(vec![failure("Spending"), failure("Savings")]);
        let text = failures.to_string();
        assert!(text.starts_with("2 accounts failed:"));
        assert!(text.contains("\n\taccount 'Spending'"));
        assert!(text.contains("\n\taccount 'Savings'"));
    }

    #[test]
    fn test_failures_iterate_in_order() {
        let failures = AccountFailures(vec![failure("Spending"), failure("Savings")]);
        assert!(!failures.is_empty());
        assert_eq!(failures.len(), 2);

        let names: Vec<&str> = failures.iter().map(|f| f.account_name.as_str()).collect();
        assert_eq!(names, vec!["Spending", "Savings"]);
    }

    #[test]
    fn test_ledger_failure_display() {
        let failure = AccountFailure::new(
            &Account::new("id-1", "Spending", Utc::now()),
            FailureCause::Ledger(LedgerError::BalanceOverflow {
                account: "Spending".into(),
                transaction: "t9".into(),
            }),
        );
        assert_eq!(
            failure.to_string(),
            "account 'Spending' (id-1): failed to build ledger: Balance of account 'Spending' overflows at transaction t9"
        );
    }
}

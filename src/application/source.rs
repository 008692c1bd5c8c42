use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::domain::{Account, TransactionRecord};
use crate::upapi::SourceError;

/// Where accounts and their transaction history come from.
///
/// Implementations drain pagination before returning and should give up with
/// `SourceError::Cancelled` once `cancel` fires.
#[async_trait]
pub trait BankSource: Send + Sync {
    /// Every account the credential can see.
    async fn list_accounts(&self, cancel: &CancellationToken) -> Result<Vec<Account>, SourceError>;

    /// All transactions of one account created strictly before `until`,
    /// newest first.
    async fn list_transactions_for_account(
        &self,
        account_id: &str,
        until: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> Result<Vec<TransactionRecord>, SourceError>;
}

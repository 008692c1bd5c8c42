use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::application::BankSource;
use crate::domain::{Account, TransactionRecord};

use super::{ListAccountsParams, ListTransactionsParams, SourceError, UpClient};

#[async_trait]
impl BankSource for UpClient {
    async fn list_accounts(&self, cancel: &CancellationToken) -> Result<Vec<Account>, SourceError> {
        let accounts = self
            .paginate_all_accounts(ListAccountsParams::default(), cancel)
            .await?;
        Ok(accounts.into_iter().map(Account::from).collect())
    }

    async fn list_transactions_for_account(
        &self,
        account_id: &str,
        until: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> Result<Vec<TransactionRecord>, SourceError> {
        let transactions = self
            .paginate_all_transactions_for_account(
                account_id,
                ListTransactionsParams::until(until),
                cancel,
            )
            .await?;
        Ok(transactions.into_iter().map(TransactionRecord::from).collect())
    }
}

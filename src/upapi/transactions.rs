use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::domain::TransactionRecord;

use super::client::next_cursor;
use super::{ListTransactionsParams, Money, Page, SourceError, TransactionStatus, UpClient};

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionResource {
    pub id: String,
    pub attributes: TransactionAttributes,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionAttributes {
    pub status: TransactionStatus,
    pub raw_text: Option<String>,
    pub description: String,
    pub message: Option<String>,
    #[serde(default)]
    pub is_categorizable: bool,
    pub hold_info: Option<HoldInfo>,
    pub round_up: Option<RoundUp>,
    pub cashback: Option<Cashback>,
    pub amount: Money,
    pub foreign_amount: Option<Money>,
    pub card_purchase_method: Option<CardPurchaseMethod>,
    pub settled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldInfo {
    pub amount: Money,
    pub foreign_amount: Option<Money>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundUp {
    pub amount: Money,
    pub boost_portion: Option<Money>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Cashback {
    pub description: String,
    pub amount: Money,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPurchaseMethod {
    pub method: String,
    pub card_number_suffix: Option<String>,
}

impl From<TransactionResource> for TransactionRecord {
    fn from(resource: TransactionResource) -> Self {
        let attributes = resource.attributes;
        TransactionRecord {
            id: resource.id,
            created_at: attributes.created_at,
            settled_at: attributes.settled_at,
            description: Some(attributes.description).filter(|d| !d.is_empty()),
            message: attributes.message,
            base_amount: attributes.amount.value_in_base_units,
            round_up_amount: attributes.round_up.map(|r| r.amount.value_in_base_units),
            cashback_amount: attributes.cashback.map(|c| c.amount.value_in_base_units),
        }
    }
}

impl UpClient {
    /// Fetch one page of transactions across all accounts.
    pub async fn list_transactions(
        &self,
        params: &ListTransactionsParams,
        cancel: &CancellationToken,
    ) -> Result<Page<TransactionResource>, SourceError> {
        let url = self.endpoint(&["transactions"])?;
        self.get(url, &params.to_query(), cancel).await
    }

    /// Fetch one page of transactions for a single account.
    pub async fn list_transactions_for_account(
        &self,
        account_id: &str,
        params: &ListTransactionsParams,
        cancel: &CancellationToken,
    ) -> Result<Page<TransactionResource>, SourceError> {
        let url = self.endpoint(&["accounts", account_id, "transactions"])?;
        self.get(url, &params.to_query(), cancel).await
    }

    pub async fn paginate_all_transactions(
        &self,
        mut params: ListTransactionsParams,
        cancel: &CancellationToken,
    ) -> Result<Vec<TransactionResource>, SourceError> {
        let mut transactions = Vec::new();
        loop {
            let page = self.list_transactions(&params, cancel).await?;
            transactions.extend(page.data);

            match page.links.next {
                Some(next) => params.after = Some(next_cursor(&next)?),
                None => break,
            }
        }
        Ok(transactions)
    }

    /// Every transaction of one account matching `params`, newest first.
    pub async fn paginate_all_transactions_for_account(
        &self,
        account_id: &str,
        mut params: ListTransactionsParams,
        cancel: &CancellationToken,
    ) -> Result<Vec<TransactionResource>, SourceError> {
        let mut transactions = Vec::new();
        loop {
            let page = self
                .list_transactions_for_account(account_id, &params, cancel)
                .await?;
            transactions.extend(page.data);

            match page.links.next {
                Some(next) => params.after = Some(next_cursor(&next)?),
                None => break,
            }
        }
        Ok(transactions)
    }
}

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::domain::{Account, AccountType, OwnershipType};

use super::client::next_cursor;
use super::{Document, ListAccountsParams, Money, Page, SourceError, UpClient};

#[derive(Debug, Clone, Deserialize)]
pub struct AccountResource {
    pub id: String,
    pub attributes: AccountAttributes,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountAttributes {
    pub display_name: String,
    pub account_type: AccountType,
    pub ownership_type: OwnershipType,
    pub balance: Money,
    pub created_at: DateTime<Utc>,
}

impl From<AccountResource> for Account {
    fn from(resource: AccountResource) -> Self {
        let attributes = resource.attributes;
        Account::new(resource.id, attributes.display_name, attributes.created_at)
            .with_account_type(attributes.account_type)
            .with_ownership_type(attributes.ownership_type)
    }
}

impl UpClient {
    /// Fetch one page of accounts.
    pub async fn list_accounts(
        &self,
        params: &ListAccountsParams,
        cancel: &CancellationToken,
    ) -> Result<Page<AccountResource>, SourceError> {
        let url = self.endpoint(&["accounts"])?;
        self.get(url, &params.to_query(), cancel).await
    }

    /// Fetch a single account by id.
    pub async fn get_account(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<AccountResource, SourceError> {
        let url = self.endpoint(&["accounts", id])?;
        let document: Document<AccountResource> = self.get(url, &Vec::new(), cancel).await?;
        Ok(document.data)
    }

    /// Follow `links.next` until every page of accounts has been read.
    pub async fn paginate_all_accounts(
        &self,
        mut params: ListAccountsParams,
        cancel: &CancellationToken,
    ) -> Result<Vec<AccountResource>, SourceError> {
        let mut accounts = Vec::new();
        loop {
            let page = self.list_accounts(&params, cancel).await?;
            accounts.extend(page.data);

            match page.links.next {
                Some(next) => params.after = Some(next_cursor(&next)?),
                None => break,
            }
        }
        Ok(accounts)
    }
}

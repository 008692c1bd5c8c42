//! Query parameters for list endpoints.
//!
//! Each request type spells out its wire names; unset or empty values are
//! left out of the query string.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AccountType, OwnershipType};

pub type Query = Vec<(&'static str, String)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Held,
    Settled,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Held => "HELD",
            TransactionStatus::Settled => "SETTLED",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListAccountsParams {
    pub account_type: Option<AccountType>,
    pub ownership_type: Option<OwnershipType>,
    pub before: Option<String>,
    pub after: Option<String>,
}

impl ListAccountsParams {
    pub fn to_query(&self) -> Query {
        let mut query = Query::new();
        if let Some(account_type) = self.account_type {
            query.push(("filter[accountType]", account_type.as_str().to_string()));
        }
        if let Some(ownership_type) = self.ownership_type {
            query.push(("filter[ownershipType]", ownership_type.as_str().to_string()));
        }
        push_text(&mut query, "page[before]", &self.before);
        push_text(&mut query, "page[after]", &self.after);
        query
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTransactionsParams {
    pub status: Option<TransactionStatus>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub before: Option<String>,
    pub after: Option<String>,
}

impl ListTransactionsParams {
    /// Everything strictly before `until`.
    pub fn until(until: DateTime<Utc>) -> Self {
        Self {
            until: Some(until),
            ..Self::default()
        }
    }

    pub fn to_query(&self) -> Query {
        let mut query = Query::new();
        if let Some(status) = self.status {
            query.push(("filter[status]", status.as_str().to_string()));
        }
        if let Some(since) = self.since {
            query.push(("filter[since]", rfc3339(since)));
        }
        if let Some(until) = self.until {
            query.push(("filter[until]", rfc3339(until)));
        }
        push_text(&mut query, "filter[category]", &self.category);
        push_text(&mut query, "filter[tag]", &self.tag);
        push_text(&mut query, "page[before]", &self.before);
        push_text(&mut query, "page[after]", &self.after);
        query
    }
}

fn push_text(query: &mut Query, name: &'static str, value: &Option<String>) {
    if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
        query.push((name, value.to_string()));
    }
}

fn rfc3339(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

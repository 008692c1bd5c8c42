use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type AccountId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    /// Savings accounts ("Savers")
    Saver,
    /// The everyday spending account
    Transactional,
    /// Home loan offset / loan accounts
    HomeLoan,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Saver => "SAVER",
            AccountType::Transactional => "TRANSACTIONAL",
            AccountType::HomeLoan => "HOME_LOAN",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OwnershipType {
    Individual,
    Joint,
}

impl OwnershipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OwnershipType::Individual => "INDIVIDUAL",
            OwnershipType::Joint => "JOINT",
        }
    }
}

impl std::fmt::Display for OwnershipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An account held at the bank, as needed for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub display_name: String,
    pub account_type: AccountType,
    pub ownership_type: OwnershipType,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        id: impl Into<AccountId>,
        display_name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            account_type: AccountType::Transactional,
            ownership_type: OwnershipType::Individual,
            created_at,
        }
    }

    pub fn with_account_type(mut self, account_type: AccountType) -> Self {
        self.account_type = account_type;
        self
    }

    pub fn with_ownership_type(mut self, ownership_type: OwnershipType) -> Self {
        self.ownership_type = ownership_type;
        self
    }

    /// File-system friendly form of the display name.
    pub fn file_stem(&self) -> String {
        file_stem(&self.display_name)
    }
}

/// Replace spaces with hyphens, e.g. "Rainy Day" -> "Rainy-Day".
pub fn file_stem(display_name: &str) -> String {
    display_name.replace(' ', "-")
}

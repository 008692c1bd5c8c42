use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Cents;

pub type TransactionId = String;

/// One transaction as reported by the bank. Never mutated after retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: TransactionId,
    /// When the transaction happened; drives ordering and year attribution
    pub created_at: DateTime<Utc>,
    /// Absent while the transaction is still held
    pub settled_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub message: Option<String>,
    /// Signed amount of the primary transaction
    pub base_amount: Cents,
    /// Round-up issued alongside the primary transaction
    pub round_up_amount: Option<Cents>,
    /// Cashback credited against the primary transaction
    pub cashback_amount: Option<Cents>,
}

impl TransactionRecord {
    pub fn new(id: impl Into<TransactionId>, created_at: DateTime<Utc>, base_amount: Cents) -> Self {
        Self {
            id: id.into(),
            created_at,
            settled_at: None,
            description: None,
            message: None,
            base_amount,
            round_up_amount: None,
            cashback_amount: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_settled_at(mut self, settled_at: DateTime<Utc>) -> Self {
        self.settled_at = Some(settled_at);
        self
    }

    pub fn with_round_up(mut self, amount: Cents) -> Self {
        self.round_up_amount = Some(amount);
        self
    }

    pub fn with_cashback(mut self, amount: Cents) -> Self {
        self.cashback_amount = Some(amount);
        self
    }

    /// Base amount plus any round-up and cashback adjustments, or `None` if
    /// the sum overflows.
    pub fn effective_amount(&self) -> Option<Cents> {
        self.base_amount
            .checked_add(self.round_up_amount.unwrap_or(0))?
            .checked_add(self.cashback_amount.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_amount_base_only() {
        let record = TransactionRecord::new("t1", Utc::now(), -1250);
        assert_eq!(record.effective_amount(), Some(-1250));
    }

    #[test]
    fn test_effective_amount_with_adjustments() {
        let record = TransactionRecord::new("t1", Utc::now(), -1250)
            .with_round_up(-50)
            .with_cashback(100);
        assert_eq!(record.effective_amount(), Some(-1200));
    }

    #[test]
    fn test_effective_amount_round_up_only() {
        let record = TransactionRecord::new("t1", Utc::now(), -470).with_round_up(-30);
        assert_eq!(record.effective_amount(), Some(-500));
    }

    #[test]
    fn test_effective_amount_overflow() {
        let record = TransactionRecord::new("t1", Utc::now(), i64::MAX).with_cashback(1);
        assert_eq!(record.effective_amount(), None);
    }
}

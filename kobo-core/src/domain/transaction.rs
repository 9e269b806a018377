//! Transaction domain model

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::de;
use super::resource::{Record, Resource};
use super::result::Error;

/// Direction of money movement relative to the user's account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Debit,
    Credit,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Debit => "debit",
            TransactionType::Credit => "credit",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debit" => Ok(TransactionType::Debit),
            "credit" => Ok(TransactionType::Credit),
            other => Err(Error::validation(format!(
                "unknown transaction type '{}' (expected debit or credit)",
                other
            ))),
        }
    }
}

/// A transaction record held by the BaaS
///
/// Written by this client after money moves; never reconciled against the
/// payments provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    #[serde(deserialize_with = "de::amount")]
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    /// Unix milliseconds
    #[serde(default)]
    pub created_at: Option<i64>,
}

impl Transaction {
    /// Amount with sign applied (debits negative)
    pub fn signed_amount(&self) -> Decimal {
        match self.transaction_type {
            TransactionType::Debit => -self.amount,
            TransactionType::Credit => self.amount,
        }
    }
}

impl Record for Transaction {
    const RESOURCE: Resource = Resource::Transaction;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Body of `POST /transaction`
#[derive(Debug, Clone, Serialize)]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl NewTransaction {
    pub fn debit(amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            transaction_type: TransactionType::Debit,
            amount,
            description: description.into(),
            recipient: None,
            reference: None,
        }
    }

    pub fn credit(amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            transaction_type: TransactionType::Credit,
            ..Self::debit(amount, description)
        }
    }

    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_transaction_wire_shape() {
        let tx = NewTransaction::debit(Decimal::from(1500), "Transfer to Jane")
            .with_recipient("Jane Smith")
            .with_reference("transfer_1");
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["type"], "debit");
        assert_eq!(json["recipient"], "Jane Smith");
        assert_eq!(json["reference"], "transfer_1");

        let credit = NewTransaction::credit(Decimal::from(10), "Top up");
        let json = serde_json::to_value(&credit).unwrap();
        assert_eq!(json["type"], "credit");
        assert!(json.get("recipient").is_none());
    }

    #[test]
    fn test_signed_amount() {
        let tx: Transaction = serde_json::from_str(
            r#"{"id": 1, "type": "debit", "amount": 2500, "description": "Uber Ride"}"#,
        )
        .unwrap();
        assert_eq!(tx.signed_amount(), Decimal::from(-2500));
        assert_eq!(tx.id(), "1");
    }

    #[test]
    fn test_parse_type() {
        assert_eq!("Credit".parse::<TransactionType>().unwrap(), TransactionType::Credit);
        assert!("refund".parse::<TransactionType>().is_err());
    }
}

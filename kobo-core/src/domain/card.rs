//! Card domain model

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::de;
use super::resource::{Record, Resource};
use super::result::Error;

/// Card lifecycle as stored on the record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    #[default]
    Active,
    Frozen,
    Blocked,
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardStatus::Active => "active",
            CardStatus::Frozen => "frozen",
            CardStatus::Blocked => "blocked",
        }
    }
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(CardStatus::Active),
            "frozen" => Ok(CardStatus::Frozen),
            "blocked" => Ok(CardStatus::Blocked),
            other => Err(Error::validation(format!("unknown card status '{}'", other))),
        }
    }
}

/// A payment card held by the BaaS. Issuance happens elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    pub card_number: String,
    #[serde(default)]
    pub expiry: String,
    #[serde(default)]
    pub cvv: String,
    #[serde(default, deserialize_with = "de::amount")]
    pub balance: Decimal,
    #[serde(default)]
    pub status: CardStatus,
    /// "virtual" or "physical"
    #[serde(default)]
    pub card_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
}

impl Card {
    /// `**** **** **** 9012`
    pub fn masked_number(&self) -> String {
        let digits: String = self.card_number.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() < 4 {
            return "****".to_string();
        }
        format!("**** **** **** {}", &digits[digits.len() - 4..])
    }

    /// `5399 1234 5678 9012`
    pub fn formatted_number(&self) -> String {
        let digits: Vec<char> = self.card_number.chars().filter(|c| c.is_ascii_digit()).collect();
        digits
            .chunks(4)
            .map(|chunk| chunk.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_usable(&self) -> bool {
        self.status == CardStatus::Active
    }
}

impl Record for Card {
    const RESOURCE: Resource = Resource::Card;

    fn id(&self) -> &str {
        &self.id
    }
}

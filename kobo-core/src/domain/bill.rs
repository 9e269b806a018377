//! Bill payments: the category catalog and bill records

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::de;
use super::money::validate_amount;
use super::resource::{Record, Resource};
use super::result::{Error, Result};

/// Bill category with its fixed list of billers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillCategory {
    Airtime,
    Electricity,
    Tv,
    Education,
    Betting,
}

impl BillCategory {
    pub const ALL: [BillCategory; 5] = [
        BillCategory::Airtime,
        BillCategory::Electricity,
        BillCategory::Tv,
        BillCategory::Education,
        BillCategory::Betting,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            BillCategory::Airtime => "airtime",
            BillCategory::Electricity => "electricity",
            BillCategory::Tv => "tv",
            BillCategory::Education => "education",
            BillCategory::Betting => "betting",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BillCategory::Airtime => "Airtime",
            BillCategory::Electricity => "Electricity",
            BillCategory::Tv => "TV Subscription",
            BillCategory::Education => "Education",
            BillCategory::Betting => "Betting",
        }
    }

    pub fn providers(&self) -> &'static [&'static str] {
        match self {
            BillCategory::Airtime => &["MTN", "Airtel", "Glo", "9mobile"],
            BillCategory::Electricity => &["AEDC", "EKEDC", "IKEDC", "PHEDC"],
            BillCategory::Tv => &["DStv", "GOtv", "StarTimes"],
            BillCategory::Education => &["WAEC", "JAMB", "NECO"],
            BillCategory::Betting => &["Bet9ja", "SportyBet", "NairaBet", "BetKing"],
        }
    }

    /// What the customer identifier means for this category
    pub fn customer_label(&self) -> &'static str {
        match self {
            BillCategory::Airtime => "Phone number",
            BillCategory::Electricity => "Meter number",
            BillCategory::Tv => "Smartcard number",
            BillCategory::Education => "Candidate number",
            BillCategory::Betting => "Customer ID",
        }
    }

    /// Canonical provider name, matched case-insensitively
    pub fn find_provider(&self, name: &str) -> Option<&'static str> {
        let wanted = name.trim().to_lowercase();
        self.providers()
            .iter()
            .copied()
            .find(|p| p.to_lowercase() == wanted)
    }
}

impl fmt::Display for BillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for BillCategory {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        BillCategory::ALL
            .iter()
            .copied()
            .find(|c| c.id() == wanted || c.label().to_lowercase() == wanted)
            .ok_or_else(|| {
                let ids: Vec<&str> = BillCategory::ALL.iter().map(|c| c.id()).collect();
                Error::validation(format!(
                    "unknown bill category '{}'. Available: {}",
                    s,
                    ids.join(", ")
                ))
            })
    }
}

/// A bill payment as filled in by the user
#[derive(Debug, Clone)]
pub struct BillPayment {
    pub category: BillCategory,
    pub provider: String,
    pub customer: String,
    pub amount: Decimal,
}

impl BillPayment {
    /// Client-side checks before any network call
    pub fn validate(&self, known_balance: Decimal) -> Result<()> {
        if self.category.find_provider(&self.provider).is_none() {
            return Err(Error::validation(format!(
                "'{}' is not a {} provider. Available: {}",
                self.provider,
                self.category.label(),
                self.category.providers().join(", ")
            )));
        }
        if self.customer.trim().is_empty() {
            return Err(Error::validation(format!(
                "{} is required",
                self.category.customer_label()
            )));
        }
        validate_amount(self.amount)?;
        if self.amount > known_balance {
            return Err(Error::validation("Insufficient balance"));
        }
        Ok(())
    }
}

/// A bill record held by the BaaS
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    pub category: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub customer: String,
    #[serde(deserialize_with = "de::amount")]
    pub amount: Decimal,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
}

impl Record for Bill {
    const RESOURCE: Resource = Resource::Bill;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Body of `POST /bill`
#[derive(Debug, Clone, Serialize)]
pub struct NewBill {
    pub category: BillCategory,
    pub provider: String,
    pub customer: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub status: String,
    pub reference: String,
}

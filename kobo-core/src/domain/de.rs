//! Lenient deserializers for BaaS payloads
//!
//! The BaaS returns integer ids and numeric balances, but records written by
//! other clients sometimes carry them as strings. Accept both.

use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Number;

/// A scalar the backend may send as a JSON number or a string
#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Num(Number),
    Text(String),
}

impl Loose {
    fn into_text(self) -> String {
        match self {
            Loose::Num(n) => n.to_string(),
            Loose::Text(s) => s,
        }
    }
}

pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Loose::deserialize(d).map(Loose::into_text)
}

/// Number or numeric string; `null` and `""` read as zero
pub fn amount<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
    let raw = match Option::<Loose>::deserialize(d)? {
        None => return Ok(Decimal::ZERO),
        Some(loose) => loose.into_text(),
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Decimal::ZERO);
    }
    raw.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| D::Error::custom(format!("invalid amount: {}", raw)))
}

//! Naira amounts and the kobo boundary
//!
//! The BaaS stores balances and transaction amounts in Naira. The payments
//! provider only speaks kobo (1/100 Naira), so every amount crossing into it
//! goes through `naira_to_kobo` and every amount coming back through
//! `kobo_to_naira`.

use chrono::Utc;
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::result::{Error, Result};

/// Currency symbol used for display
pub const NAIRA_SIGN: &str = "₦";

/// ISO 4217 code sent to the payments provider
pub const CURRENCY_CODE: &str = "NGN";

const KOBO_PER_NAIRA: i64 = 100;

const REFERENCE_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Convert Naira to kobo, rounding half away from zero
pub fn naira_to_kobo(naira: Decimal) -> Result<i64> {
    (naira * Decimal::from(KOBO_PER_NAIRA))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| Error::validation(format!("amount {} is out of range", naira)))
}

/// Amount the user may move: positive and a whole number of kobo
pub fn validate_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::validation("Amount must be greater than zero"));
    }
    if amount.normalize().scale() > 2 {
        return Err(Error::validation(
            "Amount cannot have more than 2 decimal places",
        ));
    }
    Ok(())
}

/// Convert kobo to Naira (exact)
pub fn kobo_to_naira(kobo: i64) -> Decimal {
    Decimal::new(kobo, 2).normalize()
}

/// Format an amount for display: `₦20,000`, `₦1,234.5`, `-₦50`
pub fn format_naira(amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = rounded.abs().to_string();

    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    match frac_part {
        Some(frac) => format!("{}{}{}.{}", sign, NAIRA_SIGN, grouped, frac),
        None => format!("{}{}{}", sign, NAIRA_SIGN, grouped),
    }
}

/// Current unix time in milliseconds
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// `<prefix>_<unix-ms>` reference, the provider's default shape
pub fn timestamped_reference(prefix: &str) -> String {
    format!("{}_{}", prefix, now_ms())
}

/// `<prefix>_<unix-ms>_<7 random base36 chars>`
pub fn generate_reference(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..7)
        .map(|_| REFERENCE_ALPHABET[rng.gen_range(0..REFERENCE_ALPHABET.len())] as char)
        .collect();
    format!("{}_{}_{}", prefix, now_ms(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hundred_naira_round_trip() {
        let kobo = naira_to_kobo(Decimal::from(100)).unwrap();
        assert_eq!(kobo, 10000);
        assert_eq!(kobo_to_naira(kobo), Decimal::from(100));
    }

    #[test]
    fn test_fractional_naira_rounds_half_up() {
        assert_eq!(naira_to_kobo(Decimal::new(12345, 3)).unwrap(), 1235); // 12.345
        assert_eq!(naira_to_kobo(Decimal::new(1999, 2)).unwrap(), 1999);
        assert_eq!(kobo_to_naira(1999), Decimal::new(1999, 2));
    }

    #[test]
    fn test_amount_must_be_whole_kobo() {
        assert!(validate_amount(Decimal::new(10050, 2)).is_ok()); // 100.50
        assert!(validate_amount(Decimal::new(1000, 3)).is_ok()); // 1.000
        assert!(validate_amount(Decimal::new(1, 2)).is_ok()); // 0.01

        let err = validate_amount(Decimal::new(1, 3)).unwrap_err(); // 0.001
        assert!(err.to_string().contains("2 decimal places"));
        assert!(validate_amount(Decimal::new(100005, 3)).is_err()); // 100.005
        assert!(validate_amount(Decimal::ZERO).is_err());
        assert!(validate_amount(Decimal::from(-5)).is_err());
    }

    #[test]
    fn test_format_naira() {
        assert_eq!(format_naira(Decimal::from(20000)), "₦20,000");
        assert_eq!(format_naira(Decimal::new(12345, 1)), "₦1,234.5");
        assert_eq!(format_naira(Decimal::from(1_000_000)), "₦1,000,000");
        assert_eq!(format_naira(Decimal::from(999)), "₦999");
        assert_eq!(format_naira(Decimal::from(-50)), "-₦50");
        assert_eq!(format_naira(Decimal::ZERO), "₦0");
    }

    #[test]
    fn test_reference_shapes() {
        let reference = generate_reference("ref");
        let parts: Vec<&str> = reference.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ref");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 7);
        assert!(parts[2].chars().all(|c| c.is_ascii_alphanumeric()));

        assert!(timestamped_reference("transfer").starts_with("transfer_"));
    }
}

//! Transfer form rules
//!
//! These are UX checks only. Whether the money actually moves is decided by
//! the payments provider.

use rust_decimal::Decimal;

use super::money::validate_amount;
use super::result::{Error, Result};

/// NUBAN account numbers are ten digits
pub const ACCOUNT_NUMBER_LEN: usize = 10;

/// Transaction PINs are four digits
pub const PIN_LEN: usize = 4;

/// Whether an account lookup should be attempted at all
pub fn is_verifiable(account_number: &str, bank_code: &str) -> bool {
    account_number.len() == ACCOUNT_NUMBER_LEN
        && account_number.chars().all(|c| c.is_ascii_digit())
        && !bank_code.trim().is_empty()
}

pub fn validate_pin(pin: &str) -> Result<()> {
    if pin.len() != PIN_LEN || !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::validation(format!("PIN must be {} digits", PIN_LEN)));
    }
    Ok(())
}

/// Validate a new PIN against its confirmation
pub fn validate_new_pin(pin: &str, confirm: &str) -> Result<()> {
    if pin != confirm {
        return Err(Error::validation("PINs do not match"));
    }
    validate_pin(pin)
}

/// A bank transfer as filled in by the user
#[derive(Debug, Clone)]
pub struct TransferForm {
    pub account_number: String,
    pub bank_code: String,
    /// Naira
    pub amount: Decimal,
    pub reason: Option<String>,
}

impl TransferForm {
    pub fn new(
        account_number: impl Into<String>,
        bank_code: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            account_number: account_number.into().trim().to_string(),
            bank_code: bank_code.into().trim().to_string(),
            amount,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        self.reason = if reason.trim().is_empty() { None } else { Some(reason) };
        self
    }

    /// Client-side checks against the balance last shown to the user
    pub fn validate(&self, known_balance: Decimal) -> Result<()> {
        validate_amount(self.amount)?;
        if self.amount > known_balance {
            return Err(Error::validation("Insufficient balance"));
        }
        if self.bank_code.is_empty() {
            return Err(Error::validation("Please select a bank"));
        }
        if !is_verifiable(&self.account_number, &self.bank_code) {
            return Err(Error::validation(format!(
                "Account number must be {} digits",
                ACCOUNT_NUMBER_LEN
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verifiable_requires_ten_digits_and_bank() {
        assert!(is_verifiable("0123456789", "058"));
        assert!(!is_verifiable("012345678", "058"));
        assert!(!is_verifiable("01234567890", "058"));
        assert!(!is_verifiable("01234567a9", "058"));
        assert!(!is_verifiable("0123456789", ""));
        assert!(!is_verifiable("0123456789", "   "));
    }

    #[test]
    fn test_pin_rules() {
        assert!(validate_pin("1234").is_ok());
        assert!(validate_pin("123").is_err());
        assert!(validate_pin("12a4").is_err());
        assert!(validate_new_pin("1234", "1234").is_ok());
        let err = validate_new_pin("1234", "4321").unwrap_err();
        assert!(err.to_string().contains("PINs do not match"));
    }

    #[test]
    fn test_transfer_amount_rules() {
        let balance = Decimal::from(20000);
        let form = |amount: i64| TransferForm::new("0123456789", "058", Decimal::from(amount));

        assert!(form(5000).validate(balance).is_ok());
        assert!(form(20000).validate(balance).is_ok());
        assert!(form(0).validate(balance).is_err());
        assert!(form(-10).validate(balance).is_err());
        let err = form(20001).validate(balance).unwrap_err();
        assert!(err.to_string().contains("Insufficient balance"));
    }

    #[test]
    fn test_sub_kobo_transfer_amounts_rejected() {
        let balance = Decimal::from(20000);
        let form = |amount: Decimal| TransferForm::new("0123456789", "058", amount);

        assert!(form(Decimal::new(1, 3)).validate(balance).is_err()); // 0.001
        assert!(form(Decimal::new(100005, 3)).validate(balance).is_err()); // 100.005
        assert!(form(Decimal::new(10050, 2)).validate(balance).is_ok()); // 100.50
    }

    #[test]
    fn test_transfer_destination_rules() {
        let balance = Decimal::from(100);
        let no_bank = TransferForm::new("0123456789", "", Decimal::from(10));
        assert!(no_bank.validate(balance).is_err());
        let short = TransferForm::new("12345", "058", Decimal::from(10));
        assert!(short.validate(balance).is_err());
    }

    #[test]
    fn test_blank_reason_dropped() {
        let form = TransferForm::new("0123456789", "058", Decimal::ONE).with_reason("  ");
        assert!(form.reason.is_none());
    }
}

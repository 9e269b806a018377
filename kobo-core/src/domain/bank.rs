//! Payments provider types
//!
//! Transient lookup and transfer data. None of it is persisted locally.
//! Amounts here are in kobo, matching the provider's wire format.

use serde::{Deserialize, Serialize};

use super::money::CURRENCY_CODE;

/// Standard provider response envelope: `{status, message, data}`
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderEnvelope<T> {
    pub status: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

/// A bank from `GET /bank`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bank {
    pub id: i64,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(rename = "type", default)]
    pub bank_type: Option<String>,
}

fn default_active() -> bool {
    true
}

/// Result of `GET /bank/resolve`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountVerification {
    pub account_number: String,
    pub account_name: String,
    #[serde(default)]
    pub bank_id: Option<i64>,
}

/// Body of `POST /transferrecipient`
#[derive(Debug, Clone, Serialize)]
pub struct NewRecipient {
    #[serde(rename = "type")]
    pub recipient_type: String,
    pub name: String,
    pub account_number: String,
    pub bank_code: String,
    pub currency: String,
}

impl NewRecipient {
    /// A Nigerian bank account (NUBAN) recipient in NGN
    pub fn nuban(
        name: impl Into<String>,
        account_number: impl Into<String>,
        bank_code: impl Into<String>,
    ) -> Self {
        Self {
            recipient_type: "nuban".to_string(),
            name: name.into(),
            account_number: account_number.into(),
            bank_code: bank_code.into(),
            currency: CURRENCY_CODE.to_string(),
        }
    }
}

/// A created transfer recipient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRecipient {
    pub recipient_code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: Option<i64>,
}

/// Body of `POST /transfer`
#[derive(Debug, Clone, Serialize)]
pub struct TransferRequest {
    pub source: String,
    /// Kobo
    pub amount: i64,
    pub recipient: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub reference: String,
}

impl TransferRequest {
    pub fn from_balance(amount_kobo: i64, recipient_code: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            source: "balance".to_string(),
            amount: amount_kobo,
            recipient: recipient_code.into(),
            reason: None,
            reference: reference.into(),
        }
    }

    pub fn with_reason(mut self, reason: Option<String>) -> Self {
        self.reason = reason.filter(|r| !r.trim().is_empty());
        self
    }
}

/// Provider response to `POST /transfer`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferResult {
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub transfer_code: Option<String>,
    /// "pending", "success", "otp", "failed"...
    #[serde(default)]
    pub status: String,
    /// Kobo
    #[serde(default)]
    pub amount: i64,
}

/// Body of `POST /transaction/initialize`
#[derive(Debug, Clone, Serialize)]
pub struct PaymentRequest {
    /// Kobo
    pub amount: i64,
    pub email: String,
    pub reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

/// Provider response to `POST /transaction/initialize`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInit {
    pub authorization_url: String,
    #[serde(default)]
    pub access_code: Option<String>,
    pub reference: String,
}

/// Provider view of a payment, from verify or history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentVerification {
    #[serde(default)]
    pub id: Option<i64>,
    /// "success", "failed", "abandoned"...
    #[serde(default)]
    pub status: String,
    pub reference: String,
    /// Kobo
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub gateway_response: Option<String>,
    #[serde(default)]
    pub paid_at: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
}

impl PaymentVerification {
    pub fn is_successful(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_with_bank_list() {
        let body = r#"{
            "status": true,
            "message": "Banks retrieved",
            "data": [
                {"id": 1, "name": "Access Bank", "slug": "access-bank", "code": "044",
                 "active": true, "country": "Nigeria", "currency": "NGN", "type": "nuban"}
            ]
        }"#;
        let envelope: ProviderEnvelope<Vec<Bank>> = serde_json::from_str(body).unwrap();
        assert!(envelope.status);
        let banks = envelope.data.unwrap();
        assert_eq!(banks[0].code, "044");
        assert_eq!(banks[0].bank_type.as_deref(), Some("nuban"));
    }

    #[test]
    fn test_transfer_request_wire_shape() {
        let req = TransferRequest::from_balance(150000, "RCP_abc", "transfer_1")
            .with_reason(Some("  ".to_string()));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["source"], "balance");
        assert_eq!(json["amount"], 150000);
        assert!(json.get("reason").is_none());
    }

    #[test]
    fn test_recipient_defaults_to_naira() {
        let json = serde_json::to_value(NewRecipient::nuban("Jane", "0123456789", "058")).unwrap();
        assert_eq!(json["type"], "nuban");
        assert_eq!(json["currency"], "NGN");
    }
}

//! Payments provider port

use crate::domain::result::Result;
use crate::domain::{
    AccountVerification, Bank, NewRecipient, PaymentInit, PaymentRequest, PaymentVerification,
    TransferRecipient, TransferRequest, TransferResult,
};

/// Bank lookup, account verification and money movement
///
/// All amounts crossing this trait are in kobo.
pub trait PaymentsProvider: Send + Sync {
    /// Provider name (e.g., "paystack")
    fn name(&self) -> &str;

    /// `GET /bank?country=...`
    fn list_banks(&self, country: &str) -> Result<Vec<Bank>>;

    /// `GET /bank/resolve?account_number=...&bank_code=...`
    fn resolve_account(&self, account_number: &str, bank_code: &str)
        -> Result<AccountVerification>;

    /// `POST /transferrecipient`
    fn create_recipient(&self, recipient: &NewRecipient) -> Result<TransferRecipient>;

    /// `POST /transfer`
    fn initiate_transfer(&self, request: &TransferRequest) -> Result<TransferResult>;

    /// `POST /transaction/initialize`
    fn initialize_payment(&self, request: &PaymentRequest) -> Result<PaymentInit>;

    /// `GET /transaction/verify/{reference}`
    fn verify_payment(&self, reference: &str) -> Result<PaymentVerification>;

    /// `GET /transaction?page=..&perPage=..`
    fn list_payments(&self, page: u32, per_page: u32) -> Result<Vec<PaymentVerification>>;
}

//! Wallet service - fund the account through a hosted card checkout
//!
//! Funding is two steps. `fund` opens a checkout and hands back its URL;
//! after the user pays, `verify` asks the provider and credits the balance.
//! A reference is credited at most once: the credit transaction carries the
//! payment reference and its presence short-circuits later verifications.
//! Overlapping verifications of one reference are refused while the first
//! is still running.

use std::sync::Arc;

use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::{info, warn};

use super::guard::ReferenceLocks;
use super::resource::ResourceService;
use super::session::Session;
use crate::domain::money::{kobo_to_naira, naira_to_kobo, timestamped_reference, validate_amount};
use crate::domain::result::{Error, Result};
use crate::domain::{NewTransaction, PaymentInit, PaymentRequest, PaymentVerification, Transaction};
use crate::ports::PaymentsProvider;

#[derive(Debug, Clone, Serialize)]
pub struct FundOutcome {
    pub payment: PaymentVerification,
    /// Credited by this call
    pub credited: bool,
    /// An earlier call already credited this reference
    pub already_credited: bool,
    pub new_balance: Option<Decimal>,
    pub warnings: Vec<String>,
}

pub struct WalletService {
    session: Session,
    provider: Arc<dyn PaymentsProvider>,
    transactions: ResourceService<Transaction>,
    verifying: ReferenceLocks,
}

impl WalletService {
    pub fn new(session: Session, provider: Arc<dyn PaymentsProvider>) -> Self {
        Self {
            transactions: ResourceService::new(session.clone()),
            session,
            provider,
            verifying: ReferenceLocks::new(),
        }
    }

    /// Open a checkout for `amount` Naira, billed to the account e-mail
    pub fn fund(&self, amount: Decimal, callback_url: Option<String>) -> Result<PaymentInit> {
        validate_amount(amount)?;
        let user = self.session.call(|backend, token| backend.me(token))?;
        let email = user
            .email
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| Error::validation("Your account has no e-mail address"))?;

        let request = PaymentRequest {
            amount: naira_to_kobo(amount)?,
            email,
            reference: timestamped_reference("payment"),
            callback_url,
        };
        let init = self.provider.initialize_payment(&request)?;
        info!(reference = %init.reference, "checkout opened");
        Ok(init)
    }

    /// Check a payment and credit the balance if it succeeded
    pub fn verify(&self, reference: &str) -> Result<FundOutcome> {
        let token = self.session.token()?;
        let _permit = self.verifying.acquire(reference)?;
        let payment = self.provider.verify_payment(reference)?;

        if !payment.is_successful() {
            return Ok(FundOutcome {
                payment,
                credited: false,
                already_credited: false,
                new_balance: None,
                warnings: Vec::new(),
            });
        }

        let already_credited = self
            .transactions
            .list()?
            .iter()
            .any(|tx| tx.reference.as_deref() == Some(reference));
        if already_credited {
            return Ok(FundOutcome {
                payment,
                credited: false,
                already_credited: true,
                new_balance: None,
                warnings: Vec::new(),
            });
        }

        let amount = kobo_to_naira(payment.amount);
        let backend = self.session.backend();
        let user = backend.me(token.expose_secret())?;
        let updated = backend.update_balance(token.expose_secret(), user.balance + amount)?;

        let mut warnings = Vec::new();
        let record = NewTransaction::credit(amount, "Wallet funding").with_reference(reference);
        if let Err(e) = self.transactions.create(&record) {
            warn!(error = %e, "credit record failed after funding");
            warnings.push(format!("Transaction record failed: {}", e));
        }

        Ok(FundOutcome {
            payment,
            credited: true,
            already_credited: false,
            new_balance: Some(updated.balance),
            warnings,
        })
    }

    pub fn is_verifying(&self, reference: &str) -> bool {
        self.verifying.is_held(reference)
    }

    /// Recent provider-side payments
    pub fn payments(&self, page: u32, per_page: u32) -> Result<Vec<PaymentVerification>> {
        self.provider.list_payments(page, per_page)
    }
}

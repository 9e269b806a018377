//! Transfer service - bank lookup, account verification and sending money
//!
//! Sending runs in a fixed order: validate, resolve the account, create a
//! recipient, initiate the transfer, then record the result in the BaaS.
//! Once the provider has accepted the transfer the money has moved, so
//! failures in the bookkeeping steps are reported as warnings rather than
//! errors.

use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::{info, warn};

use super::guard::InFlight;
use super::resource::ResourceService;
use super::session::Session;
use crate::domain::money::{naira_to_kobo, timestamped_reference};
use crate::domain::result::{Error, Result};
use crate::domain::transfer::is_verifiable;
use crate::domain::{
    AccountVerification, Bank, NewRecipient, NewTransaction, Transaction, TransferForm,
    TransferRequest,
};
use crate::ports::PaymentsProvider;

/// What happened after a transfer was accepted
#[derive(Debug, Clone, Serialize)]
pub struct TransferOutcome {
    pub reference: String,
    pub transfer_code: Option<String>,
    /// Provider status ("pending", "success", "otp"...)
    pub status: String,
    pub recipient_name: String,
    pub bank_name: Option<String>,
    pub account_number: String,
    pub amount: Decimal,
    /// Balance the BaaS now holds, when the update went through
    pub new_balance: Option<Decimal>,
    pub transaction_id: Option<String>,
    pub warnings: Vec<String>,
}

type LookupKey = (String, String);

pub struct TransferService {
    session: Session,
    provider: Arc<dyn PaymentsProvider>,
    transactions: ResourceService<Transaction>,
    country: String,
    banks: Mutex<Option<Vec<Bank>>>,
    last_lookup: Mutex<Option<(LookupKey, AccountVerification)>>,
    in_flight: InFlight,
}

impl TransferService {
    pub fn new(session: Session, provider: Arc<dyn PaymentsProvider>, country: &str) -> Self {
        Self {
            transactions: ResourceService::new(session.clone()),
            session,
            provider,
            country: country.to_string(),
            banks: Mutex::new(None),
            last_lookup: Mutex::new(None),
            in_flight: InFlight::new(),
        }
    }

    /// Banks for the configured country, fetched once per service
    pub fn banks(&self) -> Result<Vec<Bank>> {
        let mut cache = self.banks.lock().map_err(|_| poisoned())?;
        if let Some(banks) = cache.as_ref() {
            return Ok(banks.clone());
        }
        let banks: Vec<Bank> = self
            .provider
            .list_banks(&self.country)?
            .into_iter()
            .filter(|b| b.active)
            .collect();
        *cache = Some(banks.clone());
        Ok(banks)
    }

    /// Find a bank by exact code, then slug, then name substring
    pub fn find_bank(&self, query: &str) -> Result<Option<Bank>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }
        let banks = self.banks()?;
        let needle = query.to_lowercase();

        let found = banks
            .iter()
            .find(|b| b.code == query)
            .or_else(|| {
                banks
                    .iter()
                    .find(|b| b.slug.as_deref().is_some_and(|s| s.eq_ignore_ascii_case(query)))
            })
            .or_else(|| banks.iter().find(|b| b.name.to_lowercase().contains(&needle)));
        Ok(found.cloned())
    }

    fn cached_bank_name(&self, code: &str) -> Option<String> {
        let cache = self.banks.lock().ok()?;
        cache
            .as_ref()?
            .iter()
            .find(|b| b.code == code)
            .map(|b| b.name.clone())
    }

    /// Resolve the account holder's name
    ///
    /// Returns `None` without calling the provider unless the account
    /// number is ten digits and a bank is chosen. Repeating the last lookup
    /// is answered from memory.
    pub fn verify_account(
        &self,
        account_number: &str,
        bank_code: &str,
    ) -> Result<Option<AccountVerification>> {
        let account_number = account_number.trim();
        let bank_code = bank_code.trim();
        if !is_verifiable(account_number, bank_code) {
            return Ok(None);
        }

        let key = (account_number.to_string(), bank_code.to_string());
        if let Some((last_key, verification)) =
            self.last_lookup.lock().map_err(|_| poisoned())?.as_ref()
        {
            if *last_key == key {
                return Ok(Some(verification.clone()));
            }
        }

        let verification = self.provider.resolve_account(account_number, bank_code)?;
        *self.last_lookup.lock().map_err(|_| poisoned())? = Some((key, verification.clone()));
        Ok(Some(verification))
    }

    pub fn is_sending(&self) -> bool {
        self.in_flight.is_busy()
    }

    /// Send money to another bank account
    ///
    /// `known_balance` is the balance last shown to the user; the form is
    /// checked against it before anything touches the network.
    pub fn send(&self, form: &TransferForm, known_balance: Decimal) -> Result<TransferOutcome> {
        let _permit = self.in_flight.acquire()?;
        form.validate(known_balance)?;
        let token = self.session.token()?;

        let verification = self
            .verify_account(&form.account_number, &form.bank_code)?
            .ok_or_else(|| Error::validation("Account could not be verified"))?;
        let recipient_name = verification.account_name.clone();

        let recipient = self.provider.create_recipient(&NewRecipient::nuban(
            &recipient_name,
            &form.account_number,
            &form.bank_code,
        ))?;

        let reference = timestamped_reference("transfer");
        let request = TransferRequest::from_balance(
            naira_to_kobo(form.amount)?,
            recipient.recipient_code,
            &reference,
        )
        .with_reason(form.reason.clone());
        let result = self.provider.initiate_transfer(&request)?;
        info!(status = %result.status, "transfer accepted by provider");

        let mut warnings = Vec::new();

        let new_balance = match self
            .session
            .backend()
            .update_balance(token.expose_secret(), known_balance - form.amount)
        {
            Ok(user) => Some(user.balance),
            Err(e) => {
                warn!(error = %e, "balance update failed after transfer");
                warnings.push(format!("Balance update failed: {}", e));
                None
            }
        };

        let record = NewTransaction::debit(form.amount, format!("Transfer to {}", recipient_name))
            .with_recipient(&recipient_name)
            .with_reference(&reference);
        let transaction_id = match self.transactions.create(&record) {
            Ok(tx) => Some(tx.id),
            Err(e) => {
                warn!(error = %e, "transaction record failed after transfer");
                warnings.push(format!("Transaction record failed: {}", e));
                None
            }
        };

        Ok(TransferOutcome {
            reference: result.reference.unwrap_or(reference),
            transfer_code: result.transfer_code,
            status: result.status,
            recipient_name,
            bank_name: self.cached_bank_name(&form.bank_code),
            account_number: form.account_number.clone(),
            amount: form.amount,
            new_balance,
            transaction_id,
            warnings,
        })
    }
}

fn poisoned() -> Error {
    Error::Other("transfer state lock poisoned".to_string())
}

//! Bill service - airtime, electricity, TV, education and betting payments
//!
//! There is no biller integration: paying a bill debits the BaaS balance and
//! writes a bill record plus a matching debit transaction.

use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::warn;

use super::guard::InFlight;
use super::resource::ResourceService;
use super::session::Session;
use crate::domain::money::generate_reference;
use crate::domain::result::Result;
use crate::domain::{Bill, BillCategory, BillPayment, NewBill, NewTransaction, Transaction};

#[derive(Debug, Clone, Serialize)]
pub struct BillOutcome {
    pub reference: String,
    pub category: BillCategory,
    pub provider: String,
    pub amount: Decimal,
    pub new_balance: Decimal,
    pub bill_id: Option<String>,
    pub warnings: Vec<String>,
}

pub struct BillService {
    session: Session,
    bills: ResourceService<Bill>,
    transactions: ResourceService<Transaction>,
    in_flight: InFlight,
}

impl BillService {
    pub fn new(session: Session) -> Self {
        Self {
            bills: ResourceService::new(session.clone()),
            transactions: ResourceService::new(session.clone()),
            session,
            in_flight: InFlight::new(),
        }
    }

    pub fn categories(&self) -> &'static [BillCategory] {
        &BillCategory::ALL
    }

    /// Pay a bill from the account balance
    ///
    /// The balance update is the payment itself, so its failure aborts.
    /// Record-keeping failures afterwards come back as warnings.
    pub fn pay(&self, payment: &BillPayment, known_balance: Decimal) -> Result<BillOutcome> {
        let _permit = self.in_flight.acquire()?;
        payment.validate(known_balance)?;
        let token = self.session.token()?;

        let provider = payment
            .category
            .find_provider(&payment.provider)
            .unwrap_or(payment.provider.as_str())
            .to_string();
        let reference = generate_reference("bill");

        let user = self
            .session
            .backend()
            .update_balance(token.expose_secret(), known_balance - payment.amount)?;

        let mut warnings = Vec::new();

        let bill = NewBill {
            category: payment.category,
            provider: provider.clone(),
            customer: payment.customer.trim().to_string(),
            amount: payment.amount,
            status: "success".to_string(),
            reference: reference.clone(),
        };
        let bill_id = match self.bills.create(&bill) {
            Ok(bill) => Some(bill.id),
            Err(e) => {
                warn!(error = %e, "bill record failed after payment");
                warnings.push(format!("Bill record failed: {}", e));
                None
            }
        };

        let record = NewTransaction::debit(
            payment.amount,
            format!("{} - {}", payment.category.label(), provider),
        )
        .with_recipient(&provider)
        .with_reference(&reference);
        if let Err(e) = self.transactions.create(&record) {
            warn!(error = %e, "transaction record failed after bill payment");
            warnings.push(format!("Transaction record failed: {}", e));
        }

        Ok(BillOutcome {
            reference,
            category: payment.category,
            provider,
            amount: payment.amount,
            new_balance: user.balance,
            bill_id,
            warnings,
        })
    }

    /// Past bill payments, newest first
    pub fn history(&self) -> Result<Vec<Bill>> {
        let mut bills = self.bills.list()?;
        bills.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bills)
    }
}

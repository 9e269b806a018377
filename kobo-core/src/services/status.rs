//! Status service - the dashboard summary

use rust_decimal::Decimal;
use serde::Serialize;

use super::resource::ResourceService;
use super::session::Session;
use crate::domain::result::Result;
use crate::domain::{Notification, Transaction, TransactionType};

pub struct StatusService {
    session: Session,
    transactions: ResourceService<Transaction>,
    notifications: ResourceService<Notification>,
    recent: usize,
}

impl StatusService {
    pub fn new(session: Session, recent: usize) -> Self {
        Self {
            transactions: ResourceService::new(session.clone()),
            notifications: ResourceService::new(session.clone()),
            session,
            recent,
        }
    }

    pub fn get_status(&self) -> Result<StatusSummary> {
        let user = self.session.call(|backend, token| backend.me(token))?;
        let mut transactions = self.transactions.list()?;
        let unread_notifications = self
            .notifications
            .list()?
            .iter()
            .filter(|n| !n.read)
            .count();

        let total = |kind: TransactionType| {
            transactions
                .iter()
                .filter(|t| t.transaction_type == kind)
                .map(|t| t.amount)
                .sum::<Decimal>()
        };
        let total_credit = total(TransactionType::Credit);
        let total_debit = total(TransactionType::Debit);
        let transaction_count = transactions.len();

        transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        transactions.truncate(self.recent);

        Ok(StatusSummary {
            name: user.display_name(),
            initials: user.initials(),
            email: user.email,
            account_number: user.account_number,
            balance: user.balance,
            total_credit,
            total_debit,
            transaction_count,
            unread_notifications,
            recent_transactions: transactions,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub name: String,
    pub initials: String,
    pub email: Option<String>,
    pub account_number: Option<String>,
    pub balance: Decimal,
    pub total_credit: Decimal,
    pub total_debit: Decimal,
    pub transaction_count: usize,
    pub unread_notifications: usize,
    /// Newest first
    pub recent_transactions: Vec<Transaction>,
}

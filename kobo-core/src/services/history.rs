//! History service - transaction listing and CSV statements

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};

use super::resource::ResourceService;
use super::session::Session;
use crate::domain::{Transaction, TransactionType};

pub struct HistoryService {
    transactions: ResourceService<Transaction>,
}

impl HistoryService {
    pub fn new(session: Session) -> Self {
        Self {
            transactions: ResourceService::new(session),
        }
    }

    /// Newest first, optionally only one type
    pub fn list(&self, filter: Option<TransactionType>) -> Result<Vec<Transaction>> {
        let mut items: Vec<Transaction> = self
            .transactions
            .list()?
            .into_iter()
            .filter(|t| filter.map_or(true, |kind| t.transaction_type == kind))
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    pub fn get(&self, id: &str) -> Result<Transaction> {
        Ok(self.transactions.get(id)?)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        Ok(self.transactions.delete(id)?)
    }

    /// Write a CSV statement; returns the number of rows
    pub fn export_csv<W: Write>(
        &self,
        writer: W,
        filter: Option<TransactionType>,
    ) -> Result<usize> {
        let items = self.list(filter)?;
        write_statement(writer, &items)?;
        Ok(items.len())
    }

    pub fn export_to_path(&self, path: &Path, filter: Option<TransactionType>) -> Result<usize> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        self.export_csv(file, filter)
    }
}

/// `date,type,description,recipient,reference,amount`, amounts signed
pub fn write_statement<W: Write>(writer: W, items: &[Transaction]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["date", "type", "description", "recipient", "reference", "amount"])?;
    for tx in items {
        let date = tx
            .created_at
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        csv.write_record([
            date.as_str(),
            tx.transaction_type.as_str(),
            tx.description.as_str(),
            tx.recipient.as_deref().unwrap_or(""),
            tx.reference.as_deref().unwrap_or(""),
            tx.signed_amount().to_string().as_str(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

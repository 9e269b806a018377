//! Transactions command - history, details and CSV statements

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use kobo_core::TransactionType;

use super::get_context;
use crate::output;

#[derive(Subcommand)]
pub enum TransactionsCommands {
    /// List transactions, newest first
    List {
        /// Only debits or only credits
        #[arg(long = "type")]
        kind: Option<TransactionType>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one transaction
    Show {
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a transaction record
    Delete {
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
    /// Write a CSV statement
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Only debits or only credits
        #[arg(long = "type")]
        kind: Option<TransactionType>,
    },
}

pub fn run(command: TransactionsCommands) -> Result<()> {
    let ctx = get_context()?;
    let service = &ctx.history_service;

    match command {
        TransactionsCommands::List { kind, limit, json } => {
            let mut items = service.list(kind)?;
            items.truncate(limit);

            if json {
                return output::json(&items);
            }
            if items.is_empty() {
                println!("No transactions found.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["ID", "Date", "Description", "Recipient", "Amount"]);
            for tx in &items {
                table.add_row(vec![
                    tx.id.clone(),
                    output::format_timestamp(tx.created_at),
                    tx.description.clone(),
                    tx.recipient.clone().unwrap_or_default(),
                    output::signed_naira(tx.signed_amount()),
                ]);
            }
            println!("{}", table);
        }
        TransactionsCommands::Show { id, json } => {
            let tx = service.get(&id)?;
            if json {
                return output::json(&tx);
            }
            println!("{}", tx.description.bold());
            println!("  Amount:    {}", output::signed_naira(tx.signed_amount()));
            println!("  Type:      {}", tx.transaction_type);
            println!("  Date:      {}", output::format_timestamp(tx.created_at));
            if let Some(recipient) = &tx.recipient {
                println!("  Recipient: {}", recipient);
            }
            if let Some(reference) = &tx.reference {
                println!("  Reference: {}", reference);
            }
        }
        TransactionsCommands::Delete { id, force } => {
            if !force
                && !Confirm::new()
                    .with_prompt(format!(
                        "Delete transaction {}? This only removes the record, not the money movement.",
                        id
                    ))
                    .default(false)
                    .interact()?
            {
                println!("Cancelled.");
                return Ok(());
            }
            service.delete(&id)?;
            output::success(&format!("Deleted transaction {}", id));
        }
        TransactionsCommands::Export { out, kind } => match out {
            Some(path) => {
                let rows = service.export_to_path(&path, kind)?;
                output::success(&format!("Wrote {} transactions to {}", rows, path.display()));
            }
            None => {
                service.export_csv(std::io::stdout().lock(), kind)?;
            }
        },
    }

    Ok(())
}

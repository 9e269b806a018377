//! Bills command - airtime, electricity, TV and other bill payments

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use kobo_core::domain::{BillCategory, BillPayment};
use kobo_core::services::{Channel, LogEvent};
use rust_decimal::Decimal;

use super::{
    approval, get_context, get_logger, log_event, require_pin, value_or_prompt, Approval,
};
use crate::output;

#[derive(Subcommand)]
pub enum BillsCommands {
    /// List bill categories and their providers
    Categories {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Pay a bill from your balance
    Pay {
        /// Category (airtime, electricity, tv, education, betting)
        category: BillCategory,
        /// Provider, e.g. MTN or DStv
        #[arg(long)]
        provider: Option<String>,
        /// Phone, meter, smartcard or customer number
        #[arg(long)]
        customer: Option<String>,
        /// Amount in Naira
        #[arg(long)]
        amount: Decimal,
        /// Skip confirmation prompt
        #[arg(long, short)]
        yes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show paid bills
    History {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: BillsCommands) -> Result<()> {
    let ctx = get_context()?;

    match command {
        BillsCommands::Categories { json } => {
            let categories = ctx.bill_service.categories();
            if json {
                let data: Vec<_> = categories
                    .iter()
                    .map(|c| {
                        serde_json::json!({
                            "id": c.id(),
                            "label": c.label(),
                            "providers": c.providers(),
                            "customer_label": c.customer_label(),
                        })
                    })
                    .collect();
                return output::json(data);
            }

            let mut table = output::create_table();
            table.set_header(vec!["Category", "Name", "Providers", "Customer"]);
            for c in categories {
                table.add_row(vec![
                    c.id().to_string(),
                    c.label().to_string(),
                    c.providers().join(", "),
                    c.customer_label().to_string(),
                ]);
            }
            println!("{}", table);
        }
        BillsCommands::Pay {
            category,
            provider,
            customer,
            amount,
            yes,
            json,
        } => {
            let approval = approval(yes, json)?;
            let logger = get_logger();
            let user = ctx.auth_service.me()?;

            let provider = value_or_prompt(
                provider,
                &format!("Provider ({})", category.providers().join(", ")),
            )?;
            let customer = value_or_prompt(customer, category.customer_label())?;
            let payment = BillPayment {
                category,
                provider,
                customer,
                amount,
            };
            payment.validate(user.balance)?;

            if approval == Approval::Prompt {
                println!(
                    "Pay {} for {} {} ({})?",
                    output::naira(amount).bold(),
                    payment.provider,
                    category.label(),
                    payment.customer
                );
                if !Confirm::new().with_prompt("Continue").default(false).interact()? {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            require_pin(&ctx)?;

            let outcome = match ctx.bill_service.pay(&payment, user.balance) {
                Ok(outcome) => outcome,
                Err(e) => {
                    log_event(
                        &logger,
                        LogEvent::failed("bill_payment", &e)
                            .via(Channel::Xano)
                            .from_command("bills pay"),
                    );
                    return Err(e.into());
                }
            };
            log_event(
                &logger,
                LogEvent::succeeded("bill_payment").from_command("bills pay"),
            );

            if json {
                return output::json(&outcome);
            }
            output::success(&format!(
                "Paid {} to {}",
                output::naira(outcome.amount),
                outcome.provider
            ));
            println!("  Reference:   {}", outcome.reference);
            println!("  New balance: {}", output::naira(outcome.new_balance).bold());
            for warning in &outcome.warnings {
                output::warning(&format!("Warning: {}", warning));
            }
        }
        BillsCommands::History { json } => {
            let bills = ctx.bill_service.history()?;
            if json {
                return output::json(&bills);
            }
            if bills.is_empty() {
                println!("No bill payments yet.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["Date", "Category", "Provider", "Customer", "Amount", "Status"]);
            for bill in &bills {
                table.add_row(vec![
                    output::format_timestamp(bill.created_at),
                    bill.category.clone(),
                    bill.provider.clone(),
                    bill.customer.clone(),
                    output::naira(bill.amount),
                    bill.status.clone().unwrap_or_default(),
                ]);
            }
            println!("{}", table);
        }
    }

    Ok(())
}

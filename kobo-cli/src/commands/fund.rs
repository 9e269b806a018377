//! Fund command - top up the balance by card

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use kobo_core::domain::money::kobo_to_naira;
use kobo_core::services::{Channel, LogEvent};
use rust_decimal::Decimal;

use super::banks::spinner;
use super::{get_context, get_logger, log_event};
use crate::output;

#[derive(Subcommand)]
pub enum FundCommands {
    /// Open a card checkout for an amount in Naira
    Start {
        amount: Decimal,
        /// Where the checkout redirects after payment
        #[arg(long)]
        callback_url: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check a checkout and credit the balance once it is paid
    Verify {
        reference: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Recent card payments
    History {
        #[arg(long, default_value = "1")]
        page: u32,
        #[arg(long, default_value = "20")]
        per_page: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: FundCommands) -> Result<()> {
    let ctx = get_context()?;
    let service = ctx.wallet_service()?;
    let logger = get_logger();

    match command {
        FundCommands::Start {
            amount,
            callback_url,
            json,
        } => {
            let init = service.fund(amount, callback_url)?;
            log_event(
                &logger,
                LogEvent::started("funding").via(Channel::Paystack),
            );
            if json {
                return output::json(&init);
            }
            println!("Open this link to pay {}:", output::naira(amount).bold());
            println!("  {}", init.authorization_url.underline());
            println!();
            println!("Then run: kobo fund verify {}", init.reference);
        }
        FundCommands::Verify { reference, json } => {
            let bar = spinner("Checking payment...")?;
            let result = service.verify(&reference);
            bar.finish_and_clear();

            let outcome = match result {
                Ok(outcome) => outcome,
                Err(e) => {
                    log_event(
                        &logger,
                        LogEvent::failed("funding", &e)
                            .via(Channel::Paystack)
                            .from_command("fund verify"),
                    );
                    return Err(e.into());
                }
            };
            if outcome.credited {
                log_event(
                    &logger,
                    LogEvent::succeeded("funding").via(Channel::Paystack),
                );
            }

            if json {
                return output::json(&outcome);
            }

            let amount = output::naira(kobo_to_naira(outcome.payment.amount));
            if outcome.credited {
                output::success(&format!("{} added to your balance", amount));
                if let Some(balance) = outcome.new_balance {
                    println!("New balance: {}", output::naira(balance).bold());
                }
            } else if outcome.already_credited {
                output::info(&format!("{} was already added for this payment", amount));
            } else {
                output::warning(&format!(
                    "Payment not completed (status: {})",
                    outcome.payment.status
                ));
            }
            for warning in &outcome.warnings {
                output::warning(&format!("Warning: {}", warning));
            }
        }
        FundCommands::History {
            page,
            per_page,
            json,
        } => {
            let payments = service.payments(page, per_page)?;
            if json {
                return output::json(&payments);
            }
            if payments.is_empty() {
                println!("No card payments found.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["Reference", "Amount", "Status", "Paid at", "Channel"]);
            for p in &payments {
                table.add_row(vec![
                    p.reference.clone(),
                    output::naira(kobo_to_naira(p.amount)),
                    p.status.clone(),
                    p.paid_at.clone().unwrap_or_default(),
                    p.channel.clone().unwrap_or_default(),
                ]);
            }
            println!("{}", table);
        }
    }

    Ok(())
}

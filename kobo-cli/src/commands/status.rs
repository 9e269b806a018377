//! Status command - balance, totals and recent activity

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let status = ctx.status_service.get_status()?;

    if json {
        return output::json(&status);
    }

    println!("{} {}", status.initials.bold().on_blue(), status.name.bold());
    if let Some(account) = &status.account_number {
        println!("Account number: {}", account);
    }
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Balance".to_string(), output::naira(status.balance)]);
    table.add_row(vec!["Money in".to_string(), output::naira(status.total_credit)]);
    table.add_row(vec!["Money out".to_string(), output::naira(status.total_debit)]);
    table.add_row(vec!["Transactions".to_string(), status.transaction_count.to_string()]);
    table.add_row(vec![
        "Unread notifications".to_string(),
        status.unread_notifications.to_string(),
    ]);
    println!("{}", table);

    if status.recent_transactions.is_empty() {
        println!();
        println!("No transactions yet.");
        return Ok(());
    }

    println!();
    println!("{}", "Recent Transactions".bold());
    for tx in &status.recent_transactions {
        println!(
            "  {}  {:<40} {}",
            output::format_timestamp(tx.created_at).dimmed(),
            tx.description,
            output::signed_naira(tx.signed_amount())
        );
    }

    Ok(())
}

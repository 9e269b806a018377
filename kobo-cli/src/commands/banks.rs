//! Bank list and account lookup

use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use super::get_context;
use crate::output;

/// Start a spinner on stderr
pub fn spinner(message: &str) -> Result<ProgressBar> {
    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    Ok(bar)
}

pub fn list(search: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let service = ctx.transfer_service()?;
    let mut banks = service.banks()?;

    if let Some(term) = search.as_deref().map(str::to_lowercase) {
        banks.retain(|b| b.name.to_lowercase().contains(&term) || b.code == term);
    }

    if json {
        return output::json(&banks);
    }

    if banks.is_empty() {
        println!("No banks found.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Code", "Name", "Slug"]);
    for bank in &banks {
        table.add_row(vec![
            bank.code.clone(),
            bank.name.clone(),
            bank.slug.clone().unwrap_or_default(),
        ]);
    }
    println!("{}", table);
    println!("{} banks", banks.len());
    Ok(())
}

pub fn verify(account_number: &str, bank: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let service = ctx.transfer_service()?;

    let bank = service
        .find_bank(bank)?
        .ok_or_else(|| anyhow::anyhow!("Unknown bank '{}'. Run 'kobo banks' to list them.", bank))?;

    let bar = spinner("Verifying account...")?;
    let result = service.verify_account(account_number, &bank.code);
    bar.finish_and_clear();

    let Some(verification) = result? else {
        anyhow::bail!("Account number must be 10 digits");
    };

    if json {
        return output::json(&verification);
    }
    println!(
        "{} {} ({})",
        "Account name:".green(),
        verification.account_name.bold(),
        bank.name
    );
    Ok(())
}

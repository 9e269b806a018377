//! Transfer command - send money to another bank account

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::{Confirm, Input};
use kobo_core::services::{Channel, LogEvent};
use kobo_core::TransferForm;
use rust_decimal::Decimal;

use super::banks::spinner;
use super::{
    approval, get_context, get_logger, log_event, require_pin, value_or_prompt, Approval,
};
use crate::output;

pub struct TransferArgs {
    pub account_number: Option<String>,
    pub bank: Option<String>,
    pub amount: Option<Decimal>,
    pub reason: Option<String>,
    pub yes: bool,
    pub json: bool,
}

pub fn run(args: TransferArgs) -> Result<()> {
    let approval = approval(args.yes, args.json)?;
    let ctx = get_context()?;
    let service = ctx.transfer_service()?;
    let logger = get_logger();

    let user = ctx.auth_service.me()?;
    if !args.json {
        println!("Available balance: {}", output::naira(user.balance).bold());
    }

    let bank_query = value_or_prompt(args.bank, "Bank (name or code)")?;
    let bank = service.find_bank(&bank_query)?.ok_or_else(|| {
        anyhow::anyhow!("Unknown bank '{}'. Run 'kobo banks' to list them.", bank_query)
    })?;
    let account_number = value_or_prompt(args.account_number, "Account number")?;
    let amount = match args.amount {
        Some(amount) => amount,
        None => {
            let text: String = Input::new().with_prompt("Amount (₦)").interact_text()?;
            text.trim()
                .replace(',', "")
                .parse()
                .with_context(|| format!("'{}' is not a valid amount", text))?
        }
    };

    let mut form = TransferForm::new(account_number, &bank.code, amount);
    if let Some(reason) = args.reason {
        form = form.with_reason(reason);
    }
    form.validate(user.balance)?;

    let bar = spinner("Verifying account...")?;
    let lookup = service.verify_account(&form.account_number, &form.bank_code);
    bar.finish_and_clear();
    let verification = lookup?.context("Account could not be verified")?;

    if approval == Approval::Prompt {
        println!();
        println!("  Recipient: {}", verification.account_name.bold());
        println!("  Bank:      {}", bank.name);
        println!("  Account:   {}", form.account_number);
        println!("  Amount:    {}", output::naira(form.amount).bold());
        if let Some(reason) = &form.reason {
            println!("  Reason:    {}", reason);
        }
        println!();
        if !Confirm::new()
            .with_prompt("Send this transfer?")
            .default(false)
            .interact()?
        {
            println!("Cancelled.");
            return Ok(());
        }
    }

    require_pin(&ctx)?;

    log_event(
        &logger,
        LogEvent::started("transfer").via(Channel::Paystack),
    );
    let bar = spinner("Sending...")?;
    let result = service.send(&form, user.balance);
    bar.finish_and_clear();

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            log_event(
                &logger,
                LogEvent::failed("transfer", &e).via(Channel::Paystack),
            );
            return Err(e.into());
        }
    };
    log_event(
        &logger,
        LogEvent::succeeded("transfer")
            .via(Channel::Paystack)
            .with_warnings(outcome.warnings.len()),
    );

    if args.json {
        return output::json(&outcome);
    }

    output::success(&format!(
        "Sent {} to {}",
        output::naira(outcome.amount),
        outcome.recipient_name
    ));
    println!("  Reference: {}", outcome.reference);
    println!("  Status:    {}", outcome.status);
    if let Some(balance) = outcome.new_balance {
        println!("  New balance: {}", output::naira(balance).bold());
    }
    for warning in &outcome.warnings {
        output::warning(&format!("Warning: {}", warning));
    }
    Ok(())
}

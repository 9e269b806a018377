//! Login, signup and logout

use anyhow::Result;
use colored::Colorize;
use kobo_core::domain::{Credentials, SignupForm};
use kobo_core::services::{Channel, LogEvent};

use super::{get_context, get_logger, log_event, secret_or_prompt, value_or_prompt};
use crate::output;

pub fn login(email: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();

    let email = value_or_prompt(email, "Email")?;
    let password = secret_or_prompt("KOBO_PASSWORD", "Password")?;

    if let Err(e) = ctx.auth_service.login(&Credentials::new(email, password)) {
        log_event(
            &logger,
            LogEvent::failed("login", &e).via(Channel::Xano),
        );
        return Err(e.into());
    }
    log_event(&logger, LogEvent::succeeded("login").via(Channel::Xano));

    let user = ctx.auth_service.me()?;
    if json {
        return output::json(&user);
    }
    println!("{} Welcome back, {}", "Signed in.".green(), user.display_name());
    println!("Balance: {}", output::naira(user.balance).bold());
    Ok(())
}

pub fn signup(
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();

    let form = SignupForm {
        first_name: value_or_prompt(first_name, "First name")?,
        last_name: value_or_prompt(last_name, "Last name")?,
        email: value_or_prompt(email, "Email")?,
        phone: value_or_prompt(phone, "Phone number")?,
        password: secret_or_prompt("KOBO_PASSWORD", "Password")?,
        confirm_password: secret_or_prompt("KOBO_PASSWORD", "Confirm password")?,
    };

    let request = match ctx.auth_service.signup(&form) {
        Ok(request) => request,
        Err(e) => {
            log_event(
                &logger,
                LogEvent::failed("signup", &e).via(Channel::Xano),
            );
            return Err(e.into());
        }
    };
    log_event(&logger, LogEvent::succeeded("signup").via(Channel::Xano));

    if json {
        return output::json(serde_json::json!({
            "name": request.name,
            "email": request.email,
            "account_number": request.account_number,
            "balance": request.balance,
        }));
    }

    output::success(&format!("Account created for {}", request.name));
    println!("Account number: {}", request.account_number.bold());
    println!("Opening balance: {}", output::naira(request.balance));
    println!();
    println!("Set a transaction PIN before your first transfer: kobo pin set");
    Ok(())
}

pub fn logout() -> Result<()> {
    let ctx = get_context()?;
    ctx.auth_service.logout()?;
    log_event(&get_logger(), LogEvent::succeeded("logout"));
    output::success("Signed out.");
    Ok(())
}

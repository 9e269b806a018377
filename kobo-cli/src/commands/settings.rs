//! Settings and device sessions

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use kobo_core::domain::SettingValues;

use super::get_context;
use crate::output;

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show security and notification preferences
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Turn a preference on or off, e.g. `kobo settings set push.bills true`
    Set {
        key: String,
        #[arg(action = clap::ArgAction::Set)]
        value: bool,
    },
}

#[derive(Subcommand)]
pub enum SessionsCommands {
    /// List signed-in devices
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Sign a device out
    Revoke {
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
}

fn on_off(value: bool) -> String {
    if value {
        "on".green().to_string()
    } else {
        "off".dimmed().to_string()
    }
}

fn print_values(values: &SettingValues) {
    let n = &values.notifications;
    let mut table = output::create_table();
    table.set_header(vec!["Setting", "Value"]);
    let rows = [
        ("twoFactorAuth", values.two_factor_auth),
        ("biometricLogin", values.biometric_login),
        ("smsAlerts", values.sms_alerts),
        ("emailAlerts", values.email_alerts),
        ("push.transactions", n.push.transactions),
        ("push.security", n.push.security),
        ("push.bills", n.push.bills),
        ("push.promotions", n.push.promotions),
        ("email.statements", n.email.statements),
        ("email.security", n.email.security),
        ("email.marketing", n.email.marketing),
        ("email.updates", n.email.updates),
        ("sms.transactions", n.sms.transactions),
        ("sms.security", n.sms.security),
        ("sms.otp", n.sms.otp),
        ("sms.bills", n.sms.bills),
    ];
    for (key, value) in rows {
        table.add_row(vec![key.to_string(), on_off(value)]);
    }
    println!("{}", table);
}

pub fn run(command: SettingsCommands) -> Result<()> {
    let ctx = get_context()?;

    match command {
        SettingsCommands::Show { json } => {
            let settings = ctx.settings_service.load()?;
            if json {
                return output::json(&settings);
            }
            if settings.id.is_none() {
                output::info("Using default settings (nothing saved yet)");
            }
            print_values(&settings.values);
        }
        SettingsCommands::Set { key, value } => {
            ctx.settings_service.set(&key, value)?;
            output::success(&format!("{} is now {}", key, on_off(value)));
        }
    }

    Ok(())
}

pub fn run_sessions(command: SessionsCommands) -> Result<()> {
    let ctx = get_context()?;

    match command {
        SessionsCommands::List { json } => {
            let sessions = ctx.settings_service.sessions()?;
            if json {
                return output::json(&sessions);
            }
            if sessions.is_empty() {
                println!("No active sessions.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["ID", "Device", "Location", "IP", "Last active"]);
            for s in &sessions {
                table.add_row(vec![
                    s.id.clone(),
                    s.device.clone().unwrap_or_default(),
                    s.location.clone().unwrap_or_default(),
                    s.ip_address.clone().unwrap_or_default(),
                    output::format_timestamp(s.last_active),
                ]);
            }
            println!("{}", table);
        }
        SessionsCommands::Revoke { id, force } => {
            if !force
                && !Confirm::new()
                    .with_prompt(format!("Sign out session {}?", id))
                    .default(false)
                    .interact()?
            {
                println!("Cancelled.");
                return Ok(());
            }
            ctx.settings_service.revoke_session(&id)?;
            output::success(&format!("Session {} signed out", id));
        }
    }

    Ok(())
}

//! Kobo CLI - banking in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{
    auth, banks, bills, cards, config, fund, help_center, logs, notifications, pin, settings,
    status, transactions, transfer,
};

/// Kobo - banking in your terminal
#[derive(Parser)]
#[command(name = "kobo", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with e-mail and password (KOBO_PASSWORD skips the prompt)
    Login {
        email: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open a new account
    Signup {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign out of this machine
    Logout,

    /// Show balance, totals and recent transactions
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List banks that accept transfers
    Banks {
        /// Filter by name or code
        search: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Look up the name on a bank account
    Verify {
        /// 10-digit account number
        account_number: String,
        /// Bank name, slug or code
        #[arg(long)]
        bank: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Send money to a bank account
    Transfer {
        /// 10-digit account number
        #[arg(long)]
        account: Option<String>,
        /// Bank name, slug or code
        #[arg(long)]
        bank: Option<String>,
        /// Amount in Naira
        #[arg(long)]
        amount: Option<Decimal>,
        /// Narration shown to the recipient
        #[arg(long)]
        reason: Option<String>,
        /// Skip confirmation prompt
        #[arg(long, short)]
        yes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Pay bills
    Bills {
        #[command(subcommand)]
        command: bills::BillsCommands,
    },

    /// Manage cards
    Cards {
        #[command(subcommand)]
        command: cards::CardsCommands,
    },

    /// Transaction history and statements
    Transactions {
        #[command(subcommand)]
        command: transactions::TransactionsCommands,
    },

    /// Read and manage notifications
    Notifications {
        #[command(subcommand)]
        command: notifications::NotificationsCommands,
    },

    /// Security and notification preferences
    Settings {
        #[command(subcommand)]
        command: settings::SettingsCommands,
    },

    /// Signed-in devices
    Sessions {
        #[command(subcommand)]
        command: settings::SessionsCommands,
    },

    /// Add money with a card
    Fund {
        #[command(subcommand)]
        command: fund::FundCommands,
    },

    /// Manage the transaction PIN
    Pin {
        #[command(subcommand)]
        command: pin::PinCommands,
    },

    /// Frequently asked questions and support contacts
    HelpCenter {
        /// Search questions and answers
        search: Option<String>,
        /// Write a message to support
        #[arg(long)]
        contact: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View the local event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },

    /// View and change configuration
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },

    /// Print the data directory path
    Dir,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("KOBO_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    init_tracing();
    let wants_json = std::env::args().any(|arg| arg == "--json");
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if wants_json => {
            output::json_failure(&e);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Login { email, json } => auth::login(email, json),
        Commands::Signup { first_name, last_name, email, phone, json } => {
            auth::signup(first_name, last_name, email, phone, json)
        }
        Commands::Logout => auth::logout(),
        Commands::Status { json } => status::run(json),
        Commands::Banks { search, json } => banks::list(search, json),
        Commands::Verify {
            account_number,
            bank,
            json,
        } => banks::verify(&account_number, &bank, json),
        Commands::Transfer { account, bank, amount, reason, yes, json } => {
            transfer::run(transfer::TransferArgs {
                account_number: account,
                bank,
                amount,
                reason,
                yes,
                json,
            })
        }
        Commands::Bills { command } => bills::run(command),
        Commands::Cards { command } => cards::run(command),
        Commands::Transactions { command } => transactions::run(command),
        Commands::Notifications { command } => notifications::run(command),
        Commands::Settings { command } => settings::run(command),
        Commands::Sessions { command } => settings::run_sessions(command),
        Commands::Fund { command } => fund::run(command),
        Commands::Pin { command } => pin::run(command),
        Commands::HelpCenter { search, contact, json } => help_center::run(search, contact, json),
        Commands::Logs { command } => logs::run(command),
        Commands::Config { command } => config::run(command),
        Commands::Dir => {
            println!("{}", commands::get_kobo_dir()?.display());
            Ok(())
        }
    }
}

//! Cards command - view cards and change their status

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use kobo_core::{Card, CardStatus};
use serde::Serialize;

use super::get_context;
use crate::output;

#[derive(Subcommand)]
pub enum CardsCommands {
    /// List your cards
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show card details
    Show {
        /// Card ID
        id: String,
        /// Reveal the full number and CVV
        #[arg(long)]
        reveal: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Temporarily freeze a card
    Freeze {
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Unfreeze a frozen card
    Unfreeze {
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Permanently block a card
    Block {
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Card as printed by `--json`: masked number, no CVV
#[derive(Serialize)]
struct CardView<'a> {
    id: &'a str,
    card_number: String,
    expiry: &'a str,
    balance: rust_decimal::Decimal,
    status: CardStatus,
    card_type: Option<&'a str>,
}

impl<'a> From<&'a Card> for CardView<'a> {
    fn from(card: &'a Card) -> Self {
        Self {
            id: &card.id,
            card_number: card.masked_number(),
            expiry: &card.expiry,
            balance: card.balance,
            status: card.status,
            card_type: card.card_type.as_deref(),
        }
    }
}

fn status_label(status: CardStatus) -> String {
    match status {
        CardStatus::Active => status.as_str().green().to_string(),
        CardStatus::Frozen => status.as_str().cyan().to_string(),
        CardStatus::Blocked => status.as_str().red().to_string(),
    }
}

fn print_status_change(card: &Card, json: bool) -> Result<()> {
    if json {
        return output::json(CardView::from(card));
    }
    output::success(&format!(
        "Card {} is now {}",
        card.masked_number(),
        card.status
    ));
    Ok(())
}

pub fn run(command: CardsCommands) -> Result<()> {
    let ctx = get_context()?;
    let service = &ctx.card_service;

    match command {
        CardsCommands::List { json } => {
            let cards = service.list()?;
            if json {
                let views: Vec<CardView> = cards.iter().map(CardView::from).collect();
                return output::json(views);
            }
            if cards.is_empty() {
                println!("No cards on this account.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["ID", "Number", "Expiry", "Type", "Balance", "Status"]);
            for card in &cards {
                table.add_row(vec![
                    card.id.clone(),
                    card.masked_number(),
                    card.expiry.clone(),
                    card.card_type.clone().unwrap_or_default(),
                    output::naira(card.balance),
                    status_label(card.status),
                ]);
            }
            println!("{}", table);
        }
        CardsCommands::Show { id, reveal, json } => {
            let card = service.get(&id)?;
            if json {
                return output::json(CardView::from(&card));
            }

            let number = if reveal {
                card.formatted_number()
            } else {
                card.masked_number()
            };
            println!("{}", number.bold());
            println!("  Expiry:  {}", card.expiry);
            if reveal {
                println!("  CVV:     {}", card.cvv);
            }
            println!("  Balance: {}", output::naira(card.balance));
            println!("  Status:  {}", status_label(card.status));
            if let Some(kind) = &card.card_type {
                println!("  Type:    {}", kind);
            }
        }
        CardsCommands::Freeze { id, json } => {
            let card = service.freeze(&id)?;
            print_status_change(&card, json)?;
        }
        CardsCommands::Unfreeze { id, json } => {
            let card = service.unfreeze(&id)?;
            print_status_change(&card, json)?;
        }
        CardsCommands::Block { id, force, json } => {
            if !force && !json {
                output::warning("Blocking is permanent. A blocked card cannot be unblocked.");
                if !Confirm::new()
                    .with_prompt(format!("Block card {}?", id))
                    .default(false)
                    .interact()?
                {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            let card = service.block(&id)?;
            print_status_change(&card, json)?;
        }
    }

    Ok(())
}

//! Card service - list cards and change their status

use serde_json::json;
use tracing::info;

use super::resource::ResourceService;
use super::session::Session;
use crate::domain::result::{Error, Result};
use crate::domain::{Card, CardStatus};

pub struct CardService {
    cards: ResourceService<Card>,
}

impl CardService {
    pub fn new(session: Session) -> Self {
        Self {
            cards: ResourceService::new(session),
        }
    }

    pub fn list(&self) -> Result<Vec<Card>> {
        self.cards.list()
    }

    pub fn get(&self, id: &str) -> Result<Card> {
        self.cards.get(id)
    }

    pub fn freeze(&self, id: &str) -> Result<Card> {
        self.set_status(id, CardStatus::Frozen)
    }

    pub fn unfreeze(&self, id: &str) -> Result<Card> {
        self.set_status(id, CardStatus::Active)
    }

    /// Blocking is permanent
    pub fn block(&self, id: &str) -> Result<Card> {
        self.set_status(id, CardStatus::Blocked)
    }

    fn set_status(&self, id: &str, status: CardStatus) -> Result<Card> {
        let card = self.cards.get(id)?;
        if card.status == status {
            return Ok(card);
        }
        if card.status == CardStatus::Blocked {
            return Err(Error::validation(format!(
                "Card {} is blocked and cannot be changed",
                card.masked_number()
            )));
        }

        let updated = self.cards.update(id, &json!({ "status": status }))?;
        info!(card = %id, status = %status, "card status changed");
        Ok(updated)
    }
}

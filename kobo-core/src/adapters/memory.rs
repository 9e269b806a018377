//! In-memory token store for embedders and tests

use std::sync::Mutex;

use secrecy::SecretString;

use crate::domain::result::{Error, Result};
use crate::ports::TokenStore;

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

fn poisoned() -> Error {
    Error::Other("token store lock poisoned".to_string())
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<SecretString>> {
        let guard = self.token.lock().map_err(|_| poisoned())?;
        Ok(guard.clone().map(SecretString::from))
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.token.lock().map_err(|_| poisoned())? = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.lock().map_err(|_| poisoned())? = None;
        Ok(())
    }
}

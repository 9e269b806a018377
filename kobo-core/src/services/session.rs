//! Authenticated access to the BaaS
//!
//! Every data call needs the stored token. A missing token fails with
//! `NotAuthenticated` before any network traffic.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

use crate::domain::result::{Error, Result};
use crate::ports::{BankingBackend, TokenStore};

#[derive(Clone)]
pub struct Session {
    backend: Arc<dyn BankingBackend>,
    tokens: Arc<dyn TokenStore>,
}

impl Session {
    pub fn new(backend: Arc<dyn BankingBackend>, tokens: Arc<dyn TokenStore>) -> Self {
        Self { backend, tokens }
    }

    pub fn backend(&self) -> &dyn BankingBackend {
        self.backend.as_ref()
    }

    pub fn tokens(&self) -> &dyn TokenStore {
        self.tokens.as_ref()
    }

    pub fn token(&self) -> Result<SecretString> {
        self.tokens.load()?.ok_or(Error::NotAuthenticated)
    }

    /// Run `f` with the backend and the bearer token
    pub fn call<T>(&self, f: impl FnOnce(&dyn BankingBackend, &str) -> Result<T>) -> Result<T> {
        let token = self.token()?;
        f(self.backend.as_ref(), token.expose_secret())
    }
}

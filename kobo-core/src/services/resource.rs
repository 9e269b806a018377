//! Typed CRUD over one BaaS collection

use std::marker::PhantomData;

use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::warn;

use super::session::Session;
use crate::domain::result::Result;
use crate::domain::Record;

pub struct ResourceService<T: Record> {
    session: Session,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> ResourceService<T> {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            _record: PhantomData,
        }
    }

    /// All records; ones that fail to decode are skipped
    pub fn list(&self) -> Result<Vec<T>> {
        let raw = self
            .session
            .call(|backend, token| backend.list(token, T::RESOURCE))?;

        Ok(raw
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<T>(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(resource = %T::RESOURCE, error = %e, "skipping malformed record");
                    None
                }
            })
            .collect())
    }

    pub fn get(&self, id: &str) -> Result<T> {
        let value = self
            .session
            .call(|backend, token| backend.get(token, T::RESOURCE, id))?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn create<B: Serialize>(&self, body: &B) -> Result<T> {
        let body = serde_json::to_value(body)?;
        let value = self
            .session
            .call(|backend, token| backend.create(token, T::RESOURCE, &body))?;
        Ok(serde_json::from_value(value)?)
    }

    /// Partial update; only the fields present in `patch` change
    pub fn update(&self, id: &str, patch: &JsonValue) -> Result<T> {
        let value = self
            .session
            .call(|backend, token| backend.update(token, T::RESOURCE, id, patch))?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.session
            .call(|backend, token| backend.delete(token, T::RESOURCE, id))
    }
}

//! Single-flight guards for money-moving operations
//!
//! A second `send`/`pay` while one is running fails fast with
//! `TransferInProgress` instead of moving money twice. Payment verification
//! is serialised per reference with [`ReferenceLocks`].

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::domain::result::{Error, Result};

#[derive(Debug, Default)]
pub struct InFlight {
    busy: AtomicBool,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot; released when the returned permit drops
    pub fn acquire(&self) -> Result<InFlightPermit<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::TransferInProgress)?;
        Ok(InFlightPermit { owner: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub struct InFlightPermit<'a> {
    owner: &'a InFlight,
}

impl Drop for InFlightPermit<'_> {
    fn drop(&mut self) {
        self.owner.busy.store(false, Ordering::Release);
    }
}

/// Set of references currently being worked on
#[derive(Debug, Default)]
pub struct ReferenceLocks {
    held: Mutex<HashSet<String>>,
}

impl ReferenceLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `reference`; fails with `VerificationInProgress` while another permit holds it
    pub fn acquire(&self, reference: &str) -> Result<ReferencePermit<'_>> {
        let mut held = self
            .held
            .lock()
            .map_err(|_| Error::Other("reference lock poisoned".to_string()))?;
        if !held.insert(reference.to_string()) {
            return Err(Error::VerificationInProgress(reference.to_string()));
        }
        Ok(ReferencePermit {
            owner: self,
            reference: reference.to_string(),
        })
    }

    pub fn is_held(&self, reference: &str) -> bool {
        self.held
            .lock()
            .map(|held| held.contains(reference))
            .unwrap_or(false)
    }
}

#[derive(Debug)]
pub struct ReferencePermit<'a> {
    owner: &'a ReferenceLocks,
    reference: String,
}

impl Drop for ReferencePermit<'_> {
    fn drop(&mut self) {
        if let Ok(mut held) = self.owner.held.lock() {
            held.remove(&self.reference);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_fails_until_release() {
        let guard = InFlight::new();
        let permit = guard.acquire().unwrap();
        assert!(guard.is_busy());
        assert!(matches!(guard.acquire(), Err(Error::TransferInProgress)));

        drop(permit);
        assert!(!guard.is_busy());
        assert!(guard.acquire().is_ok());
    }

    #[test]
    fn test_reference_lock_is_per_reference() {
        let locks = ReferenceLocks::new();
        let permit = locks.acquire("payment_1").unwrap();
        assert!(locks.is_held("payment_1"));
        assert!(matches!(
            locks.acquire("payment_1"),
            Err(Error::VerificationInProgress(r)) if r == "payment_1"
        ));
        assert!(locks.acquire("payment_2").is_ok());

        drop(permit);
        assert!(!locks.is_held("payment_1"));
        assert!(locks.acquire("payment_1").is_ok());
    }
}

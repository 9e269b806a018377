//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for the two external systems and for local
//! session storage. Services depend only on these traits.

mod backend;
mod payments;
mod token_store;

pub use backend::BankingBackend;
pub use payments::PaymentsProvider;
pub use token_store::TokenStore;

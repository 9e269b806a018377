//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - Xano HTTP client for BankingBackend
//! - Paystack HTTP client for PaymentsProvider
//! - Token file (or memory) for TokenStore

pub mod file_token;
pub mod memory;
pub mod paystack;
pub mod xano;

#[cfg(test)]
pub mod mock_server;

pub use file_token::FileTokenStore;
pub use memory::MemoryTokenStore;
pub use paystack::{PaystackClient, DEFAULT_PAYSTACK_BASE_URL};
pub use xano::{XanoClient, DEFAULT_API_BASE_URL, DEFAULT_AUTH_BASE_URL};

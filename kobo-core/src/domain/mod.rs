//! Core domain entities
//!
//! Data structures exchanged with the BaaS and the payments provider, plus the
//! client-side form rules. No I/O here.

pub mod bank;
mod bill;
mod card;
pub(crate) mod de;
pub mod money;
mod notification;
pub mod pin;
mod resource;
pub mod result;
mod setting;
pub mod support;
pub mod transfer;
mod transaction;
mod user;

pub use bank::{
    AccountVerification, Bank, NewRecipient, PaymentInit, PaymentRequest, PaymentVerification,
    ProviderEnvelope, TransferRecipient, TransferRequest, TransferResult,
};
pub use bill::{Bill, BillCategory, BillPayment, NewBill};
pub use card::{Card, CardStatus};
pub use notification::Notification;
pub use pin::{PinCost, PinStatus, StoredPin};
pub use resource::{Record, Resource};
pub use setting::{NotificationPreferences, SettingValues, UserSession, UserSetting};
pub use transaction::{NewTransaction, Transaction, TransactionType};
pub use support::SupportRequest;
pub use transfer::TransferForm;
pub use user::{
    generate_account_number, AuthResponse, Credentials, SignupForm, SignupRequest, User,
    STARTING_BALANCE,
};

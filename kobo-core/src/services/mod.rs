//! Service layer - business logic orchestration
//!
//! Services coordinate domain rules and port calls. Each one covers a single
//! feature area of the app.

mod auth;
mod bills;
mod cards;
pub mod guard;
pub mod history;
pub mod logging;
mod notifications;
pub mod pin;
mod resource;
mod session;
mod settings;
mod status;
mod transfer;
mod wallet;

pub use auth::AuthService;
pub use bills::{BillOutcome, BillService};
pub use cards::CardService;
pub use guard::{InFlight, ReferenceLocks};
pub use history::HistoryService;
pub use logging::{ActionSummary, Channel, LogEntry, LogEvent, LoggingService, Outcome, Surface};
pub use notifications::NotificationService;
pub use pin::PinService;
pub use resource::ResourceService;
pub use session::Session;
pub use settings::{LoadedSettings, SettingsService};
pub use status::{StatusService, StatusSummary};
pub use transfer::{TransferOutcome, TransferService};
pub use wallet::{FundOutcome, WalletService};

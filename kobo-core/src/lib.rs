//! Kobo Core - business logic for a terminal banking client
//!
//! This crate follows a hexagonal layout:
//!
//! - **domain**: entities and client-side form rules (User, Transaction, Card...)
//! - **ports**: traits for external systems (BankingBackend, PaymentsProvider, TokenStore)
//! - **services**: orchestration (auth, transfers, bills, funding...)
//! - **adapters**: concrete implementations (Xano, Paystack, token file)

pub mod adapters;
pub mod config;
pub mod domain;
mod log_migrations;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};

use adapters::{FileTokenStore, PaystackClient, XanoClient};
use config::{Config, ENV_PAYSTACK_SECRET_KEY};
use ports::{BankingBackend, PaymentsProvider, TokenStore};
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, ErrorBody, OperationResult};
pub use domain::{
    Bank, Bill, BillCategory, Card, CardStatus, Notification, Transaction, TransactionType,
    TransferForm, User,
};

/// Main context for Kobo operations
///
/// Holds configuration, the adapters and every service. Transfer and
/// wallet services need the payments provider, which only exists when a
/// Paystack secret key is configured.
pub struct KoboContext {
    pub config: Config,
    pub kobo_dir: PathBuf,
    pub session: Session,
    pub auth_service: AuthService,
    pub status_service: StatusService,
    pub history_service: HistoryService,
    pub bill_service: BillService,
    pub card_service: CardService,
    pub notification_service: NotificationService,
    pub settings_service: SettingsService,
    pub pin_service: PinService,
    transfer_service: Option<TransferService>,
    wallet_service: Option<WalletService>,
}

impl KoboContext {
    /// Build a context from `<kobo_dir>/settings.json` and the environment
    pub fn new(kobo_dir: &Path) -> Result<Self> {
        let config = Config::load(kobo_dir)?;

        let backend: Arc<dyn BankingBackend> =
            Arc::new(XanoClient::new(&config.auth_base_url, &config.api_base_url)?);
        let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(kobo_dir));
        let provider: Option<Arc<dyn PaymentsProvider>> = match &config.paystack_secret_key {
            Some(key) => Some(Arc::new(PaystackClient::new(
                &config.paystack_base_url,
                SecretString::from(key.expose_secret().to_string()),
            )?)),
            None => None,
        };

        Ok(Self::with_adapters(kobo_dir, config, backend, tokens, provider))
    }

    /// Build a context around explicit adapters
    pub fn with_adapters(
        kobo_dir: &Path,
        config: Config,
        backend: Arc<dyn BankingBackend>,
        tokens: Arc<dyn TokenStore>,
        provider: Option<Arc<dyn PaymentsProvider>>,
    ) -> Self {
        let session = Session::new(backend, tokens);

        let transfer_service = provider.as_ref().map(|p| {
            TransferService::new(session.clone(), Arc::clone(p), &config.paystack_country)
        });
        let wallet_service = provider
            .as_ref()
            .map(|p| WalletService::new(session.clone(), Arc::clone(p)));

        Self {
            auth_service: AuthService::new(session.clone()),
            status_service: StatusService::new(session.clone(), config.recent_transactions),
            history_service: HistoryService::new(session.clone()),
            bill_service: BillService::new(session.clone()),
            card_service: CardService::new(session.clone()),
            notification_service: NotificationService::new(session.clone()),
            settings_service: SettingsService::new(session.clone()),
            pin_service: PinService::new(kobo_dir.to_path_buf()),
            transfer_service,
            wallet_service,
            session,
            config,
            kobo_dir: kobo_dir.to_path_buf(),
        }
    }

    pub fn transfer_service(&self) -> Result<&TransferService, Error> {
        self.transfer_service.as_ref().ok_or_else(missing_provider)
    }

    pub fn wallet_service(&self) -> Result<&WalletService, Error> {
        self.wallet_service.as_ref().ok_or_else(missing_provider)
    }
}

fn missing_provider() -> Error {
    Error::Config(format!(
        "Paystack is not configured. Set {} to use transfers and funding.",
        ENV_PAYSTACK_SECRET_KEY
    ))
}

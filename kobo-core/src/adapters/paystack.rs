//! Paystack payments client
//!
//! Authenticates with a secret key as bearer token. Every response is an
//! envelope `{status, message, data}`; a `false` status is treated as a
//! failure even on HTTP 200.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::xano::{map_request_error, server_message};
use crate::domain::result::{Error, Result};
use crate::domain::{
    AccountVerification, Bank, NewRecipient, PaymentInit, PaymentRequest, PaymentVerification,
    ProviderEnvelope, TransferRecipient, TransferRequest, TransferResult,
};
use crate::ports::PaymentsProvider;

pub const DEFAULT_PAYSTACK_BASE_URL: &str = "https://api.paystack.co";

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Paystack HTTP client
pub struct PaystackClient {
    client: Client,
    base_url: Url,
    secret_key: SecretString,
}

impl std::fmt::Debug for PaystackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaystackClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl PaystackClient {
    pub fn new(base_url: &str, secret_key: SecretString) -> Result<Self> {
        if secret_key.expose_secret().trim().is_empty() {
            return Err(Error::Config(
                "Paystack secret key is empty. Set PAYSTACK_SECRET_KEY.".to_string(),
            ));
        }

        let base_url = Url::parse(base_url.trim_end_matches('/')).map_err(|e| {
            Error::Config(format!("Invalid Paystack base URL '{}': {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "Invalid Paystack base URL '{}'",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            secret_key,
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Invalid Paystack base URL '{}'", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, path = url.path(), "paystack request");
        self.client
            .request(method, url)
            .bearer_auth(self.secret_key.expose_secret())
    }

    /// Send, check status, unwrap the envelope
    fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().map_err(map_request_error)?;
        let status = response.status();
        let code = status.as_u16();

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let message = server_message(&body)
                .unwrap_or_else(|| format!("Paystack API error: {}", code));
            warn!(status = code, "paystack request failed");
            return Err(Error::api(code, message));
        }

        let envelope: ProviderEnvelope<T> = response
            .json()
            .map_err(|e| Error::Http(format!("Failed to parse Paystack response: {}", e)))?;

        if !envelope.status {
            let message = if envelope.message.trim().is_empty() {
                format!("Paystack API error: {}", code)
            } else {
                envelope.message
            };
            return Err(Error::api(code, message));
        }

        envelope
            .data
            .ok_or_else(|| Error::Http("Paystack response is missing data".to_string()))
    }
}

impl PaymentsProvider for PaystackClient {
    fn name(&self) -> &str {
        "paystack"
    }

    fn list_banks(&self, country: &str) -> Result<Vec<Bank>> {
        let builder = self
            .request(Method::GET, self.url(&["bank"])?)
            .query(&[("country", country)]);
        self.execute(builder)
    }

    fn resolve_account(
        &self,
        account_number: &str,
        bank_code: &str,
    ) -> Result<AccountVerification> {
        let builder = self
            .request(Method::GET, self.url(&["bank", "resolve"])?)
            .query(&[("account_number", account_number), ("bank_code", bank_code)]);
        self.execute(builder)
    }

    fn create_recipient(&self, recipient: &NewRecipient) -> Result<TransferRecipient> {
        let builder = self
            .request(Method::POST, self.url(&["transferrecipient"])?)
            .json(recipient);
        self.execute(builder)
    }

    fn initiate_transfer(&self, request: &TransferRequest) -> Result<TransferResult> {
        let builder = self
            .request(Method::POST, self.url(&["transfer"])?)
            .json(request);
        self.execute(builder)
    }

    fn initialize_payment(&self, request: &PaymentRequest) -> Result<PaymentInit> {
        let builder = self
            .request(Method::POST, self.url(&["transaction", "initialize"])?)
            .json(request);
        self.execute(builder)
    }

    fn verify_payment(&self, reference: &str) -> Result<PaymentVerification> {
        let builder = self.request(
            Method::GET,
            self.url(&["transaction", "verify", reference])?,
        );
        self.execute(builder)
    }

    fn list_payments(&self, page: u32, per_page: u32) -> Result<Vec<PaymentVerification>> {
        let builder = self
            .request(Method::GET, self.url(&["transaction"])?)
            .query(&[("page", page), ("perPage", per_page)]);
        self.execute(builder)
    }
}

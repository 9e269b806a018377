//! Xano backend-as-a-service client
//!
//! Two API groups: the auth group (`/auth/login`, `/auth/signup`,
//! `/auth/me`) and the data group (one CRUD collection per resource).
//! Every data request carries the session token as a bearer header.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Method;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};
use url::Url;

use crate::domain::result::{Error, Result};
use crate::domain::{AuthResponse, Credentials, Resource, SignupRequest, User};
use crate::ports::BankingBackend;

/// Default auth API group
pub const DEFAULT_AUTH_BASE_URL: &str = "https://x8ki-letl-twmt.n7.xano.io/api:Ye7qAxAj";

/// Default data API group
pub const DEFAULT_API_BASE_URL: &str = "https://x8ki-letl-twmt.n7.xano.io/api:kQC-7-zf";

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// How a non-2xx response is turned into a message
#[derive(Debug, Clone, Copy)]
enum OnFailure {
    /// Always this message, whatever the server said
    Fixed(&'static str),
    /// Server `message`, else this fallback
    ServerOr(&'static str),
    /// Server `message`, else `HTTP error! status: N`
    ServerOrStatus,
}

/// Body of `PATCH /auth/me`
#[derive(Serialize)]
struct BalancePatch {
    #[serde(with = "rust_decimal::serde::float")]
    balance: Decimal,
}

/// Xano HTTP client
#[derive(Debug)]
pub struct XanoClient {
    client: Client,
    auth_base_url: Url,
    api_base_url: Url,
}

impl XanoClient {
    pub fn new(auth_base_url: &str, api_base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            auth_base_url: parse_base_url(auth_base_url, "auth")?,
            api_base_url: parse_base_url(api_base_url, "API")?,
        })
    }

    fn auth_url(&self, endpoint: &str) -> Result<Url> {
        join_segments(&self.auth_base_url, &["auth", endpoint])
    }

    fn resource_url(&self, resource: Resource, id: Option<&str>) -> Result<Url> {
        match id {
            Some(id) => join_segments(&self.api_base_url, &[resource.path(), id]),
            None => join_segments(&self.api_base_url, &[resource.path()]),
        }
    }

    fn request(&self, method: Method, url: Url, token: Option<&str>) -> RequestBuilder {
        debug!(%method, %url, "baas request");
        let builder = self.client.request(method, url);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn execute(&self, builder: RequestBuilder, on_failure: OnFailure) -> Result<Response> {
        let response = builder.send().map_err(map_request_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let code = status.as_u16();
        let body = response.text().unwrap_or_default();
        let message = match on_failure {
            OnFailure::Fixed(message) => message.to_string(),
            OnFailure::ServerOr(fallback) => {
                server_message(&body).unwrap_or_else(|| fallback.to_string())
            }
            OnFailure::ServerOrStatus => {
                server_message(&body).unwrap_or_else(|| format!("HTTP error! status: {}", code))
            }
        };
        warn!(status = code, "baas request failed");
        Err(Error::api(code, message))
    }

    fn execute_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        on_failure: OnFailure,
    ) -> Result<T> {
        self.execute(builder, on_failure)?
            .json::<T>()
            .map_err(|e| Error::Http(format!("Failed to parse response: {}", e)))
    }
}

impl BankingBackend for XanoClient {
    fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let builder = self
            .request(Method::POST, self.auth_url("login")?, None)
            .json(credentials);
        self.execute_json(builder, OnFailure::Fixed("Invalid credentials"))
    }

    fn signup(&self, request: &SignupRequest) -> Result<AuthResponse> {
        let builder = self
            .request(Method::POST, self.auth_url("signup")?, None)
            .json(request);
        self.execute_json(builder, OnFailure::ServerOr("Signup failed"))
    }

    fn me(&self, token: &str) -> Result<User> {
        let builder = self.request(Method::GET, self.auth_url("me")?, Some(token));
        self.execute_json(builder, OnFailure::ServerOrStatus)
    }

    fn update_balance(&self, token: &str, balance: Decimal) -> Result<User> {
        let builder = self
            .request(Method::PATCH, self.auth_url("me")?, Some(token))
            .json(&BalancePatch { balance });
        self.execute_json(builder, OnFailure::ServerOrStatus)
    }

    fn list(&self, token: &str, resource: Resource) -> Result<Vec<JsonValue>> {
        let builder = self.request(Method::GET, self.resource_url(resource, None)?, Some(token));
        let value: JsonValue = self.execute_json(builder, OnFailure::ServerOrStatus)?;
        match value {
            JsonValue::Array(items) => Ok(items),
            // Paged endpoints wrap the list
            JsonValue::Object(mut map) => match map.remove("items") {
                Some(JsonValue::Array(items)) => Ok(items),
                _ => Err(Error::Http(format!("Unexpected {} list response", resource))),
            },
            JsonValue::Null => Ok(Vec::new()),
            _ => Err(Error::Http(format!("Unexpected {} list response", resource))),
        }
    }

    fn get(&self, token: &str, resource: Resource, id: &str) -> Result<JsonValue> {
        let builder = self.request(
            Method::GET,
            self.resource_url(resource, Some(id))?,
            Some(token),
        );
        match self.execute_json(builder, OnFailure::ServerOrStatus) {
            Err(Error::Api { status: 404, .. }) => {
                Err(Error::not_found(format!("{} {}", resource, id)))
            }
            other => other,
        }
    }

    fn create(&self, token: &str, resource: Resource, body: &JsonValue) -> Result<JsonValue> {
        let builder = self
            .request(Method::POST, self.resource_url(resource, None)?, Some(token))
            .json(body);
        self.execute_json(builder, OnFailure::ServerOrStatus)
    }

    fn update(
        &self,
        token: &str,
        resource: Resource,
        id: &str,
        body: &JsonValue,
    ) -> Result<JsonValue> {
        let builder = self
            .request(
                Method::PATCH,
                self.resource_url(resource, Some(id))?,
                Some(token),
            )
            .json(body);
        self.execute_json(builder, OnFailure::ServerOrStatus)
    }

    fn delete(&self, token: &str, resource: Resource, id: &str) -> Result<()> {
        let builder = self.request(
            Method::DELETE,
            self.resource_url(resource, Some(id))?,
            Some(token),
        );
        self.execute(builder, OnFailure::ServerOrStatus)?;
        Ok(())
    }
}

fn parse_base_url(raw: &str, label: &str) -> Result<Url> {
    let url = Url::parse(raw.trim_end_matches('/'))
        .map_err(|e| Error::Config(format!("Invalid {} base URL '{}': {}", label, raw, e)))?;
    if url.cannot_be_a_base() {
        return Err(Error::Config(format!("Invalid {} base URL '{}'", label, raw)));
    }
    Ok(url)
}

fn join_segments(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| Error::Config(format!("Invalid base URL '{}'", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// `message` field of a JSON error body, if any
pub(crate) fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<JsonValue>(body)
        .ok()?
        .get("message")?
        .as_str()
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
}

/// Map transport errors to user-friendly messages
pub(crate) fn map_request_error(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::Http(format!(
            "Connection timed out after {} seconds",
            REQUEST_TIMEOUT_SECS
        ))
    } else if error.is_connect() {
        Error::Http("Network error: unable to reach the server".to_string())
    } else {
        Error::Http(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_keep_api_group_segment() {
        let client = XanoClient::new(
            "https://example.xano.io/api:Ye7qAxAj",
            "https://example.xano.io/api:kQC-7-zf/",
        )
        .unwrap();

        assert_eq!(
            client.auth_url("login").unwrap().as_str(),
            "https://example.xano.io/api:Ye7qAxAj/auth/login"
        );
        assert_eq!(
            client.resource_url(Resource::UserSetting, Some("7")).unwrap().as_str(),
            "https://example.xano.io/api:kQC-7-zf/user_setting/7"
        );
    }

    #[test]
    fn test_reject_invalid_base_url() {
        let result = XanoClient::new("not a url", DEFAULT_API_BASE_URL);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_server_message_extraction() {
        assert_eq!(
            server_message(r#"{"code":"ERROR_CODE_ACCESS_DENIED","message":"Invalid token."}"#),
            Some("Invalid token.".to_string())
        );
        assert_eq!(server_message(r#"{"message": ""}"#), None);
        assert_eq!(server_message("<html>Bad gateway</html>"), None);
    }
}

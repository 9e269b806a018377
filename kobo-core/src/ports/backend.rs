//! Backend-as-a-service port

use rust_decimal::Decimal;
use serde_json::Value as JsonValue;

use crate::domain::result::Result;
use crate::domain::{AuthResponse, Credentials, Resource, SignupRequest, User};

/// The system of record: auth plus JSON resource collections
///
/// Implementations attach `token` as a bearer header. Resource bodies are
/// plain JSON here; typing happens in `ResourceService`.
pub trait BankingBackend: Send + Sync {
    // === Auth ===

    /// `POST /auth/login`
    fn login(&self, credentials: &Credentials) -> Result<AuthResponse>;

    /// `POST /auth/signup`
    fn signup(&self, request: &SignupRequest) -> Result<AuthResponse>;

    /// `GET /auth/me`
    fn me(&self, token: &str) -> Result<User>;

    /// `PATCH /auth/me {balance}`
    fn update_balance(&self, token: &str, balance: Decimal) -> Result<User>;

    // === Resources ===

    /// `GET /{resource}`
    fn list(&self, token: &str, resource: Resource) -> Result<Vec<JsonValue>>;

    /// `GET /{resource}/{id}`
    fn get(&self, token: &str, resource: Resource, id: &str) -> Result<JsonValue>;

    /// `POST /{resource}`
    fn create(&self, token: &str, resource: Resource, body: &JsonValue) -> Result<JsonValue>;

    /// `PATCH /{resource}/{id}`
    fn update(&self, token: &str, resource: Resource, id: &str, body: &JsonValue)
        -> Result<JsonValue>;

    /// `DELETE /{resource}/{id}`
    fn delete(&self, token: &str, resource: Resource, id: &str) -> Result<()>;
}

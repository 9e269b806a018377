//! Session token storage port

use secrecy::SecretString;

use crate::domain::result::Result;

/// Holds the single bearer token of the signed-in user
///
/// Set on login/signup success, cleared on logout.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<SecretString>>;

    fn save(&self, token: &str) -> Result<()>;

    fn clear(&self) -> Result<()>;
}

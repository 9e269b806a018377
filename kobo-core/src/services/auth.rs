//! Auth service - login, signup and the current user

use tracing::{info, warn};

use super::session::Session;
use crate::domain::result::{Error, Result};
use crate::domain::{AuthResponse, Credentials, SignupForm, SignupRequest, User};

pub struct AuthService {
    session: Session,
}

impl AuthService {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Exchange credentials for a session token
    ///
    /// The token is stored only when the call succeeds and actually carries
    /// one. On any failure the previous token, if any, is left untouched.
    pub fn login(&self, credentials: &Credentials) -> Result<()> {
        credentials.validate()?;
        let response = self.session.backend().login(credentials)?;
        self.store_token(response)?;
        info!("login succeeded");
        Ok(())
    }

    /// Create an account with a generated account number and the
    /// starting balance, then sign in with the returned token
    pub fn signup(&self, form: &SignupForm) -> Result<SignupRequest> {
        form.validate()?;
        let request = SignupRequest::from_form(form);
        let response = self.session.backend().signup(&request)?;
        self.store_token(response)?;
        info!("signup succeeded");
        Ok(request)
    }

    fn store_token(&self, response: AuthResponse) -> Result<()> {
        match response.auth_token.filter(|t| !t.trim().is_empty()) {
            Some(token) => self.session.tokens().save(&token),
            None => {
                warn!("auth response carried no token");
                Err(Error::Other("Login failed: no token returned".to_string()))
            }
        }
    }

    pub fn me(&self) -> Result<User> {
        self.session.call(|backend, token| backend.me(token))
    }

    pub fn logout(&self) -> Result<()> {
        self.session.tokens().clear()
    }

    pub fn is_logged_in(&self) -> Result<bool> {
        Ok(self.session.tokens().load()?.is_some())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

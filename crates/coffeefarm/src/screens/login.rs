use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

use crate::api::FarmBackend;
use crate::error::FlowError;
use crate::models::User;
use crate::screens::FormErrors;
use crate::session::Session;

pub struct LoginScreen<B: FarmBackend> {
    backend: Arc<B>,
    session: Session,
    pub error: Option<String>,
}

impl<B: FarmBackend> LoginScreen<B> {
    pub fn new(backend: Arc<B>, session: Session) -> Self {
        Self {
            backend,
            session,
            error: None,
        }
    }

    /// Signs in and moves the session to authenticated. On failure the
    /// session is left untouched and `error` holds the message.
    pub async fn submit(&mut self, email: &str, password: &SecretString) -> Result<User, FlowError> {
        self.error = None;

        if email.trim().is_empty() || password.expose_secret().is_empty() {
            let err = FormErrors::single("credentials", "Please enter email and password");
            self.error = Some(err.to_string());
            return Err(err.into());
        }

        let response = match self.backend.login(email, password).await {
            Ok(response) => response,
            Err(e) => {
                let err = FlowError::api(e, "Login failed");
                self.error = Some(err.to_string());
                return Err(err);
            }
        };

        let user = response.user.clone();
        self.session
            .login(response.user, SecretString::from(response.access_token));
        Ok(user)
    }
}

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};

use crate::api::client::{ApiClient, RequestBody};
use crate::error::ApiError;
use crate::models::LoginResponse;

impl ApiClient {
    /// `POST /auth/login` as an OAuth2 password form. Does not touch the
    /// session; the caller decides what to do with the token.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<LoginResponse, ApiError> {
        let form = vec![
            ("username", email.trim().to_string()),
            ("password", password.expose_secret().to_string()),
        ];
        self.mutate(Method::POST, "/auth/login", RequestBody::Form(form), |_| Vec::new())
            .await
    }

    /// Clears the session and every cached query.
    pub fn logout(&self) {
        self.session().logout();
        self.cache().clear();
    }
}

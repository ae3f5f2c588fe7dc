use std::sync::Arc;

use crate::api::FarmBackend;
use crate::error::SessionError;
use crate::models::User;
use crate::session::Session;

pub struct ProfileScreen<B: FarmBackend> {
    backend: Arc<B>,
    session: Session,
}

impl<B: FarmBackend> ProfileScreen<B> {
    pub fn new(backend: Arc<B>, session: Session) -> Self {
        Self { backend, session }
    }

    pub fn user(&self) -> Result<User, SessionError> {
        self.session.require_user()
    }

    /// First letter of each name part, for the avatar.
    pub fn initials(&self) -> String {
        self.session
            .user()
            .map(|u| {
                u.name
                    .split_whitespace()
                    .filter_map(|part| part.chars().next())
                    .flat_map(char::to_uppercase)
                    .take(2)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Ends the session. The backend clears the token and cached queries.
    pub fn logout(&self) {
        self.backend.logout();
    }
}

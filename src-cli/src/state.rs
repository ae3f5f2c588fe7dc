//! Process-wide state shared by every command.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{info, warn};

use coffeefarm::config::{default_config_dir, load_or_default};
use coffeefarm::models::User;
use coffeefarm::{ApiClient, ClientConfig, Session, SessionStore, TokenEncryptor};

use crate::commands::CliError;

pub struct AppState {
    pub config: ClientConfig,
    pub session: Session,
    pub client: Arc<ApiClient>,
    pub store: SessionStore,
}

impl AppState {
    /// Loads config, builds the client and restores a saved session if one
    /// exists. A saved session that cannot be read is ignored with a warning.
    pub fn load(config_path: Option<&Path>) -> Result<Self, CliError> {
        let config = load_or_default(config_path)?;
        let session = Session::new();
        let client = Arc::new(ApiClient::new(&config, session.clone())?);

        let encryptor = TokenEncryptor::from_env()?;
        let config_dir = default_config_dir().unwrap_or_else(|| PathBuf::from("."));
        let store = SessionStore::in_dir(&config_dir, encryptor);

        match store.restore(&session) {
            Ok(true) => info!("Restored session from {:?}", store.path()),
            Ok(false) => {}
            Err(e) => warn!("Ignoring saved session: {}", e),
        }

        Ok(Self {
            config,
            session,
            client,
            store,
        })
    }

    /// The signed-in user, or an error telling the user to log in.
    pub fn require_login(&self) -> Result<User, CliError> {
        Ok(self.session.require_user()?)
    }
}

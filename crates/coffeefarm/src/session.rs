//! The authenticated user and bearer token, shared by everything that talks
//! to the backend.
//!
//! [`Session`] is a cheap handle around one `RwLock`. Only [`Session::login`]
//! and [`Session::logout`] write to it; every outgoing request reads it.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::models::User;
use crate::secrets::TokenEncryptor;

pub struct AuthSession {
    pub user: User,
    token: SecretString,
}

impl AuthSession {
    pub fn token(&self) -> &SecretString {
        &self.token
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("user", &self.user)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Default)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticated(AuthSession),
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    state: Arc<RwLock<SessionState>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&self, user: User, token: SecretString) {
        info!("Signed in as {}", user.email);
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = SessionState::Authenticated(AuthSession { user, token });
    }

    pub fn logout(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if let SessionState::Authenticated(auth) = &*state {
            info!("Signed out {}", auth.user.email);
        }
        *state = SessionState::Unauthenticated;
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(
            &*self.state.read().unwrap_or_else(PoisonError::into_inner),
            SessionState::Authenticated(_)
        )
    }

    pub fn user(&self) -> Option<User> {
        match &*self.state.read().unwrap_or_else(PoisonError::into_inner) {
            SessionState::Authenticated(auth) => Some(auth.user.clone()),
            SessionState::Unauthenticated => None,
        }
    }

    pub fn require_user(&self) -> Result<User, SessionError> {
        self.user().ok_or(SessionError::NotAuthenticated)
    }

    /// A copy of the bearer token, if logged in.
    pub fn bearer_token(&self) -> Option<SecretString> {
        match &*self.state.read().unwrap_or_else(PoisonError::into_inner) {
            SessionState::Authenticated(auth) => Some(SecretString::from(
                auth.token.expose_secret().to_string(),
            )),
            SessionState::Unauthenticated => None,
        }
    }
}

const SESSION_FILE_NAME: &str = "session.json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    user: User,
    token: String,
    #[serde(default)]
    encrypted: bool,
    saved_at: DateTime<Utc>,
}

/// Persists a [`Session`] between CLI invocations.
///
/// With an encryptor the token is sealed with AES-256-GCM; without one it is
/// stored as-is and a warning is logged.
pub struct SessionStore {
    path: PathBuf,
    encryptor: Option<TokenEncryptor>,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>, encryptor: Option<TokenEncryptor>) -> Self {
        Self {
            path: path.into(),
            encryptor,
        }
    }

    /// `session.json` inside `config_dir`.
    pub fn in_dir(config_dir: &Path, encryptor: Option<TokenEncryptor>) -> Self {
        Self::new(config_dir.join(SESSION_FILE_NAME), encryptor)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        let user = session.user().ok_or(SessionError::NotAuthenticated)?;
        let token = session.bearer_token().ok_or(SessionError::NotAuthenticated)?;

        let (token, encrypted) = match &self.encryptor {
            Some(enc) => (
                enc.seal(token.expose_secret())
                    .map_err(|e| SessionError::Encrypt(e.to_string()))?,
                true,
            ),
            None => {
                warn!("Storing session token unencrypted; set COFFEEFARM_TOKEN_KEY to encrypt it");
                (token.expose_secret().to_string(), false)
            }
        };

        let stored = StoredSession {
            user,
            token,
            encrypted,
            saved_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&stored)
            .map_err(|e| SessionError::Corrupt(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SessionError::WriteFile {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        write_private(&self.path, json.as_bytes()).map_err(|e| SessionError::WriteFile {
            path: self.path.clone(),
            source: e,
        })?;

        debug!("Session saved to {:?}", self.path);
        Ok(())
    }

    /// Logs `session` in from the saved file. Returns `false` when there is
    /// no saved session.
    pub fn restore(&self, session: &Session) -> Result<bool, SessionError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => {
                return Err(SessionError::ReadFile {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        let stored: StoredSession =
            serde_json::from_str(&content).map_err(|e| SessionError::Corrupt(e.to_string()))?;

        let token = if stored.encrypted {
            let enc = self.encryptor.as_ref().ok_or_else(|| {
                SessionError::Decrypt(
                    "saved token is encrypted but COFFEEFARM_TOKEN_KEY is not set".to_string(),
                )
            })?;
            enc.open(&stored.token)
                .map_err(|e| SessionError::Decrypt(e.to_string()))?
        } else {
            stored.token
        };

        if token.is_empty() {
            return Err(SessionError::Corrupt("empty token".to_string()));
        }

        debug!("Restored session saved at {}", stored.saved_at);
        session.login(stored.user, SecretString::from(token));
        Ok(true)
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::WriteFile {
                path: self.path.clone(),
                source: e,
            }),
        }
    }
}

/// Writes `contents` to a file only the owner can read. A file left behind
/// with wider permissions is tightened before anything is written to it.
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::io::Write;

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TEST_KEY: &str = "ffeeddccbbaa99887766554433221100ffeeddccbbaa99887766554433221100";

    fn user() -> User {
        User {
            id: "u1".to_string(),
            email: "manager@farm.vn".to_string(),
            name: "Farm Manager".to_string(),
            role: "admin".to_string(),
        }
    }

    #[test]
    fn starts_unauthenticated() {
        let session = Session::new();
        assert!(!session.is_authenticated());
        assert!(session.bearer_token().is_none());
        assert!(matches!(
            session.require_user(),
            Err(SessionError::NotAuthenticated)
        ));
    }

    #[test]
    fn login_then_logout() {
        let session = Session::new();
        session.login(user(), SecretString::from("tok"));
        assert!(session.is_authenticated());
        assert_eq!(session.user().unwrap().name, "Farm Manager");
        assert_eq!(session.bearer_token().unwrap().expose_secret(), "tok");

        session.logout();
        assert!(!session.is_authenticated());
        assert!(session.bearer_token().is_none());
    }

    #[test]
    fn clones_share_state() {
        let session = Session::new();
        let handle = session.clone();
        session.login(user(), SecretString::from("tok"));
        assert!(handle.is_authenticated());
    }

    #[test]
    fn debug_hides_token() {
        let session = Session::new();
        session.login(user(), SecretString::from("very-secret-token"));
        let printed = format!("{:?}", session);
        assert!(!printed.contains("very-secret-token"));
    }

    #[test]
    fn save_and_restore_plain() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::in_dir(dir.path(), None);

        let session = Session::new();
        session.login(user(), SecretString::from("plain-token"));
        store.save(&session).unwrap();

        let restored = Session::new();
        assert!(store.restore(&restored).unwrap());
        assert_eq!(
            restored.bearer_token().unwrap().expose_secret(),
            "plain-token"
        );
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = SessionStore::in_dir(dir.path(), None);
        let session = Session::new();
        session.login(user(), SecretString::from("t"));

        store.save(&session).unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        std::fs::set_permissions(store.path(), std::fs::Permissions::from_mode(0o644)).unwrap();
        store.save(&session).unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn save_and_restore_encrypted() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::in_dir(
            dir.path(),
            Some(TokenEncryptor::from_hex_key(TEST_KEY).unwrap()),
        );

        let session = Session::new();
        session.login(user(), SecretString::from("sealed-token"));
        store.save(&session).unwrap();

        let on_disk = std::fs::read_to_string(store.path()).unwrap();
        assert!(!on_disk.contains("sealed-token"));

        let restored = Session::new();
        assert!(store.restore(&restored).unwrap());
        assert_eq!(
            restored.bearer_token().unwrap().expose_secret(),
            "sealed-token"
        );
    }

    #[test]
    fn encrypted_file_without_key_fails() {
        let dir = TempDir::new().unwrap();
        let sealed = SessionStore::in_dir(
            dir.path(),
            Some(TokenEncryptor::from_hex_key(TEST_KEY).unwrap()),
        );
        let session = Session::new();
        session.login(user(), SecretString::from("t"));
        sealed.save(&session).unwrap();

        let plain = SessionStore::in_dir(dir.path(), None);
        assert!(matches!(
            plain.restore(&Session::new()),
            Err(SessionError::Decrypt(_))
        ));
    }

    #[test]
    fn missing_file_restores_nothing() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::in_dir(dir.path(), None);
        let session = Session::new();
        assert!(!store.restore(&session).unwrap());
        assert!(!session.is_authenticated());
        store.clear().unwrap();
    }

    #[test]
    fn save_requires_login() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::in_dir(dir.path(), None);
        assert!(matches!(
            store.save(&Session::new()),
            Err(SessionError::NotAuthenticated)
        ));
    }

    #[test]
    fn corrupt_file() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::in_dir(dir.path(), None);
        std::fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(
            store.restore(&Session::new()),
            Err(SessionError::Corrupt(_))
        ));
    }
}

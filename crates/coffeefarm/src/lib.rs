pub mod api;
pub mod config;
pub mod error;
pub mod geo;
pub mod media;
pub mod models;
pub mod sanitize;
pub mod screens;
pub mod secrets;
pub mod session;

pub use api::{ApiClient, FarmBackend, QueryCache, Tag, TagId, TagKind};
pub use config::{load_config, load_or_default, ClientConfig};
pub use error::{
    ApiError, CoffeeFarmError, ConfigError, FailureKind, FlowError, ImageError, Result,
    SessionError,
};
pub use media::ImagePayload;
pub use secrets::{resolve_secret, resolve_secret_optional, SecretError, TokenEncryptor};
pub use session::{Session, SessionStore};

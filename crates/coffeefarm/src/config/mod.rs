pub mod loader;
pub mod schema;

pub use loader::{
    default_config_dir, default_config_path, load_config, load_config_from_str, load_or_default,
    API_URL_ENV_VAR,
};
pub use schema::{
    AnalysisConfig, CacheConfig, CheckInConfig, ClientConfig, DefaultsConfig, EnrollmentConfig,
    HttpConfig, DEFAULT_API_URL,
};

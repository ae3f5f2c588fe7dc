use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::schema::ClientConfig;
use crate::error::ConfigError;

/// Environment variable overriding `apiUrl`.
pub const API_URL_ENV_VAR: &str = "COFFEEFARM_API_URL";

const APP_DIR_NAME: &str = "coffeefarm";
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Per-user directory holding the config file and the saved session.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME))
}

pub fn default_config_path() -> Option<PathBuf> {
    default_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ClientConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<ClientConfig, ConfigError> {
    let config: ClientConfig = if content.trim().is_empty() {
        ClientConfig::default()
    } else {
        serde_yaml::from_str(content)?
    };

    validate_config(&config)?;

    Ok(config)
}

/// Loads `path` when given, otherwise the default config file if it
/// exists, otherwise the built-in defaults. The env override is applied
/// last and the result re-validated.
pub fn load_or_default(path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => match default_config_path() {
            Some(default_path) if default_path.exists() => {
                debug!("Loading config from {:?}", default_path);
                load_config(&default_path)?
            }
            _ => ClientConfig::default(),
        },
    };

    if let Ok(url) = std::env::var(API_URL_ENV_VAR) {
        let url = url.trim();
        if !url.is_empty() {
            info!("Using API URL from {}", API_URL_ENV_VAR);
            config.api_url = url.to_string();
        }
    }

    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &ClientConfig) -> Result<(), ConfigError> {
    let url = reqwest::Url::parse(&config.api_url).map_err(|e| ConfigError::Validation {
        message: format!("Invalid apiUrl '{}': {}", config.api_url, e),
    })?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation {
            message: format!("apiUrl must use http or https, got '{}'", url.scheme()),
        });
    }

    if config.http.connect_timeout_secs == 0 || config.http.request_timeout_secs == 0 {
        return Err(ConfigError::Validation {
            message: "HTTP timeouts must be greater than zero".to_string(),
        });
    }

    if config.cache.ttl_secs == 0 {
        return Err(ConfigError::Validation {
            message: "cache.ttlSecs must be greater than zero".to_string(),
        });
    }

    validate_unit_interval("enrollment.minQualityScore", config.enrollment.min_quality_score)?;
    validate_unit_interval(
        "analysis.highConfidenceThreshold",
        config.analysis.high_confidence_threshold,
    )?;

    if !config.check_in.location.is_valid() {
        return Err(ConfigError::Validation {
            message: format!(
                "checkIn.location out of range: {}, {}",
                config.check_in.location.latitude, config.check_in.location.longitude
            ),
        });
    }

    if config.defaults.farm_id.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "defaults.farmId must not be empty".to_string(),
        });
    }

    Ok(())
}

fn validate_unit_interval(name: &str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::Validation {
            message: format!("{} must be between 0 and 1, got {}", name, value),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoPoint;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_file_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.enrollment.min_quality_score, 0.7);
        assert_eq!(config.check_in.location, GeoPoint::new(10.7769, 106.7009));
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let config = load_config_from_str(
            r#"
apiUrl: https://farm.example.com/api/v1
defaults:
  farmId: farm_dalat
checkIn:
  location:
    latitude: 11.94
    longitude: 108.45
"#,
        )
        .unwrap();
        assert_eq!(config.api_url, "https://farm.example.com/api/v1");
        assert_eq!(config.defaults.farm_id, "farm_dalat");
        assert_eq!(config.defaults.field_id, "default_field");
        assert_eq!(config.check_in.location, GeoPoint::new(11.94, 108.45));
        assert_eq!(config.cache.ttl_secs, 60);
    }

    #[test]
    fn rejects_bad_url_scheme() {
        let err = load_config_from_str("apiUrl: ftp://example.com").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn rejects_threshold_out_of_range() {
        let err = load_config_from_str("enrollment:\n  minQualityScore: 1.5").unwrap_err();
        assert!(err.to_string().contains("minQualityScore"));
    }

    #[test]
    fn rejects_invalid_yaml() {
        let err = load_config_from_str("apiUrl: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::ParseYaml(_)));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = load_config("/nonexistent/coffeefarm/config.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    #[serial]
    fn env_override_applies_to_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "apiUrl: http://localhost:5200/api/v1").unwrap();

        std::env::set_var(API_URL_ENV_VAR, "http://10.0.0.5:5200/api/v1");
        let config = load_or_default(Some(file.path())).unwrap();
        std::env::remove_var(API_URL_ENV_VAR);

        assert_eq!(config.api_url, "http://10.0.0.5:5200/api/v1");
    }

    #[test]
    #[serial]
    fn invalid_env_override_is_rejected() {
        let file = NamedTempFile::new().unwrap();
        std::env::set_var(API_URL_ENV_VAR, "not a url");
        let result = load_or_default(Some(file.path()));
        std::env::remove_var(API_URL_ENV_VAR);

        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }
}

//! Optional YAML configuration file.
//!
//! Everything here can also be supplied on the command line; the file
//! exists so a cron-driven deployment doesn't have to repeat flags. CLI
//! flags win over file values, file values win over built-in defaults.
//!
//! ```yaml
//! api_url: https://hirtukor-api.example.com
//! language: hu
//! ```

use serde::Deserialize;
use std::error::Error;
use tracing::info;

use crate::locale::Language;

/// Default API base used when neither the CLI nor a config file names one.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Values readable from the config file. All fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the summary API.
    pub api_url: Option<String>,
    /// Default digest language.
    pub language: Option<Language>,
}

/// Load a config file from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid YAML. An
/// explicitly named config file that fails to load is a hard error rather
/// than a silent fallback.
pub fn load_config(path: &str) -> Result<ClientConfig, Box<dyn Error>> {
    let text = std::fs::read_to_string(path)?;
    let config: ClientConfig = serde_yaml::from_str(&text)?;
    info!(path, "Loaded configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let yaml = "api_url: https://api.example.com\nlanguage: en\n";
        let config: ClientConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.api_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.language, Some(Language::En));
    }

    #[test]
    fn test_parse_empty_config() {
        let config: ClientConfig = serde_yaml::from_str("{}").unwrap();
        assert!(config.api_url.is_none());
        assert!(config.language.is_none());
    }

    #[test]
    fn test_unknown_language_is_an_error() {
        let result: Result<ClientConfig, _> = serde_yaml::from_str("language: de");
        assert!(result.is_err());
    }
}

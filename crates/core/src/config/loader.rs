use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Environment variable prefix; nested keys use a double underscore, e.g.
/// `AGGREGATOR_STORAGE__INPUT_ROOT`.
const ENV_PREFIX: &str = "AGGREGATOR_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from the environment alone, for deployments that carry
/// no config file
pub fn load_config_from_env() -> Result<Config, ConfigError> {
    Figment::new()
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[storage]
input_root = "/data/input"
output_root = "/data/output"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.storage.input_root, PathBuf::from("/data/input"));
        assert_eq!(config.storage.temp_root, None);
    }

    #[test]
    fn test_load_config_from_str_missing_storage() {
        let toml = r#"
[retriever]
timeout_secs = 60
"#;
        let result = load_config_from_str(toml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[storage]
input_root = "/data/input"
output_root = "/data/output"
temp_root = "/data/staging"

[aggregator]
command = "/usr/local/bin/aggregate"
timeout_secs = 120
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.storage.temp_root, Some(PathBuf::from("/data/staging")));
        assert_eq!(config.aggregator.timeout_secs, 120);
        assert_eq!(
            config.aggregator.command,
            PathBuf::from("/usr/local/bin/aggregate")
        );
    }
}

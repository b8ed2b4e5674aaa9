use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Storage section exists (enforced by serde)
/// - Input, output and temp roots are non-empty and pairwise distinct
/// - Collaborator commands are non-empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let storage = &config.storage;

    if storage.input_root.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "storage.input_root must not be empty".to_string(),
        ));
    }
    if storage.output_root.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "storage.output_root must not be empty".to_string(),
        ));
    }

    let temp_root = storage.resolved_temp_root();
    if storage.input_root == storage.output_root
        || storage.input_root == temp_root
        || storage.output_root == temp_root
    {
        return Err(ConfigError::ValidationError(
            "storage roots must be distinct directories".to_string(),
        ));
    }

    if config.retriever.command.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "retriever.command must not be empty".to_string(),
        ));
    }
    if config.aggregator.command.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "aggregator.command must not be empty".to_string(),
        ));
    }

    Ok(())
}

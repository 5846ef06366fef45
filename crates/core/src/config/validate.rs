use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Catalog URL is set and the timeout is not 0
/// - Generator minimum version is not 0 and a success marker is set
/// - Failure log file name is a plain, non-empty file name
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.catalog.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "catalog.url cannot be empty".to_string(),
        ));
    }

    if config.catalog.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "catalog.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.generator.min_version == 0 {
        return Err(ConfigError::ValidationError(
            "generator.min_version cannot be 0".to_string(),
        ));
    }

    if config.generator.success_marker.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "generator.success_marker cannot be empty".to_string(),
        ));
    }

    let log_name = &config.blobs.log_file_name;
    if log_name.is_empty() || log_name.contains('/') || log_name.contains('\\') {
        return Err(ConfigError::ValidationError(format!(
            "blobs.log_file_name must be a plain file name, got {:?}",
            log_name
        )));
    }

    Ok(())
}

// Configuration validation
//
// Validates that required fields are present and values are sensible
// before any construct sees them. Suspicious-but-legal values warn
// instead of failing.

use crate::error::ConfigError;
use crate::EnvironmentConfig;
use tracing::warn;

// Lambda caps execution at 15 minutes
const MAX_LAMBDA_TIMEOUT_SECS: u64 = 900;

pub fn validate_config(env_name: &str, config: &EnvironmentConfig) -> Result<(), ConfigError> {
    if config.prefix.is_empty() {
        return Err(ConfigError::invalid("prefix must not be empty"));
    }

    if config.env.stage.is_empty() {
        return Err(ConfigError::invalid("env.stage must not be empty"));
    }

    if config.env.stage != env_name {
        warn!(
            environment = env_name,
            stage = %config.env.stage,
            "env.stage does not match the environment name"
        );
    }

    let timeout = config.compute.lambda.timeout_secs;
    if timeout == 0 {
        return Err(ConfigError::invalid(
            "compute.lambda.timeout_secs must be greater than 0",
        ));
    }
    if timeout > MAX_LAMBDA_TIMEOUT_SECS {
        return Err(ConfigError::invalid(format!(
            "compute.lambda.timeout_secs must not exceed {MAX_LAMBDA_TIMEOUT_SECS}"
        )));
    }
    if timeout > 300 {
        warn!(
            timeout_secs = timeout,
            "compute.lambda.timeout_secs is very long for an API-facing function"
        );
    }

    if config.persistence.table.name.is_empty() {
        return Err(ConfigError::invalid(
            "persistence.table.name must not be empty",
        ));
    }

    validate_bucket_name(&config.persistence.bucket.name)?;

    Ok(())
}

fn validate_bucket_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::invalid(
            "persistence.bucket.name must not be empty",
        ));
    }
    if name.len() < 3 || name.len() > 63 {
        return Err(ConfigError::invalid(
            "persistence.bucket.name must be 3-63 characters",
        ));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ConfigError::invalid(
            "persistence.bucket.name must contain only lowercase letters, numbers, and hyphens",
        ));
    }
    if name.starts_with('-') || name.ends_with('-') {
        return Err(ConfigError::invalid(
            "persistence.bucket.name cannot start or end with a hyphen",
        ));
    }
    Ok(())
}

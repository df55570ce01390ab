// Environment lookup
//
// Configuration is compiled in: one TOML document per environment.
// There is nothing to read at synthesis time, so the result for a
// given name cannot drift between runs of the same build.

use crate::error::ConfigError;
use crate::validation::validate_config;
use crate::EnvironmentConfig;

/// The closed set of recognized environment names
pub const KNOWN_ENVIRONMENTS: &[&str] = &["dev", "staging", "prod"];

/// Resolve an environment name to its validated configuration.
/// Fails on unknown names; never returns a partially valid value.
pub fn load_config(env_name: &str) -> Result<EnvironmentConfig, ConfigError> {
    let source = match env_name {
        "dev" => include_str!("../environments/dev.toml"),
        "staging" => include_str!("../environments/staging.toml"),
        "prod" => include_str!("../environments/prod.toml"),
        _ => {
            return Err(ConfigError::UnknownEnvironment {
                name: env_name.to_string(),
                known: KNOWN_ENVIRONMENTS.join(", "),
            })
        }
    };

    let config: EnvironmentConfig =
        toml::from_str(source).map_err(|source| ConfigError::Parse {
            environment: env_name.to_string(),
            source,
        })?;
    validate_config(env_name, &config)?;
    Ok(config)
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The environment name is outside the recognized closed set
    #[error("unknown environment '{name}' (known environments: {known})")]
    UnknownEnvironment { name: String, known: String },

    #[error("failed to parse configuration for '{environment}'")]
    Parse {
        environment: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            message: message.into(),
        }
    }
}

use symphony_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConstructError {
    /// A construct was handed inputs it cannot build from
    #[error("{construct}: {message}")]
    InvalidProps { construct: String, message: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ConstructError {
    pub(crate) fn invalid_props(construct: &str, message: impl Into<String>) -> Self {
        ConstructError::InvalidProps {
            construct: construct.to_string(),
            message: message.into(),
        }
    }
}

use providers::ProviderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemeError {
    #[error("profile is missing required field `{0}`")]
    MissingProfileField(&'static str),
    #[error("invalid profile: {0}")]
    InvalidProfile(String),
    #[error("environment variable `{0}` is not set")]
    MissingCredential(String),
    #[error("question must not be empty")]
    EmptyQuestion,
    #[error("embedding provider returned no vector for the query")]
    EmptyEmbedding,
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

impl SchemeError {
    /// Caller mistakes, as opposed to collaborator failures.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            SchemeError::MissingProfileField(_)
                | SchemeError::InvalidProfile(_)
                | SchemeError::EmptyQuestion
        )
    }
}

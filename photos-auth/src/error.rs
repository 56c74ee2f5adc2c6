use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Token client is not initialized")]
    NotInitialized,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Sign-in denied: {0}")]
    Denied(String),

    #[error("Token provider dropped the sign-in callback")]
    CallbackDropped,

    #[error("Sign-in timed out after {0:?}")]
    Timeout(Duration),
}

/// Failure reported by a [`TokenProvider`](crate::TokenProvider).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Access denied: {0}")]
    Denied(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<std::io::Error> for ProviderError {
    fn from(err: std::io::Error) -> Self {
        ProviderError::Transport(err.to_string())
    }
}

impl From<ProviderError> for AuthError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Unavailable(msg) => AuthError::Configuration(msg),
            ProviderError::Denied(msg) | ProviderError::Transport(msg) => AuthError::Denied(msg),
        }
    }
}

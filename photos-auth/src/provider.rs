use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::oneshot;

use crate::error::ProviderError;

/// Client registration handed to the provider once per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub client_id: String,
    pub scopes: Vec<String>,
}

/// Whether the provider may skip its consent screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Prompt {
    #[default]
    Auto,
    Consent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenRequest {
    pub prompt: Prompt,
}

/// Access token as delivered by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: String,
    pub expires_in: Option<Duration>,
    pub scopes: Vec<String>,
}

impl TokenGrant {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_in: None,
            scopes: Vec::new(),
        }
    }
}

/// One-shot reply slot for a token request.
///
/// The provider must call either [`resolve`](Self::resolve) or
/// [`reject`](Self::reject). Dropping the callback without replying rejects
/// the pending sign-in.
#[derive(Debug)]
pub struct TokenCallback {
    reply: oneshot::Sender<Result<TokenGrant, ProviderError>>,
}

impl TokenCallback {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<Result<TokenGrant, ProviderError>>) {
        let (reply, rx) = oneshot::channel();
        (Self { reply }, rx)
    }

    pub fn resolve(self, grant: TokenGrant) {
        self.send(Ok(grant));
    }

    pub fn reject(self, error: ProviderError) {
        self.send(Err(error));
    }

    /// Completes once the requester has stopped waiting for the reply.
    pub async fn closed(&mut self) {
        self.reply.closed().await
    }

    pub fn send(self, result: Result<TokenGrant, ProviderError>) {
        if self.reply.send(result).is_err() {
            tracing::debug!("Sign-in was abandoned before the provider replied");
        }
    }
}

/// Capabilities of the identity provider's token client.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Registers the token client. Called at most once successfully.
    fn initialize(&self, config: &ProviderConfig) -> Result<(), ProviderError>;

    /// Starts an asynchronous token request; the outcome is delivered
    /// through `callback`.
    fn request_token(&self, request: TokenRequest, callback: TokenCallback);

    /// Revokes a previously issued access token.
    async fn revoke(&self, access_token: &str) -> Result<(), ProviderError>;
}

use chrono::{DateTime, Duration, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use crate::error::AuthError;
use crate::provider::{Prompt, ProviderConfig, TokenCallback, TokenProvider, TokenRequest};
use crate::token::{Token, TokenStore, DEFAULT_TOKEN_TTL};

const DEFAULT_SIGN_IN_TIMEOUT_SECS: u64 = 300;

type PendingSignIn = Shared<BoxFuture<'static, Result<Token, AuthError>>>;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub client_id: String,
    pub scopes: Vec<String>,
    pub token_ttl: Duration,
    pub sign_in_timeout: std::time::Duration,
}

impl GatewayConfig {
    pub fn new(client_id: impl Into<String>, scopes: Vec<String>) -> Self {
        Self {
            client_id: client_id.into(),
            scopes,
            token_ttl: DEFAULT_TOKEN_TTL,
            sign_in_timeout: std::time::Duration::from_secs(DEFAULT_SIGN_IN_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignInOptions {
    pub force_consent: bool,
}

impl SignInOptions {
    pub fn consent() -> Self {
        Self { force_consent: true }
    }

    fn prompt(self) -> Prompt {
        if self.force_consent {
            Prompt::Consent
        } else {
            Prompt::Auto
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Uninitialized,
    Initialized,
    Authenticated { valid_until: DateTime<Utc> },
    Expired,
}

/// Single choke point for access tokens.
///
/// Owns the [`TokenStore`] and the provider handle. Sign-in requests are
/// funnelled through one pending slot: callers arriving while a request is
/// in flight wait on the same outcome instead of starting another one.
pub struct AuthGateway {
    provider: Arc<dyn TokenProvider>,
    config: GatewayConfig,
    store: Arc<RwLock<TokenStore>>,
    initialized: AtomicBool,
    pending: Arc<Mutex<Option<PendingSignIn>>>,
}

impl AuthGateway {
    pub fn new(provider: Arc<dyn TokenProvider>, config: GatewayConfig) -> Self {
        Self {
            provider,
            config,
            store: Arc::new(RwLock::new(TokenStore::new())),
            initialized: AtomicBool::new(false),
            pending: Arc::new(Mutex::new(None)),
        }
    }

    /// Registers the token client with the provider.
    ///
    /// Idempotent. Returns `false` (after logging) when the provider is not
    /// available, leaving the gateway uninitialized so callers can keep
    /// running on demo data.
    pub fn initialize(&self) -> bool {
        if self.initialized.load(Ordering::Acquire) {
            return true;
        }

        let provider_config = ProviderConfig {
            client_id: self.config.client_id.clone(),
            scopes: self.config.scopes.clone(),
        };
        match self.provider.initialize(&provider_config) {
            Ok(()) => {
                self.initialized.store(true, Ordering::Release);
                tracing::info!(
                    scopes = self.config.scopes.len(),
                    "Token client initialized"
                );
                true
            }
            Err(e) => {
                tracing::warn!("Token provider unavailable, staying in demo mode: {}", e);
                false
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    pub fn state(&self) -> AuthState {
        if !self.is_initialized() {
            return AuthState::Uninitialized;
        }
        let store = read_store(&self.store);
        match store.get() {
            None => AuthState::Initialized,
            Some(token) if token.is_valid_at(Utc::now()) => AuthState::Authenticated {
                valid_until: token.expires_at(),
            },
            Some(_) => AuthState::Expired,
        }
    }

    /// The current token if it is still usable.
    pub fn current_token(&self) -> Option<Token> {
        read_store(&self.store).valid_token_at(Utc::now())
    }

    /// Requests a new access token from the provider.
    ///
    /// Resolves only once a token is stored; provider failures, a dropped
    /// callback or the sign-in timeout reject instead.
    pub async fn sign_in(&self, options: SignInOptions) -> Result<Token, AuthError> {
        if !self.is_initialized() {
            return Err(AuthError::NotInitialized);
        }

        let pending = {
            let mut slot = self.pending.lock().unwrap_or_else(|e| e.into_inner());
            match slot.as_ref() {
                Some(pending) => {
                    tracing::debug!("Joining sign-in already in flight");
                    pending.clone()
                }
                None => {
                    // Runs to completion even if every caller gives up, so the
                    // slot is always freed by the outcome
                    let task = tokio::spawn(self.start_sign_in(options));
                    let pending = async move {
                        task.await.unwrap_or_else(|e| {
                            Err(AuthError::Denied(format!("sign-in task failed: {}", e)))
                        })
                    }
                    .boxed()
                    .shared();
                    *slot = Some(pending.clone());
                    pending
                }
            }
        };

        pending.await
    }

    fn start_sign_in(
        &self,
        options: SignInOptions,
    ) -> impl std::future::Future<Output = Result<Token, AuthError>> + Send + 'static {
        let provider = self.provider.clone();
        let store = self.store.clone();
        let slot = self.pending.clone();
        let ttl = self.config.token_ttl;
        let timeout = self.config.sign_in_timeout;

        async move {
            tracing::info!(force_consent = options.force_consent, "Requesting access token");
            let result = request_token(provider, store, options.prompt(), ttl, timeout).await;

            match &result {
                Ok(token) => tracing::info!(expires_at = %token.expires_at(), "Access token received"),
                Err(e) => tracing::warn!("Sign-in failed: {}", e),
            }

            // Free the slot so the next caller starts a fresh request
            *slot.lock().unwrap_or_else(|e| e.into_inner()) = None;
            result
        }
    }

    /// Best-effort revoke with the provider, then forget the token locally.
    pub async fn sign_out(&self) {
        let token = write_store(&self.store).take();

        if let Some(token) = token {
            if let Err(e) = self.provider.revoke(token.secret()).await {
                tracing::warn!("Token revocation failed (ignored): {}", e);
            } else {
                tracing::info!("Access token revoked");
            }
        }
    }

    /// Returns the stored token when still valid, otherwise signs in again
    /// with a forced consent prompt.
    pub async fn ensure_token(&self, force_fresh: bool) -> Result<Token, AuthError> {
        if !force_fresh {
            if let Some(token) = self.current_token() {
                return Ok(token);
            }
        }

        self.sign_in(SignInOptions::consent()).await
    }
}

async fn request_token(
    provider: Arc<dyn TokenProvider>,
    store: Arc<RwLock<TokenStore>>,
    prompt: Prompt,
    ttl: Duration,
    timeout: std::time::Duration,
) -> Result<Token, AuthError> {
    let (callback, reply) = TokenCallback::channel();
    provider.request_token(TokenRequest { prompt }, callback);

    let grant = tokio::time::timeout(timeout, reply)
        .await
        .map_err(|_| AuthError::Timeout(timeout))?
        .map_err(|_| AuthError::CallbackDropped)??;

    if grant.access_token.is_empty() {
        return Err(AuthError::Denied("provider returned an empty access token".into()));
    }

    // Never trust a token longer than the provider says it lives
    let lifetime = grant
        .expires_in
        .and_then(|d| Duration::from_std(d).ok())
        .map_or(ttl, |reported| reported.min(ttl));

    let token = write_store(&store).set(grant.access_token, lifetime);
    Ok(token)
}

fn read_store(store: &RwLock<TokenStore>) -> std::sync::RwLockReadGuard<'_, TokenStore> {
    store.read().unwrap_or_else(|e| e.into_inner())
}

fn write_store(store: &RwLock<TokenStore>) -> std::sync::RwLockWriteGuard<'_, TokenStore> {
    store.write().unwrap_or_else(|e| e.into_inner())
}

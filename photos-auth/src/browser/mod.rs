mod loopback;
mod models;

use async_trait::async_trait;
use oauth2::{
    basic::BasicClient, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, HttpRequest,
    HttpResponse, PkceCodeChallenge, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::net::TcpListener;

use crate::error::ProviderError;
use crate::provider::{Prompt, ProviderConfig, TokenCallback, TokenGrant, TokenProvider, TokenRequest};
pub use models::TokenInfo;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_REVOKE_URL: &str = "https://oauth2.googleapis.com/revoke";
const GOOGLE_TOKEN_INFO_URL: &str = "https://www.googleapis.com/oauth2/v3/tokeninfo";

// Simple async HTTP client for OAuth2
async fn http_client(request: HttpRequest) -> Result<HttpResponse, reqwest::Error> {
    let client = reqwest::Client::new();
    let mut builder = client
        .request(request.method().clone(), request.uri().to_string())
        .body(request.body().clone());

    for (name, value) in request.headers() {
        builder = builder.header(name.as_str(), value.as_bytes());
    }

    let response = builder.send().await?;
    let status = response.status();
    let body = response.bytes().await?.to_vec();

    let mut http_response = HttpResponse::new(body);
    *http_response.status_mut() = status;

    Ok(http_response)
}

#[derive(Debug, Clone)]
pub struct BrowserProviderSettings {
    pub auth_url: String,
    pub token_url: String,
    pub revoke_url: String,
    pub token_info_url: String,
    /// Desktop OAuth clients ship a non-confidential secret; optional.
    pub client_secret: Option<String>,
    /// Loopback port for the redirect; 0 picks a free one.
    pub redirect_port: u16,
    /// When false the consent URL is only printed.
    pub open_browser: bool,
}

impl Default for BrowserProviderSettings {
    fn default() -> Self {
        Self {
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            revoke_url: GOOGLE_REVOKE_URL.to_string(),
            token_info_url: GOOGLE_TOKEN_INFO_URL.to_string(),
            client_secret: None,
            redirect_port: 0,
            open_browser: true,
        }
    }
}

/// Token provider that runs the consent flow in the system browser and
/// catches the redirect on a loopback listener.
pub struct BrowserTokenProvider {
    settings: Arc<BrowserProviderSettings>,
    config: OnceLock<ProviderConfig>,
    http_client: reqwest::Client,
}

impl BrowserTokenProvider {
    pub fn new(settings: BrowserProviderSettings) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            settings: Arc::new(settings),
            config: OnceLock::new(),
            http_client,
        }
    }
}

#[async_trait]
impl TokenProvider for BrowserTokenProvider {
    fn initialize(&self, config: &ProviderConfig) -> Result<(), ProviderError> {
        if config.client_id.trim().is_empty() {
            return Err(ProviderError::Unavailable("client_id is not configured".into()));
        }
        for url in [&self.settings.auth_url, &self.settings.token_url] {
            url::Url::parse(url)
                .map_err(|e| ProviderError::Unavailable(format!("Invalid URL {}: {}", url, e)))?;
        }
        // A second initialize keeps the first registration
        let _ = self.config.set(config.clone());
        Ok(())
    }

    fn request_token(&self, request: TokenRequest, callback: TokenCallback) {
        let Some(config) = self.config.get().cloned() else {
            callback.reject(ProviderError::Unavailable("token client not initialized".into()));
            return;
        };
        let settings = self.settings.clone();
        let http = self.http_client.clone();

        tokio::spawn(async move {
            let mut callback = callback;
            // Dropping `authorize` releases the loopback port
            let result = tokio::select! {
                result = authorize(&settings, &config, request.prompt) => Some(result),
                _ = callback.closed() => None,
            };

            let Some(result) = result else {
                tracing::info!("Sign-in abandoned, closing redirect listener");
                return;
            };
            if let Ok(grant) = &result {
                log_token_scopes(&http, &settings.token_info_url, &grant.access_token).await;
            }
            callback.send(result);
        });
    }

    async fn revoke(&self, access_token: &str) -> Result<(), ProviderError> {
        self.http_client
            .post(&self.settings.revoke_url)
            .query(&[("token", access_token)])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        Ok(())
    }
}

async fn authorize(
    settings: &BrowserProviderSettings,
    config: &ProviderConfig,
    prompt: Prompt,
) -> Result<TokenGrant, ProviderError> {
    let listener = TcpListener::bind(("127.0.0.1", settings.redirect_port)).await?;
    let redirect_uri = format!("http://127.0.0.1:{}", listener.local_addr()?.port());

    let invalid = |e: url::ParseError| ProviderError::Unavailable(e.to_string());
    let mut client = BasicClient::new(ClientId::new(config.client_id.clone()))
        .set_auth_uri(AuthUrl::new(settings.auth_url.clone()).map_err(invalid)?)
        .set_token_uri(TokenUrl::new(settings.token_url.clone()).map_err(invalid)?)
        .set_redirect_uri(RedirectUrl::new(redirect_uri).map_err(invalid)?);
    if let Some(secret) = &settings.client_secret {
        client = client.set_client_secret(ClientSecret::new(secret.clone()));
    }

    let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();
    let mut auth_request = client
        .authorize_url(CsrfToken::new_random)
        .set_pkce_challenge(pkce_challenge)
        .add_scopes(config.scopes.iter().cloned().map(Scope::new));
    if prompt == Prompt::Consent {
        auth_request = auth_request.add_extra_param("prompt", "consent");
    }
    let (auth_url, csrf_token) = auth_request.url();

    if !settings.open_browser {
        eprintln!("\nPlease open this URL in your browser:\n{}\n", auth_url);
    } else if let Err(e) = open::that(auth_url.as_str()) {
        tracing::warn!("Failed to open browser automatically: {}", e);
        eprintln!("\nPlease open this URL in your browser:\n{}\n", auth_url);
    } else {
        tracing::info!("Browser opened for sign-in");
    }

    let params = loopback::receive_redirect(listener).await?;
    if let Some(error) = params.error {
        return Err(ProviderError::Denied(error));
    }
    if params.state.as_deref() != Some(csrf_token.secret().as_str()) {
        return Err(ProviderError::Denied("state mismatch in redirect".into()));
    }
    let code = params
        .code
        .ok_or_else(|| ProviderError::Denied("redirect carried no code".into()))?;

    let token_result = client
        .exchange_code(AuthorizationCode::new(code))
        .set_pkce_verifier(pkce_verifier)
        .request_async(&http_client)
        .await
        .map_err(|e| ProviderError::Denied(format!("Token request failed: {}", e)))?;

    Ok(TokenGrant {
        access_token: token_result.access_token().secret().to_string(),
        expires_in: token_result.expires_in(),
        scopes: token_result
            .scopes()
            .map(|scopes| scopes.iter().map(|s| s.as_str().to_string()).collect())
            .unwrap_or_default(),
    })
}

/// Diagnostic only: shows which scopes the provider actually granted.
async fn log_token_scopes(http: &reqwest::Client, token_info_url: &str, access_token: &str) {
    match fetch_token_info(http, token_info_url, access_token).await {
        Ok(info) => tracing::debug!(scopes = %info.scope, "Granted token scopes"),
        Err(e) => tracing::debug!("Could not read token info: {}", e),
    }
}

async fn fetch_token_info(
    http: &reqwest::Client,
    token_info_url: &str,
    access_token: &str,
) -> Result<TokenInfo, reqwest::Error> {
    http.get(token_info_url)
        .query(&[("access_token", access_token)])
        .send()
        .await?
        .error_for_status()?
        .json::<TokenInfo>()
        .await
}

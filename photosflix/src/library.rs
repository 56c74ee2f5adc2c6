use photos_api::{Album, AlbumSource, DemoSource, MediaItem, PhotoApiClient, PhotosApiError};
use photos_auth::browser::BrowserTokenProvider;
use photos_auth::{AuthError, AuthGateway, AuthState, SignInOptions, Token};
use std::collections::HashMap;
use std::sync::Arc;

use crate::settings::Settings;

/// What the browse and player screens read from.
///
/// Serves live data while a session exists (signed in, even if the token
/// has since expired and will be renewed) and the demo catalog otherwise.
/// Album items are cached once fetched.
pub struct Library {
    demo: DemoSource,
    live: Option<PhotoApiClient>,
    items: HashMap<String, Vec<MediaItem>>,
}

impl Library {
    pub fn demo() -> Self {
        Self {
            demo: DemoSource::new(),
            live: None,
            items: HashMap::new(),
        }
    }

    pub fn with_client(client: PhotoApiClient) -> Self {
        Self {
            live: Some(client),
            ..Self::demo()
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        if !settings.use_live_api {
            tracing::info!("Live API disabled, using demo catalog");
            return Self::demo();
        }

        let provider = BrowserTokenProvider::new(settings.provider_settings());
        let gateway = AuthGateway::new(Arc::new(provider), settings.gateway_config());
        gateway.initialize();

        Self::with_client(PhotoApiClient::new(
            Arc::new(gateway),
            settings.client_config(),
        ))
    }

    pub fn has_live_api(&self) -> bool {
        self.live.is_some()
    }

    /// True when reads currently go to the live API.
    pub fn is_live(&self) -> bool {
        self.live_source().is_some()
    }

    pub async fn sign_in(&mut self, options: SignInOptions) -> Result<Token, PhotosApiError> {
        let client = self.live.as_ref().ok_or_else(|| {
            PhotosApiError::Configuration("Live API disabled".into())
        })?;
        let gateway = client.gateway();
        if !gateway.initialize() {
            return Err(AuthError::NotInitialized.into());
        }

        let token = gateway.sign_in(options).await?;
        self.items.clear();
        Ok(token)
    }

    pub async fn sign_out(&mut self) {
        if let Some(client) = &self.live {
            client.gateway().sign_out().await;
        }
        self.items.clear();
        tracing::info!("Signed out, back to demo catalog");
    }

    pub async fn albums(&self) -> Result<Vec<Album>, PhotosApiError> {
        self.source().albums().await
    }

    pub async fn album_items(&mut self, album_id: &str) -> Result<&[MediaItem], PhotosApiError> {
        if !self.items.contains_key(album_id) {
            let items = self.source().album_items(album_id).await?;
            self.items.insert(album_id.to_string(), items);
        } else {
            tracing::debug!("Album {} served from cache", album_id);
        }
        Ok(self.items.get(album_id).map(Vec::as_slice).unwrap_or_default())
    }

    fn source(&self) -> &dyn AlbumSource {
        match self.live_source() {
            Some(client) => client as &dyn AlbumSource,
            None => &self.demo,
        }
    }

    fn live_source(&self) -> Option<&PhotoApiClient> {
        self.live.as_ref().filter(|client| {
            matches!(
                client.gateway().state(),
                AuthState::Authenticated { .. } | AuthState::Expired
            )
        })
    }
}

use crate::Request;
use crate::endpoints::Page;
use crate::endpoints::albums::DEFAULT_ALBUM_PAGE_SIZE;
use crate::endpoints::media_items::DEFAULT_ITEM_PAGE_SIZE;
use crate::error::PhotosApiError;
use crate::model::{Album, MediaItem};
use photos_auth::{AuthGateway, Token};
use std::sync::{Arc, Mutex};
use tower_api_client::{Client as ApiClient, Request as ApiRequest};

pub const BASE_URL: &str = "https://photoslibrary.googleapis.com/v1";

/// Ceiling on followed continuation tokens, in case the provider never
/// stops returning one.
pub const DEFAULT_MAX_PAGES: usize = 1000;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// When false only demo data is available and every call fails fast.
    pub live: bool,
    pub album_page_size: u32,
    pub item_page_size: u32,
    pub max_pages: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            live: true,
            album_page_size: DEFAULT_ALBUM_PAGE_SIZE,
            item_page_size: DEFAULT_ITEM_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

/// Token-gated client for the photo library REST API.
///
/// Every request first goes through [`AuthGateway::ensure_token`], so a
/// request is never sent without a currently valid token.
pub struct PhotoApiClient {
    gateway: Arc<AuthGateway>,
    config: ClientConfig,
    // Transport bound to the last token seen
    inner: Mutex<Option<(Token, Arc<ApiClient>)>>,
}

impl PhotoApiClient {
    pub fn new(gateway: Arc<AuthGateway>, config: ClientConfig) -> Self {
        Self {
            gateway,
            config,
            inner: Mutex::new(None),
        }
    }

    pub fn gateway(&self) -> &Arc<AuthGateway> {
        &self.gateway
    }

    pub fn is_live(&self) -> bool {
        self.config.live
    }

    /// Fetches every album, following continuation tokens to the end.
    pub async fn list_albums(&self) -> Result<Vec<Album>, PhotosApiError> {
        self.require_live()?;
        let page_size = self.config.album_page_size;

        let albums = self
            .collect_pages(|page_token| {
                let request = Request::albums().list().page_size(page_size);
                match page_token {
                    Some(token) => request.page_token(token),
                    None => request,
                }
            })
            .await?;

        tracing::info!("Loaded {} albums from the photo library", albums.len());
        Ok(albums)
    }

    /// Fetches every media item of `album_id`.
    pub async fn list_album_items(&self, album_id: &str) -> Result<Vec<MediaItem>, PhotosApiError> {
        self.require_live()?;
        let page_size = self.config.item_page_size;

        let items = self
            .collect_pages(|page_token| {
                let request = Request::media_items()
                    .search(album_id)
                    .page_size(page_size);
                match page_token {
                    Some(token) => request.page_token(token),
                    None => request,
                }
            })
            .await?;

        tracing::info!("Loaded {} items for album {}", items.len(), album_id);
        Ok(items
            .into_iter()
            .map(|item| item.into_media_item(album_id))
            .collect())
    }

    pub async fn send<R>(&self, request: R) -> Result<R::Response, PhotosApiError>
    where
        R: ApiRequest,
    {
        let token = self.gateway.ensure_token(false).await?;
        let api = self.api_client(&token);
        api.send(request).await.map_err(From::from)
    }

    fn require_live(&self) -> Result<(), PhotosApiError> {
        if self.config.live {
            Ok(())
        } else {
            Err(PhotosApiError::Configuration("Live API disabled".into()))
        }
    }

    fn api_client(&self, token: &Token) -> Arc<ApiClient> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some((cached, api)) = inner.as_ref() {
            if cached.secret() == token.secret() {
                return api.clone();
            }
        }

        let api = Arc::new(ApiClient::new(self.config.base_url.as_str()).bearer_auth(token.secret()));
        *inner = Some((token.clone(), api.clone()));
        api
    }

    async fn collect_pages<R, F>(
        &self,
        mut build: F,
    ) -> Result<Vec<<R::Response as Page>::Item>, PhotosApiError>
    where
        R: ApiRequest,
        R::Response: Page,
        F: FnMut(Option<String>) -> R,
    {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0;

        loop {
            if pages >= self.config.max_pages {
                tracing::error!(pages, "Continuation tokens never ran out, stopping");
                return Err(PhotosApiError::PageLimit { pages });
            }

            let response = self.send(build(page_token.take())).await?;
            pages += 1;

            let (page, next) = response.into_page();
            items.extend(page);

            match next.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::debug!(pages, items = items.len(), "Collected paginated results");
        Ok(items)
    }
}

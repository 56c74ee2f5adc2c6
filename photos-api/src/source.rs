use crate::client::PhotoApiClient;
use crate::demo::{self, DemoSource};
use crate::error::PhotosApiError;
use crate::model::{Album, MediaItem};
use async_trait::async_trait;

/// Where albums and their items come from: the live API or the demo catalog.
#[async_trait]
pub trait AlbumSource: Send + Sync {
    async fn albums(&self) -> Result<Vec<Album>, PhotosApiError>;

    async fn album_items(&self, album_id: &str) -> Result<Vec<MediaItem>, PhotosApiError>;

    fn is_live(&self) -> bool;
}

#[async_trait]
impl AlbumSource for PhotoApiClient {
    async fn albums(&self) -> Result<Vec<Album>, PhotosApiError> {
        self.list_albums().await
    }

    async fn album_items(&self, album_id: &str) -> Result<Vec<MediaItem>, PhotosApiError> {
        self.list_album_items(album_id).await
    }

    fn is_live(&self) -> bool {
        PhotoApiClient::is_live(self)
    }
}

#[async_trait]
impl AlbumSource for DemoSource {
    async fn albums(&self) -> Result<Vec<Album>, PhotosApiError> {
        Ok(demo::demo_albums())
    }

    async fn album_items(&self, album_id: &str) -> Result<Vec<MediaItem>, PhotosApiError> {
        Ok(demo::demo_album_items(album_id))
    }

    fn is_live(&self) -> bool {
        false
    }
}

mod client;
pub mod demo;
pub mod endpoints;
mod error;
mod macros;
mod model;
pub mod rendition;
pub mod repositories;
mod source;

pub use crate::client::{ClientConfig, PhotoApiClient, BASE_URL, DEFAULT_MAX_PAGES};
pub use crate::demo::DemoSource;
pub use crate::error::{ErrorDetail, ErrorResponse, PhotosApiError};
pub use crate::model::{Album, MediaItem};
pub use crate::rendition::Rendition;
pub use crate::source::AlbumSource;
pub use tower_api_client::StatusCode;
use repositories::*;

/// Entry point for building provider requests.
pub struct Request;

impl Request {
    pub fn albums() -> AlbumRepository {
        AlbumRepository::new()
    }

    pub fn media_items() -> MediaItemRepository {
        MediaItemRepository::new()
    }
}

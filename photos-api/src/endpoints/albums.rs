use super::{Page, lenient_u64};
use crate::macros::setter;
use crate::model::Album;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tower_api_client::{Request, RequestData};

pub const DEFAULT_ALBUM_PAGE_SIZE: u32 = 50;

// Common

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderAlbum {
    pub id: String,
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub media_items_count: Option<u64>,
    pub cover_photo_base_url: Option<String>,
}

impl From<ProviderAlbum> for Album {
    fn from(album: ProviderAlbum) -> Self {
        Album {
            id: album.id,
            title: album
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Album".to_string()),
            item_count: album.media_items_count.unwrap_or(0),
            cover_url: album.cover_photo_base_url.unwrap_or_default(),
        }
    }
}

// Requests

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAlbums {
    page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_token: Option<String>,
}

impl Default for ListAlbums {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_ALBUM_PAGE_SIZE,
            page_token: None,
        }
    }
}

impl ListAlbums {
    pub fn new() -> Self {
        Self::default()
    }

    setter!(page_size: u32);
    setter!(opt page_token: String);
}

impl Request for ListAlbums {
    type Data = Self;
    type Response = AlbumsResponse;

    fn endpoint(&self) -> Cow<'_, str> {
        "/albums".into()
    }

    fn data(&self) -> RequestData<&Self> {
        RequestData::Query(self)
    }
}

// Responses

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumsResponse {
    #[serde(default)]
    pub albums: Vec<ProviderAlbum>,
    pub next_page_token: Option<String>,
}

impl Page for AlbumsResponse {
    type Item = Album;

    fn into_page(self) -> (Vec<Album>, Option<String>) {
        (
            self.albums.into_iter().map(Album::from).collect(),
            self.next_page_token,
        )
    }
}

use super::{Page, lenient_u64};
use crate::macros::setter;
use crate::model::MediaItem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tower_api_client::{Method, Request, RequestData};

pub const DEFAULT_ITEM_PAGE_SIZE: u32 = 100;
const DEFAULT_MIME_TYPE: &str = "image/jpeg";

// Common

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderMediaItem {
    pub id: String,
    #[serde(default)]
    pub base_url: String,
    pub mime_type: Option<String>,
    #[serde(default)]
    pub media_metadata: MediaMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaMetadata {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub width: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub height: Option<u64>,
    pub creation_time: Option<String>,
}

impl ProviderMediaItem {
    pub fn into_media_item(self, album_id: &str) -> MediaItem {
        let meta = self.media_metadata;
        MediaItem {
            id: self.id,
            album_id: album_id.to_string(),
            base_url: self.base_url,
            mime_type: self
                .mime_type
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
            width: dimension(meta.width),
            height: dimension(meta.height),
            creation_time: meta
                .creation_time
                .as_deref()
                .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
                .map(|t| t.with_timezone(&Utc)),
        }
    }
}

fn dimension(value: Option<u64>) -> u32 {
    value
        .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
        .unwrap_or(0)
}

// Requests

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMediaItems {
    album_id: String,
    page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_token: Option<String>,
}

impl SearchMediaItems {
    pub fn new(album_id: impl Into<String>) -> Self {
        Self {
            album_id: album_id.into(),
            page_size: DEFAULT_ITEM_PAGE_SIZE,
            page_token: None,
        }
    }

    pub fn album_id(&self) -> &str {
        &self.album_id
    }

    setter!(page_size: u32);
    setter!(opt page_token: String);
}

impl Request for SearchMediaItems {
    type Data = Self;
    type Response = MediaItemsResponse;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/mediaItems:search".into()
    }

    fn data(&self) -> RequestData<&Self> {
        RequestData::Json(self)
    }
}

// Responses

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItemsResponse {
    #[serde(default)]
    pub media_items: Vec<ProviderMediaItem>,
    pub next_page_token: Option<String>,
}

impl Page for MediaItemsResponse {
    type Item = ProviderMediaItem;

    fn into_page(self) -> (Vec<ProviderMediaItem>, Option<String>) {
        (self.media_items, self.next_page_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_media_item_normalization() {
        let json = r#"{
            "id": "m1",
            "baseUrl": "https://lh3.example/m1",
            "mimeType": "image/png",
            "mediaMetadata": {
                "width": "4032",
                "height": "3024",
                "creationTime": "2024-07-14T10:30:00Z"
            }
        }"#;
        let item = serde_json::from_str::<ProviderMediaItem>(json)
            .unwrap()
            .into_media_item("album-1");

        assert_eq!(item.id, "m1");
        assert_eq!(item.album_id, "album-1");
        assert_eq!(item.mime_type, "image/png");
        assert_eq!((item.width, item.height), (4032, 3024));
        assert_eq!(
            item.creation_time,
            Some(Utc.with_ymd_and_hms(2024, 7, 14, 10, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_media_item_defaults() {
        let item = serde_json::from_str::<ProviderMediaItem>(r#"{"id": "m2", "baseUrl": "u"}"#)
            .unwrap()
            .into_media_item("a");

        assert_eq!(item.mime_type, "image/jpeg");
        assert_eq!((item.width, item.height), (0, 0));
        assert_eq!(item.creation_time, None);
    }

    #[test]
    fn test_unparseable_creation_time_is_dropped() {
        let json = r#"{"id": "m3", "mediaMetadata": {"creationTime": "yesterday"}}"#;
        let item = serde_json::from_str::<ProviderMediaItem>(json)
            .unwrap()
            .into_media_item("a");
        assert_eq!(item.creation_time, None);
    }

    #[test]
    fn test_search_body() {
        let request = SearchMediaItems::new("album-1").page_token("p2");
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"albumId": "album-1", "pageSize": 100, "pageToken": "p2"})
        );
    }
}

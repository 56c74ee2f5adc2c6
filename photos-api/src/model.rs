use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub title: String,
    pub item_count: u64,
    pub cover_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    pub album_id: String,
    pub base_url: String,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
    pub creation_time: Option<DateTime<Utc>>,
}

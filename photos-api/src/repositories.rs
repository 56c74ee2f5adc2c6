use crate::endpoints::{albums::ListAlbums, media_items::SearchMediaItems};

pub struct AlbumRepository;

impl AlbumRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn list(&self) -> ListAlbums {
        ListAlbums::default()
    }
}

pub struct MediaItemRepository;

impl MediaItemRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn search(&self, album_id: impl Into<String>) -> SearchMediaItems {
        SearchMediaItems::new(album_id)
    }
}

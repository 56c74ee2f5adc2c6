//! Credential-free catalog used when the live API is off or nobody is
//! signed in. Everything here is deterministic.

use crate::model::{Album, MediaItem};

/// Item count assumed for album ids missing from the catalog.
pub const FALLBACK_ITEM_COUNT: u64 = 60;

const ITEM_SEED_BASE: u64 = 2000;
const ITEM_WIDTH: u32 = 1600;
const ITEM_HEIGHT: u32 = 900;
const ITEM_MIME_TYPE: &str = "image/jpeg";

fn seed_url(seed: u64) -> String {
    seed_url_sized(seed, 1200, 675)
}

fn seed_url_sized(seed: u64, width: u32, height: u32) -> String {
    format!("https://picsum.photos/seed/{}/{}/{}", seed, width, height)
}

fn album(id: &str, title: &str, item_count: u64, cover_seed: u64) -> Album {
    Album {
        id: id.to_string(),
        title: title.to_string(),
        item_count,
        cover_url: seed_url(cover_seed),
    }
}

pub fn demo_albums() -> Vec<Album> {
    vec![
        album("leonie", "Léonie is born", 300, 1025),
        album("vac2024", "Summer holidays 2024", 180, 1003),
        album("we", "Family weekends", 120, 1033),
        album("famille", "Family moments", 240, 1012),
        album("sport", "Sports and outings", 90, 1044),
        album("misc", "Assorted memories", 60, 1051),
    ]
}

/// Synthesizes the items of `album_id`. Unknown ids get
/// [`FALLBACK_ITEM_COUNT`] items rather than an error.
pub fn demo_album_items(album_id: &str) -> Vec<MediaItem> {
    let count = demo_albums()
        .into_iter()
        .find(|a| a.id == album_id)
        .map_or(FALLBACK_ITEM_COUNT, |a| a.item_count);
    let offset = ITEM_SEED_BASE + album_id.chars().count() as u64;

    (0..count)
        .map(|i| MediaItem {
            id: format!("{}_{}", album_id, i),
            album_id: album_id.to_string(),
            base_url: seed_url(offset + i),
            mime_type: ITEM_MIME_TYPE.to_string(),
            width: ITEM_WIDTH,
            height: ITEM_HEIGHT,
            creation_time: None,
        })
        .collect()
}

/// [`AlbumSource`](crate::AlbumSource) over the demo catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoSource;

impl DemoSource {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_albums_are_deterministic() {
        let first = demo_albums();
        assert_eq!(first.len(), 6);
        assert_eq!(first, demo_albums());
        assert_eq!(first[0].cover_url, "https://picsum.photos/seed/1025/1200/675");
    }

    #[test]
    fn test_demo_album_ids_are_unique() {
        let mut ids: Vec<_> = demo_albums().into_iter().map(|a| a.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn test_leonie_items() {
        let items = demo_album_items("leonie");
        assert_eq!(items.len(), 300);
        assert_eq!(items[0].id, "leonie_0");
        assert_eq!(items[299].id, "leonie_299");
        for (i, item) in items.iter().enumerate() {
            assert_eq!(item.id, format!("leonie_{}", i));
            assert_eq!(item.album_id, "leonie");
            assert_eq!(item.mime_type, "image/jpeg");
            assert_eq!((item.width, item.height), (1600, 900));
            assert!(item.creation_time.is_none());
        }
        // seed = 2000 + index + len("leonie")
        assert_eq!(items[0].base_url, "https://picsum.photos/seed/2006/1200/675");
        assert_eq!(items[10].base_url, "https://picsum.photos/seed/2016/1200/675");
    }

    #[test]
    fn test_unknown_album_uses_fallback_count() {
        let items = demo_album_items("unknown-id");
        assert_eq!(items.len(), 60);
        assert_eq!(items[59].id, "unknown-id_59");
    }

    #[test]
    fn test_item_counts_match_catalog() {
        for album in demo_albums() {
            assert_eq!(demo_album_items(&album.id).len() as u64, album.item_count);
        }
    }

    #[test]
    fn test_seed_url_sized() {
        assert_eq!(seed_url_sized(7, 300, 200), "https://picsum.photos/seed/7/300/200");
    }
}

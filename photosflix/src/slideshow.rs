use photos_api::MediaItem;

/// Cursor over an album's items for the auto-advancing player.
#[derive(Debug, Clone)]
pub struct Slideshow {
    items: Vec<MediaItem>,
    position: usize,
}

impl Slideshow {
    /// Starts at `start` (usually the stored resume index), clamped to the
    /// last item.
    pub fn new(items: Vec<MediaItem>, start: usize) -> Self {
        let position = start.min(items.len().saturating_sub(1));
        Self { items, position }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn current(&self) -> Option<&MediaItem> {
        self.items.get(self.position)
    }

    /// Advances, wrapping to the first item after the last.
    pub fn next(&mut self) -> Option<&MediaItem> {
        if self.items.is_empty() {
            return None;
        }
        self.position = (self.position + 1) % self.items.len();
        self.current()
    }

    pub fn previous(&mut self) -> Option<&MediaItem> {
        if self.items.is_empty() {
            return None;
        }
        self.position = self
            .position
            .checked_sub(1)
            .unwrap_or(self.items.len() - 1);
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photos_api::demo::demo_album_items;

    #[test]
    fn test_starts_at_resume_index() {
        let show = Slideshow::new(demo_album_items("misc"), 5);
        assert_eq!(show.position(), 5);
        assert_eq!(show.current().unwrap().id, "misc_5");
    }

    #[test]
    fn test_resume_index_is_clamped() {
        let show = Slideshow::new(demo_album_items("misc"), 500);
        assert_eq!(show.position(), 59);
    }

    #[test]
    fn test_next_and_previous_wrap() {
        let mut show = Slideshow::new(demo_album_items("misc"), 59);
        assert_eq!(show.next().unwrap().id, "misc_0");
        assert_eq!(show.previous().unwrap().id, "misc_59");
        assert_eq!(show.previous().unwrap().id, "misc_58");
    }

    #[test]
    fn test_empty_slideshow() {
        let mut show = Slideshow::new(Vec::new(), 3);
        assert!(show.is_empty());
        assert_eq!(show.position(), 0);
        assert!(show.current().is_none());
        assert!(show.next().is_none());
        assert!(show.previous().is_none());
    }
}

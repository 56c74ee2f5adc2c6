//! Size directives understood by the provider's image CDN.
//!
//! A rendition is requested by appending `=w{W}-h{H}` (plus `-c` to crop)
//! to an item's base URL.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rendition {
    pub width: u32,
    pub height: u32,
    pub crop: bool,
}

impl Rendition {
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            crop: false,
        }
    }

    pub const fn cropped(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            crop: true,
        }
    }

    pub fn url(&self, base_url: &str) -> String {
        if self.crop {
            format!("{}=w{}-h{}-c", base_url, self.width, self.height)
        } else {
            format!("{}=w{}-h{}", base_url, self.width, self.height)
        }
    }
}

/// Card artwork in album rows.
pub const COVER: Rendition = Rendition::cropped(400, 225);
/// Full-screen slideshow frame.
pub const PLAYER: Rendition = Rendition::new(1920, 1080);

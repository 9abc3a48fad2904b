/// A playable episode resolved from a feed. Lives for one playback session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackItem {
    pub media_url: String,
    pub title: String,
}

impl PlaybackItem {
    pub fn new(media_url: impl Into<String>, title: impl Into<String>) -> Self {
        PlaybackItem {
            media_url: media_url.into(),
            title: title.into(),
        }
    }
}

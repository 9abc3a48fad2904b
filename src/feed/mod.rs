mod rss;

pub use rss::{RssResolver, parse_feed};

use crate::{config::FeedConfig, domain::PlaybackItem};

/// Finds the newest playable item for a catalog source.
pub trait FeedResolver: Send {
    /// `None` when the source is unreachable, unparseable or has no audio
    /// item. Implementations log the cause.
    fn resolve_latest(&self, source: &str) -> Option<PlaybackItem>;
}

/// HTTP agent shared by feed fetches and episode downloads.
pub fn http_agent(config: &FeedConfig) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout_connect(config.connect_timeout())
        .timeout_read(config.read_timeout())
        .build()
}

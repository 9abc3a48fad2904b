use super::{FeedResolver, http_agent};
use crate::{
    config::FeedConfig,
    domain::PlaybackItem,
    error::{PlayerError, Result},
    expand_tilde, is_remote,
};
use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use tracing::{debug, info, warn};

const UNTITLED: &str = "Untitled episode";

struct Enclosure {
    url: String,
    mime: String,
}

impl Enclosure {
    fn from_attributes(e: &BytesStart<'_>) -> Result<Self> {
        let mut enclosure = Enclosure {
            url: String::new(),
            mime: String::new(),
        };

        for attr in e.attributes() {
            let attr = attr.map_err(resolution)?;
            let value = attr.unescape_value().map_err(resolution)?;
            match attr.key.as_ref() {
                b"url" => enclosure.url = value.trim().to_string(),
                b"type" => enclosure.mime = value.trim().to_string(),
                _ => {}
            }
        }
        Ok(enclosure)
    }
}

/// One `<item>` while its children are read. Only unprefixed children
/// directly below the item count, so `itunes:title` and friends are skipped.
struct ItemScan {
    depth: usize,
    title: Option<String>,
    in_title: bool,
    enclosure: Option<Enclosure>,
}

impl ItemScan {
    fn at(depth: usize) -> Self {
        ItemScan {
            depth,
            title: None,
            in_title: false,
            enclosure: None,
        }
    }

    fn open(&mut self, e: &BytesStart<'_>, depth: usize, empty: bool) -> Result<()> {
        if depth != self.depth + 1 {
            return Ok(());
        }

        match plain_name(e) {
            Some(b"title") if self.title.is_none() => {
                self.title = Some(String::new());
                self.in_title = !empty;
            }
            Some(b"enclosure") if self.enclosure.is_none() => {
                self.enclosure = Some(Enclosure::from_attributes(e)?);
            }
            _ => {}
        }
        Ok(())
    }

    fn push_title(&mut self, text: &str) {
        if let Some(title) = self.title.as_mut() {
            title.push_str(text);
        }
    }

    /// The playable item, if the first enclosure is audio.
    fn finish(self) -> Option<PlaybackItem> {
        let enclosure = self.enclosure?;
        if !enclosure.mime.contains("audio") || enclosure.url.is_empty() {
            return None;
        }

        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());

        Some(PlaybackItem::new(enclosure.url, title))
    }
}

/// Resolves RSS 2.0 feeds, over HTTP(S) or from local files.
pub struct RssResolver {
    agent: ureq::Agent,
}

impl RssResolver {
    pub fn new(config: &FeedConfig) -> Self {
        RssResolver {
            agent: http_agent(config),
        }
    }

    fn fetch(&self, source: &str) -> Result<String> {
        if is_remote(source) {
            let response = self
                .agent
                .get(source)
                .call()
                .map_err(|e| PlayerError::Resolution(e.to_string()))?;

            return response
                .into_string()
                .map_err(|e| PlayerError::Resolution(e.to_string()));
        }

        let path = expand_tilde(source).map_err(|e| PlayerError::Resolution(e.to_string()))?;
        std::fs::read_to_string(&path)
            .map_err(|e| PlayerError::Resolution(format!("{}: {e}", path.display())))
    }
}

impl FeedResolver for RssResolver {
    fn resolve_latest(&self, source: &str) -> Option<PlaybackItem> {
        let found = self.fetch(source).and_then(|xml| parse_feed(&xml));

        match found {
            Ok(Some(item)) => {
                info!(source, title = %item.title, "Resolved latest episode");
                Some(item)
            }
            Ok(None) => {
                info!(source, "Feed has no audio items");
                None
            }
            Err(e) => {
                warn!(source, error = %e, "Could not resolve feed");
                None
            }
        }
    }
}

/// Pick the first item, in feed order, whose first enclosure is audio.
pub fn parse_feed(xml: &str) -> Result<Option<PlaybackItem>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut depth = 0usize;
    let mut items = 0usize;
    let mut saw_channel = false;
    let mut item: Option<ItemScan> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| resolution(format!("at byte {}: {e}", reader.buffer_position())))?;

        match event {
            Event::Start(e) => {
                depth += 1;
                if let Some(scan) = item.as_mut() {
                    scan.open(&e, depth, false)?;
                } else {
                    match plain_name(&e) {
                        Some(b"channel") => saw_channel = true,
                        Some(b"item") => item = Some(ItemScan::at(depth)),
                        _ => {}
                    }
                }
            }
            Event::Empty(e) => {
                if let Some(scan) = item.as_mut() {
                    scan.open(&e, depth + 1, true)?;
                }
            }
            Event::Text(t) => {
                if let Some(scan) = item.as_mut().filter(|s| s.in_title) {
                    scan.push_title(&t.unescape().map_err(resolution)?);
                }
            }
            Event::CData(c) => {
                if let Some(scan) = item.as_mut().filter(|s| s.in_title) {
                    scan.push_title(&String::from_utf8_lossy(&c));
                }
            }
            Event::End(_) => {
                if item.as_ref().is_some_and(|s| s.depth == depth) {
                    items += 1;
                    if let Some(found) = item.take().and_then(ItemScan::finish) {
                        debug!(position = items, "Found audio item");
                        return Ok(Some(found));
                    }
                } else if let Some(scan) = item.as_mut().filter(|s| s.depth + 1 == depth) {
                    scan.in_title = false;
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth > 0 {
        return Err(resolution("feed ends inside an open element"));
    }
    if !saw_channel {
        return Err(resolution("no <channel> element"));
    }

    debug!(items, "Feed has no audio item");
    Ok(None)
}

/// Local name of an element without a namespace prefix.
fn plain_name<'a>(e: &'a BytesStart<'_>) -> Option<&'a [u8]> {
    let name = e.name();
    match name.prefix() {
        Some(_) => None,
        None => Some(name.local_name().into_inner()),
    }
}

fn resolution(e: impl std::fmt::Display) -> PlayerError {
    PlayerError::Resolution(e.to_string())
}

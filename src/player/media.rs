use crate::{
    error::{PlayerError, Result},
    expand_tilde, is_remote,
};
use std::{io::Read, time::Instant};
use tracing::debug;

const MAX_DOWNLOAD_BYTES: u64 = 512 * 1024 * 1024;

/// Episode bytes fetched ahead of decoding. `url` is kept for format hints.
#[derive(Debug, Clone)]
pub struct Media {
    pub url: String,
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
}

impl Media {
    pub fn new(url: impl Into<String>, bytes: Vec<u8>) -> Self {
        Media {
            url: url.into(),
            bytes,
            mime: None,
        }
    }
}

/// Brings an episode into memory. Runs off the controller thread and
/// without the player lock.
pub trait MediaFetcher: Send + Sync {
    fn fetch(&self, url: &str, deadline: Instant) -> Result<Media>;
}

/// Downloads `http(s)` episodes with ureq and reads everything else from
/// the local filesystem.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new(agent: ureq::Agent) -> Self {
        HttpFetcher { agent }
    }

    fn download(&self, url: &str, deadline: Instant) -> Result<Media> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let response = self
            .agent
            .get(url)
            .timeout(remaining)
            .call()
            .map_err(|e| PlayerError::Backend(e.to_string()))?;

        let mime = response
            .header("Content-Type")
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_string())
            .filter(|ct| ct.starts_with("audio/"));

        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_DOWNLOAD_BYTES)
            .read_to_end(&mut bytes)
            .map_err(|e| PlayerError::Backend(e.to_string()))?;

        debug!(url, bytes = bytes.len(), ?mime, "Downloaded episode");
        Ok(Media {
            url: url.to_string(),
            bytes,
            mime,
        })
    }
}

impl MediaFetcher for HttpFetcher {
    fn fetch(&self, url: &str, deadline: Instant) -> Result<Media> {
        if is_remote(url) {
            return self.download(url, deadline);
        }

        let path = expand_tilde(url).map_err(|e| PlayerError::Backend(e.to_string()))?;
        let bytes = std::fs::read(&path)
            .map_err(|e| PlayerError::Backend(format!("{}: {e}", path.display())))?;
        Ok(Media::new(url, bytes))
    }
}

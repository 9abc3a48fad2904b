use anyhow::{Result, anyhow};
use ratatui::crossterm::{
    ExecutableCommand,
    cursor::MoveToColumn,
    style::Print,
    terminal::{Clear, ClearType},
};
use std::{
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

pub mod app_core;
pub mod config;
pub mod display;
pub mod domain;
pub mod error;
pub mod feed;
pub mod input;
pub mod logging;
pub mod player;
pub mod tui;

pub use config::AppConfig;
pub use domain::{Catalog, CatalogEntry, PlaybackItem};
pub use error::PlayerError;

// ~10fps, matches the panel refresh of the appliance
pub const REFRESH_RATE: Duration = Duration::from_millis(100);

/// Formats a duration as `MM:SS`. Minutes are not wrapped at the hour.
pub fn get_readable_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let mins = secs / 60;
    let secs = secs % 60;

    format!("{mins:02}:{secs:02}")
}

/// Seconds as reported by the status record. Negative and non-finite
/// values render as zero.
pub fn readable_secs(secs: f64) -> String {
    match secs.is_finite() && secs > 0.0 {
        true => get_readable_duration(Duration::from_secs_f64(secs)),
        false => get_readable_duration(Duration::ZERO),
    }
}

pub(crate) fn truncate_at_last_space(s: &str, limit: usize) -> String {
    if s.chars().count() <= limit {
        return s.to_string();
    }

    let byte_limit = s
        .char_indices()
        .map(|(i, _)| i)
        .nth(limit.saturating_sub(1))
        .unwrap_or(s.len());

    match s[..byte_limit].rfind(' ') {
        Some(last_space) if last_space > 0 => {
            let mut truncated = s[..last_space].to_string();
            truncated.push('…');
            truncated
        }
        _ => {
            let mut truncated = s[..byte_limit].to_string();
            truncated.push('…');
            truncated
        }
    }
}

pub fn overwrite_line(message: &str) -> Result<()> {
    let mut stdout = std::io::stdout();
    stdout
        .execute(MoveToColumn(0))?
        .execute(Clear(ClearType::CurrentLine))?
        .execute(Print(message))?;
    stdout.flush()?;
    Ok(())
}

/// True for `http://` and `https://` locators; anything else is a local path.
pub fn is_remote(locator: &str) -> bool {
    let lower = locator.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

pub fn expand_tilde<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy();

    if !path_str.starts_with('~') {
        return Ok(path.to_path_buf());
    }

    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory!"))?;

    if path_str == "~" {
        return Ok(home);
    }

    if path_str.starts_with("~/") || path_str.starts_with("~\\") {
        return Ok(home.join(&path_str[2..]));
    }

    Err(anyhow!("Error reading path with tilde (~): {path_str}"))
}

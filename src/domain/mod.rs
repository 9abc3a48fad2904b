mod catalog;
mod playback_item;

pub use catalog::{Catalog, CatalogEntry};
pub use playback_item::PlaybackItem;

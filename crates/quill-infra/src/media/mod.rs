//! Profile picture processing and storage.

mod store;
#[cfg(feature = "media")]
mod thumbnail;

pub use store::{FsPictureStore, InMemoryPictureStore};
#[cfg(feature = "media")]
pub use thumbnail::{ThumbnailProcessor, placeholder_jpeg};

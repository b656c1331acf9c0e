//! Profile picture ports: resizing and storage.

use async_trait::async_trait;

/// Picture formats accepted for upload, by file extension.
pub const ALLOWED_PICTURE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Resizes uploaded pictures.
pub trait ImageProcessor: Send + Sync {
    /// Shrink `bytes` to fit inside `max_width` x `max_height`, keeping the
    /// aspect ratio. Output is encoded in the format named by `extension`,
    /// whatever the input format was.
    fn thumbnail(
        &self,
        bytes: &[u8],
        extension: &str,
        max_width: u32,
        max_height: u32,
    ) -> Result<Vec<u8>, MediaError>;
}

/// Stores processed pictures under generated file names.
#[async_trait]
pub trait PictureStore: Send + Sync {
    async fn save(&self, file_name: &str, bytes: Vec<u8>) -> Result<(), MediaError>;

    async fn load(&self, file_name: &str) -> Result<Option<Vec<u8>>, MediaError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Decode failed: {0}")]
    Decode(String),

    #[error("Encode failed: {0}")]
    Encode(String),

    #[error("Storage failed: {0}")]
    Storage(String),
}

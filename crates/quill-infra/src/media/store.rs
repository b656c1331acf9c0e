//! Picture stores: a directory on disk, or a map for tests and dev runs.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::ports::{MediaError, PictureStore};

/// Stored names are generated by the account service; anything that could
/// escape the directory is refused.
fn check_name(file_name: &str) -> Result<(), MediaError> {
    let ok = !file_name.is_empty()
        && !file_name.starts_with('.')
        && file_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
    if ok {
        Ok(())
    } else {
        Err(MediaError::Storage(format!("invalid file name: {file_name}")))
    }
}

pub struct FsPictureStore {
    root: PathBuf,
}

impl FsPictureStore {
    /// Create the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, MediaError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| MediaError::Storage(format!("{}: {e}", root.display())))?;
        tracing::info!(dir = %root.display(), "picture store ready");
        Ok(Self { root })
    }
}

#[async_trait]
impl PictureStore for FsPictureStore {
    async fn save(&self, file_name: &str, bytes: Vec<u8>) -> Result<(), MediaError> {
        check_name(file_name)?;
        tokio::fs::write(self.root.join(file_name), bytes)
            .await
            .map_err(|e| MediaError::Storage(e.to_string()))
    }

    async fn load(&self, file_name: &str) -> Result<Option<Vec<u8>>, MediaError> {
        if check_name(file_name).is_err() {
            return Ok(None);
        }
        match tokio::fs::read(self.root.join(file_name)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(MediaError::Storage(e.to_string())),
        }
    }
}

#[derive(Default)]
pub struct InMemoryPictureStore {
    files: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryPictureStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PictureStore for InMemoryPictureStore {
    async fn save(&self, file_name: &str, bytes: Vec<u8>) -> Result<(), MediaError> {
        check_name(file_name)?;
        self.files.write().await.insert(file_name.to_string(), bytes);
        Ok(())
    }

    async fn load(&self, file_name: &str) -> Result<Option<Vec<u8>>, MediaError> {
        Ok(self.files.read().await.get(file_name).cloned())
    }
}

//! Session persistence backends.
//!
//! The session store keeps at most one serialized session under a fixed
//! key. A load returns either a complete previous value or nothing; a
//! save is atomic from the perspective of subsequent reads.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::fs;

use crate::error::Result;

/// Abstraction for the external "current session" storage slot.
///
/// Implementations must never surface a partially-written value.
#[async_trait]
pub trait SessionPersistence: Send + Sync + 'static {
    async fn load(&self) -> Result<Option<Vec<u8>>>;
    async fn save(&self, bytes: &[u8]) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}

/// File-backed persistence: one JSON file at a fixed path.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the standard client location, `<root>/local/shiftbuddy_user.json`
    pub fn at_default_path() -> Self {
        Self::new(shift_common::session_path())
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl SessionPersistence for FileSessionStore {
    async fn load(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write to temp file, then atomic rename
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, bytes).await?;
        fs::rename(&temp_path, &self.path).await?;

        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory persistence, for tests and embedded consumers.
#[derive(Default)]
pub struct MemorySessionStore {
    value: Mutex<Option<Vec<u8>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionPersistence for MemorySessionStore {
    async fn load(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.value.lock().clone())
    }

    async fn save(&self, bytes: &[u8]) -> Result<()> {
        *self.value.lock() = Some(bytes.to_vec());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.value.lock() = None;
        Ok(())
    }
}

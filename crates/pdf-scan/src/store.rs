//! Transient artifact storage
//!
//! Encoded documents, page images and thumbnails are written to a store and
//! referenced by handle. Every `put` creates a new entry; entries are never
//! overwritten, so replacing an artifact means putting the new bytes and
//! discarding the old handle.

use crate::types::*;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// What a stored artifact contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// An encoded PDF document
    Pdf,
    /// A normalized page raster (lossless)
    PageImage,
    /// A small JPEG preview of a page
    Thumbnail,
}

impl ArtifactKind {
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Pdf => "pdf",
            ArtifactKind::PageImage => "png",
            ArtifactKind::Thumbnail => "jpg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ArtifactKind::Pdf => "application/pdf",
            ArtifactKind::PageImage => "image/png",
            ArtifactKind::Thumbnail => "image/jpeg",
        }
    }
}

/// Reference to a stored artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactHandle {
    kind: ArtifactKind,
    key: String,
}

impl ArtifactHandle {
    pub fn new(kind: ArtifactKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
        }
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Storage backend for transient artifacts
pub trait ArtifactStore: Send + Sync {
    /// Store bytes under a new, never reused handle
    fn put(&self, kind: ArtifactKind, bytes: &[u8]) -> Result<ArtifactHandle>;

    /// Read a stored artifact; `ArtifactMissing` if it is gone
    fn get(&self, handle: &ArtifactHandle) -> Result<Vec<u8>>;

    /// Remove a stored artifact; `ArtifactMissing` if it is gone
    fn delete(&self, handle: &ArtifactHandle) -> Result<()>;

    /// Whether the artifact is still present
    fn contains(&self, handle: &ArtifactHandle) -> bool;
}

/// Best-effort removal of an artifact.
///
/// Failures are logged and returned; callers are free to ignore them.
pub fn discard(store: &dyn ArtifactStore, handle: &ArtifactHandle) -> Result<()> {
    let result = store.delete(handle);
    if let Err(e) = &result {
        log::warn!("Failed to discard artifact {}: {}", handle.key(), e);
    }
    result
}

/// Best-effort removal of several artifacts, returning how many were removed
pub fn discard_all<'a>(
    store: &dyn ArtifactStore,
    handles: impl IntoIterator<Item = &'a ArtifactHandle>,
) -> usize {
    handles
        .into_iter()
        .filter(|handle| discard(store, handle).is_ok())
        .count()
}

// =============================================================================
// Filesystem store
// =============================================================================

/// Stores each artifact as its own uniquely named file in a directory
#[derive(Debug, Clone)]
pub struct TempDirStore {
    root: PathBuf,
}

impl TempDirStore {
    /// Use (and create if needed) the given directory
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Use a `pdf-scan` directory under the system temp dir
    pub fn in_system_temp() -> Result<Self> {
        Self::new(std::env::temp_dir().join("pdf-scan"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of a handle on disk
    pub fn path_of(&self, handle: &ArtifactHandle) -> Result<PathBuf> {
        let key = handle.key();
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(ScanError::ArtifactMissing);
        }
        Ok(self.root.join(key))
    }
}

impl ArtifactStore for TempDirStore {
    fn put(&self, kind: ArtifactKind, bytes: &[u8]) -> Result<ArtifactHandle> {
        let suffix = format!(".{}", kind.extension());
        let mut file = tempfile::Builder::new()
            .prefix("pdfscan-")
            .suffix(&suffix)
            .tempfile_in(&self.root)?;
        file.write_all(bytes)?;
        file.flush()?;

        let (_, path) = file.keep().map_err(|e| ScanError::Io(e.error))?;
        let key = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ScanError::Config(format!("Unusable temp path {}", path.display())))?;

        log::debug!("Stored {} bytes at {}", bytes.len(), path.display());
        Ok(ArtifactHandle::new(kind, key))
    }

    fn get(&self, handle: &ArtifactHandle) -> Result<Vec<u8>> {
        let path = self.path_of(handle)?;
        std::fs::read(&path).map_err(not_found_as_missing)
    }

    fn delete(&self, handle: &ArtifactHandle) -> Result<()> {
        let path = self.path_of(handle)?;
        std::fs::remove_file(&path).map_err(not_found_as_missing)
    }

    fn contains(&self, handle: &ArtifactHandle) -> bool {
        self.path_of(handle).is_ok_and(|path| path.is_file())
    }
}

fn not_found_as_missing(e: std::io::Error) -> ScanError {
    if e.kind() == std::io::ErrorKind::NotFound {
        ScanError::ArtifactMissing
    } else {
        ScanError::Io(e)
    }
}

// =============================================================================
// In-memory store
// =============================================================================

/// Keeps artifacts in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    next_id: AtomicU64,
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live artifacts
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ArtifactStore for MemoryStore {
    fn put(&self, kind: ArtifactKind, bytes: &[u8]) -> Result<ArtifactHandle> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let key = format!("mem-{}.{}", id, kind.extension());
        self.entries().insert(key.clone(), bytes.to_vec());
        Ok(ArtifactHandle::new(kind, key))
    }

    fn get(&self, handle: &ArtifactHandle) -> Result<Vec<u8>> {
        self.entries()
            .get(handle.key())
            .cloned()
            .ok_or(ScanError::ArtifactMissing)
    }

    fn delete(&self, handle: &ArtifactHandle) -> Result<()> {
        self.entries()
            .remove(handle.key())
            .map(|_| ())
            .ok_or(ScanError::ArtifactMissing)
    }

    fn contains(&self, handle: &ArtifactHandle) -> bool {
        self.entries().contains_key(handle.key())
    }
}

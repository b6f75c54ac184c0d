//! Persistence gateway
//!
//! Stores the exported split document (definitions and personal bests). Run
//! state is never stored. Saving is fire-and-forget from the splitter's point
//! of view: failures are logged, never propagated into the tick loop.

use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::splits::SchemaDocument;
use crate::{Result, SplitterError};

/// Load/save contract for the split document
pub trait SplitStore: Send + Sync {
    /// Stored document, `None` when nothing was saved yet
    fn load(&self) -> Result<Option<SchemaDocument>>;

    /// Replace the stored document
    fn save(&self, document: &SchemaDocument) -> Result<()>;
}

/// Boxed store type
pub type BoxedStore = Box<dyn SplitStore>;

#[derive(Debug, Default)]
struct MemoryInner {
    document: Option<SchemaDocument>,
    saves: usize,
}

/// In-process store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a document
    pub fn with_document(document: SchemaDocument) -> Self {
        let store = Self::new();
        store.inner.lock().document = Some(document);
        store
    }

    /// Last saved document
    pub fn document(&self) -> Option<SchemaDocument> {
        self.inner.lock().document.clone()
    }

    /// Number of `save` calls so far
    pub fn save_count(&self) -> usize {
        self.inner.lock().saves
    }
}

impl SplitStore for MemoryStore {
    fn load(&self) -> Result<Option<SchemaDocument>> {
        Ok(self.inner.lock().document.clone())
    }

    fn save(&self, document: &SchemaDocument) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.document = Some(document.clone());
        inner.saves += 1;
        Ok(())
    }
}

/// Pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SplitStore for JsonFileStore {
    fn load(&self) -> Result<Option<SchemaDocument>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let document = serde_json::from_str(&text).map_err(|e| {
            SplitterError::Persistence(format!("{}: {}", self.path.display(), e))
        })?;
        Ok(Some(document))
    }

    fn save(&self, document: &SchemaDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, document.to_json_pretty()?)?;
        log::trace!("Saved splits to {}", self.path.display());
        Ok(())
    }
}

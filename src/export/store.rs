use std::path::{Path, PathBuf};

use crate::export::document::KeyframeDocument;
use crate::foundation::error::{ReplayError, ReplayResult};

/// Destination for exported keyframe documents.
pub trait KeyframeStore {
    /// Persist one exported document. Called once per flush that had saved keyframes.
    fn write_document(&mut self, doc: &KeyframeDocument) -> ReplayResult<()>;
}

/// In-memory store for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    pub(crate) documents: Vec<KeyframeDocument>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Documents written so far, oldest first.
    pub fn documents(&self) -> &[KeyframeDocument] {
        &self.documents
    }

    /// Most recently written document.
    pub fn last(&self) -> Option<&KeyframeDocument> {
        self.documents.last()
    }
}

impl KeyframeStore for InMemoryStore {
    fn write_document(&mut self, doc: &KeyframeDocument) -> ReplayResult<()> {
        self.documents.push(doc.clone());
        Ok(())
    }
}

/// Writes each document as JSON to a fixed path, replacing the previous contents.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    pretty: bool,
}

impl JsonFileStore {
    /// Store writing compact JSON to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pretty: false,
        }
    }

    /// Toggle pretty-printed output.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Output path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyframeStore for JsonFileStore {
    fn write_document(&mut self, doc: &KeyframeDocument) -> ReplayResult<()> {
        ensure_parent_dir(&self.path)?;
        let text = doc.to_json_string(self.pretty)?;
        std::fs::write(&self.path, text).map_err(|e| {
            ReplayError::io(format!(
                "write keyframe document '{}': {e}",
                self.path.display()
            ))
        })?;
        tracing::debug!(
            path = %self.path.display(),
            keyframes = doc.keyframes.len(),
            "wrote keyframe document"
        );
        Ok(())
    }
}

fn ensure_parent_dir(path: &Path) -> ReplayResult<()> {
    if let Some(parent) = path.parent() {
        if parent.as_os_str().is_empty() {
            return Ok(());
        }
        std::fs::create_dir_all(parent).map_err(|e| {
            ReplayError::io(format!("create output dir '{}': {e}", parent.display()))
        })?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/export/store.rs"]
mod tests;

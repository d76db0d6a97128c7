//! In-memory table of uploaded audio files
//!
//! Uploaded clips live only for the lifetime of the process and are never
//! persisted. A local `MusicRef` whose file id is missing here is unplayable;
//! callers treat that as a degraded mode, not an error.

use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{Result, WalkupError};
use crate::types::{LocalFile, LocalFileId};

/// One uploaded audio file
#[derive(Debug, Clone)]
pub struct LocalAudioFile {
    /// Original file name
    pub name: String,

    /// MIME type reported at upload (always `audio/*`)
    pub mime_type: String,

    /// Encoded audio bytes
    pub bytes: Bytes,
}

/// Shared handle to the uploaded-file table
///
/// Clones share the same table.
#[derive(Debug, Clone, Default)]
pub struct LocalAudioLibrary {
    files: Arc<RwLock<HashMap<LocalFileId, LocalAudioFile>>>,
}

impl LocalAudioLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an uploaded file and return its receipt
    ///
    /// Only `audio/*` MIME types are accepted.
    pub fn insert(
        &self,
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Result<LocalFile> {
        let name = name.into();
        let mime_type = mime_type.into();

        if !mime_type.trim().to_ascii_lowercase().starts_with("audio/") {
            return Err(WalkupError::validation(format!(
                "{name} is not an audio file ({mime_type})"
            )));
        }

        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(WalkupError::validation(format!("{name} is empty")));
        }

        let id = LocalFileId::generate();
        let file = LocalAudioFile {
            name: name.clone(),
            mime_type,
            bytes,
        };
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), file);

        Ok(LocalFile { id, name })
    }

    /// Look up a file by id
    pub fn get(&self, id: &LocalFileId) -> Option<LocalAudioFile> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Whether a file with this id is held
    pub fn contains(&self, id: &LocalFileId) -> bool {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    /// Drop a file
    pub fn remove(&self, id: &LocalFileId) -> Option<LocalAudioFile> {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    /// Number of files held
    pub fn len(&self) -> usize {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no files are held
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

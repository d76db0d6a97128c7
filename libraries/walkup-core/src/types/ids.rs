/// ID types for walk-up entities
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Player identifier
///
/// Opaque string. Sample roster entries use short numeric strings, new
/// players get a random UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Create a player ID from an existing value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new random player ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Identifier of an uploaded audio file held in memory
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalFileId(String);

impl LocalFileId {
    /// Create a file ID from an existing value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new random file ID (`file_<uuid>`)
    pub fn generate() -> Self {
        Self(format!("file_{}", Uuid::new_v4().simple()))
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocalFileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_id_generation_creates_unique_ids() {
        let id1 = PlayerId::generate();
        let id2 = PlayerId::generate();
        assert_ne!(id1, id2);
    }

    #[test]
    fn player_id_serializes_as_plain_string() {
        let id = PlayerId::new("7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7\"");
    }

    #[test]
    fn local_file_id_has_file_prefix() {
        let id = LocalFileId::generate();
        assert!(id.as_str().starts_with("file_"));
        assert_eq!(format!("{}", LocalFileId::new("file_1")), "file_1");
    }
}

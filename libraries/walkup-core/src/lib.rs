//! Walk-up Core
//!
//! Platform-agnostic domain types, link normalization and lineup rules for the
//! walk-up music manager.
//!
//! This crate provides the building blocks shared by the store, the playback
//! engines and the command layer.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Player`, `MusicRef`, `SourceKind`, `PlayerForm`
//! - **Normalizer**: `normalize` turns a pasted link into an embeddable one
//! - **Lineup Rules**: pure derivations (`available_players`) and reorder rules
//! - **Local Audio Library**: in-memory table of uploaded clips
//! - **Error Handling**: Unified `WalkupError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use walkup_core::{normalize, SourceKind};
//!
//! let embed = normalize("https://open.spotify.com/track/ABC123?si=xyz", SourceKind::Spotify);
//! assert_eq!(embed, "https://open.spotify.com/embed/track/ABC123");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod library;
pub mod lineup;
pub mod normalize;
pub mod types;

// Re-export commonly used types
pub use error::{Result, WalkupError};
pub use library::{LocalAudioFile, LocalAudioLibrary};
pub use lineup::{available_players, move_within, validate_order};
pub use normalize::normalize;
pub use types::{
    LocalFile, LocalFileId, MusicForm, MusicRef, Player, PlayerForm, PlayerId, SourceKind,
};

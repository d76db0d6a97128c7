//! Roster, music and editor form types

mod ids;
mod music;
mod player;

pub use ids::{LocalFileId, PlayerId};
pub use music::{MusicRef, SourceKind};
pub use player::{LocalFile, MusicForm, Player, PlayerForm};

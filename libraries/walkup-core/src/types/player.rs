//! Player domain type and the form data used to create or edit one

use serde::{Deserialize, Serialize};

use super::ids::{LocalFileId, PlayerId};
use super::music::{MusicRef, SourceKind};
use crate::error::{Result, WalkupError};
use crate::library::LocalAudioLibrary;
use crate::normalize::normalize;

/// Roster entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Unique player identifier
    pub id: PlayerId,

    /// Player name
    pub name: String,

    /// Jersey number (free text, e.g. "07")
    pub number: String,

    /// Walk-up clip
    pub walkup_music: MusicRef,
}

impl Player {
    /// Create a player with a freshly generated id
    pub fn new(name: impl Into<String>, number: impl Into<String>, walkup_music: MusicRef) -> Self {
        Self {
            id: PlayerId::generate(),
            name: name.into(),
            number: number.into(),
            walkup_music,
        }
    }

    /// Build the stored player for `id` from validated form data
    pub fn from_form(id: PlayerId, form: &PlayerForm) -> Result<Self> {
        form.validate()?;
        Ok(Self {
            id,
            name: form.name.trim().to_string(),
            number: form.number.trim().to_string(),
            walkup_music: form.music.to_music_ref()?,
        })
    }

    /// Case-insensitive name match or number substring match
    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase()) || self.number.contains(query)
    }
}

/// Receipt for an uploaded audio file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalFile {
    /// In-memory file id
    pub id: LocalFileId,

    /// Original file name
    pub name: String,
}

/// Music part of the player editor form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicForm {
    /// Chosen source kind
    pub source_kind: SourceKind,

    /// Link pasted by the user (streaming kinds)
    #[serde(default)]
    pub link: String,

    /// Optional display title; falls back to the link or the file name
    #[serde(default)]
    pub title: String,

    /// Uploaded file (local kind)
    #[serde(default)]
    pub local_file: Option<LocalFile>,

    /// Clip start in seconds
    pub start_offset_seconds: u32,

    /// Clip end in seconds
    pub end_offset_seconds: u32,
}

impl MusicForm {
    /// Form for a streaming link
    pub fn streaming(
        source_kind: SourceKind,
        link: impl Into<String>,
        start_offset_seconds: u32,
        end_offset_seconds: u32,
    ) -> Self {
        Self {
            source_kind,
            link: link.into(),
            title: String::new(),
            local_file: None,
            start_offset_seconds,
            end_offset_seconds,
        }
    }

    /// Form for an uploaded file
    pub fn local(file: LocalFile, start_offset_seconds: u32, end_offset_seconds: u32) -> Self {
        Self {
            source_kind: SourceKind::Local,
            link: String::new(),
            title: String::new(),
            local_file: Some(file),
            start_offset_seconds,
            end_offset_seconds,
        }
    }

    /// Set the display title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Checks required before the clip can be previewed or saved
    pub fn validate(&self) -> Result<()> {
        match self.source_kind {
            SourceKind::Local => {
                if self.local_file.is_none() {
                    return Err(WalkupError::validation("please upload a file first"));
                }
            }
            SourceKind::Spotify | SourceKind::YouTube => {
                if self.link.trim().is_empty() {
                    return Err(WalkupError::validation("please enter a URL first"));
                }
            }
        }

        if self.end_offset_seconds < self.start_offset_seconds {
            return Err(WalkupError::validation(format!(
                "end time ({}s) is before start time ({}s)",
                self.end_offset_seconds, self.start_offset_seconds
            )));
        }

        Ok(())
    }

    /// [`validate`](Self::validate), plus the uploaded file must still be held
    /// by `library`
    pub fn validate_with(&self, library: &LocalAudioLibrary) -> Result<()> {
        self.validate()?;
        match (&self.source_kind, &self.local_file) {
            (SourceKind::Local, Some(file)) if !library.contains(&file.id) => {
                Err(WalkupError::validation(format!(
                    "uploaded file {} is no longer available, please upload it again",
                    file.name
                )))
            }
            _ => Ok(()),
        }
    }

    /// Validate and convert into a stored music reference
    pub fn to_music_ref(&self) -> Result<MusicRef> {
        self.validate()?;

        let music = match (&self.source_kind, &self.local_file) {
            (SourceKind::Local, Some(file)) => MusicRef::local(
                self.display_title(),
                file.id.clone(),
                self.start_offset_seconds,
                self.end_offset_seconds,
            ),
            (kind, _) => MusicRef::embedded(
                *kind,
                self.display_title(),
                normalize(self.link.trim(), *kind),
                self.start_offset_seconds,
                self.end_offset_seconds,
            ),
        };

        Ok(music)
    }

    fn display_title(&self) -> String {
        let title = self.title.trim();
        if !title.is_empty() {
            return title.to_string();
        }
        match (&self.source_kind, &self.local_file) {
            (SourceKind::Local, Some(file)) => file.name.clone(),
            (SourceKind::Local, None) => String::from("No file selected"),
            _ => self.link.trim().to_string(),
        }
    }
}

/// Submitted player editor form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerForm {
    /// Set when editing an existing player
    #[serde(default)]
    pub id: Option<PlayerId>,

    /// Player name
    pub name: String,

    /// Jersey number
    pub number: String,

    /// Walk-up clip
    pub music: MusicForm,
}

impl PlayerForm {
    /// Form for a new player
    pub fn new(name: impl Into<String>, number: impl Into<String>, music: MusicForm) -> Self {
        Self {
            id: None,
            name: name.into(),
            number: number.into(),
            music,
        }
    }

    /// Form editing the player `id`
    #[must_use]
    pub fn editing(mut self, id: PlayerId) -> Self {
        self.id = Some(id);
        self
    }

    /// Checks required before the player can be saved
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(WalkupError::validation("player name is required"));
        }
        if self.number.trim().is_empty() {
            return Err(WalkupError::validation("jersey number is required"));
        }
        self.music.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spotify_form(link: &str) -> PlayerForm {
        PlayerForm::new(
            "Alex Johnson",
            "7",
            MusicForm::streaming(SourceKind::Spotify, link, 15, 30).with_title("Eye of the Tiger"),
        )
    }

    #[test]
    fn from_form_normalizes_link() {
        let form = spotify_form("https://open.spotify.com/track/2KH16WveTQWT6KOG9Rg6e2?si=abc");
        let player = Player::from_form(PlayerId::new("1"), &form).unwrap();

        assert_eq!(
            player.walkup_music.canonical_url,
            "https://open.spotify.com/embed/track/2KH16WveTQWT6KOG9Rg6e2"
        );
        assert_eq!(player.walkup_music.title, "Eye of the Tiger");
        assert!(player.walkup_music.local_file_id.is_none());
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut form = spotify_form("https://open.spotify.com/track/x");
        form.name = "   ".to_string();
        let err = form.validate().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn streaming_without_link_is_rejected() {
        let form = spotify_form("");
        assert!(Player::from_form(PlayerId::new("1"), &form).is_err());
    }

    #[test]
    fn local_without_file_is_rejected() {
        let mut music = MusicForm::local(
            LocalFile {
                id: LocalFileId::new("file_1"),
                name: "anthem.mp3".to_string(),
            },
            0,
            10,
        );
        music.local_file = None;
        assert!(music.validate().unwrap_err().is_validation());
    }

    #[test]
    fn end_before_start_is_rejected() {
        let form = PlayerForm::new(
            "Brandon Smith",
            "12",
            MusicForm::streaming(SourceKind::YouTube, "https://youtu.be/abc", 20, 5),
        );
        assert!(form.validate().unwrap_err().is_validation());
    }

    #[test]
    fn local_title_falls_back_to_file_name() {
        let music = MusicForm::local(
            LocalFile {
                id: LocalFileId::new("file_1"),
                name: "anthem.mp3".to_string(),
            },
            0,
            10,
        );
        let music_ref = music.to_music_ref().unwrap();
        assert_eq!(music_ref.title, "anthem.mp3");
        assert_eq!(music_ref.canonical_url, "");
        assert_eq!(music_ref.local_file_id, Some(LocalFileId::new("file_1")));
    }

    #[test]
    fn local_file_must_be_held_by_library() {
        let library = LocalAudioLibrary::new();
        let held = library.insert("anthem.mp3", "audio/mpeg", vec![1u8]).unwrap();
        assert!(MusicForm::local(held, 0, 10).validate_with(&library).is_ok());

        let gone = LocalFile {
            id: LocalFileId::new("file_gone"),
            name: "old.mp3".to_string(),
        };
        let err = MusicForm::local(gone, 0, 10)
            .validate_with(&library)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn matches_name_case_insensitively_and_number() {
        let player = Player::new(
            "Carlos Rodriguez",
            "24",
            MusicRef::embedded(SourceKind::Spotify, "t", "u", 0, 10),
        );
        assert!(player.matches("carlos"));
        assert!(player.matches("24"));
        assert!(!player.matches("ethan"));
    }
}

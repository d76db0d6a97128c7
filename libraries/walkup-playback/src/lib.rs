//! Walk-up Playback
//!
//! Plays a player's walk-up clip when they are announced, and previews clips
//! from the player editor.
//!
//! Three structurally different mechanisms are coordinated:
//! - Spotify embeds: autoplay directive only, no start offset
//! - YouTube embeds: autoplay directive plus start offset, no transport
//! - Local uploads: full transport through a [`LocalAudioOutput`]
//!
//! Embeds usually need a nudge to start, so the announce engine presses
//! "play" on a fixed schedule until the host reports playback engaged. Local
//! clips are silenced once their window elapses.
//!
//! # Architecture
//!
//! `walkup-playback` does no I/O of its own. Devices and widgets are provided
//! by the platform through the [`LocalAudioOutput`] and [`EmbedHost`] traits.
//! The optional `rodio-output` feature adds [`RodioOutput`], a device-backed
//! local output.
//!
//! - [`PlaybackEngine`]: the single announce session
//! - [`PreviewEngine`]: independent editor preview
//! - [`SharedLocalOutput`]: the one local output both engines play through
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use walkup_core::{LocalAudioLibrary, Player};
//! use walkup_playback::{
//!     EmbedHost, LocalAudioOutput, PlaybackConfig, PlaybackEngine, SharedLocalOutput,
//! };
//!
//! # fn example(device: Arc<dyn LocalAudioOutput>, host: Arc<dyn EmbedHost>, player: Player) {
//! let output = SharedLocalOutput::new(device);
//! let engine = PlaybackEngine::new(output, host, LocalAudioLibrary::new(), PlaybackConfig::default());
//!
//! let session = engine.announce(player);
//! println!("Now batting: {}", session.player.name);
//!
//! for event in engine.drain_events() {
//!     println!("{event:?}");
//! }
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod dispatch;
pub mod embed;
pub mod engine;
pub mod error;
pub mod events;
pub mod mechanism;
pub mod output;
pub mod preview;
#[cfg(feature = "rodio-output")]
pub mod rodio_output;
pub mod session;

pub use embed::embed_request;
pub use engine::{PlaybackConfig, PlaybackEngine, DEFAULT_AUTOPLAY_RETRY_DELAYS_MS};
pub use error::{PlaybackError, Result};
pub use events::{EndReason, PlaybackEvent};
pub use mechanism::{
    EmbedAccessError, EmbedHost, EmbedRequest, EmbedSurface, EngagementOutcome, LocalAudioOutput,
    LocalClip,
};
pub use output::{OutputToken, SharedLocalOutput};
pub use preview::{PreviewEngine, PreviewSnapshot};
#[cfg(feature = "rodio-output")]
pub use rodio_output::RodioOutput;
pub use session::{ActiveMechanism, SessionId, SessionSnapshot};

//! Announce session state
//!
//! A session owns every timer it scheduled. Dropping the session aborts them,
//! so replacing or ending a session can never leave a stale timer running.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use walkup_core::Player;

use crate::mechanism::EmbedRequest;
use crate::output::OutputToken;

/// Monotonic session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(u64);

impl SessionId {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw value
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a clip is being played
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveMechanism {
    /// Local file on the shared output
    Local,
    /// Third-party embed
    Embed(EmbedRequest),
    /// Nothing could be started (missing file, failing device or embed)
    Unavailable,
}

/// Mechanism state held by a live session or preview
#[derive(Debug)]
pub(crate) enum Mechanism {
    Local(OutputToken),
    Embed(EmbedRequest),
    Unavailable,
}

impl Mechanism {
    pub(crate) fn public(&self) -> ActiveMechanism {
        match self {
            Self::Local(_) => ActiveMechanism::Local,
            Self::Embed(request) => ActiveMechanism::Embed(request.clone()),
            Self::Unavailable => ActiveMechanism::Unavailable,
        }
    }
}

/// Timers owned by a session, aborted on drop
#[derive(Debug, Default)]
pub(crate) struct Timers(Vec<AbortHandle>);

impl Timers {
    /// Spawn `task` on `runtime` and take ownership of it
    ///
    /// Works from any thread. Without a runtime the task is not scheduled.
    pub(crate) fn spawn<F>(&mut self, runtime: Option<&Handle>, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match runtime {
            Some(handle) => self.0.push(handle.spawn(task).abort_handle()),
            None => tracing::warn!("No async runtime, clip timer skipped"),
        }
    }

    pub(crate) fn abort_all(&mut self) {
        for handle in self.0.drain(..) {
            handle.abort();
        }
    }
}

impl Drop for Timers {
    fn drop(&mut self) {
        self.abort_all();
    }
}

/// The announcing player and everything its playback holds
#[derive(Debug)]
pub(crate) struct PlaybackSession {
    pub(crate) id: SessionId,
    pub(crate) player: Player,
    pub(crate) sounding: bool,
    pub(crate) mechanism: Mechanism,
    pub(crate) timers: Timers,
}

impl PlaybackSession {
    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            player: self.player.clone(),
            is_sounding: self.sounding,
            mechanism: self.mechanism.public(),
        }
    }
}

/// Read-only view of the announce session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Session id
    pub id: SessionId,

    /// Player being announced
    pub player: Player,

    /// Whether audio is expected to be sounding
    pub is_sounding: bool,

    /// Mechanism in use
    pub mechanism: ActiveMechanism,
}

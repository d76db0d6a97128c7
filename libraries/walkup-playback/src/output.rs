//! Shared local-audio output
//!
//! Announce and preview both play local clips through one device. Each start
//! claims the slot and returns an [`OutputToken`]; a newer claim preempts the
//! older one, and releasing a preempted token does nothing. Last start wins.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::Result;
use crate::mechanism::{LocalAudioOutput, LocalClip};

/// Proof of ownership of the local output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutputToken(u64);

#[derive(Default)]
struct SlotState {
    next: u64,
    owner: Option<OutputToken>,
}

/// Cloneable handle to the single local output
#[derive(Clone)]
pub struct SharedLocalOutput {
    output: Arc<dyn LocalAudioOutput>,
    state: Arc<Mutex<SlotState>>,
}

impl fmt::Debug for SharedLocalOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedLocalOutput")
            .field("owner", &self.owner())
            .finish_non_exhaustive()
    }
}

impl SharedLocalOutput {
    /// Wrap a device
    pub fn new(output: Arc<dyn LocalAudioOutput>) -> Self {
        Self {
            output,
            state: Arc::new(Mutex::new(SlotState::default())),
        }
    }

    /// Claim the output and start `clip`
    ///
    /// On failure the device is stopped and nobody owns it afterwards.
    pub fn start(&self, clip: &LocalClip) -> Result<OutputToken> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.next += 1;
        let token = OutputToken(state.next);

        match self.output.play(clip) {
            Ok(()) => {
                state.owner = Some(token);
                Ok(token)
            }
            Err(e) => {
                self.output.stop();
                state.owner = None;
                Err(e)
            }
        }
    }

    /// Stop the output if `token` still owns it
    ///
    /// Returns `true` if the output was stopped.
    pub fn release(&self, token: OutputToken) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.owner != Some(token) {
            return false;
        }
        state.owner = None;
        self.output.stop();
        true
    }

    /// Whether `token` still owns the output
    pub fn is_owner(&self, token: OutputToken) -> bool {
        self.owner() == Some(token)
    }

    /// Current owner, if anything is playing
    pub fn owner(&self) -> Option<OutputToken> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .owner
    }
}

//! Device-backed local output using rodio
//!
//! rodio's output stream is not `Send`, so it lives on a dedicated audio
//! thread. The [`RodioOutput`] handle talks to that thread over a command
//! channel and waits for each `play` to report back.

use bytes::Bytes;
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::io::Cursor;
use std::sync::{Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use crate::error::{PlaybackError, Result};
use crate::mechanism::{LocalAudioOutput, LocalClip};

enum AudioCommand {
    Play {
        clip: LocalClip,
        reply: Sender<Result<()>>,
    },
    Stop,
    Shutdown,
}

/// Local output on the default audio device
pub struct RodioOutput {
    commands: Sender<AudioCommand>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for RodioOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioOutput").finish_non_exhaustive()
    }
}

impl RodioOutput {
    /// Open the default output device
    pub fn open() -> Result<Self> {
        let (commands, receiver) = unbounded();
        let (ready_tx, ready_rx) = bounded(1);

        let worker = thread::Builder::new()
            .name("walkup-audio".to_string())
            .spawn(move || audio_thread(&receiver, &ready_tx))
            .map_err(|e| PlaybackError::output(format!("failed to spawn audio thread: {e}")))?;

        ready_rx
            .recv()
            .map_err(|_| PlaybackError::output("audio thread exited during startup"))??;

        tracing::info!("Audio output opened");

        Ok(Self {
            commands,
            worker: Mutex::new(Some(worker)),
        })
    }
}

impl LocalAudioOutput for RodioOutput {
    fn play(&self, clip: &LocalClip) -> Result<()> {
        let (reply, response) = bounded(1);
        self.commands
            .send(AudioCommand::Play {
                clip: clip.clone(),
                reply,
            })
            .map_err(|_| PlaybackError::output("audio thread is gone"))?;

        response
            .recv()
            .map_err(|_| PlaybackError::output("audio thread is gone"))?
    }

    fn stop(&self) {
        if self.commands.send(AudioCommand::Stop).is_err() {
            tracing::warn!("Audio thread is gone, nothing to stop");
        }
    }
}

impl Drop for RodioOutput {
    fn drop(&mut self) {
        let _ = self.commands.send(AudioCommand::Shutdown);
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(worker) = worker {
            if worker.join().is_err() {
                tracing::error!("Audio thread panicked");
            }
        }
    }
}

fn audio_thread(commands: &Receiver<AudioCommand>, ready: &Sender<Result<()>>) {
    let (_stream, handle) = match OutputStream::try_default() {
        Ok(stream) => stream,
        Err(e) => {
            let _ = ready.send(Err(PlaybackError::output(format!(
                "failed to open audio device: {e}"
            ))));
            return;
        }
    };
    let _ = ready.send(Ok(()));

    let mut sink: Option<Sink> = None;

    while let Ok(command) = commands.recv() {
        match command {
            AudioCommand::Play { clip, reply } => {
                if let Some(previous) = sink.take() {
                    previous.stop();
                }
                let result = match start_clip(&handle, &clip) {
                    Ok(started) => {
                        sink = Some(started);
                        Ok(())
                    }
                    Err(e) => Err(e),
                };
                let _ = reply.send(result);
            }
            AudioCommand::Stop => {
                if let Some(current) = sink.take() {
                    current.stop();
                }
            }
            AudioCommand::Shutdown => break,
        }
    }

    tracing::debug!("Audio thread stopped");
}

fn start_clip(handle: &OutputStreamHandle, clip: &LocalClip) -> Result<Sink> {
    let source = Decoder::new(Cursor::new(Bytes::clone(&clip.bytes)))
        .map_err(|e| PlaybackError::output(format!("cannot decode {}: {e}", clip.file_id)))?;

    let sink = Sink::try_new(handle)
        .map_err(|e| PlaybackError::output(format!("cannot open sink: {e}")))?;
    sink.append(source.skip_duration(clip.start).take_duration(clip.window));
    sink.play();

    Ok(sink)
}

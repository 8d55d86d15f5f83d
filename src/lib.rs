//! A host-embeddable speech trigger control.
//!
//! The control caches a snapshot of bound property values delivered by a
//! hosting application, exposes a playback state machine as an output, and
//! on trigger performs exactly one synthesis request followed by audio
//! playback. Hosts plug in behind three seams: [`synth::Synthesizer`] for
//! the speech service, [`engine::AudioSink`] for playback, and
//! [`control::HostAdapter`] for output-change notifications.

pub mod config_loader;
pub mod control;
pub mod engine;
pub mod properties;
pub mod state;
pub mod synth;

pub use control::{HostAdapter, Outputs, SpeakTask, SpeechTrigger};
pub use properties::TriggerProperties;
pub use state::PlaybackState;

use thiserror::Error;

/// Everything that can end an utterance early. The control maps any of
/// these onto the `error` playback state and notifies the host.
#[derive(Error, Debug)]
pub enum SpeakError {
    #[error(transparent)]
    Synthesis(#[from] synth::SynthError),

    #[error(transparent)]
    Playback(#[from] engine::PlaybackError),

    #[error("synthesis timed out after {0}s")]
    Timeout(u64),

    #[error("utterance was cancelled")]
    Cancelled,
}

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::engine::AudioSink;
use crate::properties::TriggerProperties;
use crate::state::PlaybackState;
use crate::synth::{Synthesizer, UtteranceRequest};
use crate::SpeakError;

/// Seam towards the hosting application. The host registers one adapter at
/// construction and pulls `get_outputs()` whenever it is notified.
pub trait HostAdapter: Send + Sync {
    /// Called synchronously whenever an output value changes.
    fn notify_output_changed(&self);
}

/// Output values the host reads back after a change notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outputs {
    pub state: String,
    pub auto_speak: bool,
}

/// Handle on one in-flight utterance: synthesis, playback, and the closing
/// state transition. Awaiting it is optional; the utterance runs to
/// completion on the runtime either way.
pub struct SpeakTask {
    handle: JoinHandle<Result<(), SpeakError>>,
}

impl SpeakTask {
    /// Waits for the utterance to finish playing (or fail).
    pub async fn wait(self) -> Result<(), SpeakError> {
        self.handle.await.unwrap_or(Err(SpeakError::Cancelled))
    }

    /// Abandons the utterance. The playback state is left as-is; a later
    /// update cycle or speak() recovers it.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

/// The trigger control itself: a cached property snapshot, a playback state
/// machine, and one speak operation wired to a synthesizer and an audio sink.
///
/// The host-facing surface (`update`, `speak`, `get_outputs`, `destroy`)
/// mirrors a host control contract's callback sequence; everything
/// host-specific stays behind [`HostAdapter`].
pub struct SpeechTrigger {
    props: TriggerProperties,
    state: Arc<Mutex<PlaybackState>>,
    synth: Arc<dyn Synthesizer>,
    sink: Arc<dyn AudioSink>,
    host: Arc<dyn HostAdapter>,
    synthesis_timeout: Duration,
}

/// Bound on how long a single synthesis request may take before the
/// utterance fails over to the error state.
pub const DEFAULT_SYNTHESIS_TIMEOUT: Duration = Duration::from_secs(30);

impl SpeechTrigger {
    pub fn new(
        synth: Arc<dyn Synthesizer>,
        sink: Arc<dyn AudioSink>,
        host: Arc<dyn HostAdapter>,
    ) -> Self {
        Self::with_timeout(synth, sink, host, DEFAULT_SYNTHESIS_TIMEOUT)
    }

    pub fn with_timeout(
        synth: Arc<dyn Synthesizer>,
        sink: Arc<dyn AudioSink>,
        host: Arc<dyn HostAdapter>,
        synthesis_timeout: Duration,
    ) -> Self {
        Self {
            props: TriggerProperties::default(),
            state: Arc::new(Mutex::new(PlaybackState::Waiting)),
            synth,
            sink,
            host,
            synthesis_timeout,
        }
    }

    /// Host update cycle.
    ///
    /// If every incoming value equals the cached snapshot the call does no
    /// work at all: hosts deliver updates for unrelated reasons (container
    /// resize, metadata), and those must not disturb playback. Otherwise the
    /// whole snapshot is adopted before anything else happens, the cached
    /// machine state is overwritten from the incoming state string, and an
    /// armed auto-speak flag fires the trigger exactly once.
    pub fn update(&mut self, incoming: TriggerProperties) -> Option<SpeakTask> {
        if incoming == self.props {
            debug!("update: no bound value changed, ignoring the call");
            return None;
        }

        let forced = PlaybackState::parse(&incoming.state);
        self.props = incoming;
        *self.state.lock().unwrap() = forced;

        if self.props.auto_speak {
            return self.speak();
        }
        None
    }

    /// Triggers one utterance from the cached snapshot.
    ///
    /// Silent no-op (returns `None`) when the text is empty or an utterance
    /// is already in flight. On acceptance the state flips to speaking and
    /// the host is notified before the synthesis request is dispatched, so
    /// it can disable reentrant triggers immediately. The utterance itself
    /// runs on the ambient tokio runtime.
    pub fn speak(&mut self) -> Option<SpeakTask> {
        if self.props.text.is_empty() {
            return None;
        }
        if !self.state.lock().unwrap().try_begin() {
            debug!("speak: already speaking, ignoring the trigger");
            return None;
        }

        // The flag is consumed by the accepted trigger; the host reads it
        // back as false on the next get_outputs().
        self.props.auto_speak = false;
        self.host.notify_output_changed();

        info!(voice = %self.props.voice, chars = self.props.text.len(), "speak triggered");

        let request =
            UtteranceRequest::new(&self.props.text, &self.props.language, &self.props.voice);
        let state = Arc::clone(&self.state);
        let host = Arc::clone(&self.host);
        let synth = Arc::clone(&self.synth);
        let sink = Arc::clone(&self.sink);
        let timeout = self.synthesis_timeout;

        let handle = tokio::spawn(async move {
            let result = run_utterance(synth, sink, request, timeout).await;
            {
                let mut st = state.lock().unwrap();
                match &result {
                    Ok(()) => st.complete(),
                    Err(e) => {
                        warn!("utterance failed: {e}");
                        st.fail();
                    }
                }
            }
            host.notify_output_changed();
            result
        });

        Some(SpeakTask { handle })
    }

    pub fn get_outputs(&self) -> Outputs {
        Outputs {
            state: self.state.lock().unwrap().as_str().to_string(),
            auto_speak: self.props.auto_speak,
        }
    }

    /// Host teardown. No cleanup is performed: an in-flight utterance keeps
    /// running on the runtime (callers that want cancellation hold the
    /// [`SpeakTask`] and abort it).
    pub fn destroy(self) {}
}

async fn run_utterance(
    synth: Arc<dyn Synthesizer>,
    sink: Arc<dyn AudioSink>,
    request: UtteranceRequest,
    timeout: Duration,
) -> Result<(), SpeakError> {
    let audio = tokio::time::timeout(timeout, synth.synthesize(&request))
        .await
        .map_err(|_| SpeakError::Timeout(timeout.as_secs()))??;
    sink.play(audio).await?;
    Ok(())
}

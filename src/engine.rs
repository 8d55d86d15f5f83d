use std::io::Cursor;
use std::sync::mpsc::{channel, Sender};
use std::thread;

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("no audio output device: {0}")]
    Device(String),

    #[error("failed to decode audio payload: {0}")]
    Decode(String),

    #[error("audio thread is gone")]
    ChannelClosed,
}

/// Playback seam for the control. `play` resolves when the utterance has
/// finished playing, which is what drives the speaking→idle transition.
#[async_trait]
pub trait AudioSink: Send + Sync {
    async fn play(&self, audio: Vec<u8>) -> Result<(), PlaybackError>;
}

struct PlaybackJob {
    audio: Vec<u8>,
    done: tokio::sync::oneshot::Sender<Result<(), PlaybackError>>,
}

/// Plays opaque audio payloads through the default output device.
///
/// The rodio output stream is not `Send`, so it lives on a dedicated thread;
/// utterances are handed over a channel and completion comes back over a
/// oneshot. The control never queues more than one utterance at a time, so
/// the thread playing each job to the end is the natural serialization point.
#[derive(Clone)]
pub struct RodioSink {
    tx: Sender<PlaybackJob>,
}

impl RodioSink {
    pub fn new() -> Self {
        let (tx, rx) = channel::<PlaybackJob>();

        thread::spawn(move || {
            // Audio stream must live on this thread
            let (_stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("no audio output device available: {e}");
                    let msg = e.to_string();
                    while let Ok(job) = rx.recv() {
                        let _ = job.done.send(Err(PlaybackError::Device(msg.clone())));
                    }
                    return;
                }
            };

            while let Ok(job) = rx.recv() {
                debug!(bytes = job.audio.len(), "playing audio payload");
                let _ = job.done.send(play_to_end(&handle, job.audio));
            }
        });

        Self { tx }
    }
}

impl Default for RodioSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioSink for RodioSink {
    async fn play(&self, audio: Vec<u8>) -> Result<(), PlaybackError> {
        let (done_tx, done_rx) = tokio::sync::oneshot::channel();
        self.tx
            .send(PlaybackJob {
                audio,
                done: done_tx,
            })
            .map_err(|_| PlaybackError::ChannelClosed)?;
        done_rx.await.map_err(|_| PlaybackError::ChannelClosed)?
    }
}

fn play_to_end(handle: &OutputStreamHandle, audio: Vec<u8>) -> Result<(), PlaybackError> {
    use rodio::Source;

    let source = decode(audio)?;
    let sink = Sink::try_new(handle).map_err(|e| PlaybackError::Device(e.to_string()))?;
    sink.append(source.convert_samples::<f32>());
    // Block this thread until the device has drained the utterance; the
    // caller is parked on the oneshot, not on this thread.
    sink.sleep_until_end();
    Ok(())
}

fn decode(audio: Vec<u8>) -> Result<Decoder<Cursor<Vec<u8>>>, PlaybackError> {
    Decoder::new(Cursor::new(audio)).map_err(|e| PlaybackError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wav_fixture() -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 24000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for i in 0..240 {
                writer.write_sample((i * 64) as i16).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn decodes_a_riff_payload() {
        assert!(decode(wav_fixture()).is_ok());
    }

    #[test]
    fn rejects_a_non_audio_payload() {
        let err = decode(b"definitely not audio".to_vec()).unwrap_err();
        assert!(matches!(err, PlaybackError::Decode(_)));
    }

    #[test]
    fn rejects_an_empty_payload() {
        assert!(matches!(
            decode(Vec::new()).unwrap_err(),
            PlaybackError::Decode(_)
        ));
    }
}

use std::fmt;

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};

use crate::assets::SoundClip;

/// Playback volume for every cue.
const VOLUME: f32 = 0.3;

/// Owns the audio device and the one sink that may be playing.
pub struct AudioOutput {
    // Dropping the stream closes the device.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    current: Option<Sink>,
}

impl AudioOutput {
    /// Open the default output device.
    pub fn open() -> Result<Self, AudioInitError> {
        let (stream, handle) = OutputStream::try_default().map_err(AudioInitError)?;
        log::info!("Audio output opened");
        Ok(Self {
            _stream: stream,
            handle,
            current: None,
        })
    }

    /// Play `clip`, cutting off whatever is still playing.
    pub fn play(&mut self, clip: &SoundClip) {
        if let Some(previous) = self.current.take() {
            if !previous.empty() {
                previous.stop();
            }
        }

        let sink = match Sink::try_new(&self.handle) {
            Ok(sink) => sink,
            Err(e) => {
                log::warn!("Failed to create audio sink: {e}");
                return;
            }
        };
        sink.set_volume(VOLUME);
        sink.append(SamplesBuffer::new(
            clip.channels,
            clip.sample_rate,
            clip.samples.clone(),
        ));
        self.current = Some(sink);
    }
}

/// The audio output device could not be opened.
#[derive(Debug)]
pub struct AudioInitError(rodio::StreamError);

impl fmt::Display for AudioInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to open audio output: {}", self.0)
    }
}

impl std::error::Error for AudioInitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

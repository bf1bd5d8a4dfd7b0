//! Audio output for track previews
//!
//! `MediaOutput` is the seam the playback engine drives. `RodioOutput`
//! downloads the preview over HTTP and plays it through rodio on a
//! dedicated thread, since the rodio output stream cannot leave the
//! thread that opened it.

use std::io::Cursor;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::error::{AppError, Result};

const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Notifications emitted by a media output. Every event names the source
/// it belongs to so late events for a replaced source can be ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaEvent {
    Loaded { src: String, duration_ms: Option<u64> },
    TimeUpdate { src: String, position_ms: u64 },
    Ended { src: String },
    Error { src: String, message: String },
}

impl MediaEvent {
    pub fn src(&self) -> &str {
        match self {
            MediaEvent::Loaded { src, .. }
            | MediaEvent::TimeUpdate { src, .. }
            | MediaEvent::Ended { src }
            | MediaEvent::Error { src, .. } => src,
        }
    }
}

/// A single playable output. Loading replaces whatever was loaded before.
pub trait MediaOutput: Send {
    fn load(&mut self, src: &str) -> Result<()>;
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    /// Seek back to 0 and keep the current play/pause intent
    fn restart(&mut self) -> Result<()>;
    /// Volume as a 0.0-1.0 gain
    fn set_volume(&mut self, volume: f32);
}

pub type MediaListener = Arc<dyn Fn(MediaEvent) + Send + Sync>;

enum AudioCommand {
    Load(String),
    Attach { src: String, bytes: Arc<[u8]> },
    Play,
    Pause,
    Restart,
    Volume(f32),
    Shutdown,
}

pub struct RodioOutput {
    commands: Sender<AudioCommand>,
    http_client: reqwest::Client,
    runtime: tokio::runtime::Handle,
    listener: MediaListener,
}

impl RodioOutput {
    /// Start the audio thread. Must be called from within a tokio runtime,
    /// which is used for preview downloads.
    pub fn new(http_client: reqwest::Client, listener: MediaListener) -> Result<Self> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| AppError::MediaLoadFailure(format!("no async runtime: {}", e)))?;

        let (tx, rx) = mpsc::channel();
        let thread_listener = listener.clone();
        thread::Builder::new()
            .name("audio".to_string())
            .spawn(move || run_audio_thread(rx, thread_listener))
            .map_err(|e| AppError::MediaLoadFailure(format!("failed to start audio thread: {}", e)))?;

        Ok(Self {
            commands: tx,
            http_client,
            runtime,
            listener,
        })
    }

    fn send(&self, command: AudioCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| AppError::MediaLoadFailure("audio thread stopped".to_string()))
    }
}

impl MediaOutput for RodioOutput {
    fn load(&mut self, src: &str) -> Result<()> {
        self.send(AudioCommand::Load(src.to_string()))?;

        let http = self.http_client.clone();
        let commands = self.commands.clone();
        let listener = self.listener.clone();
        let src = src.to_string();
        self.runtime.spawn(async move {
            tracing::debug!(src = %src, "Fetching preview");
            match fetch_preview(&http, &src).await {
                Ok(bytes) => {
                    let _ = commands.send(AudioCommand::Attach { src, bytes });
                }
                Err(e) => {
                    tracing::warn!(src = %src, error = %e, "Preview download failed");
                    listener(MediaEvent::Error { src, message: e.to_string() });
                }
            }
        });
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.send(AudioCommand::Play)
    }

    fn pause(&mut self) {
        let _ = self.send(AudioCommand::Pause);
    }

    fn restart(&mut self) -> Result<()> {
        self.send(AudioCommand::Restart)
    }

    fn set_volume(&mut self, volume: f32) {
        let _ = self.send(AudioCommand::Volume(volume));
    }
}

impl Drop for RodioOutput {
    fn drop(&mut self) {
        let _ = self.commands.send(AudioCommand::Shutdown);
    }
}

async fn fetch_preview(http: &reqwest::Client, src: &str) -> Result<Arc<[u8]>> {
    let response = http.get(src).send().await?.error_for_status()?;
    let bytes = response.bytes().await?;
    Ok(Arc::from(bytes.as_ref()))
}

/// State owned by the audio thread
struct AudioThread {
    handle: Option<OutputStreamHandle>,
    listener: MediaListener,
    src: Option<String>,
    bytes: Option<Arc<[u8]>>,
    sink: Option<Sink>,
    want_playing: bool,
    ended: bool,
    volume: f32,
}

fn run_audio_thread(rx: Receiver<AudioCommand>, listener: MediaListener) {
    // The stream stops playing when dropped, keep it alive for the thread
    let (_stream, handle) = match OutputStream::try_default() {
        Ok((stream, handle)) => (Some(stream), Some(handle)),
        Err(e) => {
            tracing::error!(error = %e, "No audio output device available");
            (None, None)
        }
    };

    let mut state = AudioThread {
        handle,
        listener,
        src: None,
        bytes: None,
        sink: None,
        want_playing: false,
        ended: false,
        volume: 1.0,
    };

    loop {
        match rx.recv_timeout(TICK_INTERVAL) {
            Ok(AudioCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            Ok(command) => state.handle_command(command),
            Err(RecvTimeoutError::Timeout) => {}
        }
        state.tick();
    }

    tracing::debug!("Audio thread stopped");
}

impl AudioThread {
    fn handle_command(&mut self, command: AudioCommand) {
        match command {
            AudioCommand::Load(src) => {
                if let Some(sink) = self.sink.take() {
                    sink.stop();
                }
                self.src = Some(src);
                self.bytes = None;
                self.want_playing = false;
                self.ended = false;
            }
            AudioCommand::Attach { src, bytes } => {
                if self.src.as_deref() != Some(src.as_str()) {
                    tracing::debug!(src = %src, "Discarding download for replaced source");
                    return;
                }
                self.bytes = Some(bytes);
                self.start_from_beginning();
            }
            AudioCommand::Play => {
                self.want_playing = true;
                if let Some(sink) = &self.sink {
                    sink.play();
                }
            }
            AudioCommand::Pause => {
                self.want_playing = false;
                if let Some(sink) = &self.sink {
                    sink.pause();
                }
            }
            AudioCommand::Restart => {
                if self.bytes.is_some() {
                    self.start_from_beginning();
                }
            }
            AudioCommand::Volume(volume) => {
                self.volume = volume;
                if let Some(sink) = &self.sink {
                    sink.set_volume(volume);
                }
            }
            AudioCommand::Shutdown => {}
        }
    }

    fn start_from_beginning(&mut self) {
        let (Some(src), Some(bytes)) = (self.src.clone(), self.bytes.clone()) else {
            return;
        };

        let Some(handle) = &self.handle else {
            self.emit(MediaEvent::Error { src, message: "no audio output device".to_string() });
            return;
        };

        let sink = match Sink::try_new(handle) {
            Ok(sink) => sink,
            Err(e) => {
                self.emit(MediaEvent::Error { src, message: e.to_string() });
                return;
            }
        };

        let source = match Decoder::new(Cursor::new(bytes)) {
            Ok(source) => source,
            Err(e) => {
                self.emit(MediaEvent::Error { src, message: format!("unsupported audio: {}", e) });
                return;
            }
        };

        let duration_ms = source.total_duration().map(|d| d.as_millis() as u64);
        sink.set_volume(self.volume);
        sink.append(source);
        if !self.want_playing {
            sink.pause();
        }

        if let Some(old) = self.sink.replace(sink) {
            old.stop();
        }
        self.ended = false;
        self.emit(MediaEvent::Loaded { src, duration_ms });
    }

    fn tick(&mut self) {
        let (Some(sink), Some(src)) = (&self.sink, &self.src) else {
            return;
        };
        if self.ended || !self.want_playing {
            return;
        }

        if sink.empty() {
            self.ended = true;
            let src = src.clone();
            self.emit(MediaEvent::Ended { src });
        } else {
            let position_ms = sink.get_pos().as_millis() as u64;
            let src = src.clone();
            self.emit(MediaEvent::TimeUpdate { src, position_ms });
        }
    }

    fn emit(&self, event: MediaEvent) {
        (self.listener)(event);
    }
}

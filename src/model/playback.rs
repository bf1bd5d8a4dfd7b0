//! Playback state and the engine that owns the media output

use crate::audio::{MediaEvent, MediaOutput};
use crate::error::AppError;

use super::track::Track;

pub const MAX_VOLUME: u8 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TransportState {
    #[default]
    Idle,
    Paused,
    Playing,
}

/// Snapshot of everything the player bar renders
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaybackState {
    pub current: Option<Track>,
    pub transport: TransportState,
    pub position_ms: u64,
    /// Unknown until the media reports it
    pub duration_ms: Option<u64>,
    pub volume: u8,
    pub shuffle: bool,
    pub repeat: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current: None,
            transport: TransportState::Idle,
            position_ms: 0,
            duration_ms: None,
            volume: MAX_VOLUME,
            shuffle: false,
            repeat: false,
        }
    }
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        self.transport == TransportState::Playing
    }

    /// Progress in [0, 1] for the gauge
    pub fn progress_ratio(&self) -> f64 {
        match self.duration_ms {
            Some(duration) if duration > 0 => (self.position_ms as f64 / duration as f64).min(1.0),
            _ => 0.0,
        }
    }
}

/// What the player must do after the current track finished
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndOfTrack {
    /// Repeat is on; the same track is already playing again from 0
    Restarted,
    /// The queue has to pick the next track
    Advance,
}

/// Clamp a requested volume into [0, 100].
pub fn clamp_volume(volume: i64) -> u8 {
    volume.clamp(0, MAX_VOLUME as i64) as u8
}

/// Sole owner of the media output. Every output call goes through here.
pub struct PlaybackEngine {
    state: PlaybackState,
    output: Box<dyn MediaOutput>,
    loaded_src: Option<String>,
}

impl PlaybackEngine {
    pub fn new(output: Box<dyn MediaOutput>, volume: i64) -> Self {
        let mut engine = Self {
            state: PlaybackState::default(),
            output,
            loaded_src: None,
        };
        engine.set_volume(volume);
        engine
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn current(&self) -> Option<&Track> {
        self.state.current.as_ref()
    }

    /// Play `track`. A new source starts from 0; the loaded source toggles.
    pub fn load_and_play(&mut self, track: &Track) {
        let Some(src) = track.preview_url.clone() else {
            tracing::warn!(track_id = %track.id, "Track has no preview");
            self.pause();
            return;
        };

        if self.loaded_src.as_deref() == Some(src.as_str()) {
            self.toggle();
            return;
        }

        tracing::info!(track_id = %track.id, title = %track.title, "Loading track");
        self.state.current = Some(track.clone());
        self.state.position_ms = 0;
        self.state.duration_ms = None;
        self.loaded_src = Some(src.clone());

        if let Err(e) = self.output.load(&src) {
            self.on_failure(e);
            return;
        }
        self.start_output();
    }

    pub fn pause(&mut self) {
        if self.state.transport != TransportState::Playing {
            return;
        }
        self.output.pause();
        self.state.transport = TransportState::Paused;
    }

    pub fn resume(&mut self) {
        if self.state.transport != TransportState::Paused {
            return;
        }
        self.start_output();
    }

    pub fn toggle(&mut self) {
        match self.state.transport {
            TransportState::Idle => {}
            TransportState::Paused => self.resume(),
            TransportState::Playing => self.pause(),
        }
    }

    /// Replay the loaded track from 0. A track whose source failed is
    /// fetched again.
    pub fn restart(&mut self) {
        if self.loaded_src.is_none() {
            if let Some(track) = self.state.current.clone() {
                self.load_and_play(&track);
            }
            return;
        }
        self.state.position_ms = 0;
        if let Err(e) = self.output.restart() {
            self.on_failure(e);
            return;
        }
        self.start_output();
    }

    pub fn set_volume(&mut self, volume: i64) -> u8 {
        let volume = clamp_volume(volume);
        self.state.volume = volume;
        self.output.set_volume(volume as f32 / MAX_VOLUME as f32);
        volume
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        self.state.shuffle = !self.state.shuffle;
        self.state.shuffle
    }

    pub fn toggle_repeat(&mut self) -> bool {
        self.state.repeat = !self.state.repeat;
        self.state.repeat
    }

    pub fn on_position_tick(&mut self, position_ms: u64) {
        if self.state.transport != TransportState::Playing {
            return;
        }
        self.state.position_ms = match self.state.duration_ms {
            Some(duration) => position_ms.min(duration),
            None => position_ms,
        };
    }

    pub fn on_duration(&mut self, duration_ms: u64) {
        self.state.duration_ms = Some(duration_ms);
        self.state.position_ms = self.state.position_ms.min(duration_ms);
    }

    pub fn on_track_ended(&mut self) -> EndOfTrack {
        if self.state.repeat {
            tracing::debug!("Repeat on, restarting track");
            self.restart();
            EndOfTrack::Restarted
        } else {
            EndOfTrack::Advance
        }
    }

    pub fn on_media_error(&mut self, message: &str) {
        self.on_failure(AppError::MediaLoadFailure(message.to_string()));
    }

    /// True if the event belongs to the loaded source.
    pub fn is_current(&self, event: &MediaEvent) -> bool {
        self.loaded_src.as_deref() == Some(event.src())
    }

    fn start_output(&mut self) {
        match self.output.play() {
            Ok(()) => self.state.transport = TransportState::Playing,
            Err(e) => self.on_failure(e),
        }
    }

    /// The track stays on the bar, but its source is forgotten so the next
    /// play refetches it instead of resuming a sink that never loaded.
    fn on_failure(&mut self, error: AppError) {
        tracing::error!(error = %error, "Playback failed");
        self.loaded_src = None;
        if self.state.current.is_some() {
            self.state.transport = TransportState::Paused;
        }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::sync::{Arc, Mutex};

    use crate::audio::MediaOutput;
    use crate::error::{AppError, Result};

    /// Records every call made to the output
    #[derive(Clone, Default)]
    pub struct MockOutput {
        pub calls: Arc<Mutex<Vec<String>>>,
        pub fail_play: Arc<Mutex<bool>>,
    }

    impl MockOutput {
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl MediaOutput for MockOutput {
        fn load(&mut self, src: &str) -> Result<()> {
            self.record(format!("load {}", src));
            Ok(())
        }

        fn play(&mut self) -> Result<()> {
            if *self.fail_play.lock().unwrap() {
                return Err(AppError::MediaLoadFailure("blocked".into()));
            }
            self.record("play".into());
            Ok(())
        }

        fn pause(&mut self) {
            self.record("pause".into());
        }

        fn restart(&mut self) -> Result<()> {
            self.record("restart".into());
            Ok(())
        }

        fn set_volume(&mut self, volume: f32) {
            self.record(format!("volume {:.2}", volume));
        }
    }
}

//! Playback control, likes and fullscreen

use crate::audio::MediaEvent;
use crate::error::AppError;
use crate::model::{liked_songs_collection, LikeChange, PendingLike, Track};

use super::{AppController, AppEvent};

const VOLUME_STEP: i64 = 5;
const LIKED_AT: &str = "likedAt";

impl AppController {
    /// Play `track`, replacing the queue when a context is given.
    pub(crate) fn play_track(&mut self, track: &Track, context: Option<Vec<Track>>) {
        tracing::debug!(track_id = %track.id, with_context = context.is_some(), "Play track");
        self.model.player.play_track(track, context);
    }

    pub(crate) fn toggle_playback(&mut self) {
        self.model.player.engine.toggle();
    }

    pub(crate) fn next_track(&mut self) {
        self.model.player.next(&self.model.content.playlists, &mut self.rng);
    }

    pub(crate) fn previous_track(&mut self) {
        self.model.player.previous();
    }

    pub(crate) fn toggle_shuffle(&mut self) {
        let shuffle = self.model.player.engine.toggle_shuffle();
        tracing::info!(shuffle, "Shuffle toggled");
    }

    pub(crate) fn toggle_repeat(&mut self) {
        let repeat = self.model.player.engine.toggle_repeat();
        tracing::info!(repeat, "Repeat toggled");
    }

    pub(crate) fn change_volume(&mut self, up: bool) {
        let current = self.model.player.state().volume as i64;
        let delta = if up { VOLUME_STEP } else { -VOLUME_STEP };
        let volume = self.model.player.engine.set_volume(current + delta);
        tracing::debug!(volume, "Volume changed");
    }

    /// Like or unlike `track`. The liked set updates immediately; the store
    /// write is confirmed or reverted through `AppEvent::LikeWritten`.
    pub(crate) fn toggle_like(&mut self, track: &Track) {
        let pending = match self.model.library.toggle_like(track) {
            Ok(pending) => pending,
            Err(e) => {
                if e == AppError::NotAuthenticated {
                    self.model.views.profile_panel = true;
                }
                self.report_error(&e);
                return;
            }
        };

        let store = self.store.clone();
        let events = self.events.clone();
        let collection = liked_songs_collection(&self.config.storage.app_id, &pending.uid);
        tokio::spawn(async move {
            let result = match &pending.change {
                LikeChange::Added(track) => match serde_json::to_value(track) {
                    Ok(body) => store.set(&collection, &track.id, body, Some(LIKED_AT)).await,
                    Err(e) => Err(AppError::Storage(e.to_string())),
                },
                LikeChange::Removed(track) => store.delete(&collection, &track.id).await,
            };
            Self::send(&events, AppEvent::LikeWritten { pending, result });
        });
    }

    pub(crate) fn toggle_like_current(&mut self) {
        if let Some(track) = self.model.player.state().current.clone() {
            self.toggle_like(&track);
        }
    }

    pub(crate) fn on_like_written(&mut self, pending: PendingLike, result: crate::error::Result<()>) {
        match result {
            Ok(()) => {
                let message = match pending.change {
                    LikeChange::Added(_) => "Added to Library",
                    LikeChange::Removed(_) => "Removed from Library",
                };
                self.model.notify_success(message);
            }
            Err(e) => {
                self.model.library.revert(&pending);
                self.report_error(&e);
            }
        }
    }

    /// Enter or leave the fullscreen player. Native fullscreen is asked for
    /// first; if the platform refuses, only the in-app flag changes.
    pub(crate) fn toggle_fullscreen(&mut self) {
        let enter = !self.model.views.fullscreen;
        let result = if enter {
            self.fullscreen.request_enter()
        } else {
            self.fullscreen.request_exit()
        };

        if let Err(e) = result {
            tracing::debug!(error = %e, enter, "Native fullscreen unavailable, using in-app player");
            self.model.views.fullscreen = enter;
        }
    }

    /// Terminal size changes feed fullscreen exit detection.
    pub fn on_resize(&mut self, cols: u16, rows: u16) {
        self.fullscreen.on_resize(cols, rows);
    }

    pub(crate) fn on_media_event(&mut self, event: MediaEvent) {
        if !self.model.player.engine.is_current(&event) {
            tracing::trace!(src = event.src(), "Ignoring media event for replaced source");
            return;
        }

        match event {
            MediaEvent::Loaded { duration_ms, .. } => {
                if let Some(duration_ms) = duration_ms {
                    self.model.player.engine.on_duration(duration_ms);
                }
            }
            MediaEvent::TimeUpdate { position_ms, .. } => {
                self.model.player.engine.on_position_tick(position_ms);
            }
            MediaEvent::Ended { .. } => {
                tracing::debug!("Track ended");
                self.model
                    .player
                    .on_track_ended(&self.model.content.playlists, &mut self.rng);
            }
            MediaEvent::Error { message, .. } => {
                self.model.player.engine.on_media_error(&message);
                self.report_error(&AppError::MediaLoadFailure(message));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{FakeFullscreen, Harness};
    use super::*;
    use crate::model::track::sample_track;
    use crate::model::{NotificationKind, TransportState};

    #[tokio::test]
    async fn test_guest_like_opens_profile() {
        let mut harness = Harness::new(FakeFullscreen::default());
        harness.controller.toggle_like(&sample_track("a"));

        let model = &harness.controller.model;
        assert!(!model.library.is_liked("a"));
        assert!(model.views.profile_panel);
        assert_eq!(
            model.notification.as_ref().unwrap().message,
            "Please sign in to like songs"
        );
    }

    #[tokio::test]
    async fn test_member_like_round_trip() {
        let mut harness = Harness::new(FakeFullscreen::default());
        harness.sign_in_member().await;

        harness.controller.toggle_like(&sample_track("a"));
        assert!(harness.controller.model.library.is_liked("a"));

        harness
            .pump_until(|c| c.model.notification.as_ref().is_some_and(|n| n.message == "Added to Library"))
            .await;
        assert_eq!(harness.controller.model.library.liked_tracks().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_like_write_reverts() {
        let mut harness = Harness::new(FakeFullscreen::default());
        harness.sign_in_member().await;
        harness.controller.toggle_like(&sample_track("a"));
        let pending = PendingLike {
            uid: harness.controller.model.identity.as_ref().unwrap().uid.clone(),
            change: LikeChange::Added(sample_track("a")),
        };

        harness
            .controller
            .on_like_written(pending, Err(AppError::Storage("disk full".into())));
        let model = &harness.controller.model;
        assert!(!model.library.is_liked("a"));
        let notification = model.notification.as_ref().unwrap();
        assert_eq!(notification.message, "Failed to update library");
        assert_eq!(notification.kind, NotificationKind::Error);
    }

    #[tokio::test]
    async fn test_fullscreen_falls_back_to_flag() {
        let mut harness = Harness::new(FakeFullscreen {
            reject: true,
            active: false,
        });
        harness.controller.toggle_fullscreen();
        assert!(harness.controller.model.views.fullscreen);
        harness.controller.toggle_fullscreen();
        assert!(!harness.controller.model.views.fullscreen);
    }

    #[tokio::test]
    async fn test_native_fullscreen_waits_for_confirmation() {
        let mut harness = Harness::new(FakeFullscreen::default());
        harness.controller.toggle_fullscreen();
        assert!(!harness.controller.model.views.fullscreen);
        harness.controller.handle_event(AppEvent::FullscreenChanged(true));
        assert!(harness.controller.model.views.fullscreen);
    }

    #[tokio::test]
    async fn test_stale_media_events_are_ignored() {
        let mut harness = Harness::new(FakeFullscreen::default());
        harness.controller.play_track(&sample_track("a"), Some(vec![sample_track("a"), sample_track("b")]));
        harness.controller.play_track(&sample_track("b"), None);

        harness.controller.on_media_event(MediaEvent::Ended {
            src: "https://audio.example/a.m4a".into(),
        });
        let state = harness.controller.model.player.state();
        assert_eq!(state.current.as_ref().unwrap().id, "b");

        harness.controller.on_media_event(MediaEvent::Error {
            src: "https://audio.example/b.m4a".into(),
            message: "decode".into(),
        });
        assert_eq!(harness.controller.model.player.state().transport, TransportState::Paused);
    }

    #[tokio::test]
    async fn test_failed_track_can_be_played_again() {
        let mut harness = Harness::new(FakeFullscreen::default());
        harness.controller.play_track(&sample_track("a"), None);
        harness.controller.on_media_event(MediaEvent::Error {
            src: "https://audio.example/a.m4a".into(),
            message: "download failed".into(),
        });
        harness.controller.play_track(&sample_track("a"), None);

        let loads = harness
            .output
            .calls()
            .iter()
            .filter(|c| c.as_str() == "load https://audio.example/a.m4a")
            .count();
        assert_eq!(loads, 2);
        assert!(harness.controller.model.player.state().is_playing());
    }

    #[tokio::test]
    async fn test_track_end_advances_queue() {
        let mut harness = Harness::new(FakeFullscreen::default());
        let queue = vec![sample_track("a"), sample_track("b")];
        harness.controller.play_track(&sample_track("a"), Some(queue));
        harness.controller.handle_event(AppEvent::Media(MediaEvent::Ended {
            src: "https://audio.example/a.m4a".into(),
        }));
        assert_eq!(harness.controller.model.player.state().current.as_ref().unwrap().id, "b");
        assert!(harness.output.calls().contains(&"load https://audio.example/b.m4a".to_string()));
    }

    #[tokio::test]
    async fn test_volume_steps_clamp() {
        let mut harness = Harness::new(FakeFullscreen::default());
        harness.controller.change_volume(true);
        assert_eq!(harness.controller.model.player.state().volume, 100);
        for _ in 0..25 {
            harness.controller.change_volume(false);
        }
        assert_eq!(harness.controller.model.player.state().volume, 0);
    }
}

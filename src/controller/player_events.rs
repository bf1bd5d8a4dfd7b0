//! Dispatch of asynchronous events into the model

use super::{AppController, AppEvent};

impl AppController {
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SearchCompleted { request_id, result } => {
                self.on_search_completed(request_id, result);
            }
            AppEvent::TrendingLoaded(result) => self.on_trending_loaded(result),
            AppEvent::RadioLoaded { request_id, result } => {
                self.on_radio_loaded(request_id, result);
            }
            AppEvent::Media(event) => self.on_media_event(event),
            AppEvent::IdentityChanged(identity) => self.on_identity_changed(identity),
            AppEvent::LikedSnapshot { uid, tracks } => {
                if self.model.library.apply_snapshot(&uid, tracks) {
                    self.model.clamp_selection();
                }
            }
            AppEvent::PlaylistsSnapshot(playlists) => self.on_playlists_snapshot(playlists),
            AppEvent::AuthCompleted(result) => self.on_auth_completed(result),
            AppEvent::GuestSignInFailed(e) => {
                tracing::error!(error = %e, "Guest sign-in failed");
                // Let the UI leave the loading screen
                self.model.auth_initialized = true;
                self.model.notify_error("Guest login failed");
            }
            AppEvent::LikeWritten { pending, result } => self.on_like_written(pending, result),
            AppEvent::FullscreenChanged(active) => {
                tracing::debug!(active, "Native fullscreen changed");
                self.model.views.on_native_fullscreen(active);
            }
        }
    }
}

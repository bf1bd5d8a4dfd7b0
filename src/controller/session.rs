//! Identity handling, identity-scoped subscriptions and playlist seeding

use crate::backend::{Document, SessionScope};
use crate::model::{
    liked_songs_collection, public_playlists_collection, Identity, Playlist, Track, SEED_PLAYLISTS,
};

use super::{AppController, AppEvent};

const CREATED_AT: &str = "createdAt";

impl AppController {
    /// Subscribe to identity changes. Without a persisted session the user
    /// starts as a guest.
    pub(crate) fn start_session(&mut self) {
        let events = self.events.clone();
        self.identity_subscription = Some(self.identity.subscribe(Box::new(move |identity| {
            Self::send(&events, AppEvent::IdentityChanged(identity));
        })));

        if self.identity.current().is_some() {
            return;
        }

        let identity = self.identity.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            // Another sign-in may have completed first
            if identity.current().is_some() {
                return;
            }
            if let Err(e) = identity.sign_in_anonymously().await {
                Self::send(&events, AppEvent::GuestSignInFailed(e));
            }
        });
    }

    pub(crate) fn on_identity_changed(&mut self, identity: Option<Identity>) {
        tracing::info!(
            uid = ?identity.as_ref().map(|i| &i.uid),
            anonymous = ?identity.as_ref().map(|i| i.is_anonymous),
            "Identity changed"
        );
        if !self.model.set_identity(identity.clone()) {
            return;
        }

        // Dropping the old scope releases its subscriptions
        self.session = SessionScope::new(identity.as_ref().map(|i| i.uid.clone()));
        let Some(identity) = identity else {
            self.model.content.playlists.clear();
            return;
        };

        self.subscribe_playlists();
        if !identity.is_anonymous {
            self.subscribe_liked_songs(&identity.uid);
        }
    }

    fn subscribe_playlists(&mut self) {
        let collection = public_playlists_collection(&self.config.storage.app_id);
        let events = self.events.clone();
        let subscription = self.store.subscribe(
            &collection,
            Box::new(move |documents| {
                Self::send(&events, AppEvent::PlaylistsSnapshot(parse_playlists(documents)));
            }),
        );
        self.session.hold(subscription);
    }

    fn subscribe_liked_songs(&mut self, uid: &str) {
        let collection = liked_songs_collection(&self.config.storage.app_id, uid);
        let events = self.events.clone();
        let uid = uid.to_string();
        let subscription = self.store.subscribe(
            &collection,
            Box::new(move |documents| {
                Self::send(
                    &events,
                    AppEvent::LikedSnapshot {
                        uid: uid.clone(),
                        tracks: parse_tracks(documents),
                    },
                );
            }),
        );
        self.session.hold(subscription);
    }

    pub(crate) fn on_playlists_snapshot(&mut self, playlists: Vec<Playlist>) {
        tracing::debug!(count = playlists.len(), "Playlists updated");
        if self.model.content.set_playlists(playlists) {
            self.seed_playlists();
        }
        self.model.clamp_selection();
    }

    /// Populate an empty public collection with the default playlists.
    fn seed_playlists(&self) {
        tracing::info!("Playlist collection empty, seeding defaults");
        let search = self.search.clone();
        let store = self.store.clone();
        let collection = public_playlists_collection(&self.config.storage.app_id);
        let limit = self.config.search.seed_limit;

        tokio::spawn(async move {
            // Fetch all seeds at once, then store them in declaration order
            let seeds = &SEED_PLAYLISTS;
            let fetches = seeds.iter().map(|seed| search.search(seed.query, limit));
            let results = futures::future::join_all(fetches).await;

            for (seed, result) in seeds.iter().zip(results) {
                let songs = match result {
                    Ok(songs) if !songs.is_empty() => songs,
                    Ok(_) => continue,
                    Err(e) => {
                        tracing::warn!(title = seed.title, error = %e, "Could not fetch seed songs");
                        continue;
                    }
                };

                let body = match serde_json::to_value(seed.build(songs)) {
                    Ok(body) => body,
                    Err(e) => {
                        tracing::error!(title = seed.title, error = %e, "Could not encode playlist");
                        continue;
                    }
                };
                if let Err(e) = store.add(&collection, body, Some(CREATED_AT)).await {
                    tracing::error!(title = seed.title, error = %e, "Could not store playlist");
                }
            }
        });
    }

    /// Profile panel action: sign out a member, or sign in a guest.
    pub(crate) fn auth_action(&mut self) {
        if self.model.auth_loading {
            return;
        }
        self.model.auth_loading = true;

        let signed_in_member = !self.model.is_guest();
        let identity = self.identity.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = if signed_in_member {
                match identity.sign_out().await {
                    Ok(()) => identity
                        .sign_in_anonymously()
                        .await
                        .map(|_| "Signed out successfully".to_string()),
                    Err(e) => Err(e),
                }
            } else {
                identity
                    .sign_in_federated()
                    .await
                    .map(|user| format!("Welcome, {}!", user.name()))
            };
            Self::send(&events, AppEvent::AuthCompleted(result));
        });
    }

    pub(crate) fn on_auth_completed(&mut self, result: crate::error::Result<String>) {
        self.model.auth_loading = false;
        match result {
            Ok(message) => {
                self.model.views.profile_panel = false;
                self.model.notify_success(message);
            }
            Err(e) => self.report_error(&e),
        }
    }
}

fn parse_tracks(documents: Vec<Document>) -> Vec<Track> {
    documents
        .into_iter()
        .filter_map(|doc| match serde_json::from_value::<Track>(doc.data) {
            Ok(track) => Some(track),
            Err(e) => {
                tracing::warn!(id = %doc.id, error = %e, "Skipping malformed liked song");
                None
            }
        })
        .collect()
}

fn parse_playlists(documents: Vec<Document>) -> Vec<Playlist> {
    documents
        .into_iter()
        .filter_map(|doc| match serde_json::from_value::<Playlist>(doc.data) {
            Ok(playlist) => Some(Playlist { id: doc.id, ..playlist }),
            Err(e) => {
                tracing::warn!(id = %doc.id, error = %e, "Skipping malformed playlist");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{FakeFullscreen, Harness};
    use crate::backend::IdentityProvider;
    use crate::model::track::sample_track;
    use crate::model::NotificationKind;

    #[tokio::test]
    async fn test_startup_signs_in_guest() {
        let mut harness = Harness::new(FakeFullscreen::default());
        harness.controller.start_session();
        harness
            .pump_until(|c| c.model.identity.as_ref().is_some_and(|i| i.is_anonymous))
            .await;
        assert!(harness.controller.model.auth_initialized);
        assert!(harness.controller.model.is_guest());
    }

    #[tokio::test]
    async fn test_empty_playlists_are_seeded_once() {
        let mut harness = Harness::new(FakeFullscreen::default());
        let mut anime = sample_track("1");
        anime.cover = Some("https://img.example/600x600bb.jpg".into());
        harness.respond("anime opening", vec![anime, sample_track("2")]);
        harness.respond("ghibli jazz", vec![sample_track("3")]);

        harness.controller.start_session();
        harness
            .pump_until(|c| c.model.content.playlists.len() == 2)
            .await;

        let playlists = &harness.controller.model.content.playlists;
        assert_eq!(playlists[0].title, "Anime Hits");
        assert_eq!(playlists[0].category, "J-Pop");
        assert_eq!(playlists[0].author, "Music App");
        assert!(playlists[0].created_at.is_some());
        assert!(!playlists[0].id.is_empty());
        assert_eq!(playlists[1].songs.len(), 1);

        let terms = harness.search.terms.lock().unwrap();
        assert_eq!(terms.iter().filter(|t| *t == "anime opening").count(), 1);
    }

    #[tokio::test]
    async fn test_member_sign_in_subscribes_liked_songs() {
        let mut harness = Harness::new(FakeFullscreen::default());
        harness.sign_in_member().await;
        assert!(!harness.controller.model.is_guest());
        // playlists and liked songs
        assert_eq!(harness.controller.session.len(), 2);
    }

    #[tokio::test]
    async fn test_auth_action_signs_in_and_out() {
        let mut harness = Harness::new(FakeFullscreen::default());
        harness.controller.start_session();
        harness
            .pump_until(|c| c.model.identity.as_ref().is_some_and(|i| i.is_anonymous))
            .await;

        harness.controller.auth_action();
        assert!(harness.controller.model.auth_loading);
        harness.pump_until(|c| !c.model.auth_loading).await;
        let notification = harness.controller.model.notification.clone().unwrap();
        assert_eq!(notification.message, "Welcome, Ada!");
        assert_eq!(notification.kind, NotificationKind::Success);

        harness.pump_until(|c| !c.model.is_guest()).await;
        harness.controller.auth_action();
        harness.pump_until(|c| !c.model.auth_loading).await;
        assert_eq!(
            harness.controller.model.notification.as_ref().unwrap().message,
            "Signed out successfully"
        );
        harness.pump_until(|c| c.model.is_guest() && c.model.identity.is_some()).await;
        assert!(harness.identity.current().unwrap().is_anonymous);
    }
}

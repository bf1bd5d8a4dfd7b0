//! Controller module - Application logic and event handling
//!
//! The controller owns the `AppModel` and is the only place that mutates it.
//! Collaborator calls run as spawned tasks and report back through
//! `AppEvent`s, which the main loop feeds into `handle_event`.
//!
//! - `input`: Key event handling
//! - `playback`: Playback, likes and fullscreen
//! - `navigation`: Tabs, search, radio and list activation
//! - `session`: Identity changes, scoped subscriptions and playlist seeding
//! - `player_events`: Dispatch of asynchronous events

mod input;
mod navigation;
mod playback;
mod player_events;
mod session;

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc::UnboundedSender;

use crate::audio::MediaEvent;
use crate::backend::{SessionScope, SharedIdentity, SharedStore, Subscription};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::model::{AppModel, Identity, PendingLike, Playlist, Track};
use crate::platform::FullscreenCapability;
use crate::search::SearchApi;

/// Results delivered to the main loop
#[derive(Debug)]
pub enum AppEvent {
    SearchCompleted { request_id: u64, result: Result<Vec<Track>> },
    TrendingLoaded(Result<Vec<Track>>),
    RadioLoaded { request_id: u64, result: Result<Vec<Track>> },
    Media(MediaEvent),
    IdentityChanged(Option<Identity>),
    LikedSnapshot { uid: String, tracks: Vec<Track> },
    PlaylistsSnapshot(Vec<Playlist>),
    /// Outcome of the profile panel's sign-in/sign-out action
    AuthCompleted(Result<String>),
    GuestSignInFailed(AppError),
    LikeWritten { pending: PendingLike, result: Result<()> },
    FullscreenChanged(bool),
}

/// Collaborators the controller talks to
pub struct Services {
    pub search: Arc<dyn SearchApi>,
    pub identity: SharedIdentity,
    pub store: SharedStore,
    pub fullscreen: Box<dyn FullscreenCapability>,
}

pub struct AppController {
    pub(crate) model: AppModel,
    search: Arc<dyn SearchApi>,
    identity: SharedIdentity,
    store: SharedStore,
    fullscreen: Box<dyn FullscreenCapability>,
    config: Config,
    events: UnboundedSender<AppEvent>,
    identity_subscription: Option<Subscription>,
    session: SessionScope,
    rng: StdRng,
}

impl AppController {
    pub fn new(model: AppModel, services: Services, config: Config, events: UnboundedSender<AppEvent>) -> Self {
        Self {
            model,
            search: services.search,
            identity: services.identity,
            store: services.store,
            fullscreen: services.fullscreen,
            config,
            events,
            identity_subscription: None,
            session: SessionScope::default(),
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn model(&self) -> &AppModel {
        &self.model
    }

    /// Subscribe to identity changes and fetch startup content.
    pub fn start(&mut self) {
        tracing::info!("Starting controller");
        self.start_session();
        self.load_trending();
    }

    /// Periodic housekeeping from the main loop
    pub fn tick(&mut self) {
        self.model.auto_clear_notification();
    }

    pub fn should_quit(&self) -> bool {
        self.model.should_quit
    }

    pub(crate) fn send(events: &UnboundedSender<AppEvent>, event: AppEvent) {
        if events.send(event).is_err() {
            tracing::debug!("Event loop closed, dropping event");
        }
    }

    pub(crate) fn report_error(&mut self, error: &AppError) {
        tracing::warn!(error = %error, "Operation failed");
        self.model.notify_error(error.user_message());
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    use super::*;
    use crate::backend::{IdentityProvider, LocalIdentity, LocalStore};
    use crate::config::AccountConfig;
    use crate::model::{MockOutput, PlaybackEngine, Player};

    /// Canned search responses keyed by term
    #[derive(Default)]
    pub struct FakeSearch {
        pub responses: Mutex<Vec<(String, Vec<Track>)>>,
        pub terms: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SearchApi for FakeSearch {
        async fn search(&self, term: &str, limit: u32) -> Result<Vec<Track>> {
            self.terms.lock().unwrap().push(term.to_string());
            let responses = self.responses.lock().unwrap();
            match responses.iter().find(|(t, _)| t == term) {
                Some((_, tracks)) => Ok(tracks.iter().take(limit as usize).cloned().collect()),
                None => Err(AppError::NetworkFailure(format!("no response for {}", term))),
            }
        }
    }

    #[derive(Default)]
    pub struct FakeFullscreen {
        pub reject: bool,
        pub active: bool,
    }

    impl FullscreenCapability for FakeFullscreen {
        fn request_enter(&mut self) -> Result<()> {
            if self.reject {
                return Err(AppError::Platform("rejected".into()));
            }
            self.active = true;
            Ok(())
        }

        fn request_exit(&mut self) -> Result<()> {
            if self.reject {
                return Err(AppError::Platform("rejected".into()));
            }
            self.active = false;
            Ok(())
        }

        fn is_active(&self) -> bool {
            self.active
        }
    }

    pub struct Harness {
        pub controller: AppController,
        pub events: UnboundedReceiver<AppEvent>,
        pub search: Arc<FakeSearch>,
        pub identity: Arc<LocalIdentity>,
        pub output: MockOutput,
        _dir: tempfile::TempDir,
    }

    impl Harness {
        pub fn new(fullscreen: FakeFullscreen) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let account = AccountConfig {
                display_name: Some("Ada".into()),
                email: Some("ada@example.com".into()),
            };
            let identity = Arc::new(LocalIdentity::new(dir.path(), account));
            let store = Arc::new(LocalStore::new(dir.path()));
            let search = Arc::new(FakeSearch::default());
            let output = MockOutput::default();

            let engine = PlaybackEngine::new(Box::new(output.clone()), 100);
            let model = AppModel::new(Player::new(engine), Duration::from_secs(3));
            let (tx, rx) = mpsc::unbounded_channel();
            let services = Services {
                search: search.clone(),
                identity: identity.clone(),
                store,
                fullscreen: Box::new(fullscreen),
            };
            let mut controller = AppController::new(model, services, Config::default(), tx);
            controller.rng = StdRng::seed_from_u64(11);

            Self {
                controller,
                events: rx,
                search,
                identity,
                output,
                _dir: dir,
            }
        }

        pub fn respond(&self, term: &str, tracks: Vec<Track>) {
            self.search.responses.lock().unwrap().push((term.to_string(), tracks));
        }

        /// Feed events into the controller until `done` holds.
        pub async fn pump_until(&mut self, done: impl Fn(&AppController) -> bool) {
            let deadline = Duration::from_secs(5);
            tokio::time::timeout(deadline, async {
                while !done(&self.controller) {
                    match self.events.recv().await {
                        Some(event) => self.controller.handle_event(event),
                        None => break,
                    }
                }
            })
            .await
            .expect("condition not reached before timeout");
        }

        pub async fn sign_in_member(&mut self) {
            self.controller.start_session();
            self.identity.sign_in_federated().await.unwrap();
            self.pump_until(|c| c.model.identity.as_ref().is_some_and(|i| !i.is_anonymous))
                .await;
        }
    }
}

//! Main application model

use std::time::{Duration, Instant};

use super::content::{ContentState, Station, HOME_GENRES, SEARCH_GENRES, STATIONS};
use super::library::{is_guest, Identity, LibrarySync};
use super::player::Player;
use super::track::Track;
use super::view_state::{ViewState, ViewStateController};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Clone, Debug)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub created: Instant,
}

/// One selectable row in the main content list
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListEntry {
    Genre(&'static str),
    Playlist { id: String, title: String, subtitle: String },
    Track(Track),
    Station(Station),
    Artist { name: String },
}

/// Everything the view renders, owned by the controller
pub struct AppModel {
    pub player: Player,
    pub views: ViewStateController,
    pub library: LibrarySync,
    pub content: ContentState,
    pub identity: Option<Identity>,
    /// False until the identity collaborator reported for the first time
    pub auth_initialized: bool,
    pub auth_loading: bool,
    pub notification: Option<Notification>,
    notification_ttl: Duration,
    pub should_quit: bool,
}

impl AppModel {
    pub fn new(player: Player, notification_ttl: Duration) -> Self {
        Self {
            player,
            views: ViewStateController::new(),
            library: LibrarySync::new(),
            content: ContentState::default(),
            identity: None,
            auth_initialized: false,
            auth_loading: false,
            notification: None,
            notification_ttl,
            should_quit: false,
        }
    }

    // ========================================================================
    // Session
    // ========================================================================

    pub fn is_guest(&self) -> bool {
        is_guest(self.identity.as_ref())
    }

    /// Record a new identity. Returns true if the uid changed, which means
    /// identity-scoped state has to be rebuilt.
    pub fn set_identity(&mut self, identity: Option<Identity>) -> bool {
        self.auth_initialized = true;
        let changed = self.identity.as_ref().map(|i| &i.uid) != identity.as_ref().map(|i| &i.uid);
        if changed {
            self.library.set_identity(identity.as_ref());
        }
        self.identity = identity;

        // Leave locked tabs when signing out
        if self.is_guest() && self.views.view.requires_account() {
            self.views.navigate(ViewState::Home, false);
        }
        changed
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    pub fn notify_success(&mut self, message: impl Into<String>) {
        self.notify(message.into(), NotificationKind::Success);
    }

    pub fn notify_error(&mut self, message: impl Into<String>) {
        self.notify(message.into(), NotificationKind::Error);
    }

    fn notify(&mut self, message: String, kind: NotificationKind) {
        self.notification = Some(Notification {
            message,
            kind,
            created: Instant::now(),
        });
    }

    pub fn auto_clear_notification(&mut self) {
        if let Some(notification) = &self.notification {
            if notification.created.elapsed() >= self.notification_ttl {
                self.notification = None;
            }
        }
    }

    // ========================================================================
    // Content list
    // ========================================================================

    /// Rows of the active view, in display order
    pub fn entries(&self) -> Vec<ListEntry> {
        match &self.views.view {
            ViewState::Home => {
                let mut entries: Vec<ListEntry> = HOME_GENRES.iter().copied().map(ListEntry::Genre).collect();
                entries.extend(self.content.playlists.iter().map(|p| ListEntry::Playlist {
                    id: p.id.clone(),
                    title: p.title.clone(),
                    subtitle: format!("{} · {}", p.category, p.author),
                }));
                entries.extend(self.content.trending.iter().cloned().map(ListEntry::Track));
                entries
            }
            ViewState::Search => {
                let search = &self.content.search;
                if search.results.is_empty() && search.query.trim().is_empty() {
                    SEARCH_GENRES.iter().copied().map(ListEntry::Genre).collect()
                } else {
                    search.results.iter().cloned().map(ListEntry::Track).collect()
                }
            }
            ViewState::Radio => STATIONS.iter().copied().map(ListEntry::Station).collect(),
            ViewState::Library => self.library.liked_tracks().iter().cloned().map(ListEntry::Track).collect(),
            ViewState::Artists => self
                .content
                .artists()
                .into_iter()
                .map(|a| ListEntry::Artist { name: a.name })
                .collect(),
            ViewState::PlaylistDetail(id) => self
                .content
                .playlist(id)
                .map(|p| p.songs.iter().cloned().map(ListEntry::Track).collect())
                .unwrap_or_default(),
        }
    }

    /// Tracks of the active view; used as the queue when one is played
    pub fn visible_tracks(&self) -> Vec<Track> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                ListEntry::Track(track) => Some(track),
                _ => None,
            })
            .collect()
    }

    pub fn selected_entry(&self) -> Option<ListEntry> {
        self.entries().into_iter().nth(self.views.selected)
    }

    pub fn selected_track(&self) -> Option<Track> {
        match self.selected_entry()? {
            ListEntry::Track(track) => Some(track),
            _ => None,
        }
    }

    pub fn move_selection_down(&mut self) {
        let len = self.entries().len();
        self.views.move_down(len);
    }

    pub fn clamp_selection(&mut self) {
        let len = self.entries().len();
        self.views.clamp_selection(len);
    }
}

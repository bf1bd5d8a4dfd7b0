//! Active screen and overlay visibility

/// The screen shown in the main content area
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Home,
    Search,
    Radio,
    Library,
    Artists,
    PlaylistDetail(String),
}

impl ViewState {
    /// Top-level tabs in sidebar order
    pub const TABS: [ViewState; 5] = [
        ViewState::Home,
        ViewState::Search,
        ViewState::Radio,
        ViewState::Library,
        ViewState::Artists,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ViewState::Home => "Home",
            ViewState::Search => "Search",
            ViewState::Radio => "Radio",
            ViewState::Library => "Your Library",
            ViewState::Artists => "Artists",
            ViewState::PlaylistDetail(_) => "Playlist",
        }
    }

    /// Tabs that need a signed-in account
    pub fn requires_account(&self) -> bool {
        matches!(self, ViewState::Library | ViewState::Artists)
    }

    /// The sidebar tab this view belongs to
    pub fn tab_index(&self) -> Option<usize> {
        Self::TABS.iter().position(|t| t == self)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ViewStateController {
    pub view: ViewState,
    pub queue_panel: bool,
    pub fullscreen: bool,
    pub profile_panel: bool,
    pub help: bool,
    pub search_focused: bool,
    /// Highlighted row in the main list
    pub selected: usize,
}

impl ViewStateController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch screens. Locked tabs open the profile panel for guests.
    /// Returns whether the view changed.
    pub fn navigate(&mut self, view: ViewState, is_guest: bool) -> bool {
        if is_guest && view.requires_account() {
            tracing::debug!(view = ?view, "Tab locked for guest");
            self.profile_panel = true;
            return false;
        }
        self.search_focused = view == ViewState::Search && self.view != ViewState::Search;
        self.view = view;
        self.selected = 0;
        true
    }

    pub fn open_playlist(&mut self, playlist_id: &str) {
        self.view = ViewState::PlaylistDetail(playlist_id.to_string());
        self.selected = 0;
        self.search_focused = false;
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self, len: usize) {
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    /// Keep the selection inside a list that may have shrunk.
    pub fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn toggle_queue_panel(&mut self) {
        self.queue_panel = !self.queue_panel;
    }

    pub fn toggle_profile_panel(&mut self) {
        self.profile_panel = !self.profile_panel;
    }

    pub fn toggle_help(&mut self) {
        self.help = !self.help;
    }

    /// Close the topmost overlay. Returns false when nothing was open.
    pub fn close_overlay(&mut self) -> bool {
        if self.help {
            self.help = false;
        } else if self.profile_panel {
            self.profile_panel = false;
        } else if self.queue_panel {
            self.queue_panel = false;
        } else {
            return false;
        }
        true
    }

    /// Mirror a fullscreen change reported by the platform.
    pub fn on_native_fullscreen(&mut self, active: bool) {
        self.fullscreen = active;
    }
}

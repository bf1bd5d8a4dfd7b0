//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (styles, truncation, scrollable lists)
//! - `layout`: Main layout structure (top bar, sidebar)
//! - `content`: Main content area rendering
//! - `progress`: Player bar rendering
//! - `overlays`: Notification, help, profile, queue and fullscreen player

mod content;
mod layout;
mod overlays;
mod progress;
mod utils;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::AppModel;

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, model: &AppModel) {
        if !model.auth_initialized {
            overlays::render_loading_screen(frame);
            return;
        }

        if model.views.fullscreen {
            overlays::render_fullscreen_player(frame, model);
        } else {
            Self::render_main_layout(frame, model);
        }

        if model.notification.is_some() {
            overlays::render_notification(frame, model);
        }

        if model.views.profile_panel {
            overlays::render_profile_panel(frame, model);
        }

        if model.views.help {
            overlays::render_help_popup(frame);
        }
    }

    fn render_main_layout(frame: &mut Frame, model: &AppModel) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search bar + account
                Constraint::Min(0),    // Main content (sidebar + content)
                Constraint::Length(3), // Player bar
            ])
            .split(frame.area());

        layout::render_top_bar(frame, chunks[0], model);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(30), // Sidebar (Menu + Playlists)
                Constraint::Percentage(70), // Main content
            ])
            .split(chunks[1]);

        layout::render_sidebar(frame, main_chunks[0], model);

        if model.views.queue_panel {
            let content_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
                .split(main_chunks[1]);
            content::render_main_content(frame, content_chunks[0], model);
            overlays::render_queue_panel(frame, content_chunks[1], model);
        } else {
            content::render_main_content(frame, main_chunks[1], model);
        }

        let playback = model.player.state();
        let liked = playback
            .current
            .as_ref()
            .is_some_and(|track| model.library.is_liked(&track.id));
        progress::render_progress_bar(frame, chunks[2], playback, liked);
    }
}

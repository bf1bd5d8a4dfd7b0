//! Key event handling

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::ViewState;

use super::AppController;

impl AppController {
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.model.should_quit = true;
            return;
        }

        // Loading screen until the identity is known
        if !self.model.auth_initialized {
            if matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q')) {
                self.model.should_quit = true;
            }
            return;
        }

        if self.model.views.help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H')) {
                self.model.views.toggle_help();
            }
            return;
        }

        if self.model.views.search_focused {
            self.handle_search_input(key);
            return;
        }

        if self.model.views.profile_panel {
            match key.code {
                KeyCode::Enter | KeyCode::Char('a') | KeyCode::Char('A') => self.auth_action(),
                KeyCode::Esc | KeyCode::Char('o') | KeyCode::Char('O') => {
                    self.model.views.profile_panel = false;
                }
                KeyCode::Char('q') | KeyCode::Char('Q') => self.model.should_quit = true,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.model.should_quit = true,
            KeyCode::Char(c @ '1'..='5') => {
                let index = (c as usize) - ('1' as usize);
                self.navigate(ViewState::TABS[index].clone());
            }
            KeyCode::Char('/') => {
                self.navigate(ViewState::Search);
                self.model.views.search_focused = true;
            }
            KeyCode::Up | KeyCode::Char('k') => self.model.views.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.model.move_selection_down(),
            KeyCode::Enter => self.activate_selected(),
            KeyCode::Esc | KeyCode::Backspace => self.go_back(),
            KeyCode::Char(' ') => self.toggle_playback(),
            KeyCode::Char('n') | KeyCode::Char('N') => self.next_track(),
            KeyCode::Char('p') | KeyCode::Char('P') => self.previous_track(),
            KeyCode::Char('s') | KeyCode::Char('S') => self.toggle_shuffle(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.toggle_repeat(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.change_volume(true),
            KeyCode::Char('-') => self.change_volume(false),
            KeyCode::Char('x') | KeyCode::Char('X') => {
                if let Some(track) = self.model.selected_track() {
                    self.toggle_like(&track);
                }
            }
            KeyCode::Char('l') | KeyCode::Char('L') => self.toggle_like_current(),
            KeyCode::Char('g') | KeyCode::Char('G') => self.play_all(),
            KeyCode::Char('f') | KeyCode::Char('F') => self.toggle_fullscreen(),
            KeyCode::Char('u') | KeyCode::Char('U') => self.model.views.toggle_queue_panel(),
            KeyCode::Char('o') | KeyCode::Char('O') => self.model.views.toggle_profile_panel(),
            KeyCode::Char('h') | KeyCode::Char('H') => self.model.views.toggle_help(),
            _ => {}
        }
    }

    fn handle_search_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.model.views.search_focused = false;
                self.submit_search();
            }
            KeyCode::Esc => {
                if self.model.content.search.query.is_empty() {
                    self.model.views.search_focused = false;
                } else {
                    self.clear_search();
                }
            }
            KeyCode::Down | KeyCode::Tab => self.model.views.search_focused = false,
            KeyCode::Backspace => self.model.content.search.backspace(),
            KeyCode::Char(c) => self.model.content.search.push_char(c),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{FakeFullscreen, Harness};
    use super::*;
    use crate::model::track::sample_track;

    fn press(harness: &mut Harness, code: KeyCode) {
        harness
            .controller
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ready() -> Harness {
        let mut harness = Harness::new(FakeFullscreen::default());
        harness.controller.model.auth_initialized = true;
        harness
    }

    #[tokio::test]
    async fn test_keys_ignored_while_loading() {
        let mut harness = Harness::new(FakeFullscreen::default());
        press(&mut harness, KeyCode::Char('3'));
        assert_eq!(harness.controller.model.views.view, ViewState::Home);
        press(&mut harness, KeyCode::Char('q'));
        assert!(harness.controller.should_quit());
    }

    #[tokio::test]
    async fn test_number_keys_switch_tabs() {
        let mut harness = ready();
        press(&mut harness, KeyCode::Char('3'));
        assert_eq!(harness.controller.model.views.view, ViewState::Radio);
        press(&mut harness, KeyCode::Char('1'));
        assert_eq!(harness.controller.model.views.view, ViewState::Home);
    }

    #[tokio::test]
    async fn test_typing_a_search() {
        let mut harness = ready();
        harness.respond("abba", vec![sample_track("1")]);

        press(&mut harness, KeyCode::Char('/'));
        for c in "abba".chars() {
            press(&mut harness, KeyCode::Char(c));
        }
        assert_eq!(harness.controller.model.views.view, ViewState::Search);
        press(&mut harness, KeyCode::Enter);
        assert!(!harness.controller.model.views.search_focused);

        harness.pump_until(|c| !c.model.content.search.results.is_empty()).await;
        assert_eq!(harness.controller.model.content.search.query, "abba");
    }

    #[tokio::test]
    async fn test_playback_keys() {
        let mut harness = ready();
        harness.controller.model.content.trending = vec![sample_track("a"), sample_track("b")];
        for _ in 0..6 {
            press(&mut harness, KeyCode::Down);
        }
        press(&mut harness, KeyCode::Enter);
        assert_eq!(harness.controller.model.player.state().current.as_ref().unwrap().id, "a");

        press(&mut harness, KeyCode::Char('n'));
        assert_eq!(harness.controller.model.player.state().current.as_ref().unwrap().id, "b");

        press(&mut harness, KeyCode::Char(' '));
        assert!(!harness.controller.model.player.state().is_playing());

        press(&mut harness, KeyCode::Char('s'));
        press(&mut harness, KeyCode::Char('r'));
        let state = harness.controller.model.player.state();
        assert!(state.shuffle);
        assert!(state.repeat);
    }

    #[tokio::test]
    async fn test_help_captures_keys() {
        let mut harness = ready();
        press(&mut harness, KeyCode::Char('h'));
        press(&mut harness, KeyCode::Char('3'));
        assert_eq!(harness.controller.model.views.view, ViewState::Home);
        press(&mut harness, KeyCode::Esc);
        assert!(!harness.controller.model.views.help);
    }
}

//! Main content area rendering (genres, playlists, tracks, stations, artists)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, ListItem, Padding, Paragraph},
    Frame,
};

use crate::model::{AppModel, ListEntry, Track, ViewState};

use super::utils::{calculate_num_width, render_scrollable_list, row_style, track_column_widths, truncate_string};

pub fn render_main_content(frame: &mut Frame, area: Rect, model: &AppModel) {
    let title = content_title(model);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding::horizontal(1))
        .border_style(Style::default().fg(Color::Green));

    if let Some(message) = status_message(model) {
        let status = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(status, area);
        return;
    }

    let entries = model.entries();
    let content_width = area.width.saturating_sub(4) as usize;
    let track_count = entries.iter().filter(|e| matches!(e, ListEntry::Track(_))).count();
    let num_width = calculate_num_width(track_count);
    let (title_width, artist_width) = track_column_widths(content_width, num_width);

    let current_id = model.player.state().current.as_ref().map(|t| t.id.as_str());
    let active_station = model.content.radio.active_station;
    let selected = model.views.selected;

    let mut track_number = 0;
    let items: Vec<ListItem> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let is_selected = i == selected;
            match entry {
                ListEntry::Genre(genre) => {
                    ListItem::new(format!(" 🎧 {}", genre)).style(genre_style(is_selected))
                }
                ListEntry::Playlist { title, subtitle, .. } => {
                    let line = format!(" 📁 {}  ({})", title, subtitle);
                    ListItem::new(truncate_string(&line, content_width)).style(row_style(is_selected, false))
                }
                ListEntry::Track(track) => {
                    track_number += 1;
                    let is_playing = current_id == Some(track.id.as_str());
                    let line = track_line(
                        track,
                        track_number,
                        num_width,
                        title_width,
                        artist_width,
                        is_playing,
                        model.library.is_liked(&track.id),
                    );
                    ListItem::new(line).style(row_style(is_selected, is_playing))
                }
                ListEntry::Station(station) => {
                    let tuned = active_station == Some(station.id);
                    let marker = match (tuned, model.content.radio.loading) {
                        (true, true) => " ⏳",
                        (true, false) => " 📻",
                        _ => "",
                    };
                    ListItem::new(format!(" {}{}", station.title, marker)).style(row_style(is_selected, tuned))
                }
                ListEntry::Artist { name } => {
                    ListItem::new(format!(" 🎤 {}", name)).style(row_style(is_selected, false))
                }
            }
        })
        .collect();

    render_scrollable_list(frame, area, items, selected, block);
}

fn content_title(model: &AppModel) -> String {
    match &model.views.view {
        ViewState::PlaylistDetail(id) => match model.content.playlist(id) {
            Some(playlist) => format!(" {} · {} (g to play all) ", playlist.title, playlist.author),
            None => " Playlist ".to_string(),
        },
        ViewState::Search if model.content.search.results.is_empty() => " Browse Genres ".to_string(),
        ViewState::Search => format!(" Results for \"{}\" ", model.content.search.query.trim()),
        view => format!(" {} ", view.title()),
    }
}

/// Placeholder text when the current view has nothing to list
fn status_message(model: &AppModel) -> Option<String> {
    let content = &model.content;
    match &model.views.view {
        ViewState::Search if content.search.searching => Some("Searching...".to_string()),
        ViewState::Search
            if content.search.results.is_empty() && !content.search.query.trim().is_empty() =>
        {
            Some("No results. Try another search.".to_string())
        }
        ViewState::Library if model.library.liked_tracks().is_empty() => {
            Some("No liked songs yet. Press x on a song to like it.".to_string())
        }
        ViewState::Artists if content.playlists.is_empty() => {
            Some("No artists yet. Playlists are still loading.".to_string())
        }
        ViewState::PlaylistDetail(id) => match content.playlist(id) {
            None => Some("Playlist not found".to_string()),
            Some(playlist) if playlist.songs.is_empty() => Some("This playlist is empty".to_string()),
            Some(_) => None,
        },
        _ => None,
    }
}

fn genre_style(selected: bool) -> Style {
    if selected {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Yellow)
    }
}

fn track_line(
    track: &Track,
    number: usize,
    num_width: usize,
    title_width: usize,
    artist_width: usize,
    is_playing: bool,
    is_liked: bool,
) -> String {
    let playing_indicator = if is_playing { "▶" } else { " " };
    let liked_indicator = if is_liked { "💚" } else { "  " };
    format!(
        "{}{:<num_width$}   {}   {}   {}   {:>5}",
        playing_indicator,
        number,
        liked_indicator,
        truncate_string(&track.title, title_width),
        truncate_string(&track.artist, artist_width),
        track.duration,
        num_width = num_width
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::track::sample_track;

    #[test]
    fn test_track_line_markers() {
        let track = sample_track("7");
        let line = track_line(&track, 3, 2, 10, 8, true, true);
        assert!(line.starts_with("▶3 "));
        assert!(line.contains("💚"));
        assert!(line.contains("Song 7"));
        assert!(line.ends_with(" 0:30"));

        let line = track_line(&track, 3, 2, 10, 8, false, false);
        assert!(line.starts_with(" 3 "));
        assert!(!line.contains("💚"));
    }
}

//! Player bar rendering

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::model::{format_duration, PlaybackState, TransportState};

pub fn render_progress_bar(frame: &mut Frame, area: Rect, playback: &PlaybackState, liked: bool) {
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(status_text(playback, liked))
                .title_bottom(Line::from(controls_text(playback)).right_aligned()),
        )
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(playback.progress_ratio())
        .label(time_text(playback));

    frame.render_widget(gauge, area);
}

pub(super) fn status_text(playback: &PlaybackState, liked: bool) -> String {
    let Some(track) = &playback.current else {
        return " No track playing ".to_string();
    };
    let icon = match playback.transport {
        TransportState::Playing => " ▶",
        TransportState::Paused | TransportState::Idle => "⏸ ",
    };
    let heart = if liked { " 💚" } else { "" };
    format!("{} {} | {} ({}){} ", icon, track.title, track.artist, track.album, heart)
}

pub(super) fn controls_text(playback: &PlaybackState) -> String {
    let shuffle = if playback.shuffle { "Shuffle: On" } else { "Shuffle: Off" };
    let repeat = if playback.repeat { "Repeat: On" } else { "Repeat: Off" };
    format!(" {} | {} | Vol: {}% ", shuffle, repeat, playback.volume)
}

pub(super) fn time_text(playback: &PlaybackState) -> String {
    format!(
        "{} / {}",
        format_duration(Some(playback.position_ms)),
        format_duration(playback.duration_ms)
    )
}

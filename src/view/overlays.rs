//! Overlay rendering (notification, help, profile, queue, fullscreen player, loading)

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, ListItem, Padding, Paragraph, Wrap},
    Frame,
};

use crate::model::{AppModel, NotificationKind};

use super::progress::{controls_text, time_text};
use super::utils::{centered_rect, render_scrollable_list, row_style, truncate_string};

/// Bindings shown in the help popup, in display order
const KEYBINDINGS: [(&str, &str); 29] = [
    ("", "── Navigation ──"),
    ("1-5", "Home / Search / Radio / Library / Artists"),
    ("↑ / ↓ or k / j", "Move selection"),
    ("Enter", "Open / Play"),
    ("Backspace / Esc", "Go back / Close"),
    ("/", "Focus search"),
    ("", ""),
    ("", "── Playback ──"),
    ("Space", "Play / Pause"),
    ("N", "Next track"),
    ("P", "Previous track"),
    ("S", "Toggle shuffle"),
    ("R", "Toggle repeat"),
    ("+ / -", "Volume up / down"),
    ("G", "Play all (playlist)"),
    ("", ""),
    ("", "── Library ──"),
    ("X", "Like / Unlike selected"),
    ("L", "Like / Unlike playing"),
    ("", ""),
    ("", "── Panels ──"),
    ("U", "Show queue"),
    ("F", "Fullscreen player"),
    ("O", "Profile / Sign in"),
    ("", ""),
    ("", "── General ──"),
    ("H", "Toggle this help"),
    ("Q", "Quit"),
    ("Ctrl+C", "Quit"),
];

pub fn render_notification(frame: &mut Frame, model: &AppModel) {
    let Some(notification) = &model.notification else {
        return;
    };
    let area = frame.area();

    let (color, title) = match notification.kind {
        NotificationKind::Success => (Color::Green, " Done "),
        NotificationKind::Error => (Color::Red, " Error (Esc to dismiss) "),
    };

    let popup_width = 52.min(area.width.saturating_sub(4));
    let inner_width = popup_width.saturating_sub(4).max(1) as usize;
    let line_count = notification.message.chars().count().div_ceil(inner_width).max(1) as u16;
    let popup_height = (2 + line_count).min(area.height.saturating_sub(4));

    // Bottom-right corner, above the player bar
    let popup_area = Rect {
        x: area.width.saturating_sub(popup_width + 1),
        y: area.height.saturating_sub(popup_height + 4),
        width: popup_width,
        height: popup_height,
    };

    frame.render_widget(Clear, popup_area);

    let widget = Paragraph::new(notification.message.clone())
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(title)
                .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        );

    frame.render_widget(widget, popup_area);
}

pub fn render_help_popup(frame: &mut Frame) {
    let popup_area = centered_rect(frame.area(), 62, KEYBINDINGS.len() as u16 + 2);

    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = KEYBINDINGS
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                // Section header or empty line
                Line::from(Span::styled(
                    format!("{:^38}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>18}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc.to_string(), Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help (H or Esc to close) ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help_text, popup_area);
}

pub fn render_profile_panel(frame: &mut Frame, model: &AppModel) {
    let popup_area = centered_rect(frame.area(), 48, 9);
    frame.render_widget(Clear, popup_area);

    let label = Style::default().fg(Color::DarkGray);
    let mut lines = Vec::new();
    match &model.identity {
        Some(identity) if !identity.is_anonymous => {
            lines.push(Line::from(Span::styled(
                identity.name().to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )));
            if let Some(email) = &identity.email {
                lines.push(Line::from(Span::styled(email.clone(), label)));
            }
            lines.push(Line::from(""));
            lines.push(action_line("Enter", "Sign out"));
        }
        _ => {
            lines.push(Line::from(Span::styled(
                "Browsing as guest",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                "Sign in to like songs and open your library.",
                label,
            )));
            lines.push(Line::from(""));
            lines.push(action_line("Enter", "Sign in"));
        }
    }
    if model.auth_loading {
        lines.push(Line::from(Span::styled("Working...", Style::default().fg(Color::Yellow))));
    }

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Profile (Esc to close) ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .padding(Padding::horizontal(1))
                .style(Style::default().bg(Color::Black)),
        );

    frame.render_widget(panel, popup_area);
}

fn action_line(key: &str, action: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(key.to_string(), Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(action.to_string(), Style::default().fg(Color::White)),
    ])
}

/// Queue side panel; the cursor marks the playing entry
pub fn render_queue_panel(frame: &mut Frame, area: Rect, model: &AppModel) {
    let queue = &model.player.queue;
    let cursor = queue.cursor();
    let width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = queue
        .tracks()
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let is_current = cursor == Some(i);
            let marker = if is_current { "▶ " } else { "  " };
            let line = format!("{}{} - {}", marker, track.title, track.artist);
            ListItem::new(truncate_string(&line, width)).style(row_style(false, is_current))
        })
        .collect();

    let title = format!(" Queue ({}) ", queue.tracks().len());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding::horizontal(1))
        .border_style(Style::default().fg(Color::Cyan));

    if items.is_empty() {
        let empty = Paragraph::new("Queue is empty")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    render_scrollable_list(frame, area, items, cursor.unwrap_or(0), block);
}

pub fn render_fullscreen_player(frame: &mut Frame, model: &AppModel) {
    let area = frame.area();
    frame.render_widget(Clear, area);

    let playback = model.player.state();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(" Now Playing (F or Esc to exit) ")
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Track details
            Constraint::Length(3), // Progress
            Constraint::Length(1), // Controls
        ])
        .split(inner);

    let details = match &playback.current {
        Some(track) => {
            let liked = if model.library.is_liked(&track.id) { "💚 Liked" } else { "" };
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    track.title.clone(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(track.artist.clone(), Style::default().fg(Color::Cyan))),
                Line::from(Span::styled(track.album.clone(), Style::default().fg(Color::DarkGray))),
                Line::from(Span::styled(
                    track.release_date.clone().unwrap_or_default(),
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(""),
                Line::from(Span::styled(liked, Style::default().fg(Color::Green))),
            ]
        }
        None => vec![Line::from(""), Line::from("No track playing")],
    };
    let details = Paragraph::new(details).alignment(Alignment::Center);
    frame.render_widget(details, chunks[0]);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(playback.progress_ratio())
        .label(time_text(playback));
    frame.render_widget(gauge, chunks[1]);

    let controls = Paragraph::new(controls_text(playback))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(controls, chunks[2]);
}

/// Shown until the identity provider reported for the first time
pub fn render_loading_screen(frame: &mut Frame) {
    let popup_area = centered_rect(frame.area(), 40, 5);
    let loading = Paragraph::new(vec![
        Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled("Press q to quit", Style::default().fg(Color::DarkGray))),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title(" Music App "));
    frame.render_widget(loading, popup_area);
}

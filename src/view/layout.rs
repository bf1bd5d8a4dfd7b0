//! Layout rendering (top bar, sidebar)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

use crate::model::{AppModel, ViewState};

use super::utils::{border_style, render_scrollable_list, truncate_string};

pub fn render_top_bar(frame: &mut Frame, area: Rect, model: &AppModel) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Search input
            Constraint::Length(28), // Account
        ])
        .split(area);

    let focused = model.views.search_focused;
    let query = &model.content.search.query;
    let (search_text, search_style) = if query.is_empty() && !focused {
        (
            "Press / to search songs, artists, albums".to_string(),
            Style::default().fg(Color::DarkGray),
        )
    } else if focused {
        (format!("{}▏", query), Style::default().fg(Color::Green))
    } else {
        (query.clone(), Style::default().fg(Color::White))
    };

    let search = Paragraph::new(search_text).style(search_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search ")
            .padding(Padding::horizontal(1))
            .border_style(border_style(focused)),
    );
    frame.render_widget(search, chunks[0]);

    let account = match &model.identity {
        Some(identity) if !identity.is_anonymous => format!("👤 {}", identity.name()),
        _ => "👤 Guest (o to sign in)".to_string(),
    };
    let width = chunks[1].width.saturating_sub(4) as usize;
    let profile = Paragraph::new(truncate_string(&account, width))
        .style(Style::default().fg(Color::Cyan))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Account ")
                .border_style(border_style(model.views.profile_panel)),
        );
    frame.render_widget(profile, chunks[1]);
}

pub fn render_sidebar(frame: &mut Frame, area: Rect, model: &AppModel) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(ViewState::TABS.len() as u16 + 2),
            Constraint::Min(0), // Playlists (fills remaining space)
        ])
        .split(area);

    let is_guest = model.is_guest();
    let active_tab = model.views.view.tab_index();

    let tab_items: Vec<ListItem> = ViewState::TABS
        .iter()
        .enumerate()
        .map(|(i, tab)| {
            let locked = is_guest && tab.requires_account();
            let style = if active_tab == Some(i) {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else if locked {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };
            let lock = if locked { " 🔒" } else { "" };
            ListItem::new(format!("{}  {}{}", i + 1, tab.title(), lock)).style(style)
        })
        .collect();

    let tabs = List::new(tab_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Menu ")
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(tabs, chunks[0]);

    let open_playlist = match &model.views.view {
        ViewState::PlaylistDetail(id) => Some(id.as_str()),
        _ => None,
    };

    let playlists = &model.content.playlists;
    let playlist_items: Vec<ListItem> = playlists
        .iter()
        .map(|playlist| {
            let style = if open_playlist == Some(playlist.id.as_str()) {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(playlist.title.clone()).style(style)
        })
        .collect();

    let selected = open_playlist
        .and_then(|id| playlists.iter().position(|p| p.id == id))
        .unwrap_or(0);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Playlists ")
        .padding(Padding::horizontal(1))
        .border_style(border_style(open_playlist.is_some()));
    render_scrollable_list(frame, chunks[1], playlist_items, selected, block);
}

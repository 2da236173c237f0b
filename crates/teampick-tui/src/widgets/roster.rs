// Roster widget: name entry line and the players entered so far.
//
// Shows the saved-roster offer while the roster is empty and a hint while
// there are too few players to choose captains.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use crate::widgets::scroll_start;
use crate::ViewState;

/// Render the roster panel into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    render_input(frame, sections[0], state);
    render_list(frame, sections[1], state);
}

fn render_input(frame: &mut Frame, area: Rect, state: &ViewState) {
    let line = Line::from(vec![
        Span::styled(" > ", Style::default().fg(Color::Yellow)),
        Span::styled(state.name_input.clone(), Style::default().fg(Color::White)),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]);
    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Add player (Enter)"),
    );
    frame.render_widget(paragraph, area);
}

fn render_list(frame: &mut Frame, area: Rect, state: &ViewState) {
    let players = &state.snapshot.roster;
    let title = format!("Players ({})", players.len());
    let block = Block::default().borders(Borders::ALL).title(title);

    let hints = hint_lines(state);
    if players.is_empty() {
        let paragraph = Paragraph::new(hints).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_rows = (area.height as usize)
        .saturating_sub(2)
        .saturating_sub(hints.len())
        .max(1);
    let start = scroll_start(state.selected, players.len(), visible_rows);

    let mut items: Vec<ListItem> = players
        .iter()
        .enumerate()
        .skip(start)
        .take(visible_rows)
        .map(|(i, player)| {
            let style = if i == state.selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(Span::styled(
                format!(" {:>2}. {}", i + 1, player.name),
                style,
            )))
        })
        .collect();
    items.extend(hints.into_iter().map(ListItem::new));

    frame.render_widget(List::new(items).block(block), area);
}

/// Contextual hints under the player list.
pub fn hint_lines(state: &ViewState) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if state.can_load_saved() {
        lines.push(Line::from(Span::styled(
            saved_roster_offer(state),
            Style::default().fg(Color::Cyan),
        )));
    }
    let needed = state.snapshot.min_players;
    if state.snapshot.roster.len() < needed {
        lines.push(Line::from(Span::styled(
            format!(" Add at least {needed} players to pick captains"),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
        )));
    }
    lines
}

fn saved_roster_offer(state: &ViewState) -> String {
    let saved = &state.saved_roster;
    match saved.saved_at {
        Some(at) => format!(
            " F1: load previous roster ({} players, saved {})",
            saved.names.len(),
            at.format("%Y-%m-%d %H:%M UTC")
        ),
        None => format!(" F1: load previous roster ({} players)", saved.names.len()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

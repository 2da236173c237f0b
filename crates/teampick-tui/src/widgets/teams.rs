// Team widget: one side's captain and drafted players.
//
// The captain is listed first and marked; drafted players follow in pick
// order with their jersey numbers. The panel of the side on the clock is
// highlighted while drafting.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem};
use ratatui::Frame;

use teampick_core::draft::{Phase, Side};

use crate::widgets::pool::format_number;
use crate::widgets::wheel::side_color;
use crate::ViewState;

/// Render one team panel into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState, side: Side) {
    let snapshot = &state.snapshot;
    let on_the_clock = snapshot.phase == Phase::Drafting && snapshot.current_picker == side;

    let mut items = Vec::new();
    match snapshot.captain(side) {
        Some(captain) => items.push(ListItem::new(Line::from(vec![
            Span::styled(" (C) ", Style::default().fg(Color::Yellow)),
            Span::styled(
                captain.name.clone(),
                Style::default()
                    .fg(side_color(side))
                    .add_modifier(Modifier::BOLD),
            ),
        ]))),
        None => items.push(ListItem::new(Span::styled(
            "  No captain yet",
            Style::default().fg(Color::DarkGray),
        ))),
    }
    for player in snapshot.team(side) {
        let number = format_number(snapshot.numbers.get(&player.id).copied());
        items.push(ListItem::new(Line::from(vec![
            Span::styled(format!(" {number:>3} "), Style::default().fg(Color::Gray)),
            Span::styled(player.name.clone(), Style::default().fg(Color::White)),
        ])));
    }

    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(team_title(state, side));
    if on_the_clock {
        block = block.border_style(
            Style::default()
                .fg(side_color(side))
                .add_modifier(Modifier::BOLD),
        );
    }
    frame.render_widget(List::new(items).block(block), area);
}

pub fn team_title(state: &ViewState, side: Side) -> String {
    format!("Team {} ({})", side.label(), state.snapshot.team_size(side))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

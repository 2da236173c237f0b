// Roulette widget: the wheel's segments as a ring of labels.
//
// Segment i covers degrees [i*360/N, (i+1)*360/N) clockwise from the top
// pointer. While a spin animates, the segment under the pointer is
// highlighted; once it stops, the winner line appears underneath.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use teampick_core::draft::Side;
use teampick_core::roulette::{segment_angle, wheel_label};

use crate::widgets::scroll_start;
use crate::ViewState;

/// Render the roulette panel into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let side = state.snapshot.roulette_step.unwrap_or(Side::Messi);
    let title = format!("{} captain roulette", side.label());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(side_color(side)));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(inner);

    render_segments(frame, sections[0], state, side);
    render_footer(frame, sections[1], state);
}

fn render_segments(frame: &mut Frame, area: Rect, state: &ViewState, side: Side) {
    let candidates = &state.snapshot.roulette_candidates;
    if candidates.is_empty() {
        let paragraph = Paragraph::new("  No players on the wheel.")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
    }

    let pointer = pointer_segment(state);
    let segment = segment_angle(candidates.len());
    let rows = area.height as usize;
    let start = scroll_start(pointer.unwrap_or(0), candidates.len(), rows);

    let items: Vec<ListItem> = candidates
        .iter()
        .enumerate()
        .skip(start)
        .take(rows.max(1))
        .map(|(i, player)| {
            let under_pointer = pointer == Some(i);
            let marker = if under_pointer { "▶" } else { " " };
            let style = if under_pointer {
                Style::default()
                    .fg(Color::Black)
                    .bg(side_color(side))
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {marker} "), Style::default().fg(Color::Yellow)),
                Span::styled(format!("{:<10}", wheel_label(&player.name)), style),
                Span::styled(
                    format!(" {:>5.1}°", i as f64 * segment),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items), area);
}

fn render_footer(frame: &mut Frame, area: Rect, state: &ViewState) {
    let line = match (&state.revealed, &state.spin) {
        (Some((side, winner)), _) => Line::from(vec![
            Span::styled(
                format!(" {} captain: ", side.label()),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(
                winner.name.clone(),
                Style::default()
                    .fg(side_color(*side))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        (None, Some(animation)) => Line::from(Span::styled(
            format!(
                " Spinning... {:>3.0}%",
                animation.progress(state.now) * 100.0
            ),
            Style::default().fg(Color::Yellow),
        )),
        (None, None) => Line::from(Span::styled(
            " Press Space to spin",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Segment under the pointer: animated while spinning, otherwise none.
pub fn pointer_segment(state: &ViewState) -> Option<usize> {
    state
        .spin
        .as_ref()
        .map(|animation| animation.pointer_segment(state.now))
}

pub fn side_color(side: Side) -> Color {
    match side {
        Side::Messi => Color::LightBlue,
        Side::Ronaldo => Color::LightRed,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

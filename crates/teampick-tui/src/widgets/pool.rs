// Pool widget: undrafted players ordered by jersey number.
//
// Columns: number, name. During manual drafting the highlighted row is the
// one Enter picks, and the title names whose turn it is. Once the draft is
// complete the panel shows the final head count per team.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use teampick_core::draft::{Phase, Side};

use crate::widgets::scroll_start;
use crate::widgets::wheel::side_color;
use crate::ViewState;

/// Render the pool (or the final summary) into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    if state.snapshot.phase == Phase::Complete {
        render_summary(frame, area, state);
        return;
    }

    let drafting = state.snapshot.phase == Phase::Drafting;
    let picker = state.snapshot.current_picker;
    let title = pool_title(state);

    let header = Row::new(vec![Cell::from("#"), Cell::from("Player")]).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let entries = &state.snapshot.remaining;
    let visible_rows = (area.height as usize).saturating_sub(3).max(1);
    let start = if drafting {
        scroll_start(state.selected, entries.len(), visible_rows)
    } else {
        0
    };

    let rows: Vec<Row> = if entries.is_empty() {
        vec![Row::new(vec![Cell::from(""), Cell::from("Nobody left to draft")])]
    } else {
        entries
            .iter()
            .enumerate()
            .skip(start)
            .take(visible_rows)
            .map(|(i, entry)| {
                let style = if drafting && i == state.selected {
                    Style::default()
                        .fg(Color::Black)
                        .bg(side_color(picker))
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                Row::new(vec![
                    Cell::from(format_number(entry.number)),
                    Cell::from(entry.player.name.clone()),
                ])
                .style(style)
            })
            .collect()
    };

    let widths = [Constraint::Length(4), Constraint::Min(12)];
    let mut block = Block::default().borders(Borders::ALL).title(title);
    if drafting {
        block = block.border_style(Style::default().fg(side_color(picker)));
    }
    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

fn render_summary(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut lines = vec![Line::from(Span::styled(
        "  Teams are set!",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))];
    for side in [Side::Messi, Side::Ronaldo] {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:<8}", side.label()),
                Style::default()
                    .fg(side_color(side))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("{} players", state.snapshot.team_size(side))),
        ]));
    }
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Draft complete"),
    );
    frame.render_widget(paragraph, area);
}

pub fn pool_title(state: &ViewState) -> String {
    let count = state.snapshot.remaining.len();
    match state.snapshot.phase {
        Phase::Drafting => format!(
            "{} picks ({} left)",
            state.snapshot.current_picker.label(),
            count
        ),
        _ => format!("Pool ({count})"),
    }
}

/// Jersey number column; players without one show a dash.
pub fn format_number(number: Option<u32>) -> String {
    number.map_or_else(|| "-".to_string(), |n| n.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::drafting_snapshot;

    fn rendered_text(state: &ViewState) -> String {
        let backend = ratatui::backend::TestBackend::new(50, 10);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), state))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn format_number_basic() {
        assert_eq!(format_number(Some(7)), "7");
        assert_eq!(format_number(None), "-");
    }

    #[test]
    fn title_names_the_picker_while_drafting() {
        let mut state = ViewState::default();
        state.apply_snapshot(drafting_snapshot());
        assert_eq!(pool_title(&state), "MESSI picks (2 left)");

        let mut snapshot = drafting_snapshot();
        snapshot.phase = Phase::NumbersAssigned;
        state.apply_snapshot(snapshot);
        assert_eq!(pool_title(&state), "Pool (2)");
    }

    #[test]
    fn pool_lists_players_in_number_order() {
        let mut state = ViewState::default();
        state.apply_snapshot(drafting_snapshot());
        let text = rendered_text(&state);
        let d = text.find('D').unwrap();
        let b = text.find('B').unwrap();
        assert!(d < b);
    }

    #[test]
    fn complete_shows_team_sizes() {
        let mut snapshot = drafting_snapshot();
        snapshot.phase = Phase::Complete;
        snapshot.messi_team = vec![snapshot.remaining[1].player.clone()];
        snapshot.ronaldo_team = vec![snapshot.remaining[0].player.clone()];
        snapshot.remaining.clear();
        let mut state = ViewState::default();
        state.apply_snapshot(snapshot);
        let text = rendered_text(&state);
        assert!(text.contains("Draft complete"));
        assert!(text.contains("MESSI   2 players"));
        assert!(text.contains("RONALDO 2 players"));
    }
}

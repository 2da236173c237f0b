// Captain selection widget: candidate list for manual picks, then the
// chosen pair once both slots are filled.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use teampick_core::draft::Side;

use crate::widgets::scroll_start;
use crate::widgets::wheel::side_color;
use crate::ViewState;

/// Render the captain selection panel into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    match state.snapshot.selecting {
        Some(side) => render_candidates(frame, area, state, side),
        None => render_chosen(frame, area, state),
    }
}

fn render_candidates(frame: &mut Frame, area: Rect, state: &ViewState, side: Side) {
    let candidates = &state.snapshot.captain_candidates;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Choose {} captain (Enter)", side.label()))
        .border_style(Style::default().fg(side_color(side)));

    let rows = (area.height as usize).saturating_sub(2).max(1);
    let start = scroll_start(state.selected, candidates.len(), rows);

    let items: Vec<ListItem> = candidates
        .iter()
        .enumerate()
        .skip(start)
        .take(rows)
        .map(|(i, player)| {
            let style = if i == state.selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(side_color(side))
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(Span::styled(format!("  {}", player.name), style)))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn render_chosen(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut lines = Vec::new();
    for side in [Side::Messi, Side::Ronaldo] {
        let name = state
            .snapshot
            .captain(side)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "--".to_string());
        lines.push(captain_line(side, name));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(
            "  {} players left to draft. Press n to assign numbers.",
            state.snapshot.remaining.len()
        ),
        Style::default().fg(Color::Gray),
    )));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Captains"),
    );
    frame.render_widget(paragraph, area);
}

fn captain_line(side: Side, name: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {:<8}", side.label()),
            Style::default()
                .fg(side_color(side))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(name, Style::default().fg(Color::White)),
    ])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{player, roster};
    use teampick_core::draft::Phase;
    use teampick_core::protocol::DraftSnapshot;

    fn rendered_text(state: &ViewState) -> String {
        let backend = ratatui::backend::TestBackend::new(70, 10);
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
    fn lists_candidates_for_the_slot_being_filled() {
        let mut state = ViewState::default();
        state.apply_snapshot(DraftSnapshot {
            phase: Phase::CaptainSelect,
            selecting: Some(Side::Ronaldo),
            messi_captain: Some(player(1, "Ann")),
            captain_candidates: vec![player(2, "Bob"), player(3, "Cid")],
            ..DraftSnapshot::default()
        });
        let text = rendered_text(&state);
        assert!(text.contains("Choose RONALDO captain"));
        assert!(text.contains("Bob"));
        assert!(text.contains("Cid"));
        assert!(!text.contains("Ann"));
    }

    #[test]
    fn shows_both_captains_when_done() {
        let players = roster(&["Ann", "Bob", "Cid"]);
        let mut state = ViewState::default();
        state.apply_snapshot(DraftSnapshot {
            phase: Phase::CaptainSelect,
            selecting: None,
            messi_captain: Some(players[0].clone()),
            ronaldo_captain: Some(players[2].clone()),
            ..DraftSnapshot::default()
        });
        let text = rendered_text(&state);
        assert!(text.contains("MESSI   Ann"));
        assert!(text.contains("RONALDO Cid"));
        assert!(text.contains("Press n"));
    }
}

// Banner widget: shout-outs after notable transitions.
//
// An active banner wins; otherwise a running celebration shows a row of
// balls; otherwise the panel carries a short prompt for the current phase.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use teampick_core::draft::{Phase, Side};
use teampick_core::protocol::Banner;

use crate::widgets::wheel::side_color;
use crate::ViewState;

const CELEBRATION: &str = "⚽  ⚽  ⚽  ⚽  ⚽";

/// Render the banner zone into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let celebrating = state.celebrating();
    let line = match state.active_banner() {
        Some(banner) => {
            let text = if celebrating {
                format!("⚽ {} ⚽", banner.text())
            } else {
                banner.text().to_string()
            };
            Line::from(Span::styled(
                text,
                Style::default()
                    .fg(banner_color(banner))
                    .add_modifier(Modifier::BOLD),
            ))
        }
        None if celebrating => Line::from(Span::styled(
            CELEBRATION,
            Style::default().fg(Color::Yellow),
        )),
        None => Line::from(Span::styled(
            phase_prompt(state),
            Style::default().fg(Color::Gray),
        )),
    };

    let mut block = Block::default().borders(Borders::ALL);
    if celebrating {
        block = block.border_style(Style::default().fg(Color::Yellow));
    }
    let paragraph = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(paragraph, area);
}

pub fn banner_color(banner: Banner) -> Color {
    match banner {
        Banner::MessiPicked => side_color(Side::Messi),
        Banner::RonaldoPicked => side_color(Side::Ronaldo),
        Banner::RosterLoaded | Banner::NumbersAssigned => Color::Cyan,
        Banner::DraftFinished | Banner::TeamsDealt => Color::Yellow,
    }
}

/// One-line prompt describing what the current phase expects.
pub fn phase_prompt(state: &ViewState) -> String {
    let snapshot = &state.snapshot;
    match snapshot.phase {
        Phase::Roster => "Who's playing? Type names and press Enter".to_string(),
        Phase::Roulette => match snapshot.roulette_step {
            Some(side) => format!("Spin for the {} captain", side.label()),
            None => "Spin the wheel".to_string(),
        },
        Phase::CaptainSelect => match snapshot.selecting {
            Some(side) => format!("Pick the {} captain", side.label()),
            None => "Captains are in".to_string(),
        },
        Phase::NumbersAssigned => "Numbers are out. Draft by hand or deal them".to_string(),
        Phase::Drafting => format!("{} is on the clock", snapshot.current_picker.label()),
        Phase::Complete => "Teams are set".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply_ui_update;
    use crate::test_support::drafting_snapshot;
    use std::time::Duration;
    use teampick_core::protocol::{DraftSnapshot, UiUpdate};

    fn rendered_text(state: &ViewState) -> String {
        let backend = ratatui::backend::TestBackend::new(60, 3);
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
    fn prompt_follows_phase() {
        let mut state = ViewState::default();
        assert!(phase_prompt(&state).starts_with("Who's playing?"));

        state.apply_snapshot(drafting_snapshot());
        assert_eq!(phase_prompt(&state), "MESSI is on the clock");

        state.apply_snapshot(DraftSnapshot {
            phase: Phase::Roulette,
            roulette_step: Some(Side::Ronaldo),
            ..DraftSnapshot::default()
        });
        assert_eq!(phase_prompt(&state), "Spin for the RONALDO captain");
    }

    #[test]
    fn active_banner_replaces_prompt_until_it_expires() {
        let mut state = ViewState::default();
        let start = state.now;
        apply_ui_update(
            &mut state,
            UiUpdate::Banner {
                banner: Banner::NumbersAssigned,
                duration: Duration::from_millis(800),
            },
        );
        let text = rendered_text(&state);
        assert!(text.contains("NUMBERS!"));
        assert!(!text.contains("Who's playing?"));

        state.tick(start + Duration::from_secs(1));
        assert!(rendered_text(&state).contains("Who's playing?"));
    }

    #[test]
    fn banner_colors_follow_side() {
        assert_eq!(banner_color(Banner::MessiPicked), side_color(Side::Messi));
        assert_eq!(banner_color(Banner::RonaldoPicked), side_color(Side::Ronaldo));
    }

    #[test]
    fn render_does_not_panic_while_celebrating() {
        let mut state = ViewState::default();
        apply_ui_update(
            &mut state,
            UiUpdate::Celebration {
                duration: Duration::from_secs(3),
            },
        );
        rendered_text(&state);
        apply_ui_update(
            &mut state,
            UiUpdate::Banner {
                banner: Banner::DraftFinished,
                duration: Duration::from_millis(800),
            },
        );
        assert!(rendered_text(&state).contains("DONE!"));
    }
}

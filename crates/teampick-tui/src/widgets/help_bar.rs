// Help bar widget: keyboard shortcuts valid in the current phase.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use teampick_core::draft::Phase;

use crate::ViewState;

/// Render the help bar into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        help_text(state),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

pub fn help_text(state: &ViewState) -> String {
    let snapshot = &state.snapshot;
    let mut keys: Vec<&str> = match snapshot.phase {
        Phase::Roster => {
            let mut keys = vec!["Enter:Add", "Del:Remove", "Up/Down:Select"];
            if state.can_load_saved() {
                keys.push("F1:Load saved");
            }
            keys.extend(["F2:Random captains", "F3:Pick captains", "Ctrl+C:Quit"]);
            return format!(" {}", keys.join(" | "));
        }
        Phase::Roulette if snapshot.spinning => Vec::new(),
        Phase::Roulette => vec!["Space:Spin"],
        Phase::CaptainSelect if snapshot.selecting.is_some() => {
            vec!["Up/Down:Select", "Enter:Make captain"]
        }
        Phase::CaptainSelect => vec!["n:Assign numbers"],
        Phase::NumbersAssigned => vec!["d:Draft", "a:Auto draft"],
        Phase::Drafting => vec!["Up/Down:Select", "Enter:Pick", "a:Auto draft"],
        Phase::Complete => Vec::new(),
    };
    if snapshot.can_reset {
        keys.push("r:Reset");
    }
    keys.push("q:Quit");
    format!(" {}", keys.join(" | "))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

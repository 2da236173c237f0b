// Status bar widget: phase, captain mode, and whose turn it is.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use teampick_core::draft::{CaptainMode, Phase};

use crate::widgets::wheel::side_color;
use crate::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [title] [phase] | [captain mode] | [picker, while drafting]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let snapshot = &state.snapshot;
    let mut spans = vec![
        Span::styled(
            " MESSI vs RONALDO ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(snapshot.phase.label(), Style::default().fg(Color::White)),
    ];

    if snapshot.phase != Phase::Roster {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            mode_label(snapshot.captain_mode),
            Style::default().fg(Color::White),
        ));
    }

    if snapshot.phase == Phase::Drafting {
        let picker = snapshot.current_picker;
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            format!("{} to pick", picker.label()),
            Style::default()
                .fg(side_color(picker))
                .add_modifier(Modifier::BOLD),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

pub fn mode_label(mode: CaptainMode) -> &'static str {
    match mode {
        CaptainMode::Random => "Random captains",
        CaptainMode::Manual => "Manual captains",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

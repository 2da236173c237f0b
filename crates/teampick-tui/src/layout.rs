// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Banner (3 rows)                                   |
// +-------------------------+------------------------+
// | Main Panel (60%)         | Messi team (50%)       |
// |                          +------------------------+
// |                          | Ronaldo team (50%)     |
// +-------------------------+------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: phase, captain mode, whose pick it is.
    pub status_bar: Rect,
    /// Shout-outs, roulette winner, celebration.
    pub banner: Rect,
    /// Phase-specific content: roster entry, wheel, candidates, pool.
    pub main_panel: Rect,
    pub messi_team: Rect,
    pub ronaldo_team: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(3), // banner
            Constraint::Min(8),    // main + teams
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(vertical[2]);

    let teams = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(horizontal[1]);

    AppLayout {
        status_bar: vertical[0],
        banner: vertical[1],
        main_panel: horizontal[0],
        messi_team: teams[0],
        ronaldo_team: teams[1],
        help_bar: vertical[3],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

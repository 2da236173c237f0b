// TUI widget modules, one per screen zone or phase panel.

pub mod banner;
pub mod captains;
pub mod help_bar;
pub mod pool;
pub mod roster;
pub mod status_bar;
pub mod teams;
pub mod wheel;

/// First row to draw so that `selected` stays inside a window of `rows`.
pub fn scroll_start(selected: usize, total: usize, rows: usize) -> usize {
    if rows == 0 || total <= rows {
        return 0;
    }
    let max_start = total - rows;
    selected.saturating_sub(rows - 1).min(max_start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_start_keeps_selection_visible() {
        assert_eq!(scroll_start(0, 5, 10), 0);
        assert_eq!(scroll_start(3, 20, 5), 0);
        assert_eq!(scroll_start(4, 20, 5), 0);
        assert_eq!(scroll_start(5, 20, 5), 1);
        assert_eq!(scroll_start(19, 20, 5), 15);
        assert_eq!(scroll_start(7, 20, 0), 0);
    }
}

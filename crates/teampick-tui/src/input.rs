// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the
// controller, or into local ViewState mutations (typing a name, moving the
// highlight). Which keys mean what depends on the phase in the last snapshot.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use teampick_core::draft::Phase;
use teampick_core::protocol::UserCommand;

use crate::ViewState;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// controller, `None` when it was handled locally or means nothing here.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Some terminals report Release and Repeat as well; act on Press only.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits, even while typing.
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    match view_state.snapshot.phase {
        Phase::Roster => handle_roster(key_event, view_state),
        Phase::Roulette => handle_roulette(key_event, view_state),
        Phase::CaptainSelect => handle_captain_select(key_event, view_state),
        Phase::NumbersAssigned => handle_numbers_assigned(key_event, view_state),
        Phase::Drafting => handle_drafting(key_event, view_state),
        Phase::Complete => handle_common(key_event, view_state),
    }
}

/// Roster entry: printable keys go to the name line.
fn handle_roster(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Enter => {
            if view_state.name_input.trim().is_empty() {
                return None;
            }
            let name = std::mem::take(&mut view_state.name_input);
            Some(UserCommand::AddPlayer(name))
        }
        KeyCode::Backspace => {
            view_state.name_input.pop();
            None
        }
        KeyCode::Esc => {
            view_state.name_input.clear();
            None
        }
        KeyCode::Up => {
            view_state.select_prev();
            None
        }
        KeyCode::Down => {
            view_state.select_next();
            None
        }
        KeyCode::Delete => view_state.selected_player().map(UserCommand::RemovePlayer),
        KeyCode::F(1) if view_state.can_load_saved() => Some(UserCommand::LoadSavedRoster),
        KeyCode::F(2) => Some(UserCommand::StartRandomCaptains),
        KeyCode::F(3) => Some(UserCommand::StartManualCaptains),
        KeyCode::Char(c)
            if !key_event
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            view_state.name_input.push(c);
            None
        }
        _ => None,
    }
}

fn handle_roulette(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char(' ') if !view_state.snapshot.spinning => Some(UserCommand::SpinRoulette),
        _ => handle_common(key_event, view_state),
    }
}

fn handle_captain_select(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let selecting = view_state.snapshot.selecting.is_some();
    match key_event.code {
        KeyCode::Up => {
            view_state.select_prev();
            None
        }
        KeyCode::Down => {
            view_state.select_next();
            None
        }
        KeyCode::Enter if selecting => view_state.selected_player().map(UserCommand::SelectCaptain),
        KeyCode::Char('n') if !selecting => Some(UserCommand::AssignNumbers),
        _ => handle_common(key_event, view_state),
    }
}

fn handle_numbers_assigned(
    key_event: KeyEvent,
    view_state: &mut ViewState,
) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('d') => Some(UserCommand::StartDraft),
        KeyCode::Char('a') => Some(UserCommand::AutoDraft),
        _ => handle_common(key_event, view_state),
    }
}

fn handle_drafting(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Up => {
            view_state.select_prev();
            None
        }
        KeyCode::Down => {
            view_state.select_next();
            None
        }
        KeyCode::Enter => view_state.selected_player().map(UserCommand::PickPlayer),
        KeyCode::Char('a') => Some(UserCommand::AutoDraft),
        _ => handle_common(key_event, view_state),
    }
}

/// Keys shared by every phase without a text line.
fn handle_common(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('r') if view_state.snapshot.can_reset => Some(UserCommand::Reset),
        KeyCode::Char('q') => Some(UserCommand::Quit),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

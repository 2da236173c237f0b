// Draft session model: players, the roster, and the phase state machine.

pub mod player;
pub mod state;

pub use player::{Player, PlayerId, Roster};
pub use state::{CaptainMode, DraftMachine, Phase, Rejected, Side, WheelSpin, MIN_PLAYERS};

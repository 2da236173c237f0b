// Library root: the draft state machine and everything the controller and
// presentation layers share with it.

pub mod config;
pub mod draft;
pub mod protocol;
pub mod roulette;
pub mod store;

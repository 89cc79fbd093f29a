pub mod controller;
pub mod state;

pub use controller::{AttentionTimer, TimerSignal};
pub use state::{TickOutcome, TimerState, TimerStatus};

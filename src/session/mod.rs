pub mod controller;
pub mod error;
pub mod events;
pub mod machine;
pub mod scheduler;
pub mod state;

pub use controller::{ReadingSessionController, SessionCommand, SessionHandle, SessionServices};
pub use error::SessionStartError;
pub use events::{Effect, ScheduledKind, SessionEvent, SessionNotice, TimerCommand};
pub use machine::SessionMachine;
pub use state::{ReaderPhase, SessionSnapshot, SessionState};

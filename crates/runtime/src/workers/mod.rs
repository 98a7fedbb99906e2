//! Worker tasks that back the runtime orchestration.
//!
//! The session worker owns the engine and answers command invocations one at
//! a time, in arrival order.

mod session;

pub use session::{Command, SessionWorker};

//! Count Session Aggregate
//!
//! The session is the root; lines are only reachable through it.

mod count_line;
mod count_session;

pub use count_line::CountLine;
pub use count_session::{
    CountEntry, CountSession, CountSessionSummary, CreateSessionCommand, SessionOptions,
};

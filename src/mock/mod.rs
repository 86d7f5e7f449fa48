//! Mock Module
//!
//! A simulated controller for tests and local development. It implements
//! the reply rules of the real device closely enough to exercise the
//! session: greeting, fixed answers, EOM/EOB acks and the error state.

mod robot;

pub use robot::{MockRobot, ERROR_RESET_TEXT, NO_ERROR_TEXT, UNKNOWN_COMMAND, UNKNOWN_COMMAND_TEXT};

// src/exec/mod.rs

//! Change handlers: what happens once the watch loop has found changes.
//!
//! - [`backend`] provides the `ChangeHandler` trait the engine calls, plus the
//!   logging-only `LogHandler`.
//! - [`command`] provides `CommandHandler`, which runs a shell command with
//!   the changed paths exported in the environment.

pub mod backend;
pub mod command;

pub use backend::{ChangeHandler, LogHandler};
pub use command::CommandHandler;

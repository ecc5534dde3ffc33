//! finterm core: the menu engine behind the terminal.
//!
//! This crate provides:
//! - Validated menu paths and the pending command queue
//! - The `Controller` state machine: dispatch, compound navigation, reset,
//!   home/exit unwinding and typo correction
//! - The `Session`: remembered menus, feature flags, prompt and console
//! - An interactive line editor with tab completion and persisted history
//! - Routine recording and replay files

pub mod args;
pub mod command;
pub mod config;
pub mod console;
pub mod controller;
pub mod fuzzy;
pub mod help;
pub mod history;
pub mod path;
pub mod prompt;
pub mod queue;
pub mod routine;
pub mod session;

pub use command::{Builtin, CommandLine};
pub use config::{ConfigError, FeatureFlags};
pub use console::{Console, SharedBuffer};
pub use controller::{
    CommandKind, CommandTable, Controller, Dispatch, EngineError, Handler, Menu, MenuContext,
};
pub use history::History;
pub use path::{MenuPath, PathError};
pub use prompt::{LinePrompt, ReadOutcome, ScriptedPrompt};
pub use queue::CommandQueue;
pub use routine::{Recorder, Routine, RoutineError};
pub use session::{ControllerRegistry, Session};

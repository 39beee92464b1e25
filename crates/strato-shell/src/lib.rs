//! Command registry and dispatch for the strato shell.
//!
//! The shell is a registry-based dispatch system. Commands implement the
//! `Command` trait and are registered by name; re-registering a name
//! overwrites the previous binding, which lets plugins shadow built-ins.
//! Unbound names fall back to a like-named executable on `$PATH`.

mod commands;
mod config_commands;
mod file_commands;
mod interpreter;

/// Register all built-in commands into a registry.
pub use commands::register_builtins;
/// A single executable command trait.
pub use interpreter::Command;
/// Output produced by a command (text, signals).
pub use interpreter::CommandOutput;
/// Registry of available commands with dispatch.
pub use interpreter::CommandRegistry;
/// Shared mutable context passed to every command.
pub use interpreter::ShellContext;
/// Tokenize a command line respecting quotes and escapes.
pub use interpreter::tokenize;

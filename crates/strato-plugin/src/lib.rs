//! Plugin loading and management for the strato shell.
//!
//! Plugins are dynamic libraries dropped into the plugins directory. Each
//! exports `strato_plugin_register(&mut CommandRegistry)` and may export
//! `strato_plugin_version() -> *const c_char`. The loader isolates faults
//! per plugin and keeps every library handle alive for the whole process.

mod catalog;
mod commands;
mod loader;

pub use catalog::{DirCatalog, PluginCatalog};
pub use commands::register_plugin_commands;
pub use loader::{LoadSummary, PluginDescriptor, PluginLoader};

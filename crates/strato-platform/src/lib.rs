//! Platform services for the strato shell.
//!
//! Commands and the prompt renderer never touch the OS directly; they go
//! through the [`SystemProbe`] trait so tests can substitute fixed values.

mod services;

pub use services::{DesktopProbe, SystemProbe, TimeLookup};

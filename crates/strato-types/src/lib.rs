//! Shared types for the strato shell.

pub mod error;

pub use error::{Result, StratoError};

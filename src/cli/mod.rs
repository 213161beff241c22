//! CLI-specific utilities for danfo-quote
//!
//! This module contains code specific to the command-line interface,
//! separate from the core library functionality.

pub mod format;
pub mod progress;

pub use format::format_naira;
pub use progress::ProgressManager;

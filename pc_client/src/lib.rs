//! Internal modules for the poker chips client.
//!
//! This library provides command parsing, configuration, logging setup, and
//! the terminal UI used by the pc_client binary.

pub mod commands;
pub mod config;
pub mod logging;
pub mod tui_app;

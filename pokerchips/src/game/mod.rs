//! Chip betting engine.
//!
//! This module provides:
//! - Setup of players and the per-round max bet
//! - The betting session state machine (turns, calls, raises, stages)
//! - The round's action history

pub mod constants;
pub mod entities;
pub mod errors;
pub mod session;
pub mod setup;

pub use errors::{SetupError, SetupResult};
pub use session::{Action, Outcome, Session, transition};
pub use setup::{GameSetup, SetupForm};

//! Setup error types.

use thiserror::Error;

use super::entities::{Chips, SeatIndex};

/// Errors that can occur while configuring a game.
///
/// Betting actions never fail; an action that isn't allowed is simply
/// ignored. Only the setup surface reports errors.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SetupError {
    /// Player count outside the supported range
    #[error("need {min}-{max} players, got {count}")]
    InvalidPlayerCount {
        count: usize,
        min: usize,
        max: usize,
    },

    /// Max bet is zero or not a value the setup form offers
    #[error("invalid max bet: {0}")]
    InvalidMaxBet(Chips),

    /// Name slot that doesn't exist
    #[error("seat {0} out of range")]
    SeatOutOfRange(SeatIndex),
}

/// Result type for setup operations
pub type SetupResult<T> = Result<T, SetupError>;

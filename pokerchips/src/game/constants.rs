//! Fixed table limits and chip denominations.

use super::entities::Chips;

/// Chip denominations a player can pick from, smallest first.
pub const CHIP_VALUES: [Chips; 6] = [1, 2, 5, 10, 25, 50];

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

/// Max bet the setup form starts with.
pub const DEFAULT_MAX_BET: Chips = 100;
pub const MIN_MAX_BET: Chips = 50;
pub const MAX_MAX_BET: Chips = 500;
/// The setup form moves the max bet in increments of this size.
pub const MAX_BET_STEP: Chips = 50;

/// Display names are truncated to this many characters.
pub const MAX_NAME_LENGTH: usize = 16;

//! # Poker Chips
//!
//! A poker chip betting simulator. A group sets up player names and a
//! max-bet limit, then takes turns selecting chips, calling, or raising
//! while the library keeps track of the pot and a history of the round.
//!
//! There are no cards here. The library only tracks chips: who is due to
//! act, who deals, what each player has committed this round, and how the
//! betting stages advance.
//!
//! ## Core Modules
//!
//! - [`game`]: Setup, the betting session state machine, and entities
//!
//! ## Example
//!
//! ```
//! use pokerchips::{GameSetup, Session};
//!
//! let setup = GameSetup::new(&["alice", "bob", "carol"], 100).unwrap();
//! let mut session = Session::new(setup).unwrap();
//!
//! session.select_chip(10);
//! session.raise();
//! assert_eq!(session.pot(), 10);
//! assert_eq!(session.current_player().name, "bob");
//!
//! session.call();
//! assert_eq!(session.pot(), 20);
//! ```

/// Chip betting engine: setup, session state machine, and entities.
pub mod game;
pub use game::{
    Action, GameSetup, Outcome, Session, SetupError, SetupForm, SetupResult,
    constants::{self, CHIP_VALUES, DEFAULT_MAX_BET, MAX_PLAYERS, MIN_PLAYERS},
    entities, transition,
};

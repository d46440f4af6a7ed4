//! Game setup: player seating and the max-bet limit.
//!
//! [`SetupForm`] holds what a user has entered so far and only ever
//! contains valid values. [`GameSetup`] is the payload handed to
//! [`Session::new`](super::session::Session::new) once the form is done.

use log::debug;
use serde::{Deserialize, Serialize};

use super::{
    constants::{DEFAULT_MAX_BET, MAX_BET_STEP, MAX_MAX_BET, MAX_PLAYERS, MIN_MAX_BET, MIN_PLAYERS},
    entities::{Chips, Player, SeatIndex},
    errors::{SetupError, SetupResult},
};

fn check_player_count(count: usize) -> SetupResult<()> {
    if (MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
        Ok(())
    } else {
        Err(SetupError::InvalidPlayerCount {
            count,
            min: MIN_PLAYERS,
            max: MAX_PLAYERS,
        })
    }
}

/// Players and limits a betting session starts from.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GameSetup {
    pub players: Vec<Player>,
    pub max_bet: Chips,
}

impl GameSetup {
    /// Seat players in the given order. Blank names get the default
    /// seat label.
    ///
    /// # Errors
    ///
    /// Returns an error if there are too few or too many names, or if
    /// `max_bet` is zero.
    pub fn new<S: AsRef<str>>(names: &[S], max_bet: Chips) -> SetupResult<Self> {
        check_player_count(names.len())?;
        if max_bet == 0 {
            return Err(SetupError::InvalidMaxBet(max_bet));
        }
        let players = names
            .iter()
            .enumerate()
            .map(|(id, name)| Player::new(id, name.as_ref()))
            .collect();
        Ok(Self { players, max_bet })
    }
}

/// Interactive setup state.
#[derive(Clone, Debug, PartialEq)]
pub struct SetupForm {
    player_count: usize,
    names: [String; MAX_PLAYERS],
    max_bet: Chips,
}

impl Default for SetupForm {
    fn default() -> Self {
        Self {
            player_count: MIN_PLAYERS,
            names: Default::default(),
            max_bet: DEFAULT_MAX_BET,
        }
    }
}

impl SetupForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    #[must_use]
    pub fn max_bet(&self) -> Chips {
        self.max_bet
    }

    /// Names typed so far for the seats in play, blank if untouched.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names[..self.player_count]
    }

    pub fn set_player_count(&mut self, count: usize) -> SetupResult<()> {
        check_player_count(count)?;
        self.player_count = count;
        Ok(())
    }

    /// Set the name for a seat. Names for seats beyond the current player
    /// count are kept in case the count goes back up.
    pub fn set_name(&mut self, seat: SeatIndex, name: &str) -> SetupResult<()> {
        let slot = self
            .names
            .get_mut(seat)
            .ok_or(SetupError::SeatOutOfRange(seat))?;
        *slot = name.to_string();
        Ok(())
    }

    pub fn set_max_bet(&mut self, max_bet: Chips) -> SetupResult<()> {
        if !(MIN_MAX_BET..=MAX_MAX_BET).contains(&max_bet) || max_bet % MAX_BET_STEP != 0 {
            return Err(SetupError::InvalidMaxBet(max_bet));
        }
        self.max_bet = max_bet;
        Ok(())
    }

    pub fn raise_max_bet(&mut self) {
        self.max_bet = (self.max_bet + MAX_BET_STEP).min(MAX_MAX_BET);
    }

    pub fn lower_max_bet(&mut self) {
        self.max_bet = self.max_bet.saturating_sub(MAX_BET_STEP).max(MIN_MAX_BET);
    }

    /// Finish setup.
    #[must_use]
    pub fn build(&self) -> GameSetup {
        let players: Vec<_> = self
            .names()
            .iter()
            .enumerate()
            .map(|(id, name)| Player::new(id, name))
            .collect();
        debug!(
            "setup complete: {} players, max bet {}",
            players.len(),
            self.max_bet
        );
        GameSetup {
            players,
            max_bet: self.max_bet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_form() {
        let form = SetupForm::default();
        assert_eq!(form.player_count(), 2);
        assert_eq!(form.max_bet(), DEFAULT_MAX_BET);
        assert_eq!(form.names().len(), 2);
    }

    #[test]
    fn test_player_count_bounds() {
        let mut form = SetupForm::new();
        assert!(form.set_player_count(4).is_ok());
        assert_eq!(form.player_count(), 4);
        assert!(matches!(
            form.set_player_count(1),
            Err(SetupError::InvalidPlayerCount { count: 1, .. })
        ));
        assert!(form.set_player_count(5).is_err());
        assert_eq!(form.player_count(), 4);
    }

    #[test]
    fn test_build_defaults_blank_names() {
        let mut form = SetupForm::new();
        form.set_player_count(3).unwrap();
        form.set_name(1, "  bob  ").unwrap();

        let setup = form.build();
        let names: Vec<_> = setup.players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Player 1", "bob", "Player 3"]);
        assert!(setup.players.iter().all(|p| p.current_bet == 0));
        let ids: Vec<_> = setup.players.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_hidden_names_survive_count_changes() {
        let mut form = SetupForm::new();
        form.set_player_count(4).unwrap();
        form.set_name(3, "dana").unwrap();
        form.set_player_count(2).unwrap();
        assert_eq!(form.build().players.len(), 2);
        form.set_player_count(4).unwrap();
        assert_eq!(form.build().players[3].name, "dana");
    }

    #[test]
    fn test_set_name_out_of_range() {
        let mut form = SetupForm::new();
        assert_eq!(
            form.set_name(MAX_PLAYERS, "eve"),
            Err(SetupError::SeatOutOfRange(MAX_PLAYERS))
        );
    }

    #[test]
    fn test_max_bet_must_match_slider() {
        let mut form = SetupForm::new();
        assert!(form.set_max_bet(250).is_ok());
        assert_eq!(form.max_bet(), 250);
        assert_eq!(form.set_max_bet(0), Err(SetupError::InvalidMaxBet(0)));
        assert_eq!(form.set_max_bet(75), Err(SetupError::InvalidMaxBet(75)));
        assert_eq!(form.set_max_bet(550), Err(SetupError::InvalidMaxBet(550)));
        assert_eq!(form.max_bet(), 250);
    }

    #[test]
    fn test_max_bet_steps_are_clamped() {
        let mut form = SetupForm::new();
        form.set_max_bet(MAX_MAX_BET).unwrap();
        form.raise_max_bet();
        assert_eq!(form.max_bet(), MAX_MAX_BET);

        form.set_max_bet(MIN_MAX_BET).unwrap();
        form.lower_max_bet();
        assert_eq!(form.max_bet(), MIN_MAX_BET);

        form.raise_max_bet();
        assert_eq!(form.max_bet(), MIN_MAX_BET + MAX_BET_STEP);
    }

    #[test]
    fn test_game_setup_new_validates() {
        assert!(GameSetup::new(&["a", "b", "c"], 100).is_ok());
        assert!(matches!(
            GameSetup::new(&["solo"], 100),
            Err(SetupError::InvalidPlayerCount { count: 1, .. })
        ));
        assert_eq!(
            GameSetup::new(&["a", "b"], 0),
            Err(SetupError::InvalidMaxBet(0))
        );
        // Any positive limit is fine outside the form.
        assert_eq!(GameSetup::new(&["a", "b"], 37).unwrap().max_bet, 37);
    }
}

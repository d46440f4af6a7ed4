//! Betting session state machine.
//!
//! A [`Session`] owns everything about a game in progress: seating, turn
//! and dealer positions, the pot, the current stage, and the round's
//! action log. Every action runs to completion against `&mut Session`;
//! actions that aren't allowed leave the session untouched and report
//! [`Outcome::Ignored`] (or a rejected chip selection) instead of failing.

use chrono::Utc;
use log::{debug, info};

use super::{
    entities::{
        BetAction, BetRecord, ChipSelection, Chips, DealerChange, History, HistoryEntry,
        PendingChips, Player, RejectReason, SeatIndex, Stage, StageChange, is_chip_value,
    },
    errors::{SetupError, SetupResult},
    setup::{GameSetup, SetupForm},
};
use super::constants::{MAX_PLAYERS, MIN_PLAYERS};

/// User-driven inputs to a session.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Action {
    /// Add a chip of this value to the pending selection.
    SelectChip(Chips),
    /// Drop the pending chip at this position.
    RemoveChip(usize),
    Call,
    Raise,
    AdvanceStage,
    EndRound,
}

/// What an [`Action`] did to the session.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    ChipAccepted,
    ChipRejected(RejectReason),
    ChipRemoved(Chips),
    Bet(BetRecord),
    StageChanged(StageChange),
    RoundEnded(DealerChange),
    /// The action wasn't available; nothing changed.
    Ignored,
}

impl Outcome {
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    players: Vec<Player>,
    current_idx: SeatIndex,
    dealer_idx: SeatIndex,
    max_bet: Chips,
    stage: Stage,
    /// Largest committed bet of the round. Calls match this.
    highest_bet: Chips,
    /// Running total across every round of the session. Wider than a single
    /// bet so it stays the exact sum of every bet.
    pot: u64,
    pending: PendingChips,
    history: History,
    round: u32,
}

impl Session {
    /// Start betting from a finished setup. The first seat deals and acts
    /// first.
    ///
    /// # Errors
    ///
    /// Returns an error if the setup seats an unsupported number of
    /// players or has a zero max bet.
    pub fn new(setup: GameSetup) -> SetupResult<Self> {
        let GameSetup { players, max_bet } = setup;
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players.len()) {
            return Err(SetupError::InvalidPlayerCount {
                count: players.len(),
                min: MIN_PLAYERS,
                max: MAX_PLAYERS,
            });
        }
        if max_bet == 0 {
            return Err(SetupError::InvalidMaxBet(max_bet));
        }
        // Ids follow seats; blank names get the seat label.
        let players: Vec<Player> = players
            .iter()
            .enumerate()
            .map(|(seat, player)| Player::new(seat, &player.name))
            .collect();

        info!(
            "new session: {} players, max bet {max_bet}",
            players.len()
        );
        Ok(Self {
            players,
            current_idx: 0,
            dealer_idx: 0,
            max_bet,
            stage: Stage::PreFlop,
            highest_bet: 0,
            pot: 0,
            pending: PendingChips::default(),
            history: History::new(),
            round: 1,
        })
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn current_idx(&self) -> SeatIndex {
        self.current_idx
    }

    #[must_use]
    pub fn current_player(&self) -> &Player {
        &self.players[self.current_idx]
    }

    #[must_use]
    pub fn dealer_idx(&self) -> SeatIndex {
        self.dealer_idx
    }

    #[must_use]
    pub fn dealer(&self) -> &Player {
        &self.players[self.dealer_idx]
    }

    #[must_use]
    pub fn max_bet(&self) -> Chips {
        self.max_bet
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub fn highest_bet(&self) -> Chips {
        self.highest_bet
    }

    #[must_use]
    pub fn pot(&self) -> u64 {
        self.pot
    }

    #[must_use]
    pub fn pending(&self) -> &PendingChips {
        &self.pending
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Round number, starting at 1.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Sum of the pending chips.
    #[must_use]
    pub fn current_bet_amount(&self) -> Chips {
        self.pending.total()
    }

    /// Chips the current player needs to match the highest bet.
    #[must_use]
    pub fn call_amount(&self) -> Chips {
        self.highest_bet
            .saturating_sub(self.current_player().current_bet)
    }

    #[must_use]
    pub fn can_call(&self) -> bool {
        self.call_amount() > 0
    }

    /// Chips the current player may still add before hitting the max bet,
    /// counting the pending selection. Zero or less means the limit is
    /// reached.
    #[must_use]
    pub fn remaining_bet_allowed(&self) -> i64 {
        let committed =
            i64::from(self.current_player().current_bet) + i64::from(self.pending.total());
        i64::from(self.max_bet) - committed
    }

    pub fn select_chip(&mut self, value: Chips) -> ChipSelection {
        if !is_chip_value(value) {
            return ChipSelection::Rejected(RejectReason::UnknownDenomination);
        }
        if i64::from(value) > self.remaining_bet_allowed() {
            debug!(
                "{} can't add a {value} chip: {} left",
                self.current_player(),
                self.remaining_bet_allowed()
            );
            return ChipSelection::Rejected(RejectReason::OverLimit);
        }
        self.pending.push(value);
        ChipSelection::Accepted
    }

    pub fn remove_chip(&mut self, idx: usize) -> Option<Chips> {
        self.pending.remove(idx)
    }

    /// Match the highest bet. Does nothing when there's nothing to call.
    pub fn call(&mut self) -> Option<BetRecord> {
        if !self.can_call() {
            return None;
        }
        let amount = self.call_amount();
        Some(self.commit(BetAction::Called, self.highest_bet, amount))
    }

    /// Commit the pending chips. Does nothing when no chips are pending.
    pub fn raise(&mut self) -> Option<BetRecord> {
        let amount = self.pending.total();
        if amount == 0 {
            return None;
        }
        let total = self.current_player().current_bet + amount;
        if total > self.highest_bet {
            self.highest_bet = total;
        }
        Some(self.commit(BetAction::Raised, total, amount))
    }

    /// Move the current player's bet to `total`, put `amount` in the pot,
    /// and pass the turn.
    fn commit(&mut self, action: BetAction, total: Chips, amount: Chips) -> BetRecord {
        let player = &mut self.players[self.current_idx];
        player.current_bet = total;
        let record = BetRecord {
            seq: self.history.next_seq(),
            player_id: player.id,
            player: player.name.clone(),
            action,
            amount,
            total_bet: total,
            stage: self.stage,
            timestamp: Utc::now(),
        };
        self.pot += u64::from(amount);
        self.history.push(HistoryEntry::Bet(record.clone()));
        // Pending chips belong to whoever's turn it was.
        self.pending.clear();
        self.current_idx = (self.current_idx + 1) % self.players.len();

        debug!(
            "{} {action} {amount} (total {total}), pot {}",
            record.player, self.pot
        );
        record
    }

    /// Move to the next stage. Leaving the river ends the round first, so
    /// the stage change becomes the newest entry of the new round's log.
    ///
    /// The recorded labels come from the stage the session was in before
    /// the call.
    pub fn advance_stage(&mut self) -> StageChange {
        let from = self.stage;
        let to = from.next_label();
        match from.next() {
            Some(stage) => self.stage = stage,
            None => {
                self.end_round();
            }
        }

        let change = StageChange {
            seq: self.history.next_seq(),
            from,
            to,
            timestamp: Utc::now(),
        };
        self.history.push(HistoryEntry::StageChange(change.clone()));
        debug!("stage {from} → {to}");
        change
    }

    /// Reset the round and pass the dealer button. The pot carries over.
    pub fn end_round(&mut self) -> DealerChange {
        let num_players = self.players.len();
        self.players.iter_mut().for_each(Player::reset);
        self.history.clear();
        self.pending.clear();
        self.highest_bet = 0;
        self.stage = Stage::PreFlop;

        let old_dealer_idx = self.dealer_idx;
        self.dealer_idx = (old_dealer_idx + 1) % num_players;
        self.current_idx = (self.dealer_idx + 1) % num_players;
        self.round += 1;

        let change = DealerChange {
            seq: self.history.next_seq(),
            old_dealer: self.players[old_dealer_idx].name.clone(),
            new_dealer: self.players[self.dealer_idx].name.clone(),
            timestamp: Utc::now(),
        };
        self.history.push(HistoryEntry::DealerChange(change.clone()));
        info!(
            "round {} begins: dealer {} → {}, pot {}",
            self.round, change.old_dealer, change.new_dealer, self.pot
        );
        change
    }

    /// Throw the session away and start over from an empty setup form.
    #[must_use]
    pub fn new_game(self) -> SetupForm {
        info!(
            "session over after {} round(s), pot {}",
            self.round, self.pot
        );
        SetupForm::default()
    }

    pub fn apply(&mut self, action: Action) -> Outcome {
        match action {
            Action::SelectChip(value) => match self.select_chip(value) {
                ChipSelection::Accepted => Outcome::ChipAccepted,
                ChipSelection::Rejected(reason) => Outcome::ChipRejected(reason),
            },
            Action::RemoveChip(idx) => self
                .remove_chip(idx)
                .map_or(Outcome::Ignored, Outcome::ChipRemoved),
            Action::Call => self.call().map_or(Outcome::Ignored, Outcome::Bet),
            Action::Raise => self.raise().map_or(Outcome::Ignored, Outcome::Bet),
            Action::AdvanceStage => Outcome::StageChanged(self.advance_stage()),
            Action::EndRound => Outcome::RoundEnded(self.end_round()),
        }
    }
}

/// Apply `action` to a copy of `session`, leaving the original untouched.
#[must_use]
pub fn transition(session: &Session, action: Action) -> (Session, Outcome) {
    let mut next = session.clone();
    let outcome = next.apply(action);
    (next, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::StageLabel;

    fn session(names: &[&str], max_bet: Chips) -> Session {
        Session::new(GameSetup::new(names, max_bet).unwrap()).unwrap()
    }

    fn select_all(session: &mut Session, chips: &[Chips]) {
        for &chip in chips {
            assert_eq!(session.select_chip(chip), ChipSelection::Accepted);
        }
    }

    // === Construction ===

    #[test]
    fn test_new_session_defaults() {
        let session = session(&["alice", "bob"], 100);
        assert_eq!(session.current_idx(), 0);
        assert_eq!(session.dealer_idx(), 0);
        assert_eq!(session.stage(), Stage::PreFlop);
        assert_eq!(session.pot(), 0);
        assert_eq!(session.highest_bet(), 0);
        assert_eq!(session.round(), 1);
        assert!(session.history().is_empty());
        assert!(!session.can_call());
        assert_eq!(session.remaining_bet_allowed(), 100);
    }

    #[test]
    fn test_new_session_rejects_bad_payload() {
        let empty = GameSetup {
            players: Vec::new(),
            max_bet: 100,
        };
        assert!(matches!(
            Session::new(empty),
            Err(SetupError::InvalidPlayerCount { count: 0, .. })
        ));

        let mut setup = GameSetup::new(&["a", "b"], 100).unwrap();
        setup.max_bet = 0;
        assert_eq!(Session::new(setup), Err(SetupError::InvalidMaxBet(0)));
    }

    #[test]
    fn test_new_session_zeroes_bets() {
        let mut setup = GameSetup::new(&["a", "b"], 100).unwrap();
        setup.players[1].current_bet = 30;
        let session = Session::new(setup).unwrap();
        assert!(session.players().iter().all(|p| p.current_bet == 0));
    }

    #[test]
    fn test_new_session_normalizes_names_and_ids() {
        let setup: GameSetup = serde_json::from_str(
            r#"{"players":[{"id":0,"name":"","current_bet":0},{"id":0,"name":"   ","current_bet":0}],"max_bet":100}"#,
        )
        .unwrap();
        let mut session = Session::new(setup).unwrap();
        let names: Vec<_> = session.players().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Player 1", "Player 2"]);
        let ids: Vec<_> = session.players().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1]);

        let change = session.end_round();
        assert_eq!(change.old_dealer, "Player 1");
        assert_eq!(change.new_dealer, "Player 2");
    }

    // === Chip selection ===

    #[test]
    fn test_select_chip_accumulates() {
        let mut session = session(&["a", "b"], 100);
        select_all(&mut session, &[25, 10, 5]);
        assert_eq!(session.current_bet_amount(), 40);
        assert_eq!(session.remaining_bet_allowed(), 60);
    }

    #[test]
    fn test_select_chip_over_limit_is_rejected() {
        let mut session = session(&["a", "b"], 50);
        select_all(&mut session, &[25, 10, 10]);
        assert_eq!(
            session.select_chip(10),
            ChipSelection::Rejected(RejectReason::OverLimit)
        );
        assert_eq!(session.pending().as_slice(), &[25, 10, 10]);
        // Exactly reaching the limit is fine.
        assert!(session.select_chip(5).is_accepted());
        assert_eq!(session.remaining_bet_allowed(), 0);
    }

    #[test]
    fn test_select_unknown_chip_is_rejected() {
        let mut session = session(&["a", "b"], 100);
        assert_eq!(
            session.select_chip(3),
            ChipSelection::Rejected(RejectReason::UnknownDenomination)
        );
        assert!(session.pending().is_empty());
    }

    #[test]
    fn test_remove_chip() {
        let mut session = session(&["a", "b"], 100);
        select_all(&mut session, &[1, 2, 5]);
        assert_eq!(session.remove_chip(1), Some(2));
        assert_eq!(session.pending().as_slice(), &[1, 5]);
        assert_eq!(session.remove_chip(5), None);
        assert_eq!(session.pending().as_slice(), &[1, 5]);
    }

    // === Call ===

    #[test]
    fn test_call_without_bet_is_noop() {
        let mut session = session(&["a", "b"], 100);
        let before = session.clone();
        assert_eq!(session.call(), None);
        assert_eq!(session, before);
    }

    #[test]
    fn test_call_matches_highest_bet() {
        let mut session = session(&["a", "b", "c"], 100);
        select_all(&mut session, &[25]);
        session.raise().unwrap();

        assert_eq!(session.call_amount(), 25);
        let record = session.call().unwrap();
        assert_eq!(record.action, BetAction::Called);
        assert_eq!(record.amount, 25);
        assert_eq!(record.total_bet, 25);
        assert_eq!(record.player, "b");
        assert_eq!(session.pot(), 50);
        assert_eq!(session.current_idx(), 2);
    }

    #[test]
    fn test_call_clears_pending_chips() {
        let mut session = session(&["a", "b"], 100);
        select_all(&mut session, &[50]);
        session.raise().unwrap();
        select_all(&mut session, &[50]);
        session.call().unwrap();

        assert!(session.pending().is_empty());
        assert_eq!(session.current_idx(), 0);
        assert_eq!(session.players()[1].current_bet, 50);
    }

    // === Raise ===

    #[test]
    fn test_raise_without_chips_is_noop() {
        let mut session = session(&["a", "b"], 100);
        let before = session.clone();
        assert_eq!(session.raise(), None);
        assert_eq!(session, before);
    }

    #[test]
    fn test_raise_below_highest_bet_is_still_a_raise() {
        let mut session = session(&["a", "b"], 100);
        select_all(&mut session, &[50]);
        session.raise().unwrap();
        select_all(&mut session, &[10]);
        let record = session.raise().unwrap();

        assert_eq!(record.action, BetAction::Raised);
        assert_eq!(record.total_bet, 10);
        assert_eq!(session.highest_bet(), 50);
        assert_eq!(session.pot(), 60);
        assert_eq!(session.call_amount(), 0);
        assert!(!session.can_call());
    }

    #[test]
    fn test_raise_wraps_turn() {
        let mut session = session(&["a", "b"], 100);
        select_all(&mut session, &[1]);
        session.raise().unwrap();
        select_all(&mut session, &[2]);
        session.raise().unwrap();
        assert_eq!(session.current_idx(), 0);
        assert_eq!(session.current_player().current_bet, 1);
        assert_eq!(session.call_amount(), 1);
    }

    #[test]
    fn test_pot_counts_past_a_single_bet_range() {
        let mut session = session(&["a", "b"], 100);
        session.pot = u64::from(Chips::MAX);
        select_all(&mut session, &[10]);
        session.raise().unwrap();
        session.call().unwrap();
        assert_eq!(session.pot(), u64::from(Chips::MAX) + 20);
    }

    #[test]
    fn test_bets_are_logged_most_recent_first() {
        let mut session = session(&["a", "b"], 100);
        select_all(&mut session, &[5]);
        session.raise().unwrap();
        session.call().unwrap();

        let entries: Vec<_> = session.history().iter().collect();
        assert_eq!(entries.len(), 2);
        match entries[0] {
            HistoryEntry::Bet(record) => {
                assert_eq!(record.action, BetAction::Called);
                assert_eq!(record.seq, 1);
            }
            other => panic!("Expected bet entry, got {other:?}"),
        }
    }

    // === Stages ===

    #[test]
    fn test_advance_stage_records_previous_stage() {
        let mut session = session(&["a", "b"], 100);
        let change = session.advance_stage();
        assert_eq!(change.from, Stage::PreFlop);
        assert_eq!(change.to, StageLabel::Stage(Stage::Flop));
        assert_eq!(session.stage(), Stage::Flop);

        session.advance_stage();
        let change = session.advance_stage();
        assert_eq!(change.from, Stage::Turn);
        assert_eq!(session.stage(), Stage::River);
        assert_eq!(session.history().len(), 3);
    }

    #[test]
    fn test_advance_past_river_ends_round() {
        let mut session = session(&["a", "b", "c"], 100);
        select_all(&mut session, &[10]);
        session.raise().unwrap();
        for _ in 0..3 {
            session.advance_stage();
        }

        let change = session.advance_stage();
        assert_eq!(change.from, Stage::River);
        assert_eq!(change.to, StageLabel::NewHand);
        assert_eq!(session.stage(), Stage::PreFlop);
        assert_eq!(session.round(), 2);
        assert_eq!(session.dealer_idx(), 1);
        assert_eq!(session.pot(), 10);

        let entries: Vec<_> = session.history().iter().collect();
        assert_eq!(entries.len(), 2);
        assert!(matches!(entries[0], HistoryEntry::StageChange(_)));
        assert!(matches!(entries[1], HistoryEntry::DealerChange(_)));
    }

    // === End round ===

    #[test]
    fn test_end_round_resets_round_state() {
        let mut session = session(&["a", "b"], 100);
        select_all(&mut session, &[25]);
        session.raise().unwrap();
        session.call().unwrap();
        session.advance_stage();
        select_all(&mut session, &[5]);

        let change = session.end_round();
        assert_eq!(change.old_dealer, "a");
        assert_eq!(change.new_dealer, "b");
        assert!(session.players().iter().all(|p| p.current_bet == 0));
        assert_eq!(session.highest_bet(), 0);
        assert_eq!(session.stage(), Stage::PreFlop);
        assert!(session.pending().is_empty());
        assert_eq!(session.history().len(), 1);
        assert!(matches!(
            session.history().latest(),
            Some(HistoryEntry::DealerChange(_))
        ));
        assert_eq!(session.pot(), 50);
    }

    #[test]
    fn test_dealer_rotation_wraps() {
        let mut session = session(&["a", "b"], 100);
        session.end_round();
        assert_eq!((session.dealer_idx(), session.current_idx()), (1, 0));
        session.end_round();
        assert_eq!((session.dealer_idx(), session.current_idx()), (0, 1));
    }

    // === Dispatch ===

    #[test]
    fn test_apply_reports_outcomes() {
        let mut session = session(&["a", "b"], 100);
        assert_eq!(session.apply(Action::Call), Outcome::Ignored);
        assert_eq!(session.apply(Action::Raise), Outcome::Ignored);
        assert_eq!(session.apply(Action::RemoveChip(0)), Outcome::Ignored);
        assert_eq!(
            session.apply(Action::SelectChip(60)),
            Outcome::ChipRejected(RejectReason::UnknownDenomination)
        );
        assert_eq!(session.apply(Action::SelectChip(10)), Outcome::ChipAccepted);
        assert_eq!(session.apply(Action::RemoveChip(0)), Outcome::ChipRemoved(10));
        assert!(matches!(
            session.apply(Action::AdvanceStage),
            Outcome::StageChanged(_)
        ));
        assert!(matches!(
            session.apply(Action::EndRound),
            Outcome::RoundEnded(_)
        ));
    }

    #[test]
    fn test_transition_leaves_input_untouched() {
        let mut session = session(&["a", "b"], 100);
        session.select_chip(25);
        let (next, outcome) = transition(&session, Action::Raise);

        assert!(matches!(outcome, Outcome::Bet(_)));
        assert_eq!(next.pot(), 25);
        assert_eq!(session.pot(), 0);
        assert_eq!(session.current_bet_amount(), 25);
    }

    #[test]
    fn test_new_game_returns_fresh_form() {
        let mut session = session(&["a", "b", "c"], 300);
        session.select_chip(50);
        session.raise();
        let form = session.new_game();
        assert_eq!(form, SetupForm::default());
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::VecDeque, fmt};

use super::constants::{CHIP_VALUES, MAX_NAME_LENGTH};

/// Type alias for whole chips. Every bet, pot, and limit is counted in
/// chips; there are no fractional chips.
pub type Chips = u32;

/// Stable identifier assigned at setup. It matches the player's seat in
/// the original seating order.
pub type PlayerId = usize;

/// Type alias for positions in the player sequence.
pub type SeatIndex = usize;

/// Whether `value` is one of the chip denominations on the table.
#[must_use]
pub fn is_chip_value(value: Chips) -> bool {
    CHIP_VALUES.contains(&value)
}

/// Trim a name typed at setup, defaulting blank names to the seat label.
#[must_use]
pub fn display_name(id: PlayerId, raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        format!("Player {}", id + 1)
    } else {
        trimmed.chars().take(MAX_NAME_LENGTH).collect()
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Chips committed during the active round.
    pub current_bet: Chips,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId, name: &str) -> Self {
        Self {
            id,
            name: display_name(id, name),
            current_bet: 0,
        }
    }

    pub fn reset(&mut self) {
        self.current_bet = 0;
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name.fmt(f)
    }
}

/// Betting stages of a single round, in play order.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Stage {
    #[default]
    PreFlop,
    Flop,
    Turn,
    River,
}

impl Stage {
    /// The stage that follows, or `None` once the river is done.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::PreFlop => Some(Self::Flop),
            Self::Flop => Some(Self::Turn),
            Self::Turn => Some(Self::River),
            Self::River => None,
        }
    }

    /// Label recorded in the history when leaving this stage.
    #[must_use]
    pub const fn next_label(self) -> StageLabel {
        match self.next() {
            Some(stage) => StageLabel::Stage(stage),
            None => StageLabel::NewHand,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::PreFlop => "pre-flop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
        };
        write!(f, "{repr}")
    }
}

/// Destination shown for a stage change. Leaving the river starts a new
/// hand rather than a fifth stage.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum StageLabel {
    Stage(Stage),
    NewHand,
}

impl fmt::Display for StageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stage(stage) => stage.fmt(f),
            Self::NewHand => write!(f, "new hand"),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum BetAction {
    Called,
    Raised,
}

impl fmt::Display for BetAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Called => "called",
            Self::Raised => "raised",
        };
        write!(f, "{repr}")
    }
}

/// A committed call or raise.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BetRecord {
    pub seq: usize,
    pub player_id: PlayerId,
    pub player: String,
    pub action: BetAction,
    /// Chips moved into the pot by this action.
    pub amount: Chips,
    /// The player's committed bet after the action.
    pub total_bet: Chips,
    pub stage: Stage,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct StageChange {
    pub seq: usize,
    pub from: Stage,
    pub to: StageLabel,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct DealerChange {
    pub seq: usize,
    pub old_dealer: String,
    pub new_dealer: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum HistoryEntry {
    Bet(BetRecord),
    StageChange(StageChange),
    DealerChange(DealerChange),
}

impl HistoryEntry {
    #[must_use]
    pub fn seq(&self) -> usize {
        match self {
            Self::Bet(record) => record.seq,
            Self::StageChange(change) => change.seq,
            Self::DealerChange(change) => change.seq,
        }
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Bet(record) => record.timestamp,
            Self::StageChange(change) => change.timestamp,
            Self::DealerChange(change) => change.timestamp,
        }
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bet(record) => write!(
                f,
                "{} {} {} chips ({})",
                record.player, record.action, record.amount, record.stage
            ),
            Self::StageChange(change) => {
                write!(f, "stage change: {} → {}", change.from, change.to)
            }
            Self::DealerChange(change) => write!(
                f,
                "dealer changed: {} → {}",
                change.old_dealer, change.new_dealer
            ),
        }
    }
}

/// Action log for the active round, most recent entry first.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct History(VecDeque<HistoryEntry>);

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence number the next appended entry should carry.
    #[must_use]
    pub fn next_seq(&self) -> usize {
        self.0.len()
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.0.push_front(entry);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Most recent entry.
    #[must_use]
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.0.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Chips picked by the current player that aren't committed yet.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PendingChips(Vec<Chips>);

impl PendingChips {
    pub fn push(&mut self, value: Chips) {
        self.0.push(value);
    }

    /// Remove the chip at `idx`, keeping the order of the rest.
    pub fn remove(&mut self, idx: usize) -> Option<Chips> {
        (idx < self.0.len()).then(|| self.0.remove(idx))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn total(&self) -> Chips {
        self.0.iter().sum()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Chips] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RejectReason {
    /// The chip would push the player's bet past the max bet.
    OverLimit,
    /// Not a denomination on the table.
    UnknownDenomination,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::OverLimit => "max bet limit reached",
            Self::UnknownDenomination => "no such chip",
        };
        write!(f, "{repr}")
    }
}

/// Result of picking a chip. A rejection leaves the pending chips as they
/// were.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChipSelection {
    Accepted,
    Rejected(RejectReason),
}

impl ChipSelection {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage_change(seq: usize, from: Stage) -> HistoryEntry {
        HistoryEntry::StageChange(StageChange {
            seq,
            from,
            to: from.next_label(),
            timestamp: Utc::now(),
        })
    }

    // === Player Tests ===

    #[test]
    fn test_blank_name_defaults_to_seat_label() {
        assert_eq!(Player::new(0, "").name, "Player 1");
        assert_eq!(Player::new(3, "   ").name, "Player 4");
    }

    #[test]
    fn test_name_is_trimmed_and_truncated() {
        assert_eq!(Player::new(0, "  alice ").name, "alice");
        let long = "x".repeat(MAX_NAME_LENGTH + 10);
        assert_eq!(Player::new(0, &long).name.len(), MAX_NAME_LENGTH);
    }

    #[test]
    fn test_player_reset_clears_bet() {
        let mut player = Player::new(1, "bob");
        player.current_bet = 40;
        player.reset();
        assert_eq!(player.current_bet, 0);
    }

    // === Stage Tests ===

    #[test]
    fn test_stage_order() {
        assert_eq!(Stage::default(), Stage::PreFlop);
        assert_eq!(Stage::PreFlop.next(), Some(Stage::Flop));
        assert_eq!(Stage::Flop.next(), Some(Stage::Turn));
        assert_eq!(Stage::Turn.next(), Some(Stage::River));
        assert_eq!(Stage::River.next(), None);
    }

    #[test]
    fn test_stage_next_label() {
        assert_eq!(Stage::Turn.next_label(), StageLabel::Stage(Stage::River));
        assert_eq!(Stage::River.next_label(), StageLabel::NewHand);
        assert_eq!(Stage::River.next_label().to_string(), "new hand");
        assert_eq!(Stage::PreFlop.to_string(), "pre-flop");
    }

    // === Chip Tests ===

    #[test]
    fn test_chip_values() {
        for value in CHIP_VALUES {
            assert!(is_chip_value(value));
        }
        assert!(!is_chip_value(0));
        assert!(!is_chip_value(3));
        assert!(!is_chip_value(60));
    }

    #[test]
    fn test_pending_chips_remove_keeps_order() {
        let mut pending = PendingChips::default();
        for value in [5, 10, 25] {
            pending.push(value);
        }
        assert_eq!(pending.total(), 40);
        assert_eq!(pending.remove(1), Some(10));
        assert_eq!(pending.as_slice(), &[5, 25]);
        assert_eq!(pending.remove(7), None);
        assert_eq!(pending.len(), 2);
    }

    // === History Tests ===

    #[test]
    fn test_history_is_most_recent_first() {
        let mut history = History::new();
        history.push(stage_change(history.next_seq(), Stage::PreFlop));
        history.push(stage_change(history.next_seq(), Stage::Flop));

        assert_eq!(history.len(), 2);
        assert_eq!(history.latest().map(HistoryEntry::seq), Some(1));
        let seqs: Vec<_> = history.iter().map(HistoryEntry::seq).collect();
        assert_eq!(seqs, vec![1, 0]);
    }

    #[test]
    fn test_history_entry_display() {
        let bet = HistoryEntry::Bet(BetRecord {
            seq: 0,
            player_id: 0,
            player: "alice".to_string(),
            action: BetAction::Raised,
            amount: 25,
            total_bet: 25,
            stage: Stage::Flop,
            timestamp: Utc::now(),
        });
        assert_eq!(bet.to_string(), "alice raised 25 chips (flop)");
        assert_eq!(
            stage_change(1, Stage::PreFlop).to_string(),
            "stage change: pre-flop → flop"
        );
    }
}

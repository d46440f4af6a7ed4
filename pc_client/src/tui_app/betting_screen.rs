use chrono::Local;
use log::debug;
use pokerchips::{
    Action, CHIP_VALUES, Outcome, Session,
    entities::{Chips, HistoryEntry},
};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Cell, List, ListItem, Padding, Paragraph, Row, Table},
};
use std::time::{Duration, Instant};

use super::{Navigation, Record, RecordKind, ScreenView};
use crate::commands::{BettingCommand, parse_betting_command};

const HELP: &str = "\
chip <value> (or just <value>)
        Add a chip to your pending bet. Chips are 1, 2, 5, 10, 25 and 50.
remove <position>
        Take the pending chip at a position (1 is the first) back.
call
        Match the highest bet.
raise
        Bet the pending chips.
next
        Move to the next stage. Leaving the river ends the round.
end
        End the round now and pass the dealer button.
new
        Leave this game and go back to setup.
help
        Show this window.
";

const ACCEPTED_CUE: Duration = Duration::from_millis(300);
const REJECTED_CUE: Duration = Duration::from_millis(600);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CueKind {
    Accepted,
    Rejected,
}

impl CueKind {
    fn duration(self) -> Duration {
        match self {
            Self::Accepted => ACCEPTED_CUE,
            Self::Rejected => REJECTED_CUE,
        }
    }
}

/// Short highlight after a chip is picked. Purely cosmetic.
#[derive(Clone, Copy, Debug)]
pub struct BetCue {
    kind: CueKind,
    t: Instant,
}

impl BetCue {
    pub fn new(kind: CueKind) -> Self {
        Self {
            kind,
            t: Instant::now(),
        }
    }

    pub fn kind(&self) -> CueKind {
        self.kind
    }

    pub fn is_active(&self) -> bool {
        self.t.elapsed() < self.kind.duration()
    }
}

fn chip_style(value: Chips) -> Style {
    let style = Style::default().bold();
    match value {
        1 => style.black().on_white(),
        2 => style.black().on_light_yellow(),
        5 => style.white().on_red(),
        10 => style.white().on_blue(),
        25 => style.black().on_light_green(),
        50 => style.white().on_magenta(),
        _ => style,
    }
}

fn make_chip_span(value: Chips) -> Span<'static> {
    Span::styled(format!(" {value:>2} "), chip_style(value))
}

fn make_history_item(entry: &HistoryEntry) -> ListItem<'static> {
    let time = format!("[{}] ", entry.timestamp().with_timezone(&Local).format("%H:%M:%S"));
    let content = match entry {
        HistoryEntry::Bet(_) => Span::raw(entry.to_string()),
        HistoryEntry::StageChange(_) => Span::styled(entry.to_string(), Style::default().light_yellow()),
        HistoryEntry::DealerChange(_) => Span::styled(entry.to_string(), Style::default().light_blue()),
    };
    ListItem::new(Line::from(vec![time.dark_gray(), content]))
}

/// The table once betting is under way. Owns the session.
pub struct BettingScreen {
    session: Session,
    cue: Option<BetCue>,
}

impl BettingScreen {
    pub fn new(session: Session) -> Self {
        Self { session, cue: None }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    /// The chip cue, while it's still showing.
    pub fn cue(&self) -> Option<BetCue> {
        self.cue.filter(BetCue::is_active)
    }

    pub fn handle(&mut self, input: &str) -> (Record, Navigation) {
        let command = match parse_betting_command(input) {
            Ok(command) => command,
            Err(error) => return (Record::new(RecordKind::Error, error.to_string()), Navigation::Stay),
        };
        let Some(action) = command.action() else {
            return match command {
                BettingCommand::NewGame => (
                    Record::new(RecordKind::Game, "Leaving the table for a new game".to_string()),
                    Navigation::NewGame,
                ),
                _ => (
                    Record::new(RecordKind::Ack, "Showing betting commands".to_string()),
                    Navigation::ShowHelp,
                ),
            };
        };

        let outcome = self.session.apply(action);
        debug!("{action:?} -> {outcome:?}");
        let record = match (action, outcome) {
            (Action::SelectChip(value), Outcome::ChipAccepted) => {
                self.cue = Some(BetCue::new(CueKind::Accepted));
                Record::new(
                    RecordKind::Ack,
                    format!(
                        "Added a {value} chip, {} pending",
                        self.session.pending().total()
                    ),
                )
            }
            (Action::SelectChip(value), Outcome::ChipRejected(reason)) => {
                self.cue = Some(BetCue::new(CueKind::Rejected));
                Record::new(RecordKind::Alert, format!("Can't add a {value} chip: {reason}"))
            }
            (_, Outcome::ChipRemoved(value)) => {
                Record::new(RecordKind::Ack, format!("Took back a {value} chip"))
            }
            (_, Outcome::Bet(_) | Outcome::StageChanged(_) | Outcome::RoundEnded(_)) => {
                let content = self
                    .session
                    .history()
                    .latest()
                    .map_or_else(String::new, ToString::to_string);
                Record::new(RecordKind::Game, content)
            }
            (Action::Call, _) => Record::new(RecordKind::Alert, "Nothing to call".to_string()),
            (Action::Raise, _) => {
                Record::new(RecordKind::Alert, "Select chips before raising".to_string())
            }
            (Action::RemoveChip(idx), _) => Record::new(
                RecordKind::Alert,
                format!("No chip at position {}", idx + 1),
            ),
            _ => Record::new(RecordKind::Alert, format!("'{input}' did nothing")),
        };
        (record, Navigation::Stay)
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let session = &self.session;
        let mut spans = vec![
            format!(" round {}  ", session.round()).into(),
            "stage: ".into(),
            session.stage().to_string().light_yellow().bold(),
            "  pot: ".into(),
            session.pot().to_string().light_green().bold(),
        ];
        if session.highest_bet() > 0 {
            spans.push(format!("  highest bet: {}", session.highest_bet()).into());
        }
        spans.push(format!("  max bet: {}", session.max_bet()).into());
        let header = Paragraph::new(Line::from(spans)).block(Block::bordered().title(self.title()));
        frame.render_widget(header, area);
    }

    fn make_player_row(&self, idx: usize) -> Row<'static> {
        let player = &self.session.players()[idx];
        let move_repr = if idx == self.session.current_idx() { "→" } else { "" };
        let dealer_repr = if idx == self.session.dealer_idx() { "D" } else { "" };
        let bet_repr = if player.current_bet > 0 {
            player.current_bet.to_string()
        } else {
            "-".to_string()
        };

        let row = Row::new(vec![
            Cell::new(Text::from(move_repr).alignment(Alignment::Center)),
            Cell::new(Text::from(dealer_repr).alignment(Alignment::Center)),
            Cell::new(Text::from(player.name.clone()).alignment(Alignment::Left)),
            Cell::new(Text::from(bet_repr).alignment(Alignment::Right)),
        ]);
        if idx == self.session.current_idx() {
            row.bold().white()
        } else {
            row
        }
    }

    fn draw_players(&self, frame: &mut Frame, area: Rect) {
        let table = Table::new(
            (0..self.session.players().len()).map(|idx| self.make_player_row(idx)),
            [
                Constraint::Max(3),
                Constraint::Max(3),
                Constraint::Fill(2),
                Constraint::Fill(1),
            ],
        )
        .block(
            Block::bordered()
                .padding(Padding::horizontal(1))
                .title(" players  "),
        );
        frame.render_widget(table, area);
    }

    /// Chips picked this turn, else what the player already has in.
    fn bet_summary(&self) -> String {
        let player = self.session.current_player();
        let pending = self.session.pending();
        if !pending.is_empty() {
            format!("{} chips", pending.total())
        } else if player.current_bet > 0 {
            format!("Current: {} chips", player.current_bet)
        } else {
            "No bet yet".to_string()
        }
    }

    fn draw_current_bet(&self, frame: &mut Frame, area: Rect) {
        let session = &self.session;
        let player = session.current_player();
        let pending = session.pending();

        let mut lines = vec![
            Line::from(format!("{}'s turn", player.name).bold()),
            Line::from(self.bet_summary()),
        ];

        let remaining = session.remaining_bet_allowed();
        lines.push(if remaining > 0 {
            Line::from(format!("Remaining: {remaining}"))
        } else {
            Line::from("Max bet limit reached".light_red())
        });
        if session.can_call() {
            lines.push(Line::from(vec![
                "call".bold().white(),
                format!(" ({})", session.call_amount()).into(),
            ]));
        }
        if !pending.is_empty() {
            let chips: Vec<Span> = pending
                .as_slice()
                .iter()
                .enumerate()
                .flat_map(|(idx, value)| {
                    [
                        format!("{}:", idx + 1).dark_gray(),
                        make_chip_span(*value),
                        " ".into(),
                    ]
                })
                .collect();
            lines.push(Line::default());
            lines.push(Line::from(chips));
        }

        let border_style = match self.cue().map(|cue| cue.kind()) {
            Some(CueKind::Accepted) => Style::default().light_green(),
            Some(CueKind::Rejected) => Style::default().light_red(),
            None => Style::default(),
        };
        let panel = Paragraph::new(lines).block(
            Block::bordered()
                .border_style(border_style)
                .padding(Padding::horizontal(1))
                .title(" current bet  "),
        );
        frame.render_widget(panel, area);
    }

    fn draw_chips(&self, frame: &mut Frame, area: Rect) {
        let remaining = self.session.remaining_bet_allowed();
        let chips: Vec<Span> = CHIP_VALUES
            .iter()
            .flat_map(|&value| {
                let chip = if i64::from(value) > remaining {
                    make_chip_span(value).dim()
                } else {
                    make_chip_span(value)
                };
                [chip, "  ".into()]
            })
            .collect();
        let chips = Paragraph::new(Line::from(chips))
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" chips  "));
        frame.render_widget(chips, area);
    }

    fn draw_history(&self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered().title(" this round  ");
        if self.session.history().is_empty() {
            let empty = Paragraph::new("No actions yet".dark_gray().italic()).block(block);
            frame.render_widget(empty, area);
            return;
        }
        let items: Vec<ListItem> = self.session.history().iter().map(make_history_item).collect();
        frame.render_widget(List::new(items).block(block), area);
    }
}

impl ScreenView for BettingScreen {
    fn title(&self) -> String {
        format!(" {}  ", self.session.stage())
    }

    fn help(&self) -> &'static str {
        HELP
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) {
        let [header_area, table_area, chips_area, history_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(self.session.players().len() as u16 + 2),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .areas(area);
        let [players_area, bet_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(table_area);

        self.draw_header(frame, header_area);
        self.draw_players(frame, players_area);
        self.draw_current_bet(frame, bet_area);
        self.draw_chips(frame, chips_area);
        self.draw_history(frame, history_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokerchips::GameSetup;

    fn screen() -> BettingScreen {
        let setup = GameSetup::new(&["alice", "bob", "carol"], 100).unwrap();
        BettingScreen::new(Session::new(setup).unwrap())
    }

    #[test]
    fn test_chip_accepted_sets_cue() {
        let mut screen = screen();
        let (record, navigation) = screen.handle("25");
        assert_eq!(record.kind, RecordKind::Ack);
        assert_eq!(record.content, "Added a 25 chip, 25 pending");
        assert_eq!(navigation, Navigation::Stay);
        assert_eq!(screen.cue().map(|cue| cue.kind()), Some(CueKind::Accepted));
    }

    #[test]
    fn test_chip_rejected_sets_cue() {
        let mut screen = screen();
        let (record, _) = screen.handle("chip 60");
        assert_eq!(record.kind, RecordKind::Alert);
        assert!(record.content.contains("no such chip"));
        assert_eq!(screen.cue().map(|cue| cue.kind()), Some(CueKind::Rejected));
        assert!(screen.session().pending().is_empty());
    }

    #[test]
    fn test_cue_expires() {
        let cue = BetCue {
            kind: CueKind::Accepted,
            t: Instant::now() - ACCEPTED_CUE,
        };
        assert!(!cue.is_active());
        assert!(BetCue::new(CueKind::Rejected).is_active());
    }

    #[test]
    fn test_raise_and_call_records() {
        let mut screen = screen();
        screen.handle("10");
        let (record, _) = screen.handle("raise");
        assert_eq!(record.kind, RecordKind::Game);
        assert_eq!(record.content, "alice raised 10 chips (pre-flop)");
        let (record, _) = screen.handle("call");
        assert_eq!(record.content, "bob called 10 chips (pre-flop)");
        assert_eq!(screen.session().pot(), 20);
    }

    #[test]
    fn test_ignored_actions_alert() {
        let mut screen = screen();
        let (record, _) = screen.handle("call");
        assert_eq!(record.kind, RecordKind::Alert);
        assert_eq!(record.content, "Nothing to call");
        let (record, _) = screen.handle("raise");
        assert_eq!(record.content, "Select chips before raising");
        let (record, _) = screen.handle("remove 2");
        assert_eq!(record.content, "No chip at position 2");
    }

    #[test]
    fn test_remove_chip() {
        let mut screen = screen();
        screen.handle("5");
        screen.handle("10");
        let (record, _) = screen.handle("remove 1");
        assert_eq!(record.content, "Took back a 5 chip");
        assert_eq!(screen.session().pending().as_slice(), &[10]);
    }

    #[test]
    fn test_stage_and_round_records() {
        let mut screen = screen();
        let (record, _) = screen.handle("next");
        assert_eq!(record.content, "stage change: pre-flop → flop");
        let (record, _) = screen.handle("end");
        assert_eq!(record.content, "dealer changed: alice → bob");
        assert_eq!(screen.session().round(), 2);
    }

    #[test]
    fn test_bet_summary_shows_pending_chips_only() {
        let mut screen = screen();
        assert_eq!(screen.bet_summary(), "No bet yet");
        for input in ["10", "raise", "call", "25", "raise"] {
            screen.handle(input);
        }
        // alice again, with 10 already in
        assert_eq!(screen.bet_summary(), "Current: 10 chips");
        screen.handle("5");
        assert_eq!(screen.bet_summary(), "5 chips");
    }

    #[test]
    fn test_navigation_commands() {
        let mut screen = screen();
        assert_eq!(screen.handle("help").1, Navigation::ShowHelp);
        assert_eq!(screen.handle("new").1, Navigation::NewGame);
        let (record, navigation) = screen.handle("fold");
        assert_eq!(record.kind, RecordKind::Error);
        assert_eq!(navigation, Navigation::Stay);
    }
}

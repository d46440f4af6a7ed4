use log::debug;
use pokerchips::{
    MAX_PLAYERS, MIN_PLAYERS, SetupForm,
    constants::{MAX_MAX_BET, MIN_MAX_BET},
    entities::display_name,
};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Style, Stylize},
    symbols,
    text::{Line, Span, Text},
    widgets::{Block, Cell, LineGauge, Padding, Paragraph, Row, Table},
};

use super::{Navigation, Record, RecordKind, ScreenView};
use crate::commands::{SetupCommand, parse_setup_command};

const HELP: &str = "\
players <count>
        Seat 2 to 4 players.
name <seat> <name>
        Name the player at a seat (1-4). Leave the name out to reset it.
maxbet <amount>
        Set the max bet, from 50 to 500 in steps of 50.
more / less
        Step the max bet up or down by 50.
start
        Start betting with these players.
help
        Show this window.
";

/// Player names and limits, filled in before betting starts.
pub struct SetupScreen {
    form: SetupForm,
}

impl SetupScreen {
    pub fn new(form: SetupForm) -> Self {
        Self { form }
    }

    pub fn form(&self) -> &SetupForm {
        &self.form
    }

    pub fn handle(&mut self, input: &str) -> (Record, Navigation) {
        let command = match parse_setup_command(input) {
            Ok(command) => command,
            Err(error) => return (Record::new(RecordKind::Error, error.to_string()), Navigation::Stay),
        };
        debug!("setup command: {command:?}");

        let ack = |content: String| (Record::new(RecordKind::Ack, content), Navigation::Stay);
        let refuse = |content: String| (Record::new(RecordKind::Error, content), Navigation::Stay);
        match command {
            SetupCommand::Players(count) => match self.form.set_player_count(count) {
                Ok(()) => ack(format!("{count} players")),
                Err(error) => refuse(error.to_string()),
            },
            SetupCommand::Name(seat, name) => {
                if seat >= self.form.player_count() {
                    return refuse(format!(
                        "Seat {} isn't in play with {} players",
                        seat + 1,
                        self.form.player_count()
                    ));
                }
                match self.form.set_name(seat, &name) {
                    Ok(()) => ack(format!("Seat {} is {}", seat + 1, display_name(seat, &name))),
                    Err(error) => refuse(error.to_string()),
                }
            }
            SetupCommand::MaxBet(max_bet) => match self.form.set_max_bet(max_bet) {
                Ok(()) => ack(format!("Max bet is {max_bet}")),
                Err(error) => refuse(format!(
                    "{error} (use {MIN_MAX_BET}-{MAX_MAX_BET} in steps of 50)"
                )),
            },
            SetupCommand::More => {
                self.form.raise_max_bet();
                ack(format!("Max bet is {}", self.form.max_bet()))
            }
            SetupCommand::Less => {
                self.form.lower_max_bet();
                ack(format!("Max bet is {}", self.form.max_bet()))
            }
            SetupCommand::Help => (
                Record::new(RecordKind::Ack, "Showing setup commands".to_string()),
                Navigation::ShowHelp,
            ),
            SetupCommand::Start => (
                Record::new(
                    RecordKind::Game,
                    format!(
                        "Starting a game for {} players, max bet {}",
                        self.form.player_count(),
                        self.form.max_bet()
                    ),
                ),
                Navigation::Start(self.form.build()),
            ),
        }
    }

    fn draw_player_count(&self, frame: &mut Frame, area: Rect) {
        let buttons: Vec<Span> = (MIN_PLAYERS..=MAX_PLAYERS)
            .flat_map(|count| {
                let button = format!(" {count} ");
                let button = if count == self.form.player_count() {
                    button.black().on_light_green().bold()
                } else {
                    button.dark_gray()
                };
                [button, "  ".into()]
            })
            .collect();
        let line = Line::from(
            std::iter::once(Span::raw(" players: "))
                .chain(buttons)
                .collect::<Vec<_>>(),
        );
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_names(&self, frame: &mut Frame, area: Rect) {
        let rows = self.form.names().iter().enumerate().map(|(seat, name)| {
            let name = if name.trim().is_empty() {
                Span::styled(display_name(seat, name), Style::default().dark_gray().italic())
            } else {
                Span::raw(display_name(seat, name))
            };
            Row::new(vec![
                Cell::new(Text::from(format!("seat {}", seat + 1)).alignment(Alignment::Left)),
                Cell::new(Text::from(name).alignment(Alignment::Left)),
            ])
        });
        let table = Table::new(rows, [Constraint::Length(8), Constraint::Fill(1)])
            .block(Block::bordered().title(" names  "));
        frame.render_widget(table, area);
    }

    fn draw_max_bet(&self, frame: &mut Frame, area: Rect) {
        let ratio = f64::from(self.form.max_bet() - MIN_MAX_BET)
            / f64::from(MAX_MAX_BET - MIN_MAX_BET);
        let gauge = LineGauge::default()
            .block(Block::bordered().title(" max bet  "))
            .filled_style(Style::default().light_green())
            .line_set(symbols::line::THICK)
            .label(format!("{:>3} ", self.form.max_bet()))
            .ratio(ratio.clamp(0.0, 1.0));
        frame.render_widget(gauge, area);
    }
}

impl ScreenView for SetupScreen {
    fn title(&self) -> String {
        " new game  ".to_string()
    }

    fn help(&self) -> &'static str {
        HELP
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .padding(Padding::uniform(1))
            .title(self.title());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [count_area, names_area, max_bet_area, hint_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(MAX_PLAYERS as u16 + 2),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .areas(inner);

        self.draw_player_count(frame, count_area);
        self.draw_names(frame, names_area);
        self.draw_max_bet(frame, max_bet_area);

        let hint = Line::from(vec![
            " type ".into(),
            "start".bold().white(),
            " to begin betting".into(),
        ]);
        frame.render_widget(Paragraph::new(hint), hint_area);
    }
}

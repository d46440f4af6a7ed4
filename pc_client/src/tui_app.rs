//! TUI application for the poker chips table.
//!
//! Two screens share one frame: the setup screen collects player names and
//! the max bet, then hands a [`GameSetup`] to the betting screen, which owns
//! the [`Session`] until the table starts a new game.

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use enum_dispatch::enum_dispatch;
use log::{info, warn};
use pokerchips::{GameSetup, Session, SetupForm};
use ratatui::{
    DefaultTerminal, Frame,
    crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    layout::{Constraint, Flex, Layout, Margin, Position, Rect},
    style::{Style, Stylize},
    symbols::scrollbar,
    text::{Line, Span},
    widgets::{
        Block, Clear, List, ListDirection, ListItem, Paragraph, Scrollbar, ScrollbarOrientation,
    },
};
use std::time::Duration;

mod betting_screen;
mod setup_screen;
mod widgets;

pub use betting_screen::{BetCue, BettingScreen, CueKind};
pub use setup_screen::SetupScreen;
use widgets::{ScrollableList, UserInput};

use crate::{config::ClientConfig, logging};

const MAX_LOG_RECORDS: usize = 1024;
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RecordKind {
    Ack,
    Alert,
    Error,
    Game,
    You,
}

/// A timestamped terminal message with an importance label to help
/// direct user attention.
#[derive(Clone, Debug)]
pub struct Record {
    pub datetime: DateTime<Utc>,
    pub kind: RecordKind,
    pub content: String,
}

impl Record {
    pub fn new(kind: RecordKind, content: String) -> Self {
        Self {
            datetime: Utc::now(),
            kind,
            content,
        }
    }
}

impl From<Record> for ListItem<'_> {
    fn from(val: Record) -> Self {
        let repr = match val.kind {
            RecordKind::Ack => "ACK".light_blue(),
            RecordKind::Alert => "ALERT".light_magenta(),
            RecordKind::Error => "ERROR".light_red(),
            RecordKind::Game => "GAME".light_yellow(),
            RecordKind::You => "YOU".light_green(),
        };

        let msg = vec![
            format!("[{} ", val.datetime.with_timezone(&Local).format("%H:%M:%S")).into(),
            Span::styled(format!("{repr:5}"), repr.style),
            format!("]: {}", val.content).into(),
        ];

        ListItem::new(Line::from(msg))
    }
}

/// Where the app goes after a screen handles a command.
#[derive(Debug, PartialEq)]
pub enum Navigation {
    Stay,
    ShowHelp,
    Start(GameSetup),
    NewGame,
}

/// Behavior every screen provides to the app frame.
#[enum_dispatch]
pub trait ScreenView {
    fn title(&self) -> String;
    /// Command reference shown in the help window.
    fn help(&self) -> &'static str;
    fn draw(&mut self, frame: &mut Frame, area: Rect);
}

#[enum_dispatch(ScreenView)]
pub enum Screen {
    Setup(SetupScreen),
    Betting(BettingScreen),
}

impl Screen {
    pub fn setup(form: SetupForm) -> Self {
        SetupScreen::new(form).into()
    }

    /// Betting screen for `setup`. Without a valid setup there's nothing to
    /// bet on, so this falls back to an empty setup screen.
    pub fn betting(setup: Option<GameSetup>) -> Self {
        let Some(setup) = setup else {
            warn!("no game setup for the betting screen, showing setup instead");
            return Self::setup(SetupForm::default());
        };
        match Session::new(setup) {
            Ok(session) => BettingScreen::new(session).into(),
            Err(error) => {
                warn!("can't start betting ({error}), showing setup instead");
                Self::setup(SetupForm::default())
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Setup(_) => "setup",
            Self::Betting(_) => "betting",
        }
    }
}

/// TUI App state
pub struct TuiApp {
    screen: Screen,
    /// Whether to display the help menu window
    show_help_menu: bool,
    /// Helps scroll through the help menu window if the terminal is small
    help_handle: ScrollableList,
    /// History of recorded messages
    log_handle: ScrollableList,
    /// Current value of the input box
    user_input: UserInput,
}

impl TuiApp {
    /// Start on the setup screen prefilled from `config`, or go straight to
    /// betting when quick start is on.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let screen = match config.quick_start_setup()? {
            Some(setup) => Screen::betting(Some(setup)),
            None => Screen::setup(config.setup_form()?),
        };
        let mut app = Self {
            screen,
            show_help_menu: false,
            help_handle: ScrollableList::new(MAX_LOG_RECORDS),
            log_handle: ScrollableList::new(MAX_LOG_RECORDS),
            user_input: UserInput::new(),
        };
        app.reload_help();
        Ok(app)
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.screen {
            Screen::Betting(screen) => Some(screen.session()),
            Screen::Setup(_) => None,
        }
    }

    pub fn setup_form(&self) -> Option<&SetupForm> {
        match &self.screen {
            Screen::Setup(screen) => Some(screen.form()),
            Screen::Betting(_) => None,
        }
    }

    pub fn is_showing_help(&self) -> bool {
        self.show_help_menu
    }

    /// Number of records in the on-screen log.
    pub fn log_len(&self) -> usize {
        self.log_handle.len()
    }

    /// Fill help menu with the current screen's help text lines
    fn reload_help(&mut self) {
        self.help_handle.clear();
        self.help_handle.push("".into());
        for line in self.screen.help().lines() {
            self.help_handle.push(line.into());
        }
        self.help_handle.push("".into());
        self.help_handle.jump_to_first();
    }

    fn switch_screen(&mut self, screen: Screen) {
        info!("switching to the {} screen", screen.name());
        self.screen = screen;
        self.show_help_menu = false;
        self.reload_help();
    }

    /// Run one line of user input against the current screen. Returns the
    /// record describing what happened, which is also added to the log.
    pub fn submit(&mut self, input: &str) -> Record {
        let input = input.trim();
        if input.is_empty() {
            return Record::new(RecordKind::Alert, "Type a command, or press Tab for help".to_string());
        }
        self.log_handle
            .push(Record::new(RecordKind::You, input.to_string()).into());

        let (record, navigation) = match &mut self.screen {
            Screen::Setup(screen) => screen.handle(input),
            Screen::Betting(screen) => screen.handle(input),
        };
        logging::log_command(self.screen.name(), input, record.kind != RecordKind::Error);

        match navigation {
            Navigation::Stay => {}
            Navigation::ShowHelp => self.show_help_menu = true,
            Navigation::Start(setup) => self.switch_screen(Screen::betting(Some(setup))),
            Navigation::NewGame => {
                let previous = std::mem::replace(&mut self.screen, Screen::setup(SetupForm::default()));
                if let Screen::Betting(screen) = previous {
                    let form = screen.into_session().new_game();
                    self.switch_screen(Screen::setup(form));
                }
            }
        }

        self.log_handle.push(record.clone().into());
        record
    }

    /// Render the log window with scrollbar
    fn draw_log(&mut self, frame: &mut Frame, area: Rect) {
        let log_records = self.log_handle.list_items.clone();
        let log_records = List::new(log_records)
            .direction(ListDirection::BottomToTop)
            .block(Block::bordered().title(" log  "));
        frame.render_stateful_widget(log_records, area, &mut self.log_handle.list_state);

        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .symbols(scrollbar::VERTICAL)
                .begin_symbol(None)
                .end_symbol(None),
            area.inner(Margin {
                vertical: 1,
                horizontal: 1,
            }),
            &mut self.log_handle.scroll_state,
        );
    }

    /// Render the user input area
    fn draw_user_input(&self, frame: &mut Frame, area: Rect) {
        let prompt = match &self.screen {
            Screen::Setup(_) => " setup  ".to_string(),
            Screen::Betting(screen) => {
                format!(" {}  ", screen.session().current_player().name)
            }
        };
        let user_input = Paragraph::new(self.user_input.value.as_str())
            .style(Style::default())
            .block(Block::bordered().title(prompt.light_green()));
        frame.render_widget(user_input, area);
        frame.set_cursor_position(Position::new(
            area.x + self.user_input.char_idx as u16 + 1,
            area.y + 1,
        ));
    }

    /// Render the help bar at the bottom
    fn draw_help_bar(&self, frame: &mut Frame, area: Rect) {
        let help_message = vec![
            "press ".into(),
            "Tab".bold().white(),
            " to view help, press ".into(),
            "Enter".bold().white(),
            " to record a command, or press ".into(),
            "Esc".bold().white(),
            " to exit".into(),
        ];
        frame.render_widget(Paragraph::new(Line::from(help_message)), area);
    }

    /// Render the help menu overlay
    fn draw_help_menu(&mut self, frame: &mut Frame) {
        let vertical = Layout::vertical([Constraint::Max(24)]).flex(Flex::Center);
        let horizontal = Layout::horizontal([Constraint::Max(84)]).flex(Flex::Center);
        let [help_menu_area] = vertical.areas(frame.area());
        let [help_menu_area] = horizontal.areas(help_menu_area);
        frame.render_widget(Clear, help_menu_area);

        let help_items = self.help_handle.list_items.clone();
        let help_items = List::new(help_items)
            .direction(ListDirection::BottomToTop)
            .block(Block::bordered().title(" commands  "));
        frame.render_stateful_widget(help_items, help_menu_area, &mut self.help_handle.list_state);

        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .symbols(scrollbar::VERTICAL)
                .begin_symbol(None)
                .end_symbol(None),
            help_menu_area.inner(Margin {
                vertical: 1,
                horizontal: 1,
            }),
            &mut self.help_handle.scroll_state,
        );
    }

    fn draw(&mut self, frame: &mut Frame) {
        let window = Layout::vertical([
            Constraint::Min(6),    // Screen + log
            Constraint::Length(3), // User input area
            Constraint::Length(1), // Help bar
        ]);
        let [top_area, user_input_area, help_area] = window.areas(frame.area());
        let [screen_area, log_area] =
            Layout::vertical([Constraint::Percentage(70), Constraint::Percentage(30)])
                .areas(top_area);

        self.screen.draw(frame, screen_area);
        self.draw_log(frame, log_area);
        self.draw_user_input(frame, user_input_area);
        self.draw_help_bar(frame, help_area);

        if self.show_help_menu {
            self.draw_help_menu(frame);
        }
    }

    /// Run the TUI application until the user presses Esc.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        loop {
            terminal.draw(|frame| self.draw(frame))?;

            // Redraws on timeout so chip cues fade out.
            if !event::poll(POLL_TIMEOUT)? {
                continue;
            }
            let Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) = event::read()?
            else {
                continue;
            };

            match modifiers {
                KeyModifiers::CONTROL => match code {
                    KeyCode::Home => self.log_handle.jump_to_first(),
                    KeyCode::End => self.log_handle.jump_to_last(),
                    _ => {}
                },
                KeyModifiers::NONE | KeyModifiers::SHIFT => match code {
                    KeyCode::Enter => {
                        let user_input = self.user_input.submit();
                        self.submit(&user_input);
                    }
                    KeyCode::Char(to_insert) => self.user_input.input(to_insert),
                    KeyCode::Backspace => self.user_input.backspace(),
                    KeyCode::Delete => self.user_input.delete(),
                    KeyCode::Left => self.user_input.move_left(),
                    KeyCode::Right => self.user_input.move_right(),
                    KeyCode::Up => {
                        if self.show_help_menu {
                            self.help_handle.move_up();
                        } else {
                            self.log_handle.move_up();
                        }
                    }
                    KeyCode::Down => {
                        if self.show_help_menu {
                            self.help_handle.move_down();
                        } else {
                            self.log_handle.move_down();
                        }
                    }
                    KeyCode::Home => self.user_input.jump_to_first(),
                    KeyCode::End => self.user_input.jump_to_last(),
                    KeyCode::Tab => self.show_help_menu = !self.show_help_menu,
                    KeyCode::Esc => return Ok(()),
                    _ => {}
                },
                _ => {}
            }
        }
    }
}

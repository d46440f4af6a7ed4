use pokerchips::{
    Action,
    entities::{Chips, SeatIndex},
};
use std::fmt;

/// Commands available on the setup screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupCommand {
    /// Number of players at the table.
    Players(usize),
    /// Name for a seat (0-based).
    Name(SeatIndex, String),
    MaxBet(Chips),
    /// Step the max bet up.
    More,
    /// Step the max bet down.
    Less,
    Start,
    Help,
}

/// Commands available on the betting screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BettingCommand {
    Chip(Chips),
    /// Remove a pending chip (0-based).
    Remove(usize),
    Call,
    Raise,
    Next,
    End,
    NewGame,
    Help,
}

impl BettingCommand {
    /// The session action behind this command, if it has one.
    #[must_use]
    pub fn action(self) -> Option<Action> {
        match self {
            Self::Chip(value) => Some(Action::SelectChip(value)),
            Self::Remove(idx) => Some(Action::RemoveChip(idx)),
            Self::Call => Some(Action::Call),
            Self::Raise => Some(Action::Raise),
            Self::Next => Some(Action::AdvanceStage),
            Self::End => Some(Action::EndRound),
            Self::NewGame | Self::Help => None,
        }
    }
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Command needs an argument that wasn't given.
    MissingArgument {
        command: &'static str,
        usage: &'static str,
    },
    /// Argument isn't a valid whole number.
    InvalidNumber(String),
    /// Positions are 1-based.
    InvalidPosition(String),
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingArgument { command, usage } => {
                write!(f, "'{command}' needs an argument (e.g., '{usage}')")
            }
            Self::InvalidNumber(value) => {
                write!(f, "Invalid number '{value}'. Must be a whole number")
            }
            Self::InvalidPosition(value) => {
                write!(f, "Invalid position '{value}'. Positions start at 1")
            }
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{cmd}'. Press Tab to see available commands"
            ),
        }
    }
}

impl std::error::Error for ParseError {}

fn parse_number<T: std::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value
        .parse::<T>()
        .map_err(|_| ParseError::InvalidNumber(value.to_string()))
}

/// Parse a 1-based position into a 0-based index.
fn parse_position(value: &str) -> Result<usize, ParseError> {
    match parse_number::<usize>(value)? {
        0 => Err(ParseError::InvalidPosition(value.to_string())),
        position => Ok(position - 1),
    }
}

fn required<'a>(
    parts: &[&'a str],
    command: &'static str,
    usage: &'static str,
) -> Result<&'a str, ParseError> {
    parts
        .get(1)
        .copied()
        .ok_or(ParseError::MissingArgument { command, usage })
}

/// Parse a command typed on the setup screen.
///
/// # Examples
///
/// ```
/// use pc_client::commands::{SetupCommand, parse_setup_command};
///
/// assert_eq!(parse_setup_command("players 3"), Ok(SetupCommand::Players(3)));
/// assert_eq!(
///     parse_setup_command("name 2 Big Al"),
///     Ok(SetupCommand::Name(1, "Big Al".to_string()))
/// );
/// assert_eq!(parse_setup_command("start"), Ok(SetupCommand::Start));
/// ```
pub fn parse_setup_command(input: &str) -> Result<SetupCommand, ParseError> {
    let trimmed = input.trim();
    let parts: Vec<&str> = trimmed.split_ascii_whitespace().collect();
    let keyword = parts.first().map(|s| s.to_lowercase()).unwrap_or_default();

    match keyword.as_str() {
        "start" | "go" => Ok(SetupCommand::Start),
        "help" => Ok(SetupCommand::Help),
        "more" | "+" => Ok(SetupCommand::More),
        "less" | "-" => Ok(SetupCommand::Less),
        "players" => {
            let value = required(&parts, "players", "players 3")?;
            Ok(SetupCommand::Players(parse_number(value)?))
        }
        "maxbet" | "max" => {
            let value = required(&parts, "maxbet", "maxbet 150")?;
            Ok(SetupCommand::MaxBet(parse_number(value)?))
        }
        "name" => {
            let seat = parse_position(required(&parts, "name", "name 1 alice")?)?;
            // Everything after the seat is the name; blank resets to default.
            let name = parts.get(2..).map(|rest| rest.join(" ")).unwrap_or_default();
            Ok(SetupCommand::Name(seat, name))
        }
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}

/// Parse a command typed on the betting screen. A bare number picks that
/// chip.
///
/// # Examples
///
/// ```
/// use pc_client::commands::{BettingCommand, parse_betting_command};
///
/// assert_eq!(parse_betting_command("25"), Ok(BettingCommand::Chip(25)));
/// assert_eq!(parse_betting_command("chip 5"), Ok(BettingCommand::Chip(5)));
/// assert_eq!(parse_betting_command("remove 1"), Ok(BettingCommand::Remove(0)));
/// assert_eq!(parse_betting_command("call"), Ok(BettingCommand::Call));
/// ```
pub fn parse_betting_command(input: &str) -> Result<BettingCommand, ParseError> {
    let trimmed = input.trim();
    let parts: Vec<&str> = trimmed.split_ascii_whitespace().collect();
    let keyword = parts.first().map(|s| s.to_lowercase()).unwrap_or_default();

    match keyword.as_str() {
        "call" => Ok(BettingCommand::Call),
        "raise" | "bet" => Ok(BettingCommand::Raise),
        "next" | "stage" => Ok(BettingCommand::Next),
        "end" => Ok(BettingCommand::End),
        "new" => Ok(BettingCommand::NewGame),
        "help" => Ok(BettingCommand::Help),
        "chip" => {
            let value = required(&parts, "chip", "chip 25")?;
            Ok(BettingCommand::Chip(parse_number(value)?))
        }
        "remove" | "rm" => {
            let position = required(&parts, "remove", "remove 1")?;
            Ok(BettingCommand::Remove(parse_position(position)?))
        }
        bare if parts.len() == 1 && bare.chars().all(|c| c.is_ascii_digit()) => {
            Ok(BettingCommand::Chip(parse_number(bare)?))
        }
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}

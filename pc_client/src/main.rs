//! A poker chips TUI.
//!
//! Set up a table of 2 to 4 players and a max bet, then take turns
//! picking chips, calling, and raising while the client keeps the pot.

use anyhow::{Context, Result};
use pico_args::Arguments;
use std::path::PathBuf;

use pc_client::{
    config::{ClientConfig, ConfigOverrides},
    logging,
    tui_app::TuiApp,
};

const HELP: &str = "\
Track poker chip bets around a table

USAGE:
  pc_client [OPTIONS]

OPTIONS:
  --max-bet N           Max bet per player, 50-500 in steps of 50  [default: 100]
  --players N           Number of players, 2-4  [default: 2]
  --name NAME           Player name, repeat for each seat in order
  --log-file PATH       Append logs to PATH (logging is off without it)

FLAGS:
  --quick-start         Skip setup and start betting right away
  -h, --help            Print help information

ENVIRONMENT:
  POKERCHIPS_MAX_BET, POKERCHIPS_PLAYERS, POKERCHIPS_NAMES (comma-separated),
  POKERCHIPS_LOG_FILE, RUST_LOG. Flags win over the environment.
";

struct Args {
    max_bet: Option<u32>,
    player_count: Option<usize>,
    names: Vec<String>,
    quick_start: bool,
    log_file: Option<PathBuf>,
}

impl From<Args> for ConfigOverrides {
    fn from(args: Args) -> Self {
        ConfigOverrides {
            max_bet: args.max_bet,
            player_count: args.player_count,
            names: args.names,
            quick_start: args.quick_start,
            log_file: args.log_file,
        }
    }
}

fn main() -> Result<()> {
    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        max_bet: pargs
            .opt_value_from_str("--max-bet")
            .context("--max-bet must be a whole number")?,
        player_count: pargs
            .opt_value_from_str("--players")
            .context("--players must be a whole number")?,
        names: pargs.values_from_str("--name")?,
        quick_start: pargs.contains("--quick-start"),
        log_file: pargs.opt_value_from_os_str("--log-file", |s| {
            Ok::<_, std::convert::Infallible>(PathBuf::from(s))
        })?,
    };
    let remaining = pargs.finish();
    if !remaining.is_empty() {
        anyhow::bail!("Unexpected arguments: {remaining:?}. See --help");
    }

    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env(args.into());
    config.validate()?;
    logging::init(config.log_file.as_deref())?;

    let tui_app = TuiApp::new(&config)?;

    let terminal = ratatui::init();
    let result = tui_app.run(terminal);
    ratatui::restore();

    result
}

//! # Bura CLI Library
//!
//! Terminal front-end for the Bura engine, bots and session layer.
//!
//! The entry point is [`run`], which parses arguments, resolves
//! configuration and dispatches to a subcommand handler.
//!
//! ```no_run
//! use std::io;
//! let args = vec!["bura", "play", "--difficulty", "hard"];
//! let code = bura_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `play`: play a match against a bot, or watch two bots
//! - `sim`: simulate bot-vs-bot matches and record rounds as JSONL
//! - `table`: two bot seats over a shared table with a turn clock
//! - `deal`: show the opening deal for a seed
//! - `stats`: summarize recorded rounds
//! - `cfg`: display the resolved configuration

use clap::Parser;
use std::io::Write;
use std::time::Duration;

use bura_engine::state::Seat;

#[macro_use]
mod macros;

pub mod cli;
mod commands;
mod config;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod io_utils;
pub mod ui;
pub mod validation;

use cli::{BuraCli, Commands};
use commands::{
    PlayOptions, SimOptions, TableOptions, handle_cfg_command, handle_deal_command,
    handle_play_command, handle_sim_command, handle_stats_command, handle_table_command,
};

pub use error::{BatchValidationError, CliError};

const COMMANDS: &[&str] = &["play", "sim", "table", "deal", "stats", "cfg"];

/// Main entry point for the CLI application.
///
/// Returns the process exit code: [`exit_code::SUCCESS`], [`exit_code::ERROR`]
/// or, when the player leaves a match, [`exit_code::INTERRUPTED`].
///
/// ```
/// use std::io;
/// let args = vec!["bura", "deal", "--seed", "42"];
/// let code = bura_cli::run(args, &mut io::stdout(), &mut io::stderr());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match BuraCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;

            // Help and version go to stdout with a zero exit.
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    write_or_exit!(out, "{}", e);
                    exit_code::SUCCESS
                }
                _ => {
                    write_or_exit!(err, "{}", e);
                    write_or_exit!(err, "Usage: bura <command> [options]\n\nCommands:");
                    for c in COMMANDS {
                        write_or_exit!(err, "  {}", c);
                    }
                    write_or_exit!(err, "\nFor full help, run: bura --help");
                    exit_code::ERROR
                }
            };
        }
    };

    if cli.verbose
        && let Err(e) = bura_session::init_logging()
    {
        let _ = ui::display_warning(err, &format!("logging not enabled: {}", e));
    }

    match dispatch(cli.cmd, out, err) {
        Ok(()) => exit_code::SUCCESS,
        Err(CliError::Interrupted(_)) => exit_code::INTERRUPTED,
        Err(e) => {
            write_or_exit!(err, "Error: {}", e);
            exit_code::ERROR
        }
    }
}

fn dispatch(cmd: Commands, out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    if let Commands::Cfg = cmd {
        return handle_cfg_command(out, err);
    }
    let cfg = match config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::write_error(err, &format!("Invalid configuration: {}", e))?;
            return Err(e.into());
        }
    };
    let seed_or_random = |seed: Option<u64>| seed.or(cfg.seed).unwrap_or_else(rand::random);

    match cmd {
        Commands::Play {
            vs,
            seat,
            difficulty,
            target,
            seed,
            no_pace,
        } => {
            let opts = PlayOptions {
                vs,
                seat: seat_from_number(seat),
                difficulty: difficulty.unwrap_or(cfg.difficulty),
                target: target.unwrap_or(cfg.match_target),
                seed: seed_or_random(seed),
                pace: cfg.pace && !no_pace,
            };
            let stdin = std::io::stdin();
            let mut stdin_lock = stdin.lock();
            handle_play_command(opts, out, err, &mut stdin_lock)
        }
        Commands::Sim {
            matches,
            output,
            seed,
            target,
            first,
            second,
        } => handle_sim_command(
            SimOptions {
                matches,
                output,
                seed: seed_or_random(seed),
                target: target.unwrap_or(cfg.match_target),
                tiers: [
                    first.unwrap_or(cfg.difficulty),
                    second.unwrap_or(cfg.difficulty),
                ],
            },
            out,
            err,
        ),
        Commands::Table {
            seed,
            target,
            first,
            second,
            turn_timeout,
            stall,
        } => {
            let secs = turn_timeout.unwrap_or(cfg.turn_timeout_secs);
            if secs == 0 {
                ui::write_error(err, "turn timeout must be >= 1 second")?;
                return Err(CliError::InvalidInput(
                    "turn timeout must be >= 1 second".to_string(),
                ));
            }
            handle_table_command(
                TableOptions {
                    seed: seed_or_random(seed),
                    target: target.unwrap_or(cfg.match_target),
                    tiers: [
                        first.unwrap_or(cfg.difficulty),
                        second.unwrap_or(cfg.difficulty),
                    ],
                    turn_timeout: Duration::from_secs(secs),
                    stall: stall.map(seat_from_number),
                },
                out,
                err,
            )
        }
        Commands::Deal { seed } => handle_deal_command(Some(seed_or_random(seed)), out),
        Commands::Stats { input } => handle_stats_command(input, out, err),
        Commands::Cfg => handle_cfg_command(out, err),
    }
}

fn seat_from_number(n: u8) -> Seat {
    if n == 2 { Seat::Second } else { Seat::First }
}

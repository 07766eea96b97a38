//! # Play Command
//!
//! Interactive Bura against a bot, or a bot-vs-bot match to watch.
//!
//! The human types moves at a prompt (see [`crate::validation::MOVE_HELP`]).
//! Illegal moves are reported and the prompt repeats; the game is untouched.
//! Rounds follow one another until a seat reaches the match target or the
//! human quits.

use crate::cli::Vs;
use crate::error::CliError;
use crate::formatters::{
    format_action, format_card, format_cards, format_hand, format_result, format_score,
};
use crate::io_utils::read_stdin_line;
use crate::ui;
use crate::validation::{MOVE_HELP, ParseResult, arrange_beat, parse_move, validate_target};
use bura_ai::Difficulty;
use bura_engine::engine::{Action, Defense};
use bura_engine::state::{GameState, Phase, Seat};
use bura_session::{LocalSession, MatchConfig, SessionError};
use std::io::{BufRead, Write};

/// Resolved arguments of `bura play`.
#[derive(Debug, Clone, Copy)]
pub struct PlayOptions {
    pub vs: Vs,
    pub seat: Seat,
    pub difficulty: Difficulty,
    pub target: u32,
    pub seed: u64,
    pub pace: bool,
}

/// Plays one match to completion.
///
/// # Errors
///
/// * `CliError::InvalidInput` when the target is zero
/// * `CliError::Interrupted` when the human quits or input ends
/// * `CliError::Engine` for session failures other than illegal moves
pub fn handle_play_command(
    opts: PlayOptions,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    if let Err(msg) = validate_target(opts.target) {
        ui::write_error(err, &msg)?;
        return Err(CliError::InvalidInput(msg));
    }

    let config = MatchConfig {
        match_target: opts.target,
        seed: opts.seed,
    };
    let session = match opts.vs {
        Vs::Human => LocalSession::vs_bot(config, opts.seat, opts.difficulty)?,
        Vs::Bot => LocalSession::bots_only(config, [opts.difficulty, opts.difficulty])?,
    }
    .with_pacing(opts.pace);

    writeln!(
        out,
        "play: vs={} difficulty={} target={} seed={}",
        opts.vs.as_str(),
        opts.difficulty,
        opts.target,
        opts.seed
    )?;
    if opts.vs == Vs::Human {
        writeln!(out, "You are {}. Type `help` for moves.", opts.seat)?;
    }

    runtime_play(session, out, err, stdin)
}

fn runtime_play(
    session: LocalSession,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    super::runtime()?.block_on(play_match(session, out, err, stdin))
}

async fn play_match(
    mut session: LocalSession,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    write_round_header(session.state(), out)?;
    loop {
        for (seat, action) in session.run_bots().await? {
            writeln!(
                out,
                "{} ({}): {}",
                session.controller(seat).label(),
                seat,
                format_action(&action)
            )?;
        }

        if let Some(result) = session.state().result() {
            writeln!(
                out,
                "Round {} over: {}",
                session.state().round_no(),
                format_result(&result)
            )?;
            writeln!(out, "Score: {}", format_score(session.state()))?;
            if let Some(winner) = session.match_winner() {
                writeln!(
                    out,
                    "Match won by {} ({})",
                    winner,
                    session.controller(winner).label()
                )?;
                return Ok(());
            }
            session.next_round()?;
            write_round_header(session.state(), out)?;
            continue;
        }

        let Some(seat) = session.human_to_move() else {
            return Err(CliError::Engine("no seat is able to move".to_string()));
        };
        write_table(session.state(), seat, out)?;
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = read_stdin_line(stdin) else {
            writeln!(out, "Match abandoned.")?;
            return Err(CliError::Interrupted("input closed".to_string()));
        };
        match parse_move(&line, session.state().hand(seat)) {
            ParseResult::Quit => {
                writeln!(out, "Match abandoned.")?;
                return Err(CliError::Interrupted("player quit".to_string()));
            }
            ParseResult::Help => writeln!(out, "{}", MOVE_HELP)?,
            ParseResult::Invalid(msg) => ui::write_error(err, &msg)?,
            ParseResult::Action(action) => {
                let action = arrange(session.state(), seat, action);
                match session.submit(action.clone()) {
                    Ok(_) => writeln!(out, "You ({}): {}", seat, describe_own(&action))?,
                    Err(SessionError::Game(e)) => {
                        ui::write_error(err, &format!("Illegal move: {}", e))?
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }
    }
}

/// Puts a typed beat into an order that faces the attack, when one exists.
fn arrange(state: &GameState, seat: Seat, action: Action) -> Action {
    match (action, state.table()) {
        (Action::Defend(Defense::Beat(cards)), Some(trick)) => Action::Defend(Defense::Beat(
            arrange_beat(state.hand(seat), &trick.cards, state.trump_suit(), cards),
        )),
        (action, _) => action,
    }
}

/// The human sees their own covering cards.
fn describe_own(action: &Action) -> String {
    match action {
        Action::Defend(Defense::HiddenCover(cards)) => {
            format!("cover face-down with {}", format_cards(cards))
        }
        other => format_action(other),
    }
}

fn write_round_header(state: &GameState, out: &mut dyn Write) -> Result<(), CliError> {
    writeln!(
        out,
        "Round {}: trump {}, {} cards in the pile, {} attacks",
        state.round_no(),
        format_card(&state.trump_card()),
        state.deck_size(),
        state.first_attacker()
    )?;
    Ok(())
}

fn write_table(state: &GameState, seat: Seat, out: &mut dyn Write) -> Result<(), CliError> {
    writeln!(
        out,
        "Wager: {} | Pile: {} | Your points: {}",
        state.wager(),
        state.deck_size(),
        state.round_points(seat)
    )?;
    if let Some(trick) = state.table() {
        writeln!(out, "Attack: {}", format_cards(&trick.cards))?;
    }
    if let Phase::WagerPending { .. } = state.phase() {
        let offered = state.wager().next().map(|w| w.to_string()).unwrap_or_default();
        writeln!(out, "Opponent proposes {}: accept (y) or reject (n)?", offered)?;
    }
    writeln!(out, "Hand: {}", format_hand(state.hand(seat)))?;
    Ok(())
}

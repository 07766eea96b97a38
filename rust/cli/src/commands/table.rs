//! `table`: two bot seats play a match through a shared in-memory table.
//!
//! Each seat runs its own [`SeatClient`], so every move goes through the
//! revision-checked publish and the turn clock. `--stall N` makes seat N
//! never move; its opponent then claims each round once the clock runs out.

use std::sync::Arc;
use std::time::Duration;

use crate::error::CliError;
use crate::formatters::{format_result, format_score};
use crate::ui;
use crate::validation::validate_target;
use bura_ai::{BotStrategy, Difficulty, create_bot, decide};
use bura_engine::engine::init_round;
use bura_engine::state::{RoundConfig, RoundResult, Seat};
use bura_session::{
    MatchConfig, MemoryTableStore, SeatClient, SessionError, TableStore, TurnStatus,
};
use std::io::Write;

/// Resolved arguments of `bura table`.
#[derive(Debug, Clone, Copy)]
pub struct TableOptions {
    pub seed: u64,
    pub target: u32,
    pub tiers: [Difficulty; 2],
    pub turn_timeout: Duration,
    pub stall: Option<Seat>,
}

pub fn handle_table_command(
    opts: TableOptions,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if let Err(msg) = validate_target(opts.target) {
        ui::write_error(err, &msg)?;
        return Err(CliError::InvalidInput(msg));
    }
    let config = MatchConfig {
        match_target: opts.target,
        seed: opts.seed,
    };

    let store = Arc::new(MemoryTableStore::new());
    let opening = init_round(&RoundConfig::new_match(config.round_seed(1), config.match_target))?;
    let table = store.create(opening)?;
    writeln!(
        out,
        "table: {} seed={} target={} timeout={}s",
        table,
        opts.seed,
        opts.target,
        opts.turn_timeout.as_secs()
    )?;

    let join = |seat: Seat| {
        SeatClient::join(store.clone(), table.clone(), seat)
            .map(|c| c.with_turn_timeout(opts.turn_timeout))
    };
    let first = join(Seat::First)?;
    let second = join(Seat::Second)?;
    let bots = [
        create_bot(opts.tiers[0], opts.seed ^ 0xB07),
        create_bot(opts.tiers[1], opts.seed ^ 0xB08),
    ];
    let [bot_a, bot_b] = bots;

    let (seen, other) = super::runtime()?.block_on(async {
        tokio::join!(
            drive_seat(first, bot_a, opts.stall == Some(Seat::First), config),
            drive_seat(second, bot_b, opts.stall == Some(Seat::Second), config),
        )
    });
    let seen = seen?;
    other?;

    for (round_no, result) in &seen {
        writeln!(out, "Round {}: {}", round_no, format_result(result))?;
    }
    let last = store.load(&table)?;
    writeln!(out, "Score: {}", format_score(&last))?;
    if let Some(winner) = last.match_winner() {
        writeln!(out, "Match won by {}", winner)?;
    }
    store.close(&table)?;
    Ok(())
}

/// Plays one seat until the match is decided, returning every round result
/// the seat observed.
async fn drive_seat(
    mut client: SeatClient<MemoryTableStore>,
    bot: Box<dyn BotStrategy>,
    stalls: bool,
    config: MatchConfig,
) -> Result<Vec<(u32, RoundResult)>, SessionError> {
    let mut results: Vec<(u32, RoundResult)> = Vec::new();
    loop {
        let status = match client.await_turn().await {
            Ok(status) => status,
            Err(SessionError::TurnExpired { .. }) => {
                match client.claim_timeout() {
                    Ok(_) => {}
                    Err(e) if e.is_retryable() => {}
                    Err(e) => return Err(e),
                }
                continue;
            }
            Err(e) => return Err(e),
        };

        match status {
            TurnStatus::MyTurn if stalls => {
                client.await_update().await?;
            }
            TurnStatus::MyTurn => {
                let seat = client.seat();
                let Some(action) = decide(bot.as_ref(), client.state(), seat, client.history())
                else {
                    continue;
                };
                match client.act(action) {
                    Ok(_) => {}
                    Err(e) if e.is_retryable() => {}
                    Err(e) => return Err(e),
                }
            }
            TurnStatus::RoundOver => {
                let state = client.state();
                let round_no = state.round_no();
                if let Some(result) = state.result()
                    && results.last().map(|(n, _)| *n) != Some(round_no)
                {
                    results.push((round_no, result));
                }
                if state.match_winner().is_some() {
                    return Ok(results);
                }
                match client.deal_next_round(config.round_seed(round_no + 1)) {
                    Ok(_) => {}
                    Err(e) if e.is_retryable() => {}
                    Err(e) => return Err(e),
                }
            }
        }
    }
}

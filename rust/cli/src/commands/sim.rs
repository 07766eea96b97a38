//! Bot-vs-bot simulation.
//!
//! Plays `matches` full matches without thinking delays. Match `i` uses
//! seed `seed + i`, so a run is reproducible from its base seed. With
//! `--output` every finished round is written as one JSONL [`RoundRecord`]
//! line, numbered `YYYYMMDD-NNNNNN` across the whole run.
//!
//! [`RoundRecord`]: bura_engine::logger::RoundRecord

use crate::error::CliError;
use crate::io_utils::ensure_parent_dir;
use crate::ui;
use crate::validation::validate_target;
use bura_ai::Difficulty;
use bura_engine::logger::RoundLogger;
use bura_engine::state::Seat;
use bura_session::{LocalSession, MatchConfig};
use std::io::Write;

/// Resolved arguments of `bura sim`.
#[derive(Debug, Clone)]
pub struct SimOptions {
    pub matches: u32,
    pub output: Option<String>,
    pub seed: u64,
    pub target: u32,
    pub tiers: [Difficulty; 2],
}

#[derive(Debug, Default)]
struct Tally {
    wins: [u32; 2],
    rounds: u32,
    drawn: u32,
    bura: u32,
    recorded: u32,
}

pub fn handle_sim_command(
    opts: SimOptions,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if opts.matches == 0 {
        ui::write_error(err, "matches must be >= 1")?;
        return Err(CliError::InvalidInput("matches must be >= 1".to_string()));
    }
    if let Err(msg) = validate_target(opts.target) {
        ui::write_error(err, &msg)?;
        return Err(CliError::InvalidInput(msg));
    }

    let mut logger = match &opts.output {
        Some(path) => {
            let path = std::path::Path::new(path);
            if let Err(e) = ensure_parent_dir(path) {
                ui::write_error(err, &e)?;
                return Err(CliError::Io(std::io::Error::other(e)));
            }
            Some(RoundLogger::create(path)?)
        }
        None => None,
    };

    writeln!(
        out,
        "sim: matches={} seed={} target={} first={} second={}",
        opts.matches, opts.seed, opts.target, opts.tiers[0], opts.tiers[1]
    )?;

    let rt = super::runtime()?;
    let mut tally = Tally::default();
    for i in 0..opts.matches {
        let config = MatchConfig {
            match_target: opts.target,
            seed: opts.seed.wrapping_add(u64::from(i)),
        };
        let mut session = LocalSession::bots_only(config, opts.tiers)?.with_pacing(false);
        let winner = rt.block_on(session.play_out())?;
        if let Some(w) = winner {
            tally.wins[w.index()] += 1;
        }

        for mut record in session.records() {
            tally.rounds += 1;
            match record.result {
                Some(r) if r.was_bura() => tally.bura += 1,
                Some(r) if r.winner().is_none() => tally.drawn += 1,
                _ => {}
            }
            if let Some(logger) = logger.as_mut() {
                record.round_id = logger.next_id();
                logger.write(&record)?;
                tally.recorded += 1;
            }
        }
    }

    writeln!(
        out,
        "Simulated: {} matches, {} rounds",
        opts.matches, tally.rounds
    )?;
    for seat in Seat::both() {
        writeln!(
            out,
            "{} ({}): {} match wins",
            seat,
            opts.tiers[seat.index()],
            tally.wins[seat.index()]
        )?;
    }
    writeln!(out, "BURA rounds: {}", tally.bura)?;
    writeln!(out, "Drawn rounds: {}", tally.drawn)?;
    if let Some(path) = &opts.output {
        writeln!(out, "Recorded {} rounds to {}", tally.recorded, path)?;
    }
    Ok(())
}

//! `stats`: summarizes JSONL round records written by `bura sim --output`.
//!
//! Lines that fail to parse are skipped and reported with their line
//! number; a file with no readable round is an error.

use crate::error::{BatchValidationError, CliError};
use crate::io_utils::read_text_auto;
use crate::ui;
use bura_engine::logger::RoundRecord;
use bura_engine::state::{RoundResult, Seat, WinReason};
use std::collections::BTreeMap;
use std::io::Write;

#[derive(Debug, Default)]
struct Summary {
    rounds: u32,
    unfinished: u32,
    drawn: u32,
    wins: [u32; 2],
    points: [u32; 2],
    reasons: BTreeMap<&'static str, u32>,
    actions: usize,
}

impl Summary {
    fn add(&mut self, record: &RoundRecord) {
        self.rounds += 1;
        self.actions += record.actions.len();
        match record.result {
            None => self.unfinished += 1,
            Some(RoundResult::Drawn) => self.drawn += 1,
            Some(RoundResult::Won {
                winner,
                reason,
                match_points,
            }) => {
                self.wins[winner.index()] += 1;
                self.points[winner.index()] += match_points;
                *self.reasons.entry(reason_key(&reason)).or_default() += 1;
            }
        }
    }
}

fn reason_key(reason: &WinReason) -> &'static str {
    match reason {
        WinReason::Bura => "bura",
        WinReason::Declaration { .. } => "declaration",
        WinReason::FalseDeclaration { .. } => "false_declaration",
        WinReason::WagerRejected { .. } => "wager_rejected",
        WinReason::Exhaustion => "exhaustion",
        WinReason::Timeout { .. } => "timeout",
    }
}

pub fn handle_stats_command(
    input: String,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let content = match read_text_auto(&input) {
        Ok(c) => c,
        Err(e) => {
            ui::write_error(err, &format!("Failed to read {}", e))?;
            return Err(CliError::Io(std::io::Error::other(e)));
        }
    };

    let mut summary = Summary::default();
    let mut skipped: Vec<BatchValidationError<usize>> = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: RoundRecord = parse_json_or_continue!(line, skipped, idx + 1);
        summary.add(&record);
    }

    for e in &skipped {
        ui::display_warning(err, &format!("skipped line {}", e))?;
    }
    if summary.rounds == 0 {
        ui::write_error(err, "no round records found")?;
        return Err(CliError::InvalidInput(format!(
            "{} contains no round records",
            input
        )));
    }

    writeln!(out, "Rounds: {}", summary.rounds)?;
    for seat in Seat::both() {
        writeln!(
            out,
            "{}: {} rounds won, {} match points",
            seat,
            summary.wins[seat.index()],
            summary.points[seat.index()]
        )?;
    }
    writeln!(out, "Drawn: {}", summary.drawn)?;
    if summary.unfinished > 0 {
        writeln!(out, "Unfinished: {}", summary.unfinished)?;
    }
    for (reason, count) in &summary.reasons {
        writeln!(out, "  {}: {}", reason, count)?;
    }
    writeln!(
        out,
        "Moves per round: {:.1}",
        summary.actions as f64 / f64::from(summary.rounds)
    )?;
    Ok(())
}

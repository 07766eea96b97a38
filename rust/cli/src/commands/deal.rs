//! `deal`: shows the opening of round one for a seed.

use crate::error::CliError;
use crate::formatters::{format_card, format_cards, format_result};
use bura_engine::engine::init_round;
use bura_engine::state::{DEFAULT_MATCH_TARGET, RoundConfig, Seat};
use std::io::Write;

/// Deals round one for `seed` (random when absent) and prints both hands,
/// the trump and the pile from the top.
pub fn handle_deal_command(seed: Option<u64>, out: &mut dyn Write) -> Result<(), CliError> {
    let seed = seed.unwrap_or_else(rand::random);
    let state = init_round(&RoundConfig::new_match(seed, DEFAULT_MATCH_TARGET))?;

    writeln!(out, "Seed: {}", seed)?;
    writeln!(out, "Trump: {}", format_card(&state.trump_card()))?;
    for seat in Seat::both() {
        writeln!(out, "Hand {}: {}", seat, format_cards(state.hand(seat)))?;
    }
    let mut pile = state.deck().to_vec();
    pile.reverse();
    writeln!(out, "Pile: {}", format_cards(&pile))?;
    if let Some(result) = state.result() {
        writeln!(out, "Dealt: {}", format_result(&result))?;
    }
    Ok(())
}

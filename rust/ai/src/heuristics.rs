//! Shared evaluation helpers for the bot tiers.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use bura_engine::cards::{card_points, Card, Rank, Suit};
use bura_engine::rules::{legal_attacks, legal_beats};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::BotView;

/// Locks a bot's RNG. A poisoned lock still holds a usable generator.
pub(crate) fn lock_rng(rng: &Mutex<ChaCha8Rng>) -> MutexGuard<'_, ChaCha8Rng> {
    rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub(crate) fn delay_between(rng: &Mutex<ChaCha8Rng>, min_ms: u64, max_ms: u64) -> Duration {
    Duration::from_millis(lock_rng(rng).random_range(min_ms..=max_ms))
}

/// Legal attacks the opponent can answer card-for-card.
pub fn attacks_for(view: &BotView) -> Vec<Vec<Card>> {
    legal_attacks(view.hand)
        .into_iter()
        .filter(|a| a.len() <= view.opponent_hand_size)
        .collect()
}

pub fn beats_for(view: &BotView, attack: &[Card]) -> Vec<Vec<Card>> {
    legal_beats(view.hand, attack, view.trump)
}

/// Sort key for giving a card away: non-trumps first, then by points and
/// strength.
pub fn discard_key(card: Card, trump: Suit) -> (bool, u32, Rank) {
    (card.is_trump(trump), card.points(), card.rank)
}

/// The `n` cards the hand can best spare for a hidden cover.
pub fn cheapest_cover(hand: &[Card], n: usize, trump: Suit) -> Vec<Card> {
    let mut cards = hand.to_vec();
    cards.sort_by_key(|c| discard_key(*c, trump));
    cards.truncate(n);
    cards
}

pub fn trumps_in(cards: &[Card], trump: Suit) -> usize {
    cards.iter().filter(|c| c.is_trump(trump)).count()
}

/// The beat that spends the fewest trumps, then the weakest cards.
pub fn cheapest_beat(beats: &[Vec<Card>], trump: Suit) -> Option<Vec<Card>> {
    beats
        .iter()
        .min_by_key(|b| {
            let strength: u32 = b.iter().map(|c| c.rank as u32).sum();
            (trumps_in(b, trump), strength)
        })
        .cloned()
}

/// Trumps held weigh heavily; card points add to it.
pub fn hand_strength(view: &BotView) -> u32 {
    trumps_in(view.hand, view.trump) as u32 * 10 + card_points(view.hand)
}

/// A single-card attack with the card the hand can best spare.
pub fn lowest_single(view: &BotView) -> Vec<Card> {
    view.hand
        .iter()
        .copied()
        .min_by_key(|c| discard_key(*c, view.trump))
        .into_iter()
        .collect()
}

//! Hard tier: scored attacks, pass tracking, trump conservation and the
//! occasional bluff.

use std::sync::Mutex;
use std::time::Duration;

use bura_engine::cards::{card_points, Card};
use bura_engine::engine::Defense;
use bura_engine::state::DECLARE_THRESHOLD;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::heuristics::{
    attacks_for, beats_for, cheapest_beat, cheapest_cover, delay_between, hand_strength,
    lock_rng, trumps_in,
};
use crate::{BotStrategy, BotView};

/// Below this many cards in the pile trumps are played freely.
const LOW_DECK: usize = 4;
const BLUFF: f64 = 0.03;
const BLUFF_FLOOR: u32 = 27;

pub struct HardBot {
    rng: Mutex<ChaCha8Rng>,
}

impl HardBot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    /// Higher is better. Favours suits the opponent has conceded before and
    /// multi-card leads; penalises spending trumps while the pile is deep.
    fn score_attack(view: &BotView, attack: &[Card]) -> i64 {
        let suit = attack[0].suit;
        let mut score = attack.len() as i64 * 3;
        score += i64::from(view.history.passes(suit)) * 4;
        if suit == view.trump && view.deck_size > LOW_DECK {
            score -= 15 * attack.len() as i64;
        }
        // Late in the round, high cards are worth cashing.
        if view.deck_size <= LOW_DECK {
            score += i64::from(card_points(attack)) / 2;
        } else {
            score -= i64::from(card_points(attack)) / 4;
        }
        score
    }

    /// Own and opponent's prospects folded into one number.
    fn outlook(view: &BotView) -> i64 {
        i64::from(hand_strength(view)) + i64::from(view.own_points)
            - i64::from(view.opponent_points) / 2
    }
}

impl BotStrategy for HardBot {
    fn name(&self) -> &str {
        "HardBot"
    }

    fn choose_attack(&self, view: &BotView) -> Vec<Card> {
        let attacks = attacks_for(view);
        let Some(best) = attacks.iter().map(|a| Self::score_attack(view, a)).max() else {
            return Vec::new();
        };
        let top: Vec<&Vec<Card>> = attacks
            .iter()
            .filter(|a| Self::score_attack(view, a) == best)
            .collect();
        top.choose(&mut *lock_rng(&self.rng))
            .map(|a| (*a).clone())
            .unwrap_or_default()
    }

    fn choose_defense(&self, view: &BotView, attack: &[Card]) -> Defense {
        let beats = beats_for(view, attack);
        let cover = || Defense::HiddenCover(cheapest_cover(view.hand, attack.len(), view.trump));
        let Some(beat) = cheapest_beat(&beats, view.trump) else {
            return cover();
        };
        let trick = card_points(attack) + card_points(&beat);
        let reaches_31 = view.own_points + trick >= DECLARE_THRESHOLD;
        let burns_trump = trumps_in(&beat, view.trump) > 0;
        if burns_trump && view.deck_size > LOW_DECK && !reaches_31 && card_points(attack) < 10 {
            return cover();
        }
        Defense::Beat(beat)
    }

    fn respond_to_wager(&self, view: &BotView) -> bool {
        Self::outlook(view) >= 25
    }

    fn wants_to_propose(&self, view: &BotView) -> bool {
        view.wager.level() < 4 && Self::outlook(view) >= 30
    }

    fn wants_to_declare(&self, view: &BotView) -> bool {
        if view.can_declare() {
            return true;
        }
        view.own_points >= BLUFF_FLOOR && lock_rng(&self.rng).random_bool(BLUFF)
    }

    fn thinking_delay(&self) -> Duration {
        delay_between(&self.rng, 900, 2000)
    }
}

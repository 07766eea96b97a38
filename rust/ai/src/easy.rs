//! Easy tier: near-random play.

use std::sync::Mutex;
use std::time::Duration;

use bura_engine::cards::Card;
use bura_engine::engine::Defense;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::heuristics::{attacks_for, beats_for, delay_between, lock_rng};
use crate::{BotStrategy, BotView};

const CONCEDE_ANYWAY: f64 = 0.25;
const PROPOSE: f64 = 0.03;
const ACCEPT: f64 = 0.6;
const REMEMBER_TO_DECLARE: f64 = 0.75;

/// Picks uniformly among legal plays, concedes now and then even when it
/// could beat, and sometimes forgets a winning declaration.
pub struct EasyBot {
    rng: Mutex<ChaCha8Rng>,
}

impl EasyBot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    fn random_cover(&self, hand: &[Card], n: usize) -> Vec<Card> {
        let mut cards = hand.to_vec();
        cards.shuffle(&mut *lock_rng(&self.rng));
        cards.truncate(n);
        cards
    }
}

impl BotStrategy for EasyBot {
    fn name(&self) -> &str {
        "EasyBot"
    }

    fn choose_attack(&self, view: &BotView) -> Vec<Card> {
        let attacks = attacks_for(view);
        attacks
            .choose(&mut *lock_rng(&self.rng))
            .cloned()
            .unwrap_or_default()
    }

    fn choose_defense(&self, view: &BotView, attack: &[Card]) -> Defense {
        let beats = beats_for(view, attack);
        let concede = lock_rng(&self.rng).random_bool(CONCEDE_ANYWAY);
        if !concede {
            if let Some(beat) = beats.choose(&mut *lock_rng(&self.rng)) {
                return Defense::Beat(beat.clone());
            }
        }
        Defense::HiddenCover(self.random_cover(view.hand, attack.len()))
    }

    fn respond_to_wager(&self, _view: &BotView) -> bool {
        lock_rng(&self.rng).random_bool(ACCEPT)
    }

    fn wants_to_propose(&self, _view: &BotView) -> bool {
        lock_rng(&self.rng).random_bool(PROPOSE)
    }

    fn wants_to_declare(&self, view: &BotView) -> bool {
        view.can_declare() && lock_rng(&self.rng).random_bool(REMEMBER_TO_DECLARE)
    }

    fn thinking_delay(&self) -> Duration {
        delay_between(&self.rng, 400, 900)
    }
}

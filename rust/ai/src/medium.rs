//! Medium tier: thrifty single-card play.

use std::sync::Mutex;
use std::time::Duration;

use bura_engine::cards::{card_points, Card};
use bura_engine::engine::Defense;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::heuristics::{
    beats_for, cheapest_beat, cheapest_cover, delay_between, hand_strength, lowest_single,
    trumps_in,
};
use crate::{BotStrategy, BotView};

/// Tricks below this many points are not worth a trump.
const TRUMP_WORTHY_TRICK: u32 = 10;

/// Leads its lowest non-trump card, keeps trumps for tricks worth taking
/// and always declares a true 31.
///
/// # Strategy
///
/// - Attack: one card, the cheapest non-trump; trumps only when nothing else is left
/// - Defend: cheapest beat, unless every beat burns a trump on a trick under 10 points
/// - Wagers: accepts with two trumps or a decent hand, proposes only with a strong one
pub struct MediumBot {
    rng: Mutex<ChaCha8Rng>,
}

impl MediumBot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }
}

impl BotStrategy for MediumBot {
    fn name(&self) -> &str {
        "MediumBot"
    }

    fn choose_attack(&self, view: &BotView) -> Vec<Card> {
        lowest_single(view)
    }

    fn choose_defense(&self, view: &BotView, attack: &[Card]) -> Defense {
        let beats = beats_for(view, attack);
        match cheapest_beat(&beats, view.trump) {
            Some(beat)
                if trumps_in(&beat, view.trump) == 0
                    || card_points(attack) >= TRUMP_WORTHY_TRICK =>
            {
                Defense::Beat(beat)
            }
            _ => Defense::HiddenCover(cheapest_cover(view.hand, attack.len(), view.trump)),
        }
    }

    fn respond_to_wager(&self, view: &BotView) -> bool {
        let trumps = trumps_in(view.hand, view.trump);
        trumps >= 2 || (trumps >= 1 && hand_strength(view) + view.own_points >= 30)
    }

    fn wants_to_propose(&self, view: &BotView) -> bool {
        view.wager.level() < 2
            && trumps_in(view.hand, view.trump) >= 2
            && hand_strength(view) >= 35
    }

    fn wants_to_declare(&self, view: &BotView) -> bool {
        view.can_declare()
    }

    fn thinking_delay(&self) -> Duration {
        delay_between(&self.rng, 700, 1400)
    }
}

//! Opponent pass tracking.

use bura_engine::cards::{all_suits, Card, Suit};
use bura_engine::engine::Defense;
use serde::{Deserialize, Serialize};

/// How often the opponent conceded face-down against each suit.
///
/// Bots never update this themselves; the session records every resolved
/// trick and hands the history back on the next decision.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PassHistory {
    passes: [u32; 4],
}

fn slot(suit: Suit) -> usize {
    match suit {
        Suit::Hearts => 0,
        Suit::Diamonds => 1,
        Suit::Clubs => 2,
        Suit::Spades => 3,
    }
}

impl PassHistory {
    pub fn record_pass(&mut self, suit: Suit) {
        self.passes[slot(suit)] += 1;
    }

    /// Records the opponent's answer to an attack. Only concessions count.
    pub fn observe(&mut self, attack: &[Card], answer: &Defense) {
        if let (Defense::HiddenCover(_), Some(lead)) = (answer, attack.first()) {
            self.record_pass(lead.suit);
        }
    }

    pub fn passes(&self, suit: Suit) -> u32 {
        self.passes[slot(suit)]
    }

    pub fn total(&self) -> u32 {
        self.passes.iter().sum()
    }

    /// The suit conceded most often, if any concession was seen.
    pub fn weakest_suit(&self) -> Option<Suit> {
        all_suits()
            .into_iter()
            .filter(|s| self.passes(*s) > 0)
            .max_by_key(|s| self.passes(*s))
    }

    pub fn clear(&mut self) {
        self.passes = [0; 4];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bura_engine::cards::Rank;

    #[test]
    fn only_hidden_covers_are_recorded() {
        let attack = [Card::new(Rank::Ace, Suit::Clubs)];
        let mut history = PassHistory::default();
        history.observe(
            &attack,
            &Defense::Beat(vec![Card::new(Rank::Jack, Suit::Spades)]),
        );
        assert_eq!(history.total(), 0);
        history.observe(
            &attack,
            &Defense::HiddenCover(vec![Card::new(Rank::Jack, Suit::Hearts)]),
        );
        assert_eq!(history.passes(Suit::Clubs), 1);
        assert_eq!(history.weakest_suit(), Some(Suit::Clubs));
    }

    #[test]
    fn empty_history_has_no_weak_suit() {
        assert_eq!(PassHistory::default().weakest_suit(), None);
    }
}

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};

#[derive(Debug)]
pub struct Deck {
    cards: Vec<Card>,
    position: usize,
    rng: ChaCha20Rng,
}

impl Deck {
    pub fn new_with_seed(seed: u64) -> Self {
        let rng = ChaCha20Rng::seed_from_u64(seed);
        // Keep initial order until shuffle is called explicitly
        Self {
            cards: full_deck(),
            position: 0,
            rng,
        }
    }

    pub fn shuffle(&mut self) {
        self.cards = full_deck();
        self.cards.shuffle(&mut self.rng);
        self.position = 0;
    }

    pub fn deal_card(&mut self) -> Option<Card> {
        let c = self.cards.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.position)
    }

    /// Consumes the deck, returning the undealt cards in dealing order.
    pub fn into_remaining(self) -> Vec<Card> {
        self.cards[self.position..].to_vec()
    }
}

/// Builds a freshly shuffled 20-card deck for `seed`.
///
/// The same seed always yields the same order.
pub fn build_deck(seed: u64) -> Vec<Card> {
    let mut deck = Deck::new_with_seed(seed);
    deck.shuffle();
    deck.into_remaining()
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Represents one of the four suits of the 20-card Bura deck.
/// Used as a component of [`Card`]; one suit per round is the trump suit.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Suit {
    /// Hearts suit (♥)
    Hearts,
    /// Diamonds suit (♦)
    Diamonds,
    /// Clubs suit (♣)
    Clubs,
    /// Spades suit (♠)
    Spades,
}

impl Suit {
    pub fn symbol(self) -> char {
        match self {
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
            Suit::Spades => '♠',
        }
    }

    fn from_token(s: &str) -> Option<Suit> {
        match s {
            "h" | "♥" => Some(Suit::Hearts),
            "d" | "♦" => Some(Suit::Diamonds),
            "c" | "♣" => Some(Suit::Clubs),
            "s" | "♠" => Some(Suit::Spades),
            _ => None,
        }
    }
}

/// Represents the rank of a Bura card.
///
/// Variants are declared in beating strength order, so the derived `Ord`
/// compares strength: J < Q < K < 10 < A. Point values do not follow this
/// order (see [`Rank::points`]).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Rank {
    /// Jack, 2 points
    Jack,
    /// Queen, 3 points
    Queen,
    /// King, 4 points
    King,
    /// Ten, 10 points; outranks the face cards
    Ten,
    /// Ace, 11 points
    Ace,
}

impl Rank {
    pub fn points(self) -> u32 {
        match self {
            Rank::Jack => 2,
            Rank::Queen => 3,
            Rank::King => 4,
            Rank::Ten => 10,
            Rank::Ace => 11,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ten => "10",
            Rank::Ace => "A",
        }
    }

    fn from_token(s: &str) -> Option<Rank> {
        match s {
            "j" => Some(Rank::Jack),
            "q" => Some(Rank::Queen),
            "k" => Some(Rank::King),
            "10" | "t" => Some(Rank::Ten),
            "a" => Some(Rank::Ace),
            _ => None,
        }
    }
}

/// Represents a single playing card with a suit and rank.
/// Suit and rank together are unique within the deck, so the pair is the card's identity.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Card {
    /// The suit of the card
    pub suit: Suit,
    /// The rank of the card (Jack through Ace)
    pub rank: Rank,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { suit, rank }
    }

    pub fn points(self) -> u32 {
        self.rank.points()
    }

    pub fn is_trump(self, trump: Suit) -> bool {
        self.suit == trump
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.label(), self.suit.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCardError(pub String);

impl fmt::Display for ParseCardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot parse card '{}'", self.0)
    }
}

impl std::error::Error for ParseCardError {}

impl FromStr for Card {
    type Err = ParseCardError;

    /// Parses `AD`, `10c`, `qh`, `J♠` and similar (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let split = lower
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .ok_or_else(|| ParseCardError(s.to_string()))?;
        let (rank, suit) = lower.split_at(split);
        match (Rank::from_token(rank), Suit::from_token(suit)) {
            (Some(rank), Some(suit)) => Ok(Card { suit, rank }),
            _ => Err(ParseCardError(s.to_string())),
        }
    }
}

pub fn all_suits() -> [Suit; 4] {
    [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades]
}

pub fn all_ranks() -> [Rank; 5] {
    [Rank::Jack, Rank::Queen, Rank::King, Rank::Ten, Rank::Ace]
}

pub const DECK_SIZE: usize = 20;

pub fn full_deck() -> Vec<Card> {
    let mut v = Vec::with_capacity(DECK_SIZE);
    for &s in &all_suits() {
        for &r in &all_ranks() {
            v.push(Card { suit: s, rank: r });
        }
    }
    v
}

/// Sum of the point values of `cards`.
pub fn card_points(cards: &[Card]) -> u32 {
    cards.iter().map(|c| c.points()).sum()
}

/// Returns true when `candidate` beats `target` under the given trump suit.
///
/// A card beats another of its own suit with higher strength, and any trump
/// beats any non-trump. Nothing else beats.
///
/// # Examples
///
/// ```
/// use bura_engine::cards::{beats, Card, Rank, Suit};
///
/// let ten = Card::new(Rank::Ten, Suit::Hearts);
/// let king = Card::new(Rank::King, Suit::Hearts);
/// assert!(beats(ten, king, Suit::Clubs));
///
/// let jack_trump = Card::new(Rank::Jack, Suit::Spades);
/// let ace = Card::new(Rank::Ace, Suit::Hearts);
/// assert!(beats(jack_trump, ace, Suit::Spades));
/// assert!(!beats(ace, jack_trump, Suit::Spades));
/// ```
pub fn beats(candidate: Card, target: Card, trump: Suit) -> bool {
    if candidate.suit == target.suit {
        candidate.rank > target.rank
    } else {
        candidate.suit == trump
    }
}

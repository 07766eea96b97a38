use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::cards::{card_points, Card, Suit, DECK_SIZE};
use crate::errors::GameError;
use crate::wager::WagerLevel;

/// Default number of match points needed to win a match.
pub const DEFAULT_MATCH_TARGET: u32 = 11;
/// Cards each side holds after replenishment.
pub const HAND_SIZE: usize = 3;
/// Round points needed for a truthful declaration.
pub const DECLARE_THRESHOLD: u32 = 31;

/// One of the two seats at the table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Seat {
    First,
    Second,
}

impl Seat {
    pub fn index(self) -> usize {
        match self {
            Seat::First => 0,
            Seat::Second => 1,
        }
    }

    pub fn other(self) -> Seat {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }

    pub fn both() -> [Seat; 2] {
        [Seat::First, Seat::Second]
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seat::First => write!(f, "seat 1"),
            Seat::Second => write!(f, "seat 2"),
        }
    }
}

/// Cards held and won by one seat during a round.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeatState {
    pub(crate) hand: Vec<Card>,
    pub(crate) taken: Vec<Card>,
}

impl SeatState {
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn taken(&self) -> &[Card] {
        &self.taken
    }

    /// Round points: the value of every card this seat has won.
    pub fn round_points(&self) -> u32 {
        card_points(&self.taken)
    }

    pub fn trump_count(&self, trump: Suit) -> usize {
        self.hand.iter().filter(|c| c.suit == trump).count()
    }
}

/// An attack lying on the table, waiting for the defender's answer.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Trick {
    pub attacker: Seat,
    pub cards: Vec<Card>,
}

/// Why a round ended with a winner.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum WinReason {
    /// Three trumps in a hand of three.
    Bura,
    /// Truthful 31-declaration by the declarer.
    Declaration { declarer: Seat },
    /// The declarer claimed 31 without having it and lost.
    FalseDeclaration { declarer: Seat },
    /// The opponent refused the proposer's raise.
    WagerRejected { proposer: Seat },
    /// Cards ran out and the winner had more round points.
    Exhaustion,
    /// The stalled seat let its turn clock run out.
    Timeout { stalled: Seat },
}

/// Outcome of a finished round.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum RoundResult {
    Won {
        winner: Seat,
        reason: WinReason,
        match_points: u32,
    },
    /// Exhaustion with equal round points; nobody scores.
    Drawn,
}

impl RoundResult {
    pub fn winner(&self) -> Option<Seat> {
        match self {
            RoundResult::Won { winner, .. } => Some(*winner),
            RoundResult::Drawn => None,
        }
    }

    pub fn was_bura(&self) -> bool {
        matches!(
            self,
            RoundResult::Won {
                reason: WinReason::Bura,
                ..
            }
        )
    }

    pub fn match_points(&self) -> u32 {
        match self {
            RoundResult::Won { match_points, .. } => *match_points,
            RoundResult::Drawn => 0,
        }
    }
}

/// Round phase. Finishing data lives inside the variant, so a finished round
/// always carries its result.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum Phase {
    Playing,
    WagerPending { proposer: Seat },
    Finished(RoundResult),
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Playing => "playing",
            Phase::WagerPending { .. } => "davi_pending",
            Phase::Finished(_) => "finished",
        }
    }
}

/// The single source of truth for one round of a match.
///
/// Values are never mutated by callers: every transition in
/// [`crate::engine`] borrows a state and returns its successor with
/// `version` incremented.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) version: u64,
    pub(crate) round_no: u32,
    pub(crate) seed: u64,
    pub(crate) seats: [SeatState; 2],
    /// Draw pile. The last element is the top; the trump card sits at index 0.
    pub(crate) deck: Vec<Card>,
    pub(crate) trump: Card,
    pub(crate) table: Option<Trick>,
    pub(crate) turn: Seat,
    pub(crate) first_attacker: Seat,
    pub(crate) phase: Phase,
    pub(crate) wager: WagerLevel,
    pub(crate) match_score: [u32; 2],
    pub(crate) match_target: u32,
}

impl GameState {
    pub fn version(&self) -> u64 {
        self.version
    }
    pub fn round_no(&self) -> u32 {
        self.round_no
    }
    pub fn seed(&self) -> u64 {
        self.seed
    }
    pub fn seat(&self, seat: Seat) -> &SeatState {
        &self.seats[seat.index()]
    }
    pub fn hand(&self, seat: Seat) -> &[Card] {
        &self.seats[seat.index()].hand
    }
    pub fn round_points(&self, seat: Seat) -> u32 {
        self.seats[seat.index()].round_points()
    }
    pub fn deck(&self) -> &[Card] {
        &self.deck
    }
    pub fn deck_size(&self) -> usize {
        self.deck.len()
    }
    /// The turned-up trump indicator.
    pub fn trump_card(&self) -> Card {
        self.trump
    }
    pub fn trump_suit(&self) -> Suit {
        self.trump.suit
    }
    pub fn table(&self) -> Option<&Trick> {
        self.table.as_ref()
    }
    pub fn turn(&self) -> Seat {
        self.turn
    }
    pub fn first_attacker(&self) -> Seat {
        self.first_attacker
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn wager(&self) -> WagerLevel {
        self.wager
    }
    pub fn match_score(&self, seat: Seat) -> u32 {
        self.match_score[seat.index()]
    }
    pub fn match_target(&self) -> u32 {
        self.match_target
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished(_))
    }

    pub fn result(&self) -> Option<RoundResult> {
        match self.phase {
            Phase::Finished(result) => Some(result),
            _ => None,
        }
    }

    /// The seat whose submission is legal next, if any.
    pub fn expected_actor(&self) -> Option<Seat> {
        match self.phase {
            Phase::Playing => Some(self.turn),
            Phase::WagerPending { proposer } => Some(proposer.other()),
            Phase::Finished(_) => None,
        }
    }

    /// The seat that has reached the match target, if any.
    pub fn match_winner(&self) -> Option<Seat> {
        Seat::both()
            .into_iter()
            .find(|s| self.match_score[s.index()] >= self.match_target)
    }

    /// Every tracked card: hands, draw pile, taken piles and table.
    pub fn all_cards(&self) -> Vec<Card> {
        let mut cards: Vec<Card> = Vec::with_capacity(DECK_SIZE);
        for s in &self.seats {
            cards.extend_from_slice(&s.hand);
            cards.extend_from_slice(&s.taken);
        }
        cards.extend_from_slice(&self.deck);
        if let Some(trick) = &self.table {
            cards.extend_from_slice(&trick.cards);
        }
        cards
    }

    pub fn card_count(&self) -> usize {
        self.all_cards().len()
    }

    /// Detects documents no legal sequence of transitions can produce.
    pub fn check_integrity(&self) -> Result<(), GameError> {
        let cards = self.all_cards();
        if cards.len() > DECK_SIZE {
            return Err(GameError::Corrupted(format!(
                "{} cards tracked, deck has {}",
                cards.len(),
                DECK_SIZE
            )));
        }
        let mut seen = HashSet::with_capacity(cards.len());
        for c in cards {
            if !seen.insert(c) {
                return Err(GameError::Corrupted(format!("card {c} tracked twice")));
            }
        }
        if let Some(s) = self.seats.iter().find(|s| s.hand.len() > HAND_SIZE) {
            return Err(GameError::Corrupted(format!(
                "hand holds {} cards",
                s.hand.len()
            )));
        }
        if WagerLevel::new(self.wager.level()).is_none() {
            return Err(GameError::Corrupted("wager level off the ladder".into()));
        }
        Ok(())
    }
}

/// Everything needed to deal a fresh round.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundConfig {
    pub seed: u64,
    pub match_target: u32,
    pub first_attacker: Seat,
    pub match_score: [u32; 2],
    pub round_no: u32,
}

impl RoundConfig {
    /// Round 1 of a new match: seat 1 attacks first, scores start at zero.
    pub fn new_match(seed: u64, match_target: u32) -> Self {
        Self {
            seed,
            match_target,
            first_attacker: Seat::First,
            match_score: [0, 0],
            round_no: 1,
        }
    }
}

/// An explicit card layout, used to resume or reproduce a position.
///
/// `deck` is in draw order: the first element is drawn first.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RoundSetup {
    pub hands: [Vec<Card>; 2],
    pub taken: [Vec<Card>; 2],
    pub deck: Vec<Card>,
    pub trump: Card,
    pub first_attacker: Seat,
    pub match_score: [u32; 2],
    pub match_target: u32,
}

impl GameState {
    /// Builds a `Playing` state from an explicit layout.
    ///
    /// Fails with [`GameError::Corrupted`] when the layout duplicates a card
    /// or overfills a hand. BURA is not evaluated.
    pub fn from_setup(setup: RoundSetup) -> Result<GameState, GameError> {
        let RoundSetup {
            hands: [hand_a, hand_b],
            taken: [taken_a, taken_b],
            mut deck,
            trump,
            first_attacker,
            match_score,
            match_target,
        } = setup;
        deck.reverse();
        let state = GameState {
            version: 0,
            round_no: 1,
            seed: 0,
            seats: [
                SeatState {
                    hand: hand_a,
                    taken: taken_a,
                },
                SeatState {
                    hand: hand_b,
                    taken: taken_b,
                },
            ],
            deck,
            trump,
            table: None,
            turn: first_attacker,
            first_attacker,
            phase: Phase::Playing,
            wager: WagerLevel::NONE,
            match_score,
            match_target,
        };
        state.check_integrity()?;
        Ok(state)
    }
}

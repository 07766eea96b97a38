use thiserror::Error;

use crate::cards::Card;
use crate::state::Seat;

/// Reasons a transition is refused.
///
/// Every variant except [`GameError::Corrupted`] is an illegal move: the
/// caller's state is left untouched and the caller re-prompts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("It's not {actual}'s turn (expected {expected})")]
    NotYourTurn { expected: Seat, actual: Seat },
    #[error("Action not allowed in phase {phase}")]
    WrongPhase { phase: &'static str },
    #[error("Attack must contain at least one card")]
    EmptyAttack,
    #[error("At most {max} cards may be played, got {got}")]
    TooManyCards { max: usize, got: usize },
    #[error("Attacking cards must all share one suit")]
    MixedSuits,
    #[error("Card {0} played twice")]
    DuplicateCard(Card),
    #[error("Card {0} is not in hand")]
    CardNotInHand(Card),
    #[error("Cards are already on the table")]
    TableOccupied,
    #[error("There is no attack to answer")]
    NothingToDefend,
    #[error("Defense needs {expected} cards, got {actual}")]
    CountMismatch { expected: usize, actual: usize },
    #[error("{defender} does not beat {attacker}")]
    DoesNotBeat { defender: Card, attacker: Card },
    #[error("Wager is already at the top of the ladder")]
    WagerAtMaximum,
    #[error("Only the proposer's opponent may answer a wager")]
    NotProposer,
    #[error("Round is not finished")]
    RoundNotFinished,
    #[error("Match is already decided")]
    MatchDecided,
    #[error("Corrupted game state: {0}")]
    Corrupted(String),
}

impl GameError {
    /// True for states that cannot be recovered by re-prompting.
    pub fn is_fatal(&self) -> bool {
        matches!(self, GameError::Corrupted(_))
    }
}

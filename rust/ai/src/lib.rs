//! # bura-ai: Bot Opponents for Bura
//!
//! Provides bot opponents at three difficulty tiers behind one trait.
//! Bots only see what a seated player sees: their own hand, the trump, the
//! attack on the table, scores, the wager level and a pass history the
//! caller threads through.
//!
//! ## Core Components
//!
//! - [`BotStrategy`] - Trait defining the interface for bot decision-making
//! - [`BotView`] - A seat's view of the table
//! - [`PassHistory`] - Per-suit record of the opponent's concessions
//! - [`create_bot`] - Factory function for creating bots by [`Difficulty`]
//! - [`decide`] - Turns a bot's preferences into one legal [`Action`]
//!
//! ## Quick Start
//!
//! ```rust
//! use bura_ai::{create_bot, decide, Difficulty, PassHistory};
//! use bura_engine::engine::{apply, init_round};
//! use bura_engine::state::{RoundConfig, Seat};
//!
//! let bot = create_bot(Difficulty::Medium, 42);
//! let state = init_round(&RoundConfig::new_match(42, 11)).unwrap();
//! let history = PassHistory::default();
//!
//! if let Some(action) = decide(bot.as_ref(), &state, Seat::First, &history) {
//!     let next = apply(&state, Seat::First, &action).unwrap();
//!     assert_eq!(next.version(), 1);
//! }
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use bura_engine::cards::{Card, Suit};
use bura_engine::engine::{Action, Defense};
use bura_engine::state::{GameState, Phase, Seat, DECLARE_THRESHOLD};
use bura_engine::wager::WagerLevel;
use serde::{Deserialize, Serialize};

pub mod easy;
pub mod hard;
pub mod heuristics;
pub mod history;
pub mod medium;

pub use history::PassHistory;

/// What one seat can see when it is asked to move.
#[derive(Debug, Clone, Copy)]
pub struct BotView<'a> {
    pub hand: &'a [Card],
    pub trump: Suit,
    /// The opponent's attack, when defending.
    pub attack: Option<&'a [Card]>,
    pub deck_size: usize,
    pub opponent_hand_size: usize,
    pub own_points: u32,
    pub opponent_points: u32,
    pub wager: WagerLevel,
    pub history: &'a PassHistory,
}

impl<'a> BotView<'a> {
    /// The view `seat` has of `state`.
    pub fn for_seat(state: &'a GameState, seat: Seat, history: &'a PassHistory) -> Self {
        Self {
            hand: state.hand(seat),
            trump: state.trump_suit(),
            attack: state.table().map(|t| t.cards.as_slice()),
            deck_size: state.deck_size(),
            opponent_hand_size: state.hand(seat.other()).len(),
            own_points: state.round_points(seat),
            opponent_points: state.round_points(seat.other()),
            wager: state.wager(),
            history,
        }
    }

    pub fn is_attacking(&self) -> bool {
        self.attack.is_none()
    }

    /// True when a declaration right now would be truthful.
    pub fn can_declare(&self) -> bool {
        self.own_points >= DECLARE_THRESHOLD
    }
}

/// A card play chosen by a bot.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BotMove {
    pub cards: Vec<Card>,
    /// Set when the cards are a face-down concession.
    pub hidden_cover: bool,
}

impl BotMove {
    pub fn into_action(self, attacking: bool) -> Action {
        if attacking {
            Action::Attack(self.cards)
        } else if self.hidden_cover {
            Action::Defend(Defense::HiddenCover(self.cards))
        } else {
            Action::Defend(Defense::Beat(self.cards))
        }
    }
}

/// Trait defining the interface for bot opponents.
///
/// Implementations must return legal moves for the view they are given:
/// attacks from [`bura_engine::rules::legal_attacks`] no larger than the
/// opponent's hand, and beats that pass
/// [`bura_engine::rules::validate_beat`].
///
/// # Example Implementation
///
/// ```rust
/// use std::time::Duration;
/// use bura_ai::{BotStrategy, BotView};
/// use bura_engine::cards::Card;
/// use bura_engine::engine::Defense;
///
/// struct AlwaysConcede;
///
/// impl BotStrategy for AlwaysConcede {
///     fn name(&self) -> &str {
///         "AlwaysConcede"
///     }
///     fn choose_attack(&self, view: &BotView) -> Vec<Card> {
///         vec![view.hand[0]]
///     }
///     fn choose_defense(&self, view: &BotView, attack: &[Card]) -> Defense {
///         Defense::HiddenCover(view.hand[..attack.len()].to_vec())
///     }
///     fn respond_to_wager(&self, _view: &BotView) -> bool {
///         false
///     }
///     fn wants_to_propose(&self, _view: &BotView) -> bool {
///         false
///     }
///     fn wants_to_declare(&self, view: &BotView) -> bool {
///         view.can_declare()
///     }
///     fn thinking_delay(&self) -> Duration {
///         Duration::ZERO
///     }
/// }
/// ```
pub trait BotStrategy: Send + Sync {
    fn name(&self) -> &str;

    /// Cards to attack with. Called only when the table is empty.
    fn choose_attack(&self, view: &BotView) -> Vec<Card>;

    /// Answer to `attack`: a card-for-card beat or a hidden cover.
    fn choose_defense(&self, view: &BotView, attack: &[Card]) -> Defense;

    /// Accept (`true`) or reject a pending raise.
    fn respond_to_wager(&self, view: &BotView) -> bool;

    /// Whether to propose a raise before attacking.
    fn wants_to_propose(&self, view: &BotView) -> bool;

    /// Whether to claim 31 now. May be a bluff.
    fn wants_to_declare(&self, view: &BotView) -> bool;

    /// How long the bot appears to think before moving.
    fn thinking_delay(&self) -> Duration;

    /// Picks the card play for the view: an attack, a beat or a cover.
    fn choose_move(&self, view: &BotView) -> BotMove {
        match view.attack {
            None => BotMove {
                cards: self.choose_attack(view),
                hidden_cover: false,
            },
            Some(attack) => match self.choose_defense(view, attack) {
                Defense::Beat(cards) => BotMove {
                    cards,
                    hidden_cover: false,
                },
                Defense::HiddenCover(cards) => BotMove {
                    cards,
                    hidden_cover: true,
                },
            },
        }
    }
}

/// Decides the full action for `seat`, or `None` when `seat` is not the one
/// the state is waiting on.
///
/// Declarations are considered first, then raises (only with an empty
/// table), then the card play.
pub fn decide(
    bot: &dyn BotStrategy,
    state: &GameState,
    seat: Seat,
    history: &PassHistory,
) -> Option<Action> {
    if state.expected_actor() != Some(seat) {
        return None;
    }
    let view = BotView::for_seat(state, seat, history);
    match state.phase() {
        Phase::WagerPending { .. } => Some(Action::RespondWager {
            accept: bot.respond_to_wager(&view),
        }),
        Phase::Playing => {
            if bot.wants_to_declare(&view) {
                return Some(Action::Declare31);
            }
            if view.is_attacking() && !view.wager.is_max() && bot.wants_to_propose(&view) {
                return Some(Action::ProposeWager);
            }
            let attacking = view.is_attacking();
            Some(bot.choose_move(&view).into_action(attacking))
        }
        Phase::Finished(_) => None,
    }
}

/// Bot difficulty tier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn all() -> [Difficulty; 3] {
        [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDifficulty(pub String);

impl fmt::Display for UnknownDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown difficulty '{}' (expected easy, medium or hard)",
            self.0
        )
    }
}

impl std::error::Error for UnknownDifficulty {}

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(UnknownDifficulty(s.to_string())),
        }
    }
}

/// Factory function to create a bot for a difficulty tier.
///
/// The same seed yields the same decisions for the same views.
///
/// # Example
///
/// ```rust
/// use bura_ai::{create_bot, Difficulty};
///
/// let bot = create_bot(Difficulty::Hard, 7);
/// assert_eq!(bot.name(), "HardBot");
/// ```
pub fn create_bot(difficulty: Difficulty, seed: u64) -> Box<dyn BotStrategy> {
    match difficulty {
        Difficulty::Easy => Box::new(easy::EasyBot::new(seed)),
        Difficulty::Medium => Box::new(medium::MediumBot::new(seed)),
        Difficulty::Hard => Box::new(hard::HardBot::new(seed)),
    }
}

//! Parsing of typed moves for interactive play.
//!
//! Cards are named either by their 1-based position in the hand as shown
//! by [`crate::formatters::format_hand`] or by code (`AD`, `10c`, `qh`).
//! Ownership, suit and count rules are left to the engine, which rejects
//! illegal moves without changing the game.

use bura_engine::cards::{Card, Suit};
use bura_engine::engine::{Action, Defense};
use bura_engine::rules::legal_beats;

/// Outcome of parsing one line of player input.
#[derive(Debug, PartialEq)]
pub enum ParseResult {
    Action(Action),
    Help,
    /// User entered quit command (q or quit)
    Quit,
    /// Invalid input with error message
    Invalid(String),
}

pub const MOVE_HELP: &str = "\
Moves (cards by position or code, e.g. `a 1 3` or `b 10d`):
  a, attack <cards>   lead 1-3 cards of one suit
  b, beat <cards>     beat the attack card-for-card
  c, cover <cards>    give up the trick face-down
  d, davi             propose raising the wager
  y, accept           accept the proposed raise
  n, reject           refuse the raise and concede the round
  31, declare         claim 31 points
  q, quit             leave the match";

/// Parse user input into an [`Action`] against `hand`.
///
/// # Example
///
/// ```rust
/// use bura_engine::cards::{Card, Rank, Suit};
/// use bura_engine::engine::Action;
/// # use bura_cli::validation::{parse_move, ParseResult};
///
/// let hand = [Card::new(Rank::Ace, Suit::Hearts), Card::new(Rank::Jack, Suit::Hearts)];
/// assert_eq!(
///     parse_move("a 1 2", &hand),
///     ParseResult::Action(Action::Attack(hand.to_vec()))
/// );
/// assert_eq!(parse_move("31", &hand), ParseResult::Action(Action::Declare31));
/// assert_eq!(parse_move("q", &hand), ParseResult::Quit);
/// assert!(matches!(parse_move("a 7", &hand), ParseResult::Invalid(_)));
/// ```
pub fn parse_move(input: &str, hand: &[Card]) -> ParseResult {
    let input = input.trim().to_lowercase();
    let parts: Vec<&str> = input.split_whitespace().collect();

    let Some((&verb, args)) = parts.split_first() else {
        return ParseResult::Invalid("Empty input".to_string());
    };

    match verb {
        "q" | "quit" => ParseResult::Quit,
        "h" | "help" | "?" => ParseResult::Help,
        "d" | "davi" => no_args(verb, args, Action::ProposeWager),
        "y" | "accept" => no_args(verb, args, Action::RespondWager { accept: true }),
        "n" | "reject" => no_args(verb, args, Action::RespondWager { accept: false }),
        "31" | "declare" => no_args(verb, args, Action::Declare31),
        "a" | "attack" => with_cards(args, hand, Action::Attack),
        "b" | "beat" => with_cards(args, hand, |c| Action::Defend(Defense::Beat(c))),
        "c" | "cover" => with_cards(args, hand, |c| Action::Defend(Defense::HiddenCover(c))),
        _ => ParseResult::Invalid(format!(
            "Unrecognized move '{}'. Type `help` for the list of moves",
            verb
        )),
    }
}

fn no_args(verb: &str, args: &[&str], action: Action) -> ParseResult {
    if args.is_empty() {
        ParseResult::Action(action)
    } else {
        ParseResult::Invalid(format!("'{}' takes no cards", verb))
    }
}

fn with_cards(args: &[&str], hand: &[Card], build: impl FnOnce(Vec<Card>) -> Action) -> ParseResult {
    if args.is_empty() {
        return ParseResult::Invalid("Name at least one card (e.g. `a 1`)".to_string());
    }
    match args
        .iter()
        .map(|t| parse_card_token(t, hand))
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(cards) => ParseResult::Action(build(cards)),
        Err(msg) => ParseResult::Invalid(msg),
    }
}

/// A card by hand position or by code.
pub fn parse_card_token(token: &str, hand: &[Card]) -> Result<Card, String> {
    if let Ok(pos) = token.parse::<usize>() {
        return pos
            .checked_sub(1)
            .and_then(|i| hand.get(i))
            .copied()
            .ok_or_else(|| format!("No card at position {} (hand has {})", pos, hand.len()));
    }
    token.parse::<Card>().map_err(|e| e.to_string())
}

/// Reorders a beat so each card faces an attack card it beats, if the
/// chosen cards allow any such order. Otherwise the order is kept and the
/// engine reports the failure.
pub fn arrange_beat(hand: &[Card], attack: &[Card], trump: Suit, chosen: Vec<Card>) -> Vec<Card> {
    let mut wanted = chosen.clone();
    wanted.sort();
    legal_beats(hand, attack, trump)
        .into_iter()
        .find(|beat| {
            let mut sorted = beat.clone();
            sorted.sort();
            sorted == wanted
        })
        .unwrap_or(chosen)
}

/// Ensures a match target is at least one point.
pub fn validate_target(target: u32) -> Result<(), String> {
    if target == 0 {
        Err("target must be >= 1".to_string())
    } else {
        Ok(())
    }
}

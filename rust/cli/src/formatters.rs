//! Card, hand, move and outcome formatters for terminal display.
//!
//! Suits render as ♥ ♦ ♣ ♠ where the terminal is expected to cope, and as
//! `h d c s` otherwise (see [`supports_unicode`]).
//!
//! ```rust
//! use bura_engine::cards::{Card, Rank, Suit};
//! use bura_cli::formatters::{format_card, format_cards};
//!
//! let ace = Card::new(Rank::Ace, Suit::Spades);
//! assert!(format_card(&ace) == "A♠" || format_card(&ace) == "As");
//! assert!(format_cards(&[ace]).starts_with("[A"));
//! ```

use bura_engine::cards::{Card, Rank, Suit};
use bura_engine::engine::{Action, Defense};
use bura_engine::state::{GameState, RoundResult, Seat, WinReason};

/// Check if the terminal supports Unicode card symbols by detecting modern terminal environments.
///
/// On Windows, checks for Windows Terminal (WT_SESSION), modern terminals (TERM_PROGRAM),
/// or VS Code (VSCODE_INJECTION). On Unix-like systems, assumes Unicode support.
pub fn supports_unicode() -> bool {
    if cfg!(windows) {
        std::env::var("WT_SESSION").is_ok()
            || std::env::var("TERM_PROGRAM").is_ok()
            || std::env::var("VSCODE_INJECTION").is_ok()
    } else {
        true
    }
}

pub fn format_suit(suit: &Suit) -> String {
    if supports_unicode() {
        suit.symbol().to_string()
    } else {
        match suit {
            Suit::Hearts => "h",
            Suit::Diamonds => "d",
            Suit::Clubs => "c",
            Suit::Spades => "s",
        }
        .to_string()
    }
}

pub fn format_rank(rank: &Rank) -> String {
    rank.label().to_string()
}

/// Format a Card as a string combining rank and suit, e.g. "10♦" or "10d".
pub fn format_card(card: &Card) -> String {
    format!("{}{}", format_rank(&card.rank), format_suit(&card.suit))
}

/// Cards in bracket notation: "[A♠ K♥]", or "[]" when empty.
pub fn format_cards(cards: &[Card]) -> String {
    let formatted: Vec<String> = cards.iter().map(format_card).collect();
    format!("[{}]", formatted.join(" "))
}

/// A hand with the 1-based positions the move parser accepts.
///
/// ```rust
/// use bura_engine::cards::{Card, Rank, Suit};
/// # use bura_cli::formatters::format_hand;
///
/// let hand = [Card::new(Rank::Ace, Suit::Hearts), Card::new(Rank::Jack, Suit::Clubs)];
/// let shown = format_hand(&hand);
/// assert!(shown.starts_with("1:A"));
/// assert!(shown.contains(" 2:J"));
/// ```
pub fn format_hand(hand: &[Card]) -> String {
    hand.iter()
        .enumerate()
        .map(|(i, c)| format!("{}:{}", i + 1, format_card(c)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One-line description of a move as seen by an onlooker.
///
/// Hidden covers are shown face-down.
pub fn format_action(action: &Action) -> String {
    match action {
        Action::Attack(cards) => format!("attack {}", format_cards(cards)),
        Action::Defend(Defense::Beat(cards)) => format!("beat with {}", format_cards(cards)),
        Action::Defend(Defense::HiddenCover(cards)) => {
            format!("cover with {} card(s) face-down", cards.len())
        }
        Action::ProposeWager => "propose davi".to_string(),
        Action::RespondWager { accept: true } => "accept".to_string(),
        Action::RespondWager { accept: false } => "reject".to_string(),
        Action::Declare31 => "declare 31".to_string(),
    }
}

pub fn format_reason(reason: &WinReason) -> String {
    match reason {
        WinReason::Bura => "BURA".to_string(),
        WinReason::Declaration { declarer } => format!("{} declared 31", declarer),
        WinReason::FalseDeclaration { declarer } => format!("{} declared 31 falsely", declarer),
        WinReason::WagerRejected { proposer } => format!("{}'s davi was rejected", proposer),
        WinReason::Exhaustion => "more points when the cards ran out".to_string(),
        WinReason::Timeout { stalled } => format!("{} ran out of time", stalled),
    }
}

pub fn format_result(result: &RoundResult) -> String {
    match result {
        RoundResult::Won {
            winner,
            reason,
            match_points,
        } => format!(
            "{} wins {} point(s): {}",
            winner,
            match_points,
            format_reason(reason)
        ),
        RoundResult::Drawn => "drawn, no points awarded".to_string(),
    }
}

pub fn format_score(state: &GameState) -> String {
    format!(
        "{} {} : {} {} (target {})",
        Seat::First,
        state.match_score(Seat::First),
        state.match_score(Seat::Second),
        Seat::Second,
        state.match_target()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    #[test]
    fn test_format_card_unicode_or_ascii() {
        let ten = format_card(&c(Rank::Ten, Suit::Diamonds));
        assert!(ten == "10♦" || ten == "10d");
    }

    #[test]
    fn test_format_cards_empty() {
        assert_eq!(format_cards(&[]), "[]");
    }

    #[test]
    fn test_format_hand_numbers_from_one() {
        let hand = [
            c(Rank::Ace, Suit::Hearts),
            c(Rank::Queen, Suit::Spades),
            c(Rank::Ten, Suit::Clubs),
        ];
        let shown = format_hand(&hand);
        assert_eq!(shown.split(' ').count(), 3);
        assert!(shown.contains("3:10"));
    }

    #[test]
    fn test_hidden_cover_does_not_reveal_cards() {
        let cover = Action::Defend(Defense::HiddenCover(vec![c(Rank::Ace, Suit::Hearts)]));
        let shown = format_action(&cover);
        assert!(!shown.contains('A'));
        assert!(shown.contains("face-down"));
    }

    #[test]
    fn test_format_wager_moves() {
        assert_eq!(format_action(&Action::ProposeWager), "propose davi");
        assert_eq!(format_action(&Action::RespondWager { accept: false }), "reject");
        assert_eq!(format_action(&Action::Declare31), "declare 31");
    }

    #[test]
    fn test_format_result() {
        let won = RoundResult::Won {
            winner: Seat::Second,
            reason: WinReason::Bura,
            match_points: 3,
        };
        assert_eq!(format_result(&won), "seat 2 wins 3 point(s): BURA");
        assert!(format_result(&RoundResult::Drawn).contains("drawn"));
    }
}

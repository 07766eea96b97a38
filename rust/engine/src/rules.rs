use std::collections::HashSet;

use crate::cards::{beats, card_points, Card, Suit};
use crate::errors::GameError;
use crate::state::{RoundResult, Seat, WinReason, HAND_SIZE};
use crate::wager::WagerLevel;

/// Checks that every card is in `hand` and none is repeated.
pub fn validate_owned(hand: &[Card], cards: &[Card]) -> Result<(), GameError> {
    let mut seen = HashSet::with_capacity(cards.len());
    for &c in cards {
        if !seen.insert(c) {
            return Err(GameError::DuplicateCard(c));
        }
        if !hand.contains(&c) {
            return Err(GameError::CardNotInHand(c));
        }
    }
    Ok(())
}

/// Validates an attacking offer: 1–3 owned cards of a single suit.
///
/// # Examples
///
/// ```
/// use bura_engine::cards::{Card, Rank, Suit};
/// use bura_engine::errors::GameError;
/// use bura_engine::rules::validate_attack;
///
/// let hand = [
///     Card::new(Rank::Ace, Suit::Hearts),
///     Card::new(Rank::King, Suit::Hearts),
///     Card::new(Rank::Jack, Suit::Clubs),
/// ];
/// assert!(validate_attack(&hand, &hand[..2]).is_ok());
/// assert_eq!(validate_attack(&hand, &hand), Err(GameError::MixedSuits));
/// assert_eq!(validate_attack(&hand, &[]), Err(GameError::EmptyAttack));
/// ```
pub fn validate_attack(hand: &[Card], cards: &[Card]) -> Result<(), GameError> {
    let Some(first) = cards.first() else {
        return Err(GameError::EmptyAttack);
    };
    if cards.len() > HAND_SIZE {
        return Err(GameError::TooManyCards {
            max: HAND_SIZE,
            got: cards.len(),
        });
    }
    if cards.iter().any(|c| c.suit != first.suit) {
        return Err(GameError::MixedSuits);
    }
    validate_owned(hand, cards)
}

/// Validates a beating response card-for-card against `attack`.
///
/// `defense[i]` must beat `attack[i]`; cardinality and ownership are
/// checked first.
pub fn validate_beat(
    hand: &[Card],
    attack: &[Card],
    defense: &[Card],
    trump: Suit,
) -> Result<(), GameError> {
    validate_cover(hand, attack, defense)?;
    for (&d, &a) in defense.iter().zip(attack) {
        if !beats(d, a, trump) {
            return Err(GameError::DoesNotBeat {
                defender: d,
                attacker: a,
            });
        }
    }
    Ok(())
}

/// Validates a hidden cover: any owned cards, as many as were attacked.
pub fn validate_cover(hand: &[Card], attack: &[Card], cover: &[Card]) -> Result<(), GameError> {
    if cover.len() != attack.len() {
        return Err(GameError::CountMismatch {
            expected: attack.len(),
            actual: cover.len(),
        });
    }
    validate_owned(hand, cover)
}

/// Every legal attack from `hand`: each non-empty single-suit subset.
pub fn legal_attacks(hand: &[Card]) -> Vec<Vec<Card>> {
    let n = hand.len();
    let mut out = Vec::new();
    for mask in 1u32..(1 << n) {
        let pick: Vec<Card> = (0..n)
            .filter(|i| mask & (1 << i) != 0)
            .map(|i| hand[i])
            .collect();
        if validate_attack(hand, &pick).is_ok() {
            out.push(pick);
        }
    }
    out
}

/// Every ordered response from `hand` that beats `attack` card-for-card.
pub fn legal_beats(hand: &[Card], attack: &[Card], trump: Suit) -> Vec<Vec<Card>> {
    let mut out = Vec::new();
    let mut used = vec![false; hand.len()];
    let mut current = Vec::with_capacity(attack.len());
    search_beats(hand, attack, trump, &mut used, &mut current, &mut out);
    out
}

fn search_beats(
    hand: &[Card],
    attack: &[Card],
    trump: Suit,
    used: &mut [bool],
    current: &mut Vec<Card>,
    out: &mut Vec<Vec<Card>>,
) {
    let Some(&target) = attack.get(current.len()) else {
        out.push(current.clone());
        return;
    };
    for i in 0..hand.len() {
        if used[i] || !beats(hand[i], target, trump) {
            continue;
        }
        used[i] = true;
        current.push(hand[i]);
        search_beats(hand, attack, trump, used, current, out);
        current.pop();
        used[i] = false;
    }
}

/// True when `hand` is a BURA: three cards, all trumps.
pub fn is_bura(hand: &[Card], trump: Suit) -> bool {
    hand.len() == HAND_SIZE && hand.iter().all(|c| c.suit == trump)
}

/// Match points for a won round: the wager value, doubled for BURA.
pub fn match_points(wager: WagerLevel, reason: WinReason) -> u32 {
    let base = wager.points();
    if reason == WinReason::Bura {
        base * 2
    } else {
        base
    }
}

/// Result of a round whose cards ran out: the higher round score wins.
pub fn exhaustion_result(points: [u32; 2], wager: WagerLevel) -> RoundResult {
    let winner = match points[0].cmp(&points[1]) {
        std::cmp::Ordering::Greater => Seat::First,
        std::cmp::Ordering::Less => Seat::Second,
        std::cmp::Ordering::Equal => return RoundResult::Drawn,
    };
    RoundResult::Won {
        winner,
        reason: WinReason::Exhaustion,
        match_points: match_points(wager, WinReason::Exhaustion),
    }
}

/// Points a trick is worth to whoever wins it.
pub fn trick_value(attack: &[Card], response: &[Card]) -> u32 {
    card_points(attack) + card_points(response)
}

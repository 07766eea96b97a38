//! Round transitions.
//!
//! Every function here borrows a [`GameState`] and returns its successor, or
//! a [`GameError`] describing why the move is illegal. The borrowed state is
//! never modified, so a rejected move leaves the caller exactly where it was.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::rules::{
    exhaustion_result, is_bura, match_points, validate_attack, validate_beat, validate_cover,
};
use crate::state::{
    GameState, Phase, RoundConfig, RoundResult, Seat, SeatState, Trick, WinReason,
    DECLARE_THRESHOLD, HAND_SIZE,
};
use crate::wager::WagerLevel;

/// The defender's answer to an attack.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum Defense {
    /// Beat every attacking card, in the order the attack was offered.
    Beat(Vec<Card>),
    /// Concede face-down; the attacker takes the trick.
    HiddenCover(Vec<Card>),
}

impl Defense {
    pub fn cards(&self) -> &[Card] {
        match self {
            Defense::Beat(c) | Defense::HiddenCover(c) => c,
        }
    }
}

/// A move submitted by one seat.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum Action {
    Attack(Vec<Card>),
    Defend(Defense),
    ProposeWager,
    RespondWager { accept: bool },
    Declare31,
}

/// Deals a fresh round.
///
/// Three cards go to each seat, one at a time starting with the first
/// attacker. The next card is turned up as the trump indicator and placed at
/// the bottom of the draw pile. A dealt BURA finishes the round immediately.
///
/// # Errors
///
/// [`GameError::MatchDecided`] when the carried score already reaches the
/// target.
///
/// # Examples
///
/// ```
/// use bura_engine::engine::init_round;
/// use bura_engine::state::{RoundConfig, Seat};
///
/// let state = init_round(&RoundConfig::new_match(42, 11)).unwrap();
/// assert_eq!(state.hand(Seat::First).len(), 3);
/// assert_eq!(state.hand(Seat::Second).len(), 3);
/// assert_eq!(state.deck_size(), 14);
/// assert_eq!(state.card_count(), 20);
/// ```
pub fn init_round(config: &RoundConfig) -> Result<GameState, GameError> {
    if config.match_score.iter().any(|&s| s >= config.match_target) {
        return Err(GameError::MatchDecided);
    }
    let mut deck = Deck::new_with_seed(config.seed);
    deck.shuffle();

    let mut seats = [SeatState::default(), SeatState::default()];
    let order = [config.first_attacker, config.first_attacker.other()];
    for _ in 0..HAND_SIZE {
        for seat in order {
            let card = deck
                .deal_card()
                .ok_or_else(|| GameError::Corrupted("deck ran out while dealing".into()))?;
            seats[seat.index()].hand.push(card);
        }
    }
    let trump = deck
        .deal_card()
        .ok_or_else(|| GameError::Corrupted("no card left for trump".into()))?;
    let mut pile = deck.into_remaining();
    pile.reverse();
    pile.insert(0, trump);

    let mut state = GameState {
        version: 0,
        round_no: config.round_no,
        seed: config.seed,
        seats,
        deck: pile,
        trump,
        table: None,
        turn: config.first_attacker,
        first_attacker: config.first_attacker,
        phase: Phase::Playing,
        wager: WagerLevel::NONE,
        match_score: config.match_score,
        match_target: config.match_target,
    };
    settle_bura(&mut state, order);
    Ok(state)
}

/// Deals the round that follows a finished one.
///
/// The previous winner attacks first; after a drawn round the previous
/// first attacker keeps the lead. Match score and target carry over.
pub fn next_round(state: &GameState, seed: u64) -> Result<GameState, GameError> {
    let Phase::Finished(result) = state.phase else {
        return Err(GameError::RoundNotFinished);
    };
    if state.match_winner().is_some() {
        return Err(GameError::MatchDecided);
    }
    init_round(&RoundConfig {
        seed,
        match_target: state.match_target,
        first_attacker: result.winner().unwrap_or(state.first_attacker),
        match_score: state.match_score,
        round_no: state.round_no + 1,
    })
}

/// Offers 1–3 cards of one suit.
///
/// # Examples
///
/// ```
/// use bura_engine::engine::{attack, init_round};
/// use bura_engine::errors::GameError;
/// use bura_engine::state::{RoundConfig, Seat};
///
/// let state = init_round(&RoundConfig::new_match(7, 11)).unwrap();
/// let card = state.hand(Seat::First)[0];
///
/// // Seat 2 may not attack out of turn; the state is untouched.
/// let err = attack(&state, Seat::Second, &[card]).unwrap_err();
/// assert!(matches!(err, GameError::NotYourTurn { .. }));
/// ```
pub fn attack(state: &GameState, actor: Seat, cards: &[Card]) -> Result<GameState, GameError> {
    require_playing(state)?;
    require_turn(state, actor)?;
    if state.table.is_some() {
        return Err(GameError::TableOccupied);
    }
    validate_attack(state.hand(actor), cards)?;
    let defender_cards = state.hand(actor.other()).len();
    if cards.len() > defender_cards {
        return Err(GameError::TooManyCards {
            max: defender_cards,
            got: cards.len(),
        });
    }

    let mut next = state.clone();
    remove_from_hand(&mut next, actor, cards);
    next.table = Some(Trick {
        attacker: actor,
        cards: cards.to_vec(),
    });
    next.turn = actor.other();
    Ok(commit(next))
}

/// Answers the attack on the table.
///
/// A [`Defense::Beat`] that fails at any position is rejected with
/// [`GameError::DoesNotBeat`]; the defender must resubmit, either a valid
/// beat or a [`Defense::HiddenCover`]. After resolution both hands are
/// replenished, the trick winner drawing first.
pub fn defend(state: &GameState, actor: Seat, defense: &Defense) -> Result<GameState, GameError> {
    require_playing(state)?;
    let trick = state.table.as_ref().ok_or(GameError::NothingToDefend)?;
    require_turn(state, actor)?;
    let hand = state.hand(actor);
    let beaten = match defense {
        Defense::Beat(cards) => {
            validate_beat(hand, &trick.cards, cards, state.trump.suit)?;
            true
        }
        Defense::HiddenCover(cards) => {
            validate_cover(hand, &trick.cards, cards)?;
            false
        }
    };
    let winner = if beaten { actor } else { trick.attacker };

    let mut next = state.clone();
    remove_from_hand(&mut next, actor, defense.cards());
    let attack_cards = next.table.take().map(|t| t.cards).unwrap_or_default();
    let taken = &mut next.seats[winner.index()].taken;
    taken.extend(attack_cards);
    taken.extend_from_slice(defense.cards());

    replenish(&mut next, winner);
    next.turn = winner;
    settle_bura(&mut next, [winner, winner.other()]);
    if !next.is_finished() && is_exhausted(&next) {
        let points = [
            next.round_points(Seat::First),
            next.round_points(Seat::Second),
        ];
        let result = exhaustion_result(points, next.wager);
        finish(&mut next, result);
    }
    Ok(commit(next))
}

/// Claims 31 round points.
///
/// A true claim wins the round for the declarer; a false one loses it. The
/// claim is never corrected or ignored.
///
/// # Examples
///
/// ```
/// use bura_engine::engine::{declare_31, init_round};
/// use bura_engine::state::{RoundConfig, Seat};
///
/// let state = init_round(&RoundConfig::new_match(3, 11)).unwrap();
/// # if state.is_finished() { return; }
/// // Nobody has won a trick yet, so the claim is false.
/// let after = declare_31(&state, Seat::First).unwrap();
/// assert_eq!(after.result().unwrap().winner(), Some(Seat::Second));
/// ```
pub fn declare_31(state: &GameState, actor: Seat) -> Result<GameState, GameError> {
    require_playing(state)?;
    require_turn(state, actor)?;
    let (winner, reason) = if state.round_points(actor) >= DECLARE_THRESHOLD {
        (actor, WinReason::Declaration { declarer: actor })
    } else {
        (
            actor.other(),
            WinReason::FalseDeclaration { declarer: actor },
        )
    };
    let mut next = state.clone();
    let result = won(&next, winner, reason);
    finish(&mut next, result);
    Ok(commit(next))
}

/// Proposes raising the stake one rung. Only before an attack is offered.
pub fn propose_wager(state: &GameState, actor: Seat) -> Result<GameState, GameError> {
    require_playing(state)?;
    require_turn(state, actor)?;
    if state.table.is_some() {
        return Err(GameError::TableOccupied);
    }
    if state.wager.next().is_none() {
        return Err(GameError::WagerAtMaximum);
    }
    let mut next = state.clone();
    next.phase = Phase::WagerPending { proposer: actor };
    Ok(commit(next))
}

/// Answers a pending proposal.
///
/// Accepting raises the stake and hands the attack to the proposer.
/// Rejecting ends the round: the proposer wins at the pre-raise value.
pub fn respond_wager(state: &GameState, actor: Seat, accept: bool) -> Result<GameState, GameError> {
    let Phase::WagerPending { proposer } = state.phase else {
        return Err(GameError::WrongPhase {
            phase: state.phase.name(),
        });
    };
    if actor == proposer {
        return Err(GameError::NotProposer);
    }
    let mut next = state.clone();
    if accept {
        next.wager = state.wager.next().ok_or(GameError::WagerAtMaximum)?;
        next.phase = Phase::Playing;
        next.turn = proposer;
    } else {
        let result = won(&next, proposer, WinReason::WagerRejected { proposer });
        finish(&mut next, result);
    }
    Ok(commit(next))
}

/// Ends the round against a seat that let its turn clock expire.
///
/// `stalled` must be the seat the state is waiting on.
pub fn forfeit_turn(state: &GameState, stalled: Seat) -> Result<GameState, GameError> {
    let Some(expected) = state.expected_actor() else {
        return Err(GameError::WrongPhase {
            phase: state.phase.name(),
        });
    };
    if expected != stalled {
        return Err(GameError::NotYourTurn {
            expected,
            actual: stalled,
        });
    }
    let mut next = state.clone();
    let result = won(&next, stalled.other(), WinReason::Timeout { stalled });
    finish(&mut next, result);
    Ok(commit(next))
}

/// Applies any [`Action`] on behalf of `actor`.
pub fn apply(state: &GameState, actor: Seat, action: &Action) -> Result<GameState, GameError> {
    match action {
        Action::Attack(cards) => attack(state, actor, cards),
        Action::Defend(defense) => defend(state, actor, defense),
        Action::ProposeWager => propose_wager(state, actor),
        Action::RespondWager { accept } => respond_wager(state, actor, *accept),
        Action::Declare31 => declare_31(state, actor),
    }
}

fn require_playing(state: &GameState) -> Result<(), GameError> {
    match state.phase {
        Phase::Playing => Ok(()),
        phase => Err(GameError::WrongPhase { phase: phase.name() }),
    }
}

fn require_turn(state: &GameState, actor: Seat) -> Result<(), GameError> {
    if state.turn == actor {
        Ok(())
    } else {
        Err(GameError::NotYourTurn {
            expected: state.turn,
            actual: actor,
        })
    }
}

fn remove_from_hand(state: &mut GameState, seat: Seat, cards: &[Card]) {
    state.seats[seat.index()]
        .hand
        .retain(|c| !cards.contains(c));
}

/// Draws alternately, one card at a time, until both hands hold three or
/// the pile runs out.
fn replenish(state: &mut GameState, first: Seat) {
    let mut seat = first;
    loop {
        let need_first = state.hand(first).len() < HAND_SIZE;
        let need_second = state.hand(first.other()).len() < HAND_SIZE;
        if state.deck.is_empty() || !(need_first || need_second) {
            break;
        }
        if state.hand(seat).len() < HAND_SIZE {
            if let Some(card) = state.deck.pop() {
                state.seats[seat.index()].hand.push(card);
            }
        }
        seat = seat.other();
    }
}

fn is_exhausted(state: &GameState) -> bool {
    state.deck.is_empty() && state.seats.iter().any(|s| s.hand.is_empty())
}

/// Finishes the round if a seat holds BURA, checking seats in `order`.
fn settle_bura(state: &mut GameState, order: [Seat; 2]) {
    let trump = state.trump.suit;
    if let Some(holder) = order.into_iter().find(|s| is_bura(state.hand(*s), trump)) {
        let result = won(state, holder, WinReason::Bura);
        finish(state, result);
    }
}

fn won(state: &GameState, winner: Seat, reason: WinReason) -> RoundResult {
    RoundResult::Won {
        winner,
        reason,
        match_points: match_points(state.wager, reason),
    }
}

fn finish(state: &mut GameState, result: RoundResult) {
    if let Some(winner) = result.winner() {
        state.match_score[winner.index()] += result.match_points();
    }
    state.phase = Phase::Finished(result);
}

fn commit(mut state: GameState) -> GameState {
    state.version += 1;
    state
}

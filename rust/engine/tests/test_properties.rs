use proptest::prelude::*;

use bura_engine::cards::{all_suits, beats, full_deck, Card, Rank, Suit};
use bura_engine::engine::{apply, init_round, Action, Defense};
use bura_engine::errors::GameError;
use bura_engine::rules::{legal_attacks, legal_beats};
use bura_engine::state::{GameState, Phase, RoundConfig, Seat};

/// Every move the expected actor could legally make.
fn legal_actions(state: &GameState) -> Vec<(Seat, Action)> {
    let Some(actor) = state.expected_actor() else {
        return Vec::new();
    };
    let mut out = Vec::new();
    match state.phase() {
        Phase::WagerPending { .. } => {
            out.push((actor, Action::RespondWager { accept: true }));
            out.push((actor, Action::RespondWager { accept: false }));
        }
        Phase::Playing => {
            let hand = state.hand(actor);
            match state.table() {
                None => {
                    let defender_cards = state.hand(actor.other()).len();
                    for cards in legal_attacks(hand) {
                        if cards.len() <= defender_cards {
                            out.push((actor, Action::Attack(cards)));
                        }
                    }
                    if !state.wager().is_max() {
                        out.push((actor, Action::ProposeWager));
                    }
                }
                Some(trick) => {
                    for beat in legal_beats(hand, &trick.cards, state.trump_suit()) {
                        out.push((actor, Action::Defend(Defense::Beat(beat))));
                    }
                    let cover = hand[..trick.cards.len()].to_vec();
                    out.push((actor, Action::Defend(Defense::HiddenCover(cover))));
                }
            }
            out.push((actor, Action::Declare31));
        }
        Phase::Finished(_) => {}
    }
    out
}

/// Plays a round choosing moves by index, rarely declaring so rounds run long.
fn play_out(seed: u64, picks: &[usize]) -> Vec<GameState> {
    let mut state = init_round(&RoundConfig::new_match(seed, 11)).unwrap();
    let mut trail = vec![state.clone()];
    for &pick in picks {
        let mut actions = legal_actions(&state);
        if actions.len() > 1 && pick % 17 != 0 {
            actions.retain(|(_, a)| !matches!(a, Action::Declare31));
        }
        if actions.is_empty() {
            break;
        }
        let (seat, action) = &actions[pick % actions.len()];
        state = apply(&state, *seat, action).unwrap();
        trail.push(state.clone());
    }
    trail
}

/// Applies `action` and, when it is refused, checks the refusal names the
/// rule the move breaks. A refused move must not come back as a new state.
fn check_refusal(state: &GameState, seat: Seat, action: &Action) -> Result<(), TestCaseError> {
    let err = match apply(state, seat, action) {
        Ok(next) => {
            prop_assert_eq!(state.expected_actor(), Some(seat));
            prop_assert_eq!(next.version(), state.version() + 1);
            return Ok(());
        }
        Err(err) => err,
    };
    let phase_error = matches!(err, GameError::WrongPhase { .. });
    match (state.phase(), action) {
        (Phase::Finished(_), _) => prop_assert!(phase_error, "{:?}", err),
        (Phase::WagerPending { proposer }, Action::RespondWager { .. }) => {
            prop_assert_eq!(seat, proposer);
            prop_assert_eq!(err, GameError::NotProposer);
        }
        (Phase::WagerPending { .. }, _) => prop_assert!(phase_error, "{:?}", err),
        (Phase::Playing, Action::RespondWager { .. }) => prop_assert!(phase_error, "{:?}", err),
        (Phase::Playing, Action::Defend(_)) if state.table().is_none() => {
            prop_assert_eq!(err, GameError::NothingToDefend);
        }
        (Phase::Playing, _) if seat != state.turn() => {
            prop_assert!(matches!(err, GameError::NotYourTurn { .. }), "{:?}", err);
        }
        (Phase::Playing, Action::Attack(_) | Action::ProposeWager) if state.table().is_some() => {
            prop_assert_eq!(err, GameError::TableOccupied);
        }
        (Phase::Playing, Action::Attack(cards)) => {
            if cards.is_empty() {
                prop_assert_eq!(err, GameError::EmptyAttack);
            } else {
                prop_assert!(
                    matches!(
                        err,
                        GameError::TooManyCards { .. }
                            | GameError::MixedSuits
                            | GameError::DuplicateCard(_)
                            | GameError::CardNotInHand(_)
                    ),
                    "{:?}",
                    err
                );
            }
        }
        (Phase::Playing, Action::Defend(defense)) => {
            let attacked = state.table().map_or(0, |t| t.cards.len());
            if defense.cards().len() != attacked {
                prop_assert!(matches!(err, GameError::CountMismatch { .. }), "{:?}", err);
            } else {
                prop_assert!(
                    matches!(
                        err,
                        GameError::DuplicateCard(_)
                            | GameError::CardNotInHand(_)
                            | GameError::DoesNotBeat { .. }
                    ),
                    "{:?}",
                    err
                );
            }
        }
        (Phase::Playing, Action::ProposeWager) => {
            prop_assert_eq!(err, GameError::WagerAtMaximum);
        }
        (Phase::Playing, Action::Declare31) => {
            prop_assert!(false, "declaring on turn is always accepted, got {:?}", err);
        }
    }
    Ok(())
}

fn any_card() -> impl Strategy<Value = Card> {
    (0usize..20).prop_map(|i| full_deck()[i])
}

proptest! {
    #[test]
    fn cards_are_conserved_across_legal_play(
        seed in any::<u64>(),
        picks in prop::collection::vec(any::<usize>(), 1..60),
    ) {
        let trail = play_out(seed, &picks);
        for (i, state) in trail.iter().enumerate() {
            prop_assert_eq!(state.card_count(), 20);
            prop_assert!(state.check_integrity().is_ok());
            prop_assert_eq!(state.version(), i as u64);
        }
    }

    #[test]
    fn wager_never_decreases_within_a_round(
        seed in any::<u64>(),
        picks in prop::collection::vec(any::<usize>(), 1..60),
    ) {
        let trail = play_out(seed, &picks);
        for pair in trail.windows(2) {
            prop_assert!(pair[1].wager() >= pair[0].wager());
        }
    }

    #[test]
    fn illegal_input_is_refused_with_its_reason(
        seed in any::<u64>(),
        picks in prop::collection::vec(any::<usize>(), 0..40),
        at in any::<usize>(),
        cards in prop::collection::vec(any_card(), 0..4),
        second_seat in any::<bool>(),
        kind in 0u8..6,
    ) {
        let trail = play_out(seed, &picks);
        let state = &trail[at % trail.len()];
        let seat = if second_seat { Seat::Second } else { Seat::First };
        let action = match kind {
            0 => Action::Attack(cards),
            1 => Action::Defend(Defense::Beat(cards)),
            2 => Action::Defend(Defense::HiddenCover(cards)),
            3 => Action::ProposeWager,
            4 => Action::RespondWager { accept: second_seat },
            _ => Action::Declare31,
        };
        check_refusal(state, seat, &action)?;
    }

    #[test]
    fn finished_rounds_accept_nothing(
        seed in any::<u64>(),
        picks in prop::collection::vec(any::<usize>(), 1..80),
    ) {
        let trail = play_out(seed, &picks);
        let last = trail.last().unwrap();
        if last.is_finished() {
            prop_assert!(apply(last, Seat::First, &Action::Declare31).is_err());
            prop_assert!(apply(last, Seat::Second, &Action::ProposeWager).is_err());
        }
    }
}

#[test]
fn beats_is_antisymmetric_over_whole_deck() {
    let deck = full_deck();
    for trump in all_suits() {
        for &a in &deck {
            for &b in &deck {
                assert!(
                    !(beats(a, b, trump) && beats(b, a, trump)),
                    "{a} and {b} beat each other under {trump:?}"
                );
            }
        }
    }
}

#[test]
fn beats_follows_strength_and_trump() {
    let ten_h = Card::new(Rank::Ten, Suit::Hearts);
    let king_h = Card::new(Rank::King, Suit::Hearts);
    let jack_s = Card::new(Rank::Jack, Suit::Spades);
    let ace_h = Card::new(Rank::Ace, Suit::Hearts);
    assert!(beats(ten_h, king_h, Suit::Clubs));
    assert!(!beats(king_h, ten_h, Suit::Clubs));
    assert!(beats(jack_s, ace_h, Suit::Spades));
    assert!(!beats(ace_h, jack_s, Suit::Spades));
    // Off-suit non-trump never beats.
    assert!(!beats(jack_s, king_h, Suit::Diamonds));
}

use bura_engine::cards::{Card, Rank, Suit};
use bura_engine::engine::{
    attack, declare_31, defend, init_round, propose_wager, respond_wager, Defense,
};
use bura_engine::errors::GameError;
use bura_engine::rules::legal_beats;
use bura_engine::state::{
    GameState, Phase, RoundConfig, RoundResult, RoundSetup, Seat, WinReason,
};
use bura_engine::wager::WagerLevel;

fn c(rank: Rank, suit: Suit) -> Card {
    Card::new(rank, suit)
}

fn setup(hands: [Vec<Card>; 2], taken: [Vec<Card>; 2], deck: Vec<Card>, trump: Card) -> GameState {
    GameState::from_setup(RoundSetup {
        hands,
        taken,
        deck,
        trump,
        first_attacker: Seat::First,
        match_score: [0, 0],
        match_target: 11,
    })
    .expect("valid layout")
}

fn live_round(seed_from: u64) -> GameState {
    (seed_from..)
        .map(|seed| init_round(&RoundConfig::new_match(seed, 11)).expect("deal"))
        .find(|s| !s.is_finished())
        .expect("some deal without BURA")
}

#[test]
fn uncontestable_attack_is_covered_and_scored_for_attacker() {
    let trump = c(Rank::Jack, Suit::Diamonds);
    let p = Seat::First;
    let b = Seat::Second;
    let state = setup(
        [
            vec![
                c(Rank::Ace, Suit::Diamonds),
                c(Rank::Queen, Suit::Spades),
                c(Rank::Ten, Suit::Clubs),
            ],
            vec![
                c(Rank::King, Suit::Diamonds),
                c(Rank::Jack, Suit::Spades),
                c(Rank::Ten, Suit::Spades),
            ],
        ],
        [vec![], vec![]],
        vec![c(Rank::Ace, Suit::Spades), c(Rank::King, Suit::Clubs), trump],
        trump,
    );

    let attacked = attack(&state, p, &[c(Rank::Ace, Suit::Diamonds)]).unwrap();
    assert!(legal_beats(
        attacked.hand(b),
        &[c(Rank::Ace, Suit::Diamonds)],
        Suit::Diamonds
    )
    .is_empty());

    let covered = defend(
        &attacked,
        b,
        &Defense::HiddenCover(vec![c(Rank::Jack, Suit::Spades)]),
    )
    .unwrap();
    assert_eq!(covered.round_points(p), 13);
    assert_eq!(covered.round_points(b), 0);
    assert_eq!(covered.turn(), p);
    // Attacker drew first.
    assert!(covered.hand(p).contains(&c(Rank::Ace, Suit::Spades)));
    assert!(covered.hand(b).contains(&c(Rank::King, Suit::Clubs)));
    assert_eq!(covered.card_count(), state.card_count());
}

#[test]
fn exhaustion_goes_to_higher_round_score() {
    let trump = c(Rank::Jack, Suit::Diamonds);
    let state = setup(
        [
            vec![c(Rank::Jack, Suit::Hearts)],
            vec![c(Rank::Jack, Suit::Spades)],
        ],
        [
            vec![c(Rank::Ace, Suit::Clubs), c(Rank::Queen, Suit::Clubs)],
            vec![c(Rank::Ten, Suit::Clubs), c(Rank::Queen, Suit::Spades)],
        ],
        vec![],
        trump,
    );
    assert_eq!(state.round_points(Seat::First), 14);
    assert_eq!(state.round_points(Seat::Second), 13);

    let s1 = attack(&state, Seat::First, &[c(Rank::Jack, Suit::Hearts)]).unwrap();
    let s2 = defend(
        &s1,
        Seat::Second,
        &Defense::HiddenCover(vec![c(Rank::Jack, Suit::Spades)]),
    )
    .unwrap();

    assert_eq!(s2.round_points(Seat::First), 18);
    assert_eq!(
        s2.result(),
        Some(RoundResult::Won {
            winner: Seat::First,
            reason: WinReason::Exhaustion,
            match_points: 1,
        })
    );
    assert_eq!(s2.match_score(Seat::First), 1);
}

#[test]
fn replenished_bura_ends_round_before_next_attack() {
    let trump = c(Rank::Jack, Suit::Clubs);
    let state = setup(
        [
            vec![
                c(Rank::King, Suit::Hearts),
                c(Rank::Ace, Suit::Clubs),
                c(Rank::Ten, Suit::Clubs),
            ],
            vec![
                c(Rank::Jack, Suit::Hearts),
                c(Rank::Queen, Suit::Spades),
                c(Rank::King, Suit::Spades),
            ],
        ],
        [vec![], vec![]],
        vec![c(Rank::Queen, Suit::Clubs), c(Rank::Ace, Suit::Spades), trump],
        trump,
    );
    let s1 = attack(&state, Seat::First, &[c(Rank::King, Suit::Hearts)]).unwrap();
    let s2 = defend(
        &s1,
        Seat::Second,
        &Defense::HiddenCover(vec![c(Rank::Jack, Suit::Hearts)]),
    )
    .unwrap();

    let result = s2.result().expect("BURA finishes the round");
    assert!(result.was_bura());
    assert_eq!(result.winner(), Some(Seat::First));
    assert_eq!(result.match_points(), 2);

    let err = attack(&s2, Seat::First, &[c(Rank::Ace, Suit::Clubs)]).unwrap_err();
    assert_eq!(err, GameError::WrongPhase { phase: "finished" });
}

#[test]
fn dealt_bura_is_settled_at_once() {
    let state = (0..20_000u64)
        .map(|seed| init_round(&RoundConfig::new_match(seed, 11)).unwrap())
        .find(|s| s.result().is_some_and(|r| r.was_bura()))
        .expect("some seed deals a BURA");
    let winner = state.result().and_then(|r| r.winner()).unwrap();
    assert_eq!(state.hand(winner).len(), 3);
    assert!(state.hand(winner).iter().all(|c| c.is_trump(state.trump_suit())));
    assert_eq!(state.match_score(winner), 2);
    assert_eq!(state.version(), 0);
}

#[test]
fn false_declaration_hands_round_to_opponent() {
    let trump = c(Rank::Jack, Suit::Clubs);
    let state = setup(
        [
            vec![c(Rank::King, Suit::Hearts)],
            vec![c(Rank::Jack, Suit::Hearts)],
        ],
        [
            vec![c(Rank::Ace, Suit::Hearts), c(Rank::Ten, Suit::Hearts)],
            vec![],
        ],
        vec![],
        trump,
    );
    // 21 points: not enough.
    let done = declare_31(&state, Seat::First).unwrap();
    assert_eq!(
        done.result(),
        Some(RoundResult::Won {
            winner: Seat::Second,
            reason: WinReason::FalseDeclaration {
                declarer: Seat::First
            },
            match_points: 1,
        })
    );
}

#[test]
fn true_declaration_wins_for_declarer() {
    let trump = c(Rank::Jack, Suit::Clubs);
    let state = setup(
        [
            vec![c(Rank::King, Suit::Hearts)],
            vec![c(Rank::Jack, Suit::Hearts)],
        ],
        [
            vec![
                c(Rank::Ace, Suit::Hearts),
                c(Rank::Ten, Suit::Hearts),
                c(Rank::Ten, Suit::Spades),
            ],
            vec![],
        ],
        vec![],
        trump,
    );
    let done = declare_31(&state, Seat::First).unwrap();
    assert_eq!(done.result().and_then(|r| r.winner()), Some(Seat::First));
}

#[test]
fn defender_may_declare_with_attack_on_table() {
    let trump = c(Rank::Jack, Suit::Clubs);
    let state = setup(
        [
            vec![c(Rank::King, Suit::Hearts)],
            vec![c(Rank::Jack, Suit::Hearts)],
        ],
        [
            vec![],
            vec![
                c(Rank::Ace, Suit::Hearts),
                c(Rank::Ten, Suit::Hearts),
                c(Rank::Ten, Suit::Spades),
            ],
        ],
        vec![],
        trump,
    );
    let s1 = attack(&state, Seat::First, &[c(Rank::King, Suit::Hearts)]).unwrap();
    let done = declare_31(&s1, Seat::Second).unwrap();
    assert_eq!(done.result().and_then(|r| r.winner()), Some(Seat::Second));
    assert_eq!(done.card_count(), state.card_count());
}

#[test]
fn wager_climbs_to_the_top_and_stops() {
    let mut state = live_round(0);
    let mut last = WagerLevel::NONE;
    while !state.wager().is_max() {
        let proposer = state.turn();
        let pending = propose_wager(&state, proposer).unwrap();
        state = respond_wager(&pending, proposer.other(), true).unwrap();
        assert!(state.wager() > last);
        last = state.wager();
        assert_eq!(state.turn(), proposer);
    }
    assert_eq!(state.wager().name(), "Shashi");
    assert_eq!(
        propose_wager(&state, state.turn()),
        Err(GameError::WagerAtMaximum)
    );
}

#[test]
fn rejected_wager_pays_pre_raise_value() {
    let state = live_round(100);
    let proposer = state.turn();
    let s1 = respond_wager(
        &propose_wager(&state, proposer).unwrap(),
        proposer.other(),
        true,
    )
    .unwrap();
    let pending = propose_wager(&s1, proposer).unwrap();
    let done = respond_wager(&pending, proposer.other(), false).unwrap();
    assert_eq!(
        done.result(),
        Some(RoundResult::Won {
            winner: proposer,
            reason: WinReason::WagerRejected { proposer },
            match_points: 2,
        })
    );
    assert_eq!(done.wager().name(), "Davi");
}

#[test]
fn pending_wager_blocks_play() {
    let state = live_round(200);
    let attacker = state.turn();
    let pending = propose_wager(&state, attacker).unwrap();
    let card = pending.hand(attacker)[0];
    assert_eq!(
        attack(&pending, attacker, &[card]),
        Err(GameError::WrongPhase {
            phase: "davi_pending"
        })
    );
    assert!(matches!(pending.phase(), Phase::WagerPending { .. }));
}

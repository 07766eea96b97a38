use std::sync::Arc;
use std::time::Duration;

use bura_ai::{create_bot, decide, Difficulty, PassHistory};
use bura_engine::engine::{init_round, Action, Defense};
use bura_engine::rules::legal_beats;
use bura_engine::state::{GameState, RoundConfig, Seat, WinReason};
use bura_engine::sync::Revision;
use bura_session::{
    MemoryTableStore, SeatClient, SessionError, TableStore, TurnStatus, DEFAULT_TURN_TIMEOUT,
};

fn live_state() -> GameState {
    (0..)
        .map(|seed| init_round(&RoundConfig::new_match(seed, 11)).expect("deal"))
        .find(|s| !s.is_finished())
        .expect("some seed deals a live round")
}

fn open_table() -> (Arc<MemoryTableStore>, String, GameState) {
    open_table_with(live_state())
}

fn open_table_with(state: GameState) -> (Arc<MemoryTableStore>, String, GameState) {
    let store = Arc::new(MemoryTableStore::new());
    let table = store.create(state.clone()).expect("create");
    (store, table, state)
}

/// A live deal where seat 2 can beat seat 1 leading its first card, with
/// the beat that does it.
fn beatable_deal() -> (GameState, Vec<bura_engine::cards::Card>) {
    (0..)
        .filter_map(|seed| {
            let state = init_round(&RoundConfig::new_match(seed, 11)).expect("deal");
            if state.is_finished() {
                return None;
            }
            let lead = state.hand(Seat::First)[0];
            let beat = legal_beats(state.hand(Seat::Second), &[lead], state.trump_suit())
                .into_iter()
                .next()?;
            Some((state, beat))
        })
        .next()
        .expect("some seed lets seat 2 beat")
}

#[tokio::test(start_paused = true)]
async fn two_seats_play_a_round_through_the_store() {
    let (store, table, _) = open_table();
    let mut seats = [
        SeatClient::join(store.clone(), table.clone(), Seat::First).expect("join"),
        SeatClient::join(store.clone(), table.clone(), Seat::Second).expect("join"),
    ];
    let bot = create_bot(Difficulty::Medium, 5);
    let history = PassHistory::default();

    for _ in 0..200 {
        let Some(seat) = store.load(&table).expect("load").expected_actor() else {
            break;
        };
        let client = &mut seats[seat.index()];
        assert_eq!(client.await_turn().await.expect("turn"), TurnStatus::MyTurn);
        let action = decide(bot.as_ref(), client.state(), seat, &history).expect("move");
        client.act(action).expect("publish");
    }

    let published = store.load(&table).expect("load");
    assert!(published.is_finished());
    for client in seats.iter_mut() {
        assert_eq!(client.await_turn().await.expect("sync"), TurnStatus::RoundOver);
        assert_eq!(client.state(), &published);
    }
}

#[tokio::test(start_paused = true)]
async fn racing_writers_cannot_both_win() {
    let (store, table, state) = open_table();
    let mut a = SeatClient::join(store.clone(), table.clone(), Seat::First).expect("join");
    let mut b = SeatClient::join(store.clone(), table.clone(), Seat::First).expect("join");

    a.act(Action::ProposeWager).expect("first write wins");
    let err = b.act(Action::Declare31).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Conflict { expected, found, .. }
            if expected == Revision::of(&state) && found.version == 1
    ));
    assert!(err.is_retryable());

    // The loser has reloaded and now sees the winner's document.
    assert_eq!(b.state(), a.state());
    assert_eq!(store.load(&table).expect("load"), *a.state());
}

#[tokio::test(start_paused = true)]
async fn acting_out_of_turn_is_refused_locally() {
    let (store, table, state) = open_table();
    let mut second = SeatClient::join(store.clone(), table.clone(), Seat::Second).expect("join");
    let err = second.act(Action::Declare31).unwrap_err();
    assert!(matches!(err, SessionError::NotYourSeat(Seat::Second)));
    assert_eq!(store.load(&table).expect("load"), state);
}

#[tokio::test(start_paused = true)]
async fn waiting_seat_sees_opponent_move() {
    let (store, table, _) = open_table();
    let mut first = SeatClient::join(store.clone(), table.clone(), Seat::First).expect("join");
    let mut second = SeatClient::join(store.clone(), table.clone(), Seat::Second).expect("join");

    let card = first.state().hand(Seat::First)[0];
    first.act(Action::Attack(vec![card])).expect("attack");

    assert_eq!(second.await_turn().await.expect("turn"), TurnStatus::MyTurn);
    assert_eq!(second.state().table().map(|t| t.cards.clone()), Some(vec![card]));
}

#[tokio::test(start_paused = true)]
async fn stalled_opponent_forfeits_after_turn_clock() {
    let (store, table, _) = open_table();
    let mut second = SeatClient::join(store.clone(), table.clone(), Seat::Second)
        .expect("join")
        .with_turn_timeout(DEFAULT_TURN_TIMEOUT);

    let started = tokio::time::Instant::now();
    let err = second.await_turn().await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::TurnExpired {
            stalled: Seat::First
        }
    ));
    assert!(started.elapsed() >= Duration::from_secs(90));

    let finished = second.claim_timeout().expect("claim").clone();
    let result = finished.result().expect("finished");
    assert_eq!(result.winner(), Some(Seat::Second));
    assert!(matches!(
        result,
        bura_engine::state::RoundResult::Won {
            reason: WinReason::Timeout {
                stalled: Seat::First
            },
            ..
        }
    ));
    assert_eq!(store.load(&table).expect("load"), finished);
}

#[tokio::test(start_paused = true)]
async fn next_round_deal_race_settles_on_one_document() {
    let (store, table, _) = open_table();
    let mut first = SeatClient::join(store.clone(), table.clone(), Seat::First).expect("join");
    let mut second = SeatClient::join(store.clone(), table.clone(), Seat::Second).expect("join");

    first.act(Action::Declare31).expect("declare");
    assert_eq!(second.await_turn().await.expect("sync"), TurnStatus::RoundOver);
    if first.state().match_winner().is_some() {
        return;
    }

    first.deal_next_round(1234).expect("deal");
    let err = second.deal_next_round(5678).unwrap_err();
    assert!(matches!(err, SessionError::Conflict { .. }));
    assert_eq!(second.state(), first.state());
    assert_eq!(Revision::of(second.state()).round_no, 2);
}

#[tokio::test(start_paused = true)]
async fn closing_the_table_ends_waiting() {
    let (store, table, _) = open_table();
    let mut second = SeatClient::join(store.clone(), table.clone(), Seat::Second).expect("join");
    store.close(&table).expect("close");
    let err = second.await_turn().await.unwrap_err();
    assert!(matches!(err, SessionError::Closed(_)));
}

#[tokio::test(start_paused = true)]
async fn timeout_claim_before_clock_runs_out_is_refused() {
    let (store, table, state) = open_table();
    let mut second = SeatClient::join(store.clone(), table.clone(), Seat::Second).expect("join");

    let err = second.claim_timeout().unwrap_err();
    assert!(matches!(
        err,
        SessionError::ClockRunning {
            stalled: Seat::First,
            remaining,
        } if remaining == DEFAULT_TURN_TIMEOUT
    ));
    assert!(!err.is_retryable());
    assert_eq!(store.load(&table).expect("load"), state);
    assert_eq!(second.state(), &state);
}

#[tokio::test(start_paused = true)]
async fn every_move_restarts_the_turn_clock() {
    let (store, table, _) = open_table();
    let mut first = SeatClient::join(store.clone(), table.clone(), Seat::First).expect("join");
    let mut second = SeatClient::join(store.clone(), table.clone(), Seat::Second).expect("join");

    tokio::time::advance(Duration::from_secs(80)).await;
    let card = first.state().hand(Seat::First)[0];
    first.act(Action::Attack(vec![card])).expect("attack");
    assert_eq!(second.await_turn().await.expect("turn"), TurnStatus::MyTurn);
    let cover = vec![second.state().hand(Seat::Second)[0]];
    second
        .act(Action::Defend(Defense::HiddenCover(cover)))
        .expect("cover");
    if second.state().is_finished() {
        return;
    }

    // 140 s since joining, but only 60 s since seat 1 got the turn back.
    tokio::time::advance(Duration::from_secs(60)).await;
    let err = second.claim_timeout().unwrap_err();
    assert!(matches!(
        err,
        SessionError::ClockRunning { remaining, .. } if remaining == Duration::from_secs(30)
    ));

    tokio::time::advance(Duration::from_secs(30)).await;
    let finished = second.claim_timeout().expect("claim");
    assert_eq!(finished.result().and_then(|r| r.winner()), Some(Seat::Second));
}

#[tokio::test(start_paused = true)]
async fn waiting_seat_gets_a_fresh_clock_for_each_opponent_move() {
    let (state, beat) = beatable_deal();
    let (store, table, _) = open_table_with(state);
    let mut first = SeatClient::join(store.clone(), table.clone(), Seat::First).expect("join");
    let mut second = SeatClient::join(store.clone(), table.clone(), Seat::Second).expect("join");

    let lead = first.state().hand(Seat::First)[0];
    first.act(Action::Attack(vec![lead])).expect("attack");
    let waiter = tokio::spawn(async move {
        let status = first.await_turn().await;
        (first, status)
    });

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(second.await_turn().await.expect("turn"), TurnStatus::MyTurn);
    second
        .act(Action::Defend(Defense::Beat(beat)))
        .expect("beat");

    // Seat 2 keeps the turn after beating and attacks 60 s later, past the
    // 90 s seat 1 would have had on a single clock.
    tokio::time::sleep(Duration::from_secs(60)).await;
    if !second.state().is_finished() {
        let card = second.state().hand(Seat::Second)[0];
        second.act(Action::Attack(vec![card])).expect("attack");
    }

    let (first, status) = waiter.await.expect("waiter");
    let status = status.expect("no expiry while seat 2 kept moving");
    if second.state().is_finished() {
        assert_eq!(status, TurnStatus::RoundOver);
    } else {
        assert_eq!(status, TurnStatus::MyTurn);
        assert_eq!(first.state(), second.state());
    }
}

#[tokio::test(start_paused = true)]
async fn attacker_learns_of_opponent_covers() {
    let (store, table, _) = open_table();
    let mut first = SeatClient::join(store.clone(), table.clone(), Seat::First).expect("join");
    let mut second = SeatClient::join(store.clone(), table.clone(), Seat::Second).expect("join");

    let lead = first.state().hand(Seat::First)[0];
    first.act(Action::Attack(vec![lead])).expect("attack");
    second.await_turn().await.expect("turn");
    let cover = vec![second.state().hand(Seat::Second)[0]];
    second
        .act(Action::Defend(Defense::HiddenCover(cover)))
        .expect("cover");

    first.await_turn().await.expect("sync");
    assert_eq!(first.history().passes(lead.suit), 1);
    assert_eq!(first.history().weakest_suit(), Some(lead.suit));
    // A seat never counts its own covers.
    assert_eq!(second.history().total(), 0);

    // The hard tier reads the same history it would get in a local match.
    if first.is_my_turn() {
        let bot = create_bot(Difficulty::Hard, 9);
        let action = decide(bot.as_ref(), first.state(), Seat::First, first.history());
        assert!(action.is_some());
    }
}

#[tokio::test(start_paused = true)]
async fn pass_history_starts_over_with_each_round() {
    let (store, table, _) = open_table();
    let mut first = SeatClient::join(store.clone(), table.clone(), Seat::First).expect("join");
    let mut second = SeatClient::join(store.clone(), table.clone(), Seat::Second).expect("join");

    let lead = first.state().hand(Seat::First)[0];
    first.act(Action::Attack(vec![lead])).expect("attack");
    second.await_turn().await.expect("turn");
    let cover = vec![second.state().hand(Seat::Second)[0]];
    second
        .act(Action::Defend(Defense::HiddenCover(cover)))
        .expect("cover");
    first.await_turn().await.expect("sync");
    assert_eq!(first.history().total(), 1);

    if !first.state().is_finished() {
        first.act(Action::Declare31).expect("declare");
    }
    if first.state().match_winner().is_some() {
        return;
    }
    first.deal_next_round(77).expect("deal");
    assert_eq!(first.history().total(), 0);
}

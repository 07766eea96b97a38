use bura_engine::cards::{Card, Rank, Suit};
use bura_engine::engine::{Action, Defense};
use bura_engine::logger::{format_round_id, ActionRecord, RoundLogger, RoundRecord};
use bura_engine::state::{RoundResult, Seat, WinReason};

fn sample() -> RoundRecord {
    RoundRecord {
        round_id: "20250102-000123".to_string(),
        seed: 42,
        round_no: 3,
        trump: Card::new(Rank::Queen, Suit::Clubs),
        first_attacker: Seat::Second,
        actions: vec![
            ActionRecord {
                version: 1,
                seat: Seat::Second,
                action: Action::Attack(vec![Card::new(Rank::Ace, Suit::Hearts)]),
            },
            ActionRecord {
                version: 2,
                seat: Seat::First,
                action: Action::Defend(Defense::HiddenCover(vec![Card::new(
                    Rank::Jack,
                    Suit::Spades,
                )])),
            },
            ActionRecord {
                version: 3,
                seat: Seat::Second,
                action: Action::Declare31,
            },
        ],
        result: Some(RoundResult::Won {
            winner: Seat::First,
            reason: WinReason::FalseDeclaration {
                declarer: Seat::Second,
            },
            match_points: 1,
        }),
        match_score: [4, 2],
        ts: None,
        meta: None,
    }
}

#[test]
fn round_record_serializes_and_deserializes() {
    let rec = sample();
    let s = serde_json::to_string(&rec).expect("serialize");
    let back: RoundRecord = serde_json::from_str(&s).expect("deserialize");
    assert_eq!(rec, back);
}

#[test]
fn id_format_is_date_and_sequence() {
    assert_eq!(format_round_id("20251231", 42), "20251231-000042");
}

#[test]
fn logger_writes_one_line_per_round_with_timestamp() {
    let dir = std::env::temp_dir().join(format!("bura-log-{}", std::process::id()));
    let path = dir.join("rounds.jsonl");
    let mut logger = RoundLogger::create(&path).expect("create");
    logger.write(&sample()).expect("write");
    logger.write(&sample()).expect("write");
    drop(logger);

    let contents = std::fs::read_to_string(&path).expect("read back");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    let rec: RoundRecord = serde_json::from_str(lines[0]).expect("parse line");
    assert!(rec.ts.is_some());
    assert_eq!(rec.actions.len(), 3);
    let _ = std::fs::remove_dir_all(dir);
}

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::engine::Action;
use crate::state::{GameState, RoundResult, Seat};

/// One applied move, as it was submitted.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Version of the state the move produced.
    pub version: u64,
    pub seat: Seat,
    pub action: Action,
}

/// Complete record of one round: deal, moves and outcome.
/// Serialized to JSONL, one round per line.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Unique within a log; [`RoundLogger`] assigns YYYYMMDD-NNNNNN
    pub round_id: String,
    /// Shuffle seed; replaying it with the same moves reproduces the round
    pub seed: u64,
    pub round_no: u32,
    pub trump: Card,
    pub first_attacker: Seat,
    pub actions: Vec<ActionRecord>,
    pub result: Option<RoundResult>,
    /// Match score after the round
    pub match_score: [u32; 2],
    /// RFC3339 timestamp
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
}

impl RoundRecord {
    /// Starts a record for the round `state` opens.
    pub fn open(round_id: String, state: &GameState) -> Self {
        Self {
            round_id,
            seed: state.seed(),
            round_no: state.round_no(),
            trump: state.trump_card(),
            first_attacker: state.first_attacker(),
            actions: Vec::new(),
            result: state.result(),
            match_score: [
                state.match_score(Seat::First),
                state.match_score(Seat::Second),
            ],
            ts: None,
            meta: None,
        }
    }

    /// Appends a move and refreshes the outcome from the resulting state.
    pub fn push(&mut self, seat: Seat, action: Action, after: &GameState) {
        self.actions.push(ActionRecord {
            version: after.version(),
            seat,
            action,
        });
        self.result = after.result();
        self.match_score = [
            after.match_score(Seat::First),
            after.match_score(Seat::Second),
        ];
    }
}

pub fn format_round_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

use chrono::{SecondsFormat, Utc};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct RoundLogger {
    writer: Option<BufWriter<File>>,
    date: String,
    seq: u32,
}

impl RoundLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        })
    }

    /// A logger that numbers rounds but writes nothing.
    pub fn detached(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_round_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &RoundRecord) -> std::io::Result<()> {
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}

//! Versioned submissions for two parties sharing one game document.
//!
//! A party computes its move against the version it last saw. The holder of
//! the authoritative state accepts the move only if that version is still
//! current; otherwise the submitter has to resynchronize and decide again.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::{apply, Action, Defense};
use crate::errors::GameError;
use crate::state::{GameState, Seat};

/// Position of a document across a whole match.
///
/// `version` restarts at zero with every dealt round, so documents are
/// ordered by round first.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Revision {
    pub round_no: u32,
    pub version: u64,
}

impl Revision {
    pub fn of(state: &GameState) -> Self {
        Self {
            round_no: state.round_no(),
            version: state.version(),
        }
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "round {} v{}", self.round_no, self.version)
    }
}

/// A move tagged with the version it was computed against.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub base_version: u64,
    pub actor: Seat,
    pub action: Action,
}

impl Submission {
    pub fn against(state: &GameState, actor: Seat, action: Action) -> Self {
        Self {
            base_version: state.version(),
            actor,
            action,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The submission was computed against an older document.
    #[error("Stale submission: based on version {found}, current is {expected}")]
    Stale { expected: u64, found: u64 },
    #[error(transparent)]
    Rejected(#[from] GameError),
}

impl SyncError {
    /// Stale submissions are recovered by reloading; rejected ones are not.
    pub fn is_stale(&self) -> bool {
        matches!(self, SyncError::Stale { .. })
    }
}

/// Applies `submission` on top of `authoritative`.
///
/// # Examples
///
/// ```
/// use bura_engine::engine::{init_round, Action};
/// use bura_engine::state::{RoundConfig, Seat};
/// use bura_engine::sync::{submit, Submission, SyncError};
///
/// let state = init_round(&RoundConfig::new_match(21, 11)).unwrap();
/// # if state.is_finished() { return; }
/// let card = state.hand(Seat::First)[0];
/// let sub = Submission::against(&state, Seat::First, Action::Attack(vec![card]));
/// let next = submit(&state, &sub).unwrap();
///
/// // Replaying the same submission is stale now.
/// assert!(matches!(submit(&next, &sub), Err(SyncError::Stale { .. })));
/// ```
pub fn submit(authoritative: &GameState, submission: &Submission) -> Result<GameState, SyncError> {
    if submission.base_version != authoritative.version() {
        return Err(SyncError::Stale {
            expected: authoritative.version(),
            found: submission.base_version,
        });
    }
    Ok(apply(authoritative, submission.actor, &submission.action)?)
}

/// Picks the copy to keep when a local and a published state meet.
///
/// The later [`Revision`] wins. At equal revisions the published copy is
/// taken only if it is identical; a diverged document at the same revision
/// keeps the local copy and reports `false`.
pub fn reconcile(local: &GameState, remote: &GameState) -> (GameState, bool) {
    use std::cmp::Ordering;
    match Revision::of(remote).cmp(&Revision::of(local)) {
        Ordering::Greater => (remote.clone(), true),
        Ordering::Less => (local.clone(), true),
        Ordering::Equal => (local.clone(), local == remote),
    }
}

/// The defence that turns `before` into `after`, when the two are
/// consecutive documents of one round and `after` resolves the trick that
/// `before` has on the table.
///
/// Lets a party that only sees published documents follow the opponent's
/// answers. The defender's cards come back in hand order.
pub fn defense_between(before: &GameState, after: &GameState) -> Option<(Seat, Defense)> {
    let trick = before.table()?;
    if after.table().is_some()
        || after.round_no() != before.round_no()
        || after.version() != before.version() + 1
    {
        return None;
    }
    let defender = trick.attacker.other();
    let played: Vec<_> = before
        .hand(defender)
        .iter()
        .copied()
        .filter(|c| !after.hand(defender).contains(c))
        .collect();
    if played.len() != trick.cards.len() {
        return None;
    }
    let beaten = trick
        .cards
        .iter()
        .all(|c| after.seat(defender).taken().contains(c));
    let defense = if beaten {
        Defense::Beat(played)
    } else {
        Defense::HiddenCover(played)
    };
    Some((defender, defense))
}

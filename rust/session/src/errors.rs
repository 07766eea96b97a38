use std::time::Duration;

use bura_engine::errors::GameError;
use bura_engine::state::Seat;
use bura_engine::sync::{Revision, SyncError};
use thiserror::Error;

use crate::store::TableId;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Illegal move: {0}")]
    Game(#[from] GameError),
    #[error(transparent)]
    Sync(#[from] SyncError),
    /// The published document moved on since this client last loaded it.
    #[error("Table {table} is at {found}, write expected {expected}")]
    Conflict {
        table: TableId,
        expected: Revision,
        found: Revision,
    },
    #[error("Table not found: {0}")]
    NotFound(TableId),
    #[error("It is not {0}'s move")]
    NotYourSeat(Seat),
    #[error("{stalled} let the turn clock run out")]
    TurnExpired { stalled: Seat },
    /// A timeout was claimed before the stalled seat's clock ran out.
    #[error("{stalled} still has {remaining:?} on the turn clock")]
    ClockRunning { stalled: Seat, remaining: Duration },
    #[error("Table storage poisoned")]
    StoragePoisoned,
    #[error("Table {0} closed")]
    Closed(TableId),
}

impl SessionError {
    /// Errors a client recovers from by reloading the table and deciding again.
    pub fn is_retryable(&self) -> bool {
        match self {
            SessionError::Conflict { .. } => true,
            SessionError::Sync(e) => e.is_stale(),
            _ => false,
        }
    }

    /// Errors that invalidate the table rather than the move.
    pub fn is_fatal(&self) -> bool {
        match self {
            SessionError::StoragePoisoned => true,
            SessionError::Game(e) => e.is_fatal(),
            SessionError::Sync(SyncError::Rejected(e)) => e.is_fatal(),
            _ => false,
        }
    }
}

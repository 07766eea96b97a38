//! Two-party play over a shared [`TableStore`].
//!
//! Each seat runs its own [`SeatClient`]. The seat entitled to move computes
//! the transition locally and publishes the whole document, guarded by the
//! revision it started from. The other seat adopts whatever is published.

use std::sync::Arc;
use std::time::Duration;

use bura_ai::PassHistory;
use bura_engine::engine::{forfeit_turn, next_round, Action};
use bura_engine::state::{GameState, Seat};
use bura_engine::sync::{defense_between, reconcile, submit, Revision, Submission};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::Instant;

use crate::errors::SessionError;
use crate::store::{TableId, TableStore};

/// Turn clock used when none is configured.
pub const DEFAULT_TURN_TIMEOUT: Duration = Duration::from_secs(90);

/// What [`SeatClient::await_turn`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStatus {
    /// This seat must move now.
    MyTurn,
    /// The round is over; nobody is on turn.
    RoundOver,
}

pub struct SeatClient<S: TableStore> {
    store: Arc<S>,
    table: TableId,
    seat: Seat,
    local: GameState,
    updates: broadcast::Receiver<GameState>,
    turn_timeout: Duration,
    /// When the current revision was first seen; the turn clock runs from here.
    turn_started: Instant,
    /// The opponent's concessions this round, for this seat's bot.
    history: PassHistory,
}

impl<S: TableStore> std::fmt::Debug for SeatClient<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeatClient")
            .field("table", &self.table)
            .field("seat", &self.seat)
            .field("revision", &Revision::of(&self.local))
            .finish()
    }
}

impl<S: TableStore> SeatClient<S> {
    /// Takes `seat` at `table`, loading the current document.
    pub fn join(store: Arc<S>, table: TableId, seat: Seat) -> Result<Self, SessionError> {
        let updates = store.subscribe(&table)?;
        let local = store.load(&table)?;
        tracing::info!(
            table = %table,
            seat = %seat,
            revision = %Revision::of(&local),
            "seat joined"
        );
        Ok(Self {
            store,
            table,
            seat,
            local,
            updates,
            turn_timeout: DEFAULT_TURN_TIMEOUT,
            turn_started: Instant::now(),
            history: PassHistory::default(),
        })
    }

    pub fn with_turn_timeout(mut self, timeout: Duration) -> Self {
        self.turn_timeout = timeout;
        self
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn table(&self) -> &TableId {
        &self.table
    }

    pub fn state(&self) -> &GameState {
        &self.local
    }

    pub fn is_my_turn(&self) -> bool {
        self.local.expected_actor() == Some(self.seat)
    }

    /// Passes the opponent made against this seat's attacks this round.
    pub fn history(&self) -> &PassHistory {
        &self.history
    }

    /// When the seat on turn runs out of time.
    pub fn turn_deadline(&self) -> Instant {
        self.turn_started + self.turn_timeout
    }

    /// Computes this seat's move and publishes the result.
    ///
    /// A move computed against an outdated copy is refused by the store; the
    /// client reloads and returns the [`SessionError::Conflict`] so the
    /// caller can decide again on the fresh state.
    pub fn act(&mut self, action: Action) -> Result<&GameState, SessionError> {
        if !self.is_my_turn() {
            return Err(SessionError::NotYourSeat(self.seat));
        }
        let submission = Submission::against(&self.local, self.seat, action);
        let next = submit(&self.local, &submission)?;
        self.publish(next)?;
        Ok(&self.local)
    }

    /// Ends the round against an opponent that let its clock expire.
    ///
    /// Refused with [`SessionError::ClockRunning`] while the opponent still
    /// has time; the clock restarts with every revision this client sees.
    pub fn claim_timeout(&mut self) -> Result<&GameState, SessionError> {
        let stalled = self
            .local
            .expected_actor()
            .filter(|s| *s != self.seat)
            .ok_or(SessionError::NotYourSeat(self.seat))?;
        let remaining = self.turn_deadline().saturating_duration_since(Instant::now());
        if !remaining.is_zero() {
            return Err(SessionError::ClockRunning { stalled, remaining });
        }
        let next = forfeit_turn(&self.local, stalled)?;
        tracing::warn!(
            table = %self.table,
            stalled = %stalled,
            "claiming round on timeout"
        );
        self.publish(next)?;
        Ok(&self.local)
    }

    /// Deals the next round. Either seat may do it; the loser of a race
    /// gets a conflict and simply adopts the winner's deal.
    pub fn deal_next_round(&mut self, seed: u64) -> Result<&GameState, SessionError> {
        let next = next_round(&self.local, seed)?;
        self.publish(next)?;
        Ok(&self.local)
    }

    /// Reloads the published document, keeping whichever copy is newer.
    pub fn resync(&mut self) -> Result<&GameState, SessionError> {
        let remote = self.store.load(&self.table)?;
        self.adopt(remote);
        Ok(&self.local)
    }

    /// Waits until this seat must move or the round ends.
    ///
    /// Fails with [`SessionError::TurnExpired`] naming the opponent when it
    /// does not move within the turn timeout.
    pub async fn await_turn(&mut self) -> Result<TurnStatus, SessionError> {
        loop {
            match self.local.expected_actor() {
                None => return Ok(TurnStatus::RoundOver),
                Some(seat) if seat == self.seat => return Ok(TurnStatus::MyTurn),
                Some(_) => {}
            }
            match tokio::time::timeout_at(self.turn_deadline(), self.updates.recv()).await {
                Ok(Ok(remote)) => self.adopt(remote),
                Ok(Err(RecvError::Lagged(skipped))) => {
                    tracing::debug!(table = %self.table, skipped, "update stream lagged");
                    self.resync()?;
                }
                Ok(Err(RecvError::Closed)) => return Err(SessionError::Closed(self.table.clone())),
                Err(_) => {
                    let stalled = self.seat.other();
                    tracing::warn!(
                        table = %self.table,
                        stalled = %stalled,
                        timeout_secs = self.turn_timeout.as_secs(),
                        "turn clock expired"
                    );
                    return Err(SessionError::TurnExpired { stalled });
                }
            }
        }
    }

    /// Waits, without a deadline, for the next published document.
    pub async fn await_update(&mut self) -> Result<&GameState, SessionError> {
        match self.updates.recv().await {
            Ok(remote) => self.adopt(remote),
            Err(RecvError::Lagged(_)) => {
                self.resync()?;
            }
            Err(RecvError::Closed) => return Err(SessionError::Closed(self.table.clone())),
        }
        Ok(&self.local)
    }

    fn publish(&mut self, next: GameState) -> Result<(), SessionError> {
        let base = Revision::of(&self.local);
        match self.store.publish(&self.table, base, next.clone()) {
            Ok(()) => {
                tracing::debug!(
                    table = %self.table,
                    seat = %self.seat,
                    revision = %Revision::of(&next),
                    "move published"
                );
                self.replace_local(next);
                Ok(())
            }
            Err(err @ SessionError::Conflict { .. }) => {
                self.resync()?;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    fn adopt(&mut self, remote: GameState) {
        let (kept, consistent) = reconcile(&self.local, &remote);
        if !consistent {
            tracing::warn!(
                table = %self.table,
                seat = %self.seat,
                revision = %Revision::of(&remote),
                "diverged copy at same revision; keeping local"
            );
        }
        self.replace_local(kept);
    }

    fn replace_local(&mut self, next: GameState) {
        if Revision::of(&next) == Revision::of(&self.local) {
            return;
        }
        if next.round_no() != self.local.round_no() {
            self.history.clear();
        } else if let Some((defender, defense)) = defense_between(&self.local, &next) {
            if defender != self.seat {
                if let Some(trick) = self.local.table() {
                    self.history.observe(&trick.cards, &defense);
                }
            }
        }
        self.local = next;
        self.turn_started = Instant::now();
    }
}

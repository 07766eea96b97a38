//! Shared table documents.
//!
//! A table holds exactly one [`GameState`]. Writers name the [`Revision`]
//! they based their write on; the store refuses the write if the document
//! has moved on since, so two racing seats can never both win.

use std::collections::HashMap;
use std::sync::RwLock;

use bura_engine::state::GameState;
use bura_engine::sync::Revision;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::errors::SessionError;

pub type TableId = String;

const UPDATE_CHANNEL_BUFFER: usize = 64;

/// Persistence and broadcast collaborator for networked play.
pub trait TableStore: Send + Sync {
    /// Opens a table holding `state` and returns its id.
    fn create(&self, state: GameState) -> Result<TableId, SessionError>;

    /// The latest published document.
    fn load(&self, table: &TableId) -> Result<GameState, SessionError>;

    /// Replaces the document if it is still at `expected`.
    fn publish(
        &self,
        table: &TableId,
        expected: Revision,
        next: GameState,
    ) -> Result<(), SessionError>;

    /// Every document published after this call.
    fn subscribe(&self, table: &TableId) -> Result<broadcast::Receiver<GameState>, SessionError>;

    /// Drops the table; subscribers see the channel close.
    fn close(&self, table: &TableId) -> Result<(), SessionError>;
}

struct Table {
    state: GameState,
    updates: broadcast::Sender<GameState>,
}

/// In-process [`TableStore`].
#[derive(Default)]
pub struct MemoryTableStore {
    tables: RwLock<HashMap<TableId, Table>>,
}

impl std::fmt::Debug for MemoryTableStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.tables.read().map(|t| t.len()).unwrap_or(0);
        f.debug_struct("MemoryTableStore")
            .field("tables", &count)
            .finish()
    }
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table_ids(&self) -> Result<Vec<TableId>, SessionError> {
        let guard = self
            .tables
            .read()
            .map_err(|_| SessionError::StoragePoisoned)?;
        Ok(guard.keys().cloned().collect())
    }
}

impl TableStore for MemoryTableStore {
    fn create(&self, state: GameState) -> Result<TableId, SessionError> {
        let id = Uuid::new_v4().to_string();
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_BUFFER);

        tracing::info!(
            table = %id,
            round = state.round_no(),
            "table opened"
        );

        let mut guard = self
            .tables
            .write()
            .map_err(|_| SessionError::StoragePoisoned)?;
        guard.insert(id.clone(), Table { state, updates });
        Ok(id)
    }

    fn load(&self, table: &TableId) -> Result<GameState, SessionError> {
        let guard = self
            .tables
            .read()
            .map_err(|_| SessionError::StoragePoisoned)?;
        guard
            .get(table)
            .map(|t| t.state.clone())
            .ok_or_else(|| SessionError::NotFound(table.clone()))
    }

    fn publish(
        &self,
        table: &TableId,
        expected: Revision,
        next: GameState,
    ) -> Result<(), SessionError> {
        let mut guard = self
            .tables
            .write()
            .map_err(|_| SessionError::StoragePoisoned)?;
        let entry = guard
            .get_mut(table)
            .ok_or_else(|| SessionError::NotFound(table.clone()))?;

        let found = Revision::of(&entry.state);
        if found != expected {
            tracing::warn!(
                table = %table,
                %expected,
                %found,
                "refused stale publish"
            );
            return Err(SessionError::Conflict {
                table: table.clone(),
                expected,
                found,
            });
        }

        tracing::debug!(
            table = %table,
            from = %found,
            to = %Revision::of(&next),
            phase = next.phase().name(),
            "document published"
        );
        entry.state = next.clone();
        // No receivers is fine: seats may have dropped their subscription.
        let _ = entry.updates.send(next);
        Ok(())
    }

    fn subscribe(&self, table: &TableId) -> Result<broadcast::Receiver<GameState>, SessionError> {
        let guard = self
            .tables
            .read()
            .map_err(|_| SessionError::StoragePoisoned)?;
        let entry = guard
            .get(table)
            .ok_or_else(|| SessionError::NotFound(table.clone()))?;
        tracing::debug!(table = %table, "seat subscribed to table updates");
        Ok(entry.updates.subscribe())
    }

    fn close(&self, table: &TableId) -> Result<(), SessionError> {
        let mut guard = self
            .tables
            .write()
            .map_err(|_| SessionError::StoragePoisoned)?;
        match guard.remove(table) {
            Some(_) => {
                tracing::info!(table = %table, "table closed");
                Ok(())
            }
            None => Err(SessionError::NotFound(table.clone())),
        }
    }
}

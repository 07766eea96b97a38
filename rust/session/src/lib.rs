//! Session orchestration for Bura matches.
//!
//! [`LocalSession`] plays a match on one timeline, with bots moving after a
//! thinking delay. [`SeatClient`] plays one seat of a networked table through
//! a [`TableStore`], publishing documents guarded by their revision and
//! watching the opponent's turn clock.

pub mod errors;
pub mod local;
pub mod logging;
pub mod networked;
pub mod store;

pub use errors::SessionError;
pub use local::{Controller, LocalSession, MatchConfig};
pub use logging::{init_logging, init_logging_with, init_test_logging};
pub use networked::{SeatClient, TurnStatus, DEFAULT_TURN_TIMEOUT};
pub use store::{MemoryTableStore, TableId, TableStore};

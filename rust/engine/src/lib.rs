//! # bura-engine: Bura Rules Engine Core
//!
//! A deterministic engine for two-seat Bura. Provides the 20-card model,
//! pure round transitions, the Davi wager ladder, a versioned submission
//! contract for networked play, and JSONL round records. Every shuffle is
//! driven by a seed, so a round replays exactly.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and beat ordering
//! - [`deck`] - Deterministic deck shuffling with ChaCha20 RNG
//! - [`state`] - Seats, tricks, phases, results and the round document
//! - [`engine`] - Round transitions: deal, attack, defend, wagers, declarations
//! - [`rules`] - Move validation, legal-move enumeration and scoring
//! - [`wager`] - The Davi ladder
//! - [`sync`] - Version-checked submissions and reconciliation
//! - [`logger`] - RoundRecord serialization
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use bura_engine::engine::{attack, defend, init_round, Defense};
//! use bura_engine::rules::legal_beats;
//! use bura_engine::state::{RoundConfig, Seat};
//!
//! let state = init_round(&RoundConfig::new_match(42, 11)).unwrap();
//! # if state.is_finished() { return; }
//! let lead = state.hand(Seat::First)[0];
//! let state = attack(&state, Seat::First, &[lead]).unwrap();
//!
//! // Beat if possible, otherwise concede face-down.
//! let hand = state.hand(Seat::Second);
//! let defense = match legal_beats(hand, &[lead], state.trump_suit()).pop() {
//!     Some(beat) => Defense::Beat(beat),
//!     None => Defense::HiddenCover(vec![hand[0]]),
//! };
//! let state = defend(&state, Seat::Second, &defense).unwrap();
//! assert_eq!(state.card_count(), 20);
//! ```
//!
//! ## Deterministic Gameplay
//!
//! ```rust
//! use bura_engine::deck::build_deck;
//!
//! assert_eq!(build_deck(7), build_deck(7));
//! ```

pub mod cards;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod logger;
pub mod rules;
pub mod state;
pub mod sync;
pub mod wager;

//! # Swiss Engine
//!
//! A Swiss-style chess tournament pairing and standings engine.
//!
//! The engine is synchronous and pure at its core: pairing generation,
//! history derivation, standings calculation, and point reconciliation are
//! all functions over passed-in snapshots. Persistence goes through the
//! [`storage::TournamentStore`] interface; [`tournament::TournamentService`]
//! wires the two together for callers such as the bundled CLI.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, rounds, pairings, points)
//! - **history**: Head-to-head history derived from prior rounds
//! - **pairing**: First-fit greedy round generation and pairing reordering
//! - **standings**: Ranked table with Buchholz and win tie-breaks
//! - **lifecycle**: Result recording and running-total reconciliation
//! - **storage**: JSONL-backed tournament store
//! - **tournament**: Orchestration layer over engine + store
//! - **config**: Configuration loading and validation

pub mod config;
pub mod error;
pub mod history;
pub mod lifecycle;
pub mod models;
pub mod pairing;
pub mod standings;
pub mod storage;
pub mod tournament;

pub use error::EngineError;
pub use models::*;

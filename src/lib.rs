//! Ritual - habit and resolution tracking from the terminal
//!
//! Ritual stores recurring goals (habits), records daily check-ins against
//! them, and turns those check-ins into per-habit streaks, a global streak,
//! and per-category XP. All state lives in a local SQLite database; every
//! check-in is one transaction that updates the log, the streaks, and the
//! XP ledger together.
//!
//! The `progress` module is the engine; `domain` holds the shared types;
//! the binary in `main.rs` is a thin clap front end over both.

pub mod config;
pub mod domain;
pub mod progress;

pub use domain::*;

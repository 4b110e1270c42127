//! Core domain types shared by the progress engine and the CLI.

mod error;
mod habit;

pub use error::*;
pub use habit::*;

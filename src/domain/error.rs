//! Error taxonomy for the progress engine.

/// Failures that are part of the engine's contract with callers.
///
/// Storage errors propagate unmodified through `anyhow`; these variants
/// cover the cases the surrounding layer is expected to branch on. Missing
/// targets on count/duration habits are deliberately not an error: the
/// classifier degrades to a zero threshold instead.
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    /// The referenced habit does not exist or belongs to another user
    #[error("habit not found: {0}")]
    HabitNotFound(String),

    /// The referenced user has no stored state where some is required
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// No caller identity was supplied; nothing was written
    #[error("no caller identity configured")]
    Unauthenticated,
}

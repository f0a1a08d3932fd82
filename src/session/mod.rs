//! Editing sessions: live module instances, ordering and history.

/// Recorded edit entries.
pub mod history;
/// Live module instances and visibility state.
pub mod instance;
/// The session and its edit operations.
pub mod session;

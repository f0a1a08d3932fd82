//! Shared primitives: regions, buffers, ids, errors and numeric helpers.

/// Core value types (ROI, orientation, buffers, ids).
pub mod core;
/// Error taxonomy and result alias.
pub mod error;
/// Hashing and small numeric routines used by the commit and preview paths.
pub mod math;

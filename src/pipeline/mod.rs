//! Pipeline execution: stages, parameter commit and the driver.
//!
//! A pipeline binds the session's ordered instances into stages, each
//! holding a baked parameter copy and a content hash that keys its cached
//! output.

/// Parameter commit and stage hashing.
pub mod commit;
/// The pipeline driver.
pub mod driver;
/// External mask store boundary.
pub mod masks;
/// Per-pipeline stage state.
pub mod stage;

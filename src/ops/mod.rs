//! Operation registration: providers, descriptors and the catalog.
//!
//! An operation unit supplies a raw entry-point table; registration binds
//! documented defaults for absent optional entries and produces an immutable
//! descriptor shared by every instance of the operation.

/// Process-wide descriptor catalog.
pub mod catalog;
/// Descriptor resolution and the bound callback table.
pub mod descriptor;
/// The operation unit contract and raw entry points.
pub mod provider;
/// Declarative simple-UI sub-protocol.
pub mod simple;

use crate::foundation::core::MaskId;

/// Boundary to the external mask store.
///
/// The core never interprets mask geometry; it only folds the store's opaque
/// byte serialization into stage hashes, so any change to a referenced mask
/// invalidates the stages using it.
pub trait MaskStore: Send + Sync {
    /// Serialize the geometry of a mask group for hashing.
    ///
    /// Must be deterministic for unchanged geometry and should return an
    /// empty buffer for unknown ids.
    fn geometry_bytes(&self, id: MaskId) -> Vec<u8>;
}

/// Mask store with no masks; every lookup serializes to nothing.
pub struct NoMasks;

impl MaskStore for NoMasks {
    fn geometry_bytes(&self, _id: MaskId) -> Vec<u8> {
        Vec::new()
    }
}

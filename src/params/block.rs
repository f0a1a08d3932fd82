use crate::foundation::error::{PipeError, PipeResult};

/// Opaque parameter bytes of one module instance.
///
/// The block's size is fixed by the owning descriptor; only the descriptor's
/// callbacks interpret the contents. The byte layout is the persistence
/// format, so it must stay stable across sessions.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ParamBlock {
    bytes: Vec<u8>,
}

impl ParamBlock {
    /// Zeroed block of `size` bytes.
    pub fn zeroed(size: usize) -> Self {
        Self {
            bytes: vec![0; size],
        }
    }

    /// Take ownership of raw bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Return `true` for a zero-sized block.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Raw byte view.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Mutable raw byte view.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Overwrite the whole block, keeping the size fixed.
    pub fn copy_from(&mut self, src: &ParamBlock) -> PipeResult<()> {
        if src.len() != self.len() {
            return Err(PipeError::validation(
                "parameter block size must match its descriptor",
            ));
        }
        self.bytes.copy_from_slice(&src.bytes);
        Ok(())
    }

    /// Read the 4-byte slot at `slot` as little-endian `f32`.
    ///
    /// Used by the packed simple-UI layout (one slot per element).
    pub fn read_f32_slot(&self, slot: usize) -> f32 {
        f32::from_le_bytes(self.slot(slot))
    }

    /// Read the 4-byte slot at `slot` as little-endian `i32`.
    pub fn read_i32_slot(&self, slot: usize) -> i32 {
        i32::from_le_bytes(self.slot(slot))
    }

    /// Write `v` into the 4-byte slot at `slot`.
    pub fn write_f32_slot(&mut self, slot: usize, v: f32) {
        self.bytes[slot * 4..slot * 4 + 4].copy_from_slice(&v.to_le_bytes());
    }

    /// Write `v` into the 4-byte slot at `slot`.
    pub fn write_i32_slot(&mut self, slot: usize, v: i32) {
        self.bytes[slot * 4..slot * 4 + 4].copy_from_slice(&v.to_le_bytes());
    }

    fn slot(&self, slot: usize) -> [u8; 4] {
        let mut out = [0u8; 4];
        out.copy_from_slice(&self.bytes[slot * 4..slot * 4 + 4]);
        out
    }
}

/// Persisted, versioned parameter blob as read from presets or history.
///
/// The version travels with the bytes so the running operation can migrate
/// old layouts through its own `legacy_params` entry point.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ParamsBlob {
    /// Parameter-format version the bytes were written with.
    pub version: i32,
    /// Raw parameter bytes.
    pub data: Vec<u8>,
}

impl ParamsBlob {
    /// Snapshot a live block at the given format version.
    pub fn snapshot(version: i32, block: &ParamBlock) -> Self {
        Self {
            version,
            data: block.as_bytes().to_vec(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/params/block.rs"]
mod tests;

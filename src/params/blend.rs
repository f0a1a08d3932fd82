use crate::foundation::core::MaskId;

/// Version of the persisted blend-parameter record format.
pub const BLEND_VERSION: i32 = 4;

/// Size in bytes of the serialized [`BlendParams`] record.
///
/// The record is a fixed constant size regardless of descriptor, so the
/// stage-hash layout never depends on which operation owns it.
pub const BLEND_PARAMS_SIZE: usize = 24 + 4 * BOUNDARY_LEN;

const BOUNDARY_LEN: usize = 16;

/// How the blend mask is sourced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MaskMode {
    /// Blending disabled, module output is used as-is.
    #[default]
    Disabled = 0,
    /// Uniform mask over the whole region.
    Uniform = 1,
    /// Drawn mask referenced through [`BlendParams::mask_id`].
    Drawn = 2,
}

/// Pixel blend operator applied between module input and output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BlendMode {
    /// Plain mix of input and output by mask opacity.
    #[default]
    Normal = 0,
    /// Multiply input and output.
    Multiply = 1,
    /// Screen input and output.
    Screen = 2,
    /// Per-channel lighten.
    Lighten = 3,
    /// Per-channel darken.
    Darken = 4,
}

/// How multiple mask sources are combined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MaskCombine {
    /// Normalized exclusive combination.
    #[default]
    NormExclusive = 0,
    /// Normalized inclusive combination.
    NormInclusive = 1,
}

/// Blend parameters of one module instance.
///
/// Always present and always the same size, whether or not the descriptor
/// supports blending; descriptors that do not simply never contribute the
/// record to the stage hash.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BlendParams {
    /// Mask source selection.
    pub mask_mode: MaskMode,
    /// Blend operator.
    pub blend_mode: BlendMode,
    /// Mask opacity in percent, 0–100.
    pub opacity: f32,
    /// Mask combination policy.
    pub mask_combine: MaskCombine,
    /// Referenced mask group, [`MaskId::NONE`] when unset.
    pub mask_id: MaskId,
    /// Operator-specific parameter (unused by `Normal`).
    pub blend_parameter: f32,
    /// Mask-definition placeholder region, four `(lo, lo, hi, hi)` spans
    /// per channel group.
    pub boundary: [f32; BOUNDARY_LEN],
}

impl Default for BlendParams {
    fn default() -> Self {
        let mut boundary = [0.0f32; BOUNDARY_LEN];
        for span in boundary.chunks_exact_mut(4) {
            span.copy_from_slice(&[0.0, 0.0, 1.0, 1.0]);
        }
        Self {
            mask_mode: MaskMode::Disabled,
            blend_mode: BlendMode::Normal,
            opacity: 100.0,
            mask_combine: MaskCombine::NormExclusive,
            mask_id: MaskId::NONE,
            blend_parameter: 0.0,
            boundary,
        }
    }
}

impl BlendParams {
    /// Serialize into the fixed [`BLEND_PARAMS_SIZE`]-byte wire layout.
    ///
    /// Field order and width are part of the stage-hash contract and must
    /// not change.
    pub fn to_bytes(&self) -> [u8; BLEND_PARAMS_SIZE] {
        let mut out = [0u8; BLEND_PARAMS_SIZE];
        out[0..4].copy_from_slice(&(self.mask_mode as i32).to_le_bytes());
        out[4..8].copy_from_slice(&(self.blend_mode as i32).to_le_bytes());
        out[8..12].copy_from_slice(&self.opacity.to_le_bytes());
        out[12..16].copy_from_slice(&(self.mask_combine as i32).to_le_bytes());
        out[16..20].copy_from_slice(&self.mask_id.0.to_le_bytes());
        out[20..24].copy_from_slice(&self.blend_parameter.to_le_bytes());
        for (i, v) in self.boundary.iter().enumerate() {
            out[24 + 4 * i..28 + 4 * i].copy_from_slice(&v.to_le_bytes());
        }
        out
    }
}

/// Persisted, versioned blend blob.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BlendBlob {
    /// Blend-format version the record was written with.
    pub version: i32,
    /// The blend record itself.
    pub params: BlendParams,
}

impl BlendBlob {
    /// Snapshot a live record at the current blend version.
    pub fn snapshot(params: &BlendParams) -> Self {
        Self {
            version: BLEND_VERSION,
            params: *params,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/params/blend.rs"]
mod tests;

use crate::foundation::error::{PipeError, PipeResult};

/// Region of interest of a pixel buffer.
///
/// `x`/`y` are the origin of the region in the coordinate space of the full
/// image at `scale`, so the same logical crop can be expressed at every
/// pipeline resolution.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Roi {
    /// Horizontal origin in pixels.
    pub x: i32,
    /// Vertical origin in pixels.
    pub y: i32,
    /// Region width in pixels.
    pub width: usize,
    /// Region height in pixels.
    pub height: usize,
    /// Scale relative to the full-resolution image (1.0 = full size).
    pub scale: f32,
}

impl Roi {
    /// Full-buffer region at scale 1.
    pub fn full(width: usize, height: usize) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
            scale: 1.0,
        }
    }

    /// Number of pixels covered by the region.
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}

/// Axis-aligned pixel rectangle without a scale, used by the byte-buffer
/// resampling fast paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// Horizontal origin in pixels; may be negative before clamping.
    pub x: i32,
    /// Vertical origin in pixels; may be negative before clamping.
    pub y: i32,
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
}

/// One of the 8 dihedral transforms of an image, encoded as 3 independent
/// bits: horizontal flip, vertical flip and transpose.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Orientation(pub u8);

impl Orientation {
    /// Identity transform.
    pub const NONE: Orientation = Orientation(0);
    /// Mirror along the vertical axis.
    pub const FLIP_X: Orientation = Orientation(1);
    /// Mirror along the horizontal axis.
    pub const FLIP_Y: Orientation = Orientation(2);
    /// Swap rows and columns.
    pub const TRANSPOSE: Orientation = Orientation(4);

    /// Return `true` when the horizontal-flip bit is set.
    pub fn flips_x(self) -> bool {
        self.0 & 1 != 0
    }

    /// Return `true` when the vertical-flip bit is set.
    pub fn flips_y(self) -> bool {
        self.0 & 2 != 0
    }

    /// Return `true` when the transpose bit is set.
    pub fn transposes(self) -> bool {
        self.0 & 4 != 0
    }
}

/// Owned 4-channel float image in row-major RGBA order.
///
/// This is the working format of the pipeline: every stage consumes and
/// produces one of these. The 4th channel is carried along untouched by the
/// resampling fast paths.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
    /// Pixel data, `width * height * 4` floats.
    pub data: Vec<f32>,
}

impl PixelBuffer {
    /// Allocate a zeroed buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height * 4],
        }
    }

    /// Build a buffer from existing data, validating the length.
    pub fn from_data(width: usize, height: usize, data: Vec<f32>) -> PipeResult<Self> {
        if data.len() != width * height * 4 {
            return Err(PipeError::validation(
                "PixelBuffer data length must be width * height * 4",
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Immutable view of the pixel at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> &[f32] {
        let idx = 4 * (y * self.width + x);
        &self.data[idx..idx + 4]
    }
}

/// Process-unique id of a live module instance within a session.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct InstanceId(pub u32);

/// Id of an instance group: all duplicates of one base instance share it.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct GroupId(pub u32);

/// Reference to a mask-group entity held by an external mask store.
///
/// Zero is the "no mask" sentinel, matching the persisted blend record.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct MaskId(pub i32);

impl MaskId {
    /// No mask referenced.
    pub const NONE: MaskId = MaskId(0);

    /// Return `true` when a mask is actually referenced.
    pub fn is_some(self) -> bool {
        self.0 > 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

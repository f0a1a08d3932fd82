//! Runtime-selectable interpolation and the general float resampling path.
//!
//! This is the route used throughout the pipeline for arbitrary scale/crop
//! combinations; the fixed-kernel byte paths in the sibling modules are fast
//! approximations for thumbnails and previews only.

use rayon::prelude::*;

use crate::foundation::core::Roi;

/// Interpolation kernel applied by [`clip_and_zoom`].
///
/// Selected at runtime (typically from user preference); all kernels share
/// the same ROI mapping, only the support and weighting differ.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum InterpolationKernel {
    /// Pick the nearest source pixel.
    Nearest,
    /// 2x2 tent-weighted average.
    #[default]
    Bilinear,
    /// 4x4 Keys cubic (a = -0.5).
    Bicubic,
}

impl InterpolationKernel {
    /// Half-width of the kernel support in source pixels.
    fn radius(self) -> i32 {
        match self {
            InterpolationKernel::Nearest | InterpolationKernel::Bilinear => 1,
            InterpolationKernel::Bicubic => 2,
        }
    }

    fn weight(self, t: f32) -> f32 {
        let t = t.abs();
        match self {
            // Inclusive at the half-pixel boundary so an exactly-centered
            // sample keeps nonzero support; normalization splits the tie.
            InterpolationKernel::Nearest => {
                if t <= 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            InterpolationKernel::Bilinear => (1.0 - t).max(0.0),
            InterpolationKernel::Bicubic => {
                const A: f32 = -0.5;
                if t < 1.0 {
                    ((A + 2.0) * t - (A + 3.0)) * t * t + 1.0
                } else if t < 2.0 {
                    ((A * t - 5.0 * A) * t + 8.0 * A) * t - 4.0 * A
                } else {
                    0.0
                }
            }
        }
    }
}

/// Resample a 4-channel float input region onto an output region through
/// the selected kernel.
///
/// Both buffers are described by their ROI plus a row stride in pixels. The
/// mapping honors the regions' origins and scales, so any crop/zoom
/// combination (up or down) goes through here. Output rows are independent
/// and processed in parallel.
pub fn clip_and_zoom(
    out: &mut [f32],
    roi_out: &Roi,
    input: &[f32],
    roi_in: &Roi,
    out_stride: usize,
    in_stride: usize,
    kernel: InterpolationKernel,
) {
    let zoom = roi_out.scale / roi_in.scale;
    let in_w = roi_in.width as i32;
    let in_h = roi_in.height as i32;
    let radius = kernel.radius();

    out.par_chunks_mut(4 * out_stride)
        .take(roi_out.height)
        .enumerate()
        .for_each(|(y, row)| {
            let sy = (y as f32 + roi_out.y as f32 + 0.5) / zoom - roi_in.y as f32 - 0.5;
            for x in 0..roi_out.width {
                let sx = (x as f32 + roi_out.x as f32 + 0.5) / zoom - roi_in.x as f32 - 0.5;
                let cx = sx.floor() as i32;
                let cy = sy.floor() as i32;

                let mut acc = [0.0f32; 4];
                let mut norm = 0.0f32;
                for j in (cy - radius + 1)..=(cy + radius) {
                    let wy = kernel.weight(sy - j as f32);
                    if wy == 0.0 {
                        continue;
                    }
                    let jj = j.clamp(0, in_h - 1) as usize;
                    for i in (cx - radius + 1)..=(cx + radius) {
                        let wx = kernel.weight(sx - i as f32);
                        if wx == 0.0 {
                            continue;
                        }
                        let ii = i.clamp(0, in_w - 1) as usize;
                        let w = wx * wy;
                        let src = &input[4 * (jj * in_stride + ii)..][..4];
                        for (a, s) in acc.iter_mut().zip(src) {
                            *a += w * s;
                        }
                        norm += w;
                    }
                }

                let dst = &mut row[4 * x..4 * x + 4];
                if norm > 0.0 {
                    for (d, a) in dst.iter_mut().zip(acc) {
                        *d = a / norm;
                    }
                } else {
                    dst.fill(0.0);
                }
            }
        });
}

#[cfg(test)]
#[path = "../../tests/unit/resample/interp.rs"]
mod tests;

//! Mosaic-aware half-size downscale of Bayer sensor buffers.
//!
//! Downscales and clips a single-channel mosaiced buffer straight into a
//! 4-channel float buffer at the output ROI's coarser scale, sampling whole
//! 2x2 Bayer blocks so each output pixel blends same-channel sensor values
//! only. Two deliberately distinct paths exist:
//!
//! - the integer path guards against blending clipped highlights into
//!   non-clipped neighbors (which would produce false color fringing), at
//!   the cost of block-granular sampling;
//! - the float path blends across block boundaries with bilinear weights
//!   for smoother results and does *not* special-case highlight clipping.

use rayon::prelude::*;

use crate::foundation::core::Roi;

/// Sensor values at or above this fraction of the 16-bit range count as
/// clipped for the highlight-consistency guard.
const SATURATION: u16 = 60000;

/// Packed 2x2 Bayer color-filter layout.
///
/// Each 2-bit field of the word encodes the channel (0 red, 1/3 green,
/// 2 blue) at one position of the repeating pattern, indexed by row/column
/// parity; the encoding matches the dcraw `filters` convention so camera
/// metadata can be passed through unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BayerPattern(pub u32);

impl BayerPattern {
    /// Red in the top-left position.
    pub const RGGB: BayerPattern = BayerPattern(0x9494_9494);
    /// Blue in the top-left position.
    pub const BGGR: BayerPattern = BayerPattern(0x1616_1616);
    /// Green-red on the first row.
    pub const GRBG: BayerPattern = BayerPattern(0x6161_6161);
    /// Green-blue on the first row.
    pub const GBRG: BayerPattern = BayerPattern(0x4949_4949);

    /// Channel index at `(row, col)`: 0 red, 1 green, 2 blue, 3 second
    /// green.
    pub fn color_at(self, row: i32, col: i32) -> u32 {
        (self.0 >> ((((row << 1) & 14) + (col & 1)) << 1)) & 3
    }

    /// Offset of the nearest RGGB-phased 2x2 block origin.
    ///
    /// Sampling must align to the pattern's own repeat phase, not arbitrary
    /// pixel boundaries; crossing a phase boundary double-counts channels.
    fn rggb_offset(self) -> (i32, i32) {
        let mut x = 0;
        let mut y = 0;
        if self.color_at(y, x + 1) != 1 {
            x += 1;
        }
        if self.color_at(y, x) != 0 {
            x = (x + 1) & 1;
            y += 1;
        }
        (x, y)
    }
}

/// Half-size demosaic downscale of 16-bit sensor data, with the highlight
/// consistency guard.
///
/// `input` covers `roi_in` with `in_stride` pixels per row; `out` receives
/// `roi_out.width x roi_out.height` RGBA float pixels (alpha zero) with
/// `out_stride` pixels per row, scaled to `[0, 1]`. A candidate 2x2 block is
/// excluded from an output pixel's sum when exactly one of the center block
/// and the candidate is at saturation. Output rows are independent and run
/// in parallel.
pub fn demosaic_half_size(
    out: &mut [f32],
    roi_out: &Roi,
    input: &[u16],
    roi_in: &Roi,
    out_stride: usize,
    in_stride: usize,
    pattern: BayerPattern,
) {
    debug_assert!(roi_in.width >= 8 && roi_in.height >= 8);

    // Pixel footprint on the input buffer and how many whole 2x2 blocks fit
    // inside it.
    let px_footprint = 1.0 / roi_out.scale;
    let samples = (px_footprint / 2.0).round() as i32;
    let (rggbx, rggby) = pattern.rggb_offset();

    let in_w = roi_in.width as i32;
    let in_h = roi_in.height as i32;
    let stride = in_stride as i32;

    out.par_chunks_mut(4 * out_stride)
        .take(roi_out.height)
        .enumerate()
        .for_each(|(y, out_row)| {
            let fy = (y as i32 + roi_out.y) as f32 * px_footprint;
            let py = ((fy as i32) & !1).min((in_h - 4) & !1) + rggby;
            let maxj = (((in_h - 3) & !1) + rggby).min(py + 2 * samples);

            for x in 0..roi_out.width {
                let fx = (x as i32 + roi_out.x) as f32 * px_footprint;
                let px = ((fx as i32) & !1).min((in_w - 4) & !1) + rggbx;
                let maxi = (((in_w - 3) & !1) + rggbx).min(px + 2 * samples);

                let at = |i: i32, j: i32| input[(i + stride * j) as usize];
                let block_max = |i: i32, j: i32| {
                    at(i, j)
                        .max(at(i + 1, j))
                        .max(at(i, j + 1))
                        .max(at(i + 1, j + 1))
                };
                let center_clipped = block_max(px, py) >= SATURATION;

                let mut sum = [0u32; 3];
                let mut num = 0u32;
                let mut j = py;
                while j <= maxj {
                    let mut i = px;
                    while i <= maxi {
                        if (block_max(i, j) >= SATURATION) == center_clipped {
                            sum[0] += u32::from(at(i, j));
                            sum[1] += u32::from(at(i + 1, j)) + u32::from(at(i, j + 1));
                            sum[2] += u32::from(at(i + 1, j + 1));
                            num += 1;
                        }
                        i += 2;
                    }
                    j += 2;
                }

                let norm = 1.0 / (65535.0 * num as f32);
                let dst = &mut out_row[4 * x..4 * x + 4];
                dst[0] = sum[0] as f32 * norm;
                dst[1] = sum[1] as f32 * 0.5 * norm;
                dst[2] = sum[2] as f32 * norm;
                dst[3] = 0.0;
            }
        });
}

/// Half-size demosaic downscale of float sensor data, with bilinear
/// weighting across block boundaries and no highlight guard.
///
/// The sub-block offset fractions `dx`/`dy` weight the corner, edge and
/// interior blocks of the sampling footprint, yielding smoother gradients
/// than the guarded integer path; clipped highlights blend like any other
/// value. Values stay in the sensor's native linear range.
pub fn demosaic_half_size_f32(
    out: &mut [f32],
    roi_out: &Roi,
    input: &[f32],
    roi_in: &Roi,
    out_stride: usize,
    in_stride: usize,
    pattern: BayerPattern,
) {
    debug_assert!(roi_in.width >= 10 && roi_in.height >= 10);

    let px_footprint = 1.0 / roi_out.scale;
    let samples = (px_footprint / 2.0).round() as i32;
    let (rggbx, rggby) = pattern.rggb_offset();

    let in_w = roi_in.width as i32;
    let in_h = roi_in.height as i32;
    let stride = in_stride as i32;

    out.par_chunks_mut(4 * out_stride)
        .take(roi_out.height)
        .enumerate()
        .for_each(|(y, out_row)| {
            let fy = (y as i32 + roi_out.y) as f32 * px_footprint;
            let py0 = (fy as i32) & !1;
            let dy = (fy - py0 as f32) / 2.0;
            let py = py0.min((in_h - 6) & !1) + rggby;
            let maxj = (((in_h - 5) & !1) + rggby).min(py + 2 * samples);

            for x in 0..roi_out.width {
                let fx = (x as i32 + roi_out.x) as f32 * px_footprint;
                let px0 = (fx as i32) & !1;
                let dx = (fx - px0 as f32) / 2.0;
                let px = px0.min((in_w - 6) & !1) + rggbx;
                let maxi = (((in_w - 5) & !1) + rggbx).min(px + 2 * samples);

                let at = |i: i32, j: i32| input[(i + stride * j) as usize];
                // One 2x2 block folded to (r, g1+g2, b).
                let block = |i: i32, j: i32| {
                    [
                        at(i, j),
                        at(i + 1, j) + at(i, j + 1),
                        at(i + 1, j + 1),
                    ]
                };

                let mut col = [0.0f32; 3];
                let mut add = |w: f32, p: [f32; 3]| {
                    col[0] += w * p[0];
                    col[1] += w * p[1];
                    col[2] += w * p[2];
                };

                // Upper-left corner of the sampling region.
                add((1.0 - dx) * (1.0 - dy), block(px, py));

                // Left and upper borders.
                let mut j = py + 2;
                while j <= maxj {
                    add(1.0 - dx, block(px, j));
                    j += 2;
                }
                let mut i = px + 2;
                while i <= maxi {
                    add(1.0 - dy, block(i, py));
                    i += 2;
                }

                // Interior blocks.
                let mut j = py + 2;
                while j <= maxj {
                    let mut i = px + 2;
                    while i <= maxi {
                        add(1.0, block(i, j));
                        i += 2;
                    }
                    j += 2;
                }

                let full_i = maxi == px + 2 * samples;
                let full_j = maxj == py + 2 * samples;
                let num = if full_i && full_j {
                    // Right and lower borders plus the three far corners.
                    let mut j = py + 2;
                    while j <= maxj {
                        add(dx, block(maxi + 2, j));
                        j += 2;
                    }
                    add(dx * (1.0 - dy), block(maxi + 2, py));
                    let mut i = px + 2;
                    while i <= maxi {
                        add(dy, block(i, maxj + 2));
                        i += 2;
                    }
                    add((1.0 - dx) * dy, block(px, maxj + 2));
                    add(dx * dy, block(maxi + 2, maxj + 2));
                    ((samples + 1) * (samples + 1)) as f32
                } else if full_i {
                    let mut j = py + 2;
                    while j <= maxj {
                        add(dx, block(maxi + 2, j));
                        j += 2;
                    }
                    add(dx * (1.0 - dy), block(maxi + 2, py));
                    (((maxj - py) / 2 + 1) as f32 - dy) * (samples + 1) as f32
                } else if full_j {
                    let mut i = px + 2;
                    while i <= maxi {
                        add(dy, block(i, maxj + 2));
                        i += 2;
                    }
                    add((1.0 - dx) * dy, block(px, maxj + 2));
                    (((maxi - px) / 2 + 1) as f32 - dx) * (samples + 1) as f32
                } else {
                    (((maxi - px) / 2 + 1) as f32 - dx) * (((maxj - py) / 2 + 1) as f32 - dy)
                };

                let norm = 1.0 / num;
                let dst = &mut out_row[4 * x..4 * x + 4];
                dst[0] = col[0] * norm;
                dst[1] = col[1] * 0.5 * norm;
                dst[2] = col[2] * norm;
                dst[3] = 0.0;
            }
        });
}

#[cfg(test)]
#[path = "../../tests/unit/resample/demosaic.rs"]
mod tests;

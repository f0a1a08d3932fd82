use rayon::prelude::*;

use crate::foundation::core::Orientation;

/// Apply one of the 8 dihedral transforms while downscaling a 4-channel
/// byte image to fit the requested output size.
///
/// A single isotropic scale factor is chosen so the (possibly transposed)
/// source fits both output axes without upsampling; the axis with excess is
/// cropped. Returns the dimensions actually emitted, which are at most
/// `(out_w, out_h)` and are produced tightly packed in `output` with a row
/// stride equal to the returned width.
///
/// Sampling uses the same 2x2-box blend as the byte clip/zoom path, but
/// addresses source pixels through orientation-dependent strides computed
/// once from the orientation bits, so flipped and transposed reads cost the
/// same as upright ones.
pub fn flip_and_zoom_u8(
    input: &[u8],
    in_w: usize,
    in_h: usize,
    output: &mut [u8],
    out_w: usize,
    out_h: usize,
    orientation: Orientation,
) -> (usize, usize) {
    const BPP: usize = 4;
    debug_assert!(input.len() >= in_w * in_h * BPP);
    debug_assert!(output.len() >= out_w * out_h * BPP);

    // Transposed source extents drive the scale choice.
    let (iwd, iht) = if orientation.transposes() {
        (in_h, in_w)
    } else {
        (in_w, in_h)
    };
    let scale = (iwd as f32 / out_w as f32).max(iht as f32 / out_h as f32);
    let wd = out_w.min((iwd as f32 / scale) as usize);
    let ht = out_h.min((iht as f32 / scale) as usize);
    if wd == 0 || ht == 0 {
        return (wd, ht);
    }

    // Origin and per-axis strides, in pixels, for the oriented walk.
    let mut ii: isize = 0;
    let mut jj: isize = 0;
    let mut si: isize = 1;
    let mut sj: isize = in_w as isize;
    if orientation.flips_y() {
        jj = in_h as isize - 1;
        sj = -sj;
    }
    if orientation.flips_x() {
        ii = in_w as isize - 1;
        si = -si;
    }
    if orientation.transposes() {
        std::mem::swap(&mut si, &mut sj);
    }

    let half_pixel = (0.5 * scale) as isize;
    let bpp = BPP as isize;
    let off_lo = half_pixel * bpp * 0.min(si).min(sj.min(si + sj));
    let off_hi = half_pixel * bpp * 0.max(si).max(sj.max(si + sj));
    let in_len = (in_w * in_h * BPP) as isize;

    output
        .par_chunks_mut(BPP * wd)
        .take(ht)
        .enumerate()
        .for_each(|(j, out_row)| {
            let row_base = bpp * (in_w as isize * jj + ii + sj * (scale * j as f32) as isize);
            let mut step_i = 0.0f32;
            for i in 0..wd {
                let p = row_base + (step_i as isize) * si * bpp;
                // wd/ht are rounded down, so p stays in bounds; the guard
                // covers the half-pixel offsets at flipped borders.
                if p + off_lo >= 0 && p + off_hi < in_len {
                    for k in 0..3 {
                        let sum = u32::from(input[(p + bpp * half_pixel * sj) as usize + k])
                            + u32::from(input[(p + bpp * half_pixel * (si + sj)) as usize + k])
                            + u32::from(input[(p + bpp * half_pixel * si) as usize + k])
                            + u32::from(input[p as usize + k]);
                        out_row[BPP * i + k] = (sum / 4) as u8;
                    }
                }
                step_i += scale;
            }
        });

    (wd, ht)
}

#[cfg(test)]
#[path = "../../tests/unit/resample/flip.rs"]
mod tests;

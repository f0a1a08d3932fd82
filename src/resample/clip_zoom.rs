use crate::foundation::core::Rect;

/// Map a sub-rectangle of a 4-channel byte image onto a destination
/// rectangle of different size using a fixed 2x2-box downsample.
///
/// `src`/`dst` select the regions inside buffers of `src_dims`/`dst_dims`
/// (width, height) pixels. Each output pixel averages 4 samples taken at
/// half-scale offsets; the RGB channels are averaged, the 4th channel is
/// left untouched. Output dimensions are clamped so sampling never reads
/// outside the source: a partial last row/column is silently truncated
/// rather than reported.
///
/// This path is a downscale-only approximation (scale factors ≳ 2);
/// behavior when upsampling is unspecified. Use the float
/// [`clip_and_zoom`](crate::resample::interp::clip_and_zoom) path for
/// arbitrary scales.
pub fn clip_and_zoom_u8(
    input: &[u8],
    src: Rect,
    src_dims: (usize, usize),
    output: &mut [u8],
    dst: Rect,
    dst_dims: (usize, usize),
) {
    let (ibw, ibh) = src_dims;
    let (obw, obh) = dst_dims;
    debug_assert!(input.len() >= ibw * ibh * 4);
    debug_assert!(output.len() >= obw * obh * 4);

    let scale_x = src.width as f32 / dst.width as f32;
    let scale_y = src.height as f32 / dst.height as f32;
    debug_assert!(scale_x >= 1.0 && scale_y >= 1.0, "box path is downscale-only");

    let ix2 = src.x.max(0);
    let iy2 = src.y.max(0);
    let ox2 = dst.x.max(0) as usize;
    let oy2 = dst.y.max(0) as usize;
    let oh2 = (dst.height)
        .min(((ibh as f32 - iy2 as f32) / scale_y) as usize)
        .min(obh - oy2);
    let ow2 = (dst.width)
        .min(((ibw as f32 - ix2 as f32) / scale_x) as usize)
        .min(obw - ox2);

    let mut y = iy2 as f32;
    for s in 0..oh2 {
        let mut x = ix2 as f32;
        let mut idx = ox2 + obw * (oy2 + s);
        for _ in 0..ow2 {
            let x0 = x as usize;
            let x1 = (x + 0.5 * scale_x) as usize;
            let y0 = y as usize;
            let y1 = (y + 0.5 * scale_y) as usize;
            for k in 0..3 {
                let sum = u32::from(input[4 * (ibw * y0 + x1) + k])
                    + u32::from(input[4 * (ibw * y1 + x1) + k])
                    + u32::from(input[4 * (ibw * y1 + x0) + k])
                    + u32::from(input[4 * (ibw * y0 + x0) + k]);
                output[4 * idx + k] = (sum / 4) as u8;
            }
            x += scale_x;
            idx += 1;
        }
        y += scale_y;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resample/clip_zoom.rs"]
mod tests;

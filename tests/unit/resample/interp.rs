use super::*;

fn flat(width: usize, height: usize, rgba: [f32; 4]) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height * 4);
    for _ in 0..width * height {
        data.extend_from_slice(&rgba);
    }
    data
}

#[test]
fn flat_color_survives_down_and_up_scaling() {
    let color = [0.25f32, 0.5, 0.75, 1.0];
    let src = flat(16, 16, color);
    let roi_src = Roi::full(16, 16);

    for kernel in [
        InterpolationKernel::Nearest,
        InterpolationKernel::Bilinear,
        InterpolationKernel::Bicubic,
    ] {
        let mut small = vec![0.0f32; 4 * 4 * 4];
        let roi_small = Roi {
            x: 0,
            y: 0,
            width: 4,
            height: 4,
            scale: 0.25,
        };
        clip_and_zoom(&mut small, &roi_small, &src, &roi_src, 4, 16, kernel);

        let mut back = vec![0.0f32; 16 * 16 * 4];
        clip_and_zoom(&mut back, &roi_src, &small, &roi_small, 16, 4, kernel);

        for px in back.chunks_exact(4) {
            for (got, want) in px.iter().zip(color) {
                assert!(
                    (got - want).abs() < 1e-6,
                    "{kernel:?} must be lossless on flat input"
                );
            }
        }
    }
}

#[test]
fn same_scale_nearest_is_identity() {
    let mut src = vec![0.0f32; 4 * 4 * 4];
    for (i, v) in src.iter_mut().enumerate() {
        *v = i as f32;
    }
    let roi = Roi::full(4, 4);
    let mut out = vec![0.0f32; 4 * 4 * 4];
    clip_and_zoom(&mut out, &roi, &src, &roi, 4, 4, InterpolationKernel::Nearest);
    assert_eq!(out, src);
}

#[test]
fn bilinear_downscale_averages_neighbors() {
    // Two-value columns: 0 and 1 alternating; a 2x downscale samples the
    // midpoint between them.
    let mut src = vec![0.0f32; 4 * 1 * 4];
    for x in 0..4 {
        let v = (x % 2) as f32;
        for c in 0..4 {
            src[4 * x + c] = v;
        }
    }
    let roi_in = Roi::full(4, 1);
    let roi_out = Roi {
        x: 0,
        y: 0,
        width: 2,
        height: 1,
        scale: 0.5,
    };
    let mut out = vec![0.0f32; 2 * 1 * 4];
    clip_and_zoom(&mut out, &roi_out, &src, &roi_in, 2, 4, InterpolationKernel::Bilinear);
    // Interior sample lands between a 0 and a 1 column.
    assert!((out[0] - 0.5).abs() < 1e-6);
    // The last sample's right tap clamps to the border column.
    assert!((out[4] - 1.0).abs() < 1e-6);
}

#[test]
fn cropped_region_maps_to_origin() {
    // A 2x2 crop at (2, 2) of a gradient, emitted 1:1.
    let mut src = vec![0.0f32; 8 * 8 * 4];
    for y in 0..8 {
        for x in 0..8 {
            src[4 * (y * 8 + x)] = (y * 8 + x) as f32;
        }
    }
    let roi_in = Roi::full(8, 8);
    let roi_out = Roi {
        x: 2,
        y: 2,
        width: 2,
        height: 2,
        scale: 1.0,
    };
    let mut out = vec![0.0f32; 2 * 2 * 4];
    clip_and_zoom(&mut out, &roi_out, &src, &roi_in, 2, 8, InterpolationKernel::Nearest);
    assert_eq!(out[0], (2 * 8 + 2) as f32);
    assert_eq!(out[4 * 3], (3 * 8 + 3) as f32);
}

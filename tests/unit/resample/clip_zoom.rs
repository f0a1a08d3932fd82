use super::*;

fn flat(width: usize, height: usize, rgb: [u8; 3], alpha: u8) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height * 4);
    for _ in 0..width * height {
        data.extend_from_slice(&[rgb[0], rgb[1], rgb[2], alpha]);
    }
    data
}

#[test]
fn flat_color_is_preserved_by_box_downsample() {
    let src = flat(8, 8, [10, 120, 250], 0);
    let mut dst = vec![0u8; 4 * 4 * 4];
    clip_and_zoom_u8(
        &src,
        Rect {
            x: 0,
            y: 0,
            width: 8,
            height: 8,
        },
        (8, 8),
        &mut dst,
        Rect {
            x: 0,
            y: 0,
            width: 4,
            height: 4,
        },
        (4, 4),
    );
    for px in dst.chunks_exact(4) {
        assert_eq!(&px[0..3], &[10, 120, 250]);
    }
}

#[test]
fn two_by_two_blocks_are_averaged() {
    // 4x4 source of distinct 2x2 blocks; a 2x downscale picks each block's
    // average exactly (samples land at offsets 0 and 1).
    let mut src = vec![0u8; 4 * 4 * 4];
    for y in 0..4 {
        for x in 0..4 {
            let v = (40 * (y / 2 * 2 + x / 2)) as u8 + (x % 2 + y % 2) as u8 * 2;
            src[4 * (y * 4 + x)] = v;
        }
    }
    let mut dst = vec![0u8; 2 * 2 * 4];
    clip_and_zoom_u8(
        &src,
        Rect {
            x: 0,
            y: 0,
            width: 4,
            height: 4,
        },
        (4, 4),
        &mut dst,
        Rect {
            x: 0,
            y: 0,
            width: 2,
            height: 2,
        },
        (2, 2),
    );
    for (b, px) in dst.chunks_exact(4).enumerate() {
        let base = 40 * b as u32;
        let want = ((base + base + 2 + base + 2 + base + 4) / 4) as u8;
        assert_eq!(px[0], want, "block {b}");
    }
}

#[test]
fn fourth_channel_is_untouched() {
    let src = flat(8, 8, [50, 50, 50], 200);
    let mut dst = vec![0u8; 4 * 4 * 4];
    for px in dst.chunks_exact_mut(4) {
        px[3] = 77;
    }
    clip_and_zoom_u8(
        &src,
        Rect {
            x: 0,
            y: 0,
            width: 8,
            height: 8,
        },
        (8, 8),
        &mut dst,
        Rect {
            x: 0,
            y: 0,
            width: 4,
            height: 4,
        },
        (4, 4),
    );
    for px in dst.chunks_exact(4) {
        assert_eq!(px[3], 77);
    }
}

#[test]
fn output_is_clamped_to_available_source() {
    // The source rect extends past the buffer; the partial tail is silently
    // truncated instead of read out of bounds.
    let src = flat(8, 8, [99, 99, 99], 0);
    let mut dst = vec![0u8; 8 * 8 * 4];
    clip_and_zoom_u8(
        &src,
        Rect {
            x: 4,
            y: 4,
            width: 8,
            height: 8,
        },
        (8, 8),
        &mut dst,
        Rect {
            x: 0,
            y: 0,
            width: 4,
            height: 4,
        },
        (8, 8),
    );
    // Only the 2x2 area backed by source pixels was written.
    assert_eq!(dst[0], 99);
    assert_eq!(dst[4 * (8 + 1)], 99);
    assert_eq!(dst[4 * 2], 0);
    assert_eq!(dst[4 * (8 * 2)], 0);
}

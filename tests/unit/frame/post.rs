use std::collections::BTreeSet;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::*;

fn canvas(w: u32, h: u32) -> Canvas {
    Canvas::new(w, h).unwrap()
}

fn gradient(w: u32, h: u32) -> Raster {
    let mut r = Raster::new(canvas(w, h));
    for y in 0..h {
        for x in 0..w {
            r.set_pixel(x, y, [(x * 17) as u8, (y * 29) as u8, ((x + y) * 7) as u8, 255]);
        }
    }
    r
}

#[test]
fn block_one_same_size_is_identity() {
    let src = gradient(8, 6);
    let out = pixelate(&src, src.canvas(), 1, None);
    assert_eq!(out, src);
}

#[test]
fn process_with_defaults_is_identity() {
    let src = gradient(5, 5);
    let post = PostProcessor::new(src.canvas(), 18).unwrap();
    assert_eq!(post.process(&src, &FrameParams::default()), src);
}

#[test]
fn upsample_replicates_each_pixel() {
    let src = gradient(2, 2);
    let out = pixelate(&src, canvas(4, 6), 1, None);
    for y in 0..6 {
        for x in 0..4 {
            assert_eq!(out.pixel(x, y), src.pixel(x / 2, y / 3));
        }
    }
}

#[test]
fn block_two_samples_top_left_of_each_block() {
    let src = gradient(4, 4);
    let out = pixelate(&src, src.canvas(), 2, None);
    for y in 0..4 {
        for x in 0..4 {
            assert_eq!(out.pixel(x, y), src.pixel(x / 2 * 2, y / 2 * 2));
        }
    }
}

#[test]
fn ceil_scale_is_clipped_at_display_edge() {
    let src = gradient(3, 3);
    // ceil(7 / 3) = 3, so the last column of blocks overhangs by two pixels.
    let out = pixelate(&src, canvas(7, 7), 1, None);
    assert_eq!(out.canvas(), canvas(7, 7));
    assert_eq!(out.pixel(6, 6), src.pixel(2, 2));
    assert_eq!(out.pixel(5, 0), src.pixel(1, 0));
}

#[test]
fn alpha_override_applies_uniformly() {
    let src = gradient(3, 3);
    let out = pixelate(&src, src.canvas(), 1, Some(80));
    assert!(out.pixels().all(|px| px[3] == 80));
    assert_eq!(&out.pixel(1, 2)[..3], &src.pixel(1, 2)[..3]);
}

#[test]
fn pixelate_zero_block_is_clamped() {
    let src = gradient(4, 4);
    let post = PostProcessor::new(src.canvas(), 18).unwrap();
    assert_eq!(post.clamp_pixelate(0), 1);
    assert_eq!(post.clamp_pixelate(40), 18);
    let params = FrameParams {
        pixelate: 0,
        ..FrameParams::default()
    };
    assert_eq!(post.process(&src, &params), src);
}

#[test]
fn post_processor_rejects_zero_max() {
    assert!(PostProcessor::new(canvas(4, 4), 0).is_err());
}

#[test]
fn posterize_channel_endpoints_survive() {
    for k in 2..=15 {
        assert_eq!(posterize_channel(0, k), 0);
        assert_eq!(posterize_channel(255, k), 255);
    }
}

#[test]
fn posterize_two_levels_is_threshold() {
    assert_eq!(posterize_channel(127, 2), 0);
    assert_eq!(posterize_channel(128, 2), 255);
}

#[test]
fn posterize_produces_exactly_k_levels() {
    for k in [2u32, 3, 4, 7, 15] {
        let distinct = (0..=255u8)
            .map(|v| posterize_channel(v, k))
            .collect::<BTreeSet<_>>();
        assert_eq!(distinct.len(), k as usize, "k={k}");
        assert!(distinct.contains(&0));
        assert!(distinct.contains(&255));
    }
}

#[test]
fn posterize_leaves_alpha() {
    let mut r = Raster::filled(canvas(2, 2), [100, 150, 200, 33]);
    posterize_in_place(&mut r, 2);
    assert!(r.pixels().all(|px| px == [0, 255, 255, 33]));
}

#[test]
fn speckle_extremes() {
    let mut rng = Pcg32::seed_from_u64(4);
    let mut none = Raster::new(canvas(8, 8));
    speckle_in_place(&mut none, &mut rng, 0.0, [255, 0, 0, 255]);
    assert!(none.as_bytes().iter().all(|&b| b == 0));

    let mut all = Raster::new(canvas(8, 8));
    speckle_in_place(&mut all, &mut rng, 1.0, [255, 0, 0, 255]);
    assert!(all.pixels().all(|px| px == [255, 0, 0, 255]));
}

#[test]
fn speckle_half_hits_some_but_not_all() {
    let mut rng = Pcg32::seed_from_u64(8);
    let mut r = Raster::new(canvas(32, 32));
    speckle_in_place(&mut r, &mut rng, 0.5, [255, 0, 0, 255]);
    let hit = r.pixels().filter(|px| px[3] == 255).count();
    assert!(hit > 300 && hit < 724, "hit={hit}");
}

#[test]
fn shrink_keeps_nearest_colors() {
    let src = Raster::filled(canvas(40, 40), [9, 8, 7, 255]);
    let small = shrink(&src, canvas(10, 10)).unwrap();
    assert_eq!(small.canvas(), canvas(10, 10));
    assert!(small.pixels().all(|px| px == [9, 8, 7, 255]));
}

#[test]
fn place_offsets_and_clips() {
    let src = Raster::filled(canvas(4, 4), [1, 2, 3, 255]);
    let out = place(&src, canvas(6, 6), 3, -1);
    assert_eq!(out.canvas(), canvas(6, 6));
    assert_eq!(out.pixel(3, 0), [1, 2, 3, 255]);
    assert_eq!(out.pixel(5, 2), [1, 2, 3, 255]);
    assert_eq!(out.pixel(2, 0), [0, 0, 0, 0]);
    assert_eq!(out.pixel(3, 3), [0, 0, 0, 0]);
    let opaque = out.pixels().filter(|px| px[3] == 255).count();
    assert_eq!(opaque, 3 * 3);
}

#[test]
fn place_fully_offscreen_is_blank() {
    let src = Raster::filled(canvas(4, 4), [1, 2, 3, 255]);
    let out = place(&src, canvas(6, 6), -10, 50);
    assert!(out.pixels().all(|px| px == [0, 0, 0, 0]));
}

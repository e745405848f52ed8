use inkwash::{
    Fps, FrameRGBA, PAPER_RGBA, PointerEvent, Stage, StageSpec, Viewport, fingerprint_frame,
};

fn spec(seed: u64, pointer_hover: bool) -> StageSpec {
    StageSpec {
        viewport: Viewport {
            width: 320.0,
            height: 240.0,
            dpr: 1.0,
        },
        fps: Fps { num: 60, den: 1 },
        seed,
        background_rgba: PAPER_RGBA,
        pointer_hover,
        deck: Default::default(),
        deck_items: vec!["a".into(), "b".into(), "c".into()],
    }
}

fn rgb_sum(frame: &FrameRGBA) -> u64 {
    frame
        .data
        .chunks_exact(4)
        .map(|px| u64::from(px[0]) + u64::from(px[1]) + u64::from(px[2]))
        .sum()
}

#[test]
fn render_is_deterministic_and_draws_the_grove() {
    let mut stage = Stage::new(spec(7, true)).unwrap();
    stage.tick_frame();
    stage.tick_frame();

    let a = stage.render_frame().unwrap();
    let b = stage.render_frame().unwrap();

    assert_eq!(a.width, 320);
    assert_eq!(a.height, 240);
    assert!(a.premultiplied);
    assert_eq!(fingerprint_frame(&a), fingerprint_frame(&b));

    // Some pixels must depart from the paper clear color.
    let paper = [253u8, 251, 247, 255];
    assert!(a.data.chunks_exact(4).any(|px| px != paper));
}

#[test]
fn equal_seeds_render_identical_frames() {
    let mut left = Stage::new(spec(21, true)).unwrap();
    let mut right = Stage::new(spec(21, true)).unwrap();
    for _ in 0..3 {
        left.tick_frame();
        right.tick_frame();
    }
    let a = left.render_frame().unwrap();
    let b = right.render_frame().unwrap();
    assert_eq!(fingerprint_frame(&a), fingerprint_frame(&b));
}

#[test]
fn different_seeds_render_different_frames() {
    let mut left = Stage::new(spec(7, true)).unwrap();
    let mut right = Stage::new(spec(8, true)).unwrap();
    left.tick_frame();
    right.tick_frame();
    let a = left.render_frame().unwrap();
    let b = right.render_frame().unwrap();
    assert_ne!(fingerprint_frame(&a), fingerprint_frame(&b));
}

#[test]
fn sway_moves_the_grove_between_frames() {
    let mut stage = Stage::new(spec(7, true)).unwrap();
    stage.tick_frame();
    let early = stage.render_frame().unwrap();
    // Half a second of sway shifts stalk tips by visible fractions of a pixel.
    for _ in 0..30 {
        stage.tick_frame();
    }
    let late = stage.render_frame().unwrap();
    assert_ne!(fingerprint_frame(&early), fingerprint_frame(&late));
}

#[test]
fn pointer_trail_multiplies_the_frame_darker() {
    let mut inked = Stage::new(spec(7, true)).unwrap();
    let mut bare = Stage::new(spec(7, false)).unwrap();

    for stage in [&mut inked, &mut bare] {
        for step in 0..4u64 {
            let x = 60.0 + 40.0 * step as f64;
            stage.push_event(PointerEvent::moved(x, 80.0, step as f64 * 16.0));
            stage.tick_frame();
        }
    }

    let with_trail = inked.render_frame().unwrap();
    let without = bare.render_frame().unwrap();

    // Multiply blending can only darken covered pixels.
    assert!(rgb_sum(&with_trail) < rgb_sum(&without));
}

#[test]
fn hoverless_stage_matches_an_untouched_one() {
    let mut touched = Stage::new(spec(5, false)).unwrap();
    let mut untouched = Stage::new(spec(5, false)).unwrap();

    touched.push_event(PointerEvent::moved(100.0, 100.0, 0.0));
    touched.push_event(PointerEvent::moved(140.0, 110.0, 16.0));
    touched.tick_frame();
    untouched.tick_frame();

    let a = touched.render_frame().unwrap();
    let b = untouched.render_frame().unwrap();
    assert_eq!(fingerprint_frame(&a), fingerprint_frame(&b));
}

#[test]
fn resize_rescales_population_and_frame() {
    let mut stage = Stage::new(spec(3, true)).unwrap();
    assert_eq!(stage.grove().stalks().len(), 3);

    stage
        .resize(Viewport {
            width: 640.0,
            height: 240.0,
            dpr: 1.0,
        })
        .unwrap();
    assert_eq!(stage.grove().stalks().len(), 6);

    stage.tick_frame();
    let frame = stage.render_frame().unwrap();
    assert_eq!((frame.width, frame.height), (640, 240));
    assert_eq!(frame.data.len(), 640 * 240 * 4);
}

#[test]
fn device_pixel_ratio_scales_the_readback() {
    let mut s = spec(7, true);
    s.viewport.dpr = 2.0;
    let mut stage = Stage::new(s).unwrap();
    stage.tick_frame();
    let frame = stage.render_frame().unwrap();
    assert_eq!((frame.width, frame.height), (640, 480));
}

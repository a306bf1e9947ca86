use super::*;

fn close(a: (f32, f32), b: (f32, f32)) -> bool {
    (a.0 - b.0).abs() < 1e-4 && (a.1 - b.1).abs() < 1e-4
}

#[test]
fn starts_at_rest() {
    let d = ImageDrift::new(DriftConfig::default());
    assert_eq!(d.position(), (0.0, 0.0));
    assert_eq!(d.velocity(), (0.0, 0.0));
    assert_eq!(d.offset(), (0, 0));
}

#[test]
fn pointer_on_image_exerts_no_pull() {
    let mut d = ImageDrift::new(DriftConfig::default());
    for _ in 0..10 {
        assert_eq!(d.update((0.0, 0.0)), (0.0, 0.0));
    }
    assert_eq!(d.velocity(), (0.0, 0.0));
}

#[test]
fn pull_lands_in_velocity_before_position() {
    let mut d = ImageDrift::new(DriftConfig::default());
    assert_eq!(d.update((100.0, 0.0)), (0.0, 0.0));
    assert!(close(d.velocity(), (0.95, 0.0)));
    assert!(close(d.update((100.0, 0.0)), (0.95, 0.0)));
    assert!(close(d.velocity(), (1.8525, 0.0)));
    assert!(close(d.update((100.0, 0.0)), (2.8025, 0.0)));
    assert_eq!(d.offset(), (2, 0));
}

#[test]
fn velocity_decays_by_damping_without_pull() {
    let mut d = ImageDrift::new(DriftConfig::default());
    d.update((0.0, 100.0));
    assert!(close(d.velocity(), (0.0, 0.95)));

    // Chase the image with the pointer so there is no pull.
    let mut expected = 0.95f32;
    for _ in 0..5 {
        let here = d.position();
        d.update(here);
        expected *= 0.95;
        assert!(close(d.velocity(), (0.0, expected)), "{:?}", d.velocity());
    }
}

#[test]
fn speed_stays_below_terminal_velocity() {
    let mut d = ImageDrift::new(DriftConfig::default());
    let terminal = 0.95 / (1.0 - 0.95);
    for _ in 0..2_000 {
        d.update((300.0, 200.0));
        let (vx, vy) = d.velocity();
        assert!(vx.hypot(vy) <= terminal + 1e-3);
    }
}

#[test]
fn damping_is_clamped() {
    let mut d = ImageDrift::new(DriftConfig { damping: 3.0 });
    d.update((10.0, 0.0));
    assert!(close(d.velocity(), (1.0, 0.0)));
}

use std::io::Write as _;

use super::*;
use crate::playback::modulation::OscillatorDrive;

#[test]
fn defaults_match_the_final_sketch() {
    let cfg = SketchConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.anchors, 2);
    assert_eq!(cfg.step_frequency, 0.5);
    assert_eq!(cfg.image, Canvas::new(128, 128).unwrap());
    assert_eq!(cfg.display, Canvas::new(755, 720).unwrap());
    assert_eq!(cfg.pixelate_max, 18);
    assert_eq!(cfg.drive, Drive::Oscillator(OscillatorDrive::default()));
    assert_eq!(cfg.planned_waypoints().unwrap(), 6);
}

#[test]
fn empty_json_is_all_defaults() {
    let cfg: SketchConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg, SketchConfig::default());
}

#[test]
fn partial_json_overrides() {
    let cfg: SketchConfig = serde_json::from_str(
        r#"{
            "anchors": 4,
            "step_frequency": 0.1,
            "readiness": { "gate": "min_images", "images": 40 },
            "drive": { "mode": "constant", "step": 0.2 },
            "wrap": "carry",
            "seed": 9
        }"#,
    )
    .unwrap();
    cfg.validate().unwrap();
    assert_eq!(cfg.readiness, ReadinessGate::MinImages(40));
    assert_eq!(cfg.wrap, WrapMode::Carry);
    assert_eq!(cfg.seed, Some(9));
    assert_eq!(cfg.planned_waypoints().unwrap(), 44);
}

#[test]
fn unit_gates_parse() {
    let g: ReadinessGate = serde_json::from_str(r#"{ "gate": "non_empty" }"#).unwrap();
    assert_eq!(g, ReadinessGate::NonEmpty);
}

#[test]
fn validate_rejects_bad_values() {
    let cases = [
        SketchConfig {
            anchors: 0,
            ..SketchConfig::default()
        },
        SketchConfig {
            step_frequency: 0.0,
            ..SketchConfig::default()
        },
        SketchConfig {
            step_frequency: 1.5,
            ..SketchConfig::default()
        },
        SketchConfig {
            display: Canvas {
                width: 0,
                height: 10,
            },
            ..SketchConfig::default()
        },
        SketchConfig {
            pixelate_min: 0,
            ..SketchConfig::default()
        },
        SketchConfig {
            pixelate_min: 20,
            ..SketchConfig::default()
        },
    ];
    for cfg in cases {
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("config error:"), "{err}");
    }
}

#[test]
fn load_reads_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sketch.json");
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(br#"{ "anchors": 3 }"#).unwrap();
    drop(f);
    assert_eq!(SketchConfig::load(&path).unwrap().anchors, 3);

    std::fs::write(&path, r#"{ "anchors": 0 }"#).unwrap();
    assert!(SketchConfig::load(&path).is_err());
}

#[test]
fn oversized_plans_are_config_errors() {
    for cfg in [
        SketchConfig {
            step_frequency: 1e-30,
            ..SketchConfig::default()
        },
        SketchConfig {
            anchors: usize::MAX,
            ..SketchConfig::default()
        },
    ] {
        let err = cfg.planned_waypoints().unwrap_err();
        assert!(err.to_string().starts_with("config error:"), "{err}");
        assert!(cfg.validate().is_err());
    }
}

#[test]
fn drift_and_pressed_size_parse_and_validate() {
    let cfg: SketchConfig =
        serde_json::from_str(r#"{ "drift": {}, "pressed_size": { "width": 4, "height": 6 } }"#)
            .unwrap();
    cfg.validate().unwrap();
    assert_eq!(cfg.drift, Some(DriftConfig::default()));
    assert_eq!(cfg.pressed_size, Canvas::new(4, 6).unwrap());
    assert_eq!(SketchConfig::default().drift, None);

    let runaway = SketchConfig {
        drift: Some(DriftConfig { damping: 1.0 }),
        ..SketchConfig::default()
    };
    assert!(runaway.validate().is_err());
    let flat = SketchConfig {
        pressed_size: Canvas {
            width: 0,
            height: 10,
        },
        ..SketchConfig::default()
    };
    assert!(flat.validate().is_err());
}

use clap::Parser;
use lilacam::config::{Config, RendererMode, SourceKind};
use lilacam::palette::PaletteName;
use lilacam::prefs::{AppPrefs, PrefsError};
use std::path::PathBuf;

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("lilacam-{tag}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn config_defaults_are_stable() {
    let cfg = Config::try_parse_from(["lilacam"]).expect("parse should succeed");
    assert_eq!(cfg.source, SourceKind::Camera);
    assert_eq!(cfg.renderer, RendererMode::HalfBlock);
    assert_eq!(cfg.capture_width, 640);
    assert_eq!(cfg.capture_height, 480);
    assert_eq!(cfg.fps, 30);
    assert_eq!(cfg.palette, None);
    assert_eq!(cfg.threshold, None);
    assert!(cfg.mirror_tracking);
    assert!(cfg.sync_updates);
    assert!(!cfg.no_prefs);
    assert_eq!(cfg.still_scale, 4);
}

#[test]
fn config_accepts_aliases() {
    let cfg = Config::try_parse_from([
        "lilacam",
        "--source",
        "demo",
        "--palette",
        "bw",
        "--renderer",
        "hb",
        "--mirror-tracking",
        "false",
    ])
    .expect("parse should succeed");
    assert_eq!(cfg.source, SourceKind::Synthetic);
    assert_eq!(cfg.palette, Some(PaletteName::Mono));
    assert_eq!(cfg.renderer, RendererMode::HalfBlock);
    assert!(!cfg.mirror_tracking);

    let cfg = Config::try_parse_from(["lilacam", "--source", "webcam", "--renderer", "kitty"])
        .expect("parse should succeed");
    assert_eq!(cfg.source, SourceKind::Camera);
    assert_eq!(cfg.renderer, RendererMode::Kitty);
}

#[test]
fn config_rejects_unknown_palette() {
    assert!(Config::try_parse_from(["lilacam", "--palette", "sepia"]).is_err());
}

#[test]
fn source_spec_carries_capture_settings() {
    let cfg = Config::try_parse_from([
        "lilacam",
        "--source",
        "image",
        "--image",
        "face.png",
        "--device",
        "/dev/video2",
        "--capture-width",
        "320",
        "--capture-height",
        "240",
    ])
    .expect("parse should succeed");
    let spec = cfg.source_spec();
    assert_eq!(spec.kind, SourceKind::Image);
    assert_eq!(spec.image, Some(PathBuf::from("face.png")));
    assert_eq!(spec.device.as_deref(), Some("/dev/video2"));
    assert_eq!((spec.width, spec.height), (320, 240));
}

#[test]
fn palette_cycle_and_labels() {
    assert_eq!(PaletteName::Lila.next(), PaletteName::Mono);
    assert_eq!(PaletteName::Mono.next(), PaletteName::Lila);
    for name in PaletteName::all() {
        assert_eq!(PaletteName::from_label(name.label()), Some(name));
    }
    assert_eq!(PaletteName::from_label(" Violet "), Some(PaletteName::Lila));
    assert_eq!(PaletteName::from_label("sepia"), None);
    let mono = PaletteName::Mono.palette();
    assert_eq!(mono.dark, [0, 0, 0]);
    assert_eq!(mono.light, [255, 255, 255]);
}

#[test]
fn prefs_parse_reads_known_keys() {
    let prefs = AppPrefs::parse(
        r#"
        # saved by an older build
        palette = mono
        threshold = 95.5
        zoom = 2
        "#,
    )
    .expect("prefs parse should succeed");
    assert_eq!(prefs.palette, PaletteName::Mono);
    assert_eq!(prefs.threshold, 95.5);
}

#[test]
fn prefs_parse_clamps_threshold() {
    let prefs = AppPrefs::parse("threshold=9000\n").expect("prefs parse should succeed");
    assert_eq!(prefs.threshold, 320.0);
    let prefs = AppPrefs::parse("threshold=-4\n").expect("prefs parse should succeed");
    assert_eq!(prefs.threshold, 0.0);
}

#[test]
fn prefs_parse_reports_bad_lines() {
    let err = AppPrefs::parse("palette=lila\nthreshold\n").expect_err("missing '=' must fail");
    assert!(matches!(err, PrefsError::Parse { line: 2, .. }));

    let err = AppPrefs::parse("palette=sepia\n").expect_err("unknown palette must fail");
    assert!(matches!(err, PrefsError::Parse { line: 1, .. }));

    let err = AppPrefs::parse("threshold=bright\n").expect_err("non-number must fail");
    assert!(matches!(err, PrefsError::Parse { line: 1, .. }));
}

#[test]
fn prefs_missing_file_means_defaults() {
    let dir = scratch_dir("prefs-missing");
    let prefs = AppPrefs::load(Some(&dir.join("prefs.txt"))).expect("missing file is fine");
    assert_eq!(prefs, AppPrefs::default());
    assert_eq!(AppPrefs::load(None).expect("no path"), AppPrefs::default());
}

#[test]
fn prefs_save_then_load_restores_choice() {
    let dir = scratch_dir("prefs-save");
    let path = dir.join("nested").join("prefs.txt");
    let picked = AppPrefs {
        palette: PaletteName::Mono,
        threshold: 180.0,
    };
    picked.save(Some(&path)).expect("save should succeed");
    assert!(!path.with_extension("tmp").exists());

    let text = std::fs::read_to_string(&path).expect("prefs file exists");
    assert!(text.contains("palette=mono"));
    assert!(text.contains("threshold=180.0"));

    let loaded = AppPrefs::load(Some(&path)).expect("load should succeed");
    assert_eq!(loaded, picked);
    let _ = std::fs::remove_dir_all(&dir);
}

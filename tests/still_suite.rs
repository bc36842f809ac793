#[allow(dead_code)]
#[path = "../src/bin/lilacam_still.rs"]
mod lilacam_still;

use clap::Parser;
use lilacam::buffer::WorkingBuffer;
use lilacam::palette::PaletteName;
use lilacam::still;
use std::path::PathBuf;

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("lilacam-{tag}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn parse_args_defaults_are_stable() {
    let args = lilacam_still::Cli::try_parse_from(["lilacam_still", "--input", "face.jpg"])
        .expect("parse should succeed");

    assert_eq!(args.input, PathBuf::from("face.jpg"));
    assert_eq!(args.out, PathBuf::from("still.png"));
    assert_eq!(args.frames, 90);
    assert_eq!(args.fps, 30);
    assert_eq!(args.threshold, 140.0);
    assert_eq!(args.palette, PaletteName::Lila);
    assert_eq!(args.scale, 4);
    assert!(args.mirror_tracking);
    lilacam_still::validate_args(&args).expect("defaults should validate");
}

#[test]
fn parse_args_overrides_work() {
    let args = lilacam_still::Cli::try_parse_from([
        "lilacam_still",
        "--input",
        "face.jpg",
        "--out",
        "shots/me.png",
        "--frames",
        "12",
        "--threshold",
        "200",
        "--palette",
        "mono",
        "--seed",
        "7",
        "--scale",
        "2",
        "--mirror-tracking",
        "false",
    ])
    .expect("parse should succeed");

    assert_eq!(args.out, PathBuf::from("shots/me.png"));
    assert_eq!(args.frames, 12);
    assert_eq!(args.threshold, 200.0);
    assert_eq!(args.palette, PaletteName::Mono);
    assert_eq!(args.seed, 7);
    assert_eq!(args.scale, 2);
    assert!(!args.mirror_tracking);
}

#[test]
fn validate_rejects_bad_values() {
    let base = ["lilacam_still", "--input", "face.jpg"];
    for extra in [
        ["--frames", "0"],
        ["--fps", "0"],
        ["--scale", "0"],
        ["--scale", "17"],
        ["--threshold", "400"],
        ["--threshold=-1", "--frames=5"],
    ] {
        let args = lilacam_still::Cli::try_parse_from(base.iter().chain(extra.iter()).copied())
            .expect("parse should succeed");
        assert!(
            lilacam_still::validate_args(&args).is_err(),
            "{extra:?} should be rejected"
        );
    }
}

#[test]
fn save_png_scales_with_nearest_neighbour() {
    let dir = scratch_dir("still-scale");
    let path = dir.join("out").join("shot.png");

    let mut buf = WorkingBuffer::new();
    buf.fill([38, 14, 58]);
    buf.put(0, 0, [206, 164, 255]);
    still::save_png(&buf, &path, 2).expect("save should succeed");

    let img = image::open(&path).expect("png readable").to_rgba8();
    assert_eq!(img.dimensions(), (320, 240));
    for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        assert_eq!(img.get_pixel(x, y).0, [206, 164, 255, 255]);
    }
    assert_eq!(img.get_pixel(2, 0).0, [38, 14, 58, 255]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn timestamped_paths_live_in_the_still_dir() {
    let path = still::timestamped_path(std::path::Path::new("shots"));
    assert_eq!(path.parent(), Some(std::path::Path::new("shots")));
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    assert!(name.starts_with("lilacam-") && name.ends_with(".png"));
}

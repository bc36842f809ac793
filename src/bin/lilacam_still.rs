use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use lilacam::clock::ManualClock;
use lilacam::dither::{DEFAULT_THRESHOLD, THRESHOLD_MAX, THRESHOLD_MIN};
use lilacam::palette::PaletteName;
use lilacam::session::{Session, SessionConfig};
use lilacam::source::ImageSource;
use lilacam::still;
use lilacam::tracker::TrackerConfig;
use log::info;

const DEFAULT_OUTPUT: &str = "still.png";
const DEFAULT_SEED: u64 = 0x11_1A_CA_4E;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "lilacam_still",
    version,
    about = "Offline lilacam render (image input -> dithered PNG with overlays)"
)]
pub(crate) struct Cli {
    #[arg(long, value_name = "IMAGE")]
    pub(crate) input: PathBuf,

    #[arg(long, value_name = "PNG", default_value = DEFAULT_OUTPUT)]
    pub(crate) out: PathBuf,

    /// Pipeline ticks to run before writing; lets the head settle and sprites spawn.
    #[arg(long, default_value_t = 90)]
    pub(crate) frames: u32,

    #[arg(long, default_value_t = 30)]
    pub(crate) fps: u32,

    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub(crate) threshold: f32,

    #[arg(long, value_enum, default_value_t = PaletteName::Lila)]
    pub(crate) palette: PaletteName,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub(crate) seed: u64,

    #[arg(long, default_value_t = 4)]
    pub(crate) scale: u32,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub(crate) mirror_tracking: bool,
}

pub(crate) fn validate_args(args: &Cli) -> Result<()> {
    if args.frames == 0 {
        bail!("--frames must be >= 1");
    }
    if args.fps == 0 {
        bail!("--fps must be >= 1");
    }
    if args.scale == 0 || args.scale > 16 {
        bail!("--scale must be within 1..=16");
    }
    if !args.threshold.is_finite() || !(THRESHOLD_MIN..=THRESHOLD_MAX).contains(&args.threshold) {
        bail!("--threshold must be within {THRESHOLD_MIN}..={THRESHOLD_MAX}");
    }
    Ok(())
}

fn main() -> Result<()> {
    lilacam::logging::init(None, "info")?;
    let args = Cli::parse();
    run(args)
}

fn run(args: Cli) -> Result<()> {
    validate_args(&args)?;

    let source = ImageSource::open(args.input.clone())
        .with_context(|| format!("open input {}", args.input.display()))?;

    let clock = ManualClock::new(0.0);
    let mut session = Session::with_clock(
        SessionConfig {
            palette: args.palette,
            threshold: args.threshold,
            tracker: TrackerConfig {
                mirror_x: args.mirror_tracking,
                ..TrackerConfig::default()
            },
            seed: Some(args.seed),
            ..SessionConfig::default()
        },
        Box::new(clock.clone()),
    );
    session.start_with_source(Box::new(source));

    let dt = 1.0 / args.fps as f64;
    let mut drawn = 0usize;
    for _ in 0..args.frames {
        let report = session.tick();
        if !report.ran {
            bail!("input produced no usable frame");
        }
        drawn = report.sprites_drawn;
        clock.advance(dt);
    }

    still::save_png(session.buffer(), &args.out, args.scale)?;
    let (hx, hy) = session.head();
    info!(
        "rendered {} ticks, head {:.1},{:.1}, {} sprites -> {}",
        args.frames,
        hx,
        hy,
        drawn,
        args.out.display()
    );
    Ok(())
}

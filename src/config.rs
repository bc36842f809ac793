use crate::palette::PaletteName;
use crate::source::SourceSpec;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "lilacam", version, about = "Dithered mirror webcam with procedural eyes, in the terminal")]
pub struct Config {
    #[arg(long, value_enum, default_value_t = SourceKind::Camera)]
    pub source: SourceKind,

    /// Camera device (/dev/video0 on Linux, an avfoundation index on macOS).
    #[arg(long)]
    pub device: Option<String>,

    #[arg(long, value_name = "PATH")]
    pub image: Option<PathBuf>,

    #[arg(long, default_value_t = 640)]
    pub capture_width: usize,

    #[arg(long, default_value_t = 480)]
    pub capture_height: usize,

    /// Overrides the persisted palette.
    #[arg(long, value_enum)]
    pub palette: Option<PaletteName>,

    /// Overrides the persisted threshold (0-320).
    #[arg(long)]
    pub threshold: Option<f32>,

    #[arg(long, value_enum, default_value_t = RendererMode::HalfBlock)]
    pub renderer: RendererMode,

    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub mirror_tracking: bool,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub sync_updates: bool,

    #[arg(long, value_name = "DIR", default_value = ".")]
    pub still_dir: PathBuf,

    #[arg(long, default_value_t = 4)]
    pub still_scale: u32,

    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub no_prefs: bool,
}

impl Config {
    pub fn source_spec(&self) -> SourceSpec {
        SourceSpec {
            kind: self.source,
            device: self.device.clone(),
            image: self.image.clone(),
            width: self.capture_width,
            height: self.capture_height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    #[value(alias = "webcam", alias = "cam")]
    Camera,
    #[value(alias = "file", alias = "still")]
    Image,
    #[value(alias = "test", alias = "demo")]
    Synthetic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RendererMode {
    #[value(name = "half-block", alias = "halfblock", alias = "half_block", alias = "hb")]
    HalfBlock,
    Kitty,
}

use crate::buffer::WorkingBuffer;
use anyhow::{anyhow, Context};
use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub fn to_image(buf: &WorkingBuffer) -> anyhow::Result<RgbaImage> {
    RgbaImage::from_raw(buf.width() as u32, buf.height() as u32, buf.pixels().to_vec())
        .ok_or_else(|| anyhow!("working buffer has inconsistent dimensions"))
}

/// Writes the buffer as PNG, upscaled by an integer factor with nearest-neighbour.
pub fn save_png(buf: &WorkingBuffer, path: &Path, scale: u32) -> anyhow::Result<()> {
    let mut img = to_image(buf)?;
    let scale = scale.max(1);
    if scale > 1 {
        img = image::imageops::resize(
            &img,
            img.width() * scale,
            img.height() * scale,
            image::imageops::FilterType::Nearest,
        );
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create still directory {}", parent.display()))?;
        }
    }
    img.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write still {}", path.display()))
}

pub fn timestamped_path(dir: &Path) -> PathBuf {
    let ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    dir.join(format!("lilacam-{ms}.png"))
}

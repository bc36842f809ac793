use crate::buffer::WorkingBuffer;
use crate::palette::Palette;

/// 4x4 Bayer matrix; indexed as `[row % 4][col % 4]`.
pub const DITHER_MATRIX: [[u8; 4]; 4] = [
    [0, 8, 2, 10],
    [12, 4, 14, 6],
    [3, 11, 1, 9],
    [15, 7, 13, 5],
];

pub const DEFAULT_THRESHOLD: f32 = 140.0;
pub const THRESHOLD_MIN: f32 = 0.0;
/// Highest perturbed luminance is 255 + 60; anything above renders fully dark.
pub const THRESHOLD_MAX: f32 = 320.0;

const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;
const OFFSET_SCALE: f32 = 8.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Dark,
    Light,
}

/// Running sum of light pixel coordinates gathered during dispersion.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CentroidSum {
    pub sum_x: f64,
    pub sum_y: f64,
    pub count: u32,
}

impl CentroidSum {
    pub fn push(&mut self, x: usize, y: usize) {
        self.sum_x += x as f64;
        self.sum_y += y as f64;
        self.count += 1;
    }

    pub fn centroid(&self) -> Option<(f32, f32)> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        Some(((self.sum_x / n) as f32, (self.sum_y / n) as f32))
    }
}

#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    LUMA_R * r as f32 + LUMA_G * g as f32 + LUMA_B * b as f32
}

#[inline]
pub fn cell_at(x: usize, y: usize) -> u8 {
    DITHER_MATRIX[y & 3][x & 3]
}

#[inline]
pub fn cell_offset(cell: u8) -> f32 {
    (cell as f32 - 7.5) * OFFSET_SCALE
}

#[inline]
pub fn classify(luma: f32, cell: u8, threshold: f32) -> Tone {
    if luma + cell_offset(cell) > threshold {
        Tone::Light
    } else {
        Tone::Dark
    }
}

pub fn clamp_threshold(value: f32) -> f32 {
    if !value.is_finite() {
        return DEFAULT_THRESHOLD;
    }
    value.clamp(THRESHOLD_MIN, THRESHOLD_MAX)
}

/// Converts the buffer to two tones in place and returns the light-pixel centroid input.
pub fn disperse(buf: &mut WorkingBuffer, palette: &Palette, threshold: f32) -> CentroidSum {
    let w = buf.width();
    let mut acc = CentroidSum::default();
    if w == 0 {
        return acc;
    }

    for (i, px) in buf.pixels_mut().chunks_exact_mut(4).enumerate() {
        let x = i % w;
        let y = i / w;
        let luma = luminance(px[0], px[1], px[2]);
        let rgb = match classify(luma, cell_at(x, y), threshold) {
            Tone::Light => {
                acc.push(x, y);
                palette.light
            }
            Tone::Dark => palette.dark,
        };
        px[0] = rgb[0];
        px[1] = rgb[1];
        px[2] = rgb[2];
        px[3] = 255;
    }

    acc
}

use crate::dither::CentroidSum;

pub const DEFAULT_SMOOTHING: f32 = 0.15;
pub const DEFAULT_MIN_SUPPORT: u32 = 50;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackerConfig {
    pub smoothing: f32,
    /// Light-pixel count that must be exceeded before the head moves.
    pub min_support: u32,
    pub mirror_x: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            smoothing: DEFAULT_SMOOTHING,
            min_support: DEFAULT_MIN_SUPPORT,
            mirror_x: true,
        }
    }
}

/// Exponentially smoothed head position in working-buffer coordinates.
///
/// With `mirror_x` the target x is `width - cx`, so the head ranges over the
/// closed interval `[0, width]`: a centroid in column 0 maps to `width`, one past
/// the last pixel. Sprites anchored there are clipped by the buffer.
#[derive(Clone, Debug)]
pub struct HeadTracker {
    cfg: TrackerConfig,
    head: (f32, f32),
}

impl HeadTracker {
    pub fn new(cfg: TrackerConfig, start: (f32, f32)) -> Self {
        Self { cfg, head: start }
    }

    pub fn centered(cfg: TrackerConfig, width: usize, height: usize) -> Self {
        Self::new(cfg, (width as f32 * 0.5, height as f32 * 0.5))
    }

    pub fn head(&self) -> (f32, f32) {
        self.head
    }

    /// Feeds one frame's centroid sum. Returns false when support was too low
    /// and the head was left untouched.
    pub fn update(&mut self, sum: &CentroidSum, width: usize) -> bool {
        if sum.count <= self.cfg.min_support {
            return false;
        }
        let Some((cx, cy)) = sum.centroid() else {
            return false;
        };
        let tx = if self.cfg.mirror_x {
            width as f32 - cx
        } else {
            cx
        };
        self.follow((tx, cy));
        true
    }

    pub fn follow(&mut self, target: (f32, f32)) {
        let a = self.cfg.smoothing;
        self.head.0 += (target.0 - self.head.0) * a;
        self.head.1 += (target.1 - self.head.1) * a;
    }
}

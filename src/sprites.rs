use crate::buffer::WorkingBuffer;
use std::f32::consts::TAU;
use std::ops::RangeInclusive;

/// Glyph colour table: 0 is transparent, 1 highlight, 2 mid, 3 core.
pub const GLYPH_COLORS: [Option<[u8; 3]>; 4] = [
    None,
    Some([255, 248, 255]),
    Some([214, 40, 82]),
    Some([14, 0, 18]),
];

const BLINK_RATE: f64 = 3.0;
const BLINK_CUTOFF: f64 = 0.92;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyph {
    pub width: usize,
    pub height: usize,
    pub cells: &'static [u8],
}

#[rustfmt::skip]
pub const EYE_SMALL: Glyph = Glyph {
    width: 5,
    height: 3,
    cells: &[
        0, 1, 1, 1, 0,
        1, 2, 3, 2, 1,
        0, 1, 1, 1, 0,
    ],
};

#[rustfmt::skip]
pub const EYE_LARGE: Glyph = Glyph {
    width: 7,
    height: 5,
    cells: &[
        0, 0, 1, 1, 1, 0, 0,
        0, 1, 2, 2, 2, 1, 0,
        1, 2, 3, 3, 3, 2, 1,
        0, 1, 2, 2, 2, 1, 0,
        0, 0, 1, 1, 1, 0, 0,
    ],
};

#[rustfmt::skip]
pub const MOUTH: Glyph = Glyph {
    width: 9,
    height: 4,
    cells: &[
        1, 0, 0, 0, 0, 0, 0, 0, 1,
        1, 2, 2, 2, 2, 2, 2, 2, 1,
        0, 1, 3, 3, 3, 3, 3, 1, 0,
        0, 0, 1, 1, 1, 1, 1, 0, 0,
    ],
};

impl Glyph {
    /// Overwrites the glyph centred on `(cx, cy)`; transparent and off-buffer cells are skipped.
    pub fn stamp(&self, buf: &mut WorkingBuffer, cx: i32, cy: i32) {
        let x0 = cx - (self.width / 2) as i32;
        let y0 = cy - (self.height / 2) as i32;
        for gy in 0..self.height {
            for gx in 0..self.width {
                let idx = self.cells[gy * self.width + gx] as usize;
                if let Some(rgb) = GLYPH_COLORS.get(idx).copied().flatten() {
                    buf.put(x0 + gx as i32, y0 + gy as i32, rgb);
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EyeSize {
    Small,
    Large,
}

impl EyeSize {
    pub fn glyph(self) -> &'static Glyph {
        match self {
            Self::Small => &EYE_SMALL,
            Self::Large => &EYE_LARGE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Eye {
    pub offset: (f32, f32),
    pub lifetime: u32,
    pub size: EyeSize,
    pub blink_offset: f32,
}

impl Eye {
    pub fn is_blinking(&self, now_secs: f64) -> bool {
        (now_secs * BLINK_RATE + self.blink_offset as f64).sin() > BLINK_CUTOFF
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mouth {
    pub offset: (f32, f32),
    pub lifetime: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpawnRule {
    /// Probability of a spawn roll succeeding on a given tick.
    pub chance: f32,
    pub cap: usize,
    pub burst: RangeInclusive<u32>,
    pub offset_x: (f32, f32),
    pub offset_y: (f32, f32),
    pub lifetime: RangeInclusive<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OverlayConfig {
    pub eyes: SpawnRule,
    pub mouths: SpawnRule,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            eyes: SpawnRule {
                chance: 0.15,
                cap: 12,
                burst: 1..=2,
                offset_x: (-40.0, 40.0),
                offset_y: (-30.0, 0.0),
                lifetime: 60..=120,
            },
            mouths: SpawnRule {
                chance: 0.05,
                cap: 2,
                burst: 1..=1,
                offset_x: (-20.0, 20.0),
                offset_y: (14.0, 30.0),
                lifetime: 80..=140,
            },
        }
    }
}

/// Transient eye and mouth sprites anchored on the tracked head.
pub struct OverlayEngine {
    cfg: OverlayConfig,
    rng: fastrand::Rng,
    eyes: Vec<Eye>,
    mouths: Vec<Mouth>,
}

impl OverlayEngine {
    pub fn new(cfg: OverlayConfig, rng: fastrand::Rng) -> Self {
        let eyes = Vec::with_capacity(cfg.eyes.cap);
        let mouths = Vec::with_capacity(cfg.mouths.cap);
        Self {
            cfg,
            rng,
            eyes,
            mouths,
        }
    }

    pub fn with_seed(cfg: OverlayConfig, seed: u64) -> Self {
        Self::new(cfg, fastrand::Rng::with_seed(seed))
    }

    pub fn eyes(&self) -> &[Eye] {
        &self.eyes
    }

    pub fn mouths(&self) -> &[Mouth] {
        &self.mouths
    }

    pub fn insert_eye(&mut self, eye: Eye) -> bool {
        if self.eyes.len() >= self.cfg.eyes.cap || eye.lifetime == 0 {
            return false;
        }
        self.eyes.push(eye);
        true
    }

    pub fn insert_mouth(&mut self, mouth: Mouth) -> bool {
        if self.mouths.len() >= self.cfg.mouths.cap || mouth.lifetime == 0 {
            return false;
        }
        self.mouths.push(mouth);
        true
    }

    /// One animation step: age, spawn, then stamp survivors. Returns the number of glyphs drawn.
    pub fn tick(&mut self, buf: &mut WorkingBuffer, head: (f32, f32), now_secs: f64) -> usize {
        self.age();
        self.spawn();
        self.stamp(buf, head, now_secs)
    }

    pub fn age(&mut self) {
        self.eyes.retain_mut(|e| {
            e.lifetime = e.lifetime.saturating_sub(1);
            e.lifetime > 0
        });
        self.mouths.retain_mut(|m| {
            m.lifetime = m.lifetime.saturating_sub(1);
            m.lifetime > 0
        });
    }

    pub fn spawn(&mut self) {
        let rule = self.cfg.eyes.clone();
        if self.eyes.len() < rule.cap && self.rng.f32() < rule.chance {
            for _ in 0..self.roll(&rule.burst) {
                let eye = Eye {
                    offset: self.roll_offset(&rule),
                    lifetime: self.roll(&rule.lifetime),
                    size: if self.rng.bool() {
                        EyeSize::Large
                    } else {
                        EyeSize::Small
                    },
                    blink_offset: self.rng.f32() * TAU,
                };
                if !self.insert_eye(eye) {
                    break;
                }
            }
        }

        let rule = self.cfg.mouths.clone();
        if self.mouths.len() < rule.cap && self.rng.f32() < rule.chance {
            for _ in 0..self.roll(&rule.burst) {
                let mouth = Mouth {
                    offset: self.roll_offset(&rule),
                    lifetime: self.roll(&rule.lifetime),
                };
                if !self.insert_mouth(mouth) {
                    break;
                }
            }
        }
    }

    pub fn stamp(&self, buf: &mut WorkingBuffer, head: (f32, f32), now_secs: f64) -> usize {
        let mut drawn = 0usize;
        for eye in &self.eyes {
            if eye.is_blinking(now_secs) {
                continue;
            }
            let (x, y) = anchor(head, eye.offset);
            eye.size.glyph().stamp(buf, x, y);
            drawn += 1;
        }
        for mouth in &self.mouths {
            let (x, y) = anchor(head, mouth.offset);
            MOUTH.stamp(buf, x, y);
            drawn += 1;
        }
        drawn
    }

    fn roll(&mut self, range: &RangeInclusive<u32>) -> u32 {
        if range.is_empty() {
            return *range.start();
        }
        self.rng.u32(range.clone())
    }

    fn roll_offset(&mut self, rule: &SpawnRule) -> (f32, f32) {
        let (x0, x1) = rule.offset_x;
        let (y0, y1) = rule.offset_y;
        (
            x0 + self.rng.f32() * (x1 - x0),
            y0 + self.rng.f32() * (y1 - y0),
        )
    }
}

fn anchor(head: (f32, f32), offset: (f32, f32)) -> (i32, i32) {
    (
        (head.0 + offset.0).round() as i32,
        (head.1 + offset.1).round() as i32,
    )
}

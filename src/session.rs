use crate::buffer::WorkingBuffer;
use crate::clock::{Clock, SystemClock};
use crate::dither::{self, clamp_threshold, DEFAULT_THRESHOLD};
use crate::palette::{Palette, PaletteName};
use crate::sampler;
use crate::source::{self, CaptureError, FrameSource, SourceSpec};
use crate::sprites::{OverlayConfig, OverlayEngine};
use crate::tracker::{HeadTracker, TrackerConfig};
use log::{debug, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Live,
    /// Still captured; ticks are suspended until retake.
    Frozen,
    /// Device acquisition failed. Terminal for the session.
    Denied,
}

impl CaptureState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Live => "LIVE",
            Self::Frozen => "STILL",
            Self::Denied => "DENIED",
        }
    }
}

#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub palette: PaletteName,
    pub threshold: f32,
    pub tracker: TrackerConfig,
    pub overlay: OverlayConfig,
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            palette: PaletteName::Lila,
            threshold: DEFAULT_THRESHOLD,
            tracker: TrackerConfig::default(),
            overlay: OverlayConfig::default(),
            seed: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// False when the tick was skipped (not live, or no frame).
    pub ran: bool,
    pub light_pixels: u32,
    pub head_moved: bool,
    pub sprites_drawn: usize,
}

/// Owns everything one capture run mutates: buffer, tracker, sprites, RNG and source.
pub struct Session {
    buffer: WorkingBuffer,
    palette: PaletteName,
    threshold: f32,
    tracker: HeadTracker,
    overlay: OverlayEngine,
    clock: Box<dyn Clock>,
    source: Option<Box<dyn FrameSource>>,
    state: CaptureState,
    denial: Option<String>,
}

impl Session {
    pub fn new(cfg: SessionConfig) -> Self {
        Self::with_clock(cfg, Box::new(SystemClock::new()))
    }

    pub fn with_clock(cfg: SessionConfig, clock: Box<dyn Clock>) -> Self {
        let buffer = WorkingBuffer::new();
        let tracker = HeadTracker::centered(cfg.tracker, buffer.width(), buffer.height());
        let rng = match cfg.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self {
            buffer,
            palette: cfg.palette,
            threshold: clamp_threshold(cfg.threshold),
            tracker,
            overlay: OverlayEngine::new(cfg.overlay, rng),
            clock,
            source: None,
            state: CaptureState::Idle,
            denial: None,
        }
    }

    /// Acquires the configured device and goes live. A denial is sticky: later
    /// calls return the same error without touching the device again.
    pub fn start(&mut self, spec: &SourceSpec) -> Result<(), CaptureError> {
        if let Some(reason) = &self.denial {
            return Err(CaptureError::AccessDenied(reason.clone()));
        }
        if self.source.is_some() {
            return Ok(());
        }
        match source::acquire(spec) {
            Ok(src) => {
                self.start_with_source(src);
                Ok(())
            }
            Err(err) => {
                warn!("capture start failed: {err}");
                self.denial = Some(err.to_string());
                self.state = CaptureState::Denied;
                Err(err)
            }
        }
    }

    pub fn start_with_source(&mut self, src: Box<dyn FrameSource>) {
        info!("capture started ({})", src.name());
        self.buffer.clear();
        self.source = Some(src);
        self.state = CaptureState::Live;
    }

    /// Releases the source and clears the buffer. Head position and sprites are kept.
    pub fn stop(&mut self) {
        if self.source.take().is_some() {
            info!("capture stopped");
        }
        self.buffer.clear();
        if self.state != CaptureState::Denied {
            self.state = CaptureState::Idle;
        }
    }

    /// Capture a still (Live -> Frozen) or retake (Frozen -> Live).
    pub fn toggle_capture(&mut self) -> CaptureState {
        self.state = match self.state {
            CaptureState::Live => CaptureState::Frozen,
            CaptureState::Frozen => CaptureState::Live,
            other => other,
        };
        debug!("capture toggled -> {}", self.state.label());
        self.state
    }

    pub fn set_threshold(&mut self, value: f32) {
        self.threshold = clamp_threshold(value);
    }

    pub fn set_palette(&mut self, name: PaletteName) {
        if name != self.palette {
            debug!("palette -> {}", name.label());
        }
        self.palette = name;
    }

    /// Runs sampler, disperser, tracker and overlay once.
    pub fn tick(&mut self) -> TickReport {
        if self.state != CaptureState::Live {
            return TickReport::default();
        }
        let Some(src) = self.source.as_mut() else {
            return TickReport::default();
        };
        if !sampler::sample(&mut **src, &mut self.buffer) {
            return TickReport::default();
        }

        let palette = self.palette.palette();
        let sum = dither::disperse(&mut self.buffer, &palette, self.threshold);
        let head_moved = self.tracker.update(&sum, self.buffer.width());
        let now = self.clock.now_secs();
        let sprites_drawn = self
            .overlay
            .tick(&mut self.buffer, self.tracker.head(), now);

        TickReport {
            ran: true,
            light_pixels: sum.count,
            head_moved,
            sprites_drawn,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn denial(&self) -> Option<&str> {
        self.denial.as_deref()
    }

    pub fn buffer(&self) -> &WorkingBuffer {
        &self.buffer
    }

    pub fn palette_name(&self) -> PaletteName {
        self.palette
    }

    pub fn palette(&self) -> Palette {
        self.palette.palette()
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn head(&self) -> (f32, f32) {
        self.tracker.head()
    }

    pub fn overlay(&self) -> &OverlayEngine {
        &self.overlay
    }

    pub fn source_name(&self) -> Option<&'static str> {
        self.source.as_ref().map(|s| s.name())
    }
}

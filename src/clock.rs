use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Monotonic time source, in seconds since an arbitrary origin.
pub trait Clock {
    fn now_secs(&self) -> f64;
}

pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_secs(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Hand-driven clock. Clones share the same instant.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    t: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(t: f64) -> Self {
        Self {
            t: Rc::new(Cell::new(t)),
        }
    }

    pub fn set(&self, t: f64) {
        self.t.set(t);
    }

    pub fn advance(&self, dt: f64) {
        self.t.set(self.t.get() + dt);
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> f64 {
        self.t.get()
    }
}

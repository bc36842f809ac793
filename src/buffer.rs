pub const BUFFER_WIDTH: usize = 160;
pub const BUFFER_HEIGHT: usize = 120;

/// Fixed-resolution RGBA working buffer shared by every pipeline stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkingBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl WorkingBuffer {
    pub fn new() -> Self {
        Self::with_size(BUFFER_WIDTH, BUFFER_HEIGHT)
    }

    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width.saturating_mul(height).saturating_mul(4)],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// Overwrites one opaque pixel. Coordinates outside the buffer are dropped.
    pub fn put(&mut self, x: i32, y: i32, rgb: [u8; 3]) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y * self.width + x) * 4;
        self.pixels[i] = rgb[0];
        self.pixels[i + 1] = rgb[1];
        self.pixels[i + 2] = rgb[2];
        self.pixels[i + 3] = 255;
    }

    pub fn fill(&mut self, rgb: [u8; 3]) {
        for px in self.pixels.chunks_exact_mut(4) {
            px[0] = rgb[0];
            px[1] = rgb[1];
            px[2] = rgb[2];
            px[3] = 255;
        }
    }
}

impl Default for WorkingBuffer {
    fn default() -> Self {
        Self::new()
    }
}

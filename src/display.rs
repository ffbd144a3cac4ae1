pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// Monochrome 64x32 screen, row-major. Pixels only change by XOR.
#[derive(Clone)]
pub struct FrameBuffer {
    bit_buffer: [bool; WIDTH * HEIGHT],
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            bit_buffer: [false; WIDTH * HEIGHT],
        }
    }

    pub fn clear_buffer(&mut self) {
        self.bit_buffer = [false; WIDTH * HEIGHT];
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.bit_buffer[(y % HEIGHT) * WIDTH + (x % WIDTH)]
    }

    pub fn pixels(&self) -> &[bool] {
        &self.bit_buffer
    }

    pub fn lit_count(&self) -> usize {
        self.bit_buffer.iter().filter(|p| **p).count()
    }

    /// XOR `sprite` rows onto the screen with the top-left corner at (x, y).
    /// Each pixel wraps around both edges on its own. Returns true if any
    /// lit pixel was switched off.
    pub fn paint(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let mut vf = false;
        for (i, row) in sprite.iter().enumerate() {
            for j in 0..8 {
                if (row >> (7 - j)) & 1 == 0 {
                    continue;
                }
                let (nx, ny) = ((x as usize + j) % WIDTH, (y as usize + i) % HEIGHT);
                let index = (ny * WIDTH) + nx;
                if self.bit_buffer[index] {
                    vf = true;
                }
                self.bit_buffer[index] ^= true;
            }
        }
        vf
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

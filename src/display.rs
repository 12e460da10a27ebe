use log::trace;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Monochrome 64x32 screen. Every write is an XOR.
///
/// Coordinates passed to `set_pixel`/`get_pixel` must already be on screen; wrapping is the
/// job of the sprite routine (`paint`).
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    bit_buffer: [u8; DISPLAY_WIDTH * DISPLAY_HEIGHT],
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            bit_buffer: [0; DISPLAY_WIDTH * DISPLAY_HEIGHT],
        }
    }

    pub fn clear_buffer(&mut self) {
        self.bit_buffer = [0; DISPLAY_WIDTH * DISPLAY_HEIGHT];
    }

    fn offset(x: usize, y: usize) -> usize {
        debug_assert!(x < DISPLAY_WIDTH && y < DISPLAY_HEIGHT, "({x}, {y}) off screen");
        y * DISPLAY_WIDTH + x
    }

    /// XORs `bit` into the pixel; true when the pixel changed in either direction.
    pub fn set_pixel(&mut self, x: usize, y: usize, bit: u8) -> bool {
        let index = Self::offset(x, y);
        let previous = self.bit_buffer[index];
        self.bit_buffer[index] ^= bit & 1;
        previous != self.bit_buffer[index]
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> u8 {
        self.bit_buffer[Self::offset(x, y)]
    }

    /// Lit pixels as `(x, y)`, row by row. Calling again starts over.
    pub fn iter_set_pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.bit_buffer
            .iter()
            .enumerate()
            .filter(|(_, bit)| **bit == 1)
            .map(|(i, _)| (i % DISPLAY_WIDTH, i / DISPLAY_WIDTH))
    }

    /// XORs an 8-pixel wide sprite onto the screen with its top-left corner at (x, y).
    /// The start position and every row/column past the edge wrap around.
    ///
    /// Returns true if any pixel flipped.
    pub fn paint(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        trace!("Painting sprite at ({x}, {y}): {sprite:02X?}");
        let (x, y) = (x as usize % DISPLAY_WIDTH, y as usize % DISPLAY_HEIGHT);
        let mut flipped = false;
        for (i, row) in sprite.iter().enumerate() {
            let ny = (y + i) % DISPLAY_HEIGHT;
            for j in 0..8 {
                let nx = (x + j) % DISPLAY_WIDTH;
                let bit = (row >> (7 - j)) & 1;
                flipped |= self.set_pixel(nx, ny, bit);
            }
        }
        flipped
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.bit_buffer.chunks(DISPLAY_WIDTH) {
            let line: String = row.iter().map(|&b| if b == 1 { '#' } else { '.' }).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

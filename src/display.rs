pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// The 64x32 monochrome framebuffer.
///
/// Pixels are stored row-major. The dirty flag goes up whenever a pixel
/// may have changed and stays up until the renderer consumes the frame
/// and calls `clear_dirty`.
pub struct FrameBuffer {
    pixels: [bool; WIDTH * HEIGHT],
    dirty: bool,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            pixels: [false; WIDTH * HEIGHT],
            dirty: false,
        }
    }

    /// Blanks the screen. Always marks the frame dirty.
    pub fn clear(&mut self) {
        self.pixels = [false; WIDTH * HEIGHT];
        self.dirty = true;
    }

    pub fn reset(&mut self) {
        self.pixels = [false; WIDTH * HEIGHT];
        self.dirty = false;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    #[cfg(test)]
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[y * WIDTH + x]
    }

    /// XORs an 8-pixel-wide sprite onto the screen at (x, y), one byte per
    /// row, most significant bit leftmost, wrapping on both axes. Returns
    /// true if any pixel was toggled off (collision). Marks the frame
    /// dirty even when nothing changed.
    pub fn draw_sprite(&mut self, x: u8, y: u8, rows: &[u8]) -> bool {
        let mut collision = false;
        for (row, byte) in rows.iter().enumerate() {
            let py = (y as usize + row) % HEIGHT;
            for bit in 0..8 {
                if byte & (0x80 >> bit) == 0 {
                    continue;
                }
                let px = (x as usize + bit) % WIDTH;
                let idx = py * WIDTH + px;
                collision |= self.pixels[idx];
                self.pixels[idx] ^= true;
            }
        }
        self.dirty = true;
        collision
    }

    /// Packs the frame into 0RGB words for a window blit.
    pub fn to_argb(&self, on: u32, off: u32) -> Vec<u32> {
        self.pixels
            .iter()
            .map(|&lit| if lit { on } else { off })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_sets_pixels_and_reports_no_collision_on_blank_screen() {
        let mut fb = FrameBuffer::new();
        // 0b11000000 on one row
        assert!(!fb.draw_sprite(1, 2, &[0xC0]));
        assert!(fb.pixel(1, 2));
        assert!(fb.pixel(2, 2));
        assert!(!fb.pixel(3, 2));
        assert!(fb.is_dirty());
    }

    #[test]
    fn redrawing_a_sprite_erases_it_and_reports_collision() {
        let mut fb = FrameBuffer::new();
        let sprite = [0xF0, 0x90, 0x90, 0x90, 0xF0];
        fb.draw_sprite(4, 6, &sprite);
        assert!(fb.draw_sprite(4, 6, &sprite));
        assert!(fb.pixels().iter().all(|&p| !p));
    }

    #[test]
    fn sprites_wrap_on_both_axes() {
        let mut fb = FrameBuffer::new();
        fb.draw_sprite(62, 31, &[0xC0, 0xC0]);
        assert!(fb.pixel(62, 31));
        assert!(fb.pixel(63, 31));
        assert!(fb.pixel(62, 0));
        assert!(fb.pixel(63, 0));
    }

    #[test]
    fn empty_sprite_still_marks_dirty() {
        let mut fb = FrameBuffer::new();
        assert!(!fb.draw_sprite(0, 0, &[0x00]));
        assert!(fb.is_dirty());
    }

    #[test]
    fn clear_blanks_and_marks_dirty() {
        let mut fb = FrameBuffer::new();
        fb.draw_sprite(0, 0, &[0xFF]);
        fb.clear_dirty();
        fb.clear();
        assert!(fb.pixels().iter().all(|&p| !p));
        assert!(fb.is_dirty());
    }

    #[test]
    fn argb_packing_is_row_major() {
        let mut fb = FrameBuffer::new();
        fb.draw_sprite(0, 1, &[0x80]);
        let buf = fb.to_argb(0xFFFFFF, 0x000000);
        assert_eq!(buf.len(), WIDTH * HEIGHT);
        assert_eq!(buf[0], 0x000000);
        assert_eq!(buf[WIDTH], 0xFFFFFF);
    }
}

//! Full-frame background renderer.
//!
//! Draws all 256×240 pixels in one pass from the scroll position in `v`/fine-x. Each output
//! pixel picks its nametable from the `v` nametable-select bits plus tile overflow, so scrolling
//! past the right or bottom edge continues into the neighbouring quadrant.

use crate::{
    cartridge::mapper::mapper::Mapper,
    ppu::palette::{color, palette_index},
};

pub const WIDTH: usize = 256;
pub const HEIGHT: usize = 240;

const TILES_X: usize = 32;
const TILES_Y: usize = 30;

/// Everything the renderer reads from the PPU.
pub struct Background<'a> {
    /// 16 KiB PPU address space; nametables live at $2000–$2FFF.
    pub vram: &'a [u8],
    pub palette: &'a [u8; 32],
    pub v: u16,
    pub fine_x: u8,
    /// $0000 or $1000, from control bit 4.
    pub pattern_base: u16,
}

impl Background<'_> {
    /// Render into `out` (row-major, `WIDTH * HEIGHT`). Pattern bytes come from `chr`.
    pub fn render<M: Mapper>(&self, chr: &M, out: &mut [u32]) {
        let coarse_x = (self.v & 0x1F) as usize;
        let coarse_y = ((self.v >> 5) & 0x1F) as usize;
        let nametable = ((self.v >> 10) & 0b11) as usize;
        let fine_y = ((self.v >> 12) & 0b111) as usize;
        let fine_x = self.fine_x as usize;

        for py in 0..HEIGHT {
            let row = coarse_y + (py + fine_y) / 8;
            let tile_y = row % TILES_Y;
            let nt_y = row / TILES_Y;
            let fine_y_in_tile = (py + fine_y) % 8;

            // Cache the tile row across its 8 pixels
            let mut cached: Option<(usize, u8, u8, u8)> = None;

            for px in 0..WIDTH {
                let scroll_x = px + fine_x;
                let col = coarse_x + scroll_x / 8;
                let tile_x = col % TILES_X;
                let nt_x = col / TILES_X;

                let (lo, hi, attr) = match cached {
                    Some((c, lo, hi, attr)) if c == col => (lo, hi, attr),
                    _ => {
                        // Quadrant index: horizontal overflow flips bit 0, vertical flips bit 1
                        let selected = (nametable + nt_y * 2 + nt_x) & 0b11;
                        let base = 0x2000 + selected * 0x400;

                        let tile = self.vram_at(base + tile_y * TILES_X + tile_x) as u16;
                        let addr = self.pattern_base + tile * 16 + fine_y_in_tile as u16;
                        let lo = chr.ppu_read(addr);
                        let hi = chr.ppu_read(addr + 8);

                        let attr_byte = self.vram_at(base + 0x3C0 + (tile_y / 4) * 8 + tile_x / 4);
                        let shift = ((tile_y % 4) / 2) * 4 + ((tile_x % 4) / 2) * 2;
                        let attr = (attr_byte >> shift) & 0b11;

                        cached = Some((col, lo, hi, attr));
                        (lo, hi, attr)
                    }
                };

                let bit = 7 - (scroll_x % 8);
                let pixel = (((hi >> bit) & 1) << 1) | ((lo >> bit) & 1);

                // Pixel value 0 always shows the universal background color
                let entry = if pixel == 0 {
                    self.palette[0]
                } else {
                    self.palette[palette_index((attr * 4 + pixel) as u16)]
                };
                out[py * WIDTH + px] = color(entry);
            }
        }
    }

    fn vram_at(&self, addr: usize) -> u8 {
        self.vram[addr % self.vram.len()]
    }
}

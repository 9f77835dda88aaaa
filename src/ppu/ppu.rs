//! NES PPU timing and register ports.
//!
//! Handles the 341-dot × 262-scanline state machine, vblank NMI, the loopy scroll registers
//! (`v`, `t`, `x`, `w`), VRAM and palette access through $2007, and the once-per-frame
//! background render. Registers: $2000–$2007 (mirrored every 8 bytes by the bus).

use crate::{
    cartridge::mapper::{Board, mapper::Mapper},
    ppu::{
        palette::palette_index,
        render::{Background, HEIGHT, WIDTH},
    },
};

pub const DOTS_PER_SCANLINE: u16 = 341;
pub const SCANLINES_PER_FRAME: u16 = 262;
const VBLANK_SCANLINE: u16 = 241;
const PRE_RENDER_SCANLINE: u16 = 261;

/// PPU state: timing, VRAM, palette RAM, scroll registers, and framebuffer.
pub struct PPU {
    cycle: u16,
    scanline: u16,
    vblank: bool,
    nmi_pending: bool,
    frame_ready: bool,
    frame_count: u64,
    ctrl: u8,
    mask: u8,
    /// Current VRAM address (15 bits).
    v: u16,
    /// Temporary VRAM address; the top-left onscreen tile.
    t: u16,
    /// Fine X scroll (3 bits).
    x: u8,
    /// First/second write toggle shared by $2005 and $2006.
    w: bool,
    read_buffer: u8,
    /// Flat 16 KiB PPU address space. Nametables live at $2000–$2FFF; no mirroring applied.
    vram: Box<[u8; 0x4000]>,
    /// Palette RAM $3F00-$3F1F (32 bytes, with NES mirroring).
    palette: [u8; 32],
    /// 256×240 framebuffer (0xAARRGGBB per pixel). Row-major, left-to-right, top-to-bottom.
    framebuffer: Vec<u32>,
}

impl Default for PPU {
    fn default() -> Self {
        Self::new()
    }
}

impl PPU {
    /// Create PPU in initial state (scanline 0, cycle 0).
    pub fn new() -> Self {
        Self {
            cycle: 0,
            scanline: 0,
            vblank: false,
            nmi_pending: false,
            frame_ready: false,
            frame_count: 0,
            ctrl: 0,
            mask: 0,
            v: 0,
            t: 0,
            x: 0,
            w: false,
            read_buffer: 0,
            vram: Box::new([0; 0x4000]),
            palette: [0; 32],
            framebuffer: vec![0; WIDTH * HEIGHT],
        }
    }

    /// Advance PPU by one dot.
    pub fn step(&mut self, board: &mut Board) {
        self.cycle += 1;

        // Start of vblank (scanline 241, dot 1)
        if self.scanline == VBLANK_SCANLINE && self.cycle == 1 {
            self.vblank = true;
            if self.ctrl & 0x80 != 0 {
                self.nmi_pending = true;
            }
        }

        // Pre-render line
        if self.scanline == PRE_RENDER_SCANLINE && self.cycle == 1 {
            self.vblank = false;
            self.nmi_pending = false;
            if self.rendering_enabled() {
                self.v = self.t;
            }
        }

        if self.cycle == DOTS_PER_SCANLINE {
            self.cycle = 0;
            self.scanline += 1;

            if self.scanline == SCANLINES_PER_FRAME {
                self.scanline = 0;
                self.render_background(board);
                self.frame_ready = true;
                self.frame_count += 1;
                log::debug!("frame {} complete", self.frame_count);
            }

            if self.scanline < HEIGHT as u16 {
                if let Board::Mmc3(mapper) = board {
                    mapper.clock_scanline();
                }
            }
        }
    }

    /// Read one of the eight register ports.
    pub fn read_register(&mut self, port: u8, board: &mut Board) -> u8 {
        match port & 7 {
            2 => self.read_status(),
            7 => self.read_data(board),
            _ => 0,
        }
    }

    /// Write one of the eight register ports.
    pub fn write_register(&mut self, port: u8, data: u8, board: &mut Board) {
        match port & 7 {
            0 => {
                self.ctrl = data;
                self.t = (self.t & 0xF3FF) | (((data & 0b11) as u16) << 10);
            }
            1 => self.mask = data,
            5 => self.write_scroll(data),
            6 => self.write_addr(data),
            7 => self.write_data(data, board),
            // OAMADDR / OAMDATA: no sprite unit
            _ => {}
        }
    }

    /// Consume the NMI latch.
    pub fn take_nmi(&mut self) -> bool {
        std::mem::take(&mut self.nmi_pending)
    }

    /// Consume the frame-ready edge.
    pub fn take_frame_ready(&mut self) -> bool {
        std::mem::take(&mut self.frame_ready)
    }

    pub fn framebuffer(&self) -> &[u32] {
        &self.framebuffer
    }

    /// Framebuffer as packed RGBA bytes.
    pub fn frame_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.framebuffer.len() * 4);
        for &pixel in &self.framebuffer {
            let [a, r, g, b] = pixel.to_be_bytes();
            out.extend_from_slice(&[r, g, b, a]);
        }
        out
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn ctrl(&self) -> u8 {
        self.ctrl
    }

    pub fn mask(&self) -> u8 {
        self.mask
    }

    pub fn v(&self) -> u16 {
        self.v
    }

    pub fn t(&self) -> u16 {
        self.t
    }

    pub fn fine_x(&self) -> u8 {
        self.x
    }

    pub fn vblank(&self) -> bool {
        self.vblank
    }

    pub fn scanline(&self) -> u16 {
        self.scanline
    }

    pub fn cycle(&self) -> u16 {
        self.cycle
    }

    /// VRAM byte without touching the read buffer or `v`.
    pub fn peek_vram(&self, addr: u16) -> u8 {
        self.vram[(addr & 0x3FFF) as usize]
    }

    fn rendering_enabled(&self) -> bool {
        self.mask & 0x18 != 0
    }

    fn render_background(&mut self, board: &Board) {
        let pattern_base = if self.ctrl & 0x10 != 0 { 0x1000 } else { 0x0000 };
        let bg = Background {
            vram: &self.vram[..],
            palette: &self.palette,
            v: self.v,
            fine_x: self.x,
            pattern_base,
        };
        bg.render(board, &mut self.framebuffer);
    }

    /// PPUSTATUS ($2002): bit 7 is vblank. Clears vblank and the write toggle.
    fn read_status(&mut self) -> u8 {
        let status = if self.vblank { 0x80 } else { 0 };
        self.vblank = false;
        self.w = false;
        status
    }

    /// PPUSCROLL ($2005): X then Y into `t` and fine X.
    fn write_scroll(&mut self, data: u8) {
        if !self.w {
            self.t = (self.t & 0xFFE0) | (data >> 3) as u16;
            self.x = data & 0b111;
        } else {
            self.t = (self.t & 0x8FFF) | (((data & 0b111) as u16) << 12);
            self.t = (self.t & 0xFC1F) | (((data & 0xF8) as u16) << 2);
        }
        self.w = !self.w;
    }

    /// PPUADDR ($2006): high 6 bits, then low byte and `v = t`.
    fn write_addr(&mut self, data: u8) {
        if !self.w {
            self.t = (self.t & 0x80FF) | (((data & 0x3F) as u16) << 8);
        } else {
            self.t = (self.t & 0xFF00) | data as u16;
            self.v = self.t;
        }
        self.w = !self.w;
    }

    /// PPUDATA ($2007) read. VRAM reads are one behind; palette reads are immediate.
    fn read_data(&mut self, board: &Board) -> u8 {
        let addr = self.v & 0x3FFF;
        let data = if addr >= 0x3F00 {
            self.read_buffer = self.vram_read(addr - 0x1000, board);
            self.palette[palette_index(addr)]
        } else {
            let buffered = self.read_buffer;
            self.read_buffer = self.vram_read(addr, board);
            buffered
        };
        self.increment_v();
        data
    }

    fn write_data(&mut self, data: u8, board: &mut Board) {
        let addr = self.v & 0x3FFF;
        match addr {
            // Pattern tables: CHR RAM, or dropped by ROM boards
            0x0000..=0x1FFF => board.ppu_write(addr, data),
            0x3F00..=0x3FFF => self.palette[palette_index(addr)] = data,
            _ => self.vram[addr as usize] = data,
        }
        self.increment_v();
    }

    fn vram_read(&self, addr: u16, board: &Board) -> u8 {
        match addr {
            0x0000..=0x1FFF => board.ppu_read(addr),
            _ => self.vram[(addr & 0x3FFF) as usize],
        }
    }

    /// Increment by 32 if PPUCTRL bit 2 set, else 1.
    fn increment_v(&mut self) {
        let inc = if self.ctrl & 0x04 != 0 { 32 } else { 1 };
        self.v = self.v.wrapping_add(inc) & 0x7FFF;
    }
}

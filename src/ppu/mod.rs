//! PPU (Picture Processing Unit) emulation for the NES.
//!
//! See [PPU](https://www.nesdev.org/wiki/PPU), [PPU registers](https://www.nesdev.org/wiki/PPU_registers),
//! [PPU scrolling](https://www.nesdev.org/wiki/PPU_scrolling). Handles 341-dot scanlines, 262
//! scanlines per frame, vblank NMI, the loopy scroll registers, palette RAM, and a full-frame
//! background render at the end of each frame.

pub mod palette;
pub mod ppu;
pub mod render;

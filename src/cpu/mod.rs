//! 6502 CPU emulation for the NES.
//!
//! Full documented instruction set plus the stable undocumented opcodes; nestest-style trace
//! output. Bus trait used for memory and I/O (PPU, APU, cartridge, controller).

pub mod addressing;
pub mod cpu;
pub mod flags;
pub mod instructions;
pub mod trace;

#[cfg(test)]
mod tests;

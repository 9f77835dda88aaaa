//! Famicore: an NES (Nintendo Entertainment System) emulator core written in Rust.
//!
//! Implements the NES chipset as documented on the
//! [NESdev Wiki](https://www.nesdev.org/wiki/NES_reference_guide): the 6502 core of the
//! Ricoh 2A03, the 2C02 PPU, cartridge mappers, and controller I/O.
//!
//! ## Modules (NESdev references)
//!
//! - **apu** – audio collaborator seam: register latch for $4000–$4017, per-step RAM view
//! - **bus** – [CPU memory map](https://www.nesdev.org/wiki/CPU_memory_map): RAM, PPU, APU,
//!   controllers, cartridge
//! - **cartridge** – [iNES](https://www.nesdev.org/wiki/INES) loading; [Mapper](https://www.nesdev.org/wiki/Mapper)
//!   NROM (0), UxROM (2), MMC3 (4)
//! - **config** – run-time options (timing model, window scale, frame limit)
//! - **console** – the driving loop: one CPU step, three PPU dots, NMI delivery
//! - **controller** – [Controller reading](https://www.nesdev.org/wiki/Controller_reading): $4016 latch, shift-out
//! - **cpu** – [6502](https://www.nesdev.org/wiki/CPU) / 2A03: full + undocumented opcodes, [NMI](https://www.nesdev.org/wiki/NMI)
//! - **ppu** – [PPU](https://www.nesdev.org/wiki/PPU), [PPU registers](https://www.nesdev.org/wiki/PPU_registers),
//!   loopy scroll registers, full-frame background renderer, 256×240

pub mod apu;
pub mod bus;
pub mod cartridge;
pub mod config;
pub mod console;
pub mod controller;
pub mod cpu;
pub mod error;
pub mod logger;
pub mod ppu;

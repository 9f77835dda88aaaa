//! Memory bus and address decoding for the NES.
//!
//! Maps CPU addresses to RAM, PPU registers, the audio unit, controllers, and the cartridge.

use crate::{
    apu::apu::{ApuRegisters, AudioUnit},
    cartridge::{cartridge::Cartridge, mapper::mapper::Mapper},
    controller::Controller,
    ppu::ppu::PPU,
};

/// Trait for memory-mapped I/O and bus access used by the CPU.
///
/// Reads take `&mut self` because some registers (PPU status and data, controller ports)
/// change state when read.
pub trait Bus {
    fn read(&mut self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, data: u8);

    /// Little-endian word at `addr`, `addr + 1`.
    fn read_word(&mut self, addr: u16) -> u16 {
        let lo = self.read(addr);
        let hi = self.read(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    /// `($zp,X)`: the pointer and both of its bytes stay in page 0.
    fn read_indirect_x(&mut self, zp: u8, x: u8) -> u16 {
        let ptr = zp.wrapping_add(x);
        let lo = self.read(ptr as u16);
        let hi = self.read(ptr.wrapping_add(1) as u16);
        u16::from_le_bytes([lo, hi])
    }

    /// `($zp),Y`: the pointer fetch wraps in page 0, the `+Y` does not. Returns
    /// `(effective, base)`.
    fn read_indirect_y(&mut self, zp: u8, y: u8) -> (u16, u16) {
        let lo = self.read(zp as u16);
        let hi = self.read(zp.wrapping_add(1) as u16);
        let base = u16::from_le_bytes([lo, hi]);
        (base.wrapping_add(y as u16), base)
    }
}

/// Main NES bus: RAM, PPU, cartridge, controllers, and the audio unit.
pub struct NesBus {
    pub ram: [u8; 0x800],
    pub cart: Cartridge,
    pub ppu: PPU,
    pub controllers: [Controller; 2],
    pub apu: Box<dyn AudioUnit>,
}

impl NesBus {
    /// Create a new bus with the given cartridge and the register-latch audio unit.
    pub fn new(cart: Cartridge) -> Self {
        Self::with_audio(cart, Box::new(ApuRegisters::new()))
    }

    pub fn with_audio(cart: Cartridge, apu: Box<dyn AudioUnit>) -> Self {
        Self {
            ram: [0; 0x800],
            cart,
            ppu: PPU::new(),
            controllers: [Controller::new(), Controller::new()],
            apu,
        }
    }

    /// Advance the PPU one dot.
    pub fn step_ppu(&mut self) {
        self.ppu.step(&mut self.cart.mapper);
    }

    /// Consume the PPU's NMI latch. True at most once per VBlank entry.
    pub fn take_nmi(&mut self) -> bool {
        self.ppu.take_nmi()
    }

    /// Consume the frame-ready edge (set when the PPU wraps past scanline 261).
    pub fn take_frame_ready(&mut self) -> bool {
        self.ppu.take_frame_ready()
    }

    /// Cartridge IRQ line (MMC3 scanline counter).
    pub fn irq_pending(&self) -> bool {
        self.cart.mapper.irq_pending()
    }

    /// Give the audio unit its per-instruction tick with a read-only view of RAM.
    pub fn step_audio(&mut self) {
        self.apu.step(&self.ram);
    }
}

impl Bus for NesBus {
    fn read(&mut self, addr: u16) -> u8 {
        match addr {
            // Controller ports win over the APU range
            0x4016 | 0x4017 => self.controllers[(addr - 0x4016) as usize].read(),
            // Internal RAM (mirrored 4x in 0x0000-0x1FFF)
            0x0000..=0x1FFF => self.ram[(addr % 0x800) as usize],
            // PPU registers $2000-$3FFF (mirrored every 8 bytes)
            0x2000..=0x3FFF => self
                .ppu
                .read_register((addr % 8) as u8, &mut self.cart.mapper),
            0x4000..=0x4015 => self.apu.read(addr),
            // Cartridge: PRG RAM and PRG ROM
            0x6000..=0xFFFF => self.cart.mapper.cpu_read(addr),
            // Test mode and expansion: open bus
            _ => 0,
        }
    }

    fn write(&mut self, addr: u16, data: u8) {
        match addr {
            0x4016 => {
                for controller in &mut self.controllers {
                    controller.write(data);
                }
            }
            0x0000..=0x1FFF => self.ram[(addr % 0x800) as usize] = data,
            0x2000..=0x3FFF => {
                self.ppu
                    .write_register((addr % 8) as u8, data, &mut self.cart.mapper)
            }
            // $4017 is the APU frame counter on writes
            0x4000..=0x4017 => self.apu.write(addr, data),
            // Cartridge: PRG RAM and mapper registers
            0x6000..=0xFFFF => self.cart.mapper.cpu_write(addr, data),
            _ => {}
        }
    }
}

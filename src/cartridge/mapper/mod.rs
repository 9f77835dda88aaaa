//! NES mappers for PRG/CHR memory mapping.
//!
//! Mapper0 (NROM), Mapper2 (UxROM), Mapper4 (MMC3), and the [`Board`] sum type the bus and
//! PPU talk to.

use crate::cartridge::mapper::{
    mapper::Mapper, mapper0::Mapper0, mapper2::Mapper2, mapper4::Mapper4,
};

pub mod mapper;

pub mod mapper0;
pub mod mapper2;
pub mod mapper4;

/// Nametable mirroring mode for PPU.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mirroring {
    Horizontal,
    Vertical,
}

/// The closed set of supported boards.
///
/// Enforces the mapper windows: CPU operations only reach the board at $6000 and above, PPU
/// operations only below $2000. Everything outside reads 0 and drops writes.
pub enum Board {
    Nrom(Mapper0),
    Uxrom(Mapper2),
    Mmc3(Mapper4),
}

impl Board {
    fn inner(&self) -> &dyn Mapper {
        match self {
            Board::Nrom(m) => m,
            Board::Uxrom(m) => m,
            Board::Mmc3(m) => m,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Mapper {
        match self {
            Board::Nrom(m) => m,
            Board::Uxrom(m) => m,
            Board::Mmc3(m) => m,
        }
    }

    /// iNES mapper number of this board.
    pub fn id(&self) -> u8 {
        match self {
            Board::Nrom(_) => 0,
            Board::Uxrom(_) => 2,
            Board::Mmc3(_) => 4,
        }
    }

    /// MMC3 scanline IRQ line. Always low on boards without one.
    pub fn irq_pending(&self) -> bool {
        match self {
            Board::Mmc3(m) => m.irq_pending(),
            _ => false,
        }
    }

    /// Copy a 512-byte trainer to $7000. Boards without PRG RAM drop it.
    pub fn load_trainer(&mut self, trainer: &[u8]) -> bool {
        match self.inner_mut().prg_ram_mut() {
            Some(ram) if ram.len() >= 0x1000 + trainer.len() => {
                ram[0x1000..0x1000 + trainer.len()].copy_from_slice(trainer);
                true
            }
            _ => false,
        }
    }
}

impl Mapper for Board {
    fn cpu_read(&self, addr: u16) -> u8 {
        if addr < 0x6000 {
            return 0;
        }
        self.inner().cpu_read(addr)
    }

    fn cpu_write(&mut self, addr: u16, data: u8) {
        if addr >= 0x6000 {
            self.inner_mut().cpu_write(addr, data);
        }
    }

    fn ppu_read(&self, addr: u16) -> u8 {
        if addr >= 0x2000 {
            return 0;
        }
        self.inner().ppu_read(addr)
    }

    fn ppu_write(&mut self, addr: u16, data: u8) {
        if addr < 0x2000 {
            self.inner_mut().ppu_write(addr, data);
        }
    }

    fn mirroring(&self) -> Mirroring {
        self.inner().mirroring()
    }

    fn prg_ram(&self) -> Option<&[u8]> {
        self.inner().prg_ram()
    }

    fn prg_ram_mut(&mut self) -> Option<&mut [u8]> {
        self.inner_mut().prg_ram_mut()
    }
}

//! Mapper trait: the four cartridge-side bus operations.

use crate::cartridge::mapper::Mirroring;

/// Trait for NES cartridge mappers. CPU and PPU reach PRG/CHR exclusively through these.
///
/// `cpu_read`/`cpu_write` only see $6000–$FFFF; `ppu_read`/`ppu_write` only see the
/// pattern-table space $0000–$1FFF. Addresses inside those windows that a board does not
/// decode read as 0 and drop writes.
pub trait Mapper {
    /// Read PRG RAM ($6000–$7FFF) or banked PRG ROM ($8000–$FFFF).
    fn cpu_read(&self, addr: u16) -> u8;
    /// Write PRG RAM or a mapper register. PRG ROM itself is never modified.
    fn cpu_write(&mut self, addr: u16, data: u8);
    /// Read banked CHR ROM/RAM ($0000–$1FFF).
    fn ppu_read(&self, addr: u16) -> u8;
    /// Write CHR RAM; ignored on CHR ROM boards.
    fn ppu_write(&mut self, addr: u16, data: u8);

    /// Current nametable mirroring.
    fn mirroring(&self) -> Mirroring;

    /// Battery-backable PRG RAM, if the board has any.
    fn prg_ram(&self) -> Option<&[u8]> {
        None
    }

    fn prg_ram_mut(&mut self) -> Option<&mut [u8]> {
        None
    }
}

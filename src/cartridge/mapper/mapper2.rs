//! Mapper 2 (UxROM): switchable 16 KiB PRG bank at $8000, last bank fixed at $C000.
//!
//! [UxROM](https://www.nesdev.org/wiki/UxROM): any write to $8000–$FFFF selects the bank
//! (value modulo bank count). 8 KiB PRG RAM at $6000–$7FFF. CHR is normally 8 KiB RAM.

use crate::cartridge::mapper::{Mirroring, mapper::Mapper};

const PRG_BANK: usize = 0x4000;

/// UxROM state: PRG RAM and the selected $8000 bank.
pub struct Mapper2 {
    prg_rom: Vec<u8>,
    chr: Vec<u8>,
    prg_ram: Vec<u8>,
    bank_count: usize,
    selected_bank: usize,
    mirroring: Mirroring,
}

impl Mapper2 {
    pub fn new(prg_rom: Vec<u8>, chr: Vec<u8>, mirroring: Mirroring) -> Self {
        let bank_count = (prg_rom.len() / PRG_BANK).max(1);
        Self {
            prg_rom,
            chr,
            prg_ram: vec![0; 0x2000],
            bank_count,
            selected_bank: 0,
            mirroring,
        }
    }

    fn prg(&self, bank: usize, offset: usize) -> u8 {
        self.prg_rom
            .get(bank * PRG_BANK + offset)
            .copied()
            .unwrap_or(0)
    }
}

impl Mapper for Mapper2 {
    fn cpu_read(&self, addr: u16) -> u8 {
        match addr {
            0x6000..=0x7FFF => self.prg_ram[(addr - 0x6000) as usize],
            0x8000..=0xBFFF => self.prg(self.selected_bank, (addr - 0x8000) as usize),
            0xC000..=0xFFFF => self.prg(self.bank_count - 1, (addr - 0xC000) as usize),
            _ => 0,
        }
    }

    fn cpu_write(&mut self, addr: u16, data: u8) {
        match addr {
            0x6000..=0x7FFF => self.prg_ram[(addr - 0x6000) as usize] = data,
            0x8000..=0xFFFF => {
                self.selected_bank = data as usize % self.bank_count;
                log::debug!("UxROM: PRG bank {} at $8000", self.selected_bank);
            }
            _ => {}
        }
    }

    fn ppu_read(&self, addr: u16) -> u8 {
        self.chr.get(addr as usize).copied().unwrap_or(0)
    }

    fn ppu_write(&mut self, addr: u16, data: u8) {
        // Only 8 KiB CHR RAM boards are writable
        if self.chr.len() == 0x2000 && addr < 0x2000 {
            self.chr[addr as usize] = data;
        }
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    fn prg_ram(&self) -> Option<&[u8]> {
        Some(&self.prg_ram)
    }

    fn prg_ram_mut(&mut self) -> Option<&mut [u8]> {
        Some(&mut self.prg_ram)
    }
}

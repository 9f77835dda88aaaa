//! Mapper 4 (MMC3): bank switching, switchable mirroring, PRG RAM, scanline IRQ.
//!
//! [MMC3](https://www.nesdev.org/wiki/MMC3): Bank select at $8000–$9FFE (even), bank data at
//! $8001–$9FFF (odd). R0/R1 = 2 KiB CHR, R2–R5 = 1 KiB CHR, R6/R7 = 8 KiB PRG. Mirroring at
//! $A000–$BFFE (even). IRQ latch $C000, reload $C001, disable $E000, enable $E001. The IRQ
//! counter is clocked once per rendered scanline by the PPU.

use crate::cartridge::mapper::{Mirroring, mapper::Mapper};

const PRG_WINDOW: usize = 0x2000;
const CHR_WINDOW: usize = 0x0400;

/// MMC3 state: bank registers, resolved window banks, mirroring, PRG RAM, IRQ counter/latch.
pub struct Mapper4 {
    prg_rom: Vec<u8>,
    chr: Vec<u8>,
    chr_is_ram: bool,
    prg_ram: Vec<u8>,
    prg_bank_count: usize,
    chr_bank_count: usize,
    /// Source bank for each 8 KiB window at $8000, $A000, $C000, $E000.
    prg_banks: [usize; 4],
    /// Source bank for each 1 KiB window at $0000..$1C00.
    chr_banks: [usize; 8],
    /// Bank select ($8000): bits 0–2 = register index, bit 6 = PRG mode, bit 7 = CHR A12 invert.
    bank_select: u8,
    /// R0–R5 CHR, R6–R7 PRG.
    regs: [u8; 8],
    prg_mode: bool,
    chr_mode: bool,
    mirroring: Mirroring,
    /// PRG RAM enable (bit 7 of $A001). Stored only; RAM stays enabled for MMC6 compatibility.
    prg_ram_enable: bool,
    /// PRG RAM write protect (bit 6 of $A001). Not enforced for compatibility.
    prg_ram_write_protect: bool,
    irq_latch: u8,
    irq_counter: u8,
    irq_reload: bool,
    irq_enabled: bool,
    irq_pending: bool,
}

impl Mapper4 {
    /// Create MMC3 with PRG ROM and CHR. PRG RAM 8 KiB is allocated for save RAM.
    pub fn new(prg_rom: Vec<u8>, chr: Vec<u8>, chr_is_ram: bool, mirroring: Mirroring) -> Self {
        let prg_bank_count = (prg_rom.len() / PRG_WINDOW).max(1);
        let chr_bank_count = (chr.len() / CHR_WINDOW).max(1);
        Self {
            prg_rom,
            chr,
            chr_is_ram,
            prg_ram: vec![0; 0x2000],
            prg_bank_count,
            chr_bank_count,
            prg_banks: [
                0,
                1 % prg_bank_count,
                prg_bank_count.saturating_sub(2),
                prg_bank_count - 1,
            ],
            chr_banks: [0; 8],
            bank_select: 0,
            regs: [0; 8],
            prg_mode: false,
            chr_mode: false,
            mirroring,
            prg_ram_enable: true,
            prg_ram_write_protect: false,
            irq_latch: 0,
            irq_counter: 0,
            irq_reload: false,
            irq_enabled: false,
            irq_pending: false,
        }
    }

    /// Clock the scanline counter. A pending reload (or an exhausted counter) takes priority
    /// over the decrement; the IRQ is raised only when a decrement lands on zero while enabled.
    pub fn clock_scanline(&mut self) {
        if self.irq_reload || self.irq_counter == 0 {
            self.irq_counter = self.irq_latch;
            self.irq_reload = false;
        } else {
            self.irq_counter -= 1;
            if self.irq_counter == 0 && self.irq_enabled {
                self.irq_pending = true;
            }
        }
    }

    /// IRQ line state; stays asserted until acknowledged by a write to $E000–$FFFE (even).
    pub fn irq_pending(&self) -> bool {
        self.irq_pending
    }

    pub fn irq_counter(&self) -> u8 {
        self.irq_counter
    }

    /// PRG RAM enable/protect bits last written to $A001.
    pub fn prg_ram_protect(&self) -> (bool, bool) {
        (self.prg_ram_enable, self.prg_ram_write_protect)
    }

    /// Recompute the window → bank tables from R0–R7 and the two mode bits.
    fn update_banks(&mut self) {
        let prg = self.prg_bank_count;
        let second_last = prg.saturating_sub(2);
        let r6 = self.regs[6] as usize % prg;
        let r7 = self.regs[7] as usize % prg;

        self.prg_banks = if self.prg_mode {
            [second_last, r7, r6, prg - 1]
        } else {
            [r6, r7, second_last, prg - 1]
        };

        let chr = self.chr_bank_count;
        let r = |i: usize| self.regs[i] as usize;
        let two_k = [
            (r(0) & 0xFE) % chr,
            (r(0) | 0x01) % chr,
            (r(1) & 0xFE) % chr,
            (r(1) | 0x01) % chr,
        ];
        let one_k = [r(2) % chr, r(3) % chr, r(4) % chr, r(5) % chr];

        // CHR mode swaps which half of pattern space gets the 2 KiB pairs
        let (low, high) = if self.chr_mode {
            (one_k, two_k)
        } else {
            (two_k, one_k)
        };
        self.chr_banks[..4].copy_from_slice(&low);
        self.chr_banks[4..].copy_from_slice(&high);

        log::debug!(
            "MMC3: PRG banks {:?}, CHR banks {:?}",
            self.prg_banks,
            self.chr_banks
        );
    }

    fn chr_offset(&self, addr: u16) -> usize {
        let window = (addr as usize / CHR_WINDOW) & 7;
        self.chr_banks[window] * CHR_WINDOW + (addr as usize % CHR_WINDOW)
    }
}

impl Mapper for Mapper4 {
    fn cpu_read(&self, addr: u16) -> u8 {
        match addr {
            0x6000..=0x7FFF => self.prg_ram[(addr - 0x6000) as usize],
            0x8000..=0xFFFF => {
                let window = (addr - 0x8000) as usize / PRG_WINDOW;
                let offset = addr as usize % PRG_WINDOW;
                let phys = self.prg_banks[window] * PRG_WINDOW + offset;
                self.prg_rom.get(phys).copied().unwrap_or(0)
            }
            _ => 0,
        }
    }

    fn cpu_write(&mut self, addr: u16, data: u8) {
        let even = addr & 1 == 0;
        match addr {
            0x6000..=0x7FFF => self.prg_ram[(addr - 0x6000) as usize] = data,
            0x8000..=0x9FFF if even => {
                self.bank_select = data;
                self.prg_mode = data & 0x40 != 0;
                self.chr_mode = data & 0x80 != 0;
            }
            0x8000..=0x9FFF => {
                let r = (self.bank_select & 7) as usize;
                self.regs[r] = data;
                self.update_banks();
            }
            0xA000..=0xBFFF if even => {
                self.mirroring = if data & 1 != 0 {
                    Mirroring::Horizontal
                } else {
                    Mirroring::Vertical
                };
            }
            0xA000..=0xBFFF => {
                self.prg_ram_enable = data & 0x80 != 0;
                self.prg_ram_write_protect = data & 0x40 != 0;
            }
            0xC000..=0xDFFF if even => self.irq_latch = data,
            0xC000..=0xDFFF => self.irq_reload = true,
            0xE000..=0xFFFF if even => {
                self.irq_enabled = false;
                self.irq_pending = false;
            }
            0xE000..=0xFFFF => self.irq_enabled = true,
            _ => {}
        }
    }

    fn ppu_read(&self, addr: u16) -> u8 {
        if addr >= 0x2000 {
            return 0;
        }
        self.chr.get(self.chr_offset(addr)).copied().unwrap_or(0)
    }

    fn ppu_write(&mut self, addr: u16, data: u8) {
        if !self.chr_is_ram || addr >= 0x2000 {
            return;
        }
        let offset = self.chr_offset(addr);
        if let Some(b) = self.chr.get_mut(offset) {
            *b = data;
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

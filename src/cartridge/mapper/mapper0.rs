//! Mapper 0 (NROM): no bank switching, 16/32KB PRG, 8KB CHR.

use crate::cartridge::mapper::{Mirroring, mapper::Mapper};

/// NROM mapper: fixed PRG and CHR, 16KB PRG mirrored across the 32KB window.
pub struct Mapper0 {
    prg_rom: Vec<u8>,
    chr: Vec<u8>,
    chr_is_ram: bool,
    mirroring: Mirroring,
}

impl Mapper0 {
    /// Create Mapper0 with given PRG and CHR. `chr_is_ram` is set for boards whose header
    /// declares no CHR ROM; only then do PPU writes land.
    pub fn new(prg_rom: Vec<u8>, chr: Vec<u8>, chr_is_ram: bool, mirroring: Mirroring) -> Self {
        Self {
            prg_rom,
            chr,
            chr_is_ram,
            mirroring,
        }
    }
}

impl Mapper for Mapper0 {
    fn cpu_read(&self, addr: u16) -> u8 {
        match addr {
            // PRG ROM: $8000-$FFFF, mirror if 16KB
            0x8000..=0xFFFF => {
                let mut offset = (addr - 0x8000) as usize;
                if self.prg_rom.len() == 0x4000 {
                    offset %= 0x4000;
                }
                self.prg_rom.get(offset).copied().unwrap_or(0)
            }
            _ => 0,
        }
    }

    fn cpu_write(&mut self, _addr: u16, _data: u8) {}

    fn ppu_read(&self, addr: u16) -> u8 {
        self.chr.get(addr as usize).copied().unwrap_or(0)
    }

    fn ppu_write(&mut self, addr: u16, data: u8) {
        if self.chr_is_ram {
            if let Some(b) = self.chr.get_mut(addr as usize) {
                *b = data;
            }
        }
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prg_16k() -> Vec<u8> {
        let mut prg = vec![0; 0x4000];
        prg[0x0000] = 0x11;
        prg[0x3FFC] = 0x22;
        prg
    }

    #[test]
    fn sixteen_kib_prg_is_mirrored() {
        let m = Mapper0::new(prg_16k(), vec![0; 0x2000], false, Mirroring::Horizontal);
        assert_eq!(m.cpu_read(0x8000), m.cpu_read(0xC000));
        assert_eq!(m.cpu_read(0xC000), 0x11);
        assert_eq!(m.cpu_read(0xFFFC), 0x22);
    }

    #[test]
    fn thirty_two_kib_prg_is_linear() {
        let mut prg = vec![0; 0x8000];
        prg[0x4000] = 0x99;
        let m = Mapper0::new(prg, vec![0; 0x2000], false, Mirroring::Horizontal);
        assert_eq!(m.cpu_read(0x8000), 0x00);
        assert_eq!(m.cpu_read(0xC000), 0x99);
    }

    #[test]
    fn writes_are_ignored() {
        let mut chr = vec![0; 0x2000];
        chr[0x10] = 0x5A;
        let mut m = Mapper0::new(prg_16k(), chr, false, Mirroring::Vertical);
        m.cpu_write(0x8000, 0xFF);
        m.ppu_write(0x0010, 0xFF);
        assert_eq!(m.cpu_read(0x8000), 0x11);
        assert_eq!(m.ppu_read(0x0010), 0x5A);
        assert_eq!(m.cpu_read(0x6000), 0);
    }

    #[test]
    fn chr_ram_accepts_writes() {
        let mut m = Mapper0::new(prg_16k(), vec![0; 0x2000], true, Mirroring::Vertical);
        m.ppu_write(0x1FFF, 0x42);
        assert_eq!(m.ppu_read(0x1FFF), 0x42);
    }
}

//! NES cartridge loading from iNES format (.nes files).
//!
//! Implements the [iNES](https://www.nesdev.org/wiki/INES) format: 16-byte header (magic "NES\x1A",
//! PRG size in 16 KiB units, CHR size in 8 KiB units, flags 6–7 for mapper, etc.), an optional
//! 512-byte trainer, then PRG ROM, then CHR ROM. CHR may be ROM or RAM depending on the header.
//! [Mapper](https://www.nesdev.org/wiki/Mapper) implements CPU PRG ($6000–$FFFF) and PPU CHR
//! ($0000–$1FFF) address decoding and bank switching.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::cartridge::mapper::{
    Board, Mirroring, mapper::Mapper, mapper0::Mapper0, mapper2::Mapper2, mapper4::Mapper4,
};

const HEADER_LEN: usize = 16;
const TRAINER_LEN: usize = 512;
const PRG_UNIT: usize = 16 * 1024;
const CHR_UNIT: usize = 8 * 1024;

#[derive(Debug, Error)]
pub enum CartridgeError {
    #[error("cartridge truncated in {section}: expected {expected} bytes, found {actual}")]
    Truncated {
        section: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("unsupported mapper {0}")]
    UnsupportedMapper(u8),
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fields extracted from the 16-byte iNES header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CartridgeHeader {
    pub prg_kb: usize,
    pub chr_kb: usize,
    pub mapper_id: u8,
    pub mirroring: Mirroring,
    pub battery: bool,
    pub trainer: bool,
}

impl CartridgeHeader {
    /// Byte 4 = PRG size (16 KiB units), byte 5 = CHR size (8 KiB units), byte 6 bit 0 =
    /// vertical mirroring, bit 1 = battery, bit 2 = trainer, mapper number from the high nibbles
    /// of bytes 6 and 7.
    pub fn parse(raw: &[u8]) -> Result<Self, CartridgeError> {
        if raw.len() < HEADER_LEN {
            return Err(CartridgeError::Truncated {
                section: "header",
                expected: HEADER_LEN,
                actual: raw.len(),
            });
        }
        if &raw[0..4] != b"NES\x1A" {
            log::warn!("missing iNES magic, loading anyway");
        }

        let flags6 = raw[6];
        let flags7 = raw[7];
        Ok(Self {
            prg_kb: raw[4] as usize * 16,
            chr_kb: raw[5] as usize * 8,
            mapper_id: (flags6 >> 4) | (flags7 & 0xF0),
            mirroring: if flags6 & 0b001 != 0 {
                Mirroring::Vertical
            } else {
                Mirroring::Horizontal
            },
            battery: flags6 & 0b010 != 0,
            trainer: flags6 & 0b100 != 0,
        })
    }
}

/// Cartridge: header fields, the trainer (if any) and the board that owns PRG/CHR.
/// CPU reaches PRG via the bus at $6000–$FFFF; PPU reaches CHR at $0000–$1FFF (pattern tables).
pub struct Cartridge {
    pub header: CartridgeHeader,
    pub trainer: Option<Vec<u8>>,
    pub mapper: Board,
}

impl Cartridge {
    /// Load cartridge from an iNES file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CartridgeError> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| CartridgeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&data)
    }

    /// Slice an in-memory iNES image into trainer, PRG and CHR and build the matching board.
    pub fn from_bytes(data: &[u8]) -> Result<Self, CartridgeError> {
        let header = CartridgeHeader::parse(data)?;

        let mut offset = HEADER_LEN;
        let trainer = if header.trainer {
            let t = slice(data, offset, TRAINER_LEN, "trainer")?;
            offset += TRAINER_LEN;
            Some(t.to_vec())
        } else {
            None
        };

        let prg_len = header.prg_kb * 1024;
        let prg_rom = slice(data, offset, prg_len, "PRG ROM")?.to_vec();
        offset += prg_len;

        let chr_len = header.chr_kb * 1024;
        let chr_is_ram = chr_len == 0;
        let chr = if chr_is_ram {
            vec![0; CHR_UNIT] // No CHR ROM → 8 KiB CHR RAM
        } else {
            slice(data, offset, chr_len, "CHR ROM")?.to_vec()
        };

        log::info!(
            "PRG ROM: {} KiB ({} banks), CHR: {} KiB{}",
            header.prg_kb,
            prg_len / PRG_UNIT,
            chr.len() / 1024,
            if chr_is_ram { " RAM" } else { "" }
        );
        log::info!(
            "mapper {}, {:?} mirroring, battery: {}, trainer: {}",
            header.mapper_id,
            header.mirroring,
            header.battery,
            header.trainer
        );

        let mut mapper = match header.mapper_id {
            0 => Board::Nrom(Mapper0::new(prg_rom, chr, chr_is_ram, header.mirroring)),
            2 => Board::Uxrom(Mapper2::new(prg_rom, chr, header.mirroring)),
            4 => Board::Mmc3(Mapper4::new(prg_rom, chr, chr_is_ram, header.mirroring)),
            id => return Err(CartridgeError::UnsupportedMapper(id)),
        };

        if let Some(t) = &trainer {
            if !mapper.load_trainer(t) {
                log::warn!("mapper {} has no PRG RAM, trainer dropped", header.mapper_id);
            }
        }

        Ok(Self {
            header,
            trainer,
            mapper,
        })
    }

    /// Current mirroring; MMC3 can change it at run time.
    pub fn mirroring(&self) -> Mirroring {
        self.mapper.mirroring()
    }

    /// Battery-backable PRG RAM contents, if the board has PRG RAM.
    pub fn prg_ram(&self) -> Option<&[u8]> {
        self.mapper.prg_ram()
    }

    /// Restore PRG RAM from a save. Extra bytes are ignored; a short save fills the front.
    pub fn load_prg_ram(&mut self, data: &[u8]) -> bool {
        match self.mapper.prg_ram_mut() {
            Some(ram) => {
                let n = ram.len().min(data.len());
                ram[..n].copy_from_slice(&data[..n]);
                true
            }
            None => false,
        }
    }
}

fn slice<'a>(
    data: &'a [u8],
    offset: usize,
    len: usize,
    section: &'static str,
) -> Result<&'a [u8], CartridgeError> {
    data.get(offset..offset + len)
        .ok_or(CartridgeError::Truncated {
            section,
            expected: len,
            actual: data.len().saturating_sub(offset),
        })
}

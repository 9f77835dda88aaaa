//! NES cartridge loading and mapper support.
//!
//! - **cartridge**: Loads iNES (.nes) images, holds the header fields and the board.
//! - **mapper**: NROM (0), UxROM (2), MMC3 (4); PRG/CHR bank switching and nametable mirroring.

pub mod cartridge;
pub mod mapper;

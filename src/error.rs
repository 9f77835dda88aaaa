//! Top-level error type returned by the console.

use thiserror::Error;

use crate::{cartridge::cartridge::CartridgeError, cpu::cpu::CpuError};

/// Any fault that stops emulation: a bad cartridge at load time or an undecodable opcode
/// while stepping.
#[derive(Debug, Error)]
pub enum EmuError {
    #[error(transparent)]
    Cartridge(#[from] CartridgeError),
    #[error(transparent)]
    Cpu(#[from] CpuError),
}

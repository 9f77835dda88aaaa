//! 6502 addressing modes.
//!
//! Resolution reads the operand bytes that follow the opcode and computes the effective
//! address, but never moves PC. The CPU advances PC by [`AddressingMode::operand_len`]
//! afterwards, so modes can be probed without executing anything.

use crate::bus::Bus;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressingMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    /// JMP only; reproduces the page-wrap bug on the pointer high byte.
    Indirect,
    IndirectX,
    IndirectY,
    Relative,
}

impl AddressingMode {
    /// Operand bytes following the opcode.
    pub const fn operand_len(self) -> u16 {
        match self {
            Self::Implied | Self::Accumulator => 0,
            Self::Immediate
            | Self::ZeroPage
            | Self::ZeroPageX
            | Self::ZeroPageY
            | Self::IndirectX
            | Self::IndirectY
            | Self::Relative => 1,
            Self::Absolute | Self::AbsoluteX | Self::AbsoluteY | Self::Indirect => 2,
        }
    }
}

/// Result of resolving one instruction's operand. Lives for a single step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Operand {
    pub mode: AddressingMode,
    /// Effective address; the branch target for `Relative`.
    pub addr: Option<u16>,
    /// Operand value when it is encoded in the instruction (`Immediate`).
    pub value: Option<u8>,
    /// Address before indexing (or the pointer location for indirect modes).
    pub base: Option<u16>,
    /// Raw operand bytes, `operand_len` of them meaningful.
    pub raw: [u8; 2],
    /// Indexing or the branch target left the base page.
    pub page_crossed: bool,
}

impl Operand {
    fn new(mode: AddressingMode, raw: [u8; 2]) -> Self {
        Self {
            mode,
            addr: None,
            value: None,
            base: None,
            raw,
            page_crossed: false,
        }
    }

    fn at(mut self, addr: u16) -> Self {
        self.addr = Some(addr);
        self
    }

    fn indexed(mut self, base: u16, addr: u16) -> Self {
        self.base = Some(base);
        self.addr = Some(addr);
        self.page_crossed = (base ^ addr) & 0xFF00 != 0;
        self
    }

    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw[..self.mode.operand_len() as usize]
    }
}

/// Resolve `mode` for the operand bytes starting at `pc` (the byte after the opcode).
pub fn resolve<B: Bus>(bus: &mut B, pc: u16, x: u8, y: u8, mode: AddressingMode) -> Operand {
    let mut raw = [0; 2];
    for (i, byte) in raw.iter_mut().enumerate().take(mode.operand_len() as usize) {
        *byte = bus.read(pc.wrapping_add(i as u16));
    }
    let lo = raw[0];
    let word = u16::from_le_bytes(raw);
    let op = Operand::new(mode, raw);

    match mode {
        AddressingMode::Implied | AddressingMode::Accumulator => op,
        AddressingMode::Immediate => Operand {
            value: Some(lo),
            ..op
        },
        AddressingMode::ZeroPage => op.at(lo as u16),
        // Zero-page indexing wraps inside page 0
        AddressingMode::ZeroPageX => Operand {
            base: Some(lo as u16),
            ..op.at(lo.wrapping_add(x) as u16)
        },
        AddressingMode::ZeroPageY => Operand {
            base: Some(lo as u16),
            ..op.at(lo.wrapping_add(y) as u16)
        },
        AddressingMode::Absolute => op.at(word),
        AddressingMode::AbsoluteX => op.indexed(word, word.wrapping_add(x as u16)),
        AddressingMode::AbsoluteY => op.indexed(word, word.wrapping_add(y as u16)),
        AddressingMode::Indirect => {
            // High byte comes from the same page when the pointer sits at $xxFF
            let hi_ptr = (word & 0xFF00) | (word.wrapping_add(1) & 0x00FF);
            let target = u16::from_le_bytes([bus.read(word), bus.read(hi_ptr)]);
            Operand {
                base: Some(word),
                ..op.at(target)
            }
        }
        AddressingMode::IndirectX => Operand {
            base: Some(lo.wrapping_add(x) as u16),
            ..op.at(bus.read_indirect_x(lo, x))
        },
        AddressingMode::IndirectY => {
            let (addr, base) = bus.read_indirect_y(lo, y);
            op.indexed(base, addr)
        }
        AddressingMode::Relative => {
            let next = pc.wrapping_add(1);
            let target = next.wrapping_add(lo as i8 as u16);
            op.indexed(next, target)
        }
    }
}

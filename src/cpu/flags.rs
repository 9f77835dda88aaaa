//! 6502 processor status register (P) flag bits.

pub const FLAG_CARRY: u8 = 1 << 0;
pub const FLAG_ZERO: u8 = 1 << 1;
pub const FLAG_INTERRUPT_DISABLE: u8 = 1 << 2;
pub const FLAG_DECIMAL: u8 = 1 << 3; // 2A03 has no BCD; stored only
pub const FLAG_BREAK: u8 = 1 << 4; // Only exists in pushed copies of P
pub const FLAG_UNUSED: u8 = 1 << 5; // Always 1 when read on 6502
pub const FLAG_OVERFLOW: u8 = 1 << 6;
pub const FLAG_NEGATIVE: u8 = 1 << 7;

/// The individual status flags. P is always derived from these via [`Flags::bits`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Flags {
    pub carry: bool,
    pub zero: bool,
    pub interrupt_disable: bool,
    pub decimal: bool,
    pub break_command: bool,
    pub overflow: bool,
    pub negative: bool,
}

impl Flags {
    pub fn from_bits(p: u8) -> Self {
        Self {
            carry: p & FLAG_CARRY != 0,
            zero: p & FLAG_ZERO != 0,
            interrupt_disable: p & FLAG_INTERRUPT_DISABLE != 0,
            decimal: p & FLAG_DECIMAL != 0,
            break_command: p & FLAG_BREAK != 0,
            overflow: p & FLAG_OVERFLOW != 0,
            negative: p & FLAG_NEGATIVE != 0,
        }
    }

    /// Status byte; bit 5 is always set.
    pub fn bits(&self) -> u8 {
        let mut p = FLAG_UNUSED;
        for (set, bit) in [
            (self.carry, FLAG_CARRY),
            (self.zero, FLAG_ZERO),
            (self.interrupt_disable, FLAG_INTERRUPT_DISABLE),
            (self.decimal, FLAG_DECIMAL),
            (self.break_command, FLAG_BREAK),
            (self.overflow, FLAG_OVERFLOW),
            (self.negative, FLAG_NEGATIVE),
        ] {
            if set {
                p |= bit;
            }
        }
        p
    }

    /// Copy of P as pushed to the stack: B set for PHP/BRK, clear for NMI/IRQ.
    pub fn to_stack(&self, brk: bool) -> u8 {
        let p = self.bits() & !FLAG_BREAK;
        if brk { p | FLAG_BREAK } else { p }
    }

    /// Restore from a pulled byte (PLP/RTI). B does not survive the round trip.
    pub fn from_stack(p: u8) -> Self {
        Self {
            break_command: false,
            ..Self::from_bits(p)
        }
    }

    pub fn set_zn(&mut self, value: u8) {
        self.zero = value == 0;
        self.negative = value & 0x80 != 0;
    }
}

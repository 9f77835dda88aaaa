//! 6502 interpreter.
//!
//! One [`CPU::step`] fetches an opcode, decodes it through the instruction table, resolves the
//! operand without moving PC, advances PC past the instruction, then executes. Memory values
//! are read only by operations that use them, so a store never touches the target register
//! with a stray read.

use thiserror::Error;

use crate::{
    bus::Bus,
    cpu::{
        addressing::{self, AddressingMode, Operand},
        flags::{FLAG_INTERRUPT_DISABLE, FLAG_UNUSED, Flags},
        instructions::{Instruction, Operation, decode},
        trace,
    },
};

const NMI_VECTOR: u16 = 0xFFFA;
const RESET_VECTOR: u16 = 0xFFFC;
const IRQ_VECTOR: u16 = 0xFFFE;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum CpuError {
    /// PC is left on the faulting opcode.
    #[error("unknown opcode ${opcode:02X} at ${pc:04X}")]
    UnknownOpcode { pc: u16, opcode: u8 },
}

pub struct CPU<B: Bus> {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub flags: Flags,
    pub cycles: u64,
    pub bus: B,
}

impl<B: Bus> CPU<B> {
    /// Power-on register state; PC is 0 until [`reset`](Self::reset) or
    /// [`reset_to`](Self::reset_to).
    pub fn new(bus: B) -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFD,
            pc: 0,
            flags: Flags::from_bits(FLAG_INTERRUPT_DISABLE | FLAG_UNUSED),
            cycles: 0,
            bus,
        }
    }

    pub fn reset(&mut self) {
        let pc = self.bus.read_word(RESET_VECTOR);
        log::info!("reset vector ${pc:04X}");
        self.reset_to(pc);
    }

    /// Reset registers and start at `pc` instead of the reset vector (nestest automation).
    pub fn reset_to(&mut self, pc: u16) {
        self.pc = pc;
        self.sp = 0xFD; // resets at 0xFD instead of 0xFF for some reason
        self.flags = Flags::from_bits(FLAG_INTERRUPT_DISABLE | FLAG_UNUSED);
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.cycles = 7;
    }

    /// Status register P derived from the flags.
    pub fn status(&self) -> u8 {
        self.flags.bits()
    }

    /// Execute one instruction and return the cycles it took.
    pub fn step(&mut self) -> Result<u32, CpuError> {
        let pc = self.pc;
        let opcode = self.bus.read(pc);
        let instr = decode(opcode).ok_or(CpuError::UnknownOpcode { pc, opcode })?;

        let operand = self.resolve(instr.mode);
        if log::log_enabled!(log::Level::Trace) {
            self.trace(pc, instr, &operand);
        }
        self.pc = pc.wrapping_add(1 + instr.mode.operand_len());

        let mut cycles = instr.cycles as u32;
        if instr.page_penalty && operand.page_crossed {
            cycles += 1;
        }
        cycles += self.execute(instr.op, &operand);

        self.cycles += cycles as u64;
        Ok(cycles)
    }

    /// Resolve the operand of an instruction whose opcode sits at PC. PC is not moved.
    pub fn resolve(&mut self, mode: AddressingMode) -> Operand {
        addressing::resolve(&mut self.bus, self.pc.wrapping_add(1), self.x, self.y, mode)
    }

    /// Non-maskable interrupt (PPU VBlank).
    pub fn trigger_nmi(&mut self) {
        self.interrupt(NMI_VECTOR);
    }

    /// Maskable interrupt (cartridge IRQ line). Ignored while I is set; returns whether it was
    /// taken.
    pub fn trigger_irq(&mut self) -> bool {
        if self.flags.interrupt_disable {
            return false;
        }
        self.interrupt(IRQ_VECTOR);
        true
    }

    fn interrupt(&mut self, vector: u16) {
        self.push_word(self.pc);
        self.push(self.flags.to_stack(false));
        self.flags.interrupt_disable = true;
        self.pc = self.bus.read_word(vector);
        self.cycles += 7;
    }

    fn trace(&self, pc: u16, instr: &Instruction, operand: &Operand) {
        let regs = trace::Registers {
            a: self.a,
            x: self.x,
            y: self.y,
            p: self.status(),
            sp: self.sp,
            cycles: self.cycles,
        };
        log::trace!("{}", trace::format_line(pc, instr, operand, &regs));
    }

    /// Run `op`; returns extra cycles beyond the table count (branches only).
    fn execute(&mut self, op: Operation, operand: &Operand) -> u32 {
        use Operation::*;

        match op {
            Lda => {
                self.a = self.load(operand);
                self.flags.set_zn(self.a);
            }
            Ldx => {
                self.x = self.load(operand);
                self.flags.set_zn(self.x);
            }
            Ldy => {
                self.y = self.load(operand);
                self.flags.set_zn(self.y);
            }
            Sta => self.store(operand, self.a),
            Stx => self.store(operand, self.x),
            Sty => self.store(operand, self.y),

            Tax => {
                self.x = self.a;
                self.flags.set_zn(self.x);
            }
            Tay => {
                self.y = self.a;
                self.flags.set_zn(self.y);
            }
            Txa => {
                self.a = self.x;
                self.flags.set_zn(self.a);
            }
            Tya => {
                self.a = self.y;
                self.flags.set_zn(self.a);
            }
            Tsx => {
                self.x = self.sp;
                self.flags.set_zn(self.x);
            }
            Txs => self.sp = self.x,

            Pha => self.push(self.a),
            Php => self.push(self.flags.to_stack(true)),
            Pla => {
                self.a = self.pop();
                self.flags.set_zn(self.a);
            }
            Plp => {
                let p = self.pop();
                self.flags = Flags::from_stack(p);
            }

            And => {
                let v = self.load(operand);
                self.a &= v;
                self.flags.set_zn(self.a);
            }
            Ora => {
                let v = self.load(operand);
                self.a |= v;
                self.flags.set_zn(self.a);
            }
            Eor => {
                let v = self.load(operand);
                self.a ^= v;
                self.flags.set_zn(self.a);
            }
            Adc => {
                let v = self.load(operand);
                self.adc(v);
            }
            Sbc => {
                let v = self.load(operand);
                self.sbc(v);
            }
            Cmp => {
                let v = self.load(operand);
                self.compare(self.a, v);
            }
            Cpx => {
                let v = self.load(operand);
                self.compare(self.x, v);
            }
            Cpy => {
                let v = self.load(operand);
                self.compare(self.y, v);
            }
            Bit => {
                let v = self.load(operand);
                self.flags.zero = self.a & v == 0;
                self.flags.overflow = v & 0x40 != 0;
                self.flags.negative = v & 0x80 != 0;
            }

            Inc => {
                let r = self.modify(operand, |_, v| v.wrapping_add(1));
                self.flags.set_zn(r);
            }
            Dec => {
                let r = self.modify(operand, |_, v| v.wrapping_sub(1));
                self.flags.set_zn(r);
            }
            Inx => {
                self.x = self.x.wrapping_add(1);
                self.flags.set_zn(self.x);
            }
            Iny => {
                self.y = self.y.wrapping_add(1);
                self.flags.set_zn(self.y);
            }
            Dex => {
                self.x = self.x.wrapping_sub(1);
                self.flags.set_zn(self.x);
            }
            Dey => {
                self.y = self.y.wrapping_sub(1);
                self.flags.set_zn(self.y);
            }

            Asl => {
                let r = self.asl(operand);
                self.flags.set_zn(r);
            }
            Lsr => {
                let r = self.lsr(operand);
                self.flags.set_zn(r);
            }
            Rol => {
                let r = self.rol(operand);
                self.flags.set_zn(r);
            }
            Ror => {
                let r = self.ror(operand);
                self.flags.set_zn(r);
            }

            Bcc => return self.branch(operand, !self.flags.carry),
            Bcs => return self.branch(operand, self.flags.carry),
            Beq => return self.branch(operand, self.flags.zero),
            Bne => return self.branch(operand, !self.flags.zero),
            Bmi => return self.branch(operand, self.flags.negative),
            Bpl => return self.branch(operand, !self.flags.negative),
            Bvs => return self.branch(operand, self.flags.overflow),
            Bvc => return self.branch(operand, !self.flags.overflow),

            Jmp => self.pc = operand.addr.unwrap_or(self.pc),
            Jsr => {
                // Return address is the last byte of the JSR
                self.push_word(self.pc.wrapping_sub(1));
                self.pc = operand.addr.unwrap_or(self.pc);
            }
            Rts => self.pc = self.pop_word().wrapping_add(1),
            Rti => {
                let p = self.pop();
                self.flags = Flags::from_stack(p);
                self.pc = self.pop_word();
            }
            Brk => {
                // Skips the padding byte after the opcode
                self.push_word(self.pc.wrapping_add(1));
                self.push(self.flags.to_stack(true));
                self.flags.interrupt_disable = true;
                self.pc = self.bus.read_word(IRQ_VECTOR);
            }

            Clc => self.flags.carry = false,
            Sec => self.flags.carry = true,
            Cli => self.flags.interrupt_disable = false,
            Sei => self.flags.interrupt_disable = true,
            Cld => self.flags.decimal = false,
            Sed => self.flags.decimal = true,
            Clv => self.flags.overflow = false,

            // Operand bytes are skipped, never read
            Nop => {}

            Lax => {
                let v = self.load(operand);
                self.a = v;
                self.x = v;
                self.flags.set_zn(v);
            }
            Sax => self.store(operand, self.a & self.x),
            Dcp => {
                let r = self.modify(operand, |_, v| v.wrapping_sub(1));
                self.compare(self.a, r);
            }
            Isb => {
                let r = self.modify(operand, |_, v| v.wrapping_add(1));
                self.sbc(r);
            }
            Slo => {
                let r = self.asl(operand);
                self.a |= r;
                self.flags.set_zn(self.a);
            }
            Rla => {
                let r = self.rol(operand);
                self.a &= r;
                self.flags.set_zn(self.a);
            }
            Sre => {
                let r = self.lsr(operand);
                self.a ^= r;
                self.flags.set_zn(self.a);
            }
            Rra => {
                let r = self.ror(operand);
                self.adc(r);
            }
        }
        0
    }

    /// Operand value: immediate byte, memory at the effective address, or A.
    fn load(&mut self, operand: &Operand) -> u8 {
        match (operand.value, operand.addr) {
            (Some(v), _) => v,
            (None, Some(addr)) => self.bus.read(addr),
            (None, None) => self.a,
        }
    }

    fn store(&mut self, operand: &Operand, value: u8) {
        if let Some(addr) = operand.addr {
            self.bus.write(addr, value);
        }
    }

    /// Read-modify-write on memory or A: one read, one write. Returns the written value.
    fn modify(&mut self, operand: &Operand, f: impl FnOnce(&mut Flags, u8) -> u8) -> u8 {
        let value = self.load(operand);
        let result = f(&mut self.flags, value);
        match operand.addr {
            Some(addr) => self.bus.write(addr, result),
            None => self.a = result,
        }
        result
    }

    fn asl(&mut self, operand: &Operand) -> u8 {
        self.modify(operand, |flags, v| {
            flags.carry = v & 0x80 != 0;
            v << 1
        })
    }

    fn lsr(&mut self, operand: &Operand) -> u8 {
        self.modify(operand, |flags, v| {
            flags.carry = v & 0x01 != 0;
            v >> 1
        })
    }

    fn rol(&mut self, operand: &Operand) -> u8 {
        self.modify(operand, |flags, v| {
            let carry_in = flags.carry as u8;
            flags.carry = v & 0x80 != 0;
            (v << 1) | carry_in
        })
    }

    fn ror(&mut self, operand: &Operand) -> u8 {
        self.modify(operand, |flags, v| {
            let carry_in = (flags.carry as u8) << 7;
            flags.carry = v & 0x01 != 0;
            (v >> 1) | carry_in
        })
    }

    /// A + value + C. V is set when both inputs share a sign the result does not.
    fn adc(&mut self, value: u8) {
        let sum = self.a as u16 + value as u16 + self.flags.carry as u16;
        let result = sum as u8;
        self.flags.carry = sum > 0xFF;
        self.flags.overflow = !(self.a ^ value) & (self.a ^ result) & 0x80 != 0;
        self.a = result;
        self.flags.set_zn(result);
    }

    /// A - value - !C, as ADC of the one's complement.
    fn sbc(&mut self, value: u8) {
        self.adc(value ^ 0xFF);
    }

    fn compare(&mut self, register: u8, value: u8) {
        let result = register.wrapping_sub(value);
        self.flags.carry = register >= value;
        self.flags.zero = register == value;
        self.flags.negative = result & 0x80 != 0;
    }

    /// Taken branch: +1 cycle, +1 more when the target is on another page.
    fn branch(&mut self, operand: &Operand, condition: bool) -> u32 {
        if !condition {
            return 0;
        }
        let Some(target) = operand.addr else {
            return 0;
        };
        self.pc = target;
        if operand.page_crossed { 2 } else { 1 }
    }

    fn push(&mut self, value: u8) {
        let addr = 0x0100 | self.sp as u16;
        self.bus.write(addr, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    fn pop(&mut self) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        let addr = 0x0100 | self.sp as u16;
        self.bus.read(addr)
    }

    /// High byte first, so the word sits little-endian in memory.
    fn push_word(&mut self, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.push(hi);
        self.push(lo);
    }

    fn pop_word(&mut self) -> u16 {
        let lo = self.pop();
        let hi = self.pop();
        u16::from_le_bytes([lo, hi])
    }
}

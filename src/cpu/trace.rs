//! nestest-style trace lines for `log::trace!`.
//!
//! `C000  4C F5 C5  JMP $C5F5                       A:00 X:00 Y:00 P:24 SP:FD CYC:7`
//!
//! Only the operand bytes and the resolved addresses are shown; memory values are not
//! re-read, since a read can have side effects on PPU and controller registers.

use crate::cpu::{
    addressing::{AddressingMode, Operand},
    instructions::Instruction,
};

/// Register snapshot taken before the instruction executes.
pub struct Registers {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub p: u8,
    pub sp: u8,
    pub cycles: u64,
}

/// Assembler syntax for one instruction, e.g. `LDA ($80),Y @ 0305`.
pub fn disassemble(instr: &Instruction, op: &Operand) -> String {
    let m = instr.op.mnemonic();
    let addr = op.addr.unwrap_or(0);
    let base = op.base.unwrap_or(0);
    let [lo, _] = op.raw;
    match op.mode {
        AddressingMode::Implied => m.to_string(),
        AddressingMode::Accumulator => format!("{m} A"),
        AddressingMode::Immediate => format!("{m} #${lo:02X}"),
        AddressingMode::ZeroPage => format!("{m} ${addr:02X}"),
        AddressingMode::ZeroPageX => format!("{m} ${lo:02X},X @ {addr:02X}"),
        AddressingMode::ZeroPageY => format!("{m} ${lo:02X},Y @ {addr:02X}"),
        AddressingMode::Absolute | AddressingMode::Relative => format!("{m} ${addr:04X}"),
        AddressingMode::AbsoluteX => format!("{m} ${base:04X},X @ {addr:04X}"),
        AddressingMode::AbsoluteY => format!("{m} ${base:04X},Y @ {addr:04X}"),
        AddressingMode::Indirect => format!("{m} (${base:04X}) = {addr:04X}"),
        AddressingMode::IndirectX => format!("{m} (${lo:02X},X) @ {base:02X} = {addr:04X}"),
        AddressingMode::IndirectY => format!("{m} (${lo:02X}),Y = {base:04X} @ {addr:04X}"),
    }
}

/// Full trace line for the instruction at `pc`.
pub fn format_line(pc: u16, instr: &Instruction, op: &Operand, regs: &Registers) -> String {
    let mut bytes = format!("{:02X}", instr.opcode);
    for b in op.raw_bytes() {
        bytes.push_str(&format!(" {b:02X}"));
    }
    let marker = if instr.unofficial { '*' } else { ' ' };
    format!(
        "{pc:04X}  {bytes:<8} {marker}{:<31} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
        disassemble(instr, op),
        regs.a,
        regs.x,
        regs.y,
        regs.p,
        regs.sp,
        regs.cycles
    )
}

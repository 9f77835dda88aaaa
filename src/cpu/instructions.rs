//! Opcode table: byte → (operation, addressing mode, base cycles).
//!
//! Built once at compile time. A duplicate opcode in the source lists fails the build; a byte
//! with no entry (the JAM/KIL family and the unstable undocumented opcodes) is a decode error.

use crate::cpu::addressing::AddressingMode::{self, *};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
    // Undocumented, stable on the 2A03
    Lax,
    Sax,
    Dcp,
    Isb,
    Slo,
    Rla,
    Sre,
    Rra,
}

impl Operation {
    pub fn mnemonic(self) -> &'static str {
        use Operation::*;
        match self {
            Adc => "ADC",
            And => "AND",
            Asl => "ASL",
            Bcc => "BCC",
            Bcs => "BCS",
            Beq => "BEQ",
            Bit => "BIT",
            Bmi => "BMI",
            Bne => "BNE",
            Bpl => "BPL",
            Brk => "BRK",
            Bvc => "BVC",
            Bvs => "BVS",
            Clc => "CLC",
            Cld => "CLD",
            Cli => "CLI",
            Clv => "CLV",
            Cmp => "CMP",
            Cpx => "CPX",
            Cpy => "CPY",
            Dec => "DEC",
            Dex => "DEX",
            Dey => "DEY",
            Eor => "EOR",
            Inc => "INC",
            Inx => "INX",
            Iny => "INY",
            Jmp => "JMP",
            Jsr => "JSR",
            Lda => "LDA",
            Ldx => "LDX",
            Ldy => "LDY",
            Lsr => "LSR",
            Nop => "NOP",
            Ora => "ORA",
            Pha => "PHA",
            Php => "PHP",
            Pla => "PLA",
            Plp => "PLP",
            Rol => "ROL",
            Ror => "ROR",
            Rti => "RTI",
            Rts => "RTS",
            Sbc => "SBC",
            Sec => "SEC",
            Sed => "SED",
            Sei => "SEI",
            Sta => "STA",
            Stx => "STX",
            Sty => "STY",
            Tax => "TAX",
            Tay => "TAY",
            Tsx => "TSX",
            Txa => "TXA",
            Txs => "TXS",
            Tya => "TYA",
            Lax => "LAX",
            Sax => "SAX",
            Dcp => "DCP",
            Isb => "ISB",
            Slo => "SLO",
            Rla => "RLA",
            Sre => "SRE",
            Rra => "RRA",
        }
    }
}

/// One decoded opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: u8,
    pub op: Operation,
    pub mode: AddressingMode,
    /// Base cycle count, before page-cross and branch penalties.
    pub cycles: u8,
    /// +1 cycle when indexing crosses a page (read instructions only).
    pub page_penalty: bool,
    pub unofficial: bool,
}

type Entry = (u8, Operation, AddressingMode, u8, bool);

use Operation::*;

#[rustfmt::skip]
const OFFICIAL: &[Entry] = &[
    (0x69, Adc, Immediate, 2, false), (0x65, Adc, ZeroPage, 3, false), (0x75, Adc, ZeroPageX, 4, false),
    (0x6D, Adc, Absolute, 4, false), (0x7D, Adc, AbsoluteX, 4, true), (0x79, Adc, AbsoluteY, 4, true),
    (0x61, Adc, IndirectX, 6, false), (0x71, Adc, IndirectY, 5, true),

    (0x29, And, Immediate, 2, false), (0x25, And, ZeroPage, 3, false), (0x35, And, ZeroPageX, 4, false),
    (0x2D, And, Absolute, 4, false), (0x3D, And, AbsoluteX, 4, true), (0x39, And, AbsoluteY, 4, true),
    (0x21, And, IndirectX, 6, false), (0x31, And, IndirectY, 5, true),

    (0x0A, Asl, Accumulator, 2, false), (0x06, Asl, ZeroPage, 5, false), (0x16, Asl, ZeroPageX, 6, false),
    (0x0E, Asl, Absolute, 6, false), (0x1E, Asl, AbsoluteX, 7, false),

    (0x90, Bcc, Relative, 2, false), (0xB0, Bcs, Relative, 2, false), (0xF0, Beq, Relative, 2, false),
    (0x30, Bmi, Relative, 2, false), (0xD0, Bne, Relative, 2, false), (0x10, Bpl, Relative, 2, false),
    (0x50, Bvc, Relative, 2, false), (0x70, Bvs, Relative, 2, false),

    (0x24, Bit, ZeroPage, 3, false), (0x2C, Bit, Absolute, 4, false),
    (0x00, Brk, Implied, 7, false),

    (0x18, Clc, Implied, 2, false), (0xD8, Cld, Implied, 2, false), (0x58, Cli, Implied, 2, false),
    (0xB8, Clv, Implied, 2, false),

    (0xC9, Cmp, Immediate, 2, false), (0xC5, Cmp, ZeroPage, 3, false), (0xD5, Cmp, ZeroPageX, 4, false),
    (0xCD, Cmp, Absolute, 4, false), (0xDD, Cmp, AbsoluteX, 4, true), (0xD9, Cmp, AbsoluteY, 4, true),
    (0xC1, Cmp, IndirectX, 6, false), (0xD1, Cmp, IndirectY, 5, true),
    (0xE0, Cpx, Immediate, 2, false), (0xE4, Cpx, ZeroPage, 3, false), (0xEC, Cpx, Absolute, 4, false),
    (0xC0, Cpy, Immediate, 2, false), (0xC4, Cpy, ZeroPage, 3, false), (0xCC, Cpy, Absolute, 4, false),

    (0xC6, Dec, ZeroPage, 5, false), (0xD6, Dec, ZeroPageX, 6, false), (0xCE, Dec, Absolute, 6, false),
    (0xDE, Dec, AbsoluteX, 7, false),
    (0xCA, Dex, Implied, 2, false), (0x88, Dey, Implied, 2, false),

    (0x49, Eor, Immediate, 2, false), (0x45, Eor, ZeroPage, 3, false), (0x55, Eor, ZeroPageX, 4, false),
    (0x4D, Eor, Absolute, 4, false), (0x5D, Eor, AbsoluteX, 4, true), (0x59, Eor, AbsoluteY, 4, true),
    (0x41, Eor, IndirectX, 6, false), (0x51, Eor, IndirectY, 5, true),

    (0xE6, Inc, ZeroPage, 5, false), (0xF6, Inc, ZeroPageX, 6, false), (0xEE, Inc, Absolute, 6, false),
    (0xFE, Inc, AbsoluteX, 7, false),
    (0xE8, Inx, Implied, 2, false), (0xC8, Iny, Implied, 2, false),

    (0x4C, Jmp, Absolute, 3, false), (0x6C, Jmp, Indirect, 5, false),
    (0x20, Jsr, Absolute, 6, false),

    (0xA9, Lda, Immediate, 2, false), (0xA5, Lda, ZeroPage, 3, false), (0xB5, Lda, ZeroPageX, 4, false),
    (0xAD, Lda, Absolute, 4, false), (0xBD, Lda, AbsoluteX, 4, true), (0xB9, Lda, AbsoluteY, 4, true),
    (0xA1, Lda, IndirectX, 6, false), (0xB1, Lda, IndirectY, 5, true),
    (0xA2, Ldx, Immediate, 2, false), (0xA6, Ldx, ZeroPage, 3, false), (0xB6, Ldx, ZeroPageY, 4, false),
    (0xAE, Ldx, Absolute, 4, false), (0xBE, Ldx, AbsoluteY, 4, true),
    (0xA0, Ldy, Immediate, 2, false), (0xA4, Ldy, ZeroPage, 3, false), (0xB4, Ldy, ZeroPageX, 4, false),
    (0xAC, Ldy, Absolute, 4, false), (0xBC, Ldy, AbsoluteX, 4, true),

    (0x4A, Lsr, Accumulator, 2, false), (0x46, Lsr, ZeroPage, 5, false), (0x56, Lsr, ZeroPageX, 6, false),
    (0x4E, Lsr, Absolute, 6, false), (0x5E, Lsr, AbsoluteX, 7, false),

    (0xEA, Nop, Implied, 2, false),

    (0x09, Ora, Immediate, 2, false), (0x05, Ora, ZeroPage, 3, false), (0x15, Ora, ZeroPageX, 4, false),
    (0x0D, Ora, Absolute, 4, false), (0x1D, Ora, AbsoluteX, 4, true), (0x19, Ora, AbsoluteY, 4, true),
    (0x01, Ora, IndirectX, 6, false), (0x11, Ora, IndirectY, 5, true),

    (0x48, Pha, Implied, 3, false), (0x08, Php, Implied, 3, false),
    (0x68, Pla, Implied, 4, false), (0x28, Plp, Implied, 4, false),

    (0x2A, Rol, Accumulator, 2, false), (0x26, Rol, ZeroPage, 5, false), (0x36, Rol, ZeroPageX, 6, false),
    (0x2E, Rol, Absolute, 6, false), (0x3E, Rol, AbsoluteX, 7, false),
    (0x6A, Ror, Accumulator, 2, false), (0x66, Ror, ZeroPage, 5, false), (0x76, Ror, ZeroPageX, 6, false),
    (0x6E, Ror, Absolute, 6, false), (0x7E, Ror, AbsoluteX, 7, false),

    (0x40, Rti, Implied, 6, false), (0x60, Rts, Implied, 6, false),

    (0xE9, Sbc, Immediate, 2, false), (0xE5, Sbc, ZeroPage, 3, false), (0xF5, Sbc, ZeroPageX, 4, false),
    (0xED, Sbc, Absolute, 4, false), (0xFD, Sbc, AbsoluteX, 4, true), (0xF9, Sbc, AbsoluteY, 4, true),
    (0xE1, Sbc, IndirectX, 6, false), (0xF1, Sbc, IndirectY, 5, true),

    (0x38, Sec, Implied, 2, false), (0xF8, Sed, Implied, 2, false), (0x78, Sei, Implied, 2, false),

    (0x85, Sta, ZeroPage, 3, false), (0x95, Sta, ZeroPageX, 4, false), (0x8D, Sta, Absolute, 4, false),
    (0x9D, Sta, AbsoluteX, 5, false), (0x99, Sta, AbsoluteY, 5, false), (0x81, Sta, IndirectX, 6, false),
    (0x91, Sta, IndirectY, 6, false),
    (0x86, Stx, ZeroPage, 3, false), (0x96, Stx, ZeroPageY, 4, false), (0x8E, Stx, Absolute, 4, false),
    (0x84, Sty, ZeroPage, 3, false), (0x94, Sty, ZeroPageX, 4, false), (0x8C, Sty, Absolute, 4, false),

    (0xAA, Tax, Implied, 2, false), (0xA8, Tay, Implied, 2, false), (0xBA, Tsx, Implied, 2, false),
    (0x8A, Txa, Implied, 2, false), (0x9A, Txs, Implied, 2, false), (0x98, Tya, Implied, 2, false),
];

#[rustfmt::skip]
const UNOFFICIAL: &[Entry] = &[
    (0x1A, Nop, Implied, 2, false), (0x3A, Nop, Implied, 2, false), (0x5A, Nop, Implied, 2, false),
    (0x7A, Nop, Implied, 2, false), (0xDA, Nop, Implied, 2, false), (0xFA, Nop, Implied, 2, false),
    (0x80, Nop, Immediate, 2, false), (0x82, Nop, Immediate, 2, false), (0x89, Nop, Immediate, 2, false),
    (0xC2, Nop, Immediate, 2, false), (0xE2, Nop, Immediate, 2, false),
    (0x04, Nop, ZeroPage, 3, false), (0x44, Nop, ZeroPage, 3, false), (0x64, Nop, ZeroPage, 3, false),
    (0x14, Nop, ZeroPageX, 4, false), (0x34, Nop, ZeroPageX, 4, false), (0x54, Nop, ZeroPageX, 4, false),
    (0x74, Nop, ZeroPageX, 4, false), (0xD4, Nop, ZeroPageX, 4, false), (0xF4, Nop, ZeroPageX, 4, false),
    (0x0C, Nop, Absolute, 4, false),
    (0x1C, Nop, AbsoluteX, 4, true), (0x3C, Nop, AbsoluteX, 4, true), (0x5C, Nop, AbsoluteX, 4, true),
    (0x7C, Nop, AbsoluteX, 4, true), (0xDC, Nop, AbsoluteX, 4, true), (0xFC, Nop, AbsoluteX, 4, true),

    (0xA7, Lax, ZeroPage, 3, false), (0xB7, Lax, ZeroPageY, 4, false), (0xAF, Lax, Absolute, 4, false),
    (0xBF, Lax, AbsoluteY, 4, true), (0xA3, Lax, IndirectX, 6, false), (0xB3, Lax, IndirectY, 5, true),

    (0x87, Sax, ZeroPage, 3, false), (0x97, Sax, ZeroPageY, 4, false), (0x8F, Sax, Absolute, 4, false),
    (0x83, Sax, IndirectX, 6, false),

    (0xEB, Sbc, Immediate, 2, false),

    (0xC7, Dcp, ZeroPage, 5, false), (0xD7, Dcp, ZeroPageX, 6, false), (0xCF, Dcp, Absolute, 6, false),
    (0xDF, Dcp, AbsoluteX, 7, false), (0xDB, Dcp, AbsoluteY, 7, false), (0xC3, Dcp, IndirectX, 8, false),
    (0xD3, Dcp, IndirectY, 8, false),

    (0xE7, Isb, ZeroPage, 5, false), (0xF7, Isb, ZeroPageX, 6, false), (0xEF, Isb, Absolute, 6, false),
    (0xFF, Isb, AbsoluteX, 7, false), (0xFB, Isb, AbsoluteY, 7, false), (0xE3, Isb, IndirectX, 8, false),
    (0xF3, Isb, IndirectY, 8, false),

    (0x07, Slo, ZeroPage, 5, false), (0x17, Slo, ZeroPageX, 6, false), (0x0F, Slo, Absolute, 6, false),
    (0x1F, Slo, AbsoluteX, 7, false), (0x1B, Slo, AbsoluteY, 7, false), (0x03, Slo, IndirectX, 8, false),
    (0x13, Slo, IndirectY, 8, false),

    (0x27, Rla, ZeroPage, 5, false), (0x37, Rla, ZeroPageX, 6, false), (0x2F, Rla, Absolute, 6, false),
    (0x3F, Rla, AbsoluteX, 7, false), (0x3B, Rla, AbsoluteY, 7, false), (0x23, Rla, IndirectX, 8, false),
    (0x33, Rla, IndirectY, 8, false),

    (0x47, Sre, ZeroPage, 5, false), (0x57, Sre, ZeroPageX, 6, false), (0x4F, Sre, Absolute, 6, false),
    (0x5F, Sre, AbsoluteX, 7, false), (0x5B, Sre, AbsoluteY, 7, false), (0x43, Sre, IndirectX, 8, false),
    (0x53, Sre, IndirectY, 8, false),

    (0x67, Rra, ZeroPage, 5, false), (0x77, Rra, ZeroPageX, 6, false), (0x6F, Rra, Absolute, 6, false),
    (0x7F, Rra, AbsoluteX, 7, false), (0x7B, Rra, AbsoluteY, 7, false), (0x63, Rra, IndirectX, 8, false),
    (0x73, Rra, IndirectY, 8, false),
];

const fn insert(
    mut table: [Option<Instruction>; 256],
    entries: &[Entry],
    unofficial: bool,
) -> [Option<Instruction>; 256] {
    let mut i = 0;
    while i < entries.len() {
        let (opcode, op, mode, cycles, page_penalty) = entries[i];
        assert!(table[opcode as usize].is_none(), "opcode listed twice");
        table[opcode as usize] = Some(Instruction {
            opcode,
            op,
            mode,
            cycles,
            page_penalty,
            unofficial,
        });
        i += 1;
    }
    table
}

const fn build() -> [Option<Instruction>; 256] {
    let table = insert([None; 256], OFFICIAL, false);
    insert(table, UNOFFICIAL, true)
}

static INSTRUCTIONS: [Option<Instruction>; 256] = build();

/// Look up an opcode. `None` means the byte has no defined behaviour here.
pub fn decode(opcode: u8) -> Option<&'static Instruction> {
    INSTRUCTIONS[opcode as usize].as_ref()
}

use crate::{
    bus::Bus,
    cpu::{
        addressing::AddressingMode,
        cpu::{CPU, CpuError},
        flags::{FLAG_BREAK, FLAG_INTERRUPT_DISABLE, FLAG_UNUSED, Flags},
    },
};

struct TestBus {
    mem: Box<[u8; 65536]>,
}

impl TestBus {
    fn new() -> Self {
        Self {
            mem: Box::new([0; 65536]),
        }
    }
}

impl Bus for TestBus {
    fn read(&mut self, addr: u16) -> u8 {
        self.mem[addr as usize]
    }

    fn write(&mut self, addr: u16, data: u8) {
        self.mem[addr as usize] = data;
    }
}

fn new_cpu(mut bus: TestBus) -> CPU<TestBus> {
    bus.mem[0xFFFC] = 0x00;
    bus.mem[0xFFFD] = 0x80;
    let mut cpu = CPU::new(bus);
    cpu.reset();
    cpu
}

/// CPU reset to $8000 with `program` loaded there.
fn cpu_with(program: &[u8]) -> CPU<TestBus> {
    let mut bus = TestBus::new();
    bus.mem[0x8000..0x8000 + program.len()].copy_from_slice(program);
    new_cpu(bus)
}

fn run(cpu: &mut CPU<TestBus>, steps: usize) {
    for _ in 0..steps {
        cpu.step().unwrap();
    }
}

#[test]
fn lda_immediate_loads_value() {
    let mut bus = TestBus::new();
    bus.mem[0x8000] = 0xA9; // LDA #$42
    bus.mem[0x8001] = 0x42;

    let mut cpu = new_cpu(bus);
    cpu.step().unwrap();

    assert_eq!(cpu.a, 0x42)
}

#[test]
fn lda_sets_zero_flag() {
    let mut cpu = cpu_with(&[0xA9, 0x00]); // LDA #$00
    cpu.step().unwrap();
    assert!(cpu.flags.zero)
}

#[test]
fn lda_sets_negative_flag() {
    let mut cpu = cpu_with(&[0xA9, 0x80]); // LDA #$80
    cpu.step().unwrap();
    assert!(cpu.flags.negative)
}

#[test]
fn tax_transfers_a_to_x() {
    let mut bus = TestBus::new();
    bus.mem[0x8000] = 0xA9; // LDA #$10
    bus.mem[0x8001] = 0x10;

    bus.mem[0x8002] = 0xAA; // TAX

    let mut cpu = new_cpu(bus);

    cpu.step().unwrap(); // LDA
    cpu.step().unwrap(); // TAX

    assert_eq!(cpu.x, 0x10)
}

#[test]
fn sta_writes_to_memory() {
    let mut cpu = cpu_with(&[
        0xA9, 0x33, // LDA #$33
        0x8D, 0x00, 0x02, // STA $0200
    ]);
    run(&mut cpu, 2);
    assert_eq!(cpu.bus.mem[0x0200], 0x33);
}

#[test]
fn jmp_changes_program_counter() {
    let mut bus = TestBus::new();

    bus.mem[0x8000] = 0x4C; // JMP $9000
    bus.mem[0x8001] = 0x00;
    bus.mem[0x8002] = 0x90;

    bus.mem[0x9000] = 0xA9; // LDA #$55
    bus.mem[0x9001] = 0x55;

    let mut cpu = new_cpu(bus);

    cpu.step().unwrap(); // JMP
    cpu.step().unwrap(); // LDA

    assert_eq!(cpu.a, 0x55);
}

#[test]
fn jmp_indirect_wraps_within_page() {
    let mut bus = TestBus::new();
    bus.mem[0x8000] = 0x6C; // JMP ($02FF)
    bus.mem[0x8001] = 0xFF;
    bus.mem[0x8002] = 0x02;
    bus.mem[0x02FF] = 0x00;
    bus.mem[0x0200] = 0x90; // high byte comes from here
    bus.mem[0x0300] = 0x80; // not here

    let mut cpu = new_cpu(bus);
    cpu.step().unwrap();

    assert_eq!(cpu.pc, 0x9000);
}

#[test]
fn inx_increments_x() {
    let mut cpu = cpu_with(&[0xA2, 0x01, 0xE8]); // LDX #$01; INX
    run(&mut cpu, 2);
    assert_eq!(cpu.x, 0x02);
}

#[test]
fn dex_sets_zero_flag() {
    let mut cpu = cpu_with(&[0xA2, 0x01, 0xCA]); // LDX #$01; DEX
    run(&mut cpu, 2);
    assert!(cpu.flags.zero);
}

#[test]
fn bne_loops_until_zero() {
    let mut bus = TestBus::new();

    bus.mem[0x8000] = 0xA2; // LDX #3
    bus.mem[0x8001] = 0x03;
    bus.mem[0x8002] = 0xCA; // DEX
    bus.mem[0x8003] = 0xD0; // BNE -3
    bus.mem[0x8004] = 0xFD; // -3 offset

    let mut cpu = new_cpu(bus);

    for _ in 0..6 {
        cpu.step().unwrap();
    }

    assert_eq!(cpu.x, 0x00);
}

#[test]
fn jsr_and_rts_work() {
    let mut bus = TestBus::new();

    // main program
    bus.mem[0x8000] = 0x20; // JSR $9000
    bus.mem[0x8001] = 0x00;
    bus.mem[0x8002] = 0x90;
    bus.mem[0x8003] = 0xA9; // LDA #$11
    bus.mem[0x8004] = 0x11;

    // subroutine
    bus.mem[0x9000] = 0xA9; // LDA #$22
    bus.mem[0x9001] = 0x22;
    bus.mem[0x9002] = 0x60; // RTS

    let mut cpu = new_cpu(bus);

    cpu.step().unwrap(); // JSR
    assert_eq!(cpu.bus.mem[0x01FD], 0x80);
    assert_eq!(cpu.bus.mem[0x01FC], 0x02);
    cpu.step().unwrap(); // LDA #$22
    cpu.step().unwrap(); // RTS
    cpu.step().unwrap(); // LDA #$11

    assert_eq!(cpu.a, 0x11);
    assert_eq!(cpu.sp, 0xFD);
}

#[test]
fn brk_jumps_to_irq_vector() {
    let mut bus = TestBus::new();

    bus.mem[0x8000] = 0x00; // BRK

    bus.mem[0xFFFE] = 0x00;
    bus.mem[0xFFFF] = 0x90;

    let mut cpu = new_cpu(bus);
    cpu.step().unwrap();

    assert_eq!(cpu.pc, 0x9000);
    // PC + 2 and P with B set
    assert_eq!(cpu.bus.mem[0x01FD], 0x80);
    assert_eq!(cpu.bus.mem[0x01FC], 0x02);
    assert_eq!(cpu.bus.mem[0x01FB] & 0x30, 0x30);
    assert!(cpu.flags.interrupt_disable);
}

#[test]
fn adc_sets_overflow_on_signed_wrap() {
    let mut cpu = cpu_with(&[0x18, 0xA9, 0x50, 0x69, 0x50]); // CLC; LDA #$50; ADC #$50
    run(&mut cpu, 3);
    assert_eq!(cpu.a, 0xA0);
    assert!(!cpu.flags.carry);
    assert!(cpu.flags.overflow);
    assert!(cpu.flags.negative);
    assert!(!cpu.flags.zero);
}

#[test]
fn sbc_adds_ones_complement() {
    let mut cpu = cpu_with(&[0x18, 0xA9, 0x50, 0xE9, 0xF0]); // CLC; LDA #$50; SBC #$F0
    run(&mut cpu, 3);
    assert_eq!(cpu.a, 0x5F);
    assert!(!cpu.flags.carry);
    assert!(!cpu.flags.overflow);
}

/// Run `opcode #operand` at $8000 for every (A, operand, carry) and compare against `reference`.
fn check_arithmetic(opcode: u8, reference: impl Fn(u8, u8, bool) -> (u8, bool, bool)) {
    let mut cpu = cpu_with(&[opcode, 0x00]);
    for a in 0..=255u8 {
        for operand in 0..=255u8 {
            for carry in [false, true] {
                cpu.pc = 0x8000;
                cpu.bus.mem[0x8001] = operand;
                cpu.a = a;
                cpu.flags.carry = carry;
                cpu.step().unwrap();

                let (result, c, v) = reference(a, operand, carry);
                assert_eq!(cpu.a, result, "a={a:02X} m={operand:02X} c={carry}");
                assert_eq!(cpu.flags.carry, c, "carry a={a:02X} m={operand:02X} c={carry}");
                assert_eq!(cpu.flags.overflow, v, "overflow a={a:02X} m={operand:02X} c={carry}");
                assert_eq!(cpu.flags.zero, result == 0);
                assert_eq!(cpu.flags.negative, result >= 0x80);
            }
        }
    }
}

#[test]
fn adc_matches_reference() {
    check_arithmetic(0x69, |a, m, c| {
        let unsigned = a as u16 + m as u16 + c as u16;
        let signed = a as i8 as i16 + m as i8 as i16 + c as i16;
        (unsigned as u8, unsigned > 0xFF, !(-128..=127).contains(&signed))
    });
}

#[test]
fn sbc_matches_reference() {
    let reference = |a: u8, m: u8, c: bool| {
        let borrow = !c as i16;
        let unsigned = a as i16 - m as i16 - borrow;
        let signed = a as i8 as i16 - m as i8 as i16 - borrow;
        (unsigned as u8, unsigned >= 0, !(-128..=127).contains(&signed))
    };
    check_arithmetic(0xE9, reference);
    check_arithmetic(0xEB, reference);
}

#[test]
fn compare_borrows_on_wraparound() {
    // CMP, CPX, CPY #$01 with the register at 0
    for opcode in [0xC9, 0xE0, 0xC0] {
        let mut cpu = cpu_with(&[opcode, 0x01]);
        cpu.flags.overflow = true;
        cpu.step().unwrap();
        assert!(!cpu.flags.zero);
        assert!(!cpu.flags.carry);
        assert!(cpu.flags.negative);
        assert!(cpu.flags.overflow, "compare must not touch V");
        assert_eq!(cpu.a, 0);
    }
}

#[test]
fn php_plp_round_trip() {
    let mut cpu = cpu_with(&[0x08, 0x28]); // PHP; PLP
    for p in 0..=255u8 {
        cpu.pc = 0x8000;
        cpu.sp = 0xFD;
        cpu.flags = Flags::from_bits(p);
        cpu.step().unwrap();
        assert_eq!(cpu.bus.mem[0x01FD], p | 0x30);

        cpu.flags = Flags::default();
        cpu.step().unwrap();
        assert_eq!(cpu.status(), (p & !FLAG_BREAK) | FLAG_UNUSED);
        assert_eq!(cpu.status() & FLAG_UNUSED, FLAG_UNUSED);
    }
}

#[test]
fn rti_restores_without_break() {
    let mut bus = TestBus::new();
    bus.mem[0x8000] = 0x40; // RTI
    bus.mem[0x01FB] = 0xFF; // P
    bus.mem[0x01FC] = 0x34; // PCL
    bus.mem[0x01FD] = 0x12; // PCH
    let mut cpu = new_cpu(bus);
    cpu.sp = 0xFA;

    cpu.step().unwrap();

    assert_eq!(cpu.pc, 0x1234);
    assert_eq!(cpu.status(), 0xEF);
    assert_eq!(cpu.sp, 0xFD);
}

#[test]
fn indirect_x_pointer_wraps_in_zero_page() {
    let mut bus = TestBus::new();
    bus.mem[0x8000] = 0xA1; // LDA ($FE,X)
    bus.mem[0x8001] = 0xFE;
    bus.mem[0x00FF] = 0x34;
    bus.mem[0x0000] = 0x12;
    bus.mem[0x0100] = 0x56; // would be the high byte without the wrap
    bus.mem[0x1234] = 0x77;
    let mut cpu = new_cpu(bus);
    cpu.x = 0x01;

    let cycles = cpu.step().unwrap();

    assert_eq!(cpu.a, 0x77);
    assert_eq!(cycles, 6);
}

#[test]
fn indirect_y_crosses_page_without_wrap() {
    let mut bus = TestBus::new();
    bus.mem[0x8000] = 0xB1; // LDA ($FF),Y
    bus.mem[0x8001] = 0xFF;
    bus.mem[0x00FF] = 0xF0;
    bus.mem[0x0000] = 0x02;
    bus.mem[0x0310] = 0x99;
    bus.mem[0x0210] = 0x11;
    let mut cpu = new_cpu(bus);
    cpu.y = 0x20;

    let cycles = cpu.step().unwrap();

    assert_eq!(cpu.a, 0x99);
    assert_eq!(cycles, 6); // 5 + page cross
}

#[test]
fn resolve_does_not_move_pc() {
    let mut cpu = cpu_with(&[0xBD, 0xF0, 0x12]); // LDA $12F0,X
    cpu.x = 0x20;

    let op = cpu.resolve(AddressingMode::AbsoluteX);

    assert_eq!(cpu.pc, 0x8000);
    assert_eq!(op.addr, Some(0x1310));
    assert_eq!(op.base, Some(0x12F0));
    assert_eq!(op.raw_bytes(), [0xF0u8, 0x12]);
    assert!(op.page_crossed);
    assert_eq!(cpu.a, 0);
}

#[test]
fn zero_page_x_wraps() {
    let mut cpu = cpu_with(&[0xB5, 0xF0]); // LDA $F0,X
    cpu.x = 0x20;
    cpu.bus.mem[0x0010] = 0x42;
    cpu.bus.mem[0x0110] = 0x24;
    cpu.step().unwrap();
    assert_eq!(cpu.a, 0x42);
}

#[test]
fn page_cross_penalty_only_on_reads() {
    let mut cpu = cpu_with(&[0xBD, 0xFF, 0x00, 0x9D, 0xFF, 0x00]); // LDA $00FF,X; STA $00FF,X
    cpu.x = 1;
    assert_eq!(cpu.step().unwrap(), 5);
    assert_eq!(cpu.step().unwrap(), 5);
}

#[test]
fn branch_cycle_penalties() {
    // not taken / taken same page / taken across a page
    let mut cpu = cpu_with(&[0xF0, 0x10]); // BEQ +16
    cpu.flags.zero = false;
    assert_eq!(cpu.step().unwrap(), 2);
    assert_eq!(cpu.pc, 0x8002);

    cpu.pc = 0x8000;
    cpu.flags.zero = true;
    assert_eq!(cpu.step().unwrap(), 3);
    assert_eq!(cpu.pc, 0x8012);

    cpu.bus.mem[0x80F0] = 0xF0;
    cpu.bus.mem[0x80F1] = 0x10;
    cpu.pc = 0x80F0;
    assert_eq!(cpu.step().unwrap(), 4);
    assert_eq!(cpu.pc, 0x8102);
}

#[test]
fn stack_pointer_wraps() {
    let mut cpu = cpu_with(&[0x48, 0x68]); // PHA; PLA
    cpu.sp = 0x00;
    cpu.a = 0x5A;
    cpu.step().unwrap();
    assert_eq!(cpu.bus.mem[0x0100], 0x5A);
    assert_eq!(cpu.sp, 0xFF);
    cpu.a = 0;
    cpu.step().unwrap();
    assert_eq!(cpu.a, 0x5A);
    assert_eq!(cpu.sp, 0x00);
}

#[test]
fn dcp_decrements_then_compares() {
    let mut cpu = cpu_with(&[0xC7, 0x10]); // DCP $10
    cpu.bus.mem[0x0010] = 0x41;
    cpu.a = 0x40;
    assert_eq!(cpu.step().unwrap(), 5);
    assert_eq!(cpu.bus.mem[0x0010], 0x40);
    assert!(cpu.flags.zero);
    assert!(cpu.flags.carry);
    assert_eq!(cpu.a, 0x40);
}

#[test]
fn isb_increments_then_subtracts() {
    let mut cpu = cpu_with(&[0xE7, 0x10]); // ISB $10
    cpu.bus.mem[0x0010] = 0x0F;
    cpu.a = 0x20;
    cpu.flags.carry = true;
    cpu.step().unwrap();
    assert_eq!(cpu.bus.mem[0x0010], 0x10);
    assert_eq!(cpu.a, 0x10);
    assert!(cpu.flags.carry);
}

#[test]
fn slo_rla_sre_use_shifted_value() {
    let mut cpu = cpu_with(&[0x07, 0x10, 0x27, 0x11, 0x47, 0x12]); // SLO $10; RLA $11; SRE $12
    cpu.bus.mem[0x0010] = 0x81;
    cpu.bus.mem[0x0011] = 0x40;
    cpu.bus.mem[0x0012] = 0x03;
    cpu.a = 0x10;

    cpu.step().unwrap();
    assert_eq!(cpu.bus.mem[0x0010], 0x02);
    assert_eq!(cpu.a, 0x12);
    assert!(cpu.flags.carry);

    cpu.step().unwrap();
    assert_eq!(cpu.bus.mem[0x0011], 0x81); // carry rotated in
    assert_eq!(cpu.a, 0x00);
    assert!(cpu.flags.zero);
    assert!(!cpu.flags.carry);

    cpu.a = 0xFF;
    cpu.step().unwrap();
    assert_eq!(cpu.bus.mem[0x0012], 0x01);
    assert_eq!(cpu.a, 0xFE);
    assert!(cpu.flags.carry);
    assert!(cpu.flags.negative);
}

#[test]
fn rra_adds_with_rotated_carry() {
    let mut cpu = cpu_with(&[0x67, 0x10]); // RRA $10
    cpu.bus.mem[0x0010] = 0x03;
    cpu.a = 0x10;
    cpu.flags.carry = false;
    cpu.step().unwrap();
    assert_eq!(cpu.bus.mem[0x0010], 0x01);
    assert_eq!(cpu.a, 0x12); // 0x10 + 0x01 + carry out of the rotate
    assert!(!cpu.flags.carry);
}

#[test]
fn lax_and_sax() {
    let mut cpu = cpu_with(&[0xA7, 0x10, 0x87, 0x11]); // LAX $10; SAX $11
    cpu.bus.mem[0x0010] = 0xF3;
    cpu.step().unwrap();
    assert_eq!((cpu.a, cpu.x), (0xF3, 0xF3));
    cpu.x = 0x0F;
    cpu.step().unwrap();
    assert_eq!(cpu.bus.mem[0x0011], 0x03);
}

#[test]
fn unofficial_nops_skip_operands() {
    let mut cpu = cpu_with(&[0x04, 0x10, 0x0C, 0x00, 0x20, 0x1A, 0x80, 0x55, 0xEA]);
    run(&mut cpu, 5);
    assert_eq!(cpu.pc, 0x8009);
    assert_eq!(cpu.a, 0);
}

#[test]
fn nmi_pushes_pc_and_status() {
    let mut bus = TestBus::new();
    bus.mem[0xFFFA] = 0x00;
    bus.mem[0xFFFB] = 0xC0;
    let mut cpu = new_cpu(bus);
    cpu.pc = 0x8123;
    cpu.flags = Flags::from_bits(0xC3);

    cpu.trigger_nmi();

    assert_eq!(cpu.pc, 0xC000);
    assert_eq!(cpu.bus.mem[0x01FD], 0x81);
    assert_eq!(cpu.bus.mem[0x01FC], 0x23);
    assert_eq!(cpu.bus.mem[0x01FB], 0xE3); // B clear, bit 5 set
    assert_eq!(cpu.sp, 0xFA);
    assert!(cpu.flags.interrupt_disable);
}

#[test]
fn irq_respects_interrupt_disable() {
    let mut bus = TestBus::new();
    bus.mem[0xFFFE] = 0x00;
    bus.mem[0xFFFF] = 0xD0;
    let mut cpu = new_cpu(bus);

    assert_eq!(cpu.status() & FLAG_INTERRUPT_DISABLE, FLAG_INTERRUPT_DISABLE);
    assert!(!cpu.trigger_irq());
    assert_eq!(cpu.pc, 0x8000);

    cpu.flags.interrupt_disable = false;
    assert!(cpu.trigger_irq());
    assert_eq!(cpu.pc, 0xD000);
    assert_eq!(cpu.bus.mem[0x01FB] & FLAG_BREAK, 0);
}

#[test]
fn unknown_opcode_is_fatal_and_leaves_pc() {
    let mut cpu = cpu_with(&[0xA9, 0x01, 0x02]); // LDA #$01; JAM
    cpu.step().unwrap();
    let err = cpu.step().unwrap_err();
    assert_eq!(
        err,
        CpuError::UnknownOpcode {
            pc: 0x8002,
            opcode: 0x02
        }
    );
    assert_eq!(cpu.pc, 0x8002);
    assert_eq!(cpu.step(), Err(err));
    assert_eq!(cpu.a, 0x01);
}

#[test]
fn store_load_loop_runs_forever() {
    // loop: LDX #$05; STX $10; LDA $10; BNE loop
    let mut cpu = cpu_with(&[0xA2, 0x05, 0x86, 0x10, 0xA5, 0x10, 0xD0, 0xF8]);
    run(&mut cpu, 2);
    assert_eq!(cpu.x, 0x05);
    assert_eq!(cpu.bus.mem[0x0010], 0x05);

    for _ in 0..1000 {
        cpu.step().unwrap();
        assert!((0x8000..0x8008).contains(&cpu.pc));
    }
    assert_eq!(cpu.a, 0x05);
}

#[test]
fn reset_state() {
    let cpu = cpu_with(&[]);
    assert_eq!(cpu.pc, 0x8000);
    assert_eq!(cpu.sp, 0xFD);
    assert_eq!(cpu.status(), 0x24);
    assert_eq!(cpu.cycles, 7);
}

//! ALU instruction tests: ADC, SBC, AND, ORA, EOR, CMP, CPX, CPY, BIT.
//!
//! Binary arithmetic is checked for every flag; decimal mode is checked
//! against NMOS behaviour, including the flags that come from the binary
//! result rather than the BCD one.

use emu6502::{FlatMemory, MemoryBus, CPU};

/// Helper function to create a CPU with reset vector at 0x8000
fn setup_cpu() -> CPU<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    CPU::new(memory)
}

/// Runs one immediate-mode instruction with the given A and carry.
fn run_immediate(opcode: u8, a: u8, operand: u8, carry: bool, decimal: bool) -> CPU<FlatMemory> {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[opcode, operand]);
    cpu.set_a(a);
    cpu.set_flag_c(carry);
    cpu.set_flag_d(decimal);
    assert_eq!(cpu.step().unwrap(), 2);
    cpu
}

// ========== ADC (binary) ==========

#[test]
fn test_adc_immediate_basic() {
    let cpu = run_immediate(0x69, 0x10, 0x05, false, false);
    assert_eq!(cpu.a(), 0x15);
    assert!(!cpu.flag_c());
    assert!(!cpu.flag_z());
    assert!(!cpu.flag_v());
    assert!(!cpu.flag_n());
}

#[test]
fn test_adc_with_carry_in() {
    let cpu = run_immediate(0x69, 0x10, 0x05, true, false);
    assert_eq!(cpu.a(), 0x16);
}

#[test]
fn test_adc_carry_out_and_zero() {
    let cpu = run_immediate(0x69, 0x01, 0xFF, false, false);
    assert_eq!(cpu.a(), 0x00);
    assert!(cpu.flag_c());
    assert!(cpu.flag_z());
    assert!(!cpu.flag_v());
}

#[test]
fn test_adc_overflow_positive_to_negative() {
    // 80 + 80 = 160, which is -96 as signed
    let cpu = run_immediate(0x69, 0x50, 0x50, false, false);
    assert_eq!(cpu.a(), 0xA0);
    assert!(cpu.flag_v());
    assert!(cpu.flag_n());
    assert!(!cpu.flag_c());
}

#[test]
fn test_adc_overflow_negative_to_positive() {
    // -128 + -1 = 127 with overflow
    let cpu = run_immediate(0x69, 0x80, 0xFF, false, false);
    assert_eq!(cpu.a(), 0x7F);
    assert!(cpu.flag_v());
    assert!(cpu.flag_c());
    assert!(!cpu.flag_n());
}

#[test]
fn test_adc_absolute_x_page_cross() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[0x7D, 0xFF, 0x20]);
    cpu.memory_mut().write(0x2100, 0x01);
    cpu.set_x(0x01);
    cpu.set_a(0x01);

    assert_eq!(cpu.step().unwrap(), 5);
    assert_eq!(cpu.a(), 0x02);
}

// ========== SBC (binary) ==========

#[test]
fn test_sbc_basic_no_borrow() {
    let cpu = run_immediate(0xE9, 0x50, 0x20, true, false);
    assert_eq!(cpu.a(), 0x30);
    assert!(cpu.flag_c(), "no borrow leaves C set");
    assert!(!cpu.flag_v());
}

#[test]
fn test_sbc_borrow_in() {
    let cpu = run_immediate(0xE9, 0x50, 0x20, false, false);
    assert_eq!(cpu.a(), 0x2F);
}

#[test]
fn test_sbc_borrow_out() {
    let cpu = run_immediate(0xE9, 0x00, 0x01, true, false);
    assert_eq!(cpu.a(), 0xFF);
    assert!(!cpu.flag_c());
    assert!(cpu.flag_n());
}

#[test]
fn test_sbc_overflow() {
    // 80 - (-80) = 160: overflow
    let cpu = run_immediate(0xE9, 0x50, 0xB0, true, false);
    assert_eq!(cpu.a(), 0xA0);
    assert!(cpu.flag_v());
    assert!(!cpu.flag_c());
}

#[test]
fn test_sbc_equal_operands_sets_zero() {
    let cpu = run_immediate(0xE9, 0x42, 0x42, true, false);
    assert_eq!(cpu.a(), 0x00);
    assert!(cpu.flag_z());
    assert!(cpu.flag_c());
}

// ========== Decimal mode ==========

#[test]
fn test_adc_decimal_digit_carry() {
    let cpu = run_immediate(0x69, 0x09, 0x01, false, true);
    assert_eq!(cpu.a(), 0x10);
    assert!(!cpu.flag_c());
}

#[test]
fn test_adc_decimal_carry_out() {
    // 58 + 46 + 1 = 105
    let cpu = run_immediate(0x69, 0x58, 0x46, true, true);
    assert_eq!(cpu.a(), 0x05);
    assert!(cpu.flag_c());
}

#[test]
fn test_adc_decimal_flags_follow_nmos() {
    // 99 + 01 = 100: A is 00 but Z follows the binary sum 0x9A
    let cpu = run_immediate(0x69, 0x99, 0x01, false, true);
    assert_eq!(cpu.a(), 0x00);
    assert!(cpu.flag_c());
    assert!(!cpu.flag_z());
    assert!(cpu.flag_n(), "N comes from the uncorrected high nibble");
}

#[test]
fn test_sbc_decimal_basic() {
    let cpu = run_immediate(0xE9, 0x46, 0x12, true, true);
    assert_eq!(cpu.a(), 0x34);
    assert!(cpu.flag_c());
}

#[test]
fn test_sbc_decimal_digit_borrow() {
    let cpu = run_immediate(0xE9, 0x40, 0x01, true, true);
    assert_eq!(cpu.a(), 0x39);
    assert!(cpu.flag_c());
}

#[test]
fn test_sbc_decimal_wraps_below_zero() {
    let cpu = run_immediate(0xE9, 0x00, 0x01, true, true);
    assert_eq!(cpu.a(), 0x99);
    assert!(!cpu.flag_c());
}

// ========== Logic ==========

#[test]
fn test_and_immediate() {
    let cpu = run_immediate(0x29, 0xF0, 0x3C, false, false);
    assert_eq!(cpu.a(), 0x30);
    assert!(!cpu.flag_z());

    let cpu = run_immediate(0x29, 0xF0, 0x0F, false, false);
    assert_eq!(cpu.a(), 0x00);
    assert!(cpu.flag_z());
}

#[test]
fn test_ora_immediate_sets_negative() {
    let cpu = run_immediate(0x09, 0x01, 0x80, false, false);
    assert_eq!(cpu.a(), 0x81);
    assert!(cpu.flag_n());
}

#[test]
fn test_eor_immediate() {
    let cpu = run_immediate(0x49, 0xFF, 0xFF, false, false);
    assert_eq!(cpu.a(), 0x00);
    assert!(cpu.flag_z());

    let cpu = run_immediate(0x49, 0x0F, 0xF0, false, false);
    assert_eq!(cpu.a(), 0xFF);
    assert!(cpu.flag_n());
}

#[test]
fn test_logic_leaves_carry_and_overflow() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[0x29, 0x00]);
    cpu.set_flag_c(true);
    cpu.set_flag_v(true);
    cpu.step().unwrap();
    assert!(cpu.flag_c());
    assert!(cpu.flag_v());
}

#[test]
fn test_eor_indirect_indexed() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[0x51, 0x10]);
    cpu.memory_mut().write(0x0010, 0x00);
    cpu.memory_mut().write(0x0011, 0x30);
    cpu.memory_mut().write(0x3002, 0x0F);
    cpu.set_y(0x02);
    cpu.set_a(0x3C);

    assert_eq!(cpu.step().unwrap(), 5);
    assert_eq!(cpu.a(), 0x33);
}

// ========== Compare ==========

#[test]
fn test_cmp_greater_equal_less() {
    let cpu = run_immediate(0xC9, 0x40, 0x30, false, false);
    assert!(cpu.flag_c());
    assert!(!cpu.flag_z());
    assert!(!cpu.flag_n());
    assert_eq!(cpu.a(), 0x40, "CMP does not modify A");

    let cpu = run_immediate(0xC9, 0x40, 0x40, false, false);
    assert!(cpu.flag_c());
    assert!(cpu.flag_z());

    let cpu = run_immediate(0xC9, 0x30, 0x40, false, false);
    assert!(!cpu.flag_c());
    assert!(!cpu.flag_z());
    assert!(cpu.flag_n());
}

#[test]
fn test_cmp_ignores_decimal_and_overflow() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[0xC9, 0x01]);
    cpu.set_a(0x10);
    cpu.set_flag_d(true);
    cpu.set_flag_v(true);
    cpu.step().unwrap();
    assert!(cpu.flag_c());
    assert!(cpu.flag_v(), "V untouched");
}

#[test]
fn test_cpx_cpy() {
    let mut cpu = setup_cpu();
    // CPX #$10 ; CPY $20
    cpu.memory_mut().load(0x8000, &[0xE0, 0x10, 0xC4, 0x20]);
    cpu.memory_mut().write(0x0020, 0x80);
    cpu.set_x(0x10);
    cpu.set_y(0x7F);

    assert_eq!(cpu.step().unwrap(), 2);
    assert!(cpu.flag_z());
    assert!(cpu.flag_c());

    assert_eq!(cpu.step().unwrap(), 3);
    assert!(!cpu.flag_c());
    assert!(!cpu.flag_z());
    assert!(cpu.flag_n());
}

// ========== BIT ==========

#[test]
fn test_bit_copies_high_bits() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[0x24, 0x10]);
    cpu.memory_mut().write(0x0010, 0xC0);
    cpu.set_a(0x00);

    assert_eq!(cpu.step().unwrap(), 3);
    assert!(cpu.flag_z());
    assert!(cpu.flag_n());
    assert!(cpu.flag_v());
    assert_eq!(cpu.a(), 0x00);
}

#[test]
fn test_bit_absolute_clears() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[0x2C, 0x00, 0x30]);
    cpu.memory_mut().write(0x3000, 0x3F);
    cpu.set_a(0x01);
    cpu.set_flag_n(true);
    cpu.set_flag_v(true);

    assert_eq!(cpu.step().unwrap(), 4);
    assert!(!cpu.flag_z());
    assert!(!cpu.flag_n());
    assert!(!cpu.flag_v());
}

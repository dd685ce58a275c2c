//! Load and store instruction tests.
//!
//! Tests cover:
//! - LDA across every addressing mode, with cycle counts
//! - Page-crossing penalties on indexed reads only
//! - Zero-page wrap for indexed and indirect modes
//! - LDX/LDY flag updates, STA/STX/STY leaving flags alone

use emu6502::{FlatMemory, MemoryBus, CPU};

/// Helper function to create a CPU with reset vector at 0x8000
fn setup_cpu() -> CPU<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    CPU::new(memory)
}

fn load_program(cpu: &mut CPU<FlatMemory>, program: &[u8]) {
    cpu.memory_mut().load(0x8000, program);
}

// ========== LDA Addressing Modes ==========

#[test]
fn test_lda_immediate() {
    let mut cpu = setup_cpu();
    load_program(&mut cpu, &[0xA9, 0x42]);

    assert_eq!(cpu.step().unwrap(), 2);
    assert_eq!(cpu.a(), 0x42);
    assert!(!cpu.flag_z());
    assert!(!cpu.flag_n());
    assert_eq!(cpu.pc(), 0x8002);
}

#[test]
fn test_lda_zero_and_negative_flags() {
    let mut cpu = setup_cpu();
    load_program(&mut cpu, &[0xA9, 0x00, 0xA9, 0x80]);

    cpu.step().unwrap();
    assert!(cpu.flag_z());
    assert!(!cpu.flag_n());

    cpu.step().unwrap();
    assert!(!cpu.flag_z());
    assert!(cpu.flag_n());
}

#[test]
fn test_lda_zero_page() {
    let mut cpu = setup_cpu();
    load_program(&mut cpu, &[0xA5, 0x10]);
    cpu.memory_mut().write(0x0010, 0x33);

    assert_eq!(cpu.step().unwrap(), 3);
    assert_eq!(cpu.a(), 0x33);
}

#[test]
fn test_lda_zero_page_x_wraps() {
    let mut cpu = setup_cpu();
    load_program(&mut cpu, &[0xB5, 0xF0]);
    cpu.set_x(0x20);
    cpu.memory_mut().write(0x0010, 0x77);
    cpu.memory_mut().write(0x0110, 0xEE);

    assert_eq!(cpu.step().unwrap(), 4);
    assert_eq!(cpu.a(), 0x77, "ZP,X must wrap to $0010, not $0110");
}

#[test]
fn test_lda_absolute() {
    let mut cpu = setup_cpu();
    load_program(&mut cpu, &[0xAD, 0x34, 0x12]);
    cpu.memory_mut().write(0x1234, 0x99);

    assert_eq!(cpu.step().unwrap(), 4);
    assert_eq!(cpu.a(), 0x99);
    assert_eq!(cpu.pc(), 0x8003);
}

#[test]
fn test_lda_absolute_x_same_page() {
    let mut cpu = setup_cpu();
    load_program(&mut cpu, &[0xBD, 0x00, 0x12]);
    cpu.set_x(0x05);
    cpu.memory_mut().write(0x1205, 0x55);

    assert_eq!(cpu.step().unwrap(), 4);
    assert_eq!(cpu.a(), 0x55);
}

#[test]
fn test_lda_absolute_x_page_cross_penalty() {
    let mut cpu = setup_cpu();
    load_program(&mut cpu, &[0xBD, 0xFF, 0x12]);
    cpu.set_x(0x01);
    cpu.memory_mut().write(0x1300, 0x66);

    assert_eq!(cpu.step().unwrap(), 5);
    assert_eq!(cpu.a(), 0x66);
}

#[test]
fn test_lda_absolute_y_page_cross_penalty() {
    let mut cpu = setup_cpu();
    load_program(&mut cpu, &[0xB9, 0x80, 0x12]);
    cpu.set_y(0x80);
    cpu.memory_mut().write(0x1300, 0x67);

    assert_eq!(cpu.step().unwrap(), 5);
    assert_eq!(cpu.a(), 0x67);
}

#[test]
fn test_lda_indexed_indirect() {
    let mut cpu = setup_cpu();
    load_program(&mut cpu, &[0xA1, 0x20]);
    cpu.set_x(0x04);
    cpu.memory_mut().write(0x0024, 0x00);
    cpu.memory_mut().write(0x0025, 0x30);
    cpu.memory_mut().write(0x3000, 0xAB);

    assert_eq!(cpu.step().unwrap(), 6);
    assert_eq!(cpu.a(), 0xAB);
}

#[test]
fn test_lda_indexed_indirect_pointer_wraps_in_zero_page() {
    let mut cpu = setup_cpu();
    load_program(&mut cpu, &[0xA1, 0xFE]);
    cpu.set_x(0x01);
    // Pointer at $FF/$00
    cpu.memory_mut().write(0x00FF, 0x00);
    cpu.memory_mut().write(0x0000, 0x40);
    cpu.memory_mut().write(0x0100, 0x50);
    cpu.memory_mut().write(0x4000, 0x11);

    cpu.step().unwrap();
    assert_eq!(cpu.a(), 0x11);
}

#[test]
fn test_lda_indirect_indexed() {
    let mut cpu = setup_cpu();
    load_program(&mut cpu, &[0xB1, 0x40]);
    cpu.set_y(0x10);
    cpu.memory_mut().write(0x0040, 0x00);
    cpu.memory_mut().write(0x0041, 0x20);
    cpu.memory_mut().write(0x2010, 0xCD);

    assert_eq!(cpu.step().unwrap(), 5);
    assert_eq!(cpu.a(), 0xCD);
}

#[test]
fn test_lda_indirect_indexed_page_cross_penalty() {
    let mut cpu = setup_cpu();
    load_program(&mut cpu, &[0xB1, 0x40]);
    cpu.set_y(0x01);
    cpu.memory_mut().write(0x0040, 0xFF);
    cpu.memory_mut().write(0x0041, 0x20);
    cpu.memory_mut().write(0x2100, 0xCE);

    assert_eq!(cpu.step().unwrap(), 6);
    assert_eq!(cpu.a(), 0xCE);
}

// ========== LDX / LDY ==========

#[test]
fn test_ldx_zero_page_y_wraps() {
    let mut cpu = setup_cpu();
    load_program(&mut cpu, &[0xB6, 0xFF]);
    cpu.set_y(0x02);
    cpu.memory_mut().write(0x0001, 0x81);

    assert_eq!(cpu.step().unwrap(), 4);
    assert_eq!(cpu.x(), 0x81);
    assert!(cpu.flag_n());
}

#[test]
fn test_ldy_absolute_x_page_cross() {
    let mut cpu = setup_cpu();
    load_program(&mut cpu, &[0xBC, 0xF0, 0x10]);
    cpu.set_x(0x20);
    cpu.memory_mut().write(0x1110, 0x00);
    cpu.set_y(0x44);

    assert_eq!(cpu.step().unwrap(), 5);
    assert_eq!(cpu.y(), 0x00);
    assert!(cpu.flag_z());
}

#[test]
fn test_ldx_absolute_y_no_cross() {
    let mut cpu = setup_cpu();
    load_program(&mut cpu, &[0xBE, 0x00, 0x10]);
    cpu.set_y(0x10);
    cpu.memory_mut().write(0x1010, 0x05);

    assert_eq!(cpu.step().unwrap(), 4);
    assert_eq!(cpu.x(), 0x05);
}

// ========== Stores ==========

#[test]
fn test_sta_zero_page_leaves_flags() {
    let mut cpu = setup_cpu();
    load_program(&mut cpu, &[0x85, 0x10]);
    cpu.set_a(0x00);
    cpu.set_flag_z(false);
    cpu.set_flag_n(true);

    assert_eq!(cpu.step().unwrap(), 3);
    assert_eq!(cpu.memory().read(0x0010), 0x00);
    assert!(!cpu.flag_z());
    assert!(cpu.flag_n());
}

#[test]
fn test_sta_absolute_x_never_pays_penalty() {
    let mut cpu = setup_cpu();
    load_program(&mut cpu, &[0x9D, 0xFF, 0x12, 0x9D, 0x00, 0x12]);
    cpu.set_a(0x5A);
    cpu.set_x(0x01);

    assert_eq!(cpu.step().unwrap(), 5, "crossing");
    assert_eq!(cpu.step().unwrap(), 5, "not crossing");
    assert_eq!(cpu.memory().read(0x1300), 0x5A);
    assert_eq!(cpu.memory().read(0x1201), 0x5A);
}

#[test]
fn test_sta_indirect_indexed_always_six_cycles() {
    let mut cpu = setup_cpu();
    load_program(&mut cpu, &[0x91, 0x40]);
    cpu.set_a(0x12);
    cpu.set_y(0x01);
    cpu.memory_mut().write(0x0040, 0xFF);
    cpu.memory_mut().write(0x0041, 0x20);

    assert_eq!(cpu.step().unwrap(), 6);
    assert_eq!(cpu.memory().read(0x2100), 0x12);
}

#[test]
fn test_stx_zero_page_y_and_sty_zero_page_x() {
    let mut cpu = setup_cpu();
    load_program(&mut cpu, &[0x96, 0xFF, 0x94, 0xFE]);
    cpu.set_x(0x03);
    cpu.set_y(0x02);

    assert_eq!(cpu.step().unwrap(), 4);
    assert_eq!(cpu.memory().read(0x0001), 0x03);

    assert_eq!(cpu.step().unwrap(), 4);
    assert_eq!(cpu.memory().read(0x0001), 0x02);
}

#[test]
fn test_stx_sty_absolute() {
    let mut cpu = setup_cpu();
    load_program(&mut cpu, &[0x8E, 0x00, 0x02, 0x8C, 0x01, 0x02]);
    cpu.set_x(0xAA);
    cpu.set_y(0xBB);

    assert_eq!(cpu.step().unwrap(), 4);
    assert_eq!(cpu.step().unwrap(), 4);
    assert_eq!(cpu.memory().read(0x0200), 0xAA);
    assert_eq!(cpu.memory().read(0x0201), 0xBB);
}

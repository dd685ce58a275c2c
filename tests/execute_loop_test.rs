//! Execution loop tests.
//!
//! Covers `execute()` budgets, the illegal opcode policies, bus faults raised
//! by strict memory and the per-step diagnostics.

use emu6502::{
    AccessKind, BusFault, CpuConfig, ExecutionError, FlatMemory, IllegalOpcodePolicy,
    MappedMemory, MemoryAccess, MemoryBus, Mnemonic, RamDevice, RomDevice, StepEvent, CPU,
};

/// Helper function to create a CPU with reset vector at 0x8000
fn setup_cpu() -> CPU<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    CPU::new(memory)
}

// ========== execute() ==========

#[test]
fn test_execute_counts_loop() {
    let mut cpu = setup_cpu();
    // LDX #$05 ; DEX ; BNE -3 ; BRK-free spin: JMP $8005
    cpu.memory_mut()
        .load(0x8000, &[0xA2, 0x05, 0xCA, 0xD0, 0xFD, 0x4C, 0x05, 0x80]);

    // LDX 2, then 5x DEX (2) and 4 taken BNE (3) and 1 not taken (2)
    let expected = 2 + 5 * 2 + 4 * 3 + 2;
    let consumed = cpu.execute(expected).unwrap();

    assert_eq!(consumed, expected);
    assert_eq!(cpu.x(), 0);
    assert_eq!(cpu.pc(), 0x8005);
    assert_eq!(cpu.instruction_count(), 11);
}

#[test]
fn test_execute_may_overshoot_by_one_instruction() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[0xEA; 8]);

    assert_eq!(cpu.execute(3).unwrap(), 4);
    assert_eq!(cpu.cycles(), 4);
}

#[test]
fn test_execute_zero_budget_does_nothing() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[0xEA; 8]);

    assert_eq!(cpu.execute(0).unwrap(), 0);
    assert_eq!(cpu.pc(), 0x8000);
}

#[test]
fn test_execute_error_leaves_spent_cycles_on_the_counter() {
    let mut cpu = setup_cpu();
    // NOP ; LDA $10 ; illegal
    cpu.memory_mut().load(0x8000, &[0xEA, 0xA5, 0x10, 0x02]);
    let before = cpu.cycles();

    assert!(cpu.execute(100).is_err());
    assert_eq!(cpu.cycles() - before, 5);
    assert_eq!(cpu.instruction_count(), 2);
}

// ========== Illegal opcodes ==========

#[test]
fn test_illegal_opcode_halts_by_default() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[0xEA, 0x02, 0xEA]);

    let err = cpu.execute(100).unwrap_err();

    assert_eq!(
        err,
        ExecutionError::IllegalOpcode {
            opcode: 0x02,
            address: 0x8001
        }
    );
    assert!(cpu.is_halted());
    assert_eq!(cpu.pc(), 0x8001, "PC stays on the offending opcode");
    assert_eq!(cpu.cycles(), 2);

    // Halted: further steps do nothing
    assert_eq!(cpu.step().unwrap(), 0);
    assert_eq!(cpu.last_step(), StepEvent::Halted);
    assert_eq!(cpu.execute(100).unwrap(), 0);
}

#[test]
fn test_illegal_opcode_as_nop() {
    let mut memory = FlatMemory::new();
    memory.set_reset_vector(0x8000);
    memory.load(0x8000, &[0x02, 0xFF, 0xA9, 0x01]);

    let config = CpuConfig::default().with_illegal_opcode_policy(IllegalOpcodePolicy::Nop);
    let mut cpu = CPU::with_config(memory, config);
    let before = cpu.registers();

    assert_eq!(cpu.step().unwrap(), 2);
    assert_eq!(cpu.pc(), 0x8001);
    assert_eq!(cpu.a(), before.a);
    assert_eq!(cpu.flags(), before.p);
    assert_eq!(
        cpu.last_instruction().map(|i| i.mnemonic),
        Some(Mnemonic::Ill)
    );

    cpu.step().unwrap();
    cpu.step().unwrap();
    assert_eq!(cpu.a(), 0x01);
    assert!(!cpu.is_halted());
}

// ========== Bus faults ==========

fn strict_machine(program: &[u8]) -> CPU<MappedMemory> {
    let mut rom = vec![0xEA; 0x1000];
    rom[..program.len()].copy_from_slice(program);
    rom[0x0FFC] = 0x00;
    rom[0x0FFD] = 0xF0;

    let mut memory = MappedMemory::new().with_strict_writes(true);
    memory
        .add_device(0x0000, Box::new(RamDevice::new(0x0800)))
        .unwrap();
    memory
        .add_device(0xF000, Box::new(RomDevice::new(rom)))
        .unwrap();
    CPU::new(memory)
}

#[test]
fn test_write_to_rom_fails_the_step() {
    // LDA #$42 ; STA $F100
    let mut cpu = strict_machine(&[0xA9, 0x42, 0x8D, 0x00, 0xF1]);
    cpu.step().unwrap();

    let err = cpu.step().unwrap_err();

    assert_eq!(
        err,
        ExecutionError::Bus(BusFault::ReadOnlyWrite {
            address: 0xF100,
            value: 0x42
        })
    );
    // The step itself is committed
    assert_eq!(cpu.pc(), 0xF005);
    assert_eq!(cpu.cycles(), 6);
    assert!(!cpu.is_halted());
    assert_eq!(cpu.memory().read(0xF100), 0xEA);

    // Fault was consumed
    assert_eq!(cpu.step().unwrap(), 2);
}

#[test]
fn test_write_to_unmapped_fails_the_step() {
    // STA $4000
    let mut cpu = strict_machine(&[0x8D, 0x00, 0x40]);
    let err = cpu.step().unwrap_err();
    assert_eq!(err, ExecutionError::Bus(BusFault::Unmapped { address: 0x4000 }));
}

#[test]
fn test_lenient_memory_drops_rom_writes() {
    let mut rom = vec![0xEA; 0x1000];
    rom[..3].copy_from_slice(&[0x8D, 0x00, 0xF1]);
    rom[0x0FFC] = 0x00;
    rom[0x0FFD] = 0xF0;
    let mut memory = MappedMemory::new();
    memory
        .add_device(0xF000, Box::new(RomDevice::new(rom)))
        .unwrap();

    let mut cpu = CPU::new(memory);
    assert_eq!(cpu.step().unwrap(), 4);
    assert_eq!(cpu.memory().read(0xF100), 0xEA);
}

// ========== Diagnostics ==========

#[test]
fn test_access_log_for_read_modify_write() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[0xE6, 0x10]); // INC $10
    cpu.memory_mut().write(0x0010, 0x41);

    cpu.step().unwrap();

    assert_eq!(
        cpu.accesses(),
        &[
            MemoryAccess {
                address: 0x0010,
                kind: AccessKind::Read,
                value: 0x41
            },
            MemoryAccess {
                address: 0x0010,
                kind: AccessKind::Write,
                value: 0x42
            },
        ]
    );
}

#[test]
fn test_access_log_resets_each_step() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[0x85, 0x10, 0xEA]); // STA $10 ; NOP

    cpu.step().unwrap();
    assert_eq!(cpu.accesses().len(), 1);
    cpu.step().unwrap();
    assert!(cpu.accesses().is_empty());
}

#[test]
fn test_last_instruction_tracks_sequence() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[0xA9, 0x01, 0x8D, 0x00, 0x02]);

    cpu.step().unwrap();
    cpu.step().unwrap();

    let last = cpu.last_instruction().copied().unwrap();
    assert_eq!(last.address, 0x8002);
    assert_eq!(last.mnemonic, Mnemonic::Sta);
    assert_eq!(last.operand_bytes(), &[0x00, 0x02]);
    assert_eq!(last.cycles, 4);
    assert_eq!(last.sequence, 2);
    assert_eq!(cpu.last_step(), StepEvent::Executed(last));
}

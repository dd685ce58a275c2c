//! Fuzz target for CPU step execution.
//!
//! Builds an arbitrary CPU state and memory image, then steps a few
//! instructions under an active debugger with a trace, a breakpoint and a
//! watchpoint, looking for panics and broken invariants.

#![no_main]

use arbitrary::Arbitrary;
use emu6502::{
    AccessType, CpuConfig, Debugger, FlatMemory, IllegalOpcodePolicy, MemoryBus, CPU,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzCpuState {
    a: u8,
    x: u8,
    y: u8,
    sp: u8,
    status: u8,
    illegal_as_nop: bool,
    irq: bool,
    nmi: bool,
}

#[derive(Debug, Arbitrary)]
struct FuzzMemory {
    /// Bytes at the PC location
    program: [u8; 16],
    zero_page: [u8; 256],
    stack_page: [u8; 256],
    main_memory: [u8; 256],
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    cpu_state: FuzzCpuState,
    memory: FuzzMemory,
    breakpoint: u16,
    watchpoint: u16,
    trace_capacity: u8,
}

fuzz_target!(|input: FuzzInput| {
    let mut memory = FlatMemory::new();
    memory.set_reset_vector(0x8000);
    memory.write(0xFFFA, 0x00);
    memory.write(0xFFFB, 0x90);
    memory.write(0xFFFE, 0x00);
    memory.write(0xFFFF, 0xA0);

    memory.load(0x8000, &input.memory.program);
    memory.load(0x0000, &input.memory.zero_page);
    memory.load(0x0100, &input.memory.stack_page);
    // At 0x4000 for absolute addressing
    memory.load(0x4000, &input.memory.main_memory);

    let policy = if input.cpu_state.illegal_as_nop {
        IllegalOpcodePolicy::Nop
    } else {
        IllegalOpcodePolicy::Halt
    };
    let mut cpu = CPU::with_config(
        memory,
        CpuConfig::default().with_illegal_opcode_policy(policy),
    );

    cpu.set_a(input.cpu_state.a);
    cpu.set_x(input.cpu_state.x);
    cpu.set_y(input.cpu_state.y);
    cpu.set_sp(input.cpu_state.sp);
    cpu.set_status(input.cpu_state.status);
    if input.cpu_state.irq {
        cpu.irq();
    }
    if input.cpu_state.nmi {
        cpu.nmi();
    }

    let mut debugger = Debugger::new();
    debugger.start_debugging();
    debugger.set_breakpoint(input.breakpoint, None, None);
    debugger.set_watchpoint(&cpu, input.watchpoint, AccessType::Access, None, None);
    debugger.start_tracing(input.trace_capacity as usize);

    for _ in 0..8 {
        let before = cpu.cycles();
        match debugger.step(&mut cpu) {
            Ok(cycles) => assert_eq!(cpu.cycles(), before + cycles as u64),
            Err(_) => assert!(cpu.is_halted()),
        }
        // Bit 5 always reads as set
        assert_eq!(cpu.status() & 0x20, 0x20);
    }

    assert!(debugger.trace_entries().len() <= input.trace_capacity as usize);
    let profile = debugger.get_performance_profile();
    assert_eq!(
        profile.total_instructions as usize,
        debugger.trace_entries().len()
    );
});

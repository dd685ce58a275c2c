//! Debug session example
//!
//! Runs a small memory-copy loop under the debugger.
//!
//! This example shows:
//! - Building a machine from RAM and ROM devices
//! - Setting a conditional breakpoint and a write watchpoint
//! - Tracing execution and reading the performance profile
//! - Dumping memory and printing a status report

use emu6502::{
    AccessType, Condition, Debugger, MappedMemory, RamDevice, RomDevice, RunOutcome, CPU,
};

/// Copies 8 bytes from $C100 to $0200, then spins.
///
/// ```text
/// C000  LDX #$00
/// C002  LDA $C100,X
/// C005  STA $0200,X
/// C008  INX
/// C009  CPX #$08
/// C00B  BNE $C002
/// C00D  JMP $C00D
/// ```
const PROGRAM: &[u8] = &[
    0xA2, 0x00, 0xBD, 0x00, 0xC1, 0x9D, 0x00, 0x02, 0xE8, 0xE0, 0x08, 0xD0, 0xF5, 0x4C, 0x0D,
    0xC0,
];

const MESSAGE: &[u8] = b"6502 ok!";

fn build_machine() -> Result<MappedMemory, Box<dyn std::error::Error>> {
    let mut rom = vec![0xEA; 0x4000];
    rom[..PROGRAM.len()].copy_from_slice(PROGRAM);
    rom[0x100..0x100 + MESSAGE.len()].copy_from_slice(MESSAGE);
    // Reset vector -> $C000
    rom[0x3FFC] = 0x00;
    rom[0x3FFD] = 0xC0;

    let mut memory = MappedMemory::new();
    memory.add_device(0x0000, Box::new(RamDevice::new(0x8000)))?;
    memory.add_device(0xC000, Box::new(RomDevice::new(rom)))?;
    Ok(memory)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("6502 Debug Session Example");
    println!("==========================\n");

    let mut cpu = CPU::new(build_machine()?);
    let mut debugger = Debugger::new();
    debugger.start_debugging();

    // Stop on the fourth pass through the loop body
    debugger.set_conditional_breakpoint(0xC002, "x == 4".parse::<Condition>()?, Some("loop"));
    debugger.set_watchpoint(&cpu, 0x0207, AccessType::Write, None, Some("last_byte"));
    debugger.start_tracing(256);

    loop {
        let outcome = debugger.run(&mut cpu, 10_000)?;
        for event in debugger.take_events() {
            println!("event: {event}");
        }
        match outcome {
            RunOutcome::Breakpoint { address, cycles } => {
                println!("stopped at ${address:04X} after {cycles} cycles, X = {}", cpu.x());
                debugger.remove_breakpoint(address);
            }
            RunOutcome::Watchpoint { address, .. } => {
                println!("${address:04X} written, copy complete");
                break;
            }
            RunOutcome::Halted { .. } | RunOutcome::BudgetExhausted { .. } => break,
        }
    }

    let profile = debugger.get_performance_profile();
    let trace = debugger.stop_tracing();

    println!("\nLast traced instructions:");
    for entry in trace.iter().rev().take(5).rev() {
        println!(
            "  {:04X}  {:<14} A={:02X} X={:02X} Y={:02X} P={:02X}",
            entry.address,
            entry.disassembly,
            entry.registers.a,
            entry.registers.x,
            entry.registers.y,
            entry.flags
        );
    }

    println!("\nProfile:");
    println!(
        "  {} instructions, {} cycles, {:.2} cycles/instruction",
        profile.total_instructions, profile.total_cycles, profile.average_cycles_per_instruction
    );
    for (mnemonic, count) in &profile.mnemonic_frequency {
        println!("  {mnemonic:<4} {count}");
    }
    for hotspot in &profile.hotspots {
        println!("  hotspot ${:04X} x{}", hotspot.address, hotspot.count);
    }

    println!("\nMemory at $0200:");
    print!("{}", debugger.dump_memory(&cpu, 0x0200, 16));

    println!("\n{}", debugger.get_comprehensive_debug_info(&cpu));

    Ok(())
}

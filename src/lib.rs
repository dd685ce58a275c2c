//! # 6502 CPU Emulator Core with Debugger
//!
//! An instruction-granular NMOS 6502 emulator: register and flag model,
//! table-driven fetch/decode/execute over a pluggable memory bus, addressing
//! mode resolution, RESET/NMI/IRQ/BRK handling and cycle accounting, plus a
//! debugger with breakpoints, watchpoints, bounded tracing and profiling.
//!
//! ## Quick Start
//!
//! ```rust
//! use emu6502::{CPU, FlatMemory, MemoryBus};
//!
//! let mut memory = FlatMemory::new();
//!
//! // Reset vector -> 0x8000
//! memory.write(0xFFFC, 0x00);
//! memory.write(0xFFFD, 0x80);
//!
//! // LDA #$42
//! memory.load(0x8000, &[0xA9, 0x42]);
//!
//! let mut cpu = CPU::new(memory);
//! assert_eq!(cpu.pc(), 0x8000);
//!
//! cpu.step().unwrap();
//! assert_eq!(cpu.a(), 0x42);
//! assert_eq!(cpu.cycles(), 2);
//! ```
//!
//! ## Debugging
//!
//! ```rust
//! use emu6502::{CPU, Debugger, DebugEvent, FlatMemory};
//!
//! let mut memory = FlatMemory::new();
//! memory.set_reset_vector(0x8000);
//! memory.load(0x8000, &[0xEA, 0xEA, 0xEA]); // NOP NOP NOP
//!
//! let mut cpu = CPU::new(memory);
//! let mut debugger = Debugger::new();
//! debugger.start_debugging();
//! debugger.set_breakpoint(0x8002, None, None);
//!
//! debugger.run(&mut cpu, 1_000).unwrap();
//! assert_eq!(cpu.pc(), 0x8002);
//! assert!(matches!(
//!     debugger.take_events().as_slice(),
//!     [DebugEvent::BreakpointHit { address: 0x8002, .. }]
//! ));
//! ```
//!
//! ## Modules
//!
//! - `cpu` - CPU state and the step loop
//! - `registers` - register file and status flags
//! - `memory` - the `MemoryBus` trait and `FlatMemory`
//! - `devices` - memory-mapped RAM/ROM composition
//! - `opcodes` - the 256-entry opcode table
//! - `addressing` - addressing modes and operand resolution
//! - `interrupts` - vectors and interrupt service
//! - `disassembler` - decode and format machine code
//! - `debugger` - breakpoints, watchpoints, tracing and profiling

pub mod addressing;
pub mod config;
pub mod cpu;
pub mod debugger;
pub mod devices;
pub mod disassembler;
pub mod interrupts;
pub mod memory;
pub mod opcodes;
pub mod registers;

// Internal instruction implementations (not part of public API)
mod instructions;

#[cfg(feature = "wasm")]
pub mod wasm;

use thiserror::Error;

pub use addressing::{AddressingMode, Operand};
pub use config::{CpuConfig, DebuggerConfig, IllegalOpcodePolicy};
pub use cpu::{
    AccessKind, ExecutedInstruction, MemoryAccess, StackWrap, StackWrapKind, StepEvent, CPU,
    STACK_PAGE,
};
pub use debugger::{
    dump_memory, AccessType, Breakpoint, Comparison, Condition, ConditionContext, ConditionError,
    CustomPredicate, DebugEvent, DebugInfo, Debugger, HitStamp, Hotspot, PerformanceProfile,
    PointKind, RunOutcome, Term, TraceEntry, Watchpoint,
};
pub use devices::{Device, DeviceError, MappedMemory, RamDevice, RomDevice};
pub use disassembler::{disassemble, DisassemblyOptions, Instruction};
pub use interrupts::{Interrupt, IRQ_VECTOR, NMI_VECTOR, RESET_VECTOR};
pub use memory::{BusFault, FlatMemory, MemoryBus};
pub use opcodes::{Mnemonic, OpcodeMetadata, OPCODE_TABLE};
pub use registers::{Flag, FlagParseError, Registers, StatusFlags};

/// Errors that can occur during CPU execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// An undocumented opcode was fetched under [`IllegalOpcodePolicy::Halt`].
    /// The CPU is halted with PC at the opcode.
    #[error("illegal opcode 0x{opcode:02X} at 0x{address:04X}")]
    IllegalOpcode {
        /// The opcode byte
        opcode: u8,
        /// Where it was fetched
        address: u16,
    },

    /// The memory reported a fault during the step.
    #[error("bus fault: {0}")]
    Bus(#[from] BusFault),
}

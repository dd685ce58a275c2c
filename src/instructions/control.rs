//! # Control Flow Instructions
//!
//! - JMP: absolute or indirect jump
//! - JSR / RTS: subroutine call and return
//! - RTI: return from interrupt
//! - BRK: software interrupt
//!
//! JSR pushes the address of its own last byte (return address - 1); RTS pulls
//! it and adds one. BRK is a one-byte opcode followed by a padding byte, so the
//! pushed return address is the opcode address + 2.

use crate::addressing::Operand;
use crate::interrupts::Interrupt;
use crate::{MemoryBus, CPU};

/// JMP: PC = target.
pub(crate) fn execute_jmp<M: MemoryBus>(cpu: &mut CPU<M>, operand: Operand) {
    if let Operand::Address(target) = operand {
        cpu.regs.pc = target;
    }
}

/// JSR: push (PC - 1), then PC = target.
pub(crate) fn execute_jsr<M: MemoryBus>(cpu: &mut CPU<M>, operand: Operand) {
    if let Operand::Address(target) = operand {
        let return_address = cpu.regs.pc.wrapping_sub(1);
        cpu.push_word(return_address);
        cpu.regs.pc = target;
    }
}

/// RTS: pull PC, then PC + 1.
pub(crate) fn execute_rts<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.regs.pc = cpu.pull_word().wrapping_add(1);
}

/// RTI: pull P (B ignored, bit 5 forced), then pull PC.
pub(crate) fn execute_rti<M: MemoryBus>(cpu: &mut CPU<M>) {
    super::stack::restore_status(cpu);
    cpu.regs.pc = cpu.pull_word();
}

/// BRK: skip the padding byte and enter the IRQ/BRK handler with B set in the
/// pushed status.
pub(crate) fn execute_brk<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.regs.pc = cpu.regs.pc.wrapping_add(1);
    // Cycle cost is carried by the opcode table
    let _ = cpu.service_interrupt(Interrupt::Brk);
}

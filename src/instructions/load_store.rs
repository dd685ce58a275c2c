//! # Load and Store Instructions
//!
//! - LDA / LDX / LDY: load a register, update Z and N
//! - STA / STX / STY: store a register, no flags
//!
//! Stores never pay the indexed page-crossing penalty; the opcode table
//! encodes their fixed cost.

use crate::addressing::Operand;
use crate::{MemoryBus, CPU};

/// LDA: A = M.
pub(crate) fn execute_lda<M: MemoryBus>(cpu: &mut CPU<M>, operand: Operand) {
    cpu.regs.a = cpu.load(operand);
    cpu.regs.p.update_nz(cpu.regs.a);
}

/// LDX: X = M.
pub(crate) fn execute_ldx<M: MemoryBus>(cpu: &mut CPU<M>, operand: Operand) {
    cpu.regs.x = cpu.load(operand);
    cpu.regs.p.update_nz(cpu.regs.x);
}

/// LDY: Y = M.
pub(crate) fn execute_ldy<M: MemoryBus>(cpu: &mut CPU<M>, operand: Operand) {
    cpu.regs.y = cpu.load(operand);
    cpu.regs.p.update_nz(cpu.regs.y);
}

/// STA: M = A.
pub(crate) fn execute_sta<M: MemoryBus>(cpu: &mut CPU<M>, operand: Operand) {
    cpu.store(operand, cpu.regs.a);
}

/// STX: M = X.
pub(crate) fn execute_stx<M: MemoryBus>(cpu: &mut CPU<M>, operand: Operand) {
    cpu.store(operand, cpu.regs.x);
}

/// STY: M = Y.
pub(crate) fn execute_sty<M: MemoryBus>(cpu: &mut CPU<M>, operand: Operand) {
    cpu.store(operand, cpu.regs.y);
}

//! # Increment and Decrement Instructions
//!
//! - INC / DEC: read-modify-write on memory
//! - INX / INY / DEX / DEY: register forms
//!
//! All wrap at the byte boundary and update Z and N only.

use crate::addressing::Operand;
use crate::{MemoryBus, CPU};

fn modify_memory<M: MemoryBus>(cpu: &mut CPU<M>, operand: Operand, f: fn(u8) -> u8) {
    let result = f(cpu.load(operand));
    cpu.store(operand, result);
    cpu.regs.p.update_nz(result);
}

/// INC: M = M + 1.
pub(crate) fn execute_inc<M: MemoryBus>(cpu: &mut CPU<M>, operand: Operand) {
    modify_memory(cpu, operand, |v| v.wrapping_add(1));
}

/// DEC: M = M - 1.
pub(crate) fn execute_dec<M: MemoryBus>(cpu: &mut CPU<M>, operand: Operand) {
    modify_memory(cpu, operand, |v| v.wrapping_sub(1));
}

pub(crate) fn execute_inx<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.regs.x = cpu.regs.x.wrapping_add(1);
    cpu.regs.p.update_nz(cpu.regs.x);
}

pub(crate) fn execute_iny<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.regs.y = cpu.regs.y.wrapping_add(1);
    cpu.regs.p.update_nz(cpu.regs.y);
}

pub(crate) fn execute_dex<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.regs.x = cpu.regs.x.wrapping_sub(1);
    cpu.regs.p.update_nz(cpu.regs.x);
}

pub(crate) fn execute_dey<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.regs.y = cpu.regs.y.wrapping_sub(1);
    cpu.regs.p.update_nz(cpu.regs.y);
}

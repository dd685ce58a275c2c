//! # Stack Instructions
//!
//! - PHA / PLA: push and pull the accumulator (PLA updates Z and N)
//! - PHP / PLP: push and pull the status register
//!
//! PHP pushes P with B and bit 5 set. PLP, like RTI, ignores the B bit of the
//! pulled byte and keeps bit 5 set.

use crate::registers::{Flag, StatusFlags};
use crate::{MemoryBus, CPU};

pub(crate) fn execute_pha<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.push_byte(cpu.regs.a);
}

pub(crate) fn execute_php<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.push_byte(cpu.regs.p.to_byte() | Flag::Break.mask());
}

pub(crate) fn execute_pla<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.regs.a = cpu.pull_byte();
    cpu.regs.p.update_nz(cpu.regs.a);
}

pub(crate) fn execute_plp<M: MemoryBus>(cpu: &mut CPU<M>) {
    restore_status(cpu);
}

/// Pulls P from the stack, keeping the current B bit.
pub(crate) fn restore_status<M: MemoryBus>(cpu: &mut CPU<M>) {
    let b = cpu.regs.p.b;
    let mut p = StatusFlags::from_byte(cpu.pull_byte());
    p.b = b;
    cpu.regs.p = p;
}

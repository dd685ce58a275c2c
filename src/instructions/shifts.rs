//! # Shift and Rotate Instructions
//!
//! ASL, LSR, ROL, ROR, on the accumulator or on memory (read-modify-write).
//!
//! The bit shifted out lands in C; Z and N follow the result. LSR always
//! clears N.

use crate::addressing::Operand;
use crate::{MemoryBus, CPU};

fn shift<M: MemoryBus>(cpu: &mut CPU<M>, operand: Operand, f: impl FnOnce(u8, bool) -> (u8, bool)) {
    let value = cpu.load(operand);
    let (result, carry) = f(value, cpu.regs.p.c);
    cpu.store(operand, result);
    cpu.regs.p.c = carry;
    cpu.regs.p.update_nz(result);
}

/// ASL: C <- [7..0] <- 0.
pub(crate) fn execute_asl<M: MemoryBus>(cpu: &mut CPU<M>, operand: Operand) {
    shift(cpu, operand, |v, _| (v << 1, v & 0x80 != 0));
}

/// LSR: 0 -> [7..0] -> C.
pub(crate) fn execute_lsr<M: MemoryBus>(cpu: &mut CPU<M>, operand: Operand) {
    shift(cpu, operand, |v, _| (v >> 1, v & 0x01 != 0));
}

/// ROL: C <- [7..0] <- C.
pub(crate) fn execute_rol<M: MemoryBus>(cpu: &mut CPU<M>, operand: Operand) {
    shift(cpu, operand, |v, c| ((v << 1) | c as u8, v & 0x80 != 0));
}

/// ROR: C -> [7..0] -> C.
pub(crate) fn execute_ror<M: MemoryBus>(cpu: &mut CPU<M>, operand: Operand) {
    shift(cpu, operand, |v, c| ((v >> 1) | ((c as u8) << 7), v & 0x01 != 0));
}

//! # ALU (Arithmetic Logic Unit) Instructions
//!
//! - ADC / SBC: add and subtract with carry, binary and decimal (BCD) paths
//! - AND / ORA / EOR: bitwise logic on the accumulator (Z, N only)
//! - CMP / CPX / CPY: register compare (C, Z, N only)
//! - BIT: bit test (Z from A & M, N and V copied from M)
//!
//! Decimal mode follows NMOS behaviour: the result in A is BCD-corrected while
//! V and Z come from the equivalent binary operation and N from the high
//! nibble before its correction.

use crate::addressing::Operand;
use crate::{MemoryBus, CPU};

/// Result of an 8-bit add or subtract with the flags it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ArithmeticOutput {
    pub result: u8,
    pub carry: bool,
    pub overflow: bool,
    pub zero: bool,
    pub negative: bool,
}

/// Binary `a + value + carry`.
pub(crate) fn adc_binary(a: u8, value: u8, carry: bool) -> ArithmeticOutput {
    let sum = a as u16 + value as u16 + carry as u16;
    let result = sum as u8;
    ArithmeticOutput {
        result,
        carry: sum > 0xFF,
        // Both operands share a sign that the result does not
        overflow: (a ^ result) & (value ^ result) & 0x80 != 0,
        zero: result == 0,
        negative: result & 0x80 != 0,
    }
}

/// BCD `a + value + carry`.
pub(crate) fn adc_decimal(a: u8, value: u8, carry: bool) -> ArithmeticOutput {
    let binary = adc_binary(a, value, carry);

    let mut lo = (a & 0x0F) as u16 + (value & 0x0F) as u16 + carry as u16;
    if lo > 9 {
        lo += 6;
    }
    let mut hi = (a >> 4) as u16 + (value >> 4) as u16 + (lo > 0x0F) as u16;

    // N is taken before the high nibble is corrected
    let negative = hi & 0x08 != 0;

    if hi > 9 {
        hi += 6;
    }

    ArithmeticOutput {
        result: ((hi << 4) | (lo & 0x0F)) as u8,
        carry: hi > 0x0F,
        overflow: binary.overflow,
        zero: binary.zero,
        negative,
    }
}

/// BCD `a - value - !carry`.
pub(crate) fn sbc_decimal(a: u8, value: u8, carry: bool) -> ArithmeticOutput {
    let binary = adc_binary(a, !value, carry);
    let borrow = (!carry) as i16;

    let mut lo = (a & 0x0F) as i16 - (value & 0x0F) as i16 - borrow;
    let mut hi = (a >> 4) as i16 - (value >> 4) as i16;
    if lo < 0 {
        lo -= 6;
        hi -= 1;
    }
    if hi < 0 {
        hi -= 6;
    }

    ArithmeticOutput {
        result: ((hi << 4) as u8) | ((lo & 0x0F) as u8),
        ..binary
    }
}

fn apply<M: MemoryBus>(cpu: &mut CPU<M>, out: ArithmeticOutput) {
    cpu.regs.a = out.result;
    cpu.regs.p.c = out.carry;
    cpu.regs.p.v = out.overflow;
    cpu.regs.p.z = out.zero;
    cpu.regs.p.n = out.negative;
}

/// ADC: A = A + M + C. Updates C, Z, V, N.
pub(crate) fn execute_adc<M: MemoryBus>(cpu: &mut CPU<M>, operand: Operand) {
    let value = cpu.load(operand);
    let out = if cpu.regs.p.d {
        adc_decimal(cpu.regs.a, value, cpu.regs.p.c)
    } else {
        adc_binary(cpu.regs.a, value, cpu.regs.p.c)
    };
    apply(cpu, out);
}

/// SBC: A = A - M - !C. Updates C, Z, V, N.
///
/// In binary mode this is ADC of the one's complement.
pub(crate) fn execute_sbc<M: MemoryBus>(cpu: &mut CPU<M>, operand: Operand) {
    let value = cpu.load(operand);
    let out = if cpu.regs.p.d {
        sbc_decimal(cpu.regs.a, value, cpu.regs.p.c)
    } else {
        adc_binary(cpu.regs.a, !value, cpu.regs.p.c)
    };
    apply(cpu, out);
}

/// AND: A = A & M. Updates Z, N.
pub(crate) fn execute_and<M: MemoryBus>(cpu: &mut CPU<M>, operand: Operand) {
    let value = cpu.load(operand);
    cpu.regs.a &= value;
    cpu.regs.p.update_nz(cpu.regs.a);
}

/// ORA: A = A | M. Updates Z, N.
pub(crate) fn execute_ora<M: MemoryBus>(cpu: &mut CPU<M>, operand: Operand) {
    let value = cpu.load(operand);
    cpu.regs.a |= value;
    cpu.regs.p.update_nz(cpu.regs.a);
}

/// EOR: A = A ^ M. Updates Z, N.
pub(crate) fn execute_eor<M: MemoryBus>(cpu: &mut CPU<M>, operand: Operand) {
    let value = cpu.load(operand);
    cpu.regs.a ^= value;
    cpu.regs.p.update_nz(cpu.regs.a);
}

fn compare<M: MemoryBus>(cpu: &mut CPU<M>, register: u8, operand: Operand) {
    let value = cpu.load(operand);
    cpu.regs.p.c = register >= value;
    cpu.regs.p.update_nz(register.wrapping_sub(value));
}

/// CMP: compare A with M. Updates C, Z, N.
pub(crate) fn execute_cmp<M: MemoryBus>(cpu: &mut CPU<M>, operand: Operand) {
    let a = cpu.regs.a;
    compare(cpu, a, operand);
}

/// CPX: compare X with M. Updates C, Z, N.
pub(crate) fn execute_cpx<M: MemoryBus>(cpu: &mut CPU<M>, operand: Operand) {
    let x = cpu.regs.x;
    compare(cpu, x, operand);
}

/// CPY: compare Y with M. Updates C, Z, N.
pub(crate) fn execute_cpy<M: MemoryBus>(cpu: &mut CPU<M>, operand: Operand) {
    let y = cpu.regs.y;
    compare(cpu, y, operand);
}

/// BIT: Z = (A & M) == 0, N = M bit 7, V = M bit 6. A is unchanged.
pub(crate) fn execute_bit<M: MemoryBus>(cpu: &mut CPU<M>, operand: Operand) {
    let value = cpu.load(operand);
    cpu.regs.p.z = cpu.regs.a & value == 0;
    cpu.regs.p.n = value & 0x80 != 0;
    cpu.regs.p.v = value & 0x40 != 0;
}

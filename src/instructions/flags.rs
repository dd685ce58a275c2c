//! # Flag Instructions
//!
//! CLC, SEC, CLI, SEI, CLD, SED, CLV. Each writes a single flag and touches
//! nothing else. All take 2 cycles.

use crate::registers::Flag;
use crate::{MemoryBus, CPU};

pub(crate) fn execute_flag_write<M: MemoryBus>(cpu: &mut CPU<M>, flag: Flag, value: bool) {
    cpu.regs.p.set(flag, value);
}

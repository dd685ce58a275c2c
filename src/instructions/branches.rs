//! # Branch Instructions
//!
//! BCC, BCS, BEQ, BNE, BMI, BPL, BVC, BVS.
//!
//! All branches use relative addressing with a signed 8-bit offset from the
//! address of the next instruction. The resolver has already computed the
//! target and whether it lies on another page.
//!
//! Cycle timing:
//! - 2 cycles if the branch is not taken
//! - 3 cycles if taken to the same page
//! - 4 cycles if taken to a different page
//!
//! No flags are affected.

use crate::addressing::{Operand, Resolved};
use crate::{MemoryBus, CPU};

/// Takes the branch when `condition` holds and returns the extra cycles.
pub(crate) fn branch_if<M: MemoryBus>(cpu: &mut CPU<M>, condition: bool, resolved: Resolved) -> u8 {
    if !condition {
        return 0;
    }

    let Operand::Address(target) = resolved.operand else {
        return 0;
    };
    cpu.regs.pc = target;

    if resolved.page_crossed {
        2
    } else {
        1
    }
}

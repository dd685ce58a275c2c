//! # Interrupt Handling
//!
//! The 6502 has four ways into an interrupt handler, in priority order:
//!
//! 1. **RESET** - [`CPU::reset`], synchronous, clears everything pending
//! 2. **NMI** - edge-triggered, honoured at the next instruction boundary even
//!    with the I flag set
//! 3. **IRQ** - level-triggered, ignored (but kept pending) while I is set
//! 4. **BRK** - the software interrupt, executed as an instruction
//!
//! NMI, IRQ and BRK share one service sequence:
//!
//! 1. Push PC (high byte, then low byte)
//! 2. Push the status register (bit 5 set, B set only for BRK)
//! 3. Set the I flag
//! 4. Load PC from the vector
//!
//! **Total: 7 cycles**

use log::debug;

use crate::registers::Flag;
use crate::{MemoryBus, CPU};

/// NMI vector (0xFFFA/0xFFFB).
pub const NMI_VECTOR: u16 = 0xFFFA;
/// RESET vector (0xFFFC/0xFFFD).
pub const RESET_VECTOR: u16 = 0xFFFC;
/// IRQ/BRK vector (0xFFFE/0xFFFF).
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Cycles spent entering a handler.
pub const INTERRUPT_CYCLES: u8 = 7;

/// Interrupt sources, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Interrupt {
    /// Power-on / reset line
    Reset,
    /// Non-maskable interrupt
    Nmi,
    /// Maskable interrupt request
    Irq,
    /// Software interrupt (BRK instruction)
    Brk,
}

impl Interrupt {
    /// Address of the little-endian handler pointer.
    pub const fn vector(self) -> u16 {
        match self {
            Interrupt::Reset => RESET_VECTOR,
            Interrupt::Nmi => NMI_VECTOR,
            Interrupt::Irq | Interrupt::Brk => IRQ_VECTOR,
        }
    }
}

impl<M: MemoryBus> CPU<M> {
    /// Requests a maskable interrupt.
    ///
    /// The request stays asserted until it is serviced (or cleared with
    /// [`CPU::clear_irq`]); while the I flag is set it simply waits.
    pub fn irq(&mut self) {
        self.irq_pending = true;
    }

    /// Withdraws a pending `irq()` request that has not been serviced yet.
    pub fn clear_irq(&mut self) {
        self.irq_pending = false;
    }

    /// Requests a non-maskable interrupt.
    ///
    /// The edge is latched; repeated calls before the next step collapse into
    /// a single NMI.
    pub fn nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// Picks the interrupt to service at this boundary, if any.
    pub(crate) fn pending_interrupt(&self) -> Option<Interrupt> {
        if self.nmi_pending {
            Some(Interrupt::Nmi)
        } else if !self.regs.p.i && (self.irq_pending || self.memory.irq_active()) {
            Some(Interrupt::Irq)
        } else {
            None
        }
    }

    /// Runs the common interrupt entry sequence and returns its cycle cost.
    ///
    /// For BRK the caller has already advanced PC past the padding byte.
    pub(crate) fn service_interrupt(&mut self, kind: Interrupt) -> u8 {
        let return_address = self.regs.pc;
        self.push_word(return_address);

        let mut status = self.regs.p.to_byte() & !Flag::Break.mask();
        if kind == Interrupt::Brk {
            status |= Flag::Break.mask();
        }
        self.push_byte(status);

        self.regs.p.i = true;
        self.regs.pc = self.read_vector(kind.vector());

        match kind {
            Interrupt::Nmi => self.nmi_pending = false,
            Interrupt::Irq => self.irq_pending = false,
            Interrupt::Reset | Interrupt::Brk => {}
        }

        debug!(
            "{:?} from 0x{:04X} to 0x{:04X}",
            kind, return_address, self.regs.pc
        );
        INTERRUPT_CYCLES
    }
}

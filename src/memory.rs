//! # Memory Bus Abstraction
//!
//! The CPU reaches memory only through [`MemoryBus`]: opcode fetches, operand
//! bytes, data accesses, the stack and the interrupt vectors all go through it.
//!
//! ## Contract
//!
//! - `read` returns a byte for every address 0x0000-0xFFFF. What unmapped regions
//!   return is the implementation's decision.
//! - `write` to a read-only region is a no-op from the CPU's point of view. An
//!   implementation that wants to flag the violation reports it through
//!   [`MemoryBus::take_fault`]; the CPU then fails the step that caused it.
//! - `peek` is a side-effect-free read for debuggers. `None` means the byte could
//!   not be read.

use thiserror::Error;

/// A violation reported by a memory implementation through its own error channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BusFault {
    /// A write hit a read-only region.
    #[error("write of 0x{value:02X} to read-only address 0x{address:04X}")]
    ReadOnlyWrite {
        /// Target address
        address: u16,
        /// Value the CPU tried to store
        value: u8,
    },

    /// An access hit an address no device answers for.
    #[error("access to unmapped address 0x{address:04X}")]
    Unmapped {
        /// Target address
        address: u16,
    },
}

/// Byte-wide access to the 16-bit address space, as seen by the CPU.
///
/// Only `read` and `write` are required. A bus that wants the CPU to fail on
/// illegal writes keeps the first fault and hands it over in `take_fault`:
///
/// ```
/// use emu6502::{BusFault, ExecutionError, MemoryBus, CPU};
///
/// /// RAM below 0xC000, a fixed program page above it.
/// struct Guarded {
///     bytes: Vec<u8>,
///     fault: Option<BusFault>,
/// }
///
/// impl MemoryBus for Guarded {
///     fn read(&self, addr: u16) -> u8 {
///         self.bytes[addr as usize]
///     }
///
///     fn write(&mut self, addr: u16, value: u8) {
///         match addr {
///             0xC000.. => {
///                 self.fault.get_or_insert(BusFault::ReadOnlyWrite { address: addr, value });
///             }
///             _ => self.bytes[addr as usize] = value,
///         }
///     }
///
///     fn take_fault(&mut self) -> Option<BusFault> {
///         self.fault.take()
///     }
/// }
///
/// let mut bytes = vec![0; 0x1_0000];
/// bytes[0xFFFD] = 0xC0; // reset to $C000
/// bytes[0xC000..0xC003].copy_from_slice(&[0x8D, 0x00, 0xD0]); // STA $D000
///
/// let mut cpu = CPU::new(Guarded { bytes, fault: None });
/// assert_eq!(
///     cpu.step(),
///     Err(ExecutionError::Bus(BusFault::ReadOnlyWrite { address: 0xD000, value: 0 }))
/// );
/// ```
pub trait MemoryBus {
    /// Returns the byte at `addr`. Must answer every address without panicking.
    fn read(&self, addr: u16) -> u8;

    /// Stores `value` at `addr`. Read-only or unmapped targets may drop it.
    fn write(&mut self, addr: u16, value: u8);

    /// Returns the memory to its power-on contents.
    ///
    /// The CPU never calls this on its own; the owner of the machine decides when
    /// memory is reset.
    fn reset(&mut self) {}

    /// Reads a byte without side effects, for inspection tools.
    ///
    /// Returns `None` when the address cannot be read. The default forwards to
    /// [`MemoryBus::read`].
    fn peek(&self, addr: u16) -> Option<u8> {
        Some(self.read(addr))
    }

    /// Returns and clears the first fault raised since the last call.
    ///
    /// The CPU polls this once at the end of every step.
    fn take_fault(&mut self) -> Option<BusFault> {
        None
    }

    /// Whether some device holds the IRQ line low.
    ///
    /// Level-sensitive: sampled at every instruction boundary until the device
    /// lets go.
    fn irq_active(&self) -> bool {
        false
    }
}

/// 64 KiB of plain RAM, zeroed. Never faults.
///
/// ```
/// use emu6502::{CPU, FlatMemory};
///
/// let mut memory = FlatMemory::new();
/// memory.set_reset_vector(0x8000);
/// memory.load(0x8000, &[0xEA]);
///
/// let cpu = CPU::new(memory);
/// assert_eq!(cpu.pc(), 0x8000);
/// ```
pub struct FlatMemory {
    data: Box<[u8; 65536]>,
}

impl FlatMemory {
    /// Creates a new FlatMemory instance with all bytes initialized to zero.
    pub fn new() -> Self {
        Self {
            data: Box::new([0; 65536]),
        }
    }

    /// Copies `bytes` into memory starting at `start`, wrapping at 0xFFFF.
    ///
    /// ```
    /// use emu6502::{FlatMemory, MemoryBus};
    ///
    /// let mut mem = FlatMemory::new();
    /// mem.load(0x8000, &[0xA9, 0x42]);
    /// assert_eq!(mem.read(0x8001), 0x42);
    /// ```
    pub fn load(&mut self, start: u16, bytes: &[u8]) {
        let mut addr = start;
        for &byte in bytes {
            self.data[addr as usize] = byte;
            addr = addr.wrapping_add(1);
        }
    }

    /// Points the reset vector (0xFFFC/0xFFFD) at `target`.
    pub fn set_reset_vector(&mut self, target: u16) {
        let [lo, hi] = target.to_le_bytes();
        self.data[0xFFFC] = lo;
        self.data[0xFFFD] = hi;
    }
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus for FlatMemory {
    fn read(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.data[addr as usize] = value;
    }

    fn reset(&mut self) {
        self.data.fill(0);
    }
}

//! Memory-mapped device support.
//!
//! [`MappedMemory`] routes CPU accesses to devices registered over disjoint
//! address ranges and implements [`MemoryBus`] on top of them.
//!
//! # Behaviour of gaps
//!
//! - Reads of an unmapped address return the floating-bus value (0xFF by
//!   default); `peek` reports them as unreadable (`None`).
//! - Writes to unmapped addresses or to read-only devices are dropped. With
//!   strict writes enabled the first such write since the last poll is
//!   reported through [`MemoryBus::take_fault`], which makes the CPU fail the
//!   step.
//! - The IRQ line is the OR of every device's `irq_active`.
//!
//! # Example
//!
//! ```rust
//! use emu6502::{CPU, MappedMemory, RamDevice, RomDevice};
//!
//! let mut memory = MappedMemory::new();
//!
//! // 16KB RAM at 0x0000-0x3FFF
//! memory.add_device(0x0000, Box::new(RamDevice::new(0x4000))).unwrap();
//!
//! // 16KB ROM at 0xC000-0xFFFF, reset vector pointing at 0xC000
//! let mut rom = vec![0xEA; 0x4000];
//! rom[0x3FFC] = 0x00;
//! rom[0x3FFD] = 0xC0;
//! memory.add_device(0xC000, Box::new(RomDevice::new(rom))).unwrap();
//!
//! let cpu = CPU::new(memory);
//! assert_eq!(cpu.pc(), 0xC000);
//! ```

use thiserror::Error;

use crate::{BusFault, MemoryBus};

pub mod ram;
pub mod rom;

pub use ram::RamDevice;
pub use rom::RomDevice;

/// A hardware component occupying a contiguous address range.
///
/// The mapper passes offsets (0 to size-1), never absolute addresses, so a
/// device does not know where it is mapped.
///
/// ```rust
/// use emu6502::Device;
///
/// struct Latch(u8);
///
/// impl Device for Latch {
///     fn read(&self, _offset: u16) -> u8 {
///         self.0
///     }
///
///     fn write(&mut self, _offset: u16, value: u8) {
///         self.0 = value;
///     }
///
///     fn size(&self) -> u32 {
///         1
///     }
/// }
/// ```
pub trait Device {
    /// Reads the byte at `offset`.
    fn read(&self, offset: u16) -> u8;

    /// Writes the byte at `offset`. Only called when [`Device::is_writable`]
    /// returns true.
    fn write(&mut self, offset: u16, value: u8);

    /// Number of bytes the device occupies (1..=0x10000).
    fn size(&self) -> u32;

    /// Whether CPU writes reach the device.
    fn is_writable(&self) -> bool {
        true
    }

    /// Returns the device to its power-on state.
    fn reset(&mut self) {}

    /// Whether the device is pulling the IRQ line.
    fn irq_active(&self) -> bool {
        false
    }
}

/// Why [`MappedMemory::add_device`] rejected a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// The new device would share addresses with one already mapped.
    #[error(
        "device at 0x{new_base:04X} (0x{new_size:X} bytes) overlaps device at \
         0x{existing_base:04X} (0x{existing_size:X} bytes)"
    )]
    Overlap {
        /// Base address of the new device
        new_base: u16,
        /// Size of the new device
        new_size: u32,
        /// Base address of the conflicting device
        existing_base: u16,
        /// Size of the conflicting device
        existing_size: u32,
    },

    /// The device reports a size of zero or runs past 0xFFFF.
    #[error("device at 0x{base:04X} has invalid size 0x{size:X}")]
    InvalidSize {
        /// Requested base address
        base: u16,
        /// Reported size
        size: u32,
    },
}

struct DeviceMapping {
    base: u16,
    /// Exclusive end, may be 0x10000
    end: u32,
    device: Box<dyn Device>,
}

impl DeviceMapping {
    fn contains(&self, addr: u16) -> bool {
        addr >= self.base && (addr as u32) < self.end
    }
}

/// Memory mapper that routes reads and writes to registered devices.
///
/// ```rust
/// use emu6502::{MappedMemory, MemoryBus, RamDevice};
///
/// let mut memory = MappedMemory::new();
/// memory.add_device(0x0000, Box::new(RamDevice::new(0x4000))).unwrap();
///
/// memory.write(0x1234, 0x42);
/// assert_eq!(memory.read(0x1234), 0x42);
///
/// // Unmapped
/// assert_eq!(memory.read(0x8000), 0xFF);
/// assert_eq!(memory.peek(0x8000), None);
/// ```
pub struct MappedMemory {
    devices: Vec<DeviceMapping>,
    unmapped_value: u8,
    strict_writes: bool,
    fault: Option<BusFault>,
}

impl MappedMemory {
    /// Creates an empty mapper with lenient writes and 0xFF unmapped reads.
    pub fn new() -> Self {
        Self {
            devices: Vec::new(),
            unmapped_value: 0xFF,
            strict_writes: false,
            fault: None,
        }
    }

    /// Reports dropped writes as bus faults instead of ignoring them.
    pub fn with_strict_writes(mut self, strict: bool) -> Self {
        self.strict_writes = strict;
        self
    }

    /// Sets the value returned for unmapped reads.
    pub fn with_unmapped_value(mut self, value: u8) -> Self {
        self.unmapped_value = value;
        self
    }

    /// Maps `device` at `base`.
    ///
    /// ```rust
    /// use emu6502::{DeviceError, MappedMemory, RamDevice};
    ///
    /// let mut memory = MappedMemory::new();
    /// memory.add_device(0x0000, Box::new(RamDevice::new(0x4000))).unwrap();
    ///
    /// let result = memory.add_device(0x1000, Box::new(RamDevice::new(0x400)));
    /// assert!(matches!(result, Err(DeviceError::Overlap { .. })));
    /// ```
    pub fn add_device(&mut self, base: u16, device: Box<dyn Device>) -> Result<(), DeviceError> {
        let size = device.size();
        let end = base as u32 + size;
        if size == 0 || end > 0x1_0000 {
            return Err(DeviceError::InvalidSize { base, size });
        }

        if let Some(existing) = self
            .devices
            .iter()
            .find(|m| (base as u32) < m.end && end > m.base as u32)
        {
            return Err(DeviceError::Overlap {
                new_base: base,
                new_size: size,
                existing_base: existing.base,
                existing_size: existing.end - existing.base as u32,
            });
        }

        self.devices.push(DeviceMapping { base, end, device });
        Ok(())
    }

    /// Number of mapped devices.
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    fn find(&self, addr: u16) -> Option<(&dyn Device, u16)> {
        self.devices
            .iter()
            .find(|m| m.contains(addr))
            .map(|m| (m.device.as_ref(), addr - m.base))
    }

    fn find_mut(&mut self, addr: u16) -> Option<(&mut dyn Device, u16)> {
        for mapping in &mut self.devices {
            if mapping.contains(addr) {
                return Some((mapping.device.as_mut(), addr - mapping.base));
            }
        }
        None
    }

    fn raise(&mut self, fault: BusFault) {
        if self.strict_writes && self.fault.is_none() {
            self.fault = Some(fault);
        }
    }
}

impl Default for MappedMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus for MappedMemory {
    fn read(&self, addr: u16) -> u8 {
        match self.find(addr) {
            Some((device, offset)) => device.read(offset),
            None => self.unmapped_value,
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match self.find_mut(addr) {
            Some((device, offset)) if device.is_writable() => device.write(offset, value),
            Some(_) => self.raise(BusFault::ReadOnlyWrite {
                address: addr,
                value,
            }),
            None => self.raise(BusFault::Unmapped { address: addr }),
        }
    }

    fn reset(&mut self) {
        for mapping in &mut self.devices {
            mapping.device.reset();
        }
        self.fault = None;
    }

    fn peek(&self, addr: u16) -> Option<u8> {
        self.find(addr).map(|(device, offset)| device.read(offset))
    }

    fn take_fault(&mut self) -> Option<BusFault> {
        self.fault.take()
    }

    fn irq_active(&self) -> bool {
        self.devices.iter().any(|m| m.device.irq_active())
    }
}

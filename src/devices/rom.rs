//! ROM device.

use super::Device;

/// Read-only storage.
///
/// The mapper never forwards CPU writes to it; whether such a write is
/// ignored or reported is the mapper's choice (see
/// [`MappedMemory::with_strict_writes`](super::MappedMemory::with_strict_writes)).
///
/// ```rust
/// use emu6502::{MappedMemory, MemoryBus, RomDevice};
///
/// let mut memory = MappedMemory::new();
/// memory.add_device(0xF000, Box::new(RomDevice::new(vec![0xEA; 0x1000]))).unwrap();
///
/// memory.write(0xF000, 0xFF);
/// assert_eq!(memory.read(0xF000), 0xEA);
/// ```
pub struct RomDevice {
    data: Vec<u8>,
}

impl RomDevice {
    /// Creates a ROM holding `data`.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl Device for RomDevice {
    fn read(&self, offset: u16) -> u8 {
        self.data.get(offset as usize).copied().unwrap_or(0xFF)
    }

    fn write(&mut self, _offset: u16, _value: u8) {}

    fn size(&self) -> u32 {
        self.data.len() as u32
    }

    fn is_writable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rom_contents_and_size() {
        let rom = RomDevice::new(vec![0x01, 0x02, 0x03]);
        assert_eq!(rom.size(), 3);
        assert_eq!(rom.read(1), 0x02);
        assert!(!rom.is_writable());
    }
}

//! RAM device.

use super::Device;

/// Readable and writable storage, zeroed on creation and on reset.
///
/// ```rust
/// use emu6502::{Device, RamDevice};
///
/// let mut ram = RamDevice::new(1024);
/// ram.write(0x42, 0xAA);
/// assert_eq!(ram.read(0x42), 0xAA);
/// ```
pub struct RamDevice {
    data: Vec<u8>,
}

impl RamDevice {
    /// Creates `size` bytes of zeroed RAM.
    pub fn new(size: u32) -> Self {
        Self {
            data: vec![0; size as usize],
        }
    }

    /// Copies `bytes` in at `offset`. Bytes past the end of the device are
    /// dropped.
    ///
    /// ```rust
    /// use emu6502::{Device, RamDevice};
    ///
    /// let mut ram = RamDevice::new(4);
    /// ram.load_bytes(2, &[0x01, 0x02, 0x03]);
    /// assert_eq!(ram.read(3), 0x02);
    /// ```
    pub fn load_bytes(&mut self, offset: u16, bytes: &[u8]) {
        let start = (offset as usize).min(self.data.len());
        let end = (start + bytes.len()).min(self.data.len());
        self.data[start..end].copy_from_slice(&bytes[..end - start]);
    }
}

impl Device for RamDevice {
    fn read(&self, offset: u16) -> u8 {
        self.data.get(offset as usize).copied().unwrap_or(0)
    }

    fn write(&mut self, offset: u16, value: u8) {
        if let Some(slot) = self.data.get_mut(offset as usize) {
            *slot = value;
        }
    }

    fn size(&self) -> u32 {
        self.data.len() as u32
    }

    fn reset(&mut self) {
        self.data.fill(0);
    }
}

//! Hex dump rendering.

use std::fmt::Write;

use crate::MemoryBus;

const ROW: usize = 16;

/// Renders `length` bytes from `start` as 16-byte rows:
///
/// ```text
/// 0200: 48 45 4C 4C 4F 00 01 02 03 04 05 06 07 08 09 0A |HELLO...........|
/// ```
///
/// Bytes that cannot be read print as `??` / `?`; a short last row is padded
/// with blanks. Addresses wrap at 0xFFFF. Reads go through
/// [`MemoryBus::peek`] and never disturb devices.
pub fn dump_memory<M: MemoryBus + ?Sized>(memory: &M, start: u16, length: usize) -> String {
    let mut out = String::new();
    let mut offset = 0usize;

    while offset < length {
        let row_addr = start.wrapping_add(offset as u16);
        let count = (length - offset).min(ROW);
        let mut ascii = String::with_capacity(ROW);

        let _ = write!(out, "{row_addr:04X}:");
        for i in 0..ROW {
            if i >= count {
                out.push_str("   ");
                ascii.push(' ');
                continue;
            }
            match memory.peek(row_addr.wrapping_add(i as u16)) {
                Some(byte) => {
                    let _ = write!(out, " {byte:02X}");
                    ascii.push(if (0x20..=0x7E).contains(&byte) {
                        byte as char
                    } else {
                        '.'
                    });
                }
                None => {
                    out.push_str(" ??");
                    ascii.push('?');
                }
            }
        }
        let _ = writeln!(out, " |{ascii}|");
        offset += count;
    }

    out
}

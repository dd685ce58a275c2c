//! # Register File
//!
//! Plain data for the 6502 programmer-visible registers:
//!
//! - **A, X, Y**: 8-bit accumulator and index registers
//! - **PC**: 16-bit program counter
//! - **SP**: 8-bit offset into the stack page (0x0100-0x01FF)
//! - **P**: eight status bits, kept as individual bools and packed on demand
//!
//! Nothing in here knows about memory or instructions.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// One bit of the processor status register.
///
/// Bit layout (NV-BDIZC):
/// - Bit 7: N (Negative)
/// - Bit 6: V (Overflow)
/// - Bit 5: unused, always 1 when packed
/// - Bit 4: B (Break)
/// - Bit 3: D (Decimal)
/// - Bit 2: I (Interrupt Disable)
/// - Bit 1: Z (Zero)
/// - Bit 0: C (Carry)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Flag {
    Carry,
    Zero,
    InterruptDisable,
    Decimal,
    Break,
    Unused,
    Overflow,
    Negative,
}

impl Flag {
    /// All flags, lowest bit first.
    pub const ALL: [Flag; 8] = [
        Flag::Carry,
        Flag::Zero,
        Flag::InterruptDisable,
        Flag::Decimal,
        Flag::Break,
        Flag::Unused,
        Flag::Overflow,
        Flag::Negative,
    ];

    /// Bit mask of this flag within the packed status byte.
    pub const fn mask(self) -> u8 {
        match self {
            Flag::Carry => 0b0000_0001,
            Flag::Zero => 0b0000_0010,
            Flag::InterruptDisable => 0b0000_0100,
            Flag::Decimal => 0b0000_1000,
            Flag::Break => 0b0001_0000,
            Flag::Unused => 0b0010_0000,
            Flag::Overflow => 0b0100_0000,
            Flag::Negative => 0b1000_0000,
        }
    }

    /// Single-letter name as printed in `NV-BDIZC`.
    pub const fn letter(self) -> char {
        match self {
            Flag::Carry => 'C',
            Flag::Zero => 'Z',
            Flag::InterruptDisable => 'I',
            Flag::Decimal => 'D',
            Flag::Break => 'B',
            Flag::Unused => '-',
            Flag::Overflow => 'V',
            Flag::Negative => 'N',
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Error returned when a flag name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status flag name: {0:?}")]
pub struct FlagParseError(pub String);

impl FromStr for Flag {
    type Err = FlagParseError;

    /// Accepts the single letter (`"C"`) or the long name (`"carry"`),
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let flag = match s.trim().to_ascii_lowercase().as_str() {
            "c" | "carry" => Flag::Carry,
            "z" | "zero" => Flag::Zero,
            "i" | "interrupt" | "interrupt_disable" | "irq_disable" => Flag::InterruptDisable,
            "d" | "decimal" => Flag::Decimal,
            "b" | "break" => Flag::Break,
            "u" | "unused" => Flag::Unused,
            "v" | "overflow" => Flag::Overflow,
            "n" | "negative" => Flag::Negative,
            _ => return Err(FlagParseError(s.to_string())),
        };
        Ok(flag)
    }
}

/// Processor status flags.
///
/// Stored unpacked so instruction code can assign individual bits directly.
/// The unused bit has no storage: it reads as 1 whenever the byte is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusFlags {
    /// Negative flag (set if bit 7 of result is 1)
    pub n: bool,

    /// Overflow flag (set on signed overflow)
    pub v: bool,

    /// Break flag (only meaningful in a pushed status byte)
    pub b: bool,

    /// Decimal mode flag (enables BCD arithmetic)
    pub d: bool,

    /// Interrupt disable flag (blocks IRQ when set)
    pub i: bool,

    /// Zero flag (set if result is zero)
    pub z: bool,

    /// Carry flag (set on unsigned overflow/underflow)
    pub c: bool,
}

impl StatusFlags {
    /// Packs the flags into a status byte with bit 5 forced to 1.
    ///
    /// ```
    /// use emu6502::StatusFlags;
    ///
    /// let flags = StatusFlags { i: true, ..StatusFlags::default() };
    /// assert_eq!(flags.to_byte(), 0b0010_0100);
    /// ```
    pub fn to_byte(self) -> u8 {
        let mut status = Flag::Unused.mask();
        for flag in Flag::ALL {
            if self.get(flag) {
                status |= flag.mask();
            }
        }
        status
    }

    /// Unpacks a status byte. Bit 5 is ignored.
    pub fn from_byte(value: u8) -> Self {
        Self {
            n: value & Flag::Negative.mask() != 0,
            v: value & Flag::Overflow.mask() != 0,
            b: value & Flag::Break.mask() != 0,
            d: value & Flag::Decimal.mask() != 0,
            i: value & Flag::InterruptDisable.mask() != 0,
            z: value & Flag::Zero.mask() != 0,
            c: value & Flag::Carry.mask() != 0,
        }
    }

    /// Reads one flag. The unused bit always reads as set.
    pub fn get(self, flag: Flag) -> bool {
        match flag {
            Flag::Carry => self.c,
            Flag::Zero => self.z,
            Flag::InterruptDisable => self.i,
            Flag::Decimal => self.d,
            Flag::Break => self.b,
            Flag::Unused => true,
            Flag::Overflow => self.v,
            Flag::Negative => self.n,
        }
    }

    /// Writes one flag. Writes to the unused bit are ignored.
    pub fn set(&mut self, flag: Flag, value: bool) {
        match flag {
            Flag::Carry => self.c = value,
            Flag::Zero => self.z = value,
            Flag::InterruptDisable => self.i = value,
            Flag::Decimal => self.d = value,
            Flag::Break => self.b = value,
            Flag::Unused => {}
            Flag::Overflow => self.v = value,
            Flag::Negative => self.n = value,
        }
    }

    /// Sets Z and N from a result byte.
    #[inline]
    pub fn update_nz(&mut self, result: u8) {
        self.z = result == 0;
        self.n = result & 0x80 != 0;
    }
}

impl fmt::Display for StatusFlags {
    /// Renders as `NV-BDIZC`, with `.` for clear bits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for flag in Flag::ALL.iter().rev() {
            let c = if self.get(*flag) { flag.letter() } else { '.' };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// Snapshot of every programmer-visible register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Registers {
    /// Accumulator register
    pub a: u8,

    /// X index register
    pub x: u8,

    /// Y index register
    pub y: u8,

    /// Program counter (address of next instruction)
    pub pc: u16,

    /// Stack pointer (0x0100 + sp gives full stack address)
    pub sp: u8,

    /// Status flags
    pub p: StatusFlags,
}

impl Registers {
    /// Stack pointer value after power-on / reset.
    pub const POWER_ON_SP: u8 = 0xFD;
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A:{:02X} X:{:02X} Y:{:02X} SP:{:02X} PC:{:04X} P:{}",
            self.a, self.x, self.y, self.sp, self.pc, self.p
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unused_bit_always_set_when_packed() {
        assert_eq!(StatusFlags::default().to_byte(), 0x20);
        assert_eq!(StatusFlags::from_byte(0x00).to_byte(), 0x20);
        assert_eq!(StatusFlags::from_byte(0xFF).to_byte(), 0xFF);
    }

    #[test]
    fn test_from_byte_matches_masks() {
        let flags = StatusFlags::from_byte(0b1100_0011);
        assert!(flags.n);
        assert!(flags.v);
        assert!(!flags.b);
        assert!(!flags.d);
        assert!(!flags.i);
        assert!(flags.z);
        assert!(flags.c);
    }

    #[test]
    fn test_flag_names() {
        assert_eq!("C".parse::<Flag>(), Ok(Flag::Carry));
        assert_eq!("overflow".parse::<Flag>(), Ok(Flag::Overflow));
        assert_eq!("Interrupt".parse::<Flag>(), Ok(Flag::InterruptDisable));
        assert!("Q".parse::<Flag>().is_err());
    }

    #[test]
    fn test_set_unused_is_ignored() {
        let mut flags = StatusFlags::default();
        flags.set(Flag::Unused, false);
        assert!(flags.get(Flag::Unused));
    }

    #[test]
    fn test_display() {
        let flags = StatusFlags {
            n: true,
            c: true,
            ..StatusFlags::default()
        };
        assert_eq!(flags.to_string(), "N.-....C");
    }
}

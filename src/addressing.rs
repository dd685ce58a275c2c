//! # Addressing Modes
//!
//! This module defines the 13 addressing modes supported by the 6502 processor
//! and the resolver that turns an instruction's operand bytes into an effective
//! operand.
//!
//! ## Cost table
//!
//! | Mode            | Extra cycle                                        |
//! |-----------------|----------------------------------------------------|
//! | AbsoluteX/Y     | +1 on page crossing, read instructions only        |
//! | IndirectY       | +1 on page crossing, read instructions only        |
//! | Relative        | +1 when taken, +1 more when the target page differs |
//! | everything else | none                                               |
//!
//! Whether an opcode pays the indexed penalty is recorded in the opcode table
//! (`OpcodeMetadata::page_penalty`); the resolver only reports the crossing.

use crate::{MemoryBus, CPU};

/// 6502 addressing mode enumeration.
///
/// # Operand Sizes
///
/// - **0 bytes**: Implicit, Accumulator
/// - **1 byte**: Immediate, ZeroPage, ZeroPageX, ZeroPageY, Relative, IndirectX, IndirectY
/// - **2 bytes**: Absolute, AbsoluteX, AbsoluteY, Indirect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AddressingMode {
    /// No operand, operation implied by instruction.
    ///
    /// Examples: CLC, RTS, NOP
    Implicit,

    /// Operates directly on the accumulator register.
    ///
    /// Examples: LSR A, ROL A, ASL A
    Accumulator,

    /// 8-bit constant operand in instruction.
    ///
    /// Example: LDA #$10
    Immediate,

    /// 8-bit address in zero page (0x00-0xFF).
    ///
    /// Example: LDA $80
    ZeroPage,

    /// Zero page address indexed by X register, wrapping within zero page.
    ///
    /// Example: LDA $80,X
    ZeroPageX,

    /// Zero page address indexed by Y register, wrapping within zero page.
    ///
    /// Example: LDX $80,Y
    ZeroPageY,

    /// Signed 8-bit offset for branch instructions, relative to the next instruction.
    ///
    /// Example: BEQ label
    Relative,

    /// Full 16-bit address.
    ///
    /// Example: JMP $1234
    Absolute,

    /// 16-bit address indexed by X register.
    ///
    /// Example: LDA $1234,X
    AbsoluteX,

    /// 16-bit address indexed by Y register.
    ///
    /// Example: LDA $1234,Y
    AbsoluteY,

    /// Indirect jump through 16-bit pointer. Only used by JMP.
    ///
    /// Example: JMP ($FFFC)
    Indirect,

    /// Indexed indirect: (ZP + X) then dereference.
    ///
    /// Example: LDA ($40,X)
    IndirectX,

    /// Indirect indexed: ZP dereference then + Y.
    ///
    /// Example: LDA ($40),Y
    IndirectY,
}

impl AddressingMode {
    /// Number of operand bytes following the opcode.
    pub const fn operand_len(self) -> u8 {
        match self {
            AddressingMode::Implicit | AddressingMode::Accumulator => 0,
            AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::Relative
            | AddressingMode::IndirectX
            | AddressingMode::IndirectY => 1,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 2,
        }
    }

    /// Total instruction length including the opcode byte.
    pub const fn instruction_len(self) -> u8 {
        self.operand_len() + 1
    }
}

/// The effective operand of a decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// No operand (implied instructions).
    None,
    /// The accumulator itself.
    Accumulator,
    /// A constant from the instruction stream.
    Immediate(u8),
    /// A memory location (also the branch or jump target).
    Address(u16),
}

/// Output of the addressing-mode resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    /// The effective operand.
    pub operand: Operand,

    /// Whether indexing (or a branch target) crossed a 256-byte page.
    pub page_crossed: bool,
}

impl Resolved {
    const fn plain(operand: Operand) -> Self {
        Self {
            operand,
            page_crossed: false,
        }
    }
}

#[inline]
fn crosses_page(base: u16, effective: u16) -> bool {
    base & 0xFF00 != effective & 0xFF00
}

impl<M: MemoryBus> CPU<M> {
    /// Reads a little-endian pointer from zero page, wrapping the high byte
    /// fetch within page 0.
    fn read_zp_pointer(&self, zp: u8) -> u16 {
        let lo = self.memory.read(zp as u16);
        let hi = self.memory.read(zp.wrapping_add(1) as u16);
        u16::from_le_bytes([lo, hi])
    }

    /// Resolves the operand of the instruction whose opcode sits at `pc`.
    ///
    /// Operand bytes and indirect pointers are fetched here; the data access at
    /// the effective address is left to the instruction.
    pub(crate) fn resolve_operand(&self, mode: AddressingMode, pc: u16) -> Resolved {
        let b1 = self.memory.read(pc.wrapping_add(1));
        let word = || u16::from_le_bytes([b1, self.memory.read(pc.wrapping_add(2))]);

        match mode {
            AddressingMode::Implicit => Resolved::plain(Operand::None),
            AddressingMode::Accumulator => Resolved::plain(Operand::Accumulator),
            AddressingMode::Immediate => Resolved::plain(Operand::Immediate(b1)),
            AddressingMode::ZeroPage => Resolved::plain(Operand::Address(b1 as u16)),
            AddressingMode::ZeroPageX => {
                Resolved::plain(Operand::Address(b1.wrapping_add(self.regs.x) as u16))
            }
            AddressingMode::ZeroPageY => {
                Resolved::plain(Operand::Address(b1.wrapping_add(self.regs.y) as u16))
            }
            AddressingMode::Relative => {
                let next = pc.wrapping_add(2);
                let target = next.wrapping_add_signed(b1 as i8 as i16);
                Resolved {
                    operand: Operand::Address(target),
                    page_crossed: crosses_page(next, target),
                }
            }
            AddressingMode::Absolute => Resolved::plain(Operand::Address(word())),
            AddressingMode::AbsoluteX => {
                let base = word();
                let addr = base.wrapping_add(self.regs.x as u16);
                Resolved {
                    operand: Operand::Address(addr),
                    page_crossed: crosses_page(base, addr),
                }
            }
            AddressingMode::AbsoluteY => {
                let base = word();
                let addr = base.wrapping_add(self.regs.y as u16);
                Resolved {
                    operand: Operand::Address(addr),
                    page_crossed: crosses_page(base, addr),
                }
            }
            AddressingMode::Indirect => {
                // NMOS bug: the high byte is fetched from the same page when the
                // pointer sits at $xxFF.
                let ptr = word();
                let lo = self.memory.read(ptr);
                let hi_addr = (ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF);
                let hi = self.memory.read(hi_addr);
                Resolved::plain(Operand::Address(u16::from_le_bytes([lo, hi])))
            }
            AddressingMode::IndirectX => {
                let ptr = b1.wrapping_add(self.regs.x);
                Resolved::plain(Operand::Address(self.read_zp_pointer(ptr)))
            }
            AddressingMode::IndirectY => {
                let base = self.read_zp_pointer(b1);
                let addr = base.wrapping_add(self.regs.y as u16);
                Resolved {
                    operand: Operand::Address(addr),
                    page_crossed: crosses_page(base, addr),
                }
            }
        }
    }
}

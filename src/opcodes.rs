//! # Opcode Metadata Table
//!
//! The complete 256-entry opcode table: the single source of truth for decoding.
//!
//! The table covers:
//! - **151 documented instructions** - Official NMOS 6502 opcodes
//! - **105 undocumented opcodes** - Explicit `???` entries, never undefined
//!
//! Each entry carries the mnemonic (which selects the semantic action in
//! `instructions`), addressing mode, base cycle cost, size and whether indexed
//! reads pay the page-crossing cycle.
//!
//! Undocumented opcodes are 1 byte and 2 cycles. What the CPU does with them is
//! decided by [`IllegalOpcodePolicy`](crate::IllegalOpcodePolicy).

use std::fmt;

use crate::addressing::AddressingMode;

/// Instruction mnemonics of the documented NMOS 6502 instruction set.
///
/// `Ill` stands for every undocumented opcode and prints as `???`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
#[rustfmt::skip]
pub enum Mnemonic {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc,
    Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp,
    Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rol, Ror, Rti,
    Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
    Ill,
}

impl Mnemonic {
    /// Upper-case assembler spelling (`"LDA"`, `"???"`).
    #[rustfmt::skip]
    pub const fn as_str(self) -> &'static str {
        use Mnemonic::*;
        match self {
            Adc => "ADC", And => "AND", Asl => "ASL", Bcc => "BCC", Bcs => "BCS",
            Beq => "BEQ", Bit => "BIT", Bmi => "BMI", Bne => "BNE", Bpl => "BPL",
            Brk => "BRK", Bvc => "BVC", Bvs => "BVS", Clc => "CLC", Cld => "CLD",
            Cli => "CLI", Clv => "CLV", Cmp => "CMP", Cpx => "CPX", Cpy => "CPY",
            Dec => "DEC", Dex => "DEX", Dey => "DEY", Eor => "EOR", Inc => "INC",
            Inx => "INX", Iny => "INY", Jmp => "JMP", Jsr => "JSR", Lda => "LDA",
            Ldx => "LDX", Ldy => "LDY", Lsr => "LSR", Nop => "NOP", Ora => "ORA",
            Pha => "PHA", Php => "PHP", Pla => "PLA", Plp => "PLP", Rol => "ROL",
            Ror => "ROR", Rti => "RTI", Rts => "RTS", Sbc => "SBC", Sec => "SEC",
            Sed => "SED", Sei => "SEI", Sta => "STA", Stx => "STX", Sty => "STY",
            Tax => "TAX", Tay => "TAY", Tsx => "TSX", Txa => "TXA", Txs => "TXS",
            Tya => "TYA", Ill => "???",
        }
    }

    /// Whether this is a conditional branch.
    pub const fn is_branch(self) -> bool {
        matches!(
            self,
            Mnemonic::Bcc
                | Mnemonic::Bcs
                | Mnemonic::Beq
                | Mnemonic::Bmi
                | Mnemonic::Bne
                | Mnemonic::Bpl
                | Mnemonic::Bvc
                | Mnemonic::Bvs
        )
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Metadata for a single 6502 opcode.
///
/// # Examples
///
/// ```
/// use emu6502::{AddressingMode, Mnemonic, OPCODE_TABLE};
///
/// let lda_imm = &OPCODE_TABLE[0xA9];
/// assert_eq!(lda_imm.mnemonic, Mnemonic::Lda);
/// assert_eq!(lda_imm.addressing_mode, AddressingMode::Immediate);
/// assert_eq!(lda_imm.base_cycles, 2);
/// assert_eq!(lda_imm.size_bytes, 2);
/// assert!(!lda_imm.illegal);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeMetadata {
    /// Instruction mnemonic; selects the semantic action.
    pub mnemonic: Mnemonic,

    /// Addressing mode for this instruction.
    pub addressing_mode: AddressingMode,

    /// Base cycle cost (before page-crossing and branch penalties).
    pub base_cycles: u8,

    /// Total instruction size in bytes (opcode + operands).
    pub size_bytes: u8,

    /// Indexed reads pay one extra cycle when the page is crossed.
    pub page_penalty: bool,

    /// Undocumented opcode.
    pub illegal: bool,
}

const fn op(mnemonic: Mnemonic, addressing_mode: AddressingMode, base_cycles: u8) -> OpcodeMetadata {
    OpcodeMetadata {
        mnemonic,
        addressing_mode,
        base_cycles,
        size_bytes: addressing_mode.instruction_len(),
        page_penalty: false,
        illegal: false,
    }
}

const fn op_p(mnemonic: Mnemonic, addressing_mode: AddressingMode, base_cycles: u8) -> OpcodeMetadata {
    OpcodeMetadata {
        page_penalty: true,
        ..op(mnemonic, addressing_mode, base_cycles)
    }
}

/// Entry shared by every undocumented opcode.
pub const ILLEGAL: OpcodeMetadata = OpcodeMetadata {
    mnemonic: Mnemonic::Ill,
    addressing_mode: AddressingMode::Implicit,
    base_cycles: 2,
    size_bytes: 1,
    page_penalty: false,
    illegal: true,
};

use AddressingMode::*;
use Mnemonic::*;

/// Complete 256-entry opcode metadata table indexed by opcode byte value.
///
/// ```
/// use emu6502::OPCODE_TABLE;
///
/// let brk = &OPCODE_TABLE[0x00];
/// assert_eq!(brk.mnemonic.as_str(), "BRK");
/// assert_eq!(brk.base_cycles, 7);
///
/// let illegal = &OPCODE_TABLE[0x02];
/// assert_eq!(illegal.mnemonic.as_str(), "???");
/// assert!(illegal.illegal);
/// ```
#[rustfmt::skip]
pub const OPCODE_TABLE: [OpcodeMetadata; 256] = [
    /* 0x00 */ op(Brk, Implicit, 7),
    /* 0x01 */ op(Ora, IndirectX, 6),
    /* 0x02 */ ILLEGAL,
    /* 0x03 */ ILLEGAL,
    /* 0x04 */ ILLEGAL,
    /* 0x05 */ op(Ora, ZeroPage, 3),
    /* 0x06 */ op(Asl, ZeroPage, 5),
    /* 0x07 */ ILLEGAL,
    /* 0x08 */ op(Php, Implicit, 3),
    /* 0x09 */ op(Ora, Immediate, 2),
    /* 0x0A */ op(Asl, Accumulator, 2),
    /* 0x0B */ ILLEGAL,
    /* 0x0C */ ILLEGAL,
    /* 0x0D */ op(Ora, Absolute, 4),
    /* 0x0E */ op(Asl, Absolute, 6),
    /* 0x0F */ ILLEGAL,
    /* 0x10 */ op(Bpl, Relative, 2),
    /* 0x11 */ op_p(Ora, IndirectY, 5),
    /* 0x12 */ ILLEGAL,
    /* 0x13 */ ILLEGAL,
    /* 0x14 */ ILLEGAL,
    /* 0x15 */ op(Ora, ZeroPageX, 4),
    /* 0x16 */ op(Asl, ZeroPageX, 6),
    /* 0x17 */ ILLEGAL,
    /* 0x18 */ op(Clc, Implicit, 2),
    /* 0x19 */ op_p(Ora, AbsoluteY, 4),
    /* 0x1A */ ILLEGAL,
    /* 0x1B */ ILLEGAL,
    /* 0x1C */ ILLEGAL,
    /* 0x1D */ op_p(Ora, AbsoluteX, 4),
    /* 0x1E */ op(Asl, AbsoluteX, 7),
    /* 0x1F */ ILLEGAL,
    /* 0x20 */ op(Jsr, Absolute, 6),
    /* 0x21 */ op(And, IndirectX, 6),
    /* 0x22 */ ILLEGAL,
    /* 0x23 */ ILLEGAL,
    /* 0x24 */ op(Bit, ZeroPage, 3),
    /* 0x25 */ op(And, ZeroPage, 3),
    /* 0x26 */ op(Rol, ZeroPage, 5),
    /* 0x27 */ ILLEGAL,
    /* 0x28 */ op(Plp, Implicit, 4),
    /* 0x29 */ op(And, Immediate, 2),
    /* 0x2A */ op(Rol, Accumulator, 2),
    /* 0x2B */ ILLEGAL,
    /* 0x2C */ op(Bit, Absolute, 4),
    /* 0x2D */ op(And, Absolute, 4),
    /* 0x2E */ op(Rol, Absolute, 6),
    /* 0x2F */ ILLEGAL,
    /* 0x30 */ op(Bmi, Relative, 2),
    /* 0x31 */ op_p(And, IndirectY, 5),
    /* 0x32 */ ILLEGAL,
    /* 0x33 */ ILLEGAL,
    /* 0x34 */ ILLEGAL,
    /* 0x35 */ op(And, ZeroPageX, 4),
    /* 0x36 */ op(Rol, ZeroPageX, 6),
    /* 0x37 */ ILLEGAL,
    /* 0x38 */ op(Sec, Implicit, 2),
    /* 0x39 */ op_p(And, AbsoluteY, 4),
    /* 0x3A */ ILLEGAL,
    /* 0x3B */ ILLEGAL,
    /* 0x3C */ ILLEGAL,
    /* 0x3D */ op_p(And, AbsoluteX, 4),
    /* 0x3E */ op(Rol, AbsoluteX, 7),
    /* 0x3F */ ILLEGAL,
    /* 0x40 */ op(Rti, Implicit, 6),
    /* 0x41 */ op(Eor, IndirectX, 6),
    /* 0x42 */ ILLEGAL,
    /* 0x43 */ ILLEGAL,
    /* 0x44 */ ILLEGAL,
    /* 0x45 */ op(Eor, ZeroPage, 3),
    /* 0x46 */ op(Lsr, ZeroPage, 5),
    /* 0x47 */ ILLEGAL,
    /* 0x48 */ op(Pha, Implicit, 3),
    /* 0x49 */ op(Eor, Immediate, 2),
    /* 0x4A */ op(Lsr, Accumulator, 2),
    /* 0x4B */ ILLEGAL,
    /* 0x4C */ op(Jmp, Absolute, 3),
    /* 0x4D */ op(Eor, Absolute, 4),
    /* 0x4E */ op(Lsr, Absolute, 6),
    /* 0x4F */ ILLEGAL,
    /* 0x50 */ op(Bvc, Relative, 2),
    /* 0x51 */ op_p(Eor, IndirectY, 5),
    /* 0x52 */ ILLEGAL,
    /* 0x53 */ ILLEGAL,
    /* 0x54 */ ILLEGAL,
    /* 0x55 */ op(Eor, ZeroPageX, 4),
    /* 0x56 */ op(Lsr, ZeroPageX, 6),
    /* 0x57 */ ILLEGAL,
    /* 0x58 */ op(Cli, Implicit, 2),
    /* 0x59 */ op_p(Eor, AbsoluteY, 4),
    /* 0x5A */ ILLEGAL,
    /* 0x5B */ ILLEGAL,
    /* 0x5C */ ILLEGAL,
    /* 0x5D */ op_p(Eor, AbsoluteX, 4),
    /* 0x5E */ op(Lsr, AbsoluteX, 7),
    /* 0x5F */ ILLEGAL,
    /* 0x60 */ op(Rts, Implicit, 6),
    /* 0x61 */ op(Adc, IndirectX, 6),
    /* 0x62 */ ILLEGAL,
    /* 0x63 */ ILLEGAL,
    /* 0x64 */ ILLEGAL,
    /* 0x65 */ op(Adc, ZeroPage, 3),
    /* 0x66 */ op(Ror, ZeroPage, 5),
    /* 0x67 */ ILLEGAL,
    /* 0x68 */ op(Pla, Implicit, 4),
    /* 0x69 */ op(Adc, Immediate, 2),
    /* 0x6A */ op(Ror, Accumulator, 2),
    /* 0x6B */ ILLEGAL,
    /* 0x6C */ op(Jmp, Indirect, 5),
    /* 0x6D */ op(Adc, Absolute, 4),
    /* 0x6E */ op(Ror, Absolute, 6),
    /* 0x6F */ ILLEGAL,
    /* 0x70 */ op(Bvs, Relative, 2),
    /* 0x71 */ op_p(Adc, IndirectY, 5),
    /* 0x72 */ ILLEGAL,
    /* 0x73 */ ILLEGAL,
    /* 0x74 */ ILLEGAL,
    /* 0x75 */ op(Adc, ZeroPageX, 4),
    /* 0x76 */ op(Ror, ZeroPageX, 6),
    /* 0x77 */ ILLEGAL,
    /* 0x78 */ op(Sei, Implicit, 2),
    /* 0x79 */ op_p(Adc, AbsoluteY, 4),
    /* 0x7A */ ILLEGAL,
    /* 0x7B */ ILLEGAL,
    /* 0x7C */ ILLEGAL,
    /* 0x7D */ op_p(Adc, AbsoluteX, 4),
    /* 0x7E */ op(Ror, AbsoluteX, 7),
    /* 0x7F */ ILLEGAL,
    /* 0x80 */ ILLEGAL,
    /* 0x81 */ op(Sta, IndirectX, 6),
    /* 0x82 */ ILLEGAL,
    /* 0x83 */ ILLEGAL,
    /* 0x84 */ op(Sty, ZeroPage, 3),
    /* 0x85 */ op(Sta, ZeroPage, 3),
    /* 0x86 */ op(Stx, ZeroPage, 3),
    /* 0x87 */ ILLEGAL,
    /* 0x88 */ op(Dey, Implicit, 2),
    /* 0x89 */ ILLEGAL,
    /* 0x8A */ op(Txa, Implicit, 2),
    /* 0x8B */ ILLEGAL,
    /* 0x8C */ op(Sty, Absolute, 4),
    /* 0x8D */ op(Sta, Absolute, 4),
    /* 0x8E */ op(Stx, Absolute, 4),
    /* 0x8F */ ILLEGAL,
    /* 0x90 */ op(Bcc, Relative, 2),
    /* 0x91 */ op(Sta, IndirectY, 6),
    /* 0x92 */ ILLEGAL,
    /* 0x93 */ ILLEGAL,
    /* 0x94 */ op(Sty, ZeroPageX, 4),
    /* 0x95 */ op(Sta, ZeroPageX, 4),
    /* 0x96 */ op(Stx, ZeroPageY, 4),
    /* 0x97 */ ILLEGAL,
    /* 0x98 */ op(Tya, Implicit, 2),
    /* 0x99 */ op(Sta, AbsoluteY, 5),
    /* 0x9A */ op(Txs, Implicit, 2),
    /* 0x9B */ ILLEGAL,
    /* 0x9C */ ILLEGAL,
    /* 0x9D */ op(Sta, AbsoluteX, 5),
    /* 0x9E */ ILLEGAL,
    /* 0x9F */ ILLEGAL,
    /* 0xA0 */ op(Ldy, Immediate, 2),
    /* 0xA1 */ op(Lda, IndirectX, 6),
    /* 0xA2 */ op(Ldx, Immediate, 2),
    /* 0xA3 */ ILLEGAL,
    /* 0xA4 */ op(Ldy, ZeroPage, 3),
    /* 0xA5 */ op(Lda, ZeroPage, 3),
    /* 0xA6 */ op(Ldx, ZeroPage, 3),
    /* 0xA7 */ ILLEGAL,
    /* 0xA8 */ op(Tay, Implicit, 2),
    /* 0xA9 */ op(Lda, Immediate, 2),
    /* 0xAA */ op(Tax, Implicit, 2),
    /* 0xAB */ ILLEGAL,
    /* 0xAC */ op(Ldy, Absolute, 4),
    /* 0xAD */ op(Lda, Absolute, 4),
    /* 0xAE */ op(Ldx, Absolute, 4),
    /* 0xAF */ ILLEGAL,
    /* 0xB0 */ op(Bcs, Relative, 2),
    /* 0xB1 */ op_p(Lda, IndirectY, 5),
    /* 0xB2 */ ILLEGAL,
    /* 0xB3 */ ILLEGAL,
    /* 0xB4 */ op(Ldy, ZeroPageX, 4),
    /* 0xB5 */ op(Lda, ZeroPageX, 4),
    /* 0xB6 */ op(Ldx, ZeroPageY, 4),
    /* 0xB7 */ ILLEGAL,
    /* 0xB8 */ op(Clv, Implicit, 2),
    /* 0xB9 */ op_p(Lda, AbsoluteY, 4),
    /* 0xBA */ op(Tsx, Implicit, 2),
    /* 0xBB */ ILLEGAL,
    /* 0xBC */ op_p(Ldy, AbsoluteX, 4),
    /* 0xBD */ op_p(Lda, AbsoluteX, 4),
    /* 0xBE */ op_p(Ldx, AbsoluteY, 4),
    /* 0xBF */ ILLEGAL,
    /* 0xC0 */ op(Cpy, Immediate, 2),
    /* 0xC1 */ op(Cmp, IndirectX, 6),
    /* 0xC2 */ ILLEGAL,
    /* 0xC3 */ ILLEGAL,
    /* 0xC4 */ op(Cpy, ZeroPage, 3),
    /* 0xC5 */ op(Cmp, ZeroPage, 3),
    /* 0xC6 */ op(Dec, ZeroPage, 5),
    /* 0xC7 */ ILLEGAL,
    /* 0xC8 */ op(Iny, Implicit, 2),
    /* 0xC9 */ op(Cmp, Immediate, 2),
    /* 0xCA */ op(Dex, Implicit, 2),
    /* 0xCB */ ILLEGAL,
    /* 0xCC */ op(Cpy, Absolute, 4),
    /* 0xCD */ op(Cmp, Absolute, 4),
    /* 0xCE */ op(Dec, Absolute, 6),
    /* 0xCF */ ILLEGAL,
    /* 0xD0 */ op(Bne, Relative, 2),
    /* 0xD1 */ op_p(Cmp, IndirectY, 5),
    /* 0xD2 */ ILLEGAL,
    /* 0xD3 */ ILLEGAL,
    /* 0xD4 */ ILLEGAL,
    /* 0xD5 */ op(Cmp, ZeroPageX, 4),
    /* 0xD6 */ op(Dec, ZeroPageX, 6),
    /* 0xD7 */ ILLEGAL,
    /* 0xD8 */ op(Cld, Implicit, 2),
    /* 0xD9 */ op_p(Cmp, AbsoluteY, 4),
    /* 0xDA */ ILLEGAL,
    /* 0xDB */ ILLEGAL,
    /* 0xDC */ ILLEGAL,
    /* 0xDD */ op_p(Cmp, AbsoluteX, 4),
    /* 0xDE */ op(Dec, AbsoluteX, 7),
    /* 0xDF */ ILLEGAL,
    /* 0xE0 */ op(Cpx, Immediate, 2),
    /* 0xE1 */ op(Sbc, IndirectX, 6),
    /* 0xE2 */ ILLEGAL,
    /* 0xE3 */ ILLEGAL,
    /* 0xE4 */ op(Cpx, ZeroPage, 3),
    /* 0xE5 */ op(Sbc, ZeroPage, 3),
    /* 0xE6 */ op(Inc, ZeroPage, 5),
    /* 0xE7 */ ILLEGAL,
    /* 0xE8 */ op(Inx, Implicit, 2),
    /* 0xE9 */ op(Sbc, Immediate, 2),
    /* 0xEA */ op(Nop, Implicit, 2),
    /* 0xEB */ ILLEGAL,
    /* 0xEC */ op(Cpx, Absolute, 4),
    /* 0xED */ op(Sbc, Absolute, 4),
    /* 0xEE */ op(Inc, Absolute, 6),
    /* 0xEF */ ILLEGAL,
    /* 0xF0 */ op(Beq, Relative, 2),
    /* 0xF1 */ op_p(Sbc, IndirectY, 5),
    /* 0xF2 */ ILLEGAL,
    /* 0xF3 */ ILLEGAL,
    /* 0xF4 */ ILLEGAL,
    /* 0xF5 */ op(Sbc, ZeroPageX, 4),
    /* 0xF6 */ op(Inc, ZeroPageX, 6),
    /* 0xF7 */ ILLEGAL,
    /* 0xF8 */ op(Sed, Implicit, 2),
    /* 0xF9 */ op_p(Sbc, AbsoluteY, 4),
    /* 0xFA */ ILLEGAL,
    /* 0xFB */ ILLEGAL,
    /* 0xFC */ ILLEGAL,
    /* 0xFD */ op_p(Sbc, AbsoluteX, 4),
    /* 0xFE */ op(Inc, AbsoluteX, 7),
    /* 0xFF */ ILLEGAL,
];

/// Looks up the metadata for an opcode byte.
#[inline]
pub fn lookup(opcode: u8) -> &'static OpcodeMetadata {
    &OPCODE_TABLE[opcode as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_count() {
        let documented = OPCODE_TABLE.iter().filter(|m| !m.illegal).count();
        assert_eq!(documented, 151);
    }

    #[test]
    fn test_illegal_entries_are_consistent() {
        for (opcode, meta) in OPCODE_TABLE.iter().enumerate() {
            assert_eq!(
                meta.illegal,
                meta.mnemonic == Mnemonic::Ill,
                "opcode 0x{opcode:02X}"
            );
        }
    }

    #[test]
    fn test_penalty_only_on_indexed_modes() {
        for meta in OPCODE_TABLE.iter().filter(|m| m.page_penalty) {
            assert!(matches!(
                meta.addressing_mode,
                AbsoluteX | AbsoluteY | IndirectY
            ));
        }
    }

    #[test]
    fn test_stores_never_pay_penalty() {
        assert!(!lookup(0x9D).page_penalty);
        assert!(!lookup(0x99).page_penalty);
        assert!(!lookup(0x91).page_penalty);
        assert_eq!(lookup(0x9D).base_cycles, 5);
    }
}

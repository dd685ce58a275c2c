//! 6502 Disassembler Module
//!
//! Converts machine code into assembly text. The debugger uses the same
//! decoder and formatter to label trace entries.

pub mod decoder;
pub mod formatter;

use crate::addressing::AddressingMode;
use crate::opcodes::Mnemonic;

pub use decoder::decode_instruction;
pub use formatter::{format_instruction, format_listing};

/// A single decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// Address of the opcode byte
    pub address: u16,

    /// The opcode byte value (0x00-0xFF)
    pub opcode: u8,

    /// Decoded mnemonic; [`Mnemonic::Ill`] for bytes that do not start a
    /// documented instruction
    pub mnemonic: Mnemonic,

    /// Addressing mode used by this instruction
    pub addressing_mode: AddressingMode,

    /// Operand bytes; only the first `size_bytes - 1` are meaningful
    pub operands: [u8; 2],

    /// Total size in bytes (1-3)
    pub size_bytes: u8,

    /// Base cycle cost (excluding penalties)
    pub base_cycles: u8,
}

impl Instruction {
    /// The meaningful operand bytes.
    pub fn operand_bytes(&self) -> &[u8] {
        &self.operands[..(self.size_bytes.saturating_sub(1) as usize).min(2)]
    }

    /// Whether this is a `.byte` placeholder rather than an instruction.
    pub fn is_data(&self) -> bool {
        self.mnemonic == Mnemonic::Ill
    }

    /// A one-byte `.byte` placeholder.
    pub(crate) fn data_byte(address: u16, byte: u8) -> Self {
        Self {
            address,
            opcode: byte,
            mnemonic: Mnemonic::Ill,
            addressing_mode: AddressingMode::Implicit,
            operands: [0; 2],
            size_bytes: 1,
            base_cycles: 0,
        }
    }
}

/// Options controlling disassembly output.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisassemblyOptions {
    /// Address of the first byte
    pub start_address: u16,

    /// Include the raw instruction bytes in listings
    pub hex_dump: bool,

    /// Prefix listing lines with the offset from `start_address`
    pub show_offsets: bool,
}

/// Disassembles a byte slice.
///
/// Illegal opcodes and instructions cut off by the end of the slice become
/// one-byte `.byte` entries.
///
/// ```
/// use emu6502::disassembler::{disassemble, format_instruction, DisassemblyOptions};
///
/// let options = DisassemblyOptions { start_address: 0x8000, ..Default::default() };
/// let listing = disassemble(&[0xA9, 0x42, 0x8D, 0x00, 0x02, 0x02], options);
///
/// assert_eq!(format_instruction(&listing[0]), "LDA #$42");
/// assert_eq!(format_instruction(&listing[1]), "STA $0200");
/// assert_eq!(format_instruction(&listing[2]), ".byte $02");
/// ```
pub fn disassemble(bytes: &[u8], options: DisassemblyOptions) -> Vec<Instruction> {
    let mut instructions = Vec::new();
    let mut offset = 0;
    let mut address = options.start_address;

    while offset < bytes.len() {
        let instr = decoder::decode_instruction(&bytes[offset..], address)
            .unwrap_or_else(|| Instruction::data_byte(address, bytes[offset]));
        offset += instr.size_bytes as usize;
        address = address.wrapping_add(instr.size_bytes as u16);
        instructions.push(instr);
    }

    instructions
}

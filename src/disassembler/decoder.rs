//! Instruction decoder for the 6502 disassembler

use crate::disassembler::Instruction;
use crate::opcodes;

/// Decodes the instruction at the start of `bytes`.
///
/// Illegal opcodes decode to a one-byte `.byte` entry. Returns `None` when
/// `bytes` is empty or too short for the instruction it starts.
pub fn decode_instruction(bytes: &[u8], address: u16) -> Option<Instruction> {
    let &opcode = bytes.first()?;
    let metadata = opcodes::lookup(opcode);

    if metadata.illegal {
        return Some(Instruction::data_byte(address, opcode));
    }

    let size = metadata.size_bytes as usize;
    if bytes.len() < size {
        return None;
    }

    let mut operands = [0u8; 2];
    operands[..size - 1].copy_from_slice(&bytes[1..size]);

    Some(Instruction {
        address,
        opcode,
        mnemonic: metadata.mnemonic,
        addressing_mode: metadata.addressing_mode,
        operands,
        size_bytes: metadata.size_bytes,
        base_cycles: metadata.base_cycles,
    })
}
